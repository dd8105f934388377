//! # Windowing
//!
//! Window components, the primary window and the systems applying platform window events.

use std::ops::Deref;
use std::ops::DerefMut;

use glam::IVec2;
use glam::UVec2;
use glam::Vec2;

use crate::components::Name;
use crate::platform::PlatformEvent;
use crate::platform::PlatformEvents;
use crate::platform::PlatformHandle;
use crate::platform::WindowDescriptor;
use crate::platform::WindowId;
use crate::platform::WinitPlatform;
use crate::scheduler::Event;
use crate::scheduler::FirstRenderEnd;
use crate::scheduler::Step;
use crate::scheduler::Update;
use crate::Application;
use crate::Component;
use crate::Entity;
use crate::Plugin;

/// # Window Backend
///
/// Operations on a platform window.
pub trait WindowBackend {
    /// Returns the platform identifier of the window.
    fn id(&self) -> WindowId;

    /// Returns the title.
    fn title(&self) -> String;

    /// Sets the title.
    fn set_title(&mut self, title: &str);

    /// Returns the inner size in pixels.
    fn size(&self) -> UVec2;

    /// Requests a new inner size in pixels.
    fn set_size(&mut self, size: UVec2);

    /// Returns the position of the window on the desktop, if the platform reports one.
    fn position(&self) -> Option<IVec2>;

    /// Moves the window.
    fn set_position(&mut self, position: IVec2);

    /// Makes the window visible.
    fn show(&mut self);

    /// Hides the window.
    fn hide(&mut self);

    /// Returns true once the window was asked to close.
    fn should_close(&self) -> bool;

    /// Marks the window for closing. It is destroyed during the next [Update].
    fn close(&mut self);

    /// Returns true if the window is fullscreen.
    fn is_fullscreen(&self) -> bool;

    /// Enters or leaves fullscreen.
    fn set_fullscreen(&mut self, fullscreen: bool);

    /// Switches between fullscreen and windowed.
    fn toggle_fullscreen(&mut self) {
        let fullscreen = self.is_fullscreen();
        self.set_fullscreen(!fullscreen);
    }

    /// Returns true if the window has keyboard focus.
    fn is_focused(&self) -> bool;

    /// Moves the cursor, in window pixels.
    fn set_cursor_position(&mut self, position: Vec2);

    /// Shows or hides the cursor while it is over the window.
    fn set_cursor_visible(&mut self, visible: bool);
}

/// # Window
///
/// Component owning a platform window. Destroying the entity closes the window.
pub struct Window {
    backend: Box<dyn WindowBackend>,
}

impl Window {
    /// Returns a component owning the window.
    pub fn new(backend: Box<dyn WindowBackend>) -> Self {
        Self { backend }
    }
}

impl Component for Window {}

impl Deref for Window {
    type Target = dyn WindowBackend;

    fn deref(&self) -> &Self::Target {
        self.backend.as_ref()
    }
}

impl DerefMut for Window {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.backend.as_mut()
    }
}

/// # Primary Window
///
/// Entity of the window created by [WindowingPlugin]. Removed when that window is destroyed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PrimaryWindow {
    /// Window entity.
    pub entity: Entity,
}

/// Fired during [Update] for every window whose size changed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WindowResized {
    /// Window entity.
    pub entity: Entity,
    /// New width in pixels.
    pub width: u32,
    /// New height in pixels.
    pub height: u32,
}

impl Event for WindowResized {}

/// Stores the platform's pending events in [PlatformEvents].
pub fn poll_platform(step: &mut Step<'_, Update>) {
    let events = step
        .resources
        .use_resource::<PlatformHandle, _>(|platform| platform.poll_events())
        .unwrap_or_default();

    step.resources.insert(PlatformEvents(events));
}

/// Applies this frame's platform events to the windows, destroys windows that should close and
/// quits when the primary window is gone.
pub fn update_windows(step: &mut Step<'_, Update>) {
    let events = step
        .resources
        .get::<PlatformEvents>()
        .map(|events| events.0.clone())
        .unwrap_or_default();

    let mut resized = Vec::new();
    let mut quit = false;

    for event in events {
        match event {
            PlatformEvent::Quit => quit = true,
            PlatformEvent::CloseRequested { window } => {
                if let Some(entity) = find_window(step, window) {
                    step.world.use_component::<Window, _>(entity, |window| window.close());
                }
            }
            PlatformEvent::Resized {
                window,
                width,
                height,
            } => {
                if let Some(entity) = find_window(step, window) {
                    resized.push(WindowResized {
                        entity,
                        width,
                        height,
                    });
                }
            }
            _ => {}
        }
    }

    let closing: Vec<Entity> = step
        .world
        .query::<&Window>()
        .filter(|(_, window)| window.should_close())
        .map(|(entity, _)| entity)
        .collect();
    for entity in closing {
        log::debug!("closing window {entity}");
        step.world.destroy(entity);
    }

    for event in resized {
        if step.world.is_alive(event.entity) {
            step.invoke(event);
        }
    }

    if let Some(primary) = step.resources.get::<PrimaryWindow>().copied() {
        if !step.world.has_component::<Window>(primary.entity) {
            step.resources.erase::<PrimaryWindow>();
            quit = true;
        }
    }

    if quit {
        step.quit();
    }
}

/// Shows the primary window once the first frame was presented.
pub fn show_primary_window(step: &mut Step<'_, FirstRenderEnd>) {
    let Some(primary) = step.resources.get::<PrimaryWindow>().copied() else {
        return;
    };

    step.world
        .use_component::<Window, _>(primary.entity, |window| window.show());
}

fn find_window<E>(step: &mut Step<'_, E>, id: WindowId) -> Option<Entity> {
    step.world
        .query::<&Window>()
        .find(|(_, window)| window.id() == id)
        .map(|(entity, _)| entity)
}

/// # Windowing Plugin
///
/// Creates the primary window. Uses the platform in [PlatformHandle], creating a
/// [WinitPlatform] first if none was inserted.
#[derive(Clone, Debug)]
pub struct WindowingPlugin {
    /// Window title.
    pub title: String,
    /// Inner width in pixels.
    pub width: u32,
    /// Inner height in pixels.
    pub height: u32,
    /// Whether the user can resize the window.
    pub resizable: bool,
    /// Keep the window hidden until the first frame was presented.
    pub hide_until_first_render: bool,
    /// Whether the window starts fullscreen.
    pub fullscreen: bool,
}

impl Default for WindowingPlugin {
    fn default() -> Self {
        Self {
            title: "fae".to_string(),
            width: 1920,
            height: 1080,
            resizable: true,
            hide_until_first_render: true,
            fullscreen: false,
        }
    }
}

impl WindowingPlugin {
    fn descriptor(&self) -> WindowDescriptor {
        WindowDescriptor {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            resizable: self.resizable,
            visible: !self.hide_until_first_render,
            fullscreen: self.fullscreen,
        }
    }
}

impl Plugin for WindowingPlugin {
    fn init(&self, app: &mut Application) {
        if !app.resources.contains::<PlatformHandle>() {
            match WinitPlatform::new() {
                Ok(platform) => {
                    app.insert_resource(PlatformHandle::new(platform));
                }
                Err(error) => {
                    log::error!("could not create platform: {error}");
                    return;
                }
            }
        }

        app.add_system::<Update>(poll_platform)
            .add_system::<Update>(update_windows);

        let backend = match app
            .resources
            .use_resource::<PlatformHandle, _>(|platform| platform.create_window(&self.descriptor()))
        {
            Some(Ok(backend)) => backend,
            Some(Err(error)) => {
                log::error!("could not create window: {error}");
                return;
            }
            None => return,
        };

        let entity = app
            .world
            .create_entity()
            .set_component(Name::new(self.title.clone()))
            .set_component(Window::new(backend))
            .id();
        app.insert_resource(PrimaryWindow { entity });
        log::debug!("created primary window {entity}");

        if self.hide_until_first_render {
            app.add_system::<FirstRenderEnd>(show_primary_window);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::platform::HeadlessPlatform;
    use crate::platform::Platform;
    use crate::platform::PlatformError;
    use crate::RenderBackend;

    use super::*;

    struct NoWindows;

    impl Platform for NoWindows {
        fn create_window(
            &mut self,
            _descriptor: &WindowDescriptor,
        ) -> Result<Box<dyn WindowBackend>, PlatformError> {
            Err(PlatformError::WindowCreation("no display".to_string()))
        }

        fn poll_events(&mut self) -> Vec<PlatformEvent> {
            Vec::new()
        }

        fn create_render_backend(
            &mut self,
            _window: &dyn WindowBackend,
        ) -> Result<Box<dyn RenderBackend>, PlatformError> {
            Err(PlatformError::RendererCreation("no display".to_string()))
        }
    }

    #[derive(Default)]
    struct Resizes(Vec<WindowResized>);

    fn headless_app() -> (Application, HeadlessPlatform) {
        let platform = HeadlessPlatform::new();
        let mut app = Application::new();
        app.insert_resource(PlatformHandle::new(platform.clone()))
            .add_plugin(WindowingPlugin {
                title: "test".to_string(),
                ..WindowingPlugin::default()
            });
        app.scheduler.begin_run();
        (app, platform)
    }

    fn primary(app: &Application) -> Entity {
        app.resources.get::<PrimaryWindow>().unwrap().entity
    }

    #[test]
    fn init_creates_hidden_named_primary_window() {
        let (app, platform) = headless_app();

        let entity = primary(&app);

        assert_eq!(app.world.len(), 1);
        assert_eq!(app.world.get_component::<Name>(entity), Some(&Name::new("test")));
        let state = &platform.windows()[0];
        assert_eq!(state.title, "test");
        assert!(!state.visible);
    }

    #[test]
    fn add_plugin_twice_creates_one_window() {
        let (mut app, platform) = headless_app();

        app.add_plugin(WindowingPlugin::default());

        assert_eq!(platform.windows().len(), 1);
        assert_eq!(app.world.query::<&Window>().count(), 1);
    }

    #[test]
    fn update_close_requested_destroys_window_and_quits() {
        let (mut app, platform) = headless_app();
        let entity = primary(&app);
        platform.push_event(PlatformEvent::CloseRequested {
            window: WindowId(1),
        });

        app.invoke(Update);

        assert!(!app.world.is_alive(entity));
        assert!(!app.resources.contains::<PrimaryWindow>());
        assert!(app.scheduler.is_stop_requested());
        assert_eq!(platform.window(WindowId(1)).map(|state| state.open), Some(false));
    }

    #[test]
    fn update_close_called_by_system_destroys_window() {
        let (mut app, _platform) = headless_app();
        let entity = primary(&app);
        app.world
            .use_component::<Window, _>(entity, |window| window.close());

        app.invoke(Update);

        assert!(!app.world.is_alive(entity));
    }

    #[test]
    fn update_platform_quit_requests_stop() {
        let (mut app, platform) = headless_app();
        platform.push_event(PlatformEvent::Quit);

        app.invoke(Update);

        assert!(app.scheduler.is_stop_requested());
        assert!(app.world.is_alive(primary(&app)));
    }

    #[test]
    fn update_resized_fires_window_resized() {
        let (mut app, platform) = headless_app();
        app.add_system::<WindowResized>(|step| {
            let event = step.event;
            step.resources.get_or_emplace::<Resizes>().0.push(event);
        });
        platform.push_event(PlatformEvent::Resized {
            window: WindowId(1),
            width: 800,
            height: 600,
        });

        app.invoke(Update);

        let entity = primary(&app);
        assert_eq!(
            app.resources.get::<Resizes>().map(|resizes| resizes.0.clone()),
            Some(vec![WindowResized {
                entity,
                width: 800,
                height: 600
            }])
        );
        assert_eq!(
            app.world
                .get_component::<Window>(entity)
                .map(|window| window.size()),
            Some(UVec2::new(800, 600))
        );
    }

    #[test]
    fn update_without_events_keeps_running() {
        let (mut app, _platform) = headless_app();

        app.invoke(Update);

        assert!(!app.scheduler.is_stop_requested());
        assert_eq!(app.resources.get::<PlatformEvents>(), Some(&PlatformEvents::default()));
    }

    #[test]
    fn first_render_end_shows_primary_window() {
        let (mut app, platform) = headless_app();

        app.invoke(FirstRenderEnd);

        assert!(platform.windows()[0].visible);
    }

    #[test]
    fn init_window_creation_failure_leaves_application_usable() {
        let mut app = Application::new();
        app.insert_resource(PlatformHandle::new(NoWindows))
            .add_plugin(WindowingPlugin::default());

        app.invoke(Update);

        assert!(!app.resources.contains::<PrimaryWindow>());
        assert!(app.world.is_empty());
    }
}
