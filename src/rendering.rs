//! # Rendering
//!
//! Frame begin, clear and present around the render phases.

use std::ops::Deref;
use std::ops::DerefMut;

use crate::platform::PlatformHandle;
use crate::scheduler::Deinit;
use crate::scheduler::FirstRenderEnd;
use crate::scheduler::RenderBegin;
use crate::scheduler::RenderEnd;
use crate::scheduler::Step;
use crate::windowing::PrimaryWindow;
use crate::Application;
use crate::Color;
use crate::Plugin;
use crate::Window;
use crate::WindowingPlugin;

/// # Render Backend
///
/// Frame operations of a graphics backend.
pub trait RenderBackend {
    /// Returns the color the frame is cleared to.
    fn clear_color(&self) -> Color;

    /// Sets the color the frame is cleared to.
    fn set_clear_color(&mut self, color: Color);

    /// Starts a frame.
    fn begin(&mut self);

    /// Clears the frame to the clear color.
    fn clear(&mut self);

    /// Finishes and presents the frame.
    fn end(&mut self);
}

/// Render backend that keeps frame state without drawing anything.
#[derive(Clone, Debug, Default)]
pub struct NullRenderBackend {
    clear_color: Color,
    in_frame: bool,
    presented: u64,
}

impl NullRenderBackend {
    /// Returns the number of frames ended.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl RenderBackend for NullRenderBackend {
    fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn begin(&mut self) {
        self.in_frame = true;
    }

    fn clear(&mut self) {}

    fn end(&mut self) {
        if self.in_frame {
            self.presented += 1;
        }
        self.in_frame = false;
    }
}

/// # Renderer
///
/// Resource owning the application's render backend.
pub struct Renderer {
    backend: Box<dyn RenderBackend>,
}

impl Renderer {
    /// Returns a renderer owning the backend.
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self { backend }
    }
}

impl Deref for Renderer {
    type Target = dyn RenderBackend;

    fn deref(&self) -> &Self::Target {
        self.backend.as_ref()
    }
}

impl DerefMut for Renderer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.backend.as_mut()
    }
}

/// # Rendering State
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderingState {
    /// Number of frames presented.
    pub frames: u64,
}

/// Starts and clears the frame.
pub fn begin_frame(step: &mut Step<'_, RenderBegin>) {
    step.resources.use_resource::<Renderer, _>(|renderer| {
        renderer.begin();
        renderer.clear();
    });
}

/// Presents the frame. Invokes [FirstRenderEnd] after the first one.
pub fn end_frame(step: &mut Step<'_, RenderEnd>) {
    if step
        .resources
        .use_resource::<Renderer, _>(|renderer| renderer.end())
        .is_none()
    {
        return;
    }

    let state = step.resources.get_or_emplace::<RenderingState>();
    state.frames += 1;

    if state.frames == 1 {
        step.invoke(FirstRenderEnd);
    }
}

/// Releases the renderer.
pub fn deinit_rendering(step: &mut Step<'_, Deinit>) {
    step.resources.erase::<Renderer>();
    log::debug!("renderer released");
}

/// # Rendering Plugin
///
/// Creates a renderer for the primary window.
#[derive(Clone, Debug)]
pub struct RenderingPlugin {
    /// Initial clear color.
    pub clear_color: Color,
}

impl Default for RenderingPlugin {
    fn default() -> Self {
        Self {
            clear_color: Color::CORNFLOWER_BLUE,
        }
    }
}

impl Plugin for RenderingPlugin {
    fn init(&self, app: &mut Application) {
        if !app.has_plugin::<WindowingPlugin>() {
            app.add_plugin(WindowingPlugin::default());
        }

        let Some(primary) = app.resources.get::<PrimaryWindow>().copied() else {
            log::error!("no primary window found");
            return;
        };
        let Some(window) = app.world.get_component::<Window>(primary.entity) else {
            log::error!("primary window {} has no window component", primary.entity);
            return;
        };
        let Some(platform) = app.resources.get_mut::<PlatformHandle>() else {
            log::error!("no platform found");
            return;
        };

        let mut backend = match platform.create_render_backend(&**window) {
            Ok(backend) => backend,
            Err(error) => {
                log::error!("could not create renderer: {error}");
                return;
            }
        };
        backend.set_clear_color(self.clear_color);

        app.insert_resource(Renderer::new(backend))
            .emplace_resource::<RenderingState>()
            .add_system::<RenderBegin>(begin_frame)
            .add_system::<RenderEnd>(end_frame)
            .add_system::<Deinit>(deinit_rendering);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::platform::HeadlessPlatform;
    use crate::scheduler::Render;

    use super::*;

    #[derive(Clone, Default)]
    struct Calls(Rc<RefCell<Vec<&'static str>>>);

    struct RecordingBackend {
        calls: Calls,
        clear_color: Color,
    }

    impl RenderBackend for RecordingBackend {
        fn clear_color(&self) -> Color {
            self.clear_color
        }

        fn set_clear_color(&mut self, color: Color) {
            self.clear_color = color;
        }

        fn begin(&mut self) {
            self.calls.0.borrow_mut().push("begin");
        }

        fn clear(&mut self) {
            self.calls.0.borrow_mut().push("clear");
        }

        fn end(&mut self) {
            self.calls.0.borrow_mut().push("end");
        }
    }

    #[derive(Default)]
    struct FirstRenders(u32);

    fn recording_app() -> (Application, Calls) {
        let calls = Calls::default();
        let mut app = Application::new();
        app.insert_resource(Renderer::new(Box::new(RecordingBackend {
            calls: calls.clone(),
            clear_color: Color::BLACK,
        })))
        .add_system::<RenderBegin>(begin_frame)
        .add_system::<Render>(|step| {
            if let Some(calls) = step.resources.get::<Calls>() {
                calls.0.borrow_mut().push("render");
            }
        })
        .add_system::<RenderEnd>(end_frame)
        .add_system::<FirstRenderEnd>(|step| step.resources.get_or_emplace::<FirstRenders>().0 += 1);
        app.insert_resource(calls.clone());
        (app, calls)
    }

    #[test]
    fn tick_brackets_render_with_begin_clear_end() {
        let (mut app, calls) = recording_app();

        app.tick();

        assert_eq!(*calls.0.borrow(), vec!["begin", "clear", "render", "end"]);
    }

    #[test]
    fn tick_fires_first_render_end_once() {
        let (mut app, _calls) = recording_app();

        app.tick();
        app.tick();
        app.tick();

        assert_eq!(app.resources.get::<FirstRenders>().map(|renders| renders.0), Some(1));
        assert_eq!(
            app.resources.get::<RenderingState>(),
            Some(&RenderingState { frames: 3 })
        );
    }

    #[test]
    fn end_frame_without_renderer_does_nothing() {
        let mut app = Application::new();
        app.add_system::<RenderEnd>(end_frame);

        app.invoke(RenderEnd);

        assert!(!app.resources.contains::<RenderingState>());
    }

    #[test]
    fn deinit_erases_renderer() {
        let (mut app, _calls) = recording_app();
        app.add_system::<Deinit>(deinit_rendering);

        app.invoke(Deinit);

        assert!(!app.resources.contains::<Renderer>());
    }

    #[test]
    fn plugin_sets_clear_color_and_adds_window() {
        let mut app = Application::new();
        app.insert_resource(PlatformHandle::new(HeadlessPlatform::new()))
            .add_plugin(RenderingPlugin {
                clear_color: Color::RED,
            });

        assert!(app.resources.contains::<PrimaryWindow>());
        assert_eq!(
            app.resources
                .get::<Renderer>()
                .map(|renderer| renderer.clear_color()),
            Some(Color::RED)
        );
    }

    #[test]
    fn plugin_without_primary_window_skips_renderer() {
        let mut app = Application::new();
        app.insert_resource(PlatformHandle::new(HeadlessPlatform::new()))
            .add_plugin(WindowingPlugin::default());
        app.resources.erase::<PrimaryWindow>();

        app.add_plugin(RenderingPlugin::default());

        assert!(!app.resources.contains::<Renderer>());
        assert_eq!(app.scheduler.system_count::<RenderEnd>(), 0);
    }

    #[test]
    fn null_backend_counts_presented_frames() {
        let mut backend = NullRenderBackend::default();

        backend.begin();
        backend.end();
        backend.end();

        assert_eq!(backend.presented(), 1);
    }
}
