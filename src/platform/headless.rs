use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::IVec2;
use glam::UVec2;
use glam::Vec2;

use super::Platform;
use super::PlatformError;
use super::PlatformEvent;
use super::WindowDescriptor;
use super::WindowId;
use crate::NullRenderBackend;
use crate::RenderBackend;
use crate::WindowBackend;

/// State of a window created by [HeadlessPlatform].
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessWindowState {
    /// Window identifier.
    pub id: WindowId,
    /// Title.
    pub title: String,
    /// Inner size in pixels.
    pub size: UVec2,
    /// Desktop position.
    pub position: IVec2,
    /// Whether the window is shown.
    pub visible: bool,
    /// Whether the window is fullscreen.
    pub fullscreen: bool,
    /// Whether the window has focus.
    pub focused: bool,
    /// Last cursor position set by the application.
    pub cursor_position: Option<Vec2>,
    /// Whether the cursor is shown.
    pub cursor_visible: bool,
    /// Whether the window was asked to close.
    pub should_close: bool,
    /// Whether the window is still owned by the application.
    pub open: bool,
}

#[derive(Debug, Default)]
struct Shared {
    pending: VecDeque<PlatformEvent>,
    windows: Vec<Rc<RefCell<HeadlessWindowState>>>,
}

/// # Headless Platform
///
/// Platform without a display. Events are queued with [HeadlessPlatform::push_event] and returned
/// by the next poll. Clones share state, so a clone kept outside the application can script
/// events and inspect windows.
#[derive(Clone, Debug, Default)]
pub struct HeadlessPlatform {
    shared: Rc<RefCell<Shared>>,
}

impl HeadlessPlatform {
    /// Returns a platform without windows or pending events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event for the next poll.
    pub fn push_event(&self, event: PlatformEvent) {
        self.shared.borrow_mut().pending.push_back(event);
    }

    /// Returns the state of every window created so far, in creation order.
    pub fn windows(&self) -> Vec<HeadlessWindowState> {
        self.shared
            .borrow()
            .windows
            .iter()
            .map(|window| window.borrow().clone())
            .collect()
    }

    /// Returns the state of the window.
    pub fn window(&self, id: WindowId) -> Option<HeadlessWindowState> {
        self.windows().into_iter().find(|window| window.id == id)
    }
}

impl Platform for HeadlessPlatform {
    fn create_window(
        &mut self,
        descriptor: &WindowDescriptor,
    ) -> Result<Box<dyn WindowBackend>, PlatformError> {
        let mut shared = self.shared.borrow_mut();
        let state = Rc::new(RefCell::new(HeadlessWindowState {
            id: WindowId(shared.windows.len() as u64 + 1),
            title: descriptor.title.clone(),
            size: UVec2::new(descriptor.width, descriptor.height),
            position: IVec2::ZERO,
            visible: descriptor.visible,
            fullscreen: descriptor.fullscreen,
            focused: true,
            cursor_position: None,
            cursor_visible: true,
            should_close: false,
            open: true,
        }));
        shared.windows.push(state.clone());

        Ok(Box::new(HeadlessWindow { state }))
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut shared = self.shared.borrow_mut();
        let events: Vec<PlatformEvent> = shared.pending.drain(..).collect();

        for event in &events {
            if let PlatformEvent::Resized {
                window,
                width,
                height,
            } = *event
            {
                if let Some(state) = shared.windows.iter().find(|state| state.borrow().id == window) {
                    state.borrow_mut().size = UVec2::new(width, height);
                }
            }
        }

        events
    }

    fn create_render_backend(
        &mut self,
        _window: &dyn WindowBackend,
    ) -> Result<Box<dyn RenderBackend>, PlatformError> {
        Ok(Box::new(NullRenderBackend::default()))
    }
}

struct HeadlessWindow {
    state: Rc<RefCell<HeadlessWindowState>>,
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        self.state.borrow_mut().open = false;
    }
}

impl WindowBackend for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.state.borrow().id
    }

    fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.state.borrow_mut().title = title.to_string();
    }

    fn size(&self) -> UVec2 {
        self.state.borrow().size
    }

    fn set_size(&mut self, size: UVec2) {
        self.state.borrow_mut().size = size;
    }

    fn position(&self) -> Option<IVec2> {
        Some(self.state.borrow().position)
    }

    fn set_position(&mut self, position: IVec2) {
        self.state.borrow_mut().position = position;
    }

    fn show(&mut self) {
        self.state.borrow_mut().visible = true;
    }

    fn hide(&mut self) {
        self.state.borrow_mut().visible = false;
    }

    fn should_close(&self) -> bool {
        self.state.borrow().should_close
    }

    fn close(&mut self) {
        self.state.borrow_mut().should_close = true;
    }

    fn is_fullscreen(&self) -> bool {
        self.state.borrow().fullscreen
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.state.borrow_mut().fullscreen = fullscreen;
    }

    fn is_focused(&self) -> bool {
        self.state.borrow().focused
    }

    fn set_cursor_position(&mut self, position: Vec2) {
        self.state.borrow_mut().cursor_position = Some(position);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.state.borrow_mut().cursor_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_window_assigns_sequential_ids() {
        let mut platform = HeadlessPlatform::new();

        let first = platform.create_window(&WindowDescriptor::default()).unwrap();
        let second = platform.create_window(&WindowDescriptor::default()).unwrap();

        assert_eq!(first.id(), WindowId(1));
        assert_eq!(second.id(), WindowId(2));
    }

    #[test]
    fn clone_observes_window_changes() {
        let observer = HeadlessPlatform::new();
        let mut platform = observer.clone();
        let mut window = platform
            .create_window(&WindowDescriptor {
                visible: false,
                ..WindowDescriptor::default()
            })
            .unwrap();

        window.show();
        window.toggle_fullscreen();

        let state = observer.window(window.id()).unwrap();
        assert!(state.visible);
        assert!(state.fullscreen);
    }

    #[test]
    fn poll_events_drains_queue() {
        let mut platform = HeadlessPlatform::new();
        platform.push_event(PlatformEvent::Quit);

        assert_eq!(platform.poll_events(), vec![PlatformEvent::Quit]);
        assert!(platform.poll_events().is_empty());
    }

    #[test]
    fn poll_events_resized_updates_window_size() {
        let mut platform = HeadlessPlatform::new();
        let window = platform.create_window(&WindowDescriptor::default()).unwrap();
        platform.push_event(PlatformEvent::Resized {
            window: window.id(),
            width: 640,
            height: 480,
        });

        platform.poll_events();

        assert_eq!(window.size(), UVec2::new(640, 480));
    }

    #[test]
    fn drop_window_marks_closed() {
        let mut platform = HeadlessPlatform::new();
        let window = platform.create_window(&WindowDescriptor::default()).unwrap();
        let id = window.id();

        drop(window);

        assert_eq!(platform.window(id).map(|state| state.open), Some(false));
    }
}
