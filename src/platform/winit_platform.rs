use std::time::Duration;

use glam::IVec2;
use glam::UVec2;
use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::dpi::PhysicalSize;
use winit::event::DeviceEvent;
use winit::event::ElementState;
use winit::event::Event;
use winit::event::KeyEvent;
use winit::event::WindowEvent;
use winit::event_loop::EventLoop;
use winit::keyboard::KeyCode;
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::platform::pump_events::PumpStatus;
use winit::window::Fullscreen;
use winit::window::WindowBuilder;

use super::Platform;
use super::PlatformError;
use super::PlatformEvent;
use super::WindowDescriptor;
use super::WindowId;
use crate::Key;
use crate::MouseButton;
use crate::NullRenderBackend;
use crate::RenderBackend;
use crate::WindowBackend;

/// # Winit Platform
///
/// Desktop platform backed by a winit event loop. The loop is pumped without blocking each time
/// events are polled.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
}

impl WinitPlatform {
    /// Creates the event loop. Must be called on the main thread.
    pub fn new() -> Result<Self, PlatformError> {
        let event_loop =
            EventLoop::new().map_err(|error| PlatformError::EventLoop(error.to_string()))?;

        Ok(Self { event_loop })
    }
}

impl Platform for WinitPlatform {
    fn create_window(
        &mut self,
        descriptor: &WindowDescriptor,
    ) -> Result<Box<dyn WindowBackend>, PlatformError> {
        let window = WindowBuilder::new()
            .with_title(descriptor.title.as_str())
            .with_inner_size(PhysicalSize::new(descriptor.width, descriptor.height))
            .with_resizable(descriptor.resizable)
            .with_visible(descriptor.visible)
            .with_fullscreen(
                descriptor
                    .fullscreen
                    .then_some(Fullscreen::Borderless(None)),
            )
            .build(&self.event_loop)
            .map_err(|error| PlatformError::WindowCreation(error.to_string()))?;

        Ok(Box::new(WinitWindow {
            window,
            title: descriptor.title.clone(),
            should_close: false,
        }))
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = Vec::new();

        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _| {
                if let Some(event) = translate_event(event) {
                    events.push(event);
                }
            });

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            events.push(PlatformEvent::Quit);
        }

        events
    }

    fn create_render_backend(
        &mut self,
        window: &dyn WindowBackend,
    ) -> Result<Box<dyn RenderBackend>, PlatformError> {
        log::debug!("no GPU backend attached to window {:?}, frames are not drawn", window.id());
        Ok(Box::new(NullRenderBackend::default()))
    }
}

struct WinitWindow {
    window: winit::window::Window,
    title: String,
    should_close: bool,
}

impl WindowBackend for WinitWindow {
    fn id(&self) -> WindowId {
        WindowId(u64::from(self.window.id()))
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
        self.title = title.to_string();
    }

    fn size(&self) -> UVec2 {
        let size = self.window.inner_size();
        UVec2::new(size.width, size.height)
    }

    fn set_size(&mut self, size: UVec2) {
        let _ = self
            .window
            .request_inner_size(PhysicalSize::new(size.x, size.y));
    }

    fn position(&self) -> Option<IVec2> {
        self.window
            .outer_position()
            .ok()
            .map(|position| IVec2::new(position.x, position.y))
    }

    fn set_position(&mut self, position: IVec2) {
        self.window
            .set_outer_position(PhysicalPosition::new(position.x, position.y));
    }

    fn show(&mut self) {
        self.window.set_visible(true);
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn close(&mut self) {
        self.should_close = true;
    }

    fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.window
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
    }

    fn is_focused(&self) -> bool {
        self.window.has_focus()
    }

    fn set_cursor_position(&mut self, position: Vec2) {
        let position = PhysicalPosition::new(f64::from(position.x), f64::from(position.y));
        if let Err(error) = self.window.set_cursor_position(position) {
            log::warn!("could not move cursor: {error}");
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }
}

fn translate_event(event: Event<()>) -> Option<PlatformEvent> {
    match event {
        Event::WindowEvent { window_id, event } => {
            let window = WindowId(u64::from(window_id));
            match event {
                WindowEvent::CloseRequested => Some(PlatformEvent::CloseRequested { window }),
                WindowEvent::Resized(size) => Some(PlatformEvent::Resized {
                    window,
                    width: size.width,
                    height: size.height,
                }),
                WindowEvent::Focused(focused) => Some(PlatformEvent::Focused { window, focused }),
                WindowEvent::KeyboardInput {
                    event: KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                    ..
                } => {
                    let key = translate_key(physical_key);
                    Some(match state {
                        ElementState::Pressed => PlatformEvent::KeyPressed(key),
                        ElementState::Released => PlatformEvent::KeyReleased(key),
                    })
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let button = translate_mouse_button(button);
                    Some(match state {
                        ElementState::Pressed => PlatformEvent::MouseButtonPressed(button),
                        ElementState::Released => PlatformEvent::MouseButtonReleased(button),
                    })
                }
                WindowEvent::CursorMoved { position, .. } => Some(PlatformEvent::MouseMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                }),
                _ => None,
            }
        }
        Event::DeviceEvent {
            event: DeviceEvent::MouseMotion { delta: (dx, dy) },
            ..
        } => Some(PlatformEvent::MouseMotion {
            dx: dx as f32,
            dy: dy as f32,
        }),
        _ => None,
    }
}

fn translate_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Back,
        winit::event::MouseButton::Forward => MouseButton::Forward,
        winit::event::MouseButton::Other(code) => MouseButton::Other(code),
    }
}

fn translate_key(key: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = key else {
        return Key::Unknown;
    };

    match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Num0,
        KeyCode::Digit1 => Key::Num1,
        KeyCode::Digit2 => Key::Num2,
        KeyCode::Digit3 => Key::Num3,
        KeyCode::Digit4 => Key::Num4,
        KeyCode::Digit5 => Key::Num5,
        KeyCode::Digit6 => Key::Num6,
        KeyCode::Digit7 => Key::Num7,
        KeyCode::Digit8 => Key::Num8,
        KeyCode::Digit9 => Key::Num9,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equals,
        KeyCode::BracketLeft => Key::LeftBracket,
        KeyCode::BracketRight => Key::RightBracket,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Quote => Key::Apostrophe,
        KeyCode::Backquote => Key::Grave,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::ControlLeft => Key::LeftCtrl,
        KeyCode::ControlRight => Key::RightCtrl,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::SuperLeft => Key::LeftSuper,
        KeyCode::SuperRight => Key::RightSuper,
        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::NativeKeyCode;

    use super::*;

    #[test]
    fn translate_key_letter_returns_key() {
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Q);
    }

    #[test]
    fn translate_key_numpad_enter_returns_enter() {
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::NumpadEnter)), Key::Enter);
    }

    #[test]
    fn translate_key_unidentified_returns_unknown() {
        let key = PhysicalKey::Unidentified(NativeKeyCode::Unidentified);

        assert_eq!(translate_key(key), Key::Unknown);
    }

    #[test]
    fn translate_mouse_button_other_keeps_code() {
        assert_eq!(
            translate_mouse_button(winit::event::MouseButton::Other(7)),
            MouseButton::Other(7)
        );
    }
}
