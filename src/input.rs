//! # Input
//!
//! Keyboard and mouse state built from the platform events polled each frame.

use std::collections::HashSet;

use glam::Vec2;

use crate::platform::PlatformEvent;
use crate::platform::PlatformEvents;
use crate::scheduler::Step;
use crate::scheduler::Update;
use crate::windowing::PrimaryWindow;
use crate::Application;
use crate::Plugin;
use crate::Window;

/// # Key
///
/// Physical keyboard key.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    Minus,
    Equals,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Apostrophe,
    Grave,
    Comma,
    Period,
    Slash,
    CapsLock,
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,
    Unknown,
}

/// # Mouse Button
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// # Input
///
/// Keyboard and mouse state. "Pressed" means held down; "just pressed" and "just released" only
/// hold for the frame in which the transition happened.
#[derive(Clone, Debug, Default)]
pub struct Input {
    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    keys_released: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
}

impl Input {
    /// Clears the per-frame transitions and mouse delta.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Applies a platform event. Events unrelated to input are ignored.
    pub fn apply(&mut self, event: &PlatformEvent) {
        match *event {
            PlatformEvent::KeyPressed(key) => {
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            PlatformEvent::KeyReleased(key) => {
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
            PlatformEvent::MouseButtonPressed(button) => {
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            PlatformEvent::MouseButtonReleased(button) => {
                if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }
            PlatformEvent::MouseMoved { x, y } => {
                self.mouse_position = Vec2::new(x, y);
            }
            PlatformEvent::MouseMotion { dx, dy } => {
                self.mouse_delta += Vec2::new(dx, dy);
            }
            PlatformEvent::Focused { focused: false, .. } => {
                self.keys_down.clear();
                self.buttons_down.clear();
            }
            _ => {}
        }
    }

    /// Returns true while the key is held.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key went down this frame.
    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key went up this frame.
    pub fn is_key_just_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    /// Returns true while the button is held.
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Returns true if the button went down this frame.
    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Returns true if the button went up this frame.
    pub fn is_mouse_button_just_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Returns the cursor position in window pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Returns the raw mouse motion accumulated this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    fn is_alt_pressed(&self) -> bool {
        self.is_key_pressed(Key::LeftAlt) || self.is_key_pressed(Key::RightAlt)
    }
}

/// Applies the platform events polled this frame to [Input].
pub fn update_input(step: &mut Step<'_, Update>) {
    let Some(input) = step.resources.get_mut::<Input>() else {
        return;
    };
    input.begin_frame();

    let Some(events) = step.resources.get::<PlatformEvents>().cloned() else {
        return;
    };
    step.resources.use_resource::<Input, _>(|input| {
        for event in &events.0 {
            input.apply(event);
        }
    });
}

/// Quits when escape is pressed.
pub fn quit_on_esc(step: &mut Step<'_, Update>) {
    let pressed = step
        .resources
        .read_resource::<Input, _>(|input| input.is_key_just_pressed(Key::Escape))
        .unwrap_or(false);

    if pressed {
        log::debug!("escape pressed, quitting");
        step.quit();
    }
}

/// Toggles fullscreen on the primary window when enter is pressed while alt is held.
pub fn toggle_fullscreen_on_alt_enter(step: &mut Step<'_, Update>) {
    let pressed = step
        .resources
        .read_resource::<Input, _>(|input| {
            input.is_alt_pressed() && input.is_key_just_pressed(Key::Enter)
        })
        .unwrap_or(false);
    if !pressed {
        return;
    }

    let Some(primary) = step.resources.get::<PrimaryWindow>().copied() else {
        return;
    };
    step.world
        .use_component::<Window, _>(primary.entity, |window| window.toggle_fullscreen());
}

/// # Input Plugin
#[derive(Clone, Debug)]
pub struct InputPlugin {
    /// Quit the application when escape is pressed.
    pub quit_on_escape: bool,
    /// Toggle fullscreen when alt+enter is pressed.
    pub alt_enter_fullscreen: bool,
}

impl Default for InputPlugin {
    fn default() -> Self {
        Self {
            quit_on_escape: true,
            alt_enter_fullscreen: true,
        }
    }
}

impl Plugin for InputPlugin {
    fn init(&self, app: &mut Application) {
        app.emplace_resource::<Input>()
            .add_system::<Update>(update_input);

        if self.quit_on_escape {
            app.add_system::<Update>(quit_on_esc);
        }
        if self.alt_enter_fullscreen {
            app.add_system::<Update>(toggle_fullscreen_on_alt_enter);
        }
    }
}
