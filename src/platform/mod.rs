//! # Platform
//!
//! Boundary between the runtime and the operating system's windowing, input and graphics
//! facilities. [WinitPlatform] is the desktop implementation; [HeadlessPlatform] runs without a
//! display.

use std::ops::Deref;
use std::ops::DerefMut;

use thiserror::Error;

use crate::Key;
use crate::MouseButton;
use crate::RenderBackend;
use crate::WindowBackend;

pub use self::headless::HeadlessPlatform;
pub use self::headless::HeadlessWindowState;
pub use self::winit_platform::WinitPlatform;

mod headless;
mod winit_platform;

/// Identifier of a window assigned by the platform.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WindowId(pub u64);

/// # Window Descriptor
///
/// Parameters of a window to create.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowDescriptor {
    /// Window title.
    pub title: String,
    /// Inner width in pixels.
    pub width: u32,
    /// Inner height in pixels.
    pub height: u32,
    /// Whether the user can resize the window.
    pub resizable: bool,
    /// Whether the window is shown as soon as it is created.
    pub visible: bool,
    /// Whether the window starts fullscreen.
    pub fullscreen: bool,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 1920,
            height: 1080,
            resizable: true,
            visible: true,
            fullscreen: false,
        }
    }
}

/// # Platform Event
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PlatformEvent {
    /// The platform asked the application to exit.
    Quit,
    /// The user asked to close the window.
    CloseRequested {
        /// Window to close.
        window: WindowId,
    },
    /// The window's inner size changed.
    Resized {
        /// Resized window.
        window: WindowId,
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// The window gained or lost keyboard focus.
    Focused {
        /// Window whose focus changed.
        window: WindowId,
        /// Whether the window is now focused.
        focused: bool,
    },
    /// A key went down.
    KeyPressed(Key),
    /// A key went up.
    KeyReleased(Key),
    /// A mouse button went down.
    MouseButtonPressed(MouseButton),
    /// A mouse button went up.
    MouseButtonReleased(MouseButton),
    /// The cursor moved inside a window.
    MouseMoved {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Raw mouse motion, independent of the cursor.
    MouseMotion {
        /// Horizontal motion.
        dx: f32,
        /// Vertical motion.
        dy: f32,
    },
}

/// Events polled from the platform during the current frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformEvents(pub Vec<PlatformEvent>);

/// Errors raised by a [Platform].
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The event loop could not be created.
    #[error("event loop creation failed: {0}")]
    EventLoop(String),

    /// The window could not be created.
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// The renderer could not be created.
    #[error("renderer creation failed: {0}")]
    RendererCreation(String),
}

/// # Platform
///
/// Windowing, input and graphics facilities of the host system.
pub trait Platform {
    /// Creates a window.
    fn create_window(
        &mut self,
        descriptor: &WindowDescriptor,
    ) -> Result<Box<dyn WindowBackend>, PlatformError>;

    /// Returns the events received since the last call without blocking.
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// Creates a renderer drawing into the window.
    fn create_render_backend(
        &mut self,
        window: &dyn WindowBackend,
    ) -> Result<Box<dyn RenderBackend>, PlatformError>;
}

/// # Platform Handle
///
/// Resource holding the application's platform.
pub struct PlatformHandle {
    platform: Box<dyn Platform>,
}

impl PlatformHandle {
    /// Returns a handle owning the platform.
    pub fn new(platform: impl Platform + 'static) -> Self {
        Self {
            platform: Box::new(platform),
        }
    }
}

impl Deref for PlatformHandle {
    type Target = dyn Platform;

    fn deref(&self) -> &Self::Target {
        self.platform.as_ref()
    }
}

impl DerefMut for PlatformHandle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.platform.as_mut()
    }
}
