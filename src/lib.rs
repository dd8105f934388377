#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

//! # Fae
//!
//! ![MIT](https://img.shields.io/badge/license-MIT-blue.svg)
//!
//! ## What is Fae?
//!
//! Fae is a plugin driven runtime for interactive applications. An [Application] owns:
//! - [Resources], singleton values keyed by type
//! - a [World] of entities and their components, iterated with typed queries
//! - a [Scheduler] running systems for each step of the frame
//! - an [Assets] loader
//!
//! Plugins configure the application once; systems then run every frame in a fixed phase order:
//! `Update`, `RenderBegin`, `Render`, `UiBegin`, `UiRender`, `UiEnd`, `RenderEnd`.
//!
//! ```no_run
//! use fae::scheduler::Update;
//! use fae::Application;
//! use fae::DefaultPlugins;
//!
//! Application::new()
//!     .add_plugin(DefaultPlugins::default())
//!     .add_system::<Update>(|step| {
//!         let entities = step.world.len();
//!         log::trace!("{entities} entities");
//!     })
//!     .run();
//! ```

pub use crate::app::Application;
pub use crate::app::Plugin;
pub use crate::assets::Asset;
pub use crate::assets::AssetError;
pub use crate::assets::Assets;
pub use crate::color::Color;
pub use crate::color::Hsva;
pub use crate::components::Name;
pub use crate::components::Transform;
pub use crate::components::Visibility;
pub use crate::default_plugins::DefaultPlugins;
pub use crate::editor::EditorPlugin;
pub use crate::editor::EditorRender;
pub use crate::editor::EditorState;
pub use crate::editor::OutlineRow;
pub use crate::editor::SceneOutline;
pub use crate::input::Input;
pub use crate::input::InputPlugin;
pub use crate::input::Key;
pub use crate::input::MouseButton;
pub use crate::lighting::AmbientLight;
pub use crate::lighting::DirectionalLight;
pub use crate::lighting::LightingPlugin;
pub use crate::lighting::SceneDirectionalLight;
pub use crate::lighting::SceneLights;
pub use crate::logging::init_logging;
pub use crate::logging::LoggingConfig;
pub use crate::rendering::NullRenderBackend;
pub use crate::rendering::RenderBackend;
pub use crate::rendering::Renderer;
pub use crate::rendering::RenderingPlugin;
pub use crate::rendering::RenderingState;
pub use crate::resources::Resources;
pub use crate::scheduler::Scheduler;
pub use crate::scheduler::SchedulerState;
pub use crate::scheduler::Step;
pub use crate::time::Time;
pub use crate::time::TimeClock;
pub use crate::time::TimePlugin;
pub use crate::ui::UiPlugin;
pub use crate::ui::UiSettings;
pub use crate::ui::UiToggleKey;
pub use crate::windowing::PrimaryWindow;
pub use crate::windowing::Window;
pub use crate::windowing::WindowBackend;
pub use crate::windowing::WindowResized;
pub use crate::windowing::WindowingPlugin;
pub use crate::world::Component;
pub use crate::world::Entity;
pub use crate::world::EntityCommands;
pub use crate::world::World;

mod app;
mod assets;
mod color;
mod components;
mod default_plugins;
mod editor;
pub mod input;
mod lighting;
mod logging;
pub mod platform;
pub mod query;
pub mod rendering;
mod resources;
pub mod scheduler;
pub mod time;
mod ui;
pub mod windowing;
mod world;
