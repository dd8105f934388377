use crate::Application;
use crate::InputPlugin;
use crate::LightingPlugin;
use crate::Plugin;
use crate::RenderingPlugin;
use crate::TimePlugin;
use crate::UiPlugin;
use crate::WindowingPlugin;

/// # Default Plugins
///
/// The plugins most applications need, added in field order. Configure a member by replacing its
/// field.
#[derive(Default)]
pub struct DefaultPlugins {
    /// Frame timing.
    pub time: TimePlugin,
    /// Primary window.
    pub windowing: WindowingPlugin,
    /// Keyboard and mouse.
    pub input: InputPlugin,
    /// Renderer.
    pub rendering: RenderingPlugin,
    /// Scene lights.
    pub lighting: LightingPlugin,
    /// UI phases.
    pub ui: UiPlugin,
}

impl Plugin for DefaultPlugins {
    fn init(&self, app: &mut Application) {
        app.add_plugin(self.time.clone())
            .add_plugin(self.windowing.clone())
            .add_plugin(self.input.clone())
            .add_plugin(self.rendering.clone())
            .add_plugin(self.lighting.clone())
            .add_plugin(self.ui.clone());
    }
}
