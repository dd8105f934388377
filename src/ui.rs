use crate::scheduler::Step;
use crate::scheduler::Update;
use crate::Application;
use crate::Input;
use crate::Key;
use crate::Plugin;

/// # UI Settings
///
/// While `hide_ui` is set the UI phases are skipped.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UiSettings {
    /// Skip the UI phases.
    pub hide_ui: bool,
}

/// Key that toggles [UiSettings::hide_ui].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UiToggleKey(pub Key);

/// Toggles the UI when the [UiToggleKey] is pressed.
pub fn toggle_ui(step: &mut Step<'_, Update>) {
    let Some(UiToggleKey(key)) = step.resources.get::<UiToggleKey>().copied() else {
        return;
    };
    let pressed = step
        .resources
        .read_resource::<Input, _>(|input| input.is_key_just_pressed(key))
        .unwrap_or(false);

    if pressed {
        let settings = step.resources.get_or_emplace::<UiSettings>();
        settings.hide_ui = !settings.hide_ui;
    }
}

/// # UI Plugin
#[derive(Clone, Debug, Default)]
pub struct UiPlugin {
    /// Start with the UI hidden.
    pub hide_ui: bool,
    /// Key that shows and hides the UI.
    pub toggle_key: Option<Key>,
}

impl Plugin for UiPlugin {
    fn init(&self, app: &mut Application) {
        app.insert_resource(UiSettings {
            hide_ui: self.hide_ui,
        });

        if let Some(key) = self.toggle_key {
            app.insert_resource(UiToggleKey(key))
                .add_system::<Update>(toggle_ui);
        }
    }
}
