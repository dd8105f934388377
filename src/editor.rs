use crate::components::Name;
use crate::scheduler::Event;
use crate::scheduler::Step;
use crate::scheduler::UiRender;
use crate::Application;
use crate::Entity;
use crate::Input;
use crate::Key;
use crate::Plugin;
use crate::UiSettings;

/// Fired from [UiRender] while the editor is active.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EditorRender;

impl Event for EditorRender {}

/// # Editor State
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EditorState {
    /// Currently selected entity.
    pub selected: Option<Entity>,
}

impl EditorState {
    /// Selects the entity.
    pub fn select(&mut self, entity: Entity) {
        self.selected = Some(entity);
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

/// One line of the [SceneOutline].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutlineRow {
    /// Listed entity.
    pub entity: Entity,
    /// Name followed by the entity id.
    pub label: String,
    /// Whether the entity is selected.
    pub selected: bool,
}

/// # Scene Outline
///
/// Every live entity in creation order, rebuilt each [EditorRender].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SceneOutline {
    /// Outline rows.
    pub rows: Vec<OutlineRow>,
}

/// Invokes [EditorRender].
pub fn render_editor(step: &mut Step<'_, UiRender>) {
    step.invoke(EditorRender);
}

/// Destroys the selected entity when delete is pressed.
pub fn delete_selected(step: &mut Step<'_, EditorRender>) {
    let pressed = step
        .resources
        .read_resource::<Input, _>(|input| input.is_key_just_pressed(Key::Delete))
        .unwrap_or(false);
    if !pressed {
        return;
    }

    let Some(selected) = step
        .resources
        .use_resource::<EditorState, _>(|editor| editor.selected.take())
        .flatten()
    else {
        return;
    };

    if step.world.destroy(selected) {
        log::debug!("deleted entity {selected}");
    }
}

/// Clears the selection once the selected entity no longer exists.
pub fn prune_selection(step: &mut Step<'_, EditorRender>) {
    let world = &*step.world;
    step.resources.use_resource::<EditorState, _>(|editor| {
        if editor.selected.is_some_and(|entity| !world.is_alive(entity)) {
            editor.clear_selection();
        }
    });
}

/// Rebuilds the [SceneOutline].
pub fn build_outline(step: &mut Step<'_, EditorRender>) {
    let selected = step
        .resources
        .get::<EditorState>()
        .and_then(|editor| editor.selected);

    let rows = step
        .world
        .entities()
        .map(|entity| {
            let name = step
                .world
                .get_component::<Name>(entity)
                .map_or_else(|| entity.to_string(), |name| name.value.clone());

            OutlineRow {
                entity,
                label: format!("{name} ({entity})"),
                selected: selected == Some(entity),
            }
        })
        .collect();

    step.resources.insert(SceneOutline { rows });
}

/// # Editor Plugin
///
/// Scene outline and entity selection drawn during the UI phases.
#[derive(Clone, Debug, Default)]
pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn init(&self, app: &mut Application) {
        app.resources.get_or_emplace::<UiSettings>();
        app.emplace_resource::<EditorState>()
            .emplace_resource::<SceneOutline>()
            .add_system::<UiRender>(render_editor)
            .add_system::<EditorRender>(delete_selected)
            .add_system::<EditorRender>(prune_selection)
            .add_system::<EditorRender>(build_outline);
    }
}

#[cfg(test)]
mod tests {
    use crate::platform::PlatformEvent;
    use crate::UiPlugin;
    use crate::UiToggleKey;

    use super::*;

    fn editor_app() -> Application {
        let mut app = Application::new();
        app.add_plugin(EditorPlugin).emplace_resource::<Input>();
        app
    }

    fn press(app: &mut Application, key: Key) {
        app.resources
            .use_resource::<Input, _>(|input| input.apply(&PlatformEvent::KeyPressed(key)));
    }

    fn select(app: &mut Application, entity: Entity) {
        app.resources
            .use_resource::<EditorState, _>(|editor| editor.select(entity));
    }

    #[test]
    fn delete_pressed_destroys_selected_entity() {
        let mut app = editor_app();
        let entity = app.world.spawn();
        select(&mut app, entity);
        press(&mut app, Key::Delete);

        app.invoke(UiRender);

        assert!(!app.world.is_alive(entity));
        assert_eq!(app.resources.get::<EditorState>().unwrap().selected, None);
    }

    #[test]
    fn delete_pressed_without_selection_keeps_entities() {
        let mut app = editor_app();
        let entity = app.world.spawn();
        press(&mut app, Key::Delete);

        app.invoke(UiRender);

        assert!(app.world.is_alive(entity));
    }

    #[test]
    fn delete_not_pressed_keeps_selected_entity() {
        let mut app = editor_app();
        let entity = app.world.spawn();
        select(&mut app, entity);

        app.invoke(UiRender);

        assert!(app.world.is_alive(entity));
        assert_eq!(app.resources.get::<EditorState>().unwrap().selected, Some(entity));
    }

    #[test]
    fn render_destroyed_selection_is_cleared() {
        let mut app = editor_app();
        let entity = app.world.spawn();
        select(&mut app, entity);
        app.world.destroy(entity);

        app.invoke(UiRender);

        assert_eq!(app.resources.get::<EditorState>().unwrap().selected, None);
    }

    #[test]
    fn render_outline_lists_entities_with_names() {
        let mut app = editor_app();
        let camera = app
            .world
            .create_entity()
            .set_component(Name::new("camera"))
            .id();
        let unnamed = app.world.spawn();
        select(&mut app, unnamed);

        app.invoke(UiRender);

        assert_eq!(
            app.resources.get::<SceneOutline>().unwrap().rows,
            vec![
                OutlineRow {
                    entity: camera,
                    label: format!("camera ({camera})"),
                    selected: false,
                },
                OutlineRow {
                    entity: unnamed,
                    label: format!("{unnamed} ({unnamed})"),
                    selected: true,
                },
            ]
        );
    }

    #[test]
    fn init_before_ui_plugin_keeps_ui_config() {
        let mut app = Application::new();

        app.add_plugin(EditorPlugin).add_plugin(UiPlugin {
            hide_ui: true,
            toggle_key: Some(Key::F1),
        });

        assert_eq!(app.resources.get::<UiSettings>(), Some(&UiSettings { hide_ui: true }));
        assert!(app.resources.contains::<UiToggleKey>());
    }

    #[test]
    fn init_after_ui_plugin_keeps_ui_settings() {
        let mut app = Application::new();

        app.add_plugin(UiPlugin {
            hide_ui: true,
            toggle_key: None,
        })
        .add_plugin(EditorPlugin);

        assert_eq!(app.resources.get::<UiSettings>(), Some(&UiSettings { hide_ui: true }));
    }

    #[test]
    fn tick_hidden_ui_skips_editor() {
        let mut app = editor_app();
        let entity = app.world.spawn();
        select(&mut app, entity);
        press(&mut app, Key::Delete);
        app.insert_resource(UiSettings { hide_ui: true });

        app.tick();

        assert!(app.world.is_alive(entity));
    }
}
