use glam::Vec3;

use crate::components::Visibility;
use crate::scheduler::RenderBegin;
use crate::scheduler::Step;
use crate::Application;
use crate::Color;
use crate::Component;
use crate::Plugin;

/// # Ambient Light
///
/// Light applied evenly to the whole scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AmbientLight {
    /// Light color.
    pub color: Color,
    /// Multiplier applied to the color.
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

impl Component for AmbientLight {}

/// # Directional Light
///
/// Light arriving from a single direction, like sunlight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in.
    pub direction: Vec3,
    /// Light color.
    pub color: Color,
    /// Multiplier applied to the color.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::NEG_Y,
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

impl Component for DirectionalLight {}

/// Directional light prepared for rendering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneDirectionalLight {
    /// Normalized direction.
    pub direction: Vec3,
    /// Linear color scaled by intensity.
    pub radiance: Vec3,
}

/// # Scene Lights
///
/// Visible lights of the current frame, gathered during [RenderBegin].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneLights {
    /// Sum of all ambient lights.
    pub ambient: Vec3,
    /// Directional lights in entity creation order.
    pub directional: Vec<SceneDirectionalLight>,
}

fn radiance(color: Color, intensity: f32) -> Vec3 {
    color.to_vec4().truncate() * intensity
}

fn is_visible(visibility: Option<&Visibility>) -> bool {
    visibility != Some(&Visibility::Hidden)
}

/// Collects visible lights into [SceneLights].
pub fn gather_lights(step: &mut Step<'_, RenderBegin>) {
    let mut lights = SceneLights::default();

    for (_, (light, visibility)) in step
        .world
        .query::<(&AmbientLight, Option<&Visibility>)>()
    {
        if is_visible(visibility) {
            lights.ambient += radiance(light.color, light.intensity);
        }
    }

    for (entity, (light, visibility)) in step
        .world
        .query::<(&DirectionalLight, Option<&Visibility>)>()
    {
        if !is_visible(visibility) {
            continue;
        }

        let direction = light.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            log::warn!("directional light {entity} has no direction");
            continue;
        }

        lights.directional.push(SceneDirectionalLight {
            direction,
            radiance: radiance(light.color, light.intensity),
        });
    }

    step.resources.insert(lights);
}

/// # Lighting Plugin
#[derive(Clone, Debug, Default)]
pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn init(&self, app: &mut Application) {
        app.emplace_resource::<SceneLights>()
            .add_system::<RenderBegin>(gather_lights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gathered(app: &mut Application) -> SceneLights {
        app.invoke(RenderBegin);
        app.resources.get::<SceneLights>().cloned().unwrap()
    }

    #[test]
    fn gather_sums_ambient_lights() {
        let mut app = Application::new();
        app.add_plugin(LightingPlugin);
        app.world.create_entity().set_component(AmbientLight {
            color: Color::RED,
            intensity: 0.5,
        });
        app.world.create_entity().set_component(AmbientLight {
            color: Color::BLUE,
            intensity: 1.0,
        });

        let lights = gathered(&mut app);

        assert_eq!(lights.ambient, Vec3::new(0.5, 0.0, 1.0));
    }

    #[test]
    fn gather_skips_hidden_lights() {
        let mut app = Application::new();
        app.add_plugin(LightingPlugin);
        app.world
            .create_entity()
            .set_component(AmbientLight::default())
            .set_component(Visibility::Hidden);
        app.world
            .create_entity()
            .set_component(DirectionalLight::default())
            .set_component(Visibility::Hidden);

        let lights = gathered(&mut app);

        assert_eq!(lights, SceneLights::default());
    }

    #[test]
    fn gather_normalizes_directions_in_creation_order() {
        let mut app = Application::new();
        app.add_plugin(LightingPlugin);
        app.world.create_entity().set_component(DirectionalLight {
            direction: Vec3::new(0.0, -4.0, 0.0),
            ..DirectionalLight::default()
        });
        app.world.create_entity().set_component(DirectionalLight {
            direction: Vec3::new(3.0, 0.0, 0.0),
            color: Color::GREEN,
            intensity: 2.0,
        });

        let lights = gathered(&mut app);

        assert_eq!(
            lights.directional,
            vec![
                SceneDirectionalLight {
                    direction: Vec3::NEG_Y,
                    radiance: Vec3::ONE,
                },
                SceneDirectionalLight {
                    direction: Vec3::X,
                    radiance: Vec3::new(0.0, 2.0, 0.0),
                },
            ]
        );
    }

    #[test]
    fn gather_skips_zero_direction() {
        let mut app = Application::new();
        app.add_plugin(LightingPlugin);
        app.world.create_entity().set_component(DirectionalLight {
            direction: Vec3::ZERO,
            ..DirectionalLight::default()
        });

        assert!(gathered(&mut app).directional.is_empty());
    }

    #[test]
    fn gather_after_destroy_drops_light() {
        let mut app = Application::new();
        app.add_plugin(LightingPlugin);
        let light = app
            .world
            .create_entity()
            .set_component(AmbientLight::default())
            .id();
        gathered(&mut app);

        app.world.destroy(light);

        assert_eq!(gathered(&mut app).ambient, Vec3::ZERO);
    }
}
