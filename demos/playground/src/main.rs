use fae::scheduler::Start;
use fae::scheduler::Step;
use fae::scheduler::Update;
use fae::AmbientLight;
use fae::Application;
use fae::Color;
use fae::Component;
use fae::DefaultPlugins;
use fae::DirectionalLight;
use fae::EditorPlugin;
use fae::EditorState;
use fae::LoggingConfig;
use fae::Name;
use fae::Renderer;
use fae::Time;
use fae::Transform;
use fae::Visibility;
use fae::WindowingPlugin;
use glam::Vec3;

/// Rotates the entity around its axis.
struct Spin {
    axis: Vec3,
    degrees_per_second: f32,
}

impl Component for Spin {}

fn spawn_scene(step: &mut Step<'_, Start>) {
    step.world
        .create_entity()
        .set_component(Name::new("ambient"))
        .set_component(AmbientLight {
            color: Color::WHITE,
            intensity: 0.1,
        });

    step.world
        .create_entity()
        .set_component(Name::new("sun"))
        .set_component(DirectionalLight {
            direction: Vec3::new(-1.0, -1.0, -0.5),
            ..DirectionalLight::default()
        });

    let cube = step
        .world
        .create_entity()
        .set_component(Name::new("cube"))
        .set_component(Visibility::Visible)
        .set_component(Transform::from_position(Vec3::new(0.0, 0.0, -5.0)))
        .set_component(Spin {
            axis: Vec3::Y,
            degrees_per_second: 45.0,
        })
        .id();

    step.resources
        .use_resource::<EditorState, _>(|editor| editor.select(cube));
    log::info!("spawned {} entities", step.world.len());
}

fn spin(step: &mut Step<'_, Update>) {
    let Some(delta) = step.resources.get::<Time>().map(|time| time.delta().as_secs_f32()) else {
        return;
    };

    for (_, (transform, spin)) in step.world.query::<(&mut Transform, &Spin)>() {
        transform.rotate_axis(spin.axis, spin.degrees_per_second.to_radians() * delta);
    }
}

fn cycle_clear_color(step: &mut Step<'_, Update>) {
    let Some(elapsed) = step.resources.get::<Time>().map(|time| time.elapsed().as_secs_f32()) else {
        return;
    };

    let mut color = Color::CORNFLOWER_BLUE.to_hsva();
    color.h += elapsed * 10.0;
    step.resources
        .use_resource::<Renderer, _>(|renderer| renderer.set_clear_color(Color::from(color)));
}

fn main() {
    fae::init_logging(LoggingConfig::default());

    Application::new()
        .add_plugin(DefaultPlugins {
            windowing: WindowingPlugin {
                title: "Fae Playground".into(),
                ..WindowingPlugin::default()
            },
            ..DefaultPlugins::default()
        })
        .add_plugin(EditorPlugin)
        .add_system::<Start>(spawn_scene)
        .add_system::<Update>(spin)
        .add_system::<Update>(cycle_clear_color)
        .run();
}
