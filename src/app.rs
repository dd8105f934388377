use std::any::type_name;
use std::any::TypeId;
use std::collections::BTreeSet;

use crate::scheduler::ApplicationQuit;
use crate::scheduler::Deinit;
use crate::scheduler::Event;
use crate::scheduler::Render;
use crate::scheduler::RenderBegin;
use crate::scheduler::RenderEnd;
use crate::scheduler::Start;
use crate::scheduler::Step;
use crate::scheduler::UiBegin;
use crate::scheduler::UiEnd;
use crate::scheduler::UiRender;
use crate::scheduler::Update;
use crate::Assets;
use crate::Resources;
use crate::Scheduler;
use crate::UiSettings;
use crate::World;

/// # Plugin
///
/// Unit of application setup. A plugin registers resources, systems and other plugins.
pub trait Plugin: 'static {
    /// Configures the application.
    fn init(&self, app: &mut Application);

    /// Returns false if the plugin should be initialized every time it is added. Unique plugins
    /// are initialized the first time their type is added and skipped afterwards.
    fn is_unique(&self) -> bool {
        true
    }
}

/// # Application
///
/// Owns the state shared by every system and drives the run-loop.
pub struct Application {
    /// Singleton values.
    pub resources: Resources,
    /// Entities and components.
    pub world: World,
    /// Registered systems.
    pub scheduler: Scheduler,
    /// Asset loader.
    pub assets: Assets,
    plugins: BTreeSet<TypeId>,
}

impl Application {
    /// Returns an application without plugins.
    pub fn new() -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.add_system::<ApplicationQuit>(stop_on_quit);

        Self {
            resources: Resources::new(),
            world: World::new(),
            scheduler,
            assets: Assets::default(),
            plugins: BTreeSet::new(),
        }
    }

    /// Initializes the plugin. Unique plugins whose type was already added are skipped along with
    /// their configuration, so add configured plugins before the plugins that depend on them.
    pub fn add_plugin<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        if plugin.is_unique() && !self.plugins.insert(TypeId::of::<P>()) {
            log::warn!("skipping plugin {}, already added", type_name::<P>());
            return self;
        }

        log::debug!("adding plugin {}", type_name::<P>());
        plugin.init(self);
        self
    }

    /// Returns true if a plugin of type `P` was added.
    pub fn has_plugin<P: Plugin>(&self) -> bool {
        self.plugins.contains(&TypeId::of::<P>())
    }

    /// Registers the system for the event `E`.
    pub fn add_system<E: Event>(&mut self, system: impl Fn(&mut Step<'_, E>) + 'static) -> &mut Self {
        self.scheduler.add_system(system);
        self
    }

    /// Stores the resource, replacing any existing value of the same type.
    pub fn insert_resource<T: 'static>(&mut self, value: T) -> &mut Self {
        self.resources.insert(value);
        self
    }

    /// Stores a default resource of type `T`, replacing any existing value.
    pub fn emplace_resource<T: Default + 'static>(&mut self) -> &mut Self {
        self.resources.emplace::<T>();
        self
    }

    /// Replaces the asset loader.
    pub fn set_assets(&mut self, assets: Assets) -> &mut Self {
        self.assets = assets;
        self
    }

    /// Runs every system registered for the event and returns the event.
    pub fn invoke<E: Event>(&mut self, event: E) -> E {
        let mut step = Step::new(
            &mut self.resources,
            &mut self.world,
            &self.scheduler,
            &self.assets,
            event,
        );
        self.scheduler.invoke(&mut step);
        step.event
    }

    /// Runs [Start], then ticks until quit is requested, then runs [Deinit].
    pub fn run(&mut self) {
        self.start();

        while !self.scheduler.is_stop_requested() {
            self.tick();
        }

        self.finish();
    }

    /// Marks the scheduler as running and runs [Start].
    pub fn start(&mut self) {
        log::debug!("starting application");
        self.scheduler.begin_run();
        self.invoke(Start);
    }

    /// Runs a single frame.
    pub fn tick(&mut self) {
        self.invoke(Update);
        self.invoke(RenderBegin);
        self.invoke(Render);

        if !self.is_ui_hidden() {
            self.invoke(UiBegin);
            self.invoke(UiRender);
            self.invoke(UiEnd);
        }

        self.invoke(RenderEnd);
    }

    /// Runs [Deinit] and marks the scheduler as stopped.
    pub fn finish(&mut self) {
        self.invoke(Deinit);
        self.scheduler.finish_run();
        log::debug!("application stopped");
    }

    fn is_ui_hidden(&self) -> bool {
        self.resources
            .get::<UiSettings>()
            .is_some_and(|settings| settings.hide_ui)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

fn stop_on_quit(step: &mut Step<'_, ApplicationQuit>) {
    log::debug!("quit requested");
    step.scheduler.request_stop();
}
