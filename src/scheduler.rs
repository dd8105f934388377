//! # Scheduler
//!
//! Events, the [Step] handed to systems and the [Scheduler] that runs them.

use std::any::Any;
use std::any::TypeId;
use std::cell::Cell;
use std::collections::BTreeMap;

use crate::Assets;
use crate::Resources;
use crate::World;

/// # Event
///
/// Marker for types that identify a step. Systems are registered against an event type and run
/// whenever a step carrying that event is invoked.
pub trait Event: 'static {}

/// Fired once before the first tick.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Start;

impl Event for Start {}

/// Fired at the start of every tick.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Update;

impl Event for Update {}

/// Fired after [Update] to prepare the frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderBegin;

impl Event for RenderBegin {}

/// Fired after [RenderBegin] to draw the frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Render;

impl Event for Render {}

/// Fired after [Render] unless the UI is hidden.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UiBegin;

impl Event for UiBegin {}

/// Fired after [UiBegin] to draw the UI.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UiRender;

impl Event for UiRender {}

/// Fired after [UiRender].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UiEnd;

impl Event for UiEnd {}

/// Fired last in every tick to present the frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderEnd;

impl Event for RenderEnd {}

/// Fired once, after the first frame has been presented.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FirstRenderEnd;

impl Event for FirstRenderEnd {}

/// Requests the run-loop to stop at the end of the current tick.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ApplicationQuit;

impl Event for ApplicationQuit {}

/// Fired once after the last tick, before the application is dropped.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Deinit;

impl Event for Deinit {}

/// # Step
///
/// A single invocation of an event, carrying the application's shared state to every system
/// registered for `E`.
pub struct Step<'a, E> {
    /// Application resources.
    pub resources: &'a mut Resources,
    /// Application entities and components.
    pub world: &'a mut World,
    /// Scheduler running this step.
    pub scheduler: &'a Scheduler,
    /// Asset loader.
    pub assets: &'a Assets,
    /// Event payload.
    pub event: E,
}

impl<'a, E: Event> Step<'a, E> {
    /// Returns a step for the given event.
    pub fn new(
        resources: &'a mut Resources,
        world: &'a mut World,
        scheduler: &'a Scheduler,
        assets: &'a Assets,
        event: E,
    ) -> Self {
        Self {
            resources,
            world,
            scheduler,
            assets,
            event,
        }
    }

    /// Runs every system registered for `F` before returning. Returns the event so systems can
    /// report results through it.
    pub fn invoke<F: Event>(&mut self, event: F) -> F {
        let mut step = Step {
            resources: &mut *self.resources,
            world: &mut *self.world,
            scheduler: self.scheduler,
            assets: self.assets,
            event,
        };
        self.scheduler.invoke(&mut step);
        step.event
    }

    /// Invokes [ApplicationQuit].
    pub fn quit(&mut self) {
        self.invoke(ApplicationQuit);
    }
}

type System<E> = Box<dyn Fn(&mut Step<'_, E>)>;

/// # Scheduler State
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SchedulerState {
    /// No run-loop has started yet.
    Idle,
    /// A run-loop is ticking.
    Running,
    /// The run-loop has finished.
    Stopped,
}

/// # Scheduler
///
/// Systems grouped by event type. Systems for one event run sequentially in registration order.
pub struct Scheduler {
    systems: BTreeMap<TypeId, Box<dyn Any>>,
    state: Cell<SchedulerState>,
    stop_requested: Cell<bool>,
}

impl Scheduler {
    /// Returns a scheduler without systems.
    pub fn new() -> Self {
        Self {
            systems: BTreeMap::new(),
            state: Cell::new(SchedulerState::Idle),
            stop_requested: Cell::new(false),
        }
    }

    /// Registers the system for the event `E`.
    pub fn add_system<E: Event>(&mut self, system: impl Fn(&mut Step<'_, E>) + 'static) -> &mut Self {
        let systems = self
            .systems
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<System<E>>::new()));

        if let Some(systems) = systems.downcast_mut::<Vec<System<E>>>() {
            systems.push(Box::new(system));
        }

        self
    }

    /// Returns the number of systems registered for the event `E`.
    pub fn system_count<E: Event>(&self) -> usize {
        self.systems_for::<E>().map_or(0, <[System<E>]>::len)
    }

    /// Runs every system registered for the step's event, in registration order.
    pub fn invoke<E: Event>(&self, step: &mut Step<'_, E>) {
        let Some(systems) = self.systems_for::<E>() else {
            return;
        };

        for system in systems {
            system(step);
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SchedulerState {
        self.state.get()
    }

    /// Marks the scheduler as running and clears any earlier stop request.
    pub fn begin_run(&self) {
        self.stop_requested.set(false);
        self.state.set(SchedulerState::Running);
    }

    /// Marks the scheduler as stopped.
    pub fn finish_run(&self) {
        self.state.set(SchedulerState::Stopped);
    }

    /// Asks the run-loop to stop once the current tick completes.
    pub fn request_stop(&self) {
        self.stop_requested.set(true);
    }

    /// Returns true if a stop was requested since the run-loop started.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.get()
    }

    fn systems_for<E: Event>(&self) -> Option<&[System<E>]> {
        self.systems
            .get(&TypeId::of::<E>())
            .and_then(|systems| systems.downcast_ref::<Vec<System<E>>>())
            .map(Vec::as_slice)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
