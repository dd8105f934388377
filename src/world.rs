use std::any::type_name;
use std::any::Any;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use nohash::IntMap;

use crate::query::Query;
use crate::query::QueryParam;
use crate::query::TableClaims;

static ALLOCATOR: AtomicU64 = AtomicU64::new(1);

/// # Component
///
/// Marker for types that can be attached to an [Entity]. An entity holds at most one value per
/// component type.
pub trait Component: 'static {}

/// # Entity
///
/// Identifier of an object in a [World]. Identifiers are allocated from a process-wide counter and
/// are never reused, so a destroyed entity's id can never refer to a different entity later.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Entity {
    id: u64,
}

impl Entity {
    fn new() -> Self {
        Self {
            id: ALLOCATOR.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Returns the raw identifier.
    pub fn id(self) -> u64 {
        self.id
    }
}

impl nohash::IsEnabled for Entity {}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

pub trait DynamicComponentTable {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn contains(&self, entity: Entity) -> bool;

    fn remove(&mut self, entity: Entity);

    fn component_name(&self) -> &'static str;
}

pub struct ComponentTable<T> {
    pub(crate) entity_indexes: IntMap<Entity, usize>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) items: Vec<T>,
}

impl<T: Component> ComponentTable<T> {
    fn new() -> Self {
        Self {
            entity_indexes: IntMap::default(),
            entities: Vec::new(),
            items: Vec::new(),
        }
    }

    fn set(&mut self, entity: Entity, value: T) {
        match self.entity_indexes.get(&entity) {
            Some(index) => self.items[*index] = value,
            None => {
                self.entity_indexes.insert(entity, self.items.len());
                self.entities.push(entity);
                self.items.push(value);
            }
        }
    }

    pub(crate) fn get(&self, entity: Entity) -> Option<&T> {
        self.entity_indexes
            .get(&entity)
            .map(|index| &self.items[*index])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.entity_indexes
            .get(&entity)
            .map(|index| &mut self.items[*index])
    }

    fn take(&mut self, entity: Entity) -> Option<T> {
        let index = self.entity_indexes.remove(&entity)?;
        self.entities.swap_remove(index);
        let value = self.items.swap_remove(index);

        if let Some(moved) = self.entities.get(index) {
            self.entity_indexes.insert(*moved, index);
        }

        Some(value)
    }
}

impl<T: Component> DynamicComponentTable for ComponentTable<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn contains(&self, entity: Entity) -> bool {
        self.entity_indexes.contains_key(&entity)
    }

    fn remove(&mut self, entity: Entity) {
        self.take(entity);
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// # World
///
/// Owns every entity and the components attached to them.
#[derive(Default)]
pub struct World {
    entities: BTreeSet<Entity>,
    component_indexes: BTreeMap<TypeId, usize>,
    component_tables: Vec<Box<dyn DynamicComponentTable>>,
}

impl World {
    /// Returns an empty world.
    pub fn new() -> Self {
        Self {
            entities: BTreeSet::new(),
            component_indexes: BTreeMap::new(),
            component_tables: Vec::new(),
        }
    }

    /// Returns true if the entity exists in the world.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Returns the number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the world has no live entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the live entities in creation order.
    pub fn entities(&self) -> impl '_ + Iterator<Item = Entity> {
        self.entities.iter().copied()
    }

    /// Creates a new entity without components.
    pub fn spawn(&mut self) -> Entity {
        let entity = Entity::new();
        self.entities.insert(entity);
        entity
    }

    /// Creates a new entity and returns a builder for attaching components to it.
    pub fn create_entity(&mut self) -> EntityCommands<'_> {
        let entity = self.spawn();
        EntityCommands {
            entity,
            world: self,
        }
    }

    /// Returns a builder for an existing entity.
    pub fn entity(&mut self, entity: Entity) -> Option<EntityCommands<'_>> {
        if !self.is_alive(entity) {
            return None;
        }

        Some(EntityCommands {
            entity,
            world: self,
        })
    }

    /// Removes the entity and all of its components. Returns false if the entity did not exist.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.entities.remove(&entity) {
            return false;
        }

        for table in &mut self.component_tables {
            table.remove(entity);
        }

        true
    }

    /// Attaches the component to the entity, replacing any existing value of the same type.
    pub fn set_component<T: Component>(&mut self, entity: Entity, value: T) -> &mut Self {
        if !self.is_alive(entity) {
            log::warn!(
                "ignoring {} for destroyed entity {}",
                type_name::<T>(),
                entity
            );
            return self;
        }

        let component_index = match self.component_index::<T>() {
            Some(index) => index,
            None => {
                let index = self.component_tables.len();
                self.component_indexes.insert(TypeId::of::<T>(), index);
                self.component_tables
                    .push(Box::new(ComponentTable::<T>::new()));

                index
            }
        };

        if let Some(table) = self.component_tables[component_index]
            .as_any_mut()
            .downcast_mut::<ComponentTable<T>>()
        {
            table.set(entity, value);
        }

        self
    }

    /// Returns the component for the given entity.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.table::<T>()?.get(entity)
    }

    /// Returns the component for the given entity mutably.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.table_mut::<T>()?.get_mut(entity)
    }

    /// Returns a copy of the component for the given entity.
    pub fn get_component_cloned<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.get_component::<T>(entity).cloned()
    }

    /// Returns true if the entity has a component of type `T`.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// Calls `f` with the entity's component if present. Returns `None` without calling `f`
    /// otherwise.
    pub fn use_component<T: Component, R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        self.get_component_mut::<T>(entity).map(f)
    }

    /// Removes the component from the entity and returns it.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.table_mut::<T>()?.take(entity)
    }

    /// Returns the type names of every component attached to the entity.
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        self.component_tables
            .iter()
            .filter(|table| table.contains(entity))
            .map(|table| table.component_name())
            .collect()
    }

    /// Iterates over every live entity that has all components required by `Q`.
    ///
    /// `Q` is a component reference or a tuple of them: `&T` for read access, `&mut T` for write
    /// access and `Option<&T>` or `Option<&mut T>` for components that may be missing. Entities
    /// are visited in creation order. The query borrows the world exclusively, so components
    /// cannot be added or removed while it is alive.
    ///
    /// # Panics
    ///
    /// Panics if `Q` names the same component type more than once.
    pub fn query<Q: QueryParam>(&mut self) -> Query<'_, Q> {
        let World {
            entities,
            component_indexes,
            component_tables,
        } = self;

        let mut claims = TableClaims::new(component_indexes, component_tables);
        let fetch = Q::fetch(&mut claims);

        Query::new(entities.iter(), fetch)
    }

    fn component_index<T: Component>(&self) -> Option<usize> {
        self.component_indexes.get(&TypeId::of::<T>()).copied()
    }

    fn table<T: Component>(&self) -> Option<&ComponentTable<T>> {
        let component_index = self.component_index::<T>()?;
        self.component_tables[component_index]
            .as_any()
            .downcast_ref::<ComponentTable<T>>()
    }

    fn table_mut<T: Component>(&mut self) -> Option<&mut ComponentTable<T>> {
        let component_index = self.component_index::<T>()?;
        self.component_tables[component_index]
            .as_any_mut()
            .downcast_mut::<ComponentTable<T>>()
    }
}

/// # Entity Commands
///
/// Chainable access to a single live entity.
pub struct EntityCommands<'w> {
    entity: Entity,
    world: &'w mut World,
}

impl<'w> EntityCommands<'w> {
    /// Returns the entity's identifier.
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Returns true if the entity still exists.
    pub fn is_alive(&self) -> bool {
        self.world.is_alive(self.entity)
    }

    /// Attaches the component, replacing any existing value of the same type.
    pub fn set_component<T: Component>(&mut self, value: T) -> &mut Self {
        self.world.set_component(self.entity, value);
        self
    }

    /// Attaches the component and returns a reference to the stored value.
    pub fn set_and_get_component<T: Component>(&mut self, value: T) -> Option<&mut T> {
        self.world.set_component(self.entity, value);
        self.world.get_component_mut::<T>(self.entity)
    }

    /// Returns the component.
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.world.get_component::<T>(self.entity)
    }

    /// Returns the component mutably.
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.world.get_component_mut::<T>(self.entity)
    }

    /// Calls `f` with the component if present.
    pub fn use_component<T: Component, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.world.use_component(self.entity, f)
    }

    /// Removes the component and returns it.
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        self.world.remove_component::<T>(self.entity)
    }

    /// Destroys the entity.
    pub fn destroy(self) -> bool {
        self.world.destroy(self.entity)
    }
}
