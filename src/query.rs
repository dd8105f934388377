//! # Queries
//!
//! Typed iteration over the entities of a [World](crate::World) that have a given set of
//! components.

use std::any::type_name;
use std::any::TypeId;
use std::collections::btree_set;
use std::collections::BTreeMap;

use nohash::IntMap;

use crate::world::ComponentTable;
use crate::world::DynamicComponentTable;
use crate::Component;
use crate::Entity;

/// Component tables borrowed out of a world while a query is being built. Each table can be
/// claimed once.
pub struct TableClaims<'w> {
    indexes: &'w BTreeMap<TypeId, usize>,
    slots: Vec<Option<&'w mut Box<dyn DynamicComponentTable>>>,
}

impl<'w> TableClaims<'w> {
    pub(crate) fn new(
        indexes: &'w BTreeMap<TypeId, usize>,
        tables: &'w mut [Box<dyn DynamicComponentTable>],
    ) -> Self {
        Self {
            indexes,
            slots: tables.iter_mut().map(Some).collect(),
        }
    }

    fn claim<T: Component>(&mut self) -> Option<&'w mut ComponentTable<T>> {
        let index = *self.indexes.get(&TypeId::of::<T>())?;
        let table = match self.slots[index].take() {
            Some(table) => table,
            None => panic!("component {} appears twice in one query", type_name::<T>()),
        };

        table.as_any_mut().downcast_mut::<ComponentTable<T>>()
    }
}

/// # Query Param
///
/// Describes one element of a query: which component table it reads and what it yields per
/// entity. Implemented for `&T`, `&mut T`, `Option<P>` and tuples of up to eight params.
pub trait QueryParam {
    /// State borrowed from the world for the duration of the query.
    type Fetch<'w>;

    /// Value yielded for each matching entity.
    type Item<'w>;

    /// Claims the tables this param needs. Returns `None` if a required table does not exist, in
    /// which case the query matches nothing.
    fn fetch<'w>(claims: &mut TableClaims<'w>) -> Option<Self::Fetch<'w>>;

    /// Returns the item for the entity, or `None` if the entity does not match.
    fn get<'w>(fetch: &mut Self::Fetch<'w>, entity: Entity) -> Option<Self::Item<'w>>;
}

impl<'a, T: Component> QueryParam for &'a T {
    type Fetch<'w> = &'w ComponentTable<T>;
    type Item<'w> = &'w T;

    fn fetch<'w>(claims: &mut TableClaims<'w>) -> Option<Self::Fetch<'w>> {
        claims.claim::<T>().map(|table| &*table)
    }

    fn get<'w>(fetch: &mut Self::Fetch<'w>, entity: Entity) -> Option<Self::Item<'w>> {
        let table: &'w ComponentTable<T> = *fetch;
        table.get(entity)
    }
}

/// Mutable access to one table. Items are handed out at most once per query since every entity is
/// visited at most once.
pub struct FetchMut<'w, T> {
    entity_indexes: &'w IntMap<Entity, usize>,
    items: Vec<Option<&'w mut T>>,
}

impl<'a, T: Component> QueryParam for &'a mut T {
    type Fetch<'w> = FetchMut<'w, T>;
    type Item<'w> = &'w mut T;

    fn fetch<'w>(claims: &mut TableClaims<'w>) -> Option<Self::Fetch<'w>> {
        let table = claims.claim::<T>()?;
        let ComponentTable {
            entity_indexes,
            items,
            ..
        } = table;

        Some(FetchMut {
            entity_indexes,
            items: items.iter_mut().map(Some).collect(),
        })
    }

    fn get<'w>(fetch: &mut Self::Fetch<'w>, entity: Entity) -> Option<Self::Item<'w>> {
        let index = *fetch.entity_indexes.get(&entity)?;
        fetch.items[index].take()
    }
}

impl<P: QueryParam> QueryParam for Option<P> {
    type Fetch<'w> = Option<P::Fetch<'w>>;
    type Item<'w> = Option<P::Item<'w>>;

    fn fetch<'w>(claims: &mut TableClaims<'w>) -> Option<Self::Fetch<'w>> {
        Some(P::fetch(claims))
    }

    fn get<'w>(fetch: &mut Self::Fetch<'w>, entity: Entity) -> Option<Self::Item<'w>> {
        Some(fetch.as_mut().and_then(|fetch| P::get(fetch, entity)))
    }
}

macro_rules! impl_query_param_tuple {
    ($(($param:ident, $fetch:ident)),+) => {
        impl<$($param: QueryParam),+> QueryParam for ($($param,)+) {
            type Fetch<'w> = ($($param::Fetch<'w>,)+);
            type Item<'w> = ($($param::Item<'w>,)+);

            fn fetch<'w>(claims: &mut TableClaims<'w>) -> Option<Self::Fetch<'w>> {
                Some(($($param::fetch(claims)?,)+))
            }

            fn get<'w>(fetch: &mut Self::Fetch<'w>, entity: Entity) -> Option<Self::Item<'w>> {
                let ($($fetch,)+) = fetch;
                Some(($($param::get($fetch, entity)?,)+))
            }
        }
    };
}

impl_query_param_tuple!((A, a));
impl_query_param_tuple!((A, a), (B, b));
impl_query_param_tuple!((A, a), (B, b), (C, c));
impl_query_param_tuple!((A, a), (B, b), (C, c), (D, d));
impl_query_param_tuple!((A, a), (B, b), (C, c), (D, d), (E, e));
impl_query_param_tuple!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f));
impl_query_param_tuple!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g));
impl_query_param_tuple!((A, a), (B, b), (C, c), (D, d), (E, e), (F, f), (G, g), (H, h));

/// # Query
///
/// Iterator over `(Entity, Q::Item)` returned by [World::query](crate::World::query).
pub struct Query<'w, Q: QueryParam> {
    entities: btree_set::Iter<'w, Entity>,
    fetch: Option<Q::Fetch<'w>>,
}

impl<'w, Q: QueryParam> Query<'w, Q> {
    pub(crate) fn new(entities: btree_set::Iter<'w, Entity>, fetch: Option<Q::Fetch<'w>>) -> Self {
        Self { entities, fetch }
    }
}

impl<'w, Q: QueryParam> Iterator for Query<'w, Q> {
    type Item = (Entity, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        let fetch = self.fetch.as_mut()?;

        for entity in self.entities.by_ref() {
            if let Some(item) = Q::get(fetch, *entity) {
                return Some((*entity, item));
            }
        }

        None
    }
}
