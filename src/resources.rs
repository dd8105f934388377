use std::any::type_name;
use std::any::Any;
use std::any::TypeId;
use std::collections::BTreeMap;

/// # Resources
///
/// Type-keyed store of singleton values. Holds at most one value per type.
#[derive(Default)]
pub struct Resources {
    values: BTreeMap<TypeId, Box<dyn Any>>,
}

impl Resources {
    /// Returns an empty registry.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Returns true if a value of type `T` is present.
    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of stored resources.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no resources are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stores the value, replacing any existing value of the same type.
    pub fn insert<T: 'static>(&mut self, value: T) -> &mut Self {
        self.insert_and_get(value);
        self
    }

    /// Stores the value, replacing any existing value of the same type, and returns a reference
    /// to the stored value.
    pub fn insert_and_get<T: 'static>(&mut self, value: T) -> &mut T {
        let slot = self
            .values
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(()));
        *slot = Box::new(value);

        match slot.downcast_mut::<T>() {
            Some(value) => value,
            None => unreachable!("resource slot for {} was just written", type_name::<T>()),
        }
    }

    /// Constructs a default value of type `T` and stores it, replacing any existing value.
    pub fn emplace<T: Default + 'static>(&mut self) -> &mut Self {
        self.insert(T::default())
    }

    /// Constructs a value with `init` and stores it, replacing any existing value.
    pub fn emplace_with<T: 'static>(&mut self, init: impl FnOnce() -> T) -> &mut Self {
        self.insert(init())
    }

    /// Returns a reference to the stored value of type `T`.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the stored value of type `T`.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut::<T>())
    }

    /// Returns a copy of the stored value of type `T`.
    pub fn get_cloned<T: Clone + 'static>(&self) -> Option<T> {
        self.get::<T>().cloned()
    }

    /// Returns the stored value of type `T`, storing `T::default()` first if absent.
    pub fn get_or_emplace<T: Default + 'static>(&mut self) -> &mut T {
        self.get_or_insert_with(T::default)
    }

    /// Returns the stored value of type `T`, storing the value produced by `init` first if
    /// absent.
    pub fn get_or_insert_with<T: 'static>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        if !self.contains::<T>() {
            return self.insert_and_get(init());
        }

        match self.get_mut::<T>() {
            Some(value) => value,
            None => unreachable!("resource {} is present", type_name::<T>()),
        }
    }

    /// Calls `f` with the stored value of type `T` if present. Returns `None` without calling `f`
    /// otherwise.
    pub fn use_resource<T: 'static, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.get_mut::<T>().map(f)
    }

    /// Calls `f` with a shared reference to the stored value of type `T` if present.
    pub fn read_resource<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.get::<T>().map(f)
    }

    /// Removes the stored value of type `T` and returns it.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    /// Removes the stored value of type `T`. Does nothing if absent.
    pub fn erase<T: 'static>(&mut self) -> &mut Self {
        self.values.remove(&TypeId::of::<T>());
        self
    }

    /// Removes all stored values.
    pub fn clear(&mut self) -> &mut Self {
        self.values.clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Counter(u32);

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    #[test]
    fn new_get_returns_none() {
        let resources = Resources::new();

        assert_eq!(resources.get::<Counter>(), None);
    }

    #[test]
    fn insert_get_returns_value() {
        let mut resources = Resources::new();

        resources.insert(Counter(3));

        assert_eq!(resources.get::<Counter>(), Some(&Counter(3)));
    }

    #[test]
    fn insert_twice_get_returns_latest_value() {
        let mut resources = Resources::new();

        resources.insert(Counter(3)).insert(Counter(8));

        assert_eq!(resources.get::<Counter>(), Some(&Counter(8)));
        assert_eq!(resources.len(), 1);
    }

    #[test]
    fn insert_distinct_types_keeps_both() {
        let mut resources = Resources::new();

        resources.insert(Counter(1)).insert(Label("fae"));

        assert_eq!(resources.get::<Counter>(), Some(&Counter(1)));
        assert_eq!(resources.get::<Label>(), Some(&Label("fae")));
    }

    #[test]
    fn emplace_existing_replaces_value() {
        let mut resources = Resources::new();
        resources.insert(Counter(5));

        resources.emplace::<Counter>();

        assert_eq!(resources.get::<Counter>(), Some(&Counter(0)));
    }

    #[test]
    fn emplace_with_stores_constructed_value() {
        let mut resources = Resources::new();

        resources.emplace_with(|| Label("built"));

        assert_eq!(resources.get::<Label>(), Some(&Label("built")));
    }

    #[test]
    fn get_or_emplace_twice_returns_same_instance() {
        let mut resources = Resources::new();

        let first = resources.get_or_emplace::<Counter>() as *const Counter;
        resources.get_or_emplace::<Counter>().0 = 9;
        let second = resources.get_or_emplace::<Counter>() as *const Counter;

        assert_eq!(first, second);
        assert_eq!(resources.get::<Counter>(), Some(&Counter(9)));
    }

    #[test]
    fn get_or_insert_with_existing_does_not_call_init() {
        let mut resources = Resources::new();
        resources.insert(Counter(4));

        let value = resources.get_or_insert_with(|| -> Counter { panic!("init called") });

        assert_eq!(value, &Counter(4));
    }

    #[test]
    fn use_resource_present_mutates_value() {
        let mut resources = Resources::new();
        resources.insert(Counter(1));

        let result = resources.use_resource::<Counter, _>(|counter| {
            counter.0 += 1;
            counter.0
        });

        assert_eq!(result, Some(2));
        assert_eq!(resources.get::<Counter>(), Some(&Counter(2)));
    }

    #[test]
    fn use_resource_absent_does_not_call_callback() {
        let mut resources = Resources::new();
        let mut called = false;

        let result = resources.use_resource::<Counter, _>(|_| called = true);

        assert_eq!(result, None);
        assert!(!called);
    }

    #[test]
    fn read_resource_present_returns_result() {
        let mut resources = Resources::new();
        resources.insert(Label("read"));

        assert_eq!(resources.read_resource::<Label, _>(|label| label.0), Some("read"));
    }

    #[test]
    fn erase_get_returns_none() {
        let mut resources = Resources::new();
        resources.insert(Counter(1));

        resources.erase::<Counter>();

        assert_eq!(resources.get::<Counter>(), None);
    }

    #[test]
    fn erase_absent_does_nothing() {
        let mut resources = Resources::new();
        resources.insert(Label("kept"));

        resources.erase::<Counter>();

        assert_eq!(resources.len(), 1);
    }

    #[test]
    fn remove_returns_stored_value() {
        let mut resources = Resources::new();
        resources.insert(Counter(7));

        assert_eq!(resources.remove::<Counter>(), Some(Counter(7)));
        assert!(!resources.contains::<Counter>());
    }

    #[test]
    fn clear_is_empty_returns_true() {
        let mut resources = Resources::new();
        resources.insert(Counter(7)).insert(Label("x"));

        resources.clear();

        assert!(resources.is_empty());
    }
}
