use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Typed handle to a named blackboard variable.
///
/// The name is the identity of the variable; the type parameter only fixes what callers
/// read and write through this handle.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Shared key/value store read and written by leaves and conditions.
///
/// Storage is ordered by variable name so iteration and debug output stay deterministic.
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<&'static str, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Store `value` under `key`.
    ///
    /// Returns `false` without touching the stored value when the variable already exists
    /// with a different type.
    pub fn set_value<T: 'static>(&mut self, key: BbKey<T>, value: T) -> bool {
        match self.values.get_mut(key.name) {
            Some(slot) => match slot.downcast_mut::<T>() {
                Some(existing) => {
                    *existing = value;
                    true
                }
                None => false,
            },
            None => {
                self.values.insert(key.name, Box::new(value));
                true
            }
        }
    }

    pub fn get_value<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let value = self.values.get(key.name)?;
        value.downcast_ref::<T>().or_else(|| {
            panic!(
                "blackboard type mismatch for variable `{}` (stored type differs from requested)",
                key.name
            )
        })
    }

    pub fn get_value_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(key.name)?;
        value.downcast_mut::<T>().or_else(|| {
            panic!(
                "blackboard type mismatch for variable `{}` (stored type differs from requested)",
                key.name
            )
        })
    }

    /// Take the variable out. A type mismatch panics and leaves the variable in place.
    pub fn remove_value<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        if !self.values.get(key.name)?.is::<T>() {
            panic!(
                "blackboard type mismatch for variable `{}` (stored type differs from requested)",
                key.name
            );
        }
        let value = self.values.remove(key.name)?;
        value.downcast::<T>().map(|b| *b).ok()
    }

    /// Names of every stored variable, in order.
    pub fn variables(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}
