use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::config::Options;
use crate::mapping::{Mapping, MappingMut};
use crate::shape::Mappable;

/// Registry of [`Mapping`]s for one type universe.
///
/// A type without a mapping converts with full structural defaults, so an
/// empty `Context` is already usable. Registration takes `&mut self`;
/// conversions only read, so a fully configured `Context` can be shared
/// across threads behind an `Arc` with no further coordination.
pub struct Context {
    mappings: HashMap<TypeId, Mapping>,
    options: Options,
}

impl Default for Context {
    fn default() -> Self {
        Self::with_options(Options::default())
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            mappings: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Register an empty mapping for `T`, replacing any previous one.
    pub fn create_mapping<T: Mappable>(&mut self) -> MappingMut<'_, T> {
        let mapping = match self.mappings.entry(TypeId::of::<T>()) {
            Entry::Occupied(mut slot) => {
                tracing::debug!(type_name = T::type_name(), "replacing mapping");
                slot.insert(Mapping::new::<T>());
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                tracing::debug!(type_name = T::type_name(), "created mapping");
                slot.insert(Mapping::new::<T>())
            }
        };
        MappingMut::new(mapping)
    }

    /// `None` means "no customisation", not an error.
    pub fn get_mapping<T: Mappable>(&self) -> Option<&Mapping> {
        self.mappings.get(&TypeId::of::<T>())
    }

    /// Removing an unregistered type is a no-op.
    pub fn remove_mapping<T: Mappable>(&mut self) -> Option<Mapping> {
        let removed = self.mappings.remove(&TypeId::of::<T>());
        if removed.is_some() {
            tracing::debug!(type_name = T::type_name(), "removed mapping");
        }
        removed
    }

    pub fn contains<T: Mappable>(&self) -> bool {
        self.mappings.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("mappings", &self.mappings.values().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}
