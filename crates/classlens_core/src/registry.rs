//! Name-keyed registry of type descriptors.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::TypeDescriptor;

/// Holds every type known to a runtime, addressable by name.
///
/// Iteration order is the names' lexical order.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, returning the shared handle. A type with the same name is replaced.
    pub fn register(&mut self, desc: TypeDescriptor) -> Arc<TypeDescriptor> {
        let desc = Arc::new(desc);
        self.insert(Arc::clone(&desc));
        desc
    }

    /// Insert an already shared descriptor, returning the one it replaced.
    pub fn insert(&mut self, desc: Arc<TypeDescriptor>) -> Option<Arc<TypeDescriptor>> {
        self.types.insert(desc.name().to_string(), desc)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }
}
