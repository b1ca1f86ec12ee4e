// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The class metadata registry.
//!
//! This module provides [`DecoratorRegistry`], the per-process store from
//! class identity to resolved decorator metadata, consulted by the
//! rendering engine at render and introspection time.

use core::fmt;

use hashbrown::HashMap;

use crate::class::ClassId;
use crate::meta::DecoratorMeta;

/// The shared value returned for classes that were never registered.
static EMPTY_META: DecoratorMeta = DecoratorMeta::EMPTY;

/// A registry of resolved decorator metadata, keyed by class identity.
///
/// The registry is an explicit service object with a narrow interface:
/// created once at process start, written exactly once per class by
/// registration, and never cleared. Passing it explicitly (rather than
/// hiding it in a module-level global) keeps it swappable in tests.
///
/// Re-registering a class is not expected but is not guarded against:
/// the last write wins.
///
/// # Example
///
/// ```rust
/// use arbor_component::{ClassId, DecoratorMeta, DecoratorRegistry};
///
/// const CARD: ClassId = ClassId::new(4);
///
/// let registry = DecoratorRegistry::new();
///
/// // Never-registered classes resolve to the shared empty metadata.
/// let meta = registry.lookup(CARD);
/// assert!(meta.api_fields().is_empty());
/// assert!(meta.fields().is_none());
/// ```
#[derive(Default)]
pub struct DecoratorRegistry {
    entries: HashMap<ClassId, DecoratorMeta>,
}

impl DecoratorRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `meta` for `class`, returning the displaced metadata if the
    /// class was already registered.
    pub fn register(&mut self, class: ClassId, meta: DecoratorMeta) -> Option<DecoratorMeta> {
        self.entries.insert(class, meta)
    }

    /// Returns the metadata registered for `class`.
    ///
    /// Unregistered classes resolve to the shared
    /// [`DecoratorMeta::EMPTY`], which means "no decorators", not an error.
    #[must_use]
    pub fn lookup(&self, class: ClassId) -> &DecoratorMeta {
        self.entries.get(&class).unwrap_or(&EMPTY_META)
    }

    /// Returns `true` if `class` has registered metadata.
    #[must_use]
    pub fn contains(&self, class: ClassId) -> bool {
        self.entries.contains_key(&class)
    }

    /// Returns the number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no class has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the registered classes and their metadata.
    ///
    /// Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &DecoratorMeta)> + '_ {
        self.entries.iter().map(|(class, meta)| (*class, meta))
    }
}

impl fmt::Debug for DecoratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorRegistry")
            .field("classes", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const FIRST: ClassId = ClassId::new(0);
    const SECOND: ClassId = ClassId::new(1);

    fn meta_with_field(name: &'static str) -> DecoratorMeta {
        DecoratorMeta::new(vec![name], vec![], vec![], vec![], None)
    }

    #[test]
    fn unregistered_class_resolves_to_shared_empty() {
        let registry = DecoratorRegistry::new();

        let meta = registry.lookup(FIRST);
        assert!(meta.api_fields().is_empty());
        assert!(meta.api_methods().is_empty());
        assert!(meta.wired_fields().is_empty());
        assert!(meta.wired_methods().is_empty());
        assert!(meta.fields().is_none());

        // Every miss resolves to the one shared value.
        assert!(core::ptr::eq(registry.lookup(FIRST), registry.lookup(SECOND)));
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = DecoratorRegistry::new();
        assert!(registry.is_empty());

        let displaced = registry.register(FIRST, meta_with_field("count"));
        assert!(displaced.is_none());
        assert!(registry.contains(FIRST));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(FIRST).api_fields(), &["count"]);
    }

    #[test]
    fn reregistration_overwrites() {
        let mut registry = DecoratorRegistry::new();
        registry.register(FIRST, meta_with_field("count"));

        // Last write wins; the previous entry is displaced, not merged.
        let displaced = registry.register(FIRST, meta_with_field("total"));
        assert_eq!(displaced.unwrap().api_fields(), &["count"]);
        assert_eq!(registry.lookup(FIRST).api_fields(), &["total"]);
        assert!(!registry.lookup(FIRST).is_api_field("count"));
    }

    #[test]
    fn classes_are_independent() {
        let mut registry = DecoratorRegistry::new();
        registry.register(FIRST, meta_with_field("count"));

        assert!(registry.lookup(SECOND).api_fields().is_empty());
        assert!(!registry.contains(SECOND));
    }

    #[test]
    fn iter_visits_registered_classes() {
        let mut registry = DecoratorRegistry::new();
        registry.register(FIRST, meta_with_field("count"));
        registry.register(SECOND, meta_with_field("total"));

        let mut classes: vec::Vec<_> = registry.iter().map(|(class, _)| class).collect();
        classes.sort();
        assert_eq!(classes, vec![FIRST, SECOND]);
    }
}
