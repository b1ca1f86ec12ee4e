// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract boundary to the external wiring subsystem.
//!
//! Decorator registration records wire bindings through [`WireMetaSink`],
//! the sole write path into the wiring subsystem's per-class binding table.
//! Registration happens once per class, before any instance exists;
//! subscription and delivery are per-instance and live in the wiring
//! subsystem (`arbor_wire`), not here.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::class::ClassId;
use crate::descriptor::MethodFn;
use crate::instance::ComponentInstance;
use crate::value::SlotValue;

/// An external data-provisioning adapter.
///
/// Adapters push values into bound fields and methods over time. This layer
/// never drives an adapter; it only carries the reference from the compiler
/// metadata into the wiring table. The one behavioral method,
/// [`provide`](Self::provide), is called by the wiring subsystem to pull
/// the current value for a configuration.
pub trait WireAdapter: Send + Sync {
    /// Short adapter name used in diagnostics.
    fn adapter_name(&self) -> &'static str;

    /// Produces the current value for the given configuration, if one is
    /// available.
    fn provide(&self, config: &WireConfig) -> Option<SlotValue>;
}

/// A shared reference to a [`WireAdapter`].
///
/// Adapter identity is reference identity: two `AdapterRef`s are the
/// [same](Self::same) adapter only if they share one allocation, no matter
/// how the adapters compare structurally.
#[derive(Clone)]
pub struct AdapterRef(Arc<dyn WireAdapter>);

impl AdapterRef {
    /// Wraps an adapter in a shared reference.
    #[must_use]
    pub fn new<A: WireAdapter + 'static>(adapter: A) -> Self {
        Self(Arc::new(adapter))
    }

    /// Returns `true` if both references point at the same adapter.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the adapter's diagnostic name.
    #[must_use]
    pub fn adapter_name(&self) -> &'static str {
        self.0.adapter_name()
    }

    /// Pulls the current value for `config` from the adapter.
    pub fn provide(&self, config: &WireConfig) -> Option<SlotValue> {
        self.0.provide(config)
    }
}

impl fmt::Debug for AdapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AdapterRef")
            .field(&self.adapter_name())
            .finish()
    }
}

/// Configuration handed to a wire adapter.
///
/// A small ordered collection of name/value pairs produced by the binding's
/// configuration callback from the current instance state.
#[derive(Clone, Debug, Default)]
pub struct WireConfig {
    entries: Vec<(&'static str, SlotValue)>,
}

impl WireConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an entry, builder-style.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: SlotValue) -> Self {
        self.entries.push((name, value));
        self
    }

    /// Adds an entry.
    pub fn set(&mut self, name: &'static str, value: SlotValue) {
        self.entries.push((name, value));
    }

    /// Returns the value for `name`, if present.
    ///
    /// When a name was added more than once, the most recent entry wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.entries
            .iter()
            .rev()
            .find(|(entry, _)| *entry == name)
            .map(|(_, value)| value)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the configuration has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SlotValue)> + '_ {
        self.entries.iter().map(|(name, value)| (*name, value))
    }
}

/// Resolves a wire binding's adapter configuration from the instance.
///
/// Shared (`Arc`) so the binding table and tests can hold the same callback
/// and compare it by identity.
pub type WireConfigFn<K> = Arc<dyn Fn(&ComponentInstance<K>) -> WireConfig + Send + Sync>;

/// The write path into the wiring subsystem's per-class binding table.
///
/// Decorator registration calls exactly one of these methods per wire
/// binding, before any instance of the class is constructed. This layer has
/// no visibility into adapter subscription or lifecycle beyond these calls.
pub trait WireMetaSink<K> {
    /// Records a field binding: `member` on `class` is provisioned by
    /// `adapter`, configured through `config`.
    fn store_wired_field_meta(
        &mut self,
        class: ClassId,
        member: &'static str,
        adapter: AdapterRef,
        config: WireConfigFn<K>,
    );

    /// Records a method binding: deliveries invoke `method`, the authored
    /// body of `member` on `class`.
    fn store_wired_method_meta(
        &mut self,
        class: ClassId,
        member: &'static str,
        adapter: AdapterRef,
        method: MethodFn<K>,
        config: WireConfigFn<K>,
    );
}

/// A sink for classes that declare no wire bindings.
///
/// Registration never touches the sink for such classes, so `NoWiring`
/// panics if a binding reaches it anyway: a class with wire decorators must
/// be registered against a real wiring table.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoWiring;

impl<K> WireMetaSink<K> for NoWiring {
    fn store_wired_field_meta(
        &mut self,
        class: ClassId,
        member: &'static str,
        _adapter: AdapterRef,
        _config: WireConfigFn<K>,
    ) {
        panic!("wire binding `{member}` on {class} requires a wiring table");
    }

    fn store_wired_method_meta(
        &mut self,
        class: ClassId,
        member: &'static str,
        _adapter: AdapterRef,
        _method: MethodFn<K>,
        _config: WireConfigFn<K>,
    ) {
        panic!("wire binding `{member}` on {class} requires a wiring table");
    }
}
