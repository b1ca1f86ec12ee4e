// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-class wire binding table.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use arbor_component::{AdapterRef, ClassId, MethodFn, WireConfigFn, WireMetaSink};

/// Where a binding delivers its values.
pub enum WireTarget<K> {
    /// Deliveries store into the wired field through the provisioning
    /// channel.
    Field,
    /// Deliveries invoke the authored method body.
    Method(MethodFn<K>),
}

impl<K> fmt::Debug for WireTarget<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.write_str("Field"),
            Self::Method(_) => f.write_str("Method"),
        }
    }
}

/// One recorded wire binding: member, adapter, configuration callback, and
/// delivery target.
pub struct WireBinding<K> {
    member: &'static str,
    adapter: AdapterRef,
    config: WireConfigFn<K>,
    target: WireTarget<K>,
}

impl<K> WireBinding<K> {
    /// Returns the bound member's name.
    #[must_use]
    #[inline]
    pub fn member(&self) -> &'static str {
        self.member
    }

    /// Returns the provisioning adapter.
    #[must_use]
    #[inline]
    pub fn adapter(&self) -> &AdapterRef {
        &self.adapter
    }

    /// Returns the configuration-resolution callback.
    #[must_use]
    #[inline]
    pub fn config(&self) -> &WireConfigFn<K> {
        &self.config
    }

    /// Returns the delivery target.
    #[must_use]
    #[inline]
    pub fn target(&self) -> &WireTarget<K> {
        &self.target
    }

    /// Returns `true` if this binding delivers by invoking a method.
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self.target, WireTarget::Method(_))
    }
}

impl<K> fmt::Debug for WireBinding<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireBinding")
            .field("member", &self.member)
            .field("adapter", &self.adapter)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// The wiring subsystem's per-class binding table.
///
/// Decorator registration is the sole writer, through the
/// [`WireMetaSink`] implementation; bindings are recorded once per class,
/// before any instance exists. Instance construction consults the table
/// through [`bindings_for`](Self::bindings_for) (see
/// [`connect_instance`](crate::connect_instance)).
///
/// # Type Parameters
///
/// - `K`: The instance key type, matching the component runtime's.
pub struct WireRegistry<K> {
    bindings: HashMap<ClassId, Vec<WireBinding<K>>>,
}

impl<K> Default for WireRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> WireRegistry<K> {
    /// Creates a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Returns the bindings recorded for `class`, in registration order.
    ///
    /// Classes with no wire decorators resolve to an empty slice.
    #[must_use]
    pub fn bindings_for(&self, class: ClassId) -> &[WireBinding<K>] {
        self.bindings.get(&class).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if `member` on `class` has a recorded binding.
    #[must_use]
    pub fn is_wired(&self, class: ClassId, member: &str) -> bool {
        self.bindings_for(class)
            .iter()
            .any(|binding| binding.member == member)
    }

    /// Returns the number of bindings recorded for `class`.
    #[must_use]
    pub fn binding_count(&self, class: ClassId) -> usize {
        self.bindings_for(class).len()
    }

    /// Returns `true` if no class has recorded bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns an iterator over the classes with recorded bindings.
    ///
    /// Order is unspecified.
    pub fn classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.bindings.keys().copied()
    }
}

impl<K> WireMetaSink<K> for WireRegistry<K> {
    fn store_wired_field_meta(
        &mut self,
        class: ClassId,
        member: &'static str,
        adapter: AdapterRef,
        config: WireConfigFn<K>,
    ) {
        self.bindings.entry(class).or_default().push(WireBinding {
            member,
            adapter,
            config,
            target: WireTarget::Field,
        });
    }

    fn store_wired_method_meta(
        &mut self,
        class: ClassId,
        member: &'static str,
        adapter: AdapterRef,
        method: MethodFn<K>,
        config: WireConfigFn<K>,
    ) {
        self.bindings.entry(class).or_default().push(WireBinding {
            member,
            adapter,
            config,
            target: WireTarget::Method(method),
        });
    }
}

impl<K> fmt::Debug for WireRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireRegistry")
            .field("classes", &self.bindings.len())
            .finish()
    }
}
