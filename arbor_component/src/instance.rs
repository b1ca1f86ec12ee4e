// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component instances and per-instance slot storage.
//!
//! This module provides [`SlotStore`], the sparse per-instance value
//! storage, and [`ComponentInstance`], which dispatches member reads,
//! writes, and method invocations through the owning class's member table.
//!
//! # Implementation
//!
//! Slot storage follows the sorted-vector-with-binary-search approach:
//! contiguous memory, no hash buckets, O(log n) lookup for the typical
//! member counts (a handful to a few tens), and inline storage for small
//! slot sets via `SmallVec`.

use core::fmt;

use smallvec::SmallVec;

use arbor_reactive::InvalidationSink;

use crate::class::{ClassDefinition, ClassId, SlotId};
use crate::descriptor::MemberDescriptor;
use crate::value::SlotValue;

/// Default inline capacity for slot entries.
///
/// Most instances populate fewer than 8 slots, so this avoids heap
/// allocation in the common case.
const INLINE_CAPACITY: usize = 8;

/// Sparse per-instance storage for backing-slot values.
///
/// Only slots that have been written occupy an entry; a never-written slot
/// reads as unset. Entries are kept sorted by [`SlotId`] for binary-search
/// lookup.
#[derive(Clone, Default)]
pub struct SlotStore {
    entries: SmallVec<[(SlotId, SlotValue); INLINE_CAPACITY]>,
}

impl SlotStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Returns `true` if no slots have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of written slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Binary search for an entry by slot id.
    #[inline]
    fn find(&self, slot: SlotId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&slot, |(id, _)| *id)
    }

    /// Returns the value stored in `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: SlotId) -> Option<&SlotValue> {
        self.find(slot).ok().map(|index| &self.entries[index].1)
    }

    /// Stores `value` in `slot`, replacing any previous value.
    pub fn set(&mut self, slot: SlotId, value: SlotValue) {
        match self.find(slot) {
            Ok(index) => self.entries[index].1 = value,
            Err(index) => self.entries.insert(index, (slot, value)),
        }
    }

    /// Returns `true` if `slot` has been written.
    #[must_use]
    pub fn has(&self, slot: SlotId) -> bool {
        self.find(slot).is_ok()
    }

    /// Removes the value stored in `slot`.
    ///
    /// Returns `true` if a value was removed.
    pub fn clear(&mut self, slot: SlotId) -> bool {
        if let Ok(index) = self.find(slot) {
            self.entries.remove(index);
            true
        } else {
            false
        }
    }

    /// Returns an iterator over the written slot ids, in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}

impl fmt::Debug for SlotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, value)| (id, value)))
            .finish()
    }
}

/// A live component instance.
///
/// An instance pairs an owner key (used in invalidation notifications) with
/// the sparse slot store holding its reactive state. Member access is
/// dispatched through the owning class's member table, so the class
/// definition is passed to every access method, mirroring how the slot
/// values belong to the instance while the behavior belongs to the class.
///
/// # Type Parameters
///
/// - `K`: The instance key type, typically a compact id. Must be
///   `Copy + Eq`.
///
/// # Example
///
/// ```rust
/// use arbor_component::{
///     ClassBuilder, ClassId, ComponentInstance, DecoratorRegistry, NoWiring,
///     RegisterDecoratorMetaBuilder, SlotValue, register_decorators,
/// };
///
/// const COUNTER: ClassId = ClassId::new(0);
///
/// let class = ClassBuilder::<u32>::new(COUNTER, "Counter").build();
/// let meta = RegisterDecoratorMetaBuilder::new()
///     .public_field("count", "number")
///     .build();
/// let mut registry = DecoratorRegistry::new();
/// let class = register_decorators(class, meta, &mut NoWiring, &mut registry);
///
/// let mut instance = ComponentInstance::new(1_u32, &class);
/// assert!(instance.get_member(&class, "count").unwrap().is_none());
///
/// let invalidate = instance
///     .set_member(&class, "count", SlotValue::new(5_i64))
///     .unwrap();
/// assert!(invalidate);
/// assert_eq!(
///     instance
///         .get_member(&class, "count")
///         .unwrap()
///         .unwrap()
///         .downcast_ref::<i64>(),
///     Some(&5)
/// );
/// ```
pub struct ComponentInstance<K> {
    key: K,
    class: ClassId,
    slots: SlotStore,
}

impl<K: Copy + Eq> ComponentInstance<K> {
    /// Creates a new instance of `class` identified by `key`.
    #[must_use]
    pub fn new(key: K, class: &ClassDefinition<K>) -> Self {
        Self {
            key,
            class: class.id(),
            slots: SlotStore::new(),
        }
    }

    /// Returns the key identifying this instance.
    #[must_use]
    #[inline]
    pub fn key(&self) -> K {
        self.key
    }

    /// Returns the id of the class this instance belongs to.
    #[must_use]
    #[inline]
    pub fn class_id(&self) -> ClassId {
        self.class
    }

    /// Returns the raw value of a backing slot, if written.
    ///
    /// This is the storage channel authored accessor bodies use; it never
    /// triggers invalidation and performs no member dispatch.
    #[must_use]
    pub fn slot(&self, slot: SlotId) -> Option<&SlotValue> {
        self.slots.get(slot)
    }

    /// Writes the raw value of a backing slot.
    ///
    /// Like [`slot`](Self::slot), this bypasses member dispatch and never
    /// triggers invalidation.
    pub fn set_slot(&mut self, slot: SlotId, value: SlotValue) {
        self.slots.set(slot, value);
    }

    /// Reads the member `name` through the class's member table.
    ///
    /// Returns `Ok(None)` for a reactive or wired field that has never been
    /// written (or had nothing delivered), and for a setter-only accessor.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownMember`] if no member exists under `name`.
    /// - [`AccessError::NotAProperty`] if the member is a method.
    pub fn get_member(
        &self,
        class: &ClassDefinition<K>,
        name: &'static str,
    ) -> Result<Option<SlotValue>, AccessError> {
        debug_assert_eq!(
            self.class,
            class.id(),
            "instance dispatched against a foreign class"
        );
        match class.member(name) {
            None => Err(AccessError::UnknownMember {
                class: class.name(),
                member: name,
            }),
            Some(MemberDescriptor::Method { .. }) => Err(AccessError::NotAProperty {
                class: class.name(),
                member: name,
            }),
            Some(
                MemberDescriptor::Accessor { getter, .. }
                | MemberDescriptor::ReactiveAccessor { getter, .. },
            ) => Ok(getter.as_ref().map(|get| get(self))),
            Some(
                MemberDescriptor::ReactiveField { slot, .. }
                | MemberDescriptor::WiredField { slot },
            ) => Ok(self.slots.get(*slot).cloned()),
        }
    }

    /// Writes the member `name` through the class's member table.
    ///
    /// Returns `Ok(true)` if the write is reactive and the caller must
    /// produce one invalidation notification (see
    /// [`set_member_notifying`](Self::set_member_notifying)), `Ok(false)`
    /// for a non-reactive authored accessor.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownMember`] if no member exists under `name`.
    /// - [`AccessError::NotAProperty`] if the member is a method.
    /// - [`AccessError::ReadOnly`] if the member is an accessor without a
    ///   setter.
    /// - [`AccessError::WiredAssignment`] if the member is a wired field;
    ///   wired fields are provider-driven and only writable through
    ///   [`receive_wired`](Self::receive_wired).
    pub fn set_member(
        &mut self,
        class: &ClassDefinition<K>,
        name: &'static str,
        value: SlotValue,
    ) -> Result<bool, AccessError> {
        debug_assert_eq!(
            self.class,
            class.id(),
            "instance dispatched against a foreign class"
        );
        match class.member(name) {
            None => Err(AccessError::UnknownMember {
                class: class.name(),
                member: name,
            }),
            Some(MemberDescriptor::Method { .. }) => Err(AccessError::NotAProperty {
                class: class.name(),
                member: name,
            }),
            Some(MemberDescriptor::ReactiveField { slot, .. }) => {
                self.slots.set(*slot, value);
                Ok(true)
            }
            Some(MemberDescriptor::ReactiveAccessor { setter, .. }) => match setter {
                Some(set) => {
                    set(self, value);
                    Ok(true)
                }
                None => Err(AccessError::ReadOnly {
                    class: class.name(),
                    member: name,
                }),
            },
            Some(MemberDescriptor::Accessor { setter, .. }) => match setter {
                Some(set) => {
                    set(self, value);
                    Ok(false)
                }
                None => Err(AccessError::ReadOnly {
                    class: class.name(),
                    member: name,
                }),
            },
            Some(MemberDescriptor::WiredField { .. }) => Err(AccessError::WiredAssignment {
                class: class.name(),
                member: name,
            }),
        }
    }

    /// Writes the member `name` and notifies `sink` when the write is
    /// reactive.
    ///
    /// This is the blessed write path for component code: exactly one
    /// invalidation notification per reactive write.
    ///
    /// # Errors
    ///
    /// Same as [`set_member`](Self::set_member).
    pub fn set_member_notifying(
        &mut self,
        class: &ClassDefinition<K>,
        name: &'static str,
        value: SlotValue,
        sink: &mut impl InvalidationSink<K>,
    ) -> Result<(), AccessError> {
        let key = self.key;
        if self.set_member(class, name, value)? {
            sink.invalidate(key);
        }
        Ok(())
    }

    /// Invokes the method `name` with `arg`.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownMember`] if no member exists under `name`.
    /// - [`AccessError::NotAMethod`] if the member is not a method.
    pub fn invoke(
        &mut self,
        class: &ClassDefinition<K>,
        name: &'static str,
        arg: SlotValue,
    ) -> Result<SlotValue, AccessError> {
        debug_assert_eq!(
            self.class,
            class.id(),
            "instance dispatched against a foreign class"
        );
        match class.member(name) {
            None => Err(AccessError::UnknownMember {
                class: class.name(),
                member: name,
            }),
            Some(MemberDescriptor::Method { body, .. }) => Ok(body(self, arg)),
            Some(_) => Err(AccessError::NotAMethod {
                class: class.name(),
                member: name,
            }),
        }
    }

    /// Delivers a wire-adapter value into the wired field `name`.
    ///
    /// This is the internal provisioning channel: the only write path into
    /// a wired field. The caller (the wiring subsystem) is responsible for
    /// producing the re-render notification after a delivery.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownMember`] if no member exists under `name`.
    /// - [`AccessError::NotWired`] if the member is not a wired field.
    pub fn receive_wired(
        &mut self,
        class: &ClassDefinition<K>,
        name: &'static str,
        value: SlotValue,
    ) -> Result<(), AccessError> {
        debug_assert_eq!(
            self.class,
            class.id(),
            "instance dispatched against a foreign class"
        );
        match class.member(name) {
            None => Err(AccessError::UnknownMember {
                class: class.name(),
                member: name,
            }),
            Some(MemberDescriptor::WiredField { slot }) => {
                self.slots.set(*slot, value);
                Ok(())
            }
            Some(_) => Err(AccessError::NotWired {
                class: class.name(),
                member: name,
            }),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for ComponentInstance<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("key", &self.key)
            .field("class", &self.class)
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// A member-access error.
///
/// These are always-active runtime errors: unlike registration validation,
/// they reflect misuse that is reachable in production builds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// No member exists under the given name.
    UnknownMember {
        /// The class name.
        class: &'static str,
        /// The member name.
        member: &'static str,
    },
    /// The member is a method; it cannot be read or written as a property.
    NotAProperty {
        /// The class name.
        class: &'static str,
        /// The member name.
        member: &'static str,
    },
    /// The member is not a method; it cannot be invoked.
    NotAMethod {
        /// The class name.
        class: &'static str,
        /// The member name.
        member: &'static str,
    },
    /// The member is an accessor without a setter.
    ReadOnly {
        /// The class name.
        class: &'static str,
        /// The member name.
        member: &'static str,
    },
    /// The member is a wired field, writable only by its wire adapter.
    WiredAssignment {
        /// The class name.
        class: &'static str,
        /// The member name.
        member: &'static str,
    },
    /// The member is not a wired field; the provisioning channel cannot
    /// deliver into it.
    NotWired {
        /// The class name.
        class: &'static str,
        /// The member name.
        member: &'static str,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMember { class, member } => {
                write!(f, "class `{class}` has no member `{member}`")
            }
            Self::NotAProperty { class, member } => {
                write!(
                    f,
                    "member `{member}` of class `{class}` is a method, not a property"
                )
            }
            Self::NotAMethod { class, member } => {
                write!(
                    f,
                    "member `{member}` of class `{class}` is not a callable method"
                )
            }
            Self::ReadOnly { class, member } => {
                write!(f, "property `{member}` of class `{class}` has no setter")
            }
            Self::WiredAssignment { class, member } => {
                write!(
                    f,
                    "property `{member}` of class `{class}` is owned by its wire \
                     adapter and cannot be assigned from component code"
                )
            }
            Self::NotWired { class, member } => {
                write!(f, "member `{member}` of class `{class}` is not a wired field")
            }
        }
    }
}

impl core::error::Error for AccessError {}
