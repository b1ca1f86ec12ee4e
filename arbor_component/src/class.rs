// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class identity and the class member table.
//!
//! This module provides [`ClassId`] for component class identity,
//! [`ClassDefinition`] holding a class's member table, and [`ClassBuilder`]
//! through which compiled component code declares its authored members
//! before decorator registration runs.

use alloc::sync::Arc;
use core::fmt;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::descriptor::{MemberDescriptor, MemberShape, MethodFn};
use crate::instance::ComponentInstance;
use crate::value::SlotValue;

/// A component class identifier.
///
/// Class identity is reference identity in the compiled module system; this
/// runtime represents it as a compact handle that compiled code declares
/// once per class, the way invalidation consumers declare their keys:
///
/// ```rust
/// use arbor_component::ClassId;
///
/// const COUNTER: ClassId = ClassId::new(0);
/// const TODO_LIST: ClassId = ClassId::new(1);
/// ```
///
/// A class is defined once, registered once, and lives for the process
/// lifetime; ids are never reused.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u32);

impl ClassId {
    /// Creates a new class id from the given index.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this class id.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassId").field(&self.0).finish()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// A backing slot identifier within one class's instances.
///
/// Slots are allocated per class (by the builder for accessor backing
/// storage, and by registration for reactive and wired fields) and index
/// into each instance's sparse [`SlotStore`](crate::SlotStore). The `u16`
/// size keeps per-instance entries compact; a class has at most 65,535
/// slots.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u16);

impl SlotId {
    /// Creates a new slot id from the given index.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this slot id.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotId").field(&self.0).finish()
    }
}

/// A component class: identity, name, and member table.
///
/// Compiled component code builds one `ClassDefinition` per class via
/// [`ClassBuilder`], then hands it to
/// [`register_decorators`](crate::register_decorators) exactly once, before
/// any instance is constructed. Registration installs reactive and wired
/// member descriptors over the authored ones.
///
/// # Type Parameters
///
/// - `K`: The instance key type carried by
///   [`ComponentInstance`](crate::ComponentInstance), typically a compact
///   id. Must be `Copy + Eq`.
pub struct ClassDefinition<K> {
    id: ClassId,
    name: &'static str,
    members: HashMap<&'static str, MemberDescriptor<K>>,
    slot_count: u16,
}

impl<K> ClassDefinition<K> {
    /// Returns this class's id.
    #[must_use]
    #[inline]
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Returns this class's name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the member descriptor declared or installed under `name`.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor<K>> {
        self.members.get(name)
    }

    /// Returns the structural shape of the member under `name`.
    ///
    /// This is the capability query used by registration validation: it
    /// answers "does this class declare an own method/accessor/field named
    /// `name`" without exposing the member bodies.
    #[must_use]
    pub fn member_shape(&self, name: &str) -> Option<MemberShape> {
        self.members.get(name).map(MemberDescriptor::shape)
    }

    /// Returns `true` if a member exists under `name`.
    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Returns the number of members in the table.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Returns an iterator over the member names in the table.
    ///
    /// Order is unspecified; declaration order lives in the resolved
    /// decorator metadata, not the member table.
    pub fn member_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.keys().copied()
    }

    /// Returns the number of backing slots instances of this class carry.
    #[must_use]
    #[inline]
    pub fn slot_count(&self) -> u16 {
        self.slot_count
    }

    /// Installs `descriptor` under `name`, overwriting any existing entry.
    pub(crate) fn install(&mut self, name: &'static str, descriptor: MemberDescriptor<K>) {
        self.members.insert(name, descriptor);
    }

    /// Allocates a fresh backing slot.
    ///
    /// # Panics
    ///
    /// Panics if the class exhausts its 65,535 slots.
    pub(crate) fn allocate_slot(&mut self) -> SlotId {
        assert!(
            self.slot_count < u16::MAX,
            "class `{}` has too many backing slots (max {})",
            self.name,
            u16::MAX
        );
        let slot = SlotId::new(self.slot_count);
        self.slot_count += 1;
        slot
    }
}

impl<K> fmt::Debug for ClassDefinition<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("members", &self.members.len())
            .field("slot_count", &self.slot_count)
            .finish()
    }
}

/// Builder for [`ClassDefinition`].
///
/// This is the surface compiled component code uses to declare authored
/// members: methods and getter/setter pairs. Plain fields never appear here;
/// they only exist as compiler metadata and become member descriptors during
/// registration.
///
/// # Example
///
/// ```rust
/// use arbor_component::{ClassBuilder, ClassId, SlotValue};
///
/// const BADGE: ClassId = ClassId::new(9);
///
/// let mut builder = ClassBuilder::<u32>::new(BADGE, "Badge");
/// let backing = builder.backing_slot();
///
/// let class = builder
///     .getter("label", move |inst| {
///         inst.slot(backing)
///             .cloned()
///             .unwrap_or_else(|| SlotValue::new(""))
///     })
///     .setter("label", move |inst, value| inst.set_slot(backing, value))
///     .method("reset", move |inst, _arg| {
///         inst.set_slot(backing, SlotValue::new(""));
///         SlotValue::new(())
///     })
///     .build();
///
/// assert_eq!(class.name(), "Badge");
/// assert!(class.has_member("label"));
/// assert!(class.has_member("reset"));
/// ```
pub struct ClassBuilder<K> {
    id: ClassId,
    name: &'static str,
    members: HashMap<&'static str, MemberDescriptor<K>>,
    slot_count: u16,
}

impl<K> ClassBuilder<K> {
    /// Creates a builder for the class identified by `id`.
    #[must_use]
    pub fn new(id: ClassId, name: &'static str) -> Self {
        Self {
            id,
            name,
            members: HashMap::new(),
            slot_count: 0,
        }
    }

    /// Allocates a private backing slot for authored accessor storage.
    ///
    /// Accessor bodies capture the returned [`SlotId`] and read/write it via
    /// [`ComponentInstance::slot`](crate::ComponentInstance::slot) and
    /// [`ComponentInstance::set_slot`](crate::ComponentInstance::set_slot).
    pub fn backing_slot(&mut self) -> SlotId {
        assert!(
            self.slot_count < u16::MAX,
            "class `{}` has too many backing slots (max {})",
            self.name,
            u16::MAX
        );
        let slot = SlotId::new(self.slot_count);
        self.slot_count += 1;
        slot
    }

    /// Declares an authored method.
    ///
    /// # Panics
    ///
    /// Panics if a member is already declared under `name`.
    #[must_use]
    pub fn method<F>(self, name: &'static str, body: F) -> Self
    where
        F: Fn(&mut ComponentInstance<K>, SlotValue) -> SlotValue + Send + Sync + 'static,
    {
        self.insert_method(name, Arc::new(body), true)
    }

    /// Declares an authored method whose `writable` attribute is `false`.
    ///
    /// Decorator registration rejects public or wired method decorators on
    /// frozen methods.
    ///
    /// # Panics
    ///
    /// Panics if a member is already declared under `name`.
    #[must_use]
    pub fn frozen_method<F>(self, name: &'static str, body: F) -> Self
    where
        F: Fn(&mut ComponentInstance<K>, SlotValue) -> SlotValue + Send + Sync + 'static,
    {
        self.insert_method(name, Arc::new(body), false)
    }

    /// Declares an authored getter under `name`.
    ///
    /// A getter and a setter under the same name merge into one accessor
    /// member.
    ///
    /// # Panics
    ///
    /// Panics if a non-accessor member is already declared under `name`, or
    /// if a getter is already declared for it.
    #[must_use]
    pub fn getter<F>(mut self, name: &'static str, get: F) -> Self
    where
        F: Fn(&ComponentInstance<K>) -> SlotValue + Send + Sync + 'static,
    {
        match self.members.entry(name) {
            Entry::Occupied(mut occupied) => match occupied.get_mut() {
                MemberDescriptor::Accessor { getter, .. } => {
                    assert!(
                        getter.is_none(),
                        "class `{}` already declares a getter for `{name}`",
                        self.name
                    );
                    *getter = Some(Arc::new(get));
                }
                _ => panic!("class `{}` already declares a member `{name}`", self.name),
            },
            Entry::Vacant(vacant) => {
                vacant.insert(MemberDescriptor::Accessor {
                    getter: Some(Arc::new(get)),
                    setter: None,
                });
            }
        }
        self
    }

    /// Declares an authored setter under `name`.
    ///
    /// A getter and a setter under the same name merge into one accessor
    /// member.
    ///
    /// # Panics
    ///
    /// Panics if a non-accessor member is already declared under `name`, or
    /// if a setter is already declared for it.
    #[must_use]
    pub fn setter<F>(mut self, name: &'static str, set: F) -> Self
    where
        F: Fn(&mut ComponentInstance<K>, SlotValue) + Send + Sync + 'static,
    {
        match self.members.entry(name) {
            Entry::Occupied(mut occupied) => match occupied.get_mut() {
                MemberDescriptor::Accessor { setter, .. } => {
                    assert!(
                        setter.is_none(),
                        "class `{}` already declares a setter for `{name}`",
                        self.name
                    );
                    *setter = Some(Arc::new(set));
                }
                _ => panic!("class `{}` already declares a member `{name}`", self.name),
            },
            Entry::Vacant(vacant) => {
                vacant.insert(MemberDescriptor::Accessor {
                    getter: None,
                    setter: Some(Arc::new(set)),
                });
            }
        }
        self
    }

    /// Builds the [`ClassDefinition`].
    #[must_use]
    pub fn build(self) -> ClassDefinition<K> {
        ClassDefinition {
            id: self.id,
            name: self.name,
            members: self.members,
            slot_count: self.slot_count,
        }
    }

    fn insert_method(mut self, name: &'static str, body: MethodFn<K>, writable: bool) -> Self {
        match self.members.entry(name) {
            Entry::Occupied(_) => {
                panic!("class `{}` already declares a member `{name}`", self.name)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(MemberDescriptor::Method { body, writable });
            }
        }
        self
    }
}

impl<K> fmt::Debug for ClassBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassBuilder")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("members", &self.members.len())
            .field("slot_count", &self.slot_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: ClassId = ClassId::new(1);

    #[test]
    fn class_id_basics() {
        let id = ClassId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id, ClassId::new(42));
        assert_ne!(id, ClassId::new(43));
    }

    #[test]
    fn slot_id_basics() {
        let slot = SlotId::new(3);
        assert_eq!(slot.index(), 3);
        assert!(SlotId::new(1) < SlotId::new(2));
    }

    #[test]
    fn builder_empty_class() {
        let class = ClassBuilder::<u32>::new(WIDGET, "Widget").build();
        assert_eq!(class.id(), WIDGET);
        assert_eq!(class.name(), "Widget");
        assert_eq!(class.member_count(), 0);
        assert_eq!(class.slot_count(), 0);
        assert!(class.member("missing").is_none());
    }

    #[test]
    fn builder_declares_method() {
        let class = ClassBuilder::<u32>::new(WIDGET, "Widget")
            .method("refresh", |_, arg| arg)
            .build();

        assert_eq!(
            class.member_shape("refresh"),
            Some(MemberShape::Method { writable: true })
        );
    }

    #[test]
    fn builder_frozen_method() {
        let class = ClassBuilder::<u32>::new(WIDGET, "Widget")
            .frozen_method("locked", |_, arg| arg)
            .build();

        assert_eq!(
            class.member_shape("locked"),
            Some(MemberShape::Method { writable: false })
        );
    }

    #[test]
    fn builder_merges_getter_and_setter() {
        let mut builder = ClassBuilder::<u32>::new(WIDGET, "Widget");
        let backing = builder.backing_slot();

        let class = builder
            .getter("label", move |inst| {
                inst.slot(backing)
                    .cloned()
                    .unwrap_or_else(|| SlotValue::new(""))
            })
            .setter("label", move |inst, value| inst.set_slot(backing, value))
            .build();

        assert_eq!(
            class.member_shape("label"),
            Some(MemberShape::Accessor {
                has_getter: true,
                has_setter: true,
            })
        );
        assert_eq!(class.slot_count(), 1);
    }

    #[test]
    fn builder_getter_only_accessor() {
        let class = ClassBuilder::<u32>::new(WIDGET, "Widget")
            .getter("version", |_| SlotValue::new(2_i32))
            .build();

        assert_eq!(
            class.member_shape("version"),
            Some(MemberShape::Accessor {
                has_getter: true,
                has_setter: false,
            })
        );
    }

    #[test]
    #[should_panic(expected = "already declares a member `label`")]
    fn builder_rejects_method_over_accessor() {
        let _ = ClassBuilder::<u32>::new(WIDGET, "Widget")
            .getter("label", |_| SlotValue::new(""))
            .method("label", |_, arg| arg);
    }

    #[test]
    #[should_panic(expected = "already declares a getter for `label`")]
    fn builder_rejects_duplicate_getter() {
        let _ = ClassBuilder::<u32>::new(WIDGET, "Widget")
            .getter("label", |_| SlotValue::new(""))
            .getter("label", |_| SlotValue::new(""));
    }

    #[test]
    fn allocate_slot_advances() {
        let mut class = ClassBuilder::<u32>::new(WIDGET, "Widget").build();
        let first = class.allocate_slot();
        let second = class.allocate_slot();

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(class.slot_count(), 2);
    }
}
