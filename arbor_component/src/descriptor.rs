// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Member descriptors and the descriptor factories.
//!
//! A [`MemberDescriptor`] is one entry in a class's member table. Authored
//! members (methods, getter/setter pairs) are placed there by
//! [`ClassBuilder`](crate::ClassBuilder); decorator registration replaces or
//! adds entries using the factory functions in this module.

use alloc::sync::Arc;
use core::fmt;

use crate::class::SlotId;
use crate::instance::ComponentInstance;
use crate::value::SlotValue;

/// An authored getter body.
///
/// Getters receive the instance and produce the property value. They are
/// shared (`Arc`) because wrapping an accessor keeps the authored body.
pub type GetterFn<K> = Arc<dyn Fn(&ComponentInstance<K>) -> SlotValue + Send + Sync>;

/// An authored setter body.
pub type SetterFn<K> = Arc<dyn Fn(&mut ComponentInstance<K>, SlotValue) + Send + Sync>;

/// An authored method body.
///
/// Methods receive the instance and a single argument value. They are shared
/// (`Arc`) because wired method bindings record the authored body in the
/// wiring table while the member table keeps it callable.
pub type MethodFn<K> =
    Arc<dyn Fn(&mut ComponentInstance<K>, SlotValue) -> SlotValue + Send + Sync>;

/// Whether a reactive field is part of the class's public API surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldVisibility {
    /// The field is public API, recorded in the class's resolved metadata.
    Public,
    /// The field is internal reactive state, invisible to API introspection.
    Tracked,
}

/// One entry in a class's member table.
///
/// The first two variants are authored by the component author and placed by
/// [`ClassBuilder`](crate::ClassBuilder); the remaining variants are
/// installed by decorator registration.
pub enum MemberDescriptor<K> {
    /// An authored method body.
    Method {
        /// The method body.
        body: MethodFn<K>,
        /// Whether the member can be redefined. Registration rejects
        /// decorators on non-writable methods.
        writable: bool,
    },
    /// An authored getter/setter pair, not (or not yet) public API.
    Accessor {
        /// The authored getter, if one was declared.
        getter: Option<GetterFn<K>>,
        /// The authored setter, if one was declared.
        setter: Option<SetterFn<K>>,
    },
    /// A reactive field over a private backing slot. Writes invalidate.
    ReactiveField {
        /// The backing slot in the instance's slot store.
        slot: SlotId,
        /// Public API field or internal tracked state.
        visibility: FieldVisibility,
    },
    /// A public accessor wrapping an authored getter/setter pair.
    ///
    /// The getter delegates unchanged; the setter delegates and then
    /// invalidates.
    ReactiveAccessor {
        /// The wrapped authored getter.
        getter: Option<GetterFn<K>>,
        /// The wrapped authored setter.
        setter: Option<SetterFn<K>>,
    },
    /// A field owned by a wire adapter.
    ///
    /// Reads return the most recently delivered value; writes from component
    /// code fail with [`AccessError::WiredAssignment`]. Only the
    /// provisioning channel
    /// ([`ComponentInstance::receive_wired`](crate::ComponentInstance::receive_wired))
    /// stores into the backing slot.
    ///
    /// [`AccessError::WiredAssignment`]: crate::AccessError::WiredAssignment
    WiredField {
        /// The backing slot in the instance's slot store.
        slot: SlotId,
    },
}

/// The structural shape of a member, as seen by registration validation.
///
/// This is the capability-query view of the member table: validation only
/// needs to know what kind of thing a name resolves to, never the bodies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemberShape {
    /// A callable member.
    Method {
        /// Whether the member can be redefined.
        writable: bool,
    },
    /// A getter/setter pair.
    Accessor {
        /// Whether a getter is declared.
        has_getter: bool,
        /// Whether a setter is declared.
        has_setter: bool,
    },
    /// An installed field descriptor (reactive, tracked, or wired).
    Field,
}

impl<K> MemberDescriptor<K> {
    /// Returns the structural shape of this member.
    #[must_use]
    pub fn shape(&self) -> MemberShape {
        match self {
            Self::Method { writable, .. } => MemberShape::Method {
                writable: *writable,
            },
            Self::Accessor { getter, setter } | Self::ReactiveAccessor { getter, setter } => {
                MemberShape::Accessor {
                    has_getter: getter.is_some(),
                    has_setter: setter.is_some(),
                }
            }
            Self::ReactiveField { .. } | Self::WiredField { .. } => MemberShape::Field,
        }
    }
}

impl<K> fmt::Debug for MemberDescriptor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method { writable, .. } => f
                .debug_struct("Method")
                .field("writable", writable)
                .finish_non_exhaustive(),
            Self::Accessor { getter, setter } => f
                .debug_struct("Accessor")
                .field("has_getter", &getter.is_some())
                .field("has_setter", &setter.is_some())
                .finish(),
            Self::ReactiveField { slot, visibility } => f
                .debug_struct("ReactiveField")
                .field("slot", slot)
                .field("visibility", visibility)
                .finish(),
            Self::ReactiveAccessor { getter, setter } => f
                .debug_struct("ReactiveAccessor")
                .field("has_getter", &getter.is_some())
                .field("has_setter", &setter.is_some())
                .finish(),
            Self::WiredField { slot } => {
                f.debug_struct("WiredField").field("slot", slot).finish()
            }
        }
    }
}

/// Builds the descriptor for a plain public reactive field.
///
/// The field reads from and writes to a private backing slot; every write
/// produces one invalidation notification. Before the first write the field
/// reads as unset.
#[must_use]
pub fn public_property_descriptor<K>(slot: SlotId) -> MemberDescriptor<K> {
    MemberDescriptor::ReactiveField {
        slot,
        visibility: FieldVisibility::Public,
    }
}

/// Builds the descriptor for a public accessor-backed property.
///
/// The authored getter (always) and setter (when present) are kept: the
/// getter delegates unchanged, and the setter delegates to the authored body
/// before the write is reported for invalidation.
#[must_use]
pub fn public_accessor_descriptor<K>(
    getter: Option<GetterFn<K>>,
    setter: Option<SetterFn<K>>,
) -> MemberDescriptor<K> {
    MemberDescriptor::ReactiveAccessor { getter, setter }
}

/// Builds the descriptor for an internal tracked field.
///
/// Functionally identical to [`public_property_descriptor`] on write, but
/// the field is not recorded as public API surface.
#[must_use]
pub fn tracked_field_descriptor<K>(slot: SlotId) -> MemberDescriptor<K> {
    MemberDescriptor::ReactiveField {
        slot,
        visibility: FieldVisibility::Tracked,
    }
}

/// Builds the descriptor for a wire-adapter-owned field.
#[must_use]
pub fn wired_field_descriptor<K>(slot: SlotId) -> MemberDescriptor<K> {
    MemberDescriptor::WiredField { slot }
}
