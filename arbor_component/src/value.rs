// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased slot value storage.
//!
//! This module provides [`SlotValue`] for storing member values of any type
//! in the per-instance slot store.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

/// A type-erased member value.
///
/// This wraps a value of any `'static + Clone` type, storing it on the heap
/// together with its type information for later downcasting. The concrete
/// type's name is captured as well, so member-access diagnostics can say
/// what a slot actually holds.
///
/// # Example
///
/// ```rust
/// use arbor_component::SlotValue;
///
/// let value = SlotValue::new(42_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
/// assert_eq!(value.type_name(), "i32");
///
/// let cloned = value.clone();
/// assert_eq!(cloned.downcast_ref::<i32>(), Some(&42));
/// ```
pub struct SlotValue {
    inner: Box<dyn ValueCell>,
    type_id: TypeId,
    type_name: &'static str,
}

impl SlotValue {
    /// Creates a new erased value from a concrete value.
    #[must_use]
    pub fn new<T: Clone + 'static>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            inner: Box::new(value),
        }
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name of the contained value.
    ///
    /// This is the `core::any::type_name` string captured at construction;
    /// it is meant for diagnostics, not for type checks (use
    /// [`is`](Self::is) for those).
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }

    /// Extracts the contained value by cloning it out.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    pub fn extract<T: Clone + 'static>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl Clone for SlotValue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_cell(),
            type_id: self.type_id,
            type_name: self.type_name,
        }
    }
}

impl fmt::Debug for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Trait object for type-erased values that can be cloned.
trait ValueCell: Any {
    fn as_any(&self) -> &dyn Any;
    fn clone_cell(&self) -> Box<dyn ValueCell>;
}

impl<T: Clone + 'static> ValueCell for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_cell(&self) -> Box<dyn ValueCell> {
        Box::new(self.clone())
    }
}
