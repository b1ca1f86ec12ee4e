// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Component: decorator registration and class metadata runtime.
//!
//! This crate is the contract boundary between compiled component code and
//! the reactivity system. Compiled code hands over a class definition plus
//! the compiler-emitted decorator metadata; registration validates the
//! metadata against the class shape, installs reactive member descriptors,
//! records wire bindings with the wiring subsystem, and stores the resolved
//! per-class metadata for the rendering engine.
//!
//! ## Core Concepts
//!
//! ### Classes and Instances
//!
//! A [`ClassDefinition`] owns a member table of [`MemberDescriptor`]s;
//! authored members (methods, getter/setter pairs) are declared through
//! [`ClassBuilder`]. A [`ComponentInstance`] holds the per-instance slot
//! values and dispatches member access through its class.
//!
//! ### Registration
//!
//! [`register_decorators`] runs exactly once per class, before any instance
//! exists. It processes five optional metadata categories in order: public
//! properties, public methods, wire bindings, tracked fields, and observed
//! fields. Development builds validate every name against the actual class
//! shape; release builds trust the compiler.
//!
//! ### Resolved Metadata
//!
//! The [`DecoratorRegistry`] maps class identity to the resolved
//! [`DecoratorMeta`]: which members are public API, which are wired.
//! Tracked fields are reactive but appear in no list; that is what makes
//! them private.
//!
//! ## Quick Start
//!
//! ```rust
//! use arbor_component::{
//!     ClassBuilder, ClassId, ComponentInstance, DecoratorRegistry, NoWiring,
//!     RegisterDecoratorMetaBuilder, SlotValue, register_decorators,
//! };
//! use arbor_reactive::InvalidationLog;
//!
//! const COUNTER: ClassId = ClassId::new(0);
//!
//! // Compiled component code: declare the class, then register its
//! // decorator metadata.
//! let class = ClassBuilder::<u32>::new(COUNTER, "Counter").build();
//! let meta = RegisterDecoratorMetaBuilder::new()
//!     .public_field("count", "number")
//!     .track("frame")
//!     .build();
//!
//! let mut registry = DecoratorRegistry::new();
//! let class = register_decorators(class, meta, &mut NoWiring, &mut registry);
//!
//! // The rendering engine sees `count` as public API; `frame` stays
//! // private reactive state.
//! assert_eq!(registry.lookup(COUNTER).api_fields(), &["count"]);
//! assert!(!registry.lookup(COUNTER).is_api_field("frame"));
//!
//! // Writes through either field invalidate the instance.
//! let mut log = InvalidationLog::new();
//! let mut counter = ComponentInstance::new(1_u32, &class);
//! counter
//!     .set_member_notifying(&class, "count", SlotValue::new(1_i64), &mut log)
//!     .unwrap();
//! counter
//!     .set_member_notifying(&class, "frame", SlotValue::new(16_i32), &mut log)
//!     .unwrap();
//! assert_eq!(log.count_for(1), 2);
//! ```
//!
//! ## Validation
//!
//! Structural validation (does the decorated name exist, is it the right
//! shape, is it claimed twice) runs only in builds with `debug_assertions`
//! and fails registration unconditionally; a mismatch means the compiler
//! and runtime disagree, which no runtime handling can repair. The one
//! always-active error is [`AccessError::WiredAssignment`]: component code
//! writing to an adapter-owned field is real runtime misuse, reachable in
//! production.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod class;
mod descriptor;
mod instance;
mod meta;
mod registration;
mod registry;
mod validate;
mod value;
mod wiring;

pub use class::{ClassBuilder, ClassDefinition, ClassId, SlotId};
pub use descriptor::{
    FieldVisibility, GetterFn, MemberDescriptor, MemberShape, MethodFn, SetterFn,
    public_accessor_descriptor, public_property_descriptor, tracked_field_descriptor,
    wired_field_descriptor,
};
pub use instance::{AccessError, ComponentInstance, SlotStore};
pub use meta::{
    DecoratorMeta, PropConfig, PublicPropMeta, RegisterDecoratorMeta,
    RegisterDecoratorMetaBuilder, WireMeta, WireTargetKind,
};
pub use registration::{plan_registration, register_decorators, try_register_decorators};
pub use registry::DecoratorRegistry;
pub use validate::{DecoratorKind, RegistrationError, ShapeProblem};
pub use value::SlotValue;
pub use wiring::{AdapterRef, NoWiring, WireAdapter, WireConfig, WireConfigFn, WireMetaSink};
