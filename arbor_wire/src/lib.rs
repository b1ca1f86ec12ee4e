// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Wire: the wiring subsystem's binding table and instance hookup.
//!
//! Decorator registration records each `wire` decorator here, once per
//! class, through the [`WireMetaSink`](arbor_component::WireMetaSink) write
//! path. When an instance is constructed, [`connect_instance`] consults the
//! table, resolves every binding's configuration against the instance, and
//! delivers the adapters' current values: into wired fields through the
//! provisioning channel (marking the instance for re-render) or into bound
//! methods by invoking the authored body.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use arbor_component::{
//!     AdapterRef, ClassBuilder, ClassId, ComponentInstance, DecoratorRegistry,
//!     RegisterDecoratorMetaBuilder, SlotValue, WireAdapter, WireConfig,
//!     WireConfigFn, register_decorators,
//! };
//! use arbor_reactive::InvalidationLog;
//! use arbor_wire::{WireRegistry, connect_instance};
//!
//! // An adapter that resolves a record name from its configuration.
//! struct TodoAdapter;
//!
//! impl WireAdapter for TodoAdapter {
//!     fn adapter_name(&self) -> &'static str {
//!         "todo"
//!     }
//!
//!     fn provide(&self, config: &WireConfig) -> Option<SlotValue> {
//!         let id = config.get("id")?.downcast_ref::<i64>()?;
//!         Some(SlotValue::new(format!("todo #{id}")))
//!     }
//! }
//!
//! const CARD: ClassId = ClassId::new(3);
//!
//! let class = ClassBuilder::<u32>::new(CARD, "TodoCard").build();
//! let config: WireConfigFn<u32> =
//!     Arc::new(|_| WireConfig::new().with("id", SlotValue::new(7_i64)));
//! let meta = RegisterDecoratorMetaBuilder::new()
//!     .wire_field("todo", AdapterRef::new(TodoAdapter), config)
//!     .build();
//!
//! let mut wiring = WireRegistry::new();
//! let mut registry = DecoratorRegistry::new();
//! let class = register_decorators(class, meta, &mut wiring, &mut registry);
//! assert_eq!(registry.lookup(CARD).wired_fields(), &["todo"]);
//!
//! let mut card = ComponentInstance::new(1_u32, &class);
//! let mut log = InvalidationLog::new();
//! let delivered = connect_instance(&wiring, &class, &mut card, &mut log).unwrap();
//!
//! assert_eq!(delivered, 1);
//! assert_eq!(
//!     card.get_member(&class, "todo")
//!         .unwrap()
//!         .unwrap()
//!         .downcast_ref::<String>()
//!         .map(String::as_str),
//!     Some("todo #7")
//! );
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod hookup;
mod registry;

pub use hookup::{connect_instance, deliver_field};
pub use registry::{WireBinding, WireRegistry, WireTarget};
