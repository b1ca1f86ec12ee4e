// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance hookup: resolving configurations and delivering values.

use arbor_component::{AccessError, ClassDefinition, ComponentInstance, SlotValue};
use arbor_reactive::InvalidationSink;

use crate::registry::{WireRegistry, WireTarget};

/// Connects a freshly constructed instance to its class's wire bindings.
///
/// For every binding recorded for the class, this resolves the binding's
/// configuration over the instance and pulls the adapter's current value.
/// Available values are delivered: field bindings store through the
/// provisioning channel and notify `sink`; method bindings invoke the
/// authored body with the value. Adapters with nothing to provide yet are
/// skipped; their fields read as unset until a later delivery.
///
/// Returns the number of values delivered.
///
/// # Errors
///
/// Returns an [`AccessError`] if a field binding's member is missing or
/// not wired on the class, which means the binding table and the class
/// were registered inconsistently.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use arbor_component::{
///     AdapterRef, ClassBuilder, ClassId, ComponentInstance, DecoratorRegistry,
///     RegisterDecoratorMetaBuilder, SlotValue, WireAdapter, WireConfig,
///     WireConfigFn, register_decorators,
/// };
/// use arbor_reactive::InvalidationLog;
/// use arbor_wire::{WireRegistry, connect_instance};
///
/// struct VersionAdapter;
///
/// impl WireAdapter for VersionAdapter {
///     fn adapter_name(&self) -> &'static str {
///         "version"
///     }
///
///     fn provide(&self, _config: &WireConfig) -> Option<SlotValue> {
///         Some(SlotValue::new(3_i64))
///     }
/// }
///
/// const PANEL: ClassId = ClassId::new(0);
///
/// let class = ClassBuilder::<u32>::new(PANEL, "Panel").build();
/// let config: WireConfigFn<u32> = Arc::new(|_| WireConfig::new());
/// let meta = RegisterDecoratorMetaBuilder::new()
///     .wire_field("version", AdapterRef::new(VersionAdapter), config)
///     .build();
///
/// let mut wiring = WireRegistry::new();
/// let mut registry = DecoratorRegistry::new();
/// let class = register_decorators(class, meta, &mut wiring, &mut registry);
///
/// let mut instance = ComponentInstance::new(1_u32, &class);
/// let mut log = InvalidationLog::new();
/// let delivered = connect_instance(&wiring, &class, &mut instance, &mut log).unwrap();
///
/// assert_eq!(delivered, 1);
/// assert_eq!(log.count_for(1), 1);
/// assert_eq!(
///     instance
///         .get_member(&class, "version")
///         .unwrap()
///         .unwrap()
///         .downcast_ref::<i64>(),
///     Some(&3)
/// );
/// ```
pub fn connect_instance<K: Copy + Eq>(
    wiring: &WireRegistry<K>,
    class: &ClassDefinition<K>,
    instance: &mut ComponentInstance<K>,
    sink: &mut impl InvalidationSink<K>,
) -> Result<usize, AccessError> {
    let mut delivered = 0;
    for binding in wiring.bindings_for(class.id()) {
        let config = (binding.config())(instance);
        let Some(value) = binding.adapter().provide(&config) else {
            continue;
        };
        match binding.target() {
            WireTarget::Field => {
                deliver_field(class, instance, binding.member(), value, sink)?;
            }
            WireTarget::Method(body) => {
                let _ = body(instance, value);
            }
        }
        delivered += 1;
    }
    Ok(delivered)
}

/// Delivers one adapter value into a wired field and notifies `sink`.
///
/// This is the push path adapters use after construction: the value goes
/// through the provisioning channel and the instance is marked for
/// re-render.
///
/// # Errors
///
/// Returns an [`AccessError`] if `member` is missing or not a wired field
/// on the class.
pub fn deliver_field<K: Copy + Eq>(
    class: &ClassDefinition<K>,
    instance: &mut ComponentInstance<K>,
    member: &'static str,
    value: SlotValue,
    sink: &mut impl InvalidationSink<K>,
) -> Result<(), AccessError> {
    instance.receive_wired(class, member, value)?;
    sink.invalidate(instance.key());
    Ok(())
}
