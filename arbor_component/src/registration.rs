// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The decorator registration orchestrator.
//!
//! Compiled component code calls [`register_decorators`] exactly once per
//! class, before any instance of that class is constructed. Registration is
//! split into a pure decision layer and an application layer:
//!
//! - [`plan_registration`] validates the compiler metadata against the
//!   class shape (development builds only) and resolves the final
//!   [`DecoratorMeta`], touching nothing.
//! - [`try_register_decorators`] applies an accepted plan: member
//!   descriptors are installed in declaration order, wire bindings are
//!   recorded through the [`WireMetaSink`], and the resolved metadata is
//!   stored in the [`DecoratorRegistry`], always last.
//!
//! Because planning is pure, a rejected registration mutates neither the
//! member table nor either registry.

use alloc::vec::Vec;

use crate::class::ClassDefinition;
use crate::descriptor::{
    MemberDescriptor, public_accessor_descriptor, public_property_descriptor,
    tracked_field_descriptor, wired_field_descriptor,
};
use crate::meta::{DecoratorMeta, RegisterDecoratorMeta, WireTargetKind};
use crate::registry::DecoratorRegistry;
use crate::validate::{self, ClaimedNames, DecoratorKind, RegistrationError};
use crate::wiring::WireMetaSink;

/// Validates `meta` against the class shape and resolves the final
/// [`DecoratorMeta`], without mutating anything.
///
/// Categories are processed in installation order (public properties,
/// public methods, wire bindings, tracked fields, observed fields), so the
/// first error matches the first install that would have gone wrong.
/// Decorator categories are mutually exclusive per member name; a second
/// claim on a name is rejected.
///
/// # Errors
///
/// Returns a [`RegistrationError`] naming the class, member, and decorator
/// category when the metadata does not match the class shape. All checks
/// run only in builds with `debug_assertions`; release builds trust the
/// compiler and never fail.
pub fn plan_registration<K>(
    class: &ClassDefinition<K>,
    meta: &RegisterDecoratorMeta<K>,
) -> Result<DecoratorMeta, RegistrationError> {
    let mut claims = ClaimedNames::new();
    let mut api_fields = Vec::new();
    let mut api_methods = Vec::new();
    let mut wired_fields = Vec::new();
    let mut wired_methods = Vec::new();

    if let Some(props) = meta.public_props() {
        for &(name, prop) in props {
            if prop.config.is_accessor() {
                validate::expect_accessor(class, name, prop.config)?;
                claims.claim(class, name, DecoratorKind::ApiAccessor)?;
            } else {
                validate::expect_vacant(class, name, DecoratorKind::ApiField)?;
                claims.claim(class, name, DecoratorKind::ApiField)?;
            }
            api_fields.push(name);
        }
    }

    if let Some(methods) = meta.public_methods() {
        for &name in methods {
            validate::expect_method(class, name, DecoratorKind::ApiMethod)?;
            claims.claim(class, name, DecoratorKind::ApiMethod)?;
            api_methods.push(name);
        }
    }

    if let Some(wires) = meta.wire() {
        for (name, wire) in wires {
            let name = *name;
            match wire.target {
                WireTargetKind::Method => {
                    validate::expect_method(class, name, DecoratorKind::WiredMethod)?;
                    claims.claim(class, name, DecoratorKind::WiredMethod)?;
                    wired_methods.push(name);
                }
                WireTargetKind::Field => {
                    validate::expect_vacant(class, name, DecoratorKind::WiredField)?;
                    claims.claim(class, name, DecoratorKind::WiredField)?;
                    wired_fields.push(name);
                }
            }
        }
    }

    if let Some(track) = meta.track() {
        for &name in track {
            validate::expect_vacant(class, name, DecoratorKind::TrackedField)?;
            claims.claim(class, name, DecoratorKind::TrackedField)?;
        }
    }

    let observed = match meta.fields() {
        Some(fields) => {
            for &name in fields {
                validate::expect_vacant(class, name, DecoratorKind::ObservedField)?;
                claims.claim(class, name, DecoratorKind::ObservedField)?;
            }
            Some(fields.to_vec())
        }
        None => None,
    };

    Ok(DecoratorMeta::new(
        api_fields,
        api_methods,
        wired_fields,
        wired_methods,
        observed,
    ))
}

/// Registers `meta` for `class`, reporting failures as values.
///
/// On success the class's member table carries the installed descriptors,
/// every wire binding is recorded in `wiring`, and the resolved metadata is
/// stored in `registry` (last, so a failure never leaves partial metadata
/// behind). On failure nothing is mutated.
///
/// # Errors
///
/// Same as [`plan_registration`].
pub fn try_register_decorators<K>(
    class: &mut ClassDefinition<K>,
    meta: RegisterDecoratorMeta<K>,
    wiring: &mut impl WireMetaSink<K>,
    registry: &mut DecoratorRegistry,
) -> Result<(), RegistrationError> {
    let resolved = plan_registration(class, &meta)?;
    apply(class, meta, wiring);
    registry.register(class.id(), resolved);
    Ok(())
}

/// Registers `meta` for `class` and returns the class for chaining.
///
/// This is the entry point compiled component code calls. A validation
/// failure is a compiler/runtime contract violation, not a recoverable
/// condition, so it fails unconditionally.
///
/// # Panics
///
/// Panics in builds with `debug_assertions` when the metadata does not
/// match the class shape; the message names the class, member, and
/// decorator category. Release builds skip all checks.
#[must_use]
pub fn register_decorators<K>(
    mut class: ClassDefinition<K>,
    meta: RegisterDecoratorMeta<K>,
    wiring: &mut impl WireMetaSink<K>,
    registry: &mut DecoratorRegistry,
) -> ClassDefinition<K> {
    match try_register_decorators(&mut class, meta, wiring, registry) {
        Ok(()) => class,
        Err(error) => panic!("{error}"),
    }
}

/// Installs descriptors and records wire bindings for an accepted plan.
///
/// Follows declaration order within each category: public properties, then
/// wire bindings, then tracked fields. Public methods and observed fields
/// install nothing: the method body stays as authored, and observed
/// fields only flow into the resolved metadata.
fn apply<K>(
    class: &mut ClassDefinition<K>,
    meta: RegisterDecoratorMeta<K>,
    wiring: &mut impl WireMetaSink<K>,
) {
    let RegisterDecoratorMeta {
        public_props,
        public_methods: _,
        wire,
        track,
        fields: _,
    } = meta;

    if let Some(props) = public_props {
        for (name, prop) in props {
            if prop.config.is_accessor() {
                let (getter, setter) = match class.member(name) {
                    Some(MemberDescriptor::Accessor { getter, setter }) => {
                        (getter.clone(), setter.clone())
                    }
                    _ => (None, None),
                };
                class.install(name, public_accessor_descriptor(getter, setter));
            } else {
                let slot = class.allocate_slot();
                class.install(name, public_property_descriptor(slot));
            }
        }
    }

    if let Some(wires) = wire {
        for (name, wire) in wires {
            match wire.target {
                WireTargetKind::Method => {
                    let Some(MemberDescriptor::Method { body, .. }) = class.member(name) else {
                        // No declared method to bind; shape is checked in
                        // debug builds.
                        continue;
                    };
                    let body = body.clone();
                    wiring.store_wired_method_meta(class.id(), name, wire.adapter, body, wire.config);
                }
                WireTargetKind::Field => {
                    wiring.store_wired_field_meta(class.id(), name, wire.adapter, wire.config);
                    let slot = class.allocate_slot();
                    class.install(name, wired_field_descriptor(slot));
                }
            }
        }
    }

    if let Some(track) = track {
        for name in track {
            let slot = class.allocate_slot();
            class.install(name, tracked_field_descriptor(slot));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;

    use arbor_reactive::InvalidationLog;

    use crate::class::{ClassBuilder, ClassId};
    use crate::descriptor::{MemberShape, MethodFn};
    use crate::instance::{AccessError, ComponentInstance};
    use crate::meta::{PropConfig, RegisterDecoratorMetaBuilder};
    use crate::validate::{DecoratorKind, ShapeProblem};
    use crate::value::SlotValue;
    use crate::wiring::{AdapterRef, NoWiring, WireAdapter, WireConfig, WireConfigFn};

    const COUNTER: ClassId = ClassId::new(0);

    struct NullAdapter;

    impl WireAdapter for NullAdapter {
        fn adapter_name(&self) -> &'static str {
            "null"
        }

        fn provide(&self, _config: &WireConfig) -> Option<SlotValue> {
            None
        }
    }

    /// Records every sink call so tests can assert on the exact tuples.
    #[derive(Default)]
    struct RecordingSink {
        fields: vec::Vec<(ClassId, &'static str, AdapterRef, WireConfigFn<u32>)>,
        methods: vec::Vec<(
            ClassId,
            &'static str,
            AdapterRef,
            MethodFn<u32>,
            WireConfigFn<u32>,
        )>,
    }

    impl WireMetaSink<u32> for RecordingSink {
        fn store_wired_field_meta(
            &mut self,
            class: ClassId,
            member: &'static str,
            adapter: AdapterRef,
            config: WireConfigFn<u32>,
        ) {
            self.fields.push((class, member, adapter, config));
        }

        fn store_wired_method_meta(
            &mut self,
            class: ClassId,
            member: &'static str,
            adapter: AdapterRef,
            method: MethodFn<u32>,
            config: WireConfigFn<u32>,
        ) {
            self.methods.push((class, member, adapter, method, config));
        }
    }

    fn empty_class() -> ClassDefinition<u32> {
        ClassBuilder::<u32>::new(COUNTER, "Counter").build()
    }

    fn noop_config() -> WireConfigFn<u32> {
        Arc::new(|_| WireConfig::new())
    }

    #[test]
    fn public_field_registers_and_reacts() {
        let meta = RegisterDecoratorMetaBuilder::new()
            .public_field("count", "number")
            .build();
        let mut registry = DecoratorRegistry::new();

        let class = register_decorators(empty_class(), meta, &mut NoWiring, &mut registry);

        let resolved = registry.lookup(COUNTER);
        assert_eq!(resolved.api_fields(), &["count"]);
        assert!(resolved.fields().is_none());

        // One write, exactly one invalidation.
        let mut instance = ComponentInstance::new(5_u32, &class);
        let mut log = InvalidationLog::new();
        instance
            .set_member_notifying(&class, "count", SlotValue::new(1_i64), &mut log)
            .unwrap();
        assert_eq!(log.count_for(5), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn api_fields_preserve_declaration_order() {
        let meta = RegisterDecoratorMetaBuilder::new()
            .public_field("zeta", "string")
            .public_field("alpha", "number")
            .build();
        let mut registry = DecoratorRegistry::new();

        let _ = register_decorators(empty_class(), meta, &mut NoWiring, &mut registry);

        assert_eq!(registry.lookup(COUNTER).api_fields(), &["zeta", "alpha"]);
    }

    #[test]
    fn accessor_prop_wraps_authored_bodies() {
        let mut builder = ClassBuilder::<u32>::new(COUNTER, "Counter");
        let backing = builder.backing_slot();
        let class = builder
            .getter("label", move |inst| {
                inst.slot(backing)
                    .cloned()
                    .unwrap_or_else(|| SlotValue::new(String::new()))
            })
            .setter("label", move |inst, value| {
                let trimmed = value
                    .downcast_ref::<String>()
                    .map(|s| String::from(s.trim()))
                    .unwrap_or_default();
                inst.set_slot(backing, SlotValue::new(trimmed));
            })
            .build();

        let meta = RegisterDecoratorMetaBuilder::new()
            .public_prop("label", PropConfig::GETTER | PropConfig::SETTER, "string")
            .build();
        let mut registry = DecoratorRegistry::new();
        let class = register_decorators(class, meta, &mut NoWiring, &mut registry);

        assert_eq!(registry.lookup(COUNTER).api_fields(), &["label"]);
        assert_eq!(
            class.member_shape("label"),
            Some(MemberShape::Accessor {
                has_getter: true,
                has_setter: true,
            })
        );

        // The authored setter still runs; the wrapped write invalidates.
        let mut instance = ComponentInstance::new(1_u32, &class);
        let mut log = InvalidationLog::new();
        instance
            .set_member_notifying(
                &class,
                "label",
                SlotValue::new(String::from("  on  ")),
                &mut log,
            )
            .unwrap();
        assert_eq!(
            instance
                .get_member(&class, "label")
                .unwrap()
                .unwrap()
                .downcast_ref::<String>()
                .map(String::as_str),
            Some("on")
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn missing_accessor_fails_before_any_mutation() {
        // A valid public field first, then an accessor prop with no
        // declared pair: the whole registration must be rejected.
        let meta = RegisterDecoratorMetaBuilder::new()
            .public_field("count", "number")
            .public_prop("label", PropConfig::GETTER, "string")
            .build();
        let mut class = empty_class();
        let mut registry = DecoratorRegistry::new();
        let mut sink = RecordingSink::default();

        let error =
            try_register_decorators(&mut class, meta, &mut sink, &mut registry).unwrap_err();

        assert_eq!(error.kind, DecoratorKind::ApiAccessor);
        assert_eq!(error.problem, ShapeProblem::MissingAccessor);
        assert_eq!(error.member, "label");

        // Nothing was recorded or installed.
        assert!(registry.is_empty());
        assert!(!registry.contains(COUNTER));
        assert!(sink.fields.is_empty());
        assert!(!class.has_member("count"));
        assert_eq!(class.slot_count(), 0);
    }

    #[test]
    fn wire_field_records_binding_and_guards_writes() {
        let adapter = AdapterRef::new(NullAdapter);
        let config = noop_config();

        let meta = RegisterDecoratorMetaBuilder::new()
            .wire_field("record", adapter.clone(), config.clone())
            .build();
        let mut registry = DecoratorRegistry::new();
        let mut sink = RecordingSink::default();
        let mut class = empty_class();

        try_register_decorators(&mut class, meta, &mut sink, &mut registry).unwrap();

        // Exactly one registration with the original adapter and config.
        assert_eq!(sink.fields.len(), 1);
        assert!(sink.methods.is_empty());
        let (stored_class, stored_member, stored_adapter, stored_config) = &sink.fields[0];
        assert_eq!(*stored_class, COUNTER);
        assert_eq!(*stored_member, "record");
        assert!(stored_adapter.same(&adapter));
        assert!(Arc::ptr_eq(stored_config, &config));

        assert_eq!(registry.lookup(COUNTER).wired_fields(), &["record"]);
        assert!(registry.lookup(COUNTER).api_fields().is_empty());

        // Unset before delivery; user writes rejected.
        let mut instance = ComponentInstance::new(1_u32, &class);
        assert!(instance.get_member(&class, "record").unwrap().is_none());
        assert_eq!(
            instance
                .set_member(&class, "record", SlotValue::new(1_i32))
                .unwrap_err(),
            AccessError::WiredAssignment {
                class: "Counter",
                member: "record",
            }
        );
    }

    #[test]
    fn wire_method_records_authored_body_untouched() {
        let class = ClassBuilder::<u32>::new(COUNTER, "Counter")
            .method("on_record", |_, arg| arg)
            .build();
        let adapter = AdapterRef::new(NullAdapter);

        let meta = RegisterDecoratorMetaBuilder::new()
            .wire_method("on_record", adapter.clone(), noop_config())
            .build();
        let mut registry = DecoratorRegistry::new();
        let mut sink = RecordingSink::default();
        let mut class = class;

        try_register_decorators(&mut class, meta, &mut sink, &mut registry).unwrap();

        assert_eq!(sink.methods.len(), 1);
        assert!(sink.fields.is_empty());
        let (_, member, stored_adapter, stored_body, _) = &sink.methods[0];
        assert_eq!(*member, "on_record");
        assert!(stored_adapter.same(&adapter));

        // The member table keeps the authored method.
        assert_eq!(
            class.member_shape("on_record"),
            Some(MemberShape::Method { writable: true })
        );
        assert_eq!(registry.lookup(COUNTER).wired_methods(), &["on_record"]);

        // The recorded body is the authored one: invoking it echoes the
        // argument, same as through instance dispatch.
        let mut instance = ComponentInstance::new(1_u32, &class);
        let delivered = stored_body(&mut instance, SlotValue::new(9_i64));
        assert_eq!(delivered.downcast_ref::<i64>(), Some(&9));
    }

    #[test]
    fn tracked_fields_react_without_entering_metadata() {
        let meta = RegisterDecoratorMetaBuilder::new().track("frame").build();
        let mut registry = DecoratorRegistry::new();

        let class = register_decorators(empty_class(), meta, &mut NoWiring, &mut registry);

        let resolved = registry.lookup(COUNTER);
        assert!(!resolved.is_api_field("frame"));
        assert!(!resolved.is_api_method("frame"));
        assert!(!resolved.is_wired("frame"));
        assert!(resolved.api_fields().is_empty());

        // Still reactive.
        let mut instance = ComponentInstance::new(3_u32, &class);
        let mut log = InvalidationLog::new();
        instance
            .set_member_notifying(&class, "frame", SlotValue::new(60_i32), &mut log)
            .unwrap();
        assert_eq!(log.count_for(3), 1);
    }

    #[test]
    fn observed_fields_pass_through_unchanged() {
        let meta = RegisterDecoratorMetaBuilder::new()
            .observed_field("interval")
            .observed_field("handle")
            .build();
        let mut registry = DecoratorRegistry::new();

        let class = register_decorators(empty_class(), meta, &mut NoWiring, &mut registry);

        assert_eq!(
            registry.lookup(COUNTER).fields(),
            Some(&["interval", "handle"][..])
        );
        // Observed fields install nothing.
        assert!(!class.has_member("interval"));
        assert_eq!(class.slot_count(), 0);
    }

    #[test]
    fn public_methods_validate_and_record() {
        let class = ClassBuilder::<u32>::new(COUNTER, "Counter")
            .method("refresh", |_, arg| arg)
            .build();
        let meta = RegisterDecoratorMetaBuilder::new()
            .public_method("refresh")
            .build();
        let mut registry = DecoratorRegistry::new();

        let class = register_decorators(class, meta, &mut NoWiring, &mut registry);

        assert_eq!(registry.lookup(COUNTER).api_methods(), &["refresh"]);
        // No prototype mutation for methods.
        assert_eq!(
            class.member_shape("refresh"),
            Some(MemberShape::Method { writable: true })
        );
    }

    #[test]
    fn non_writable_method_is_rejected() {
        let class = ClassBuilder::<u32>::new(COUNTER, "Counter")
            .frozen_method("foo", |_, arg| arg)
            .build();
        let meta = RegisterDecoratorMetaBuilder::new().public_method("foo").build();
        let mut registry = DecoratorRegistry::new();
        let mut class = class;

        let error = try_register_decorators(&mut class, meta, &mut NoWiring, &mut registry)
            .unwrap_err();

        assert_eq!(error.member, "foo");
        assert_eq!(error.kind, DecoratorKind::ApiMethod);
        assert_eq!(error.problem, ShapeProblem::MethodNotWritable);
        assert!(registry.is_empty());
    }

    #[test]
    #[should_panic(expected = "public method")]
    fn register_decorators_escalates_to_panic() {
        let class = ClassBuilder::<u32>::new(COUNTER, "Counter")
            .frozen_method("foo", |_, arg| arg)
            .build();
        let meta = RegisterDecoratorMetaBuilder::new().public_method("foo").build();
        let mut registry = DecoratorRegistry::new();

        let _ = register_decorators(class, meta, &mut NoWiring, &mut registry);
    }

    #[test]
    fn duplicate_category_claims_are_rejected() {
        let meta = RegisterDecoratorMetaBuilder::new()
            .public_field("x", "number")
            .track("x")
            .build();
        let mut registry = DecoratorRegistry::new();
        let mut class = empty_class();

        let error = try_register_decorators(&mut class, meta, &mut NoWiring, &mut registry)
            .unwrap_err();

        assert_eq!(error.member, "x");
        assert_eq!(error.kind, DecoratorKind::TrackedField);
        assert_eq!(error.problem, ShapeProblem::DuplicateDecorator);
    }

    #[test]
    fn reregistration_last_write_wins() {
        let class = ClassBuilder::<u32>::new(COUNTER, "Counter")
            .method("first", |_, arg| arg)
            .method("second", |_, arg| arg)
            .build();
        let mut registry = DecoratorRegistry::new();

        let meta = RegisterDecoratorMetaBuilder::new().public_method("first").build();
        let class = register_decorators(class, meta, &mut NoWiring, &mut registry);
        assert_eq!(registry.lookup(COUNTER).api_methods(), &["first"]);

        // Registering again overwrites; nothing is merged.
        let meta = RegisterDecoratorMetaBuilder::new().public_method("second").build();
        let _ = register_decorators(class, meta, &mut NoWiring, &mut registry);
        assert_eq!(registry.lookup(COUNTER).api_methods(), &["second"]);
        assert!(!registry.lookup(COUNTER).is_api_method("first"));
    }

    #[test]
    fn registration_returns_the_same_class() {
        let meta = RegisterDecoratorMetaBuilder::new()
            .public_field("count", "number")
            .build();
        let mut registry = DecoratorRegistry::new();

        let class = register_decorators(empty_class(), meta, &mut NoWiring, &mut registry);
        assert_eq!(class.id(), COUNTER);
        assert_eq!(class.name(), "Counter");
        assert!(class.has_member("count"));
    }

    #[test]
    fn plan_is_pure() {
        let class = empty_class();
        let meta = RegisterDecoratorMetaBuilder::new()
            .public_field("count", "number")
            .track("frame")
            .build();

        let resolved = plan_registration(&class, &meta).unwrap();
        assert_eq!(resolved.api_fields(), &["count"]);

        // Planning decided, but installed nothing.
        assert!(!class.has_member("count"));
        assert!(!class.has_member("frame"));
        assert_eq!(class.slot_count(), 0);
    }
}
