// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiler-emitted decorator metadata and the resolved per-class metadata.
//!
//! [`RegisterDecoratorMeta`] is the input contract from the component
//! compiler: five optional ordered categories, each wholly absent (`None`)
//! when the compiler emitted no decorators of that category. The
//! orchestrator resolves it into a [`DecoratorMeta`] that the rendering
//! engine consults through the
//! [`DecoratorRegistry`](crate::DecoratorRegistry).

use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;

use crate::wiring::{AdapterRef, WireConfigFn};

bitflags! {
    /// The compiler-assigned kind of a public property.
    ///
    /// An empty set means a plain field; any set bit means the property is
    /// backed by an authored accessor of that kind.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct PropConfig: u8 {
        /// The property has an authored getter.
        const GETTER = 1 << 0;
        /// The property has an authored setter.
        const SETTER = 1 << 1;
    }
}

impl PropConfig {
    /// The plain-field kind: no authored accessor.
    pub const FIELD: Self = Self::empty();

    /// Returns `true` for the plain-field kind.
    #[must_use]
    pub fn is_plain_field(self) -> bool {
        self.is_empty()
    }

    /// Returns `true` for any accessor kind (getter, setter, or both).
    #[must_use]
    pub fn is_accessor(self) -> bool {
        !self.is_empty()
    }
}

/// Compiler metadata for one public property.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PublicPropMeta {
    /// Whether the property is a plain field or accessor-backed.
    pub config: PropConfig,
    /// The property's declared type, as a display string for tooling.
    pub type_name: &'static str,
}

/// Whether a wire binding targets a field or a method.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WireTargetKind {
    /// The binding delivers into a wired field.
    Field,
    /// The binding delivers by invoking the bound method.
    Method,
}

/// Compiler metadata for one wire binding.
pub struct WireMeta<K> {
    /// The external adapter that provisions this binding.
    pub adapter: AdapterRef,
    /// Resolves the adapter configuration from the instance.
    pub config: WireConfigFn<K>,
    /// Field or method binding.
    pub target: WireTargetKind,
}

impl<K> fmt::Debug for WireMeta<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireMeta")
            .field("adapter", &self.adapter)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// The decorator metadata a compiled component class registers with.
///
/// Each category is `None` when the compiler emitted no decorators of that
/// category (absent, not merely empty). Within a category, declaration
/// order is preserved and flows into the resolved [`DecoratorMeta`].
///
/// Built via [`RegisterDecoratorMetaBuilder`].
pub struct RegisterDecoratorMeta<K> {
    pub(crate) public_props: Option<Vec<(&'static str, PublicPropMeta)>>,
    pub(crate) public_methods: Option<Vec<&'static str>>,
    pub(crate) wire: Option<Vec<(&'static str, WireMeta<K>)>>,
    pub(crate) track: Option<Vec<&'static str>>,
    pub(crate) fields: Option<Vec<&'static str>>,
}

impl<K> RegisterDecoratorMeta<K> {
    /// Returns the declared public properties, if the category is present.
    #[must_use]
    pub fn public_props(&self) -> Option<&[(&'static str, PublicPropMeta)]> {
        self.public_props.as_deref()
    }

    /// Returns the declared public methods, if the category is present.
    #[must_use]
    pub fn public_methods(&self) -> Option<&[&'static str]> {
        self.public_methods.as_deref()
    }

    /// Returns the declared wire bindings, if the category is present.
    #[must_use]
    pub fn wire(&self) -> Option<&[(&'static str, WireMeta<K>)]> {
        self.wire.as_deref()
    }

    /// Returns the declared tracked fields, if the category is present.
    #[must_use]
    pub fn track(&self) -> Option<&[&'static str]> {
        self.track.as_deref()
    }

    /// Returns the observed constructor-assigned fields, if the category is
    /// present.
    #[must_use]
    pub fn fields(&self) -> Option<&[&'static str]> {
        self.fields.as_deref()
    }
}

impl<K> fmt::Debug for RegisterDecoratorMeta<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterDecoratorMeta")
            .field("public_props", &self.public_props.as_ref().map(Vec::len))
            .field("public_methods", &self.public_methods.as_ref().map(Vec::len))
            .field("wire", &self.wire.as_ref().map(Vec::len))
            .field("track", &self.track.as_ref().map(Vec::len))
            .field("fields", &self.fields.as_ref().map(Vec::len))
            .finish()
    }
}

/// Builder for [`RegisterDecoratorMeta`].
///
/// A category never added through the builder stays wholly absent, which is
/// how the compiler distinguishes "no decorators of this kind" from an
/// empty list.
///
/// # Example
///
/// ```rust
/// use arbor_component::{PropConfig, RegisterDecoratorMetaBuilder};
///
/// let meta = RegisterDecoratorMetaBuilder::<u32>::new()
///     .public_field("count", "number")
///     .public_prop("label", PropConfig::GETTER | PropConfig::SETTER, "string")
///     .public_method("refresh")
///     .track("frame")
///     .build();
///
/// assert_eq!(meta.public_props().map(|props| props.len()), Some(2));
/// assert_eq!(meta.public_methods(), Some(&["refresh"][..]));
/// assert!(meta.wire().is_none());
/// assert!(meta.fields().is_none());
/// ```
pub struct RegisterDecoratorMetaBuilder<K> {
    meta: RegisterDecoratorMeta<K>,
}

impl<K> Default for RegisterDecoratorMetaBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RegisterDecoratorMetaBuilder<K> {
    /// Creates a builder with every category absent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: RegisterDecoratorMeta {
                public_props: None,
                public_methods: None,
                wire: None,
                track: None,
                fields: None,
            },
        }
    }

    /// Declares a plain public field.
    #[must_use]
    pub fn public_field(self, name: &'static str, type_name: &'static str) -> Self {
        self.public_prop(name, PropConfig::FIELD, type_name)
    }

    /// Declares a public property with an explicit [`PropConfig`].
    #[must_use]
    pub fn public_prop(
        mut self,
        name: &'static str,
        config: PropConfig,
        type_name: &'static str,
    ) -> Self {
        self.meta
            .public_props
            .get_or_insert_with(Vec::new)
            .push((name, PublicPropMeta { config, type_name }));
        self
    }

    /// Declares a public method.
    #[must_use]
    pub fn public_method(mut self, name: &'static str) -> Self {
        self.meta
            .public_methods
            .get_or_insert_with(Vec::new)
            .push(name);
        self
    }

    /// Declares a wire binding targeting a field.
    #[must_use]
    pub fn wire_field(
        mut self,
        name: &'static str,
        adapter: AdapterRef,
        config: WireConfigFn<K>,
    ) -> Self {
        self.meta.wire.get_or_insert_with(Vec::new).push((
            name,
            WireMeta {
                adapter,
                config,
                target: WireTargetKind::Field,
            },
        ));
        self
    }

    /// Declares a wire binding targeting a method.
    #[must_use]
    pub fn wire_method(
        mut self,
        name: &'static str,
        adapter: AdapterRef,
        config: WireConfigFn<K>,
    ) -> Self {
        self.meta.wire.get_or_insert_with(Vec::new).push((
            name,
            WireMeta {
                adapter,
                config,
                target: WireTargetKind::Method,
            },
        ));
        self
    }

    /// Declares a tracked (internal reactive) field.
    #[must_use]
    pub fn track(mut self, name: &'static str) -> Self {
        self.meta.track.get_or_insert_with(Vec::new).push(name);
        self
    }

    /// Declares an observed field: assigned in the constructor with no
    /// decorator, recorded for the rendering engine but never installed.
    #[must_use]
    pub fn observed_field(mut self, name: &'static str) -> Self {
        self.meta.fields.get_or_insert_with(Vec::new).push(name);
        self
    }

    /// Builds the [`RegisterDecoratorMeta`].
    #[must_use]
    pub fn build(self) -> RegisterDecoratorMeta<K> {
        self.meta
    }
}

impl<K> fmt::Debug for RegisterDecoratorMetaBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterDecoratorMetaBuilder")
            .field("meta", &self.meta)
            .finish()
    }
}

/// Resolved per-class decorator metadata.
///
/// Produced by registration and owned by the
/// [`DecoratorRegistry`](crate::DecoratorRegistry); immutable once stored.
/// Tracked fields never appear here: they are reactive but not part of any
/// metadata list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoratorMeta {
    api_fields: Vec<&'static str>,
    api_methods: Vec<&'static str>,
    wired_fields: Vec<&'static str>,
    wired_methods: Vec<&'static str>,
    fields: Option<Vec<&'static str>>,
}

impl DecoratorMeta {
    /// The shared "no decorators" value returned for unregistered classes.
    ///
    /// All four API/wire lists are empty and the observed-fields entry is
    /// absent.
    pub const EMPTY: Self = Self {
        api_fields: Vec::new(),
        api_methods: Vec::new(),
        wired_fields: Vec::new(),
        wired_methods: Vec::new(),
        fields: None,
    };

    pub(crate) fn new(
        api_fields: Vec<&'static str>,
        api_methods: Vec<&'static str>,
        wired_fields: Vec<&'static str>,
        wired_methods: Vec<&'static str>,
        fields: Option<Vec<&'static str>>,
    ) -> Self {
        Self {
            api_fields,
            api_methods,
            wired_fields,
            wired_methods,
            fields,
        }
    }

    /// Returns the public field names, in declaration order.
    #[must_use]
    pub fn api_fields(&self) -> &[&'static str] {
        &self.api_fields
    }

    /// Returns the public method names, in declaration order.
    #[must_use]
    pub fn api_methods(&self) -> &[&'static str] {
        &self.api_methods
    }

    /// Returns the wired field names, in declaration order.
    #[must_use]
    pub fn wired_fields(&self) -> &[&'static str] {
        &self.wired_fields
    }

    /// Returns the wired method names, in declaration order.
    #[must_use]
    pub fn wired_methods(&self) -> &[&'static str] {
        &self.wired_methods
    }

    /// Returns the observed constructor-assigned fields, when the compiler
    /// reported any.
    #[must_use]
    pub fn fields(&self) -> Option<&[&'static str]> {
        self.fields.as_deref()
    }

    /// Returns `true` if the name is recorded as a public API field.
    #[must_use]
    pub fn is_api_field(&self, name: &str) -> bool {
        self.api_fields.iter().any(|&field| field == name)
    }

    /// Returns `true` if the name is recorded as a public API method.
    #[must_use]
    pub fn is_api_method(&self, name: &str) -> bool {
        self.api_methods.iter().any(|&method| method == name)
    }

    /// Returns `true` if the name is recorded as a wired field or method.
    #[must_use]
    pub fn is_wired(&self, name: &str) -> bool {
        self.wired_fields.iter().any(|&field| field == name)
            || self.wired_methods.iter().any(|&method| method == name)
    }

    /// Returns `true` if no decorators are recorded at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.api_fields.is_empty()
            && self.api_methods.is_empty()
            && self.wired_fields.is_empty()
            && self.wired_methods.is_empty()
            && self.fields.is_none()
    }
}
