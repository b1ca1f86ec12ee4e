// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Development-mode structural validation for decorator registration.
//!
//! These checks catch mismatches between the compiler's emitted metadata
//! and the actual class shape. They run only in builds with
//! `debug_assertions`; release builds trust the compiler's output
//! unconditionally and every check compiles down to `Ok(())`.
//!
//! A violation is a compiler/runtime contract break, not a recoverable
//! runtime condition, so [`register_decorators`](crate::register_decorators)
//! escalates it to a panic.

use core::fmt;

use crate::class::ClassDefinition;
#[cfg(debug_assertions)]
use crate::descriptor::MemberShape;
use crate::meta::PropConfig;

/// The decorator category being validated when a check fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecoratorKind {
    /// A plain public field.
    ApiField,
    /// An accessor-backed public property.
    ApiAccessor,
    /// A public method.
    ApiMethod,
    /// A wire binding targeting a field.
    WiredField,
    /// A wire binding targeting a method.
    WiredMethod,
    /// An internal tracked field.
    TrackedField,
    /// A constructor-assigned field observed by the compiler.
    ObservedField,
}

impl fmt::Display for DecoratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ApiField => "public field",
            Self::ApiAccessor => "public accessor",
            Self::ApiMethod => "public method",
            Self::WiredField => "wired field",
            Self::WiredMethod => "wired method",
            Self::TrackedField => "tracked field",
            Self::ObservedField => "observed field",
        };
        f.write_str(label)
    }
}

/// What a validation check found wrong with the class shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeProblem {
    /// A field-style decorator targets a name the class already declares.
    Occupied,
    /// An accessor-kind property has no declared getter/setter pair.
    MissingAccessor,
    /// The declared member under an accessor-kind property is not an
    /// accessor.
    NotAnAccessor,
    /// A setter-kind property is declared without a getter.
    MissingGetter,
    /// A method decorator targets a name with no declared method.
    MissingMethod,
    /// The declared member under a method decorator is not a method.
    NotAMethod,
    /// The declared method's `writable` attribute is `false`.
    MethodNotWritable,
    /// The name is already claimed by an earlier decorator.
    DuplicateDecorator,
}

impl ShapeProblem {
    fn message(self) -> &'static str {
        match self {
            Self::Occupied => "the class already declares a member under this name",
            Self::MissingAccessor => "no getter/setter pair is declared under this name",
            Self::NotAnAccessor => "the declared member is not a getter/setter pair",
            Self::MissingGetter => "a setter is declared without a getter",
            Self::MissingMethod => "no method is declared under this name",
            Self::NotAMethod => "the declared member is not a method",
            Self::MethodNotWritable => "the declared method is marked non-writable",
            Self::DuplicateDecorator => "the name is already claimed by another decorator",
        }
    }
}

/// A structural validation failure.
///
/// Carries everything a diagnostic needs: the offending class, the member,
/// the decorator category being validated, and the problem found.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegistrationError {
    /// The class being registered.
    pub class: &'static str,
    /// The offending member name.
    pub member: &'static str,
    /// The decorator category being validated.
    pub kind: DecoratorKind,
    /// What the check found wrong.
    pub problem: ShapeProblem,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} decorator on `{}.{}`: {}",
            self.kind,
            self.class,
            self.member,
            self.problem.message()
        )
    }
}

impl core::error::Error for RegistrationError {}

#[cfg(debug_assertions)]
fn error<K>(
    class: &ClassDefinition<K>,
    member: &'static str,
    kind: DecoratorKind,
    problem: ShapeProblem,
) -> RegistrationError {
    RegistrationError {
        class: class.name(),
        member,
        kind,
        problem,
    }
}

/// Checks that no member is declared under `member`.
///
/// Field-style decorators (plain public fields, wire fields, tracked
/// fields, observed fields) synthesize their own descriptor; a pre-existing
/// member means the author also declared the name by hand.
#[cfg(debug_assertions)]
pub(crate) fn expect_vacant<K>(
    class: &ClassDefinition<K>,
    member: &'static str,
    kind: DecoratorKind,
) -> Result<(), RegistrationError> {
    if class.has_member(member) {
        Err(error(class, member, kind, ShapeProblem::Occupied))
    } else {
        Ok(())
    }
}

#[cfg(not(debug_assertions))]
#[inline(always)]
pub(crate) fn expect_vacant<K>(
    _class: &ClassDefinition<K>,
    _member: &'static str,
    _kind: DecoratorKind,
) -> Result<(), RegistrationError> {
    Ok(())
}

/// Checks that an accessor is declared under `member`.
///
/// The accessor must exist, and a setter-kind property additionally
/// requires a declared getter.
#[cfg(debug_assertions)]
pub(crate) fn expect_accessor<K>(
    class: &ClassDefinition<K>,
    member: &'static str,
    config: PropConfig,
) -> Result<(), RegistrationError> {
    let kind = DecoratorKind::ApiAccessor;
    match class.member_shape(member) {
        None => Err(error(class, member, kind, ShapeProblem::MissingAccessor)),
        Some(MemberShape::Accessor { has_getter, .. }) => {
            if config.contains(PropConfig::SETTER) && !has_getter {
                Err(error(class, member, kind, ShapeProblem::MissingGetter))
            } else {
                Ok(())
            }
        }
        Some(_) => Err(error(class, member, kind, ShapeProblem::NotAnAccessor)),
    }
}

#[cfg(not(debug_assertions))]
#[inline(always)]
pub(crate) fn expect_accessor<K>(
    _class: &ClassDefinition<K>,
    _member: &'static str,
    _config: PropConfig,
) -> Result<(), RegistrationError> {
    Ok(())
}

/// Checks that a writable method is declared under `member`.
#[cfg(debug_assertions)]
pub(crate) fn expect_method<K>(
    class: &ClassDefinition<K>,
    member: &'static str,
    kind: DecoratorKind,
) -> Result<(), RegistrationError> {
    match class.member_shape(member) {
        None => Err(error(class, member, kind, ShapeProblem::MissingMethod)),
        Some(MemberShape::Method { writable: true }) => Ok(()),
        Some(MemberShape::Method { writable: false }) => {
            Err(error(class, member, kind, ShapeProblem::MethodNotWritable))
        }
        Some(_) => Err(error(class, member, kind, ShapeProblem::NotAMethod)),
    }
}

#[cfg(not(debug_assertions))]
#[inline(always)]
pub(crate) fn expect_method<K>(
    _class: &ClassDefinition<K>,
    _member: &'static str,
    _kind: DecoratorKind,
) -> Result<(), RegistrationError> {
    Ok(())
}

/// Tracks the member names claimed by decorators during one registration.
///
/// Decorator categories are mutually exclusive per name; a second claim is
/// a compiler contract violation. The set only exists in development
/// builds.
#[cfg(debug_assertions)]
pub(crate) struct ClaimedNames {
    names: hashbrown::HashSet<&'static str>,
}

#[cfg(debug_assertions)]
impl ClaimedNames {
    pub(crate) fn new() -> Self {
        Self {
            names: hashbrown::HashSet::new(),
        }
    }

    pub(crate) fn claim<K>(
        &mut self,
        class: &ClassDefinition<K>,
        member: &'static str,
        kind: DecoratorKind,
    ) -> Result<(), RegistrationError> {
        if self.names.insert(member) {
            Ok(())
        } else {
            Err(error(class, member, kind, ShapeProblem::DuplicateDecorator))
        }
    }
}

/// Release builds skip duplicate tracking entirely.
#[cfg(not(debug_assertions))]
pub(crate) struct ClaimedNames;

#[cfg(not(debug_assertions))]
impl ClaimedNames {
    #[inline(always)]
    pub(crate) fn new() -> Self {
        Self
    }

    #[inline(always)]
    pub(crate) fn claim<K>(
        &mut self,
        _class: &ClassDefinition<K>,
        _member: &'static str,
        _kind: DecoratorKind,
    ) -> Result<(), RegistrationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    use crate::class::{ClassBuilder, ClassId};
    use crate::value::SlotValue;

    const PANEL: ClassId = ClassId::new(2);

    fn panel() -> ClassDefinition<u32> {
        ClassBuilder::<u32>::new(PANEL, "Panel")
            .method("refresh", |_, arg| arg)
            .frozen_method("locked", |_, arg| arg)
            .getter("title", |_| SlotValue::new(""))
            .setter("title", |_, _| {})
            .setter("volume", |_, _| {})
            .build()
    }

    #[test]
    fn vacant_accepts_missing_names() {
        let class = panel();
        assert!(expect_vacant(&class, "count", DecoratorKind::ApiField).is_ok());
    }

    #[test]
    fn vacant_rejects_declared_names() {
        let class = panel();
        let error = expect_vacant(&class, "title", DecoratorKind::TrackedField).unwrap_err();
        assert_eq!(error.problem, ShapeProblem::Occupied);
        assert_eq!(error.kind, DecoratorKind::TrackedField);
        assert_eq!(error.member, "title");
        assert_eq!(error.class, "Panel");
    }

    #[test]
    fn accessor_requires_declared_pair() {
        let class = panel();
        assert!(expect_accessor(&class, "title", PropConfig::GETTER).is_ok());

        let error = expect_accessor(&class, "missing", PropConfig::GETTER).unwrap_err();
        assert_eq!(error.problem, ShapeProblem::MissingAccessor);
    }

    #[test]
    fn accessor_rejects_setter_without_getter() {
        let class = panel();
        // `volume` declares only a setter.
        let error = expect_accessor(&class, "volume", PropConfig::SETTER).unwrap_err();
        assert_eq!(error.problem, ShapeProblem::MissingGetter);

        // A full pair passes the same check.
        assert!(expect_accessor(&class, "title", PropConfig::SETTER).is_ok());
    }

    #[test]
    fn accessor_rejects_methods() {
        let class = panel();
        let error = expect_accessor(&class, "refresh", PropConfig::GETTER).unwrap_err();
        assert_eq!(error.problem, ShapeProblem::NotAnAccessor);
    }

    #[test]
    fn method_checks_shape_and_writability() {
        let class = panel();
        assert!(expect_method(&class, "refresh", DecoratorKind::ApiMethod).is_ok());

        let error = expect_method(&class, "locked", DecoratorKind::ApiMethod).unwrap_err();
        assert_eq!(error.problem, ShapeProblem::MethodNotWritable);

        let error = expect_method(&class, "title", DecoratorKind::WiredMethod).unwrap_err();
        assert_eq!(error.problem, ShapeProblem::NotAMethod);

        let error = expect_method(&class, "missing", DecoratorKind::WiredMethod).unwrap_err();
        assert_eq!(error.problem, ShapeProblem::MissingMethod);
    }

    #[test]
    fn claims_reject_second_category() {
        let class = panel();
        let mut claims = ClaimedNames::new();

        claims
            .claim(&class, "count", DecoratorKind::ApiField)
            .unwrap();
        let error = claims
            .claim(&class, "count", DecoratorKind::TrackedField)
            .unwrap_err();

        assert_eq!(error.problem, ShapeProblem::DuplicateDecorator);
        assert_eq!(error.kind, DecoratorKind::TrackedField);
    }

    #[test]
    fn error_display_names_everything() {
        let class = panel();
        let error = expect_method(&class, "locked", DecoratorKind::ApiMethod).unwrap_err();
        let message = format!("{error}");

        assert!(message.contains("public method"));
        assert!(message.contains("Panel"));
        assert!(message.contains("locked"));
        assert!(message.contains("non-writable"));
    }
}
