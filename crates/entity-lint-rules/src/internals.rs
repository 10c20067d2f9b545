//! `*Internal` helper method rules.
//!
//! # Rationale
//!
//! Public methods are the entity's API; each one validates and then hands
//! the actual work to a private `{Method}Internal` helper. Public methods
//! never call each other, so validation does not run twice and the call
//! graph stays flat. Shared steps live in `Process*For*Internal` and
//! `Validate*For*Internal` helpers.
//!
//! # Good Patterns
//!
//! ```csharp
//! public Customer? ChangeName(string name)
//! {
//!     if (!ValidateName(name)) return null;
//!     return ChangeNameInternal(name);
//! }
//!
//! private Customer? ChangeNameInternal(string name) { Name = name; return this; }
//! ```

use std::collections::HashSet;

use entity_lint_core::utils::{Convention, OBJECT_OVERRIDES};
use entity_lint_core::{Accessibility, Finding, Rule, RuleMeta, TypeContext};

use crate::support::public_instance_methods;

static PUBLIC_METHODS_NO_PUBLIC_CALLS: RuleMeta = RuleMeta::new(
    "DE017",
    "DE017_PublicMethodsNoPublicCalls",
    "Public methods must not call other public methods; share logic through private *Internal methods",
    "docs/adrs/domain-entities/DE-017-public-methods-no-public-calls.md",
);

static INTERNAL_METHODS_PRIVATE: RuleMeta = RuleMeta::new(
    "DE018",
    "DE018_InternalMethodsPrivate",
    "*Internal methods must be private",
    "docs/adrs/domain-entities/DE-018-internal-methods-private.md",
);

static INTERNAL_METHOD_NAMING: RuleMeta = RuleMeta::new(
    "DE020",
    "DE020_InternalMethodNaming",
    "*Internal methods are named after a public method, or Process*For*Internal / Validate*For*Internal",
    "docs/adrs/domain-entities/DE-020-internal-method-naming.md",
);

static CHANGE_METHODS_USE_INTERNAL: RuleMeta = RuleMeta::new(
    "DE021",
    "DE021_ChangeMethodsUseInternal",
    "Public Change* methods delegate to a private *Internal method",
    "docs/adrs/domain-entities/DE-021-change-methods-use-internal.md",
);

/// DE017: public instance methods do not call each other.
///
/// Callers named `IsValid*`, `Clone`, `ToString`, `Equals` or
/// `GetHashCode` are skipped first; then callees named `Validate*` or
/// `IsValid*` are ignored. Only unqualified and `this.` calls count.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicMethodsNoPublicCalls;

impl PublicMethodsNoPublicCalls {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn is_exempt_caller(name: &str) -> bool {
        Convention::IsValid.matches(name) || name == "Clone" || OBJECT_OVERRIDES.contains(&name)
    }
}

impl Rule for PublicMethodsNoPublicCalls {
    fn meta(&self) -> &'static RuleMeta {
        &PUBLIC_METHODS_NO_PUBLIC_CALLS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let public: HashSet<&str> = public_instance_methods(decl)
            .map(|m| m.name.as_str())
            .collect();

        public_instance_methods(decl)
            .filter(|caller| !Self::is_exempt_caller(&caller.name))
            .find_map(|caller| {
                let call = caller.body.as_ref()?.find_call(|call| {
                    call.is_on_self()
                        && call.name != caller.name
                        && public.contains(call.name.as_str())
                        && !Convention::is_validation(&call.name)
                })?;
                Some(Finding::new(
                    format!(
                        "Public method '{}' on '{}' calls public method '{}'",
                        caller.name, decl.name, call.name
                    ),
                    format!(
                        "Move the shared logic of '{}' into 'private {}? {}Internal(...)' and call that from '{}'",
                        call.name, decl.name, call.name, caller.name
                    ),
                ))
            })
    }
}

/// DE018: `*Internal` methods are private.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalMethodsPrivate;

impl InternalMethodsPrivate {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for InternalMethodsPrivate {
    fn meta(&self) -> &'static RuleMeta {
        &INTERNAL_METHODS_PRIVATE
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let method = decl.methods.iter().find(|m| {
            Convention::Internal.matches(&m.name) && m.accessibility() != Accessibility::Private
        })?;
        Some(Finding::new(
            format!(
                "Method '{}' on '{}' is {}; *Internal methods must be private",
                method.name,
                decl.name,
                method.accessibility()
            ),
            format!("Change '{}' to private", method.name),
        ))
    }
}

/// DE020: `*Internal` names pair with a public method or a helper pattern.
///
/// `IsValidInternal` is accepted as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalMethodNaming;

impl InternalMethodNaming {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for InternalMethodNaming {
    fn meta(&self) -> &'static RuleMeta {
        &INTERNAL_METHOD_NAMING
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let public: HashSet<&str> = decl
            .methods
            .iter()
            .filter(|m| m.is_public())
            .map(|m| m.name.as_str())
            .collect();

        let method = decl.methods.iter().find(|m| {
            let name = m.name.as_str();
            Convention::Internal.matches(name)
                && name != "IsValidInternal"
                && !Convention::ProcessForInternal.matches(name)
                && !Convention::ValidateForInternal.matches(name)
                && !name
                    .strip_suffix("Internal")
                    .is_some_and(|stem| public.contains(stem))
        })?;
        Some(Finding::new(
            format!(
                "Internal method '{}' on '{}' does not match a public method; expected '{{PublicMethod}}Internal', 'Process*For*Internal' or 'Validate*For*Internal'",
                method.name, decl.name
            ),
            format!(
                "Rename '{}' after the public method it serves (e.g. 'ChangeNameInternal' for 'ChangeName')",
                method.name
            ),
        ))
    }
}

/// DE021: public `Change*` methods call an `*Internal` method.
///
/// `Change*Metadata` is exempt, checked before the `Change*` match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeMethodsUseInternal;

impl ChangeMethodsUseInternal {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ChangeMethodsUseInternal {
    fn meta(&self) -> &'static RuleMeta {
        &CHANGE_METHODS_USE_INTERNAL
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let method = decl
            .methods
            .iter()
            .filter(|m| m.is_public())
            .filter(|m| !Convention::ChangeMetadata.matches(&m.name))
            .filter(|m| Convention::Change.matches(&m.name))
            .find(|m| {
                m.body.as_ref().is_some_and(|body| {
                    body.find_call(|call| Convention::Internal.matches(&call.name))
                        .is_none()
                })
            })?;
        Some(Finding::new(
            format!(
                "Change method '{}' on '{}' does not delegate to an *Internal method",
                method.name, decl.name
            ),
            format!(
                "Move the mutation into 'private {}? {}Internal(...)' and return its result from '{}'",
                decl.name, method.name, method.name
            ),
        ))
    }
}
