//! Type and member modifier rules.
//!
//! # Rationale
//!
//! An entity is the only place its state may change. Leaving a class open
//! for inheritance, or exposing fields and setters, lets code outside the
//! entity bypass its mutation methods and the validation they perform.
//!
//! # Detected Patterns
//!
//! ```csharp
//! public class Invoice : EntityBase<Invoice>   // DE001: not sealed
//! {
//!     public decimal Total;                    // DE026: public field
//!     public string Number { get; set; }       // DE025: public setter
//!     private static int _counter;             // DE027: static, not readonly
//! }
//! ```
//!
//! # Good Patterns
//!
//! ```csharp
//! public sealed class Invoice : EntityBase<Invoice>
//! {
//!     private static readonly object _lock = new();
//!     private decimal _total;
//!     public string Number { get; private set; }
//! }
//! ```

use entity_lint_core::{AccessorKind, Accessibility, Finding, Rule, RuleMeta, Scope, TypeContext};

static SEALED_CLASS: RuleMeta = RuleMeta::new(
    "DE001",
    "DE001_SealedClass",
    "Classes without subclasses must be declared sealed",
    "docs/adrs/domain-entities/DE-001-sealed-class.md",
);

static NO_PUBLIC_SETTERS: RuleMeta = RuleMeta::new(
    "DE025",
    "DE025_NoPublicSetters",
    "Entity properties must not expose a public set accessor",
    "docs/adrs/domain-entities/DE-025-no-public-setters.md",
);

static NO_PUBLIC_FIELDS: RuleMeta = RuleMeta::new(
    "DE026",
    "DE026_NoPublicFields",
    "Entity instance fields must be private",
    "docs/adrs/domain-entities/DE-026-no-public-fields.md",
);

static STATIC_FIELDS_READONLY: RuleMeta = RuleMeta::new(
    "DE027",
    "DE027_StaticFieldsReadonly",
    "Static fields of an entity must be readonly or const",
    "docs/adrs/domain-entities/DE-027-static-fields-readonly.md",
);

/// DE001: concrete classes nobody derives from must be `sealed`.
///
/// Evaluates every non-abstract, non-static class, entity or not. A class
/// that some class in the compilation set names as its base is exempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SealedClass;

impl SealedClass {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for SealedClass {
    fn meta(&self) -> &'static RuleMeta {
        &SEALED_CLASS
    }

    fn scope(&self) -> Scope {
        Scope::ConcreteClass
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        if decl.is_sealed() || ctx.index.has_subclasses(decl) {
            return None;
        }
        Some(Finding::new(
            format!(
                "Class '{}' is not sealed but no class derives from it",
                decl.name
            ),
            format!(
                "Add the 'sealed' modifier: '{} sealed class {}'",
                decl.accessibility(),
                decl.display_name()
            ),
        ))
    }
}

/// DE025: no property with a plain `set` accessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPublicSetters;

impl NoPublicSetters {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for NoPublicSetters {
    fn meta(&self) -> &'static RuleMeta {
        &NO_PUBLIC_SETTERS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let property = decl.properties.iter().find(|p| {
            p.accessibility() != Accessibility::Private
                && p.accessor(AccessorKind::Set)
                    .is_some_and(|set| set.modifiers.accessibility().is_none())
        })?;
        Some(Finding::new(
            format!(
                "Property '{}' on '{}' has a public setter; state must change through entity methods",
                property.name, decl.name
            ),
            format!(
                "Change 'set;' to 'private set;' on '{}' and add 'public {}? Change{}(...)' to mutate it",
                property.name, decl.name, property.name
            ),
        ))
    }
}

/// DE026: instance fields are private.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPublicFields;

impl NoPublicFields {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for NoPublicFields {
    fn meta(&self) -> &'static RuleMeta {
        &NO_PUBLIC_FIELDS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let field = decl.fields.iter().find(|f| {
            !f.modifiers.is_static()
                && !f.modifiers.is_const()
                && f.accessibility() != Accessibility::Private
        })?;
        Some(Finding::new(
            format!(
                "Field '{}' on '{}' is {}; instance fields must be private",
                field.name,
                decl.name,
                field.accessibility()
            ),
            format!(
                "Make '{}' private and expose it through a get-only property if callers need it",
                field.name
            ),
        ))
    }
}

/// DE027: static fields are `readonly` (or `const`).
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFieldsReadonly;

impl StaticFieldsReadonly {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for StaticFieldsReadonly {
    fn meta(&self) -> &'static RuleMeta {
        &STATIC_FIELDS_READONLY
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let field = decl.fields.iter().find(|f| {
            f.modifiers.is_static() && !f.modifiers.is_const() && !f.modifiers.is_readonly()
        })?;
        Some(Finding::new(
            format!(
                "Static field '{}' on '{}' is not readonly",
                field.name, decl.name
            ),
            format!(
                "Declare '{}' as 'static readonly' (or 'const') so shared state cannot be reassigned",
                field.name
            ),
        ))
    }
}
