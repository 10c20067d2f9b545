//! Constructor shape rules.
//!
//! # Rationale
//!
//! Entities are created only through their static factories. The
//! parameterless constructor serves persistence frameworks, the
//! parameterized one serves the factories; both stay private. Validation
//! belongs to `RegisterNew`, so constructors never validate: rehydrating
//! persisted data must not be rejected by rules that changed since it was
//! stored.
//!
//! # Good Patterns
//!
//! ```csharp
//! private Customer() { }
//! private Customer(string name) { Name = name; }
//! ```

use entity_lint_core::{Accessibility, Finding, Rule, RuleMeta, TypeContext};

use crate::support::validation_call;

static PRIVATE_CONSTRUCTORS: RuleMeta = RuleMeta::new(
    "DE002",
    "DE002_PrivateConstructors",
    "Entities declare exactly two private constructors: one parameterless, one parameterized",
    "docs/adrs/domain-entities/DE-002-private-constructors.md",
);

static CONSTRUCTOR_NO_VALIDATION: RuleMeta = RuleMeta::new(
    "DE003",
    "DE003_ConstructorNoValidation",
    "Constructors must not call Validate* or IsValid* methods",
    "docs/adrs/domain-entities/DE-003-constructor-no-validation.md",
);

/// DE002: exactly two private instance constructors.
///
/// Checked in order: a non-private constructor, then the count, then the
/// parameterless/parameterized split.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateConstructors;

impl PrivateConstructors {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for PrivateConstructors {
    fn meta(&self) -> &'static RuleMeta {
        &PRIVATE_CONSTRUCTORS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let name = decl.name.as_str();
        let hint = format!(
            "Declare 'private {name}() {{ }}' and 'private {name}(...)' and create instances through RegisterNew and CreateFromExistingInfo"
        );
        let ctors: Vec<_> = decl.instance_constructors().collect();

        if let Some(open) = ctors
            .iter()
            .find(|c| c.accessibility() != Accessibility::Private)
        {
            return Some(Finding::new(
                format!(
                    "Constructor '{}' of '{name}' is {}; entity constructors must be private",
                    open.signature(name),
                    open.accessibility()
                ),
                hint,
            ));
        }
        if ctors.len() != 2 {
            return Some(Finding::new(
                format!(
                    "Entity '{name}' declares {} constructor(s); expected exactly two private constructors, one parameterless and one parameterized",
                    ctors.len()
                ),
                hint,
            ));
        }
        let parameterless = ctors.iter().filter(|c| c.is_parameterless()).count();
        if parameterless != 1 {
            return Some(Finding::new(
                format!(
                    "Entity '{name}' must declare one private parameterless and one private parameterized constructor"
                ),
                hint,
            ));
        }
        None
    }
}

/// DE003: constructors do not call validation methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructorNoValidation;

impl ConstructorNoValidation {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ConstructorNoValidation {
    fn meta(&self) -> &'static RuleMeta {
        &CONSTRUCTOR_NO_VALIDATION
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        decl.instance_constructors().find_map(|ctor| {
            let call = validation_call(ctor.body.as_ref()?)?;
            Some(Finding::new(
                format!(
                    "Constructor '{}' calls '{}'; constructors must not validate",
                    ctor.signature(&decl.name),
                    call.callee
                ),
                format!(
                    "Remove the call to '{}' from the constructor and validate in RegisterNew before calling 'new {}(...)'",
                    call.name, decl.name
                ),
            ))
        })
    }
}
