//! Static factory rules.
//!
//! # Rationale
//!
//! New entities enter the domain through `RegisterNew`, which validates
//! its input and returns `null` when it is rejected. Entities loaded from
//! storage enter through `CreateFromExistingInfo`, which trusts the data
//! and never fails. Abstract entity bases offer a protected
//! `RegisterNewBase` so derived factories share one creation path.
//!
//! # Good Patterns
//!
//! ```csharp
//! public static Customer? RegisterNew(string name)
//! {
//!     if (!IsValid(name)) return null;
//!     return new Customer(name);
//! }
//!
//! public static Customer CreateFromExistingInfo(string name) => new Customer(name);
//! ```

use entity_lint_core::{
    Accessibility, Finding, Method, Rule, RuleMeta, Scope, TypeContext, TypeDecl,
};

use crate::support::{methods_named, validation_call};

const REGISTER_NEW: &str = "RegisterNew";
const CREATE_FROM_EXISTING_INFO: &str = "CreateFromExistingInfo";
const REGISTER_NEW_BASE: &str = "RegisterNewBase";

static REGISTER_NEW_FACTORY: RuleMeta = RuleMeta::new(
    "DE006",
    "DE006_RegisterNewFactory",
    "Entities expose 'public static T? RegisterNew(...)' for creating new instances",
    "docs/adrs/domain-entities/DE-006-register-new-factory.md",
);

static CREATE_FROM_EXISTING_INFO_FACTORY: RuleMeta = RuleMeta::new(
    "DE007",
    "DE007_CreateFromExistingInfoFactory",
    "Entities expose 'public static T CreateFromExistingInfo(...)' for rehydration",
    "docs/adrs/domain-entities/DE-007-create-from-existing-info-factory.md",
);

static REGISTER_NEW_VALIDATES: RuleMeta = RuleMeta::new(
    "DE022",
    "DE022_RegisterNewValidates",
    "RegisterNew must call IsValid or a Validate method before creating the entity",
    "docs/adrs/domain-entities/DE-022-register-new-validates.md",
);

static CREATE_FROM_EXISTING_INFO_SKIPS_VALIDATION: RuleMeta = RuleMeta::new(
    "DE023",
    "DE023_CreateFromExistingInfoSkipsValidation",
    "CreateFromExistingInfo must not call IsValid or Validate methods",
    "docs/adrs/domain-entities/DE-023-create-from-existing-info-skips-validation.md",
);

static ABSTRACT_ENTITY_FACTORY: RuleMeta = RuleMeta::new(
    "DE055",
    "DE055_AbstractEntityFactory",
    "Abstract entities expose a 'protected static RegisterNewBase' factory",
    "docs/adrs/domain-entities/DE-055-abstract-entity-factory.md",
);

fn describe(method: &Method) -> String {
    let mut parts = vec![method.accessibility().to_string()];
    if method.is_static() {
        parts.push("static".to_string());
    }
    parts.push(method.return_type.to_string());
    parts.join(" ")
}

/// Checks that some overload of `name` satisfies `shape`.
///
/// Reports the first overload when none does.
fn check_factory(
    decl: &TypeDecl,
    name: &str,
    expected: &str,
    shape: impl Fn(&Method) -> bool,
) -> Option<Finding> {
    let overloads: Vec<&Method> = decl.methods.iter().filter(|m| m.name == name).collect();
    if overloads.iter().any(|m| shape(m)) {
        return None;
    }
    let hint = format!("Declare '{expected}' on '{}'", decl.name);
    match overloads.first() {
        None => Some(Finding::new(
            format!("Entity '{}' has no '{expected}' factory", decl.name),
            hint,
        )),
        Some(found) => Some(Finding::new(
            format!(
                "{name} on '{}' must be '{expected}', found '{}'",
                decl.name,
                describe(found)
            ),
            hint,
        )),
    }
}

/// DE006: `public static T? RegisterNew(...)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterNewFactory;

impl RegisterNewFactory {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for RegisterNewFactory {
    fn meta(&self) -> &'static RuleMeta {
        &REGISTER_NEW_FACTORY
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        check_factory(
            decl,
            REGISTER_NEW,
            &format!("public static {}? RegisterNew(...)", decl.name),
            |m| m.is_public() && m.is_static() && m.return_type.is_nullable_of(&decl.name),
        )
    }
}

/// DE007: `public static T CreateFromExistingInfo(...)`, non-nullable.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateFromExistingInfoFactory;

impl CreateFromExistingInfoFactory {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for CreateFromExistingInfoFactory {
    fn meta(&self) -> &'static RuleMeta {
        &CREATE_FROM_EXISTING_INFO_FACTORY
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        check_factory(
            decl,
            CREATE_FROM_EXISTING_INFO,
            &format!("public static {} CreateFromExistingInfo(...)", decl.name),
            |m| {
                m.is_public()
                    && m.is_static()
                    && !m.return_type.is_nullable()
                    && !m.return_type.is_generic()
                    && decl.is_self(&m.return_type)
            },
        )
    }
}

/// DE022: every `RegisterNew` body validates.
///
/// Entities without `RegisterNew` pass; DE006 reports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterNewValidates;

impl RegisterNewValidates {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for RegisterNewValidates {
    fn meta(&self) -> &'static RuleMeta {
        &REGISTER_NEW_VALIDATES
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let unvalidated =
            methods_named(decl, REGISTER_NEW).any(|(_, body)| validation_call(body).is_none());
        unvalidated.then(|| Finding::new(
            format!(
                "RegisterNew on '{}' creates the entity without calling an IsValid or Validate method",
                decl.name
            ),
            "Call IsValid(...) (or a Validate* method) at the start of RegisterNew and return null when it fails",
        ))
    }
}

/// DE023: `CreateFromExistingInfo` never validates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateFromExistingInfoSkipsValidation;

impl CreateFromExistingInfoSkipsValidation {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for CreateFromExistingInfoSkipsValidation {
    fn meta(&self) -> &'static RuleMeta {
        &CREATE_FROM_EXISTING_INFO_SKIPS_VALIDATION
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        methods_named(decl, CREATE_FROM_EXISTING_INFO).find_map(|(_, body)| {
            let call = validation_call(body)?;
            Some(Finding::new(
                format!(
                    "CreateFromExistingInfo on '{}' calls '{}'; rehydration must not validate",
                    decl.name, call.callee
                ),
                format!(
                    "Remove the call to '{}' from CreateFromExistingInfo; persisted data is trusted",
                    call.name
                ),
            ))
        })
    }
}

/// DE055: abstract entities expose `protected static RegisterNewBase`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbstractEntityFactory;

impl AbstractEntityFactory {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for AbstractEntityFactory {
    fn meta(&self) -> &'static RuleMeta {
        &ABSTRACT_ENTITY_FACTORY
    }

    fn scope(&self) -> Scope {
        Scope::AbstractEntity
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        check_factory(
            decl,
            REGISTER_NEW_BASE,
            "protected static RegisterNewBase(...)",
            |m| m.accessibility() == Accessibility::Protected && m.is_static(),
        )
    }
}
