//! Method return-type conventions.
//!
//! # Rationale
//!
//! A mutation reports rejection by returning `null` and success by
//! returning the entity itself (`T?`). Callers can chain calls and test
//! for failure without exceptions or wrapper types, and the entity stays
//! free of infrastructure concerns such as `Task`.
//!
//! # Detected Patterns
//!
//! ```csharp
//! public void SetName(string name) { ... }              // DE008
//! public Result<Customer> Rename(string name) { ... }   // DE009
//! public Customer UpdateEmail(string email) { ... }     // DE010
//! public async Task SaveAsync() { ... }                 // DE028
//! ```
//!
//! # Good Patterns
//!
//! ```csharp
//! public Customer? ChangeName(string name) => ChangeNameInternal(name);
//! public Customer Clone() => new Customer(Name);
//! ```

use entity_lint_core::utils::{has_word_prefix, Convention, OBJECT_OVERRIDES};
use entity_lint_core::{Finding, Method, Rule, RuleMeta, TypeContext};

use crate::support::public_instance_methods;

/// Verb prefixes that mark a mutation method.
pub const MUTATION_PREFIXES: &[&str] = &[
    "Change", "Set", "Update", "Add", "Remove", "Assign", "Apply", "Mark", "Rename",
];

/// Generic wrappers that must not replace a nullable return.
pub const RESULT_WRAPPERS: &[&str] = &["Result", "Either", "ErrorOr"];

const ASYNC_RETURNS: &[&str] = &["Task", "ValueTask"];

static NO_VOID_MUTATIONS: RuleMeta = RuleMeta::new(
    "DE008",
    "DE008_NoVoidMutations",
    "Public entity methods must not return void; mutations return the entity or null",
    "docs/adrs/domain-entities/DE-008-no-void-mutations.md",
);

static NO_RESULT_WRAPPER_RETURNS: RuleMeta = RuleMeta::new(
    "DE009",
    "DE009_NoResultWrapperReturns",
    "Entity methods must not return Result, Either or ErrorOr wrappers",
    "docs/adrs/domain-entities/DE-009-no-result-wrapper-returns.md",
);

static MUTATION_RETURNS_NULLABLE_SELF: RuleMeta = RuleMeta::new(
    "DE010",
    "DE010_MutationReturnsNullableSelf",
    "Public mutation methods must return the nullable entity type (T?)",
    "docs/adrs/domain-entities/DE-010-mutation-returns-nullable-self.md",
);

static CLONE_RETURNS_SELF: RuleMeta = RuleMeta::new(
    "DE024",
    "DE024_CloneReturnsSelf",
    "Entities expose a public parameterless Clone() returning the entity type",
    "docs/adrs/domain-entities/DE-024-clone-returns-self.md",
);

static NO_ASYNC_MEMBERS: RuleMeta = RuleMeta::new(
    "DE028",
    "DE028_NoAsyncMembers",
    "Entity methods must not be async or return Task/ValueTask",
    "docs/adrs/domain-entities/DE-028-no-async-members.md",
);

/// DE008: no public instance method returns `void`.
///
/// `Clone`, `Validate*`, `IsValid*`, `ToString`, `Equals` and
/// `GetHashCode` are exempt, as are static methods. The exemption is
/// checked before the return type.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVoidMutations;

impl NoVoidMutations {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn is_exempt(name: &str) -> bool {
        name == "Clone" || Convention::is_validation(name) || OBJECT_OVERRIDES.contains(&name)
    }
}

impl Rule for NoVoidMutations {
    fn meta(&self) -> &'static RuleMeta {
        &NO_VOID_MUTATIONS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let method = public_instance_methods(decl)
            .filter(|m| !Self::is_exempt(&m.name))
            .find(|m| m.return_type.is_void())?;
        Some(Finding::new(
            format!(
                "Method '{}' on '{}' returns void; mutations must return '{}?'",
                method.name, decl.name, decl.name
            ),
            format!(
                "Change '{}' to return '{}?': return this on success and null when the change is rejected",
                method.name, decl.name
            ),
        ))
    }
}

/// DE009: no `Result`/`Either`/`ErrorOr` returns.
///
/// The wrapper is found at the top level or one type argument deep
/// (`Task<Result<T>>`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResultWrapperReturns;

impl NoResultWrapperReturns {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn returns_wrapper(method: &Method) -> bool {
        let ty = &method.return_type;
        RESULT_WRAPPERS.contains(&ty.simple_name())
            || ty
                .generic_arguments()
                .iter()
                .any(|arg| RESULT_WRAPPERS.contains(&arg.simple_name()))
    }
}

impl Rule for NoResultWrapperReturns {
    fn meta(&self) -> &'static RuleMeta {
        &NO_RESULT_WRAPPER_RETURNS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let method = decl.methods.iter().find(|m| Self::returns_wrapper(m))?;
        Some(Finding::new(
            format!(
                "Method '{}' on '{}' returns '{}'; entities signal failure with a nullable return, not a Result wrapper",
                method.name, decl.name, method.return_type
            ),
            format!(
                "Change the return type of '{}' to '{}?' and return null on failure",
                method.name, decl.name
            ),
        ))
    }
}

/// DE010: public mutation methods return `T?`.
///
/// A mutation has a verb prefix from [`MUTATION_PREFIXES`] or returns the
/// declaring type. `Clone` is exempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationReturnsNullableSelf;

impl MutationReturnsNullableSelf {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for MutationReturnsNullableSelf {
    fn meta(&self) -> &'static RuleMeta {
        &MUTATION_RETURNS_NULLABLE_SELF
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let method = public_instance_methods(decl)
            .filter(|m| m.name != "Clone")
            .filter(|m| {
                MUTATION_PREFIXES.iter().any(|p| has_word_prefix(&m.name, p))
                    || decl.is_self(&m.return_type)
            })
            .find(|m| !m.return_type.is_nullable_of(&decl.name))?;
        Some(Finding::new(
            format!(
                "Mutation method '{}' on '{}' returns '{}'; it must return '{}?'",
                method.name, decl.name, method.return_type, decl.name
            ),
            format!(
                "Change '{}' to return '{}?': this on success, null when the change is rejected",
                method.name, decl.name
            ),
        ))
    }
}

/// DE024: `public T Clone()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneReturnsSelf;

impl CloneReturnsSelf {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for CloneReturnsSelf {
    fn meta(&self) -> &'static RuleMeta {
        &CLONE_RETURNS_SELF
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let hint = format!(
            "Add 'public {} Clone()' returning a copy built with the private constructor",
            decl.name
        );
        let clones: Vec<&Method> = public_instance_methods(decl)
            .filter(|m| m.name == "Clone" && m.parameters.is_empty())
            .collect();
        let returns_self =
            |m: &&Method| decl.is_self(&m.return_type) && !m.return_type.is_nullable();
        if clones.iter().any(returns_self) {
            return None;
        }
        Some(match clones.first() {
            Some(clone) => Finding::new(
                format!(
                    "Clone on '{}' returns '{}'; it must return '{}'",
                    decl.name, clone.return_type, decl.name
                ),
                hint,
            ),
            None => Finding::new(
                format!(
                    "Entity '{}' has no public parameterless 'Clone()' returning '{}'",
                    decl.name, decl.name
                ),
                hint,
            ),
        })
    }
}

/// DE028: no `async` methods and no `Task`/`ValueTask` returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAsyncMembers;

impl NoAsyncMembers {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for NoAsyncMembers {
    fn meta(&self) -> &'static RuleMeta {
        &NO_ASYNC_MEMBERS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let method = decl.methods.iter().find(|m| {
            m.modifiers.is_async() || ASYNC_RETURNS.contains(&m.return_type.simple_name())
        })?;
        Some(Finding::new(
            format!(
                "Method '{}' on '{}' is asynchronous; entities must not perform async work",
                method.name, decl.name
            ),
            format!(
                "Make '{}' synchronous and move I/O into an application service",
                method.name
            ),
        ))
    }
}
