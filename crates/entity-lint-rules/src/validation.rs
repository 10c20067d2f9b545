//! Validation method rules.
//!
//! # Rationale
//!
//! Validation is static so it can run before an instance exists: each
//! property gets a `public static bool Validate{Property}` built on
//! `ValidationUtils` and the limits in the metadata class, and
//! `IsValid` combines them. Internal validators combine results with `&`
//! so every check runs and reports its message.
//!
//! # Detected Patterns
//!
//! ```csharp
//! private bool ValidateForUpdateInternal(string a, string b)
//!     => ValidateA(a) && ValidateB(b);                  // DE013
//! private bool ValidateEmail(string email) => ...;      // DE014
//! public static bool ValidateName(string n)
//!     => n.Length < 100;                                // DE015
//! ```
//!
//! # Good Patterns
//!
//! ```csharp
//! public static bool ValidateName(string name)
//!     => ValidationUtils.ValidateString(name, CustomerMetadata.NameMaxLength);
//! public static bool IsValid(string name, string email)
//!     => ValidateName(name) & ValidateEmail(email);
//! ```

use entity_lint_core::utils::Convention;
use entity_lint_core::{Finding, Method, Rule, RuleMeta, TypeContext};

/// Receiver every `Validate*` method must call into.
pub const VALIDATION_UTILS: &str = "ValidationUtils";

static BITWISE_AND_IN_INTERNAL_VALIDATION: RuleMeta = RuleMeta::new(
    "DE013",
    "DE013_BitwiseAndInInternalValidation",
    "*Internal methods combine boolean checks with '&' instead of '&&'",
    "docs/adrs/domain-entities/DE-013-bitwise-and-in-internal-validation.md",
);

static VALIDATE_METHODS_PUBLIC_STATIC: RuleMeta = RuleMeta::new(
    "DE014",
    "DE014_ValidateMethodsPublicStatic",
    "Validate* methods must be 'public static bool'",
    "docs/adrs/domain-entities/DE-014-validate-methods-public-static.md",
);

static VALIDATE_USES_VALIDATION_UTILS: RuleMeta = RuleMeta::new(
    "DE015",
    "DE015_ValidateUsesValidationUtils",
    "Public static Validate* methods must delegate to ValidationUtils",
    "docs/adrs/domain-entities/DE-015-validate-uses-validation-utils.md",
);

static IS_VALID_METHOD: RuleMeta = RuleMeta::new(
    "DE016",
    "DE016_IsValidMethod",
    "Entities declare an IsValid method returning bool",
    "docs/adrs/domain-entities/DE-016-is-valid-method.md",
);

/// `Validate*` methods that are not `*Internal`; `*Internal` wins on overlap.
fn public_validators(methods: &[Method]) -> impl Iterator<Item = &Method> {
    methods.iter().filter(|m| {
        Convention::Validate.matches(&m.name) && !Convention::Internal.matches(&m.name)
    })
}

/// DE013: no `&&` in `*Internal` methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitwiseAndInInternalValidation;

impl BitwiseAndInInternalValidation {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for BitwiseAndInInternalValidation {
    fn meta(&self) -> &'static RuleMeta {
        &BITWISE_AND_IN_INTERNAL_VALIDATION
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        decl.methods
            .iter()
            .filter(|m| Convention::Internal.matches(&m.name))
            .find_map(|m| {
                let op = m.body.as_ref()?.find_operator("&&")?;
                Some(Finding::new(
                    format!(
                        "Method '{}' on '{}' uses '&&' (line {}); internal validation must combine results with '&' so every check runs",
                        m.name, decl.name, op.line
                    ),
                    format!(
                        "Replace '&&' with '&' in '{}': {} & {}",
                        m.name, op.left, op.right
                    ),
                ))
            })
    }
}

/// DE014: `Validate*` methods are `public static bool`.
///
/// `*Internal` names (including `Validate*For*Internal`) are exempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateMethodsPublicStatic;

impl ValidateMethodsPublicStatic {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ValidateMethodsPublicStatic {
    fn meta(&self) -> &'static RuleMeta {
        &VALIDATE_METHODS_PUBLIC_STATIC
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let method = public_validators(&decl.methods).find(|m| {
            !(m.is_public() && m.is_static() && m.return_type.as_str() == "bool")
        })?;
        let found = format!(
            "{}{} {}",
            method.accessibility(),
            if method.is_static() { " static" } else { "" },
            method.return_type
        );
        Some(Finding::new(
            format!(
                "Validation method '{}' on '{}' must be 'public static bool', found '{found}'",
                method.name, decl.name
            ),
            format!(
                "Declare 'public static bool {}(...)' so it can run before an instance exists",
                method.name
            ),
        ))
    }
}

/// DE015: public static `Validate*` methods call `ValidationUtils`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateUsesValidationUtils;

impl ValidateUsesValidationUtils {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ValidateUsesValidationUtils {
    fn meta(&self) -> &'static RuleMeta {
        &VALIDATE_USES_VALIDATION_UTILS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let method = public_validators(&decl.methods)
            .filter(|m| m.is_public() && m.is_static())
            .find(|m| {
                m.body.as_ref().is_some_and(|body| {
                    body.find_call(|call| {
                        call.receiver
                            .as_deref()
                            .is_some_and(|r| r.rsplit('.').next() == Some(VALIDATION_UTILS))
                    })
                    .is_none()
                })
            })?;
        Some(Finding::new(
            format!(
                "Validation method '{}' on '{}' does not call {VALIDATION_UTILS}",
                method.name, decl.name
            ),
            format!(
                "Implement '{}' with {VALIDATION_UTILS} helpers (e.g. ValidationUtils.ValidateString) using the limits in {}Metadata",
                method.name, decl.name
            ),
        ))
    }
}

/// DE016: an `IsValid` method returning `bool` exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsValidMethod;

impl IsValidMethod {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for IsValidMethod {
    fn meta(&self) -> &'static RuleMeta {
        &IS_VALID_METHOD
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let present = decl
            .methods
            .iter()
            .any(|m| m.name == "IsValid" && m.return_type.as_str() == "bool");
        (!present).then(|| {
            Finding::new(
                format!("Entity '{}' has no 'IsValid' method returning bool", decl.name),
                "Add 'public static bool IsValid(...)' that combines the Validate* methods with '&'",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{status_of, violation_of};
    use entity_lint_core::Status;

    #[test]
    fn test_logical_and_in_internal_fails() {
        let source = r"
            public sealed class Entity : EntityBase<Entity>
            {
                private bool ValidateForUpdateInternal(string a, string b)
                {
                    return ValidateA(a) && ValidateB(b);
                }
            }
        ";
        let v = violation_of(&BitwiseAndInInternalValidation::new(), source, "Entity");
        assert!(v.message.contains("&&"));
        assert!(v.message.contains("ValidateForUpdateInternal"));
        insta::assert_snapshot!(v.llm_hint, @"Replace '&&' with '&' in 'ValidateForUpdateInternal': ValidateA(a) & ValidateB(b)");
    }

    #[test]
    fn test_bitwise_and_in_internal_passes() {
        let source = r"
            public sealed class Entity : EntityBase<Entity>
            {
                private bool ValidateForUpdateInternal(string a, string b)
                {
                    return ValidateA(a) & ValidateB(b);
                }
                public bool Check(bool a, bool b) => a && b;
            }
        ";
        assert_eq!(
            status_of(&BitwiseAndInInternalValidation::new(), source, "Entity"),
            Status::Passed
        );
    }

    #[test]
    fn test_validate_method_shape() {
        let failing = r"
            public sealed class Entity : EntityBase<Entity>
            {
                private bool ValidateEmail(string email) => true;
            }
        ";
        let v = violation_of(&ValidateMethodsPublicStatic::new(), failing, "Entity");
        assert!(v.message.contains("ValidateEmail"));
        assert!(v.message.contains("found 'private bool'"));

        let passing = r"
            public sealed class Entity : EntityBase<Entity>
            {
                public static bool ValidateEmail(string email) => true;
                private bool ValidateInternal() => true;
                private bool ValidateAddressForUpdateInternal() => true;
            }
        ";
        assert_eq!(
            status_of(&ValidateMethodsPublicStatic::new(), passing, "Entity"),
            Status::Passed
        );
    }

    #[test]
    fn test_validation_utils() {
        let failing = r"
            public sealed class Entity : EntityBase<Entity>
            {
                public static bool ValidateName(string name) => name.Length < 100;
            }
        ";
        let v = violation_of(&ValidateUsesValidationUtils::new(), failing, "Entity");
        assert!(v.message.contains("ValidateName"));
        assert!(v.message.contains("ValidationUtils"));

        let passing = r"
            public sealed class Entity : EntityBase<Entity>
            {
                public static bool ValidateName(string name)
                {
                    return Shared.ValidationUtils.ValidateString(name, 100);
                }
            }
        ";
        assert_eq!(
            status_of(&ValidateUsesValidationUtils::new(), passing, "Entity"),
            Status::Passed
        );
    }

    #[test]
    fn test_is_valid_method() {
        let missing = "public sealed class Entity : EntityBase<Entity> { }";
        let v = violation_of(&IsValidMethod::new(), missing, "Entity");
        assert!(v.message.contains("IsValid"));

        let present = r"
            public sealed class Entity : EntityBase<Entity>
            {
                public static bool IsValid(string name) => true;
            }
        ";
        assert_eq!(status_of(&IsValidMethod::new(), present, "Entity"), Status::Passed);
    }
}
