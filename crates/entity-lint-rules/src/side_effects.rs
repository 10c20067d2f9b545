//! Rules against hidden side effects inside entities.
//!
//! # Rationale
//!
//! Entity behaviour must be deterministic and never abort: time is passed
//! in by the caller, and rejection is signalled by a `null` return rather
//! than an exception. The framework guard clauses (`ThrowIfNull` and
//! friends) stay allowed for programming errors.
//!
//! # Detected Patterns
//!
//! ```csharp
//! CreatedAt = DateTime.UtcNow;                          // DE011
//! throw new InvalidOperationException("closed");      // DE012
//! ThrowHelper.ThrowClosed();                            // DE012
//! ```

use entity_lint_core::utils::has_word_prefix;
use entity_lint_core::{CodeRegion, Finding, Invocation, Rule, RuleMeta, TypeContext};

/// Clock reads that make entity behaviour time dependent.
pub const CLOCK_READS: &[&str] = &[
    "DateTime.Now",
    "DateTime.UtcNow",
    "DateTime.Today",
    "DateTimeOffset.Now",
    "DateTimeOffset.UtcNow",
];

/// Framework guard clauses that may throw.
pub const GUARD_CLAUSES: &[&str] = &[
    "ArgumentNullException.ThrowIfNull",
    "ArgumentException.ThrowIfNullOrEmpty",
    "ArgumentException.ThrowIfNullOrWhiteSpace",
    "ArgumentOutOfRangeException.ThrowIfNegative",
    "ArgumentOutOfRangeException.ThrowIfNegativeOrZero",
    "ObjectDisposedException.ThrowIf",
];

static NO_DATE_TIME_NOW: RuleMeta = RuleMeta::new(
    "DE011",
    "DE011_NoDateTimeNow",
    "Entities must not read DateTime.Now/UtcNow; time is passed in as a parameter",
    "docs/adrs/domain-entities/DE-011-no-datetime-now.md",
);

static NO_THROW_IN_ENTITY: RuleMeta = RuleMeta::new(
    "DE012",
    "DE012_NoThrowInEntity",
    "Entities must not throw; failures are reported by returning null",
    "docs/adrs/domain-entities/DE-012-no-throw-in-entity.md",
);

/// DE011: no clock reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDateTimeNow;

impl NoDateTimeNow {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for NoDateTimeNow {
    fn meta(&self) -> &'static RuleMeta {
        &NO_DATE_TIME_NOW
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        decl.regions().into_iter().find_map(|region| {
            let read = CLOCK_READS
                .iter()
                .find(|clock| region.body.member_accesses.iter().any(|a| a.is(clock)))?;
            Some(Finding::new(
                format!(
                    "{} of '{}' reads '{read}'; entities must receive the current time as a parameter",
                    capitalize(&region.label()),
                    decl.name
                ),
                format!(
                    "Add a 'DateTime now' (or DateTimeOffset) parameter to {} and use it instead of '{read}'",
                    region.label()
                ),
            ))
        })
    }
}

/// DE012: no `throw` and no `Throw*` helpers besides [`GUARD_CLAUSES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrowInEntity;

impl NoThrowInEntity {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn is_guard(call: &Invocation) -> bool {
        GUARD_CLAUSES.iter().any(|guard| {
            call.callee == *guard
                || call
                    .callee
                    .strip_suffix(guard)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    fn check_region(decl_name: &str, region: &CodeRegion<'_>) -> Option<Finding> {
        let hint = format!(
            "Remove the throw from {} and return null (or the unchanged state) when the operation is rejected",
            region.label()
        );
        if let Some(throw) = region.body.throws.first() {
            let what = throw.expression.as_deref().unwrap_or("throw;");
            return Some(Finding::new(
                format!(
                    "{} of '{decl_name}' throws '{what}' (line {}); entities report failure through nullable returns",
                    capitalize(&region.label()),
                    throw.line
                ),
                hint,
            ));
        }
        let call = region
            .body
            .find_call(|call| has_word_prefix(&call.name, "Throw") && !Self::is_guard(call))?;
        Some(Finding::new(
            format!(
                "{} of '{decl_name}' calls throw helper '{}'; entities report failure through nullable returns",
                capitalize(&region.label()),
                call.callee
            ),
            hint,
        ))
    }
}

impl Rule for NoThrowInEntity {
    fn meta(&self) -> &'static RuleMeta {
        &NO_THROW_IN_ENTITY
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        decl.regions()
            .iter()
            .find_map(|region| Self::check_region(&decl.name, region))
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{status_of, violation_of};
    use entity_lint_core::Status;

    #[test]
    fn test_clock_read_in_method() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                public DateTime PlacedAt { get; private set; }
                public Order? Place()
                {
                    PlacedAt = DateTime.UtcNow;
                    return this;
                }
            }
        ";
        let v = violation_of(&NoDateTimeNow::new(), source, "Order");
        insta::assert_snapshot!(v.message, @"Method 'Place' of 'Order' reads 'DateTime.UtcNow'; entities must receive the current time as a parameter");
    }

    #[test]
    fn test_clock_read_in_initializer_and_qualified() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                private DateTimeOffset _created = System.DateTimeOffset.Now;
            }
        ";
        let v = violation_of(&NoDateTimeNow::new(), source, "Order");
        assert!(v.message.contains("Field '_created'"));
        assert!(v.message.contains("DateTimeOffset.Now"));
    }

    #[test]
    fn test_time_parameter_passes() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                public DateTime PlacedAt { get; private set; }
                public Order? Place(DateTime now) { PlacedAt = now; return this; }
                public bool IsNowOpen(Clock clock) => clock.Now > PlacedAt;
            }
        ";
        assert_eq!(status_of(&NoDateTimeNow::new(), source, "Order"), Status::Passed);
    }

    #[test]
    fn test_throw_statement() {
        let source = r#"
            public sealed class Order : EntityBase<Order>
            {
                public Order? Close()
                {
                    throw new InvalidOperationException("closed");
                }
            }
        "#;
        let v = violation_of(&NoThrowInEntity::new(), source, "Order");
        assert!(v.message.contains("Method 'Close'"));
        assert!(v.message.contains("InvalidOperationException"));
    }

    #[test]
    fn test_throw_helper() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                private Order() { ThrowHelper.ThrowClosed(); }
            }
        ";
        let v = violation_of(&NoThrowInEntity::new(), source, "Order");
        assert!(v.message.contains("Constructor"));
        assert!(v.message.contains("ThrowHelper.ThrowClosed"));
    }

    #[test]
    fn test_guard_clauses_pass() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                private Order(string number)
                {
                    ArgumentNullException.ThrowIfNull(number);
                    System.ArgumentException.ThrowIfNullOrWhiteSpace(number);
                }
                public Order? Threshold() => this;
            }
        ";
        assert_eq!(status_of(&NoThrowInEntity::new(), source, "Order"), Status::Passed);
    }
}
