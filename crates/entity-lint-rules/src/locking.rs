//! Locking rules for runtime-changeable metadata.
//!
//! # Rationale
//!
//! Metadata limits are static and shared by every instance, so changing
//! them at runtime races with validation on other threads. `Change*Metadata`
//! methods take a lock, and the lock object is a private readonly field no
//! outside code can also lock on (never `this` or a `typeof`).
//!
//! # Good Patterns
//!
//! ```csharp
//! private static readonly object _metadataLock = new();
//!
//! public static void ChangeNameMetadata(int maxLength)
//! {
//!     lock (_metadataLock) { CustomerMetadata.NameMaxLength = maxLength; }
//! }
//! ```

use entity_lint_core::utils::Convention;
use entity_lint_core::{Accessibility, Field, Finding, Rule, RuleMeta, TypeContext, TypeDecl};

use crate::support::metadata_class;

static CHANGE_METADATA_USES_LOCK: RuleMeta = RuleMeta::new(
    "DE035",
    "DE035_ChangeMetadataUsesLock",
    "Change*Metadata methods must wrap their changes in a lock",
    "docs/adrs/domain-entities/DE-035-change-metadata-uses-lock.md",
);

static LOCK_TARGET_PRIVATE: RuleMeta = RuleMeta::new(
    "DE036",
    "DE036_LockTargetPrivate",
    "lock targets must be private readonly fields of the entity or its metadata class",
    "docs/adrs/domain-entities/DE-036-lock-target-private.md",
);

/// The entity followed by its metadata class, when present.
fn owners(decl: &TypeDecl) -> Vec<&TypeDecl> {
    std::iter::once(decl).chain(metadata_class(decl)).collect()
}

/// DE035: `Change*Metadata` methods contain a `lock`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeMetadataUsesLock;

impl ChangeMetadataUsesLock {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ChangeMetadataUsesLock {
    fn meta(&self) -> &'static RuleMeta {
        &CHANGE_METADATA_USES_LOCK
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let (owner, method) = owners(ctx.decl).into_iter().find_map(|owner| {
            owner
                .methods
                .iter()
                .filter(|m| Convention::ChangeMetadata.matches(&m.name))
                .find(|m| m.body.as_ref().is_some_and(|b| b.locks.is_empty()))
                .map(|m| (owner, m))
        })?;
        Some(Finding::new(
            format!(
                "Method '{}' on '{}' changes metadata without a lock",
                method.name,
                owner.display_name()
            ),
            format!(
                "Wrap the body of '{}' in 'lock (_metadataLock) {{ ... }}' using a 'private static readonly object' field",
                method.name
            ),
        ))
    }
}

/// DE036: every `lock` target is a private readonly field.
///
/// `this.` prefixes and a leading type qualifier are stripped before the
/// field lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockTargetPrivate;

impl LockTargetPrivate {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn lock_field<'d>(owners: &[&'d TypeDecl], target: &str) -> Option<&'d Field> {
        let target = target.strip_prefix("this.").unwrap_or(target);
        owners.iter().find_map(|owner| {
            let name = target
                .strip_prefix(owner.name.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(target);
            owner.field(name)
        })
    }
}

impl Rule for LockTargetPrivate {
    fn meta(&self) -> &'static RuleMeta {
        &LOCK_TARGET_PRIVATE
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let owners = owners(decl);
        owners.iter().find_map(|owner| {
            owner.regions().into_iter().find_map(|region| {
                let lock = region.body.locks.iter().find(|lock| {
                    !Self::lock_field(&owners, &lock.target).is_some_and(|f| {
                        f.accessibility() == Accessibility::Private && f.modifiers.is_readonly()
                    })
                })?;
                Some(Finding::new(
                    format!(
                        "Lock target '{}' in {} of '{}' is not a private readonly field",
                        lock.target,
                        region.label(),
                        owner.display_name()
                    ),
                    format!(
                        "Declare 'private static readonly object _metadataLock = new();' and lock on it instead of '{}'",
                        lock.target
                    ),
                ))
            })
        })
    }
}
