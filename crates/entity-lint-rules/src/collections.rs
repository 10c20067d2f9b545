//! Collection encapsulation rules.
//!
//! # Rationale
//!
//! A collection handed out or taken in by reference lets callers change
//! entity state behind its back. Collections are stored in private fields,
//! exposed through read-only views, copied on the way in and never left
//! `null`.
//!
//! # Detected Patterns
//!
//! ```csharp
//! public List<OrderLine> Lines { get; private set; }    // DE041
//! private Order(List<OrderLine> lines) { _lines = lines; }  // DE042
//! private List<string>? _tags;                          // DE043
//! ```
//!
//! # Good Patterns
//!
//! ```csharp
//! private readonly List<OrderLine> _lines;
//! public IReadOnlyList<OrderLine> Lines => _lines;
//! private Order(List<OrderLine> lines) { _lines = lines.ToList(); }
//! ```

use entity_lint_core::{Accessibility, Finding, Rule, RuleMeta, TypeContext, TypeRef};

static PRIVATE_COLLECTION_FIELDS: RuleMeta = RuleMeta::new(
    "DE040",
    "DE040_PrivateCollectionFields",
    "Collection fields must be private",
    "docs/adrs/domain-entities/DE-040-private-collection-fields.md",
);

static READ_ONLY_COLLECTION_PROPERTIES: RuleMeta = RuleMeta::new(
    "DE041",
    "DE041_ReadOnlyCollectionProperties",
    "Non-private collection properties expose read-only types such as IReadOnlyList",
    "docs/adrs/domain-entities/DE-041-read-only-collection-properties.md",
);

static COLLECTION_DEFENSIVE_COPY: RuleMeta = RuleMeta::new(
    "DE042",
    "DE042_CollectionDefensiveCopy",
    "Constructors copy collection parameters (ToList/ToArray) instead of storing them",
    "docs/adrs/domain-entities/DE-042-collection-defensive-copy.md",
);

static NULLABLE_COLLECTION_INITIALIZED: RuleMeta = RuleMeta::new(
    "DE043",
    "DE043_NullableCollectionInitialized",
    "Nullable collection fields and properties must have an initializer",
    "docs/adrs/domain-entities/DE-043-nullable-collection-initialized.md",
);

/// DE040: collection-typed fields are private.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateCollectionFields;

impl PrivateCollectionFields {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for PrivateCollectionFields {
    fn meta(&self) -> &'static RuleMeta {
        &PRIVATE_COLLECTION_FIELDS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let field = decl.fields.iter().find(|f| {
            f.type_ref.is_collection() && f.accessibility() != Accessibility::Private
        })?;
        Some(Finding::new(
            format!(
                "Collection field '{}' on '{}' is {}; collection fields must be private",
                field.name,
                decl.name,
                field.accessibility()
            ),
            format!(
                "Make '{}' private and expose it through a read-only property such as 'IReadOnlyList<...>'",
                field.name
            ),
        ))
    }
}

/// DE041: non-private properties do not expose mutable collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyCollectionProperties;

impl ReadOnlyCollectionProperties {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ReadOnlyCollectionProperties {
    fn meta(&self) -> &'static RuleMeta {
        &READ_ONLY_COLLECTION_PROPERTIES
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let property = decl.properties.iter().find(|p| {
            p.accessibility() != Accessibility::Private && p.type_ref.is_mutable_collection()
        })?;
        let element = property
            .type_ref
            .generic_arguments()
            .first()
            .map_or_else(|| "T".to_string(), ToString::to_string);
        Some(Finding::new(
            format!(
                "Property '{}' on '{}' exposes mutable collection type '{}'",
                property.name, decl.name, property.type_ref
            ),
            format!(
                "Change '{}' to 'IReadOnlyList<{element}>' (or IReadOnlyCollection) backed by a private field",
                property.name
            ),
        ))
    }
}

/// DE042: constructors do not store collection parameters as-is.
///
/// An assignment `target = param` where `param` is a collection-typed
/// constructor parameter counts as aliasing; any call on the value
/// (`param.ToList()`) counts as a copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionDefensiveCopy;

impl CollectionDefensiveCopy {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for CollectionDefensiveCopy {
    fn meta(&self) -> &'static RuleMeta {
        &COLLECTION_DEFENSIVE_COPY
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        decl.instance_constructors().find_map(|ctor| {
            let body = ctor.body.as_ref()?;
            ctor.parameters
                .iter()
                .filter(|p| p.type_ref.is_collection())
                .find_map(|param| {
                    let assignment = body
                        .assignments
                        .iter()
                        .find(|a| a.operator == "=" && a.value == param.name)?;
                    Some(Finding::new(
                        format!(
                            "Constructor '{}' stores collection parameter '{}' directly in '{}'",
                            ctor.signature(&decl.name),
                            param.name,
                            assignment.target
                        ),
                        format!(
                            "Copy the collection: '{} = {}.ToList();' so callers cannot change entity state",
                            assignment.target, param.name
                        ),
                    ))
                })
        })
    }
}

/// DE043: nullable collections have an initializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableCollectionInitialized;

impl NullableCollectionInitialized {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for NullableCollectionInitialized {
    fn meta(&self) -> &'static RuleMeta {
        &NULLABLE_COLLECTION_INITIALIZED
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let nullable = |ty: &TypeRef| ty.is_nullable() && ty.is_collection();
        let field = decl
            .fields
            .iter()
            .find(|f| nullable(&f.type_ref) && f.initializer.is_none())
            .map(|f| (f.name.as_str(), &f.type_ref));
        let property = || {
            decl.properties
                .iter()
                .find(|p| {
                    nullable(&p.type_ref)
                        && p.initializer.is_none()
                        && p.expression_body.is_none()
                        && p.accessors.iter().all(|a| a.body.is_none())
                })
                .map(|p| (p.name.as_str(), &p.type_ref))
        };
        let (name, ty) = field.or_else(property)?;
        Some(Finding::new(
            format!(
                "Nullable collection '{name}' ({ty}) on '{}' has no initializer",
                decl.name
            ),
            format!(
                "Initialize '{name}' where it is declared (e.g. '= new();') or make it non-nullable"
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{status_of, violation_of};
    use entity_lint_core::Status;

    const COMPLIANT: &str = r"
        public sealed class Order : EntityBase<Order>
        {
            private readonly List<string> _lines;
            private List<string>? _notes = new List<string>();
            public IReadOnlyList<string> Lines => _lines;

            private Order() { _lines = new List<string>(); }
            private Order(List<string> lines) { _lines = lines.ToList(); }
        }
    ";

    #[test]
    fn test_compliant_collections_pass() {
        for rule in [
            &PrivateCollectionFields::new() as &dyn Rule,
            &ReadOnlyCollectionProperties::new(),
            &CollectionDefensiveCopy::new(),
            &NullableCollectionInitialized::new(),
        ] {
            assert_eq!(status_of(rule, COMPLIANT, "Order"), Status::Passed);
        }
    }

    #[test]
    fn test_public_collection_field() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                public string[] Tags;
            }
        ";
        let v = violation_of(&PrivateCollectionFields::new(), source, "Order");
        assert!(v.message.contains("Tags"));
    }

    #[test]
    fn test_mutable_collection_property() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                public List<OrderLine> Lines { get; private set; }
            }
        ";
        let v = violation_of(&ReadOnlyCollectionProperties::new(), source, "Order");
        assert!(v.message.contains("List<OrderLine>"));
        assert!(v.llm_hint.contains("IReadOnlyList<OrderLine>"));
    }

    #[test]
    fn test_aliasing_constructor() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                private readonly List<string> _lines;
                private Order(List<string> lines) { this._lines = lines; }
            }
        ";
        let v = violation_of(&CollectionDefensiveCopy::new(), source, "Order");
        assert!(v.message.contains("'lines'"));
        assert!(v.message.contains("this._lines"));
    }

    #[test]
    fn test_uninitialized_nullable_collection() {
        let source = r"
            public sealed class Order : EntityBase<Order>
            {
                public IReadOnlyList<string>? Tags { get; private set; }
            }
        ";
        let v = violation_of(&NullableCollectionInitialized::new(), source, "Order");
        assert!(v.message.contains("'Tags'"));
    }
}
