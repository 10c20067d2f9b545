//! Metadata class rules.
//!
//! # Rationale
//!
//! Validation limits live in a `public static class {T}Metadata` nested in
//! the entity, one member per `{PropertyName}{ConstraintType}` pair, each
//! initialized inline. Framework data annotations scatter the same limits
//! across attributes the validation code cannot read, so they are banned.
//!
//! # Good Patterns
//!
//! ```csharp
//! public sealed class Customer : EntityBase<Customer>
//! {
//!     public string Name { get; private set; }
//!
//!     public static class CustomerMetadata
//!     {
//!         public static int NameMaxLength { get; private set; } = 100;
//!         public static bool NameIsRequired { get; private set; } = true;
//!     }
//! }
//! ```

use entity_lint_core::utils::{find_data_annotation, split_constraint, CONSTRAINT_TYPES};
use entity_lint_core::{Accessibility, Attribute, Finding, Rule, RuleMeta, TypeContext, TypeDecl};

use crate::support::{metadata_class, metadata_name};

static METADATA_CLASS_NESTED: RuleMeta = RuleMeta::new(
    "DE030",
    "DE030_MetadataClassNested",
    "Each entity declares its {T}Metadata class nested inside the entity",
    "docs/adrs/domain-entities/DE-030-metadata-class-nested.md",
);

static METADATA_CLASS_STATIC: RuleMeta = RuleMeta::new(
    "DE031",
    "DE031_MetadataClassStatic",
    "The nested metadata class must be 'public static class'",
    "docs/adrs/domain-entities/DE-031-metadata-class-static.md",
);

static METADATA_NAMING_CONVENTION: RuleMeta = RuleMeta::new(
    "DE032",
    "DE032_MetadataNamingConvention",
    "Metadata members are named {PropertyName}{ConstraintType}",
    "docs/adrs/domain-entities/DE-032-metadata-naming-convention.md",
);

static METADATA_INITIALIZATION: RuleMeta = RuleMeta::new(
    "DE033",
    "DE033_MetadataInitialization",
    "Metadata members are initialized inline, not in a static constructor",
    "docs/adrs/domain-entities/DE-033-metadata-initialization.md",
);

static NO_DATA_ANNOTATIONS: RuleMeta = RuleMeta::new(
    "DE034",
    "DE034_NoDataAnnotations",
    "Entities must not use data annotation attributes such as [Required] or [MaxLength]",
    "docs/adrs/domain-entities/DE-034-no-data-annotations.md",
);

/// Public fields and properties of a metadata class, as `(name, has_initializer)`.
fn public_members(metadata: &TypeDecl) -> impl Iterator<Item = (&str, bool)> {
    let fields = metadata
        .fields
        .iter()
        .filter(|f| f.accessibility() == Accessibility::Public)
        .map(|f| (f.name.as_str(), f.initializer.is_some()));
    let properties = metadata
        .properties
        .iter()
        .filter(|p| p.accessibility() == Accessibility::Public)
        .map(|p| {
            let initialized = p.initializer.is_some() || p.expression_body.is_some();
            (p.name.as_str(), initialized)
        });
    fields.chain(properties)
}

/// DE030: a nested `{T}Metadata` type exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataClassNested;

impl MetadataClassNested {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for MetadataClassNested {
    fn meta(&self) -> &'static RuleMeta {
        &METADATA_CLASS_NESTED
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        if metadata_class(decl).is_some() {
            return None;
        }
        let name = metadata_name(decl);
        let hint = format!(
            "Declare 'public static class {name}' inside '{}'",
            decl.name
        );
        let sibling = ctx
            .model
            .types
            .iter()
            .any(|t| t.name == name && t.containing.is_empty());
        let message = if sibling {
            format!(
                "Metadata class '{name}' is declared as a top-level type; it must be nested inside '{}'",
                decl.name
            )
        } else {
            format!("Entity '{}' has no nested '{name}' class", decl.name)
        };
        Some(Finding::new(message, hint))
    }
}

/// DE031: the metadata type is `public static class`.
///
/// Entities without a nested metadata type pass; DE030 reports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataClassStatic;

impl MetadataClassStatic {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for MetadataClassStatic {
    fn meta(&self) -> &'static RuleMeta {
        &METADATA_CLASS_STATIC
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let metadata = metadata_class(ctx.decl)?;
        let compliant = metadata.is_class()
            && metadata.is_static()
            && metadata.modifiers.accessibility() == Some(Accessibility::Public);
        if compliant {
            return None;
        }
        let found = format!(
            "{}{} {}",
            metadata
                .modifiers
                .accessibility()
                .unwrap_or(Accessibility::Private),
            if metadata.is_static() { " static" } else { "" },
            metadata.kind
        );
        Some(Finding::new(
            format!(
                "Metadata class '{}' must be 'public static class', found '{found}'",
                metadata.name
            ),
            format!("Declare it as 'public static class {}'", metadata.name),
        ))
    }
}

/// DE032: metadata members follow `{PropertyName}{ConstraintType}`.
///
/// Only public fields and properties are checked; methods such as
/// `Change*Metadata` are not members in this sense.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataNamingConvention;

impl MetadataNamingConvention {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for MetadataNamingConvention {
    fn meta(&self) -> &'static RuleMeta {
        &METADATA_NAMING_CONVENTION
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let metadata = metadata_class(decl)?;
        let properties: Vec<&str> = decl.properties.iter().map(|p| p.name.as_str()).collect();
        let (member, _) = public_members(metadata)
            .find(|(name, _)| split_constraint(name, &properties).is_none())?;
        Some(Finding::new(
            format!(
                "Metadata member '{member}' in '{}' does not follow '{{PropertyName}}{{ConstraintType}}'",
                metadata.name
            ),
            format!(
                "Rename '{member}' to an entity property name followed by one of: {}",
                CONSTRAINT_TYPES.join(", ")
            ),
        ))
    }
}

/// DE033: no static constructor; every public member has an initializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataInitialization;

impl MetadataInitialization {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for MetadataInitialization {
    fn meta(&self) -> &'static RuleMeta {
        &METADATA_INITIALIZATION
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let metadata = metadata_class(ctx.decl)?;
        if metadata.static_constructor().is_some() {
            return Some(Finding::new(
                format!(
                    "Metadata class '{}' uses a static constructor; initialize members inline",
                    metadata.name
                ),
                "Move each assignment from the static constructor into the member's initializer and delete the constructor",
            ));
        }
        let (member, _) = public_members(metadata).find(|(_, initialized)| !initialized)?;
        Some(Finding::new(
            format!(
                "Metadata member '{member}' in '{}' has no initializer",
                metadata.name
            ),
            format!("Initialize '{member}' where it is declared, e.g. '{member} {{ get; private set; }} = ...;'"),
        ))
    }
}

/// DE034: no data annotations on the type, its members or parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDataAnnotations;

impl NoDataAnnotations {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Every `(location, attributes)` pair of `decl`, in declaration order.
    fn attribute_sites(decl: &TypeDecl) -> Vec<(String, &[Attribute])> {
        let mut sites: Vec<(String, &[Attribute])> =
            vec![(format!("class '{}'", decl.name), decl.attributes.as_slice())];
        for field in &decl.fields {
            sites.push((format!("field '{}'", field.name), field.attributes.as_slice()));
        }
        for property in &decl.properties {
            sites.push((
                format!("property '{}'", property.name),
                property.attributes.as_slice(),
            ));
        }
        for ctor in &decl.constructors {
            sites.push(("constructor".to_string(), ctor.attributes.as_slice()));
            for param in &ctor.parameters {
                sites.push((
                    format!("constructor parameter '{}'", param.name),
                    param.attributes.as_slice(),
                ));
            }
        }
        for method in &decl.methods {
            sites.push((format!("method '{}'", method.name), method.attributes.as_slice()));
            for param in &method.parameters {
                sites.push((
                    format!("parameter '{}' of '{}'", param.name, method.name),
                    param.attributes.as_slice(),
                ));
            }
        }
        sites
    }
}

impl Rule for NoDataAnnotations {
    fn meta(&self) -> &'static RuleMeta {
        &NO_DATA_ANNOTATIONS
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        Self::attribute_sites(decl)
            .into_iter()
            .find_map(|(site, attrs)| {
                let attr = find_data_annotation(attrs)?;
                Some(Finding::new(
                    format!(
                        "[{}] on {site} of '{}' is a data annotation; express the constraint in {}",
                        attr.short_name(),
                        decl.name,
                        metadata_name(decl)
                    ),
                    format!(
                        "Remove [{}] and add the equivalent member to {} (e.g. NameMaxLength) checked by a Validate* method",
                        attr.short_name(),
                        metadata_name(decl)
                    ),
                ))
            })
    }
}
