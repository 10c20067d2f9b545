//! Domain interface rules.
//!
//! # Rationale
//!
//! Application code depends on `I{Entity}`, not on the entity class. That
//! interface carries the entity's role: it extends the entity marker, or
//! the aggregate-root marker when the entity is an aggregate root, so the
//! capability is visible from the interface signature alone.
//!
//! # Good Patterns
//!
//! ```csharp
//! public interface IOrder : IAggregateRoot { }
//! public sealed class Order : EntityBase<Order>, IOrder { }
//! ```

use entity_lint_core::{
    Finding, Rule, RuleMeta, Severity, TypeContext, TypeDecl, TypeKind, TypeRef,
};

static AGGREGATE_ROOT_INTERFACE: RuleMeta = RuleMeta::new(
    "DE050",
    "DE050_AggregateRootInterface",
    "Domain interfaces of an aggregate root must extend the aggregate-root marker interface",
    "docs/adrs/domain-entities/DE-050-aggregate-root-interface.md",
);

static ENTITY_DOMAIN_INTERFACE: RuleMeta = RuleMeta::new(
    "DE051",
    "DE051_EntityDomainInterface",
    "Entities implement a domain interface named I{Entity}",
    "docs/adrs/domain-entities/DE-051-entity-domain-interface.md",
)
.with_severity(Severity::Warning);

static DOMAIN_INTERFACE_EXTENDS_ENTITY: RuleMeta = RuleMeta::new(
    "DE052",
    "DE052_DomainInterfaceExtendsEntity",
    "The I{Entity} domain interface extends the entity or aggregate-root marker interface",
    "docs/adrs/domain-entities/DE-052-domain-interface-extends-entity.md",
);

fn domain_interface_name(decl: &TypeDecl) -> String {
    format!("I{}", decl.name)
}

/// DE050: an aggregate root's domain interfaces extend the aggregate-root marker.
///
/// Domain interfaces are the directly listed bases that resolve to an
/// interface declared in the analysed sources, other than the markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateRootInterface;

impl AggregateRootInterface {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for AggregateRootInterface {
    fn meta(&self) -> &'static RuleMeta {
        &AGGREGATE_ROOT_INTERFACE
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let root = ctx.settings.aggregate_root_interface.as_str();
        let entity = ctx.settings.entity_interface.as_str();
        if !ctx.index.implements(decl, root) {
            return None;
        }
        let weak = decl
            .bases
            .iter()
            .filter(|b| !b.refers_to(root) && !b.refers_to(entity))
            .filter_map(|b| ctx.index.resolve(decl, b))
            .filter(|i| i.kind == TypeKind::Interface)
            .find(|i| !ctx.index.implements(i, root))?;
        Some(Finding::new(
            format!(
                "Domain interface '{}' of aggregate root '{}' does not extend '{root}'",
                weak.name, decl.name
            ),
            format!("Declare 'public interface {} : {root}'", weak.name),
        ))
    }
}

/// DE051: the entity implements `I{T}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityDomainInterface;

impl EntityDomainInterface {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for EntityDomainInterface {
    fn meta(&self) -> &'static RuleMeta {
        &ENTITY_DOMAIN_INTERFACE
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let interface = domain_interface_name(decl);
        if ctx.index.implements(decl, &interface) {
            return None;
        }
        Some(Finding::new(
            format!(
                "Entity '{}' does not implement its domain interface '{interface}'",
                decl.name
            ),
            format!(
                "Declare 'public interface {interface} : {}' and add it to the base list of '{}'",
                ctx.settings.entity_interface, decl.name
            ),
        ))
    }
}

/// DE052: `I{T}` extends the entity or aggregate-root marker.
///
/// Passes when `I{T}` is not declared in the analysed sources; DE051
/// covers a missing interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainInterfaceExtendsEntity;

impl DomainInterfaceExtendsEntity {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for DomainInterfaceExtendsEntity {
    fn meta(&self) -> &'static RuleMeta {
        &DOMAIN_INTERFACE_EXTENDS_ENTITY
    }

    fn check_type(&self, ctx: &TypeContext<'_>) -> Option<Finding> {
        let decl = ctx.decl;
        let root = ctx.settings.aggregate_root_interface.as_str();
        let entity = ctx.settings.entity_interface.as_str();
        let interface = ctx
            .index
            .resolve(decl, &TypeRef::new(&domain_interface_name(decl)))
            .filter(|i| i.kind == TypeKind::Interface)?;
        if ctx.index.implements(interface, entity) || ctx.index.implements(interface, root) {
            return None;
        }
        Some(Finding::new(
            format!(
                "Domain interface '{}' does not extend '{entity}' or '{root}'",
                interface.name
            ),
            format!(
                "Declare 'public interface {} : {entity}' (or '{root}' for aggregate roots)",
                interface.name
            ),
        ))
    }
}
