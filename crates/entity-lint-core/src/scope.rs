//! Scope resolution: which declared types a rule evaluates.

use serde::{Deserialize, Serialize};

use crate::index::{BaseLink, TypeIndex};
use crate::model::{ProgramModel, TypeDecl};

/// Scope policy a rule evaluates under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Concrete domain entities: classes that are not abstract, static or
    /// records and derive from an entity marker.
    #[default]
    Entity,
    /// Every concrete class, entity or not.
    ConcreteClass,
    /// Abstract classes deriving from an entity marker.
    AbstractEntity,
}

/// Names the scope resolver and interface rules recognise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeSettings {
    /// Generic base classes that mark a domain entity when they are not
    /// declared in the analysed sources.
    pub entity_markers: Vec<String>,
    /// Marker interface for aggregate roots.
    pub aggregate_root_interface: String,
    /// Marker interface for plain entities.
    pub entity_interface: String,
}

impl Default for ScopeSettings {
    fn default() -> Self {
        Self {
            entity_markers: vec!["EntityBase".to_string()],
            aggregate_root_interface: "IAggregateRoot".to_string(),
            entity_interface: "IEntity".to_string(),
        }
    }
}

/// Decides scope membership against a [`TypeIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ScopeResolver<'a> {
    index: &'a TypeIndex<'a>,
    settings: &'a ScopeSettings,
}

impl<'a> ScopeResolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(index: &'a TypeIndex<'a>, settings: &'a ScopeSettings) -> Self {
        Self { index, settings }
    }

    /// `true` when a generic entity marker closed over the entity itself
    /// appears in the base chain of `decl`.
    ///
    /// The marker's type argument must name the type whose base list holds
    /// the reference, or a type parameter passed down to it through generic
    /// intermediate bases. `Order : EntityBase<Customer>` is not an entity.
    #[must_use]
    pub fn is_domain_entity(&self, decl: &TypeDecl) -> bool {
        self.index
            .base_links(decl)
            .iter()
            .any(|link| {
                link.base.is_generic() && self.is_marker(link) && closes_over(link, decl)
            })
    }

    fn is_marker(&self, link: &BaseLink<'_>) -> bool {
        link.resolved.is_some_and(TypeDecl::is_self_constrained)
            || self
                .settings
                .entity_markers
                .iter()
                .any(|m| m == link.base.simple_name())
    }

    /// `true` when `decl` belongs to `scope`.
    #[must_use]
    pub fn in_scope(&self, decl: &TypeDecl, scope: Scope) -> bool {
        if !decl.is_class() || decl.is_static() {
            return false;
        }
        match scope {
            Scope::Entity => !decl.is_abstract() && self.is_domain_entity(decl),
            Scope::ConcreteClass => !decl.is_abstract(),
            Scope::AbstractEntity => decl.is_abstract() && self.is_domain_entity(decl),
        }
    }

    /// Types of `model` (nested included) that belong to `scope`.
    #[must_use]
    pub fn resolve_scope<'m>(
        &self,
        model: &'m ProgramModel,
        scope: Scope,
    ) -> Vec<&'m TypeDecl> {
        model
            .all_types()
            .into_iter()
            .filter(|decl| self.in_scope(decl, scope))
            .collect()
    }

    /// Settings in use.
    #[must_use]
    pub fn settings(&self) -> &'a ScopeSettings {
        self.settings
    }
}

fn closes_over(link: &BaseLink<'_>, decl: &TypeDecl) -> bool {
    link.base.generic_arguments().iter().any(|arg| {
        link.owner.is_self(arg)
            || decl.is_self(arg)
            || link.owner.type_parameters.iter().any(|p| p == arg.as_str())
            || decl.type_parameters.iter().any(|p| p == arg.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compilations, Modifiers, TypeConstraint, TypeKind, TypeRef};

    fn decl(name: &str, kind: TypeKind, modifiers: &[&str], bases: &[&str]) -> TypeDecl {
        TypeDecl {
            modifiers: Modifiers::new(modifiers.iter().copied()),
            bases: bases.iter().map(|b| TypeRef::new(b)).collect(),
            ..TypeDecl::new(name, kind)
        }
    }

    fn sample() -> Compilations {
        let marker = TypeDecl {
            type_parameters: vec!["T".into()],
            constraints: vec![TypeConstraint {
                parameter: "T".into(),
                bounds: vec![TypeRef::new("AggregateBase<T>")],
            }],
            ..decl("AggregateBase", TypeKind::Class, &["public", "abstract"], &[])
        };
        let types = vec![
            marker,
            decl("Order", TypeKind::Class, &["public", "sealed"], &["AggregateBase<Order>"]),
            decl("Party", TypeKind::Class, &["public", "abstract"], &["AggregateBase<Party>"]),
            decl("Person", TypeKind::Class, &["public", "sealed"], &["Party"]),
            decl("Money", TypeKind::Record, &["public"], &["AggregateBase<Money>"]),
            decl("Point", TypeKind::Struct, &["public"], &[]),
            decl("Helper", TypeKind::Class, &["public", "static"], &[]),
            decl("Plain", TypeKind::Class, &["public"], &[]),
            decl("Invoice", TypeKind::Class, &["public"], &["EntityBase<Invoice>"]),
        ];
        let mut set = Compilations::new();
        set.insert(
            "Sales".into(),
            ProgramModel {
                name: "Sales".into(),
                types,
            },
        );
        set
    }

    fn names(decls: &[&TypeDecl]) -> Vec<String> {
        decls.iter().map(|d| d.name.clone()).collect()
    }

    #[test]
    fn entity_scope_follows_markers() {
        let set = sample();
        let index = TypeIndex::new(&set);
        let settings = ScopeSettings::default();
        let resolver = ScopeResolver::new(&index, &settings);
        let in_scope = resolver.resolve_scope(&set["Sales"], Scope::Entity);
        assert_eq!(names(&in_scope), vec!["Order", "Person", "Invoice"]);
    }

    #[test]
    fn abstract_entity_scope() {
        let set = sample();
        let index = TypeIndex::new(&set);
        let settings = ScopeSettings::default();
        let resolver = ScopeResolver::new(&index, &settings);
        let in_scope = resolver.resolve_scope(&set["Sales"], Scope::AbstractEntity);
        assert_eq!(names(&in_scope), vec!["Party"]);
    }

    #[test]
    fn concrete_class_scope_ignores_markers() {
        let set = sample();
        let index = TypeIndex::new(&set);
        let settings = ScopeSettings::default();
        let resolver = ScopeResolver::new(&index, &settings);
        let in_scope = resolver.resolve_scope(&set["Sales"], Scope::ConcreteClass);
        assert_eq!(names(&in_scope), vec!["Order", "Person", "Plain", "Invoice"]);
    }

    #[test]
    fn configured_markers_can_be_replaced() {
        let set = sample();
        let index = TypeIndex::new(&set);
        let settings = ScopeSettings {
            entity_markers: vec![],
            ..ScopeSettings::default()
        };
        let resolver = ScopeResolver::new(&index, &settings);
        let invoice = set["Sales"].find_type("Invoice").expect("declared");
        assert!(!resolver.is_domain_entity(invoice));
    }

    fn chain_sample() -> Compilations {
        let person_base = TypeDecl {
            type_parameters: vec!["TSelf".into()],
            ..decl("PersonBase", TypeKind::Class, &["public", "abstract"], &["EntityBase<TSelf>"])
        };
        let types = vec![
            person_base,
            decl("Customer", TypeKind::Class, &["public", "sealed"], &["PersonBase<Customer>"]),
            decl("Impostor", TypeKind::Class, &["public", "sealed"], &["PersonBase<Customer>"]),
            decl("Order", TypeKind::Class, &["public", "sealed"], &["EntityBase<Customer>"]),
        ];
        let mut set = Compilations::new();
        set.insert(
            "Crm".into(),
            ProgramModel {
                name: "Crm".into(),
                types,
            },
        );
        set
    }

    #[test]
    fn marker_must_be_closed_over_the_entity() {
        let set = chain_sample();
        let index = TypeIndex::new(&set);
        let settings = ScopeSettings::default();
        let resolver = ScopeResolver::new(&index, &settings);
        let entity = |name: &str| {
            resolver.is_domain_entity(set["Crm"].find_type(name).expect("declared"))
        };
        assert!(!entity("Order"));
        assert!(entity("Customer"));
        assert!(!entity("Impostor"));
        assert!(entity("PersonBase"));
    }
}
