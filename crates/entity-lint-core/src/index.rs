//! Cross-compilation type index supplying semantic facts to rules.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::{Compilations, ProgramModel, TypeDecl, TypeKind, TypeRef};

/// One step of a base chain.
#[derive(Debug, Clone)]
pub struct BaseLink<'b> {
    /// The type whose base list holds the reference.
    pub owner: &'b TypeDecl,
    /// The reference, with the owner's type parameters substituted by the
    /// arguments it was reached through.
    pub base: TypeRef,
    /// The declaration the reference resolves to, if it is in the set.
    pub resolved: Option<&'b TypeDecl>,
}

/// Name-keyed view over every declared type of a compilation set.
///
/// Built once per analysis run and shared read-only by every rule.
#[derive(Debug, Default)]
pub struct TypeIndex<'a> {
    by_name: HashMap<&'a str, Vec<&'a TypeDecl>>,
    by_full_name: HashMap<String, Vec<&'a TypeDecl>>,
    subclasses: HashMap<*const TypeDecl, Vec<&'a TypeDecl>>,
}

impl<'a> TypeIndex<'a> {
    /// Indexes every type (nested types included) of `compilations`.
    #[must_use]
    pub fn new(compilations: &'a Compilations) -> Self {
        let mut index = Self::default();
        let decls: Vec<&'a TypeDecl> = compilations
            .values()
            .flat_map(ProgramModel::all_types)
            .collect();
        for &decl in &decls {
            index.by_name.entry(decl.name.as_str()).or_default().push(decl);
            index.by_full_name.entry(decl.full_name()).or_default().push(decl);
        }
        for decl in decls {
            if decl.kind == TypeKind::Interface {
                continue;
            }
            for base in &decl.bases {
                let Some(target) = index.resolve(decl, base) else {
                    continue;
                };
                if !std::ptr::eq(target, decl) {
                    let key: *const TypeDecl = target;
                    index.subclasses.entry(key).or_default().push(decl);
                }
            }
        }
        index
    }

    /// Number of indexed declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    /// `true` when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// First declaration with the given simple name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'a TypeDecl> {
        self.by_name.get(name).and_then(|decls| decls.first().copied())
    }

    /// Declaration `type_ref` points at when written inside `from`.
    ///
    /// Lookup goes through the types enclosing `from`, then its namespaces
    /// from the innermost outwards, then the global namespace. Using
    /// directives are not modelled, so an unmatched reference falls back to
    /// any type with the same simple name. A matching generic arity wins
    /// among same-named candidates.
    #[must_use]
    pub fn resolve(&self, from: &TypeDecl, type_ref: &TypeRef) -> Option<&'a TypeDecl> {
        let path = type_ref.qualified_name();
        let arity = type_ref.generic_arguments().len();
        let pick = |candidates: &Vec<&'a TypeDecl>| {
            candidates
                .iter()
                .find(|d| d.type_parameters.len() == arity)
                .or_else(|| candidates.first())
                .copied()
        };
        lookup_scopes(from)
            .iter()
            .find_map(|scope| {
                let key = if scope.is_empty() {
                    path.to_string()
                } else {
                    format!("{scope}.{path}")
                };
                self.by_full_name.get(&key).and_then(pick)
            })
            .or_else(|| self.by_name.get(type_ref.simple_name()).and_then(pick))
    }

    /// `true` when a class anywhere in the set derives from `decl`.
    #[must_use]
    pub fn has_subclasses(&self, decl: &TypeDecl) -> bool {
        !self.subclasses_of(decl).is_empty()
    }

    /// Types whose base list resolves to `decl`, a declaration of the indexed set.
    #[must_use]
    pub fn subclasses_of(&self, decl: &TypeDecl) -> Vec<&'a TypeDecl> {
        let key: *const TypeDecl = decl;
        self.subclasses.get(&key).cloned().unwrap_or_default()
    }

    /// Every base reachable from `decl`, breadth first.
    ///
    /// Bases declared outside the compilation set appear but are not
    /// expanded further. Cycles are cut by declaration identity.
    #[must_use]
    pub fn base_links<'b>(&'b self, decl: &'b TypeDecl) -> Vec<BaseLink<'b>> {
        let mut links = Vec::new();
        let mut visited: HashSet<*const TypeDecl> = HashSet::new();
        visited.insert(decl);
        let mut queue: VecDeque<(&'b TypeDecl, TypeRef)> =
            decl.bases.iter().map(|b| (decl, b.clone())).collect();

        while let Some((owner, base)) = queue.pop_front() {
            let resolved = self.resolve(owner, &base);
            if let Some(target) = resolved {
                if visited.insert(target) {
                    let bindings: HashMap<&str, TypeRef> = target
                        .type_parameters
                        .iter()
                        .map(String::as_str)
                        .zip(base.generic_arguments())
                        .collect();
                    queue.extend(
                        target
                            .bases
                            .iter()
                            .map(|b| (target, b.substitute(&bindings))),
                    );
                }
            }
            links.push(BaseLink {
                owner,
                base,
                resolved,
            });
        }
        links
    }

    /// Every base reference reachable from `decl`, breadth first.
    #[must_use]
    pub fn base_chain(&self, decl: &TypeDecl) -> Vec<TypeRef> {
        self.base_links(decl)
            .into_iter()
            .map(|link| link.base)
            .collect()
    }

    /// `true` when `decl` implements (or derives from) `name` transitively.
    #[must_use]
    pub fn implements(&self, decl: &TypeDecl, name: &str) -> bool {
        self.base_chain(decl).iter().any(|b| b.refers_to(name))
    }

    /// `true` when a value of `decl` can be used where `target` is expected.
    #[must_use]
    pub fn is_assignable_to(&self, decl: &TypeDecl, target: &str) -> bool {
        decl.name == target || self.implements(decl, target)
    }

    /// `true` for interface references written inside `from`.
    ///
    /// Unresolved names fall back to the `I` + uppercase naming convention.
    #[must_use]
    pub fn is_interface(&self, from: &TypeDecl, type_ref: &TypeRef) -> bool {
        match self.resolve(from, type_ref) {
            Some(decl) => decl.kind == TypeKind::Interface,
            None => {
                let mut chars = type_ref.simple_name().chars();
                chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
            }
        }
    }
}

/// Name prefixes a reference inside `from` is tried against, innermost
/// first; the last one is the global namespace.
fn lookup_scopes(from: &TypeDecl) -> Vec<String> {
    let mut prefix: Vec<&str> = from
        .namespace
        .as_deref()
        .map(|ns| ns.split('.').collect())
        .unwrap_or_default();
    prefix.extend(from.containing.iter().map(String::as_str));

    let mut scopes = Vec::with_capacity(prefix.len() + 1);
    loop {
        scopes.push(prefix.join("."));
        if prefix.pop().is_none() {
            break;
        }
    }
    scopes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifiers, ProgramModel, TypeConstraint};

    fn class(name: &str, bases: &[&str]) -> TypeDecl {
        TypeDecl {
            bases: bases.iter().map(|b| TypeRef::new(b)).collect(),
            ..TypeDecl::new(name, TypeKind::Class)
        }
    }

    fn entity_base() -> TypeDecl {
        TypeDecl {
            modifiers: Modifiers::new(["public", "abstract"]),
            type_parameters: vec!["T".into()],
            constraints: vec![TypeConstraint {
                parameter: "T".into(),
                bounds: vec![TypeRef::new("EntityBase<T>")],
            }],
            ..TypeDecl::new("EntityBase", TypeKind::Class)
        }
    }

    fn compilations(types: Vec<TypeDecl>) -> Compilations {
        let mut set = Compilations::new();
        set.insert(
            "Domain".into(),
            ProgramModel {
                name: "Domain".into(),
                types,
            },
        );
        set
    }

    #[test]
    fn detects_subclasses() {
        let set = compilations(vec![class("Base", &[]), class("Derived", &["Base"])]);
        let index = TypeIndex::new(&set);
        let base = index.lookup("Base").expect("indexed");
        let derived = index.lookup("Derived").expect("indexed");
        assert!(index.has_subclasses(base));
        assert!(!index.has_subclasses(derived));
    }

    #[test]
    fn base_chain_is_transitive() {
        let set = compilations(vec![
            entity_base(),
            class("PersonBase", &["EntityBase<PersonBase>", "IAggregateRoot"]),
            class("Customer", &["PersonBase"]),
        ]);
        let index = TypeIndex::new(&set);
        let customer = index.lookup("Customer").expect("indexed");
        let chain: Vec<String> = index
            .base_chain(customer)
            .iter()
            .map(|b| b.as_str().to_string())
            .collect();
        assert_eq!(
            chain,
            vec!["PersonBase", "EntityBase<PersonBase>", "IAggregateRoot"]
        );
        assert!(index.implements(customer, "IAggregateRoot"));
        assert!(index.is_assignable_to(customer, "Customer"));
    }

    #[test]
    fn cyclic_bases_terminate() {
        let set = compilations(vec![class("A", &["B"]), class("B", &["A"])]);
        let index = TypeIndex::new(&set);
        let a = index.lookup("A").expect("indexed");
        assert_eq!(index.base_chain(a).len(), 2);
    }

    fn in_namespace(namespace: &str, decl: TypeDecl) -> TypeDecl {
        TypeDecl {
            namespace: Some(namespace.into()),
            ..decl
        }
    }

    #[test]
    fn same_named_types_resolve_by_namespace() {
        let set = compilations(vec![
            in_namespace("Sales", class("Order", &[])),
            in_namespace("Billing", class("Order", &[])),
            in_namespace("Billing", class("Special", &["Order"])),
            in_namespace("Billing.Reports", class("Summary", &["Sales.Order"])),
        ]);
        let index = TypeIndex::new(&set);
        let types = set["Domain"].all_types();
        let (sales, billing, special, summary) = (types[0], types[1], types[2], types[3]);

        assert!(std::ptr::eq(
            index.resolve(special, &special.bases[0]).expect("resolved"),
            billing
        ));
        assert!(std::ptr::eq(
            index.resolve(summary, &summary.bases[0]).expect("resolved"),
            sales
        ));
        assert_eq!(index.subclasses_of(billing).len(), 1);
        assert_eq!(index.subclasses_of(sales).len(), 1);
        assert!(!index.has_subclasses(special));
    }

    #[test]
    fn enclosing_types_are_searched_before_namespaces() {
        let mut outer = in_namespace("Crm", class("Customer", &[]));
        let inner = TypeDecl {
            containing: vec!["Customer".into()],
            ..in_namespace("Crm", class("Address", &[]))
        };
        let user = TypeDecl {
            containing: vec!["Customer".into()],
            ..in_namespace("Crm", class("HomeAddress", &["Address"]))
        };
        outer.nested = vec![inner, user];
        let set = compilations(vec![outer, in_namespace("Crm", class("Address", &[]))]);
        let index = TypeIndex::new(&set);
        let types = set["Domain"].all_types();
        let resolved = index.resolve(types[2], &TypeRef::new("Address")).expect("resolved");
        assert_eq!(resolved.display_name(), "Customer.Address");
    }

    #[test]
    fn generic_bases_bind_type_arguments() {
        let person_base = TypeDecl {
            type_parameters: vec!["TSelf".into()],
            ..class("PersonBase", &["EntityBase<TSelf>"])
        };
        let set = compilations(vec![
            entity_base(),
            person_base,
            class("Customer", &["PersonBase<Customer>"]),
        ]);
        let index = TypeIndex::new(&set);
        let customer = index.lookup("Customer").expect("indexed");
        let links = index.base_links(customer);
        assert_eq!(links[1].base.as_str(), "EntityBase<Customer>");
        assert_eq!(links[1].owner.name, "PersonBase");
        assert!(links[1].resolved.is_some_and(TypeDecl::is_self_constrained));
    }

    #[test]
    fn interface_fallback_uses_naming() {
        let index = TypeIndex::default();
        let from = TypeDecl::new("Customer", TypeKind::Class);
        assert!(index.is_interface(&from, &TypeRef::new("ICustomer")));
        assert!(!index.is_interface(&from, &TypeRef::new("Invoice")));
    }
}
