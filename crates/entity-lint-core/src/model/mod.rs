//! Language-neutral program model handed over by a front end.
//!
//! A [`ProgramModel`] is one compilation (project/assembly) worth of declared
//! types. Partial declarations are merged before the model reaches any rule.

mod body;
mod members;
mod type_ref;

use std::collections::BTreeMap;
use std::fmt;

pub use body::{
    Assignment, BinaryOperation, Body, Invocation, Lock, MemberAccess, ObjectCreation, Throw,
};
pub use members::{
    Accessibility, Accessor, AccessorKind, Attribute, Constructor, ConstructorInitializer, Field,
    InitializerKind, Method, Modifiers, Parameter, Property,
};
pub use type_ref::TypeRef;

use crate::types::Location;

/// Compilations keyed by project/assembly name, iterated in name order.
pub type Compilations = BTreeMap<String, ProgramModel>;

/// Kind of type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    /// `class`
    #[default]
    Class,
    /// `struct` / `readonly struct`
    Struct,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `record` / `record class`
    Record,
    /// `record struct`
    RecordStruct,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::RecordStruct => "record struct",
        })
    }
}

/// A `where T : ...` clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeConstraint {
    /// Constrained type parameter.
    pub parameter: String,
    /// Constraint types (`class`, `new()` and friends are kept verbatim).
    pub bounds: Vec<TypeRef>,
}

/// A declared type with its members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDecl {
    /// Declared name without type parameters.
    pub name: String,
    /// Enclosing namespace, if any.
    pub namespace: Option<String>,
    /// Names of enclosing types, outermost first.
    pub containing: Vec<String>,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Generic type parameter names.
    pub type_parameters: Vec<String>,
    /// `where` clauses.
    pub constraints: Vec<TypeConstraint>,
    /// Base class and implemented interfaces in declaration order.
    pub bases: Vec<TypeRef>,
    /// Fields.
    pub fields: Vec<Field>,
    /// Properties.
    pub properties: Vec<Property>,
    /// Methods.
    pub methods: Vec<Method>,
    /// Constructors, static constructor included.
    pub constructors: Vec<Constructor>,
    /// Nested type declarations.
    pub nested: Vec<TypeDecl>,
    /// Declaration site (first fragment for partial types).
    pub location: Location,
}

impl TypeDecl {
    /// Creates an empty declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Containing-type path, e.g. `Customer.CustomerMetadata`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.containing.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.containing.join("."), self.name)
        }
    }

    /// Namespace-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.display_name()),
            None => self.display_name(),
        }
    }

    /// `true` for `class` declarations (records excluded).
    #[must_use]
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// `abstract`
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract()
    }

    /// `static`
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// `sealed`
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.modifiers.is_sealed()
    }

    /// Declared accessibility, `internal` when omitted.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        self.modifiers
            .accessibility()
            .unwrap_or(Accessibility::Internal)
    }

    /// Non-static constructors.
    pub fn instance_constructors(&self) -> impl Iterator<Item = &Constructor> {
        self.constructors.iter().filter(|c| !c.is_static())
    }

    /// The static constructor, if declared.
    #[must_use]
    pub fn static_constructor(&self) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.is_static())
    }

    /// First method named `name`.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Property named `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Field named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Directly nested type named `name`.
    #[must_use]
    pub fn nested_type(&self, name: &str) -> Option<&TypeDecl> {
        self.nested.iter().find(|t| t.name == name)
    }

    /// `true` when `type_ref` names this type.
    #[must_use]
    pub fn is_self(&self, type_ref: &TypeRef) -> bool {
        type_ref.refers_to(&self.name)
    }

    /// `true` when a type parameter is constrained to this type closed over
    /// that parameter (`Base<T> where T : Base<T>`).
    #[must_use]
    pub fn is_self_constrained(&self) -> bool {
        self.constraints.iter().any(|constraint| {
            constraint.bounds.iter().any(|bound| {
                self.is_self(bound)
                    && bound
                        .generic_arguments()
                        .iter()
                        .any(|arg| arg.as_str() == constraint.parameter)
            })
        })
    }

    /// This type followed by all nested types, depth first.
    #[must_use]
    pub fn walk(&self) -> Vec<&TypeDecl> {
        let mut out = vec![self];
        for nested in &self.nested {
            out.extend(nested.walk());
        }
        out
    }

    /// Every executable region declared directly in this type.
    #[must_use]
    pub fn regions(&self) -> Vec<CodeRegion<'_>> {
        let mut regions = Vec::new();
        for field in &self.fields {
            if let Some(body) = &field.initializer {
                regions.push(CodeRegion::new(RegionKind::Field, &field.name, body));
            }
        }
        for property in &self.properties {
            let bodies = property
                .initializer
                .iter()
                .chain(&property.expression_body)
                .chain(property.accessors.iter().filter_map(|a| a.body.as_ref()));
            for body in bodies {
                regions.push(CodeRegion::new(RegionKind::Property, &property.name, body));
            }
        }
        for ctor in &self.constructors {
            if let Some(body) = &ctor.body {
                regions.push(CodeRegion::new(RegionKind::Constructor, &self.name, body));
            }
        }
        for method in &self.methods {
            if let Some(body) = &method.body {
                regions.push(CodeRegion::new(RegionKind::Method, &method.name, body));
            }
        }
        regions
    }

    /// Folds another fragment of the same partial type into this one.
    pub fn merge_partial(&mut self, other: TypeDecl) {
        self.modifiers.merge(&other.modifiers);
        self.attributes.extend(other.attributes);
        for base in other.bases {
            if !self.bases.contains(&base) {
                self.bases.push(base);
            }
        }
        for constraint in other.constraints {
            if !self.constraints.contains(&constraint) {
                self.constraints.push(constraint);
            }
        }
        self.fields.extend(other.fields);
        self.properties.extend(other.properties);
        self.methods.extend(other.methods);
        self.constructors.extend(other.constructors);
        merge_declarations(&mut self.nested, other.nested);
    }

    fn partial_key(&self) -> String {
        format!("{}/{}", self.full_name(), self.type_parameters.len())
    }
}

/// Kind of member owning a [`CodeRegion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Field initializer.
    Field,
    /// Property accessor, expression body or initializer.
    Property,
    /// Constructor body.
    Constructor,
    /// Method body.
    Method,
}

/// An executable region together with the member it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct CodeRegion<'a> {
    /// Owning member kind.
    pub kind: RegionKind,
    /// Owning member name (the type name for constructors).
    pub member: &'a str,
    /// The region's syntax facts.
    pub body: &'a Body,
}

impl<'a> CodeRegion<'a> {
    fn new(kind: RegionKind, member: &'a str, body: &'a Body) -> Self {
        Self { kind, member, body }
    }

    /// Human-readable owner, e.g. `method 'ChangeName'`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            RegionKind::Field => format!("field '{}'", self.member),
            RegionKind::Property => format!("property '{}'", self.member),
            RegionKind::Constructor => "constructor".to_string(),
            RegionKind::Method => format!("method '{}'", self.member),
        }
    }
}

/// One compilation's declared types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramModel {
    /// Project/assembly name.
    pub name: String,
    /// Top-level declarations, partial fragments merged.
    pub types: Vec<TypeDecl>,
}

impl ProgramModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Builds a model from declaration fragments, merging partial types.
    #[must_use]
    pub fn from_declarations(name: impl Into<String>, declarations: Vec<TypeDecl>) -> Self {
        let mut types = Vec::new();
        merge_declarations(&mut types, declarations);
        Self {
            name: name.into(),
            types,
        }
    }

    /// Every declared type, nested types included, in declaration order.
    #[must_use]
    pub fn all_types(&self) -> Vec<&TypeDecl> {
        self.types.iter().flat_map(TypeDecl::walk).collect()
    }

    /// Looks a type up by its containing-type path (see [`TypeDecl::display_name`]).
    #[must_use]
    pub fn find_type(&self, display_name: &str) -> Option<&TypeDecl> {
        self.all_types()
            .into_iter()
            .find(|t| t.display_name() == display_name)
    }
}

fn merge_declarations(target: &mut Vec<TypeDecl>, incoming: Vec<TypeDecl>) {
    for decl in incoming {
        let existing = if decl.modifiers.is_partial() {
            let key = decl.partial_key();
            target
                .iter()
                .position(|t| t.modifiers.is_partial() && t.partial_key() == key)
        } else {
            None
        };
        match existing {
            Some(i) => target[i].merge_partial(decl),
            None => target.push(decl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(name: &str, method: &str) -> TypeDecl {
        TypeDecl {
            modifiers: Modifiers::new(["public", "partial"]),
            methods: vec![Method {
                name: method.into(),
                ..Method::default()
            }],
            bases: vec![TypeRef::new("EntityBase<Order>")],
            ..TypeDecl::new(name, TypeKind::Class)
        }
    }

    #[test]
    fn partial_fragments_are_merged() {
        let model = ProgramModel::from_declarations(
            "Sales",
            vec![partial("Order", "Ship"), partial("Order", "Cancel")],
        );
        assert_eq!(model.types.len(), 1);
        let order = &model.types[0];
        assert_eq!(order.methods.len(), 2);
        assert_eq!(order.bases.len(), 1);
    }

    #[test]
    fn non_partial_duplicates_are_kept_apart() {
        let a = TypeDecl::new("Order", TypeKind::Class);
        let b = TypeDecl::new("Order", TypeKind::Class);
        let model = ProgramModel::from_declarations("Sales", vec![a, b]);
        assert_eq!(model.types.len(), 2);
    }

    #[test]
    fn nested_types_are_walked_with_display_names() {
        let mut outer = TypeDecl::new("Customer", TypeKind::Class);
        let mut inner = TypeDecl::new("CustomerMetadata", TypeKind::Class);
        inner.containing = vec!["Customer".into()];
        outer.nested.push(inner);
        let model = ProgramModel {
            name: "Crm".into(),
            types: vec![outer],
        };
        let names: Vec<String> = model.all_types().iter().map(|t| t.display_name()).collect();
        assert_eq!(names, vec!["Customer", "Customer.CustomerMetadata"]);
        assert!(model.find_type("Customer.CustomerMetadata").is_some());
    }

    #[test]
    fn self_constraint_detection() {
        let decl = TypeDecl {
            type_parameters: vec!["T".into()],
            constraints: vec![TypeConstraint {
                parameter: "T".into(),
                bounds: vec![TypeRef::new("EntityBase<T>")],
            }],
            ..TypeDecl::new("EntityBase", TypeKind::Class)
        };
        assert!(decl.is_self_constrained());
    }

    #[test]
    fn regions_are_labelled() {
        let decl = TypeDecl {
            methods: vec![Method {
                name: "Rename".into(),
                body: Some(Body::new("{ }")),
                ..Method::default()
            }],
            ..TypeDecl::new("Customer", TypeKind::Class)
        };
        let regions = decl.regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].label(), "method 'Rename'");
    }
}
