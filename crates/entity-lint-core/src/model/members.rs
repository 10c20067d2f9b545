//! Member declarations: fields, properties, methods, constructors.

use std::fmt;

use super::body::Body;
use super::type_ref::TypeRef;

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    /// `public`
    Public,
    /// `protected internal`
    ProtectedInternal,
    /// `internal`
    Internal,
    /// `protected`
    Protected,
    /// `private protected`
    PrivateProtected,
    /// `private`
    Private,
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::ProtectedInternal => "protected internal",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::PrivateProtected => "private protected",
            Self::Private => "private",
        })
    }
}

/// Modifier keywords in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    keywords: Vec<String>,
}

impl Modifiers {
    /// Creates a modifier set from keywords.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// All keywords in declaration order.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// `true` when `keyword` is present.
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// `static`
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.contains("static")
    }

    /// `abstract`
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.contains("abstract")
    }

    /// `sealed`
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.contains("sealed")
    }

    /// `partial`
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.contains("partial")
    }

    /// `readonly`
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.contains("readonly")
    }

    /// `const`
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.contains("const")
    }

    /// `async`
    #[must_use]
    pub fn is_async(&self) -> bool {
        self.contains("async")
    }

    /// Explicit accessibility, if any keyword declares one.
    #[must_use]
    pub fn accessibility(&self) -> Option<Accessibility> {
        let public = self.contains("public");
        let protected = self.contains("protected");
        let internal = self.contains("internal");
        let private = self.contains("private");
        match (public, protected, internal, private) {
            (true, ..) => Some(Accessibility::Public),
            (_, true, true, _) => Some(Accessibility::ProtectedInternal),
            (_, true, _, true) => Some(Accessibility::PrivateProtected),
            (_, true, ..) => Some(Accessibility::Protected),
            (_, _, true, _) => Some(Accessibility::Internal),
            (.., true) => Some(Accessibility::Private),
            _ => None,
        }
    }

    /// Adds keywords from `other` that are not yet present.
    pub fn merge(&mut self, other: &Modifiers) {
        for keyword in &other.keywords {
            if !self.contains(keyword) {
                self.keywords.push(keyword.clone());
            }
        }
    }
}

/// An attribute applied to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written, e.g. `System.ComponentModel.DataAnnotations.Required`.
    pub name: String,
    /// Argument list text including parentheses, if present.
    pub arguments: Option<String>,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Attribute {
    /// Name without namespace qualification or `Attribute` suffix.
    #[must_use]
    pub fn short_name(&self) -> &str {
        let name = self.name.rsplit('.').next().unwrap_or(&self.name);
        match name.strip_suffix("Attribute") {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => name,
        }
    }
}

/// A method, constructor, or primary-constructor parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub type_ref: TypeRef,
    /// Parameter modifiers (`ref`, `out`, `params`, `this`).
    pub modifiers: Modifiers,
    /// Attributes on the parameter.
    pub attributes: Vec<Attribute>,
}

/// A field declaration. Multi-variable declarations produce one field each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub type_ref: TypeRef,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Initializer expression, if any.
    pub initializer: Option<Body>,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Field {
    /// Declared accessibility, `private` when omitted.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        self.modifiers
            .accessibility()
            .unwrap_or(Accessibility::Private)
    }
}

/// Kind of property accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// `get`
    Get,
    /// `set`
    Set,
    /// `init`
    Init,
}

/// A property accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Accessor kind.
    pub kind: AccessorKind,
    /// Accessor modifiers, e.g. `private` in `private set`.
    pub modifiers: Modifiers,
    /// Accessor body, absent for auto-accessors.
    pub body: Option<Body>,
}

/// A property declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub type_ref: TypeRef,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Accessors from the accessor list.
    pub accessors: Vec<Accessor>,
    /// Expression body (`=> ...`), if any.
    pub expression_body: Option<Body>,
    /// Initializer (`{ get; } = ...`), if any.
    pub initializer: Option<Body>,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Property {
    /// Declared accessibility, `private` when omitted.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        self.modifiers
            .accessibility()
            .unwrap_or(Accessibility::Private)
    }

    /// The accessor of the given kind.
    #[must_use]
    pub fn accessor(&self, kind: AccessorKind) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.kind == kind)
    }
}

/// A method declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Generic type parameter names.
    pub type_parameters: Vec<String>,
    /// Parameters.
    pub parameters: Vec<Parameter>,
    /// Block or expression body; `None` for abstract/extern methods.
    pub body: Option<Body>,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Method {
    /// Declared accessibility, `private` when omitted.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        self.modifiers
            .accessibility()
            .unwrap_or(Accessibility::Private)
    }

    /// `true` for `public` methods.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.accessibility() == Accessibility::Public
    }

    /// `true` for `static` methods.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }
}

/// Whether a constructor initializer chains to `base` or `this`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    /// `: base(...)`
    Base,
    /// `: this(...)`
    This,
}

/// A constructor initializer such as `: this(name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorInitializer {
    /// Chained constructor.
    pub kind: InitializerKind,
    /// Argument texts.
    pub arguments: Vec<String>,
}

/// A constructor declaration (instance or static).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructor {
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Parameters.
    pub parameters: Vec<Parameter>,
    /// Chained constructor call, if any.
    pub initializer: Option<ConstructorInitializer>,
    /// Constructor body.
    pub body: Option<Body>,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Constructor {
    /// Declared accessibility, `private` when omitted.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        self.modifiers
            .accessibility()
            .unwrap_or(Accessibility::Private)
    }

    /// `true` for the static constructor.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// `true` when the constructor takes no parameters.
    #[must_use]
    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Renders `Name(Type a, Type b)` for messages.
    #[must_use]
    pub fn signature(&self, type_name: &str) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_ref, p.name))
            .collect();
        format!("{type_name}({})", params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessibility_combinations() {
        assert_eq!(
            Modifiers::new(["protected", "internal"]).accessibility(),
            Some(Accessibility::ProtectedInternal)
        );
        assert_eq!(
            Modifiers::new(["private", "protected"]).accessibility(),
            Some(Accessibility::PrivateProtected)
        );
        assert_eq!(
            Modifiers::new(["public", "static"]).accessibility(),
            Some(Accessibility::Public)
        );
        assert_eq!(Modifiers::new(["static"]).accessibility(), None);
    }

    #[test]
    fn members_default_to_private() {
        let method = Method {
            name: "Apply".into(),
            ..Method::default()
        };
        assert_eq!(method.accessibility(), Accessibility::Private);
    }

    #[test]
    fn attribute_short_name() {
        let attr = Attribute {
            name: "System.ComponentModel.DataAnnotations.RequiredAttribute".into(),
            arguments: None,
            line: 1,
        };
        assert_eq!(attr.short_name(), "Required");
    }

    #[test]
    fn merge_keeps_first_order() {
        let mut a = Modifiers::new(["public", "partial"]);
        a.merge(&Modifiers::new(["sealed", "partial"]));
        assert_eq!(a.keywords(), &["public", "partial", "sealed"]);
    }

    #[test]
    fn constructor_signature() {
        let ctor = Constructor {
            parameters: vec![Parameter {
                name: "name".into(),
                type_ref: TypeRef::new("string"),
                ..Parameter::default()
            }],
            ..Constructor::default()
        };
        assert_eq!(ctor.signature("Customer"), "Customer(string name)");
    }
}
