//! C# language extractor using Tree-sitter.

use std::path::Path;

use tracing::{debug, warn};
use tree_sitter::{Language, Node, Parser, Tree};

use entity_lint_core::{
    Accessor, AccessorKind, Attribute, Constructor, ConstructorInitializer, Field,
    InitializerKind, Location, Method, Modifiers, Parameter, Property, TypeConstraint, TypeDecl,
    TypeKind, TypeRef,
};

use crate::body::{children, collect, line, named_children, text};
use crate::error::FrontendError;
use crate::extractor::LanguageExtractor;

const MODIFIER_KEYWORDS: &[&str] = &[
    "public", "private", "protected", "internal", "file", "static", "abstract", "sealed",
    "partial", "readonly", "const", "virtual", "override", "new", "extern", "async", "unsafe",
    "volatile", "required", "ref", "out", "in", "params", "this", "scoped",
];

fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "struct_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "record_struct_declaration"
    )
}

/// Extracts type declarations, members and bodies from C# source.
pub struct CSharpExtractor {
    language: Language,
}

impl CSharpExtractor {
    /// Creates a new C# extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }

    fn parse(&self, source: &str, file: &Path) -> Result<Tree, FrontendError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        parser
            .parse(source, None)
            .ok_or_else(|| FrontendError::ParseAborted {
                path: file.to_path_buf(),
            })
    }
}

impl Default for CSharpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for CSharpExtractor {
    fn language_id(&self) -> &'static str {
        "csharp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".cs"]
    }

    fn extract(&self, source: &str, file: &Path) -> Result<Vec<TypeDecl>, FrontendError> {
        let tree = self.parse(source, file)?;
        let root = tree.root_node();
        if root.has_error() {
            warn!(
                "Syntax errors in {}, continuing with recovered tree",
                file.display()
            );
        }

        let walker = DeclWalker {
            src: source.as_bytes(),
            file,
        };
        let mut types = Vec::new();
        walker.collect_types(root, None, &mut types);
        debug!("Extracted {} type(s) from {}", types.len(), file.display());
        Ok(types)
    }
}

struct DeclWalker<'s> {
    src: &'s [u8],
    file: &'s Path,
}

impl<'s> DeclWalker<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        text(node, self.src)
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<&'s str> {
        node.child_by_field_name(field).map(|n| self.text(n))
    }

    fn collect_types(&self, node: Node<'_>, namespace: Option<&str>, out: &mut Vec<TypeDecl>) {
        let mut file_namespace: Option<String> = None;
        for child in named_children(node) {
            let current = file_namespace.as_deref().or(namespace);
            match child.kind() {
                "namespace_declaration" => {
                    let ns = qualify(current, self.field_text(child, "name").unwrap_or_default());
                    if let Some(body) = child.child_by_field_name("body") {
                        self.collect_types(body, Some(&ns), out);
                    }
                }
                "file_scoped_namespace_declaration" => {
                    let ns = qualify(current, self.field_text(child, "name").unwrap_or_default());
                    self.collect_types(child, Some(&ns), out);
                    file_namespace = Some(ns);
                }
                kind if is_type_declaration(kind) => {
                    out.push(self.type_decl(child, current, &[]));
                }
                _ => {}
            }
        }
    }

    fn type_decl(&self, node: Node<'_>, namespace: Option<&str>, containing: &[String]) -> TypeDecl {
        let tokens = children(node);
        let kind = match node.kind() {
            "struct_declaration" => TypeKind::Struct,
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_struct_declaration" => TypeKind::RecordStruct,
            "record_declaration" if tokens.iter().any(|t| t.kind() == "struct") => {
                TypeKind::RecordStruct
            }
            "record_declaration" => TypeKind::Record,
            _ => TypeKind::Class,
        };
        let name = self.field_text(node, "name").unwrap_or_default();

        let mut decl = TypeDecl::new(name, kind);
        decl.namespace = namespace.map(str::to_string);
        decl.containing = containing.to_vec();
        decl.location = Location::new(
            self.file,
            line(node),
            node.start_position().column + 1,
        );
        let (modifiers, attributes) = self.header(node);
        decl.modifiers = modifiers;
        decl.attributes = attributes;

        let mut members = None;
        for child in tokens {
            match child.kind() {
                "type_parameter_list" => decl.type_parameters = self.type_parameters(child),
                "base_list" => decl.bases = self.bases(child),
                "type_parameter_constraints_clause" => {
                    decl.constraints.push(self.constraint(child));
                }
                "declaration_list" => members = Some(child),
                _ => {}
            }
        }

        if let Some(list) = members {
            let mut path = containing.to_vec();
            path.push(decl.name.clone());
            for member in named_children(list) {
                match member.kind() {
                    kind if is_type_declaration(kind) => {
                        decl.nested.push(self.type_decl(member, namespace, &path));
                    }
                    "field_declaration" => decl.fields.extend(self.fields(member)),
                    "property_declaration" => decl.properties.push(self.property(member)),
                    "method_declaration" => decl.methods.push(self.method(member)),
                    "constructor_declaration" => decl.constructors.push(self.constructor(member)),
                    _ => {}
                }
            }
        }
        decl
    }

    /// Modifiers and attributes declared directly on `node`.
    fn header(&self, node: Node<'_>) -> (Modifiers, Vec<Attribute>) {
        let mut keywords = Vec::new();
        let mut attributes = Vec::new();
        for child in children(node) {
            match child.kind() {
                "modifier" => keywords.push(self.text(child).to_string()),
                "attribute_list" => attributes.extend(self.attributes(child)),
                kind if !child.is_named() && MODIFIER_KEYWORDS.contains(&kind) => {
                    keywords.push(kind.to_string());
                }
                _ => {}
            }
        }
        (Modifiers::new(keywords), attributes)
    }

    fn attributes(&self, list: Node<'_>) -> Vec<Attribute> {
        named_children(list)
            .into_iter()
            .filter(|n| n.kind() == "attribute")
            .map(|attr| Attribute {
                name: self
                    .field_text(attr, "name")
                    .or_else(|| attr.named_child(0).map(|n| self.text(n)))
                    .unwrap_or_default()
                    .to_string(),
                arguments: named_children(attr)
                    .into_iter()
                    .find(|n| n.kind() == "attribute_argument_list")
                    .map(|n| self.text(n).to_string()),
                line: line(attr),
            })
            .collect()
    }

    fn type_parameters(&self, list: Node<'_>) -> Vec<String> {
        named_children(list)
            .into_iter()
            .filter(|n| n.kind() == "type_parameter")
            .map(|param| {
                self.field_text(param, "name")
                    .or_else(|| {
                        named_children(param)
                            .into_iter()
                            .find(|n| n.kind() == "identifier")
                            .map(|n| self.text(n))
                    })
                    .unwrap_or_else(|| self.text(param))
                    .to_string()
            })
            .collect()
    }

    fn bases(&self, list: Node<'_>) -> Vec<TypeRef> {
        named_children(list)
            .into_iter()
            .filter(|n| n.kind() != "argument_list")
            .filter_map(|base| {
                if base.kind() == "primary_constructor_base_type" {
                    base.child_by_field_name("type")
                        .or_else(|| base.named_child(0))
                        .map(|n| TypeRef::new(self.text(n)))
                } else {
                    Some(TypeRef::new(self.text(base)))
                }
            })
            .collect()
    }

    fn constraint(&self, clause: Node<'_>) -> TypeConstraint {
        let mut constraint = TypeConstraint::default();
        for child in named_children(clause) {
            if constraint.parameter.is_empty() && child.kind() == "identifier" {
                constraint.parameter = self.text(child).to_string();
            } else {
                constraint.bounds.push(TypeRef::new(self.text(child)));
            }
        }
        constraint
    }

    fn parameters(&self, list: Option<Node<'_>>) -> Vec<Parameter> {
        let Some(list) = list else {
            return Vec::new();
        };
        named_children(list)
            .into_iter()
            .filter(|n| matches!(n.kind(), "parameter" | "parameter_array"))
            .map(|param| {
                let (modifiers, attributes) = self.header(param);
                Parameter {
                    name: self.field_text(param, "name").unwrap_or_default().to_string(),
                    type_ref: self
                        .field_text(param, "type")
                        .map(TypeRef::new)
                        .unwrap_or_default(),
                    modifiers,
                    attributes,
                }
            })
            .collect()
    }

    fn parameter_list<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        node.child_by_field_name("parameters").or_else(|| {
            named_children(node)
                .into_iter()
                .find(|n| n.kind() == "parameter_list")
        })
    }

    fn executable_body(&self, node: Node<'_>) -> Option<entity_lint_core::Body> {
        named_children(node)
            .into_iter()
            .find(|n| matches!(n.kind(), "block" | "arrow_expression_clause"))
            .map(|n| collect(n, self.src))
    }

    fn fields(&self, node: Node<'_>) -> Vec<Field> {
        let (modifiers, attributes) = self.header(node);
        let Some(declaration) = named_children(node)
            .into_iter()
            .find(|n| n.kind() == "variable_declaration")
        else {
            return Vec::new();
        };
        let type_ref = declaration
            .child_by_field_name("type")
            .or_else(|| declaration.named_child(0))
            .map(|n| TypeRef::new(self.text(n)))
            .unwrap_or_default();

        named_children(declaration)
            .into_iter()
            .filter(|n| n.kind() == "variable_declarator")
            .map(|declarator| {
                let name = self
                    .field_text(declarator, "name")
                    .or_else(|| declarator.named_child(0).map(|n| self.text(n)))
                    .unwrap_or_default();
                Field {
                    name: name.to_string(),
                    type_ref: type_ref.clone(),
                    modifiers: modifiers.clone(),
                    attributes: attributes.clone(),
                    initializer: initializer_of(declarator).map(|n| collect(n, self.src)),
                    line: line(declarator),
                }
            })
            .collect()
    }

    fn property(&self, node: Node<'_>) -> Property {
        let (modifiers, attributes) = self.header(node);
        let mut property = Property {
            name: self.field_text(node, "name").unwrap_or_default().to_string(),
            type_ref: self
                .field_text(node, "type")
                .map(TypeRef::new)
                .unwrap_or_default(),
            modifiers,
            attributes,
            line: line(node),
            ..Property::default()
        };

        for child in named_children(node) {
            match child.kind() {
                "accessor_list" => {
                    property.accessors = named_children(child)
                        .into_iter()
                        .filter(|n| n.kind() == "accessor_declaration")
                        .filter_map(|n| self.accessor(n))
                        .collect();
                }
                "arrow_expression_clause" => {
                    property.expression_body = Some(collect(child, self.src));
                }
                _ => {}
            }
        }
        property.initializer = initializer_of(node).map(|n| collect(n, self.src));
        property
    }

    fn accessor(&self, node: Node<'_>) -> Option<Accessor> {
        let kind = children(node).iter().find_map(|n| match n.kind() {
            "get" => Some(AccessorKind::Get),
            "set" => Some(AccessorKind::Set),
            "init" => Some(AccessorKind::Init),
            _ => None,
        })?;
        let (modifiers, _) = self.header(node);
        Some(Accessor {
            kind,
            modifiers,
            body: self.executable_body(node),
        })
    }

    fn method(&self, node: Node<'_>) -> Method {
        let (modifiers, attributes) = self.header(node);
        let return_type = self
            .field_text(node, "returns")
            .or_else(|| self.field_text(node, "type"))
            .map(TypeRef::new)
            .unwrap_or_default();
        let type_parameters = named_children(node)
            .into_iter()
            .find(|n| n.kind() == "type_parameter_list")
            .map(|n| self.type_parameters(n))
            .unwrap_or_default();

        Method {
            name: self.field_text(node, "name").unwrap_or_default().to_string(),
            return_type,
            modifiers,
            attributes,
            type_parameters,
            parameters: self.parameters(self.parameter_list(node)),
            body: self.executable_body(node),
            line: line(node),
        }
    }

    fn constructor(&self, node: Node<'_>) -> Constructor {
        let (modifiers, attributes) = self.header(node);
        let initializer = named_children(node)
            .into_iter()
            .find(|n| n.kind() == "constructor_initializer")
            .map(|init| {
                let kind = if children(init).iter().any(|t| t.kind() == "base") {
                    InitializerKind::Base
                } else {
                    InitializerKind::This
                };
                let arguments = named_children(init)
                    .into_iter()
                    .find(|n| n.kind() == "argument_list")
                    .map(|list| {
                        named_children(list)
                            .into_iter()
                            .map(|arg| self.text(arg).trim().to_string())
                            .collect()
                    })
                    .unwrap_or_default();
                ConstructorInitializer { kind, arguments }
            });

        Constructor {
            modifiers,
            attributes,
            parameters: self.parameters(self.parameter_list(node)),
            initializer,
            body: self.executable_body(node),
            line: line(node),
        }
    }
}

/// The expression after `=` in a declarator or property.
fn initializer_of(node: Node<'_>) -> Option<Node<'_>> {
    let tokens = children(node);
    if let Some(clause) = tokens.iter().find(|n| n.kind() == "equals_value_clause") {
        return clause.named_child(0);
    }
    let eq = tokens.iter().position(|n| n.kind() == "=")?;
    tokens[eq + 1..].iter().copied().find(|n| n.is_named())
}

fn qualify(outer: Option<&str>, name: &str) -> String {
    match outer {
        Some(outer) if !outer.is_empty() => format!("{outer}.{name}"),
        _ => name.to_string(),
    }
}
