//! Lookups shared across rule families.

use entity_lint_core::utils::Convention;
use entity_lint_core::{Body, Invocation, Method, TypeDecl};

/// Public, non-static methods.
pub(crate) fn public_instance_methods(decl: &TypeDecl) -> impl Iterator<Item = &Method> {
    decl.methods
        .iter()
        .filter(|m| m.is_public() && !m.is_static())
}

/// Name of the metadata class of `decl`, e.g. `CustomerMetadata`.
pub(crate) fn metadata_name(decl: &TypeDecl) -> String {
    format!("{}Metadata", decl.name)
}

/// The nested `{T}Metadata` type.
pub(crate) fn metadata_class(decl: &TypeDecl) -> Option<&TypeDecl> {
    decl.nested_type(&metadata_name(decl))
}

/// First call to a `Validate*` or `IsValid*` method.
pub(crate) fn validation_call(body: &Body) -> Option<&Invocation> {
    body.find_call(|call| Convention::is_validation(&call.name))
}

/// Methods named `name` that have a body.
pub(crate) fn methods_named<'a>(
    decl: &'a TypeDecl,
    name: &'a str,
) -> impl Iterator<Item = (&'a Method, &'a Body)> {
    decl.methods
        .iter()
        .filter(move |m| m.name == name)
        .filter_map(|m| m.body.as_ref().map(|b| (m, b)))
}
