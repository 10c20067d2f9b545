//! Collects the syntax facts of executable regions into a [`Body`].

use tree_sitter::Node;

use entity_lint_core::{
    Assignment, BinaryOperation, Body, Invocation, Lock, MemberAccess, ObjectCreation, Throw,
    TypeRef,
};

pub(crate) fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

pub(crate) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub(crate) fn text<'s>(node: Node<'_>, src: &'s [u8]) -> &'s str {
    node.utf8_text(src).unwrap_or("")
}

pub(crate) fn line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Builds the [`Body`] of the region rooted at `node`.
pub(crate) fn collect(node: Node<'_>, src: &[u8]) -> Body {
    let mut body = Body::new(text(node, src));
    visit(node, src, &mut body);
    body
}

fn visit(node: Node<'_>, src: &[u8], body: &mut Body) {
    match node.kind() {
        "invocation_expression" => {
            let function = node
                .child_by_field_name("function")
                .or_else(|| node.named_child(0));
            if let Some(function) = function {
                let arguments = node
                    .child_by_field_name("arguments")
                    .map(|args| arguments(args, src))
                    .unwrap_or_default();
                body.invocations.push(Invocation::new(
                    text(function, src),
                    arguments,
                    line(node),
                ));
            }
        }
        "member_access_expression" => body.member_accesses.push(MemberAccess {
            text: compact(text(node, src)),
            line: line(node),
        }),
        "binary_expression" => {
            if let [left, operator, right] = children(node)[..] {
                body.binary_operations.push(BinaryOperation {
                    operator: text(operator, src).to_string(),
                    left: text(left, src).to_string(),
                    right: text(right, src).to_string(),
                    line: line(node),
                });
            }
        }
        "assignment_expression" => {
            if let [target, operator, value] = children(node)[..] {
                body.assignments.push(Assignment {
                    target: compact(text(target, src)),
                    operator: text(operator, src).to_string(),
                    value: text(value, src).trim().to_string(),
                    line: line(node),
                });
            }
        }
        "throw_statement" | "throw_expression" => body.throws.push(Throw {
            expression: node.named_child(0).map(|e| text(e, src).to_string()),
            line: line(node),
        }),
        "lock_statement" => {
            if let Some(target) = node.named_child(0) {
                body.locks.push(Lock {
                    target: compact(text(target, src)),
                    line: line(node),
                });
            }
        }
        "object_creation_expression" => {
            let created = node
                .child_by_field_name("type")
                .or_else(|| node.named_child(0));
            if let Some(created) = created {
                let arguments = node
                    .child_by_field_name("arguments")
                    .or_else(|| {
                        named_children(node)
                            .into_iter()
                            .find(|c| c.kind() == "argument_list")
                    })
                    .map(|args| arguments(args, src))
                    .unwrap_or_default();
                body.creations.push(ObjectCreation {
                    type_ref: TypeRef::new(text(created, src)),
                    arguments,
                    line: line(node),
                });
            }
        }
        "return_statement" => {
            if let Some(value) = node.named_child(0) {
                body.returns.push(text(value, src).trim().to_string());
            }
        }
        _ => {}
    }

    for child in named_children(node) {
        visit(child, src, body);
    }
}

fn arguments(list: Node<'_>, src: &[u8]) -> Vec<String> {
    named_children(list)
        .into_iter()
        .filter(|arg| arg.kind() == "argument")
        .map(|arg| text(arg, src).trim().to_string())
        .collect()
}
