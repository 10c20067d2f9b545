//! Flattened syntax facts for executable regions.

use super::type_ref::{strip_type_arguments, TypeRef};

/// Syntax summary of one executable region: a block body, an expression
/// body, or an initializer.
///
/// Front ends record every interesting expression found anywhere inside the
/// region (including lambdas and local functions) in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    /// Raw source text of the region.
    pub text: String,
    /// Method invocations.
    pub invocations: Vec<Invocation>,
    /// Member access expressions such as `DateTime.UtcNow`.
    pub member_accesses: Vec<MemberAccess>,
    /// Binary operator expressions.
    pub binary_operations: Vec<BinaryOperation>,
    /// `throw` statements and expressions.
    pub throws: Vec<Throw>,
    /// `lock` statements.
    pub locks: Vec<Lock>,
    /// Assignment expressions (`=`, `+=`, `??=`, ...).
    pub assignments: Vec<Assignment>,
    /// `new T(...)` expressions.
    pub creations: Vec<ObjectCreation>,
    /// Expressions returned by `return` statements.
    pub returns: Vec<String>,
}

impl Body {
    /// Creates an empty body with the given source text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// First invocation whose callee name satisfies `predicate`.
    pub fn find_call(&self, predicate: impl Fn(&Invocation) -> bool) -> Option<&Invocation> {
        self.invocations.iter().find(|i| predicate(i))
    }

    /// `true` when a method called `name` is invoked.
    #[must_use]
    pub fn calls(&self, name: &str) -> bool {
        self.invocations.iter().any(|i| i.name == name)
    }

    /// First binary operation using `operator`.
    #[must_use]
    pub fn find_operator(&self, operator: &str) -> Option<&BinaryOperation> {
        self.binary_operations
            .iter()
            .find(|op| op.operator == operator)
    }
}

/// A method invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Callee text without type arguments, e.g. `ValidationUtils.ValidateName`.
    pub callee: String,
    /// Invoked method name, e.g. `ValidateName`.
    pub name: String,
    /// Receiver text, e.g. `ValidationUtils`; `None` for unqualified calls.
    pub receiver: Option<String>,
    /// Argument source texts.
    pub arguments: Vec<String>,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Invocation {
    /// Creates an invocation from the callee expression text.
    #[must_use]
    pub fn new(callee_text: &str, arguments: Vec<String>, line: usize) -> Self {
        let callee: String = strip_type_arguments(callee_text)
            .replace("?.", ".")
            .replace('!', "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let (receiver, name) = match callee.rsplit_once('.') {
            Some((receiver, name)) => (Some(receiver.to_string()), name.to_string()),
            None => (None, callee.clone()),
        };
        Self {
            callee,
            name,
            receiver,
            arguments,
            line,
        }
    }

    /// `true` for unqualified calls and calls through `this`.
    #[must_use]
    pub fn is_on_self(&self) -> bool {
        matches!(self.receiver.as_deref(), None | Some("this"))
    }
}

/// A member access expression such as `DateTime.UtcNow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccess {
    /// Full source text, whitespace removed.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
}

impl MemberAccess {
    /// `true` when the access is `path` or ends with `.path`.
    #[must_use]
    pub fn is(&self, path: &str) -> bool {
        self.text == path
            || self
                .text
                .strip_suffix(path)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

/// A binary operator expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOperation {
    /// Operator token, e.g. `&&`.
    pub operator: String,
    /// Left operand text.
    pub left: String,
    /// Right operand text.
    pub right: String,
    /// Line number (1-indexed).
    pub line: usize,
}

/// A `throw` statement or expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throw {
    /// Thrown expression; `None` for a bare rethrow.
    pub expression: Option<String>,
    /// Line number (1-indexed).
    pub line: usize,
}

/// A `lock` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    /// Locked expression text.
    pub target: String,
    /// Line number (1-indexed).
    pub line: usize,
}

/// An assignment expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Assigned target text.
    pub target: String,
    /// Operator token, e.g. `=` or `??=`.
    pub operator: String,
    /// Assigned value text.
    pub value: String,
    /// Line number (1-indexed).
    pub line: usize,
}

/// A `new T(...)` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreation {
    /// Created type.
    pub type_ref: TypeRef,
    /// Constructor argument texts.
    pub arguments: Vec<String>,
    /// Line number (1-indexed).
    pub line: usize,
}
