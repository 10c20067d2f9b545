//! Textual type references with just enough structure for the rule catalog.

use std::collections::HashMap;
use std::fmt;

/// Collection types whose contents can be mutated through the reference.
pub const MUTABLE_COLLECTIONS: &[&str] = &[
    "List",
    "IList",
    "ICollection",
    "Collection",
    "ObservableCollection",
    "HashSet",
    "ISet",
    "SortedSet",
    "Dictionary",
    "IDictionary",
    "SortedDictionary",
    "SortedList",
    "Queue",
    "Stack",
    "LinkedList",
];

/// Collection types that only expose a read-only view.
pub const READ_ONLY_COLLECTIONS: &[&str] = &[
    "IEnumerable",
    "IReadOnlyCollection",
    "IReadOnlyList",
    "IReadOnlySet",
    "IReadOnlyDictionary",
    "ReadOnlyCollection",
    "ReadOnlyDictionary",
    "ImmutableArray",
    "ImmutableList",
    "ImmutableHashSet",
    "ImmutableDictionary",
];

/// A reference to a type as written in source, with whitespace removed.
///
/// `Dictionary<string, List<int>>?` is stored as `Dictionary<string,List<int>>?`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeRef {
    text: String,
}

impl TypeRef {
    /// Creates a type reference from source text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    /// The normalised source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `true` for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.text == "void"
    }

    /// `true` when the reference carries a trailing `?`.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.text.ends_with('?')
    }

    /// The same reference without the nullable annotation.
    #[must_use]
    pub fn non_nullable(&self) -> TypeRef {
        Self {
            text: self.text.trim_end_matches('?').to_string(),
        }
    }

    /// `true` for array types such as `string[]`.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.text.trim_end_matches('?').ends_with(']')
    }

    /// `true` when the reference has type arguments.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.text.contains('<')
    }

    /// Unqualified name without type arguments or nullable marker.
    ///
    /// `global::System.Collections.Generic.List<int>?` yields `List`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let head = self.head();
        let head = head.rsplit("::").next().unwrap_or(head);
        head.rsplit('.').next().unwrap_or(head)
    }

    /// Dotted name without type arguments, nullable marker or `global::`.
    ///
    /// `global::Sales.Order<int>?` yields `Sales.Order`.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        let head = self.head();
        head.rsplit("::").next().unwrap_or(head)
    }

    /// Replaces unqualified identifiers bound in `bindings`.
    ///
    /// `EntityBase<TSelf>` with `TSelf` bound to `Customer` yields `EntityBase<Customer>`.
    #[must_use]
    pub fn substitute(&self, bindings: &HashMap<&str, TypeRef>) -> TypeRef {
        if bindings.is_empty() {
            return self.clone();
        }
        let mut out = String::with_capacity(self.text.len());
        let mut ident = String::new();
        let mut qualified = false;
        let flush = |ident: &mut String, qualified: bool, out: &mut String| {
            match bindings.get(ident.as_str()) {
                Some(bound) if !qualified => out.push_str(bound.as_str()),
                _ => out.push_str(ident),
            }
            ident.clear();
        };
        for c in self.text.chars() {
            if c.is_alphanumeric() || c == '_' {
                if ident.is_empty() {
                    qualified = out.ends_with(['.', ':']);
                }
                ident.push(c);
            } else {
                flush(&mut ident, qualified, &mut out);
                out.push(c);
            }
        }
        flush(&mut ident, qualified, &mut out);
        Self { text: out }
    }

    /// Top-level type arguments, e.g. `[string, List<int>]` for `Dictionary<string, List<int>>`.
    #[must_use]
    pub fn generic_arguments(&self) -> Vec<TypeRef> {
        let text = self.text.trim_end_matches('?');
        let (Some(open), Some(close)) = (text.find('<'), text.rfind('>')) else {
            return Vec::new();
        };
        if close <= open {
            return Vec::new();
        }
        split_top_level(&text[open + 1..close], ',')
            .into_iter()
            .map(TypeRef::new)
            .collect()
    }

    /// `true` when the simple name equals `name`.
    #[must_use]
    pub fn refers_to(&self, name: &str) -> bool {
        self.simple_name() == name
    }

    /// `true` for `Name?`.
    #[must_use]
    pub fn is_nullable_of(&self, name: &str) -> bool {
        self.is_nullable() && !self.is_generic() && self.refers_to(name)
    }

    /// `true` for arrays and well-known collection types.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.is_array() || self.is_mutable_collection() || {
            let name = self.simple_name();
            READ_ONLY_COLLECTIONS.contains(&name)
        }
    }

    /// `true` for arrays and collection types that allow mutation.
    #[must_use]
    pub fn is_mutable_collection(&self) -> bool {
        self.is_array() || MUTABLE_COLLECTIONS.contains(&self.simple_name())
    }

    fn head(&self) -> &str {
        let text = self.text.trim_end_matches('?');
        let end = text.find(['<', '[']).unwrap_or(text.len());
        &text[..end]
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Removes every balanced `<...>` segment, e.g. `Utils.Check<List<int>>` to `Utils.Check`.
#[must_use]
pub fn strip_type_arguments(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Splits on `separator` outside of `<>`, `()` and `[]` nesting.
#[must_use]
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_whitespace() {
        let t = TypeRef::new("Dictionary<string, List<int>> ?");
        assert_eq!(t.as_str(), "Dictionary<string,List<int>>?");
    }

    #[test]
    fn simple_name_strips_qualifiers() {
        assert_eq!(
            TypeRef::new("global::System.Collections.Generic.List<int>?").simple_name(),
            "List"
        );
        assert_eq!(TypeRef::new("Customer?").simple_name(), "Customer");
        assert_eq!(TypeRef::new("string[]").simple_name(), "string");
    }

    #[test]
    fn generic_arguments_are_top_level() {
        let args = TypeRef::new("Either<Error, List<Customer>>").generic_arguments();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].as_str(), "Error");
        assert_eq!(args[1].as_str(), "List<Customer>");
    }

    #[test]
    fn nullable_self() {
        assert!(TypeRef::new("Customer?").is_nullable_of("Customer"));
        assert!(!TypeRef::new("Customer").is_nullable_of("Customer"));
        assert!(!TypeRef::new("List<Customer>?").is_nullable_of("Customer"));
    }

    #[test]
    fn collection_classification() {
        assert!(TypeRef::new("List<Order>").is_mutable_collection());
        assert!(TypeRef::new("Order[]").is_mutable_collection());
        assert!(TypeRef::new("IReadOnlyList<Order>").is_collection());
        assert!(!TypeRef::new("IReadOnlyList<Order>").is_mutable_collection());
        assert!(!TypeRef::new("string").is_collection());
    }

    #[test]
    fn strips_type_arguments() {
        assert_eq!(
            strip_type_arguments("ValidationUtils.Check<List<int>>"),
            "ValidationUtils.Check"
        );
    }

    #[test]
    fn qualified_name_keeps_namespaces() {
        assert_eq!(
            TypeRef::new("global::Sales.Order<int>?").qualified_name(),
            "Sales.Order"
        );
        assert_eq!(TypeRef::new("Order").qualified_name(), "Order");
    }

    #[test]
    fn substitutes_type_parameters() {
        let bindings = HashMap::from([("T", TypeRef::new("Customer"))]);
        assert_eq!(
            TypeRef::new("EntityBase<T>").substitute(&bindings).as_str(),
            "EntityBase<Customer>"
        );
        assert_eq!(
            TypeRef::new("Map<T, Outer.T>").substitute(&bindings).as_str(),
            "Map<Customer,Outer.T>"
        );
        assert_eq!(
            TypeRef::new("TValue").substitute(&bindings).as_str(),
            "TValue"
        );
    }

    #[test]
    fn generic_detection() {
        assert!(TypeRef::new("EntityBase<Customer>").is_generic());
        assert!(!TypeRef::new("Customer").is_generic());
        assert!(!TypeRef::new("int[]").is_generic());
    }
}
