//! Naming conventions shared by the rule catalog.
//!
//! Each convention is a wildcard pattern where `*` matches zero or more
//! characters. Rules combine them with their own fixed exemption lists.

/// Constraint suffixes allowed on metadata members (`{PropertyName}{ConstraintType}`).
pub const CONSTRAINT_TYPES: &[&str] = &[
    "IsRequired",
    "IsUnique",
    "IsReadOnly",
    "MinLength",
    "MaxLength",
    "Pattern",
    "Format",
    "MinValue",
    "MaxValue",
    "MinAgeInYears",
    "MaxAgeInYears",
    "MinAgeInDays",
    "MaxAgeInDays",
    "PropertyName",
];

/// `System.Object` overrides.
pub const OBJECT_OVERRIDES: &[&str] = &["ToString", "Equals", "GetHashCode"];

/// A named method-naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// `Validate*`
    Validate,
    /// `IsValid*`
    IsValid,
    /// `*Internal`
    Internal,
    /// `RegisterNew`
    RegisterNew,
    /// `CreateFromExistingInfo`
    CreateFromExistingInfo,
    /// `Change*Metadata`
    ChangeMetadata,
    /// `Process*For*Internal`
    ProcessForInternal,
    /// `Validate*For*Internal`
    ValidateForInternal,
    /// `Change*`
    Change,
}

impl Convention {
    /// Wildcard pattern of this convention.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Validate => "Validate*",
            Self::IsValid => "IsValid*",
            Self::Internal => "*Internal",
            Self::RegisterNew => "RegisterNew",
            Self::CreateFromExistingInfo => "CreateFromExistingInfo",
            Self::ChangeMetadata => "Change*Metadata",
            Self::ProcessForInternal => "Process*For*Internal",
            Self::ValidateForInternal => "Validate*For*Internal",
            Self::Change => "Change*",
        }
    }

    /// `true` when `name` follows this convention.
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        matches_pattern(self.pattern(), name)
    }

    /// `Validate*` or `IsValid*`.
    #[must_use]
    pub fn is_validation(name: &str) -> bool {
        Self::Validate.matches(name) || Self::IsValid.matches(name)
    }
}

/// Matches `name` against a pattern where `*` stands for any run of characters.
#[must_use]
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        return false;
    };
    if parts.len() == 1 {
        return pattern == name;
    }

    let Some(rest) = name.strip_prefix(first) else {
        return false;
    };
    let Some(mut middle) = rest.strip_suffix(last) else {
        return false;
    };
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match middle.find(part) {
            Some(at) => middle = &middle[at + part.len()..],
            None => return false,
        }
    }
    true
}

/// `true` when any pattern matches.
#[must_use]
pub fn matches_any(patterns: &[&str], name: &str) -> bool {
    patterns.iter().any(|p| matches_pattern(p, name))
}

/// `true` when `name` starts with the word `prefix`, i.e. the prefix is the
/// whole name or is followed by an uppercase letter (`SetName`, not `Settle`).
#[must_use]
pub fn has_word_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.chars().next().map_or(true, char::is_uppercase))
}

/// Splits a metadata member name into `(property, constraint)` when it ends in
/// a known constraint type and the remainder names one of `properties`.
#[must_use]
pub fn split_constraint<'n>(
    member: &'n str,
    properties: &[&str],
) -> Option<(&'n str, &'static str)> {
    CONSTRAINT_TYPES.iter().find_map(|constraint| {
        let property = member.strip_suffix(constraint)?;
        (!property.is_empty() && properties.contains(&property)).then_some((property, *constraint))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_patterns() {
        assert!(matches_pattern("Validate*", "Validate"));
        assert!(matches_pattern("Validate*", "ValidateName"));
        assert!(!matches_pattern("Validate*", "IsValid"));
        assert!(matches_pattern("*Internal", "ChangeNameInternal"));
        assert!(matches_pattern("Change*Metadata", "ChangeMetadata"));
        assert!(matches_pattern("Change*Metadata", "ChangeNameMetadata"));
        assert!(matches_pattern(
            "Process*For*Internal",
            "ProcessAddressForUpdateInternal"
        ));
        assert!(!matches_pattern("Process*For*Internal", "ProcessAddressInternal"));
        assert!(matches_pattern("RegisterNew", "RegisterNew"));
        assert!(!matches_pattern("RegisterNew", "RegisterNewBase"));
    }

    #[test]
    fn prefix_and_suffix_do_not_overlap() {
        assert!(!matches_pattern("Ab*ba", "Aba"));
    }

    #[test]
    fn overlapping_conventions() {
        assert!(Convention::Validate.matches("ValidateInternal"));
        assert!(Convention::Internal.matches("ValidateInternal"));
        assert!(Convention::is_validation("IsValidEmail"));
        assert!(!Convention::is_validation("Revalidate"));
    }

    #[test]
    fn word_prefix() {
        assert!(has_word_prefix("SetName", "Set"));
        assert!(has_word_prefix("Set", "Set"));
        assert!(!has_word_prefix("Settle", "Set"));
    }

    #[test]
    fn constraint_split() {
        let props = ["Name", "BirthDate"];
        assert_eq!(
            split_constraint("NameMaxLength", &props),
            Some(("Name", "MaxLength"))
        );
        assert_eq!(
            split_constraint("BirthDateMinAgeInYears", &props),
            Some(("BirthDate", "MinAgeInYears"))
        );
        assert_eq!(split_constraint("NameSize", &props), None);
        assert_eq!(split_constraint("EmailMaxLength", &props), None);
    }
}
