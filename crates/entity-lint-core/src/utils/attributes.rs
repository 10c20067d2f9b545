//! Attribute detection utilities for rule implementations.

use crate::model::Attribute;

/// `System.ComponentModel.DataAnnotations` validation attributes.
pub const DATA_ANNOTATIONS: &[&str] = &[
    "Required",
    "MaxLength",
    "MinLength",
    "StringLength",
    "Range",
    "RegularExpression",
    "EmailAddress",
    "Phone",
    "Url",
    "CreditCard",
    "Compare",
    "Key",
    "DataType",
];

/// Checks if attributes contain `name` (namespace and `Attribute` suffix ignored).
#[must_use]
pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.short_name() == name)
}

/// First data-annotation attribute in `attrs`.
#[must_use]
pub fn find_data_annotation(attrs: &[Attribute]) -> Option<&Attribute> {
    attrs
        .iter()
        .find(|attr| DATA_ANNOTATIONS.contains(&attr.short_name()))
}
