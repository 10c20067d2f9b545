//! The rule catalog, grouped by family.

use entity_lint_core::RuleBox;
use tracing::warn;

use crate::{
    AbstractEntityFactory, AggregateRootInterface, BitwiseAndInInternalValidation,
    ChangeMetadataUsesLock, ChangeMethodsUseInternal, CloneReturnsSelf, CollectionDefensiveCopy,
    ConstructorNoValidation, CreateFromExistingInfoFactory, CreateFromExistingInfoSkipsValidation,
    DomainInterfaceExtendsEntity, EntityDomainInterface, InternalMethodNaming,
    InternalMethodsPrivate, IsValidMethod, LockTargetPrivate, MetadataClassNested,
    MetadataClassStatic, MetadataInitialization, MetadataNamingConvention,
    MutationReturnsNullableSelf, NoAsyncMembers, NoDataAnnotations, NoDateTimeNow,
    NoPublicFields, NoPublicSetters, NoResultWrapperReturns, NoThrowInEntity, NoVoidMutations,
    NullableCollectionInitialized, PrivateCollectionFields, PrivateConstructors,
    PublicMethodsNoPublicCalls, ReadOnlyCollectionProperties, RegisterNewFactory,
    RegisterNewValidates, SealedClass, StaticFieldsReadonly, ValidateMethodsPublicStatic,
    ValidateUsesValidationUtils,
};

/// A group of rules sharing one predicate family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Type and member modifiers.
    ClassShape,
    /// Constructor count, accessibility and content.
    Constructors,
    /// `RegisterNew`, `CreateFromExistingInfo`, `RegisterNewBase`.
    Factories,
    /// Return-type conventions.
    Returns,
    /// `Validate*` / `IsValid` methods.
    Validation,
    /// `*Internal` helper methods.
    Internals,
    /// Clock reads and exceptions.
    SideEffects,
    /// The nested metadata class.
    Metadata,
    /// Locks around metadata changes.
    Locking,
    /// Collection encapsulation.
    Collections,
    /// Domain interfaces.
    Interfaces,
}

impl Family {
    /// Every family in catalog order.
    pub const ALL: [Family; 11] = [
        Self::ClassShape,
        Self::Constructors,
        Self::Factories,
        Self::Returns,
        Self::Validation,
        Self::Internals,
        Self::SideEffects,
        Self::Metadata,
        Self::Locking,
        Self::Collections,
        Self::Interfaces,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ClassShape => "class shape",
            Self::Constructors => "constructors",
            Self::Factories => "factories",
            Self::Returns => "returns",
            Self::Validation => "validation",
            Self::Internals => "internal methods",
            Self::SideEffects => "side effects",
            Self::Metadata => "metadata",
            Self::Locking => "locking",
            Self::Collections => "collections",
            Self::Interfaces => "interfaces",
        }
    }

    /// The rules of this family.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::ClassShape => vec![
                Box::new(SealedClass::new()),
                Box::new(NoPublicSetters::new()),
                Box::new(NoPublicFields::new()),
                Box::new(StaticFieldsReadonly::new()),
            ],
            Self::Constructors => vec![
                Box::new(PrivateConstructors::new()),
                Box::new(ConstructorNoValidation::new()),
            ],
            Self::Factories => vec![
                Box::new(RegisterNewFactory::new()),
                Box::new(CreateFromExistingInfoFactory::new()),
                Box::new(RegisterNewValidates::new()),
                Box::new(CreateFromExistingInfoSkipsValidation::new()),
                Box::new(AbstractEntityFactory::new()),
            ],
            Self::Returns => vec![
                Box::new(NoVoidMutations::new()),
                Box::new(NoResultWrapperReturns::new()),
                Box::new(MutationReturnsNullableSelf::new()),
                Box::new(CloneReturnsSelf::new()),
                Box::new(NoAsyncMembers::new()),
            ],
            Self::Validation => vec![
                Box::new(BitwiseAndInInternalValidation::new()),
                Box::new(ValidateMethodsPublicStatic::new()),
                Box::new(ValidateUsesValidationUtils::new()),
                Box::new(IsValidMethod::new()),
            ],
            Self::Internals => vec![
                Box::new(PublicMethodsNoPublicCalls::new()),
                Box::new(InternalMethodsPrivate::new()),
                Box::new(InternalMethodNaming::new()),
                Box::new(ChangeMethodsUseInternal::new()),
            ],
            Self::SideEffects => vec![
                Box::new(NoDateTimeNow::new()),
                Box::new(NoThrowInEntity::new()),
            ],
            Self::Metadata => vec![
                Box::new(MetadataClassNested::new()),
                Box::new(MetadataClassStatic::new()),
                Box::new(MetadataNamingConvention::new()),
                Box::new(MetadataInitialization::new()),
                Box::new(NoDataAnnotations::new()),
            ],
            Self::Locking => vec![
                Box::new(ChangeMetadataUsesLock::new()),
                Box::new(LockTargetPrivate::new()),
            ],
            Self::Collections => vec![
                Box::new(PrivateCollectionFields::new()),
                Box::new(ReadOnlyCollectionProperties::new()),
                Box::new(CollectionDefensiveCopy::new()),
                Box::new(NullableCollectionInitialized::new()),
            ],
            Self::Interfaces => vec![
                Box::new(AggregateRootInterface::new()),
                Box::new(EntityDomainInterface::new()),
                Box::new(DomainInterfaceExtendsEntity::new()),
            ],
        }
    }

    /// Family of the rule with `code`.
    #[must_use]
    pub fn of(code: &str) -> Option<Family> {
        Self::ALL
            .into_iter()
            .find(|family| family.rules().iter().any(|r| r.code() == code))
    }
}

/// Returns every rule, ordered by code.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    let mut rules: Vec<RuleBox> = Family::ALL.into_iter().flat_map(Family::rules).collect();
    rules.sort_by_key(|r| r.code());
    rules
}

/// Looks a rule up by name (`DE001_SealedClass`) or code (`DE001`).
#[must_use]
pub fn find_rule(id: &str) -> Option<RuleBox> {
    all_rules()
        .into_iter()
        .find(|r| r.name() == id || r.code() == id)
}

/// Rules matching any of `ids` (names or codes), in catalog order.
///
/// Unknown ids are logged and ignored.
#[must_use]
pub fn select_rules<S: AsRef<str>>(ids: &[S]) -> Vec<RuleBox> {
    for id in ids {
        let id = id.as_ref();
        if find_rule(id).is_none() {
            warn!("Unknown rule filter ignored: {}", id);
        }
    }
    all_rules()
        .into_iter()
        .filter(|r| {
            ids.iter()
                .any(|id| r.name() == id.as_ref() || r.code() == id.as_ref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_is_complete_and_unique() {
        let rules = all_rules();
        assert_eq!(rules.len(), 40);

        let names: HashSet<&str> = rules.iter().map(|r| r.name()).collect();
        let codes: HashSet<&str> = rules.iter().map(|r| r.code()).collect();
        assert_eq!(names.len(), 40);
        assert_eq!(codes.len(), 40);

        let codes: Vec<&str> = rules.iter().map(|r| r.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_metadata_is_consistent() {
        for rule in all_rules() {
            assert!(
                rule.name().starts_with(&format!("{}_", rule.code())),
                "{}",
                rule.name()
            );
            let number = &rule.code()[2..];
            assert!(
                rule.adr_path()
                    .starts_with(&format!("docs/adrs/domain-entities/DE-{number}-")),
                "{}",
                rule.adr_path()
            );
            assert!(
                std::path::Path::new(rule.adr_path())
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("md")),
                "{}",
                rule.adr_path()
            );
            assert!(!rule.description().is_empty());
        }
    }

    #[test]
    fn test_descriptions_name_the_convention() {
        let description = |id: &str| find_rule(id).map(|r| r.description()).unwrap_or_default();
        assert!(description("DE001").contains("sealed"));
        assert!(description("DE014").contains("Validate"));
        assert!(description("DE015").contains("ValidationUtils"));
    }

    #[test]
    fn test_find_rule_by_name_or_code() {
        let by_code = find_rule("DE008").expect("by code");
        let by_name = find_rule("DE008_NoVoidMutations").expect("by name");
        assert_eq!(by_code.name(), by_name.name());
        assert!(find_rule("DE999").is_none());
    }

    #[test]
    fn test_select_rules_keeps_catalog_order() {
        let selected = select_rules(&["DE008_NoVoidMutations", "DE001", "DE999"]);
        let codes: Vec<&str> = selected.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["DE001", "DE008"]);
    }

    #[test]
    fn test_family_lookup() {
        assert_eq!(Family::of("DE013"), Some(Family::Validation));
        assert_eq!(Family::of("DE055"), Some(Family::Factories));
        assert_eq!(Family::of("AL001"), None);
    }
}
