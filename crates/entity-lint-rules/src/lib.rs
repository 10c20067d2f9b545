//! # entity-lint-rules
//!
//! The domain-entity rule catalog.
//!
//! Every rule is a unit struct implementing [`Rule`]. Rules evaluate
//! concrete domain entities (classes deriving from a self-constrained
//! marker base such as `EntityBase<T> where T : EntityBase<T>`) unless
//! noted otherwise.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | DE001 | `DE001_SealedClass` | Concrete classes without subclasses are `sealed` (all classes) |
//! | DE002 | `DE002_PrivateConstructors` | Exactly two private constructors, one parameterless |
//! | DE003 | `DE003_ConstructorNoValidation` | Constructors do not call `Validate*` / `IsValid*` |
//! | DE006 | `DE006_RegisterNewFactory` | `public static T? RegisterNew(...)` exists |
//! | DE007 | `DE007_CreateFromExistingInfoFactory` | `public static T CreateFromExistingInfo(...)` exists |
//! | DE008 | `DE008_NoVoidMutations` | Public methods do not return `void` |
//! | DE009 | `DE009_NoResultWrapperReturns` | No `Result` / `Either` / `ErrorOr` returns |
//! | DE010 | `DE010_MutationReturnsNullableSelf` | Mutation methods return `T?` |
//! | DE011 | `DE011_NoDateTimeNow` | No `DateTime.Now` and friends |
//! | DE012 | `DE012_NoThrowInEntity` | No `throw` outside framework guard clauses |
//! | DE013 | `DE013_BitwiseAndInInternalValidation` | `*Internal` methods use `&`, not `&&` |
//! | DE014 | `DE014_ValidateMethodsPublicStatic` | `Validate*` methods are `public static bool` |
//! | DE015 | `DE015_ValidateUsesValidationUtils` | `Validate*` methods call `ValidationUtils` |
//! | DE016 | `DE016_IsValidMethod` | `bool IsValid(...)` exists |
//! | DE017 | `DE017_PublicMethodsNoPublicCalls` | Public methods do not call each other |
//! | DE018 | `DE018_InternalMethodsPrivate` | `*Internal` methods are private |
//! | DE020 | `DE020_InternalMethodNaming` | `*Internal` names pair with a public method |
//! | DE021 | `DE021_ChangeMethodsUseInternal` | `Change*` methods delegate to `*Internal` |
//! | DE022 | `DE022_RegisterNewValidates` | `RegisterNew` validates |
//! | DE023 | `DE023_CreateFromExistingInfoSkipsValidation` | `CreateFromExistingInfo` does not validate |
//! | DE024 | `DE024_CloneReturnsSelf` | `public T Clone()` exists |
//! | DE025 | `DE025_NoPublicSetters` | No public `set` accessors |
//! | DE026 | `DE026_NoPublicFields` | Instance fields are private |
//! | DE027 | `DE027_StaticFieldsReadonly` | Static fields are `readonly` |
//! | DE028 | `DE028_NoAsyncMembers` | No `async` / `Task` methods |
//! | DE030 | `DE030_MetadataClassNested` | `{T}Metadata` is nested in the entity |
//! | DE031 | `DE031_MetadataClassStatic` | `{T}Metadata` is `public static class` |
//! | DE032 | `DE032_MetadataNamingConvention` | Members are `{PropertyName}{ConstraintType}` |
//! | DE033 | `DE033_MetadataInitialization` | Members are initialized inline |
//! | DE034 | `DE034_NoDataAnnotations` | No `[Required]`-style attributes |
//! | DE035 | `DE035_ChangeMetadataUsesLock` | `Change*Metadata` takes a lock |
//! | DE036 | `DE036_LockTargetPrivate` | Lock targets are private readonly fields |
//! | DE040 | `DE040_PrivateCollectionFields` | Collection fields are private |
//! | DE041 | `DE041_ReadOnlyCollectionProperties` | Collection properties are read-only views |
//! | DE042 | `DE042_CollectionDefensiveCopy` | Constructors copy collection parameters |
//! | DE043 | `DE043_NullableCollectionInitialized` | Nullable collections are initialized |
//! | DE050 | `DE050_AggregateRootInterface` | Aggregate-root interfaces extend the marker |
//! | DE051 | `DE051_EntityDomainInterface` | Entities implement `I{T}` (warning) |
//! | DE052 | `DE052_DomainInterfaceExtendsEntity` | `I{T}` extends a marker interface |
//! | DE055 | `DE055_AbstractEntityFactory` | Abstract entities expose `RegisterNewBase` |
//!
//! ## Usage
//!
//! ```ignore
//! use entity_lint_core::Analyzer;
//! use entity_lint_rules::all_rules;
//!
//! let analyzer = Analyzer::builder().rules(all_rules()).build()?;
//! let report = analyzer.run(&compilations, Path::new("."));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod class_shape;
mod collections;
mod constructors;
mod factories;
mod interfaces;
mod internals;
mod locking;
mod metadata;
mod registry;
mod returns;
mod side_effects;
mod support;
mod validation;

#[cfg(test)]
mod test_support;

pub use class_shape::{NoPublicFields, NoPublicSetters, SealedClass, StaticFieldsReadonly};
pub use collections::{
    CollectionDefensiveCopy, NullableCollectionInitialized, PrivateCollectionFields,
    ReadOnlyCollectionProperties,
};
pub use constructors::{ConstructorNoValidation, PrivateConstructors};
pub use factories::{
    AbstractEntityFactory, CreateFromExistingInfoFactory, CreateFromExistingInfoSkipsValidation,
    RegisterNewFactory, RegisterNewValidates,
};
pub use interfaces::{AggregateRootInterface, DomainInterfaceExtendsEntity, EntityDomainInterface};
pub use internals::{
    ChangeMethodsUseInternal, InternalMethodNaming, InternalMethodsPrivate,
    PublicMethodsNoPublicCalls,
};
pub use locking::{ChangeMetadataUsesLock, LockTargetPrivate};
pub use metadata::{
    MetadataClassNested, MetadataClassStatic, MetadataInitialization, MetadataNamingConvention,
    NoDataAnnotations,
};
pub use registry::{all_rules, find_rule, select_rules, Family};
pub use returns::{
    CloneReturnsSelf, MutationReturnsNullableSelf, NoAsyncMembers, NoResultWrapperReturns,
    NoVoidMutations, MUTATION_PREFIXES, RESULT_WRAPPERS,
};
pub use side_effects::{NoDateTimeNow, NoThrowInEntity, CLOCK_READS, GUARD_CLAUSES};
pub use validation::{
    BitwiseAndInInternalValidation, IsValidMethod, ValidateMethodsPublicStatic,
    ValidateUsesValidationUtils, VALIDATION_UTILS,
};

/// Re-export core types for convenience.
pub use entity_lint_core::{Rule, Severity, Violation};
