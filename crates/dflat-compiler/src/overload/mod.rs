//! Overload resolution for method calls and constructors.
//!
//! ## Algorithm
//!
//! Resolution works one class at a time, starting at the receiver's class:
//!
//! 1. Collect the overloads declared directly on the class with the called
//!    base name
//! 2. Exact pass: an overload whose parameter types equal the argument types
//!    is selected immediately
//! 3. Compatible pass: overloads whose parameters accept the arguments through
//!    base-class widening ([`compatible_args`]); one is selected, more than one
//!    is an ambiguity error
//! 4. Nothing matched: repeat on the parent class
//!
//! The first level that produces a match wins, so an override in a derived
//! class hides every base-class overload with the same base name and
//! signature. Widening never crosses levels: an exact match in the parent does
//! not beat a compatible match in the child.
//!
//! Constructors run the same two passes on the class alone; they are not
//! inherited.

use dflat_core::config::CONSTRUCTOR_NAME;
use dflat_core::{CanonicalName, LogicError, Result, SemanticError, ValueType};
use dflat_registry::{ClassMetadata, ClassRegistry};

/// Whether a value of type `derived` may be used where `base` is expected.
///
/// True if the types are equal, or both are classes and `base` is a proper
/// ancestor of `derived`.
pub fn type_is_or_base(registry: &ClassRegistry, base: &ValueType, derived: &ValueType) -> bool {
    if base == derived {
        return true;
    }

    match (base.class_name(), derived.class_name()) {
        (Some(base), Some(derived)) => registry
            .ancestors(derived)
            .skip(1)
            .any(|meta| meta.name == base),
        _ => false,
    }
}

/// Whether actual arguments fit formal parameters position by position.
pub fn compatible_args(registry: &ClassRegistry, formal: &[ValueType], actual: &[ValueType]) -> bool {
    formal.len() == actual.len()
        && formal
            .iter()
            .zip(actual)
            .all(|(f, a)| type_is_or_base(registry, f, a))
}

/// Select the overload of `base_name` that a call on `class` with `args`
/// binds to.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_method(
    registry: &ClassRegistry,
    class: &str,
    base_name: &str,
    args: &[ValueType],
) -> Result<CanonicalName> {
    if !registry.contains(class) {
        return Err(LogicError::UnregisteredClass {
            operation: "resolve_method",
            name: class.to_string(),
        }
        .into());
    }

    for meta in registry.ancestors(class) {
        if let Some(found) = resolve_in_class(registry, meta, base_name, args)? {
            tracing::trace!(
                class,
                owner = %meta.name,
                method = %found,
                "resolved method call"
            );
            return Ok(found);
        }
    }

    Err(undeclared(class, base_name, args))
}

/// Select the constructor of `class` that `new class(args)` binds to.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_constructor(
    registry: &ClassRegistry,
    class: &str,
    args: &[ValueType],
) -> Result<CanonicalName> {
    let meta = registry
        .lookup(class)
        .ok_or_else(|| LogicError::UnregisteredClass {
            operation: "resolve_constructor",
            name: class.to_string(),
        })?;

    resolve_in_class(registry, meta, CONSTRUCTOR_NAME, args)?
        .ok_or_else(|| undeclared(class, CONSTRUCTOR_NAME, args))
}

/// Run the exact and compatible passes against one class.
fn resolve_in_class(
    registry: &ClassRegistry,
    meta: &ClassMetadata,
    base_name: &str,
    args: &[ValueType],
) -> Result<Option<CanonicalName>> {
    if let Some(exact) = meta.overloads(base_name).find(|m| m.params() == args) {
        return Ok(Some(exact.clone()));
    }

    let mut compatible = meta
        .overloads(base_name)
        .filter(|m| compatible_args(registry, m.params(), args));

    let Some(first) = compatible.next() else {
        return Ok(None);
    };
    let rest: Vec<_> = compatible.collect();
    if rest.is_empty() {
        return Ok(Some(first.clone()));
    }

    let candidates = std::iter::once(first)
        .chain(rest)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    tracing::debug!(class = %meta.name, base_name, %candidates, "ambiguous call");
    Err(SemanticError::AmbiguousCall {
        class: meta.name.clone(),
        method: base_name.to_string(),
        candidates,
    }
    .into())
}

fn undeclared(class: &str, base_name: &str, args: &[ValueType]) -> dflat_core::CompilationError {
    SemanticError::UndeclaredMethod {
        class: class.to_string(),
        method: CanonicalName::lookup_key(base_name, args.to_vec()).to_string(),
    }
    .into()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dflat_core::MethodType;

    fn method(name: &str, ret: ValueType, params: Vec<ValueType>) -> CanonicalName {
        CanonicalName::new(name, MethodType::new(ret, params))
    }

    fn class(name: &str) -> ValueType {
        ValueType::class(name)
    }

    /// Animal <- Dog <- Puppy, Cat unrelated.
    fn hierarchy() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry.enter("Animal").unwrap();
        registry
            .add_method(method("speak", ValueType::Void, vec![]))
            .unwrap();
        registry
            .add_method(method("feed", ValueType::Int, vec![class("Animal")]))
            .unwrap();
        registry.leave();

        registry.enter("Dog").unwrap();
        registry.set_parent("Animal").unwrap();
        registry
            .add_method(method("speak", ValueType::Bool, vec![]))
            .unwrap();
        registry.leave();

        registry.enter("Puppy").unwrap();
        registry.set_parent("Dog").unwrap();
        registry.leave();

        registry.enter("Cat").unwrap();
        registry.leave();
        registry
    }

    #[test]
    fn type_is_or_base_reflexive() {
        let registry = hierarchy();
        for ty in [ValueType::Int, ValueType::Bool, ValueType::Void, class("Dog")] {
            assert!(type_is_or_base(&registry, &ty, &ty));
        }
    }

    #[test]
    fn type_is_or_base_follows_parents() {
        let registry = hierarchy();
        assert!(type_is_or_base(&registry, &class("Animal"), &class("Dog")));
        assert!(type_is_or_base(&registry, &class("Animal"), &class("Puppy")));
        assert!(!type_is_or_base(&registry, &class("Dog"), &class("Animal")));
        assert!(!type_is_or_base(&registry, &class("Cat"), &class("Dog")));
        assert!(!type_is_or_base(&registry, &ValueType::Int, &ValueType::Bool));
        assert!(!type_is_or_base(&registry, &class("Animal"), &ValueType::Int));
    }

    #[test]
    fn compatible_args_widening() {
        let registry = hierarchy();
        assert!(compatible_args(&registry, &[class("Animal")], &[class("Dog")]));
        assert!(!compatible_args(&registry, &[class("Dog")], &[class("Animal")]));
        assert!(!compatible_args(&registry, &[class("Animal")], &[]));
        assert!(compatible_args(&registry, &[], &[]));
    }

    #[test]
    fn override_in_derived_class_wins() {
        let registry = hierarchy();
        let found = resolve_method(&registry, "Dog", "speak", &[]).unwrap();
        assert_eq!(found.ret(), &ValueType::Bool);

        let from_puppy = resolve_method(&registry, "Puppy", "speak", &[]).unwrap();
        assert_eq!(from_puppy.ret(), &ValueType::Bool);

        let base = resolve_method(&registry, "Animal", "speak", &[]).unwrap();
        assert_eq!(base.ret(), &ValueType::Void);
    }

    #[test]
    fn inherited_method_found_with_widening() {
        let registry = hierarchy();
        let found = resolve_method(&registry, "Puppy", "feed", &[class("Dog")]).unwrap();
        assert_eq!(found.params(), &[class("Animal")]);
    }

    #[test]
    fn exact_match_beats_compatible() {
        let mut registry = hierarchy();
        registry.enter("Vet").unwrap();
        registry
            .add_method(method("treat", ValueType::Int, vec![class("Animal")]))
            .unwrap();
        registry
            .add_method(method("treat", ValueType::Bool, vec![class("Dog")]))
            .unwrap();
        registry.leave();

        let found = resolve_method(&registry, "Vet", "treat", &[class("Dog")]).unwrap();
        assert_eq!(found.ret(), &ValueType::Bool);
    }

    #[test]
    fn two_compatible_overloads_are_ambiguous() {
        let mut registry = hierarchy();
        registry.enter("Vet").unwrap();
        registry
            .add_method(method(
                "treat",
                ValueType::Void,
                vec![class("Animal"), class("Dog")],
            ))
            .unwrap();
        registry
            .add_method(method(
                "treat",
                ValueType::Void,
                vec![class("Dog"), class("Animal")],
            ))
            .unwrap();
        registry.leave();

        let err = resolve_method(&registry, "Vet", "treat", &[class("Dog"), class("Dog")])
            .unwrap_err();
        match err.semantic() {
            Some(SemanticError::AmbiguousCall {
                class, candidates, ..
            }) => {
                assert_eq!(class, "Vet");
                assert!(candidates.contains("treat(Animal,Dog)"));
                assert!(candidates.contains("treat(Dog,Animal)"));
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn missing_method_is_undeclared() {
        let registry = hierarchy();
        let err = resolve_method(&registry, "Puppy", "fly", &[ValueType::Int]).unwrap_err();
        assert_eq!(
            err.semantic(),
            Some(&SemanticError::UndeclaredMethod {
                class: "Puppy".to_string(),
                method: "fly(int)".to_string(),
            })
        );
    }

    #[test]
    fn unregistered_class_is_logic_error() {
        let registry = hierarchy();
        let err = resolve_method(&registry, "Ghost", "speak", &[]).unwrap_err();
        assert!(err.is_logic());
    }

    #[test]
    fn constructors_are_not_inherited() {
        let mut registry = hierarchy();
        registry.enter("Kennel").unwrap();
        registry
            .add_method(method(CONSTRUCTOR_NAME, class("Kennel"), vec![class("Animal")]))
            .unwrap();
        registry.leave();

        let widened = resolve_constructor(&registry, "Kennel", &[class("Puppy")]).unwrap();
        assert_eq!(widened.params(), &[class("Animal")]);
        assert!(resolve_constructor(&registry, "Kennel", &[]).is_ok());

        // Dog only has its own default constructor.
        let err = resolve_constructor(&registry, "Dog", &[class("Animal")]).unwrap_err();
        assert!(matches!(
            err.semantic(),
            Some(SemanticError::UndeclaredMethod { .. })
        ));
    }
}
