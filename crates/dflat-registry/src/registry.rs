//! ClassRegistry - owner of all class metadata.
//!
//! # Lifecycle
//!
//! Classes are declared one at a time: [`ClassRegistry::enter`] opens a class
//! and makes it current, member and method registration goes to the current
//! class, and [`ClassRegistry::leave`] closes it. A class may only name an
//! already-declared class as its parent, so the inheritance graph is acyclic
//! by construction.
//!
//! # Example
//!
//! ```
//! use dflat_core::ValueType;
//! use dflat_registry::ClassRegistry;
//!
//! let mut registry = ClassRegistry::new();
//! registry.enter("Animal").unwrap();
//! registry.add_var("age", ValueType::Int).unwrap();
//! registry.leave();
//!
//! registry.enter("Dog").unwrap();
//! registry.set_parent("Animal").unwrap();
//! registry.leave();
//!
//! let age = registry.lookup_var("Dog", "age").unwrap();
//! assert_eq!(age.owner, "Animal");
//! assert_eq!(age.depth, 1);
//! ```

use dflat_core::config::CONSTRUCTOR_NAME;
use dflat_core::{
    CanonicalName, CompilationError, LogicError, MethodType, Result, SemanticError, TypeModel,
    ValueType,
};
use rustc_hash::FxHashMap;

use crate::class::{ClassMetadata, MemberInfo};

/// Registry of declared classes.
#[derive(Debug, Default, Clone)]
pub struct ClassRegistry {
    /// Classes by name (primary storage).
    classes: FxHashMap<String, ClassMetadata>,
    /// Class names in declaration order.
    order: Vec<String>,
    /// Class currently being declared.
    current: Option<String>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Declaration
    // ==========================================================================

    /// Open a new class and make it current.
    ///
    /// The class starts with a synthesized zero-argument constructor returning
    /// the class itself.
    pub fn enter(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.current {
            return Err(LogicError::NestedClass {
                name: name.to_string(),
                open: open.clone(),
            }
            .into());
        }
        if self.classes.contains_key(name) {
            return Err(SemanticError::DuplicateClass {
                name: name.to_string(),
            }
            .into());
        }

        let mut meta = ClassMetadata::new(name);
        meta.insert_method(Self::default_constructor(name));

        tracing::trace!(class = name, "entering class");
        self.classes.insert(name.to_string(), meta);
        self.order.push(name.to_string());
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Attach a parent to the current class.
    pub fn set_parent(&mut self, parent: &str) -> Result<()> {
        let meta = self.current_mut("set_parent")?;
        meta.parent = Some(parent.to_string());
        Ok(())
    }

    /// Close the current class.
    pub fn leave(&mut self) {
        if let Some(name) = self.current.take() {
            tracing::trace!(class = %name, "leaving class");
        }
    }

    /// Add a field to the current class, returning the type it replaced.
    pub fn add_var(&mut self, name: &str, ty: ValueType) -> Result<Option<TypeModel>> {
        let meta = self.current_mut("add_var")?;
        Ok(meta.insert_member(name, TypeModel::Value(ty)))
    }

    /// Add a method overload to the current class.
    ///
    /// Re-adding an existing signature is a no-op; returns whether the method
    /// was new.
    pub fn add_method(&mut self, method: CanonicalName) -> Result<bool> {
        let meta = self.current_mut("add_method")?;
        Ok(meta.insert_method(method))
    }

    /// The constructor every class receives on declaration.
    pub fn default_constructor(class: &str) -> CanonicalName {
        CanonicalName::new(
            CONSTRUCTOR_NAME,
            MethodType::new(ValueType::class(class), Vec::new()),
        )
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Direct lookup, no inheritance walk.
    pub fn lookup(&self, name: &str) -> Option<&ClassMetadata> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// The class currently being declared.
    pub fn cur(&self) -> Option<&ClassMetadata> {
        self.current.as_deref().and_then(|name| self.classes.get(name))
    }

    /// Walk from `class` up through its parents.
    ///
    /// Yields the class itself first. Stops silently at a parent name that is
    /// not registered.
    pub fn ancestors<'a>(&'a self, class: &str) -> Ancestors<'a> {
        Ancestors {
            registry: self,
            next: self.lookup(class),
        }
    }

    /// Find a field on `class` or the nearest ancestor declaring it.
    pub fn lookup_var(&self, class: &str, member: &str) -> Option<MemberInfo> {
        self.ancestors(class)
            .enumerate()
            .find_map(|(depth, meta)| {
                meta.members.get(member).map(|ty| MemberInfo {
                    depth,
                    ty: ty.clone(),
                    owner: meta.name.clone(),
                })
            })
    }

    /// Find a method by exact signature on `class` or the nearest ancestor.
    pub fn lookup_method(&self, class: &str, method: &CanonicalName) -> Option<MemberInfo> {
        self.ancestors(class)
            .enumerate()
            .find_map(|(depth, meta)| {
                meta.methods.get(method).map(|found| MemberInfo {
                    depth,
                    ty: TypeModel::Method(found.signature().clone()),
                    owner: meta.name.clone(),
                })
            })
    }

    /// Whether any class in the chain declares a method with this base name.
    pub fn has_method_named(&self, class: &str, base_name: &str) -> bool {
        self.ancestors(class)
            .any(|meta| meta.has_method_named(base_name))
    }

    // ==========================================================================
    // Iteration
    // ==========================================================================

    /// All classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassMetadata> {
        self.order.iter().filter_map(|name| self.classes.get(name))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn current_mut(&mut self, operation: &'static str) -> Result<&mut ClassMetadata> {
        let name = self
            .current
            .as_deref()
            .ok_or(LogicError::NoCurrentClass { operation })?;
        self.classes.get_mut(name).ok_or_else(|| {
            CompilationError::from(LogicError::UnregisteredClass {
                operation,
                name: name.to_string(),
            })
        })
    }
}

/// Iterator over a class and its ancestors, nearest first.
pub struct Ancestors<'a> {
    registry: &'a ClassRegistry,
    next: Option<&'a ClassMetadata>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ClassMetadata;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current
            .parent
            .as_deref()
            .and_then(|parent| self.registry.lookup(parent));
        Some(current)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, ret: ValueType, params: Vec<ValueType>) -> CanonicalName {
        CanonicalName::new(name, MethodType::new(ret, params))
    }

    /// Animal { int age; void speak() }  <-  Dog { bool loud; }  <-  Puppy
    fn animal_hierarchy() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry.enter("Animal").unwrap();
        registry.add_var("age", ValueType::Int).unwrap();
        registry
            .add_method(method("speak", ValueType::Void, vec![]))
            .unwrap();
        registry.leave();

        registry.enter("Dog").unwrap();
        registry.set_parent("Animal").unwrap();
        registry.add_var("loud", ValueType::Bool).unwrap();
        registry.leave();

        registry.enter("Puppy").unwrap();
        registry.set_parent("Dog").unwrap();
        registry.leave();
        registry
    }

    #[test]
    fn enter_synthesizes_default_constructor() {
        let mut registry = ClassRegistry::new();
        registry.enter("Dog").unwrap();
        let meta = registry.cur().unwrap();
        let cons = ClassRegistry::default_constructor("Dog");
        assert!(meta.methods.contains(&cons));
        assert_eq!(
            meta.methods.get(&cons).unwrap().ret(),
            &ValueType::class("Dog")
        );
    }

    #[test]
    fn duplicate_class_error() {
        let mut registry = ClassRegistry::new();
        registry.enter("Dog").unwrap();
        registry.leave();

        let err = registry.enter("Dog").unwrap_err();
        assert!(matches!(
            err.semantic(),
            Some(SemanticError::DuplicateClass { name }) if name == "Dog"
        ));
    }

    #[test]
    fn nested_class_is_logic_error() {
        let mut registry = ClassRegistry::new();
        registry.enter("Outer").unwrap();
        let err = registry.enter("Inner").unwrap_err();
        assert!(matches!(err.logic(), Some(LogicError::NestedClass { .. })));
    }

    #[test]
    fn registration_outside_class_is_logic_error() {
        let mut registry = ClassRegistry::new();
        let err = registry.add_var("x", ValueType::Int).unwrap_err();
        assert!(matches!(
            err.logic(),
            Some(LogicError::NoCurrentClass { operation: "add_var" })
        ));
        assert!(registry.set_parent("Animal").unwrap_err().is_logic());
    }

    #[test]
    fn leave_clears_current() {
        let mut registry = ClassRegistry::new();
        registry.enter("Dog").unwrap();
        assert!(registry.cur().is_some());
        registry.leave();
        assert!(registry.cur().is_none());
    }

    #[test]
    fn add_var_replaces() {
        let mut registry = ClassRegistry::new();
        registry.enter("Dog").unwrap();
        assert_eq!(registry.add_var("x", ValueType::Int).unwrap(), None);
        assert_eq!(
            registry.add_var("x", ValueType::Bool).unwrap(),
            Some(TypeModel::Value(ValueType::Int))
        );
        registry.leave();
        assert_eq!(
            registry.lookup_var("Dog", "x").unwrap().ty,
            TypeModel::Value(ValueType::Bool)
        );
    }

    #[test]
    fn add_method_dedups() {
        let mut registry = ClassRegistry::new();
        registry.enter("Dog").unwrap();
        assert!(registry.add_method(method("f", ValueType::Int, vec![])).unwrap());
        assert!(!registry.add_method(method("f", ValueType::Int, vec![])).unwrap());
        assert_eq!(registry.cur().unwrap().methods.len(), 2); // f + default constructor
    }

    #[test]
    fn lookup_var_walks_parents() {
        let registry = animal_hierarchy();

        let own = registry.lookup_var("Dog", "loud").unwrap();
        assert_eq!((own.depth, own.owner.as_str()), (0, "Dog"));

        let inherited = registry.lookup_var("Puppy", "age").unwrap();
        assert_eq!(inherited.depth, 2);
        assert_eq!(inherited.owner, "Animal");
        assert_eq!(inherited.ty, TypeModel::Value(ValueType::Int));

        assert!(registry.lookup_var("Animal", "loud").is_none());
        assert!(registry.lookup_var("Nope", "age").is_none());
    }

    #[test]
    fn lookup_method_matches_exact_signature() {
        let registry = animal_hierarchy();
        let speak = CanonicalName::lookup_key("speak", vec![]);

        let found = registry.lookup_method("Puppy", &speak).unwrap();
        assert_eq!(found.owner, "Animal");
        assert_eq!(
            found.ty,
            TypeModel::Method(MethodType::new(ValueType::Void, vec![]))
        );

        let wrong = CanonicalName::lookup_key("speak", vec![ValueType::Int]);
        assert!(registry.lookup_method("Puppy", &wrong).is_none());
    }

    #[test]
    fn ancestors_nearest_first() {
        let registry = animal_hierarchy();
        let chain: Vec<_> = registry
            .ancestors("Puppy")
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(chain, ["Puppy", "Dog", "Animal"]);
        assert!(registry.has_method_named("Puppy", "speak"));
    }

    #[test]
    fn classes_in_declaration_order() {
        let registry = animal_hierarchy();
        let names: Vec<_> = registry.classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Animal", "Dog", "Puppy"]);
        assert_eq!(registry.len(), 3);
    }
}
