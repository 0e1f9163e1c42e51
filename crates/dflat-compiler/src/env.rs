//! The type environment threaded through semantic analysis.
//!
//! [`TypeEnvironment`] owns everything the checker needs to know about the
//! program while walking it: the class registry, the local scope chain, the
//! operator rule table, and which method (if any) is being checked.
//!
//! ## Nesting
//!
//! ```text
//! Idle --enter_class--> InClass --enter_method--> InMethod --leave_method--> InClass
//!   ^                      |                        (enter_scope/leave_scope)*
//!   +------leave_class-----+
//! ```
//!
//! Breaking this order is a [`LogicError`]: it means the caller walked the
//! tree wrongly, never that the program is malformed.
//!
//! ## Name resolution
//!
//! A bare name is looked up in the scope chain first. The receiver binding
//! lives in the argument frame like any other local but is skipped here, so a
//! name that is not a local falls through to an implicit member access on the
//! receiver's class, walking up through its parents.

use dflat_ast::{MethodBinding, VarBinding};
use dflat_core::config::RECEIVER_NAME;
use dflat_core::{
    CanonicalName, LogicError, MethodType, Result, SemanticError, TypeModel, ValueType,
};
use dflat_registry::{ClassMetadata, ClassRegistry};

use crate::operators::RuleTable;
use crate::overload;
use crate::scope::{Decl, ScopeChain};

/// The method whose body is being checked.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentMethod {
    /// Class the method is declared on.
    pub owner: String,
    pub name: CanonicalName,
}

/// Type information for a single analysis run.
#[derive(Debug, Clone)]
pub struct TypeEnvironment {
    registry: ClassRegistry,
    scopes: ScopeChain,
    rules: RuleTable,
    current_method: Option<CurrentMethod>,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self {
            registry: ClassRegistry::new(),
            scopes: ScopeChain::new(),
            rules: RuleTable::builtin(),
            current_method: None,
        }
    }

    // ==========================================================================
    // Classes
    // ==========================================================================

    /// Declare a class and make it current.
    ///
    /// The class receives a default constructor.
    pub fn enter_class(&mut self, name: &str) -> Result<()> {
        self.registry.enter(name)?;
        tracing::debug!(class = name, "declared class");
        Ok(())
    }

    pub fn set_class_parent(&mut self, parent: &str) -> Result<()> {
        self.registry.set_parent(parent)
    }

    pub fn leave_class(&mut self) -> Result<()> {
        if let Some(open) = &self.current_method {
            return Err(LogicError::MethodStillOpen {
                open: open.name.to_string(),
            }
            .into());
        }
        if !self.in_class() {
            return Err(LogicError::NoCurrentClass {
                operation: "leave_class",
            }
            .into());
        }
        self.registry.leave();
        Ok(())
    }

    /// Add a field to the current class, returning any type it replaced.
    pub fn add_class_var(&mut self, name: &str, ty: ValueType) -> Result<Option<TypeModel>> {
        self.registry.add_var(name, ty)
    }

    pub fn add_class_method(&mut self, method: CanonicalName) -> Result<bool> {
        self.registry.add_method(method)
    }

    pub fn in_class(&self) -> bool {
        self.registry.cur().is_some()
    }

    pub fn cur_class(&self) -> Result<&ClassMetadata> {
        self.registry.cur().ok_or_else(|| {
            LogicError::NoCurrentClass {
                operation: "cur_class",
            }
            .into()
        })
    }

    // ==========================================================================
    // Methods & Scopes
    // ==========================================================================

    /// Register `method` on the current class and start checking its body.
    ///
    /// Pushes the argument frame and binds the receiver in it.
    pub fn enter_method(&mut self, method: CanonicalName) -> Result<()> {
        if let Some(open) = &self.current_method {
            return Err(LogicError::NestedMethod {
                name: method.to_string(),
                open: open.name.to_string(),
            }
            .into());
        }

        let owner = self.cur_class()?.name.clone();
        self.registry.add_method(method.clone())?;
        tracing::debug!(class = %owner, method = %method, "entering method");

        self.scopes.push();
        self.scopes
            .decl_local(RECEIVER_NAME, ValueType::class(owner.as_str()))?;
        self.current_method = Some(CurrentMethod {
            owner,
            name: method,
        });
        Ok(())
    }

    pub fn leave_method(&mut self) -> Result<()> {
        if self.current_method.is_none() {
            return Err(LogicError::NoCurrentMethod {
                operation: "leave_method",
            }
            .into());
        }
        self.scopes.pop()?;
        self.current_method = None;
        Ok(())
    }

    pub fn in_method(&self) -> bool {
        self.current_method.is_some()
    }

    pub fn cur_method(&self) -> Result<&CurrentMethod> {
        self.current_method.as_ref().ok_or_else(|| {
            LogicError::NoCurrentMethod {
                operation: "cur_method",
            }
            .into()
        })
    }

    pub fn enter_scope(&mut self) -> Result<()> {
        self.require_method("enter_scope")?;
        self.scopes.push();
        Ok(())
    }

    pub fn leave_scope(&mut self) -> Result<()> {
        self.require_method("leave_scope")?;
        self.scopes.pop()
    }

    /// Bind a local in the innermost frame of the current method.
    pub fn declare_local(&mut self, name: &str, ty: impl Into<TypeModel>) -> Result<()> {
        self.require_method("declare_local")?;
        self.scopes.decl_local(name, ty)?;
        Ok(())
    }

    /// Type of the receiver, if a method is being checked.
    pub fn receiver_type(&self) -> Option<&ValueType> {
        self.scopes
            .lookup(RECEIVER_NAME)
            .and_then(|decl| decl.ty.as_value())
    }

    fn require_method(&self, operation: &'static str) -> Result<()> {
        if self.in_method() {
            Ok(())
        } else {
            Err(LogicError::NoCurrentMethod { operation }.into())
        }
    }

    // ==========================================================================
    // Variable Lookup
    // ==========================================================================

    /// Type of a bare variable name.
    pub fn lookup_var_type(&self, name: &str) -> Result<ValueType> {
        self.lookup_var(name).map(|(ty, _)| ty)
    }

    /// Type of a bare variable name, plus what it resolved to.
    pub fn lookup_var(&self, name: &str) -> Result<(ValueType, VarBinding)> {
        if let Some(decl) = self.local(name) {
            return match &decl.ty {
                TypeModel::Value(ty) => Ok((ty.clone(), VarBinding::Local)),
                TypeModel::Method(_) => Err(SemanticError::NotAVariable {
                    name: name.to_string(),
                }
                .into()),
            };
        }

        match self.receiver_type().and_then(ValueType::class_name) {
            Some(class) => {
                let (ty, owner) = self.lookup_member(class, name)?;
                Ok((ty, VarBinding::Member { owner }))
            }
            None => Err(SemanticError::UndeclaredVariable {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Type of field `member` on `class` or one of its ancestors.
    pub fn lookup_var_type_by_class(&self, class: &str, member: &str) -> Result<ValueType> {
        self.lookup_member(class, member).map(|(ty, _)| ty)
    }

    /// Type of field `member` and the class that declares it.
    pub fn lookup_member(&self, class: &str, member: &str) -> Result<(ValueType, String)> {
        match self.registry.lookup_var(class, member) {
            Some(info) => match info.ty {
                TypeModel::Value(ty) => Ok((ty, info.owner)),
                TypeModel::Method(_) => Err(SemanticError::NotAVariable {
                    name: member.to_string(),
                }
                .into()),
            },
            None if self.registry.has_method_named(class, member) => {
                Err(SemanticError::NotAVariable {
                    name: member.to_string(),
                }
                .into())
            }
            None => Err(SemanticError::UndeclaredMember {
                class: class.to_string(),
                member: member.to_string(),
            }
            .into()),
        }
    }

    fn local(&self, name: &str) -> Option<&Decl> {
        if name == RECEIVER_NAME {
            return None;
        }
        self.scopes.lookup(name)
    }

    // ==========================================================================
    // Method Lookup
    // ==========================================================================

    /// Signature of `method` as seen from the current class.
    pub fn lookup_method_type(&self, method: &CanonicalName) -> Result<MethodType> {
        let class = self.cur_class()?.name.clone();
        self.lookup_method_type_by_class(&class, method)
    }

    /// Signature of `method` on `class` or one of its ancestors, by exact
    /// parameter match.
    pub fn lookup_method_type_by_class(
        &self,
        class: &str,
        method: &CanonicalName,
    ) -> Result<MethodType> {
        match self.registry.lookup_method(class, method) {
            Some(info) => match info.ty {
                TypeModel::Method(signature) => Ok(signature),
                TypeModel::Value(_) => Err(self.not_a_method(class, method)),
            },
            None if self.registry.lookup_var(class, method.base_name()).is_some() => {
                Err(self.not_a_method(class, method))
            }
            None => Err(SemanticError::UndeclaredMethod {
                class: class.to_string(),
                method: method.to_string(),
            }
            .into()),
        }
    }

    fn not_a_method(&self, class: &str, method: &CanonicalName) -> dflat_core::CompilationError {
        SemanticError::NotAMethod {
            class: class.to_string(),
            method: method.base_name().to_string(),
        }
        .into()
    }

    /// Record which class declares the overload a call resolved to.
    pub fn method_binding(&self, class: &str, method: &CanonicalName) -> Result<MethodBinding> {
        let info = self.registry.lookup_method(class, method).ok_or_else(|| {
            LogicError::UnresolvedCall {
                method: format!("{class}::{method}"),
            }
        })?;
        Ok(MethodBinding {
            owner: info.owner,
            method: method.clone(),
        })
    }

    /// Result type of a built-in operator applied to the operands in `rule`.
    pub fn lookup_rule_type(&self, rule: &CanonicalName) -> Result<ValueType> {
        self.rules.lookup(rule).cloned().ok_or_else(|| {
            SemanticError::InvalidOperands {
                rule: rule.to_string(),
            }
            .into()
        })
    }

    // ==========================================================================
    // Overloads & Subtyping
    // ==========================================================================

    /// Whether `derived` may be used where `base` is expected.
    pub fn type_is_or_base(&self, base: &ValueType, derived: &ValueType) -> bool {
        overload::type_is_or_base(&self.registry, base, derived)
    }

    pub fn compatible_args(&self, formal: &[ValueType], actual: &[ValueType]) -> bool {
        overload::compatible_args(&self.registry, formal, actual)
    }

    /// See [`overload::resolve_method`].
    pub fn resolve_method(
        &self,
        class: &str,
        base_name: &str,
        args: &[ValueType],
    ) -> Result<CanonicalName> {
        overload::resolve_method(&self.registry, class, base_name, args)
    }

    pub fn resolve_constructor(&self, class: &str, args: &[ValueType]) -> Result<CanonicalName> {
        overload::resolve_constructor(&self.registry, class, args)
    }

    // ==========================================================================
    // Assertions
    // ==========================================================================

    /// Fails unless `ty` is built-in or a declared class.
    pub fn assert_valid_type(&self, ty: &ValueType) -> Result<()> {
        match ty.class_name() {
            Some(class) if !self.registry.contains(class) => Err(SemanticError::UnknownType {
                name: class.to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }

    pub fn assert_type_is(&self, actual: &ValueType, expected: &ValueType) -> Result<()> {
        if actual == expected {
            return Ok(());
        }
        Err(SemanticError::TypeMismatch {
            message: format!("type '{actual}' must be '{expected}'"),
        }
        .into())
    }

    /// Fails unless `actual` is `expected` or derives from it.
    pub fn assert_type_is_or_base(&self, actual: &ValueType, expected: &ValueType) -> Result<()> {
        if self.type_is_or_base(expected, actual) {
            return Ok(());
        }
        Err(SemanticError::TypeMismatch {
            message: format!("type '{actual}' must be '{expected}' or derive from it"),
        }
        .into())
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Hand the registry on once analysis is finished.
    pub fn into_registry(self) -> ClassRegistry {
        self.registry
    }
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
