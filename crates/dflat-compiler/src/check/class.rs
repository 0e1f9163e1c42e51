//! Class, method and constructor declarations.
//!
//! A class is checked in two steps. The declaration pre-pass registers every
//! field and every method signature, so a method body may refer to members
//! declared after it. Method and constructor bodies are checked afterwards,
//! in source order.

use dflat_ast::{Annotation, ClassDecl, ConsDef, Member, MethodDef, Param};
use dflat_core::config::CONSTRUCTOR_NAME;
use dflat_core::{
    CanonicalName, CompilationError, LogicError, MethodType, Result, SemanticError, Span,
    ValueType,
};

use super::{Checker, Located};

impl Checker<'_> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check_class(&mut self, class: &mut ClassDecl) -> Result<()> {
        tracing::debug!(class = %class.name, "checking class");
        let span = class.span;

        self.env.enter_class(&class.name).at(span)?;
        if let Some(parent) = &class.parent {
            if !self.env.registry().contains(parent) {
                let err = CompilationError::from(SemanticError::UnknownType {
                    name: parent.clone(),
                });
                return Err(err.with_span(span));
            }
            self.env.set_class_parent(parent)?;
        }

        self.declare_members(class)?;

        for member in &mut class.members {
            match member {
                Member::Field(_) => {}
                Member::Method(method) => self.check_method(method)?,
                Member::Constructor(cons) => self.check_constructor(cons)?,
            }
        }

        self.env.leave_class()
    }

    /// Register fields and method signatures of the current class.
    ///
    /// The first zero-argument constructor replaces the synthesized default;
    /// any other repeated signature is a duplicate.
    fn declare_members(&mut self, class: &mut ClassDecl) -> Result<()> {
        let class_type = ValueType::class(class.name.as_str());
        let mut default_replaced = false;

        for member in &mut class.members {
            match member {
                Member::Field(field) => {
                    self.check_storage_type(&field.ty, &field.name).at(field.span)?;
                    let previous = self.env.add_class_var(&field.name, field.ty.clone())?;
                    if previous.is_some() {
                        let err = CompilationError::from(SemanticError::DuplicateMember {
                            class: class.name.clone(),
                            member: field.name.clone(),
                        });
                        return Err(err.with_span(field.span));
                    }
                }
                Member::Method(method) => {
                    self.env.assert_valid_type(&method.ret).at(method.span)?;
                    self.check_params(&method.params).at(method.span)?;
                    let signature = CanonicalName::new(
                        method.name.as_str(),
                        MethodType::new(method.ret.clone(), method.param_types()),
                    );
                    if !self.env.add_class_method(signature.clone())? {
                        return Err(duplicate_method(&class.name, &signature, method.span));
                    }
                    method.signature.set(signature);
                }
                Member::Constructor(cons) => {
                    self.check_params(&cons.params).at(cons.span)?;
                    let signature = CanonicalName::new(
                        CONSTRUCTOR_NAME,
                        MethodType::new(class_type.clone(), cons.param_types()),
                    );
                    let added = self.env.add_class_method(signature.clone())?;
                    let replaces_default = cons.params.is_empty() && !default_replaced;
                    if !added && !replaces_default {
                        return Err(duplicate_method(&class.name, &signature, cons.span));
                    }
                    default_replaced |= cons.params.is_empty();
                    cons.signature.set(signature);
                }
            }
        }
        Ok(())
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn check_method(&mut self, method: &mut MethodDef) -> Result<()> {
        let signature = self.declared_signature(&method.signature, &method.name)?;
        self.check_body(signature, &method.params, &mut method.body, method.span)
    }

    fn check_constructor(&mut self, cons: &mut ConsDef) -> Result<()> {
        let signature = self.declared_signature(&cons.signature, CONSTRUCTOR_NAME)?;
        self.check_body(signature, &cons.params, &mut cons.body, cons.span)
    }

    /// Signature recorded by the declaration pre-pass.
    fn declared_signature(
        &self,
        slot: &Annotation<CanonicalName>,
        name: &str,
    ) -> Result<CanonicalName> {
        match slot.get() {
            Some(signature) => Ok(signature.clone()),
            None => Err(LogicError::UnresolvedSignature {
                class: self.env.cur_class()?.name.clone(),
                method: name.to_string(),
            }
            .into()),
        }
    }

    fn check_body(
        &mut self,
        signature: CanonicalName,
        params: &[Param],
        body: &mut dflat_ast::Block,
        span: Span,
    ) -> Result<()> {
        self.env.enter_method(signature)?;
        for param in params {
            self.env.declare_local(&param.name, param.ty.clone())?;
        }
        // The body shares the argument frame.
        for stmt in &mut body.stmts {
            self.check_stmt(stmt).at(span)?;
        }
        self.env.leave_method()
    }

    fn check_params(&self, params: &[Param]) -> Result<()> {
        params
            .iter()
            .try_for_each(|param| self.check_storage_type(&param.ty, &param.name))
    }

    /// Types that can be stored in a field, parameter or local.
    pub(super) fn check_storage_type(&self, ty: &ValueType, name: &str) -> Result<()> {
        self.env.assert_valid_type(ty)?;
        if ty.is_void() {
            return Err(SemanticError::TypeMismatch {
                message: format!("'{name}' cannot have type 'void'"),
            }
            .into());
        }
        Ok(())
    }
}

fn duplicate_method(class: &str, signature: &CanonicalName, span: Span) -> CompilationError {
    CompilationError::from(SemanticError::DuplicateMethod {
        class: class.to_string(),
        method: signature.to_string(),
    })
    .with_span(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TypeEnvironment;
    use dflat_ast::{Expr, Program, Stmt};

    fn check(program: &mut Program) -> Result<TypeEnvironment> {
        let mut env = TypeEnvironment::new();
        Checker::new(&mut env).check_program(program)?;
        Ok(env)
    }

    #[test]
    fn methods_may_call_later_methods() {
        let mut program = Program::new(vec![
            ClassDecl::new("A")
                .method(MethodDef::new(
                    ValueType::Int,
                    "first",
                    vec![],
                    vec![Stmt::ret(Some(Expr::call("second", vec![])))],
                ))
                .method(MethodDef::new(
                    ValueType::Int,
                    "second",
                    vec![],
                    vec![Stmt::ret(Some(Expr::number(2)))],
                )),
        ]);
        check(&mut program).unwrap();

        let Member::Method(first) = &program.classes[0].members[0] else {
            panic!("expected method");
        };
        assert_eq!(first.signature.get().map(|s| s.base_name()), Some("first"));
    }

    #[test]
    fn unknown_parent() {
        let mut program = Program::new(vec![
            ClassDecl::new("Dog").extends("Animal").at(Span::new(3, 1, 10)),
        ]);
        let err = check(&mut program).unwrap_err();
        assert_eq!(
            err.semantic(),
            Some(&SemanticError::UnknownType {
                name: "Animal".to_string()
            })
        );
        assert_eq!(err.span(), Some(Span::new(3, 1, 10)));
    }

    #[test]
    fn duplicate_field_in_one_class() {
        let mut program = Program::new(vec![
            ClassDecl::new("A")
                .field(ValueType::Int, "x")
                .field(ValueType::Bool, "x"),
        ]);
        assert!(matches!(
            check(&mut program).unwrap_err().semantic(),
            Some(SemanticError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn duplicate_method_signature_rejected() {
        let mut program = Program::new(vec![
            ClassDecl::new("A")
                .method(MethodDef::new(
                    ValueType::Int,
                    "f",
                    vec![],
                    vec![Stmt::ret(Some(Expr::number(1)))],
                ))
                .method(
                    MethodDef::new(
                        ValueType::Bool,
                        "f",
                        vec![],
                        vec![Stmt::ret(Some(Expr::boolean(true)))],
                    )
                    .at(Span::new(6, 5, 20)),
                ),
        ]);
        let err = check(&mut program).unwrap_err();
        assert_eq!(
            err.semantic(),
            Some(&SemanticError::DuplicateMethod {
                class: "A".to_string(),
                method: "f()".to_string(),
            })
        );
        assert_eq!(err.span(), Some(Span::new(6, 5, 20)));
    }

    #[test]
    fn overloads_and_overrides_are_not_duplicates() {
        let mut program = Program::new(vec![
            ClassDecl::new("A")
                .method(MethodDef::new(ValueType::Void, "f", vec![], vec![]))
                .method(MethodDef::new(
                    ValueType::Void,
                    "f",
                    vec![Param::new(ValueType::Int, "n")],
                    vec![],
                )),
            ClassDecl::new("B")
                .extends("A")
                .method(MethodDef::new(ValueType::Void, "f", vec![], vec![])),
        ]);
        assert!(check(&mut program).is_ok());
    }

    #[test]
    fn one_zero_argument_constructor_replaces_default() {
        let mut program = Program::new(vec![
            ClassDecl::new("A")
                .field(ValueType::Int, "x")
                .constructor(ConsDef::new(
                    vec![],
                    vec![Stmt::assign(Expr::var("x"), Expr::number(1))],
                )),
        ]);
        assert!(check(&mut program).is_ok());

        let mut program = Program::new(vec![
            ClassDecl::new("A")
                .constructor(ConsDef::new(vec![], vec![]))
                .constructor(ConsDef::new(vec![], vec![])),
        ]);
        assert!(matches!(
            check(&mut program).unwrap_err().semantic(),
            Some(SemanticError::DuplicateMethod { method, .. }) if method == "cons()"
        ));
    }

    #[test]
    fn inherited_field_may_be_redeclared() {
        let mut program = Program::new(vec![
            ClassDecl::new("A").field(ValueType::Int, "x"),
            ClassDecl::new("B").extends("A").field(ValueType::Bool, "x"),
        ]);
        let env = check(&mut program).unwrap();
        assert_eq!(
            env.lookup_var_type_by_class("B", "x").unwrap(),
            ValueType::Bool
        );
        assert_eq!(
            env.lookup_var_type_by_class("A", "x").unwrap(),
            ValueType::Int
        );
    }

    #[test]
    fn void_fields_and_params_rejected() {
        let mut program = Program::new(vec![ClassDecl::new("A").field(ValueType::Void, "x")]);
        assert!(matches!(
            check(&mut program).unwrap_err().semantic(),
            Some(SemanticError::TypeMismatch { .. })
        ));

        let mut program = Program::new(vec![ClassDecl::new("A").method(MethodDef::new(
            ValueType::Void,
            "f",
            vec![Param::new(ValueType::class("Nope"), "p")],
            vec![],
        ))]);
        assert!(matches!(
            check(&mut program).unwrap_err().semantic(),
            Some(SemanticError::UnknownType { .. })
        ));
    }

    #[test]
    fn constructor_registered_with_class_return() {
        let mut program = Program::new(vec![
            ClassDecl::new("Point")
                .field(ValueType::Int, "x")
                .constructor(ConsDef::new(
                    vec![Param::new(ValueType::Int, "x0")],
                    vec![Stmt::assign(Expr::var("x"), Expr::var("x0"))],
                )),
        ]);
        let env = check(&mut program).unwrap();
        let cons = env.resolve_constructor("Point", &[ValueType::Int]).unwrap();
        assert_eq!(cons.ret(), &ValueType::class("Point"));
        assert!(env.resolve_constructor("Point", &[]).is_ok());
    }

    #[test]
    fn class_may_refer_to_itself() {
        let mut program = Program::new(vec![
            ClassDecl::new("Node")
                .field(ValueType::class("Node"), "next")
                .method(MethodDef::new(
                    ValueType::class("Node"),
                    "tail",
                    vec![],
                    vec![Stmt::ret(Some(Expr::var("next")))],
                )),
        ]);
        assert!(check(&mut program).is_ok());
    }
}
