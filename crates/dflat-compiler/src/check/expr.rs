//! Expression checking.
//!
//! Types are computed bottom-up: operands and arguments first, then the node
//! itself. Every checked node gets its type cached in [`Expr::ty`].

use dflat_ast::{CallExpr, Expr, ExprKind, NewExpr, VarBinding, VariableExpr};
use dflat_core::config::RECEIVER_NAME;
use dflat_core::{CompilationError, Result, SemanticError, ValueType};

use super::{Checker, Located};
use crate::operators::{binary_key, unary_key};

impl Checker<'_> {
    /// Check an expression and cache its type on the node.
    pub fn check_expr(&mut self, expr: &mut Expr) -> Result<ValueType> {
        let span = expr.span;
        let ty = self.infer(&mut expr.kind).at(span)?;
        expr.ty.set(ty.clone());
        Ok(ty)
    }

    fn infer(&mut self, kind: &mut ExprKind) -> Result<ValueType> {
        match kind {
            ExprKind::Number(_) => Ok(ValueType::Int),
            ExprKind::Bool(_) => Ok(ValueType::Bool),
            ExprKind::This => self.receiver(),
            ExprKind::Variable(var) => self.check_variable(var),
            ExprKind::Binary(binary) => {
                let lhs = self.check_expr(&mut binary.lhs)?;
                let rhs = self.check_expr(&mut binary.rhs)?;
                self.env.lookup_rule_type(&binary_key(binary.op, lhs, rhs))
            }
            ExprKind::Unary(unary) => {
                let operand = self.check_expr(&mut unary.operand)?;
                self.env.lookup_rule_type(&unary_key(unary.op, operand))
            }
            ExprKind::Call(call) => self.check_call(call),
            ExprKind::New(new) => self.check_new(new),
        }
    }

    fn receiver(&self) -> Result<ValueType> {
        self.env.receiver_type().cloned().ok_or_else(|| {
            SemanticError::UndeclaredVariable {
                name: RECEIVER_NAME.to_string(),
            }
            .into()
        })
    }

    /// Class name of the object a member access or call goes through, and
    /// how the object name itself resolved.
    ///
    /// `None` means the implicit receiver.
    fn object_class(&self, object: Option<&str>) -> Result<(String, VarBinding)> {
        let (ty, binding) = match object {
            None | Some(RECEIVER_NAME) => (self.receiver()?, VarBinding::Local),
            Some(name) => self.env.lookup_var(name)?,
        };
        match ty {
            ValueType::Class(class) => Ok((class, binding)),
            other => Err(SemanticError::TypeMismatch {
                message: format!(
                    "'{}' has type '{other}', which is not a class",
                    object.unwrap_or(RECEIVER_NAME)
                ),
            }
            .into()),
        }
    }

    fn check_variable(&mut self, var: &mut VariableExpr) -> Result<ValueType> {
        let (ty, binding) = match &var.object {
            None => self.env.lookup_var(&var.name)?,
            Some(object) => {
                let (class, object_binding) = self.object_class(Some(object))?;
                let (ty, owner) = self.env.lookup_member(&class, &var.name)?;
                var.object_binding.set(object_binding);
                (ty, VarBinding::Member { owner })
            }
        };
        var.binding.set(binding);
        Ok(ty)
    }

    fn check_args(&mut self, args: &mut [Expr]) -> Result<Vec<ValueType>> {
        args.iter_mut().map(|arg| self.check_expr(arg)).collect()
    }

    fn check_call(&mut self, call: &mut CallExpr) -> Result<ValueType> {
        let (class, object_binding) = self.object_class(call.object.as_deref())?;
        let args = self.check_args(&mut call.args)?;

        let method = match self.env.resolve_method(&class, &call.name, &args) {
            Ok(method) => method,
            Err(err) if is_undeclared_method(&err) => {
                // Calling a field by name.
                if self.env.registry().lookup_var(&class, &call.name).is_some() {
                    return Err(SemanticError::NotAMethod {
                        class,
                        method: call.name.clone(),
                    }
                    .into());
                }
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let binding = self.env.method_binding(&class, &method)?;
        let ret = method.ret().clone();
        call.binding.set(binding);
        if call.object.is_some() {
            call.object_binding.set(object_binding);
        }
        Ok(ret)
    }

    fn check_new(&mut self, new: &mut NewExpr) -> Result<ValueType> {
        let ty = ValueType::from_name(&new.class);
        self.env.assert_valid_type(&ty)?;
        let Some(class) = ty.class_name() else {
            return Err(SemanticError::TypeMismatch {
                message: format!("cannot instantiate built-in type '{ty}'"),
            }
            .into());
        };

        let args = self.check_args(&mut new.args)?;
        let cons = self.env.resolve_constructor(class, &args)?;
        let binding = self.env.method_binding(class, &cons)?;
        new.binding.set(binding);
        Ok(ty)
    }
}

fn is_undeclared_method(err: &CompilationError) -> bool {
    matches!(err.semantic(), Some(SemanticError::UndeclaredMethod { .. }))
}
