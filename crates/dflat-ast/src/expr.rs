//! Expression nodes.

use std::fmt;

use dflat_core::{Span, ValueType};

use crate::annotation::{Annotation, MethodBinding, VarBinding};
use crate::ops::{BinaryOp, UnaryOp};

/// An expression together with its location and resolved type.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Type assigned by the analyzer.
    pub ty: Annotation<ValueType>,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal: `12`
    Number(i64),
    /// Boolean literal: `true`
    Bool(bool),
    /// The receiver: `this`
    This,
    /// Variable or member access: `x`, `obj.x`
    Variable(VariableExpr),
    /// `a + b`
    Binary(Box<BinaryExpr>),
    /// `!a`
    Unary(Box<UnaryExpr>),
    /// Method call: `f(a)`, `obj.f(a)`
    Call(CallExpr),
    /// Object creation: `new C(a)`
    New(NewExpr),
}

/// `name` or `object.name`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    /// Variable holding the object, if the access is qualified.
    pub object: Option<String>,
    pub name: String,
    pub binding: Annotation<VarBinding>,
    /// How `object` itself resolved: a local, or a field of the receiver.
    pub object_binding: Annotation<VarBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub lhs: Expr,
    pub op: BinaryOp,
    pub rhs: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
}

/// `name(args)` on the receiver or `object.name(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub object: Option<String>,
    pub name: String,
    pub args: Vec<Expr>,
    pub binding: Annotation<MethodBinding>,
    pub object_binding: Annotation<VarBinding>,
}

/// `new class(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub class: String,
    pub args: Vec<Expr>,
    pub binding: Annotation<MethodBinding>,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            span: Span::default(),
            ty: Annotation::empty(),
        }
    }

    /// Set the source location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn number(value: i64) -> Self {
        Self::new(ExprKind::Number(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ExprKind::Bool(value))
    }

    pub fn this() -> Self {
        Self::new(ExprKind::This)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Variable(VariableExpr {
            object: None,
            name: name.into(),
            binding: Annotation::empty(),
            object_binding: Annotation::empty(),
        }))
    }

    pub fn member(object: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ExprKind::Variable(VariableExpr {
            object: Some(object.into()),
            name: name.into(),
            binding: Annotation::empty(),
            object_binding: Annotation::empty(),
        }))
    }

    pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Self {
        Self::new(ExprKind::Binary(Box::new(BinaryExpr { lhs, op, rhs })))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::new(ExprKind::Unary(Box::new(UnaryExpr { op, operand })))
    }

    /// Call on the implicit receiver.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call(CallExpr {
            object: None,
            name: name.into(),
            args,
            binding: Annotation::empty(),
            object_binding: Annotation::empty(),
        }))
    }

    pub fn method_call(object: impl Into<String>, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call(CallExpr {
            object: Some(object.into()),
            name: name.into(),
            args,
            binding: Annotation::empty(),
            object_binding: Annotation::empty(),
        }))
    }

    pub fn new_object(class: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::New(NewExpr {
            class: class.into(),
            args,
            binding: Annotation::empty(),
        }))
    }

    /// The resolved type, once analyzed.
    pub fn resolved_type(&self) -> Option<&ValueType> {
        self.ty.get()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write!(f, "{n}"),
            ExprKind::Bool(b) => write!(f, "{b}"),
            ExprKind::This => f.write_str("this"),
            ExprKind::Variable(v) => {
                if let Some(object) = &v.object {
                    write!(f, "{object}.")?;
                }
                f.write_str(&v.name)
            }
            ExprKind::Binary(b) => write!(f, "({} {} {})", b.lhs, b.op, b.rhs),
            ExprKind::Unary(u) => write!(f, "({}{})", u.op, u.operand),
            ExprKind::Call(c) => {
                if let Some(object) = &c.object {
                    write!(f, "{object}.")?;
                }
                write!(f, "{}(", c.name)?;
                write_args(f, &c.args)?;
                f.write_str(")")
            }
            ExprKind::New(n) => {
                write!(f, "new {}(", n.class)?;
                write_args(f, &n.args)?;
                f.write_str(")")
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nested_expression() {
        let e = Expr::binary(
            Expr::number(1),
            BinaryOp::Add,
            Expr::unary(UnaryOp::Neg, Expr::member("obj", "x")),
        );
        assert_eq!(e.to_string(), "(1 + (-obj.x))");
    }

    #[test]
    fn display_calls() {
        let call = Expr::method_call("d", "bark", vec![Expr::number(2), Expr::boolean(true)]);
        assert_eq!(call.to_string(), "d.bark(2, true)");
        assert_eq!(Expr::new_object("Dog", vec![]).to_string(), "new Dog()");
    }

    #[test]
    fn equality_ignores_resolved_type() {
        let mut a = Expr::var("x");
        a.ty.set(ValueType::Int);
        assert_eq!(a, Expr::var("x"));
        assert_ne!(a, Expr::var("y"));
    }
}
