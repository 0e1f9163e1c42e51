//! Statement nodes.

use std::fmt;

use dflat_core::{Span, ValueType};

use crate::expr::Expr;

/// A statement together with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `{ ... }`
    Block(Block),
    /// `if (c) { ... } else { ... }`
    If(IfStmt),
    /// `while (c) { ... }`
    While(WhileStmt),
    /// `x = e;`
    Assign(AssignStmt),
    /// `T x;` or `T x = e;`
    VarDecl(VarDeclStmt),
    /// `return;` or `return e;`
    Return(Option<Expr>),
    /// `print(e);`
    Print(Expr),
    /// An expression evaluated for its effect, always a call.
    Expr(Expr),
}

/// A braced sequence of statements with its own scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Block,
    pub else_branch: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    /// Must be a variable or member access.
    pub target: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub ty: ValueType,
    pub name: String,
    pub init: Option<Expr>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    /// Set the source location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn block(stmts: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Block(Block::new(stmts)))
    }

    pub fn if_else(cond: Expr, then_branch: Vec<Stmt>, else_branch: Option<Vec<Stmt>>) -> Self {
        Self::new(StmtKind::If(IfStmt {
            cond,
            then_branch: Block::new(then_branch),
            else_branch: else_branch.map(Block::new),
        }))
    }

    pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::While(WhileStmt {
            cond,
            body: Block::new(body),
        }))
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::new(StmtKind::Assign(AssignStmt { target, value }))
    }

    pub fn var_decl(ty: ValueType, name: impl Into<String>) -> Self {
        Self::new(StmtKind::VarDecl(VarDeclStmt {
            ty,
            name: name.into(),
            init: None,
        }))
    }

    pub fn var_decl_init(ty: ValueType, name: impl Into<String>, init: Expr) -> Self {
        Self::new(StmtKind::VarDecl(VarDeclStmt {
            ty,
            name: name.into(),
            init: Some(init),
        }))
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(value))
    }

    pub fn print(value: Expr) -> Self {
        Self::new(StmtKind::Print(value))
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for stmt in &self.stmts {
            write!(f, " {stmt}")?;
        }
        f.write_str(" }")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Block(block) => block.fmt(f),
            StmtKind::If(s) => {
                write!(f, "if ({}) {}", s.cond, s.then_branch)?;
                if let Some(else_branch) = &s.else_branch {
                    write!(f, " else {else_branch}")?;
                }
                Ok(())
            }
            StmtKind::While(s) => write!(f, "while ({}) {}", s.cond, s.body),
            StmtKind::Assign(s) => write!(f, "{} = {};", s.target, s.value),
            StmtKind::VarDecl(s) => match &s.init {
                Some(init) => write!(f, "{} {} = {};", s.ty, s.name, init),
                None => write!(f, "{} {};", s.ty, s.name),
            },
            StmtKind::Return(Some(value)) => write!(f, "return {value};"),
            StmtKind::Return(None) => f.write_str("return;"),
            StmtKind::Print(value) => write!(f, "print({value});"),
            StmtKind::Expr(expr) => write!(f, "{expr};"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::BinaryOp;

    #[test]
    fn display_if_else() {
        let stmt = Stmt::if_else(
            Expr::binary(Expr::number(1), BinaryOp::Equal, Expr::number(0)),
            vec![Stmt::assign(Expr::var("x"), Expr::number(2))],
            Some(vec![Stmt::print(Expr::var("x"))]),
        );
        assert_eq!(stmt.to_string(), "if ((1 == 0)) { x = 2; } else { print(x); }");
    }

    #[test]
    fn display_declarations() {
        assert_eq!(Stmt::var_decl(ValueType::Int, "n").to_string(), "int n;");
        assert_eq!(
            Stmt::var_decl_init(ValueType::class("Dog"), "d", Expr::new_object("Dog", vec![]))
                .to_string(),
            "Dog d = new Dog();"
        );
        assert_eq!(Stmt::ret(None).to_string(), "return;");
    }

    #[test]
    fn spans_do_not_affect_equality_of_kind() {
        let a = Stmt::print(Expr::number(1)).at(Span::new(1, 1, 9));
        let b = Stmt::print(Expr::number(1));
        assert_eq!(a.kind, b.kind);
    }
}
