//! Abstract syntax tree for dflat programs.
//!
//! The parser produces a [`Program`]; the analyzer walks it, filling in the
//! [`Annotation`] slots on expression, variable, call and method nodes; the
//! code generator reads those annotations back.
//!
//! Every node kind is a variant of a closed enum, so each pass over the tree
//! is an exhaustive `match`.

mod annotation;
mod decl;
mod expr;
mod ops;
mod stmt;

pub use annotation::{Annotation, MethodBinding, VarBinding};
pub use decl::{ClassDecl, ConsDef, FieldDecl, Member, MethodDef, Param, Program};
pub use expr::{BinaryExpr, CallExpr, Expr, ExprKind, NewExpr, UnaryExpr, VariableExpr};
pub use ops::{BinaryOp, UnaryOp};
pub use stmt::{AssignStmt, Block, IfStmt, Stmt, StmtKind, VarDeclStmt, WhileStmt};
