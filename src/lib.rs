//! dflat - a small class-based language front end.
//!
//! This crate ties the workspace together: hand it a parsed [`Program`] and
//! it runs semantic analysis and, optionally, code generation.
//!
//! ```
//! use dflat::{ClassDecl, Expr, MethodDef, Program, Stmt, ValueType};
//!
//! let mut program = Program::new(vec![
//!     ClassDecl::new("Animal").field(ValueType::Int, "age"),
//!     ClassDecl::new("Dog").extends("Animal").method(MethodDef::new(
//!         ValueType::Int,
//!         "age_next_year",
//!         vec![],
//!         vec![Stmt::ret(Some(Expr::binary(
//!             Expr::var("age"),
//!             dflat::BinaryOp::Add,
//!             Expr::number(1),
//!         )))],
//!     )),
//! ]);
//!
//! let registry = dflat::analyze(&mut program).unwrap();
//! assert_eq!(registry.lookup_var("Dog", "age").unwrap().owner, "Animal");
//! ```
//!
//! ## Crates
//!
//! - `dflat-core`: types, canonical names, errors, spans
//! - `dflat-registry`: class metadata
//! - `dflat-ast`: syntax tree with analysis annotations
//! - `dflat-compiler`: type environment, checker, emitter

pub use dflat_ast::{
    Annotation, AssignStmt, BinaryExpr, BinaryOp, Block, CallExpr, ClassDecl, ConsDef, Expr,
    ExprKind, FieldDecl, IfStmt, Member, MethodBinding, MethodDef, NewExpr, Param, Program, Stmt,
    StmtKind, UnaryExpr, UnaryOp, VarBinding, VarDeclStmt, VariableExpr, WhileStmt,
};
pub use dflat_compiler::{Checker, CodeEmitter, ScopeChain, TypeEnvironment};
pub use dflat_core::config;
pub use dflat_core::{
    CanonicalName, CompilationError, LogicError, MethodType, Result, SemanticError, Span,
    TypeModel, ValueType,
};
pub use dflat_registry::{ClassMetadata, ClassRegistry, MemberInfo};

/// Type-check `program` in a fresh environment.
///
/// On success every annotation slot in the tree is filled and the final class
/// registry is returned.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn analyze(program: &mut Program) -> Result<ClassRegistry> {
    let mut env = TypeEnvironment::new();
    Checker::new(&mut env).check_program(program)?;
    tracing::debug!(classes = env.registry().len(), "analysis finished");
    Ok(env.into_registry())
}

/// Type-check `program` and render it to target text.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(program: &mut Program) -> Result<String> {
    let registry = analyze(program)?;
    let code = CodeEmitter::new(&registry).emit_program(program)?;
    tracing::debug!(bytes = code.len(), "code generation finished");
    Ok(code)
}
