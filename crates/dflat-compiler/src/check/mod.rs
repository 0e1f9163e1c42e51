//! AST type-checking pass.
//!
//! The [`Checker`] walks a [`Program`] top-down, driving the
//! [`TypeEnvironment`] through class, method and block nesting, and fills in
//! every annotation slot on the way:
//!
//! - each expression's resolved type
//! - each variable reference's binding (local or inherited member)
//! - each call and `new` expression's selected overload and declaring class
//! - each method's canonical name
//!
//! Analysis fails fast: the first error aborts the walk. Semantic errors carry
//! the span of the innermost node that produced them.
//!
//! # Example
//!
//! ```
//! use dflat_ast::{ClassDecl, Expr, MethodDef, Program, Stmt};
//! use dflat_compiler::{Checker, TypeEnvironment};
//! use dflat_core::ValueType;
//!
//! let mut program = Program::new(vec![
//!     ClassDecl::new("Counter")
//!         .field(ValueType::Int, "count")
//!         .method(MethodDef::new(
//!             ValueType::Int,
//!             "next",
//!             vec![],
//!             vec![Stmt::ret(Some(Expr::var("count")))],
//!         )),
//! ]);
//!
//! let mut env = TypeEnvironment::new();
//! Checker::new(&mut env).check_program(&mut program).unwrap();
//! assert!(env.registry().contains("Counter"));
//! ```

mod class;
mod expr;
mod stmt;

use dflat_ast::Program;
use dflat_core::{Result, Span};

use crate::env::TypeEnvironment;

/// Attach a node's span to any semantic error it produced.
trait Located<T> {
    fn at(self, span: Span) -> Result<T>;
}

impl<T> Located<T> for Result<T> {
    fn at(self, span: Span) -> Result<T> {
        self.map_err(|err| err.with_span(span))
    }
}

/// Type checker over an owned AST.
pub struct Checker<'env> {
    env: &'env mut TypeEnvironment,
}

impl<'env> Checker<'env> {
    pub fn new(env: &'env mut TypeEnvironment) -> Self {
        Self { env }
    }

    /// Check every class in declaration order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check_program(&mut self, program: &mut Program) -> Result<()> {
        tracing::debug!(classes = program.classes.len(), "checking program");
        for class in &mut program.classes {
            self.check_class(class)?;
        }
        Ok(())
    }

    pub fn env(&self) -> &TypeEnvironment {
        self.env
    }
}
