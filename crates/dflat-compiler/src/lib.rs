//! dflat semantic analyzer and code generator.
//!
//! ## Architecture
//!
//! - **Check**: walk the AST with a [`TypeEnvironment`], registering classes
//!   and resolving every name and call; results are cached on the nodes
//! - **Emit**: render the checked AST to text from the cached results and the
//!   final [`ClassRegistry`](dflat_registry::ClassRegistry)
//!
//! ## Modules
//!
//! - [`check`]: AST type-checking pass
//! - [`emit`]: text code generation
//! - [`env`]: type environment (registry, scopes, rules, current method)
//! - [`operators`]: built-in operator rule table
//! - [`overload`]: overload resolution and base-class widening
//! - [`scope`]: local scope chain

pub mod check;
pub mod emit;
pub mod env;
pub mod operators;
pub mod overload;
pub mod scope;

pub use check::Checker;
pub use emit::CodeEmitter;
pub use env::{CurrentMethod, TypeEnvironment};
pub use operators::RuleTable;
pub use overload::{compatible_args, resolve_constructor, resolve_method, type_is_or_base};
pub use scope::{Decl, ScopeChain};

// Re-export CompilationError from core for convenience
pub use dflat_core::CompilationError;
