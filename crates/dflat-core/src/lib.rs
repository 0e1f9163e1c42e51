//! Core types shared by every dflat crate.
//!
//! - [`types`]: value, method and combined type models
//! - [`canonical_name`]: overload identity for methods and operator rules
//! - [`error`]: semantic and logic error hierarchy
//! - [`config`]: reserved names
//! - [`span`]: source locations

pub mod canonical_name;
pub mod config;
pub mod error;
pub mod span;
pub mod types;

pub use canonical_name::CanonicalName;
pub use error::{CompilationError, LogicError, Result, SemanticError};
pub use span::Span;
pub use types::{MethodType, TypeModel, ValueType};
