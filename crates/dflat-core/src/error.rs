//! Error types for semantic analysis and code generation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! CompilationError
//! ├── Semantic { error: SemanticError, span }  - malformed input program
//! └── Logic(LogicError)                         - caller sequencing bug
//! ```
//!
//! Semantic errors describe something wrong with the program being compiled.
//! Logic errors mean the AST walk drove the type environment out of order
//! (leaving a class with a method still open, declaring a local outside a
//! method, ...) and never indicate bad user input.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Semantic Errors
// ============================================================================

/// A problem with the program being analyzed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// A class with this name is already declared.
    #[error("duplicate class declaration '{name}'")]
    DuplicateClass { name: String },

    /// A class declares the same field twice.
    #[error("duplicate member '{member}' in class '{class}'")]
    DuplicateMember { class: String, member: String },

    /// A class declares two methods with the same name and parameter types.
    #[error("duplicate method '{method}' in class '{class}'")]
    DuplicateMethod { class: String, method: String },

    /// A type name that is neither built-in nor a declared class.
    #[error("invalid reference to unknown type '{name}'")]
    UnknownType { name: String },

    /// A name that is neither a local nor a member of the receiver.
    #[error("undeclared variable '{name}'")]
    UndeclaredVariable { name: String },

    /// A field missing from a class and all of its ancestors.
    #[error("undeclared member '{member}' in class '{class}'")]
    UndeclaredMember { class: String, member: String },

    /// A name used as a variable that resolves to a method.
    #[error("'{name}' is not a variable")]
    NotAVariable { name: String },

    /// A name used as a method that resolves to a field.
    #[error("'{method}' in class '{class}' is not a method")]
    NotAMethod { class: String, method: String },

    /// No overload with this name and signature in the class chain.
    #[error("undeclared method '{method}' in class '{class}'")]
    UndeclaredMethod { class: String, method: String },

    /// More than one overload accepts the arguments through widening.
    #[error("ambiguous overloaded call of '{method}' in class '{class}': could be {candidates}")]
    AmbiguousCall {
        class: String,
        method: String,
        candidates: String,
    },

    /// No built-in operator rule accepts these operand types.
    #[error("invalid operands to operator: {rule}")]
    InvalidOperands { rule: String },

    /// An assignability or equality assertion failed.
    #[error("{message}")]
    TypeMismatch { message: String },
}

// ============================================================================
// Logic Errors
// ============================================================================

/// A violation of the environment's enter/leave protocol by its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("{operation}: no current class")]
    NoCurrentClass { operation: &'static str },

    #[error("{operation}: no current method")]
    NoCurrentMethod { operation: &'static str },

    #[error("cannot enter class '{name}' while class '{open}' is open")]
    NestedClass { name: String, open: String },

    #[error("cannot enter method '{name}' while method '{open}' is open")]
    NestedMethod { name: String, open: String },

    #[error("cannot leave class while method '{open}' is open")]
    MethodStillOpen { open: String },

    #[error("scope stack is empty")]
    EmptyScopeStack,

    #[error("{operation}: no class '{name}'")]
    UnregisteredClass {
        operation: &'static str,
        name: String,
    },

    #[error("call to '{method}' has no resolved binding")]
    UnresolvedCall { method: String },

    #[error("definition of '{class}::{method}' has no resolved signature")]
    UnresolvedSignature { class: String, method: String },
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Error returned by every analysis and code generation operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A semantic error, located at the innermost node that raised it.
    #[error("{}{}", location(.span), .error)]
    Semantic { error: SemanticError, span: Span },

    /// A driver bug.
    #[error("internal error: {0}")]
    Logic(#[from] LogicError),
}

fn location(span: &Span) -> String {
    if span.is_unknown() {
        String::new()
    } else {
        format!("at {span}: ")
    }
}

impl From<SemanticError> for CompilationError {
    fn from(error: SemanticError) -> Self {
        CompilationError::Semantic {
            error,
            span: Span::default(),
        }
    }
}

impl CompilationError {
    pub fn is_semantic(&self) -> bool {
        matches!(self, CompilationError::Semantic { .. })
    }

    pub fn is_logic(&self) -> bool {
        matches!(self, CompilationError::Logic(_))
    }

    /// The semantic error, if this is one.
    pub fn semantic(&self) -> Option<&SemanticError> {
        match self {
            CompilationError::Semantic { error, .. } => Some(error),
            CompilationError::Logic(_) => None,
        }
    }

    /// The logic error, if this is one.
    pub fn logic(&self) -> Option<&LogicError> {
        match self {
            CompilationError::Logic(error) => Some(error),
            CompilationError::Semantic { .. } => None,
        }
    }

    /// Where the error occurred, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompilationError::Semantic { span, .. } if !span.is_unknown() => Some(*span),
            _ => None,
        }
    }

    /// Attach a location unless a more precise one is already present.
    ///
    /// Errors bubble outward through the tree walk, so the first node to
    /// attach its span is the innermost one.
    pub fn with_span(self, at: Span) -> Self {
        match self {
            CompilationError::Semantic { error, span } if span.is_unknown() => {
                CompilationError::Semantic { error, span: at }
            }
            other => other,
        }
    }
}

/// Result alias used across the analyzer.
pub type Result<T> = std::result::Result<T, CompilationError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_error_display_without_span() {
        let err: CompilationError = SemanticError::DuplicateClass {
            name: "Dog".to_string(),
        }
        .into();
        assert_eq!(format!("{err}"), "duplicate class declaration 'Dog'");
        assert!(err.is_semantic());
        assert_eq!(err.span(), None);
    }

    #[test]
    fn semantic_error_display_with_span() {
        let err = CompilationError::from(SemanticError::UnknownType {
            name: "Cat".to_string(),
        })
        .with_span(Span::new(4, 9, 3));
        assert_eq!(
            format!("{err}"),
            "at 4:9: invalid reference to unknown type 'Cat'"
        );
    }

    #[test]
    fn innermost_span_wins() {
        let err = CompilationError::from(SemanticError::UndeclaredVariable {
            name: "x".to_string(),
        })
        .with_span(Span::new(2, 5, 1))
        .with_span(Span::new(1, 1, 40));
        assert_eq!(err.span(), Some(Span::new(2, 5, 1)));
    }

    #[test]
    fn logic_errors_are_distinct() {
        let err: CompilationError = LogicError::EmptyScopeStack.into();
        assert!(err.is_logic());
        assert!(err.semantic().is_none());
        assert_eq!(format!("{err}"), "internal error: scope stack is empty");
        // Spans never attach to logic errors.
        assert_eq!(err.with_span(Span::new(1, 1, 1)).span(), None);
    }
}
