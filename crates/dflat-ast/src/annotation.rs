//! Analysis results cached on AST nodes.

use std::fmt;

use dflat_core::CanonicalName;

/// A slot filled in by semantic analysis.
///
/// Annotations are not part of a node's syntax: two nodes that differ only in
/// their annotations compare equal.
#[derive(Clone, Default)]
pub struct Annotation<T>(Option<T>);

impl<T> Annotation<T> {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn set(&mut self, value: T) {
        self.0 = Some(value);
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl<T> PartialEq for Annotation<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: fmt::Debug> fmt::Debug for Annotation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("_"),
        }
    }
}

/// What a variable reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarBinding {
    /// A local, parameter or the receiver.
    Local,
    /// A field, declared on `owner` (the receiver's class or an ancestor).
    Member { owner: String },
}

/// The concrete method a call or `new` expression binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBinding {
    /// Class that declares the method.
    pub owner: String,
    /// The selected overload.
    pub method: CanonicalName,
}
