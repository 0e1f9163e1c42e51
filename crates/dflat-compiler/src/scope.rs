//! Lexical scope management for method bodies.
//!
//! A `ScopeChain` is a stack of frames. Entering a method pushes the argument
//! frame (holding the receiver and the parameters); every block inside the
//! method pushes another. Lookups search innermost to outermost, so a local in
//! an inner block shadows one in an outer block until the inner frame is
//! popped.

use dflat_core::{LogicError, Result, TypeModel};
use rustc_hash::FxHashMap;

// ============================================================================
// Types
// ============================================================================

/// A name bound in some frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub ty: TypeModel,
}

type Frame = FxHashMap<String, Decl>;

// ============================================================================
// ScopeChain
// ============================================================================

/// Stack of local frames.
#[derive(Debug, Default, Clone)]
pub struct ScopeChain {
    frames: Vec<Frame>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Frame Management
    // ==========================================================================

    /// Push an empty frame.
    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Pop the innermost frame, discarding its bindings.
    pub fn pop(&mut self) -> Result<()> {
        self.frames
            .pop()
            .map(|_| ())
            .ok_or_else(|| LogicError::EmptyScopeStack.into())
    }

    /// Number of live frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    // ==========================================================================
    // Declaration & Lookup
    // ==========================================================================

    /// Bind `name` in the innermost frame.
    ///
    /// Rebinding a name in the same frame replaces it; the previous binding is
    /// returned.
    pub fn decl_local(&mut self, name: &str, ty: impl Into<TypeModel>) -> Result<Option<Decl>> {
        let frame = self
            .frames
            .last_mut()
            .ok_or(LogicError::EmptyScopeStack)?;
        Ok(frame.insert(name.to_string(), Decl { ty: ty.into() }))
    }

    /// Find the innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<&Decl> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}

// ============================================================================
// Tests
// ============================================================================
