//! Class metadata registry.
//!
//! [`ClassRegistry`] owns the [`ClassMetadata`] of every declared class and
//! answers hierarchy-aware member and method lookups. Classes refer to their
//! parent by name only; every walk up the chain goes back through the
//! registry.

mod class;
mod registry;

pub use class::{ClassMetadata, MemberInfo};
pub use registry::{Ancestors, ClassRegistry};
