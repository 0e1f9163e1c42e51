//! Per-class record.

use std::collections::BTreeSet;

use dflat_core::{CanonicalName, TypeModel, ValueType};
use rustc_hash::FxHashMap;

/// Registry entry for a declared class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    /// Class name, unique within a compilation.
    pub name: String,
    /// Parent class name (single inheritance).
    pub parent: Option<String>,
    /// Fields by name.
    pub members: FxHashMap<String, TypeModel>,
    /// Declared method overloads, including constructors.
    pub methods: BTreeSet<CanonicalName>,
    /// Field names in declaration order.
    member_order: Vec<String>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            members: FxHashMap::default(),
            methods: BTreeSet::new(),
            member_order: Vec::new(),
        }
    }

    /// The value type of instances of this class.
    pub fn value_type(&self) -> ValueType {
        ValueType::Class(self.name.clone())
    }

    /// Insert or replace a member, returning the previous type.
    pub fn insert_member(&mut self, name: impl Into<String>, ty: TypeModel) -> Option<TypeModel> {
        let name = name.into();
        let previous = self.members.insert(name.clone(), ty);
        if previous.is_none() {
            self.member_order.push(name);
        }
        previous
    }

    /// Insert a method; returns `false` if the signature was already present.
    pub fn insert_method(&mut self, method: CanonicalName) -> bool {
        self.methods.insert(method)
    }

    /// Members in declaration order.
    pub fn members_in_order(&self) -> impl Iterator<Item = (&str, &TypeModel)> {
        self.member_order
            .iter()
            .filter_map(|name| self.members.get(name).map(|ty| (name.as_str(), ty)))
    }

    /// Overloads declared directly on this class with the given base name.
    pub fn overloads<'a>(&'a self, base_name: &'a str) -> impl Iterator<Item = &'a CanonicalName> {
        self.methods
            .iter()
            .filter(move |m| m.base_name() == base_name)
    }

    pub fn has_method_named(&self, base_name: &str) -> bool {
        self.overloads(base_name).next().is_some()
    }
}

/// Result of a hierarchy-aware member or method lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    /// Number of parent steps from the starting class (0 = declared on it).
    pub depth: usize,
    /// Declared type.
    pub ty: TypeModel,
    /// Class that declares the member.
    pub owner: String,
}
