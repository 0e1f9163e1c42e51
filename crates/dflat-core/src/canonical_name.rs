//! Overload identity for methods and operator rules.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use xxhash_rust::xxh64::Xxh64;

use crate::types::{MethodType, ValueType, write_list};

/// Separator mixed into signature hashes between components.
const SEPARATOR: u8 = 0xFF;

/// A base name plus full method signature.
///
/// Identity is the base name and the ordered parameter types. The return type
/// travels with the name but does not take part in equality, ordering or
/// hashing, so a call site that only knows its argument types can still look
/// a declaration up.
#[derive(Debug, Clone)]
pub struct CanonicalName {
    base_name: String,
    signature: MethodType,
}

impl CanonicalName {
    pub fn new(base_name: impl Into<String>, signature: MethodType) -> Self {
        Self {
            base_name: base_name.into(),
            signature,
        }
    }

    /// Key used to look something up by argument types alone.
    ///
    /// The return type is irrelevant for lookups and is left as `void`.
    pub fn lookup_key(base_name: impl Into<String>, params: Vec<ValueType>) -> Self {
        Self::new(base_name, MethodType::new(ValueType::Void, params))
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn signature(&self) -> &MethodType {
        &self.signature
    }

    pub fn params(&self) -> &[ValueType] {
        &self.signature.params
    }

    pub fn ret(&self) -> &ValueType {
        &self.signature.ret
    }

    /// Stable 64-bit hash of the identity (base name and parameter names).
    ///
    /// Used to mangle overloads into unique symbols.
    pub fn signature_hash(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        hasher.update(self.base_name.as_bytes());
        for param in &self.signature.params {
            hasher.update(&[SEPARATOR]);
            hasher.update(param.name().as_bytes());
        }
        hasher.digest()
    }

    /// Symbol name unique per overload: `name_<hash>`.
    pub fn mangled(&self) -> String {
        format!("{}_{:016x}", self.base_name, self.signature_hash())
    }
}

impl PartialEq for CanonicalName {
    fn eq(&self, other: &Self) -> bool {
        self.base_name == other.base_name && self.signature.params == other.signature.params
    }
}

impl Eq for CanonicalName {}

impl Hash for CanonicalName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base_name.hash(state);
        self.signature.params.hash(state);
    }
}

impl PartialOrd for CanonicalName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CanonicalName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.base_name
            .cmp(&other.base_name)
            .then_with(|| self.signature.params.cmp(&other.signature.params))
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.base_name)?;
        write_list(f, &self.signature.params)?;
        f.write_str(")")
    }
}
