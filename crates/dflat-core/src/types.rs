//! Semantic types.
//!
//! [`TypeModel`] is what the analyzer assigns to declarations: either a value
//! type (something a variable can hold) or a method signature. Equality is
//! structural throughout; class types compare by name.

use std::fmt;

use crate::config::type_names;

/// A type a variable, field, parameter or expression can have.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Void,
    Int,
    Bool,
    /// An instance of a user-declared class, referenced by name.
    Class(String),
}

impl ValueType {
    /// Map a source-level type name to a value type.
    ///
    /// Anything that is not a built-in name is taken to be a class; whether
    /// that class exists is checked later against the registry.
    pub fn from_name(name: &str) -> Self {
        match name {
            type_names::INT => ValueType::Int,
            type_names::BOOL => ValueType::Bool,
            type_names::VOID => ValueType::Void,
            _ => ValueType::Class(name.to_string()),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        ValueType::Class(name.into())
    }

    /// Source-level name of this type.
    pub fn name(&self) -> &str {
        match self {
            ValueType::Void => type_names::VOID,
            ValueType::Int => type_names::INT,
            ValueType::Bool => type_names::BOOL,
            ValueType::Class(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !self.is_class()
    }

    pub fn is_class(&self) -> bool {
        matches!(self, ValueType::Class(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ValueType::Void)
    }

    /// The class name, if this is a class type.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            ValueType::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A method signature: return type plus ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodType {
    pub ret: ValueType,
    pub params: Vec<ValueType>,
}

impl MethodType {
    pub fn new(ret: ValueType, params: Vec<ValueType>) -> Self {
        Self { ret, params }
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ret)?;
        write_list(f, &self.params)?;
        f.write_str(")")
    }
}

/// Any type the analyzer can bind to a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeModel {
    Value(ValueType),
    Method(MethodType),
}

impl TypeModel {
    pub fn is_value(&self) -> bool {
        matches!(self, TypeModel::Value(_))
    }

    pub fn is_method(&self) -> bool {
        matches!(self, TypeModel::Method(_))
    }

    pub fn as_value(&self) -> Option<&ValueType> {
        match self {
            TypeModel::Value(v) => Some(v),
            TypeModel::Method(_) => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodType> {
        match self {
            TypeModel::Method(m) => Some(m),
            TypeModel::Value(_) => None,
        }
    }
}

impl From<ValueType> for TypeModel {
    fn from(value: ValueType) -> Self {
        TypeModel::Value(value)
    }
}

impl From<MethodType> for TypeModel {
    fn from(method: MethodType) -> Self {
        TypeModel::Method(method)
    }
}

impl fmt::Display for TypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeModel::Value(v) => v.fmt(f),
            TypeModel::Method(m) => m.fmt(f),
        }
    }
}

/// Write `a,b,c` without surrounding delimiters.
pub(crate) fn write_list(f: &mut fmt::Formatter<'_>, types: &[ValueType]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_maps_builtins() {
        assert_eq!(ValueType::from_name("int"), ValueType::Int);
        assert_eq!(ValueType::from_name("bool"), ValueType::Bool);
        assert_eq!(ValueType::from_name("void"), ValueType::Void);
        assert_eq!(ValueType::from_name("Dog"), ValueType::class("Dog"));
    }

    #[test]
    fn method_type_display() {
        let m = MethodType::new(ValueType::Int, vec![ValueType::Bool, ValueType::class("Dog")]);
        assert_eq!(m.to_string(), "int(bool,Dog)");
        assert_eq!(TypeModel::from(m).to_string(), "int(bool,Dog)");
    }

    #[test]
    fn structural_equality() {
        let a = TypeModel::from(MethodType::new(ValueType::Void, vec![ValueType::Int]));
        let b = TypeModel::from(MethodType::new(ValueType::Void, vec![ValueType::Int]));
        assert_eq!(a, b);
        assert_ne!(a, TypeModel::from(ValueType::Int));
    }
}
