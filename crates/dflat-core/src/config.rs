//! Reserved names shared by the analyzer and the code generator.

/// Name of the implicit receiver binding seeded at method entry.
pub const RECEIVER_NAME: &str = "this";

/// Base name of every constructor, including the synthesized default one.
pub const CONSTRUCTOR_NAME: &str = "cons";

/// Built-in type names as they appear in source.
pub mod type_names {
    pub const INT: &str = "int";
    pub const BOOL: &str = "bool";
    pub const VOID: &str = "void";
}
