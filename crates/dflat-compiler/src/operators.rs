//! Built-in operator rules.
//!
//! Every operator application is typed by looking up a rule keyed by the
//! operator symbol and the operand types, exactly like a method call against
//! a fixed overload set. There is no widening for operators: a rule must
//! match the operand types exactly.
//!
//! | Operator      | Operands          | Result |
//! |---------------|-------------------|--------|
//! | `+ - * /`     | `(int, int)`      | `int`  |
//! | `== !=`       | `(int, int)`      | `bool` |
//! | `== !=`       | `(bool, bool)`    | `bool` |
//! | `&& \|\|`     | `(bool, bool)`    | `bool` |
//! | `&& \|\|`     | `(int, int)`      | `bool` |
//! | unary `-`     | `int`             | `int`  |
//! | unary `!`     | `bool`            | `bool` |

use dflat_ast::{BinaryOp, UnaryOp};
use dflat_core::{CanonicalName, MethodType, ValueType};
use rustc_hash::FxHashMap;

/// Lookup key for a binary operator applied to the given operands.
pub fn binary_key(op: BinaryOp, lhs: ValueType, rhs: ValueType) -> CanonicalName {
    CanonicalName::lookup_key(op.symbol(), vec![lhs, rhs])
}

/// Lookup key for a unary operator applied to the given operand.
pub fn unary_key(op: UnaryOp, operand: ValueType) -> CanonicalName {
    CanonicalName::lookup_key(op.symbol(), vec![operand])
}

/// The fixed set of operator rules.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: FxHashMap<CanonicalName, ValueType>,
}

impl RuleTable {
    /// Build the table of built-in rules.
    pub fn builtin() -> Self {
        use ValueType::{Bool, Int};

        let mut table = Self {
            rules: FxHashMap::default(),
        };

        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
            table.binary(op, Int, Int, Int);
        }
        for op in [BinaryOp::Equal, BinaryOp::NotEqual] {
            table.binary(op, Bool, Int, Int);
            table.binary(op, Bool, Bool, Bool);
        }
        for op in [BinaryOp::And, BinaryOp::Or] {
            table.binary(op, Bool, Bool, Bool);
            table.binary(op, Bool, Int, Int);
        }

        table.unary(UnaryOp::Neg, Int, Int);
        table.unary(UnaryOp::Not, Bool, Bool);
        table
    }

    fn binary(&mut self, op: BinaryOp, ret: ValueType, lhs: ValueType, rhs: ValueType) {
        let name = CanonicalName::new(op.symbol(), MethodType::new(ret.clone(), vec![lhs, rhs]));
        self.rules.insert(name, ret);
    }

    fn unary(&mut self, op: UnaryOp, ret: ValueType, operand: ValueType) {
        let name = CanonicalName::new(op.symbol(), MethodType::new(ret.clone(), vec![operand]));
        self.rules.insert(name, ret);
    }

    /// Result type of the rule matching `key` exactly.
    pub fn lookup(&self, key: &CanonicalName) -> Option<&ValueType> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValueType::{Bool, Int};

    #[test]
    fn arithmetic_is_int_only() {
        let rules = RuleTable::builtin();
        assert_eq!(rules.lookup(&binary_key(BinaryOp::Add, Int, Int)), Some(&Int));
        assert_eq!(rules.lookup(&binary_key(BinaryOp::Div, Int, Int)), Some(&Int));
        assert_eq!(rules.lookup(&binary_key(BinaryOp::Add, Bool, Bool)), None);
        assert_eq!(rules.lookup(&binary_key(BinaryOp::Mul, Int, Bool)), None);
    }

    #[test]
    fn comparison_and_logic_yield_bool() {
        let rules = RuleTable::builtin();
        for op in [BinaryOp::Equal, BinaryOp::NotEqual, BinaryOp::And, BinaryOp::Or] {
            assert_eq!(rules.lookup(&binary_key(op, Int, Int)), Some(&Bool));
            assert_eq!(rules.lookup(&binary_key(op, Bool, Bool)), Some(&Bool));
            assert_eq!(rules.lookup(&binary_key(op, Bool, Int)), None);
        }
    }

    #[test]
    fn unary_rules() {
        let rules = RuleTable::builtin();
        assert_eq!(rules.lookup(&unary_key(UnaryOp::Neg, Int)), Some(&Int));
        assert_eq!(rules.lookup(&unary_key(UnaryOp::Not, Bool)), Some(&Bool));
        assert_eq!(rules.lookup(&unary_key(UnaryOp::Neg, Bool)), None);
        assert_eq!(rules.lookup(&unary_key(UnaryOp::Not, Int)), None);
    }

    #[test]
    fn no_rules_for_classes() {
        let rules = RuleTable::builtin();
        let dog = ValueType::class("Dog");
        assert_eq!(rules.lookup(&binary_key(BinaryOp::Equal, dog.clone(), dog)), None);
        assert_eq!(rules.len(), 14);
    }
}
