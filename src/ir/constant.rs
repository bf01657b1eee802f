//! Constant expressions

use super::identifier::EncodedCompoundIdentifier;
use serde::{Deserialize, Serialize};

/// A constant expression with its resolved value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constant {
    /// Reference to another constant or to a bits/enum member
    Identifier {
        /// Referenced declaration or member
        identifier: EncodedCompoundIdentifier,
        /// Resolved value
        #[serde(default)]
        value: String,
        /// Source expression
        #[serde(default)]
        expression: String,
    },
    /// Literal value
    Literal {
        /// The literal itself
        literal: Literal,
        /// Resolved value
        #[serde(default)]
        value: String,
        /// Source expression
        #[serde(default)]
        expression: String,
    },
    /// Binary operator expression (e.g. `A | B`), already folded
    BinaryOperator {
        /// Resolved value
        value: String,
        /// Source expression
        #[serde(default)]
        expression: String,
    },
}

impl Constant {
    /// The resolved value text
    pub fn value(&self) -> &str {
        match self {
            Constant::Identifier { value, .. }
            | Constant::Literal { value, .. }
            | Constant::BinaryOperator { value, .. } => value,
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Literal {
    /// String literal, unquoted
    String {
        /// Contents
        value: String,
    },
    /// Numeric literal as written (decimal, `0x`, `0b`, or with a decimal point)
    Numeric {
        /// Digits
        value: String,
    },
    /// `true`
    True,
    /// `false`
    False,
    /// `default`
    Default,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_deserialization() {
        let json = r#"{
            "kind": "literal",
            "literal": { "kind": "numeric", "value": "42" },
            "value": "42",
            "expression": "42"
        }"#;
        let c: Constant = serde_json::from_str(json).unwrap();
        assert_eq!(c.value(), "42");
        assert!(matches!(
            c,
            Constant::Literal {
                literal: Literal::Numeric { .. },
                ..
            }
        ));

        let t: Literal = serde_json::from_str(r#"{ "kind": "true" }"#).unwrap();
        assert_eq!(t, Literal::True);
    }
}
