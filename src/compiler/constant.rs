//! Constant expressions
//!
//! Constants compile to a (Natural, Wire) pair of C++ expressions. The
//! Unified bindings alias natural types, so they reuse the natural text.

use super::context::CompileContext;
use super::types::Type;
use crate::ir::{self, PrimitiveSubtype};
use crate::names::{change_if_reserved, Flavor, RenderContext};
use crate::{Error, Result};
use std::fmt::Write;

/// Smallest `int64`, which C++ cannot spell as a negated literal
const INT64_MIN_LITERALS: [&str; 2] = ["-9223372036854775808", "0x8000000000000000"];
const INT64_MIN_EXPRESSION: &str = "(-9223372036854775807ll-1)";

/// A constant spelled for each flavor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstantValue {
    /// Natural and Unified spelling
    pub natural: String,
    /// Wire spelling
    pub wire: String,
}

impl ConstantValue {
    /// Same text in every flavor
    pub fn common(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            natural: text.clone(),
            wire: text,
        }
    }

    /// Whether both spellings are present
    pub fn is_set(&self) -> bool {
        !self.natural.is_empty() && !self.wire.is_empty()
    }

    /// Text for the selected flavor
    pub fn render(&self, cx: &RenderContext) -> Result<String> {
        let flavor = cx.require_flavor(|| format!("{}/{}", self.natural, self.wire))?;
        Ok(match flavor {
            Flavor::Natural | Flavor::Unified => self.natural.clone(),
            Flavor::Wire => self.wire.clone(),
        })
    }
}

/// Compile a constant. `ty` is the classified target type, needed for
/// binary operator casts; `ir_ty` decides float literal suffixes.
pub fn compile_constant(
    cx: &mut CompileContext<'_>,
    val: &ir::Constant,
    ty: Option<&Type>,
    ir_ty: &ir::Type,
) -> Result<ConstantValue> {
    match val {
        ir::Constant::Identifier { identifier, .. } => {
            let ci = identifier.parse()?;
            let mut names = cx.compile_name_variants(&ci.encode_declaration())?;
            if let Some(member) = &ci.member {
                names = names.nest(&change_if_reserved(member));
            }
            Ok(ConstantValue {
                natural: names.natural.to_string(),
                wire: names.wire.to_string(),
            })
        }
        ir::Constant::Literal { literal, .. } => {
            Ok(ConstantValue::common(compile_literal(literal, ir_ty)))
        }
        ir::Constant::BinaryOperator { value, .. } => {
            let ty = ty.ok_or_else(|| Error::unknown_kind("constant", "binary_operator"))?;
            Ok(ConstantValue {
                natural: format!("static_cast<{}>({})", ty.names.natural, value),
                wire: format!("static_cast<{}>({})", ty.names.wire, value),
            })
        }
    }
}

/// C++ spelling of a literal
pub fn compile_literal(val: &ir::Literal, ir_ty: &ir::Type) -> String {
    match val {
        ir::Literal::String { value } => quote_c_string(value),
        ir::Literal::Numeric { value } => compile_numeric(value, ir_ty.primitive_subtype()),
        ir::Literal::True => "true".to_string(),
        ir::Literal::False => "false".to_string(),
        ir::Literal::Default => "default".to_string(),
    }
}

fn compile_numeric(value: &str, subtype: Option<PrimitiveSubtype>) -> String {
    if INT64_MIN_LITERALS.contains(&value) {
        return INT64_MIN_EXPRESSION.to_string();
    }
    if value.starts_with("0x") || value.starts_with("0b") {
        return value.to_string();
    }
    if value.contains('.') {
        if subtype == Some(PrimitiveSubtype::Float32) {
            return format!("{}f", value);
        }
        return value.to_string();
    }
    if !value.starts_with('-') {
        return format!("{}u", value);
    }
    value.to_string()
}

/// Quote `s` as a C string literal.
///
/// Control characters use three-digit octal escapes, which cannot swallow
/// following digits the way `\x` escapes do.
pub fn quote_c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '?' => out.push_str("\\?"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
