//! Error-syntax result extraction
//!
//! A method declared as `Spin() -> (Payload) error uint32` arrives as a method
//! whose single response parameter is a `result`-attributed union of a value
//! struct and an error type. The pre-pass here recognizes those unions so
//! methods, unions and the value struct can expose the value/error split.

use super::context::CompileContext;
use super::protocol::Parameter;
use super::types::compile_type;
use crate::ir;
use crate::names::{change_if_reserved, Name, NameVariants};
use crate::Result;

/// Value/error split of an error-syntax response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodResult {
    /// Members of the value struct
    pub value_members: Vec<Parameter>,
    /// The result union
    pub result_decl: NameVariants,
    /// The error type
    pub error_decl: NameVariants,
    /// The value struct
    pub value_struct_decl: NameVariants,
    /// `std::tuple` of the value member types
    pub value_tuple_decl: NameVariants,
    /// `void`, the single value member type, or the value tuple
    pub value_decl: NameVariants,
}

impl MethodResult {
    /// Number of value members
    pub fn value_arity(&self) -> usize {
        self.value_members.len()
    }
}

/// Register every error-syntax union of the library. Runs before structs and
/// protocols are compiled.
pub fn register_results(cx: &mut CompileContext<'_>, unions: &[ir::Union]) -> Result<()> {
    for union in unions {
        if !union.attributes.has("result") {
            continue;
        }
        if union.members.len() != 2 {
            tracing::debug!(
                "{} has the result attribute but {} members",
                union.name,
                union.members.len()
            );
            continue;
        }
        let (Some(value_ty), Some(error_ty)) = (&union.members[0].ty, &union.members[1].ty) else {
            continue;
        };
        let Some(value_struct) = value_ty.identifier().and_then(|id| cx.local_struct(id)) else {
            tracing::debug!("{} does not wrap a local struct", union.name);
            continue;
        };

        let result = compile_result(cx, union, value_struct, value_ty, error_ty)?;
        tracing::trace!("Registered result {} for {}", union.name, value_struct.name);
        cx.result_for_struct
            .insert(value_struct.name.clone(), result.clone());
        cx.result_for_union.insert(union.name.clone(), result);
    }
    Ok(())
}

fn compile_result(
    cx: &mut CompileContext<'_>,
    union: &ir::Union,
    value_struct: &ir::Struct,
    value_ty: &ir::Type,
    error_ty: &ir::Type,
) -> Result<MethodResult> {
    let result_decl = cx.compile_name_variants(&union.name)?;
    let value_struct_decl = compile_type(cx, value_ty)?.names;
    let error_decl = compile_type(cx, error_ty)?.names;

    let mut value_members = Vec::with_capacity(value_struct.members.len());
    for member in &value_struct.members {
        value_members.push(Parameter {
            name: change_if_reserved(&member.name),
            ty: compile_type(cx, &member.ty)?,
            offset: member.field_shape_v1.offset,
        });
    }

    let tuple = |pick: fn(&NameVariants) -> &Name| {
        let members: Vec<Name> = value_members.iter().map(|p| pick(&p.ty.names).clone()).collect();
        Name::tuple(&members)
    };
    let value_tuple_decl = NameVariants {
        natural: tuple(|n| &n.natural),
        unified: tuple(|n| &n.unified),
        wire: tuple(|n| &n.wire),
    };
    let value_decl = match value_members.as_slice() {
        [] => NameVariants::primitive("void"),
        [single] => single.ty.names.clone(),
        _ => value_tuple_decl.clone(),
    };

    Ok(MethodResult {
        value_members,
        result_decl,
        error_decl,
        value_struct_decl,
        value_tuple_decl,
        value_decl,
    })
}
