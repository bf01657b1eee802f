//! Data and service declarations

use super::constant::{compile_constant, ConstantValue};
use super::context::CompileContext;
use super::protocol::discoverable_name;
use super::result::MethodResult;
use super::types::{compile_primitive, compile_type, Type, TypeKind};
use crate::ir::{self, Attributes, DeclKind};
use crate::names::{change_if_reserved, to_upper_camel_case, NameVariants};
use crate::{Error, Result};

/// `const` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Const {
    /// Names
    pub names: NameVariants,
    /// Attributes
    pub attributes: Attributes,
    /// Declared in a header, defined elsewhere
    pub is_extern: bool,
    /// `const` for strings, `constexpr` otherwise
    pub decorator: &'static str,
    /// Declared type
    pub ty: Type,
    /// Value
    pub value: ConstantValue,
}

/// Member of a `bits` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitsMember {
    /// Escaped name
    pub name: String,
    /// Value
    pub value: ConstantValue,
    /// Attributes
    pub attributes: Attributes,
}

/// `bits` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bits {
    /// Names
    pub names: NameVariants,
    /// Attributes
    pub attributes: Attributes,
    /// Underlying integer type
    pub ty: Type,
    /// Union of all members
    pub mask: String,
    /// `<Bits>::kMask`
    pub mask_name: NameVariants,
    /// Members
    pub members: Vec<BitsMember>,
    /// Unknown bits are rejected
    pub strict: bool,
}

/// Member of an `enum` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Escaped name
    pub name: String,
    /// Value
    pub value: ConstantValue,
    /// Attributes
    pub attributes: Attributes,
}

/// `enum` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    /// Names
    pub names: NameVariants,
    /// Attributes
    pub attributes: Attributes,
    /// Underlying integer type
    pub ty: Type,
    /// Members
    pub members: Vec<EnumMember>,
    /// Unknown values are rejected
    pub strict: bool,
}

/// Member of a `struct` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMember {
    /// Escaped name
    pub name: String,
    /// Member type
    pub ty: Type,
    /// Default value, unset when absent
    pub default_value: ConstantValue,
    /// Offset inside the struct
    pub offset: u32,
    /// Attributes
    pub attributes: Attributes,
}

/// `struct` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    /// Names
    pub names: NameVariants,
    /// Attributes
    pub attributes: Attributes,
    /// Coding table symbol
    pub coding_table_type: String,
    /// Members
    pub members: Vec<StructMember>,
    /// May carry handles
    pub is_resource: bool,
    /// Inline bytes
    pub inline_size: u32,
    /// Worst-case handles
    pub max_handles: u32,
    /// Worst-case out-of-line bytes
    pub max_out_of_line: u32,
    /// Contains padding
    pub has_padding: bool,
    /// Has out-of-line parts
    pub has_pointer: bool,
    /// Set when the struct is the value payload of an error-syntax result
    pub result: Option<MethodResult>,
}

/// Member of a `table` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMember {
    /// Ordinal
    pub ordinal: u64,
    /// Escaped name
    pub name: String,
    /// Member type
    pub ty: Type,
    /// `has_<name>`
    pub field_presence_name: String,
    /// Attributes
    pub attributes: Attributes,
}

/// `table` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Names
    pub names: NameVariants,
    /// Attributes
    pub attributes: Attributes,
    /// Coding table symbol
    pub coding_table_type: String,
    /// Non-reserved members in ordinal order
    pub members: Vec<TableMember>,
    /// Largest ordinal, reserved ones included
    pub max_ordinal: u64,
    /// May carry handles
    pub is_resource: bool,
    /// Inline bytes
    pub inline_size: u32,
    /// Worst-case handles
    pub max_handles: u32,
    /// Worst-case out-of-line bytes
    pub max_out_of_line: u32,
}

/// Member of a `union` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionMember {
    /// Ordinal
    pub ordinal: u64,
    /// Escaped name
    pub name: String,
    /// Member type
    pub ty: Type,
    /// Tag enumerator, `<Union>::Tag::k<Name>`
    pub tag_name: NameVariants,
    /// Attributes
    pub attributes: Attributes,
}

/// `union` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Union {
    /// Names
    pub names: NameVariants,
    /// Attributes
    pub attributes: Attributes,
    /// Coding table symbol
    pub coding_table_type: String,
    /// `<Union>::Tag`
    pub tag_enum: NameVariants,
    /// Non-reserved members
    pub members: Vec<UnionMember>,
    /// Unknown variants are rejected
    pub strict: bool,
    /// May carry handles
    pub is_resource: bool,
    /// Inline bytes
    pub inline_size: u32,
    /// Worst-case handles
    pub max_handles: u32,
    /// Worst-case out-of-line bytes
    pub max_out_of_line: u32,
    /// Set for error-syntax result unions
    pub result: Option<MethodResult>,
}

/// Member of a `service` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMember {
    /// Protocol served by the member
    pub protocol_type: NameVariants,
    /// Name as declared
    pub name: String,
    /// Escaped accessor name
    pub method_name: String,
    /// Attributes
    pub attributes: Attributes,
}

/// `service` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Names
    pub names: NameVariants,
    /// Attributes
    pub attributes: Attributes,
    /// `library.Name`
    pub service_name: String,
    /// Members
    pub members: Vec<ServiceMember>,
}

/// Compile a `const`. String constants become extern `const char*`.
pub fn compile_const(cx: &mut CompileContext<'_>, val: &ir::Const) -> Result<Const> {
    let names = cx.compile_name_variants(&val.name)?;
    if matches!(val.ty, ir::Type::String { .. }) {
        return Ok(Const {
            names,
            attributes: val.attributes.clone(),
            is_extern: true,
            decorator: "const",
            ty: Type::primitive_named("char*"),
            value: compile_constant(cx, &val.value, None, &val.ty)?,
        });
    }
    let ty = compile_type(cx, &val.ty)?;
    let value = compile_constant(cx, &val.value, Some(&ty), &val.ty)?;
    Ok(Const {
        names,
        attributes: val.attributes.clone(),
        is_extern: false,
        decorator: "constexpr",
        ty,
        value,
    })
}

/// Compile a `bits` declaration
pub fn compile_bits(cx: &mut CompileContext<'_>, val: &ir::Bits) -> Result<Bits> {
    let names = cx.compile_name_variants(&val.name)?;
    let ty = compile_type(cx, &val.ty)?;
    let mut members = Vec::with_capacity(val.members.len());
    for m in &val.members {
        members.push(BitsMember {
            name: change_if_reserved(&m.name),
            value: compile_constant(cx, &m.value, Some(&ty), &val.ty)?,
            attributes: m.attributes.clone(),
        });
    }
    Ok(Bits {
        mask_name: names.nest("kMask"),
        names,
        attributes: val.attributes.clone(),
        ty,
        mask: val.mask.clone(),
        members,
        strict: val.strict,
    })
}

/// Compile an `enum` declaration
pub fn compile_enum(cx: &mut CompileContext<'_>, val: &ir::Enum) -> Result<Enum> {
    let names = cx.compile_name_variants(&val.name)?;
    let ty = compile_primitive(val.ty);
    let ir_ty = ir::Type::Primitive { subtype: val.ty };
    let mut members = Vec::with_capacity(val.members.len());
    for m in &val.members {
        members.push(EnumMember {
            name: change_if_reserved(&m.name),
            value: compile_constant(cx, &m.value, Some(&ty), &ir_ty)?,
            attributes: m.attributes.clone(),
        });
    }
    Ok(Enum {
        names,
        attributes: val.attributes.clone(),
        ty,
        members,
        strict: val.strict,
    })
}

/// Compile a `struct` declaration
pub fn compile_struct(cx: &mut CompileContext<'_>, val: &ir::Struct) -> Result<Struct> {
    tracing::trace!("Compiling struct {}", val.name);
    let names = cx.compile_name_variants(&val.name)?;
    let mut members = Vec::with_capacity(val.members.len());
    for m in &val.members {
        let ty = compile_type(cx, &m.ty)?;
        let default_value = match &m.maybe_default_value {
            Some(value) => compile_constant(cx, value, Some(&ty), &m.ty)?,
            None => ConstantValue::default(),
        };
        members.push(StructMember {
            name: change_if_reserved(&m.name),
            ty,
            default_value,
            offset: m.field_shape_v1.offset,
            attributes: m.attributes.clone(),
        });
    }
    let shape = &val.type_shape_v1;
    Ok(Struct {
        coding_table_type: cx.coding_table_type(&val.name)?,
        result: cx.result_for_struct.get(&val.name).cloned(),
        names,
        attributes: val.attributes.clone(),
        members,
        is_resource: val.resource,
        inline_size: shape.inline_size,
        max_handles: shape.max_handles,
        max_out_of_line: shape.max_out_of_line,
        has_padding: shape.has_padding,
        has_pointer: shape.depth > 0,
    })
}

/// Compile a `table` declaration
pub fn compile_table(cx: &mut CompileContext<'_>, val: &ir::Table) -> Result<Table> {
    let names = cx.compile_name_variants(&val.name)?;
    let mut members = Vec::new();
    for m in &val.members {
        let (Some(name), Some(ty)) = (&m.name, &m.ty) else {
            continue;
        };
        if m.reserved {
            continue;
        }
        let name = change_if_reserved(name);
        members.push(TableMember {
            ordinal: m.ordinal,
            field_presence_name: format!("has_{}", name),
            ty: compile_type(cx, ty)?,
            name,
            attributes: m.attributes.clone(),
        });
    }
    members.sort_by_key(|m| m.ordinal);
    let shape = &val.type_shape_v1;
    Ok(Table {
        coding_table_type: cx.coding_table_type(&val.name)?,
        names,
        attributes: val.attributes.clone(),
        members,
        max_ordinal: val.members.iter().map(|m| m.ordinal).max().unwrap_or(0),
        is_resource: val.resource,
        inline_size: shape.inline_size,
        max_handles: shape.max_handles,
        max_out_of_line: shape.max_out_of_line,
    })
}

/// Compile a `union` declaration
pub fn compile_union(cx: &mut CompileContext<'_>, val: &ir::Union) -> Result<Union> {
    let names = cx.compile_name_variants(&val.name)?;
    let tag_enum = names.nest("Tag");
    let mut members = Vec::new();
    for m in &val.members {
        let (Some(name), Some(ty)) = (&m.name, &m.ty) else {
            continue;
        };
        if m.reserved {
            continue;
        }
        members.push(UnionMember {
            ordinal: m.ordinal,
            name: change_if_reserved(name),
            ty: compile_type(cx, ty)?,
            tag_name: tag_enum.nest(&format!("k{}", to_upper_camel_case(name))),
            attributes: m.attributes.clone(),
        });
    }
    let shape = &val.type_shape_v1;
    Ok(Union {
        coding_table_type: cx.coding_table_type(&val.name)?,
        result: cx.result_for_union.get(&val.name).cloned(),
        names,
        attributes: val.attributes.clone(),
        tag_enum,
        members,
        strict: val.strict,
        is_resource: val.resource,
        inline_size: shape.inline_size,
        max_handles: shape.max_handles,
        max_out_of_line: shape.max_out_of_line,
    })
}

/// Compile a `service` declaration
pub fn compile_service(cx: &mut CompileContext<'_>, val: &ir::Service) -> Result<Service> {
    let names = cx.compile_name_variants(&val.name)?;
    let mut members = Vec::with_capacity(val.members.len());
    for m in &val.members {
        let ty = compile_type(cx, &m.ty)?;
        if ty.kind != TypeKind::Protocol {
            return Err(Error::unknown_kind("service member", kind_name(&ty)));
        }
        let protocol = m
            .ty
            .identifier()
            .ok_or_else(|| Error::unknown_kind("service member", kind_name(&ty)))?;
        members.push(ServiceMember {
            protocol_type: cx.compile_name_variants(protocol)?,
            name: m.name.clone(),
            method_name: change_if_reserved(&m.name),
            attributes: m.attributes.clone(),
        });
    }
    Ok(Service {
        service_name: discoverable_name(&val.name)?,
        names,
        attributes: val.attributes.clone(),
        members,
    })
}

fn kind_name(ty: &Type) -> &'static str {
    match ty.kind {
        TypeKind::Protocol => DeclKind::Protocol.as_str(),
        TypeKind::Struct => DeclKind::Struct.as_str(),
        TypeKind::Table => DeclKind::Table.as_str(),
        TypeKind::Union => DeclKind::Union.as_str(),
        TypeKind::Bits => DeclKind::Bits.as_str(),
        TypeKind::Enum => DeclKind::Enum.as_str(),
        TypeKind::Const => DeclKind::Const.as_str(),
        TypeKind::Array => "array",
        TypeKind::Vector => "vector",
        TypeKind::String => "string",
        TypeKind::Handle => "handle",
        TypeKind::Request => "request",
        TypeKind::Primitive => "primitive",
    }
}
