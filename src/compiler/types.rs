//! Type classification
//!
//! Maps every IR type node to its per-flavor spelling plus the facts the
//! templates branch on: kind, family, resource-ness and destructor need.

use super::context::CompileContext;
use crate::ir::{self, DeclKind, PrimitiveSubtype};
use crate::names::{Flavor, Name, NameVariants, RenderContext};
use crate::{Error, Result};
use serde::Serialize;

/// What a type is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum TypeKind {
    Array,
    Vector,
    String,
    Handle,
    Request,
    Primitive,
    Bits,
    Enum,
    Const,
    Struct,
    Table,
    Union,
    Protocol,
}

/// How a value is passed and how a field holding it is initialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Copied by value, like integers
    TrivialCopy,
    /// Passed by reference and moved into fields
    Reference,
    /// Passed by const reference, stored as a view
    String,
    /// Passed by reference, stored as a view
    Vector,
}

/// A classified type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    /// Spelling in each flavor
    pub names: NameVariants,
    /// Type kind
    pub kind: TypeKind,
    /// Passing family
    pub family: Family,
    /// Whether the type may carry handles
    pub is_resource: bool,
    /// Whether values need explicit destruction
    pub needs_dtor: bool,
    /// Whether the wire field is an out-of-line pointer
    pub wire_pointer: bool,
    /// Whether absence is representable
    pub nullable: bool,
    /// Element type of arrays and vectors
    pub element_type: Option<Box<Type>>,
    /// Element count of arrays
    pub element_count: Option<u32>,
    /// Referenced struct, table or union
    pub declaration: Option<ir::EncodedCompoundIdentifier>,
}

impl Type {
    fn new(names: NameVariants, kind: TypeKind, family: Family) -> Self {
        Self {
            names,
            kind,
            family,
            is_resource: false,
            needs_dtor: false,
            wire_pointer: false,
            nullable: false,
            element_type: None,
            element_count: None,
            declaration: None,
        }
    }

    /// Type with a fixed spelling in all flavors, such as `char*`
    pub fn primitive_named(spelling: &str) -> Self {
        Self::new(NameVariants::primitive(spelling), TypeKind::Primitive, Family::TrivialCopy)
    }

    /// Primitives, bits and enums
    pub fn is_primitive_type(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive | TypeKind::Bits | TypeKind::Enum)
    }

    /// Render the type for the selected flavor
    pub fn render(&self, cx: &RenderContext) -> Result<String> {
        self.names.render(cx)
    }

    /// Parameter declaration for a wire-flavor argument named `name`
    pub fn wire_argument_declaration(&self, name: &str, cx: &RenderContext) -> Result<String> {
        let ty = self.render(cx)?;
        Ok(match self.family {
            Family::TrivialCopy => format!("{} {}", ty, name),
            Family::Reference | Family::Vector => format!("{}& {}", ty, name),
            Family::String => format!("const {}& {}", ty, name),
        })
    }

    /// Member initializer for a wire-flavor message field named `name`
    pub fn wire_init_message(&self, name: &str, cx: &RenderContext) -> Result<String> {
        Ok(match self.family {
            Family::TrivialCopy => format!("{}({})", name, name),
            Family::Reference => format!("{}(std::move({}))", name, name),
            Family::String => format!(
                "{}(::fidl::unowned_ptr_t<const char>({}.data()), {}.size())",
                name, name, name
            ),
            Family::Vector => {
                let element = match &self.element_type {
                    Some(element) => element.render(cx)?,
                    None => return Err(Error::unknown_kind("vector element", "none")),
                };
                format!(
                    "{}(::fidl::unowned_ptr_t<{}>({}.mutable_data()), {}.count())",
                    name, element, name, name
                )
            }
        })
    }
}

/// C++ spelling of a primitive subtype
pub fn primitive_type_name(subtype: PrimitiveSubtype) -> &'static str {
    match subtype {
        PrimitiveSubtype::Bool => "bool",
        PrimitiveSubtype::Int8 => "int8_t",
        PrimitiveSubtype::Int16 => "int16_t",
        PrimitiveSubtype::Int32 => "int32_t",
        PrimitiveSubtype::Int64 => "int64_t",
        PrimitiveSubtype::Uint8 => "uint8_t",
        PrimitiveSubtype::Uint16 => "uint16_t",
        PrimitiveSubtype::Uint32 => "uint32_t",
        PrimitiveSubtype::Uint64 => "uint64_t",
        PrimitiveSubtype::Float32 => "float",
        PrimitiveSubtype::Float64 => "double",
    }
}

/// Classify a primitive subtype
pub fn compile_primitive(subtype: PrimitiveSubtype) -> Type {
    Type::primitive_named(primitive_type_name(subtype))
}

/// Classify an IR type, recording any handle subtype it references
pub fn compile_type(cx: &mut CompileContext<'_>, val: &ir::Type) -> Result<Type> {
    let ty = match val {
        ir::Type::Array {
            element_type,
            element_count,
        } => {
            let element = compile_type(cx, element_type)?;
            let names = element.names.with_array_templates(
                "std::array",
                "fidl::Array",
                *element_count,
            )?;
            let mut ty = Type::new(names, TypeKind::Array, Family::Reference);
            ty.wire_pointer = element.wire_pointer;
            ty.needs_dtor = true;
            ty.is_resource = element.is_resource;
            ty.element_count = Some(*element_count);
            ty.element_type = Some(Box::new(element));
            ty
        }
        ir::Type::Vector {
            element_type,
            nullable,
            ..
        } => {
            let element = compile_type(cx, element_type)?;
            let natural = if *nullable { "fidl::VectorPtr" } else { "std::vector" };
            let names = element.names.with_templates(natural, "fidl::VectorView")?;
            let mut ty = Type::new(names, TypeKind::Vector, Family::Vector);
            ty.wire_pointer = element.wire_pointer;
            ty.needs_dtor = true;
            ty.nullable = *nullable;
            ty.is_resource = element.is_resource;
            ty.element_type = Some(Box::new(element));
            ty
        }
        ir::Type::String { nullable, .. } => {
            let natural =
                Name::from_path(if *nullable { "fidl::StringPtr" } else { "std::string" });
            let names = NameVariants {
                natural: natural.clone(),
                unified: natural,
                wire: Name::from_path("fidl::StringView"),
            };
            let mut ty = Type::new(names, TypeKind::String, Family::String);
            ty.needs_dtor = true;
            ty.nullable = *nullable;
            ty
        }
        ir::Type::Handle { subtype, nullable } => {
            cx.record_handle_type(subtype.as_str());
            let names = NameVariants::primitive(&format!("zx::{}", subtype.as_str()));
            let mut ty = Type::new(names, TypeKind::Handle, Family::Reference);
            ty.needs_dtor = true;
            ty.is_resource = true;
            ty.nullable = *nullable;
            ty
        }
        ir::Type::Request { subtype, nullable } => {
            let info = cx.decl_info(subtype)?;
            if info.kind != DeclKind::Protocol {
                return Err(Error::unknown_kind("request subtype", info.kind.as_str()));
            }
            let names = cx
                .compile_name_variants(subtype)?
                .with_templates("fidl::InterfaceRequest", "fidl::ServerEnd")?;
            let mut ty = Type::new(names, TypeKind::Request, Family::Reference);
            ty.needs_dtor = true;
            ty.is_resource = true;
            ty.nullable = *nullable;
            ty
        }
        ir::Type::Primitive { subtype } => compile_primitive(*subtype),
        ir::Type::Identifier {
            identifier,
            nullable,
        } => compile_identifier_type(cx, identifier, *nullable)?,
    };
    Ok(ty)
}

fn compile_identifier_type(
    cx: &mut CompileContext<'_>,
    identifier: &ir::EncodedCompoundIdentifier,
    nullable: bool,
) -> Result<Type> {
    let info = cx.decl_info(identifier)?;
    let names = cx.compile_name_variants(identifier)?;

    if info.kind == DeclKind::Protocol {
        let names = names.with_templates("fidl::InterfaceHandle", "fidl::ClientEnd")?;
        let mut ty = Type::new(names, TypeKind::Protocol, Family::Reference);
        ty.needs_dtor = true;
        ty.is_resource = true;
        ty.nullable = nullable;
        return Ok(ty);
    }

    let (kind, family) = match info.kind {
        DeclKind::Bits => (TypeKind::Bits, Family::TrivialCopy),
        DeclKind::Enum => (TypeKind::Enum, Family::TrivialCopy),
        DeclKind::Const => (TypeKind::Const, Family::Reference),
        DeclKind::Struct => (TypeKind::Struct, Family::Reference),
        DeclKind::Table => (TypeKind::Table, Family::Reference),
        DeclKind::Union => (TypeKind::Union, Family::Reference),
        DeclKind::Protocol | DeclKind::Service => {
            return Err(Error::unknown_kind("declaration", info.kind.as_str()))
        }
    };

    let mut ty = Type::new(names, kind, family);
    ty.nullable = nullable;
    if matches!(kind, TypeKind::Struct | TypeKind::Table | TypeKind::Union) {
        ty.declaration = Some(identifier.clone());
        ty.is_resource = info.resource;
        ty.needs_dtor = true;
        ty.wire_pointer = nullable && kind != TypeKind::Union;
    }

    if nullable {
        let natural = Name::from_path("std::unique_ptr");
        let tracking = Name::from_path("fidl::tracking_ptr");
        ty.names = ty.names.try_map(|flavor, n| match flavor {
            Flavor::Natural | Flavor::Unified => natural.template(n),
            Flavor::Wire if kind == TypeKind::Union => Ok(n.clone()),
            Flavor::Wire => tracking.template(n),
        })?;
        ty.needs_dtor = true;
    }
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompileOptions;
    use crate::ir::{EncodedCompoundIdentifier, HandleSubtype};

    const IR: &str = r#"{
        "name": "acme.widgets",
        "struct_declarations": [
            { "name": "acme.widgets/Gadget", "members": [] },
            { "name": "acme.widgets/Crate", "members": [], "resource": true }
        ],
        "declarations": {
            "acme.widgets/Gadget": "struct",
            "acme.widgets/Crate": "struct",
            "acme.widgets/Color": "enum",
            "acme.widgets/Flags": "bits",
            "acme.widgets/Shape": "union",
            "acme.widgets/Info": "table",
            "acme.widgets/Spinner": "protocol",
            "acme.widgets/Factory": "service",
            "acme.widgets/MAX": "const"
        }
    }"#;

    fn ident(name: &str, nullable: bool) -> ir::Type {
        ir::Type::Identifier {
            identifier: EncodedCompoundIdentifier::new(format!("acme.widgets/{}", name)),
            nullable,
        }
    }

    fn spell(ty: &Type, flavor: Flavor) -> String {
        ty.render(&RenderContext::for_flavor(flavor)).unwrap()
    }

    fn with_cx<T>(f: impl FnOnce(&mut CompileContext<'_>) -> T) -> T {
        let options = CompileOptions::default();
        let root = ir::Root::from_json(IR).unwrap();
        let mut cx = CompileContext::new(&options, &root);
        f(&mut cx)
    }

    #[test]
    fn test_primitive() {
        let ty = compile_primitive(PrimitiveSubtype::Float32);
        assert_eq!(spell(&ty, Flavor::Wire), "float");
        assert_eq!(ty.family, Family::TrivialCopy);
        assert!(!ty.needs_dtor);
        assert!(ty.is_primitive_type());
    }

    #[test]
    fn test_array_of_structs() {
        with_cx(|cx| {
            let ty = compile_type(
                cx,
                &ir::Type::Array {
                    element_type: Box::new(ident("Gadget", false)),
                    element_count: 4,
                },
            )
            .unwrap();
            assert_eq!(spell(&ty, Flavor::Natural), "::std::array<::acme::widgets::Gadget, 4>");
            assert_eq!(spell(&ty, Flavor::Unified), "::std::array<::acme_widgets::Gadget, 4>");
            assert_eq!(spell(&ty, Flavor::Wire), "::fidl::Array<::acme_widgets::wire::Gadget, 4>");
            assert_eq!(ty.kind, TypeKind::Array);
            assert_eq!(ty.family, Family::Reference);
            assert!(ty.needs_dtor);
            assert_eq!(ty.element_count, Some(4));
        });
    }

    #[test]
    fn test_vectors_and_strings() {
        with_cx(|cx| {
            let vector = compile_type(
                cx,
                &ir::Type::Vector {
                    element_type: Box::new(ir::Type::Primitive {
                        subtype: PrimitiveSubtype::Uint8,
                    }),
                    maybe_element_count: None,
                    nullable: true,
                },
            )
            .unwrap();
            assert_eq!(spell(&vector, Flavor::Natural), "::fidl::VectorPtr<uint8_t>");
            assert_eq!(spell(&vector, Flavor::Wire), "::fidl::VectorView<uint8_t>");
            assert_eq!(vector.family, Family::Vector);

            let string = compile_type(
                cx,
                &ir::Type::String {
                    maybe_element_count: Some(32),
                    nullable: false,
                },
            )
            .unwrap();
            assert_eq!(spell(&string, Flavor::Natural), "::std::string");
            assert_eq!(spell(&string, Flavor::Wire), "::fidl::StringView");
            assert_eq!(string.family, Family::String);
            assert!(!string.is_resource);
        });
    }

    #[test]
    fn test_handle_records_subtype() {
        with_cx(|cx| {
            let ty = compile_type(
                cx,
                &ir::Type::Handle {
                    subtype: HandleSubtype::Vmo,
                    nullable: false,
                },
            )
            .unwrap();
            assert_eq!(spell(&ty, Flavor::Wire), "::zx::vmo");
            assert!(ty.is_resource);
            assert!(cx.handle_types.contains("vmo"));
        });
    }

    #[test]
    fn test_protocol_endpoints() {
        with_cx(|cx| {
            let client = compile_type(cx, &ident("Spinner", false)).unwrap();
            assert_eq!(
                spell(&client, Flavor::Natural),
                "::fidl::InterfaceHandle<::acme_widgets::Spinner>"
            );
            assert_eq!(spell(&client, Flavor::Wire), "::fidl::ClientEnd<::acme_widgets::Spinner>");
            assert_eq!(client.kind, TypeKind::Protocol);
            assert!(client.is_resource);

            let server = compile_type(
                cx,
                &ir::Type::Request {
                    subtype: EncodedCompoundIdentifier::new("acme.widgets/Spinner"),
                    nullable: false,
                },
            )
            .unwrap();
            assert_eq!(spell(&server, Flavor::Wire), "::fidl::ServerEnd<::acme_widgets::Spinner>");
            assert_eq!(server.kind, TypeKind::Request);
        });
    }

    #[test]
    fn test_identifier_classification() {
        with_cx(|cx| {
            let color = compile_type(cx, &ident("Color", false)).unwrap();
            assert_eq!(color.family, Family::TrivialCopy);
            assert!(!color.needs_dtor);
            assert!(color.is_primitive_type());

            let flags = compile_type(cx, &ident("Flags", false)).unwrap();
            assert_eq!(flags.kind, TypeKind::Bits);
            assert!(!flags.needs_dtor);

            let max = compile_type(cx, &ident("MAX", false)).unwrap();
            assert_eq!(max.family, Family::Reference);
            assert!(!max.needs_dtor);

            let crate_ty = compile_type(cx, &ident("Crate", false)).unwrap();
            assert!(crate_ty.is_resource);
            assert!(crate_ty.needs_dtor);
            let gadget = compile_type(cx, &ident("Gadget", false)).unwrap();
            assert!(!gadget.is_resource);
            assert!(!gadget.wire_pointer);
        });
    }

    #[test]
    fn test_nullable_identifiers() {
        with_cx(|cx| {
            let gadget = compile_type(cx, &ident("Gadget", true)).unwrap();
            assert_eq!(
                spell(&gadget, Flavor::Natural),
                "::std::unique_ptr<::acme::widgets::Gadget>"
            );
            assert_eq!(
                spell(&gadget, Flavor::Unified),
                "::std::unique_ptr<::acme_widgets::Gadget>"
            );
            assert_eq!(
                spell(&gadget, Flavor::Wire),
                "::fidl::tracking_ptr<::acme_widgets::wire::Gadget>"
            );
            assert!(gadget.wire_pointer);

            let info = compile_type(cx, &ident("Info", true)).unwrap();
            assert!(info.wire_pointer);

            let shape = compile_type(cx, &ident("Shape", true)).unwrap();
            assert_eq!(spell(&shape, Flavor::Wire), "::acme_widgets::wire::Shape");
            assert!(!shape.wire_pointer);
            assert!(shape.needs_dtor);
        });
    }

    #[test]
    fn test_bad_identifiers() {
        with_cx(|cx| {
            assert!(matches!(
                compile_type(cx, &ident("Factory", false)),
                Err(Error::UnknownKind { .. })
            ));
            assert!(matches!(
                compile_type(cx, &ident("Nowhere", false)),
                Err(Error::UnresolvedReference { .. })
            ));
            assert!(matches!(
                compile_type(
                    cx,
                    &ir::Type::Request {
                        subtype: EncodedCompoundIdentifier::new("acme.widgets/Gadget"),
                        nullable: false,
                    }
                ),
                Err(Error::UnknownKind { .. })
            ));
        });
    }

    #[test]
    fn test_wire_argument_and_init() {
        let cx = RenderContext::for_flavor(Flavor::Wire);
        let int = compile_primitive(PrimitiveSubtype::Int32);
        assert_eq!(int.wire_argument_declaration("count", &cx).unwrap(), "int32_t count");
        assert_eq!(int.wire_init_message("count", &cx).unwrap(), "count(count)");

        with_cx(|compile_cx| {
            let string = compile_type(
                compile_cx,
                &ir::Type::String {
                    maybe_element_count: None,
                    nullable: false,
                },
            )
            .unwrap();
            assert_eq!(
                string.wire_argument_declaration("label", &cx).unwrap(),
                "const ::fidl::StringView& label"
            );

            let vector = compile_type(
                compile_cx,
                &ir::Type::Vector {
                    element_type: Box::new(ir::Type::Primitive {
                        subtype: PrimitiveSubtype::Uint8,
                    }),
                    maybe_element_count: None,
                    nullable: false,
                },
            )
            .unwrap();
            assert_eq!(
                vector.wire_init_message("data", &cx).unwrap(),
                "data(::fidl::unowned_ptr_t<uint8_t>(data.mutable_data()), data.count())"
            );

            let gadget = compile_type(compile_cx, &ident("Gadget", false)).unwrap();
            assert_eq!(
                gadget.wire_init_message("gadget", &cx).unwrap(),
                "gadget(std::move(gadget))"
            );
        });
    }
}
