//! # Flavor Rendering
//!
//! Stringifies a compiled [`Root`] for one flavor into a serializable
//! manifest. The template stage reads these manifests as JSON.
//!
//! ## Usage
//! ```ignore
//! use fidlgen_cpp::render::{render_all, to_json};
//!
//! for manifest in render_all(&root)? {
//!     std::fs::write(format!("{}.json", manifest.flavor), to_json(&manifest)?)?;
//! }
//! ```

use crate::compiler::{
    ContextProps, Decl, MessageLayout, Method, MethodKind, Parameter, Protocol, Root, Type,
};
use crate::ir::DeclKind;
use crate::names::{Flavor, RenderContext};
use crate::Result;
use rayon::prelude::*;
use serde::Serialize;

/// A library rendered for one flavor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRoot {
    /// The flavor
    pub flavor: Flavor,
    /// Dotted, escaped library name
    pub library: String,
    /// Library namespace in this flavor
    pub namespace: String,
    /// Sorted handle subtypes
    pub handle_types: Vec<String>,
    /// Dependency headers
    pub headers: Vec<String>,
    /// Declarations in emission order
    pub decls: Vec<RenderedDecl>,
}

/// A declaration rendered for one flavor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDecl {
    /// Declaration kind
    pub kind: DeclKind,
    /// Fully qualified name
    pub name: String,
    /// Unqualified name
    pub self_name: String,
    /// Underlying or declared type, for consts, bits and enums
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// Value of consts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether the declaration may carry handles
    pub is_resource: bool,
    /// Members of data declarations and services
    pub members: Vec<RenderedMember>,
    /// Methods of protocols
    pub methods: Vec<RenderedMethod>,
    /// Buffer type large enough for any message of a protocol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_buffer: Option<String>,
}

/// A member or parameter rendered for one flavor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMember {
    /// Escaped name
    pub name: String,
    /// Type spelling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// Value or default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Ordinal of table and union members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u64>,
    /// Byte offset of struct members and parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Raw size, handle and flag metrics of one message direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderedLayout {
    /// Inline bytes, including the header
    pub inline_size: u32,
    /// Worst-case out-of-line bytes
    pub max_out_of_line: u32,
    /// Worst-case handle count
    pub max_handles: u32,
    /// Whether the encoding contains padding
    pub has_padding: bool,
    /// Whether the message contains a flexible envelope
    pub has_flexible_envelope: bool,
    /// Whether the message has no parameters
    pub is_empty: bool,
}

impl From<&MessageLayout> for RenderedLayout {
    fn from(layout: &MessageLayout) -> Self {
        Self {
            inline_size: layout.inline_size,
            max_out_of_line: layout.max_out_of_line,
            max_handles: layout.max_handles,
            has_padding: layout.has_padding,
            has_flexible_envelope: layout.has_flexible_envelope,
            is_empty: layout.is_empty,
        }
    }
}

/// A method rendered for one flavor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMethod {
    /// Escaped name
    pub name: String,
    /// Wire ordinal
    pub ordinal: u64,
    /// Ordinal constant
    pub ordinal_name: String,
    /// Direction pattern
    pub kind: MethodKind,
    /// Request parameters
    pub request: Vec<RenderedMember>,
    /// Response parameters
    pub response: Vec<RenderedMember>,
    /// Request metrics
    pub request_layout: RenderedLayout,
    /// Response metrics
    pub response_layout: RenderedLayout,
    /// Whether the request must be linearized before encoding
    pub linearize_request: bool,
    /// Whether the response must be linearized before encoding
    pub linearize_response: bool,
    /// Request buffer type
    pub request_buffer: String,
    /// Response buffer type
    pub response_buffer: String,
    /// Largest response a client accepts
    pub response_received_max_size: u32,
    /// Client side allocation
    pub client_context: ContextProps,
    /// Server side allocation
    pub server_context: ContextProps,
    /// Value type of error-syntax methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_value: Option<String>,
    /// Error type of error-syntax methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_error: Option<String>,
}

fn typed(name: &str, ty: &Type, cx: &RenderContext) -> Result<RenderedMember> {
    Ok(RenderedMember {
        name: name.to_string(),
        ty: Some(ty.render(cx)?),
        value: None,
        ordinal: None,
        offset: None,
    })
}

fn render_parameter(p: &Parameter, cx: &RenderContext) -> Result<RenderedMember> {
    Ok(RenderedMember {
        offset: Some(p.offset),
        ..typed(&p.name, &p.ty, cx)?
    })
}

fn render_method(m: &Method, cx: &RenderContext) -> Result<RenderedMethod> {
    let params = |ps: &[Parameter]| -> Result<Vec<RenderedMember>> {
        ps.iter().map(|p| render_parameter(p, cx)).collect()
    };
    let (result_value, result_error) = match &m.result {
        Some(result) => (
            Some(result.value_decl.render(cx)?),
            Some(result.error_decl.render(cx)?),
        ),
        None => (None, None),
    };
    Ok(RenderedMethod {
        name: m.name.clone(),
        ordinal: m.ordinal,
        ordinal_name: m.ordinal_name.clone(),
        kind: m.kind,
        request: params(&m.request)?,
        response: params(&m.response)?,
        request_layout: RenderedLayout::from(&m.request_layout),
        response_layout: RenderedLayout::from(&m.response_layout),
        linearize_request: m.linearize_request,
        linearize_response: m.linearize_response,
        request_buffer: m.request_buffer.type_name(),
        response_buffer: m.response_buffer.type_name(),
        response_received_max_size: m.response_received_max_size,
        client_context: m.client_context,
        server_context: m.server_context,
        result_value,
        result_error,
    })
}

fn render_protocol(p: &Protocol, cx: &RenderContext) -> Result<Vec<RenderedMethod>> {
    p.methods.iter().map(|m| render_method(m, cx)).collect()
}

fn render_decl(decl: &Decl, cx: &RenderContext) -> Result<RenderedDecl> {
    let names = decl.names();
    let mut rendered = RenderedDecl {
        kind: decl.kind(),
        name: names.render(cx)?,
        self_name: names.self_name(cx)?,
        ty: None,
        value: None,
        is_resource: false,
        members: Vec::new(),
        methods: Vec::new(),
        byte_buffer: None,
    };
    match decl {
        Decl::Const(c) => {
            rendered.ty = Some(c.ty.render(cx)?);
            rendered.value = Some(c.value.render(cx)?);
        }
        Decl::Bits(b) => {
            rendered.ty = Some(b.ty.render(cx)?);
            rendered.value = Some(b.mask.clone());
            for m in &b.members {
                rendered.members.push(RenderedMember {
                    name: m.name.clone(),
                    ty: None,
                    value: Some(m.value.render(cx)?),
                    ordinal: None,
                    offset: None,
                });
            }
        }
        Decl::Enum(e) => {
            rendered.ty = Some(e.ty.render(cx)?);
            for m in &e.members {
                rendered.members.push(RenderedMember {
                    name: m.name.clone(),
                    ty: None,
                    value: Some(m.value.render(cx)?),
                    ordinal: None,
                    offset: None,
                });
            }
        }
        Decl::Struct(s) => {
            rendered.is_resource = s.is_resource;
            for m in &s.members {
                let value = if m.default_value.is_set() {
                    Some(m.default_value.render(cx)?)
                } else {
                    None
                };
                rendered.members.push(RenderedMember {
                    value,
                    offset: Some(m.offset),
                    ..typed(&m.name, &m.ty, cx)?
                });
            }
        }
        Decl::Table(t) => {
            rendered.is_resource = t.is_resource;
            for m in &t.members {
                rendered.members.push(RenderedMember {
                    ordinal: Some(m.ordinal),
                    ..typed(&m.name, &m.ty, cx)?
                });
            }
        }
        Decl::Union(u) => {
            rendered.is_resource = u.is_resource;
            for m in &u.members {
                rendered.members.push(RenderedMember {
                    ordinal: Some(m.ordinal),
                    ..typed(&m.name, &m.ty, cx)?
                });
            }
        }
        Decl::Protocol(p) => {
            rendered.methods = render_protocol(p, cx)?;
            rendered.byte_buffer = Some(p.byte_buffer.type_name());
        }
        Decl::Service(s) => {
            for m in &s.members {
                rendered.members.push(RenderedMember {
                    name: m.method_name.clone(),
                    ty: Some(m.protocol_type.render(cx)?),
                    value: None,
                    ordinal: None,
                    offset: None,
                });
            }
        }
    }
    Ok(rendered)
}

/// Render `root` for one flavor
pub fn render_root(root: &Root, flavor: Flavor) -> Result<RenderedRoot> {
    let cx = RenderContext::for_flavor(flavor);
    let decls = root
        .decls
        .iter()
        .map(|d| render_decl(d, &cx))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!("Rendered {} declarations for {}", decls.len(), flavor);
    Ok(RenderedRoot {
        flavor,
        library: root.library.to_string(),
        namespace: root.namespaces.select(&cx)?.to_string(),
        handle_types: root.handle_types.clone(),
        headers: root.headers.clone(),
        decls,
    })
}

/// Render every flavor in parallel, in [`Flavor::ALL`] order
pub fn render_all(root: &Root) -> Result<Vec<RenderedRoot>> {
    Flavor::ALL
        .par_iter()
        .map(|flavor| render_root(root, *flavor))
        .collect()
}

/// Serialize a manifest as pretty-printed JSON
pub fn to_json(rendered: &RenderedRoot) -> Result<String> {
    Ok(serde_json::to_string_pretty(rendered)?)
}

