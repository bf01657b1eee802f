//! Protocols and methods

use super::context::{coding_table_name, CompileContext};
use super::layout::{
    context_props, Boundedness, CallContext, ContextProps, MessageBuffer, MessageLayout,
};
use super::result::MethodResult;
use super::types::{compile_type, Type};
use crate::ir::{self, Attributes};
use crate::names::{change_if_reserved, to_snake_case, Name, NameVariants};
use crate::{Error, Result};
use serde::Serialize;

/// Direction pattern of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Request without response
    OneWay,
    /// Request and response
    TwoWay,
    /// Response without request, initiated by the server
    Event,
}

impl MethodKind {
    /// Classify from the request/response flags. A method with neither has
    /// no kind.
    pub fn from_flags(has_request: bool, has_response: bool) -> Option<MethodKind> {
        match (has_request, has_response) {
            (true, true) => Some(MethodKind::TwoWay),
            (true, false) => Some(MethodKind::OneWay),
            (false, true) => Some(MethodKind::Event),
            (false, false) => None,
        }
    }

    /// Whether clients initiate the interaction
    pub fn is_client_initiated(&self) -> bool {
        matches!(self, MethodKind::OneWay | MethodKind::TwoWay)
    }
}

/// A request or response parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Escaped name
    pub name: String,
    /// Parameter type
    pub ty: Type,
    /// Offset in the message
    pub offset: u32,
}

/// A compiled method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Escaped method name
    pub name: String,
    /// Wire ordinal
    pub ordinal: u64,
    /// Direction pattern
    pub kind: MethodKind,
    /// Attributes
    pub attributes: Attributes,
    /// `get_widget` for `GetWidget`
    pub name_in_lower_snake_case: String,
    /// Ordinal constant, e.g. `kGadget_Spin_Ordinal`
    pub ordinal_name: String,
    /// Request parameters
    pub request: Vec<Parameter>,
    /// Response parameters
    pub response: Vec<Parameter>,
    /// Request wire facts
    pub request_layout: MessageLayout,
    /// Response wire facts
    pub response_layout: MessageLayout,
    /// Buffer for writing or reading the request
    pub request_buffer: MessageBuffer,
    /// Buffer for writing or reading the response
    pub response_buffer: MessageBuffer,
    /// Largest response a client accepts
    pub response_received_max_size: u32,
    /// Request coding table
    pub request_coding_table: NameVariants,
    /// Response coding table, or the event table for events
    pub response_coding_table: NameVariants,
    /// `<Method>Callback` when there is a response
    pub callback_type: Option<String>,
    /// `<Protocol>_<Method>_ResponseHandler`
    pub response_handler_type: String,
    /// `<Protocol>_<Method>_Responder`
    pub responder_type: String,
    /// Whether the request needs linearizing before sending
    pub linearize_request: bool,
    /// Whether the response needs linearizing before sending
    pub linearize_response: bool,
    /// Whether servers may leave the method unimplemented
    pub transitional: bool,
    /// Error-syntax split of the response
    pub result: Option<MethodResult>,
    /// Allocation on the client side
    pub client_context: ContextProps,
    /// Allocation on the server side
    pub server_context: ContextProps,
}

impl Method {
    /// Whether there is a request
    pub fn has_request(&self) -> bool {
        self.kind.is_client_initiated()
    }

    /// Whether there is a response
    pub fn has_response(&self) -> bool {
        matches!(self.kind, MethodKind::TwoWay | MethodKind::Event)
    }
}

/// A compiled protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    /// Protocol names, common to all flavors
    pub names: NameVariants,
    /// Attributes
    pub attributes: Attributes,
    /// `<Protocol>_clazz`
    pub class_name: String,
    /// Discoverable name, e.g. `acme.widgets.Gadget`
    pub service_name: Option<String>,
    /// `<Protocol>_Proxy`
    pub proxy_name: Name,
    /// `<Protocol>_Stub`
    pub stub_name: Name,
    /// `<Protocol>_EventSender`
    pub event_sender_name: Name,
    /// `<Protocol>_Sync`
    pub sync_name: Name,
    /// `<Protocol>_SyncProxy`
    pub sync_proxy_name: Name,
    /// `<Protocol>_RequestEncoder`
    pub request_encoder_name: Name,
    /// `<Protocol>_RequestDecoder`
    pub request_decoder_name: Name,
    /// `<Protocol>_ResponseEncoder`
    pub response_encoder_name: Name,
    /// `<Protocol>_ResponseDecoder`
    pub response_decoder_name: Name,
    /// Buffer large enough for any response of the protocol
    pub byte_buffer: MessageBuffer,
    /// Methods in declaration order
    pub methods: Vec<Method>,
    /// Identifier used by fuzzers, e.g. `acme_widgets_Gadget`
    pub fuzzing_name: String,
    /// `testing::<Protocol>_TestBase`
    pub test_base: NameVariants,
}

impl Protocol {
    fn methods_of(&self, kinds: &'static [MethodKind]) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(move |m| kinds.contains(&m.kind))
    }

    /// Fire-and-forget methods
    pub fn one_way_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods_of(&[MethodKind::OneWay])
    }

    /// Methods with request and response
    pub fn two_way_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods_of(&[MethodKind::TwoWay])
    }

    /// Methods initiated by clients
    pub fn client_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods_of(&[MethodKind::OneWay, MethodKind::TwoWay])
    }

    /// Methods initiated by servers
    pub fn events(&self) -> impl Iterator<Item = &Method> {
        self.methods_of(&[MethodKind::Event])
    }
}

/// `library.Name` for declarations marked discoverable
pub fn discoverable_name(name: &ir::EncodedCompoundIdentifier) -> Result<String> {
    let ci = name.parse()?;
    Ok(format!("{}.{}", ci.library, ci.name))
}

fn compile_parameters(
    cx: &mut CompileContext<'_>,
    params: &[ir::Parameter],
) -> Result<Vec<Parameter>> {
    params
        .iter()
        .map(|p| {
            Ok(Parameter {
                name: change_if_reserved(&p.name),
                ty: compile_type(cx, &p.ty)?,
                offset: p.field_shape_v1.offset,
            })
        })
        .collect()
}

struct CodingTables {
    base: NameVariants,
}

impl CodingTables {
    fn table(&self, method: &str, suffix: &str) -> Result<NameVariants> {
        self.base.append_name(&format!("{}{}", method, suffix))
    }
}

fn compile_method(
    cx: &mut CompileContext<'_>,
    protocol: &NameVariants,
    tables: &CodingTables,
    val: &ir::Method,
) -> Result<Method> {
    let kind = MethodKind::from_flags(val.has_request, val.has_response).ok_or_else(|| {
        Error::EmptyMethod {
            protocol: protocol.natural.self_name().to_string(),
            method: val.name.clone(),
        }
    })?;
    let name = change_if_reserved(&val.name);
    let request = compile_parameters(cx, val.request())?;
    let response = compile_parameters(cx, val.response())?;

    let result = if kind == MethodKind::TwoWay && val.response().len() == 1 {
        val.response()[0]
            .ty
            .identifier()
            .and_then(|id| cx.result_for_union.get(id).cloned())
    } else {
        None
    };

    let request_shape = val.request_shape();
    let response_shape = val.response_shape();
    let request_layout = MessageLayout::new(
        &request_shape,
        request.len(),
        request.iter().any(|p| p.ty.is_resource),
    );
    let response_layout = MessageLayout::new(
        &response_shape,
        response.len(),
        response.iter().any(|p| p.ty.is_resource),
    );

    let limits = &cx.options().limits;
    let request_buffer = request_layout.bounded_buffer(limits);
    let response_buffer = MessageBuffer::compute(
        response_layout.inline_size,
        response_layout.max_out_of_line,
        if response_layout.has_flexible_envelope {
            Boundedness::Unbounded
        } else {
            Boundedness::Bounded
        },
        limits,
    );
    let client_context =
        context_props(CallContext::Client, &request_layout, &response_layout, limits);
    let server_context =
        context_props(CallContext::Server, &request_layout, &response_layout, limits);

    let protocol_name = protocol.natural.self_name();
    let response_table_suffix = if val.has_request { "ResponseTable" } else { "EventTable" };

    Ok(Method {
        ordinal: val.ordinal,
        kind,
        attributes: val.attributes.clone(),
        name_in_lower_snake_case: to_snake_case(&name),
        ordinal_name: format!("k{}_{}_Ordinal", protocol_name, name),
        request_coding_table: tables.table(&val.name, "RequestTable")?,
        response_coding_table: tables.table(&val.name, response_table_suffix)?,
        callback_type: val
            .has_response
            .then(|| change_if_reserved(&format!("{}Callback", name))),
        response_handler_type: format!("{}_{}_ResponseHandler", protocol_name, name),
        responder_type: format!("{}_{}_Responder", protocol_name, name),
        linearize_request: !request.is_empty() && request_layout.has_indirection,
        linearize_response: !response.is_empty() && response_layout.has_indirection,
        transitional: val.is_transitional(),
        response_received_max_size: response_layout.received_max_size(),
        request_buffer,
        response_buffer,
        request_layout,
        response_layout,
        request,
        response,
        result,
        client_context,
        server_context,
        name,
    })
}

/// Compile a protocol and all its methods
pub fn compile_protocol(cx: &mut CompileContext<'_>, val: &ir::Protocol) -> Result<Protocol> {
    tracing::trace!("Compiling protocol {}", val.name);
    let names = cx.compile_name_variants(&val.name)?;
    let table_name = coding_table_name(&val.name)?;
    let tables = CodingTables {
        base: NameVariants {
            natural: names
                .natural
                .namespace()
                .append("_internal")
                .member(table_name.as_str()),
            unified: names
                .unified
                .namespace()
                .append("_internal")
                .member(table_name.as_str()),
            wire: names.wire.namespace().member(table_name),
        },
    };

    let mut methods = Vec::with_capacity(val.methods.len());
    let mut max_response_size = 0u32;
    for m in &val.methods {
        let method = compile_method(cx, &names, &tables, m)?;
        max_response_size = max_response_size.max(method.response_layout.raw_size());
        methods.push(method);
    }

    let natural_with = |suffix: &str| names.natural.append_name(suffix);
    let service_name = if val.attributes.has("discoverable") {
        Some(discoverable_name(&val.name)?)
    } else {
        None
    };

    Ok(Protocol {
        class_name: natural_with("_clazz")?.name(),
        proxy_name: natural_with("_Proxy")?,
        stub_name: natural_with("_Stub")?,
        event_sender_name: natural_with("_EventSender")?,
        sync_name: natural_with("_Sync")?,
        sync_proxy_name: natural_with("_SyncProxy")?,
        request_encoder_name: natural_with("_RequestEncoder")?,
        request_decoder_name: natural_with("_RequestDecoder")?,
        response_encoder_name: natural_with("_ResponseEncoder")?,
        response_decoder_name: natural_with("_ResponseDecoder")?,
        byte_buffer: MessageBuffer::compute(
            max_response_size,
            0,
            Boundedness::Bounded,
            &cx.options().limits,
        ),
        fuzzing_name: val.name.as_str().replace(['.', '/'], "_"),
        test_base: names.append_name("_TestBase")?.append_namespace("testing"),
        service_name,
        attributes: val.attributes.clone(),
        methods,
        names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::layout::BufferStorage;
    use crate::compiler::CompileOptions;
    use crate::names::{Flavor, RenderContext};

    fn protocol_ir(methods: &str) -> String {
        format!(
            r#"{{
                "name": "acme.widgets",
                "protocol_declarations": [
                    {{
                        "name": "acme.widgets/Gadget",
                        "attributes": [{{ "name": "Discoverable" }}],
                        "methods": {methods}
                    }}
                ],
                "declarations": {{ "acme.widgets/Gadget": "protocol" }}
            }}"#
        )
    }

    fn compile(methods: &str) -> Result<Protocol> {
        let options = CompileOptions::default();
        let root = ir::Root::from_json(&protocol_ir(methods)).unwrap();
        let mut cx = CompileContext::new(&options, &root);
        compile_protocol(&mut cx, &root.protocol_declarations[0])
    }

    #[test]
    fn test_method_kinds() {
        assert_eq!(MethodKind::from_flags(true, true), Some(MethodKind::TwoWay));
        assert_eq!(MethodKind::from_flags(true, false), Some(MethodKind::OneWay));
        assert_eq!(MethodKind::from_flags(false, true), Some(MethodKind::Event));
        assert_eq!(MethodKind::from_flags(false, false), None);
    }

    #[test]
    fn test_empty_method_rejected() {
        let err = compile(
            r#"[{ "ordinal": 1, "name": "Nothing", "has_request": false, "has_response": false }]"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::EmptyMethod {
                protocol: "Gadget".to_string(),
                method: "Nothing".to_string()
            }
        );
    }

    #[test]
    fn test_protocol_names() {
        let protocol = compile("[]").unwrap();
        let wire = RenderContext::for_flavor(Flavor::Wire);
        assert_eq!(protocol.names.render(&wire).unwrap(), "::acme_widgets::Gadget");
        assert_eq!(protocol.class_name, "Gadget_clazz");
        assert_eq!(protocol.proxy_name.to_string(), "::acme_widgets::Gadget_Proxy");
        assert_eq!(
            protocol.test_base.render(&wire).unwrap(),
            "::acme_widgets::testing::Gadget_TestBase"
        );
        assert_eq!(protocol.service_name.as_deref(), Some("acme.widgets.Gadget"));
        assert_eq!(protocol.fuzzing_name, "acme_widgets_Gadget");
    }

    #[test]
    fn test_method_derived_names_and_buffers() {
        let protocol = compile(
            r#"[
                {
                    "ordinal": 1, "name": "SpinFast",
                    "has_request": true,
                    "maybe_request": [
                        { "name": "rpm", "type": { "kind": "primitive", "subtype": "uint32" },
                          "field_shape_v1": { "offset": 16 } }
                    ],
                    "maybe_request_type_shape_v1": { "inline_size": 600 },
                    "has_response": true,
                    "maybe_response": [
                        { "name": "ok", "type": { "kind": "primitive", "subtype": "bool" } }
                    ],
                    "maybe_response_type_shape_v1": { "inline_size": 64, "has_flexible_envelope": true }
                },
                {
                    "ordinal": 2, "name": "OnStop",
                    "has_request": false,
                    "has_response": true,
                    "maybe_response": [],
                    "maybe_response_type_shape_v1": { "inline_size": 16 }
                }
            ]"#,
        )
        .unwrap();

        let spin = &protocol.methods[0];
        assert_eq!(spin.kind, MethodKind::TwoWay);
        assert_eq!(spin.name_in_lower_snake_case, "spin_fast");
        assert_eq!(spin.ordinal_name, "kGadget_SpinFast_Ordinal");
        assert_eq!(spin.callback_type.as_deref(), Some("SpinFastCallback"));
        assert_eq!(spin.response_handler_type, "Gadget_SpinFast_ResponseHandler");
        assert_eq!(spin.request[0].offset, 16);
        assert_eq!(spin.request_buffer.storage, BufferStorage::Boxed);
        assert_eq!(spin.request_buffer.size, 600);
        assert_eq!(spin.response_buffer.size_text, "ZX_CHANNEL_MAX_MSG_BYTES");
        assert_eq!(spin.response_received_max_size, u32::MAX);
        assert!(!spin.client_context.stack_alloc_request);
        assert!(!spin.client_context.stack_alloc_response);
        assert!(spin.server_context.stack_alloc_response);
        assert_eq!(spin.server_context.stack_use_response, 64);
        assert_eq!(
            spin.request_coding_table.natural.to_string(),
            "::acme_widgets::_internal::acme_widgets_GadgetSpinFastRequestTable"
        );
        assert_eq!(
            spin.request_coding_table.wire.to_string(),
            "::acme_widgets::acme_widgets_GadgetSpinFastRequestTable"
        );

        let stop = &protocol.methods[1];
        assert_eq!(stop.kind, MethodKind::Event);
        assert!(stop
            .response_coding_table
            .natural
            .self_name()
            .ends_with("OnStopEventTable"));

        assert_eq!(protocol.two_way_methods().count(), 1);
        assert_eq!(protocol.events().count(), 1);
        assert_eq!(protocol.client_methods().count(), 1);
        assert_eq!(protocol.one_way_methods().count(), 0);
        assert_eq!(protocol.byte_buffer.size, 64);
    }
}
