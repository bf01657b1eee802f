//! # Bindings Compiler - JSON IR to C++ bindings IR
//!
//! This module turns a validated library description into the structured IR
//! the C++ templates consume. Each declaration is spelled for the Natural,
//! Unified and Wire bindings at once; picking one happens at render time.
//!
//! ## Architecture
//!
//! ```text
//! JSON IR → bindings filter → result pre-pass → decls → ordered Root
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use fidlgen_cpp::compiler::{Compiler, CompileOptions};
//! use fidlgen_cpp::ir;
//!
//! let ir = ir::Root::load("acme.widgets.fidl.json")?;
//! let compiler = Compiler::new(CompileOptions::default());
//! let root = compiler.compile(&ir)?;
//! println!("{} declarations", root.decls.len());
//! ```

pub mod constant;
pub mod context;
pub mod decls;
pub mod layout;
pub mod protocol;
pub mod result;
pub mod root;
pub mod types;

pub use constant::{quote_c_string, ConstantValue};
pub use context::CompileContext;
pub use decls::{
    Bits, BitsMember, Const, Enum, EnumMember, Service, ServiceMember, Struct, StructMember,
    Table, TableMember, Union, UnionMember,
};
pub use layout::{
    context_props, fidl_align, Boundedness, BufferStorage, CallContext, ContextProps, MessageBuffer,
    MessageLayout,
};
pub use protocol::{Method, MethodKind, Parameter, Protocol};
pub use result::MethodResult;
pub use root::{Decl, Root};
pub use types::{Family, Type, TypeKind};

use crate::{ir, Result};
use std::collections::BTreeMap;

/// Largest message a channel can carry, in bytes
pub const CHANNEL_MAX_MESSAGE_SIZE: u32 = 65536;

/// Largest message the wire bindings place on the stack, in bytes
pub const STACK_ALLOC_THRESHOLD: u32 = 512;

/// Size limits of the transport the bindings target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportLimits {
    /// Maximum message size in bytes
    pub max_message_size: u32,
    /// Messages at or below this size may be stack-allocated
    pub stack_alloc_threshold: u32,
    /// Symbolic spelling of `max_message_size` in generated code
    pub max_message_size_name: String,
}

impl TransportLimits {
    /// Limits of a Zircon channel
    pub fn channel() -> Self {
        Self {
            max_message_size: CHANNEL_MAX_MESSAGE_SIZE,
            stack_alloc_threshold: STACK_ALLOC_THRESHOLD,
            max_message_size_name: "ZX_CHANNEL_MAX_MSG_BYTES".to_string(),
        }
    }
}

impl Default for TransportLimits {
    fn default() -> Self {
        Self::channel()
    }
}

/// Compilation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Bindings name matched against `bindings_denylist` attributes
    pub binding: String,
    /// Transport size limits used for buffer decisions
    pub limits: TransportLimits,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            binding: "cpp".to_string(),
            limits: TransportLimits::channel(),
        }
    }
}

impl CompileOptions {
    /// Use a different bindings name for denylist filtering
    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = binding.into();
        self
    }

    /// Use different transport limits
    pub fn with_limits(mut self, limits: TransportLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Main compiler interface
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Create a new compiler with options
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// The options this compiler was created with
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Parse JSON IR and compile it
    pub fn compile_json(&self, json: &str) -> Result<Root> {
        let ir = ir::Root::from_json(json)?;
        self.compile(&ir)
    }

    /// Compile one library
    pub fn compile(&self, ir: &ir::Root) -> Result<Root> {
        let ir = ir.for_bindings(&self.options.binding);
        tracing::debug!("Compiling library {} for {}", ir.name, self.options.binding);

        let mut cx = CompileContext::new(&self.options, &ir);
        let mut compiled: BTreeMap<ir::EncodedCompoundIdentifier, Decl> = BTreeMap::new();

        for v in &ir.bits_declarations {
            compiled.insert(v.name.clone(), Decl::Bits(decls::compile_bits(&mut cx, v)?));
        }
        for v in &ir.const_declarations {
            compiled.insert(v.name.clone(), Decl::Const(decls::compile_const(&mut cx, v)?));
        }
        for v in &ir.enum_declarations {
            compiled.insert(v.name.clone(), Decl::Enum(decls::compile_enum(&mut cx, v)?));
        }

        // Unions register error-syntax results before structs and protocols look them up.
        result::register_results(&mut cx, &ir.union_declarations)?;
        for v in &ir.union_declarations {
            compiled.insert(v.name.clone(), Decl::Union(decls::compile_union(&mut cx, v)?));
        }

        for v in &ir.struct_declarations {
            if v.anonymous {
                tracing::trace!("Skipping anonymous struct {}", v.name);
                continue;
            }
            compiled.insert(v.name.clone(), Decl::Struct(decls::compile_struct(&mut cx, v)?));
        }
        for v in &ir.table_declarations {
            compiled.insert(v.name.clone(), Decl::Table(decls::compile_table(&mut cx, v)?));
        }
        for v in &ir.protocol_declarations {
            compiled.insert(
                v.name.clone(),
                Decl::Protocol(protocol::compile_protocol(&mut cx, v)?),
            );
        }
        for v in &ir.service_declarations {
            compiled.insert(v.name.clone(), Decl::Service(decls::compile_service(&mut cx, v)?));
        }

        let root = root::assemble(cx, &ir, compiled);
        tracing::debug!(
            "Compiled {}: {} declarations, {} handle types",
            ir.name,
            root.decls.len(),
            root.handle_types.len()
        );
        Ok(root)
    }
}
