//! # JSON IR
//!
//! The resolved, validated library description produced by the front end.
//! Everything here is trusted: the compiler reads wire-shape facts verbatim
//! and never recomputes them.
//!
//! ## Format
//! ```json
//! {
//!   "name": "acme.widgets",
//!   "struct_declarations": [...],
//!   "protocol_declarations": [...],
//!   "declarations": { "acme.widgets/Gadget": "struct" },
//!   "declaration_order": ["acme.widgets/Gadget"],
//!   "library_dependencies": [
//!     { "name": "acme.base", "declarations": { "acme.base/Id": { "kind": "struct" } } }
//!   ]
//! }
//! ```

pub mod constant;
pub mod decls;
pub mod identifier;
pub mod types;

pub use constant::{Constant, Literal};
pub use decls::{
    Attribute, Attributes, Bits, BitsMember, Const, Enum, EnumMember, Method, OrdinalMember,
    Parameter, Protocol, Service, ServiceMember, Struct, StructMember, Table, Union,
};
pub use identifier::{CompoundIdentifier, EncodedCompoundIdentifier, LibraryIdentifier};
pub use types::{FieldShape, HandleSubtype, PrimitiveSubtype, Type, TypeShape};

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Declaration kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// `const`
    Const,
    /// `bits`
    Bits,
    /// `enum`
    Enum,
    /// `struct`
    Struct,
    /// `table`
    Table,
    /// `union`
    Union,
    /// `protocol`
    #[serde(alias = "interface")]
    Protocol,
    /// `service`
    Service,
}

impl DeclKind {
    /// Lowercase keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Const => "const",
            DeclKind::Bits => "bits",
            DeclKind::Enum => "enum",
            DeclKind::Struct => "struct",
            DeclKind::Table => "table",
            DeclKind::Union => "union",
            DeclKind::Protocol => "protocol",
            DeclKind::Service => "service",
        }
    }
}

/// What the compiler needs to know about any referenced declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclInfo {
    /// Declaration kind
    pub kind: DeclKind,
    /// Resource-ness, meaningful for structs, tables and unions
    #[serde(default)]
    pub resource: bool,
}

/// Declaration table keyed by identifier
pub type DeclInfoMap = BTreeMap<EncodedCompoundIdentifier, DeclInfo>;

/// A library this one depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    /// Dotted library name
    pub name: String,
    /// Declarations the dependency exports
    #[serde(default)]
    pub declarations: DeclInfoMap,
}

/// Root of the JSON IR for one library
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Root {
    /// Dotted library name
    pub name: String,
    /// `bits` declarations
    pub bits_declarations: Vec<Bits>,
    /// `const` declarations
    pub const_declarations: Vec<Const>,
    /// `enum` declarations
    pub enum_declarations: Vec<Enum>,
    /// `struct` declarations, including anonymous payloads
    pub struct_declarations: Vec<Struct>,
    /// `table` declarations
    pub table_declarations: Vec<Table>,
    /// `union` declarations
    pub union_declarations: Vec<Union>,
    /// `protocol` declarations
    #[serde(alias = "interface_declarations")]
    pub protocol_declarations: Vec<Protocol>,
    /// `service` declarations
    pub service_declarations: Vec<Service>,
    /// Kinds of this library's declarations
    pub declarations: BTreeMap<EncodedCompoundIdentifier, DeclKind>,
    /// Topological order in which declarations must be emitted
    pub declaration_order: Vec<EncodedCompoundIdentifier>,
    /// Direct and transitive dependencies
    pub library_dependencies: Vec<Library>,
}

impl Root {
    /// Parse the JSON IR
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse the JSON IR from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The library identifier
    pub fn library(&self) -> LibraryIdentifier {
        LibraryIdentifier::parse(&self.name)
    }

    /// Every declaration visible to this library: its own (with resource-ness
    /// taken from the declarations themselves) and its dependencies'.
    pub fn decls_with_dependencies(&self) -> DeclInfoMap {
        let mut resource: BTreeMap<&EncodedCompoundIdentifier, bool> = BTreeMap::new();
        for s in &self.struct_declarations {
            resource.insert(&s.name, s.resource);
        }
        for t in &self.table_declarations {
            resource.insert(&t.name, t.resource);
        }
        for u in &self.union_declarations {
            resource.insert(&u.name, u.resource);
        }

        let mut decls = DeclInfoMap::new();
        for library in &self.library_dependencies {
            for (name, info) in &library.declarations {
                decls.insert(name.clone(), *info);
            }
        }
        for (name, kind) in &self.declarations {
            decls.insert(
                name.clone(),
                DeclInfo {
                    kind: *kind,
                    resource: resource.get(name).copied().unwrap_or(false),
                },
            );
        }
        decls
    }

    /// Copy of the IR without declarations whose `bindings_denylist`
    /// attribute names `binding`.
    pub fn for_bindings(&self, binding: &str) -> Root {
        let allowed = |attrs: &Attributes, name: &EncodedCompoundIdentifier| {
            let denied = attrs.denies_binding(binding);
            if denied {
                tracing::debug!("Dropping {} (denylisted for {})", name, binding);
            }
            !denied
        };

        let mut root = self.clone();
        root.bits_declarations.retain(|d| allowed(&d.attributes, &d.name));
        root.const_declarations.retain(|d| allowed(&d.attributes, &d.name));
        root.enum_declarations.retain(|d| allowed(&d.attributes, &d.name));
        root.struct_declarations.retain(|d| allowed(&d.attributes, &d.name));
        root.table_declarations.retain(|d| allowed(&d.attributes, &d.name));
        root.union_declarations.retain(|d| allowed(&d.attributes, &d.name));
        root.protocol_declarations.retain(|d| allowed(&d.attributes, &d.name));
        root.service_declarations.retain(|d| allowed(&d.attributes, &d.name));
        root
    }
}
