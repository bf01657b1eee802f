//! Library root assembly

use super::context::CompileContext;
use super::decls::{Bits, Const, Enum, Service, Struct, Table, Union};
use super::protocol::Protocol;
use crate::ir::{self, DeclKind, EncodedCompoundIdentifier, LibraryIdentifier};
use crate::names::{change_if_reserved, format_library_path, LibraryNamespaces, NameVariants};
use std::collections::BTreeMap;

/// A compiled declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// A named constant
    Const(Const),
    /// A bit set over an unsigned integer
    Bits(Bits),
    /// An enumeration over an integer
    Enum(Enum),
    /// A struct, including anonymous request payloads
    Struct(Struct),
    /// A table with ordinal-keyed optional members
    Table(Table),
    /// A tagged union
    Union(Union),
    /// A protocol and its methods
    Protocol(Protocol),
    /// A service made of protocol members
    Service(Service),
}

impl Decl {
    /// Declaration kind
    pub fn kind(&self) -> DeclKind {
        match self {
            Decl::Const(_) => DeclKind::Const,
            Decl::Bits(_) => DeclKind::Bits,
            Decl::Enum(_) => DeclKind::Enum,
            Decl::Struct(_) => DeclKind::Struct,
            Decl::Table(_) => DeclKind::Table,
            Decl::Union(_) => DeclKind::Union,
            Decl::Protocol(_) => DeclKind::Protocol,
            Decl::Service(_) => DeclKind::Service,
        }
    }

    /// Names of the declaration
    pub fn names(&self) -> &NameVariants {
        match self {
            Decl::Const(d) => &d.names,
            Decl::Bits(d) => &d.names,
            Decl::Enum(d) => &d.names,
            Decl::Struct(d) => &d.names,
            Decl::Table(d) => &d.names,
            Decl::Union(d) => &d.names,
            Decl::Protocol(d) => &d.names,
            Decl::Service(d) => &d.names,
        }
    }
}

/// Everything the templates need to emit one library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    /// Library with each part escaped
    pub library: LibraryIdentifier,
    /// Escaped library, last part first
    pub library_reversed: LibraryIdentifier,
    /// Namespaces of the library in each flavor
    pub namespaces: LibraryNamespaces,
    /// Declarations in emission order
    pub decls: Vec<Decl>,
    /// Sorted handle subtypes the library references
    pub handle_types: Vec<String>,
    /// Dependency headers, `a/b/c`
    pub headers: Vec<String>,
}

impl Root {
    /// Protocols in emission order
    pub fn protocols(&self) -> impl Iterator<Item = &Protocol> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Protocol(p) => Some(p),
            _ => None,
        })
    }
}

/// Order compiled declarations and gather library-wide facts
pub(crate) fn assemble(
    mut cx: CompileContext<'_>,
    ir: &ir::Root,
    mut compiled: BTreeMap<EncodedCompoundIdentifier, Decl>,
) -> Root {
    let raw_library = ir.library();
    let library = raw_library.map_parts(change_if_reserved);

    let mut decls = Vec::with_capacity(compiled.len());
    for name in &ir.declaration_order {
        match compiled.remove(name) {
            Some(decl) => decls.push(decl),
            None => tracing::trace!("No compiled declaration for {}", name),
        }
    }
    if !compiled.is_empty() {
        tracing::warn!(
            "{} compiled declarations missing from the declaration order",
            compiled.len()
        );
    }

    let mut headers: Vec<String> = Vec::new();
    for dep in &ir.library_dependencies {
        if dep.name == ir.name {
            continue;
        }
        let header = format_library_path(&LibraryIdentifier::parse(&dep.name));
        if !headers.contains(&header) {
            headers.push(header);
        }
    }

    if !ir.protocol_declarations.is_empty() {
        cx.record_handle_type("channel");
    }

    Root {
        library_reversed: library.reversed(),
        library,
        namespaces: LibraryNamespaces::for_library(&raw_library),
        decls,
        handle_types: cx.handle_types.into_iter().collect(),
        headers,
    }
}
