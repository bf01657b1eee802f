//! Per-library compilation state

use super::result::MethodResult;
use super::CompileOptions;
use crate::ir::{
    self, CompoundIdentifier, DeclInfo, DeclInfoMap, DeclKind, EncodedCompoundIdentifier,
    LibraryIdentifier,
};
use crate::names::{
    change_if_reserved, format_library_prefix, LibraryNamespaces, NameVariants,
};
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// State shared by every declaration compiled for one library.
///
/// Created once per [`Compiler::compile`](super::Compiler::compile) call and
/// consumed by the root assembler.
pub struct CompileContext<'a> {
    options: &'a CompileOptions,
    library: LibraryIdentifier,
    symbol_prefix: String,
    decls: DeclInfoMap,
    structs: BTreeMap<EncodedCompoundIdentifier, &'a ir::Struct>,
    namespaces: BTreeMap<LibraryIdentifier, LibraryNamespaces>,
    pub(crate) handle_types: BTreeSet<String>,
    pub(crate) result_for_union: BTreeMap<EncodedCompoundIdentifier, MethodResult>,
    pub(crate) result_for_struct: BTreeMap<EncodedCompoundIdentifier, MethodResult>,
}

impl<'a> CompileContext<'a> {
    /// Set up the context for `root`
    pub fn new(options: &'a CompileOptions, root: &'a ir::Root) -> Self {
        let library = root.library();
        Self {
            options,
            symbol_prefix: format_library_prefix(&library),
            library,
            decls: root.decls_with_dependencies(),
            structs: root
                .struct_declarations
                .iter()
                .map(|s| (s.name.clone(), s))
                .collect(),
            namespaces: BTreeMap::new(),
            handle_types: BTreeSet::new(),
            result_for_union: BTreeMap::new(),
            result_for_struct: BTreeMap::new(),
        }
    }

    /// Compilation options
    pub fn options(&self) -> &CompileOptions {
        self.options
    }

    /// The library being compiled, unescaped
    pub fn library(&self) -> &LibraryIdentifier {
        &self.library
    }

    /// Every declaration visible to the library
    pub fn decls(&self) -> &DeclInfoMap {
        &self.decls
    }

    /// Look up a declaration
    pub fn decl_info(&self, eci: &EncodedCompoundIdentifier) -> Result<DeclInfo> {
        self.decls
            .get(eci)
            .copied()
            .ok_or_else(|| Error::unresolved(eci.as_str()))
    }

    /// A struct declared by this library
    pub fn local_struct(&self, eci: &EncodedCompoundIdentifier) -> Option<&'a ir::Struct> {
        self.structs.get(eci).copied()
    }

    /// Whether `ci` belongs to a library other than this one
    pub fn is_in_external_library(&self, ci: &CompoundIdentifier) -> bool {
        ci.library != self.library
    }

    /// Record a handle subtype referenced by the library
    pub fn record_handle_type(&mut self, subtype: &str) {
        self.handle_types.insert(subtype.to_string());
    }

    fn namespaces_for(&mut self, library: &LibraryIdentifier) -> &LibraryNamespaces {
        self.namespaces
            .entry(library.clone())
            .or_insert_with(|| LibraryNamespaces::for_library(library))
    }

    /// Per-flavor names of a declaration.
    ///
    /// Data declarations live in each flavor's own namespace. Protocols and
    /// services use the unified namespace for every flavor.
    pub fn compile_name_variants(
        &mut self,
        eci: &EncodedCompoundIdentifier,
    ) -> Result<NameVariants> {
        let ci = eci.parse()?;
        if ci.member.is_some() {
            return Err(Error::MalformedIdentifier {
                identifier: eci.to_string(),
            });
        }
        let info = self.decl_info(eci)?;
        let name = change_if_reserved(&ci.name);
        let ns = self.namespaces_for(&ci.library);
        Ok(match info.kind {
            DeclKind::Const
            | DeclKind::Bits
            | DeclKind::Enum
            | DeclKind::Struct
            | DeclKind::Table
            | DeclKind::Union => NameVariants {
                natural: ns.natural.member(name.as_str()),
                unified: ns.unified.member(name.as_str()),
                wire: ns.wire.member(name),
            },
            DeclKind::Protocol | DeclKind::Service => NameVariants::common(ns.unified.member(name)),
        })
    }

    /// Symbol of the coding table generated for a local declaration,
    /// e.g. `acme_widgets_GadgetTable`
    pub fn coding_table_type(&self, eci: &EncodedCompoundIdentifier) -> Result<String> {
        let ci = eci.parse()?;
        if self.is_in_external_library(&ci) {
            return Err(Error::unknown_kind("coding table", eci.as_str()));
        }
        Ok(format!("{}_{}Table", self.symbol_prefix, ci.name))
    }
}

/// Base name for a declaration's coding tables, e.g. `acme_widgets_Gadget`
pub fn coding_table_name(eci: &EncodedCompoundIdentifier) -> Result<String> {
    let ci = eci.parse()?;
    Ok(format!(
        "{}_{}{}",
        format_library_prefix(&ci.library),
        ci.name,
        ci.member.unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> ir::Root {
        ir::Root::from_json(
            r#"{
                "name": "acme.widgets",
                "declarations": {
                    "acme.widgets/Gadget": "struct",
                    "acme.widgets/class": "struct",
                    "acme.widgets/Spinner": "protocol"
                },
                "library_dependencies": [
                    {
                        "name": "acme.base",
                        "declarations": { "acme.base/Id": { "kind": "struct" } }
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_struct_names_per_flavor() {
        let options = CompileOptions::default();
        let root = root();
        let mut cx = CompileContext::new(&options, &root);
        let names = cx
            .compile_name_variants(&EncodedCompoundIdentifier::new("acme.widgets/Gadget"))
            .unwrap();
        assert_eq!(names.natural.to_string(), "::acme::widgets::Gadget");
        assert_eq!(names.unified.to_string(), "::acme_widgets::Gadget");
        assert_eq!(names.wire.to_string(), "::acme_widgets::wire::Gadget");
    }

    #[test]
    fn test_reserved_decl_name_is_escaped() {
        let options = CompileOptions::default();
        let root = root();
        let mut cx = CompileContext::new(&options, &root);
        let names = cx
            .compile_name_variants(&EncodedCompoundIdentifier::new("acme.widgets/class"))
            .unwrap();
        assert_eq!(names.wire.self_name(), "class_");
    }

    #[test]
    fn test_protocol_names_are_common() {
        let options = CompileOptions::default();
        let root = root();
        let mut cx = CompileContext::new(&options, &root);
        let names = cx
            .compile_name_variants(&EncodedCompoundIdentifier::new("acme.widgets/Spinner"))
            .unwrap();
        assert_eq!(names.natural, names.wire);
        assert_eq!(names.natural.to_string(), "::acme_widgets::Spinner");
    }

    #[test]
    fn test_unresolved_and_external() {
        let options = CompileOptions::default();
        let root = root();
        let mut cx = CompileContext::new(&options, &root);
        assert!(matches!(
            cx.compile_name_variants(&EncodedCompoundIdentifier::new("acme.widgets/Missing")),
            Err(Error::UnresolvedReference { .. })
        ));
        let id = EncodedCompoundIdentifier::new("acme.base/Id");
        assert!(cx.compile_name_variants(&id).is_ok());
        assert!(cx.coding_table_type(&id).is_err());
        assert_eq!(
            cx.coding_table_type(&EncodedCompoundIdentifier::new("acme.widgets/Gadget"))
                .unwrap(),
            "acme_widgets_GadgetTable"
        );
    }

    #[test]
    fn test_coding_table_name() {
        let name =
            coding_table_name(&EncodedCompoundIdentifier::new("acme.widgets/Spinner")).unwrap();
        assert_eq!(name, "acme_widgets_Spinner");
    }
}
