//! Namespace policy for a library
//!
//! - Natural: `acme.widgets` becomes `::acme::widgets`, each part escaped.
//! - Unified: parts joined with `_` into `::acme_widgets`, escaped as a whole.
//! - Wire: the unified namespace plus `wire`, `::acme_widgets::wire`.

use super::namespace::Namespace;
use super::reserved::change_if_reserved;
use super::variants::{Flavor, RenderContext};
use crate::ir::LibraryIdentifier;
use crate::Result;

/// Whether reserved-word escaping applies to each library part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierTransform {
    /// Leave parts untouched
    KeepPartIfReserved,
    /// Escape each part
    ChangePartIfReserved,
}

/// Library parts with the given transform applied
pub fn library_parts(library: &LibraryIdentifier, transform: IdentifierTransform) -> Vec<String> {
    library
        .parts()
        .iter()
        .map(|part| match transform {
            IdentifierTransform::ChangePartIfReserved => change_if_reserved(part),
            IdentifierTransform::KeepPartIfReserved => part.clone(),
        })
        .collect()
}

/// Join library parts with `sep`, escaping the joined result
pub fn format_library(
    library: &LibraryIdentifier,
    sep: &str,
    transform: IdentifierTransform,
) -> String {
    change_if_reserved(&library_parts(library, transform).join(sep))
}

/// `acme_widgets`, used as a symbol prefix
pub fn format_library_prefix(library: &LibraryIdentifier) -> String {
    format_library(library, "_", IdentifierTransform::KeepPartIfReserved)
}

/// `acme/widgets`, used for header paths
pub fn format_library_path(library: &LibraryIdentifier) -> String {
    format_library(library, "/", IdentifierTransform::KeepPartIfReserved)
}

/// Natural namespace: one component per library part
pub fn natural_namespace(library: &LibraryIdentifier) -> Namespace {
    Namespace::from_parts(library_parts(
        library,
        IdentifierTransform::ChangePartIfReserved,
    ))
}

/// Unified namespace: a single underscore-joined component
pub fn unified_namespace(library: &LibraryIdentifier) -> Namespace {
    Namespace::from_parts(vec![format_library_prefix(library)])
}

/// Wire namespace: the unified namespace plus `wire`
pub fn wire_namespace(library: &LibraryIdentifier) -> Namespace {
    unified_namespace(library).append("wire")
}

/// The three namespaces of one library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryNamespaces {
    /// Natural namespace
    pub natural: Namespace,
    /// Unified namespace
    pub unified: Namespace,
    /// Wire namespace
    pub wire: Namespace,
}

impl LibraryNamespaces {
    /// Resolve all three namespaces
    pub fn for_library(library: &LibraryIdentifier) -> Self {
        Self {
            natural: natural_namespace(library),
            unified: unified_namespace(library),
            wire: wire_namespace(library),
        }
    }

    /// Namespace of one flavor
    pub fn get(&self, flavor: Flavor) -> &Namespace {
        match flavor {
            Flavor::Natural => &self.natural,
            Flavor::Unified => &self.unified,
            Flavor::Wire => &self.wire,
        }
    }

    /// Namespace of the selected flavor
    pub fn select(&self, cx: &RenderContext) -> Result<&Namespace> {
        let flavor = cx.require_flavor(|| {
            format!("{}/{}/{}", self.natural, self.unified, self.wire)
        })?;
        Ok(self.get(flavor))
    }
}
