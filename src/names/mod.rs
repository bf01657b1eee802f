//! # C++ Name Algebra
//!
//! Every generated symbol is spelled through the types in this module so that
//! the Natural, Unified and Wire bindings stay consistent with each other.
//!
//! ## Usage
//! ```ignore
//! use fidlgen_cpp::names::{Flavor, LibraryNamespaces, NameVariants, RenderContext};
//! use fidlgen_cpp::ir::LibraryIdentifier;
//!
//! let ns = LibraryNamespaces::for_library(&LibraryIdentifier::parse("acme.widgets"));
//! let gadget = NameVariants {
//!     natural: ns.natural.member("Gadget"),
//!     unified: ns.unified.member("Gadget"),
//!     wire: ns.wire.member("Gadget"),
//! };
//! let cx = RenderContext::for_flavor(Flavor::Wire);
//! assert_eq!(gadget.render(&cx)?, "::acme_widgets::wire::Gadget");
//! ```

pub mod case;
pub mod library;
pub mod name;
pub mod namespace;
pub mod reserved;
pub mod variants;

pub use case::{to_snake_case, to_upper_camel_case};
pub use library::{
    format_library, format_library_path, format_library_prefix, natural_namespace,
    unified_namespace, wire_namespace, IdentifierTransform, LibraryNamespaces,
};
pub use name::{Name, NamePart};
pub use namespace::Namespace;
pub use reserved::{change_if_reserved, is_reserved, reserved_words};
pub use variants::{Flavor, NameVariants, RenderContext};
