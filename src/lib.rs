//! # fidlgen_cpp - C++ Bindings IR for FIDL Libraries
//!
//! [![License: MIT](https://img.shields.io/badge/License-MIT-yellow.svg)](https://opensource.org/licenses/MIT)
//!
//! Turns a validated FIDL library (the JSON IR emitted by the front end) into
//! the structured IR that C++ binding templates are rendered from. Three
//! binding flavors coexist and are produced from one compilation:
//!
//! - **Natural**: owning types such as `::std::vector` in `::acme::widgets`
//! - **Unified**: aliases of the natural types in `::acme_widgets`
//! - **Wire**: zero-copy views such as `::fidl::VectorView` in `::acme_widgets::wire`
//!
//! ## Features
//!
//! - Qualified-name algebra with nesting and templates, shared by all flavors
//! - Reserved-word escaping for C++ keywords and common C macros
//! - Type classification: family, resource-ness, destructor need
//! - Per-method buffer sizing and stack-vs-heap decisions for client and server
//! - Error-syntax result extraction for `-> (T) error E` methods
//! - Parallel rendering of all flavors into JSON manifests
//!
//! ## Quick Start
//!
//! ```ignore
//! use fidlgen_cpp::{compile_json, render::render_all};
//!
//! # fn main() -> fidlgen_cpp::Result<()> {
//! let json = std::fs::read_to_string("acme.widgets.fidl.json")?;
//! let root = compile_json(&json)?;
//! for manifest in render_all(&root)? {
//!     println!("{}: {} decls", manifest.flavor, manifest.decls.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Rendering
//!
//! Compiled values carry every flavor's spelling. Stringifying one requires an
//! explicit [`RenderContext`]; there is no global "current flavor":
//!
//! ```ignore
//! use fidlgen_cpp::{Flavor, RenderContext};
//!
//! let wire = RenderContext::for_flavor(Flavor::Wire);
//! let spelled = root.decls[0].names().render(&wire)?;
//! ```
//!
//! ## License
//!
//! Licensed under the [MIT License](https://opensource.org/licenses/MIT).

/// Version of the bindings compiler
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod compiler;
pub mod error;
pub mod ir;
pub mod names;
pub mod render;

// Re-export main types
pub use compiler::{CompileOptions, Compiler, Decl, Root, TransportLimits};
pub use error::{Error, Result};
pub use names::{Flavor, Name, NameVariants, Namespace, RenderContext};

/// Compile JSON IR with default options.
/// Convenience function for callers that do not need to configure the compiler.
pub fn compile_json(json: &str) -> Result<Root> {
    Compiler::new(CompileOptions::default()).compile_json(json)
}
