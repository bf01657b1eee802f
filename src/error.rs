//! Error types for the bindings compiler
//!
//! The compiler consumes a pre-validated IR, so every error here is an
//! internal-consistency defect rather than a user mistake. None of them are
//! retried or downgraded: the first one aborts compilation of the library.

use thiserror::Error;

/// Bindings compiler errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Input errors
    /// The JSON IR could not be read or deserialized
    ///
    /// **Triggered by:** Malformed JSON, missing required fields, or a tagged
    /// node whose `kind` is outside the set this compiler understands (serde
    /// names the offending variant in the message).
    #[error("Invalid IR: {0}")]
    Ir(String),

    /// Reading the IR from disk failed
    #[error("I/O error: {0}")]
    Io(String),

    /// A compound identifier did not have the `library/Name` shape
    #[error("Malformed identifier: {identifier}")]
    MalformedIdentifier {
        /// The identifier as written in the IR
        identifier: String,
    },

    // Compilation errors
    /// A type or constant points at a declaration missing from the table
    ///
    /// **Triggered by:** An identifier type, identifier constant, request or
    /// service member naming a declaration that is neither in the library nor
    /// in any of its dependencies.
    #[error("Unresolved reference: {identifier}")]
    UnresolvedReference {
        /// The dangling identifier
        identifier: String,
    },

    /// A node carries a kind the compiler cannot handle in that position
    ///
    /// **Triggered by:** IR/compiler version mismatch, e.g. an identifier type
    /// that names a service declaration.
    #[error("Unknown {context} kind: {kind}")]
    UnknownKind {
        /// Where the kind was encountered
        context: String,
        /// The offending kind value
        kind: String,
    },

    /// A method with neither request nor response
    ///
    /// **Triggered by:** The front end emitting a method with
    /// `has_request == has_response == false`.
    #[error("Method {protocol}.{method} has neither a request nor a response")]
    EmptyMethod {
        /// Owning protocol
        protocol: String,
        /// Method name
        method: String,
    },

    // Rendering errors
    /// A name or constant was stringified before a flavor was selected
    ///
    /// **Triggered by:** Calling a render method with a default
    /// [`RenderContext`](crate::names::RenderContext).
    /// **Prevention:** Use `RenderContext::for_flavor`.
    #[error("No flavor selected while rendering {spellings}")]
    NoFlavorSelected {
        /// Every flavor spelling of the ambiguous value, separated by `/`
        spellings: String,
    },

    /// Further composition of an already-templated name
    ///
    /// **Triggered by:** `template`, `prepend_name` or `append_name` on a
    /// name whose last node is a template instantiation.
    #[error("Cannot {operation} a template: {name}")]
    TemplateComposition {
        /// The rejected operation
        operation: &'static str,
        /// The templated name
        name: String,
    },
}

impl Error {
    /// Create an unresolved reference error
    pub fn unresolved(identifier: impl Into<String>) -> Self {
        Error::UnresolvedReference {
            identifier: identifier.into(),
        }
    }

    /// Create an unknown kind error
    pub fn unknown_kind(context: impl Into<String>, kind: impl Into<String>) -> Self {
        Error::UnknownKind {
            context: context.into(),
            kind: kind.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Ir(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, Error>;
