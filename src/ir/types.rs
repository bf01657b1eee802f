//! Type nodes and wire-shape facts computed by the front end

use super::identifier::EncodedCompoundIdentifier;
use serde::{Deserialize, Serialize};

/// Primitive subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveSubtype {
    /// Boolean
    Bool,
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 8-bit integer
    Uint8,
    /// Unsigned 16-bit integer
    Uint16,
    /// Unsigned 32-bit integer
    Uint32,
    /// Unsigned 64-bit integer
    Uint64,
    /// Single precision float
    Float32,
    /// Double precision float
    Float64,
}

/// Kernel object types a handle may be constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum HandleSubtype {
    Handle,
    Bti,
    Channel,
    Clock,
    Debuglog,
    Event,
    Eventpair,
    Exception,
    Fifo,
    Guest,
    Interrupt,
    Iommu,
    Job,
    Msi,
    Pager,
    Pcidevice,
    Pmt,
    Port,
    Process,
    Profile,
    Resource,
    Socket,
    Stream,
    Suspendtoken,
    Thread,
    Timer,
    Vcpu,
    Vmar,
    Vmo,
}

impl HandleSubtype {
    /// Lowercase spelling, which is also the C++ class name in `::zx`
    pub fn as_str(&self) -> &'static str {
        match self {
            HandleSubtype::Handle => "handle",
            HandleSubtype::Bti => "bti",
            HandleSubtype::Channel => "channel",
            HandleSubtype::Clock => "clock",
            HandleSubtype::Debuglog => "debuglog",
            HandleSubtype::Event => "event",
            HandleSubtype::Eventpair => "eventpair",
            HandleSubtype::Exception => "exception",
            HandleSubtype::Fifo => "fifo",
            HandleSubtype::Guest => "guest",
            HandleSubtype::Interrupt => "interrupt",
            HandleSubtype::Iommu => "iommu",
            HandleSubtype::Job => "job",
            HandleSubtype::Msi => "msi",
            HandleSubtype::Pager => "pager",
            HandleSubtype::Pcidevice => "pcidevice",
            HandleSubtype::Pmt => "pmt",
            HandleSubtype::Port => "port",
            HandleSubtype::Process => "process",
            HandleSubtype::Profile => "profile",
            HandleSubtype::Resource => "resource",
            HandleSubtype::Socket => "socket",
            HandleSubtype::Stream => "stream",
            HandleSubtype::Suspendtoken => "suspendtoken",
            HandleSubtype::Thread => "thread",
            HandleSubtype::Timer => "timer",
            HandleSubtype::Vcpu => "vcpu",
            HandleSubtype::Vmar => "vmar",
            HandleSubtype::Vmo => "vmo",
        }
    }
}

/// A type reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// Fixed-size array
    Array {
        /// Element type
        element_type: Box<Type>,
        /// Number of elements
        element_count: u32,
    },
    /// Variable-length vector
    Vector {
        /// Element type
        element_type: Box<Type>,
        /// Optional upper bound on the element count
        #[serde(default)]
        maybe_element_count: Option<u32>,
        /// Whether absence is representable
        #[serde(default)]
        nullable: bool,
    },
    /// UTF-8 string
    String {
        /// Optional upper bound on the byte length
        #[serde(default)]
        maybe_element_count: Option<u32>,
        /// Whether absence is representable
        #[serde(default)]
        nullable: bool,
    },
    /// Kernel handle
    Handle {
        /// Object type
        subtype: HandleSubtype,
        /// Whether absence is representable
        #[serde(default)]
        nullable: bool,
    },
    /// Server endpoint of a protocol
    Request {
        /// Protocol served on the endpoint
        subtype: EncodedCompoundIdentifier,
        /// Whether absence is representable
        #[serde(default)]
        nullable: bool,
    },
    /// Primitive scalar
    Primitive {
        /// Which primitive
        subtype: PrimitiveSubtype,
    },
    /// Reference to another declaration
    Identifier {
        /// Referenced declaration
        identifier: EncodedCompoundIdentifier,
        /// Whether absence is representable
        #[serde(default)]
        nullable: bool,
    },
}

impl Type {
    /// Primitive subtype, when this is a primitive
    pub fn primitive_subtype(&self) -> Option<PrimitiveSubtype> {
        match self {
            Type::Primitive { subtype } => Some(*subtype),
            _ => None,
        }
    }

    /// Referenced declaration, when this is an identifier type
    pub fn identifier(&self) -> Option<&EncodedCompoundIdentifier> {
        match self {
            Type::Identifier { identifier, .. } => Some(identifier),
            _ => None,
        }
    }
}

/// Wire layout facts for a type or message, as computed by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeShape {
    /// Bytes in the inline (primary) object
    pub inline_size: u32,
    /// Alignment of the inline object
    pub alignment: u32,
    /// Nesting depth of out-of-line objects
    pub depth: u32,
    /// Maximum number of handles
    pub max_handles: u32,
    /// Maximum out-of-line bytes, saturated at `u32::MAX` when unbounded
    pub max_out_of_line: u32,
    /// Whether any padding bytes exist
    pub has_padding: bool,
    /// Whether a flexible envelope makes the size statically unbounded
    pub has_flexible_envelope: bool,
}

/// Placement of a member inside its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldShape {
    /// Byte offset inside the inline object
    pub offset: u32,
    /// Trailing padding bytes
    pub padding: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_deserialization() {
        let json = r#"{
            "kind": "vector",
            "element_type": { "kind": "handle", "subtype": "vmo" },
            "nullable": true
        }"#;
        let ty: Type = serde_json::from_str(json).unwrap();
        match ty {
            Type::Vector {
                element_type,
                maybe_element_count,
                nullable,
            } => {
                assert!(nullable);
                assert_eq!(maybe_element_count, None);
                assert!(matches!(
                    *element_type,
                    Type::Handle {
                        subtype: HandleSubtype::Vmo,
                        nullable: false
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = serde_json::from_str::<Type>(r#"{ "kind": "box" }"#).unwrap_err();
        assert!(err.to_string().contains("box"));
    }

    #[test]
    fn test_type_shape_defaults() {
        let shape: TypeShape = serde_json::from_str(r#"{ "inline_size": 24 }"#).unwrap();
        assert_eq!(shape.inline_size, 24);
        assert!(!shape.has_flexible_envelope);
    }
}
