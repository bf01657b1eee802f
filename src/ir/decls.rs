//! Declarations as delivered by the front end

use super::constant::Constant;
use super::identifier::EncodedCompoundIdentifier;
use super::types::{FieldShape, PrimitiveSubtype, Type, TypeShape};
use serde::{Deserialize, Serialize};

/// A single `@name("value")` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Attribute argument, empty when absent
    #[serde(default)]
    pub value: String,
}

/// Attribute list attached to a declaration or member
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(pub Vec<Attribute>);

impl Attributes {
    /// Look up an attribute by name, ignoring case and underscores
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        let wanted = canonical_attribute_name(name);
        self.0
            .iter()
            .find(|a| canonical_attribute_name(&a.name) == wanted)
    }

    /// Whether the attribute is present
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Documentation lines from `doc` attributes
    pub fn doc_comments(&self) -> Vec<String> {
        let wanted = canonical_attribute_name("doc");
        self.0
            .iter()
            .filter(|a| canonical_attribute_name(&a.name) == wanted)
            .flat_map(|a| a.value.lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    /// Whether `bindings_denylist` names the given binding
    pub fn denies_binding(&self, binding: &str) -> bool {
        self.get("bindings_denylist")
            .map(|a| a.value.split(',').any(|b| b.trim() == binding))
            .unwrap_or(false)
    }
}

fn canonical_attribute_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// `const` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Const {
    /// Declaration name
    pub name: EncodedCompoundIdentifier,
    /// Declared type
    #[serde(rename = "type")]
    pub ty: Type,
    /// Value expression
    pub value: Constant,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// Member of a `bits` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitsMember {
    /// Member name
    pub name: String,
    /// Member value
    pub value: Constant,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// `bits` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bits {
    /// Declaration name
    pub name: EncodedCompoundIdentifier,
    /// Underlying primitive type
    #[serde(rename = "type")]
    pub ty: Type,
    /// Union of all member values, as a decimal string
    pub mask: String,
    /// Members
    pub members: Vec<BitsMember>,
    /// Strictness
    #[serde(default)]
    pub strict: bool,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// Member of an `enum` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    /// Member name
    pub name: String,
    /// Member value
    pub value: Constant,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// `enum` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    /// Declaration name
    pub name: EncodedCompoundIdentifier,
    /// Underlying primitive type
    #[serde(rename = "type")]
    pub ty: PrimitiveSubtype,
    /// Members
    pub members: Vec<EnumMember>,
    /// Strictness
    #[serde(default)]
    pub strict: bool,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// Member of a `struct` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructMember {
    /// Member name
    pub name: String,
    /// Member type
    #[serde(rename = "type")]
    pub ty: Type,
    /// Default value, if declared
    #[serde(default)]
    pub maybe_default_value: Option<Constant>,
    /// Placement
    #[serde(default)]
    pub field_shape_v1: FieldShape,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// `struct` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    /// Declaration name
    pub name: EncodedCompoundIdentifier,
    /// Members
    pub members: Vec<StructMember>,
    /// Synthesized request/response payloads are anonymous
    #[serde(default)]
    pub anonymous: bool,
    /// Whether the struct transitively holds handles or endpoints
    #[serde(default)]
    pub resource: bool,
    /// Wire shape
    #[serde(default)]
    pub type_shape_v1: TypeShape,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// Member of a `table` or `union` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalMember {
    /// Ordinal, starting at 1
    pub ordinal: u64,
    /// Reserved slots carry no name or type
    #[serde(default)]
    pub reserved: bool,
    /// Member name
    #[serde(default)]
    pub name: Option<String>,
    /// Member type
    #[serde(default, rename = "type")]
    pub ty: Option<Type>,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// `table` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Declaration name
    pub name: EncodedCompoundIdentifier,
    /// Members, including reserved slots
    pub members: Vec<OrdinalMember>,
    /// Whether the table transitively holds handles or endpoints
    #[serde(default)]
    pub resource: bool,
    /// Wire shape
    #[serde(default)]
    pub type_shape_v1: TypeShape,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// `union` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    /// Declaration name
    pub name: EncodedCompoundIdentifier,
    /// Members, including reserved slots
    pub members: Vec<OrdinalMember>,
    /// Strictness
    #[serde(default)]
    pub strict: bool,
    /// Whether the union transitively holds handles or endpoints
    #[serde(default)]
    pub resource: bool,
    /// Wire shape
    #[serde(default)]
    pub type_shape_v1: TypeShape,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// Request or response parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    #[serde(rename = "type")]
    pub ty: Type,
    /// Placement inside the message
    #[serde(default)]
    pub field_shape_v1: FieldShape,
}

/// Protocol method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// 64-bit ordinal, unique within the protocol
    pub ordinal: u64,
    /// Method name
    pub name: String,
    /// Whether the client sends a request
    pub has_request: bool,
    /// Request parameters
    #[serde(default)]
    pub maybe_request: Option<Vec<Parameter>>,
    /// Request message shape
    #[serde(default)]
    pub maybe_request_type_shape_v1: Option<TypeShape>,
    /// Whether the server sends a response or event
    pub has_response: bool,
    /// Response parameters
    #[serde(default)]
    pub maybe_response: Option<Vec<Parameter>>,
    /// Response message shape
    #[serde(default)]
    pub maybe_response_type_shape_v1: Option<TypeShape>,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

impl Method {
    /// Request parameters, empty when absent
    pub fn request(&self) -> &[Parameter] {
        self.maybe_request.as_deref().unwrap_or(&[])
    }

    /// Response parameters, empty when absent
    pub fn response(&self) -> &[Parameter] {
        self.maybe_response.as_deref().unwrap_or(&[])
    }

    /// Request shape, zeroed when absent
    pub fn request_shape(&self) -> TypeShape {
        self.maybe_request_type_shape_v1.unwrap_or_default()
    }

    /// Response shape, zeroed when absent
    pub fn response_shape(&self) -> TypeShape {
        self.maybe_response_type_shape_v1.unwrap_or_default()
    }

    /// Methods marked `transitional` may be left unimplemented by servers
    pub fn is_transitional(&self) -> bool {
        self.attributes.has("transitional")
    }
}

/// `protocol` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    /// Declaration name
    pub name: EncodedCompoundIdentifier,
    /// Methods in declaration order
    pub methods: Vec<Method>,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// Member of a `service` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMember {
    /// Member name
    pub name: String,
    /// Protocol type of the member
    #[serde(rename = "type")]
    pub ty: Type,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

/// `service` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Declaration name
    pub name: EncodedCompoundIdentifier,
    /// Members
    pub members: Vec<ServiceMember>,
    /// Attributes
    #[serde(default)]
    pub attributes: Attributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup_is_lenient() {
        let attrs = Attributes(vec![
            Attribute {
                name: "BindingsDenylist".to_string(),
                value: "dart, cpp".to_string(),
            },
            Attribute {
                name: "doc".to_string(),
                value: " First line\n Second line".to_string(),
            },
        ]);
        assert!(attrs.has("bindings_denylist"));
        assert!(attrs.denies_binding("cpp"));
        assert!(!attrs.denies_binding("rust"));
        assert_eq!(attrs.doc_comments(), vec![" First line", " Second line"]);
    }

    #[test]
    fn test_method_accessors_default_to_empty() {
        let json = r#"{ "ordinal": 7, "name": "Ping", "has_request": true, "has_response": false }"#;
        let method: Method = serde_json::from_str(json).unwrap();
        assert!(method.request().is_empty());
        assert_eq!(method.request_shape(), TypeShape::default());
        assert!(!method.is_transitional());
    }
}
