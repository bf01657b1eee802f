//! Library and declaration identifiers as they appear in the JSON IR

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dotted library name split into its parts, e.g. `acme.widgets`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LibraryIdentifier(Vec<String>);

impl LibraryIdentifier {
    /// Build from already-split parts
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    /// Parse a dotted library name
    pub fn parse(name: &str) -> Self {
        Self(name.split('.').map(str::to_string).collect())
    }

    /// The library parts in declaration order
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Same parts, last first
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().cloned().collect())
    }

    /// Apply a transform to every part
    pub fn map_parts(&self, f: impl Fn(&str) -> String) -> Self {
        Self(self.0.iter().map(|p| f(p)).collect())
    }
}

impl fmt::Display for LibraryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Fully qualified declaration reference, `library.name/Decl` or
/// `library.name/Decl.MEMBER`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedCompoundIdentifier(pub String);

impl EncodedCompoundIdentifier {
    /// Wrap a raw identifier
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into library, declaration name and optional member
    pub fn parse(&self) -> Result<CompoundIdentifier> {
        let (library, rest) = self
            .0
            .split_once('/')
            .ok_or_else(|| Error::MalformedIdentifier {
                identifier: self.0.clone(),
            })?;
        if library.is_empty() || rest.is_empty() {
            return Err(Error::MalformedIdentifier {
                identifier: self.0.clone(),
            });
        }
        let (name, member) = match rest.split_once('.') {
            Some((name, member)) => (name, Some(member.to_string())),
            None => (rest, None),
        };
        Ok(CompoundIdentifier {
            library: LibraryIdentifier::parse(library),
            name: name.to_string(),
            member,
        })
    }

    /// The declaration this identifier refers to, without any member suffix
    pub fn declaration(&self) -> Result<EncodedCompoundIdentifier> {
        let ci = self.parse()?;
        Ok(ci.encode_declaration())
    }
}

impl fmt::Display for EncodedCompoundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded form of an [`EncodedCompoundIdentifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundIdentifier {
    /// Owning library
    pub library: LibraryIdentifier,
    /// Declaration name
    pub name: String,
    /// Member name for references like `Color.RED`
    pub member: Option<String>,
}

impl CompoundIdentifier {
    /// Re-encode the declaration part only
    pub fn encode_declaration(&self) -> EncodedCompoundIdentifier {
        EncodedCompoundIdentifier(format!("{}/{}", self.library, self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declaration() {
        let eci = EncodedCompoundIdentifier::new("acme.widgets/Gadget");
        let ci = eci.parse().unwrap();
        assert_eq!(ci.library.parts(), ["acme", "widgets"]);
        assert_eq!(ci.name, "Gadget");
        assert_eq!(ci.member, None);
    }

    #[test]
    fn test_parse_member() {
        let eci = EncodedCompoundIdentifier::new("acme.widgets/Color.RED");
        let ci = eci.parse().unwrap();
        assert_eq!(ci.name, "Color");
        assert_eq!(ci.member.as_deref(), Some("RED"));
        assert_eq!(eci.declaration().unwrap().as_str(), "acme.widgets/Color");
    }

    #[test]
    fn test_parse_malformed() {
        for raw in ["Gadget", "/Gadget", "acme/"] {
            let err = EncodedCompoundIdentifier::new(raw).parse().unwrap_err();
            assert!(matches!(err, Error::MalformedIdentifier { .. }), "{raw}");
        }
    }

    #[test]
    fn test_library_reversed() {
        let lib = LibraryIdentifier::parse("acme.widgets.v2");
        assert_eq!(lib.reversed().to_string(), "v2.widgets.acme");
    }
}
