//! C++ namespaces

use super::name::Name;
use std::fmt;

/// A C++ namespace, outermost component first
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Namespace(Vec<String>);

impl Namespace {
    /// Parse a `::`-separated namespace such as `fidl::internal`
    pub fn new(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        Self(path.split("::").map(str::to_string).collect())
    }

    /// Build from components
    pub fn from_parts(parts: Vec<String>) -> Self {
        Self(parts)
    }

    /// Namespace components
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Whether this is the global namespace
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fully qualified namespace without the leading `::`
    pub fn no_leading(&self) -> String {
        self.0.join("::")
    }

    /// A new namespace with one more component
    pub fn append(&self, part: impl Into<String>) -> Namespace {
        let mut parts = self.0.clone();
        parts.push(part.into());
        Namespace(parts)
    }

    /// A named declaration inside this namespace
    pub fn member(&self, name: impl Into<String>) -> Name {
        Name::in_namespace(self.clone(), name)
    }
}

impl fmt::Display for Namespace {
    /// Fully qualified with a leading `::`, or empty for the global namespace
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, "::{}", self.no_leading())
    }
}
