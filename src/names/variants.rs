//! Flavor selection and per-flavor name triples

use super::name::Name;
use super::namespace::Namespace;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three parallel binding spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Owning, standard-library based types
    Natural,
    /// Aliases of the natural types in a single flat namespace
    Unified,
    /// Zero-copy views over the wire format
    Wire,
}

impl Flavor {
    /// All flavors, in rendering order
    pub const ALL: [Flavor; 3] = [Flavor::Natural, Flavor::Unified, Flavor::Wire];

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Natural => "natural",
            Flavor::Unified => "unified",
            Flavor::Wire => "wire",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit rendering state threaded through every stringification call.
///
/// The default context has no flavor; rendering with it fails with
/// [`Error::NoFlavorSelected`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    flavor: Option<Flavor>,
}

impl RenderContext {
    /// Context rendering one flavor
    pub fn for_flavor(flavor: Flavor) -> Self {
        Self {
            flavor: Some(flavor),
        }
    }

    /// The selected flavor, if any
    pub fn flavor(&self) -> Option<Flavor> {
        self.flavor
    }

    /// The selected flavor, or an error describing the ambiguous value
    pub fn require_flavor(&self, spellings: impl FnOnce() -> String) -> Result<Flavor> {
        self.flavor.ok_or_else(|| Error::NoFlavorSelected {
            spellings: spellings(),
        })
    }
}

/// The same declaration spelled for each flavor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameVariants {
    /// Natural spelling
    pub natural: Name,
    /// Unified spelling
    pub unified: Name,
    /// Wire spelling
    pub wire: Name,
}

impl NameVariants {
    /// Same name for all flavors
    pub fn common(name: Name) -> Self {
        Self {
            natural: name.clone(),
            unified: name.clone(),
            wire: name,
        }
    }

    /// Name for a primitive such as `uint32_t`
    pub fn primitive(spelling: &str) -> Self {
        Self::common(Name::from_path(spelling))
    }

    /// The name for one flavor
    pub fn get(&self, flavor: Flavor) -> &Name {
        match flavor {
            Flavor::Natural => &self.natural,
            Flavor::Unified => &self.unified,
            Flavor::Wire => &self.wire,
        }
    }

    fn select(&self, cx: &RenderContext) -> Result<&Name> {
        let flavor = cx.require_flavor(|| {
            format!("{}/{}/{}", self.natural, self.unified, self.wire)
        })?;
        Ok(self.get(flavor))
    }

    /// Fully qualified spelling for the selected flavor
    pub fn render(&self, cx: &RenderContext) -> Result<String> {
        Ok(self.select(cx)?.to_string())
    }

    /// Non-namespace part for the selected flavor
    pub fn name(&self, cx: &RenderContext) -> Result<String> {
        Ok(self.select(cx)?.name())
    }

    /// Self-reference identifier for the selected flavor
    pub fn self_name(&self, cx: &RenderContext) -> Result<String> {
        Ok(self.select(cx)?.self_name().to_string())
    }

    /// Qualified spelling without leading `::` for the selected flavor
    pub fn no_leading(&self, cx: &RenderContext) -> Result<String> {
        Ok(self.select(cx)?.no_leading())
    }

    /// Namespace for the selected flavor
    pub fn namespace(&self, cx: &RenderContext) -> Result<Namespace> {
        Ok(self.select(cx)?.namespace().clone())
    }

    /// Apply `f` to each flavor's name
    pub fn try_map(&self, f: impl Fn(Flavor, &Name) -> Result<Name>) -> Result<NameVariants> {
        Ok(NameVariants {
            natural: f(Flavor::Natural, &self.natural)?,
            unified: f(Flavor::Unified, &self.unified)?,
            wire: f(Flavor::Wire, &self.wire)?,
        })
    }

    /// Suffix the innermost identifier of every flavor
    pub fn append_name(&self, suffix: &str) -> Result<NameVariants> {
        self.try_map(|_, n| n.append_name(suffix))
    }

    /// Prefix the innermost identifier of every flavor
    pub fn prepend_name(&self, prefix: &str) -> Result<NameVariants> {
        self.try_map(|_, n| n.prepend_name(prefix))
    }

    /// Move every flavor into a child namespace
    pub fn append_namespace(&self, part: &str) -> NameVariants {
        NameVariants {
            natural: self.natural.append_namespace(part),
            unified: self.unified.append_namespace(part),
            wire: self.wire.append_namespace(part),
        }
    }

    /// A class nested inside every flavor's name
    pub fn nest(&self, nested: &str) -> NameVariants {
        NameVariants {
            natural: self.natural.nest(nested),
            unified: self.unified.nest(nested),
            wire: self.wire.nest(nested),
        }
    }

    /// Wrap in a template: `natural_template` for Natural and Unified,
    /// `wire_template` for Wire.
    pub fn with_templates(
        &self,
        natural_template: &str,
        wire_template: &str,
    ) -> Result<NameVariants> {
        let natural = Name::from_path(natural_template);
        let wire = Name::from_path(wire_template);
        self.try_map(|flavor, n| match flavor {
            Flavor::Natural | Flavor::Unified => natural.template(n),
            Flavor::Wire => wire.template(n),
        })
    }

    /// Like [`with_templates`](Self::with_templates) with an element count
    pub fn with_array_templates(
        &self,
        natural_template: &str,
        wire_template: &str,
        count: u32,
    ) -> Result<NameVariants> {
        let natural = Name::from_path(natural_template);
        let wire = Name::from_path(wire_template);
        self.try_map(|flavor, n| match flavor {
            Flavor::Natural | Flavor::Unified => natural.array_template(n, count),
            Flavor::Wire => wire.array_template(n, count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gadget() -> NameVariants {
        NameVariants {
            natural: Namespace::new("acme::widgets").member("Gadget"),
            unified: Namespace::new("acme_widgets").member("Gadget"),
            wire: Namespace::new("acme_widgets::wire").member("Gadget"),
        }
    }

    #[test]
    fn test_render_per_flavor() {
        let names = gadget();
        let natural = RenderContext::for_flavor(Flavor::Natural);
        let wire = RenderContext::for_flavor(Flavor::Wire);
        assert_eq!(names.render(&natural).unwrap(), "::acme::widgets::Gadget");
        assert_eq!(names.render(&wire).unwrap(), "::acme_widgets::wire::Gadget");
        assert_eq!(names.no_leading(&wire).unwrap(), "acme_widgets::wire::Gadget");
        assert_eq!(names.self_name(&wire).unwrap(), "Gadget");
    }

    #[test]
    fn test_render_without_flavor_fails() {
        let err = gadget().render(&RenderContext::default()).unwrap_err();
        match err {
            Error::NoFlavorSelected { spellings } => {
                assert!(spellings.contains("::acme::widgets::Gadget"));
                assert!(spellings.contains("::acme_widgets::wire::Gadget"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_with_templates() {
        let vector = gadget()
            .with_templates("std::vector", "fidl::VectorView")
            .unwrap();
        assert_eq!(
            vector.unified.to_string(),
            "::std::vector<::acme_widgets::Gadget>"
        );
        assert_eq!(
            vector.wire.to_string(),
            "::fidl::VectorView<::acme_widgets::wire::Gadget>"
        );
        assert!(vector.append_name("Ptr").is_err());
    }

    #[test]
    fn test_nest_keeps_all_flavors() {
        let nested = gadget().nest("Tag");
        for flavor in Flavor::ALL {
            assert_eq!(nested.get(flavor).self_name(), "Tag");
        }
    }
}
