//! Qualified C++ identifiers
//!
//! A [`Name`] is a [`Namespace`] plus a [`NamePart`] tree. The tree keeps the
//! structure of nested and templated names so that they can be manipulated
//! safely. For `fidl::WireInterface<acme_widgets::Gadget>::Spin`:
//!
//! ```text
//! WireInterface<::acme_widgets::Gadget>::Spin
//! |-Nested-----------------------------------|
//! |-Template----------------------------|  |-Leaf
//! |-Leaf--------|-args------------------|
//! ```

use super::namespace::Namespace;
use crate::{Error, Result};
use std::fmt;

/// The non-namespace part of a name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamePart {
    /// A plain identifier
    Leaf(String),
    /// `left::right`
    Nested(Box<NamePart>, Box<NamePart>),
    /// `base<args>`
    Template {
        /// The template being instantiated
        base: Box<NamePart>,
        /// Rendered template arguments
        args: String,
    },
}

impl NamePart {
    /// How the type refers to itself, as in constructor and destructor names.
    /// `Foo::Bar::Baz` gives `Baz`; `Foo::Bar<Baz>` gives `Bar`.
    pub fn self_name(&self) -> &str {
        match self {
            NamePart::Leaf(s) => s,
            NamePart::Nested(_, right) => right.self_name(),
            NamePart::Template { base, .. } => base.self_name(),
        }
    }

    /// A class nested inside this one
    pub fn nest(&self, name: &str) -> NamePart {
        match self {
            NamePart::Nested(left, right) => {
                NamePart::Nested(left.clone(), Box::new(right.nest(name)))
            }
            NamePart::Leaf(_) | NamePart::Template { .. } => NamePart::Nested(
                Box::new(self.clone()),
                Box::new(NamePart::Leaf(name.to_string())),
            ),
        }
    }

    /// This name applied as a template to `args`
    pub fn template(&self, args: &str) -> Result<NamePart> {
        match self {
            NamePart::Template { .. } => Err(self.composition_error("template")),
            _ => Ok(NamePart::Template {
                base: Box::new(self.clone()),
                args: args.to_string(),
            }),
        }
    }

    /// Prefix the innermost identifier
    pub fn prepend_name(&self, prefix: &str) -> Result<NamePart> {
        match self {
            NamePart::Leaf(s) => Ok(NamePart::Leaf(format!("{}{}", prefix, s))),
            NamePart::Nested(left, right) => Ok(NamePart::Nested(
                left.clone(),
                Box::new(right.prepend_name(prefix)?),
            )),
            NamePart::Template { .. } => Err(self.composition_error("prepend to")),
        }
    }

    /// Suffix the innermost identifier
    pub fn append_name(&self, suffix: &str) -> Result<NamePart> {
        match self {
            NamePart::Leaf(s) => Ok(NamePart::Leaf(format!("{}{}", s, suffix))),
            NamePart::Nested(left, right) => Ok(NamePart::Nested(
                left.clone(),
                Box::new(right.append_name(suffix)?),
            )),
            NamePart::Template { .. } => Err(self.composition_error("append to")),
        }
    }

    fn composition_error(&self, operation: &'static str) -> Error {
        Error::TemplateComposition {
            operation,
            name: self.to_string(),
        }
    }
}

impl fmt::Display for NamePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePart::Leaf(s) => f.write_str(s),
            NamePart::Nested(left, right) => write!(f, "{}::{}", left, right),
            NamePart::Template { base, args } => write!(f, "{}<{}>", base, args),
        }
    }
}

/// A C++ qualified identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    ns: Namespace,
    part: NamePart,
}

impl Name {
    /// An unqualified identifier
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            ns: Namespace::default(),
            part: NamePart::Leaf(name.into()),
        }
    }

    /// An identifier inside `ns`
    pub fn in_namespace(ns: Namespace, name: impl Into<String>) -> Self {
        Self {
            ns,
            part: NamePart::Leaf(name.into()),
        }
    }

    /// Treat the last `::` component as the name and the rest as its
    /// namespace. Meant for well-known literals like `std::vector`.
    pub fn from_path(path: &str) -> Self {
        debug_assert!(!path.starts_with("::"), "leading :: in {path}");
        let path = path.trim_start_matches("::");
        match path.rfind("::") {
            Some(i) => Self::in_namespace(Namespace::new(&path[..i]), &path[i + 2..]),
            None => Self::leaf(path),
        }
    }

    /// `::std::tuple<...>` of the given names
    pub fn tuple(members: &[Name]) -> Self {
        let args: Vec<String> = members.iter().map(Name::to_string).collect();
        let base = Self::from_path("std::tuple");
        Self {
            ns: base.ns,
            part: NamePart::Template {
                base: Box::new(base.part),
                args: args.join(", "),
            },
        }
    }

    /// The part after the namespace
    pub fn name(&self) -> String {
        self.part.to_string()
    }

    /// The name tree
    pub fn part(&self) -> &NamePart {
        &self.part
    }

    /// Innermost unqualified identifier
    pub fn self_name(&self) -> &str {
        self.part.self_name()
    }

    /// Fully qualified, without the leading `::`
    pub fn no_leading(&self) -> String {
        if self.ns.is_empty() {
            return self.part.to_string();
        }
        format!("{}::{}", self.ns.no_leading(), self.part)
    }

    /// The namespace portion
    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    /// A class nested inside this one
    pub fn nest(&self, nested: &str) -> Name {
        Name {
            ns: self.ns.clone(),
            part: self.part.nest(nested),
        }
    }

    /// This name applied as a template to `arg`
    pub fn template(&self, arg: &Name) -> Result<Name> {
        self.template_args(&arg.to_string())
    }

    /// This name applied as a template to raw argument text
    pub fn template_args(&self, args: &str) -> Result<Name> {
        Ok(Name {
            ns: self.ns.clone(),
            part: self.part.template(args)?,
        })
    }

    /// This name applied as a template to `arg` and an element count
    pub fn array_template(&self, arg: &Name, count: u32) -> Result<Name> {
        self.template_args(&format!("{}, {}", arg, count))
    }

    /// Prefix the innermost identifier
    pub fn prepend_name(&self, prefix: &str) -> Result<Name> {
        Ok(Name {
            ns: self.ns.clone(),
            part: self.part.prepend_name(prefix)?,
        })
    }

    /// Suffix the innermost identifier
    pub fn append_name(&self, suffix: &str) -> Result<Name> {
        Ok(Name {
            ns: self.ns.clone(),
            part: self.part.append_name(suffix)?,
        })
    }

    /// Move the name into a child namespace
    pub fn append_namespace(&self, part: &str) -> Name {
        Name {
            ns: self.ns.append(part),
            part: self.part.clone(),
        }
    }
}

impl fmt::Display for Name {
    /// Fully qualified, with a leading `::` when there is a namespace
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ns.is_empty() {
            return write!(f, "{}", self.part);
        }
        write!(f, "{}::{}", self.ns, self.part)
    }
}
