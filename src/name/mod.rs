//! Hierarchical CCN names.
//!
//! A [`Name`] is an ordered sequence of opaque [`NameComponent`]s. Equality and
//! the prefix-of relation are structural, compared component by component.
//! Names are written in URI form, `/parc/videos/WidgetA.mpg`, with `%XX`
//! escapes for bytes outside the unreserved set. `/` is the empty name.

mod component;
mod error;

use std::fmt;
use std::str::FromStr;

pub use component::NameComponent;
pub use error::{NameError, NameResult};

/// An immutable hierarchical name.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    components: Vec<NameComponent>,
}

impl Name {
    /// Creates the empty name `/`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a name from an iterator of components.
    pub fn from_components<I, C>(components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<NameComponent>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a name from its URI form.
    ///
    /// Repeated and trailing slashes are ignored, so `/a//b/` equals `/a/b`.
    pub fn parse(uri: &str) -> NameResult<Self> {
        let rest = uri
            .strip_prefix("ccnx:")
            .unwrap_or(uri)
            .strip_prefix('/')
            .ok_or_else(|| NameError::NotAbsolute(uri.to_string()))?;

        let components = rest
            .split('/')
            .filter(|s| !s.is_empty())
            .map(NameComponent::from_uri_segment)
            .collect::<NameResult<Vec<_>>>()?;

        Ok(Self { components })
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns whether this is the empty name.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterates over the components in order.
    pub fn components(&self) -> impl ExactSizeIterator<Item = &NameComponent> + '_ {
        self.components.iter()
    }

    /// Returns the component at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&NameComponent> {
        self.components.get(index)
    }

    /// Returns the first `k` components as a new name. `k` is clamped to the length.
    pub fn prefix(&self, k: usize) -> Name {
        let k = k.min(self.components.len());
        Name {
            components: self.components[..k].to_vec(),
        }
    }

    /// Returns whether `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.components.len() <= other.components.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    /// Returns a new name with `component` appended.
    pub fn child(&self, component: impl Into<NameComponent>) -> Name {
        let mut components = self.components.clone();
        components.push(component.into());
        Name { components }
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::parse(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for c in &self.components {
            write!(f, "/{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}
