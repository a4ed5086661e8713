//! A single opaque name component.

use std::fmt;

use super::error::{NameError, NameResult};

/// One segment of a hierarchical [`Name`](super::Name).
///
/// Components are opaque byte strings. They order lexicographically by their
/// bytes, which is the order the trie uses for traversal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameComponent(Box<[u8]>);

impl NameComponent {
    /// Creates a component from raw bytes.
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes of this component.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the component length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the component has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes one URI segment, resolving `%XX` escapes.
    pub(crate) fn from_uri_segment(segment: &str) -> NameResult<Self> {
        let raw = segment.as_bytes();
        let mut bytes = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'%' {
                let hex = raw
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| NameError::InvalidEscape(segment.to_string()))?;
                bytes.push(hex);
                i += 3;
            } else {
                bytes.push(raw[i]);
                i += 1;
            }
        }
        Ok(Self(bytes.into_boxed_slice()))
    }
}

impl From<&str> for NameComponent {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<&[u8]> for NameComponent {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter() {
            let unreserved = b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~');
            if unreserved {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "%{b:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameComponent({self})")
    }
}
