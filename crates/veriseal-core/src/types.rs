//! Strong type definitions for Veriseal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of artifact a proof covers.
///
/// Resolved at the boundary, before bytes enter the core. The core itself
/// treats every artifact as an opaque byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentKind {
    /// A generated image.
    Image {
        width: u32,
        height: u32,
        /// Container format as reported by the generator, e.g. "png".
        format: String,
    },
    /// A generated music track.
    Music {
        duration_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        genre: Option<String>,
    },
}

impl ContentKind {
    /// Short label for logs and metadata.
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Image { .. } => "image",
            ContentKind::Music { .. } => "music",
        }
    }
}

/// Opaque locator returned by a blob store (for example an IPFS CID).
///
/// Treated as an unstructured string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentLocator(pub String);

impl ContentLocator {
    /// Wrap a locator string.
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Borrow the locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentLocator({})", self.0)
    }
}

impl fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentLocator {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContentLocator {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
