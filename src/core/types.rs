//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`NodeId`] - Stable arena id of a taxonomy node
//! - [`FieldId`] - Identifies an independent tree/vocabulary
//! - [`ItemId`] - External catalogue item identifier
//! - [`QualifierId`] - Optional authority-record link
//! - [`SegmentName`] - Validated node label
//! - [`Fingerprint`] - Hash of a sibling name set, for cache revalidation
//!
//! # Validation
//!
//! [`SegmentName`] enforces validity at construction time. A blank label or
//! a label containing the path separator cannot be represented, so the
//! derived full-name path can always be split back into its segments.
//!
//! # Examples
//!
//! ```
//! use vocabtree::core::types::{SegmentName, normalize_browse_key};
//!
//! let name = SegmentName::new("Mammals").unwrap();
//! assert_eq!(name.as_str(), "Mammals");
//!
//! assert!(SegmentName::new("   ").is_err());
//! assert!(SegmentName::new("a -- b").is_err());
//!
//! assert_eq!(normalize_browse_key("Déjà Vu!"), "djvu");
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

/// Separator between path segments in a full name.
pub const FULL_NAME_SEPARATOR: &str = " -- ";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("segment name cannot be blank")]
    BlankName,

    #[error("segment name cannot contain '{FULL_NAME_SEPARATOR}': {0}")]
    ReservedSeparator(String),

    #[error("invalid qualifier id: {0}")]
    InvalidQualifierId(String),
}

/// Stable identifier of a taxonomy node within the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an independent tree/vocabulary (one per metadata field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u32);

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an external catalogue item associated with a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Link to an authority record that qualifies a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifierId(pub Uuid);

impl QualifierId {
    /// Parse a qualifier id from its textual UUID form.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidQualifierId` if the input is not a UUID.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeError::InvalidQualifierId(s.to_string()))
    }

    /// Mint a fresh qualifier id.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for QualifierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated node label.
///
/// Segment names must be non-blank after trimming and must not contain the
/// `" -- "` path separator, since full names are built by joining segments
/// with it.
///
/// # Example
///
/// ```
/// use vocabtree::core::types::SegmentName;
///
/// let name = SegmentName::new("  Mammals ").unwrap();
/// assert_eq!(name.as_str(), "Mammals");
///
/// assert!(SegmentName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SegmentName(String);

impl SegmentName {
    /// Create a new validated segment name. Leading and trailing whitespace
    /// is trimmed before validation.
    ///
    /// # Errors
    ///
    /// - `TypeError::BlankName` if the trimmed name is empty
    /// - `TypeError::ReservedSeparator` if the name contains `" -- "`
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TypeError::BlankName);
        }
        if trimmed.contains(FULL_NAME_SEPARATOR) {
            return Err(TypeError::ReservedSeparator(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form, used for case-insensitive sibling uniqueness.
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }

    /// Normalized browse key for this label (may be empty).
    pub fn browse_key(&self) -> String {
        normalize_browse_key(&self.0)
    }
}

impl std::fmt::Display for SegmentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SegmentName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SegmentName> for String {
    fn from(value: SegmentName) -> Self {
        value.0
    }
}

/// Normalize a name for alphabetic browsing.
///
/// Keeps only ASCII digits, letters, and the double quote; letters are
/// folded to lowercase. Everything else (spaces, punctuation, non-ASCII)
/// is stripped. The result may be empty; callers discard blank keys.
///
/// # Example
///
/// ```
/// use vocabtree::core::types::normalize_browse_key;
///
/// assert_eq!(normalize_browse_key("Blue-green Algae"), "bluegreenalgae");
/// assert_eq!(normalize_browse_key("\"Quoted\""), "\"quoted\"");
/// assert_eq!(normalize_browse_key("---"), "");
/// ```
pub fn normalize_browse_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '"')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Hash of an ordered name list.
///
/// Used by the partition cache to detect that a sibling set changed under
/// it, independently of the TTL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of an ordered sequence of names.
    ///
    /// Names are length-prefixed before hashing so that the sequence
    /// boundaries are unambiguous.
    pub fn compute<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut hasher = Sha256::new();
        for name in names {
            hasher.update((name.len() as u64).to_be_bytes());
            hasher.update(name.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// The fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
