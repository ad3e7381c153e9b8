//! Canonical genome identifiers.
//!
//! Distance tables reference genomes by the path of the sequence file they
//! were sketched from. Two references to the same genome may carry different
//! directory prefixes or FASTA extensions, so identifiers are canonicalised
//! once at ingestion and compared as plain strings afterwards.

use std::{borrow::Borrow, fmt, sync::Arc};

/// FASTA extensions removed from the final path segment, checked in order.
pub const FASTA_EXTENSIONS: [&str; 3] = [".fa", ".fasta", ".fna"];

/// Canonicalised genome identifier.
///
/// Cloning is cheap: the underlying string is shared.
///
/// # Examples
/// ```
/// use genoclust_core::GenomeId;
///
/// let from_path = GenomeId::canonicalize("sketches/GCA_000001.fasta");
/// let bare = GenomeId::canonicalize("GCA_000001");
/// assert_eq!(from_path, bare);
/// assert_eq!(from_path.as_str(), "GCA_000001");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenomeId(Arc<str>);

impl GenomeId {
    /// Builds an identifier from a raw distance-table token.
    ///
    /// The token is reduced to its final `/`-separated segment and a single
    /// trailing extension from [`FASTA_EXTENSIONS`] is stripped. Applying the
    /// function to its own output is a no-op unless the identifier itself
    /// ends in a FASTA extension twice (`A.fa.fa`).
    #[must_use]
    pub fn canonicalize(token: &str) -> Self {
        Self(Arc::from(canonical_form(token)))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when canonicalisation left nothing behind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn canonical_form(token: &str) -> &str {
    let file_name = token.rsplit('/').next().unwrap_or(token);
    FASTA_EXTENSIONS
        .iter()
        .find_map(|extension| file_name.strip_suffix(extension))
        .unwrap_or(file_name)
}

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GenomeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GenomeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Wraps an identifier that is already canonical, such as one read back from
/// a membership file. No path or extension is stripped.
impl From<&str> for GenomeId {
    fn from(canonical: &str) -> Self {
        Self(Arc::from(canonical))
    }
}
