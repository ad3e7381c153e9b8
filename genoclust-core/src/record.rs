//! Distance record parsing.
//!
//! Each line of an all-vs-all distance table (for example `mash dist -t`
//! output) carries `source<TAB>target<TAB>distance[<TAB>...]`. Lines
//! starting with `#` are headers and blank lines are ignored; any other line
//! either yields a [`DistanceEdge`] or a [`RecordError`].
//!
//! Besides short rows and unparsable distances, a genome token that
//! canonicalises to nothing (`dir/`, `.fa`) is rejected as
//! [`RecordError::EmptyGenomeId`] instead of registering an empty genome.

use crate::{error::RecordError, genome_id::GenomeId};

const COMMENT_PREFIX: char = '#';
const FIELD_SEPARATOR: char = '\t';

/// Pairwise distance between two genomes read from one record.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceEdge {
    source: GenomeId,
    target: GenomeId,
    distance: f64,
}

impl DistanceEdge {
    /// Creates an edge from already canonical identifiers.
    ///
    /// # Examples
    /// ```
    /// use genoclust_core::{DistanceEdge, GenomeId};
    ///
    /// let edge = DistanceEdge::new(GenomeId::canonicalize("A"), GenomeId::canonicalize("A"), 0.0);
    /// assert!(edge.is_self_edge());
    /// ```
    #[must_use]
    pub fn new(source: GenomeId, target: GenomeId, distance: f64) -> Self {
        Self {
            source,
            target,
            distance,
        }
    }

    /// Genome named in the first column.
    #[must_use]
    pub fn source(&self) -> &GenomeId {
        &self.source
    }

    /// Genome named in the second column.
    #[must_use]
    pub fn target(&self) -> &GenomeId {
        &self.target
    }

    /// Distance reported for the pair.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns `true` when both endpoints name the same genome.
    #[must_use]
    pub fn is_self_edge(&self) -> bool {
        self.source == self.target
    }
}

/// Outcome of classifying a single input line.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedLine {
    /// A well-formed data record.
    Edge(DistanceEdge),
    /// A header, comment, or blank line.
    Skip,
}

/// Parses one raw line of a distance table.
///
/// Trailing `\r`/`\n` are tolerated. Columns beyond the third (p-value,
/// shared hashes, ...) are ignored.
///
/// # Errors
/// Returns [`RecordError::TooFewFields`] when fewer than three fields are
/// present, [`RecordError::BadDistance`] when the distance is not a finite
/// number, and [`RecordError::EmptyGenomeId`] when a genome token reduces to
/// an empty identifier.
///
/// # Examples
/// ```
/// use genoclust_core::{ParsedLine, parse_record};
///
/// let parsed = parse_record("refs/A.fna\tB.fa\t0.012\t0\t950/1000").expect("valid record");
/// let ParsedLine::Edge(edge) = parsed else { panic!("expected an edge") };
/// assert_eq!(edge.source().as_str(), "A");
/// assert_eq!(edge.target().as_str(), "B");
/// assert_eq!(edge.distance(), 0.012);
///
/// assert_eq!(parse_record("#query\treference\tdistance"), Ok(ParsedLine::Skip));
/// assert!(parse_record("A\tB").is_err());
/// ```
pub fn parse_record(line: &str) -> Result<ParsedLine, RecordError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.starts_with(COMMENT_PREFIX) {
        return Ok(ParsedLine::Skip);
    }

    let mut fields = line.split(FIELD_SEPARATOR);
    let (Some(source), Some(target), Some(distance)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(RecordError::TooFewFields {
            found: line.split(FIELD_SEPARATOR).count(),
        });
    };

    let distance = parse_distance(distance)?;
    let source = parse_genome(source)?;
    let target = parse_genome(target)?;
    Ok(ParsedLine::Edge(DistanceEdge::new(source, target, distance)))
}

fn parse_distance(token: &str) -> Result<f64, RecordError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RecordError::BadDistance {
            token: token.to_owned(),
        })
}

fn parse_genome(token: &str) -> Result<GenomeId, RecordError> {
    let id = GenomeId::canonicalize(token.trim());
    if id.is_empty() {
        return Err(RecordError::EmptyGenomeId {
            token: token.to_owned(),
        });
    }
    Ok(id)
}
