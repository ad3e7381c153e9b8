//! Reading membership files back into cluster representatives.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use genoclust_core::{ClusterId, GenomeId, Representative};
use thiserror::Error;

use super::CliError;

/// Why a membership row was rejected.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MembershipRowError {
    /// The row lacked the genome or cluster column.
    #[error("expected at least 2 tab-separated fields, found {found}")]
    TooFewFields {
        /// Fields present on the row.
        found: usize,
    },
    /// The genome column was blank.
    #[error("genome column is empty")]
    EmptyGenome,
    /// The cluster column was not a 32-bit unsigned integer.
    #[error("cluster id `{token}` is not a non-negative integer")]
    BadClusterId {
        /// Raw cluster token.
        token: String,
    },
    /// The genome was already listed under a different cluster.
    #[error("genome `{genome}` already assigned to another cluster on line {first_line}")]
    DuplicateGenome {
        /// Repeated genome.
        genome: String,
        /// Line that first assigned it.
        first_line: u64,
    },
}

/// Reads a `genome\tcluster_id[\tcluster_size]` table and returns one
/// representative per cluster, ordered by cluster id.
///
/// The first line is a header and is skipped, as are blank lines. Each
/// cluster is represented by its lexicographically smallest genome, and its
/// size is the number of distinct genomes naming it. A genome repeated under
/// the same cluster is counted once; under a different cluster it is
/// rejected, so no genome can stand for two clusters. `path` is only used
/// for error reporting.
///
/// # Errors
/// Returns [`CliError::Membership`] for the first malformed row and
/// [`CliError::Io`] when reading fails.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use genoclust_cli::cli::read_representatives;
///
/// let table = "genome\tcluster_id\tcluster_size\nB\t0\t2\nA\t0\t2\nC\t1\t1\n";
/// let reps = read_representatives(table.as_bytes(), Path::new("clusters.tsv"))?;
/// let names: Vec<&str> = reps.iter().map(|rep| rep.genome.as_str()).collect();
/// assert_eq!(names, ["A", "C"]);
/// assert_eq!(reps[0].cluster_size, 2);
/// # Ok::<(), genoclust_cli::cli::CliError>(())
/// ```
pub fn read_representatives<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<Representative>, CliError> {
    let mut clusters: BTreeMap<u32, (GenomeId, u32)> = BTreeMap::new();
    let mut seen: BTreeMap<String, (u32, u64)> = BTreeMap::new();

    for (number, line) in (1_u64..).zip(reader.lines()) {
        let line = line.map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if number == 1 || line.trim().is_empty() {
            continue;
        }
        let membership_error = |reason| CliError::Membership {
            path: path.to_path_buf(),
            line: number,
            reason,
        };
        let (genome, cluster) = parse_row(&line).map_err(membership_error)?;
        match seen.get(genome) {
            Some(&(first_cluster, _)) if first_cluster == cluster => continue,
            Some(&(_, first_line)) => {
                return Err(membership_error(MembershipRowError::DuplicateGenome {
                    genome: genome.to_owned(),
                    first_line,
                }));
            }
            None => {
                seen.insert(genome.to_owned(), (cluster, number));
            }
        }
        clusters
            .entry(cluster)
            .and_modify(|(smallest, size)| {
                if genome < smallest.as_str() {
                    *smallest = GenomeId::from(genome);
                }
                *size = size.saturating_add(1);
            })
            .or_insert_with(|| (GenomeId::from(genome), 1));
    }

    Ok(clusters
        .into_iter()
        .map(|(id, (genome, cluster_size))| Representative {
            cluster_id: ClusterId::new(id),
            cluster_size,
            genome,
        })
        .collect())
}

fn parse_row(line: &str) -> Result<(&str, u32), MembershipRowError> {
    let row = line.trim_end_matches(['\r', '\n']);
    let mut fields = row.split('\t');
    let (Some(genome), Some(cluster)) = (fields.next(), fields.next()) else {
        return Err(MembershipRowError::TooFewFields {
            found: row.split('\t').count(),
        });
    };
    let genome = genome.trim();
    if genome.is_empty() {
        return Err(MembershipRowError::EmptyGenome);
    }
    let cluster = cluster
        .trim()
        .parse::<u32>()
        .map_err(|_| MembershipRowError::BadClusterId {
            token: cluster.to_owned(),
        })?;
    Ok((genome, cluster))
}
