//! Representative selection and leakage-free dataset splitting.
//!
//! Each cluster contributes exactly one representative, and splits are cut
//! over clusters rather than genomes, so near-duplicate genomes can never be
//! spread across train, validation, and test. Shuffling draws from a
//! generator supplied by the caller; there is no ambient random state.

use std::{fmt, str::FromStr};

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    assignment::{ClusterAssignment, ClusterId},
    error::define_error_codes,
    genome_id::GenomeId,
};

/// The single genome kept for a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representative {
    /// Cluster the genome stands for.
    pub cluster_id: ClusterId,
    /// Number of genomes in that cluster.
    pub cluster_size: u32,
    /// The chosen genome: the cluster's smallest identifier.
    pub genome: GenomeId,
}

impl ClusterAssignment {
    /// One representative per cluster, in cluster id order.
    ///
    /// # Examples
    /// ```
    /// use genoclust_core::GenomeClustererBuilder;
    ///
    /// let outcome = GenomeClustererBuilder::new()
    ///     .build()?
    ///     .run_lines(["C\tB\t0.01", "D\tD\t0"])?;
    /// let reps = outcome.assignment.representatives();
    /// let names: Vec<&str> = reps.iter().map(|rep| rep.genome.as_str()).collect();
    /// assert_eq!(names, ["B", "D"]);
    /// # Ok::<(), genoclust_core::ClusteringError>(())
    /// ```
    #[must_use]
    pub fn representatives(&self) -> Vec<Representative> {
        self.clusters()
            .iter()
            .map(|cluster| Representative {
                cluster_id: cluster.id(),
                cluster_size: u32::try_from(cluster.len()).unwrap_or(u32::MAX),
                genome: cluster.representative().clone(),
            })
            .collect()
    }
}

/// Errors raised while configuring a split.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SplitError {
    /// The ratio was not three colon-separated non-negative integers.
    #[error("split ratio `{raw}` must look like `80:10:10`")]
    InvalidRatio {
        /// The rejected input.
        raw: String,
    },
    /// All three ratio parts were zero.
    #[error("split ratio must have at least one non-zero part")]
    ZeroRatio,
}

define_error_codes! {
    /// Stable codes describing [`SplitError`] variants.
    enum SplitErrorCode for SplitError {
        /// The ratio could not be parsed.
        InvalidRatio => InvalidRatio { .. } => "SPLIT_INVALID_RATIO",
        /// Every ratio part was zero.
        ZeroRatio => ZeroRatio => "SPLIT_ZERO_RATIO",
    }
}

/// Relative weights of the train, validation, and test splits.
///
/// # Examples
/// ```
/// use genoclust_core::SplitRatio;
///
/// let ratio: SplitRatio = "80:10:10".parse()?;
/// assert_eq!(ratio.total(), 100);
/// assert_eq!(ratio.to_string(), "80:10:10");
/// # Ok::<(), genoclust_core::SplitError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRatio {
    train: u32,
    validation: u32,
    test: u32,
}

impl SplitRatio {
    /// Builds a ratio from its three parts.
    ///
    /// # Errors
    /// Returns [`SplitError::ZeroRatio`] when every part is zero.
    pub fn new(train: u32, validation: u32, test: u32) -> Result<Self, SplitError> {
        if train == 0 && validation == 0 && test == 0 {
            return Err(SplitError::ZeroRatio);
        }
        Ok(Self {
            train,
            validation,
            test,
        })
    }

    /// Sum of the three parts.
    #[must_use]
    pub fn total(&self) -> u64 {
        u64::from(self.train) + u64::from(self.validation) + u64::from(self.test)
    }

    /// Number of items out of `count` that go to train and to validation;
    /// the remainder goes to test.
    fn cut_points(&self, count: usize) -> (usize, usize) {
        let total = self.total();
        let share = |part: u32| {
            let items = count as u64 * u64::from(part) / total;
            usize::try_from(items).unwrap_or(count)
        };
        let train = share(self.train).min(count);
        let validation = share(self.validation).min(count - train);
        (train, validation)
    }
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self {
            train: 80,
            validation: 10,
            test: 10,
        }
    }
}

impl FromStr for SplitRatio {
    type Err = SplitError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SplitError::InvalidRatio {
            raw: raw.to_owned(),
        };
        let parts = raw
            .split(':')
            .map(|part| part.trim().parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        let [train, validation, test] = parts[..] else {
            return Err(invalid());
        };
        Self::new(train, validation, test)
    }
}

impl fmt::Display for SplitRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.train, self.validation, self.test)
    }
}

/// Representatives partitioned into three disjoint splits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSplit {
    /// Training representatives.
    pub train: Vec<Representative>,
    /// Validation representatives.
    pub validation: Vec<Representative>,
    /// Test representatives.
    pub test: Vec<Representative>,
}

impl DatasetSplit {
    /// Total number of representatives across all splits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    /// Returns `true` when every split is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splits paired with their conventional names.
    #[must_use]
    pub fn named(&self) -> [(&'static str, &[Representative]); 3] {
        [
            ("train", &self.train),
            ("validation", &self.validation),
            ("test", &self.test),
        ]
    }
}

/// Shuffles `representatives` with `rng` and cuts them by `ratio`.
///
/// Train receives `floor(n * train / total)` clusters, validation
/// `floor(n * validation / total)`, and test the rest. The generator is
/// consumed, so reproducing a split means passing an identically seeded one.
///
/// # Examples
/// ```
/// use genoclust_core::{GenomeClustererBuilder, SplitRatio, split_representatives};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let outcome = GenomeClustererBuilder::new()
///     .build()?
///     .run_lines((0..10).map(|n| format!("g{n}\tg{n}\t0")))?;
/// let reps = outcome.assignment.representatives();
/// let split = split_representatives(&reps, SplitRatio::default(), SmallRng::seed_from_u64(42));
/// assert_eq!((split.train.len(), split.validation.len(), split.test.len()), (8, 1, 1));
/// # Ok::<(), genoclust_core::ClusteringError>(())
/// ```
#[instrument(
    name = "core.split",
    skip(representatives, ratio, rng),
    fields(clusters = representatives.len(), ratio = %ratio),
)]
pub fn split_representatives<R: Rng>(
    representatives: &[Representative],
    ratio: SplitRatio,
    mut rng: R,
) -> DatasetSplit {
    let mut shuffled = representatives.to_vec();
    shuffled.shuffle(&mut rng);

    let (train_len, validation_len) = ratio.cut_points(shuffled.len());
    let test = shuffled.split_off(train_len + validation_len);
    let validation = shuffled.split_off(train_len);
    let split = DatasetSplit {
        train: shuffled,
        validation,
        test,
    };
    info!(
        train = split.train.len(),
        validation = split.validation.len(),
        test = split.test.len(),
        "clusters split"
    );
    split
}
