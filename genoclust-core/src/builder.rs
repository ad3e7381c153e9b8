//! Builder utilities for configuring a clustering run.
//!
//! Validates the merge threshold before constructing [`GenomeClusterer`]
//! instances.

use crate::{Result, clusterer::GenomeClusterer, error::ClusteringError};

/// Distance threshold used when none is configured; roughly 95% ANI for
/// MASH distances.
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Configures and constructs [`GenomeClusterer`] instances.
///
/// # Examples
/// ```
/// use genoclust_core::GenomeClustererBuilder;
///
/// let clusterer = GenomeClustererBuilder::new()
///     .with_threshold(0.01)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(clusterer.threshold(), 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct GenomeClustererBuilder {
    threshold: f64,
}

impl Default for GenomeClustererBuilder {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl GenomeClustererBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use genoclust_core::{DEFAULT_THRESHOLD, GenomeClustererBuilder};
    ///
    /// assert_eq!(GenomeClustererBuilder::new().threshold(), DEFAULT_THRESHOLD);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the merge threshold: edges with `distance <= threshold`
    /// join their genomes' clusters.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns the configured threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Validates the configuration and constructs a [`GenomeClusterer`].
    ///
    /// # Errors
    /// Returns [`ClusteringError::InvalidThreshold`] when the threshold is
    /// negative, infinite, or NaN.
    ///
    /// # Examples
    /// ```
    /// use genoclust_core::{ClusteringError, GenomeClustererBuilder};
    ///
    /// let err = GenomeClustererBuilder::new().with_threshold(-0.1).build().unwrap_err();
    /// assert!(matches!(err, ClusteringError::InvalidThreshold { .. }));
    /// ```
    pub fn build(self) -> Result<GenomeClusterer> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ClusteringError::InvalidThreshold {
                got: self.threshold,
            });
        }
        Ok(GenomeClusterer::new(self.threshold))
    }
}
