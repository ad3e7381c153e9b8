//! Shared test utilities for `genoclust-core`.

use genoclust_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{ClusteringOutcome, GenomeClustererBuilder};

/// Builds a standard proptest configuration from the shared CI profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Clusters `lines` at `threshold`, panicking on configuration errors.
pub(crate) fn cluster_lines<S: AsRef<str>>(threshold: f64, lines: &[S]) -> ClusteringOutcome {
    GenomeClustererBuilder::new()
        .with_threshold(threshold)
        .build()
        .expect("test threshold must be valid")
        .run_lines(lines.iter().map(AsRef::as_ref))
        .expect("clustering must succeed")
}
