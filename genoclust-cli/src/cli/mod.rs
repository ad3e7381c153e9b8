//! Command-line interface for genome clustering.
//!
//! `cluster` turns a pairwise distance table into a membership file and a
//! statistics summary; `split` reads a membership file back, keeps one
//! representative per cluster, and partitions the clusters into train,
//! validation, and test sets.

mod commands;
mod membership;
mod output;

pub use commands::{
    Cli, CliError, ClusterCommand, ClusterSummary, Command, DEFAULT_SEED, ExecutionSummary,
    SplitCommand, SplitSummary, render_summary, run_cli,
};
pub use membership::{MembershipRowError, read_representatives};
pub use output::{write_cluster_table, write_membership};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
