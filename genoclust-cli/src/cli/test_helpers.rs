//! Small helpers shared across CLI tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genoclust_test_support::fixtures::DistanceTable;
use tempfile::TempDir;

use super::{Cli, CliError, ClusterCommand, Command, SplitCommand, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_table(dir: &TempDir, name: &str, table: &DistanceTable) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    table.write_to(&path)?;
    Ok(path)
}

pub(super) fn write_text(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?.lines().map(str::to_owned).collect())
}

pub(super) fn cluster_command(input: PathBuf, output: PathBuf, threshold: f64) -> ClusterCommand {
    ClusterCommand {
        input,
        output,
        threshold,
        stats: None,
    }
}

pub(super) fn split_command(membership: PathBuf, output_dir: PathBuf, seed: u64) -> SplitCommand {
    SplitCommand {
        membership,
        output_dir,
        split_ratio: genoclust_core::SplitRatio::default(),
        seed,
    }
}

pub(super) fn run_cli_expecting_error(command: Command, panic_msg: &str) -> CliError {
    match run_cli(Cli { command }) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
