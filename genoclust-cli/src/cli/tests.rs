//! Unit tests for the CLI commands and file round trips.

use super::commands::{run_cluster, run_split};
use super::test_helpers::{
    cluster_command, read_lines, run_cli_expecting_error, split_command, temp_dir, write_table,
    write_text,
};
use super::{Cli, CliError, Command, ExecutionSummary, MembershipRowError, render_summary};

use std::collections::BTreeSet;
use std::fs;

use clap::Parser;
use genoclust_core::{ClusteringError, SplitRatio};
use genoclust_test_support::fixtures::DistanceTable;
use genoclust_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn mixed_table() -> DistanceTable {
    DistanceTable::mash_header()
        .edge("refs/A.fa", "B.fa", 0.01)
        .edge("B.fa", "C.fna", 0.01)
        .edge("D", "E", 0.9)
        .raw("broken")
}

#[rstest]
fn cluster_writes_membership_and_cluster_table() -> TestResult {
    let dir = temp_dir();
    let input = write_table(&dir, "distances.tsv", &mixed_table())?;
    let output = dir.path().join("clusters.tsv");
    let table = dir.path().join("cluster_stats.tsv");
    let mut command = cluster_command(input, output.clone(), 0.05);
    command.stats = Some(table.clone());

    let summary = run_cluster(command)?;

    assert_eq!(
        read_lines(&output)?,
        [
            "genome\tcluster_id\tcluster_size",
            "A\t0\t3",
            "B\t0\t3",
            "C\t0\t3",
            "D\t1\t1",
            "E\t2\t1",
        ]
    );
    assert_eq!(
        read_lines(&table)?,
        [
            "cluster_id\tsize\trepresentative",
            "0\t3\tA",
            "1\t1\tD",
            "2\t1\tE",
        ]
    );
    assert_eq!(summary.edges.total_edges, 3);
    assert_eq!(summary.edges.edges_below_threshold, 2);
    assert_eq!(summary.skipped_lines, 1);
    assert_eq!(summary.statistics.clusters, 3);
    assert_eq!(summary.stats_output, Some(table));
    Ok(())
}

#[rstest]
#[case(-1.0)]
#[case(f64::NAN)]
fn cluster_rejects_invalid_threshold(#[case] threshold: f64) -> TestResult {
    let dir = temp_dir();
    let input = write_table(&dir, "distances.tsv", &mixed_table())?;
    let err = run_cli_expecting_error(
        Command::Cluster(cluster_command(input, dir.path().join("out.tsv"), threshold)),
        "invalid threshold must fail",
    );
    assert!(matches!(
        err,
        CliError::Core(ClusteringError::InvalidThreshold { .. })
    ));
    assert_eq!(err.code(), Some("GENOCLUST_INVALID_THRESHOLD"));
    assert!(!dir.path().join("out.tsv").exists());
    Ok(())
}

#[rstest]
fn cluster_reports_missing_input() {
    let dir = temp_dir();
    let err = run_cli_expecting_error(
        Command::Cluster(cluster_command(
            dir.path().join("missing.tsv"),
            dir.path().join("out.tsv"),
            0.05,
        )),
        "missing input must fail",
    );
    match err {
        CliError::Io { path, .. } => assert!(path.ends_with("missing.tsv")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn cluster_leaves_no_membership_when_table_cannot_be_written() -> TestResult {
    let dir = temp_dir();
    let input = write_table(&dir, "distances.tsv", &mixed_table())?;
    let output = dir.path().join("clusters.tsv");
    let mut command = cluster_command(input, output.clone(), 0.05);
    command.stats = Some(dir.path().join("missing").join("cluster_stats.tsv"));

    let err = run_cli_expecting_error(
        Command::Cluster(command),
        "unwritable cluster table must fail",
    );
    match err {
        CliError::Io { path, .. } => assert!(path.ends_with("cluster_stats.tsv")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!output.exists());
    let leftovers: Vec<_> = fs::read_dir(dir.path())?
        .map(|entry| entry.map(|entry| entry.file_name()))
        .collect::<Result<_, _>>()?;
    assert_eq!(leftovers, ["distances.tsv"]);
    Ok(())
}

#[rstest]
fn cluster_replaces_an_existing_membership_file() -> TestResult {
    let dir = temp_dir();
    let input = write_table(&dir, "distances.tsv", &mixed_table())?;
    let output = write_text(&dir, "clusters.tsv", "stale\n")?;

    run_cluster(cluster_command(input, output.clone(), 0.05))?;

    let lines = read_lines(&output)?;
    assert_eq!(lines.first().map(String::as_str), Some("genome\tcluster_id\tcluster_size"));
    assert!(!dir.path().join("clusters.tsv.partial").exists());
    Ok(())
}

#[rstest]
fn split_partitions_clusters_reproducibly() -> TestResult {
    let dir = temp_dir();
    let table = (0..10).fold(DistanceTable::mash_header(), |table, n| {
        table.edge(&format!("g{n}"), &format!("g{n}"), 0.0)
    });
    let input = write_table(&dir, "distances.tsv", &table)?;
    let membership = dir.path().join("clusters.tsv");
    run_cluster(cluster_command(input, membership.clone(), 0.05))?;

    let first_dir = dir.path().join("first");
    let summary = run_split(split_command(membership.clone(), first_dir.clone(), 7))?;
    assert_eq!(
        (summary.train, summary.validation, summary.test),
        (8, 1, 1)
    );
    assert_eq!(summary.clusters, 10);
    assert_eq!(summary.genomes, 10);

    let all = read_lines(&first_dir.join("all_representatives.txt"))?;
    let unique: BTreeSet<&String> = all.iter().collect();
    assert_eq!(all.len(), 10);
    assert_eq!(unique.len(), 10);

    let mut recombined = Vec::new();
    for name in ["train", "validation", "test"] {
        recombined.extend(read_lines(&first_dir.join(format!("{name}_accessions.txt")))?);
        let with_clusters = read_lines(&first_dir.join(format!("{name}_with_clusters.tsv")))?;
        assert_eq!(with_clusters.first().map(String::as_str), Some("accession\tcluster"));
    }
    assert_eq!(recombined, all);

    let second_dir = dir.path().join("second");
    run_split(split_command(membership, second_dir.clone(), 7))?;
    assert_eq!(
        fs::read_to_string(first_dir.join("train_accessions.txt"))?,
        fs::read_to_string(second_dir.join("train_accessions.txt"))?
    );

    let report = read_lines(&first_dir.join("summary.txt"))?;
    assert_eq!(report.first().map(String::as_str), Some("Cluster Representatives Dataset"));
    assert!(report.iter().any(|line| line == "Split ratio: 80:10:10"));
    assert!(report.iter().any(|line| line == "Seed: 7"));
    Ok(())
}

#[rstest]
fn split_keeps_only_the_smallest_genome_per_cluster() -> TestResult {
    let dir = temp_dir();
    let input = write_table(
        &dir,
        "distances.tsv",
        &DistanceTable::new().edge("B", "A", 0.0).edge("C", "C", 0.0),
    )?;
    let membership = dir.path().join("clusters.tsv");
    run_cluster(cluster_command(input, membership.clone(), 0.05))?;

    let out = dir.path().join("split");
    run_split(split_command(membership, out.clone(), 42))?;
    let with_clusters: BTreeSet<String> = ["train", "validation", "test"]
        .iter()
        .map(|name| read_lines(&out.join(format!("{name}_with_clusters.tsv"))))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flat_map(|lines| lines.into_iter().skip(1))
        .collect();
    assert_eq!(
        with_clusters,
        BTreeSet::from(["A\t0".to_owned(), "C\t1".to_owned()])
    );
    Ok(())
}

#[rstest]
fn split_rejects_malformed_membership_rows() -> TestResult {
    let dir = temp_dir();
    let membership = write_text(
        &dir,
        "clusters.tsv",
        "genome\tcluster_id\tcluster_size\nA\t0\t1\nB\tzero\t1\n",
    )?;
    let err = run_cli_expecting_error(
        Command::Split(split_command(membership, dir.path().join("out"), 42)),
        "malformed membership must fail",
    );
    match err {
        CliError::Membership { line, reason, .. } => {
            assert_eq!(line, 3);
            assert_eq!(
                reason,
                MembershipRowError::BadClusterId {
                    token: "zero".into()
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("out").exists());
    Ok(())
}

#[rstest]
fn clap_applies_defaults() -> TestResult {
    let cluster = Cli::try_parse_from(["genoclust", "cluster", "in.tsv", "--output", "out.tsv"])?;
    match cluster.command {
        Command::Cluster(command) => {
            assert!((command.threshold - 0.05).abs() < f64::EPSILON);
            assert!(command.stats.is_none());
        }
        Command::Split(_) => panic!("expected cluster command"),
    }

    let split = Cli::try_parse_from(["genoclust", "split", "clusters.tsv", "-o", "out"])?;
    match split.command {
        Command::Split(command) => {
            assert_eq!(command.split_ratio, SplitRatio::default());
            assert_eq!(command.seed, 42);
        }
        Command::Cluster(_) => panic!("expected split command"),
    }
    Ok(())
}

#[rstest]
#[case("80:20")]
#[case("0:0:0")]
#[case("a:b:c")]
fn clap_rejects_bad_split_ratio(#[case] ratio: &str) {
    let args = [
        "genoclust",
        "split",
        "clusters.tsv",
        "--output-dir",
        "out",
        "--split-ratio",
        ratio,
    ];
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn render_summary_reports_cluster_statistics() -> TestResult {
    let dir = temp_dir();
    let input = write_table(&dir, "distances.tsv", &mixed_table())?;
    let summary = run_cluster(cluster_command(input, dir.path().join("out.tsv"), 0.05))?;

    let mut buffer = Vec::new();
    render_summary(&ExecutionSummary::Cluster(summary), &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    for expected in [
        "genomes: 5",
        "pairwise comparisons: 3",
        "pairs below threshold: 2",
        "skipped lines: 1",
        "clusters: 3",
        "singletons: 2",
        "largest cluster: 3",
        "mean cluster size: 1.67",
        "  1\t2",
        "  3\t1",
    ] {
        assert!(text.lines().any(|line| line == expected), "missing `{expected}` in:\n{text}");
    }
    assert!(!text.contains("cluster table:"));
    Ok(())
}

#[rstest]
fn run_cli_emits_tracing_fields() -> TestResult {
    let dir = temp_dir();
    let input = write_table(&dir, "distances.tsv", &mixed_table())?;
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let cli = Cli {
        command: Command::Cluster(cluster_command(input, dir.path().join("out.tsv"), 0.05)),
    };
    tracing::subscriber::with_default(subscriber, || super::run_cli(cli))?;

    let run = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(run.fields.get("command"), Some(&"cluster".to_owned()));
    let cluster = layer.span("cli.cluster").expect("cli.cluster span must exist");
    assert_eq!(cluster.fields.get("threshold"), Some(&"0.05".to_owned()));
    assert!(
        cluster
            .fields
            .get("input")
            .is_some_and(|value| value.ends_with("distances.tsv"))
    );
    assert!(layer.span("core.run").is_some());

    let completed = layer.events_with_message("command completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].level, Level::INFO);
    assert_eq!(completed[0].fields.get("genomes"), Some(&"5".to_owned()));
    Ok(())
}

#[rstest]
fn open_failure_is_recorded_on_the_reader_span() {
    let dir = temp_dir();
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let command = split_command(dir.path().join("absent.tsv"), dir.path().join("out"), 42);

    let result = tracing::subscriber::with_default(subscriber, || run_split(command));
    assert!(matches!(result, Err(CliError::Io { .. })));

    let reader = layer
        .span("cli.open_reader")
        .expect("reader span must exist");
    assert!(
        reader
            .fields
            .get("path")
            .is_some_and(|value| value.contains("absent.tsv"))
    );
    assert!(layer.events().iter().any(|event| event.level == Level::ERROR));
}
