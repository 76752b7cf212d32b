#![forbid(unsafe_code)]
//! hopcut: contract pass-through hops out of directed edge lists.
//!
//! Reads `origin\tdestination` records from stdin or `--input`, runs the
//! path contraction to a fixed point, and writes the surviving edges to
//! stdout or `--output` in insertion-rank order. Logs go to stderr so the
//! record stream stays clean.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use hopcut_core::{ContractionStats, Contractor, tsv};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Contract pass-through hops out of directed edge lists",
    long_about = None
)]
struct Cli {
    /// Read records from this file instead of stdin.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write surviving edges to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Fail on the first malformed or self-loop record instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Print a contraction summary to stderr after the run.
    #[arg(long)]
    stats: bool,

    /// Emit the --stats summary as JSON.
    #[arg(long, requires = "stats")]
    json: bool,

    /// Enable debug logging (HOPCUT_LOG overrides).
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors (HOPCUT_LOG overrides).
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Per-run summary printed by `--stats`.
#[derive(Debug, Serialize)]
struct RunSummary {
    records_read: usize,
    records_skipped: usize,
    edges_emitted: usize,
    #[serde(flatten)]
    contraction: ContractionStats,
}

fn init_tracing(cli: &Cli) {
    let fallback = if cli.verbose {
        "hopcut=debug,info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("HOPCUT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

/// Feed records from `reader` into the contractor.
///
/// Blank lines are skipped silently. Malformed and self-loop records are
/// skipped with a warning, or abort the run under `--strict` — in which
/// case nothing has been written to the output yet.
///
/// Returns `(records_read, records_skipped)`.
fn load_edges(
    reader: impl BufRead,
    strict: bool,
    contractor: &mut Contractor,
) -> anyhow::Result<(usize, usize)> {
    let mut read = 0usize;
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("read input record")?;
        let line_no = idx + 1;

        if line.trim().is_empty() {
            debug!(line_no, "skipping blank line");
            continue;
        }
        read += 1;

        let (origin, destination) = match tsv::parse_record(&line) {
            Ok(pair) => pair,
            Err(err) => {
                if strict {
                    bail!("line {line_no}: {err}");
                }
                warn!(line_no, %err, "skipping malformed record");
                skipped += 1;
                continue;
            }
        };

        if let Err(err) = contractor.add_edge(&origin, &destination) {
            if strict {
                bail!("line {line_no}: {err}");
            }
            warn!(line_no, %err, "skipping self-loop record");
            skipped += 1;
        }
    }

    Ok((read, skipped))
}

fn write_edges(mut writer: impl Write, edges: &[(String, String)]) -> anyhow::Result<()> {
    for (origin, destination) in edges {
        writeln!(writer, "{}", tsv::write_record(origin, destination))
            .context("write output record")?;
    }
    writer.flush().context("flush output")
}

fn print_summary(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    let mut err = io::stderr().lock();
    if json {
        serde_json::to_writer(&mut err, summary).context("serialize stats summary")?;
        writeln!(err)?;
    } else {
        writeln!(
            err,
            "records: {} read, {} skipped",
            summary.records_read, summary.records_skipped
        )?;
        writeln!(
            err,
            "removed: {} pass-throughs, {} orphans",
            summary.contraction.pass_throughs_contracted, summary.contraction.orphans_removed
        )?;
        writeln!(
            err,
            "edges: {} created, {} absorbed, {} emitted",
            summary.contraction.edges_created,
            summary.contraction.edges_absorbed,
            summary.edges_emitted
        )?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut contractor = Contractor::new();
    let (records_read, records_skipped) = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open input file {}", path.display()))?;
            load_edges(BufReader::new(file), cli.strict, &mut contractor)?
        }
        None => load_edges(io::stdin().lock(), cli.strict, &mut contractor)?,
    };

    let contraction = contractor.run();
    let edges = contractor.into_sorted_edges();
    let summary = RunSummary {
        records_read,
        records_skipped,
        edges_emitted: edges.len(),
        contraction,
    };

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            write_edges(BufWriter::new(file), &edges)?;
        }
        None => write_edges(BufWriter::new(io::stdout().lock()), &edges)?,
    }

    if cli.stats {
        print_summary(&summary, cli.json)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags() {
        let cli = Cli::parse_from(["hopcut"]);
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.strict);
        assert!(!cli.stats);
        assert!(!cli.json);
    }

    #[test]
    fn input_output_flags_parse() {
        let cli = Cli::parse_from(["hopcut", "-i", "edges.tsv", "-o", "out.tsv"]);
        assert_eq!(cli.input.as_deref(), Some(std::path::Path::new("edges.tsv")));
        assert_eq!(cli.output.as_deref(), Some(std::path::Path::new("out.tsv")));
    }

    #[test]
    fn json_requires_stats() {
        assert!(Cli::try_parse_from(["hopcut", "--json"]).is_err());
        assert!(Cli::try_parse_from(["hopcut", "--stats", "--json"]).is_ok());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["hopcut", "-v", "-q"]).is_err());
    }

    #[test]
    fn load_edges_skips_bad_records_by_default() {
        let input = "a\tb\n\nmalformed\nc\tc\nb\tc\n";
        let mut contractor = Contractor::new();
        let (read, skipped) =
            load_edges(input.as_bytes(), false, &mut contractor).expect("lenient load");

        assert_eq!(read, 4, "blank line is not a record");
        assert_eq!(skipped, 2, "malformed + self-loop");
        assert_eq!(contractor.graph().edge_count(), 2);
    }

    #[test]
    fn load_edges_strict_fails_on_self_loop() {
        let input = "a\tb\nc\tc\n";
        let mut contractor = Contractor::new();
        let err = load_edges(input.as_bytes(), true, &mut contractor)
            .expect_err("strict load must fail");

        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn write_edges_emits_one_record_per_line() {
        let edges = vec![
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string()),
        ];
        let mut out = Vec::new();
        write_edges(&mut out, &edges).expect("write");

        assert_eq!(String::from_utf8(out).expect("utf8"), "a\tb\nb\tc\n");
    }
}
