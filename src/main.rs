use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use sigma_match::{LogEntry, MatchOptions, RuleMatch, RuleSetBuilder};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "sigma-match")]
#[command(about = "Evaluate Sigma rules against NDJSON log entries read from stdin", long_about = None)]
struct Cli {
    /// Rule file or directory (repeatable)
    #[arg(short, long, required = true)]
    rules: Vec<PathBuf>,

    /// Placeholder values for `expand`, as name=value1,value2 (repeatable)
    #[arg(short, long, value_name = "NAME=VALUES")]
    placeholder: Vec<String>,

    /// Abort when a rule fails to parse instead of skipping it
    #[arg(long)]
    fail_on_parse_error: bool,

    /// Evaluate rules on all cores
    #[arg(long)]
    parallel: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    line: usize,
    #[serde(flatten)]
    rule: &'a RuleMatch,
}

fn parse_placeholders(args: &[String]) -> anyhow::Result<MatchOptions> {
    let mut options = MatchOptions::new();
    for arg in args {
        let Some((name, values)) = arg.split_once('=') else {
            bail!("placeholder {arg:?} is not of the form name=value1,value2");
        };
        if name.is_empty() {
            bail!("placeholder {arg:?} has an empty name");
        }
        let values: Vec<&str> = if values.is_empty() {
            Vec::new()
        } else {
            values.split(',').collect()
        };
        options = options.with_placeholder(name, values);
    }
    Ok(options)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(io::stderr)
            .init();
    }

    let options = parse_placeholders(&cli.placeholder)?;

    let builder = cli
        .rules
        .iter()
        .fold(RuleSetBuilder::new(), |b, path| b.add_rule_path(path))
        .fail_on_parse_error(cli.fail_on_parse_error);
    let ruleset = builder.build().context("failed to load rules")?;

    info!(
        rules = ruleset.len(),
        skipped = ruleset.errors().len(),
        "loaded rules"
    );

    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout().lock());
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;

        let entry: LogEntry = serde_json::from_str(&line)
            .with_context(|| format!("line {line_number}: invalid log entry"))?;

        let matches = if cli.parallel {
            ruleset.evaluate_parallel(&entry, &options)
        } else {
            ruleset.evaluate(&entry, &options)
        };

        for rule in &matches {
            serde_json::to_writer(&mut out, &Output { line: line_number, rule })?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;

    Ok(())
}
