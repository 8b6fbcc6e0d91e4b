//! Performance benchmarks for rule parsing and matching

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sigma_match::{parse_rule, LogEntry, MatchOptions, RuleSet};
use std::hint::black_box;

const RULE: &str = r#"
title: Suspicious PowerShell
logsource:
  product: windows
  category: process_creation
detection:
  keywords:
    - mimikatz
    - sekurlsa
  selection_image:
    Image|endswith:
      - '\powershell.exe'
      - '\pwsh.exe'
  selection_cli:
    CommandLine|windash|contains|all:
      - '-enc'
      - '-nop'
  filter:
    ParentImage|startswith: 'C:\Program Files\'
  condition: keywords or (all of selection_* and not filter)
"#;

fn entry() -> LogEntry {
    LogEntry::new("process created")
        .with_field("Image", r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe")
        .with_field("CommandLine", "powershell.exe /nop /enc SQBFAFgA")
        .with_field("ParentImage", r"C:\Windows\explorer.exe")
}

fn benchmark_rule_parsing(c: &mut Criterion) {
    c.bench_function("rule parsing", |b| {
        b.iter(|| black_box(parse_rule(black_box(RULE)).unwrap()));
    });
}

fn benchmark_rule_matching(c: &mut Criterion) {
    let rule = parse_rule(RULE).unwrap();
    let entry = entry();
    let options = MatchOptions::default();

    // sanity check before timing
    assert!(rule.matches(&entry, &options));

    c.bench_function("rule matching (warm cache)", |b| {
        b.iter(|| black_box(rule.matches(black_box(&entry), &options)));
    });
}

fn benchmark_ruleset(c: &mut Criterion) {
    let entry = entry();
    let options = MatchOptions::default();
    let mut group = c.benchmark_group("ruleset evaluation");

    for size in [10usize, 100, 500] {
        let mut ruleset = RuleSet::new();
        for i in 0..size {
            let text = RULE.replace("Suspicious PowerShell", &format!("Rule {i}"));
            ruleset.add_rule(parse_rule(&text).unwrap());
        }
        ruleset.evaluate(&entry, &options);

        group.bench_with_input(BenchmarkId::new("sequential", size), &ruleset, |b, rs| {
            b.iter(|| black_box(rs.evaluate(&entry, &options)));
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &ruleset, |b, rs| {
            b.iter(|| black_box(rs.evaluate_parallel(&entry, &options)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_rule_parsing,
    benchmark_rule_matching,
    benchmark_ruleset
);
criterion_main!(benches);
