use assert_cmd::prelude::*;
use lancet::{EdgeDir, Node};
use lazy_static::lazy_static;
use predicates::prelude::*;
use predicates::str::{contains, starts_with};
use regex::Regex;
use std::process::Command;

const FATAL_CASE_VAR: &str = "LANCET_FATAL_CASE";

lazy_static! {
    static ref SOMATIC_FETS_REGEX: Regex =
        Regex::new("chr1\t100\t.*\tSOMATIC;FETS=(.+?);TYPE=snv\t").unwrap();
}

fn records(stdout: &[u8]) -> Vec<String> {
    String::from_utf8(stdout.to_vec())
        .unwrap()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

#[test]
fn cli_no_args() {
    Command::cargo_bin("lancet").unwrap().assert().failure();
}

#[test]
fn cli_no_such_file() {
    Command::cargo_bin("lancet")
        .unwrap()
        .args(&["tests/no_such_file.tsv"])
        .assert()
        .failure()
        .stderr(contains("InputError"));
}

#[test]
fn cli_malformed_table() {
    Command::cargo_bin("lancet")
        .unwrap()
        .args(&["tests/input/malformed.tsv"])
        .assert()
        .failure()
        .stderr(contains("ParseRecord"));
}

#[test]
fn cli_header() {
    Command::cargo_bin("lancet")
        .unwrap()
        .args(&["tests/input/candidates.tsv"])
        .assert()
        .success()
        .stdout(starts_with("##fileformat=VCFv4.1"))
        .stdout(contains("##FILTER=<ID=LowCovNormal,"))
        .stdout(contains("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNORMAL\tTUMOR"));
}

#[test]
fn cli_candidates() {
    let output = Command::cargo_bin("lancet")
        .unwrap()
        .args(&["tests/input/candidates.tsv"])
        .unwrap()
        .stdout;
    let records = records(&output);

    assert_eq!(records.len(), 3);
    assert!(records[0].starts_with("chr1\t40\t"));
    assert!(records[0].contains(
        "\tLowFisherScore;LowCovNormal;HighVafNormal;HighAltCntNormal;StrandBias\tSHARED;"
    ));
    assert!(records[1].starts_with("chr1\t100\t.\tA\tG\t"));
    assert!(records[1].contains("\tPASS\tSOMATIC;FETS="));
    assert!(records[1].ends_with("\tGT:AD:SC:DP\t0/0:20,0:0,0:20\t0/1:15,5:3,2:20"));
    assert!(records[2].starts_with("chr2\t5\t.\tG\tGTTT\t"));
    assert!(records[2].contains("\tPASS\tSOMATIC;"));
}

#[test]
fn cli_somatic_score() {
    let output = Command::cargo_bin("lancet")
        .unwrap()
        .args(&["-t", "2", "tests/input/candidates.tsv"])
        .unwrap()
        .stdout;
    if let Some(captures) = SOMATIC_FETS_REGEX.captures(&String::from_utf8(output).unwrap()) {
        let score = captures.get(1).unwrap().as_str().parse::<f64>().unwrap();
        assert!(score > 13.0 && score < 13.5);
    } else {
        panic!("No somatic chr1:100 record in output")
    }
}

#[test]
fn cli_gzipped_table() {
    let plain = Command::cargo_bin("lancet")
        .unwrap()
        .args(&["tests/input/candidates.tsv"])
        .unwrap()
        .stdout;
    let gzipped = Command::cargo_bin("lancet")
        .unwrap()
        .args(&["tests/input/candidates.tsv.gz"])
        .unwrap()
        .stdout;
    assert_eq!(plain, gzipped);
}

#[test]
fn cli_thresholds() {
    Command::cargo_bin("lancet")
        .unwrap()
        .args(&["--min-cov-normal", "100", "tests/input/candidates.tsv"])
        .assert()
        .success()
        .stdout(contains("\tPASS\t").not())
        .stdout(contains("(<100)"))
        .stdout(contains("\tLowCovNormal\tSOMATIC;").count(2));
}

#[test]
fn cli_oversized_counts() {
    Command::cargo_bin("lancet")
        .unwrap()
        .args(&["tests/input/oversized.tsv"])
        .assert()
        .failure()
        .stderr(contains("CountOverflow"))
        .stderr(contains("chr1:100:S:1:A:G"));
}

// Runs a fatal node operation when re-executed by the tests below.
#[test]
fn fatal_node_operation() {
    let case = match std::env::var(FATAL_CASE_VAR) {
        Ok(case) => case,
        Err(_) => return,
    };
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Error)
        .init();

    let mut node = Node::new(b"ACGTA".to_vec(), b"ACGTA".to_vec());
    node.add_edge(b"AAAAA", EdgeDir::FF, Some(1));
    node.add_edge(b"CCCCC", EdgeDir::RF, None);
    match case.as_str() {
        "remove" => node.remove_edge(b"TTTTT", EdgeDir::FF),
        "update" => node.update_edge(b"GGGGG", EdgeDir::RR, b"TTTTT", EdgeDir::FF),
        "rev_reads" => Node::sink().rev_reads(),
        _ => return,
    }
    panic!("{} returned instead of exiting", case);
}

fn run_fatal(case: &str) -> assert_cmd::assert::Assert {
    Command::new(std::env::current_exe().unwrap())
        .args(&["fatal_node_operation", "--exact", "--nocapture"])
        .env(FATAL_CASE_VAR, case)
        .assert()
}

#[test]
fn node_remove_missing_edge_exits() {
    run_fatal("remove")
        .failure()
        .code(1)
        .stderr(contains("Error removing edge"))
        .stderr(contains("FF:TTTTT"));
}

#[test]
fn node_update_missing_edge_dumps_node() {
    run_fatal("update")
        .failure()
        .code(1)
        .stderr(contains("RR:GGGGG"))
        .stderr(contains("Wanted to replace with FF:TTTTT"))
        .stderr(contains(
            "ACGTA\t*s\tACGTA\t*c\t0\t*c\t0\t*r\t0\tFF:AAAAA\tRF:CCCCC",
        ));
}

#[test]
fn node_rev_reads_on_sink_exits() {
    run_fatal("rev_reads")
        .failure()
        .code(1)
        .stderr(contains("source/sink node SINK"));
}
