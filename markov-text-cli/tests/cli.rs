use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
    tempfile::tempdir().expect("create tempdir")
}

fn markov_text() -> Command {
    Command::cargo_bin("markov-text").expect("binary exists")
}

fn stdout_lines(cmd: &mut Command) -> Vec<String> {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output)
        .expect("stdout is utf-8")
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn generates_from_corpus_file() {
    let workspace = temp_workspace();
    let corpus = workspace.path().join("corpus.txt");
    fs::write(&corpus, "the cat sat on the mat\nand the cat ran\n").expect("write corpus");

    let lines = stdout_lines(markov_text().args([
        "-q",
        corpus.to_str().unwrap(),
        "--max-length",
        "6",
        "--count",
        "3",
        "--rng-seed",
        "4",
    ]));

    assert_eq!(lines.len(), 3);
    for line in lines {
        let len = line.split(' ').count();
        assert!((1..=6).contains(&len), "line '{line}' too long");
    }
}

#[test]
fn rng_seed_makes_output_reproducible() {
    let args = ["-q", "--text", "a b c a d b a c d a", "-n", "12", "-c", "4", "--rng-seed", "77"];
    let first = stdout_lines(markov_text().args(args));
    let second = stdout_lines(markov_text().args(args));
    assert_eq!(first, second);
}

#[test]
fn seed_term_starts_every_line() {
    let lines = stdout_lines(markov_text().args([
        "-q", "--text", "a b a c", "--seed-term", "a", "-n", "3", "-c", "10",
    ]));
    for line in lines {
        assert!(line == "a b a" || line == "a c", "unexpected line '{line}'");
    }
}

#[test]
fn reseed_fills_every_line() {
    let lines = stdout_lines(markov_text().args([
        "-q", "--text", "a b a c", "--dead-end", "reseed", "-n", "7", "-c", "5",
    ]));
    for line in lines {
        assert_eq!(line.split(' ').count(), 7);
    }
}

#[test]
fn unknown_seed_fails() {
    markov_text()
        .args(["-q", "--text", "a b a c", "--seed-term", "zzz_never_seen"])
        .assert()
        .failure();
}

#[test]
fn zero_length_fails() {
    markov_text()
        .args(["-q", "--text", "a b a c", "--max-length", "0"])
        .assert()
        .failure();
}

#[test]
fn empty_corpus_policies() {
    let lines = stdout_lines(markov_text().args(["-q", "--text", "   "]));
    assert_eq!(lines, [""]);

    markov_text()
        .args(["-q", "--text", "   ", "--empty-model", "fail"])
        .assert()
        .failure();
}

#[test]
fn dumps_transition_table() {
    let output = markov_text()
        .args(["-q", "--text", "a b a c", "--table"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let table: Value = serde_json::from_slice(&output).expect("table is valid JSON");
    assert_eq!(table["a"], serde_json::json!(["b", "c"]));
    assert_eq!(table["b"], serde_json::json!(["a"]));
    assert_eq!(table["c"], serde_json::json!([]));
}

#[test]
fn missing_corpus_file_fails() {
    let workspace = temp_workspace();
    markov_text()
        .arg(workspace.path().join("missing.txt"))
        .assert()
        .failure();
}
