use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn regcmd() -> Command {
    Command::cargo_bin("regcmd").unwrap()
}

#[test]
fn test_tokenize_joins_quoted_spans() {
    regcmd()
        .args(["tokenize", "say", "\"hello", "big", "world\"", "now"])
        .assert()
        .success()
        .stdout("say\nhello big world\nnow\n");
}

#[test]
fn test_tokenize_unterminated_quote_falls_back() {
    regcmd()
        .args(["tokenize", "a", "\"b", "c"])
        .assert()
        .success()
        .stdout("a\n\"b\nc\n");
}

#[test]
fn test_match_prints_converted_values() {
    regcmd()
        .args([
            "match",
            "--slot",
            "literal:give",
            "--slot",
            "fixed:[a-z]+",
            "--slot",
            "fixed:[0-9]+:int",
            "--",
            "give",
            "steve",
            "64",
        ])
        .assert()
        .success()
        .stdout("give\nsteve\n64\n");
}

#[test]
fn test_match_fills_optional_default() {
    regcmd()
        .args(["match", "-s", "fixed:[a-z]+", "-s", "optional:[0-9]+:int:1", "--", "steve"])
        .assert()
        .success()
        .stdout("steve\n1\n");
}

#[test]
fn test_match_conversion_failure() {
    regcmd()
        .args(["match", "-s", "fixed:[0-9]+:int", "--", "99999999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The provided value '99999999999' cannot be converted to an Integer.",
        ));
}

#[test]
fn test_match_big_integer() {
    regcmd()
        .args(["match", "-s", "fixed:[0-9]+:bigint", "--", "123456789012345678901234567890"])
        .assert()
        .success()
        .stdout("123456789012345678901234567890\n");
}

#[test]
fn test_match_short_overflow() {
    regcmd()
        .args(["match", "-s", "fixed:[0-9]+:short", "--", "40000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The provided value '40000' cannot be converted to a Short.",
        ));
}

#[test]
fn test_match_no_match_prints_usage() {
    regcmd()
        .args(["match", "--name", "give", "-s", "literal:give", "-s", "fixed:[0-9]+:int", "--", "take", "5"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage for /give (1/1):"))
        .stdout(predicate::str::contains("/give [give] [int]"));
}

#[test]
fn test_match_rejects_bad_slot_spec() {
    regcmd()
        .args(["match", "-s", "fixed:[0-9]+:complex", "--", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown converter 'complex'"));
}

#[test]
fn test_complete_filters_by_prefix() {
    regcmd()
        .args([
            "complete",
            "-s",
            "literal:give",
            "-s",
            "fixed:[a-z]+:string:steve,alex,stan",
            "--",
            "give",
            "st",
        ])
        .assert()
        .success()
        .stdout("steve\nstan\n");
}

#[test]
fn test_render_segments() {
    regcmd()
        .args(["render", "plain >red|bold{warning} text"])
        .assert()
        .success()
        .stdout("\"plain \"\n\"warning\" [red, bold]\n\" text\"\n");
}

#[test]
fn test_render_plain() {
    regcmd()
        .args(["render", "--plain", "a >gold{b} c"])
        .assert()
        .success()
        .stdout("a b c\n");
}

#[test]
fn test_render_malformed_markup() {
    regcmd()
        .args(["render", ">nope{x}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown formatter 'nope'"));
}

#[test]
fn test_render_without_builtins() {
    regcmd()
        .args(["render", "--no-builtins", ">red{x}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown formatter 'red'"));
}

#[test]
fn test_render_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, ">url{{example.org}} and >italicize{{more}}").unwrap();

    regcmd()
        .args(["render", "--plain", "--file"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("example.org and more\n");
}

#[test]
fn test_render_missing_file() {
    regcmd()
        .args(["render", "--file", "/nonexistent/markup.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read markup"));
}
