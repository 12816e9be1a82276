use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

type StdResult = Result<(), Box<dyn std::error::Error>>;

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents).unwrap();
    path
}

#[test]
fn reports_phrase_count_for_abracadabra() -> StdResult {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir, "abracadabra.txt", b"abracadabra$");
    Command::cargo_bin("lz77")?
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total number of LZ77 phrases = 8"));
    Ok(())
}

#[test]
fn v2_flag_is_accepted_and_reports_a_count() -> StdResult {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir, "abcabc.txt", b"abcabcabc$");
    Command::cargo_bin("lz77")?
        .arg("--v2")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total number of LZ77 phrases"));
    Ok(())
}

#[test]
fn print_parse_emits_phrase_and_token_lines() -> StdResult {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir, "abab.txt", b"abab$");
    Command::cargo_bin("lz77")?
        .arg("--print-parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total number of LZ77 phrases = 4"))
        .stdout(predicate::str::contains("<-,"));
    Ok(())
}

#[test]
fn progress_period_emits_scheduled_lines() -> StdResult {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir, "aaaaaa.txt", b"aaaaaa$");
    Command::cargo_bin("lz77")?
        .arg("--p")
        .arg("3")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("3\t2"))
        .stdout(predicate::str::contains("6\t3"))
        .stdout(predicate::str::contains("Total number of LZ77 phrases = 4"));
    Ok(())
}

#[test]
fn empty_file_is_a_fatal_error() -> StdResult {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir, "empty.txt", b"");
    Command::cargo_bin("lz77")?
        .arg(&path)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn missing_path_is_a_fatal_error() -> StdResult {
    Command::cargo_bin("lz77")?
        .arg("/nonexistent/path/does-not-exist.txt")
        .assert()
        .failure();
    Ok(())
}
