//! End-to-end CLI integration tests for the `finder` binary.
//!
//! Each test creates its own temporary directory with a small set of notes
//! and exercises the `finder` binary as a subprocess via `assert_cmd`.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a `Command` targeting the cargo-built `finder` binary, isolated from
/// the caller's finder environment.
fn finder() -> Command {
    let mut cmd = Command::cargo_bin("finder").unwrap();
    cmd.env_remove("FINDER_DIR")
        .env_remove("FINDER_LOG")
        .env_remove("FINDER_MODE")
        .env_remove("FINDER_EXTENSIONS")
        .env_remove("FINDER_UNIQUE")
        .env_remove("FINDER_STRICT")
        .env_remove("FINDER_RESULT_LIMIT")
        .env_remove("FINDER_SNIPPET_LENGTH")
        .env("NO_COLOR", "1");
    cmd
}

/// A temp directory holding a few notes in `notes/`.
fn notes_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let notes = tmp.path().join("notes");
    fs::create_dir_all(&notes).unwrap();
    fs::write(
        notes.join("a.txt"),
        "The quick brown fox\njumps over the lazy dog\n  The fox is quick  \n",
    )
    .unwrap();
    fs::write(
        notes.join("b.md"),
        "A lazy afternoon\nNothing here\nquick thinking\n",
    )
    .unwrap();
    fs::write(notes.join("skip.rs"), "quick fox in rust\n").unwrap();
    tmp
}

/// Like [`notes_project`], with `finder init` already run.
fn init_project() -> TempDir {
    let tmp = notes_project();
    finder()
        .args(["init", "--quiet"])
        .current_dir(tmp.path())
        .assert()
        .success();
    tmp
}

fn json_of(output: &std::process::Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// Flow 1: Line search
// ---------------------------------------------------------------------------

#[test]
fn flow1_line_search() {
    let tmp = notes_project();

    finder()
        .args(["search", "-p", "A=quick", "-p", "B=fox", "-f", "A & B", "notes"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("notes/a.txt"))
        .stdout(predicate::str::contains("1: The quick brown fox"))
        .stdout(predicate::str::contains("3: The fox is quick"))
        .stdout(predicate::str::contains("Search complete. Found 2 matches in 2 files."))
        .stdout(predicate::str::contains("skip.rs").not());

    // JSON output carries every match with its line number
    let output = finder()
        .args(["search", "-p", "A=quick", "-f", "A", "notes", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0]["path"], "notes/a.txt");
    assert_eq!(matches[0]["line_number"], 1);
    assert_eq!(matches[2]["path"], "notes/b.md");
    assert_eq!(matches[2]["text"], "quick thinking");
    assert_eq!(json["formula"], "A");
    assert_eq!(json["summary"]["matches"], 3);
    assert_eq!(json["summary"]["total_files"], 2);
}

// ---------------------------------------------------------------------------
// Flow 2: Document mode, extensions, negation
// ---------------------------------------------------------------------------

#[test]
fn flow2_document_mode_and_extensions() {
    let tmp = notes_project();

    let output = finder()
        .args([
            "search",
            "-p",
            "A=lazy",
            "-p",
            "B=brown",
            "-f",
            "A AND NOT B",
            "-m",
            "document",
            "notes",
            "--json",
        ])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["path"], "notes/b.md");
    assert_eq!(matches[0]["line_number"], 0);
    assert!(matches[0]["text"].as_str().unwrap().ends_with("..."));

    // Only .rs files
    let output = finder()
        .args(["search", "-p", "A=rust", "-e", "rs", "notes", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    assert_eq!(json["matches"].as_array().unwrap().len(), 1);
    assert_eq!(json["matches"][0]["path"], "notes/skip.rs");
}

// ---------------------------------------------------------------------------
// Flow 3: Unique results and result limit
// ---------------------------------------------------------------------------

#[test]
fn flow3_unique_and_max_results() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("dup.txt"), "error here\nerror here\nerror there\n").unwrap();

    let output = finder()
        .args(["search", "-p", "A=error", "dup.txt", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[1]["is_unique"], false);

    let output = finder()
        .args(["search", "-p", "A=error", "-u", "dup.txt", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert_eq!(json_of(&output)["matches"].as_array().unwrap().len(), 2);

    let output = finder()
        .args(["search", "-p", "A=error", "--max-results", "1", "dup.txt", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    assert_eq!(json["matches"].as_array().unwrap().len(), 1);
    assert_eq!(json["summary"]["truncated"], true);
}

// ---------------------------------------------------------------------------
// Flow 4: Search refusals
// ---------------------------------------------------------------------------

#[test]
fn flow4_search_refusals() {
    let tmp = notes_project();

    // No phrases at all
    finder()
        .args(["search", "notes"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no phrases"));

    // Broken formula
    finder()
        .args(["search", "-p", "A=quick", "-f", "(A & B", "notes"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unclosed '(' at position 1"))
        .stderr(predicate::str::contains("invalid formula"));

    // Contradiction needs --force
    finder()
        .args(["search", "-p", "A=quick", "-f", "A & !A", "notes"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("can never match"));

    finder()
        .args(["search", "-p", "A=quick", "-f", "A & !A", "--force", "notes"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 matches"));

    // Errors in JSON mode are JSON too
    let output = finder()
        .args(["search", "notes", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert!(err["error"].as_str().unwrap().contains("no phrases"));
}

// ---------------------------------------------------------------------------
// Flow 5: Formula tools
// ---------------------------------------------------------------------------

#[test]
fn flow5_validate_eval_normalize() {
    finder()
        .args(["validate", "(A | B) & !C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Formula is valid: (A OR B) AND NOT C"));

    finder()
        .args(["validate", "A B"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing operator"));

    let output = finder()
        .args(["validate", "A | !A", "-p", "A=x", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["diagnostics"][0]["kind"], "tautology");

    finder()
        .args(["eval", "A & !B", "-p", "A=fox", "-p", "B=dog", "--text", "the Fox ran"])
        .assert()
        .success()
        .stdout("true\n");

    finder()
        .args(["eval", "A", "-P", "A=Fox"])
        .write_stdin("the fox ran")
        .assert()
        .success()
        .stdout("false\n");

    // A broken formula is simply false, unless --strict
    finder()
        .args(["eval", "A &", "-p", "A=fox", "--text", "fox"])
        .assert()
        .success()
        .stdout("false\n");
    finder()
        .args(["eval", "A &", "-p", "A=fox", "--text", "fox", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid formula"));

    finder()
        .args(["normalize", "A&&B || ~C ^ D"])
        .assert()
        .success()
        .stdout("A AND B OR NOT C XOR D\n");
}

#[test]
fn runaway_nesting_is_reported_not_fatal() {
    let nots = format!("{}A", "!".repeat(50_000));
    finder()
        .args(["eval", &nots, "-p", "A=fox", "--text", "fox"])
        .assert()
        .success()
        .stdout("false\n");

    let brackets = format!("{}A{}", "(".repeat(20_000), ")".repeat(20_000));
    finder()
        .args(["validate", &brackets])
        .assert()
        .failure()
        .stdout(predicate::str::contains("nests deeper than 256 levels"));
}

// ---------------------------------------------------------------------------
// Flow 6: Init and config
// ---------------------------------------------------------------------------

#[test]
fn flow6_init_and_config() {
    let tmp = init_project();
    assert!(tmp.path().join(".finder/config.yaml").is_file());
    assert!(tmp.path().join(".finder/profiles").is_dir());

    // A second init refuses without --force
    finder()
        .args(["init"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    finder()
        .args(["config", "set", "mode", "document"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Set mode = document"));

    finder()
        .args(["config", "get", "mode"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("document\n");

    finder()
        .args(["config", "set", "extensions", "rs, md"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let output = finder()
        .args(["config", "list", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    assert_eq!(json["mode"], "document");
    assert_eq!(json["extensions"], serde_json::json!([".rs", ".md"]));
    assert_eq!(json["result-limit"], 1024);

    // Config applies to searches run anywhere below the project
    let output = finder()
        .args(["search", "-p", "A=quick", ".", "--json"])
        .current_dir(tmp.path().join("notes"))
        .output()
        .unwrap();
    let json = json_of(&output);
    let paths: Vec<&str> = json["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["b.md", "skip.rs"]);

    // Bad values and keys are rejected
    finder()
        .args(["config", "set", "result-limit", "2"])
        .current_dir(tmp.path())
        .assert()
        .failure();
    finder()
        .args(["config", "get", "colour"])
        .current_dir(tmp.path())
        .assert()
        .failure();

    finder()
        .args(["config", "unset", "mode"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Unset mode"));
    finder()
        .args(["config", "get", "mode"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("line\n");

    // Environment overrides the file
    finder()
        .args(["config", "get", "unique"])
        .env("FINDER_UNIQUE", "true")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("true\n");
}

#[test]
fn config_set_requires_init() {
    let tmp = TempDir::new().unwrap();
    finder()
        .args(["config", "set", "mode", "document"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("finder init"));

    // Reading falls back to defaults
    finder()
        .args(["config", "get", "extensions"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(".txt, .md\n");
}

// ---------------------------------------------------------------------------
// Flow 7: Profiles
// ---------------------------------------------------------------------------

#[test]
fn flow7_profiles() {
    let tmp = init_project();

    finder()
        .args([
            "profile", "save", "lazy-notes", "notes", "-p", "A=lazy", "-f", "A", "-m",
            "document", "-d", "Lazy things",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved profile 'lazy-notes'"));
    assert!(tmp.path().join(".finder/profiles/lazy-notes.toml").is_file());

    finder()
        .args(["profile", "list"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("lazy-notes"))
        .stdout(predicate::str::contains("Lazy things"));

    let output = finder()
        .args(["profile", "show", "lazy-notes", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    assert_eq!(json["formula"], "A");
    assert_eq!(json["mode"], "document");
    assert_eq!(json["phrases"]["A"]["text"], "lazy");

    // Searching with the profile, overriding one phrase
    let output = finder()
        .args(["search", "--profile", "lazy-notes", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    assert_eq!(json["matches"].as_array().unwrap().len(), 2);

    let output = finder()
        .args(["search", "--profile", "lazy-notes", "-p", "A=afternoon", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = json_of(&output);
    assert_eq!(json["matches"].as_array().unwrap().len(), 1);
    assert_eq!(json["matches"][0]["path"], "notes/b.md");

    // Invalid formulas are not saved
    finder()
        .args(["profile", "save", "broken", "-p", "A=x", "-f", "A &"])
        .current_dir(tmp.path())
        .assert()
        .failure();
    assert!(!tmp.path().join(".finder/profiles/broken.toml").exists());

    finder()
        .args(["profile", "delete", "lazy-notes"])
        .current_dir(tmp.path())
        .assert()
        .success();
    finder()
        .args(["search", "--profile", "lazy-notes"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("lazy-notes"));
}

// ---------------------------------------------------------------------------
// Flow 8: Explicit finder directory
// ---------------------------------------------------------------------------

#[test]
fn flow8_explicit_dir() {
    let tmp = notes_project();

    finder()
        .args(["--dir", "settings", "init", "--quiet"])
        .current_dir(tmp.path())
        .assert()
        .success();
    assert!(tmp.path().join("settings/config.yaml").is_file());

    finder()
        .args(["config", "set", "unique", "true"])
        .env("FINDER_DIR", tmp.path().join("settings"))
        .current_dir(tmp.path())
        .assert()
        .success();

    finder()
        .args(["--dir", "settings", "config", "get", "unique"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("true\n");
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[test]
fn version_and_completion() {
    finder()
        .args(["version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("finder version "));

    let output = finder().args(["version", "--json"]).output().unwrap();
    let json = json_of(&output);
    assert!(json["version"].as_str().is_some());

    finder()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("finder"));
}

#[test]
fn no_subcommand_prints_help() {
    finder()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}
