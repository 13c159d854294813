//! CLI end-to-end tests.
//!
//! These tests spawn the actual `rehoist` binary in a temporary workspace and
//! validate stdout, written files and exit codes.
//!
//! Exit code expectations:
//! - 0: Clean (or everything fixed)
//! - 1: Diagnostics found
//! - 2: Invalid arguments (bad config, bad base name)
//! - 3: Resolution error (path not found)
//! - 6: Parse error

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run rehoist in `dir` and return (stdout, stderr, exit_code).
fn run_rehoist(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_rehoist"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute rehoist");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

const UNHOISTED: &str = "function foo() {\n  return /ab/g.test('ab');\n}\n";

// ============================================================================
// check
// ============================================================================

#[test]
fn check_clean_workspace_exits_0() {
    let dir = workspace(&[("a.js", "const REGEX = /ab/g;\n")]);
    let (stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["check"]);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "0 problems in 1 file checked\n");
}

#[test]
fn check_reports_diagnostics_and_exits_1() {
    let dir = workspace(&[("src/a.js", UNHOISTED)]);
    let (stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["check"]);
    assert_eq!(exit_code, 1);
    assert!(
        stdout.starts_with(
            "src/a.js:2:10: Regex literals should be hoisted to the top level. [hoist-regex]\n"
        ),
        "unexpected output: {}",
        stdout
    );
}

#[test]
fn check_json_output() {
    let dir = workspace(&[("a.js", UNHOISTED)]);
    let (stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["check", "--format", "json"]);
    assert_eq!(exit_code, 1);

    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "diagnostics");
    assert_eq!(json["schema_version"], "1");
    assert_eq!(json["files_checked"], 1);
    let diagnostic = &json["diagnostics"][0];
    assert_eq!(diagnostic["rule"], "hoist-regex");
    assert_eq!(diagnostic["message_id"], "hoistRegex");
    assert_eq!(diagnostic["location"]["file"], "a.js");
    assert_eq!(diagnostic["location"]["line"], 2);
    assert_eq!(diagnostic["location"]["col"], 10);
    assert_eq!(diagnostic["fixable"], true);
}

#[test]
fn check_respects_config_exclude() {
    let dir = workspace(&[
        ("rehoist.toml", "[rehoist]\nexclude = [\"legacy/**\"]\n"),
        ("legacy/old.js", UNHOISTED),
        ("src/new.js", "const R = /r/;\n"),
    ]);
    let (_stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["check"]);
    assert_eq!(exit_code, 0);
}

#[test]
fn check_missing_path_exits_3() {
    let dir = workspace(&[]);
    let (stdout, _stderr, exit_code) =
        run_rehoist(dir.path(), &["check", "nope", "--format", "json"]);
    assert_eq!(exit_code, 3);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 3);
}

#[test]
fn check_parse_error_exits_6() {
    let dir = workspace(&[("bad.js", "function (\n")]);
    let (_stdout, stderr, exit_code) = run_rehoist(dir.path(), &["check"]);
    assert_eq!(exit_code, 6);
    assert!(stderr.contains("bad.js"), "stderr: {}", stderr);
}

#[test]
fn invalid_base_name_exits_2() {
    let dir = workspace(&[("a.js", UNHOISTED)]);
    let (_stdout, _stderr, exit_code) =
        run_rehoist(dir.path(), &["check", "--base-name", "1bad"]);
    assert_eq!(exit_code, 2);
}

// ============================================================================
// fix
// ============================================================================

#[test]
fn fix_rewrites_file() {
    let dir = workspace(&[("a.js", UNHOISTED)]);
    let (stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["fix"]);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "fixed a.js (1 fix)\n1 fix in 1 file, 0 remaining\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("a.js")).unwrap(),
        "\nconst REGEX = /ab/g;function foo() {\n  return REGEX.test('ab');\n}\n"
    );

    let (_stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["check"]);
    assert_eq!(exit_code, 0);
}

#[test]
fn fix_dry_run_json() {
    let dir = workspace(&[("a.js", UNHOISTED)]);
    let (stdout, _stderr, exit_code) =
        run_rehoist(dir.path(), &["fix", "--dry-run", "--format", "json"]);
    assert_eq!(exit_code, 0);
    assert_eq!(fs::read_to_string(dir.path().join("a.js")).unwrap(), UNHOISTED);

    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["dry_run"], true);
    assert!(json.get("files_written").is_none());
    assert_eq!(json["summary"]["fixes_applied"], 1);
    let edits = json["files"][0]["edits"].as_array().unwrap();
    assert_eq!(edits.len(), 2);
    assert_eq!(edits[0]["new_text"], "\nconst REGEX = /ab/g;");
    assert_eq!(edits[1]["old_text"], "/ab/g");
    assert_eq!(edits[1]["new_text"], "REGEX");
}

#[test]
fn fix_with_base_name_flag() {
    let dir = workspace(&[("a.js", "x(/a/);\n")]);
    let (_stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["fix", "--base-name", "RE"]);
    assert_eq!(exit_code, 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("a.js")).unwrap(),
        "\nconst RE = /a/;x(RE);\n"
    );
}

#[test]
fn fix_workspace_flag() {
    let dir = workspace(&[("proj/a.js", "x(/a/);\n")]);
    let root = dir.path().join("proj");
    let (_stdout, _stderr, exit_code) = run_rehoist(
        dir.path(),
        &["fix", "--workspace", root.to_str().unwrap()],
    );
    assert_eq!(exit_code, 0);
    assert_eq!(
        fs::read_to_string(root.join("a.js")).unwrap(),
        "\nconst REGEX = /a/;x(REGEX);\n"
    );
}

#[test]
fn fix_typescript_and_hashbang_files() {
    let dir = workspace(&[
        ("bin/cli.js", "#!/usr/bin/env node\nrun(/x/);\n"),
        ("src/lib.ts", "export const ok = (s: string): boolean => /y/.test(s);\n"),
        ("src/types.d.ts", "declare const pattern: RegExp;\n"),
    ]);
    let (stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["fix"]);
    assert_eq!(exit_code, 0, "stdout: {}", stdout);
    assert_eq!(
        fs::read_to_string(dir.path().join("bin/cli.js")).unwrap(),
        "#!/usr/bin/env node\nconst REGEX = /x/;\nrun(REGEX);\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/lib.ts")).unwrap(),
        "\nconst REGEX = /y/;export const ok = (s: string): boolean => REGEX.test(s);\n"
    );

    let (stdout, _stderr, exit_code) = run_rehoist(dir.path(), &["check"]);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "0 problems in 3 files checked\n");
}
