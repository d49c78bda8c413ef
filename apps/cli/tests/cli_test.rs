//! End-to-end runs of the `formguard` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn formguard(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("formguard").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("FORMGUARD_LOG")
        .env_remove("FORMGUARD_LOG_FORMAT");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: impl AsRef<[u8]>) {
    std::fs::write(dir.path().join(name), contents).unwrap();
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0DIHDR".to_vec();
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

fn webp(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"RIFF\0\0\0\0WEBPVP8X\x0A\0\0\0\0\0\0\0".to_vec();
    bytes.extend_from_slice(&(width - 1).to_le_bytes()[..3]);
    bytes.extend_from_slice(&(height - 1).to_le_bytes()[..3]);
    bytes
}

const SIGNUP: &str = r#"{
    "username": "Ann_42",
    "email": "ann@example.com",
    "plan": "basic",
    "password": "hunter22",
    "confirm": "hunter22"
}"#;

// ============================================================================
// CHECK
// ============================================================================

#[test]
fn valid_signup_exits_zero() {
    let dir = TempDir::new().unwrap();
    write(&dir, "signup.json", SIGNUP);

    formguard(dir.path())
        .args(["check", "signup", "signup.json"])
        .assert()
        .success()
        .stdout("valid\n");
}

#[test]
fn invalid_signup_exits_one_with_messages() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "signup.json",
        r#"{"username": "al", "email": "nope", "plan": "basic", "password": "hunter22", "confirm": "hunter23"}"#,
    );

    formguard(dir.path())
        .args(["check", "signup", "signup.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("username: Must be at least 3 characters"))
        .stdout(predicate::str::contains("email: Enter a valid email address"))
        .stdout(predicate::str::contains("form: Passwords do not match"));
}

#[test]
fn submit_stage_is_selectable() {
    let dir = TempDir::new().unwrap();
    write(&dir, "signup.json", SIGNUP);

    formguard(dir.path())
        .args(["check", "signup", "signup.json", "--stage", "submit"])
        .assert()
        .code(1)
        .stdout("bio: Tell us about yourself\n");
}

#[test]
fn json_format_prints_the_outcome() {
    let dir = TempDir::new().unwrap();
    write(&dir, "signup.json", SIGNUP);

    let output = formguard(dir.path())
        .args(["check", "signup", "signup.json", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["status"], "valid");
    assert_eq!(outcome["data"]["username"], "ann_42");
}

#[test]
fn gallery_loads_referenced_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "big.png", png(640, 480));
    write(&dir, "tiny.png", png(16, 16));
    write(
        &dir,
        "gallery.json",
        r#"{"title": "Trip", "photos": [{"$file": "big.png"}, {"$file": "tiny.png"}]}"#,
    );

    formguard(dir.path())
        .args(["check", "gallery", "gallery.json"])
        .assert()
        .code(1)
        .stdout(
            "1.value: Image is 16x16: width must be at least 320px, height must be at least 240px\n",
        );
}

#[test]
fn gallery_reads_webp_photos() {
    let dir = TempDir::new().unwrap();
    write(&dir, "beach.webp", webp(4000, 3000));
    write(
        &dir,
        "gallery.json",
        r#"{"title": "Trip", "photos": [{"$file": "beach.webp"}]}"#,
    );

    formguard(dir.path())
        .args(["check", "gallery", "gallery.json"])
        .assert()
        .success()
        .stdout("valid\n");
}

#[test]
fn unknown_schema_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "signup.json", SIGNUP);

    formguard(dir.path())
        .args(["check", "checkout", "signup.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown schema 'checkout'"));
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();

    formguard(dir.path())
        .args(["check", "signup", "absent.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot read input"));
}

// ============================================================================
// CONFIGURATION AND LISTING
// ============================================================================

#[test]
fn schemas_lists_bundled_names() {
    let dir = TempDir::new().unwrap();

    formguard(dir.path())
        .arg("schemas")
        .assert()
        .success()
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("gallery"));
}

#[test]
fn schemas_json_prints_snapshots() {
    let dir = TempDir::new().unwrap();

    let output = formguard(dir.path()).args(["schemas", "--json"]).output().unwrap();
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["gallery"]["description"], "gallery");
    assert_eq!(listing["signup"]["validator"], "opaque");
}

#[test]
fn invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "formguard.toml", "[validator]\nbatch_size = 0\n");

    formguard(dir.path())
        .arg("schemas")
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("error:"));
}
