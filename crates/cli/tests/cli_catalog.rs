use std::path::Path;
use std::process::Output;

use assert_cmd::Command;
use serde_json::Value;

fn qwat(dir: &Path, args: &[&str]) -> Output {
    Command::cargo_bin("qwat")
        .expect("qwat binary")
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("QWAT_CONFIG_DIR", dir.join("config"))
        .env("QWAT_STORAGE__DATA_DIR", dir.join("data"))
        .env("QWAT_TELEMETRY__FILTER", "warn")
        .args(args)
        .output()
        .expect("run qwat")
}

fn json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json stdout")
}

#[test]
fn list_shows_seed_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let listings = json(&qwat(dir.path(), &["--json", "list"]));

    let ids: Vec<&str> = listings
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|listing| listing["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(listings[0]["price"], "free");
    assert_eq!(listings[2]["price"], 5);
    assert!(!dir.path().join("data").join("qwat_books.json").exists());
}

#[test]
fn list_narrows_by_category() {
    let dir = tempfile::tempdir().expect("tempdir");
    let listings = json(&qwat(dir.path(), &["--json", "list", "--category", "تطوير"]));

    assert_eq!(listings.as_array().map(Vec::len), Some(1));
    assert_eq!(listings[0]["id"], "3");
}

#[test]
fn categories_start_with_all() {
    let dir = tempfile::tempdir().expect("tempdir");
    let categories = json(&qwat(dir.path(), &["--json", "categories"]));
    assert_eq!(categories[0], "الكل");
}

#[test]
fn add_requires_passcode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = qwat(
        dir.path(),
        &["add", "--passcode", "000000", "--title", "كتاب"],
    );
    assert!(!output.status.success());

    let listings = json(&qwat(dir.path(), &["--json", "list"]));
    assert_eq!(listings.as_array().map(Vec::len), Some(3));
}

#[test]
fn add_then_remove_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let added = json(&qwat(
        dir.path(),
        &[
            "--json", "add", "--passcode", "122333", "--title", "كتاب جديد", "--price", "12",
        ],
    ));
    assert_eq!(added["title"], "كتاب جديد");
    assert_eq!(added["price"], 12);
    assert_eq!(added["category"], "أخرى");

    let listings = json(&qwat(dir.path(), &["--json", "list"]));
    assert_eq!(listings.as_array().map(Vec::len), Some(4));
    assert_eq!(listings[3]["id"], added["id"]);

    let id = added["id"].as_str().expect("id");
    let output = qwat(dir.path(), &["remove", "--passcode", "122333", id, "--yes"]);
    assert!(output.status.success());

    let listings = json(&qwat(dir.path(), &["--json", "list"]));
    assert_eq!(listings.as_array().map(Vec::len), Some(3));
}

#[test]
fn declined_confirmation_keeps_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("qwat")
        .expect("qwat binary")
        .current_dir(dir.path())
        .env("QWAT_CONFIG_DIR", dir.path().join("config"))
        .env("QWAT_STORAGE__DATA_DIR", dir.path().join("data"))
        .args(["remove", "--passcode", "122333", "1"])
        .write_stdin("n\n")
        .assert()
        .success();

    let listings = json(&qwat(dir.path(), &["--json", "list"]));
    assert_eq!(listings.as_array().map(Vec::len), Some(3));
}

#[test]
fn activate_reports_payment_or_link() {
    let dir = tempfile::tempdir().expect("tempdir");

    let paid = json(&qwat(dir.path(), &["--json", "activate", "3"]));
    assert_eq!(paid["action"], "payment");
    assert_eq!(paid["price"], "5$");
    assert_eq!(paid["instructions"]["card_number"], "6042375417");

    let free = json(&qwat(dir.path(), &["--json", "activate", "1"]));
    assert_eq!(free["action"], "navigate");
    assert_eq!(free["url"], "https://files.fm/f/n7kxz7vf6n");

    let missing = qwat(dir.path(), &["activate", "404"]);
    assert!(!missing.status.success());
}
