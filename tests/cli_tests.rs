use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn invoice_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("monthly-invoice"))
}

/// Run `init` in a fresh temp dir and return (temp dir, config path, vault path)
fn setup() -> (TempDir, String, String) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invoice-config");
    let vault_path = temp_dir.path().join("vault");
    fs::create_dir_all(&vault_path).unwrap();

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    (
        temp_dir,
        config_path.to_str().unwrap().to_string(),
        vault_path.to_str().unwrap().to_string(),
    )
}

fn set(config_path: &str, key: &str, value: &str) {
    invoice_cmd()
        .args(["-C", config_path, "set", key, value])
        .assert()
        .success();
}

fn read_settings(config_path: &str) -> String {
    fs::read_to_string(Path::new(config_path).join("settings.toml")).unwrap()
}

#[test]
fn test_help() {
    invoice_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate last month's invoice"));
}

#[test]
fn test_version() {
    invoice_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("monthly-invoice"));
}

#[test]
fn test_init_creates_config() {
    let (_temp_dir, config_path, _vault) = setup();
    assert!(Path::new(&config_path).join("settings.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let (_temp_dir, config_path, _vault) = setup();

    invoice_cmd()
        .args(["-C", &config_path, "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status() {
    let (_temp_dir, config_path, vault) = setup();

    invoice_cmd()
        .args(["-C", &config_path, "--vault", &vault, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice Status"))
        .stdout(predicate::str::contains("SETTING"))
        .stdout(predicate::str::contains("issuer-name"))
        .stdout(predicate::str::contains("Next invoice:     #0001"));
}

#[test]
fn test_hours_for_leap_february() {
    invoice_cmd()
        .args(["hours", "--date", "2024-03-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Period:   February 2024"))
        .stdout(predicate::str::contains("Days:     29"))
        .stdout(predicate::str::contains("Weekdays: 21"))
        .stdout(predicate::str::contains("Hours:    168"));
}

#[test]
fn test_hours_rejects_bad_date() {
    invoice_cmd()
        .args(["hours", "--date", "15/03/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_set_rejects_invalid_rate() {
    let (_temp_dir, config_path, _vault) = setup();
    set(&config_path, "hourly-rate", "85");

    invoice_cmd()
        .args(["-C", &config_path, "set", "hourly-rate", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value 'lots'"));

    assert!(read_settings(&config_path).contains("hourly_rate = 85.0"));
}

#[test]
fn test_generate_writes_invoice_and_advances_number() {
    let (_temp_dir, config_path, vault) = setup();
    set(&config_path, "issuer-name", "Jane Doe");
    set(&config_path, "invoice-number", "7");
    set(&config_path, "hourly-rate", "50");

    invoice_cmd()
        .args([
            "-C",
            &config_path,
            "--vault",
            &vault,
            "generate",
            "--date",
            "2024-04-02",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated invoice #7 for March 2024"))
        .stdout(predicate::str::contains("Amount: $8,400.00"));

    let invoice = Path::new(&vault)
        .join("invoices")
        .join("Invoice for March 2024 - Jane Doe (#0007).md");
    let body = fs::read_to_string(invoice).unwrap();
    assert!(body.starts_with("# Invoice\n"));
    assert!(body.contains("| 02-04-2024 | 7 |"));
    assert!(body.contains("| **Total** | | | **$8,400.00** |"));

    let settings = read_settings(&config_path);
    assert!(settings.contains("invoice_number = 8"));
    assert!(settings.contains("last_period = \"2024-03\""));
}

#[test]
fn test_generate_twice_numbers_both() {
    let (_temp_dir, config_path, vault) = setup();
    set(&config_path, "issuer-name", "Jane Doe");

    for _ in 0..2 {
        invoice_cmd()
            .args(["-C", &config_path, "--vault", &vault, "generate", "--date", "2024-04-02"])
            .assert()
            .success();
    }

    let folder = Path::new(&vault).join("invoices");
    assert!(folder.join("Invoice for March 2024 - Jane Doe (#0001).md").exists());
    assert!(folder.join("Invoice for March 2024 - Jane Doe (#0002).md").exists());
    assert!(read_settings(&config_path).contains("invoice_number = 3"));
}

#[test]
fn test_generate_skip_existing_policy() {
    let (_temp_dir, config_path, vault) = setup();
    set(&config_path, "file-policy", "skip-existing");

    invoice_cmd()
        .args(["-C", &config_path, "--vault", &vault, "generate", "--date", "2024-01-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("for December 2023"));

    invoice_cmd()
        .args(["-C", &config_path, "--vault", &vault, "generate", "--date", "2024-01-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert!(Path::new(&vault)
        .join("invoices")
        .join("Invoice 2023-12.md")
        .exists());
    assert!(read_settings(&config_path).contains("invoice_number = 2"));
}

#[test]
fn test_generate_folder_blocked_keeps_number() {
    let (_temp_dir, config_path, vault) = setup();
    fs::write(Path::new(&vault).join("invoices"), "not a folder").unwrap();

    invoice_cmd()
        .args(["-C", &config_path, "--vault", &vault, "generate", "--date", "2024-04-02"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create invoice folder"));

    assert!(read_settings(&config_path).contains("invoice_number = 1"));
}

#[test]
fn test_generate_reads_plugin_style_values() {
    let (_temp_dir, config_path, vault) = setup();
    fs::write(
        Path::new(&config_path).join("settings.toml"),
        r#"invoiceFolder = "billing"
invoiceNumber = "3"
issuerName = "Acme"
hourlyRate = "not a number"
"#,
    )
    .unwrap();

    invoice_cmd()
        .args(["-C", &config_path, "--vault", &vault, "generate", "--date", "2024-04-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Amount: $0.00"));

    assert!(Path::new(&vault)
        .join("billing")
        .join("Invoice for March 2024 - Acme (#0003).md")
        .exists());
}

#[test]
fn test_watch_single_tick_generates_once() {
    let (_temp_dir, config_path, vault) = setup();

    for _ in 0..2 {
        invoice_cmd()
            .args([
                "-C",
                &config_path,
                "--vault",
                &vault,
                "watch",
                "--ticks",
                "1",
                "--interval-secs",
                "0",
            ])
            .assert()
            .success();
    }

    let count = fs::read_dir(Path::new(&vault).join("invoices"))
        .unwrap()
        .count();
    assert_eq!(count, 1);
    assert!(read_settings(&config_path).contains("invoice_number = 2"));
}

#[test]
fn test_generate_with_json_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data.json");
    let vault = temp_dir.path().join("vault");
    fs::write(
        &data,
        r#"{
  "invoiceFolder": "Invoices/",
  "invoiceNumber": 4,
  "issuerName": "Acme",
  "hourlyRate": "100"
}"#,
    )
    .unwrap();

    invoice_cmd()
        .args([
            "--settings",
            data.to_str().unwrap(),
            "--vault",
            vault.to_str().unwrap(),
            "generate",
            "--date",
            "2024-04-02",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated invoice #4 for March 2024"))
        .stdout(predicate::str::contains("Amount: $16,800.00"));

    assert!(vault
        .join("Invoices")
        .join("Invoice for March 2024 - Acme (#0004).md")
        .exists());
    let saved = fs::read_to_string(&data).unwrap();
    assert!(saved.contains("\"invoice_number\": 5"));
    assert!(saved.contains("\"last_period\": \"2024-03\""));
}

#[test]
fn test_missing_settings_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data.json");

    invoice_cmd()
        .args(["--settings", data.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Settings file not found"));
}

#[test]
fn test_init_json_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("plugin").join("data.json");

    invoice_cmd()
        .args(["--settings", data.to_str().unwrap(), "init"])
        .assert()
        .success();

    let saved = fs::read_to_string(&data).unwrap();
    assert!(saved.contains("\"invoice_number\": 1"));

    invoice_cmd()
        .args(["--settings", data.to_str().unwrap(), "set", "issuer-name", "Acme"])
        .assert()
        .success();
    assert!(fs::read_to_string(&data)
        .unwrap()
        .contains("\"issuer_name\": \"Acme\""));
}
