use assert_cmd::{cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cmd(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("commitments");
    cmd.env("COMMITMENTS_CLI_DATA_DIR", home).env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) {
    cmd(home).args(args).assert().success();
}

/// Initialized data dir with user `ana` logged in
fn setup_user(home: &Path) {
    run(home, &["init"]);
    run(home, &["admin-login", "admin", "--password", "changeme"]);
    run(
        home,
        &["user", "create", "ana", "ana@example.com", "--password", "Secret123"],
    );
    run(home, &["login", "ana", "--password", "Secret123"]);
}

fn add_valid_record(home: &Path, invoice: &str, amount: &str) {
    run(
        home,
        &[
            "record", "add",
            "--reason-code", "PO07",
            "--recipient", "Acme d.o.o.",
            "--place", "Belgrade",
            "--account", "160-123-45",
            "--invoice", invoice,
            "--invoice-date", "2025-03-01",
            "--due-date", "2025-03-31",
            "--budget-user-id", "10520",
            "--program", "0701",
            "--economic-code", "423",
            "--funding-source", "01",
            "--function", "130",
            "--amount", amount,
            "--recording-account", "4231",
            "--expected-payment", "2025-03-25",
        ],
    );
}

fn fill_header(home: &Path) {
    run(
        home,
        &[
            "header", "set",
            "--budget-user-id", "10520",
            "--treasury", "Belgrade",
        ],
    );
}

#[test]
fn test_commands_require_init() {
    let home = TempDir::new().unwrap();
    cmd(home.path())
        .args(["record", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not initialized"));
}

#[test]
fn test_init_prints_bootstrap_admin() {
    let home = TempDir::new().unwrap();
    cmd(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("admin / changeme"));

    // Second run keeps the existing credentials
    cmd(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("changeme").not());
}

#[test]
fn test_failed_login_message() {
    let home = TempDir::new().unwrap();
    run(home.path(), &["init"]);
    cmd(home.path())
        .args(["login", "nobody", "--password", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
    cmd(home.path())
        .args(["admin-login", "admin", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
}

#[test]
fn test_records_need_a_user_session() {
    let home = TempDir::new().unwrap();
    run(home.path(), &["init"]);
    cmd(home.path())
        .args(["record", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    run(home.path(), &["admin-login", "admin", "--password", "changeme"]);
    cmd(home.path())
        .args(["record", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"));
}

#[test]
fn test_user_cannot_manage_users() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    cmd(home.path())
        .args(["user", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"));
    cmd(home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("ana (ana@example.com)"));
}

#[test]
fn test_add_list_and_show_records() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    add_valid_record(home.path(), "INV-1", "1500");
    add_valid_record(home.path(), "INV-2", "250.5");

    cmd(home.path())
        .args(["record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-1"))
        .stdout(predicate::str::contains("1750.50"))
        .stdout(predicate::str::contains("Page 1 of 1 (2 records)"));

    cmd(home.path())
        .args(["record", "show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Commitment #2"))
        .stdout(predicate::str::contains("INV-2"));

    cmd(home.path())
        .args(["record", "search", "inv-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 match(es)"));
}

#[test]
fn test_non_finite_amount_rejected() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    add_valid_record(home.path(), "INV-1", "10");

    for amount in ["inf", "NaN"] {
        cmd(home.path())
            .args(["record", "add", "--invoice", "INV-2", "--amount", amount])
            .assert()
            .failure()
            .stderr(predicate::str::contains("finite"));
    }

    cmd(home.path())
        .args(["record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1 of 1 (1 records)"));
}

#[test]
fn test_export_blocked_until_valid() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    let out = home.path().join("out.xml");
    let out_arg = out.to_str().unwrap();

    cmd(home.path())
        .args(["xml", "export", "--output", out_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least one record is required"));
    assert!(!out.exists());

    fill_header(home.path());
    add_valid_record(home.path(), "INV-1", "1500");
    cmd(home.path())
        .args(["xml", "export", "--output", out_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 record(s)"));

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.contains("<commitments"));
    assert!(xml.contains("external_id=\"1-INV-1\""));

    cmd(home.path())
        .args(["xml", "compare", out_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("File and app are consistent"));
}

#[test]
fn test_import_replaces_records_and_bad_file_changes_nothing() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    add_valid_record(home.path(), "INV-1", "10");

    let bad = home.path().join("bad.xml");
    fs::write(
        &bad,
        r#"<commitments budget_year="2025">
  <commitment recipient="A"><item><amount>1</amount></item></commitment>
  <commitment recipient="B"></commitment>
</commitments>"#,
    )
    .unwrap();
    cmd(home.path())
        .args(["xml", "import", bad.to_str().unwrap(), "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("commitment 2"));

    cmd(home.path())
        .args(["record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-1"));

    let good = home.path().join("good.xml");
    fs::write(
        &good,
        r#"<commitments budget_year="2025" treasury="T">
  <commitment sequence_number="1" invoice_number="X-1"><item><amount>5</amount></item></commitment>
  <commitment sequence_number="2" invoice_number="X-2"><item><amount>6</amount></item></commitment>
</commitments>"#,
    )
    .unwrap();

    // Without --force nothing is replaced
    cmd(home.path())
        .args(["xml", "import", good.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    cmd(home.path())
        .args(["xml", "import", good.to_str().unwrap(), "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 record(s)"));

    cmd(home.path())
        .args(["record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("X-2"))
        .stdout(predicate::str::contains("INV-1").not());
}

#[test]
fn test_bulk_urgent_and_sequence_repair() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    for invoice in ["INV-1", "INV-2", "INV-3"] {
        add_valid_record(home.path(), invoice, "100");
    }

    run(home.path(), &["record", "bulk-edit", "--all", "--urgent", "true"]);
    cmd(home.path())
        .args(["record", "list", "--urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(3 records)"));

    run(home.path(), &["record", "remove", "2", "--force"]);
    cmd(home.path())
        .args(["sequence", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CORRUPTED"))
        .stdout(predicate::str::contains("GAPS_DETECTED"));

    cmd(home.path())
        .args(["sequence", "renumber"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    cmd(home.path())
        .args(["sequence", "renumber", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renumbered 1 of 2"));
    cmd(home.path())
        .args(["sequence", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HEALTHY"));
}

#[test]
fn test_sqlite_backend_override() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    cmd(home.path())
        .args(["--backend", "sqlite", "record", "add", "--invoice", "SQL-1", "--amount", "9"])
        .assert()
        .success();

    cmd(home.path())
        .args(["--backend", "sqlite", "record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SQL-1"));

    // The local backend holds separate data
    cmd(home.path())
        .args(["record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records found"));
}

#[test]
fn test_activity_and_dashboard() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    add_valid_record(home.path(), "INV-1", "1500");

    cmd(home.path())
        .arg("activity")
        .assert()
        .success()
        .stdout(predicate::str::contains("1500.00"));

    run(home.path(), &["admin-login", "admin", "--password", "changeme"]);
    cmd(home.path())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 (1 active)"))
        .stdout(predicate::str::contains("Records Created:  1"));
}

#[test]
fn test_suspended_user_cannot_log_in() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    run(home.path(), &["admin-login", "admin", "--password", "changeme"]);
    run(home.path(), &["user", "suspend", "ana"]);

    cmd(home.path())
        .args(["login", "ana", "--password", "Secret123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
}

#[test]
fn test_export_csv_and_snapshot() {
    let home = TempDir::new().unwrap();
    setup_user(home.path());
    add_valid_record(home.path(), "INV-1", "1500");

    let csv = home.path().join("records.csv");
    run(home.path(), &["export", "records", csv.to_str().unwrap()]);
    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("Seq,ID,External ID"));
    assert!(text.contains("1500.00"));

    let yaml = home.path().join("snap.yaml");
    run(
        home.path(),
        &["export", "snapshot", yaml.to_str().unwrap(), "--format", "yaml"],
    );
    let text = fs::read_to_string(&yaml).unwrap();
    assert!(text.starts_with("# commitments-cli snapshot"));
    assert!(text.contains("INV-1"));
}

#[test]
fn test_fixtures_generate_and_validate() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("fixtures");
    let dir_arg = dir.to_str().unwrap();

    cmd(home.path())
        .args(["fixtures", "generate", dir_arg, "--count", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TEST_006_after_add.xml"));

    cmd(home.path())
        .args(["fixtures", "validate", dir_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("TEST_VALIDATION_RESULTS.json"));
    assert!(dir.join("TEST_VALIDATION_RESULTS.json").exists());
}
