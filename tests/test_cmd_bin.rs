use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Output};

const EXPECTED_HEADER: &str = "Reference ID,Source Account,Source Account Name,Source Bank Code,Beneficiary Account,Beneficiary Account Name,Beneficiary Bank Code,Currency,Amount,Transaction Type,Note";

// Seeded ACTIVE accounts with their bank codes.
const ACTIVE_ACCOUNTS: [(&str, &str); 12] = [
    ("1234567890", "BCA"),
    ("0987654321", "BNI"),
    ("1122334455", "BRI"),
    ("5544332211", "MANDIRI"),
    ("9900112233", "DANAMON"),
    ("7788990011", "BTN"),
    ("2233445566", "BSI"),
    ("4455667788", "OCBC"),
    ("1357924680", "BCA"),
    ("2468013579", "BRI"),
    ("1111222233", "MANDIRI"),
    ("7777888899", "BSI"),
];

const LIMITS: [(&str, u64, u64); 4] = [
    ("TRANSFER", 10_000, 1_000_000_000),
    ("PAYMENT", 1_000, 500_000_000),
    ("TOPUP", 10_000, 50_000_000),
    ("WITHDRAWAL", 50_000, 20_000_000),
];

fn run_generator(args: &[&str]) -> Output {
    // Get the path to the binary using the CARGO_BIN_EXE environment variable
    let bin_path = env!("CARGO_BIN_EXE_transaction_generator");

    Command::new(bin_path)
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn run_to(out: &Path, args: &[&str]) -> String {
    let mut all_args = vec!["--out", out.to_str().unwrap()];
    all_args.extend_from_slice(args);
    let output = run_generator(&all_args);

    assert!(output.status.success(),
        "Binary failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr));

    std::fs::read_to_string(out).expect("Failed to read generated file")
}

fn is_valid_record(record: &csv::StringRecord) -> bool {
    let active: HashMap<&str, &str> = ACTIVE_ACCOUNTS.iter().copied().collect();
    let bank_matches = |account: &str, bank: &str| active.get(account) == Some(&bank);

    let amount: u64 = record[8].parse().expect("Amount is not an integer");
    let in_range = LIMITS
        .iter()
        .find(|(kind, _, _)| *kind == &record[9])
        .map(|(_, min, max)| *min <= amount && amount <= *max)
        .unwrap_or(false);

    bank_matches(&record[1], &record[3])
        && bank_matches(&record[4], &record[6])
        && record[1] != record[4]
        && &record[7] == "IDR"
        && in_range
}

#[test]
fn test_small_valid_run() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let out = dir.path().join("transactions.csv");

    let content = run_to(&out, &["--rows", "10", "--seed", "42", "--invalid-rate", "0"]);

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], EXPECTED_HEADER);

    let mut reader = csv::Reader::from_reader(content.as_bytes());
    for (i, record) in reader.records().enumerate() {
        let record = record.expect("Failed to parse generated record");
        assert_eq!(record.len(), 11);
        assert_eq!(&record[0], format!("TRX-{:07}", i + 1));
        assert!(is_valid_record(&record), "Line {} is not a valid row: {:?}", i + 2, record);
    }
}

#[test]
fn test_same_seed_is_byte_identical() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let args = ["--rows", "2000", "--seed", "7", "--invalid-rate", "0.25"];

    let first_content = run_to(&first, &args);
    let second_content = run_to(&second, &args);

    assert_eq!(first_content, second_content);
}

#[test]
fn test_creates_missing_directories() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let out = dir.path().join("a").join("b").join("out.csv");

    let content = run_to(&out, &["--rows", "3", "--seed", "1"]);

    assert_eq!(content.lines().count(), 4);
}

#[test]
fn test_zero_rows_writes_header_only() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let out = dir.path().join("empty.csv");

    let content = run_to(&out, &["--rows", "0"]);

    assert_eq!(content.lines().collect::<Vec<_>>(), vec![EXPECTED_HEADER]);
}

#[test]
fn test_rate_above_one_is_clamped() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let out = dir.path().join("invalid.csv");

    let content = run_to(&out, &["--rows", "300", "--seed", "5", "--invalid-rate", "3.5"]);

    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 300);
    for record in &records {
        assert!(!is_valid_record(record), "Row should be invalid: {:?}", record);
    }
}

#[test]
fn test_summary_printed() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let out = dir.path().join("summary.csv");

    let output = run_generator(&["--out", out.to_str().unwrap(), "--rows", "20000", "--seed", "3"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generating 20000 rows"));
    assert!(stdout.contains("10000 / 20000 rows written"));
    assert!(stdout.contains("20000 / 20000 rows written"));
    assert!(stdout.contains("actual valid"));
    assert!(stdout.contains("actual invalid"));
}

#[test]
fn test_rejects_bad_arguments() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let out = dir.path().join("never.csv");

    let output = run_generator(&["--out", out.to_str().unwrap(), "--rows", "ten"]);

    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn test_unwritable_path_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let blocker = dir.path().join("plain-file");
    std::fs::write(&blocker, "x").unwrap();
    let out = blocker.join("transactions.csv");

    let output = run_generator(&["--out", out.to_str().unwrap(), "--rows", "5"]);

    assert!(!output.status.success());
}
