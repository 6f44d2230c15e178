//! CLI integration tests
//!
//! Drive the `rollcall` binary against a temporary store directory and
//! check both stdout and the files it leaves behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

struct Fixture {
    _temp_dir: TempDir,
    store: PathBuf,
    incoming: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("store");
        let incoming = temp_dir.path().join("incoming");
        fs::create_dir_all(&store).unwrap();
        fs::create_dir_all(&incoming).unwrap();
        Self {
            _temp_dir: temp_dir,
            store,
            incoming,
        }
    }

    fn snapshot(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.incoming.join(name);
        let mut text = lines.join("\n");
        text.push('\n');
        fs::write(&path, text).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_rollcall"))
            .arg("--dir")
            .arg(&self.store)
            .args(args)
            .output()
            .expect("Failed to execute CLI")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "rollcall {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn observe(&self, label: &str, lines: &[&str]) -> String {
        let path = self.snapshot(&format!("{}.tsv", label), lines);
        self.run_ok(&["observe", "--label", label, "--snapshot", path_str(&path)])
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.store.join(name)).unwrap()
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn is_archived_meta(name: &str) -> bool {
    name.starts_with("_meta.") && name.ends_with(".archived.txt")
}

const ALICE: &str = "Alice\t1\tAgencyA\tOfficer\tActive";
const BOB: &str = "Bob\t2\tAgencyA\tOfficer\tActive";
const CAROL: &str = "Carol\t3\tAgencyB\tSergeant\tActive";

/// Store with L0 {Alice}, L1 {Alice, Bob}, L2 {Bob, Carol}
fn three_label_fixture() -> Fixture {
    let fx = Fixture::new();
    let root = fx.snapshot("L0.tsv", &[ALICE]);
    fx.run_ok(&["init", "--label", "L0", "--snapshot", path_str(&root)]);
    fx.observe("L1", &[ALICE, BOB]);
    fx.observe("L2", &[BOB, CAROL]);
    fx
}

#[test]
fn test_init_and_observe_write_store_files() {
    let fx = three_label_fixture();

    assert_eq!(fx.read("_meta.txt"), "L0\nL1\nL2\n");
    assert_eq!(fx.read("L0.tsv"), format!("{}\n", ALICE));
    assert_eq!(fx.read("L0-L1.tsv"), format!("+{}\n", BOB));
    assert_eq!(fx.read("L1-L2.tsv"), format!("-{}\n+{}\n", ALICE, CAROL));
}

#[test]
fn test_observe_reports_counts_and_repeat() {
    let fx = Fixture::new();
    let root = fx.snapshot("L0.tsv", &[ALICE]);
    fx.run_ok(&["init", "--label", "L0", "--snapshot", path_str(&root)]);

    let stdout = fx.observe("L1", &[BOB]);
    assert!(stdout.contains("Recorded L0 -> L1"));
    assert!(stdout.contains("removed: 1"));
    assert!(stdout.contains("added: 1"));

    let again = fx.observe("L1", &[BOB]);
    assert!(again.contains("Already recorded: L1"));
    assert_eq!(fx.read("_meta.txt"), "L0\nL1\n");
}

#[test]
fn test_observe_rejects_out_of_order_label() {
    let fx = three_label_fixture();
    let path = fx.snapshot("L1b.tsv", &[ALICE]);

    let output = fx.run(&["observe", "--label", "L1b", "--snapshot", path_str(&path)]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
    assert_eq!(fx.read("_meta.txt"), "L0\nL1\nL2\n");
}

#[test]
fn test_replay_by_label_and_index() {
    let fx = three_label_fixture();

    assert_eq!(
        fx.run_ok(&["replay", "--label", "L1"]),
        format!("{}\n{}\n", ALICE, BOB)
    );
    assert_eq!(fx.run_ok(&["replay", "--index", "0"]), format!("{}\n", ALICE));
    assert_eq!(fx.run_ok(&["replay"]), format!("{}\n{}\n", BOB, CAROL));
}

#[test]
fn test_replay_unknown_label_fails() {
    let fx = three_label_fixture();

    let output = fx.run(&["replay", "--label", "L9"]);

    assert!(!output.status.success());
}

#[test]
fn test_segment_with_agency_filter() {
    let fx = three_label_fixture();

    let all = fx.run_ok(&["segment", "--from", "L1", "--to", "L2"]);
    assert_eq!(all, format!("-{}\n+{}\n", ALICE, CAROL));

    let filtered = fx.run_ok(&["segment", "--from", "L1", "--to", "L2", "--agency", "AgencyB"]);
    assert_eq!(filtered, format!("+{}\n", CAROL));
}

#[test]
fn test_labels_and_neighbors() {
    let fx = three_label_fixture();

    assert_eq!(fx.run_ok(&["labels"]), "L0\nL1\nL2\n");

    let around = fx.run_ok(&["labels", "--around", "L0"]);
    assert!(around.contains("previous: -"));
    assert!(around.contains("next: L1"));
}

#[test]
fn test_presence_tallies_and_records() {
    let fx = three_label_fixture();

    // Alice: root + removal, balanced. Bob and Carol: one addition each.
    let tallies = fx.run_ok(&["presence", "--tallies"]);
    assert!(tallies.contains("1\t+1\t-1"));
    assert!(tallies.contains("2\t+1\t-0"));

    assert_eq!(fx.run_ok(&["presence"]), format!("{}\n", ALICE));
}

#[test]
fn test_rebase_moves_root_and_archives_meta() {
    let fx = three_label_fixture();

    let stdout = fx.run_ok(&["rebase", "--label", "L1"]);
    assert!(stdout.contains("root is now L1"));

    assert_eq!(fx.read("_meta.txt"), "L1\nL2\n");
    assert_eq!(fx.read("L1.tsv"), format!("{}\n{}\n", ALICE, BOB));
    let archived = fs::read_dir(&fx.store)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| is_archived_meta(&e.file_name().to_string_lossy()))
        .count();
    assert_eq!(archived, 1);

    assert_eq!(fx.run_ok(&["replay"]), format!("{}\n{}\n", BOB, CAROL));
}

#[test]
fn test_rebase_has_no_archive_opt_out() {
    let fx = three_label_fixture();

    let output = fx.run(&["rebase", "--index", "2", "--no-archive"]);

    assert!(!output.status.success());
    assert_eq!(fx.read("_meta.txt"), "L0\nL1\nL2\n");
}

#[test]
fn test_stats_json_reads_config_file() {
    let fx = three_label_fixture();
    fs::write(fx.store.join("rollcall.toml"), "rebase_threshold = 2\n").unwrap();

    let stdout = fx.run_ok(&["stats", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(report["label"], "L2");
    assert_eq!(report["roster"]["total"], 2);
    assert_eq!(report["roster"]["agencies"], 2);
    assert_eq!(report["segments"], 2);
    assert_eq!(report["rebase_due"], true);
}

#[test]
fn test_stats_status_breakdown() {
    let fx = three_label_fixture();

    let stdout = fx.run_ok(&[
        "stats", "--json", "--status", "active", "--agency", "agencyb", "--rank", "officer",
    ]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(report["status"]["distinct_names"], 2);
    assert_eq!(report["status"]["in_agencies"], 1);
    assert_eq!(report["status"]["with_rank"], 1);

    let plain: serde_json::Value = serde_json::from_str(&fx.run_ok(&["stats", "--json"])).unwrap();
    assert!(plain.get("status").is_none());
}

#[test]
fn test_stats_agency_requires_status() {
    let fx = three_label_fixture();

    let output = fx.run(&["stats", "--agency", "agencyb"]);

    assert!(!output.status.success());
}

#[test]
fn test_invalid_config_is_reported() {
    let fx = three_label_fixture();
    let config = fx.incoming.join("bad.toml");
    fs::write(&config, "no_such_key = 1\n").unwrap();

    let output = fx.run(&["--config", path_str(&config), "labels"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_json_log_format_keeps_stdout_clean() {
    let fx = three_label_fixture();

    let stdout = fx.run_ok(&["--log-format", "json", "labels"]);

    assert_eq!(stdout, "L0\nL1\nL2\n");
}
