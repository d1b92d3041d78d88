//! Integration tests for the command dispatcher
//!
//! Each test stages real files in a temporary Terraform directory and runs
//! operator lines through a `Session` backed by the in-memory driver. The
//! driver's apply performs the actual JSON to Parquet conversion, the way the
//! Terraform provisioner does.

#![expect(clippy::unwrap_used)]

mod common;

use common::FakeDriver;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use terrafs::dataset::DatasetNaming;
use terrafs::repl::{Flow, Session};
use terrafs::workspace::{LifecycleManager, WorkspaceState};

const SAMPLE: &str = r#"[{"id":1,"name":"a"}]"#;

struct Harness {
    _temp: TempDir,
    staging: PathBuf,
    uploads: PathBuf,
    session: Session<FakeDriver>,
}

impl Harness {
    fn new() -> Self {
        Self::with_driver(FakeDriver::new())
    }

    fn with_driver(driver: FakeDriver) -> Self {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("fs-terraform-config");
        let uploads = temp.path().join("uploads");
        std::fs::create_dir(&staging).unwrap();
        std::fs::create_dir(&uploads).unwrap();

        let manager = LifecycleManager::new(
            driver.converting_in(&staging),
            DatasetNaming::default(),
        );
        let session = Session::new(manager, &staging);
        Self {
            _temp: temp,
            staging,
            uploads,
            session,
        }
    }

    fn write_upload(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.uploads.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn line(&mut self, line: &str) -> String {
        let mut out = Vec::new();
        let flow = self.session.handle_line(line, &mut out).unwrap();
        assert_eq!(flow, Flow::Continue, "`{line}` should not end the loop");
        String::from_utf8(out).unwrap()
    }

    fn upload(&mut self, path: &Path) -> String {
        self.line(&format!("upload {}", path.display()))
    }

    fn driver(&self) -> &FakeDriver {
        self.session.manager().driver()
    }

    fn staged_files(&self) -> Vec<String> {
        std::fs::read_dir(&self.staging)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

#[test]
fn test_upload_new_dataset() {
    let mut h = Harness::new();
    let file = h.write_upload("foo.json", r#"[{"a":"x","b":1.5},{"a":"y"}]"#);

    let out = h.upload(&file);

    assert_eq!(out, "Successfully created foo.json and foo.parquet\n");
    assert_eq!(
        h.session.registry().state_of("foo"),
        WorkspaceState::PresentActive
    );
    assert!(
        h.staged_files().is_empty(),
        "staging dir should be clean, found {:?}",
        h.staged_files()
    );

    let report = h.driver().converted.first().unwrap();
    assert_eq!(report.rows, 2);
    assert_eq!(report.columns, 2);
}

#[test]
fn test_upload_from_staging_dir_keeps_input() {
    let mut h = Harness::new();
    let file = h.staging.join("foo.json");
    std::fs::write(&file, SAMPLE).unwrap();

    let out = h.upload(&file);

    assert_eq!(out, "Successfully created foo.json and foo.parquet\n");
    assert_eq!(std::fs::read_to_string(&file).unwrap(), SAMPLE);
    assert_eq!(h.staged_files(), vec!["foo.json"]);
    assert_eq!(h.driver().converted.first().unwrap().rows, 1);
}

#[test]
fn test_upload_twice_rewrites() {
    let mut h = Harness::new();
    let file = h.write_upload("foo.json", r#"[{"a":1}]"#);

    h.upload(&file);
    let out = h.upload(&file);

    assert!(out.contains("Warning: file foo already exists, rewriting"), "{out}");
    assert!(out.contains("Successfully created foo.json and foo.parquet"), "{out}");
    assert_eq!(h.driver().count_calls("workspace new foo"), 1);
    assert_eq!(h.driver().count_calls("apply foo"), 2);
}

#[test]
fn test_upload_missing_file() {
    let mut h = Harness::new();
    let missing = h.uploads.join("nope.json");

    let out = h.upload(&missing);

    assert!(out.contains("does not exist"), "{out}");
    assert_eq!(h.driver().count_calls_of("workspace new"), 0);
    assert!(!h.driver().has_workspace("nope"));
}

#[test]
fn test_upload_apply_failure_keeps_workspace() {
    let mut driver = FakeDriver::new();
    driver.fail_apply.insert("foo".to_owned());
    let mut h = Harness::with_driver(driver);
    let file = h.write_upload("foo.json", SAMPLE);

    let out = h.upload(&file);

    assert!(out.contains("exited with status 1"), "{out}");
    assert!(!out.contains("Successfully"), "{out}");
    assert_eq!(
        h.session.registry().state_of("foo"),
        WorkspaceState::PresentActive
    );
    assert_eq!(h.staged_files(), vec!["foo.json"]);
}

#[test]
fn test_missing_staging_dir_is_reported() {
    let mut h = Harness::new();
    std::fs::remove_dir(&h.staging).unwrap();
    let file = h.write_upload("foo.json", SAMPLE);

    for line in [
        format!("upload {}", file.display()),
        "delete foo.json".to_owned(),
        "delete all".to_owned(),
        "list".to_owned(),
    ] {
        let out = h.line(&line);
        assert!(
            out.starts_with("Configuration error: Terraform config directory does not exist"),
            "`{line}` printed {out}"
        );
    }
    assert!(h.driver().calls.is_empty());
}

#[test]
fn test_list_output() {
    let mut h = Harness::new();
    assert_eq!(h.line("list"), "No files found\n");

    let foo = h.write_upload("foo.json", SAMPLE);
    let bar = h.write_upload("bar.json", SAMPLE);
    h.upload(&foo);
    h.upload(&bar);

    assert_eq!(
        h.line("list"),
        "Available files:\n- foo.json\n- foo.parquet\n- bar.json *\n- bar.parquet *\n"
    );
}

#[test]
fn test_delete_dataset() {
    let mut h = Harness::new();
    let file = h.write_upload("foo.json", SAMPLE);
    h.upload(&file);

    assert_eq!(
        h.line("delete foo.json"),
        "Successfully deleted foo.json and foo.parquet\n"
    );
    assert!(!h.driver().has_workspace("foo"));
    assert_eq!(h.driver().active, "default");

    assert_eq!(
        h.line("delete foo.json"),
        "terraform workspace for foo not found\n"
    );
}

#[test]
fn test_delete_all() {
    let mut h = Harness::new();
    assert_eq!(h.line("delete all"), "No Terraform workspaces to delete.\n");

    for name in ["a.json", "b.json"] {
        let file = h.write_upload(name, SAMPLE);
        h.upload(&file);
    }

    assert_eq!(
        h.line("delete all"),
        "Successfully deleted a.json and a.parquet\n\
         Successfully deleted b.json and b.parquet\n\
         Successfully deleted all files\n"
    );
    assert_eq!(h.driver().workspaces, vec!["default"]);
}

#[test]
fn test_delete_all_reports_partial_progress() {
    let mut driver = FakeDriver::with_workspaces(&["a", "b", "c"]);
    driver.fail_destroy.insert("b".to_owned());
    let mut h = Harness::with_driver(driver);

    let out = h.line("delete all");

    assert!(out.starts_with("Successfully deleted a.json and a.parquet\n"), "{out}");
    assert!(out.contains("`destroy b` exited with status 1"), "{out}");
    assert!(!out.contains("Successfully deleted all files"), "{out}");
    assert!(h.driver().has_workspace("b"));
    assert!(h.driver().has_workspace("c"));
}

#[test]
fn test_bad_commands_are_not_fatal() {
    let mut h = Harness::new();

    let out = h.line("frobnicate");
    assert!(out.starts_with("Unknown command.\n"), "{out}");
    assert!(out.contains("upload <file>"), "{out}");

    assert_eq!(h.line("upload"), "Usage: upload <file>\n");
    assert_eq!(h.line("delete"), "Usage: delete <file>|all\n");
    assert_eq!(h.line(""), "");
    assert!(h.driver().calls.is_empty());
}

#[test]
fn test_run_stops_at_exit() {
    let mut h = Harness::new();
    let input = "list\nexit\nlist\n";
    let mut out = Vec::new();

    h.session.run(input.as_bytes(), &mut out).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Starting Terraform FS REPL\n"), "{out}");
    assert_eq!(out.matches("No files found").count(), 1, "{out}");
    assert!(out.contains("Exiting REPL..."), "{out}");
}

#[test]
fn test_run_ends_on_eof() {
    let mut h = Harness::new();
    let mut out = Vec::new();

    h.session.run("list\n".as_bytes(), &mut out).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.matches("\n> ").count(), 2, "{out}");
    assert!(!out.contains("Exiting REPL..."), "{out}");
}

#[test]
fn test_exit_returns_exit_flow() {
    let mut h = Harness::new();
    let mut out = Vec::new();
    let flow = h.session.handle_line("exit", &mut out).unwrap();
    assert_eq!(flow, Flow::Exit);
}
