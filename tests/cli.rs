use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_taskcat"))
}

fn run_cmd(home: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(bin_path());
    cmd.arg("--home").arg(home);
    cmd.args(args);
    cmd.env_remove("TASKCAT_LOG");
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd.output().expect("run command")
}

fn output_stdout(output: Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout utf8")
}

fn output_json(output: Output) -> Value {
    let stdout = output_stdout(output);
    serde_json::from_str(&stdout).expect("json output")
}

fn parse_task_id(stdout: &str) -> i64 {
    let prefix = "Created task ID: ";
    let rest = stdout.trim().strip_prefix(prefix).expect("task output");
    let id_str = rest.split(':').next().expect("task id");
    id_str.trim().parse().expect("task id parse")
}

fn add_task(dir: &TempDir, title: &str, account_name: &str, account_type: &str) -> i64 {
    let stdout = output_stdout(run_cmd(
        dir.path(),
        &[
            "task",
            "add",
            title,
            "--account-name",
            account_name,
            "--account-type",
            account_type,
        ],
    ));
    parse_task_id(&stdout)
}

fn set_category(dir: &TempDir, task_id: i64, extra: &[&str]) -> Value {
    let task_id = task_id.to_string();
    let mut args = vec!["--json", "category", "set", task_id.as_str()];
    args.extend_from_slice(extra);
    output_json(run_cmd(dir.path(), &args))
}

fn categories(dir: &TempDir) -> Vec<Value> {
    output_json(run_cmd(dir.path(), &["--json", "category", "list"]))
        .as_array()
        .expect("category array")
        .clone()
}

fn relations(dir: &TempDir) -> Vec<(i64, i64)> {
    output_json(run_cmd(dir.path(), &["--json", "category", "relations"]))
        .as_array()
        .expect("relation array")
        .iter()
        .map(|row| {
            (
                row["task_id"].as_i64().expect("task id"),
                row["category_id"].as_i64().expect("category id"),
            )
        })
        .collect()
}

#[test]
fn set_category_creates_then_reuses_category() {
    let dir = TempDir::new().expect("temp dir");
    let first = add_task(&dir, "T1", "alice", "local");
    let second = add_task(&dir, "T2", "alice", "local");

    let property = set_category(&dir, first, &["--name", "Work", "--color", "#FF0000"]);
    let category_id = property["category_id"].as_i64().expect("category id");
    assert_eq!(property["task_id"].as_i64(), Some(first));
    assert_eq!(property["category_name"], "Work");
    assert_eq!(property["category_color"].as_i64(), Some(0xFF0000));

    let property = set_category(&dir, second, &["--name", "Work"]);
    assert_eq!(property["category_id"].as_i64(), Some(category_id));
    assert_eq!(property["category_color"].as_i64(), Some(0xFF0000));

    let categories = categories(&dir);
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["account_name"], "alice");
    assert_eq!(categories[0]["account_type"], "local");
    assert_eq!(
        relations(&dir),
        vec![(first, category_id), (second, category_id)]
    );
}

#[test]
fn set_category_without_id_or_name_fails_without_writes() {
    let dir = TempDir::new().expect("temp dir");
    let task_id = add_task(&dir, "T1", "alice", "local");

    let output = run_cmd(
        dir.path(),
        &["category", "set", &task_id.to_string(), "--color", "#00FF00"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("neither an id nor a category name was supplied"),
        "stderr: {stderr}"
    );
    assert!(categories(&dir).is_empty());
    assert!(relations(&dir).is_empty());
}

#[test]
fn update_switches_category_but_keeps_old_relation() {
    let dir = TempDir::new().expect("temp dir");
    let task_id = add_task(&dir, "T1", "alice", "local");
    let property = set_category(&dir, task_id, &["--name", "Work"]);
    let property_id = property["id"].as_i64().expect("property id");
    let work_id = property["category_id"].as_i64().expect("category id");

    let updated = output_json(run_cmd(
        dir.path(),
        &[
            "--json",
            "category",
            "update",
            &property_id.to_string(),
            &task_id.to_string(),
            "--name",
            "Home",
        ],
    ));
    let home_id = updated["category_id"].as_i64().expect("category id");
    assert_ne!(home_id, work_id);
    assert_eq!(updated["category_name"], "Home");
    assert_eq!(categories(&dir).len(), 2);
    assert_eq!(relations(&dir), vec![(task_id, work_id)]);
}

#[test]
fn moving_property_requires_sync_adapter_flag() {
    let dir = TempDir::new().expect("temp dir");
    let first = add_task(&dir, "T1", "alice", "local");
    let second = add_task(&dir, "T2", "alice", "local");
    let property = set_category(&dir, first, &["--name", "Work"]);
    let property_id = property["id"].as_i64().expect("property id").to_string();
    let second_str = second.to_string();

    let denied = run_cmd(
        dir.path(),
        &["category", "update", &property_id, &second_str, "--name", "Work"],
    );
    assert!(!denied.status.success());

    let moved = output_json(run_cmd(
        dir.path(),
        &[
            "--json",
            "--sync-adapter",
            "category",
            "update",
            &property_id,
            &second_str,
            "--name",
            "Work",
        ],
    ));
    assert_eq!(moved["task_id"].as_i64(), Some(second));
}

#[test]
fn check_reports_existing_and_new_categories() {
    let dir = TempDir::new().expect("temp dir");
    let task_id = add_task(&dir, "T1", "alice", "local").to_string();
    set_category(&dir, task_id.parse().expect("task id"), &["--name", "Work"]);

    let existing = output_stdout(run_cmd(
        dir.path(),
        &["category", "check", &task_id, "--name", "Work"],
    ));
    assert!(existing.starts_with("Existing category ID: "), "{existing}");

    let fresh = output_json(run_cmd(
        dir.path(),
        &["--json", "category", "check", &task_id, "--name", "Errands"],
    ));
    assert_eq!(fresh["resolution"]["kind"], "new");
    assert_eq!(fresh["scope"]["name"], "alice");
    assert_eq!(categories(&dir).len(), 1);
}

#[test]
fn task_show_lists_linked_categories() {
    let dir = TempDir::new().expect("temp dir");
    let task_id = add_task(&dir, "Write report", "alice", "local");
    set_category(&dir, task_id, &["--name", "Work", "--color", "0xFF0000"]);

    let stdout = output_stdout(run_cmd(dir.path(), &["task", "show", &task_id.to_string()]));
    assert!(stdout.contains("Title: Write report"), "{stdout}");
    assert!(stdout.contains("Account: alice/local"), "{stdout}");
    assert!(stdout.contains("Work #FF0000 (alice/local)"), "{stdout}");
}

#[test]
fn categories_are_scoped_per_account() {
    let dir = TempDir::new().expect("temp dir");
    let alice = add_task(&dir, "T1", "alice", "local");
    let bob = add_task(&dir, "T2", "bob", "local");
    set_category(&dir, alice, &["--name", "Work"]);
    set_category(&dir, bob, &["--name", "Work"]);

    assert_eq!(categories(&dir).len(), 2);
    let scoped = output_json(run_cmd(
        dir.path(),
        &[
            "--json",
            "category",
            "list",
            "--account-name",
            "bob",
            "--account-type",
            "local",
        ],
    ));
    let scoped = scoped.as_array().expect("category array");
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0]["account_name"], "bob");
}
