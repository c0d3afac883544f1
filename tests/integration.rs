use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
const WINDOW: &str = "2024-05-01..2024-05-31";

/// Run the binary with an isolated (missing) config file.
fn cargo_bin(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pair-sight"));
    cmd.arg("--config").arg(config_dir.join("config.toml"));
    cmd
}

struct Repo {
    dir: TempDir,
}

impl Repo {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Self { dir };
        repo.git(&["init", "-q"], "2024-05-01T00:00:00+00:00");
        repo
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn path_str(&self) -> &str {
        self.dir.path().to_str().unwrap()
    }

    fn git(&self, args: &[&str], date: &str) {
        let status = Command::new("git")
            .args(["-c", "user.name=Committer", "-c", "user.email=ci@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .current_dir(self.path())
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .stdout(Stdio::null())
            .status()
            .expect("failed to run git");
        assert!(status.success(), "git {args:?} failed");
    }

    fn commit(&self, date: &str, author: &str, co_authors: &[&str]) {
        let mut message = String::from("work\n\n");
        for co in co_authors {
            message.push_str(&format!("Co-authored-by: {co}\n"));
        }
        let author_arg = format!("--author={author}");
        self.git(
            &[
                "commit",
                "-q",
                "--allow-empty",
                author_arg.as_str(),
                "-m",
                message.as_str(),
            ],
            date,
        );
    }

    fn write_team(&self, content: &str) {
        fs::write(self.path().join(".team"), content).unwrap();
    }
}

fn run_json(cmd: &mut Command) -> (bool, serde_json::Value) {
    let output = cmd.output().expect("failed to run");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid JSON");
    (output.status.success(), json)
}

fn matrix_count(json: &serde_json::Value, a: &str, b: &str) -> u64 {
    json["matrix"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| {
            (e["developer_a"] == a && e["developer_b"] == b)
                || (e["developer_a"] == b && e["developer_b"] == a)
        })
        .map(|e| e["count"].as_u64().unwrap())
        .unwrap_or(0)
}

#[test]
fn doctor_returns_json() {
    let tmp = TempDir::new().unwrap();
    let (ok, json) = run_json(cargo_bin(tmp.path()).arg("doctor"));
    assert!(ok);
    assert_eq!(json["version"], PKG_VERSION);
    assert_eq!(json["git"]["available"], true);
}

#[test]
fn matrix_counts_days_not_commits() {
    let repo = Repo::new();
    repo.commit("2024-05-06T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>"]);
    repo.commit("2024-05-06T16:00:00+00:00", "Ben <b@x.com>", &["Ann <a@x.com>"]);
    repo.commit("2024-05-07T10:00:00+00:00", "Ann <a@x.com>", &["Cat <c@x.com>"]);

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "matrix",
        "--dir",
        repo.path_str(),
        "--window",
        WINDOW,
    ]));
    assert!(ok, "{json}");
    assert_eq!(json["commits_analyzed"], 3);
    assert_eq!(json["team"], false);
    assert_eq!(json["developers"].as_array().unwrap().len(), 3);
    assert_eq!(matrix_count(&json, "a@x.com", "b@x.com"), 1);
    assert_eq!(matrix_count(&json, "a@x.com", "c@x.com"), 1);
    assert_eq!(matrix_count(&json, "b@x.com", "c@x.com"), 0);

    let ab = &json["matrix"][0];
    assert_eq!(ab["developer_a"], "a@x.com");
    assert_eq!(ab["developer_b"], "b@x.com");
    assert_eq!(ab["last_paired"], "2024-05-06");
    assert_eq!(json["matrix"][1]["last_paired"], "2024-05-07");
    assert_eq!(json["recommendation_status"], "skipped");
}

#[test]
fn window_excludes_older_commits() {
    let repo = Repo::new();
    repo.commit("2024-04-10T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>"]);
    repo.commit("2024-05-03T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>"]);

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "matrix",
        "--dir",
        repo.path_str(),
        "--window",
        WINDOW,
    ]));
    assert!(ok);
    assert_eq!(json["commits_analyzed"], 1);
    assert_eq!(matrix_count(&json, "a@x.com", "b@x.com"), 1);
}

#[test]
fn team_file_merges_aliases() {
    let repo = Repo::new();
    repo.write_team("Alice <alice@x.com>,<alice@home.org>\nBob <bob@x.com>\n");
    repo.commit("2024-05-06T09:00:00+00:00", "Alice <alice@x.com>", &["Bob <bob@x.com>"]);
    repo.commit("2024-05-07T09:00:00+00:00", "Al <alice@home.org>", &["Bob <bob@x.com>"]);
    repo.commit("2024-05-07T10:00:00+00:00", "Guest <guest@y.com>", &["Bob <bob@x.com>"]);

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "matrix",
        "--dir",
        repo.path_str(),
        "--window",
        WINDOW,
    ]));
    assert!(ok, "{json}");
    assert_eq!(json["team"], true);
    let developers = json["developers"].as_array().unwrap();
    assert_eq!(developers.len(), 2);
    assert_eq!(developers[0]["name"], "Alice");
    assert_eq!(developers[0]["emails"].as_array().unwrap().len(), 2);
    assert_eq!(matrix_count(&json, "alice@x.com", "bob@x.com"), 2);
    assert_eq!(json["matrix"].as_array().unwrap().len(), 1);
}

#[test]
fn team_sections_narrow_developers() {
    let repo = Repo::new();
    repo.write_team("[core]\nAnn <a@x.com>\nBen <b@x.com>\n[web]\nCat <c@x.com>\n");
    repo.commit("2024-05-06T09:00:00+00:00", "Ann <a@x.com>", &["Cat <c@x.com>"]);

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "matrix",
        "--dir",
        repo.path_str(),
        "--window",
        WINDOW,
        "--section",
        "core",
    ]));
    assert!(ok, "{json}");
    let emails: Vec<&str> = json["developers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    assert!(json["matrix"].as_array().unwrap().is_empty());

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "matrix",
        "--dir",
        repo.path_str(),
        "--section",
        "ops",
    ]));
    assert!(!ok);
    assert_eq!(json["error"]["code"], "TEAM_FILE_ERROR");
}

#[test]
fn recommend_least_paired_covers_everyone() {
    let repo = Repo::new();
    repo.commit("2024-05-06T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>"]);
    repo.commit("2024-05-07T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>"]);
    repo.commit("2024-05-08T09:00:00+00:00", "Cat <c@x.com>", &["Dan <d@x.com>"]);
    repo.commit("2024-05-09T09:00:00+00:00", "Eve <e@x.com>", &[]);

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "recommend",
        "--dir",
        repo.path_str(),
        "--window",
        WINDOW,
    ]));
    assert!(ok, "{json}");
    assert_eq!(json["strategy"], "least-paired");
    assert_eq!(json["recommendation_status"], "ready");

    let recs = json["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    let mut members: Vec<&str> = Vec::new();
    for rec in recs {
        members.push(rec["developer_a"].as_str().unwrap());
        if let Some(b) = rec["developer_b"].as_str() {
            members.push(b);
        }
    }
    members.sort();
    assert_eq!(members, vec!["a@x.com", "b@x.com", "c@x.com", "d@x.com", "e@x.com"]);
    assert!(recs[..2].iter().all(|r| r["count"] == 0));
    assert!(recs[2]["developer_b"].is_null());
}

#[test]
fn recommend_least_recent_prefers_never_paired() {
    let repo = Repo::new();
    repo.commit("2024-05-03T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>"]);
    repo.commit("2024-05-20T09:00:00+00:00", "Ann <a@x.com>", &["Cat <c@x.com>"]);
    repo.commit("2024-05-21T09:00:00+00:00", "Ben <b@x.com>", &["Cat <c@x.com>"]);
    repo.commit("2024-05-21T10:00:00+00:00", "Dan <d@x.com>", &[]);

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "recommend",
        "--dir",
        repo.path_str(),
        "--window",
        WINDOW,
        "--strategy",
        "least-recent",
    ]));
    assert!(ok, "{json}");
    let recs = json["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    // a-d has never happened and sorts first; b-c is what remains
    assert_eq!(recs[0]["developer_a"], "a@x.com");
    assert_eq!(recs[0]["developer_b"], "d@x.com");
    assert_eq!(recs[0]["has_paired"], false);
    assert_eq!(recs[0]["days_since"], -1);
    assert_eq!(recs[1]["developer_a"], "b@x.com");
    assert_eq!(recs[1]["developer_b"], "c@x.com");
    assert_eq!(recs[1]["has_paired"], true);
    assert_eq!(recs[1]["last_paired"], "2024-05-21");
}

#[test]
fn recommend_suppressed_for_large_teams() {
    let repo = Repo::new();
    repo.commit("2024-05-06T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>", "Cat <c@x.com>"]);

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "recommend",
        "--dir",
        repo.path_str(),
        "--window",
        WINDOW,
        "--max-developers",
        "2",
    ]));
    assert!(ok);
    assert_eq!(json["recommendation_status"], "too_many");
    assert!(json.get("recommendations").is_none());
    assert_eq!(json["matrix"].as_array().unwrap().len(), 3);
}

#[test]
fn recommend_with_single_developer_is_too_few() {
    let repo = Repo::new();
    repo.commit("2024-05-06T09:00:00+00:00", "Ann <a@x.com>", &[]);

    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "recommend",
        "--dir",
        repo.path_str(),
        "--window",
        WINDOW,
    ]));
    assert!(ok);
    assert_eq!(json["recommendation_status"], "too_few");
}

#[test]
fn invalid_window_is_rejected() {
    let repo = Repo::new();
    let (ok, json) = run_json(cargo_bin(repo.path()).args([
        "matrix",
        "--dir",
        repo.path_str(),
        "--window",
        "forever",
    ]));
    assert!(!ok);
    assert_eq!(json["error"]["code"], "INVALID_WINDOW");
}

#[test]
fn non_repository_is_git_error() {
    let tmp = TempDir::new().unwrap();
    let (ok, json) = run_json(cargo_bin(tmp.path()).args([
        "matrix",
        "--dir",
        tmp.path().to_str().unwrap(),
    ]));
    assert!(!ok);
    assert_eq!(json["error"]["code"], "GIT_ERROR");
}

#[test]
fn missing_directory_is_invalid_request() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    let (ok, json) = run_json(cargo_bin(tmp.path()).args([
        "matrix",
        "--dir",
        missing.to_str().unwrap(),
    ]));
    assert!(!ok);
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
}

#[test]
fn session_answers_each_line() {
    let repo = Repo::new();
    repo.commit("2024-05-06T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>"]);

    let mut child = cargo_bin(repo.path())
        .arg("session")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn");
    {
        let stdin = child.stdin.as_mut().unwrap();
        let request = serde_json::json!({
            "command": "recommend",
            "dir": repo.path_str(),
            "window": WINDOW,
        });
        writeln!(stdin, "{request}").unwrap();
        writeln!(stdin, "{{\"command\":\"explode\"}}").unwrap();
        writeln!(stdin, "{{\"command\":\"doctor\"}}").unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let lines: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["recommendation_status"], "ready");
    assert_eq!(lines[0]["recommendations"][0]["count"], 1);
    assert_eq!(lines[1]["error"]["code"], "INVALID_REQUEST");
    assert_eq!(lines[2]["version"], PKG_VERSION);
}

#[test]
fn init_writes_config() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("conf").join("config.toml");
    let output = cargo_bin(tmp.path())
        .args(["init", "--path", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("strategy = \"least-paired\""));
}

#[test]
fn config_supplies_default_strategy() {
    let repo = Repo::new();
    repo.commit("2024-05-06T09:00:00+00:00", "Ann <a@x.com>", &["Ben <b@x.com>"]);
    let config = repo.path().join("config.toml");
    fs::write(
        &config,
        format!("strategy = \"least-recent\"\nwindow = \"{WINDOW}\"\n"),
    )
    .unwrap();

    let (ok, json) = run_json(cargo_bin(repo.path()).args(["recommend", "--dir", repo.path_str()]));
    assert!(ok, "{json}");
    assert_eq!(json["strategy"], "least-recent");
    assert!(json["recommendations"][0]["days_since"].is_i64());
    assert_eq!(json["window"]["since"], "2024-05-01");
}
