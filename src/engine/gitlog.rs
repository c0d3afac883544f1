use std::process::Command;

use anyhow::{Result, bail};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use super::window::Window;
use crate::error::PairError;
use crate::models::commit::Commit;

const RECORD_SEP: char = '\x1e';
const FIELD_SEP: char = '\x1f';
const CO_AUTHOR_KEY: &str = "co-authored-by:";

/// Load non-merge commits in `window` from the git repository at `dir`.
pub fn load_commits(dir: &str, window: &Window) -> Result<Vec<Commit>> {
    let since = format!("--since={} 00:00:00", window.since());
    let until = format!("--until={} 23:59:59", window.until());
    let output = Command::new("git")
        .args([
            "log",
            "--no-merges",
            since.as_str(),
            until.as_str(),
            "--format=%x1e%aI%x1f%an <%ae>%x1f%B",
        ])
        .current_dir(dir)
        .output()
        .map_err(|e| PairError::git(format!("Failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(PairError::git(format!("git log failed: {}", stderr.trim())));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let commits: Vec<Commit> = parse_log(&stdout)
        .into_iter()
        .filter(|c| window.contains(c.day()))
        .collect();
    debug!(
        dir = dir,
        since = %window.since(),
        until = %window.until(),
        commits = commits.len(),
        "load_commits completed"
    );
    Ok(commits)
}

/// Parse `git log` output produced with the record format used by
/// [`load_commits`].
pub fn parse_log(output: &str) -> Vec<Commit> {
    output
        .split(RECORD_SEP)
        .filter(|record| !record.trim().is_empty())
        .filter_map(parse_record)
        .collect()
}

fn parse_record(record: &str) -> Option<Commit> {
    let mut fields = record.splitn(3, FIELD_SEP);
    let raw_date = fields.next()?.trim();
    let author = fields.next()?.trim();
    let body = fields.next().unwrap_or("");

    let date = match OffsetDateTime::parse(raw_date, &Rfc3339) {
        Ok(date) => date,
        Err(e) => {
            debug!(date = raw_date, error = %e, "parse_log: skipping record with bad date");
            return None;
        }
    };

    let mut commit = Commit::new(date, author);
    commit.co_authors = co_authors(body);
    Some(commit)
}

/// Values of every `Co-authored-by:` trailer line in a commit message.
fn co_authors(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| {
            let line = line.trim();
            let key = line.get(..CO_AUTHOR_KEY.len())?;
            if !key.eq_ignore_ascii_case(CO_AUTHOR_KEY) {
                return None;
            }
            let value = line[CO_AUTHOR_KEY.len()..].trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect()
}
