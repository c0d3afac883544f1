use serde::Serialize;
use std::process::Command;

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub version: String,
    pub git: GitStatus,
}

#[derive(Debug, Serialize)]
pub struct GitStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Run the doctor check: verify that `git` can be executed.
pub fn run_doctor() -> DoctorReport {
    let version = Command::new("git")
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| parse_git_version(&String::from_utf8_lossy(&out.stdout)));

    DoctorReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git: GitStatus {
            available: version.is_some(),
            version,
        },
    }
}

/// `"git version 2.43.0\n"` → `"2.43.0"`.
fn parse_git_version(output: &str) -> String {
    let trimmed = output.trim();
    trimmed
        .strip_prefix("git version ")
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_version_line() {
        assert_eq!(parse_git_version("git version 2.43.0\n"), "2.43.0");
        assert_eq!(parse_git_version("custom"), "custom");
    }
}
