use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::{ErrorCode, PairError};
use crate::models::developer::Developer;

/// Default team file name looked up in the repository root.
pub const DEFAULT_TEAM_FILE: &str = ".team";

/// A parsed team file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Team {
    members: Vec<TeamMember>,
    sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct TeamMember {
    developer: Developer,
    /// `None` for entries above the first section header
    section: Option<String>,
}

impl Team {
    /// All developers in file order.
    pub fn developers(&self) -> Vec<Developer> {
        self.members.iter().map(|m| m.developer.clone()).collect()
    }

    /// Section names in file order.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Developers belonging to any of `sections`, in file order.
    ///
    /// An empty selection returns every developer.
    pub fn select(&self, sections: &[String]) -> Result<Vec<Developer>, PairError> {
        if sections.is_empty() {
            return Ok(self.developers());
        }
        if let Some(unknown) = sections.iter().find(|s| !self.sections.contains(*s)) {
            return Err(PairError::new(
                ErrorCode::TeamFileError,
                format!(
                    "Unknown team section '{unknown}' (available: {})",
                    self.sections.join(", ")
                ),
            ));
        }
        Ok(self
            .members
            .iter()
            .filter(|m| m.section.as_ref().is_some_and(|s| sections.contains(s)))
            .map(|m| m.developer.clone())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Parse team file content.
///
/// ```text
/// # comment
/// Alice Example <alice@x.com>,<alice@y.com>
/// [backend]
/// Bob Example <bob@x.com>
/// ```
pub fn parse_team(content: &str) -> Result<Team, PairError> {
    let mut team = Team::default();
    let mut current: Option<String> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| PairError::team_file(line_no, "malformed section header"))?;
            if !team.sections.iter().any(|s| s == name) {
                team.sections.push(name.to_string());
            }
            current = Some(name.to_string());
            continue;
        }

        if !trimmed.contains('<') {
            return Err(PairError::team_file(
                line_no,
                format!("expected 'Name <email>', got '{trimmed}'"),
            ));
        }
        let developer = Developer::parse(trimmed)
            .ok_or_else(|| PairError::team_file(line_no, "no email address"))?;
        team.members.push(TeamMember {
            developer,
            section: current.clone(),
        });
    }

    Ok(team)
}

/// Read and parse a team file.
pub fn load_team(path: &Path) -> Result<Team> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read team file: {}", path.display()))?;
    Ok(parse_team(&content)?)
}
