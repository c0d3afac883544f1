use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::engine::builder::{PairMatrixResult, build_pair_matrix};
use crate::engine::recommend::{RecommendOptions, generate_recommendations, local_today};
use crate::engine::registry::{Registry, RegistryConflict};
use crate::engine::team::{DEFAULT_TEAM_FILE, load_team};
use crate::engine::window::Window;
use crate::engine::gitlog;
use crate::error::{ErrorCode, PairError};
use crate::models::report::PairReport;

// ---------------------------------------------------------------------------
// AppService: unified core logic for CLI / Session / MCP
// ---------------------------------------------------------------------------

pub struct AppService {
    workspace_root: Option<PathBuf>,
}

/// Inputs shared by matrix and recommendation requests.
pub struct AnalyzeParams<'a> {
    pub dir: &'a str,
    pub window: &'a str,
    /// Explicit team file; `<dir>/.team` is used when absent and present
    pub team: Option<&'a str>,
    pub sections: &'a [String],
}

struct Analysis {
    window: Window,
    commits_analyzed: usize,
    result: PairMatrixResult,
    /// `Some` when a team file was in effect
    conflicts: Option<Vec<RegistryConflict>>,
}

impl Default for AppService {
    fn default() -> Self {
        Self::new()
    }
}

impl AppService {
    /// Create an unrestricted service (CLI mode).
    pub fn new() -> Self {
        Self {
            workspace_root: None,
        }
    }

    /// Create a sandboxed service (MCP mode) that restricts paths to `root`.
    pub fn sandboxed(root: PathBuf) -> Result<Self> {
        let canonical_root = std::fs::canonicalize(&root).map_err(|_| {
            PairError::new(
                ErrorCode::InvalidRequest,
                format!("Invalid workspace root: {}", root.display()),
            )
        })?;
        Ok(Self {
            workspace_root: Some(canonical_root),
        })
    }

    /// Create a sandboxed service from `PAIR_SIGHT_WORKSPACE` (Session mode).
    pub fn from_env() -> Self {
        match std::env::var("PAIR_SIGHT_WORKSPACE") {
            Ok(ws) if !ws.is_empty() => {
                Self::sandboxed(PathBuf::from(ws)).unwrap_or_else(|_| Self::new())
            }
            _ => Self::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Validation helpers
    // -----------------------------------------------------------------------

    fn within_workspace(&self, canonical: &Path, original: &str) -> Result<()> {
        if let Some(root) = &self.workspace_root
            && !canonical.starts_with(root)
        {
            warn!(path = original, "path outside workspace boundary");
            bail!(PairError::new(
                ErrorCode::InvalidRequest,
                format!("Path outside workspace boundary: {original}"),
            ));
        }
        Ok(())
    }

    fn validate_dir(&self, dir: &str) -> Result<PathBuf> {
        let canonical = std::fs::canonicalize(dir).map_err(|_| {
            PairError::new(
                ErrorCode::InvalidRequest,
                format!("Directory not found: {dir}"),
            )
        })?;
        if !canonical.is_dir() {
            bail!(PairError::new(
                ErrorCode::InvalidRequest,
                format!("Not a directory: {dir}"),
            ));
        }
        self.within_workspace(&canonical, dir)?;
        Ok(canonical)
    }

    fn validate_file(&self, path: &str) -> Result<PathBuf> {
        let canonical = std::fs::canonicalize(path).map_err(|_| {
            PairError::new(
                ErrorCode::TeamFileError,
                format!("Team file not found: {path}"),
            )
        })?;
        self.within_workspace(&canonical, path)?;
        Ok(canonical)
    }

    // -----------------------------------------------------------------------
    // Core operations
    // -----------------------------------------------------------------------

    /// Build the pair matrix for a repository.
    pub fn pair_matrix(&self, p: &AnalyzeParams<'_>) -> Result<PairReport> {
        debug!(dir = p.dir, window = p.window, team = ?p.team, "pair_matrix called");
        let analysis = self.analyze(p)?;
        Ok(Self::report(analysis, |report| report))
    }

    /// Build the pair matrix and pairing recommendations.
    pub fn recommend(
        &self,
        p: &AnalyzeParams<'_>,
        options: &RecommendOptions,
    ) -> Result<PairReport> {
        debug!(
            dir = p.dir,
            window = p.window,
            team = ?p.team,
            strategy = %options.strategy,
            matching = %options.matching,
            max_developers = options.max_developers,
            "recommend called"
        );
        let analysis = self.analyze(p)?;
        let outcome = generate_recommendations(
            &analysis.result.developers,
            &analysis.result.matrix,
            &analysis.result.recency,
            options,
        );
        debug!(status = ?outcome.status(), "recommend completed");
        Ok(Self::report(analysis, |report| {
            report.with_recommendations(options.strategy, outcome)
        }))
    }

    fn report(analysis: Analysis, finish: impl FnOnce(PairReport) -> PairReport) -> PairReport {
        let mut report = PairReport::new(
            analysis.window,
            analysis.commits_analyzed,
            &analysis.result,
        );
        if let Some(conflicts) = analysis.conflicts {
            report = report.with_team(conflicts);
        }
        finish(report)
    }

    fn analyze(&self, p: &AnalyzeParams<'_>) -> Result<Analysis> {
        let dir = self.validate_dir(p.dir)?;
        let window = Window::parse(p.window, local_today())?;
        let registry = self.load_registry(&dir, p.team, p.sections)?;

        let commits = gitlog::load_commits(&dir.to_string_lossy(), &window)?;
        let result = build_pair_matrix(registry.as_ref(), &commits);
        debug!(
            dir = %dir.display(),
            commits = commits.len(),
            developers = result.developers.len(),
            pairs = result.matrix.len(),
            "analyze completed"
        );

        Ok(Analysis {
            window,
            commits_analyzed: commits.len(),
            result,
            conflicts: registry.map(|r| r.conflicts().to_vec()),
        })
    }

    fn load_registry(
        &self,
        dir: &Path,
        team: Option<&str>,
        sections: &[String],
    ) -> Result<Option<Registry>> {
        let path = match team {
            Some(path) => Some(self.validate_file(path)?),
            None => Some(dir.join(DEFAULT_TEAM_FILE)).filter(|p| p.is_file()),
        };
        let Some(path) = path else {
            if !sections.is_empty() {
                bail!(PairError::new(
                    ErrorCode::InvalidRequest,
                    "Team sections were given but no team file was found",
                ));
            }
            return Ok(None);
        };

        let team = load_team(&path)?;
        let developers = team.select(sections)?;
        debug!(
            path = %path.display(),
            members = developers.len(),
            sections = ?sections,
            "team loaded"
        );
        Ok(Some(Registry::new(developers)))
    }
}
