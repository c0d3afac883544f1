use serde::Serialize;
use time::Date;

use super::developer::{Developer, legend};
use super::recommendation::{
    RecommendOutcome, RecommendStatus, Recommendation, Strategy, serialize_date_opt,
};
use crate::engine::builder::PairMatrixResult;
use crate::engine::registry::RegistryConflict;
use crate::engine::window::Window;

/// A developer as shown in reports.
#[derive(Debug, Clone, Serialize)]
pub struct DeveloperEntry {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "has_single_email")]
    pub emails: Vec<String>,
    pub abbreviation: String,
}

fn has_single_email(emails: &[String]) -> bool {
    emails.len() <= 1
}

/// One cell of the pair matrix with data.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixEntry {
    pub developer_a: String,
    pub developer_b: String,
    pub count: u32,
    #[serde(
        serialize_with = "serialize_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_paired: Option<Date>,
}

/// Full result of a pairing analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub window: Window,
    pub commits_analyzed: usize,
    pub team: bool,
    pub developers: Vec<DeveloperEntry>,
    pub matrix: Vec<MatrixEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    pub recommendation_status: RecommendStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<RegistryConflict>,
}

impl PairReport {
    pub fn new(window: Window, commits_analyzed: usize, result: &PairMatrixResult) -> Self {
        Self {
            window,
            commits_analyzed,
            team: false,
            developers: developer_entries(&result.developers),
            matrix: matrix_entries(result),
            strategy: None,
            recommendation_status: RecommendStatus::Skipped,
            recommendations: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    pub fn with_recommendations(mut self, strategy: Strategy, outcome: RecommendOutcome) -> Self {
        self.strategy = Some(strategy);
        self.recommendation_status = outcome.status();
        self.recommendations = outcome.into_recommendations();
        self
    }

    pub fn with_team(mut self, conflicts: Vec<RegistryConflict>) -> Self {
        self.team = true;
        self.conflicts = conflicts;
        self
    }
}

fn developer_entries(developers: &[Developer]) -> Vec<DeveloperEntry> {
    developers
        .iter()
        .zip(legend(developers))
        .map(|(dev, (_, abbreviation))| DeveloperEntry {
            name: dev.display_name().to_string(),
            email: dev.canonical_email().to_string(),
            emails: dev.emails.clone(),
            abbreviation,
        })
        .collect()
}

fn matrix_entries(result: &PairMatrixResult) -> Vec<MatrixEntry> {
    result
        .matrix
        .iter()
        .map(|(pair, count)| MatrixEntry {
            developer_a: pair.first().to_string(),
            developer_b: pair.second().to_string(),
            count,
            last_paired: result.recency.last_paired(pair.first(), pair.second()),
        })
        .collect()
}
