use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use time::Date;

/// Ranking policy for pairing recommendations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Prefer pairs with the fewest days paired together
    #[default]
    LeastPaired,
    /// Prefer pairs who have not paired for the longest time
    LeastRecent,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeastPaired => write!(f, "least-paired"),
            Self::LeastRecent => write!(f, "least-recent"),
        }
    }
}

/// How least-paired selects its disjoint pairs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Matching {
    /// Walk candidates in ascending count order, taking unclaimed pairs
    #[default]
    Greedy,
    /// Minimise the total count over all matchings (small teams only)
    Optimal,
}

impl fmt::Display for Matching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::Optimal => write!(f, "optimal"),
        }
    }
}

/// A suggested pairing. `developer_b` is `None` for the odd one out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub developer_a: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_b: Option<String>,
    /// Distinct days the two have paired
    pub count: u32,
    #[serde(
        serialize_with = "serialize_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_paired: Option<Date>,
    /// Whole days since `last_paired`, `-1` when never paired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since: Option<i64>,
    pub has_paired: bool,
}

impl Recommendation {
    pub fn is_unpaired(&self) -> bool {
        self.developer_b.is_none()
    }

    /// Canonical emails referenced by this entry.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.developer_a.as_str()).chain(self.developer_b.as_deref())
    }
}

/// Result of recommendation generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendOutcome {
    /// Fewer than two developers: nothing to pair
    TooFew,
    /// More developers than the configured limit: recommendations suppressed
    TooMany { developers: usize, limit: usize },
    Ready(Vec<Recommendation>),
}

impl RecommendOutcome {
    pub fn status(&self) -> RecommendStatus {
        match self {
            Self::TooFew => RecommendStatus::TooFew,
            Self::TooMany { .. } => RecommendStatus::TooMany,
            Self::Ready(_) => RecommendStatus::Ready,
        }
    }

    /// Recommendations to show; empty for both refusal cases.
    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            Self::Ready(recs) => recs,
            _ => &[],
        }
    }

    pub fn into_recommendations(self) -> Vec<Recommendation> {
        match self {
            Self::Ready(recs) => recs,
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendStatus {
    Ready,
    TooFew,
    TooMany,
    /// Recommendations were not requested
    Skipped,
}

pub(crate) fn serialize_date_opt<S: Serializer>(
    date: &Option<Date>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.serialize_str(&d.to_string()),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_string())
}
