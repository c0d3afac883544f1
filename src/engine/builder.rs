use std::collections::{BTreeMap, BTreeSet};

use time::Date;
use tracing::debug;

use super::matrix::{Pair, PairMatrix};
use super::recency::RecencyMatrix;
use super::registry::Registry;
use crate::models::commit::Commit;
use crate::models::developer::Developer;

/// Output of [`build_pair_matrix`].
#[derive(Debug, Clone, Default)]
pub struct PairMatrixResult {
    pub matrix: PairMatrix,
    pub recency: RecencyMatrix,
    /// Every resolved developer, sorted by canonical email
    pub developers: Vec<Developer>,
}

/// Fold commits into the pair and recency matrices.
///
/// With `Some(registry)` only registered participants count and aliases are
/// merged to their canonical email. With `None` every distinct email is its
/// own developer.
pub fn build_pair_matrix(registry: Option<&Registry>, commits: &[Commit]) -> PairMatrixResult {
    let mut seen: BTreeMap<String, Developer> = BTreeMap::new();
    let mut by_day: BTreeMap<Date, BTreeSet<Pair>> = BTreeMap::new();
    let mut skipped = 0usize;

    for commit in commits {
        let mut members: BTreeSet<String> = BTreeSet::new();
        for raw in commit.participants() {
            let Some(dev) = Developer::parse(raw) else {
                debug!(raw = raw, "build_pair_matrix: unparseable participant");
                continue;
            };
            let Some(canonical) = resolve(registry, &dev) else {
                continue;
            };
            seen.entry(canonical.clone()).or_insert_with(|| {
                registry
                    .and_then(|r| r.developer(&canonical))
                    .cloned()
                    .unwrap_or(dev)
            });
            members.insert(canonical);
        }

        if members.len() < 2 {
            skipped += 1;
            continue;
        }

        let members: Vec<&String> = members.iter().collect();
        let day_pairs = by_day.entry(commit.day()).or_default();
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                if let Some(pair) = Pair::new(members[i], members[j]) {
                    day_pairs.insert(pair);
                }
            }
        }
    }

    let mut matrix = PairMatrix::new();
    let mut recency = RecencyMatrix::new();
    for (day, pairs) in by_day {
        for pair in pairs {
            matrix.increment(pair.clone());
            recency.record(pair, day);
        }
    }

    if let Some(registry) = registry {
        for dev in registry.developers() {
            seen.entry(dev.canonical_email().to_string())
                .or_insert_with(|| dev.clone());
        }
    }

    debug!(
        commits = commits.len(),
        skipped = skipped,
        pairs = matrix.len(),
        developers = seen.len(),
        "build_pair_matrix completed"
    );

    PairMatrixResult {
        matrix,
        recency,
        developers: seen.into_values().collect(),
    }
}

/// Canonical email of a participant, or `None` when a registry excludes it.
///
/// With a registry, the first listed email that is a member decides the
/// identity, even if later emails belong to another developer.
fn resolve(registry: Option<&Registry>, dev: &Developer) -> Option<String> {
    match registry {
        Some(registry) => dev
            .emails
            .iter()
            .find(|email| registry.has_member(email))
            .map(|email| registry.canonical_of(email).to_string()),
        None => Some(dev.canonical_email().to_string()),
    }
}
