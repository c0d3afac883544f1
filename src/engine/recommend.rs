use std::cmp::Ordering;

use time::{Date, OffsetDateTime};
use tracing::debug;

use super::matrix::PairMatrix;
use super::recency::RecencyMatrix;
use crate::models::developer::Developer;
use crate::models::recommendation::{Matching, RecommendOutcome, Recommendation, Strategy};

/// Developer count above which recommendations are suppressed by default.
pub const DEFAULT_MAX_DEVELOPERS: usize = 10;

/// Hard upper bound for `max_developers`.
pub const MAX_DEVELOPERS_CEILING: usize = 20;

/// Largest team solved exactly by [`Matching::Optimal`].
pub const OPTIMAL_MATCHING_LIMIT: usize = 16;

/// Options for [`generate_recommendations`].
#[derive(Debug, Clone)]
pub struct RecommendOptions {
    pub strategy: Strategy,
    pub matching: Matching,
    pub max_developers: usize,
    /// Reference date for `days_since`
    pub today: Date,
}

impl RecommendOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            matching: Matching::default(),
            max_developers: DEFAULT_MAX_DEVELOPERS,
            today: local_today(),
        }
    }

    pub fn with_matching(mut self, matching: Matching) -> Self {
        self.matching = matching;
        self
    }

    /// Set the developer limit, clamped to [`MAX_DEVELOPERS_CEILING`].
    pub fn with_max_developers(mut self, max: usize) -> Self {
        self.max_developers = max.min(MAX_DEVELOPERS_CEILING);
        self
    }

    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }
}

/// Today's date in local time (UTC when the offset is unavailable).
pub fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    a: usize,
    b: usize,
    count: u32,
    last: Option<Date>,
}

/// Suggest a disjoint set of pairs covering every developer.
///
/// With an odd number of developers the one left over is appended as an
/// entry without a partner.
pub fn generate_recommendations(
    developers: &[Developer],
    matrix: &PairMatrix,
    recency: &RecencyMatrix,
    options: &RecommendOptions,
) -> RecommendOutcome {
    let n = developers.len();
    if n < 2 {
        return RecommendOutcome::TooFew;
    }
    let limit = options.max_developers.min(MAX_DEVELOPERS_CEILING);
    if n > limit {
        debug!(
            developers = n,
            limit = limit,
            "generate_recommendations: too many developers"
        );
        return RecommendOutcome::TooMany {
            developers: n,
            limit,
        };
    }

    let emails: Vec<&str> = developers.iter().map(Developer::canonical_email).collect();
    let mut candidates = Vec::with_capacity(n * (n - 1) / 2);
    for a in 0..n {
        for b in (a + 1)..n {
            candidates.push(Candidate {
                a,
                b,
                count: matrix.count(emails[a], emails[b]),
                last: recency.last_paired(emails[a], emails[b]),
            });
        }
    }

    let selected = match options.strategy {
        Strategy::LeastPaired => {
            candidates.sort_by(|x, y| {
                x.count
                    .cmp(&y.count)
                    .then_with(|| pair_key(&emails, x).cmp(&pair_key(&emails, y)))
            });
            match options.matching {
                Matching::Optimal if n <= OPTIMAL_MATCHING_LIMIT => {
                    let mut chosen = optimal_matching(n, &candidates);
                    chosen.sort_by(|x, y| {
                        x.count
                            .cmp(&y.count)
                            .then_with(|| pair_key(&emails, x).cmp(&pair_key(&emails, y)))
                    });
                    chosen
                }
                Matching::Optimal => {
                    debug!(
                        developers = n,
                        "generate_recommendations: team too large for optimal matching, using greedy"
                    );
                    greedy_disjoint(n, &candidates)
                }
                Matching::Greedy => greedy_disjoint(n, &candidates),
            }
        }
        Strategy::LeastRecent => {
            // Never-paired first, then oldest collaboration first
            candidates.sort_by(|x, y| match (x.last, y.last) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(l), Some(r)) => l.cmp(&r),
            });
            greedy_disjoint(n, &candidates)
        }
    };

    let least_recent = options.strategy == Strategy::LeastRecent;
    let mut claimed = vec![false; n];
    let mut recommendations: Vec<Recommendation> = Vec::with_capacity(n / 2 + 1);
    for c in &selected {
        claimed[c.a] = true;
        claimed[c.b] = true;
        let days_since = least_recent.then(|| match c.last {
            Some(day) => (options.today - day).whole_days(),
            None => -1,
        });
        recommendations.push(Recommendation {
            developer_a: emails[c.a].to_string(),
            developer_b: Some(emails[c.b].to_string()),
            count: c.count,
            last_paired: c.last,
            days_since,
            has_paired: c.last.is_some(),
        });
    }

    if let Some(idx) = claimed.iter().position(|taken| !taken) {
        recommendations.push(Recommendation {
            developer_a: emails[idx].to_string(),
            developer_b: None,
            count: 0,
            last_paired: None,
            days_since: least_recent.then_some(0),
            has_paired: false,
        });
    }

    debug!(
        strategy = %options.strategy,
        matching = %options.matching,
        developers = n,
        recommendations = recommendations.len(),
        "generate_recommendations completed"
    );
    RecommendOutcome::Ready(recommendations)
}

/// Sorted canonical emails of a candidate, for deterministic tie-breaks.
fn pair_key<'a>(emails: &[&'a str], c: &Candidate) -> (&'a str, &'a str) {
    let (x, y) = (emails[c.a], emails[c.b]);
    if x <= y { (x, y) } else { (y, x) }
}

/// Take candidates in order, skipping any that reuse a claimed developer.
fn greedy_disjoint(n: usize, candidates: &[Candidate]) -> Vec<Candidate> {
    let mut claimed = vec![false; n];
    let mut out = Vec::with_capacity(n / 2);
    for c in candidates {
        if claimed[c.a] || claimed[c.b] {
            continue;
        }
        claimed[c.a] = true;
        claimed[c.b] = true;
        out.push(*c);
    }
    out
}

/// Minimum total count matching over all near-perfect matchings.
///
/// Bitmask DP over the set of handled developers. For odd `n` exactly one
/// developer is left out. Ties resolve to the lowest partner index.
fn optimal_matching(n: usize, candidates: &[Candidate]) -> Vec<Candidate> {
    let mut lookup: Vec<Option<Candidate>> = vec![None; n * n];
    for c in candidates {
        lookup[c.a * n + c.b] = Some(*c);
        lookup[c.b * n + c.a] = Some(*c);
    }

    let mut solver = MatchingSolver {
        n,
        lookup,
        memo: vec![None; (1usize << n) * 2],
    };
    let allow_skip = n % 2 == 1;
    solver.best(0, allow_skip);

    let mut out = Vec::with_capacity(n / 2);
    let (mut mask, mut skip) = (0usize, allow_skip);
    while let Some(step) = solver.choice(mask, skip) {
        match step {
            Step::Pair(c) => {
                mask |= (1 << c.a) | (1 << c.b);
                out.push(c);
            }
            Step::Skip(i) => {
                mask |= 1 << i;
                skip = false;
            }
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Pair(Candidate),
    Skip(usize),
}

struct MatchingSolver {
    n: usize,
    lookup: Vec<Option<Candidate>>,
    memo: Vec<Option<u64>>,
}

impl MatchingSolver {
    fn full(&self) -> usize {
        (1usize << self.n) - 1
    }

    fn slot(mask: usize, skip: bool) -> usize {
        mask * 2 + usize::from(skip)
    }

    /// Cheapest cost to finish from `mask`, `u64::MAX` when impossible.
    fn best(&mut self, mask: usize, skip: bool) -> u64 {
        if mask == self.full() {
            return 0;
        }
        if let Some(cost) = self.memo[Self::slot(mask, skip)] {
            return cost;
        }
        let i = (!mask).trailing_zeros() as usize;
        let mut best = u64::MAX;
        for j in (i + 1)..self.n {
            if mask & (1 << j) != 0 {
                continue;
            }
            let Some(c) = self.lookup[i * self.n + j] else {
                continue;
            };
            let rest = self.best(mask | (1 << i) | (1 << j), skip);
            if rest != u64::MAX {
                best = best.min(rest + u64::from(c.count));
            }
        }
        if skip {
            best = best.min(self.best(mask | (1 << i), false));
        }
        self.memo[Self::slot(mask, skip)] = Some(best);
        best
    }

    /// The first move achieving the optimum from `mask`, if any remain.
    fn choice(&mut self, mask: usize, skip: bool) -> Option<Step> {
        if mask == self.full() {
            return None;
        }
        let target = self.best(mask, skip);
        if target == u64::MAX {
            return None;
        }
        let i = (!mask).trailing_zeros() as usize;
        for j in (i + 1)..self.n {
            if mask & (1 << j) != 0 {
                continue;
            }
            let Some(c) = self.lookup[i * self.n + j] else {
                continue;
            };
            let rest = self.best(mask | (1 << i) | (1 << j), skip);
            if rest != u64::MAX && rest + u64::from(c.count) == target {
                return Some(Step::Pair(c));
            }
        }
        if skip && self.best(mask | (1 << i), false) == target {
            return Some(Step::Skip(i));
        }
        None
    }
}
