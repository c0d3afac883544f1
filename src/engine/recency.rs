use std::collections::BTreeMap;
use time::Date;

use super::matrix::Pair;

/// Most recent day each pair worked together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecencyMatrix {
    last: BTreeMap<Pair, Date>,
}

impl RecencyMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a collaboration day. Older days never replace newer ones.
    pub fn record(&mut self, pair: Pair, day: Date) {
        self.last
            .entry(pair)
            .and_modify(|current| {
                if day > *current {
                    *current = day;
                }
            })
            .or_insert(day);
    }

    /// Last day `x` and `y` paired; `None` for self pairs or no data.
    pub fn last_paired(&self, x: &str, y: &str) -> Option<Date> {
        Pair::new(x, y).and_then(|pair| self.last.get(&pair).copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pair, Date)> {
        self.last.iter().map(|(pair, day)| (pair, *day))
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
