use std::collections::BTreeMap;

/// An unordered pair of distinct canonical emails, stored in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair {
    a: String,
    b: String,
}

impl Pair {
    /// Build a normalised pair. Self-pairs are rejected.
    pub fn new(x: &str, y: &str) -> Option<Self> {
        match x.cmp(y) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Less => Some(Self {
                a: x.to_string(),
                b: y.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                a: y.to_string(),
                b: x.to_string(),
            }),
        }
    }

    /// Lexicographically smaller email.
    pub fn first(&self) -> &str {
        &self.a
    }

    /// Lexicographically larger email.
    pub fn second(&self) -> &str {
        &self.b
    }

    pub fn contains(&self, email: &str) -> bool {
        self.a == email || self.b == email
    }
}

/// Symmetric counter of distinct days each pair worked together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairMatrix {
    counts: BTreeMap<Pair, u32>,
}

impl PairMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one collaboration day for `pair`.
    pub fn increment(&mut self, pair: Pair) {
        *self.counts.entry(pair).or_insert(0) += 1;
    }

    /// Days `x` and `y` paired; 0 for unknown or self pairs.
    pub fn count(&self, x: &str, y: &str) -> u32 {
        Pair::new(x, y)
            .and_then(|pair| self.counts.get(&pair).copied())
            .unwrap_or(0)
    }

    /// Pairs with at least one day, in pair order.
    pub fn iter(&self) -> impl Iterator<Item = (&Pair, u32)> {
        self.counts.iter().map(|(pair, count)| (pair, *count))
    }

    /// Number of pairs with data.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
