use time::{Date, OffsetDateTime};

/// A single commit as seen by the pairing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub date: OffsetDateTime,
    /// Raw `"Name <email>"` author string
    pub author: String,
    /// Raw `"Name <email>"` strings from `Co-authored-by:` trailers
    pub co_authors: Vec<String>,
}

impl Commit {
    pub fn new(date: OffsetDateTime, author: impl Into<String>) -> Self {
        Self {
            date,
            author: author.into(),
            co_authors: Vec::new(),
        }
    }

    pub fn with_co_author(mut self, co_author: impl Into<String>) -> Self {
        self.co_authors.push(co_author.into());
        self
    }

    /// Calendar day of the commit in its own UTC offset.
    pub fn day(&self) -> Date {
        self.date.date()
    }

    /// Author followed by co-authors.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.author.as_str()).chain(self.co_authors.iter().map(String::as_str))
    }
}
