use serde::Serialize;
use time::macros::format_description;
use time::{Date, Duration};

use crate::error::PairError;
use crate::models::recommendation::serialize_date;

/// Largest relative window in days; `Date` covers fewer than 20,000 years.
const MAX_WINDOW_DAYS: i64 = 20_000 * 366;

/// Inclusive range of calendar days under analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    #[serde(serialize_with = "serialize_date")]
    since: Date,
    #[serde(serialize_with = "serialize_date")]
    until: Date,
}

impl Window {
    /// Parse `<N>d`, `<N>w`, `<N>m` (30 days), `<N>y` (365 days) relative to
    /// `today`, or an absolute `YYYY-MM-DD..YYYY-MM-DD` range.
    pub fn parse(spec: &str, today: Date) -> Result<Self, PairError> {
        let spec = spec.trim();
        if let Some((from, to)) = spec.split_once("..") {
            let since = parse_day(from).ok_or_else(|| PairError::invalid_window(spec))?;
            let until = parse_day(to).ok_or_else(|| PairError::invalid_window(spec))?;
            if since > until {
                return Err(PairError::invalid_window(spec));
            }
            return Ok(Self { since, until });
        }

        let unit = spec
            .chars()
            .last()
            .ok_or_else(|| PairError::invalid_window(spec))?;
        let amount: i64 = spec[..spec.len() - unit.len_utf8()]
            .parse()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| PairError::invalid_window(spec))?;
        let per_unit = match unit.to_ascii_lowercase() {
            'd' => 1,
            'w' => 7,
            'm' => 30,
            'y' => 365,
            _ => return Err(PairError::invalid_window(spec)),
        };
        let since = amount
            .checked_mul(per_unit)
            .filter(|days| *days <= MAX_WINDOW_DAYS)
            .and_then(|days| today.checked_sub(Duration::days(days)))
            .ok_or_else(|| PairError::invalid_window(spec))?;
        Ok(Self {
            since,
            until: today,
        })
    }

    pub fn since(&self) -> Date {
        self.since
    }

    pub fn until(&self) -> Date {
        self.until
    }

    pub fn contains(&self, day: Date) -> bool {
        self.since <= day && day <= self.until
    }
}

fn parse_day(s: &str) -> Option<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]")).ok()
}
