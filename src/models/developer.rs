use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Abbreviation for a developer whose name has no words.
pub const UNKNOWN_ABBREVIATION: &str = "?";

/// A developer identity: display name plus one or more email aliases.
///
/// Emails are lowercased, trimmed and deduplicated; the first one is the
/// canonical email used as the identity key everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Developer {
    pub name: String,
    pub emails: Vec<String>,
}

impl Developer {
    /// Build a developer, normalising `emails`. Returns `None` when no
    /// non-empty email remains.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        emails: impl IntoIterator<Item = S>,
    ) -> Option<Self> {
        let mut normalised: Vec<String> = Vec::new();
        for email in emails {
            let email = email.as_ref().trim().to_lowercase();
            if !email.is_empty() && !normalised.contains(&email) {
                normalised.push(email);
            }
        }
        if normalised.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into().trim().to_string(),
            emails: normalised,
        })
    }

    /// Parse `Name <email1>,<email2>,...`.
    ///
    /// Without any `<...>` the whole string is both the name and the single
    /// email. An unterminated `<` ends the email scan.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let Some(open) = trimmed.find('<') else {
            return Self::new(trimmed, [trimmed]);
        };

        let mut emails = Vec::new();
        let mut rest = &trimmed[open..];
        while let Some(start) = rest.find('<') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('>') else {
                break;
            };
            emails.push(&after[..end]);
            rest = &after[end + 1..];
        }
        Self::new(&trimmed[..open], emails)
    }

    pub fn canonical_email(&self) -> &str {
        &self.emails[0]
    }

    /// Name for display; the canonical email when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.canonical_email()
        } else {
            &self.name
        }
    }

    /// Uppercased initials of the name, e.g. `"Ann Lee"` → `"AL"`.
    pub fn abbreviation(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            UNKNOWN_ABBREVIATION.to_string()
        } else {
            initials
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.emails.contains(&email)
    }
}

/// `(canonical email, abbreviation)` for each developer, in input order.
///
/// Repeated abbreviations get a numeric suffix from the second occurrence on:
/// `AL`, `AL2`, `AL3`.
pub fn legend(developers: &[Developer]) -> Vec<(String, String)> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    developers
        .iter()
        .map(|dev| {
            let base = dev.abbreviation();
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            let abbreviation = if *n == 1 { base } else { format!("{base}{n}") };
            (dev.canonical_email().to_string(), abbreviation)
        })
        .collect()
}
