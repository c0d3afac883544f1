use ahash::AHashMap;
use serde::Serialize;
use tracing::warn;

use crate::models::developer::Developer;

/// An email that two team entries both claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryConflict {
    pub email: String,
    /// Canonical email of the developer that kept the alias
    pub kept: String,
    /// Canonical email of the developer whose claim was ignored
    pub ignored: String,
}

/// Team membership and alias-merging table.
///
/// Every registered email points at exactly one canonical email. When two
/// developers list the same email the first registration keeps it.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    developers: Vec<Developer>,
    canonical: AHashMap<String, String>,
    index: AHashMap<String, usize>,
    conflicts: Vec<RegistryConflict>,
}

impl Registry {
    pub fn new(developers: impl IntoIterator<Item = Developer>) -> Self {
        let mut registry = Self::default();
        for dev in developers {
            registry.register(dev);
        }
        registry
    }

    fn register(&mut self, dev: Developer) {
        let mut owned: Vec<String> = Vec::with_capacity(dev.emails.len());
        for email in &dev.emails {
            if let Some(kept) = self.canonical.get(email) {
                warn!(
                    email = email.as_str(),
                    kept = kept.as_str(),
                    ignored = dev.canonical_email(),
                    "registry: email already registered, keeping first"
                );
                self.conflicts.push(RegistryConflict {
                    email: email.clone(),
                    kept: kept.clone(),
                    ignored: dev.canonical_email().to_string(),
                });
            } else {
                owned.push(email.clone());
            }
        }

        // Every alias was taken by earlier entries
        let Some(resolved) = Developer::new(dev.name, owned) else {
            return;
        };

        let idx = self.developers.len();
        let canonical = resolved.canonical_email().to_string();
        for email in &resolved.emails {
            self.canonical.insert(email.clone(), canonical.clone());
            self.index.insert(email.clone(), idx);
        }
        self.developers.push(resolved);
    }

    pub fn has_member(&self, email: &str) -> bool {
        self.canonical.contains_key(email)
    }

    /// Canonical email for `email`, or `email` itself when unknown.
    pub fn canonical_of<'a>(&'a self, email: &'a str) -> &'a str {
        self.canonical.get(email).map(String::as_str).unwrap_or(email)
    }

    pub fn display_name_of(&self, email: &str) -> Option<&str> {
        self.lookup(email).map(Developer::display_name)
    }

    /// Registered developer owning `email` (any alias).
    pub fn lookup(&self, email: &str) -> Option<&Developer> {
        self.index.get(email).map(|&idx| &self.developers[idx])
    }

    /// Registered developer whose canonical email is `canonical`.
    pub fn developer(&self, canonical: &str) -> Option<&Developer> {
        self.lookup(canonical)
            .filter(|dev| dev.canonical_email() == canonical)
    }

    /// Registered developers, in registration order.
    pub fn developers(&self) -> &[Developer] {
        &self.developers
    }

    pub fn conflicts(&self) -> &[RegistryConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.developers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.developers.is_empty()
    }
}
