//! Admin allowlist.
//!
//! Authentication itself happens upstream; by the time a request reaches us it
//! carries an identity (an email address) or nothing. The gate only answers
//! whether that identity may edit content.

use std::collections::HashSet;

/// Outcome of checking a request identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No identity was presented.
    Anonymous,
    /// An identity was presented but is not on the allowlist.
    Denied,
    Granted,
}

#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    allowed: HashSet<String>,
}

impl AdminGate {
    pub fn new<I, S>(allowlist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = allowlist
            .into_iter()
            .map(|s| normalize(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { allowed }
    }

    pub fn is_authorized(&self, identity: &str) -> bool {
        let identity = normalize(identity);
        !identity.is_empty() && self.allowed.contains(&identity)
    }

    pub fn check(&self, identity: Option<&str>) -> Access {
        match identity.map(str::trim) {
            None | Some("") => Access::Anonymous,
            Some(identity) if self.is_authorized(identity) => Access::Granted,
            Some(_) => Access::Denied,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }
}

fn normalize(identity: &str) -> String {
    identity.trim().to_lowercase()
}
