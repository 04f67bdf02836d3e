//! Organization membership as a set of logins

use std::collections::HashSet;

/// Union of the members of every configured organization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSet {
    logins: HashSet<String>,
}

impl MemberSet {
    /// Create an empty member set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a login, returning `false` if it was already present
    pub fn insert(&mut self, login: impl Into<String>) -> bool {
        self.logins.insert(login.into())
    }

    /// Check whether a login belongs to any configured organization
    pub fn contains(&self, login: &str) -> bool {
        self.logins.contains(login)
    }

    pub fn len(&self) -> usize {
        self.logins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logins.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for MemberSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.logins.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for MemberSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
