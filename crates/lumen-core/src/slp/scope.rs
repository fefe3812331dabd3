//! Canonical, case-insensitive set of SLP scope tokens.

use std::collections::BTreeSet;

use crate::error::SlpError;

/// A set of lowercase scope tokens. Equality ignores order (backed by a
/// `BTreeSet`) and case (tokens are lowercased on construction).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeSet {
    tokens: BTreeSet<String>,
}

impl ScopeSet {
    /// Parse a comma-separated scope list: tokens are trimmed and
    /// lowercased; an empty token (after trimming) is rejected.
    pub fn parse(raw: &str) -> Result<Self, SlpError> {
        let mut tokens = BTreeSet::new();
        for piece in raw.split(',') {
            let token = piece.trim();
            if token.is_empty() {
                return Err(SlpError::EmptyScopeToken { raw: raw.to_string() });
            }
            tokens.insert(token.to_lowercase());
        }
        Ok(Self { tokens })
    }

    /// Build a scope set directly from already-normalized tokens (test
    /// convenience; does not re-validate casing).
    #[must_use]
    pub fn from_tokens<I: IntoIterator<Item = S>, S: Into<String>>(tokens: I) -> Self {
        Self { tokens: tokens.into_iter().map(|t| t.into().to_lowercase()).collect() }
    }

    /// True if this set shares at least one scope with `other`.
    #[must_use]
    pub fn intersects(&self, other: &ScopeSet) -> bool {
        self.tokens.intersection(&other.tokens).next().is_some()
    }

    /// Number of distinct scope tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if this set has no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_lowercases() {
        let set = ScopeSet::parse(" Scope1 , SCOPE2 ").unwrap();
        assert_eq!(set, ScopeSet::from_tokens(["scope1", "scope2"]));
    }

    #[test]
    fn equality_ignores_order() {
        let a = ScopeSet::parse("scope1,scope2").unwrap();
        let b = ScopeSet::parse("scope2,scope1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_token() {
        assert!(ScopeSet::parse("scope1,,scope2").is_err());
    }

    #[test]
    fn intersects_detects_shared_scope() {
        let a = ScopeSet::from_tokens(["scope1", "scope2"]);
        let b = ScopeSet::from_tokens(["scope3", "scope2"]);
        assert!(a.intersects(&b));
        let c = ScopeSet::from_tokens(["scope4"]);
        assert!(!a.intersects(&c));
    }
}
