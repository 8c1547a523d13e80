use std::collections::HashSet;

use crate::config::AuthnGateConfig;
use crate::error::GateConfigError;

/// How the policy table classifies a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Only anonymous callers belong here.
    Public,
    /// Only authenticated callers belong here.
    Protected,
    Neither,
}

/// Static routing policy: exact-match public and protected paths plus the
/// prefix under which the identity is forwarded downstream.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    public_paths: HashSet<String>,
    protected_paths: HashSet<String>,
    context_prefix: String,
}

impl PolicyTable {
    /// Build a policy table.
    ///
    /// # Errors
    /// Returns `OverlappingPath` if a path is both public and protected.
    pub fn new<P, Q>(
        public_paths: P,
        protected_paths: Q,
        context_prefix: impl Into<String>,
    ) -> Result<Self, GateConfigError>
    where
        P: IntoIterator<Item = String>,
        Q: IntoIterator<Item = String>,
    {
        let public_paths: HashSet<String> = public_paths.into_iter().collect();
        let protected_paths: HashSet<String> = protected_paths.into_iter().collect();

        let mut overlap: Vec<&String> = public_paths.intersection(&protected_paths).collect();
        overlap.sort();
        if let Some(path) = overlap.first() {
            return Err(GateConfigError::OverlappingPath((*path).clone()));
        }

        Ok(Self {
            public_paths,
            protected_paths,
            context_prefix: context_prefix.into(),
        })
    }

    /// Build the policy table described by `cfg`.
    ///
    /// # Errors
    /// Returns `OverlappingPath` if a path is both public and protected.
    pub fn from_config(cfg: &AuthnGateConfig) -> Result<Self, GateConfigError> {
        Self::new(
            cfg.public_paths.iter().cloned(),
            cfg.protected_paths.iter().cloned(),
            cfg.context_prefix.clone(),
        )
    }

    #[must_use]
    pub fn classify(&self, path: &str) -> PathClass {
        if self.public_paths.contains(path) {
            PathClass::Public
        } else if self.protected_paths.contains(path) {
            PathClass::Protected
        } else {
            PathClass::Neither
        }
    }

    /// Whether an authenticated request to `path` gets the identity forwarded.
    #[must_use]
    pub fn requires_context(&self, path: &str) -> bool {
        path.starts_with(&self.context_prefix)
    }

    #[must_use]
    pub fn context_prefix(&self) -> &str {
        &self.context_prefix
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn default_policy() -> PolicyTable {
        PolicyTable::from_config(&AuthnGateConfig::default()).unwrap()
    }

    #[test]
    fn classifies_exact_paths() {
        let policy = default_policy();
        assert_eq!(policy.classify("/auth/register"), PathClass::Public);
        assert_eq!(policy.classify("/auth/signin"), PathClass::Public);
        assert_eq!(policy.classify("/me"), PathClass::Protected);
        assert_eq!(policy.classify("/api/me/profile"), PathClass::Neither);
    }

    #[test]
    fn classification_is_exact_match_only() {
        let policy = default_policy();
        assert_eq!(policy.classify("/me/"), PathClass::Neither);
        assert_eq!(policy.classify("/me/settings"), PathClass::Neither);
        assert_eq!(policy.classify("/auth/signin/extra"), PathClass::Neither);
    }

    #[test]
    fn context_prefix_is_a_plain_prefix() {
        let policy = default_policy();
        assert!(policy.requires_context("/api/me"));
        assert!(policy.requires_context("/api/me/profile"));
        assert!(!policy.requires_context("/api/other"));
        assert!(!policy.requires_context("/me"));
    }

    #[test]
    fn overlapping_paths_rejected() {
        let err = PolicyTable::new(
            vec!["/a".to_owned(), "/b".to_owned()],
            vec!["/b".to_owned()],
            "/api",
        )
        .unwrap_err();
        assert!(matches!(err, GateConfigError::OverlappingPath(ref p) if p == "/b"));
    }
}
