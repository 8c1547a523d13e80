use std::collections::BTreeSet;

use crate::error::GateConfigError;

/// Decides which request paths the gate applies to.
#[derive(Clone)]
pub struct GateMatcher {
    matcher: matchit::Router<()>,
}

impl GateMatcher {
    /// Compile `patterns` into a matcher.
    ///
    /// # Errors
    /// Returns `InvalidPattern` for malformed or conflicting patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, GateConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = matchit::Router::new();
        let mut inserted = BTreeSet::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            if !pattern.starts_with('/') {
                return Err(GateConfigError::InvalidPattern {
                    pattern: pattern.to_owned(),
                    reason: "must start with '/'".to_owned(),
                });
            }
            for route in convert_pattern_to_matchit(pattern) {
                if !inserted.insert(route.clone()) {
                    continue;
                }
                matcher
                    .insert(route, ())
                    .map_err(|e| GateConfigError::InvalidPattern {
                        pattern: pattern.to_owned(),
                        reason: e.to_string(),
                    })?;
            }
        }

        Ok(Self { matcher })
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.at(path).is_ok()
    }
}

/// Convert `:param` / trailing `:param*` pattern syntax to matchit routes.
///
/// `:id` becomes `{id}` and `:rest*` becomes `{*rest}`. A catch-all also
/// yields its base route (`/api/me/:path*` adds `/api/me`) because the
/// pattern matches zero segments too.
fn convert_pattern_to_matchit(pattern: &str) -> Vec<String> {
    let mut result = String::with_capacity(pattern.len() + 2);
    let mut base = None;
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ':' {
            let mut name = String::new();
            while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
                name.push(c);
            }
            if chars.next_if_eq(&'*').is_some() {
                let trimmed = result.strip_suffix('/').unwrap_or(&result);
                base = Some(if trimmed.is_empty() {
                    "/".to_owned()
                } else {
                    trimmed.to_owned()
                });
                result.push_str("{*");
            } else {
                result.push('{');
            }
            result.push_str(&name);
            result.push('}');
        } else {
            result.push(ch);
        }
    }

    let mut routes = Vec::with_capacity(2);
    if let Some(base) = base {
        routes.push(base);
    }
    routes.push(result);
    routes
}
