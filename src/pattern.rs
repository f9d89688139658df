//! Path template compilation and matching.
//!
//! Templates use `:name` segments for named parameters and a trailing `*`
//! for a wildcard capture. The bare template `"*"` matches any path and is
//! the idiom for catch-all/fallback routes. Compilation happens once at
//! registration time; matching is a single anchored regex execution.

use regex::Regex;
use smallvec::SmallVec;

/// Maximum number of path parameters before heap allocation.
/// Most route templates carry well under 8 named segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
pub type ParamVec = SmallVec<[(String, String); MAX_INLINE_PARAMS]>;

/// Result of successfully matching a path against a compiled template.
#[derive(Debug, Clone, Default)]
pub struct PatternMatch {
    /// Named parameters in template order (e.g., `:id` → `("id", "123")`)
    pub params: ParamVec,
    /// Text captured by a trailing `*`, if the template has one
    pub wildcard: Option<String>,
}

impl PatternMatch {
    /// Get a named parameter by name.
    ///
    /// Uses "last write wins" semantics when a template repeats a parameter
    /// name at different depths.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A compiled path template.
///
/// Immutable after construction. Matching is purely syntactic: no method,
/// header, or query-string involvement at this layer.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
    has_wildcard: bool,
}

impl PathPattern {
    /// Compile a path template.
    ///
    /// Literal segments are matched verbatim, `:name` segments match one
    /// non-empty path segment, and a final `*` segment captures the rest of
    /// the path (possibly empty).
    ///
    /// # Example
    ///
    /// ```
    /// use portico::pattern::PathPattern;
    ///
    /// let p = PathPattern::compile("/threads/:thread_id");
    /// let m = p.matches("/threads/42").unwrap();
    /// assert_eq!(m.param("thread_id"), Some("42"));
    /// ```
    #[must_use]
    #[allow(clippy::expect_used)] // the built pattern is valid by construction
    pub fn compile(template: &str) -> Self {
        let (pattern, param_names, has_wildcard) = Self::build_regex(template);
        let regex = Regex::new(&pattern).expect("failed to compile path regex");
        Self {
            template: template.to_string(),
            regex,
            param_names,
            has_wildcard,
        }
    }

    /// The template string this pattern was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Match a request path, extracting named parameters and the wildcard
    /// capture. Returns `None` when the path does not match.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(path)?;
        let mut params = ParamVec::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.push((name.clone(), m.as_str().to_string()));
            }
        }
        let wildcard = if self.has_wildcard {
            caps.get(self.param_names.len() + 1)
                .map(|m| m.as_str().to_string())
        } else {
            None
        };
        Some(PatternMatch { params, wildcard })
    }

    fn build_regex(template: &str) -> (String, Vec<String>, bool) {
        // Bare "*" is the catch-all: match anything, capture the whole path.
        if template == "*" {
            return (String::from("^(.*)$"), Vec::new(), true);
        }
        if template == "/" {
            return (String::from("^/$"), Vec::new(), false);
        }

        let mut pattern = String::with_capacity(template.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::new();
        let mut has_wildcard = false;

        let segments: Vec<&str> = template.split('/').collect();
        let last = segments.len().saturating_sub(1);
        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                // a trailing empty segment means the template ends in '/'
                if i == last && i != 0 {
                    pattern.push('/');
                }
                continue;
            }
            if let Some(name) = segment.strip_prefix(':') {
                pattern.push_str("/([^/]+)");
                param_names.push(name.to_string());
            } else if *segment == "*" && i == last {
                pattern.push_str("/(.*)");
                has_wildcard = true;
            } else {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }
        pattern.push('$');

        (pattern, param_names, has_wildcard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_template_matches_exactly() {
        let p = PathPattern::compile("/books");
        assert!(p.matches("/books").is_some());
        assert!(p.matches("/books/1").is_none());
        assert!(p.matches("/book").is_none());
    }

    #[test]
    fn named_params_are_extracted_in_order() {
        let p = PathPattern::compile("/orgs/:org/repos/:repo");
        let m = p.matches("/orgs/acme/repos/site").unwrap();
        assert_eq!(m.param("org"), Some("acme"));
        assert_eq!(m.param("repo"), Some("site"));
        assert!(p.matches("/orgs/acme/repos").is_none());
    }

    #[test]
    fn repeated_param_name_uses_last_capture() {
        let p = PathPattern::compile("/a/:id/b/:id");
        let m = p.matches("/a/1/b/2").unwrap();
        assert_eq!(m.param("id"), Some("2"));
    }

    #[test]
    fn trailing_wildcard_captures_rest() {
        let p = PathPattern::compile("/files/*");
        let m = p.matches("/files/a/b/c.txt").unwrap();
        assert_eq!(m.wildcard.as_deref(), Some("a/b/c.txt"));
        // the slash is part of the template, the capture may be empty
        assert!(p.matches("/files/").is_some());
        assert!(p.matches("/files").is_none());
    }

    #[test]
    fn bare_star_is_catch_all() {
        let p = PathPattern::compile("*");
        assert!(p.matches("/").is_some());
        assert!(p.matches("/anything/at/all").is_some());
    }

    #[test]
    fn root_template() {
        let p = PathPattern::compile("/");
        assert!(p.matches("/").is_some());
        assert!(p.matches("/x").is_none());
    }

    #[test]
    fn trailing_slash_is_significant() {
        let with = PathPattern::compile("/x/");
        assert!(with.matches("/x/").is_some());
        assert!(with.matches("/x").is_none());

        let without = PathPattern::compile("/x");
        assert!(without.matches("/x").is_some());
        assert!(without.matches("/x/").is_none());
    }

    #[test]
    fn regex_metacharacters_in_literals_are_escaped() {
        let p = PathPattern::compile("/v1.0/items");
        assert!(p.matches("/v1.0/items").is_some());
        assert!(p.matches("/v1x0/items").is_none());
    }
}
