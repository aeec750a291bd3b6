//! Registry of deprecated endpoint patterns and the lookup over it.

use crate::antpath::AntPattern;
use std::fmt;

/// Token standing for "every method".
pub const ANY_METHOD: &str = "*";

/// The HTTP methods a deprecation rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSet {
    /// The rule applies to every method.
    Any,
    /// The rule applies to the listed upper-case methods only. Never empty.
    Only(Vec<String>),
}

impl MethodSet {
    /// Build a method set from tokens. Tokens are upper-cased and
    /// de-duplicated; no tokens at all, or a `*` token, means [`MethodSet::Any`].
    pub fn only<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for method in methods {
            let method = method.as_ref().trim().to_uppercase();
            if method.is_empty() {
                continue;
            }
            if method == ANY_METHOD {
                return MethodSet::Any;
            }
            if !list.contains(&method) {
                list.push(method);
            }
        }

        if list.is_empty() {
            MethodSet::Any
        } else {
            MethodSet::Only(list)
        }
    }

    /// Whether `method` (already upper-cased) is covered.
    pub fn contains(&self, method: &str) -> bool {
        match self {
            MethodSet::Any => true,
            MethodSet::Only(list) => list.iter().any(|m| m == method),
        }
    }

    /// The methods as declared, or `["*"]` for [`MethodSet::Any`].
    pub fn as_slice(&self) -> Vec<&str> {
        match self {
            MethodSet::Any => vec![ANY_METHOD],
            MethodSet::Only(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.as_slice().join(" "))
    }
}

/// One registry entry: a compiled pattern plus the methods it disables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub pattern: AntPattern,
    pub methods: MethodSet,
}

/// Deprecated endpoint patterns, keyed by their literal pattern text.
///
/// Entries keep declaration order. Inserting a pattern that is already present
/// replaces its methods in place, so lookups resolve overlaps by the position
/// of a pattern's first declaration.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    entries: Vec<PatternEntry>,
}

/// Result of a registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchVerdict<'a> {
    entry: Option<&'a PatternEntry>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the methods for `pattern`.
    pub fn insert(&mut self, pattern: &str, methods: MethodSet) {
        match self.entries.iter_mut().find(|e| e.pattern.as_str() == pattern) {
            Some(entry) => entry.methods = methods,
            None => self.entries.push(PatternEntry {
                pattern: AntPattern::new(pattern),
                methods,
            }),
        }
    }

    /// Methods registered for the literal pattern text.
    pub fn get(&self, pattern: &str) -> Option<&MethodSet> {
        self.entries
            .iter()
            .find(|e| e.pattern.as_str() == pattern)
            .map(|e| &e.methods)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternEntry> {
        self.entries.iter()
    }

    /// Find the first entry whose pattern matches `path` and whose methods
    /// cover `method`.
    pub fn lookup(&self, path: &str, method: &str) -> MatchVerdict<'_> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.methods.contains(method) && e.pattern.matches(path));
        MatchVerdict { entry }
    }
}

impl<'a> MatchVerdict<'a> {
    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }

    /// The pattern text of the matching entry.
    pub fn matched_pattern(&self) -> Option<&'a str> {
        self.entry.map(|e| e.pattern.as_str())
    }

    pub fn matched_methods(&self) -> Option<&'a MethodSet> {
        self.entry.map(|e| &e.methods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(entries: &[(&str, MethodSet)]) -> PatternRegistry {
        let mut registry = PatternRegistry::new();
        for (pattern, methods) in entries {
            registry.insert(pattern, methods.clone());
        }
        registry
    }

    #[test]
    fn test_lookup_method_filtering() {
        let registry = registry(&[("/deprecated/v1/**", MethodSet::only(["GET", "POST"]))]);

        let verdict = registry.lookup("/deprecated/v1/x", "GET");
        assert!(verdict.is_match());
        assert_eq!(verdict.matched_pattern(), Some("/deprecated/v1/**"));
        assert_eq!(
            verdict.matched_methods(),
            Some(&MethodSet::only(["GET", "POST"]))
        );

        assert!(!registry.lookup("/deprecated/v1/x", "PUT").is_match());
        assert!(!registry.lookup("/other", "GET").is_match());
    }

    #[test]
    fn test_any_method() {
        let registry = registry(&[("/deprecated/v2/**", MethodSet::Any)]);
        for method in ["GET", "POST", "PATCH", "OPTIONS"] {
            assert!(registry.lookup("/deprecated/v2/test", method).is_match());
        }
    }

    #[test]
    fn test_duplicate_pattern_last_write_wins() {
        let registry = registry(&[
            ("/a/**", MethodSet::only(["GET"])),
            ("/b/**", MethodSet::Any),
            ("/a/**", MethodSet::only(["DELETE"])),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("/a/**"), Some(&MethodSet::only(["DELETE"])));
        assert!(!registry.lookup("/a/x", "GET").is_match());
        assert!(registry.lookup("/a/x", "DELETE").is_match());
        assert_eq!(registry.iter().next().map(|e| e.pattern.as_str()), Some("/a/**"));
    }

    #[test]
    fn test_overlap_resolved_by_declaration_order() {
        let registry = registry(&[
            ("/api/**", MethodSet::only(["GET"])),
            ("/api/v1/*", MethodSet::Any),
        ]);

        let verdict = registry.lookup("/api/v1/users", "GET");
        assert_eq!(verdict.matched_pattern(), Some("/api/**"));

        // Only the second entry covers POST.
        let verdict = registry.lookup("/api/v1/users", "POST");
        assert_eq!(verdict.matched_pattern(), Some("/api/v1/*"));
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let registry = registry(&[("/deprecated/v1/**", MethodSet::only(["GET"]))]);
        let first = registry.lookup("/deprecated/v1/x", "GET");
        for _ in 0..5 {
            assert_eq!(registry.lookup("/deprecated/v1/x", "GET"), first);
        }
    }

    #[test]
    fn test_method_set_normalization() {
        assert_eq!(
            MethodSet::only(["get", " Post ", "GET"]),
            MethodSet::Only(vec!["GET".to_string(), "POST".to_string()])
        );
        assert_eq!(MethodSet::only(Vec::<String>::new()), MethodSet::Any);
        assert_eq!(MethodSet::only(["GET", "*"]), MethodSet::Any);
        assert!(MethodSet::Any.contains("PURGE"));
        assert!(!MethodSet::only(["GET"]).contains("PURGE"));
    }

    #[test]
    fn test_method_set_display() {
        assert_eq!(MethodSet::only(["POST", "GET"]).to_string(), "[POST GET]");
        assert_eq!(MethodSet::Any.to_string(), "[*]");
    }
}
