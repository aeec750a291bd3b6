//! Parser for deprecated endpoint declarations.
//!
//! A declaration is an Ant-style path followed by an optional bracketed
//! method list:
//!
//! ```text
//! /deprecated-api/v1/** [POST GET DELETE]
//! /deprecated-api/v2/**
//! ```
//!
//! Methods may be separated by whitespace or commas and are upper-cased. A
//! missing or blank list means every method.

use crate::error::ConfigError;
use crate::registry::{MethodSet, PatternRegistry};
use regex::Regex;
use std::sync::OnceLock;

/// Shape every declaration must have.
pub const DECLARATION_GRAMMAR: &str = r"^\s*([^\s\[\]]+)\s*(\[([^\[\]]*)\]\s*)?$";

fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DECLARATION_GRAMMAR).expect("declaration grammar is valid"))
}

fn method_separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s,]+").expect("method separator is valid"))
}

/// A single parsed declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDeclaration {
    pub path_pattern: String,
    pub methods: MethodSet,
}

impl PatternDeclaration {
    /// Parse one raw declaration.
    pub fn parse(entry: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDeclaration {
            entry: entry.to_string(),
            grammar: DECLARATION_GRAMMAR.to_string(),
        };

        let captures = declaration_regex().captures(entry).ok_or_else(invalid)?;
        let path_pattern = captures.get(1).ok_or_else(invalid)?.as_str().to_string();

        let methods = match captures.get(3).map(|m| m.as_str().trim()) {
            Some(list) if !list.is_empty() => {
                MethodSet::only(method_separator_regex().split(list).filter(|m| !m.is_empty()))
            }
            _ => MethodSet::Any,
        };

        Ok(Self {
            path_pattern,
            methods,
        })
    }
}

/// Parse every declaration into a registry. The first malformed entry aborts
/// the whole parse.
pub fn parse<I, S>(entries: I) -> Result<PatternRegistry, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut registry = PatternRegistry::new();
    for entry in entries {
        let declaration = PatternDeclaration::parse(entry.as_ref())?;
        registry.insert(&declaration.path_pattern, declaration.methods);
    }
    Ok(registry)
}
