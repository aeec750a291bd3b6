//! Configuration for the deprecated API gate.
//!
//! Two settings drive the gate: whether deprecated endpoints are disabled and
//! the list of endpoint declarations. Both can come from a YAML file and be
//! overridden through the environment.

use crate::declaration;
use crate::error::ConfigError;
use crate::registry::PatternRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overrides `deprecated.api.disabled`.
pub const DISABLED_ENV: &str = "DEPRECATED_API_DISABLED";

/// Overrides `deprecated.api.patterns`; declarations are separated by `;`.
pub const PATTERNS_ENV: &str = "DEPRECATED_API_PATTERNS";

/// Root of the configuration file.
///
/// ```yaml
/// deprecated:
///   api:
///     disabled: true
///     patterns:
///       - "/deprecated-api/v1/** [POST GET DELETE]"
///       - "/deprecated-api/v2/**"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    #[serde(default)]
    pub deprecated: DeprecatedSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeprecatedSection {
    #[serde(default)]
    pub api: DeprecatedApiConfig,
}

/// Settings for disabling deprecated endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeprecatedApiConfig {
    /// Decline requests to deprecated endpoints
    #[serde(default)]
    pub disabled: bool,

    /// Endpoint declarations, `<ant-path> [METHOD ...]`
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
}

impl GateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.deprecated.api.validate()
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())?;
        self.validate()
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api = &mut self.deprecated.api;

        if let Some(value) = lookup(DISABLED_ENV) {
            api.disabled = parse_flag(DISABLED_ENV, &value)?;
        }

        if let Some(value) = lookup(PATTERNS_ENV) {
            let patterns: Vec<String> = value
                .split(';')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
            api.patterns = Some(patterns);
        }

        Ok(())
    }

    pub fn api(&self) -> &DeprecatedApiConfig {
        &self.deprecated.api
    }
}

impl DeprecatedApiConfig {
    /// Validate the settings. Declarations are only checked when the gate is
    /// switched on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.registry().map(|_| ())
    }

    /// Build the pattern registry, or `None` when the gate is switched off.
    /// Switching the gate on without any declaration is an error.
    pub fn registry(&self) -> Result<Option<PatternRegistry>, ConfigError> {
        if !self.disabled {
            return Ok(None);
        }

        match self.patterns.as_deref() {
            Some(patterns) if !patterns.is_empty() => declaration::parse(patterns).map(Some),
            _ => Err(ConfigError::MissingPatterns),
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "t" => Ok(true),
        "false" | "0" | "f" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MethodSet;
    use std::collections::HashMap;
    use std::io::Write;

    const ENABLED_YAML: &str = r#"
deprecated:
  api:
    disabled: true
    patterns:
      - "/deprecated-api/v1/** [POST GET DELETE]"
      - "/deprecated-api/v2/**"
"#;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_parse_enabled_config() {
        let config = GateConfig::from_yaml(ENABLED_YAML).unwrap();
        assert!(config.api().disabled);

        let registry = config.api().registry().unwrap().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("/deprecated-api/v1/**"),
            Some(&MethodSet::only(["POST", "GET", "DELETE"]))
        );
        assert_eq!(registry.get("/deprecated-api/v2/**"), Some(&MethodSet::Any));
    }

    #[test]
    fn test_default_is_switched_off() {
        let config = GateConfig::from_yaml("{}").unwrap();
        assert!(!config.api().disabled);
        assert!(config.api().registry().unwrap().is_none());
    }

    #[test]
    fn test_switched_off_skips_declaration_checks() {
        let yaml = r#"
deprecated:
  api:
    disabled: false
    patterns:
      - "/broken [GET"
"#;
        assert!(GateConfig::from_yaml(yaml).is_ok());
    }

    #[test]
    fn test_missing_patterns_is_fatal() {
        let yaml = "deprecated:\n  api:\n    disabled: true\n";
        let err = GateConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPatterns));
    }

    #[test]
    fn test_empty_patterns_is_fatal() {
        let yaml = "deprecated:\n  api:\n    disabled: true\n    patterns: []\n";
        let err = GateConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPatterns));
    }

    #[test]
    fn test_empty_env_patterns_is_fatal() {
        let mut config = GateConfig::default();
        config
            .apply_overrides(env(&[(DISABLED_ENV, "true"), (PATTERNS_ENV, " ; ")]))
            .unwrap();
        assert_eq!(config.api().patterns, Some(vec![]));
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::MissingPatterns
        ));

        let mut config = GateConfig::default();
        config
            .apply_overrides(env(&[(DISABLED_ENV, "true"), (PATTERNS_ENV, "")]))
            .unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::MissingPatterns
        ));
    }

    #[test]
    fn test_invalid_declaration_is_fatal() {
        let yaml = r#"
deprecated:
  api:
    disabled: true
    patterns:
      - "/broken [GET"
"#;
        let err = GateConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDeclaration { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "deprecated:\n  api:\n    enabled: true\n";
        assert!(matches!(
            GateConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::Yaml(_)
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GateConfig::default();
        config
            .apply_overrides(env(&[
                (DISABLED_ENV, "true"),
                (PATTERNS_ENV, "/old/** [GET]; /older/**"),
            ]))
            .unwrap();

        assert!(config.api().disabled);
        assert_eq!(
            config.api().patterns,
            Some(vec!["/old/** [GET]".to_string(), "/older/**".to_string()])
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_flag_only_enables_file_patterns() {
        let mut config = GateConfig::from_yaml(
            "deprecated:\n  api:\n    patterns: [\"/old/** [GET]\"]\n",
        )
        .unwrap();
        config.apply_overrides(env(&[(DISABLED_ENV, "TRUE")])).unwrap();

        let registry = config.api().registry().unwrap().unwrap();
        assert!(registry.lookup("/old/x", "GET").is_match());
    }

    #[test]
    fn test_invalid_env_flag() {
        let mut config = GateConfig::default();
        let err = config
            .apply_overrides(env(&[(DISABLED_ENV, "yes please")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ENABLED_YAML.as_bytes()).unwrap();

        let config = GateConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api().patterns.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_from_missing_file() {
        let err = GateConfig::from_file(Path::new("/nonexistent/gate.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
