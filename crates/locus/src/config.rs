//! Resolver configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::result::{LocusError, LocusResult};

/// Default number of correction passes
pub const DEFAULT_MAX_CORRECTIONS: usize = 2;

/// Environment variable overriding [`ResolverConfig::max_corrections`]
pub const ENV_MAX_CORRECTIONS: &str = "LOCUS_MAX_CORRECTIONS";

/// Environment variable overriding [`ResolverConfig::verify_hidden_as_success`]
pub const ENV_HIDDEN_AS_SUCCESS: &str = "LOCUS_HIDDEN_AS_SUCCESS";

/// Settings for a resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Upper bound on correction passes
    pub max_corrections: usize,
    /// Count a found-but-hidden element as a (medium confidence) pass
    pub verify_hidden_as_success: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_corrections: DEFAULT_MAX_CORRECTIONS,
            verify_hidden_as_success: true,
        }
    }
}

impl ResolverConfig {
    /// Create default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the correction pass budget
    #[must_use]
    pub const fn with_max_corrections(mut self, max_corrections: usize) -> Self {
        self.max_corrections = max_corrections;
        self
    }

    /// Set whether hidden matches pass
    #[must_use]
    pub const fn with_hidden_as_success(mut self, hidden_is_success: bool) -> Self {
        self.verify_hidden_as_success = hidden_is_success;
        self
    }

    /// Parse YAML configuration; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> LocusResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load YAML configuration from a file
    pub fn from_path(path: impl AsRef<Path>) -> LocusResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply `LOCUS_*` environment overrides
    pub fn apply_env(self) -> LocusResult<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> LocusResult<Self> {
        if let Some(raw) = lookup(ENV_MAX_CORRECTIONS) {
            self.max_corrections = raw.trim().parse().map_err(|_| {
                LocusError::config(format!(
                    "{ENV_MAX_CORRECTIONS} must be a non-negative integer, got {raw:?}"
                ))
            })?;
        }
        if let Some(raw) = lookup(ENV_HIDDEN_AS_SUCCESS) {
            self.verify_hidden_as_success = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(LocusError::config(format!(
                        "{ENV_HIDDEN_AS_SUCCESS} must be a boolean, got {raw:?}"
                    )))
                }
            };
        }
        Ok(self)
    }
}
