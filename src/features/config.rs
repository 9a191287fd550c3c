//! Feature engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RankfeatError, Result};
use crate::features::family::FeatureFamily;
use crate::stats::StatisticsScope;

fn default_delta() -> f64 {
    0.7
}

fn default_mu() -> f64 {
    2000.0
}

fn default_alpha() -> f64 {
    0.1
}

fn default_query_likelihood_mu() -> f64 {
    10.0
}

fn default_language_model_scope() -> StatisticsScope {
    StatisticsScope::new("economics", "fulltext")
}

fn default_families() -> Vec<FeatureFamily> {
    FeatureFamily::ALL.to_vec()
}

/// Configuration for [`FeatureEngine`](crate::features::FeatureEngine).
///
/// Every field has a default, so a JSON document only needs to name what it
/// changes:
///
/// ```
/// use rankfeat::features::{FeatureEngineConfig, FeatureFamily};
///
/// let config = FeatureEngineConfig::from_json_str(
///     r#"{ "mu": 1500.0, "families": ["simple", "language_model"] }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.mu, 1500.0);
/// assert_eq!(config.delta, 0.7);
/// assert_eq!(config.families, vec![FeatureFamily::Simple, FeatureFamily::LanguageModel]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEngineConfig {
    /// Absolute discounting parameter, in (0, 1].
    #[serde(default = "default_delta")]
    pub delta: f64,

    /// Dirichlet prior, > 0.
    #[serde(default = "default_mu")]
    pub mu: f64,

    /// Jelinek-Mercer interpolation weight, in [0, 1].
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Dirichlet prior of the query likelihood feature, > 0.
    #[serde(default = "default_query_likelihood_mu")]
    pub query_likelihood_mu: f64,

    /// Where document frequencies and the document count are read from.
    #[serde(default)]
    pub idf_scope: StatisticsScope,

    /// Where collection frequencies and the collection length are read from.
    #[serde(default = "default_language_model_scope")]
    pub language_model_scope: StatisticsScope,

    /// Fixed document count for idf. Fetched from the provider when `None`.
    #[serde(default)]
    pub document_count: Option<u64>,

    /// Enabled feature families.
    #[serde(default = "default_families")]
    pub families: Vec<FeatureFamily>,
}

impl Default for FeatureEngineConfig {
    fn default() -> Self {
        FeatureEngineConfig {
            delta: default_delta(),
            mu: default_mu(),
            alpha: default_alpha(),
            query_likelihood_mu: default_query_likelihood_mu(),
            idf_scope: StatisticsScope::default(),
            language_model_scope: default_language_model_scope(),
            document_count: None,
            families: default_families(),
        }
    }
}

impl FeatureEngineConfig {
    /// Parse a configuration from JSON. The result is validated.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FeatureEngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file. The result is validated.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Enable only `families`, in that order.
    pub fn with_families(mut self, families: &[FeatureFamily]) -> Self {
        self.families = families.to_vec();
        self
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if !(self.delta > 0.0 && self.delta <= 1.0) {
            return Err(RankfeatError::config(format!(
                "delta must be in (0, 1], got {}",
                self.delta
            )));
        }
        if !(self.mu > 0.0 && self.mu.is_finite()) {
            return Err(RankfeatError::config(format!(
                "mu must be positive, got {}",
                self.mu
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(RankfeatError::config(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        if !(self.query_likelihood_mu > 0.0 && self.query_likelihood_mu.is_finite()) {
            return Err(RankfeatError::config(format!(
                "query_likelihood_mu must be positive, got {}",
                self.query_likelihood_mu
            )));
        }
        if self.families.is_empty() {
            return Err(RankfeatError::config("at least one feature family is required"));
        }
        for (i, family) in self.families.iter().enumerate() {
            if self.families[..i].contains(family) {
                return Err(RankfeatError::config(format!(
                    "feature family {family} is listed more than once"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FeatureEngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.families.len(), FeatureFamily::ALL.len());
        assert_eq!(config.language_model_scope.field, "fulltext");
    }

    #[test]
    fn test_out_of_range_parameters() {
        let cases = [
            FeatureEngineConfig {
                delta: 0.0,
                ..Default::default()
            },
            FeatureEngineConfig {
                delta: 1.5,
                ..Default::default()
            },
            FeatureEngineConfig {
                mu: 0.0,
                ..Default::default()
            },
            FeatureEngineConfig {
                alpha: -0.1,
                ..Default::default()
            },
            FeatureEngineConfig {
                alpha: f64::NAN,
                ..Default::default()
            },
            FeatureEngineConfig {
                query_likelihood_mu: -1.0,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(config.validate().unwrap_err().is_config(), "{config:?}");
        }
    }

    #[test]
    fn test_family_list_checks() {
        let empty = FeatureEngineConfig::default().with_families(&[]);
        assert!(empty.validate().unwrap_err().is_config());

        let duplicated = FeatureEngineConfig::default()
            .with_families(&[FeatureFamily::Simple, FeatureFamily::Simple]);
        assert!(duplicated.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_json_round_trip_and_file_loading() {
        let config = FeatureEngineConfig {
            document_count: Some(42),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, json).unwrap();

        assert_eq!(FeatureEngineConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_values_are_rejected() {
        let err = FeatureEngineConfig::from_json_str(r#"{ "alpha": 2.0 }"#).unwrap_err();
        assert!(err.is_config());

        let err = FeatureEngineConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, RankfeatError::Json(_)));
    }
}
