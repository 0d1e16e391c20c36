// src/config/digest.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::curate::select::MAX_CAP;
use crate::curate::SelectionPolicy;
use crate::deliver::{DeliveryConfig, MIN_MEANINGFUL_CHARS};
use crate::error::ConfigError;
use crate::ingest::providers::geeknews::DEFAULT_LISTING_QUERY;
use crate::ingest::types::{Backend, Category, QuerySpec};
use crate::synth::{PromptConfig, SynthesisConfig};

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/digest.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub min_chars: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_chars: MIN_MEANINGFUL_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub timeout_secs: u64,
    /// Override for the search API endpoint.
    pub search_api_endpoint: Option<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            search_api_endpoint: None,
        }
    }
}

/// Whole `digest.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub queries: Vec<QuerySpec>,
    pub selection: SelectionPolicy,
    pub prompt: PromptConfig,
    pub synthesis: SynthesisConfig,
    pub delivery: DeliveryConfig,
    pub gate: GateConfig,
    pub sources: SourcesConfig,
}

impl Default for DigestConfig {
    /// Today's GeekNews listing, top 5 by points.
    fn default() -> Self {
        Self {
            queries: vec![
                QuerySpec::new(Backend::Geeknews, Category::Community, DEFAULT_LISTING_QUERY)
                    .with_max_results(100),
            ],
            selection: SelectionPolicy::default(),
            prompt: PromptConfig::default(),
            synthesis: SynthesisConfig::default(),
            delivery: DeliveryConfig::default(),
            gate: GateConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

impl DigestConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let cfg: DigestConfig = toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolve the config path and load it:
    /// 1) `explicit` (the `--config` flag), must exist
    /// 2) $DIGEST_CONFIG_PATH, must exist
    /// 3) config/digest.toml if present
    /// 4) built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(p) = explicit {
            return Self::load_from_file(p);
        }
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(ConfigError::Invalid(format!(
                    "{ENV_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                )));
            }
            return Self::load_from_file(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from_file(&default_p);
        }
        tracing::info!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queries.is_empty() {
            return Err(ConfigError::Invalid("at least one [[queries]] entry is required".into()));
        }
        if !(1..=MAX_CAP).contains(&self.selection.cap) {
            return Err(ConfigError::Invalid(format!(
                "selection.cap must be in 1..={MAX_CAP}, got {}",
                self.selection.cap
            )));
        }
        let floor_total: usize = self.selection.floors.iter().map(|f| f.min).sum();
        if floor_total > self.selection.cap {
            return Err(ConfigError::Invalid(format!(
                "category floors sum to {floor_total}, above selection.cap {}",
                self.selection.cap
            )));
        }
        for floor in &self.selection.floors {
            if !self.queries.iter().any(|q| q.category == floor.category) {
                tracing::warn!(
                    category = %floor.category,
                    "floor names a category no query produces"
                );
            }
        }
        if let Some(q) = self.queries.iter().find(|q| q.max_results == 0) {
            return Err(ConfigError::Invalid(format!(
                "query {:?} has max_results = 0",
                q.query
            )));
        }
        Ok(())
    }

    pub fn uses_backend(&self, backend: Backend) -> bool {
        self.queries.iter().any(|q| q.backend == backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = DigestConfig::default();
        cfg.validate().unwrap();
        assert!(cfg.uses_backend(Backend::Geeknews));
        assert!(!cfg.uses_backend(Backend::SearchApi));
        assert_eq!(cfg.gate.min_chars, 30);
    }

    #[test]
    fn parses_categorized_queries_and_floors() {
        let toml = r#"
            [[queries]]
            backend = "search_api"
            category = "global"
            query = "AI model release"
            max_results = 5
            recency_days = 1

            [[queries]]
            backend = "search_api"
            category = "domestic"
            query = "Korea tech startup"

            [selection]
            cap = 10
            floors = [{ category = "domestic", min = 3 }]

            [synthesis]
            provider = "openai"
        "#;
        let cfg: DigestConfig = toml::from_str(toml).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.queries.len(), 2);
        assert_eq!(cfg.queries[1].max_results, 10);
        assert_eq!(cfg.selection.floors[0].category, Category::Domestic);
        assert_eq!(cfg.synthesis.api_key_var(), "OPENAI_API_KEY");
        // untouched sections keep defaults
        assert!(cfg.prompt.forbid_markup);
    }

    #[test]
    fn floors_above_cap_are_rejected() {
        let mut cfg = DigestConfig::default();
        cfg.selection = SelectionPolicy::with_cap(2).with_floor(Category::Community, 3);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_cap_is_rejected() {
        let mut cfg = DigestConfig::default();
        cfg.selection.cap = 0;
        assert!(cfg.validate().is_err());
    }
}
