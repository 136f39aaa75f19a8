use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matching::{ConfidenceBand, MatchSettings, MatchStrategy};
use crate::search::SearchFilters;
use crate::suggest::{SuggestOptions, SuggestionPool};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingConfig {
    #[serde(default)]
    pub strategy: MatchStrategy,
    #[serde(default = "default_confidence_min")]
    pub substitution_confidence_min: f64,
    #[serde(default = "default_confidence_max")]
    pub substitution_confidence_max: f64,
    #[serde(default)]
    pub default_min_match_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionsConfig {
    #[serde(default = "default_suggestion_limit")]
    pub limit: usize,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    #[serde(default = "default_true")]
    pub include_recipe_ingredients: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionConfig {
    #[serde(default = "default_detection_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_detection_delay_ms")]
    pub delay_jitter_ms: u64,
    #[serde(default = "default_validate_delay_ms")]
    pub validate_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserConfig {
    #[serde(default = "default_recent_search_limit")]
    pub recent_search_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub strategy: Option<MatchStrategy>,
    pub db_path: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/recipe-oracle/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        parsed
            .confidence_band()
            .with_context(|| format!("invalid [matching] section in {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(strategy) = overrides.strategy {
            self.matching.strategy = strategy;
        }
        if let Some(db_path) = overrides.db_path {
            self.storage.db_path = db_path;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn confidence_band(&self) -> Result<ConfidenceBand> {
        Ok(ConfidenceBand::new(
            self.matching.substitution_confidence_min,
            self.matching.substitution_confidence_max,
        )?)
    }

    pub fn match_settings(&self) -> Result<MatchSettings> {
        Ok(MatchSettings::new(
            self.matching.strategy,
            self.confidence_band()?,
        ))
    }

    pub fn suggest_options(&self) -> SuggestOptions {
        SuggestOptions {
            pool: if self.suggestions.include_recipe_ingredients {
                SuggestionPool::CatalogAndRecipes
            } else {
                SuggestionPool::Catalog
            },
            limit: self.suggestions.limit,
            min_query_len: self.suggestions.min_query_len,
        }
    }

    /// Applies `default_min_match_score` when the caller set no floor.
    pub fn with_default_floor(&self, mut filters: SearchFilters) -> SearchFilters {
        let floor = self.matching.default_min_match_score;
        if filters.min_match_score.is_none() && floor > 0 {
            filters.min_match_score = Some(floor);
        }
        filters
    }

    pub fn detection_delay(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.detection.delay_ms),
            Duration::from_millis(self.detection.delay_jitter_ms),
        )
    }

    pub fn default_template() -> String {
        let template = r#"[storage]
db_path = "~/.local/share/recipe-oracle/user.db"

[matching]
# weighted: exact names + substitutions, essentials weighted 4:1
# loose: substring containment, plain ratio
strategy = "weighted"
substitution_confidence_min = 0.80
substitution_confidence_max = 0.95
default_min_match_score = 0

[suggestions]
limit = 8
min_query_len = 2
include_recipe_ingredients = true

[detection]
delay_ms = 2000
delay_jitter_ms = 2000
validate_delay_ms = 200

[user]
recent_search_limit = 5

[server]
host = "127.0.0.1"
port = 3001
"#;
        template.to_string()
    }
}

impl ServerConfig {
    /// Resolves the listen address, preferring explicit CLI values.
    pub fn bind_address(&self, host: Option<&str>, port: Option<u16>) -> Result<SocketAddr> {
        let bind = format!(
            "{}:{}",
            host.unwrap_or(&self.host),
            port.unwrap_or(self.port)
        );
        bind.parse()
            .with_context(|| format!("invalid bind address {bind}"))
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::default(),
            substitution_confidence_min: default_confidence_min(),
            substitution_confidence_max: default_confidence_max(),
            default_min_match_score: 0,
        }
    }
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            limit: default_suggestion_limit(),
            min_query_len: default_min_query_len(),
            include_recipe_ingredients: true,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_detection_delay_ms(),
            delay_jitter_ms: default_detection_delay_ms(),
            validate_delay_ms: default_validate_delay_ms(),
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            recent_search_limit: default_recent_search_limit(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_db_path() -> String {
    "~/.local/share/recipe-oracle/user.db".to_string()
}

fn default_confidence_min() -> f64 {
    ConfidenceBand::DEFAULT.min
}

fn default_confidence_max() -> f64 {
    ConfidenceBand::DEFAULT.max
}

fn default_suggestion_limit() -> usize {
    crate::suggest::DEFAULT_SUGGESTION_LIMIT
}

fn default_min_query_len() -> usize {
    crate::suggest::DEFAULT_MIN_QUERY_LEN
}

fn default_detection_delay_ms() -> u64 {
    2000
}

fn default_validate_delay_ms() -> u64 {
    200
}

fn default_recent_search_limit() -> usize {
    crate::store::DEFAULT_RECENT_SEARCH_LIMIT
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_matches_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[matching]
strategy = "loose"

[suggestions]
limit = 3
"#,
        )
        .unwrap();
        assert_eq!(parsed.matching.strategy, MatchStrategy::Loose);
        assert_eq!(parsed.matching.substitution_confidence_max, 0.95);
        assert_eq!(parsed.suggestions.limit, 3);
        assert_eq!(parsed.suggestions.min_query_len, 2);
        assert_eq!(parsed.user.recent_search_limit, 5);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_rejects_inverted_confidence_band() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[matching]\nsubstitution_confidence_min = 0.9\nsubstitution_confidence_max = 0.5\n",
        )
        .unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn written_template_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::write_template(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn overrides_replace_only_set_fields() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            strategy: Some(MatchStrategy::Loose),
            db_path: None,
        });
        assert_eq!(config.matching.strategy, MatchStrategy::Loose);
        assert_eq!(config.storage.db_path, default_db_path());
        assert_eq!(config.match_settings().unwrap().strategy, MatchStrategy::Loose);
    }

    #[test]
    fn suggestion_pool_follows_flag() {
        let mut config = Config::default();
        assert_eq!(config.suggest_options().pool, SuggestionPool::CatalogAndRecipes);
        config.suggestions.include_recipe_ingredients = false;
        assert_eq!(config.suggest_options().pool, SuggestionPool::Catalog);
    }

    #[test]
    fn default_floor_applies_only_when_unset() {
        let mut config = Config::default();
        assert_eq!(config.with_default_floor(SearchFilters::default()).min_match_score, None);
        config.matching.default_min_match_score = 40;
        let filled = config.with_default_floor(SearchFilters::default());
        assert_eq!(filled.min_match_score, Some(40));
        let explicit = config.with_default_floor(SearchFilters {
            min_match_score: Some(10),
            ..SearchFilters::default()
        });
        assert_eq!(explicit.min_match_score, Some(10));
    }

    #[test]
    fn expands_home_prefix() {
        let expanded = expand_tilde("~/data/user.db");
        assert!(expanded.ends_with("data/user.db"));
        assert_eq!(expand_tilde("/tmp/user.db"), PathBuf::from("/tmp/user.db"));
    }

    #[test]
    fn bind_address_prefers_explicit_values() {
        let server = ServerConfig::default();
        assert_eq!(
            server.bind_address(None, None).unwrap(),
            "127.0.0.1:3001".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            server.bind_address(Some("0.0.0.0"), Some(8080)).unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert!(server.bind_address(Some("not a host"), None).is_err());
    }
}
