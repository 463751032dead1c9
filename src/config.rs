use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mise_recommend::{CompatibilityEntry, TagCompatibility};
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub recommender: RecommenderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Deepest recipe nesting a flatten walk accepts.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    mise_recipe::DEFAULT_MAX_DEPTH
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommenderConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub compatibility: Vec<CompatibilityEntry>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            top_k: default_top_k(),
            compatibility: Vec::new(),
        }
    }
}

impl RecommenderConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn tag_compatibility(&self) -> TagCompatibility {
        self.compatibility.iter().cloned().collect()
    }
}

fn default_ttl_secs() -> u64 {
    mise_recommend::DEFAULT_TTL.as_secs()
}

fn default_top_k() -> usize {
    mise_recommend::DEFAULT_TOP_K
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MISE__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("database.url", "sqlite:mise.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional: a missing file leaves the defaults in place
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MISE")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.engine.max_depth < 1 {
            return Err("Engine max_depth must be at least 1".to_string());
        }
        if self.recommender.top_k < 1 {
            return Err("Recommender top_k must be at least 1".to_string());
        }
        if self.recommender.ttl_secs == 0 {
            return Err("Recommender ttl_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            observability: ObservabilityConfig::default(),
            engine: EngineConfig::default(),
            recommender: RecommenderConfig::default(),
        }
    }

    #[test]
    fn test_validation_defaults() {
        let config = base_config();

        assert!(config.validate().is_ok());
        assert_eq!(config.engine.max_depth, 32);
        assert_eq!(config.recommender.top_k, 10);
        assert_eq!(config.recommender.ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = base_config();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_depth() {
        let mut config = base_config();
        config.engine.max_depth = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_recommender() {
        let mut config = base_config();
        config.recommender.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.recommender.ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("mise.toml");
        std::fs::write(
            &path,
            r#"
[database]
url = "sqlite:kitchen.db"
max_connections = 2

[engine]
max_depth = 8

[recommender]
ttl_secs = 60

[[recommender.compatibility]]
ingredient_tag = "meat"
user_tag = "vegan"
score = -5
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.display().to_string())).unwrap();

        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.engine.max_depth, 8);
        assert_eq!(config.recommender.ttl_secs, 60);
        assert_eq!(config.recommender.top_k, 10);
        assert_eq!(
            config
                .recommender
                .tag_compatibility()
                .lookup("meat", "vegan"),
            -5
        );
    }
}
