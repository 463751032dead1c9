use mise::config::{Config, DatabaseConfig, EngineConfig, ObservabilityConfig, RecommenderConfig};
use temp_dir::TempDir;

pub struct TestState {
    pub config: Config,
    pub command: mise_recipe::Command,
    _dir: TempDir,
}

/// Migrated database in a temporary directory, with the same pool split the
/// binary uses.
pub async fn setup_test_state() -> anyhow::Result<TestState> {
    let dir = TempDir::new()?;
    let path = dir.child("mise.db");
    let config = Config {
        database: DatabaseConfig {
            url: format!("sqlite:{}", path.display()),
            max_connections: 2,
        },
        observability: ObservabilityConfig::default(),
        engine: EngineConfig::default(),
        recommender: RecommenderConfig::default(),
    };

    mise::migrate::migrate(&config).await?;

    let write_pool = mise::create_write_pool(&config.database.url).await?;
    let read_pool = mise::create_read_pool(&config.database.url, 2).await?;

    Ok(TestState {
        command: mise_recipe::Command::new(write_pool, read_pool)
            .with_max_depth(config.engine.max_depth),
        config,
        _dir: dir,
    })
}
