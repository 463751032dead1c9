pub mod ingredient;
pub mod recipe;
pub mod recommend;
pub mod shop;

use anyhow::Result;
use serde::Serialize;

use mise::Config;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

/// Recipe engine over the configured database: one write connection and a
/// read-only pool.
pub async fn recipe_command(config: &Config) -> Result<mise_recipe::Command> {
    let write_pool = mise::create_write_pool(&config.database.url).await?;
    let read_pool = mise::create_read_pool(&config.database.url, config.database.max_connections).await?;

    Ok(mise_recipe::Command::new(write_pool, read_pool).with_max_depth(config.engine.max_depth))
}

/// Parses `key=value` pairs such as `soup=4` or `carrot=2.5`.
pub fn parse_pair(value: &str) -> Result<(String, f64), String> {
    let (key, quantity) = value
        .split_once('=')
        .ok_or_else(|| format!("expected <id>=<quantity>, got `{value}`"))?;

    let quantity = quantity
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid quantity in `{value}`: {e}"))?;

    Ok((key.trim().to_owned(), quantity))
}
