use anyhow::Result;
use mise_recipe::SqliteStore;
use mise_recommend::{GroupSnapshot, RecommendationCache, Recommender};
use mise_shared::ComponentStore;

use mise::Config;

/// Scores every stored recipe for one group. The cache lives for the
/// process only, so each invocation computes a fresh list.
pub async fn run(
    config: Config,
    group_id: String,
    tags: Vec<String>,
    pantry: Vec<String>,
) -> Result<()> {
    let recipe = crate::cli::recipe_command(&config).await?;
    let recommender = Recommender::new(
        RecommendationCache::new(config.recommender.ttl()),
        config.recommender.top_k,
    )
    .with_flattener(recipe.flattener);
    let compatibility = config.recommender.tag_compatibility();
    let group = GroupSnapshot {
        tags: tags.into_iter().collect(),
        pantry: pantry.into_iter().collect(),
    };

    let mut conn = recipe.read_db.acquire().await?;
    let mut store = SqliteStore::new(&mut conn);
    let candidates = store.recipe_ids().await?;

    let recipe_ids = recommender
        .recommend(&mut store, &group_id, &candidates, &group, &compatibility)
        .await;

    crate::cli::print_json(&recipe_ids)
}
