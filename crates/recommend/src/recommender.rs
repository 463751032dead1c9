use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use mise_recipe::Flattener;
use mise_shared::ComponentStore;

use crate::{GroupSnapshot, RecommendationCache, TagCompatibility, score_recipe};

pub const DEFAULT_TOP_K: usize = 10;

/// Ordered best-first: higher score, then lower recipe id.
#[derive(Debug, Clone, PartialEq)]
struct Ranked {
    score: f64,
    recipe_id: String,
}

impl Eq for Ranked {}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.recipe_id.cmp(&self.recipe_id))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the `k` best of `scored` using a bounded min-heap; best first.
pub fn top_k(scored: impl IntoIterator<Item = (String, f64)>, k: usize) -> Vec<String> {
    if k == 0 {
        return Vec::new();
    }

    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (recipe_id, score) in scored {
        heap.push(Reverse(Ranked { score, recipe_id }));
        if heap.len() > k {
            heap.pop();
        }
    }

    // Ascending order of Reverse is descending rank.
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(ranked)| ranked.recipe_id)
        .collect()
}

#[derive(Debug, Clone)]
pub struct Recommender {
    pub cache: RecommendationCache,
    pub flattener: Flattener,
    pub top_k: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(RecommendationCache::default(), DEFAULT_TOP_K)
    }
}

impl Recommender {
    pub fn new(cache: RecommendationCache, top_k: usize) -> Self {
        Self {
            cache,
            flattener: Flattener::default(),
            top_k,
        }
    }

    pub fn with_flattener(mut self, flattener: Flattener) -> Self {
        self.flattener = flattener;
        self
    }

    /// Best `top_k` candidates for `group_id`, highest score first.
    ///
    /// The group's cached list is returned while it is fresh, whatever the
    /// candidates or snapshot. On a miss every candidate is scored; recipes
    /// that fail to resolve are skipped and logged.
    #[tracing::instrument(skip(self, store, candidates, group, compatibility), fields(candidates = candidates.len()))]
    pub async fn recommend<S: ComponentStore + ?Sized>(
        &self,
        store: &mut S,
        group_id: &str,
        candidates: &[String],
        group: &GroupSnapshot,
        compatibility: &TagCompatibility,
    ) -> Vec<String> {
        let mut slot = self.cache.lock(group_id).await;

        if let Some(recipe_ids) = slot.get() {
            tracing::debug!("recommendation cache hit");
            return recipe_ids;
        }

        let mut scored = Vec::with_capacity(candidates.len());
        for recipe_id in candidates {
            match score_recipe(&self.flattener, store, recipe_id, group, compatibility).await {
                Ok(score) => scored.push((recipe_id.to_owned(), score.value)),
                Err(err) => {
                    tracing::warn!(recipe_id = %recipe_id, error = %err, "recipe skipped from recommendation");
                }
            }
        }

        let recipe_ids = top_k(scored, self.top_k);
        slot.set(recipe_ids.to_vec());

        tracing::debug!(recommended = recipe_ids.len(), "recommendation computed");

        recipe_ids
    }

    pub async fn invalidate(&self, group_id: &str) {
        self.cache.invalidate(group_id).await;
    }
}
