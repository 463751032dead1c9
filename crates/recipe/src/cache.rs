//! Flattened view maintenance.
//!
//! The flattened view is derived data: one row per recipe, written only by
//! [`rebuild_cache`] and always recomputable from the component store. A
//! missing row is a normal state; readers go through [`resolve`], which falls
//! back to a live [`Flattener::flatten`] walk.
//!
//! Rebuilds are scoped to the recipe being edited. Ancestors that include it
//! keep their previous rows until they are rebuilt themselves.

use mise_shared::{ComponentStore, Error, FlatRow, Result};
use serde::Serialize;

use crate::{FlatEntry, Flattener, to_rows};

/// Recomputes and stores the flattened row of `recipe_id`.
///
/// Persist failures are reported as [`Error::CacheWriteFailed`].
#[tracing::instrument(skip(flattener, store))]
pub async fn rebuild_cache<S: ComponentStore + ?Sized>(
    flattener: &Flattener,
    store: &mut S,
    recipe_id: &str,
) -> Result<Vec<FlatRow>> {
    let flattened = flattener.flatten(store, recipe_id).await?;
    let rows = to_rows(&flattened);

    store
        .put_flattened(recipe_id, &rows)
        .await
        .map_err(|err| Error::CacheWriteFailed {
            recipe_id: recipe_id.to_owned(),
            reason: err.to_string(),
        })?;

    tracing::debug!(recipe_id, rows = rows.len(), "flattened cache rebuilt");

    Ok(rows)
}

pub async fn read_cache<S: ComponentStore + ?Sized>(
    store: &mut S,
    recipe_id: &str,
) -> Result<Option<Vec<FlatRow>>> {
    store.flattened(recipe_id).await
}

/// Flattened view of one recipe joined with its ingredient snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved {
    pub recipe_id: String,
    pub default_servings: u32,
    pub entries: Vec<FlatEntry>,
    pub from_cache: bool,
}

/// Cache-aside read: the stored row when present, a live walk otherwise.
/// Never writes.
pub async fn resolve<S: ComponentStore + ?Sized>(
    flattener: &Flattener,
    store: &mut S,
    recipe_id: &str,
) -> Result<Resolved> {
    let recipe = store
        .recipe(recipe_id)
        .await?
        .ok_or_else(|| Error::not_found(recipe_id))?;

    let Some(rows) = store.flattened(recipe_id).await? else {
        tracing::debug!(recipe_id, "flattened cache miss");

        let flattened = flattener.flatten(store, recipe_id).await?;

        return Ok(Resolved {
            recipe_id: recipe.id,
            default_servings: recipe.default_servings,
            entries: flattened.into_values().collect(),
            from_cache: false,
        });
    };

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(ingredient) = store.ingredient(&row.ingredient_id).await? else {
            mise_shared::bail_integrity!(
                "flattened cache of {} references missing ingredient {}",
                recipe_id,
                row.ingredient_id
            );
        };

        entries.push(FlatEntry {
            ingredient,
            quantity: row.quantity,
        });
    }

    Ok(Resolved {
        recipe_id: recipe.id,
        default_servings: recipe.default_servings,
        entries,
        from_cache: true,
    })
}

/// Outcome of one recipe in [`rebuild_many`].
#[derive(Debug)]
pub struct RebuildOutcome {
    pub recipe_id: String,
    pub result: Result<usize>,
}

/// Rebuilds each listed recipe independently, e.g. from a scheduled job that
/// repairs ancestors left stale by sub-recipe edits. One failure does not
/// stop the others.
pub async fn rebuild_many<S: ComponentStore + ?Sized>(
    flattener: &Flattener,
    store: &mut S,
    recipe_ids: &[String],
) -> Vec<RebuildOutcome> {
    let mut outcomes = Vec::with_capacity(recipe_ids.len());

    for recipe_id in recipe_ids {
        let result = rebuild_cache(flattener, store, recipe_id)
            .await
            .map(|rows| rows.len());

        if let Err(err) = &result {
            tracing::warn!(recipe_id = %recipe_id, error = %err, "flattened cache rebuild failed");
        }

        outcomes.push(RebuildOutcome {
            recipe_id: recipe_id.to_owned(),
            result,
        });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let mut store = soup_and_feast();
        let flattener = Flattener::default();

        let first = rebuild_cache(&flattener, &mut store, "feast").await.unwrap();
        let stored_first = read_cache(&mut store, "feast").await.unwrap().unwrap();
        let second = rebuild_cache(&flattener, &mut store, "feast").await.unwrap();
        let stored_second = read_cache(&mut store, "feast").await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(stored_first, stored_second);
        assert_eq!(first, stored_second);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_previous_row() {
        let mut store = soup_and_feast();
        let flattener = Flattener::default();

        rebuild_cache(&flattener, &mut store, "soup").await.unwrap();
        store.insert(recipe("soup", 2, &[("a", 6.0)]));
        let rows = rebuild_cache(&flattener, &mut store, "soup").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ingredient_id, "a");
        assert_eq!(rows[0].quantity, 6.0);
    }

    #[tokio::test]
    async fn test_rebuild_write_failure_is_cache_write_failed() {
        let mut store = ReadOnlyCache(soup_and_feast());

        let err = rebuild_cache(&Flattener::default(), &mut store, "soup")
            .await
            .unwrap_err();

        match err {
            Error::CacheWriteFailed { recipe_id, reason } => {
                assert_eq!(recipe_id, "soup");
                assert_eq!(reason, "disk full");
            }
            other => panic!("expected cache write failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_miss_falls_back_to_flatten() {
        let mut store = soup_and_feast();

        let resolved = resolve(&Flattener::default(), &mut store, "feast")
            .await
            .unwrap();

        assert!(!resolved.from_cache);
        assert_eq!(resolved.default_servings, 1);
        assert_eq!(resolved.entries.len(), 2);
        assert!(!store.is_cached("feast"));
    }

    #[tokio::test]
    async fn test_resolve_after_eviction_flattens_current_structure() {
        let mut store = soup_and_feast();
        let flattener = Flattener::default();
        rebuild_cache(&flattener, &mut store, "soup").await.unwrap();
        store.insert(recipe("soup", 2, &[("a", 6.0)]));

        let stale = resolve(&flattener, &mut store, "soup").await.unwrap();
        assert!(stale.from_cache);
        assert_eq!(stale.entries.len(), 2);

        assert!(store.evict_flattened("soup").is_some());
        assert!(store.evict_flattened("soup").is_none());

        let fresh = resolve(&flattener, &mut store, "soup").await.unwrap();
        assert!(!fresh.from_cache);
        assert_eq!(fresh.entries.len(), 1);
        assert_eq!(fresh.entries[0].quantity, 6.0);
    }

    #[tokio::test]
    async fn test_resolve_hit_joins_ingredient_snapshots() {
        let mut store = soup_and_feast();
        let flattener = Flattener::default();
        rebuild_cache(&flattener, &mut store, "soup").await.unwrap();

        let resolved = resolve(&flattener, &mut store, "soup").await.unwrap();

        assert!(resolved.from_cache);
        assert_eq!(resolved.default_servings, 2);
        let names: Vec<_> = resolved
            .entries
            .iter()
            .map(|e| (e.ingredient.name.as_str(), e.quantity))
            .collect();
        assert_eq!(names, vec![("carrot", 4.0), ("flour", 1.0)]);
    }

    #[tokio::test]
    async fn test_resolve_serves_stale_ancestor_row() {
        let mut store = soup_and_feast();
        let flattener = Flattener::default();
        rebuild_cache(&flattener, &mut store, "feast").await.unwrap();

        // Editing the sub-recipe does not cascade to feast's row.
        store.insert(recipe("soup", 2, &[("a", 10.0), ("b", 1.0)]));
        rebuild_cache(&flattener, &mut store, "soup").await.unwrap();

        let feast = resolve(&flattener, &mut store, "feast").await.unwrap();
        let carrot = feast.entries.iter().find(|e| e.ingredient.id == "a").unwrap();
        assert_eq!(carrot.quantity, 4.0);

        rebuild_cache(&flattener, &mut store, "feast").await.unwrap();
        let feast = resolve(&flattener, &mut store, "feast").await.unwrap();
        let carrot = feast.entries.iter().find(|e| e.ingredient.id == "a").unwrap();
        assert_eq!(carrot.quantity, 10.0);
    }

    #[tokio::test]
    async fn test_resolve_row_with_missing_ingredient() {
        let mut store = soup_and_feast();
        let flattener = Flattener::default();
        rebuild_cache(&flattener, &mut store, "soup").await.unwrap();
        store.remove("b");

        let err = resolve(&flattener, &mut store, "soup").await.unwrap_err();

        assert!(matches!(err, Error::DataIntegrity(_)));
    }

    #[tokio::test]
    async fn test_rebuild_many_reports_each_recipe() {
        let mut store = soup_and_feast();
        let ids = vec!["soup".to_owned(), "missing".to_owned(), "feast".to_owned()];

        let outcomes = rebuild_many(&Flattener::default(), &mut store, &ids).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].result.as_ref().unwrap(), &2);
        assert!(matches!(outcomes[1].result, Err(Error::NotFound(_))));
        assert!(outcomes[2].result.is_ok());
        assert!(store.is_cached("soup"));
        assert!(store.is_cached("feast"));
    }
}
