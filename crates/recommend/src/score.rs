use std::collections::{BTreeSet, HashSet};

use mise_recipe::{FlatEntry, Flattener, resolve};
use mise_shared::{ComponentStore, Result, TagCode};
use serde::Serialize;

use crate::TagCompatibility;

/// Pre-fetched group state used for one recommendation call.
#[derive(Debug, Clone, Default)]
pub struct GroupSnapshot {
    pub tags: BTreeSet<TagCode>,
    /// Names of ingredients currently on hand.
    pub pantry: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub existence_points: usize,
    pub tag_points: i64,
    pub value: f64,
}

/// Scores a flattened ingredient list against a group.
///
/// `tanh(existence_points) + tanh(tag_points)`, where existence points count
/// distinct ingredient names in the pantry and tag points sum the
/// compatibility of every (ingredient tag, group tag) pair over the union of
/// ingredient tags.
pub fn score_entries(
    entries: &[FlatEntry],
    group: &GroupSnapshot,
    compatibility: &TagCompatibility,
) -> Score {
    let names: HashSet<&str> = entries
        .iter()
        .map(|entry| entry.ingredient.name.as_str())
        .collect();
    let existence_points = names
        .iter()
        .filter(|name| group.pantry.contains(**name))
        .count();

    let ingredient_tags: BTreeSet<&str> = entries
        .iter()
        .flat_map(|entry| entry.ingredient.tags.iter().map(String::as_str))
        .collect();
    let tag_points: i64 = ingredient_tags
        .iter()
        .flat_map(|ingredient_tag| {
            group
                .tags
                .iter()
                .map(move |user_tag| i64::from(compatibility.lookup(ingredient_tag, user_tag)))
        })
        .sum();

    Score {
        existence_points,
        tag_points,
        value: (existence_points as f64).tanh() + (tag_points as f64).tanh(),
    }
}

/// Resolves `recipe_id` through the flattened cache and scores it.
pub async fn score_recipe<S: ComponentStore + ?Sized>(
    flattener: &Flattener,
    store: &mut S,
    recipe_id: &str,
    group: &GroupSnapshot,
    compatibility: &TagCompatibility,
) -> Result<Score> {
    let resolved = resolve(flattener, store, recipe_id).await?;

    Ok(score_entries(&resolved.entries, group, compatibility))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[tokio::test]
    async fn test_score_counts_pantry_and_tags() {
        let mut store = kitchen();
        let group = snapshot(&["vegan"], &["carrot"]);
        let compatibility: TagCompatibility = [("vegan", "vegan", 2)].into_iter().collect();

        let score = score_recipe(&Flattener::default(), &mut store, "soup", &group, &compatibility)
            .await
            .unwrap();

        assert_eq!(score.existence_points, 1);
        assert_eq!(score.tag_points, 2);
        assert_eq!(score.value, 1f64.tanh() + 2f64.tanh());
    }

    #[tokio::test]
    async fn test_score_uses_tag_union_once() {
        let mut store = kitchen();
        // carrot and tofu are both vegan; the tag counts once.
        let group = snapshot(&["vegan", "nut_allergy"], &[]);
        let compatibility: TagCompatibility = [
            ("vegan", "vegan", 1),
            ("nuts", "nut_allergy", -3),
            ("nuts", "vegan", 1),
        ]
        .into_iter()
        .collect();

        let score = score_recipe(
            &Flattener::default(),
            &mut store,
            "satay",
            &group,
            &compatibility,
        )
        .await
        .unwrap();

        assert_eq!(score.existence_points, 0);
        assert_eq!(score.tag_points, 1 - 3 + 1);
        assert_eq!(score.value, (-1f64).tanh());
    }

    #[test]
    fn test_score_is_bounded() {
        let entries: Vec<FlatEntry> = (0..50)
            .map(|i| FlatEntry {
                ingredient: ingredient(&format!("i{i}"), &format!("name{i}"), &["meat"]),
                quantity: 1.0,
            })
            .collect();
        let pantry: Vec<String> = (0..50).map(|i| format!("name{i}")).collect();
        let pantry: Vec<&str> = pantry.iter().map(String::as_str).collect();
        let group = snapshot(&["vegan"], &pantry);
        let compatibility: TagCompatibility = [("meat", "vegan", -1000)].into_iter().collect();

        let score = score_entries(&entries, &group, &compatibility);

        assert_eq!(score.existence_points, 50);
        assert!(score.value > -1e-6 && score.value < 1e-6);
    }
}
