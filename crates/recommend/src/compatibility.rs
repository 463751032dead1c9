use std::collections::HashMap;

use mise_shared::TagCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub ingredient_tag: TagCode,
    pub user_tag: TagCode,
    pub score: i32,
}

/// Signed score of an (ingredient tag, user tag) pair. Missing pairs score 0.
#[derive(Debug, Clone, Default)]
pub struct TagCompatibility {
    scores: HashMap<TagCode, HashMap<TagCode, i32>>,
}

impl TagCompatibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        ingredient_tag: impl Into<TagCode>,
        user_tag: impl Into<TagCode>,
        score: i32,
    ) {
        self.scores
            .entry(ingredient_tag.into())
            .or_default()
            .insert(user_tag.into(), score);
    }

    pub fn lookup(&self, ingredient_tag: &str, user_tag: &str) -> i32 {
        self.scores
            .get(ingredient_tag)
            .and_then(|user_tags| user_tags.get(user_tag))
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.scores.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<I: Into<TagCode>, U: Into<TagCode>> FromIterator<(I, U, i32)> for TagCompatibility {
    fn from_iter<T: IntoIterator<Item = (I, U, i32)>>(iter: T) -> Self {
        let mut compatibility = Self::new();
        for (ingredient_tag, user_tag, score) in iter {
            compatibility.insert(ingredient_tag, user_tag, score);
        }

        compatibility
    }
}

impl FromIterator<CompatibilityEntry> for TagCompatibility {
    fn from_iter<T: IntoIterator<Item = CompatibilityEntry>>(iter: T) -> Self {
        iter.into_iter()
            .map(|entry| (entry.ingredient_tag, entry.user_tag, entry.score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_directional() {
        let compatibility: TagCompatibility =
            [("meat", "vegan", -5), ("vegan", "vegan", 2)].into_iter().collect();

        assert_eq!(compatibility.lookup("meat", "vegan"), -5);
        assert_eq!(compatibility.lookup("vegan", "meat"), 0);
        assert_eq!(compatibility.lookup("vegan", "vegan"), 2);
        assert_eq!(compatibility.len(), 2);
    }

    #[test]
    fn test_later_entry_overrides() {
        let compatibility: TagCompatibility = vec![
            CompatibilityEntry {
                ingredient_tag: "nuts".to_owned(),
                user_tag: "nut_allergy".to_owned(),
                score: -1,
            },
            CompatibilityEntry {
                ingredient_tag: "nuts".to_owned(),
                user_tag: "nut_allergy".to_owned(),
                score: -10,
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(compatibility.lookup("nuts", "nut_allergy"), -10);
        assert_eq!(compatibility.len(), 1);
    }
}
