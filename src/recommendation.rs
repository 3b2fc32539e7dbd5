//! # Recommendation Engine
//!
//! Ranks catalog recipes by the share of their ingredients a user already
//! owns and reports what is missing. Everything here is a pure function of
//! the owned set and a catalog snapshot, so one snapshot can serve any
//! number of concurrent requests.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::catalog_model::{
    CatalogIngredient, IngredientDetail, IngredientId, Recommendation, RecipeWithIngredients,
};

/// Engine tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendConfig {
    /// Maximum number of recommendations returned
    pub max_results: usize,
    /// How many missing ingredient names are listed per recipe
    pub missing_preview: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            max_results: 20,
            missing_preview: 3,
        }
    }
}

/// Score and rank the catalog against an owned set with default limits
///
/// # Examples
///
/// ```rust
/// use std::collections::HashSet;
/// use pantry_match::catalog_model::{CatalogIngredient, Recipe, RecipeWithIngredients};
/// use pantry_match::recommendation::recommend;
///
/// let catalog = vec![RecipeWithIngredients::new(Recipe::new(1, "Tomato Rasam"))
///     .with_ingredient(CatalogIngredient::new(1, "onion"))
///     .with_ingredient(CatalogIngredient::new(2, "tomato"))
///     .with_ingredient(CatalogIngredient::new(3, "salt"))];
/// let owned: HashSet<i64> = [1, 2].into_iter().collect();
///
/// let results = recommend(&owned, &catalog);
/// assert_eq!(results[0].match_score, 66.67);
/// assert_eq!(results[0].missing_ingredients, vec!["salt".to_string()]);
/// ```
pub fn recommend(
    owned: &HashSet<IngredientId>,
    catalog: &[RecipeWithIngredients],
) -> Vec<Recommendation> {
    recommend_with_config(owned, catalog, &RecommendConfig::default())
}

/// Score and rank the catalog against an owned set
///
/// An empty owned set yields no recommendations. Results are ordered by
/// score, highest first; equal scores keep catalog order.
pub fn recommend_with_config(
    owned: &HashSet<IngredientId>,
    catalog: &[RecipeWithIngredients],
    config: &RecommendConfig,
) -> Vec<Recommendation> {
    if owned.is_empty() {
        debug!("Empty pantry, skipping scoring of {} recipes", catalog.len());
        return Vec::new();
    }

    let mut scored: Vec<Recommendation> = catalog
        .iter()
        .map(|entry| score_recipe(owned, entry, config.missing_preview))
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    scored.truncate(config.max_results);

    info!(
        owned = owned.len(),
        catalog = catalog.len(),
        returned = scored.len(),
        "Scored recipes against pantry"
    );
    scored
}

fn score_recipe(
    owned: &HashSet<IngredientId>,
    entry: &RecipeWithIngredients,
    missing_preview: usize,
) -> Recommendation {
    let total = entry.ingredients.len();
    if total == 0 {
        debug!(recipe_id = entry.recipe.id, "Recipe has no ingredients, scoring 0");
        return Recommendation {
            recipe: entry.recipe.clone(),
            match_score: 0.0,
            missing_ingredients: Vec::new(),
            missing_count: 0,
        };
    }

    let missing: Vec<&CatalogIngredient> = entry
        .ingredients
        .iter()
        .filter(|ingredient| !owned.contains(&ingredient.id))
        .collect();
    let matched = total - missing.len();

    Recommendation {
        recipe: entry.recipe.clone(),
        match_score: match_score(matched, total),
        missing_ingredients: missing
            .iter()
            .take(missing_preview)
            .map(|ingredient| ingredient.name.clone())
            .collect(),
        missing_count: missing.len(),
    }
}

/// Percentage of `matched` over `total`, rounded to two decimals with ties
/// to even (1 of 32 is 3.12, 3 of 32 is 9.38)
///
/// Only a complete match scores 100; a near-complete one is capped at 99.99.
pub fn match_score(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = matched as f64 / total as f64 * 100.0;
    let rounded = (percent * 100.0).round_ties_even() / 100.0;
    if matched < total && rounded >= 100.0 {
        99.99
    } else {
        rounded
    }
}

/// Annotate a recipe's ingredients with ownership, owned ones first
///
/// Relative order within the owned and non-owned groups follows the
/// catalog.
pub fn build_ingredient_detail(
    entry: &RecipeWithIngredients,
    owned: &HashSet<IngredientId>,
) -> Vec<IngredientDetail> {
    let mut details: Vec<IngredientDetail> = entry
        .ingredients
        .iter()
        .map(|ingredient| IngredientDetail {
            name: ingredient.name.clone(),
            matched: owned.contains(&ingredient.id),
        })
        .collect();
    details.sort_by_key(|detail| !detail.matched);
    details
}
