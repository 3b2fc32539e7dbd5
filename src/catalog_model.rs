//! # Catalog Data Model
//!
//! Data structures shared by the normalizer, the recommendation engine and
//! the storage layer.
//!
//! ## Core Concepts
//!
//! - **Canonical ingredient**: a cleaned, deduplicated name used as the join
//!   key between recipes and pantries
//! - **Recipe**: dish metadata; its ingredients travel alongside it in a
//!   [`RecipeWithIngredients`]
//! - **Recommendation**: a scored recipe, computed per request and never
//!   stored
//!
//! ## Usage
//!
//! ```rust
//! use pantry_match::catalog_model::{CatalogIngredient, Recipe, RecipeWithIngredients};
//!
//! let dal = RecipeWithIngredients::new(Recipe::new(1, "Dal Tadka"))
//!     .with_ingredient(CatalogIngredient::new(10, "dal"))
//!     .with_ingredient(CatalogIngredient::new(11, "ghee"));
//! assert_eq!(dal.ingredient_count(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::IngredientCategory;

pub type IngredientId = i64;
pub type RecipeId = i64;

/// A stored canonical ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIngredient {
    pub id: IngredientId,
    /// Lowercase, whitespace-collapsed, alphabetic name; the dedup key
    pub name: String,
    pub category: IngredientCategory,
}

/// Recipe metadata as imported from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub instructions: String,
    pub image_url: String,
    /// Course label from the dataset ("Main Course", "Snack", ...)
    pub category: String,
    pub is_vegetarian: bool,
    pub prep_time: String,
    pub cuisine: String,
}

impl Recipe {
    /// Create a recipe with only an id and title; other fields empty
    pub fn new(id: RecipeId, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            instructions: String::new(),
            image_url: String::new(),
            category: String::new(),
            is_vegetarian: false,
            prep_time: String::new(),
            cuisine: String::new(),
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn vegetarian(mut self, is_vegetarian: bool) -> Self {
        self.is_vegetarian = is_vegetarian;
        self
    }
}

/// An ingredient reference inside a recipe: id for matching, name for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIngredient {
    pub id: IngredientId,
    pub name: String,
}

impl CatalogIngredient {
    pub fn new(id: IngredientId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// One catalog entry: a recipe and its ordered ingredient references
///
/// A missing ingredient list deserializes as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeWithIngredients {
    pub recipe: Recipe,
    #[serde(default)]
    pub ingredients: Vec<CatalogIngredient>,
}

impl RecipeWithIngredients {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            ingredients: Vec::new(),
        }
    }

    /// Append an ingredient reference; a repeated id is ignored
    pub fn with_ingredient(mut self, ingredient: CatalogIngredient) -> Self {
        if !self.ingredients.iter().any(|i| i.id == ingredient.id) {
            self.ingredients.push(ingredient);
        }
        self
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }
}

/// A scored recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recipe: Recipe,
    /// Percentage of the recipe's ingredients owned, 0 to 100, two decimals
    pub match_score: f64,
    /// First few non-owned ingredient names, in catalog order
    pub missing_ingredients: Vec<String>,
    /// Total number of non-owned ingredients
    pub missing_count: usize,
}

/// Flat wire shape of a recommendation
#[derive(Debug, Serialize)]
pub struct RecommendationPayload<'a> {
    pub id: RecipeId,
    pub title: &'a str,
    pub image_url: &'a str,
    pub is_vegetarian: bool,
    pub category: &'a str,
    pub match_score: f64,
    pub missing_count: usize,
    pub missing_ingredients: &'a [String],
}

impl Recommendation {
    pub fn payload(&self) -> RecommendationPayload<'_> {
        RecommendationPayload {
            id: self.recipe.id,
            title: &self.recipe.title,
            image_url: &self.recipe.image_url,
            is_vegetarian: self.recipe.is_vegetarian,
            category: &self.recipe.category,
            match_score: self.match_score,
            missing_count: self.missing_count,
            missing_ingredients: &self.missing_ingredients,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.payload())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.recipe.title, self.match_score)?;
        if self.missing_count > 0 {
            write!(f, " missing {}", self.missing_ingredients.join(", "))?;
            let hidden = self.missing_count.saturating_sub(self.missing_ingredients.len());
            if hidden > 0 {
                write!(f, " and {hidden} more")?;
            }
        }
        Ok(())
    }
}

/// One line of a recipe detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDetail {
    pub name: String,
    pub matched: bool,
}

/// A recipe with its annotated, owned-first ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<IngredientDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recommendation() -> Recommendation {
        Recommendation {
            recipe: Recipe::new(7, "Aloo Gobi").with_category("Main Course").vegetarian(true),
            match_score: 40.0,
            missing_ingredients: vec!["cauliflower".into(), "ginger".into(), "cumin seeds".into()],
            missing_count: 5,
        }
    }

    #[test]
    fn test_duplicate_ingredient_collapses() {
        let entry = RecipeWithIngredients::new(Recipe::new(1, "Jeera Rice"))
            .with_ingredient(CatalogIngredient::new(1, "rice"))
            .with_ingredient(CatalogIngredient::new(2, "cumin seeds"))
            .with_ingredient(CatalogIngredient::new(1, "rice"));
        assert_eq!(entry.ingredient_count(), 2);
        assert_eq!(entry.ingredients[1].name, "cumin seeds");
    }

    #[test]
    fn test_missing_ingredient_list_deserializes_empty() {
        let json = r#"{"recipe":{"id":3,"title":"Chai","instructions":"","image_url":"",
            "category":"Drink","is_vegetarian":true,"prep_time":"","cuisine":""}}"#;
        let entry: RecipeWithIngredients = serde_json::from_str(json).unwrap();
        assert!(entry.ingredients.is_empty());
    }

    #[test]
    fn test_payload_fields() {
        let value = sample_recommendation().to_json();
        assert_eq!(value["id"], 7);
        assert_eq!(value["title"], "Aloo Gobi");
        assert_eq!(value["is_vegetarian"], true);
        assert_eq!(value["category"], "Main Course");
        assert_eq!(value["match_score"], 40.0);
        assert_eq!(value["missing_count"], 5);
        assert_eq!(value["missing_ingredients"].as_array().unwrap().len(), 3);
        assert!(value.get("instructions").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample_recommendation().to_string(),
            "Aloo Gobi (40.00%) missing cauliflower, ginger, cumin seeds and 2 more"
        );
    }
}
