//! # In-Memory Catalog
//!
//! A process-local store for canonical ingredients, recipes, their links and
//! user pantries. It applies the same rules as the PostgreSQL store in
//! [`crate::db`]: ingredients are keyed by canonical name and an upsert
//! overwrites the category, links are unique per recipe, and setting a
//! pantry replaces it.

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use crate::catalog_model::{
    CanonicalIngredient, CatalogIngredient, IngredientId, Recipe, RecipeDetail, RecipeId,
    RecipeWithIngredients, Recommendation,
};
use crate::category::IngredientCategory;
use crate::ingestion::{NewRecipe, PreparedRecipe};
use crate::recommendation::{build_ingredient_detail, recommend};

pub type UserId = i64;

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    ingredients: Vec<CanonicalIngredient>,
    ingredient_ids: HashMap<String, IngredientId>,
    recipes: Vec<Recipe>,
    links: HashMap<RecipeId, Vec<IngredientId>>,
    pantries: HashMap<UserId, HashSet<IngredientId>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an ingredient or overwrite the category of an existing one
    ///
    /// Returns the id, which is stable for a given name.
    pub fn upsert_ingredient(&mut self, name: &str, category: IngredientCategory) -> IngredientId {
        if let Some(&id) = self.ingredient_ids.get(name) {
            if let Some(existing) = self.ingredient_mut(id) {
                if existing.category != category {
                    debug!(
                        "Ingredient '{}' category {} -> {}",
                        name, existing.category, category
                    );
                }
                existing.category = category;
            }
            return id;
        }

        let id = self.ingredients.len() as IngredientId + 1;
        self.ingredients.push(CanonicalIngredient {
            id,
            name: name.to_string(),
            category,
        });
        self.ingredient_ids.insert(name.to_string(), id);
        id
    }

    pub fn insert_recipe(&mut self, recipe: NewRecipe) -> RecipeId {
        let id = self.recipes.len() as RecipeId + 1;
        self.recipes.push(recipe.into_recipe(id));
        self.links.insert(id, Vec::new());
        id
    }

    /// Link an ingredient to a recipe; returns `false` if already linked or
    /// the recipe does not exist
    pub fn link(&mut self, recipe_id: RecipeId, ingredient_id: IngredientId) -> bool {
        match self.links.get_mut(&recipe_id) {
            Some(linked) if !linked.contains(&ingredient_id) => {
                linked.push(ingredient_id);
                true
            }
            Some(_) => false,
            None => {
                warn!("Cannot link ingredient {} to unknown recipe {}", ingredient_id, recipe_id);
                false
            }
        }
    }

    /// Store a prepared recipe with all of its ingredients
    pub fn store_prepared(&mut self, prepared: &PreparedRecipe) -> RecipeId {
        let recipe_id = self.insert_recipe(prepared.recipe.clone());
        for ingredient in &prepared.ingredients {
            let ingredient_id = self.upsert_ingredient(&ingredient.name, ingredient.category);
            self.link(recipe_id, ingredient_id);
        }
        recipe_id
    }

    pub fn ingredient(&self, id: IngredientId) -> Option<&CanonicalIngredient> {
        index_of(id).and_then(|index| self.ingredients.get(index))
    }

    fn ingredient_mut(&mut self, id: IngredientId) -> Option<&mut CanonicalIngredient> {
        index_of(id).and_then(|index| self.ingredients.get_mut(index))
    }

    pub fn ingredient_by_name(&self, name: &str) -> Option<&CanonicalIngredient> {
        self.ingredient_ids
            .get(name)
            .and_then(|&id| self.ingredient(id))
    }

    /// All ingredients ordered by category label, then name
    pub fn list_ingredients(&self) -> Vec<&CanonicalIngredient> {
        let mut listed: Vec<&CanonicalIngredient> = self.ingredients.iter().collect();
        listed.sort_by(|a, b| {
            a.category
                .as_str()
                .cmp(b.category.as_str())
                .then_with(|| a.name.cmp(&b.name))
        });
        listed
    }

    /// Number of ingredients per category, in label order
    pub fn category_counts(&self) -> Vec<(IngredientCategory, usize)> {
        let mut counts: Vec<(IngredientCategory, usize)> =
            [IngredientCategory::All, IngredientCategory::QuickKitchen]
                .into_iter()
                .map(|category| {
                    let count = self
                        .ingredients
                        .iter()
                        .filter(|i| i.category == category)
                        .count();
                    (category, count)
                })
                .collect();
        counts.retain(|(_, count)| *count > 0);
        counts
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn recipe_entry(&self, recipe_id: RecipeId) -> Option<RecipeWithIngredients> {
        let recipe = self.recipes.iter().find(|r| r.id == recipe_id)?;
        Some(self.entry_for(recipe))
    }

    fn entry_for(&self, recipe: &Recipe) -> RecipeWithIngredients {
        let ingredients = self
            .links
            .get(&recipe.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|&id| self.ingredient(id))
                    .map(|i| CatalogIngredient::new(i.id, &i.name))
                    .collect()
            })
            .unwrap_or_default();
        RecipeWithIngredients {
            recipe: recipe.clone(),
            ingredients,
        }
    }

    /// Every recipe with its ingredients, in insertion order
    pub fn snapshot(&self) -> Vec<RecipeWithIngredients> {
        self.recipes.iter().map(|r| self.entry_for(r)).collect()
    }

    /// Replace a user's pantry; unknown ingredient ids are skipped
    pub fn set_pantry<I>(&mut self, user_id: UserId, ingredient_ids: I)
    where
        I: IntoIterator<Item = IngredientId>,
    {
        let mut pantry = HashSet::new();
        for id in ingredient_ids {
            if self.ingredient(id).is_some() {
                pantry.insert(id);
            } else {
                warn!("Skipping unknown ingredient {} for user {}", id, user_id);
            }
        }
        info!("Pantry for user {} set to {} ingredients", user_id, pantry.len());
        self.pantries.insert(user_id, pantry);
    }

    pub fn pantry(&self, user_id: UserId) -> HashSet<IngredientId> {
        self.pantries.get(&user_id).cloned().unwrap_or_default()
    }

    /// Pantry ingredients with names, ordered by name
    pub fn pantry_ingredients(&self, user_id: UserId) -> Vec<&CanonicalIngredient> {
        let mut owned: Vec<&CanonicalIngredient> = self
            .pantries
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.ingredient(id))
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        owned
    }

    pub fn recommend_for(&self, user_id: UserId) -> Vec<Recommendation> {
        let owned = self.pantry(user_id);
        if owned.is_empty() {
            return Vec::new();
        }
        recommend(&owned, &self.snapshot())
    }

    pub fn recipe_detail(&self, recipe_id: RecipeId, user_id: UserId) -> Option<RecipeDetail> {
        let entry = self.recipe_entry(recipe_id)?;
        let ingredients = build_ingredient_detail(&entry, &self.pantry(user_id));
        Some(RecipeDetail {
            recipe: entry.recipe,
            ingredients,
        })
    }
}

// Ingredient ids are assigned 1, 2, 3... in insertion order
fn index_of(id: IngredientId) -> Option<usize> {
    usize::try_from(id).ok()?.checked_sub(1)
}
