//! # Recipe Ingestion
//!
//! Turns dataset rows into recipes ready for storage: recipe fields are
//! picked with fallbacks, the raw ingredient field is split into tokens, and
//! every token goes through the normalizer and category classifier. Storage
//! itself lives in [`crate::catalog`] and [`crate::db`].
//!
//! ## Usage
//!
//! ```rust
//! use pantry_match::ingestion::{DatasetRow, RecipePreparer};
//!
//! let row = DatasetRow {
//!     name: Some("Jeera Aloo".to_string()),
//!     ingredients: Some("3 potatoes, 1 tsp cumin seeds, salt to taste".to_string()),
//!     ..Default::default()
//! };
//! let prepared = RecipePreparer::new()?.prepare(&row);
//! assert_eq!(prepared.ingredient_names(), vec!["potatoes", "cumin seeds", "salt"]);
//! # Ok::<(), regex::Error>(())
//! ```

use csv::ReaderBuilder;
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use crate::catalog_model::{Recipe, RecipeId};
use crate::category::{CategoryClassifier, IngredientCategory};
use crate::errors::PantryError;
use crate::normalizer::IngredientNormalizer;
use crate::vocabulary::Vocabulary;

pub const DEFAULT_TITLE: &str = "Unknown Recipe";
pub const DEFAULT_INSTRUCTIONS: &str = "No instructions provided.";
pub const DEFAULT_COURSE: &str = "Main Course";

/// One dataset row
///
/// Two column layouts exist in the wild (`name`/`course`/`ingredients` and
/// `Title`/`Category`/`Ingredients`), sometimes both in one file. Each
/// spelling gets its own field; the lowercase one wins when both are set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DatasetRow {
    pub name: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    pub instructions: Option<String>,
    #[serde(rename = "Instructions")]
    pub instructions_alt: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "Image_Name")]
    pub image_name: Option<String>,
    pub course: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    pub diet: Option<String>,
    pub prep_time: Option<String>,
    pub cuisine: Option<String>,
    pub ingredients: Option<String>,
    #[serde(rename = "Ingredients")]
    pub ingredients_alt: Option<String>,
}

impl DatasetRow {
    pub fn recipe_name(&self) -> Option<&str> {
        preferred(&self.name, &self.title)
    }

    pub fn recipe_instructions(&self) -> Option<&str> {
        preferred(&self.instructions, &self.instructions_alt)
    }

    pub fn recipe_image(&self) -> Option<&str> {
        preferred(&self.image_url, &self.image_name)
    }

    pub fn recipe_course(&self) -> Option<&str> {
        preferred(&self.course, &self.category)
    }

    /// The raw comma/newline separated ingredient field
    pub fn raw_ingredients(&self) -> Option<&str> {
        preferred(&self.ingredients, &self.ingredients_alt)
    }
}

fn preferred<'a>(primary: &'a Option<String>, fallback: &'a Option<String>) -> Option<&'a str> {
    primary.as_deref().or(fallback.as_deref())
}

/// Recipe fields before the store assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub instructions: String,
    pub image_url: String,
    pub category: String,
    pub is_vegetarian: bool,
    pub prep_time: String,
    pub cuisine: String,
}

impl NewRecipe {
    pub fn from_row(row: &DatasetRow) -> Self {
        Self {
            title: field_or(row.recipe_name(), DEFAULT_TITLE),
            instructions: field_or(row.recipe_instructions(), DEFAULT_INSTRUCTIONS),
            image_url: field_or(row.recipe_image(), ""),
            category: field_or(row.recipe_course(), DEFAULT_COURSE),
            is_vegetarian: row
                .diet
                .as_deref()
                .map(|diet| diet.to_lowercase().contains("vegetarian"))
                .unwrap_or(false),
            prep_time: field_or(row.prep_time.as_deref(), ""),
            cuisine: field_or(row.cuisine.as_deref(), ""),
        }
    }

    pub fn into_recipe(self, id: RecipeId) -> Recipe {
        Recipe {
            id,
            title: self.title,
            instructions: self.instructions,
            image_url: self.image_url,
            category: self.category,
            is_vegetarian: self.is_vegetarian,
            prep_time: self.prep_time,
            cuisine: self.cuisine,
        }
    }
}

fn field_or(value: Option<&str>, fallback: &str) -> String {
    value.unwrap_or(fallback).to_string()
}

/// A normalized ingredient token with its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedIngredient {
    pub name: String,
    pub category: IngredientCategory,
}

/// A recipe ready to store: metadata plus distinct canonical ingredients in
/// first-seen order
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecipe {
    pub recipe: NewRecipe,
    pub ingredients: Vec<PreparedIngredient>,
    /// Tokens the normalizer rejected
    pub rejected_tokens: usize,
}

impl PreparedRecipe {
    pub fn ingredient_names(&self) -> Vec<&str> {
        self.ingredients.iter().map(|i| i.name.as_str()).collect()
    }
}

/// Split a raw ingredient field on commas and newlines, dropping blanks
pub fn split_ingredient_field(raw: &str) -> Vec<&str> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Normalizer and classifier bound together for ingestion
#[derive(Debug, Clone)]
pub struct RecipePreparer {
    normalizer: IngredientNormalizer,
    classifier: CategoryClassifier,
}

impl RecipePreparer {
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_vocabulary(&Vocabulary::default())
    }

    pub fn with_vocabulary(vocabulary: &Vocabulary) -> Result<Self, regex::Error> {
        Ok(Self {
            normalizer: IngredientNormalizer::with_vocabulary(vocabulary)?,
            classifier: CategoryClassifier::with_vocabulary(vocabulary),
        })
    }

    /// Normalize and classify a single token
    pub fn prepare_token(&self, token: &str) -> Option<PreparedIngredient> {
        let name = self.normalizer.normalize(token)?;
        let category = self.classifier.classify(&name);
        Some(PreparedIngredient { name, category })
    }

    pub fn prepare(&self, row: &DatasetRow) -> PreparedRecipe {
        let recipe = NewRecipe::from_row(row);
        let mut ingredients = Vec::new();
        let mut seen = HashSet::new();
        let mut rejected_tokens = 0;

        let tokens = row
            .raw_ingredients()
            .map(split_ingredient_field)
            .unwrap_or_default();

        for token in tokens {
            match self.prepare_token(token) {
                Some(ingredient) => {
                    if seen.insert(ingredient.name.clone()) {
                        ingredients.push(ingredient);
                    }
                }
                None => rejected_tokens += 1,
            }
        }

        debug!(
            "Prepared recipe '{}': {} ingredients, {} rejected tokens",
            recipe.title,
            ingredients.len(),
            rejected_tokens
        );

        PreparedRecipe {
            recipe,
            ingredients,
            rejected_tokens,
        }
    }
}

/// Running totals for an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub recipes: usize,
    pub ingredient_links: usize,
    pub rejected_tokens: usize,
    pub recipes_without_ingredients: usize,
}

impl ImportStats {
    pub fn record(&mut self, prepared: &PreparedRecipe) {
        self.recipes += 1;
        self.ingredient_links += prepared.ingredients.len();
        self.rejected_tokens += prepared.rejected_tokens;
        if prepared.ingredients.is_empty() {
            self.recipes_without_ingredients += 1;
        }
    }
}

/// Read every row of a dataset CSV file
pub fn read_dataset(path: &Path) -> Result<Vec<DatasetRow>, PantryError> {
    if !path.exists() {
        return Err(PantryError::Dataset(format!(
            "{} not found, place the dataset CSV there or set DATASET_PATH",
            path.display()
        )));
    }

    info!("Reading dataset from {}", path.display());
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut rows = Vec::new();
    for (row_index, result) in reader.deserialize::<DatasetRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("Skipping dataset row {}: {}", row_index, e);
            }
        }
    }

    info!("Read {} dataset rows", rows.len());
    Ok(rows)
}
