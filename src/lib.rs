//! # Pantry Match
//!
//! Matches the ingredients a user has on hand against a recipe catalog.
//! Raw recipe ingredient lines are normalized into canonical names at
//! import time; recommendations rank recipes by the share of their
//! ingredients the user already owns.

pub mod catalog;
pub mod catalog_model;
pub mod category;
pub mod config;
pub mod db;
pub mod errors;
pub mod ingestion;
pub mod normalizer;
pub mod recommendation;
pub mod vocabulary;

// Re-export types for easier access
pub use catalog_model::{IngredientDetail, Recommendation, RecipeWithIngredients};
pub use normalizer::{normalize_ingredient, IngredientNormalizer};
pub use recommendation::{build_ingredient_detail, recommend};
