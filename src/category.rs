//! # Ingredient Category Module
//!
//! Coarse two-way split of canonical ingredients: everyday staples go to
//! "Quick Kitchen", everything else to "All".

use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::vocabulary::{Vocabulary, COMMON_INGREDIENTS};

/// Category attached to a canonical ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngredientCategory {
    /// Name contains a common-ingredient term
    #[serde(rename = "Quick Kitchen")]
    QuickKitchen,
    /// Everything else
    All,
}

impl IngredientCategory {
    /// Stored and serialized label
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::QuickKitchen => "Quick Kitchen",
            IngredientCategory::All => "All",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IngredientCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Quick Kitchen" => Ok(IngredientCategory::QuickKitchen),
            "All" => Ok(IngredientCategory::All),
            other => Err(format!("Unknown ingredient category: {other}")),
        }
    }
}

/// Substring classifier over a fixed common-ingredient vocabulary
#[derive(Debug, Clone, Copy)]
pub struct CategoryClassifier {
    common_ingredients: &'static [&'static str],
}

impl CategoryClassifier {
    pub fn new() -> Self {
        Self {
            common_ingredients: COMMON_INGREDIENTS,
        }
    }

    pub fn with_vocabulary(vocabulary: &Vocabulary) -> Self {
        Self {
            common_ingredients: vocabulary.common_ingredients,
        }
    }

    /// Classify an already-normalized name
    ///
    /// Plain containment, so "boiled potatoes" and "coconut oil" are both
    /// staples.
    pub fn classify(&self, name: &str) -> IngredientCategory {
        let category = if self.common_ingredients.iter().any(|term| name.contains(term)) {
            IngredientCategory::QuickKitchen
        } else {
            IngredientCategory::All
        };
        trace!("Classified '{}' as {}", name, category);
        category
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_terms_are_quick_kitchen() {
        let classifier = CategoryClassifier::new();
        assert_eq!(classifier.classify("onions"), IngredientCategory::QuickKitchen);
        assert_eq!(classifier.classify("basmati rice"), IngredientCategory::QuickKitchen);
        assert_eq!(classifier.classify("coconut oil"), IngredientCategory::QuickKitchen);
    }

    #[test]
    fn test_other_terms_are_all() {
        let classifier = CategoryClassifier::new();
        assert_eq!(classifier.classify("saffron"), IngredientCategory::All);
        assert_eq!(classifier.classify("cardamom"), IngredientCategory::All);
    }

    #[test]
    fn test_substituted_vocabulary() {
        let vocabulary = Vocabulary {
            common_ingredients: &["saffron"],
            ..Vocabulary::default()
        };
        let classifier = CategoryClassifier::with_vocabulary(&vocabulary);
        assert_eq!(classifier.classify("saffron"), IngredientCategory::QuickKitchen);
        assert_eq!(classifier.classify("onion"), IngredientCategory::All);
    }

    #[test]
    fn test_label_round_trip() {
        for category in [IngredientCategory::QuickKitchen, IngredientCategory::All] {
            assert_eq!(category.as_str().parse::<IngredientCategory>(), Ok(category));
        }
        assert!("Pantry".parse::<IngredientCategory>().is_err());
        assert_eq!(
            serde_json::to_string(&IngredientCategory::QuickKitchen).unwrap(),
            "\"Quick Kitchen\""
        );
    }
}
