//! # Vocabulary Module
//!
//! Fixed word tables used by the ingredient normalizer and the category
//! classifier. The tables are plain static slices; a [`Vocabulary`] bundles
//! them so a normalizer can be built against an alternate set.

/// Descriptive phrases stripped from an ingredient line, applied in this
/// exact order. Entries are regex sources: `^` anchored prefixes, `$`
/// anchored suffixes, and two unanchored connectives at the end.
pub const DESCRIPTIVE_PHRASES: &[&str] = &[
    r"^a few\s+",
    r"^a small\s+",
    r"^a sprig\s+",
    r"^a pinch\s+",
    r"^a bunch\s+",
    r"^some\s+",
    r"^any\s+",
    r"^about\s+",
    r"^optional\s+",
    r"^additional\s+",
    r"^alternative\s+",
    r"^for the\s+",
    r"^for garnish\s+",
    r"^for frying\s+",
    r"^as required\s+",
    r"^as needed\s+",
    r"^soaked in\s+",
    r"^dissolved in\s+",
    r"^peeled and\s+",
    r"^washed and\s+",
    r"^roughly\s+",
    r"^finely\s+",
    r"^chopped\s+",
    r"^grated\s+",
    r"^minced\s+",
    r"^crushed\s+",
    r"^sliced\s+",
    r"^mashed\s+",
    r"^boiled\s+",
    r"^roasted\s+",
    r"^dried\s+",
    r"^fresh\s+",
    r"^and\s+",
    r"^or\s+",
    r"^with\s+",
    r"^into\s+",
    r"^to\s+",
    r"\s+chopped$",
    r"\s+peeled$",
    r"\s+grated$",
    r"\s+mashed$",
    r"\s+boiled$",
    r"\s+pieces$",
    r"\s+fillet$",
    r"\s+chunks$",
    r"\s+strips$",
    r"\s+garnish$",
    r"\bof\b",
    r"\band\b",
];

/// Measurement units and size/portion words, removed as whole words.
pub const JUNK_WORDS: &[&str] = &[
    "cup", "cups", "tablespoon", "tablespoons", "teaspoon", "teaspoons", "tbsp", "tsp", "gram",
    "grams", "kg", "ml", "litre", "liter", "strands", "sprigs", "size", "sized", "ball", "half",
    "quarter", "extra", "more", "divided", "pinch", "bunch", "drop", "bit", "leaf", "leaves",
];

/// Generic leftovers removed as plain substrings once the line is cleaned.
pub const JUNK_PHRASES: &[&str] = &[
    "a few",
    "a sprig",
    "a small",
    "a bit",
    "a drop",
    "as required",
    "to taste",
    "in addition to the potatoes",
    "following ingredients",
    "you could use the",
];

/// Everyday staples; a canonical name containing any of these lands in the
/// "Quick Kitchen" category.
pub const COMMON_INGREDIENTS: &[&str] = &[
    "onion",
    "potato",
    "tomato",
    "ginger",
    "garlic",
    "green chili",
    "coriander leaves",
    "cumin seeds",
    "mustard seeds",
    "turmeric powder",
    "red chili powder",
    "garam masala",
    "salt",
    "oil",
    "ghee",
    "atta",
    "flour",
    "rice",
    "dal",
    "milk",
    "curd",
    "paneer",
    "lemon",
    "sugar",
    "black pepper",
    "curry leaves",
    "hing",
];

/// The set of tables a normalizer and classifier are built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    /// Ordered descriptive-phrase patterns (regex sources)
    pub descriptive_phrases: &'static [&'static str],
    /// Whole-word junk tokens (literal words, escaped at compile time)
    pub junk_words: &'static [&'static str],
    /// Substring phrases dropped near the end of the pipeline
    pub junk_phrases: &'static [&'static str],
    /// Common-ingredient terms for category assignment
    pub common_ingredients: &'static [&'static str],
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            descriptive_phrases: DESCRIPTIVE_PHRASES,
            junk_words: JUNK_WORDS,
            junk_phrases: JUNK_PHRASES,
            common_ingredients: COMMON_INGREDIENTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_uses_static_tables() {
        let vocabulary = Vocabulary::default();
        assert_eq!(vocabulary.descriptive_phrases.len(), DESCRIPTIVE_PHRASES.len());
        assert_eq!(vocabulary.junk_words, JUNK_WORDS);
        assert!(vocabulary.common_ingredients.contains(&"salt"));
    }

    #[test]
    fn test_unit_spellings_listed_separately() {
        // Whole-word removal relies on every spelling being its own entry
        for word in ["tsp", "teaspoon", "teaspoons", "tbsp", "tablespoon", "tablespoons"] {
            assert!(JUNK_WORDS.contains(&word), "missing junk word {word}");
        }
    }

    #[test]
    fn test_connectives_are_last() {
        let tail = &DESCRIPTIVE_PHRASES[DESCRIPTIVE_PHRASES.len() - 2..];
        assert_eq!(tail, &[r"\bof\b", r"\band\b"]);
    }
}
