//! # Ingredient Normalizer
//!
//! Reduces a free-form recipe ingredient line ("2 cups finely chopped onions
//! (washed)") to a canonical ingredient name ("onions") usable as a join key
//! between recipes and pantries.
//!
//! ## Pipeline
//!
//! Every call runs the same fixed sequence of rewrites:
//!
//! 1. lowercase and trim
//! 2. drop parenthetical asides, innermost first
//! 3. descriptive-phrase rules, one ordered pass
//! 4. leading quantity (`2`, `1.5`, `2-3`, `1/2`)
//! 5. whole-word junk words (units, portion words)
//! 6. anything but `a-z` and whitespace becomes a space
//! 7. whitespace collapse
//! 8. descriptive-phrase rules again, one ordered pass over what the
//!    quantity and unit were hiding
//! 9. generic junk phrases ("to taste", ...) removed as substrings
//! 10. reject empty, numeric, or shorter than three characters
//!
//! Neither the descriptive pass nor the pipeline as a whole is iterated to a
//! fixpoint, so a line such as "fresh chopped finely onion" keeps a residual
//! "finely".
//!
//! ## Usage
//!
//! ```rust
//! use pantry_match::normalizer::IngredientNormalizer;
//!
//! let normalizer = IngredientNormalizer::new()?;
//! assert_eq!(normalizer.normalize("a pinch of salt"), Some("salt".to_string()));
//! assert_eq!(normalizer.normalize("123"), None);
//! # Ok::<(), regex::Error>(())
//! ```

use lazy_static::lazy_static;
use log::{debug, info, trace};
use regex::Regex;

use crate::vocabulary::Vocabulary;

/// Minimum number of characters a canonical name must have
pub const MIN_NAME_LENGTH: usize = 3;

const QUANTITY_PATTERN: &str = r"^(\d+/\d+|\d+-\d+|\d+\.\d+|\d+)\s*";

lazy_static! {
    static ref PARENTHETICAL: Regex =
        Regex::new(r"\([^()]*\)").expect("Parenthetical pattern should be valid");
    static ref NON_ALPHA: Regex =
        Regex::new(r"[^a-z\s]").expect("Character filter pattern should be valid");
    static ref WHITESPACE_RUN: Regex =
        Regex::new(r"\s+").expect("Whitespace pattern should be valid");
    static ref DEFAULT_NORMALIZER: IngredientNormalizer =
        IngredientNormalizer::new().expect("Default vocabulary should compile");
}

/// One compiled removal pattern; the result is trimmed after every application.
#[derive(Debug, Clone)]
struct RewriteRule {
    pattern: Regex,
}

impl RewriteRule {
    fn compile(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(source)?,
        })
    }

    fn whole_word(word: &str) -> Result<Self, regex::Error> {
        Self::compile(&format!(r"\b{}\b", regex::escape(word)))
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, "").trim().to_string()
    }
}

/// Rule-based ingredient line normalizer
#[derive(Debug, Clone)]
pub struct IngredientNormalizer {
    descriptive_rules: Vec<RewriteRule>,
    quantity_rule: Regex,
    junk_word_rules: Vec<RewriteRule>,
    junk_phrases: &'static [&'static str],
}

impl IngredientNormalizer {
    /// Build a normalizer over the default vocabulary tables
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_vocabulary(&Vocabulary::default())
    }

    /// Build a normalizer over an alternate set of tables
    ///
    /// Descriptive phrases are regex sources and may fail to compile; junk
    /// words are escaped literals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pantry_match::normalizer::IngredientNormalizer;
    /// use pantry_match::vocabulary::Vocabulary;
    ///
    /// let vocabulary = Vocabulary {
    ///     descriptive_phrases: &[r"^diced\s+"],
    ///     junk_words: &["can"],
    ///     junk_phrases: &[],
    ///     common_ingredients: &["tomato"],
    /// };
    /// let normalizer = IngredientNormalizer::with_vocabulary(&vocabulary)?;
    /// assert_eq!(normalizer.normalize("2 can diced tomatoes"), Some("tomatoes".to_string()));
    /// # Ok::<(), regex::Error>(())
    /// ```
    pub fn with_vocabulary(vocabulary: &Vocabulary) -> Result<Self, regex::Error> {
        let descriptive_rules = vocabulary
            .descriptive_phrases
            .iter()
            .map(|source| RewriteRule::compile(source))
            .collect::<Result<Vec<_>, _>>()?;
        let junk_word_rules = vocabulary
            .junk_words
            .iter()
            .map(|word| RewriteRule::whole_word(word))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Creating IngredientNormalizer: {} descriptive rules, {} junk words, {} phrases",
            descriptive_rules.len(),
            junk_word_rules.len(),
            vocabulary.junk_phrases.len()
        );

        Ok(Self {
            descriptive_rules,
            quantity_rule: Regex::new(QUANTITY_PATTERN)?,
            junk_word_rules,
            junk_phrases: vocabulary.junk_phrases,
        })
    }

    /// Normalize one raw ingredient line
    ///
    /// Returns `None` when nothing usable survives; callers drop the token
    /// instead of creating or linking an ingredient.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let mut text = raw.to_lowercase().trim().to_string();

        text = strip_parentheticals(&text);
        text = self.strip_descriptive_phrases(text);

        text = self.quantity_rule.replace(&text, "").to_string();
        for rule in &self.junk_word_rules {
            text = rule.apply(&text);
        }

        text = NON_ALPHA.replace_all(&text, " ").to_string();
        text = collapse_whitespace(&text);
        text = self.strip_descriptive_phrases(text);

        for phrase in self.junk_phrases {
            if text.contains(phrase) {
                text = text.replace(phrase, "").trim().to_string();
            }
        }
        text = collapse_whitespace(&text);

        if is_rejected(&text) {
            debug!("Rejected ingredient line '{}' (left '{}')", raw, text);
            return None;
        }

        trace!("Normalized ingredient line '{}' -> '{}'", raw, text);
        Some(text)
    }

    fn strip_descriptive_phrases(&self, mut text: String) -> String {
        for rule in &self.descriptive_rules {
            text = rule.apply(&text);
        }
        text
    }
}

impl Default for IngredientNormalizer {
    fn default() -> Self {
        Self::new().expect("Default vocabulary should compile")
    }
}

/// Normalize with the lazily compiled default vocabulary
pub fn normalize_ingredient(raw: &str) -> Option<String> {
    DEFAULT_NORMALIZER.normalize(raw)
}

fn strip_parentheticals(text: &str) -> String {
    let mut current = text.to_string();
    while PARENTHETICAL.is_match(&current) {
        current = PARENTHETICAL.replace_all(&current, "").to_string();
    }
    current.trim().to_string()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

fn is_rejected(text: &str) -> bool {
    text.is_empty()
        || text.chars().all(|c| c.is_ascii_digit())
        || text.chars().count() < MIN_NAME_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_normalizer() -> IngredientNormalizer {
        IngredientNormalizer::new().unwrap()
    }

    #[test]
    fn test_full_line_reduces_to_name() {
        let normalizer = create_normalizer();
        assert_eq!(
            normalizer.normalize("2 cups finely chopped onions (washed)"),
            Some("onions".to_string())
        );
    }

    #[test]
    fn test_pinch_of_salt() {
        let normalizer = create_normalizer();
        assert_eq!(normalizer.normalize("a pinch of salt"), Some("salt".to_string()));
        assert_eq!(normalizer.normalize("A Pinch of Salt"), Some("salt".to_string()));
    }

    #[test]
    fn test_rejects_numeric_and_short() {
        let normalizer = create_normalizer();
        assert_eq!(normalizer.normalize("123"), None);
        assert_eq!(normalizer.normalize("a"), None);
        assert_eq!(normalizer.normalize(""), None);
        assert_eq!(normalizer.normalize("   "), None);
        assert_eq!(normalizer.normalize("10 g"), None);
        assert_eq!(normalizer.normalize("1 cup"), None);
    }

    #[test]
    fn test_quantity_forms() {
        let normalizer = create_normalizer();
        assert_eq!(
            normalizer.normalize("1/2 tsp turmeric powder"),
            Some("turmeric powder".to_string())
        );
        assert_eq!(normalizer.normalize("1.5 kg chicken"), Some("chicken".to_string()));
        assert_eq!(
            normalizer.normalize("2-3 green chillies"),
            Some("green chillies".to_string())
        );
        assert_eq!(normalizer.normalize("4 potatoes"), Some("potatoes".to_string()));
    }

    #[test]
    fn test_junk_words_respect_word_boundaries() {
        let normalizer = create_normalizer();
        assert_eq!(normalizer.normalize("3 teaspoons sugar"), Some("sugar".to_string()));
        assert_eq!(normalizer.normalize("2 cupcakes"), Some("cupcakes".to_string()));
        assert_eq!(normalizer.normalize("bitter gourd"), Some("bitter gourd".to_string()));
    }

    #[test]
    fn test_nested_parentheticals_removed() {
        let normalizer = create_normalizer();
        assert_eq!(normalizer.normalize("rice (basmati (aged))"), Some("rice".to_string()));
    }

    #[test]
    fn test_prefix_and_suffix_phrases() {
        let normalizer = create_normalizer();
        assert_eq!(
            normalizer.normalize("fresh coriander chopped"),
            Some("coriander".to_string())
        );
        assert_eq!(normalizer.normalize("a few sprigs of mint"), Some("mint".to_string()));
        assert_eq!(
            normalizer.normalize("cream of mushroom soup"),
            Some("cream mushroom soup".to_string())
        );
    }

    #[test]
    fn test_single_pass_leaves_residue() {
        let normalizer = create_normalizer();
        assert_eq!(
            normalizer.normalize("fresh chopped finely onion"),
            Some("finely onion".to_string())
        );
    }

    #[test]
    fn test_junk_phrases_removed() {
        let normalizer = create_normalizer();
        assert_eq!(normalizer.normalize("salt to taste"), Some("salt".to_string()));
        assert_eq!(normalizer.normalize("as required"), None);
    }

    #[test]
    fn test_whitespace_collapsed() {
        let normalizer = create_normalizer();
        assert_eq!(
            normalizer.normalize("  Garam   Masala  "),
            Some("garam masala".to_string())
        );
    }

    #[test]
    fn test_idempotent_on_output() {
        let normalizer = create_normalizer();
        let lines = [
            "2 cups finely chopped onions (washed)",
            "a pinch of salt",
            "1/2 tsp turmeric powder",
            "cream of mushroom soup",
            "salt to taste",
            "a few sprigs of mint",
            "  Garam   Masala  ",
        ];
        for line in lines {
            let once = normalizer.normalize(line).unwrap();
            assert_eq!(normalizer.normalize(&once), Some(once.clone()), "line: {line}");
        }
    }

    #[test]
    fn test_invalid_descriptive_pattern() {
        let vocabulary = Vocabulary {
            descriptive_phrases: &[r"(unclosed"],
            ..Vocabulary::default()
        };
        assert!(IngredientNormalizer::with_vocabulary(&vocabulary).is_err());
    }

    #[test]
    fn test_default_instance_matches_new() {
        assert_eq!(normalize_ingredient("a pinch of salt"), Some("salt".to_string()));
    }
}
