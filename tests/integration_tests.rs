//! # Integration Tests
//!
//! End-to-end checks: dataset rows are prepared, stored in the in-memory
//! catalog, and scored against user pantries.

use std::collections::HashSet;

use pantry_match::catalog::MemoryCatalog;
use pantry_match::catalog_model::{CatalogIngredient, Recipe, RecipeWithIngredients};
use pantry_match::category::IngredientCategory;
use pantry_match::ingestion::{DatasetRow, RecipePreparer};
use pantry_match::recommendation::{build_ingredient_detail, recommend};

fn row(title: &str, ingredients: &str) -> DatasetRow {
    DatasetRow {
        name: Some(title.to_string()),
        ingredients: Some(ingredients.to_string()),
        diet: Some("Vegetarian".to_string()),
        course: Some("Lunch".to_string()),
        ..Default::default()
    }
}

fn build_catalog() -> MemoryCatalog {
    let preparer = RecipePreparer::new().unwrap();
    let mut catalog = MemoryCatalog::new();
    let rows = [
        row(
            "Jeera Aloo",
            "4 potatoes (boiled), 1 teaspoon cumin seeds, salt to taste, 2 tablespoons oil",
        ),
        row("Tomato Rice", "1 cup rice, 2 tomatoes, 1 onion, salt"),
        row("Masala Chai", "2 cups milk, 1 inch ginger, 2 teaspoons sugar, tea leaves"),
        row("Plain Rice", "1 cup rice\nsalt"),
        row("Mystery", "as required, 2, (optional)"),
    ];
    for dataset_row in &rows {
        catalog.store_prepared(&preparer.prepare(dataset_row));
    }
    catalog
}

fn id_of(catalog: &MemoryCatalog, name: &str) -> i64 {
    catalog
        .ingredient_by_name(name)
        .unwrap_or_else(|| panic!("ingredient {name} missing"))
        .id
}

#[test]
fn test_ingestion_builds_shared_catalog() {
    let catalog = build_catalog();

    assert_eq!(catalog.recipe_count(), 5);
    for name in ["potatoes", "cumin seeds", "salt", "oil", "rice", "tomatoes", "onion"] {
        assert!(catalog.ingredient_by_name(name).is_some(), "missing {name}");
    }
    assert_eq!(
        catalog.ingredient_by_name("salt").map(|i| i.category),
        Some(IngredientCategory::QuickKitchen)
    );

    let snapshot = catalog.snapshot();
    let mystery = snapshot.iter().find(|e| e.recipe.title == "Mystery").unwrap();
    assert!(mystery.ingredients.is_empty());
    assert!(snapshot.iter().all(|e| e.recipe.is_vegetarian));
}

#[test]
fn test_recommendations_for_pantry() {
    let mut catalog = build_catalog();
    let pantry = [id_of(&catalog, "rice"), id_of(&catalog, "salt")];
    catalog.set_pantry(1, pantry);

    let results = catalog.recommend_for(1);
    let titles: Vec<&str> = results.iter().map(|r| r.recipe.title.as_str()).collect();

    assert_eq!(titles[0], "Plain Rice");
    assert_eq!(results[0].match_score, 100.0);
    assert_eq!(titles[1], "Tomato Rice");
    assert_eq!(results[1].match_score, 50.0);
    assert_eq!(results[1].missing_ingredients, vec!["tomatoes", "onion"]);
    assert_eq!(results[2].recipe.title, "Jeera Aloo");
    assert_eq!(results[2].match_score, 25.0);
    assert_eq!(results[2].missing_count, 3);
    assert_eq!(results.len(), 5);

    for recommendation in &results {
        assert!((0.0..=100.0).contains(&recommendation.match_score));
    }
}

#[test]
fn test_empty_pantry_has_no_recommendations() {
    let catalog = build_catalog();
    assert!(catalog.recommend_for(42).is_empty());
    assert!(recommend(&HashSet::new(), &catalog.snapshot()).is_empty());
}

#[test]
fn test_recipe_detail_orders_owned_first() {
    let mut catalog = build_catalog();
    let onion = id_of(&catalog, "onion");
    catalog.set_pantry(3, [onion]);

    let tomato_rice = catalog
        .snapshot()
        .into_iter()
        .find(|e| e.recipe.title == "Tomato Rice")
        .unwrap();
    let detail = catalog.recipe_detail(tomato_rice.recipe.id, 3).unwrap();
    let view: Vec<(&str, bool)> = detail
        .ingredients
        .iter()
        .map(|d| (d.name.as_str(), d.matched))
        .collect();

    assert_eq!(
        view,
        vec![
            ("onion", true),
            ("rice", false),
            ("tomatoes", false),
            ("salt", false)
        ]
    );
}

#[test]
fn test_scenario_from_catalog_snapshot() {
    let catalog = vec![RecipeWithIngredients::new(Recipe::new(1, "R"))
        .with_ingredient(CatalogIngredient::new(1, "onion"))
        .with_ingredient(CatalogIngredient::new(2, "tomato"))
        .with_ingredient(CatalogIngredient::new(3, "salt"))];
    let owned: HashSet<i64> = [1, 2].into_iter().collect();

    let results = recommend(&owned, &catalog);
    assert_eq!(results[0].match_score, 66.67);
    assert_eq!(results[0].missing_count, 1);
    assert_eq!(results[0].missing_ingredients, vec!["salt".to_string()]);

    let detail = build_ingredient_detail(&catalog[0], &owned);
    assert_eq!(detail.iter().filter(|d| d.matched).count(), 2);
    assert!(!detail[2].matched);
}

#[test]
fn test_result_length_bounded_by_catalog_and_cap() {
    let preparer = RecipePreparer::new().unwrap();
    let mut catalog = MemoryCatalog::new();
    for i in 0..25 {
        catalog.store_prepared(&preparer.prepare(&row(&format!("Dal {i}"), "1 cup dal, ghee")));
    }
    let dal = id_of(&catalog, "dal");
    catalog.set_pantry(1, [dal]);

    let results = catalog.recommend_for(1);
    assert_eq!(results.len(), 20);
    let titles: Vec<String> = results.iter().map(|r| r.recipe.title.clone()).collect();
    let expected: Vec<String> = (0..20).map(|i| format!("Dal {i}")).collect();
    assert_eq!(titles, expected);
}

#[test]
fn test_recommendation_wire_shape() {
    let mut catalog = build_catalog();
    let rice = id_of(&catalog, "rice");
    catalog.set_pantry(1, [rice]);

    let json = catalog.recommend_for(1)[0].to_json();
    for field in [
        "id",
        "title",
        "image_url",
        "is_vegetarian",
        "category",
        "match_score",
        "missing_count",
        "missing_ingredients",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
    assert_eq!(json["category"], "Lunch");
}
