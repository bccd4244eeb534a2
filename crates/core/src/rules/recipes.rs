//! Recipe suggestions for items about to expire.
//!
//! Recipes come from a small built-in table. A recipe is a candidate when
//! one of its ingredients names an expiring item exactly (ignoring case);
//! candidates are then scored on how much of the recipe the expiring items
//! cover, how urgent those items are, the recipe's rating and popularity,
//! and how quick it is to make.

use chrono::{Days, NaiveDate};

use super::same_name;

/// Items expiring strictly before `today + URGENT_WITHIN_DAYS` are urgent.
pub const URGENT_WITHIN_DAYS: u64 = 3;

const URGENT_ITEM_BONUS: f64 = 15.0;
const MISSING_ALLOWANCE: usize = 5;
const MISSING_PENALTY: f64 = 2.0;
const POPULARITY_CAP: f64 = 10.0;

/// A recipe from the built-in table.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: &'static str,
    pub ingredients: &'static [&'static str],
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    /// Average rating out of 5, if the recipe has been rated.
    pub rating_average: Option<f64>,
    pub view_count: u32,
}

impl Recipe {
    #[must_use]
    pub const fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes + self.cook_time_minutes
    }
}

/// Recipes offered as suggestions.
pub const RECIPES: &[Recipe] = &[
    Recipe {
        name: "French Toast",
        ingredients: &["Bread", "Eggs", "Milk", "Cinnamon"],
        prep_time_minutes: 10,
        cook_time_minutes: 10,
        rating_average: Some(4.6),
        view_count: 1250,
    },
    Recipe {
        name: "Pancakes",
        ingredients: &["Flour", "Milk", "Eggs", "Butter", "Sugar"],
        prep_time_minutes: 10,
        cook_time_minutes: 15,
        rating_average: Some(4.4),
        view_count: 980,
    },
    Recipe {
        name: "Spinach Omelette",
        ingredients: &["Eggs", "Spinach", "Cheese", "Milk"],
        prep_time_minutes: 5,
        cook_time_minutes: 10,
        rating_average: Some(4.3),
        view_count: 610,
    },
    Recipe {
        name: "Yogurt Parfait",
        ingredients: &["Yogurt", "Granola", "Berries", "Honey"],
        prep_time_minutes: 5,
        cook_time_minutes: 0,
        rating_average: Some(4.2),
        view_count: 430,
    },
    Recipe {
        name: "Banana Smoothie",
        ingredients: &["Banana", "Milk", "Yogurt", "Honey"],
        prep_time_minutes: 5,
        cook_time_minutes: 0,
        rating_average: Some(4.0),
        view_count: 90,
    },
    Recipe {
        name: "Bread Pudding",
        ingredients: &[
            "Bread", "Milk", "Eggs", "Sugar", "Butter", "Vanilla", "Raisins",
        ],
        prep_time_minutes: 20,
        cook_time_minutes: 45,
        rating_average: Some(4.1),
        view_count: 220,
    },
    Recipe {
        name: "Chicken Stir Fry",
        ingredients: &[
            "Chicken", "Broccoli", "Carrots", "Soy Sauce", "Garlic", "Ginger", "Rice",
        ],
        prep_time_minutes: 15,
        cook_time_minutes: 15,
        rating_average: Some(4.5),
        view_count: 1500,
    },
    Recipe {
        name: "Vegetable Soup",
        ingredients: &[
            "Carrots", "Celery", "Onion", "Potatoes", "Tomatoes", "Garlic", "Stock", "Thyme",
            "Bay Leaf",
        ],
        prep_time_minutes: 20,
        cook_time_minutes: 40,
        rating_average: None,
        view_count: 150,
    },
];

/// An inventory item close to its expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiringIngredient<'a> {
    pub name: &'a str,
    pub expiration_date: NaiveDate,
}

/// A scored recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSuggestion<'r> {
    pub recipe: &'r Recipe,
    /// Never negative.
    pub score: f64,
    /// Recipe ingredients covered by an expiring item, in recipe order.
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    /// Share of the recipe's ingredients that matched, 0 to 100.
    pub match_percentage: f64,
    /// Urgent expiring items the recipe would use up.
    pub urgent_items_used: u32,
}

/// Rank `recipes` by how well they use up `expiring` items, best first.
///
/// An ingredient matches an item when either name contains the other
/// (ignoring case), so "Whole Milk" uses up "Milk". Each urgent item behind
/// a matched ingredient adds a bonus. Recipes with equal scores keep their
/// table order.
///
/// ```
/// use chrono::NaiveDate;
/// use freshkeep_core::rules::{ExpiringIngredient, RECIPES, suggest_recipes};
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
/// let expiring = [ExpiringIngredient {
///     name: "Spinach",
///     expiration_date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
/// }];
/// let suggestions = suggest_recipes(RECIPES, &expiring, today);
/// assert_eq!(suggestions[0].recipe.name, "Spinach Omelette");
/// assert_eq!(suggestions[0].urgent_items_used, 1);
/// ```
#[must_use]
pub fn suggest_recipes<'r>(
    recipes: &'r [Recipe],
    expiring: &[ExpiringIngredient<'_>],
    today: NaiveDate,
) -> Vec<RecipeSuggestion<'r>> {
    if expiring.is_empty() {
        return Vec::new();
    }

    let available: Vec<String> = expiring.iter().map(|item| item.name.to_lowercase()).collect();
    let urgent_before = today
        .checked_add_days(Days::new(URGENT_WITHIN_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let mut suggestions: Vec<RecipeSuggestion<'r>> = recipes
        .iter()
        .filter(|recipe| {
            recipe
                .ingredients
                .iter()
                .any(|ingredient| available.contains(&ingredient.to_lowercase()))
        })
        .map(|recipe| score_recipe(recipe, expiring, &available, urgent_before))
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions
}

fn score_recipe<'r>(
    recipe: &'r Recipe,
    expiring: &[ExpiringIngredient<'_>],
    available: &[String],
    urgent_before: NaiveDate,
) -> RecipeSuggestion<'r> {
    let mut score = 0.0;
    let mut matched_ingredients = Vec::new();
    let mut missing_ingredients = Vec::new();
    let mut urgent_items_used = 0;

    for &ingredient in recipe.ingredients {
        let normalized = ingredient.to_lowercase();
        let hit = available
            .iter()
            .find(|name| normalized.contains(name.as_str()) || name.contains(&normalized));

        let Some(hit) = hit else {
            missing_ingredients.push(ingredient.to_owned());
            continue;
        };
        matched_ingredients.push(ingredient.to_owned());

        for item in expiring {
            if same_name(item.name, hit) && item.expiration_date < urgent_before {
                urgent_items_used += 1;
                score += URGENT_ITEM_BONUS;
            }
        }
    }

    let match_percentage = percent(matched_ingredients.len(), recipe.ingredients.len());
    score += match_percentage;
    if match_percentage >= 80.0 {
        score += 20.0;
    } else if match_percentage >= 60.0 {
        score += 10.0;
    }

    if let Some(rating) = recipe.rating_average {
        score += rating * 5.0;
    }

    if recipe.view_count > 100 {
        score += (f64::from(recipe.view_count) / 100.0).min(POPULARITY_CAP);
    }

    if missing_ingredients.len() > MISSING_ALLOWANCE {
        score -= count(missing_ingredients.len() - MISSING_ALLOWANCE) * MISSING_PENALTY;
    }

    let total_time = recipe.total_time_minutes();
    if total_time <= 30 {
        score += 10.0;
    } else if total_time <= 60 {
        score += 5.0;
    }

    RecipeSuggestion {
        recipe,
        score: score.max(0.0),
        matched_ingredients,
        missing_ingredients,
        match_percentage,
        urgent_items_used,
    }
}

fn count(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    count(part) / count(whole) * 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn recipe(name: &'static str, ingredients: &'static [&'static str]) -> Recipe {
        Recipe {
            name,
            ingredients,
            prep_time_minutes: 60,
            cook_time_minutes: 60,
            rating_average: None,
            view_count: 0,
        }
    }

    fn expiring(name: &str, expiration_date: NaiveDate) -> ExpiringIngredient<'_> {
        ExpiringIngredient {
            name,
            expiration_date,
        }
    }

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    #[test]
    fn test_nothing_expiring_suggests_nothing() {
        assert!(suggest_recipes(RECIPES, &[], today()).is_empty());
    }

    #[test]
    fn test_score_components() {
        let recipes = [Recipe {
            prep_time_minutes: 10,
            cook_time_minutes: 15,
            rating_average: Some(4.0),
            view_count: 250,
            ..recipe("Crepes", &["Milk", "Eggs", "Flour", "Sugar"])
        }];
        let items = [
            expiring("Milk", date(2025, 6, 16)),
            expiring("Eggs", date(2025, 6, 20)),
        ];

        let suggestions = suggest_recipes(&recipes, &items, today());
        assert_eq!(suggestions.len(), 1);
        let crepes = &suggestions[0];

        assert_eq!(crepes.matched_ingredients, vec!["Milk", "Eggs"]);
        assert_eq!(crepes.missing_ingredients, vec!["Flour", "Sugar"]);
        assert!(approx(crepes.match_percentage, 50.0));
        assert_eq!(crepes.urgent_items_used, 1);
        // urgent 15 + match 50 + rating 20 + views 2.5 + quick 10
        assert!(approx(crepes.score, 97.5));
    }

    #[test]
    fn test_urgency_window_is_exclusive() {
        let recipes = [recipe("Custard", &["Milk", "Eggs"])];
        let items = [
            expiring("Milk", date(2025, 6, 17)),
            expiring("Eggs", date(2025, 6, 18)),
        ];

        let suggestion = &suggest_recipes(&recipes, &items, today())[0];
        assert_eq!(suggestion.urgent_items_used, 1);
        // urgent 15 + match 100 + high match 20
        assert!(approx(suggestion.score, 135.0));
    }

    #[test]
    fn test_every_urgent_item_with_the_name_counts() {
        let recipes = [recipe("Latte", &["Milk", "Coffee"])];
        let items = [
            expiring("Milk", date(2025, 6, 15)),
            expiring("milk", date(2025, 6, 16)),
        ];

        let suggestion = &suggest_recipes(&recipes, &items, today())[0];
        assert_eq!(suggestion.urgent_items_used, 2);
        assert!(approx(suggestion.score, 30.0 + 50.0));
    }

    #[test]
    fn test_match_bonus_tiers() {
        let recipes = [
            recipe("Four of five", &["Milk", "Eggs", "Butter", "Cheese", "Bread"]),
            recipe("Three of five", &["Milk", "Eggs", "Butter", "Flour", "Sugar"]),
        ];
        let later = date(2025, 6, 21);
        let items = [
            expiring("Milk", later),
            expiring("Eggs", later),
            expiring("Butter", later),
            expiring("Cheese", later),
        ];

        let suggestions = suggest_recipes(&recipes, &items, today());
        assert!(approx(suggestions[0].score, 80.0 + 20.0));
        assert!(approx(suggestions[1].score, 60.0 + 10.0));
    }

    #[test]
    fn test_missing_penalty_and_floor() {
        let recipes = [
            recipe(
                "Eight",
                &["Milk", "A1", "A2", "A3", "A4", "A5", "A6", "A7"],
            ),
            recipe(
                "Twelve",
                &[
                    "Milk", "B1", "B2", "B3", "B4", "B5", "B6", "B7", "B8", "B9", "B10", "B11",
                ],
            ),
        ];
        let items = [expiring("Milk", date(2025, 6, 30))];

        let suggestions = suggest_recipes(&recipes, &items, today());
        // 12.5 - (7 - 5) * 2
        assert!(approx(suggestions[0].score, 8.5));
        assert_eq!(suggestions[1].recipe.name, "Twelve");
        assert!(approx(suggestions[1].score, 0.0));
    }

    #[test]
    fn test_candidates_need_an_exactly_named_ingredient() {
        let recipes = [
            recipe("Only whole milk", &["Whole Milk"]),
            recipe("Eggs and whole milk", &["Eggs", "Whole Milk"]),
        ];
        let later = date(2025, 6, 30);
        let items = [expiring("milk", later), expiring("EGGS", later)];

        let suggestions = suggest_recipes(&recipes, &items, today());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].recipe.name, "Eggs and whole milk");
        assert_eq!(suggestions[0].matched_ingredients, vec!["Eggs", "Whole Milk"]);
        assert!(approx(suggestions[0].match_percentage, 100.0));
    }

    #[test]
    fn test_non_ascii_names_fold_case() {
        let recipes = [recipe("Dip", &["Crème Fraîche", "Chives"])];
        let items = [expiring("CRÈME FRAÎCHE", date(2025, 6, 16))];

        let suggestions = suggest_recipes(&recipes, &items, today());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].urgent_items_used, 1);
    }

    #[test]
    fn test_built_in_table_ranking() {
        let items = [
            expiring("Milk", date(2025, 6, 16)),
            expiring("Bread", date(2025, 6, 20)),
        ];

        let names: Vec<&str> = suggest_recipes(RECIPES, &items, today())
            .iter()
            .map(|s| s.recipe.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "French Toast",
                "Spinach Omelette",
                "Pancakes",
                "Banana Smoothie",
                "Bread Pudding"
            ]
        );
    }

    #[test]
    fn test_scores_are_sorted_descending() {
        let items = [expiring("Eggs", date(2025, 6, 15))];
        let suggestions = suggest_recipes(RECIPES, &items, today());
        assert!(!suggestions.is_empty());
        assert!(
            suggestions
                .windows(2)
                .all(|pair| pair[0].score >= pair[1].score)
        );
    }
}
