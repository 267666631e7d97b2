//! Text renderings of a recipe.
//!
//! Two formats exist: the plain text placed on the clipboard by "copy", and
//! the printable markdown page. Both take the unit system the user selected
//! for the recipe; optional sections only appear when the recipe has them.

use std::fmt::Write;

use crate::models::Recipe;
use crate::view::{RecipeView, UnitSystem};

/// Renders the clipboard text of a recipe.
///
/// ```text
/// Recipe: Toast
/// Crisp bread.
///
/// Prep Time: 2 min
/// Cook Time: 1 min
/// Servings: 1
///
/// Ingredients:
/// 1 slice Bread
///
/// Instructions:
/// 1. Toast it.
/// ```
///
/// A `Tips:` block follows when the recipe has tips.
pub fn render_plain_text(recipe: &Recipe, units: UnitSystem) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Recipe: {}", recipe.name);
    let _ = writeln!(out, "{}", recipe.description);
    out.push('\n');
    let _ = writeln!(out, "Prep Time: {}", recipe.prep_time);
    let _ = writeln!(out, "Cook Time: {}", recipe.cook_time);
    let _ = writeln!(out, "Servings: {}", recipe.servings);
    out.push('\n');

    out.push_str("Ingredients:\n");
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "{}", ingredient.display(units));
    }
    out.push('\n');

    out.push_str("Instructions:\n");
    for (index, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", index + 1, step);
    }

    if recipe.has_tips() {
        out.push_str("\nTips:\n");
        for tip in recipe.tips() {
            let _ = writeln!(out, "{}", tip);
        }
    }

    out.trim().to_string()
}

/// Renders the printable page as markdown.
pub fn render_page(recipe: &Recipe, units: UnitSystem) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", recipe.name);
    if !recipe.description.is_empty() {
        let _ = writeln!(out, "{}\n", recipe.description);
    }

    let timing: Vec<String> = [
        ("Prep", &recipe.prep_time),
        ("Cook", &recipe.cook_time),
        ("Serves", &recipe.servings),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("**{}:** {}", label, value))
    .collect();
    if !timing.is_empty() {
        let _ = writeln!(out, "{}\n", timing.join(" | "));
    }

    let _ = writeln!(out, "## Ingredients ({})\n", units);
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "- {}", ingredient.display(units));
    }
    out.push('\n');

    out.push_str("## Instructions\n\n");
    for (index, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", index + 1, step);
    }

    if recipe.has_tips() {
        out.push_str("\n## Chef's Tips\n\n");
        for tip in recipe.tips() {
            let _ = writeln!(out, "- {}", tip);
        }
    }

    if let Some(nutrition) = recipe.nutrition() {
        out.push_str("\n## Nutrition (per serving)\n\n");
        for (label, value) in nutrition.entries() {
            let _ = writeln!(out, "- {}: {}", label, value);
        }
    }

    if let Some(image) = recipe.image_url.as_deref().filter(|u| !u.is_empty()) {
        let _ = write!(out, "\n![{}]({})\n", recipe.name, image);
    }

    out.trim_end().to_string()
}

/// One-line summary of the user's view of a recipe, e.g.
/// `metric | ★★★★☆ | saved`.
pub fn render_status_line(view: RecipeView, saved: bool) -> String {
    let rating = view
        .rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unrated".to_string());
    let saved = if saved { "saved" } else { "not saved" };
    format!("{} | {} | {}", view.units, rating, saved)
}
