//! Recipe generation service.
//!
//! [`RecipeService`] turns a dish name into a [`Recipe`] with exactly one
//! backend request:
//!
//! 1. Build the chef prompt for the dish ([`build_prompt`])
//! 2. Send it with the fixed response schema ([`recipe_schema`])
//! 3. Strip markdown code fences from the answer ([`strip_code_fences`])
//! 4. Parse the remaining text as a recipe document
//!
//! There is no caching and no retry: the backend is not deterministic, so two
//! calls for the same dish may legitimately produce different recipes.
//!
//! # Example
//!
//! ```ignore
//! use ocra_core::generation::RecipeService;
//! use ocra_core::traits::RecipeGenerator;
//!
//! let service = RecipeService::new(gemini);
//! let recipe = service.generate_recipe("Spaghetti Carbonara").await?;
//! println!("{} serves {}", recipe.name, recipe.servings);
//! ```

use serde_json::{Value, json};

use crate::error::{AppError, GenerationError};
use crate::models::Recipe;
use crate::traits::{GenerativeBackend, RecipeGenerator};

/// Builds the natural-language instruction for a dish.
pub fn build_prompt(dish_name: &str) -> String {
    format!(
        "You are a world-class chef creating a recipe book. \
         Generate a clear, concise, and easy-to-follow recipe for \"{dish_name}\". \
         Include a short enticing description, preparation time, cooking time and servings. \
         List every ingredient with its quantity in both imperial and metric units. \
         Give step-by-step instructions, one step per entry, in cooking order. \
         Add a few chef's tips and approximate per-serving nutritional information \
         (calories, protein, fat, carbs) when they are useful. \
         Ensure the response strictly follows the provided JSON schema."
    )
}

/// Returns the response schema sent with every request.
///
/// Uses the OpenAPI subset understood by Gemini's `responseSchema`.
pub fn recipe_schema() -> Value {
    let text = |description: &str| json!({ "type": "STRING", "description": description });

    json!({
        "type": "OBJECT",
        "properties": {
            "name": text("The name of the dish."),
            "description": text("A brief, enticing description of the dish."),
            "prepTime": text("Preparation time, e.g., '15 minutes'."),
            "cookTime": text("Cooking time, e.g., '30 minutes'."),
            "servings": text("Number of servings, e.g., '4 servings'."),
            "ingredients": {
                "type": "ARRAY",
                "description": "All ingredients with quantities in both unit systems.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": text("Ingredient name, e.g., 'all-purpose flour'."),
                        "imperial": text("Quantity in imperial/US units, e.g., '2 cups'."),
                        "metric": text("Quantity in metric units, e.g., '250 g'.")
                    },
                    "required": ["name", "imperial", "metric"]
                }
            },
            "instructions": {
                "type": "ARRAY",
                "description": "Step-by-step instructions for preparing the dish.",
                "items": { "type": "STRING" }
            },
            "tips": {
                "type": "ARRAY",
                "description": "Optional tips, variations, or storage advice.",
                "items": { "type": "STRING" }
            },
            "nutritionalInfo": {
                "type": "OBJECT",
                "description": "Approximate nutrition per serving.",
                "properties": {
                    "calories": text("e.g., '450 kcal'."),
                    "protein": text("e.g., '20 g'."),
                    "fat": text("e.g., '15 g'."),
                    "carbs": text("e.g., '55 g'.")
                }
            }
        },
        "required": [
            "name",
            "description",
            "prepTime",
            "cookTime",
            "servings",
            "ingredients",
            "instructions"
        ]
    })
}

/// Removes a surrounding markdown code fence, if any.
///
/// Handles ```` ```json ```` (or any language tag) and bare ```` ``` ````
/// fences. Text without a fence is only trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag on the opening line.
    let body = match rest.find('\n') {
        Some(idx) if rest[..idx].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[idx + 1..]
        }
        _ => strip_inline_tag(rest),
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Drops a language tag glued to the JSON body, as in ```` ```json{...} ````.
fn strip_inline_tag(rest: &str) -> &str {
    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    match rest[tag_len..].chars().next() {
        Some('{' | '[') if tag_len > 0 => &rest[tag_len..],
        _ => rest,
    }
}

/// Parses backend text into a recipe after fence stripping.
pub fn parse_recipe(text: &str) -> Result<Recipe, AppError> {
    let cleaned = strip_code_fences(text);
    Ok(serde_json::from_str(cleaned)?)
}

/// Service that generates recipes through a [`GenerativeBackend`].
///
/// # Type Parameters
///
/// * `B` - Backend implementation (e.g., `GeminiClient`)
#[derive(Clone)]
pub struct RecipeService<B>
where
    B: GenerativeBackend,
{
    backend: B,
    schema: Value,
}

impl<B> RecipeService<B>
where
    B: GenerativeBackend,
{
    /// Creates a service that sends the standard recipe schema.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            schema: recipe_schema(),
        }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn request(&self, dish_name: &str) -> Result<Recipe, AppError> {
        let prompt = build_prompt(dish_name);
        let text = self.backend.generate_json(&prompt, &self.schema).await?;
        tracing::debug!(
            backend = self.backend.name(),
            bytes = text.len(),
            "Received backend answer"
        );
        parse_recipe(&text)
    }
}

impl<B> RecipeGenerator for RecipeService<B>
where
    B: GenerativeBackend,
{
    async fn generate_recipe(&self, dish_name: &str) -> Result<Recipe, GenerationError> {
        tracing::info!(
            backend = self.backend.name(),
            dish = dish_name,
            "Generating recipe"
        );

        match self.request(dish_name).await {
            Ok(recipe) => Ok(recipe),
            Err(e) => {
                tracing::error!(dish = dish_name, error = %e, "Error generating recipe");
                Err(e.into())
            }
        }
    }
}
