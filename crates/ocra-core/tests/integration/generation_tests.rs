//! Integration tests for RecipeService.

use crate::integration::common::{Answer, MockBackend, recipe_json};
use ocra_core::error::GeminiErrorKind;
use ocra_core::traits::RecipeGenerator;
use ocra_core::{GenerationError, RecipeService, UnitSystem};

const TOAST: &str = r#"{"name":"Toast","description":"...","prepTime":"2 min","cookTime":"1 min","servings":"1","ingredients":[{"name":"Bread","imperial":"1 slice","metric":"1 slice"}],"instructions":["Toast it."]}"#;

#[tokio::test]
async fn test_generate_parses_backend_answer() {
    let backend = MockBackend::new().answer("Toast", Answer::Text(TOAST.to_string()));
    let service = RecipeService::new(backend.clone());

    let recipe = service.generate_recipe("Toast").await.unwrap();

    assert_eq!(recipe.name, "Toast");
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].display(UnitSystem::Metric), "1 slice Bread");
    assert_eq!(recipe.instructions, vec!["Toast it."]);
    assert!(recipe.tips.is_none());
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_generate_strips_code_fence() {
    let fenced = format!("```json\n{}\n```", TOAST);
    let backend = MockBackend::new().answer("Toast", Answer::Text(fenced));
    let service = RecipeService::new(backend);

    let recipe = service.generate_recipe("Toast").await.unwrap();
    assert_eq!(recipe.name, "Toast");
}

#[tokio::test]
async fn test_request_carries_dish_and_schema() {
    let backend = MockBackend::new();
    let service = RecipeService::new(backend.clone());

    service.generate_recipe("Pad Thai").await.unwrap();

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\"Pad Thai\""));

    let schemas = backend.schemas();
    assert_eq!(schemas[0]["type"], "OBJECT");
    assert!(schemas[0]["properties"]["ingredients"].is_object());
}

#[tokio::test]
async fn test_backend_error_is_wrapped() {
    let backend = MockBackend::new().answer(
        "Toast",
        Answer::Error(GeminiErrorKind::ServerError, "backend exploded".to_string()),
    );
    let service = RecipeService::new(backend);

    let err = service.generate_recipe("Toast").await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Failed to generate recipe from AI: "));
    assert!(message.contains("backend exploded"));
    assert!(matches!(err, GenerationError::Backend(_)));
}

#[tokio::test]
async fn test_unparseable_answer_is_a_generation_error() {
    let backend = MockBackend::new().answer("Toast", Answer::Text("Sorry, no.".to_string()));
    let service = RecipeService::new(backend);

    let err = service.generate_recipe("Toast").await.unwrap_err();
    assert!(err.to_string().starts_with("Failed to generate recipe from AI: "));
}

#[tokio::test]
async fn test_no_caching_between_calls() {
    let backend = MockBackend::new().answer("Toast", Answer::Text(recipe_json("Toast")));
    let service = RecipeService::new(backend.clone());

    service.generate_recipe("Toast").await.unwrap();
    service.generate_recipe("Toast").await.unwrap();

    assert_eq!(backend.call_count(), 2);
}
