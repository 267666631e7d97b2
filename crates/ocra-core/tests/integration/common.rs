//! Test utilities and mock implementations for integration tests.
//!
//! Provides mock implementations of the core traits for testing
//! `RecipeService`, `SearchSession` and `SavedRecipes` in isolation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ocra_core::error::{GeminiErrorDetails, GeminiErrorKind};
use ocra_core::traits::{GenerativeBackend, KeyValueStore};
use ocra_core::{AppError, MemoryStore};
use serde_json::Value;
use url::Url;

// =============================================================================
// Fixtures
// =============================================================================

pub const START_URL: &str = "https://ocra.app/";

pub fn start_url() -> Url {
    Url::parse(START_URL).unwrap()
}

/// Backend answer for a minimal recipe.
pub fn recipe_json(name: &str) -> String {
    serde_json::json!({
        "name": name,
        "description": "...",
        "prepTime": "2 min",
        "cookTime": "1 min",
        "servings": "1",
        "ingredients": [{ "name": "Bread", "imperial": "1 slice", "metric": "1 slice" }],
        "instructions": ["Toast it."]
    })
    .to_string()
}

// =============================================================================
// MockBackend
// =============================================================================

/// Canned answer for one dish.
#[derive(Clone)]
pub enum Answer {
    Text(String),
    Error(GeminiErrorKind, String),
}

#[derive(Clone)]
struct Scripted {
    answer: Answer,
    delay: Duration,
}

/// Mock generative backend scripted per dish name.
///
/// The dish is found by looking for `"<dish>"` in the prompt. Dishes without
/// a script get a recipe named after the dish. Every prompt is recorded.
#[derive(Clone, Default)]
pub struct MockBackend {
    scripts: Arc<Mutex<HashMap<String, Scripted>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    schemas: Arc<Mutex<Vec<Value>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, dish: &str, answer: Answer) -> Self {
        self.answer_after(dish, answer, Duration::ZERO)
    }

    pub fn answer_after(self, dish: &str, answer: Answer, delay: Duration) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(dish.to_string(), Scripted { answer, delay });
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn schemas(&self) -> Vec<Value> {
        self.schemas.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn script_for(&self, prompt: &str) -> Option<(String, Scripted)> {
        self.scripts
            .lock()
            .unwrap()
            .iter()
            .find(|(dish, _)| prompt.contains(&format!("\"{}\"", dish)))
            .map(|(dish, script)| (dish.clone(), script.clone()))
    }
}

impl GenerativeBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.schemas.lock().unwrap().push(schema.clone());

        let Some((_, script)) = self.script_for(prompt) else {
            return Ok(recipe_json("Unscripted"));
        };

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        match script.answer {
            Answer::Text(text) => Ok(text),
            Answer::Error(kind, message) => Err(AppError::GeminiError(GeminiErrorDetails::new(
                kind, message, 500,
            ))),
        }
    }
}

// =============================================================================
// Stores
// =============================================================================

/// Store that can be read but refuses every write.
#[derive(Clone, Default)]
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), AppError> {
        Err(AppError::StorageError("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), AppError> {
        Err(AppError::StorageError("quota exceeded".to_string()))
    }
}

/// Store whose every operation fails.
#[derive(Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        Err(AppError::StorageError("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), AppError> {
        Err(AppError::StorageError("storage disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), AppError> {
        Err(AppError::StorageError("storage disabled".to_string()))
    }
}
