//! Trait definitions for external dependencies.
//!
//! This module defines traits that abstract over everything OCRA does not
//! own (the generative backend, the local key-value store, the host
//! clipboard and share mechanism), enabling:
//!
//! - **Testability**: Mock implementations for unit testing
//! - **Flexibility**: Different backends (Gemini over HTTP, a canned fixture)
//! - **Decoupling**: The search session doesn't depend on HTTP or files
//!
//! # Example
//!
//! ```
//! use ocra_core::traits::GenerativeBackend;
//! use ocra_core::AppError;
//!
//! // Business logic uses traits, not concrete types
//! async fn ask<B: GenerativeBackend>(backend: &B) -> Result<String, AppError> {
//!     let schema = ocra_core::generation::recipe_schema();
//!     backend.generate_json("Generate a recipe for toast", &schema).await
//! }
//! ```

use std::future::Future;

use serde_json::Value;

use crate::error::{AppError, GenerationError};
use crate::models::Recipe;
use crate::share::SharePayload;

/// Generative AI backend that answers a prompt with JSON text.
///
/// The backend is opaque: it receives a natural-language prompt plus a
/// response schema and returns the raw text it produced. It may wrap the
/// JSON in markdown code fences; callers strip them.
pub trait GenerativeBackend: Send + Sync + Clone {
    /// Returns the backend name used in logs (e.g. `"gemini"`).
    fn name(&self) -> &'static str;

    /// Sends one request and returns the response text.
    ///
    /// # Arguments
    ///
    /// * `prompt` - The natural-language instruction
    /// * `schema` - The response schema the answer must follow
    fn generate_json(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Produces a recipe for a dish name.
///
/// Implemented by [`RecipeService`](crate::generation::RecipeService); the
/// search session only depends on this trait.
pub trait RecipeGenerator: Send + Sync {
    /// Generates a recipe for the given dish name.
    ///
    /// The caller rejects empty names before calling.
    fn generate_recipe(
        &self,
        dish_name: &str,
    ) -> impl Future<Output = Result<Recipe, GenerationError>> + Send;
}

/// String key-value store with whole-value reads and writes.
///
/// Mirrors the browser's local storage: values are opaque strings and each
/// write replaces the previous value for that key.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removes `key` if present.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// System clipboard.
pub trait Clipboard {
    /// Replaces the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), AppError>;
}

/// Platform share mechanism (share sheet, messaging intent, ...).
pub trait ShareTarget {
    /// Returns true if the platform can share at all.
    fn is_supported(&self) -> bool;

    /// Hands the payload to the platform.
    fn share(&self, payload: &SharePayload) -> Result<(), AppError>;
}
