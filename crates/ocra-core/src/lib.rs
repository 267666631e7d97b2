//! OCRA Core - Recipe domain types, generation and the search session.
//!
//! This crate provides the core functionality for OCRA, including:
//!
//! - **Domain models**: [`Recipe`], [`Ingredient`], [`NutritionalInfo`]
//! - **Services**: [`RecipeService`] turns a dish name into a recipe through a
//!   generative backend; [`SearchSession`] drives one recipe page
//! - **Saved recipes**: [`SavedRecipes`] over any [`KeyValueStore`]
//! - **Rendering**: plain-text and printable page renderings, copy and share
//! - **Traits**: [`GenerativeBackend`], [`RecipeGenerator`], [`KeyValueStore`],
//!   [`Clipboard`], [`ShareTarget`] for dependency injection
//!
//! # Architecture
//!
//! The crate does no network I/O of its own. The Gemini HTTP client lives in
//! `ocra-client` and the terminal front end in `ocra-cli`; both plug in
//! through the traits above.
//!
//! # Example
//!
//! ```ignore
//! use ocra_core::{RecipeService, SearchSession, SubmitOutcome};
//!
//! let session = SearchSession::new(RecipeService::new(gemini), start_url);
//! match session.submit("Spaghetti Carbonara").await {
//!     SubmitOutcome::Succeeded => println!("{}", session.current_url()),
//!     _ => eprintln!("{:?}", session.error_message()),
//! }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod navigation;
pub mod render;
pub mod saved;
pub mod session;
pub mod share;
pub mod store;
pub mod traits;
pub mod view;

// Configuration
pub use config::{
    GenerationConfig, HttpConfig, Settings, default_config_path, load_settings,
};

// Error handling
pub use error::{AppError, GeminiErrorDetails, GeminiErrorKind, GenerationError};

// Domain models
pub use models::{Ingredient, NutritionalInfo, Recipe};
pub use view::{Rating, RecipeView, UnitSystem, ViewState};

// Traits for dependency injection
pub use traits::{Clipboard, GenerativeBackend, KeyValueStore, RecipeGenerator, ShareTarget};

// Services
pub use generation::RecipeService;
pub use saved::SavedRecipes;
pub use session::{SearchSession, SearchState, SubmitOutcome};

// Links, storage and host actions
pub use navigation::NavigationHistory;
pub use render::{render_page, render_plain_text};
pub use share::{ShareOutcome, SharePayload, copy_recipe, share_recipe};
pub use store::{FileStore, MemoryStore};
