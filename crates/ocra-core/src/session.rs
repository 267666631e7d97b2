//! Search session controller.
//!
//! A [`SearchSession`] owns everything a single recipe page shows: the
//! search lifecycle state, the navigation history holding the shareable
//! link, and the per-recipe view preferences.
//!
//! # Lifecycle
//!
//! ```text
//! IDLE --submit--> LOADING --ok--> SUCCESS --submit--> LOADING ...
//!                          --err-> ERROR   --submit--> LOADING ...
//! ```
//!
//! Every submission takes a new sequence number. When a response arrives
//! after a newer submission was issued it is dropped, so the page always
//! shows the answer to the latest query.
//!
//! # Example
//!
//! ```ignore
//! use ocra_core::session::{SearchSession, SubmitOutcome};
//!
//! let session = SearchSession::new(RecipeService::new(gemini), start_url);
//! if session.submit("Spaghetti Carbonara").await == SubmitOutcome::Succeeded {
//!     println!("share: {}", session.current_url());
//! }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use url::Url;

use crate::error::AppError;
use crate::models::Recipe;
use crate::navigation::{NavigationHistory, dish_param, with_dish_param, without_dish_param};
use crate::saved::SavedRecipes;
use crate::traits::{KeyValueStore, RecipeGenerator};
use crate::view::{Rating, RecipeView, UnitSystem, ViewState};

/// State of the search lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    /// Nothing searched yet.
    #[default]
    Idle,
    /// A request for `query` is in flight. No recipe or error is shown.
    Loading { query: String },
    /// The latest request produced this recipe.
    Success(Recipe),
    /// The latest request failed with this user-facing message.
    Failed(String),
}

impl SearchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Loading { .. } => "loading",
            SearchState::Success(_) => "success",
            SearchState::Failed(_) => "error",
        }
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match self {
            SearchState::Success(recipe) => Some(recipe),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SearchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a call to [`SearchSession::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty query; nothing happened.
    Ignored,
    /// A newer submission was issued while this one was in flight; its
    /// response was discarded.
    Stale,
    /// The recipe is shown and the link points at it.
    Succeeded,
    /// The error is shown and the link no longer names a dish.
    Failed,
}

/// Whether a finished search records itself in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Keep,
}

#[derive(Debug)]
struct SessionInner {
    state: SearchState,
    history: NavigationHistory,
    views: ViewState,
}

/// Controller for one recipe search page.
///
/// All methods take `&self`; several submissions may be awaited
/// concurrently and only the latest one updates the state.
#[derive(Clone)]
pub struct SearchSession<G>
where
    G: RecipeGenerator,
{
    generator: G,
    sequence: Arc<AtomicU64>,
    inner: Arc<Mutex<SessionInner>>,
}

impl<G> SearchSession<G>
where
    G: RecipeGenerator,
{
    /// Creates an idle session whose history starts at `start_url`.
    pub fn new(generator: G, start_url: Url) -> Self {
        Self::with_default_units(generator, start_url, UnitSystem::default())
    }

    /// Like [`SearchSession::new`], showing new recipes in `units`.
    pub fn with_default_units(generator: G, start_url: Url, units: UnitSystem) -> Self {
        Self {
            generator,
            sequence: Arc::new(AtomicU64::new(0)),
            inner: Arc::new(Mutex::new(SessionInner {
                state: SearchState::Idle,
                history: NavigationHistory::new(start_url),
                views: ViewState::new(units),
            })),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a search for `query`.
    ///
    /// An empty query is ignored. Otherwise the state moves to loading, one
    /// generation request is issued, and its result is applied unless a
    /// newer submission has started in the meantime.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        self.run(query, HistoryMode::Push).await
    }

    /// Re-runs the search named by the current history entry.
    ///
    /// Used after [`back`](Self::back) or [`forward`](Self::forward): the
    /// result is shown but history is left as it is. Returns `None` when the
    /// entry names no dish.
    pub async fn replay_current(&self) -> Option<SubmitOutcome> {
        let dish = dish_param(&self.current_url()).filter(|d| !d.is_empty())?;
        tracing::debug!(dish = %dish, "Replaying search from history");
        Some(self.run(&dish, HistoryMode::Keep).await)
    }

    async fn run(&self, query: &str, mode: HistoryMode) -> SubmitOutcome {
        if query.is_empty() {
            tracing::debug!("Ignoring empty search");
            return SubmitOutcome::Ignored;
        }

        let seq = {
            let mut inner = self.lock();
            inner.state = SearchState::Loading {
                query: query.to_string(),
            };
            self.sequence.fetch_add(1, Ordering::SeqCst) + 1
        };
        tracing::info!(dish = query, seq, "Searching");

        let result = self.generator.generate_recipe(query).await;

        let mut inner = self.lock();
        if self.sequence.load(Ordering::SeqCst) != seq {
            tracing::debug!(dish = query, seq, "Discarding stale response");
            return SubmitOutcome::Stale;
        }

        match result {
            Ok(recipe) => {
                if mode == HistoryMode::Push {
                    let url = with_dish_param(inner.history.current(), query);
                    inner.history.push(url);
                }
                tracing::info!(dish = query, recipe = %recipe.name, "Recipe ready");
                inner.state = SearchState::Success(recipe);
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                if mode == HistoryMode::Push {
                    let url = without_dish_param(inner.history.current());
                    inner.history.push_if_changed(url);
                }
                tracing::warn!(dish = query, error = %e, "Search failed");
                inner.state = SearchState::Failed(e.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Replays the search named by the `dish` parameter of the current URL.
    ///
    /// Returns `None` when the URL names no dish.
    pub async fn startup(&self) -> Option<SubmitOutcome> {
        let dish = dish_param(&self.current_url()).filter(|d| !d.is_empty())?;
        tracing::info!(dish = %dish, "Restoring search from link");
        Some(self.submit(&dish).await)
    }

    pub fn state(&self) -> SearchState {
        self.lock().state.clone()
    }

    pub fn current_recipe(&self) -> Option<Recipe> {
        self.lock().state.recipe().cloned()
    }

    pub fn error_message(&self) -> Option<String> {
        self.lock().state.error_message().map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.lock().state, SearchState::Loading { .. })
    }

    /// Returns the shareable URL of the page.
    pub fn current_url(&self) -> Url {
        self.lock().history.current().clone()
    }

    pub fn history(&self) -> Vec<Url> {
        self.lock().history.entries().to_vec()
    }

    /// Moves back in history without searching.
    pub fn back(&self) -> Option<Url> {
        self.lock().history.back().cloned()
    }

    /// Moves forward in history without searching.
    pub fn forward(&self) -> Option<Url> {
        self.lock().history.forward().cloned()
    }

    pub fn view_state(&self, recipe_name: &str) -> RecipeView {
        self.lock().views.get(recipe_name)
    }

    pub fn set_units(&self, recipe_name: &str, units: UnitSystem) {
        self.lock().views.set_units(recipe_name, units);
    }

    /// Switches the recipe to the other unit system and returns it.
    pub fn toggle_units(&self, recipe_name: &str) -> UnitSystem {
        let mut inner = self.lock();
        let units = inner.views.get(recipe_name).units.toggled();
        inner.views.set_units(recipe_name, units);
        units
    }

    /// Rates a recipe from 1 to 5 stars.
    pub fn set_rating(&self, recipe_name: &str, stars: u8) -> Result<Rating, AppError> {
        let rating = Rating::new(stars)?;
        self.lock().views.set_rating(recipe_name, rating);
        Ok(rating)
    }

    /// Returns whether the recipe is in the saved collection.
    ///
    /// Storage failures are logged and read as "not saved".
    pub fn is_saved<S>(&self, saved: &SavedRecipes<S>, recipe_name: &str) -> bool
    where
        S: KeyValueStore,
    {
        saved.contains(recipe_name).unwrap_or_else(|e| {
            tracing::warn!(recipe = recipe_name, error = %e, "Could not read saved recipes");
            false
        })
    }

    /// Adds the recipe to the saved collection or removes it.
    ///
    /// Returns the new saved flag. When the store fails, the failure is
    /// logged and the flag is returned unchanged.
    pub fn toggle_save<S>(&self, saved: &SavedRecipes<S>, recipe: &Recipe) -> bool
    where
        S: KeyValueStore,
    {
        match saved.toggle(recipe) {
            Ok(flag) => flag,
            Err(e) => {
                tracing::warn!(recipe = %recipe.name, error = %e, "Failed to update saved recipes");
                self.is_saved(saved, &recipe.name)
            }
        }
    }
}
