//! Integration tests for SearchSession.
//!
//! These tests drive a session over a real `RecipeService` with a scripted
//! backend and check the state machine, the shareable link and the
//! latest-request-wins rule.

use std::time::Duration;

use crate::integration::common::{
    Answer, MockBackend, ReadOnlyStore, UnavailableStore, recipe_json, start_url,
};
use ocra_core::error::GeminiErrorKind;
use ocra_core::navigation::dish_param;
use ocra_core::saved::SAVED_RECIPES_KEY;
use ocra_core::traits::KeyValueStore;
use ocra_core::{
    MemoryStore, RecipeService, RecipeView, SavedRecipes, SearchSession, SearchState,
    SubmitOutcome, UnitSystem,
};
use url::Url;

fn session_with(backend: MockBackend) -> SearchSession<RecipeService<MockBackend>> {
    SearchSession::new(RecipeService::new(backend), start_url())
}

fn failing(dish: &str) -> MockBackend {
    MockBackend::new().answer(
        dish,
        Answer::Error(GeminiErrorKind::ServerError, "boom".to_string()),
    )
}

#[tokio::test]
async fn test_initial_state_is_idle() {
    let session = session_with(MockBackend::new());
    assert_eq!(session.state(), SearchState::Idle);
    assert!(session.current_recipe().is_none());
    assert!(session.error_message().is_none());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_empty_query_issues_no_request() {
    let backend = MockBackend::new();
    let session = session_with(backend.clone());

    assert_eq!(session.submit("").await, SubmitOutcome::Ignored);
    assert_eq!(session.state(), SearchState::Idle);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_loading_while_request_in_flight() {
    let backend = MockBackend::new().answer_after(
        "Stew",
        Answer::Text(recipe_json("Stew")),
        Duration::from_millis(30),
    );
    let session = session_with(backend);

    let (outcome, seen) = tokio::join!(session.submit("Stew"), async {
        tokio::task::yield_now().await;
        session.state()
    });

    assert_eq!(
        seen,
        SearchState::Loading {
            query: "Stew".to_string()
        }
    );
    assert!(seen.recipe().is_none());
    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_success_sets_recipe_and_pushes_link() {
    let backend =
        MockBackend::new().answer("Spaghetti Carbonara", Answer::Text(recipe_json("Carbonara")));
    let session = session_with(backend);

    let outcome = session.submit("Spaghetti Carbonara").await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(session.current_recipe().unwrap().name, "Carbonara");
    assert!(session.error_message().is_none());

    let url = session.current_url();
    assert_eq!(url.query(), Some("dish=Spaghetti%20Carbonara"));
    assert_eq!(dish_param(&url).as_deref(), Some("Spaghetti Carbonara"));
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_each_success_is_a_history_entry() {
    let session = session_with(MockBackend::new());

    session.submit("Toast").await;
    session.submit("Soup").await;

    let history = session.history();
    assert_eq!(history.len(), 3);
    assert_eq!(dish_param(&history[1]).as_deref(), Some("Toast"));
    assert_eq!(dish_param(&history[2]).as_deref(), Some("Soup"));

    let back = session.back().unwrap();
    assert_eq!(dish_param(&back).as_deref(), Some("Toast"));
    assert_eq!(session.current_url(), back);
    let forward = session.forward().unwrap();
    assert_eq!(dish_param(&forward).as_deref(), Some("Soup"));
}

#[tokio::test]
async fn test_failure_shows_message_and_clears_link() {
    let session = session_with(failing("Mystery"));

    session.submit("Toast").await;
    let outcome = session.submit("Mystery").await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert!(session.current_recipe().is_none());
    let message = session.error_message().unwrap();
    assert!(message.starts_with("Failed to generate recipe from AI: "));
    assert!(message.contains("boom"));

    // The link no longer names a dish, and the earlier entries survive.
    assert_eq!(dish_param(&session.current_url()), None);
    let history = session.history();
    assert_eq!(history.len(), 3);
    assert_eq!(dish_param(&history[1]).as_deref(), Some("Toast"));
}

#[tokio::test]
async fn test_failure_keeps_other_query_params() {
    let backend = failing("Mystery");
    let start = Url::parse("https://ocra.app/?theme=dark&dish=Toast").unwrap();
    let session = SearchSession::new(RecipeService::new(backend), start);

    session.submit("Mystery").await;

    assert_eq!(session.current_url().query(), Some("theme=dark"));
}

#[tokio::test]
async fn test_failure_without_dish_adds_no_entry() {
    let session = session_with(failing("Mystery"));

    session.submit("Mystery").await;

    assert_eq!(session.history(), vec![start_url()]);

    // Other params written with `+` are not re-encoded into a new entry.
    let start = Url::parse("https://ocra.app/?q=a+b").unwrap();
    let session = SearchSession::new(RecipeService::new(failing("Mystery")), start.clone());

    session.submit("Mystery").await;

    assert_eq!(session.history(), vec![start.clone()]);
    assert_eq!(session.current_url(), start);
}

#[tokio::test]
async fn test_replaying_history_keeps_entries() {
    let backend = MockBackend::new();
    let session = session_with(backend.clone());

    session.submit("Toast").await;
    session.submit("Soup").await;
    let before = session.history();

    let back = session.back().unwrap();
    assert_eq!(dish_param(&back).as_deref(), Some("Toast"));
    assert_eq!(session.replay_current().await, Some(SubmitOutcome::Succeeded));
    assert_eq!(session.history(), before);
    assert_eq!(session.current_url(), back);

    let forward = session.forward().unwrap();
    assert_eq!(dish_param(&forward).as_deref(), Some("Soup"));
    assert_eq!(session.replay_current().await, Some(SubmitOutcome::Succeeded));

    session.back().unwrap();
    session.replay_current().await;
    assert_eq!(session.back().unwrap(), start_url());
    assert_eq!(session.replay_current().await, None);

    assert_eq!(session.history(), before);
    // Two searches and three replays. The start page issues nothing.
    assert_eq!(backend.call_count(), 5);
}

#[tokio::test]
async fn test_failed_replay_keeps_entries() {
    let backend = MockBackend::new().answer(
        "Toast",
        Answer::Error(GeminiErrorKind::ServerError, "boom".to_string()),
    );
    let session = SearchSession::new(
        RecipeService::new(backend),
        Url::parse("https://ocra.app/?dish=Toast").unwrap(),
    );
    session.submit("Soup").await;
    let before = session.history();

    session.back().unwrap();
    assert_eq!(session.replay_current().await, Some(SubmitOutcome::Failed));

    assert!(session.error_message().is_some());
    assert_eq!(session.history(), before);
    assert_eq!(dish_param(&session.current_url()).as_deref(), Some("Toast"));
}

#[tokio::test]
async fn test_new_search_clears_previous_error() {
    let session = session_with(failing("Mystery"));

    session.submit("Mystery").await;
    assert!(session.error_message().is_some());

    session.submit("Toast").await;
    assert!(session.error_message().is_none());
    assert!(session.current_recipe().is_some());
}

#[tokio::test]
async fn test_startup_replays_shared_link() {
    let backend = MockBackend::new();
    let start = Url::parse("https://ocra.app/?dish=Spaghetti%20Carbonara").unwrap();
    let session = SearchSession::new(RecipeService::new(backend.clone()), start);

    let outcome = session.startup().await;

    assert_eq!(outcome, Some(SubmitOutcome::Succeeded));
    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\"Spaghetti Carbonara\""));
    assert!(!prompts[0].contains("%20"));
}

#[tokio::test]
async fn test_startup_decodes_plus_as_space() {
    let backend = MockBackend::new();
    let start = Url::parse("https://ocra.app/?dish=Fish+and+chips").unwrap();
    let session = SearchSession::new(RecipeService::new(backend.clone()), start);

    session.startup().await;

    assert!(backend.prompts()[0].contains("\"Fish and chips\""));
}

#[tokio::test]
async fn test_startup_without_or_with_empty_dish() {
    let backend = MockBackend::new();

    let session = session_with(backend.clone());
    assert_eq!(session.startup().await, None);

    let start = Url::parse("https://ocra.app/?dish=").unwrap();
    let session = SearchSession::new(RecipeService::new(backend.clone()), start);
    assert_eq!(session.startup().await, None);

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_latest_submission_wins() {
    let backend = MockBackend::new()
        .answer_after(
            "Slow",
            Answer::Text(recipe_json("Slow")),
            Duration::from_millis(50),
        )
        .answer("Fast", Answer::Text(recipe_json("Fast")));
    let session = session_with(backend);

    let (slow, fast) = tokio::join!(session.submit("Slow"), session.submit("Fast"));

    assert_eq!(slow, SubmitOutcome::Stale);
    assert_eq!(fast, SubmitOutcome::Succeeded);
    assert_eq!(session.current_recipe().unwrap().name, "Fast");
    assert_eq!(dish_param(&session.current_url()).as_deref(), Some("Fast"));
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_stale_failure_does_not_touch_state() {
    let backend = MockBackend::new()
        .answer_after(
            "Slow",
            Answer::Error(GeminiErrorKind::ServerError, "late".to_string()),
            Duration::from_millis(50),
        )
        .answer("Fast", Answer::Text(recipe_json("Fast")));
    let session = session_with(backend);

    let (slow, _) = tokio::join!(session.submit("Slow"), session.submit("Fast"));

    assert_eq!(slow, SubmitOutcome::Stale);
    assert!(session.error_message().is_none());
    assert_eq!(dish_param(&session.current_url()).as_deref(), Some("Fast"));
}

#[tokio::test]
async fn test_toggle_save_and_saved_flag() {
    let session = session_with(MockBackend::new());
    session.submit("Toast").await;
    let recipe = session.current_recipe().unwrap();

    let saved = SavedRecipes::new(MemoryStore::new());
    assert!(!session.is_saved(&saved, &recipe.name));
    assert!(session.toggle_save(&saved, &recipe));
    assert!(session.is_saved(&saved, &recipe.name));
    assert!(!session.toggle_save(&saved, &recipe));
    assert!(saved.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_save_write_failure_keeps_flag() {
    let session = session_with(MockBackend::new());
    session.submit("Toast").await;
    let recipe = session.current_recipe().unwrap();

    // Already saved, but the store refuses writes.
    let store = ReadOnlyStore::default();
    let blob = serde_json::to_string(&vec![recipe.clone()]).unwrap();
    store.inner.set(SAVED_RECIPES_KEY, &blob).unwrap();
    let saved = SavedRecipes::new(store);

    assert!(session.toggle_save(&saved, &recipe));
    assert!(session.is_saved(&saved, &recipe.name));
}

#[tokio::test]
async fn test_toggle_save_unavailable_store() {
    let session = session_with(MockBackend::new());
    session.submit("Toast").await;
    let recipe = session.current_recipe().unwrap();

    let saved = SavedRecipes::new(UnavailableStore);
    assert!(!session.toggle_save(&saved, &recipe));
    // The page is still usable.
    assert!(session.current_recipe().is_some());
}

#[tokio::test]
async fn test_view_preferences_are_per_recipe() {
    let session = session_with(MockBackend::new());
    session.submit("Toast").await;
    let name = session.current_recipe().unwrap().name;

    session.toggle_units(&name);
    session.set_rating(&name, 5).unwrap();

    let view = session.view_state(&name);
    assert_eq!(view.units, UnitSystem::Metric);
    assert_eq!(view.rating.map(|r| r.stars()), Some(5));
    assert_eq!(session.view_state("Other"), RecipeView::default());
}
