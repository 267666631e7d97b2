//! Integration tests for SavedRecipes over the file-backed store.

use crate::integration::common::{UnavailableStore, recipe_json};
use ocra_core::saved::SAVED_RECIPES_KEY;
use ocra_core::traits::KeyValueStore;
use ocra_core::{AppError, FileStore, Recipe, SavedRecipes};
use tempfile::TempDir;

fn recipe(name: &str) -> Recipe {
    serde_json::from_str(&recipe_json(name)).unwrap()
}

#[test]
fn test_saved_recipes_persist_across_handles() {
    let dir = TempDir::new().unwrap();

    let saved = SavedRecipes::new(FileStore::in_dir(dir.path()));
    saved.save(&recipe("Toast")).unwrap();
    saved.save(&recipe("Soup")).unwrap();

    let reopened = SavedRecipes::new(FileStore::in_dir(dir.path()));
    let names: Vec<String> = reopened.list().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Toast", "Soup"]);
    assert_eq!(reopened.get("Soup").unwrap().unwrap(), recipe("Soup"));
}

#[test]
fn test_double_toggle_restores_file_contents() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::in_dir(dir.path());
    let saved = SavedRecipes::new(store.clone());
    saved.save(&recipe("Soup")).unwrap();
    let before = store.get(SAVED_RECIPES_KEY).unwrap();

    let toast = recipe("Toast");
    assert!(saved.toggle(&toast).unwrap());
    assert!(!saved.toggle(&toast).unwrap());

    assert_eq!(store.get(SAVED_RECIPES_KEY).unwrap(), before);
}

#[test]
fn test_same_name_is_never_duplicated() {
    let dir = TempDir::new().unwrap();
    let saved = SavedRecipes::new(FileStore::in_dir(dir.path()));

    let mut first = recipe("Toast");
    first.description = "first".to_string();
    let mut second = recipe("Toast");
    second.description = "second".to_string();

    saved.save(&first).unwrap();
    saved.save(&second).unwrap();

    let list = saved.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].description, "second");
}

#[test]
fn test_store_keeps_other_keys() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::in_dir(dir.path());
    store.set("theme", "dark").unwrap();

    let saved = SavedRecipes::new(store.clone());
    saved.toggle(&recipe("Toast")).unwrap();

    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_corrupt_saved_blob() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::in_dir(dir.path());
    store.set(SAVED_RECIPES_KEY, "not json").unwrap();

    let saved = SavedRecipes::new(store);
    assert!(matches!(saved.list(), Err(AppError::StorageError(_))));
}

#[test]
fn test_unavailable_store() {
    let saved = SavedRecipes::new(UnavailableStore);
    assert!(matches!(
        saved.save(&recipe("Toast")),
        Err(AppError::StorageError(_))
    ));
}
