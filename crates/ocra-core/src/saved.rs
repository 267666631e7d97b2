//! The user's saved recipe collection.
//!
//! The whole collection is one JSON array of full [`Recipe`] objects stored
//! under [`SAVED_RECIPES_KEY`]. Every mutation is a read-modify-write of
//! that array. Recipes are identified by name: saving a recipe whose name is
//! already in the collection replaces the stored copy.

use crate::error::AppError;
use crate::models::Recipe;
use crate::traits::KeyValueStore;

/// Storage key of the saved collection.
pub const SAVED_RECIPES_KEY: &str = "ocra_saved_recipes";

/// Name-keyed collection of saved recipes on top of a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct SavedRecipes<S>
where
    S: KeyValueStore,
{
    store: S,
}

impl<S> SavedRecipes<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns all saved recipes in the order they were saved.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StorageError` if the store is unreadable or the
    /// stored blob is not a recipe list.
    pub fn list(&self) -> Result<Vec<Recipe>, AppError> {
        match self.store.get(SAVED_RECIPES_KEY)? {
            None => Ok(Vec::new()),
            Some(blob) => serde_json::from_str(&blob).map_err(|e| {
                AppError::StorageError(format!("Saved recipes are corrupt: {}", e))
            }),
        }
    }

    /// Returns true if a recipe with this name is saved.
    pub fn contains(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.list()?.iter().any(|r| r.name == name))
    }

    /// Returns the saved copy of a recipe by name.
    pub fn get(&self, name: &str) -> Result<Option<Recipe>, AppError> {
        Ok(self.list()?.into_iter().find(|r| r.name == name))
    }

    /// Saves a full copy of `recipe`, replacing any entry with the same name.
    pub fn save(&self, recipe: &Recipe) -> Result<(), AppError> {
        let mut recipes = self.list()?;
        match recipes.iter_mut().find(|r| r.name == recipe.name) {
            Some(existing) => *existing = recipe.clone(),
            None => recipes.push(recipe.clone()),
        }
        self.write(&recipes)
    }

    /// Removes the recipe with this name. Returns true if it was saved.
    pub fn remove(&self, name: &str) -> Result<bool, AppError> {
        let mut recipes = self.list()?;
        let before = recipes.len();
        recipes.retain(|r| r.name != name);
        if recipes.len() == before {
            return Ok(false);
        }
        self.write(&recipes)?;
        Ok(true)
    }

    /// Saves the recipe if it is not saved, removes it otherwise.
    ///
    /// Returns the new saved flag.
    pub fn toggle(&self, recipe: &Recipe) -> Result<bool, AppError> {
        if self.remove(&recipe.name)? {
            tracing::debug!(recipe = %recipe.name, "Removed recipe from saved collection");
            Ok(false)
        } else {
            self.save(recipe)?;
            tracing::debug!(recipe = %recipe.name, "Added recipe to saved collection");
            Ok(true)
        }
    }

    fn write(&self, recipes: &[Recipe]) -> Result<(), AppError> {
        let blob = serde_json::to_string(recipes)?;
        self.store.set(SAVED_RECIPES_KEY, &blob)
    }
}
