//! Per-recipe view preferences.
//!
//! The recipe itself never changes after generation; what the user adjusts
//! (which unit system to show, how many stars they gave it) is kept here,
//! keyed by recipe name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Unit system used when displaying ingredient quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    /// Returns the other unit system.
    pub fn toggled(self) -> Self {
        match self {
            Self::Imperial => Self::Metric,
            Self::Metric => Self::Imperial,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Imperial => write!(f, "imperial"),
            Self::Metric => write!(f, "metric"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "imperial" | "us" => Ok(Self::Imperial),
            "metric" | "si" => Ok(Self::Metric),
            _ => Err(AppError::ConfigError(format!(
                "Unknown unit system: '{}'. Valid options: imperial, metric",
                s
            ))),
        }
    }
}

/// A 1 to 5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, AppError> {
        if (1..=Self::MAX).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(AppError::InvalidRating(stars))
        }
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX) - filled;
        write!(f, "{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

/// View preferences for one recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeView {
    pub units: UnitSystem,
    pub rating: Option<Rating>,
}

/// View preferences for every recipe seen in this session.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    default_units: UnitSystem,
    by_recipe: HashMap<String, RecipeView>,
}

impl ViewState {
    /// Creates an empty view state whose recipes start in `default_units`.
    pub fn new(default_units: UnitSystem) -> Self {
        Self {
            default_units,
            by_recipe: HashMap::new(),
        }
    }

    /// Returns the preferences for a recipe, falling back to the defaults.
    pub fn get(&self, recipe_name: &str) -> RecipeView {
        self.by_recipe
            .get(recipe_name)
            .copied()
            .unwrap_or(RecipeView {
                units: self.default_units,
                rating: None,
            })
    }

    pub fn set_units(&mut self, recipe_name: &str, units: UnitSystem) {
        self.entry(recipe_name).units = units;
    }

    pub fn set_rating(&mut self, recipe_name: &str, rating: Rating) {
        self.entry(recipe_name).rating = Some(rating);
    }

    fn entry(&mut self, recipe_name: &str) -> &mut RecipeView {
        let defaults = RecipeView {
            units: self.default_units,
            rating: None,
        };
        self.by_recipe
            .entry(recipe_name.to_string())
            .or_insert(defaults)
    }
}
