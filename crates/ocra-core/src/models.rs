//! Recipe domain model.
//!
//! A [`Recipe`] is only ever built by parsing a backend answer. The backend
//! has been observed answering with several schema generations, so the
//! deserializers accept every shape and normalize it into the canonical one:
//!
//! ```json
//! {
//!   "name": "Toast",
//!   "description": "Crisp bread.",
//!   "prepTime": "2 min",
//!   "cookTime": "1 min",
//!   "servings": "1",
//!   "ingredients": [{ "name": "Bread", "imperial": "1 slice", "metric": "1 slice" }],
//!   "instructions": ["Toast it."],
//!   "tips": ["Butter while hot."],
//!   "nutritionalInfo": { "calories": "80 kcal" }
//! }
//! ```
//!
//! Older answers may use `dishName` instead of `name`, `notes` (a single
//! string) instead of `tips`, plain-string ingredients, or `{name, quantity}`
//! ingredient objects.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::view::UnitSystem;

/// A generated recipe.
///
/// Timing and servings are free-form display strings; nothing here parses
/// them. Identity for the saved collection is [`Recipe::name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Dish title.
    #[serde(alias = "dishName")]
    pub name: String,
    /// Short summary shown under the title.
    pub description: String,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub servings: String,
    pub ingredients: Vec<Ingredient>,
    /// One entry per step, in order.
    pub instructions: Vec<String>,
    #[serde(
        default,
        alias = "notes",
        deserialize_with = "deserialize_tips",
        skip_serializing_if = "Option::is_none"
    )]
    pub tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<NutritionalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    /// Returns the tips, or an empty slice when the backend sent none.
    pub fn tips(&self) -> &[String] {
        self.tips.as_deref().unwrap_or_default()
    }

    /// Returns true when there is at least one tip to show.
    pub fn has_tips(&self) -> bool {
        !self.tips().is_empty()
    }

    /// Returns the nutrition block if it carries at least one value.
    pub fn nutrition(&self) -> Option<&NutritionalInfo> {
        self.nutritional_info.as_ref().filter(|n| !n.is_empty())
    }
}

/// One ingredient line with both unit systems spelled out by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub imperial: String,
    pub metric: String,
}

impl Ingredient {
    pub fn new(
        name: impl Into<String>,
        imperial: impl Into<String>,
        metric: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            imperial: imperial.into(),
            metric: metric.into(),
        }
    }

    /// Returns the quantity for the selected unit system.
    pub fn quantity(&self, units: UnitSystem) -> &str {
        match units {
            UnitSystem::Imperial => &self.imperial,
            UnitSystem::Metric => &self.metric,
        }
    }

    /// Formats the ingredient as `<quantity> <name>`, or just the name when
    /// no quantity is known.
    pub fn display(&self, units: UnitSystem) -> String {
        let quantity = self.quantity(units).trim();
        if quantity.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", quantity, self.name)
        }
    }
}

/// Wire shape of an ingredient object across schema generations.
#[derive(Deserialize)]
struct IngredientObject {
    name: String,
    #[serde(default)]
    imperial: Option<String>,
    #[serde(default)]
    metric: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
}

impl From<IngredientObject> for Ingredient {
    fn from(obj: IngredientObject) -> Self {
        let imperial = obj.imperial.or_else(|| obj.quantity.clone());
        let metric = obj.metric.or(obj.quantity);
        Ingredient {
            name: obj.name,
            imperial: imperial.unwrap_or_default(),
            metric: metric.unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for Ingredient {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IngredientVisitor;

        impl<'de> Visitor<'de> for IngredientVisitor {
            type Value = Ingredient;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an ingredient string or an ingredient object")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Ingredient, E> {
                Ok(Ingredient::new(value, "", ""))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Ingredient, E> {
                Ok(Ingredient::new(value, "", ""))
            }

            fn visit_map<M>(self, map: M) -> Result<Ingredient, M::Error>
            where
                M: MapAccess<'de>,
            {
                let obj: IngredientObject =
                    Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(obj.into())
            }
        }

        deserializer.deserialize_any(IngredientVisitor)
    }
}

/// Per-serving nutrition, all values opaque strings such as `"320 kcal"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<String>,
}

impl NutritionalInfo {
    /// Returns `(label, value)` pairs for the values that are present.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Calories", &self.calories),
            ("Protein", &self.protein),
            ("Fat", &self.fat),
            ("Carbs", &self.carbs),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TipsWire {
    List(Vec<String>),
    Single(String),
}

/// Accepts `tips` as a list, or legacy `notes` as a single paragraph.
fn deserialize_tips<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<TipsWire>::deserialize(deserializer)?;
    Ok(match wire {
        None => None,
        Some(TipsWire::List(tips)) => Some(tips),
        Some(TipsWire::Single(note)) if note.trim().is_empty() => None,
        Some(TipsWire::Single(note)) => Some(vec![note]),
    })
}
