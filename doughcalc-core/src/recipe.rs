//! Recipe data model.
//!
//! A [`Recipe`] is a plain value: edits produce a new value (see
//! [`crate::input`]) and the engine and schedule deriver only ever borrow it.
//! Serialized field names follow the persisted record shape (`doughBalls`,
//! `preFerment.type`, `timing.bulkFerment`, ...). Every struct defaults
//! missing fields so that older or partial records still load.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed ingredient set. Flour is the percentage basis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ingredient {
    Flour,
    Water,
    Salt,
    Yeast,
    Oil,
    Sugar,
}

impl Ingredient {
    /// All ingredients in display order.
    pub const ALL: [Ingredient; 6] = [
        Ingredient::Flour,
        Ingredient::Water,
        Ingredient::Salt,
        Ingredient::Yeast,
        Ingredient::Oil,
        Ingredient::Sugar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Ingredient::Flour => "Flour",
            Ingredient::Water => "Water",
            Ingredient::Salt => "Salt",
            Ingredient::Yeast => "Yeast",
            Ingredient::Oil => "Oil",
            Ingredient::Sugar => "Sugar",
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Baker's percentages (flour = 100).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakersPercentages {
    pub flour: f64,
    pub water: f64,
    pub salt: f64,
    pub yeast: f64,
    pub oil: f64,
    pub sugar: f64,
}

impl Default for BakersPercentages {
    fn default() -> Self {
        Self {
            flour: FLOUR_BASIS,
            water: 60.0,
            salt: 2.5,
            yeast: 0.3,
            oil: 0.0,
            sugar: 0.0,
        }
    }
}

/// Flour is always 100% of itself.
pub const FLOUR_BASIS: f64 = 100.0;

impl BakersPercentages {
    pub fn get(&self, ingredient: Ingredient) -> f64 {
        match ingredient {
            Ingredient::Flour => self.flour,
            Ingredient::Water => self.water,
            Ingredient::Salt => self.salt,
            Ingredient::Yeast => self.yeast,
            Ingredient::Oil => self.oil,
            Ingredient::Sugar => self.sugar,
        }
    }

    /// Sum of all percentages, flour included.
    pub fn sum(&self) -> f64 {
        Ingredient::ALL.iter().map(|i| self.get(*i)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ingredient, f64)> + '_ {
        Ingredient::ALL.iter().map(move |i| (*i, self.get(*i)))
    }
}

/// Pre-ferment style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreFermentKind {
    Biga,
    #[default]
    Poolish,
}

impl PreFermentKind {
    /// Typical hydration (%) for this style.
    pub fn default_hydration(self) -> f64 {
        match self {
            PreFermentKind::Biga => 50.0,
            PreFermentKind::Poolish => 100.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PreFermentKind::Biga => "biga",
            PreFermentKind::Poolish => "poolish",
        }
    }
}

impl fmt::Display for PreFermentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-ferment configuration. `percentage` is a share of total flour.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreFerment {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: PreFermentKind,
    pub percentage: f64,
    pub hydration: f64,
}

impl Default for PreFerment {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: PreFermentKind::Poolish,
            percentage: 20.0,
            hydration: PreFermentKind::Poolish.default_hydration(),
        }
    }
}

/// Process timing parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    #[serde(rename = "autolyse")]
    pub autolyse_minutes: f64,
    #[serde(rename = "bulkFerment")]
    pub bulk_ferment_hours: f64,
    #[serde(rename = "ballAndRest")]
    pub ball_and_rest_minutes: f64,
    #[serde(rename = "finalProof")]
    pub final_proof_hours: f64,
    #[serde(rename = "roomTemp")]
    pub room_temp_celsius: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            autolyse_minutes: 30.0,
            bulk_ferment_hours: 24.0,
            ball_and_rest_minutes: 30.0,
            final_proof_hours: 2.0,
            room_temp_celsius: 20.0,
        }
    }
}

/// The working recipe. `Default` is the Classic Neapolitan.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipe {
    pub dough_balls: u32,
    pub ball_weight: f64,
    pub ingredients: BakersPercentages,
    pub pre_ferment: PreFerment,
    pub timing: Timing,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            dough_balls: 4,
            ball_weight: 250.0,
            ingredients: BakersPercentages::default(),
            pre_ferment: PreFerment::default(),
            timing: Timing::default(),
        }
    }
}

impl Recipe {
    /// Name shown for the built-in default.
    pub const DEFAULT_NAME: &'static str = "Classic Neapolitan";

    pub fn total_dough_weight(&self) -> f64 {
        self.dough_balls as f64 * self.ball_weight
    }

    /// The pre-ferment style, only when a pre-ferment is in use.
    pub fn pre_ferment_kind(&self) -> Option<PreFermentKind> {
        self.pre_ferment.enabled.then_some(self.pre_ferment.kind)
    }
}

/// A named, persisted snapshot of a [`Recipe`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedRecipe {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub recipe: Recipe,
}
