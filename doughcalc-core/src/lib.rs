//! Pizza dough formulation.
//!
//! Turns baker's percentages, a target yield and an optional pre-ferment
//! (biga/poolish) into ingredient weights, and timing parameters into a
//! step-by-step process schedule. Both computations are pure functions of a
//! [`Recipe`] value; saved recipes live behind the [`RecipeStore`] trait.

pub mod input;
pub mod recipe;
pub mod schedule;
pub mod store;
pub mod weights;

pub use input::{RecipeEdit, TimingPreset, sanitize};
pub use recipe::{
    BakersPercentages, Ingredient, PreFerment, PreFermentKind, Recipe, SavedRecipe, Timing,
};
pub use schedule::{
    Step, StepDuration, StepKind, TimeTier, TotalTime, derive_for, derive_schedule,
    total_time_hours,
};
pub use store::{
    FileRecipeStore, MemoryRecipeStore, RecipeStore, StoreError, StoreResult, save_named,
};
pub use weights::{IngredientWeights, PreFermentWeights, WeightResult, compute_weights};

#[inline]
pub(crate) fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
