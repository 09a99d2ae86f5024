//! Input boundary.
//!
//! Every edit to the working recipe goes through [`Recipe::apply`], which
//! returns a new recipe with the edited field forced into its documented
//! range. Non-finite values keep the previous value, out-of-range values
//! snap to the nearest bound. Nothing here fails: the engine downstream
//! can rely on a well-formed recipe.

use crate::clamp;
use crate::recipe::{FLOUR_BASIS, Ingredient, PreFermentKind, Recipe, Timing};
use tracing::debug;

/// Inclusive range accepted for a numeric field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Fit `value` into range, falling back to `previous` when it is not a number.
    pub fn fit(self, field: &'static str, value: f64, previous: f64) -> f64 {
        if !value.is_finite() {
            debug!(field, value, previous, "rejected non-finite input");
            return previous;
        }
        let fitted = clamp(value, self.min, self.max);
        if fitted != value {
            debug!(field, value, fitted, "clamped input");
        }
        fitted
    }
}

pub const DOUGH_BALLS: (u32, u32) = (1, 20);
pub const BALL_WEIGHT: Bounds = Bounds::new(50.0, 500.0);
pub const WATER_PCT: Bounds = Bounds::new(45.0, 85.0);
pub const SALT_PCT: Bounds = Bounds::new(1.0, 4.0);
pub const YEAST_PCT: Bounds = Bounds::new(0.1, 2.0);
pub const OIL_PCT: Bounds = Bounds::new(0.0, 10.0);
pub const SUGAR_PCT: Bounds = Bounds::new(0.0, 5.0);
pub const PRE_FERMENT_PCT: Bounds = Bounds::new(5.0, 50.0);
pub const PRE_FERMENT_HYDRATION: Bounds = Bounds::new(30.0, 150.0);
pub const AUTOLYSE_MIN: Bounds = Bounds::new(0.0, 120.0);
pub const BULK_FERMENT_H: Bounds = Bounds::new(1.0, 72.0);
pub const BALL_AND_REST_MIN: Bounds = Bounds::new(15.0, 180.0);
pub const FINAL_PROOF_H: Bounds = Bounds::new(0.5, 8.0);
pub const ROOM_TEMP_C: Bounds = Bounds::new(15.0, 30.0);

impl Ingredient {
    /// Accepted baker's percentage range. Flour is pinned to the basis.
    pub fn bounds(self) -> Bounds {
        match self {
            Ingredient::Flour => Bounds::new(FLOUR_BASIS, FLOUR_BASIS),
            Ingredient::Water => WATER_PCT,
            Ingredient::Salt => SALT_PCT,
            Ingredient::Yeast => YEAST_PCT,
            Ingredient::Oil => OIL_PCT,
            Ingredient::Sugar => SUGAR_PCT,
        }
    }
}

/// Quick timing presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimingPreset {
    /// ~6 h, mix to bake on the same day.
    SameDay,
    /// 24 h cold bulk.
    ColdFerment,
    /// 48 h cold bulk.
    LongCold,
}

impl TimingPreset {
    /// Apply the preset on top of `timing`; room temperature is kept.
    pub fn apply(self, timing: Timing) -> Timing {
        let (autolyse, bulk, ball_rest, proof) = match self {
            TimingPreset::SameDay => (30.0, 2.0, 30.0, 2.0),
            TimingPreset::ColdFerment => (30.0, 24.0, 30.0, 2.0),
            TimingPreset::LongCold => (60.0, 48.0, 60.0, 3.0),
        };
        Timing {
            autolyse_minutes: autolyse,
            bulk_ferment_hours: bulk,
            ball_and_rest_minutes: ball_rest,
            final_proof_hours: proof,
            ..timing
        }
    }
}

/// A single user edit to the working recipe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RecipeEdit {
    DoughBalls(u32),
    BallWeight(f64),
    /// Baker's percentage for one ingredient. Flour edits are ignored.
    Percentage(Ingredient, f64),
    PreFermentEnabled(bool),
    /// Also resets the pre-ferment hydration to the style's default.
    PreFermentKind(PreFermentKind),
    PreFermentPercentage(f64),
    PreFermentHydration(f64),
    AutolyseMinutes(f64),
    BulkFermentHours(f64),
    BallAndRestMinutes(f64),
    FinalProofHours(f64),
    RoomTempCelsius(f64),
    Preset(TimingPreset),
    /// Back to the built-in default recipe.
    Reset,
}

impl Recipe {
    /// Returns a new recipe with `edit` applied.
    pub fn apply(&self, edit: RecipeEdit) -> Recipe {
        let mut next = *self;
        match edit {
            RecipeEdit::DoughBalls(n) => {
                next.dough_balls = clamp(n, DOUGH_BALLS.0, DOUGH_BALLS.1);
            }
            RecipeEdit::BallWeight(g) => {
                next.ball_weight = BALL_WEIGHT.fit("ball_weight", g, self.ball_weight);
            }
            RecipeEdit::Percentage(ingredient, pct) => {
                let previous = self.ingredients.get(ingredient);
                let slot = match ingredient {
                    Ingredient::Flour => {
                        debug!("flour percentage is fixed, edit ignored");
                        return next;
                    }
                    Ingredient::Water => &mut next.ingredients.water,
                    Ingredient::Salt => &mut next.ingredients.salt,
                    Ingredient::Yeast => &mut next.ingredients.yeast,
                    Ingredient::Oil => &mut next.ingredients.oil,
                    Ingredient::Sugar => &mut next.ingredients.sugar,
                };
                *slot = ingredient.bounds().fit(ingredient.label(), pct, previous);
            }
            RecipeEdit::PreFermentEnabled(on) => next.pre_ferment.enabled = on,
            RecipeEdit::PreFermentKind(kind) => {
                next.pre_ferment.kind = kind;
                next.pre_ferment.hydration = kind.default_hydration();
            }
            RecipeEdit::PreFermentPercentage(pct) => {
                next.pre_ferment.percentage =
                    PRE_FERMENT_PCT.fit("pre_ferment_pct", pct, self.pre_ferment.percentage);
            }
            RecipeEdit::PreFermentHydration(pct) => {
                next.pre_ferment.hydration = PRE_FERMENT_HYDRATION.fit(
                    "pre_ferment_hydration",
                    pct,
                    self.pre_ferment.hydration,
                );
            }
            RecipeEdit::AutolyseMinutes(m) => {
                next.timing.autolyse_minutes =
                    AUTOLYSE_MIN.fit("autolyse", m, self.timing.autolyse_minutes);
            }
            RecipeEdit::BulkFermentHours(h) => {
                next.timing.bulk_ferment_hours =
                    BULK_FERMENT_H.fit("bulk_ferment", h, self.timing.bulk_ferment_hours);
            }
            RecipeEdit::BallAndRestMinutes(m) => {
                next.timing.ball_and_rest_minutes =
                    BALL_AND_REST_MIN.fit("ball_and_rest", m, self.timing.ball_and_rest_minutes);
            }
            RecipeEdit::FinalProofHours(h) => {
                next.timing.final_proof_hours =
                    FINAL_PROOF_H.fit("final_proof", h, self.timing.final_proof_hours);
            }
            RecipeEdit::RoomTempCelsius(c) => {
                next.timing.room_temp_celsius =
                    ROOM_TEMP_C.fit("room_temp", c, self.timing.room_temp_celsius);
            }
            RecipeEdit::Preset(preset) => next.timing = preset.apply(self.timing),
            RecipeEdit::Reset => next = Recipe::default(),
        }
        next
    }

    /// Applies edits in order.
    pub fn apply_all<I>(&self, edits: I) -> Recipe
    where
        I: IntoIterator<Item = RecipeEdit>,
    {
        edits.into_iter().fold(*self, |r, e| r.apply(e))
    }
}

/// Force an externally supplied recipe (e.g. loaded from storage) into range.
///
/// Values that are not numbers take the default recipe's value.
pub fn sanitize(recipe: Recipe) -> Recipe {
    let d = Recipe::default();
    let ing = recipe.ingredients;
    let pf = recipe.pre_ferment;
    let t = recipe.timing;

    let mut out = recipe;
    out.dough_balls = clamp(recipe.dough_balls, DOUGH_BALLS.0, DOUGH_BALLS.1);
    out.ball_weight = BALL_WEIGHT.fit("ball_weight", recipe.ball_weight, d.ball_weight);

    out.ingredients.flour = FLOUR_BASIS;
    out.ingredients.water = WATER_PCT.fit("water", ing.water, d.ingredients.water);
    out.ingredients.salt = SALT_PCT.fit("salt", ing.salt, d.ingredients.salt);
    out.ingredients.yeast = YEAST_PCT.fit("yeast", ing.yeast, d.ingredients.yeast);
    out.ingredients.oil = OIL_PCT.fit("oil", ing.oil, d.ingredients.oil);
    out.ingredients.sugar = SUGAR_PCT.fit("sugar", ing.sugar, d.ingredients.sugar);

    out.pre_ferment.percentage =
        PRE_FERMENT_PCT.fit("pre_ferment_pct", pf.percentage, d.pre_ferment.percentage);
    out.pre_ferment.hydration = PRE_FERMENT_HYDRATION.fit(
        "pre_ferment_hydration",
        pf.hydration,
        pf.kind.default_hydration(),
    );

    out.timing = Timing {
        autolyse_minutes: AUTOLYSE_MIN.fit("autolyse", t.autolyse_minutes, d.timing.autolyse_minutes),
        bulk_ferment_hours: BULK_FERMENT_H.fit(
            "bulk_ferment",
            t.bulk_ferment_hours,
            d.timing.bulk_ferment_hours,
        ),
        ball_and_rest_minutes: BALL_AND_REST_MIN.fit(
            "ball_and_rest",
            t.ball_and_rest_minutes,
            d.timing.ball_and_rest_minutes,
        ),
        final_proof_hours: FINAL_PROOF_H.fit(
            "final_proof",
            t.final_proof_hours,
            d.timing.final_proof_hours,
        ),
        room_temp_celsius: ROOM_TEMP_C.fit("room_temp", t.room_temp_celsius, d.timing.room_temp_celsius),
    };
    out
}
