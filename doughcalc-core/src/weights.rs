//! Formulation engine: baker's percentages + target yield -> grams.

use crate::recipe::{FLOUR_BASIS, Ingredient, Recipe};
use serde::Serialize;

/// Display precision for weights (grams). Used only to decide what to show.
pub const DISPLAY_STEP_G: f64 = 0.1;

/// Absolute weight per ingredient (grams).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngredientWeights {
    pub flour_g: f64,
    pub water_g: f64,
    pub salt_g: f64,
    pub yeast_g: f64,
    pub oil_g: f64,
    pub sugar_g: f64,
}

impl IngredientWeights {
    pub fn get(&self, ingredient: Ingredient) -> f64 {
        match ingredient {
            Ingredient::Flour => self.flour_g,
            Ingredient::Water => self.water_g,
            Ingredient::Salt => self.salt_g,
            Ingredient::Yeast => self.yeast_g,
            Ingredient::Oil => self.oil_g,
            Ingredient::Sugar => self.sugar_g,
        }
    }

    pub fn sum(&self) -> f64 {
        Ingredient::ALL.iter().map(|i| self.get(*i)).sum()
    }
}

/// The pre-ferment portion (grams). All zero when no pre-ferment is used.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct PreFermentWeights {
    pub flour_g: f64,
    pub water_g: f64,
    pub yeast_g: f64,
    pub total_g: f64,
}

/// Output of [`compute_weights`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct WeightResult {
    pub total_dough_g: f64,
    /// Whole-recipe weights, pre-ferment included.
    pub totals: IngredientWeights,
    pub pre_ferment: PreFermentWeights,
    /// What goes into the final mix besides the pre-ferment.
    pub final_dough: IngredientWeights,
    pub total_hydration_pct: f64,
}

impl WeightResult {
    pub fn total_flour_g(&self) -> f64 {
        self.totals.flour_g
    }

    /// Final-dough ingredients worth showing, in fixed order.
    ///
    /// An ingredient whose weight rounds to zero at [`DISPLAY_STEP_G`] is left
    /// out; it still counts towards the totals.
    pub fn final_dough_breakdown(&self) -> Vec<(Ingredient, f64)> {
        Ingredient::ALL
            .iter()
            .map(|i| (*i, self.final_dough.get(*i)))
            .filter(|(_, g)| (g / DISPLAY_STEP_G).round() != 0.0)
            .collect()
    }

    /// Grams of water the pre-ferment needs beyond the whole recipe's water.
    ///
    /// `Some` means the final-dough water is negative and the recipe cannot be
    /// mixed as written.
    pub fn water_deficit_g(&self) -> Option<f64> {
        (self.final_dough.water_g < 0.0).then(|| -self.final_dough.water_g)
    }
}

/// Compute absolute weights for `recipe`.
///
/// Ingredient weights are normalized so that they sum to the target dough
/// weight. With a pre-ferment, `percentage` is taken from the total flour and
/// all yeast moves into the pre-ferment.
///
/// The recipe must already be within range (see [`crate::input`]).
pub fn compute_weights(recipe: &Recipe) -> WeightResult {
    let pct = &recipe.ingredients;
    let total_dough = recipe.total_dough_weight();
    let flour = total_dough * (pct.flour / pct.sum());
    let of_flour = |p: f64| flour * p / FLOUR_BASIS;

    let totals = IngredientWeights {
        flour_g: flour,
        water_g: of_flour(pct.water),
        salt_g: of_flour(pct.salt),
        yeast_g: of_flour(pct.yeast),
        oil_g: of_flour(pct.oil),
        sugar_g: of_flour(pct.sugar),
    };

    let (pre_ferment, final_dough) = if recipe.pre_ferment.enabled {
        let pf_flour = flour * recipe.pre_ferment.percentage / 100.0;
        let pf_water = pf_flour * recipe.pre_ferment.hydration / 100.0;
        let pf_yeast = totals.yeast_g;
        (
            PreFermentWeights {
                flour_g: pf_flour,
                water_g: pf_water,
                yeast_g: pf_yeast,
                total_g: pf_flour + pf_water + pf_yeast,
            },
            IngredientWeights {
                flour_g: totals.flour_g - pf_flour,
                water_g: totals.water_g - pf_water,
                yeast_g: 0.0,
                ..totals
            },
        )
    } else {
        (PreFermentWeights::default(), totals)
    };

    WeightResult {
        total_dough_g: total_dough,
        totals,
        pre_ferment,
        final_dough,
        total_hydration_pct: totals.water_g / totals.flour_g * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RecipeEdit;
    use crate::recipe::PreFermentKind;
    use approx::assert_relative_eq;

    fn neapolitan() -> Recipe {
        Recipe::default()
    }

    fn with_poolish() -> Recipe {
        neapolitan().apply_all([
            RecipeEdit::PreFermentEnabled(true),
            RecipeEdit::PreFermentKind(PreFermentKind::Poolish),
            RecipeEdit::PreFermentPercentage(20.0),
        ])
    }

    #[test]
    fn test_direct_dough_scenario() {
        let w = compute_weights(&neapolitan());
        assert_relative_eq!(w.total_dough_g, 1000.0);
        // 1000 g * 100 / 162.8
        assert_relative_eq!(w.total_flour_g(), 614.25, epsilon = 0.01);
        assert_relative_eq!(w.total_flour_g(), 613.5, epsilon = 1.0);
        assert_relative_eq!(w.totals.water_g, 368.1, epsilon = 1.0);
        assert_relative_eq!(w.totals.salt_g, 15.3, epsilon = 0.1);
        assert_relative_eq!(w.totals.yeast_g, 1.8, epsilon = 0.1);
        assert_relative_eq!(w.total_hydration_pct, 60.0, epsilon = 1e-9);
        assert_eq!(w.pre_ferment, PreFermentWeights::default());
        assert_eq!(w.final_dough, w.totals);
    }

    #[test]
    fn test_poolish_split() {
        let w = compute_weights(&with_poolish());
        let flour = w.total_flour_g();
        assert_relative_eq!(w.pre_ferment.flour_g, flour * 0.20, epsilon = 1e-9);
        assert_relative_eq!(w.pre_ferment.water_g, w.pre_ferment.flour_g, epsilon = 1e-9);
        assert_relative_eq!(w.pre_ferment.yeast_g, w.totals.yeast_g, epsilon = 1e-12);
        assert_eq!(w.final_dough.yeast_g, 0.0);
        assert_relative_eq!(w.final_dough.flour_g, flour * 0.80, epsilon = 1e-9);
        assert_relative_eq!(w.final_dough.salt_g, w.totals.salt_g);
    }

    #[test]
    fn test_biga_uses_lower_hydration() {
        let r = with_poolish().apply(RecipeEdit::PreFermentKind(PreFermentKind::Biga));
        let w = compute_weights(&r);
        assert_relative_eq!(w.pre_ferment.water_g, w.pre_ferment.flour_g * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_parts_sum_to_target() {
        let recipes = [
            neapolitan(),
            with_poolish(),
            with_poolish().apply_all([
                RecipeEdit::DoughBalls(7),
                RecipeEdit::BallWeight(285.0),
                RecipeEdit::Percentage(Ingredient::Water, 72.0),
                RecipeEdit::Percentage(Ingredient::Oil, 3.0),
                RecipeEdit::Percentage(Ingredient::Sugar, 1.5),
                RecipeEdit::PreFermentPercentage(45.0),
                RecipeEdit::PreFermentHydration(70.0),
            ]),
        ];
        for r in recipes {
            let w = compute_weights(&r);
            let parts = w.final_dough.sum() + w.pre_ferment.total_g;
            assert_relative_eq!(parts, w.total_dough_g, max_relative = 1e-6);
            assert_relative_eq!(w.totals.sum(), w.total_dough_g, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let r = with_poolish();
        assert_eq!(compute_weights(&r), compute_weights(&r));
    }

    #[test]
    fn test_toggle_round_trip() {
        let on = with_poolish();
        let off = on.apply(RecipeEdit::PreFermentEnabled(false));
        let back = off.apply(RecipeEdit::PreFermentEnabled(true));
        assert_eq!(compute_weights(&off).final_dough, compute_weights(&off).totals);
        assert_eq!(compute_weights(&on), compute_weights(&back));
    }

    #[test]
    fn test_breakdown_skips_zero_weights() {
        let w = compute_weights(&with_poolish());
        let shown: Vec<Ingredient> = w.final_dough_breakdown().into_iter().map(|(i, _)| i).collect();
        assert_eq!(
            shown,
            vec![Ingredient::Flour, Ingredient::Water, Ingredient::Salt]
        );

        let oily = neapolitan().apply(RecipeEdit::Percentage(Ingredient::Oil, 2.0));
        let shown = compute_weights(&oily).final_dough_breakdown();
        assert!(shown.iter().any(|(i, _)| *i == Ingredient::Oil));
        assert!(shown.iter().any(|(i, _)| *i == Ingredient::Yeast));
    }

    #[test]
    fn test_water_deficit_reported() {
        let dry = with_poolish().apply_all([
            RecipeEdit::Percentage(Ingredient::Water, 55.0),
            RecipeEdit::PreFermentPercentage(50.0),
            RecipeEdit::PreFermentHydration(150.0),
        ]);
        let w = compute_weights(&dry);
        let deficit = w.water_deficit_g().expect("pre-ferment needs more water than the recipe has");
        assert_relative_eq!(deficit, w.pre_ferment.water_g - w.totals.water_g, epsilon = 1e-9);
        assert_eq!(compute_weights(&with_poolish()).water_deficit_g(), None);
    }
}
