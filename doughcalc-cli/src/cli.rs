use clap::{Args, Parser, Subcommand, ValueEnum};
use doughcalc_core::{Ingredient, PreFermentKind, RecipeEdit, TimingPreset};
use std::path::PathBuf;

/// Pre-ferment CLI enum mirrors doughcalc-core (derive for Clap).
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PreFermentFlag {
    Biga,
    Poolish,
}

impl From<PreFermentFlag> for PreFermentKind {
    fn from(p: PreFermentFlag) -> Self {
        match p {
            PreFermentFlag::Biga => PreFermentKind::Biga,
            PreFermentFlag::Poolish => PreFermentKind::Poolish,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PresetFlag {
    /// 30 min autolyse, 2 h bulk, 30 min ball & rest, 2 h proof
    SameDay,
    /// 30 min autolyse, 24 h cold bulk, 30 min ball & rest, 2 h proof
    ColdFerment,
    /// 60 min autolyse, 48 h cold bulk, 60 min ball & rest, 3 h proof
    LongCold,
}

impl From<PresetFlag> for TimingPreset {
    fn from(p: PresetFlag) -> Self {
        match p {
            PresetFlag::SameDay => TimingPreset::SameDay,
            PresetFlag::ColdFerment => TimingPreset::ColdFerment,
            PresetFlag::LongCold => TimingPreset::LongCold,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "doughcalc",
    about = "Pizza dough calculator: baker's percentages, biga/poolish and process timeline.",
    version
)]
pub struct Cli {
    /// Saved recipe collection (JSON)
    #[arg(
        long,
        global = true,
        env = "DOUGHCALC_STORE",
        default_value = "doughcalc-recipes.json"
    )]
    pub store: PathBuf,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate ingredient weights and the process timeline
    Calc(CalcArgs),
    /// Save the recipe under a name
    Save(SaveArgs),
    /// List saved recipes
    List,
    /// Calculate a saved recipe
    Show(ShowArgs),
    /// Delete a saved recipe
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct CalcArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Start time HH:MM; annotates each step with its end time
    #[arg(long)]
    pub start: Option<String>,
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Recipe name
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub recipe: RecipeArgs,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Saved recipe id
    pub id: String,

    /// Start time HH:MM; annotates each step with its end time
    #[arg(long)]
    pub start: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Saved recipe id
    pub id: String,
}

/// Recipe fields. Unset flags keep the baseline value (default recipe or `--from`).
#[derive(Args, Debug, Default)]
pub struct RecipeArgs {
    /// Start from a saved recipe instead of the Classic Neapolitan
    #[arg(long, value_name = "ID")]
    pub from: Option<String>,

    /// Number of dough balls (1–20)
    #[arg(long)]
    pub balls: Option<u32>,

    /// Dough ball weight in grams (50–500)
    #[arg(long)]
    pub ball_weight: Option<f64>,

    /// Water, % of flour
    #[arg(long)]
    pub water: Option<f64>,

    /// Salt, % of flour
    #[arg(long)]
    pub salt: Option<f64>,

    /// Yeast, % of flour
    #[arg(long)]
    pub yeast: Option<f64>,

    /// Oil, % of flour
    #[arg(long)]
    pub oil: Option<f64>,

    /// Sugar, % of flour
    #[arg(long)]
    pub sugar: Option<f64>,

    /// Use a pre-ferment (sets its default hydration)
    #[arg(long, value_enum)]
    pub preferment: Option<PreFermentFlag>,

    /// Disable the pre-ferment
    #[arg(long, conflicts_with = "preferment")]
    pub no_preferment: bool,

    /// Pre-ferment share of total flour, % (5–50)
    #[arg(long)]
    pub preferment_pct: Option<f64>,

    /// Pre-ferment hydration, % (30–150)
    #[arg(long)]
    pub preferment_hydration: Option<f64>,

    /// Timing preset, applied before the individual timing flags
    #[arg(long, value_enum)]
    pub preset: Option<PresetFlag>,

    /// Autolyse in minutes (0 = skip)
    #[arg(long)]
    pub autolyse: Option<f64>,

    /// Bulk ferment in hours
    #[arg(long)]
    pub bulk: Option<f64>,

    /// Ball & rest in minutes
    #[arg(long)]
    pub ball_rest: Option<f64>,

    /// Final proof in hours
    #[arg(long)]
    pub proof: Option<f64>,

    /// Room temperature in °C
    #[arg(long)]
    pub room_temp: Option<f64>,
}

impl RecipeArgs {
    /// Flags as recipe edits, in the order they must be applied.
    ///
    /// Style before preset, preset before the individual pre-ferment and
    /// timing flags, so explicit values always win.
    pub fn edits(&self) -> Vec<RecipeEdit> {
        let style = self.preferment.map(PreFermentKind::from);
        let pct = |ingredient, value: Option<f64>| {
            value.map(|v| RecipeEdit::Percentage(ingredient, v))
        };
        [
            self.ball_weight.map(RecipeEdit::BallWeight),
            pct(Ingredient::Water, self.water),
            pct(Ingredient::Salt, self.salt),
            pct(Ingredient::Yeast, self.yeast),
            pct(Ingredient::Oil, self.oil),
            pct(Ingredient::Sugar, self.sugar),
            self.balls.map(RecipeEdit::DoughBalls),
            style.map(|_| RecipeEdit::PreFermentEnabled(true)),
            style.map(RecipeEdit::PreFermentKind),
            self.no_preferment.then_some(RecipeEdit::PreFermentEnabled(false)),
            self.preset.map(|p| RecipeEdit::Preset(p.into())),
            self.preferment_pct.map(RecipeEdit::PreFermentPercentage),
            self.preferment_hydration.map(RecipeEdit::PreFermentHydration),
            self.autolyse.map(RecipeEdit::AutolyseMinutes),
            self.bulk.map(RecipeEdit::BulkFermentHours),
            self.ball_rest.map(RecipeEdit::BallAndRestMinutes),
            self.proof.map(RecipeEdit::FinalProofHours),
            self.room_temp.map(RecipeEdit::RoomTempCelsius),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doughcalc_core::Recipe;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_flags_override_preset_and_style() {
        let args = RecipeArgs {
            preferment: Some(PreFermentFlag::Biga),
            preferment_hydration: Some(60.0),
            preset: Some(PresetFlag::SameDay),
            bulk: Some(3.0),
            ..Default::default()
        };
        let r = Recipe::default().apply_all(args.edits());
        assert!(r.pre_ferment.enabled);
        assert_eq!(r.pre_ferment.hydration, 60.0);
        assert_eq!(r.timing.bulk_ferment_hours, 3.0);
        assert_eq!(r.timing.final_proof_hours, 2.0);
    }

    #[test]
    fn edits_come_out_in_application_order() {
        let args = RecipeArgs {
            room_temp: Some(22.0),
            preset: Some(PresetFlag::LongCold),
            preferment: Some(PreFermentFlag::Poolish),
            balls: Some(6),
            salt: Some(3.0),
            ..Default::default()
        };
        assert_eq!(
            args.edits(),
            vec![
                RecipeEdit::Percentage(Ingredient::Salt, 3.0),
                RecipeEdit::DoughBalls(6),
                RecipeEdit::PreFermentEnabled(true),
                RecipeEdit::PreFermentKind(PreFermentKind::Poolish),
                RecipeEdit::Preset(TimingPreset::LongCold),
                RecipeEdit::RoomTempCelsius(22.0),
            ]
        );
    }

    #[test]
    fn no_flags_no_edits() {
        assert!(RecipeArgs::default().edits().is_empty());
    }
}
