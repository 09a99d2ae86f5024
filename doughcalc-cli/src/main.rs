//! `doughcalc` -- pizza dough calculator CLI.
//!
//! Parses flags into recipe edits, runs the formulation engine and schedule
//! deriver on the resulting recipe, and prints tables or JSON. Saved recipes
//! live in a JSON collection file (`--store`).

mod cli;
mod render;

use anyhow::{Context, Result};
use chrono::{Local, NaiveTime};
use clap::Parser;
use doughcalc_core::{
    FileRecipeStore, Ingredient, Recipe, RecipeStore, SavedRecipe, Step, TotalTime, WeightResult,
    compute_weights, derive_for, save_named,
};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{CalcArgs, Cli, Command, DeleteArgs, RecipeArgs, SaveArgs, ShowArgs};

#[derive(Serialize)]
struct BreakdownRow {
    ingredient: Ingredient,
    grams: f64,
}

/// JSON view of one calculation.
#[derive(Serialize)]
struct CalcView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    recipe: &'a Recipe,
    weights: WeightResult,
    final_dough_breakdown: Vec<BreakdownRow>,
    water_deficit_g: Option<f64>,
    schedule: Vec<Step>,
    total_time: TotalTime,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("doughcalc=debug,doughcalc_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Calc(args) => run_calc(&cli, args),
        Command::Save(args) => run_save(&cli, args),
        Command::List => run_list(&cli),
        Command::Show(args) => run_show(&cli, args),
        Command::Delete(args) => run_delete(&cli, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Baseline (default or `--from`) with the flags applied on top.
fn working_recipe(store: &impl RecipeStore, args: &RecipeArgs) -> Result<Recipe> {
    let base = match &args.from {
        Some(id) => {
            store
                .load(id)
                .with_context(|| format!("cannot start from saved recipe {id}"))?
                .recipe
        }
        None => Recipe::default(),
    };
    Ok(base.apply_all(args.edits()))
}

fn parse_start(start: Option<&str>) -> Option<NaiveTime> {
    let hhmm = start?;
    match NaiveTime::parse_from_str(hhmm, "%H:%M") {
        Ok(t) => Some(t),
        Err(err) => {
            warn!(start = hhmm, %err, "ignoring start time, expected HH:MM");
            None
        }
    }
}

fn report(cli: &Cli, recipe: &Recipe, saved: Option<&SavedRecipe>, start: Option<&str>) -> Result<()> {
    let weights = compute_weights(recipe);
    let schedule = derive_for(recipe);
    let total = TotalTime::of(&recipe.timing);

    if cli.json {
        let view = CalcView {
            id: saved.map(|s| s.id.as_str()),
            name: saved.map(|s| s.name.as_str()),
            recipe,
            weights,
            final_dough_breakdown: weights
                .final_dough_breakdown()
                .into_iter()
                .map(|(ingredient, grams)| BreakdownRow { ingredient, grams })
                .collect(),
            water_deficit_g: weights.water_deficit_g(),
            schedule,
            total_time: total,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if let Some(s) = saved {
        println!("{} ({})", s.name, s.id);
    }
    render::print_weights(recipe, &weights);

    let clock = parse_start(start).map(|t| {
        let start = Local::now().date_naive().and_time(t);
        render::clock_times(&schedule, start)
    });
    render::print_schedule(&schedule, total, clock.as_deref());
    println!("\nRoom temperature: {}°C", recipe.timing.room_temp_celsius);
    Ok(())
}

fn run_calc(cli: &Cli, args: &CalcArgs) -> Result<()> {
    let store = FileRecipeStore::open(&cli.store);
    let recipe = working_recipe(&store, &args.recipe)?;
    report(cli, &recipe, None, args.start.as_deref())
}

fn run_show(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let store = FileRecipeStore::open(&cli.store);
    let saved = store
        .load(&args.id)
        .with_context(|| format!("cannot show recipe {}", args.id))?;
    report(cli, &saved.recipe, Some(&saved), args.start.as_deref())
}

fn run_save(cli: &Cli, args: &SaveArgs) -> Result<()> {
    let mut store = FileRecipeStore::open(&cli.store);
    let recipe = working_recipe(&store, &args.recipe)?;
    let saved = save_named(&mut store, &args.name, &recipe)
        .with_context(|| format!("failed to save to {}", store.path().display()))?;

    match (saved, cli.json) {
        (Some(s), true) => println!("{}", serde_json::to_string_pretty(&s)?),
        (Some(s), false) => println!("Saved \"{}\" as {}", s.name, s.id),
        (None, true) => println!("{}", serde_json::json!({ "saved": false })),
        (None, false) => println!("Recipe name is empty; nothing saved."),
    }
    Ok(())
}

fn run_list(cli: &Cli) -> Result<()> {
    let store = FileRecipeStore::open(&cli.store);
    let recipes = store.list()?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        render::print_saved(&recipes);
    }
    Ok(())
}

fn run_delete(cli: &Cli, args: &DeleteArgs) -> Result<()> {
    let mut store = FileRecipeStore::open(&cli.store);
    let deleted = store
        .delete(&args.id)
        .with_context(|| format!("failed to update {}", store.path().display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "id": args.id, "deleted": deleted })
        );
    } else if deleted {
        println!("Deleted {}", args.id);
    } else {
        println!("No saved recipe with id {}", args.id);
    }
    Ok(())
}
