//! Human-readable output. Rounding happens here and nowhere else.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets::UTF8_FULL};
use doughcalc_core::{Ingredient, Recipe, SavedRecipe, Step, StepKind, TotalTime, WeightResult};

pub fn fmt_g(x: f64) -> String {
    let v = (x * 10.0).round() / 10.0;
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0} g", v)
    } else {
        format!("{:.1} g", v)
    }
}

pub fn fmt_pct(x: f64) -> String {
    let s = format!("{:.2}", x);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{s}%")
}

fn table(header: [&str; 3]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(Vec::from(
            header.map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        ));
    table
}

pub fn print_weights(recipe: &Recipe, w: &WeightResult) {
    let mut totals = table(["Ingredient", "Amount", "Baker's %"]);
    for ingredient in Ingredient::ALL {
        let pct = recipe.ingredients.get(ingredient);
        if ingredient != Ingredient::Flour && pct == 0.0 {
            continue;
        }
        totals.add_row(vec![
            Cell::new(ingredient),
            Cell::new(fmt_g(w.totals.get(ingredient))),
            Cell::new(fmt_pct(pct)),
        ]);
    }
    totals.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(fmt_g(w.total_dough_g)).add_attribute(Attribute::Bold),
        Cell::new(format!("H={}", fmt_pct(w.total_hydration_pct))),
    ]);

    println!("\n=== Ingredients summary ===");
    println!(
        "For {} dough balls at {} each",
        recipe.dough_balls,
        fmt_g(recipe.ball_weight)
    );
    println!("{}", totals);

    let pre_ferment = recipe.pre_ferment_kind().filter(|_| w.pre_ferment.total_g > 0.0);
    if let Some(kind) = pre_ferment {
        let mut pf = table(["Ingredient", "Amount", "Notes"]);
        pf.add_row(vec![
            Cell::new("Flour"),
            Cell::new(fmt_g(w.pre_ferment.flour_g)),
            Cell::new(format!("{} of total flour", fmt_pct(recipe.pre_ferment.percentage))),
        ]);
        pf.add_row(vec![
            Cell::new("Water"),
            Cell::new(fmt_g(w.pre_ferment.water_g)),
            Cell::new(format!("{} hydration", fmt_pct(recipe.pre_ferment.hydration))),
        ]);
        pf.add_row(vec![
            Cell::new("Yeast"),
            Cell::new(fmt_g(w.pre_ferment.yeast_g)),
            Cell::new("all of the recipe's yeast"),
        ]);
        pf.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(fmt_g(w.pre_ferment.total_g)).add_attribute(Attribute::Bold),
            Cell::new(""),
        ]);
        println!("\n=== {} ===", capitalize(kind.as_str()));
        println!("{}", pf);
    }

    let mut mix = table(["Ingredient", "Amount", "Notes"]);
    for (ingredient, grams) in w.final_dough_breakdown() {
        let note = match (ingredient, pre_ferment) {
            (Ingredient::Flour | Ingredient::Water, Some(_)) => "remaining",
            _ => "",
        };
        mix.add_row(vec![Cell::new(ingredient), Cell::new(fmt_g(grams)), Cell::new(note)]);
    }
    if let Some(kind) = pre_ferment {
        mix.add_row(vec![
            Cell::new(capitalize(kind.as_str())),
            Cell::new(fmt_g(w.pre_ferment.total_g)),
            Cell::new("all of it"),
        ]);
    }
    println!("\n=== Final dough mix ===");
    println!("{}", mix);

    if let Some(deficit) = w.water_deficit_g() {
        println!(
            "\nWarning: the pre-ferment needs {} more water than the whole recipe has. \
             Raise the water % or lower the pre-ferment share/hydration.",
            fmt_g(deficit)
        );
    }
}

/// End time of each step when the process starts at `start`.
///
/// Steps without a duration end when the previous one did; the day-before
/// pre-ferment block gets no time.
pub fn clock_times(steps: &[Step], start: NaiveDateTime) -> Vec<Option<NaiveTime>> {
    let mut at = start;
    steps
        .iter()
        .map(|step| {
            if step.kind == StepKind::DayBefore {
                return None;
            }
            if let Some(d) = step.duration {
                at += Duration::minutes((d.as_hours() * 60.0).round() as i64);
            }
            Some(at.time())
        })
        .collect()
}

pub fn print_schedule(steps: &[Step], total: TotalTime, clock: Option<&[Option<NaiveTime>]>) {
    println!("\n=== Timeline ===");
    for (i, step) in steps.iter().enumerate() {
        let marker = match step.number {
            Some(n) => format!("{n}."),
            None => "-".to_string(),
        };
        let duration = step
            .duration
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();
        let end = clock
            .and_then(|c| c.get(i).copied().flatten())
            .map(|t| format!(" → ~{:02}:{:02}", t.hour(), t.minute()))
            .unwrap_or_default();
        println!("{marker} {}{duration}{end}", step.title);
        for line in &step.guidance {
            println!("   • {line}");
        }
    }
    println!("\nTotal time: {total}");
}

pub fn print_saved(recipes: &[SavedRecipe]) {
    if recipes.is_empty() {
        println!("No saved recipes.");
        return;
    }
    let mut t = Table::new();
    t.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(Vec::from(
            ["ID", "Name", "Balls", "Hydration", "Pre-ferment"]
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        ));
    for saved in recipes {
        let r = &saved.recipe;
        let pre_ferment = match r.pre_ferment_kind() {
            Some(kind) => format!("{} {}", fmt_pct(r.pre_ferment.percentage), kind),
            None => "none".to_string(),
        };
        t.add_row(vec![
            Cell::new(&saved.id),
            Cell::new(&saved.name),
            Cell::new(format!("{} × {}", r.dough_balls, fmt_g(r.ball_weight))),
            Cell::new(fmt_pct(r.ingredients.water)),
            Cell::new(pre_ferment),
        ]);
    }
    println!("{}", t);
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use doughcalc_core::{PreFermentKind, Timing, derive_schedule};

    #[test]
    fn grams_drop_trailing_zero() {
        assert_eq!(fmt_g(368.04), "368 g");
        assert_eq!(fmt_g(15.36), "15.4 g");
    }

    #[test]
    fn percent_is_trimmed() {
        assert_eq!(fmt_pct(60.0), "60%");
        assert_eq!(fmt_pct(2.5), "2.5%");
        assert_eq!(fmt_pct(0.25), "0.25%");
    }

    #[test]
    fn clock_times_follow_durations() {
        let timing = Timing {
            autolyse_minutes: 30.0,
            bulk_ferment_hours: 2.0,
            ball_and_rest_minutes: 30.0,
            final_proof_hours: 1.5,
            room_temp_celsius: 20.0,
        };
        let steps = derive_schedule(&timing, Some(PreFermentKind::Poolish), 4);
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0);
        assert_eq!(
            clock_times(&steps, start),
            vec![
                None,
                hm(10, 30),
                hm(10, 30),
                hm(12, 30),
                hm(13, 0),
                hm(14, 30),
                hm(14, 30),
            ]
        );
    }
}
