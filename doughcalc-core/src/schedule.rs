//! Process schedule derived from timing parameters.
//!
//! [`derive_schedule`] is recomputed from scratch on every change. Only the
//! process steps (autolyse through final proof) are numbered; the day-before
//! pre-ferment block and the final "ready" marker are not.

use crate::recipe::{PreFermentKind, Recipe, Timing};
use serde::Serialize;
use std::fmt;

/// Bulk ferments at or above this many hours go in the fridge.
pub const COLD_BULK_HOURS: f64 = 12.0;
/// Bulk ferments below this many hours get stretch-and-folds.
pub const SHORT_BULK_HOURS: f64 = 4.0;
/// Final proofs at or above this many hours may be done in the fridge.
pub const SLOW_PROOF_HOURS: f64 = 4.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    DayBefore,
    Autolyse,
    MixFinalDough,
    BulkFerment,
    BallAndRest,
    FinalProof,
    Ready,
}

impl StepKind {
    pub fn title(self) -> &'static str {
        match self {
            StepKind::DayBefore => "Day Before (Pre-ferment)",
            StepKind::Autolyse => "Autolyse",
            StepKind::MixFinalDough => "Mix Final Dough",
            StepKind::BulkFerment => "Bulk Ferment",
            StepKind::BallAndRest => "Ball & Rest",
            StepKind::FinalProof => "Final Proof",
            StepKind::Ready => "Ready to Stretch & Bake!",
        }
    }

    fn is_numbered(self) -> bool {
        !matches!(self, StepKind::DayBefore | StepKind::Ready)
    }
}

/// How long a step takes, in the unit it is entered in.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum StepDuration {
    Minutes(f64),
    Hours(f64),
}

impl StepDuration {
    pub fn as_hours(self) -> f64 {
        match self {
            StepDuration::Minutes(m) => m / 60.0,
            StepDuration::Hours(h) => h,
        }
    }
}

impl fmt::Display for StepDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StepDuration::Minutes(m) => write!(f, "{} min", trim_number(m)),
            StepDuration::Hours(h) => write!(f, "{} h", trim_number(h)),
        }
    }
}

fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    pub kind: StepKind,
    /// Sequential number among process steps, `None` for unnumbered markers.
    pub number: Option<u32>,
    pub title: &'static str,
    pub duration: Option<StepDuration>,
    pub guidance: Vec<String>,
}

/// Derive the ordered step list. At most seven steps are produced.
pub fn derive_schedule(
    timing: &Timing,
    pre_ferment: Option<PreFermentKind>,
    dough_balls: u32,
) -> Vec<Step> {
    let mut draft: Vec<(StepKind, Option<StepDuration>, Vec<String>)> = Vec::with_capacity(7);

    if let Some(kind) = pre_ferment {
        draft.push((
            StepKind::DayBefore,
            None,
            vec![
                format!("Mix {kind} ingredients"),
                "Ferment 12-24 hours at room temp".to_string(),
                "Refrigerate until use".to_string(),
            ],
        ));
    }

    if timing.autolyse_minutes > 0.0 {
        draft.push((
            StepKind::Autolyse,
            Some(StepDuration::Minutes(timing.autolyse_minutes)),
            vec!["Mix flour + water only. Rest covered.".to_string()],
        ));
    }

    let mix = match pre_ferment {
        Some(kind) => format!("Add remaining flour and water, salt, oil, sugar and the {kind}. Mix until smooth."),
        None => "Add salt, yeast, oil, sugar. Mix until smooth.".to_string(),
    };
    draft.push((StepKind::MixFinalDough, None, vec![mix]));

    let bulk_h = timing.bulk_ferment_hours;
    let bulk = if bulk_h >= COLD_BULK_HOURS {
        "Cold ferment in fridge"
    } else if bulk_h < SHORT_BULK_HOURS {
        "Room temperature ferment with folds every 30 min"
    } else {
        "Room temperature ferment"
    };
    draft.push((
        StepKind::BulkFerment,
        Some(StepDuration::Hours(bulk_h)),
        vec![bulk.to_string()],
    ));

    draft.push((
        StepKind::BallAndRest,
        Some(StepDuration::Minutes(timing.ball_and_rest_minutes)),
        vec![format!("Divide into {dough_balls} balls. Shape and rest covered.")],
    ));

    let mut proof = "Room temp until doubled and jiggly".to_string();
    if timing.final_proof_hours >= SLOW_PROOF_HOURS {
        proof.push_str(" (or slow proof in fridge)");
    }
    draft.push((
        StepKind::FinalProof,
        Some(StepDuration::Hours(timing.final_proof_hours)),
        vec![proof],
    ));

    draft.push((
        StepKind::Ready,
        None,
        vec!["Dough should be soft, airy, and easy to stretch".to_string()],
    ));

    let mut next = 0;
    draft
        .into_iter()
        .map(|(kind, duration, guidance)| {
            let number = kind.is_numbered().then(|| {
                next += 1;
                next
            });
            Step {
                kind,
                number,
                title: kind.title(),
                duration,
                guidance,
            }
        })
        .collect()
}

/// Schedule for a whole recipe.
pub fn derive_for(recipe: &Recipe) -> Vec<Step> {
    derive_schedule(&recipe.timing, recipe.pre_ferment_kind(), recipe.dough_balls)
}

/// Hands-on plus resting time, in hours. The pre-ferment day is not counted.
pub fn total_time_hours(timing: &Timing) -> f64 {
    timing.bulk_ferment_hours
        + timing.final_proof_hours
        + (timing.autolyse_minutes + timing.ball_and_rest_minutes) / 60.0
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeTier {
    SameDay,
    Overnight,
    LongFerment,
}

impl TimeTier {
    pub fn from_hours(hours: f64) -> Self {
        if hours < 12.0 {
            TimeTier::SameDay
        } else if hours < 30.0 {
            TimeTier::Overnight
        } else {
            TimeTier::LongFerment
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeTier::SameDay => "same day",
            TimeTier::Overnight => "overnight",
            TimeTier::LongFerment => "long ferment",
        }
    }
}

/// Total-time estimate for display.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TotalTime {
    pub hours: f64,
    pub tier: TimeTier,
}

impl TotalTime {
    pub fn of(timing: &Timing) -> Self {
        let hours = total_time_hours(timing);
        Self {
            hours,
            tier: TimeTier::from_hours(hours),
        }
    }
}

impl fmt::Display for TotalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{:.0}hrs ({})", self.hours.round(), self.tier.label())
    }
}
