use serde::Serialize;

use super::repo_types::Meal;

/// Diet adherence figures for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MealSummary {
    pub total_meals: usize,
    pub on_diet_meals: usize,
    pub off_diet_meals: usize,
    /// Longest run of consecutive on-diet meals.
    pub best_sequence: usize,
}

/// Counts diet flags given in chronological order.
pub fn tally<I>(flags: I) -> MealSummary
where
    I: IntoIterator<Item = bool>,
{
    let mut summary = MealSummary::default();
    let mut current = 0;
    for on_diet in flags {
        summary.total_meals += 1;
        if on_diet {
            summary.on_diet_meals += 1;
            current += 1;
        } else {
            summary.off_diet_meals += 1;
            summary.best_sequence = summary.best_sequence.max(current);
            current = 0;
        }
    }
    // a trailing run never hits the reset branch
    summary.best_sequence = summary.best_sequence.max(current);
    summary
}

/// Summarizes a session's meals in `date_time` order.
///
/// Input already sorted ascending is scanned as is; anything else is
/// stable-sorted first, so meals sharing a timestamp keep their relative order.
pub fn summarize(meals: &[Meal]) -> MealSummary {
    let chronological = meals.windows(2).all(|w| w[0].date_time <= w[1].date_time);
    if chronological {
        return tally(meals.iter().map(|m| m.diet));
    }
    let mut sorted: Vec<&Meal> = meals.iter().collect();
    sorted.sort_by_key(|m| m.date_time);
    tally(sorted.into_iter().map(|m| m.diet))
}
