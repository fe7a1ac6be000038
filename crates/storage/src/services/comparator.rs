use rust_decimal::Decimal;

use super::policy::ScoringPolicy;
use crate::models::{Category, Outcome, Prediction, ScoreComponents, TOP_TEN};
#[cfg(test)]
use crate::models::DriverNumber;

const TOP_FIVE: usize = 5;

/// Cross-event terms computed by the bonus tracker before comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bonuses {
    pub streak: Decimal,
    pub underdog: Decimal,
}

/// Compares a stored prediction with the finalized outcome.
///
/// Pure and infallible. The outcome must be well-formed (see [`Outcome`]);
/// slots beyond the end of a short classification never match.
pub fn score(
    policy: &ScoringPolicy,
    prediction: &Prediction,
    outcome: &Outcome,
    bonuses: Bonuses,
) -> ScoreComponents {
    let mut top_five_hits = 0u32;
    let mut lower_five_hits = 0u32;
    let mut partial_position = Decimal::ZERO;

    for (slot, driver) in prediction.top_ten.iter().enumerate() {
        if outcome.driver_at(slot) == Some(*driver) {
            if slot < TOP_FIVE {
                top_five_hits += 1;
            } else {
                lower_five_hits += 1;
            }
        } else if let Some(actual) = outcome.top_ten_slot(*driver) {
            partial_position += policy.partial_credit.credit(slot.abs_diff(actual));
        }
    }

    let perfect = top_five_hits + lower_five_hits == TOP_TEN as u32;

    ScoreComponents {
        top_five_exact: Decimal::from(top_five_hits) * policy.top_five_exact,
        lower_five_exact: Decimal::from(lower_five_hits) * policy.lower_five_exact,
        perfect_top_ten_bonus: if perfect {
            policy.perfect_top_ten_bonus
        } else {
            Decimal::ZERO
        },
        partial_position,
        pole: flat(policy.pole, prediction, outcome, Category::Pole),
        sprint: flat(policy.sprint, prediction, outcome, Category::Sprint),
        pit_stops: flat(policy.pit_stops, prediction, outcome, Category::MostPitStops),
        fastest_lap: flat(policy.fastest_lap, prediction, outcome, Category::FastestLap),
        positions_gained: flat(
            policy.positions_gained,
            prediction,
            outcome,
            Category::MostPositionsGained,
        ),
        streak_bonus: bonuses.streak,
        underdog_bonus: bonuses.underdog,
        perfect_top_ten: perfect,
    }
}

/// Whether `prediction` called the winner of `category`. A missing pick or a
/// missing winner (no sprint stage) never counts.
pub fn is_correct(prediction: &Prediction, outcome: &Outcome, category: Category) -> bool {
    matches!(
        (prediction.pick(category), outcome.winner(category)),
        (Some(pick), Some(winner)) if pick == winner
    )
}

fn flat(award: Decimal, prediction: &Prediction, outcome: &Outcome, category: Category) -> Decimal {
    if is_correct(prediction, outcome, category) {
        award
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
pub(crate) fn top_ten_of(order: &[i32]) -> Option<[DriverNumber; TOP_TEN]> {
    let drivers: Vec<DriverNumber> = order.iter().copied().map(DriverNumber).collect();
    drivers.try_into().ok()
}
