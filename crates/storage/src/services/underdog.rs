use std::collections::HashMap;

use rust_decimal::Decimal;

use super::comparator::is_correct;
use super::policy::UnderdogPolicy;
use crate::models::{Category, DriverNumber, Outcome, Prediction};

/// How an event's predictions spread over drivers, per category.
///
/// Built once per scoring batch from every prediction of the event so that
/// all users are judged against the same snapshot.
#[derive(Debug, Default)]
pub struct PickDistribution {
    picks: HashMap<Category, HashMap<DriverNumber, u32>>,
    totals: HashMap<Category, u32>,
}

impl PickDistribution {
    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        let mut distribution = Self::default();
        for prediction in predictions {
            for category in Category::ALL {
                if let Some(driver) = prediction.pick(category) {
                    *distribution
                        .picks
                        .entry(category)
                        .or_default()
                        .entry(driver)
                        .or_default() += 1;
                    *distribution.totals.entry(category).or_default() += 1;
                }
            }
        }
        distribution
    }

    /// Share of the category's picks that named someone other than `driver`.
    pub fn rarity(&self, category: Category, driver: DriverNumber) -> Decimal {
        let total = self.totals.get(&category).copied().unwrap_or(0);
        if total == 0 {
            return Decimal::ZERO;
        }
        let same = self
            .picks
            .get(&category)
            .and_then(|by_driver| by_driver.get(&driver))
            .copied()
            .unwrap_or(0);

        Decimal::from(total - same) / Decimal::from(total)
    }
}

/// Sum of contrarian bonuses over the categories `prediction` got right.
pub fn underdog_bonus(
    policy: &UnderdogPolicy,
    prediction: &Prediction,
    outcome: &Outcome,
    distribution: &PickDistribution,
) -> Decimal {
    Category::ALL
        .into_iter()
        .filter(|category| is_correct(prediction, outcome, *category))
        .filter_map(|category| {
            prediction
                .pick(category)
                .map(|driver| policy.bonus(distribution.rarity(category, driver)))
        })
        .sum()
}
