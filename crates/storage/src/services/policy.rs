use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::TOP_TEN;

/// Largest possible gap between a predicted and an actual top-ten slot.
pub const MAX_SLOT_DISTANCE: usize = TOP_TEN - 1;

/// Decimal places stored for every score component.
pub const POINTS_SCALE: u32 = 2;

/// Every tunable number used by the comparator and the bonus tracker.
///
/// Loaded from JSON when `SCORING_POLICY` is set; missing fields fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Per correctly placed driver in positions 1-5.
    pub top_five_exact: Decimal,
    /// Per correctly placed driver in positions 6-10.
    pub lower_five_exact: Decimal,
    pub perfect_top_ten_bonus: Decimal,
    pub partial_credit: PartialCredit,
    pub pole: Decimal,
    pub sprint: Decimal,
    pub pit_stops: Decimal,
    pub fastest_lap: Decimal,
    pub positions_gained: Decimal,
    pub streak: StreakPolicy,
    pub underdog: UnderdogPolicy,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            top_five_exact: dec!(3),
            lower_five_exact: dec!(2),
            perfect_top_ten_bonus: dec!(20),
            partial_credit: PartialCredit::Inverse { max: dec!(2) },
            pole: dec!(5),
            sprint: dec!(5),
            pit_stops: dec!(10),
            fastest_lap: dec!(10),
            positions_gained: dec!(10),
            streak: StreakPolicy::default(),
            underdog: UnderdogPolicy::default(),
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), String> {
        let flat = [
            ("top_five_exact", self.top_five_exact),
            ("lower_five_exact", self.lower_five_exact),
            ("perfect_top_ten_bonus", self.perfect_top_ten_bonus),
            ("pole", self.pole),
            ("sprint", self.sprint),
            ("pit_stops", self.pit_stops),
            ("fastest_lap", self.fastest_lap),
            ("positions_gained", self.positions_gained),
            ("streak.points_per_step", self.streak.points_per_step),
            ("underdog.max_points", self.underdog.max_points),
        ];
        for (name, value) in flat {
            if value < Decimal::ZERO {
                return Err(format!("{name} must not be negative"));
            }
            if value.normalize().scale() > POINTS_SCALE {
                return Err(format!(
                    "{name} has more than {POINTS_SCALE} decimal places: {value}"
                ));
            }
        }

        self.partial_credit.validate()?;

        if self.underdog.threshold < Decimal::ZERO || self.underdog.threshold >= Decimal::ONE {
            return Err("underdog.threshold must be in [0, 1)".to_string());
        }

        Ok(())
    }
}

/// Credit for a top-ten driver placed in the wrong slot, by slot distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum PartialCredit {
    /// `max / distance`
    Inverse { max: Decimal },
    /// `max - step * (distance - 1)`
    Linear { max: Decimal, step: Decimal },
}

impl PartialCredit {
    /// Points for a miss by `distance` slots. Distance 0 is an exact match and
    /// is scored elsewhere, so it earns nothing here.
    pub fn credit(&self, distance: usize) -> Decimal {
        if distance == 0 {
            return Decimal::ZERO;
        }
        let distance = Decimal::from(distance as u64);
        let raw = match *self {
            Self::Inverse { max } => max / distance,
            Self::Linear { max, step } => max - step * (distance - Decimal::ONE),
        };
        raw.max(Decimal::ZERO).round_dp(2)
    }

    /// The curve has to stay positive and strictly decreasing over every
    /// reachable distance, after rounding.
    pub fn validate(&self) -> Result<(), String> {
        let mut previous: Option<Decimal> = None;
        for distance in 1..=MAX_SLOT_DISTANCE {
            let credit = self.credit(distance);
            if credit <= Decimal::ZERO {
                return Err(format!(
                    "partial credit must be positive, got {credit} at distance {distance}"
                ));
            }
            if let Some(prev) = previous {
                if credit >= prev {
                    return Err(format!(
                        "partial credit must decrease with distance, got {prev} then {credit} at distance {distance}"
                    ));
                }
            }
            previous = Some(credit);
        }
        Ok(())
    }
}

/// Stepped bonus for consecutive perfect top-ten calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakPolicy {
    pub points_per_step: Decimal,
    /// Number of prior perfect events after which the bonus stops growing.
    pub cap: u32,
}

impl Default for StreakPolicy {
    fn default() -> Self {
        Self {
            points_per_step: dec!(5),
            cap: 3,
        }
    }
}

impl StreakPolicy {
    pub fn bonus(&self, consecutive_perfects: u32) -> Decimal {
        Decimal::from(consecutive_perfects.min(self.cap)) * self.points_per_step
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderdogPolicy {
    /// Minimum share of other picks for a correct call to count as contrarian.
    pub threshold: Decimal,
    /// Bonus at rarity 1.0; scaled linearly by rarity.
    pub max_points: Decimal,
}

impl Default for UnderdogPolicy {
    fn default() -> Self {
        Self {
            threshold: dec!(0.5),
            max_points: dec!(10),
        }
    }
}

impl UnderdogPolicy {
    pub fn bonus(&self, rarity: Decimal) -> Decimal {
        if rarity > self.threshold {
            (self.max_points * rarity).round_dp(2)
        } else {
            Decimal::ZERO
        }
    }
}
