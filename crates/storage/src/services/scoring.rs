use chrono::{DateTime, Utc};

use super::comparator::{Bonuses, score};
use super::policy::ScoringPolicy;
use super::streak::StreakTracker;
use super::underdog::{PickDistribution, underdog_bonus};
use crate::models::{Event, Outcome, Prediction, Score};

/// Scores every prediction of one event against its outcome.
///
/// The pick distribution is taken once from the whole batch, so each user's
/// underdog bonus is judged against the same snapshot.
pub fn score_batch(
    policy: &ScoringPolicy,
    event: &Event,
    outcome: &Outcome,
    predictions: &[Prediction],
    tracker: &StreakTracker,
    now: DateTime<Utc>,
) -> Vec<Score> {
    let distribution = PickDistribution::from_predictions(predictions);

    predictions
        .iter()
        .map(|prediction| {
            let bonuses = Bonuses {
                streak: policy
                    .streak
                    .bonus(tracker.consecutive_perfects(prediction.user_id, event)),
                underdog: underdog_bonus(&policy.underdog, prediction, outcome, &distribution),
            };

            Score {
                prediction_id: prediction.prediction_id,
                user_id: prediction.user_id,
                event_id: prediction.event_id,
                components: score(policy, prediction, outcome, bonuses),
                computed_at: now,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverNumber, ScoreComponents};
    use crate::services::comparator::top_ten_of;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    const ORDER: [i32; 10] = [1, 4, 16, 81, 44, 63, 12, 14, 22, 10];

    fn event(round: i32) -> Event {
        Event {
            event_id: Uuid::new_v4(),
            season: 2025,
            round,
            name: format!("Round {round}"),
            country: "Japan".to_string(),
            location: "Suzuka".to_string(),
            circuit_name: "Suzuka International Racing Course".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 4, 6, 5, 0, 0).unwrap(),
            has_sprint: false,
        }
    }

    fn outcome(event: &Event) -> Outcome {
        Outcome {
            event_id: event.event_id,
            finishing_order: ORDER.iter().copied().map(DriverNumber).collect(),
            pole: DriverNumber(1),
            sprint_winner: None,
            most_pit_stops: DriverNumber(22),
            fastest_lap: DriverNumber(81),
            most_positions_gained: DriverNumber(10),
        }
    }

    fn prediction(event: &Event, order: &[i32], pole: i32) -> Prediction {
        Prediction {
            prediction_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: event.event_id,
            top_ten: top_ten_of(order).unwrap(),
            pole: DriverNumber(pole),
            sprint_winner: None,
            most_pit_stops: DriverNumber(1),
            fastest_lap: DriverNumber(1),
            most_positions_gained: DriverNumber(1),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_one_score_per_prediction() {
        let event = event(3);
        let outcome = outcome(&event);
        let predictions = vec![
            prediction(&event, &ORDER, 1),
            prediction(&event, &[4, 1, 16, 81, 44, 63, 12, 14, 22, 10], 4),
        ];
        let now = Utc::now();

        let scores = score_batch(
            &ScoringPolicy::default(),
            &event,
            &outcome,
            &predictions,
            &StreakTracker::default(),
            now,
        );

        assert_eq!(scores.len(), 2);
        for (score, prediction) in scores.iter().zip(&predictions) {
            assert_eq!(score.prediction_id, prediction.prediction_id);
            assert_eq!(score.user_id, prediction.user_id);
            assert_eq!(score.event_id, event.event_id);
            assert_eq!(score.computed_at, now);
        }
        assert!(scores[0].is_perfect());
        assert!(!scores[1].is_perfect());
    }

    #[test]
    fn test_lone_correct_pole_pick_earns_underdog_bonus() {
        let event = event(3);
        let outcome = outcome(&event);
        let predictions = vec![
            prediction(&event, &ORDER, 1),
            prediction(&event, &ORDER, 4),
            prediction(&event, &ORDER, 4),
            prediction(&event, &ORDER, 4),
        ];

        let scores = score_batch(
            &ScoringPolicy::default(),
            &event,
            &outcome,
            &predictions,
            &StreakTracker::default(),
            Utc::now(),
        );

        // 3 of 4 picked someone else: 10 * 0.75
        assert_eq!(scores[0].components.underdog_bonus, dec!(7.5));
        assert!(scores[1..]
            .iter()
            .all(|s| s.components.underdog_bonus == Decimal::ZERO));
    }

    #[test]
    fn test_streak_from_prior_rounds_is_applied() {
        let previous = event(2);
        let current = event(3);
        let outcome = outcome(&current);
        let predictions = vec![prediction(&current, &ORDER, 4)];
        let user_id = predictions[0].user_id;

        let prior_score = Score {
            prediction_id: Uuid::new_v4(),
            user_id,
            event_id: previous.event_id,
            components: ScoreComponents {
                perfect_top_ten_bonus: dec!(20),
                perfect_top_ten: true,
                ..ScoreComponents::default()
            },
            computed_at: Utc::now(),
        };
        let tracker = StreakTracker::new(&[previous, current.clone()], &[prior_score]);

        let scores = score_batch(
            &ScoringPolicy::default(),
            &current,
            &outcome,
            &predictions,
            &tracker,
            Utc::now(),
        );

        assert_eq!(scores[0].components.streak_bonus, dec!(5));
    }
}
