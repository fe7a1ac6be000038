use storage::dto::schedule::{RosterEntry, ScheduledEvent, SeasonSchedule};
use storage::models::{DriverNumber, Event, Outcome};
use uuid::Uuid;

use super::models::{CanonicalClassification, CanonicalSchedule, RaceEntry};
use crate::{FeedError, Result};

pub struct OutcomeTransformer;

impl OutcomeTransformer {
    /// Converts a classification published for `event`, refusing one keyed
    /// to a different weekend.
    pub fn for_event(classification: &CanonicalClassification, event: &Event) -> Result<Outcome> {
        let key = classification.event;
        if key.season != event.season || key.round != event.round {
            return Err(FeedError::EventMismatch {
                season: event.season,
                round: event.round,
                found_season: key.season,
                found_round: key.round,
            });
        }

        Self::to_outcome(classification, event.event_id, event.has_sprint)
    }

    /// Derives the category winners from the raw classification.
    ///
    /// Ties for most pit stops and most positions gained go to the driver who
    /// finished ahead. A pit-lane start (grid 0) counts as starting behind the
    /// whole field. The sprint winner is only taken when `has_sprint` is set.
    pub fn to_outcome(
        classification: &CanonicalClassification,
        event_id: Uuid,
        has_sprint: bool,
    ) -> Result<Outcome> {
        let mut race: Vec<&RaceEntry> = classification.race.iter().collect();
        race.sort_by_key(|e| e.position);

        if race.is_empty() {
            return Err(FeedError::TransformationError(
                "Race classification is empty".to_string(),
            ));
        }

        let pole = classification
            .qualifying
            .iter()
            .min_by_key(|e| e.position)
            .map(|e| DriverNumber(e.driver_number))
            .ok_or_else(|| {
                FeedError::TransformationError("Qualifying classification is empty".to_string())
            })?;

        let sprint_winner = if has_sprint {
            classification
                .sprint
                .as_deref()
                .unwrap_or_default()
                .iter()
                .min_by_key(|e| e.position)
                .map(|e| DriverNumber(e.driver_number))
        } else {
            None
        };

        let fastest_lap = race
            .iter()
            .find(|e| e.fastest_lap)
            .map(|e| DriverNumber(e.driver_number))
            .ok_or_else(|| {
                FeedError::TransformationError("No driver holds the fastest lap".to_string())
            })?;

        let back_of_grid = race.len() as i64 + 1;
        let positions_gained = |e: &RaceEntry| {
            let grid = if e.grid == 0 {
                back_of_grid
            } else {
                i64::from(e.grid)
            };
            grid - i64::from(e.position)
        };

        Ok(Outcome {
            event_id,
            finishing_order: race.iter().map(|e| DriverNumber(e.driver_number)).collect(),
            pole,
            sprint_winner,
            most_pit_stops: leader_by(&race, |e| i64::from(e.pit_stops)),
            fastest_lap,
            most_positions_gained: leader_by(&race, positions_gained),
        })
    }
}

pub struct ScheduleTransformer;

impl ScheduleTransformer {
    /// Converts a schedule published for `season`, refusing one for another
    /// season.
    pub fn for_season(schedule: &CanonicalSchedule, season: i32) -> Result<SeasonSchedule> {
        if schedule.season != season {
            return Err(FeedError::SeasonMismatch {
                season,
                found: schedule.season,
            });
        }

        let mut events: Vec<ScheduledEvent> = schedule
            .events
            .iter()
            .map(|e| ScheduledEvent {
                round: e.round,
                name: e.name.clone(),
                country: e.country.clone(),
                location: e.location.clone(),
                circuit_name: e.circuit_name.clone(),
                starts_at: e.starts_at,
                has_sprint: e.has_sprint,
            })
            .collect();
        events.sort_by_key(|e| e.round);

        let drivers = schedule
            .drivers
            .iter()
            .map(|d| RosterEntry {
                driver_number: DriverNumber(d.driver_number),
                driver_name: d.driver_name.clone(),
                team: d.team.clone(),
            })
            .collect();

        Ok(SeasonSchedule {
            season,
            events,
            drivers,
        })
    }
}

/// Highest `metric` in a finishing-ordered, non-empty classification; the
/// first (best placed) driver wins a tie.
fn leader_by(race: &[&RaceEntry], metric: impl Fn(&RaceEntry) -> i64) -> DriverNumber {
    let mut best = race[0];
    let mut best_value = metric(best);
    for &entry in &race[1..] {
        let value = metric(entry);
        if value > best_value {
            best = entry;
            best_value = value;
        }
    }
    DriverNumber(best.driver_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::fixtures::{DRIVERS, classification, schedule};
    use crate::canonical::models::SprintEntry;
    use chrono::{TimeZone, Utc};

    fn event(has_sprint: bool) -> Event {
        Event {
            event_id: Uuid::new_v4(),
            season: 2025,
            round: 5,
            name: "Miami Grand Prix".to_string(),
            country: "United States".to_string(),
            location: "Miami".to_string(),
            circuit_name: "Miami International Autodrome".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 5, 4, 20, 0, 0).unwrap(),
            has_sprint,
        }
    }

    #[test]
    fn test_category_winners() {
        let event = event(false);
        let outcome = OutcomeTransformer::for_event(&classification(20), &event).unwrap();

        assert_eq!(outcome.event_id, event.event_id);
        assert_eq!(
            outcome.finishing_order,
            DRIVERS.iter().copied().map(DriverNumber).collect::<Vec<_>>()
        );
        assert_eq!(outcome.pole, DriverNumber(4));
        assert_eq!(outcome.fastest_lap, DriverNumber(81));
        assert_eq!(outcome.most_pit_stops, DriverNumber(22));
        assert_eq!(outcome.most_positions_gained, DriverNumber(10));
        assert_eq!(outcome.sprint_winner, None);
    }

    #[test]
    fn test_finishing_order_sorted_by_position() {
        let mut doc = classification(20);
        doc.race.reverse();
        let outcome = OutcomeTransformer::to_outcome(&doc, Uuid::nil(), false).unwrap();
        assert_eq!(outcome.finishing_order[0], DriverNumber(1));
        assert_eq!(outcome.finishing_order[19], DriverNumber(43));
        // tie on three stops still goes to the better finisher
        assert_eq!(outcome.most_pit_stops, DriverNumber(22));
    }

    #[test]
    fn test_pit_lane_start_counts_from_back_of_grid() {
        let mut doc = classification(20);
        // P12 from the pit lane: 21 - 12 = 9, beats 10's eight places
        doc.race[11].grid = 0;
        let outcome = OutcomeTransformer::to_outcome(&doc, Uuid::nil(), false).unwrap();
        assert_eq!(outcome.most_positions_gained, DriverNumber(27));
    }

    #[test]
    fn test_sprint_winner_only_for_sprint_weekends() {
        let mut doc = classification(20);
        doc.sprint = Some(vec![
            SprintEntry {
                position: 2,
                driver_number: 1,
            },
            SprintEntry {
                position: 1,
                driver_number: 81,
            },
        ]);

        let sprint = OutcomeTransformer::for_event(&doc, &event(true)).unwrap();
        assert_eq!(sprint.sprint_winner, Some(DriverNumber(81)));

        let regular = OutcomeTransformer::for_event(&doc, &event(false)).unwrap();
        assert_eq!(regular.sprint_winner, None);
    }

    #[test]
    fn test_short_classification_keeps_what_is_there() {
        let outcome =
            OutcomeTransformer::to_outcome(&classification(8), Uuid::nil(), false).unwrap();
        assert_eq!(outcome.finishing_order.len(), 8);
        assert_eq!(outcome.most_pit_stops, DriverNumber(1));
    }

    #[test]
    fn test_rejects_other_weekend() {
        let mut doc = classification(20);
        doc.event.round = 6;
        let err = OutcomeTransformer::for_event(&doc, &event(false)).unwrap_err();
        assert!(matches!(
            err,
            FeedError::EventMismatch {
                found_round: 6,
                round: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_fastest_lap_is_an_error() {
        let mut doc = classification(20);
        doc.race.iter_mut().for_each(|e| e.fastest_lap = false);
        assert!(OutcomeTransformer::to_outcome(&doc, Uuid::nil(), false).is_err());
    }

    #[test]
    fn test_schedule_sorted_by_round() {
        let mut doc = schedule();
        doc.events.reverse();

        let season = ScheduleTransformer::for_season(&doc, 2025).unwrap();
        let rounds: Vec<(i32, bool)> = season
            .events
            .iter()
            .map(|e| (e.round, e.has_sprint))
            .collect();
        assert_eq!(rounds, vec![(1, false), (2, true), (3, false)]);
        assert_eq!(season.drivers.len(), DRIVERS.len());
        assert_eq!(season.drivers[0].driver_number, DriverNumber(DRIVERS[0]));
    }

    #[test]
    fn test_rejects_other_season() {
        let err = ScheduleTransformer::for_season(&schedule(), 2026).unwrap_err();
        assert!(matches!(
            err,
            FeedError::SeasonMismatch {
                season: 2026,
                found: 2025
            }
        ));
    }
}
