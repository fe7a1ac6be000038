use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::deadline::{deadline, is_locked};
use crate::dto::prediction::SubmitPredictionRequest;
use crate::error::{TopTenDefect, ValidationError};
use crate::models::{DriverNumber, Event, Prediction, TOP_TEN};

/// A submission that passed every check and may be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPrediction {
    pub event_id: Uuid,
    pub top_ten: [DriverNumber; TOP_TEN],
    pub pole: DriverNumber,
    pub sprint_winner: Option<DriverNumber>,
    pub most_pit_stops: DriverNumber,
    pub fastest_lap: DriverNumber,
    pub most_positions_gained: DriverNumber,
}

impl ValidatedPrediction {
    /// Builds the record to store for `user_id`, keeping identity and creation
    /// time of the prediction it replaces.
    pub fn into_prediction(
        self,
        user_id: Uuid,
        existing: Option<&Prediction>,
        now: DateTime<Utc>,
    ) -> Prediction {
        let (prediction_id, created_at, updated_at) = match existing {
            Some(prev) => (prev.prediction_id, prev.created_at, Some(now)),
            None => (Uuid::new_v4(), now, None),
        };

        Prediction {
            prediction_id,
            user_id,
            event_id: self.event_id,
            top_ten: self.top_ten,
            pole: self.pole,
            sprint_winner: self.sprint_winner,
            most_pit_stops: self.most_pit_stops,
            fastest_lap: self.fastest_lap,
            most_positions_gained: self.most_positions_gained,
            created_at,
            updated_at,
        }
    }
}

/// Checks a submission against the event's deadline and roster.
///
/// Checks run in a fixed order and stop at the first failure: deadline,
/// top-ten shape, roster membership, sprint applicability. Edits go through
/// the same path, so a locked event rejects them just like new submissions.
pub fn validate_submission(
    request: &SubmitPredictionRequest,
    event: &Event,
    roster: &HashSet<DriverNumber>,
    now: DateTime<Utc>,
) -> Result<ValidatedPrediction, ValidationError> {
    if is_locked(event, now) {
        return Err(ValidationError::DeadlinePassed {
            deadline: deadline(event),
        });
    }

    let top_ten = check_top_ten(&request.top_ten)?;

    if let Some(unknown) = request.referenced_drivers().find(|d| !roster.contains(d)) {
        return Err(ValidationError::UnknownDriver(unknown));
    }

    if !event.has_sprint && request.sprint_winner.is_some() {
        return Err(ValidationError::SprintNotApplicable);
    }

    Ok(ValidatedPrediction {
        event_id: event.event_id,
        top_ten,
        pole: request.pole,
        sprint_winner: request.sprint_winner,
        most_pit_stops: request.most_pit_stops,
        fastest_lap: request.fastest_lap,
        most_positions_gained: request.most_positions_gained,
    })
}

fn check_top_ten(drivers: &[DriverNumber]) -> Result<[DriverNumber; TOP_TEN], ValidationError> {
    let top_ten: [DriverNumber; TOP_TEN] = drivers.try_into().map_err(|_| {
        ValidationError::MalformedTopTen(TopTenDefect::WrongLength(drivers.len()))
    })?;

    let mut seen = HashSet::with_capacity(TOP_TEN);
    for driver in top_ten {
        if !seen.insert(driver) {
            return Err(ValidationError::MalformedTopTen(TopTenDefect::Duplicate(
                driver,
            )));
        }
    }

    Ok(top_ten)
}
