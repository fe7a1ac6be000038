use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::DriverNumber;

/// A season calendar plus its roster, ready to be written to the store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SeasonSchedule {
    #[validate(range(min = 1950, message = "Season must be 1950 or later"))]
    pub season: i32,

    #[validate(length(min = 1, message = "A schedule needs at least one event"))]
    #[validate(custom(function = "validate_calendar"))]
    pub events: Vec<ScheduledEvent>,

    #[validate(custom(function = "validate_roster"))]
    pub drivers: Vec<RosterEntry>,
}

/// One race weekend of the calendar. The store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub round: i32,
    pub name: String,
    pub country: String,
    pub location: String,
    pub circuit_name: String,
    pub starts_at: DateTime<Utc>,
    pub has_sprint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub driver_number: DriverNumber,
    pub driver_name: String,
    pub team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSyncReport {
    pub season: i32,
    pub events_synced: usize,
    pub drivers_synced: usize,
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

fn validate_calendar(events: &[ScheduledEvent]) -> Result<(), ValidationError> {
    let mut rounds = HashSet::new();
    for event in events {
        if event.round < 1 {
            return Err(invalid(
                "invalid_round",
                format!("Round must be >= 1, got {}", event.round),
            ));
        }
        if event.name.trim().is_empty() || event.circuit_name.trim().is_empty() {
            return Err(invalid(
                "missing_name",
                format!("Round {} needs a name and a circuit", event.round),
            ));
        }
        if !rounds.insert(event.round) {
            return Err(invalid(
                "duplicate_round",
                format!("Round {} is scheduled more than once", event.round),
            ));
        }
    }
    Ok(())
}

fn validate_roster(drivers: &[RosterEntry]) -> Result<(), ValidationError> {
    let mut numbers = HashSet::new();
    for driver in drivers {
        if driver.driver_number.0 < 1 {
            return Err(invalid(
                "invalid_driver_number",
                format!("Invalid driver number {}", driver.driver_number.0),
            ));
        }
        if !numbers.insert(driver.driver_number) {
            return Err(invalid(
                "duplicate_driver",
                format!("Driver {} is entered more than once", driver.driver_number),
            ));
        }
    }
    Ok(())
}
