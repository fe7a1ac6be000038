use std::collections::HashSet;

use tracing::warn;

use super::models::{CanonicalClassification, CanonicalSchedule, FORMAT_VERSION};
use crate::{FeedError, Result};

const FULL_TOP_TEN: usize = 10;

pub struct ClassificationValidator;

impl ClassificationValidator {
    pub fn validate(classification: &CanonicalClassification) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if classification.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                classification.format_version, FORMAT_VERSION
            ));
        }

        if classification.event.season < 1950 {
            report.errors.push(format!(
                "Invalid season: {}",
                classification.event.season
            ));
        }
        if classification.event.round < 1 {
            report.errors.push(format!(
                "Invalid round: {}. Round must be >= 1",
                classification.event.round
            ));
        }

        if classification.race.is_empty() {
            report
                .errors
                .push("Race classification is required".to_string());
        }
        if classification.qualifying.is_empty() {
            report
                .errors
                .push("Qualifying classification is required".to_string());
        }

        check_session(
            &mut report,
            "race",
            classification
                .race
                .iter()
                .map(|e| (e.position, e.driver_number)),
        );
        check_session(
            &mut report,
            "qualifying",
            classification
                .qualifying
                .iter()
                .map(|e| (e.position, e.driver_number)),
        );

        match &classification.sprint {
            Some(sprint) if sprint.is_empty() => report
                .warnings
                .push("Sprint classification is present but empty".to_string()),
            Some(sprint) => check_session(
                &mut report,
                "sprint",
                sprint.iter().map(|e| (e.position, e.driver_number)),
            ),
            None => {}
        }

        let fastest: Vec<i32> = classification
            .race
            .iter()
            .filter(|e| e.fastest_lap)
            .map(|e| e.driver_number)
            .collect();
        if !classification.race.is_empty() && fastest.len() != 1 {
            report.errors.push(format!(
                "Exactly one driver must hold the fastest lap, found {}",
                fastest.len()
            ));
        }

        if !classification.race.is_empty() && classification.race.len() < FULL_TOP_TEN {
            report.warnings.push(format!(
                "Only {} classified drivers, the missing top-ten slots will never match",
                classification.race.len()
            ));
        }

        for entry in &classification.race {
            if entry.driver_name.is_empty() {
                report.warnings.push(format!(
                    "Race entry P{} (#{}) has no driver name",
                    entry.position, entry.driver_number
                ));
            }
        }

        if !report.errors.is_empty() {
            Err(FeedError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

pub struct ScheduleValidator;

impl ScheduleValidator {
    pub fn validate(schedule: &CanonicalSchedule) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if schedule.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                schedule.format_version, FORMAT_VERSION
            ));
        }
        if schedule.season < 1950 {
            report
                .errors
                .push(format!("Invalid season: {}", schedule.season));
        }

        if schedule.events.is_empty() {
            report
                .errors
                .push("Schedule has no events".to_string());
        }
        let mut rounds = HashSet::new();
        for event in &schedule.events {
            if event.round < 1 {
                report.errors.push(format!(
                    "Invalid round: {}. Round must be >= 1",
                    event.round
                ));
            }
            if !rounds.insert(event.round) {
                report.errors.push(format!(
                    "Round {} is scheduled more than once",
                    event.round
                ));
            }
            if event.name.is_empty() || event.circuit_name.is_empty() {
                report.errors.push(format!(
                    "Round {} needs a name and a circuit",
                    event.round
                ));
            }
        }

        let mut calendar: Vec<_> = schedule.events.iter().collect();
        calendar.sort_by_key(|e| e.round);
        for pair in calendar.windows(2) {
            if pair[1].round != pair[0].round + 1 {
                report.warnings.push(format!(
                    "Calendar skips from round {} to round {}",
                    pair[0].round, pair[1].round
                ));
            }
            if pair[1].starts_at <= pair[0].starts_at {
                report.warnings.push(format!(
                    "Round {} does not start after round {}",
                    pair[1].round, pair[0].round
                ));
            }
        }

        if schedule.drivers.is_empty() {
            report
                .warnings
                .push("Schedule has no drivers, predictions will be rejected".to_string());
        }
        let mut numbers = HashSet::new();
        for driver in &schedule.drivers {
            if driver.driver_number < 1 {
                report.errors.push(format!(
                    "Invalid driver number {}",
                    driver.driver_number
                ));
            }
            if !numbers.insert(driver.driver_number) {
                report.errors.push(format!(
                    "Driver #{} is entered more than once",
                    driver.driver_number
                ));
            }
        }

        if !report.errors.is_empty() {
            Err(FeedError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

/// Positions must run 1..=N without gaps, and each driver appears once.
fn check_session(
    report: &mut ValidationReport,
    session: &str,
    entries: impl Iterator<Item = (u32, i32)>,
) {
    let mut positions = Vec::new();
    let mut drivers = HashSet::new();

    for (position, driver_number) in entries {
        if driver_number < 1 {
            report.errors.push(format!(
                "{session}: invalid driver number {driver_number}"
            ));
        }
        if !drivers.insert(driver_number) {
            report.errors.push(format!(
                "{session}: driver #{driver_number} is classified more than once"
            ));
        }
        positions.push(position);
    }

    positions.sort_unstable();
    for (expected, position) in (1u32..).zip(&positions) {
        if *position != expected {
            report.errors.push(format!(
                "{session}: positions must run from 1 without gaps or repeats, found P{position} where P{expected} was expected"
            ));
            break;
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
