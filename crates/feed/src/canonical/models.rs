use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "1.0.0";

/// Official classification of one race weekend, as published by a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalClassification {
    pub format_version: String,
    pub source: SourceMetadata,
    pub event: EventKey,
    pub race: Vec<RaceEntry>,
    pub qualifying: Vec<QualifyingEntry>,
    /// Absent when the weekend has no sprint stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<Vec<SprintEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(rename = "type")]
    pub r#type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub extracted_at: DateTime<Utc>,
    pub extractor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Official,
    Api,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventKey {
    pub season: i32,
    pub round: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceEntry {
    pub position: u32,
    pub driver_number: i32,
    pub driver_name: String,
    pub team: String,
    /// Starting slot; 0 means a pit-lane start.
    pub grid: u32,
    pub status: String,
    pub pit_stops: u32,
    #[serde(default)]
    pub fastest_lap: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifyingEntry {
    pub position: u32,
    pub driver_number: i32,
    pub driver_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintEntry {
    pub position: u32,
    pub driver_number: i32,
}

/// A season calendar and entry list, as published by a feed at
/// `<season>/schedule.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSchedule {
    pub format_version: String,
    pub source: SourceMetadata,
    pub season: i32,
    pub events: Vec<ScheduleEntry>,
    pub drivers: Vec<DriverEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub round: i32,
    pub name: String,
    pub country: String,
    pub location: String,
    pub circuit_name: String,
    /// Race start.
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub has_sprint: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverEntry {
    pub driver_number: i32,
    pub driver_name: String,
    pub team: String,
}
