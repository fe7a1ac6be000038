use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use storage::dto::schedule::SeasonSchedule;
use storage::models::{Event, Outcome};
use storage::repository::OutcomeFeed;
use tracing::debug;

use super::{finalize, finalize_schedule};
use crate::canonical::models::{CanonicalClassification, CanonicalSchedule};
use crate::{FeedError, Result};

/// Reads classifications laid out as `<root>/<season>/<round>.json`, with the
/// round zero-padded to two digits. A missing file means the outcome is not
/// published yet. The season calendar sits beside them in `schedule.json`.
#[derive(Debug, Clone)]
pub struct JsonDirectoryFeed {
    root: PathBuf,
}

impl JsonDirectoryFeed {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, season: i32, round: i32) -> PathBuf {
        self.root
            .join(season.to_string())
            .join(format!("{round:02}.json"))
    }

    pub async fn load(&self, event: &Event) -> Result<Option<CanonicalClassification>> {
        let path = self.path_for(event.season, event.round);
        match tokio::fs::read_to_string(&path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No classification at {}", path.display());
                Ok(None)
            }
            Err(source) => Err(FeedError::ReadError { path, source }),
        }
    }

    pub fn schedule_path(&self, season: i32) -> PathBuf {
        self.root.join(season.to_string()).join("schedule.json")
    }

    pub async fn load_schedule(&self, season: i32) -> Result<SeasonSchedule> {
        let path = self.schedule_path(season);
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FeedError::ReadError { path, source })?;
        let schedule: CanonicalSchedule = serde_json::from_str(&json)?;
        finalize_schedule(&schedule, season)
    }
}

#[async_trait]
impl OutcomeFeed for JsonDirectoryFeed {
    async fn outcome_for(&self, event: &Event) -> storage::error::Result<Option<Outcome>> {
        let Some(classification) = self.load(event).await? else {
            return Ok(None);
        };
        Ok(Some(finalize(&classification, event)?))
    }
}

/// Loads a single classification file, for ad-hoc checks.
pub async fn read_classification(path: &Path) -> Result<CanonicalClassification> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FeedError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&json)?)
}
