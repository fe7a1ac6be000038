use async_trait::async_trait;
use reqwest::StatusCode;
use storage::dto::schedule::SeasonSchedule;
use storage::models::{Event, Outcome};
use storage::repository::OutcomeFeed;
use tracing::debug;

use super::{finalize, finalize_schedule};
use crate::Result;
use crate::canonical::models::{CanonicalClassification, CanonicalSchedule};

/// Fetches classifications from `<base_url>/<season>/<round>.json`. A 404
/// means the outcome is not published yet. The season calendar is served at
/// `<base_url>/<season>/schedule.json`.
pub struct HttpFeed {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFeed {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gridcall/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url_for(&self, season: i32, round: i32) -> String {
        format!("{}/{}/{:02}.json", self.base_url, season, round)
    }

    pub async fn fetch(&self, event: &Event) -> Result<Option<CanonicalClassification>> {
        let url = self.url_for(event.season, event.round);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No classification at {}", url);
            return Ok(None);
        }

        let classification = response
            .error_for_status()?
            .json::<CanonicalClassification>()
            .await?;
        Ok(Some(classification))
    }

    pub fn schedule_url(&self, season: i32) -> String {
        format!("{}/{}/schedule.json", self.base_url, season)
    }

    pub async fn fetch_schedule(&self, season: i32) -> Result<SeasonSchedule> {
        let url = self.schedule_url(season);
        debug!("Fetching schedule from {}", url);
        let schedule = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<CanonicalSchedule>()
            .await?;
        finalize_schedule(&schedule, season)
    }
}

#[async_trait]
impl OutcomeFeed for HttpFeed {
    async fn outcome_for(&self, event: &Event) -> storage::error::Result<Option<Outcome>> {
        let Some(classification) = self.fetch(event).await? else {
            return Ok(None);
        };
        Ok(Some(finalize(&classification, event)?))
    }
}
