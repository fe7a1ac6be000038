use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use storage::dto::schedule::SeasonSchedule;
use storage::repository::OutcomeFeed;
use storage::services::ScoringPolicy;

use crate::sources::{HttpFeed, JsonDirectoryFeed};

/// Where published classifications are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Directory(PathBuf),
    Http(String),
}

impl FromStr for FeedLocation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Http(s.to_string()))
        } else {
            Ok(Self::Directory(PathBuf::from(s)))
        }
    }
}

impl FeedLocation {
    pub fn connect(&self) -> Result<Box<dyn OutcomeFeed>> {
        Ok(match self {
            Self::Directory(root) => Box::new(JsonDirectoryFeed::new(root.clone())),
            Self::Http(base_url) => {
                Box::new(HttpFeed::new(base_url.clone()).context("Cannot build HTTP feed client")?)
            }
        })
    }

    pub async fn load_schedule(&self, season: i32) -> Result<SeasonSchedule> {
        let schedule = match self {
            Self::Directory(root) => JsonDirectoryFeed::new(root.clone())
                .load_schedule(season)
                .await?,
            Self::Http(base_url) => HttpFeed::new(base_url.clone())
                .context("Cannot build HTTP feed client")?
                .fetch_schedule(season)
                .await?,
        };
        Ok(schedule)
    }
}

/// Settings resolved by the CLI from flags, the environment and `.env`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database_url: Option<String>,
    pub outcome_feed: Option<FeedLocation>,
    pub scoring_policy: Option<PathBuf>,
}

impl Config {
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL is not set (use --database-url or the environment)")
    }

    pub fn outcome_feed(&self) -> Result<&FeedLocation> {
        self.outcome_feed
            .as_ref()
            .context("OUTCOME_FEED is not set (use --feed or the environment)")
    }

    /// The configured policy table, or the built-in defaults when none is set.
    pub fn scoring_policy(&self) -> Result<ScoringPolicy> {
        match &self.scoring_policy {
            Some(path) => load_policy(path),
            None => Ok(ScoringPolicy::default()),
        }
    }
}

pub fn load_policy(path: &Path) -> Result<ScoringPolicy> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read scoring policy {}", path.display()))?;
    let policy: ScoringPolicy = serde_json::from_str(&json)
        .with_context(|| format!("Invalid scoring policy {}", path.display()))?;

    if let Err(reason) = policy.validate() {
        bail!("Invalid scoring policy {}: {}", path.display(), reason);
    }
    Ok(policy)
}
