use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::DriverNumber;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    #[error("External source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }
}

/// What is wrong with a submitted top-ten list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopTenDefect {
    WrongLength(usize),
    Duplicate(DriverNumber),
}

impl std::fmt::Display for TopTenDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongLength(len) => write!(f, "expected 10 drivers, got {len}"),
            Self::Duplicate(driver) => write!(f, "driver {driver} appears more than once"),
        }
    }
}

/// Rejections of a submitted prediction. Shown to the submitter as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Predictions for this event closed at {deadline}")]
    DeadlinePassed { deadline: DateTime<Utc> },

    #[error("Malformed top ten: {0}")]
    MalformedTopTen(TopTenDefect),

    #[error("Driver {0} is not on the roster for this season")]
    UnknownDriver(DriverNumber),

    #[error("This event has no sprint, sprint winner must be left empty")]
    SprintNotApplicable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Event {0} does not exist")]
    EventNotFound(Uuid),

    #[error("Event {0} has no finalized outcome yet")]
    OutcomeNotFinalized(Uuid),

    #[error("League {0} does not exist")]
    LeagueNotFound(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("Only the league owner can remove members")]
    NotOwner,

    #[error("The league owner cannot be removed")]
    OwnerRemoval,

    #[error("User {0} is not a member of this league")]
    NotMember(Uuid),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Membership(#[from] MembershipError),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
