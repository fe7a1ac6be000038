pub mod file;
pub mod http;

pub use file::JsonDirectoryFeed;
pub use http::HttpFeed;

use storage::dto::schedule::SeasonSchedule;
use storage::models::{Event, Outcome};
use tracing::debug;

use crate::Result;
use crate::canonical::models::{CanonicalClassification, CanonicalSchedule};
use crate::canonical::transformer::{OutcomeTransformer, ScheduleTransformer};
use crate::canonical::validator::{ClassificationValidator, ScheduleValidator};

/// Shared tail of every source: validate, surface warnings, transform.
pub(crate) fn finalize(classification: &CanonicalClassification, event: &Event) -> Result<Outcome> {
    let report = ClassificationValidator::validate(classification)?;
    report.log_warnings();

    let outcome = OutcomeTransformer::for_event(classification, event)?;
    debug!(
        season = event.season,
        round = event.round,
        classified = outcome.finishing_order.len(),
        "Outcome ready"
    );
    Ok(outcome)
}

pub(crate) fn finalize_schedule(
    schedule: &CanonicalSchedule,
    season: i32,
) -> Result<SeasonSchedule> {
    let report = ScheduleValidator::validate(schedule)?;
    report.log_warnings();

    let schedule = ScheduleTransformer::for_season(schedule, season)?;
    debug!(
        season,
        events = schedule.events.len(),
        drivers = schedule.drivers.len(),
        "Schedule ready"
    );
    Ok(schedule)
}
