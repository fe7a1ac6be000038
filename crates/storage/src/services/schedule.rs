use tracing::{debug, info};
use validator::Validate;

use crate::dto::schedule::{ScheduleSyncReport, SeasonSchedule};
use crate::error::EngineResult;
use crate::repository::ScheduleStore;

/// Writes a season's calendar and roster to the store.
///
/// The whole schedule is validated before anything is written. Rounds and
/// drivers already present are updated in place, so events keep their ids
/// and the predictions made against them.
pub async fn sync_schedule<S>(
    store: &S,
    schedule: &SeasonSchedule,
) -> EngineResult<ScheduleSyncReport>
where
    S: ScheduleStore + ?Sized,
{
    schedule.validate()?;

    for scheduled in &schedule.events {
        let event = store.upsert_event(schedule.season, scheduled).await?;
        debug!(event_id = %event.event_id, round = event.round, "Event synced");
    }
    for driver in &schedule.drivers {
        store.upsert_season_driver(schedule.season, driver).await?;
    }

    info!(
        season = schedule.season,
        events = schedule.events.len(),
        drivers = schedule.drivers.len(),
        "Schedule synced"
    );

    Ok(ScheduleSyncReport {
        season: schedule.season,
        events_synced: schedule.events.len(),
        drivers_synced: schedule.drivers.len(),
    })
}
