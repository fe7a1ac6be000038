use chrono::{DateTime, Duration, Utc};

use crate::models::Event;

/// Hours before the scheduled start at which submissions close.
pub const SUBMISSION_LAG_HOURS: i64 = 24;

pub fn deadline(event: &Event) -> DateTime<Utc> {
    event.starts_at - Duration::hours(SUBMISSION_LAG_HOURS)
}

/// Locked from the deadline instant onwards.
pub fn is_locked(event: &Event, now: DateTime<Utc>) -> bool {
    now >= deadline(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn event_starting(starts_at: DateTime<Utc>) -> Event {
        Event {
            event_id: Uuid::new_v4(),
            season: 2025,
            round: 1,
            name: "Australian Grand Prix".to_string(),
            country: "Australia".to_string(),
            location: "Melbourne".to_string(),
            circuit_name: "Albert Park".to_string(),
            starts_at,
            has_sprint: false,
        }
    }

    #[test]
    fn test_deadline_is_one_day_before_start() {
        let starts_at = Utc.with_ymd_and_hms(2025, 3, 16, 4, 0, 0).unwrap();
        let event = event_starting(starts_at);
        assert_eq!(
            deadline(&event),
            Utc.with_ymd_and_hms(2025, 3, 15, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_lock_boundary() {
        let starts_at = Utc.with_ymd_and_hms(2025, 3, 16, 4, 0, 0).unwrap();
        let event = event_starting(starts_at);
        let cutoff = deadline(&event);

        assert!(!is_locked(&event, cutoff - Duration::seconds(1)));
        assert!(is_locked(&event, cutoff));
        assert!(is_locked(&event, cutoff + Duration::hours(1)));
    }
}
