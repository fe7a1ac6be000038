pub mod comparator;
pub mod deadline;
pub mod engine;
pub mod league;
pub mod policy;
pub mod schedule;
pub mod scoring;
pub mod standings;
pub mod streak;
pub mod underdog;
pub mod validation;

pub use engine::{get_standings, score_event, score_season, submit_prediction};
pub use policy::ScoringPolicy;
pub use schedule::sync_schedule;
