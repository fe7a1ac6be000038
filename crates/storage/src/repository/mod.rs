pub mod contract;
pub mod event;
pub mod league;
pub mod memory;
pub mod postgres;
pub mod prediction;
pub mod roster;
pub mod score;

pub use contract::{LeagueStore, OutcomeFeed, PredictionStore, RosterSource, ScheduleStore};
pub use memory::InMemoryStore;
pub use postgres::PgStore;
