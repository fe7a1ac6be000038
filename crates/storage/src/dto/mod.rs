pub mod league;
pub mod prediction;
pub mod schedule;
pub mod score;
