pub mod driver;
pub mod event;
pub mod league;
pub mod outcome;
pub mod prediction;
pub mod score;
pub mod standing;

pub use driver::DriverNumber;
pub use event::Event;
pub use league::{League, LeagueMember};
pub use outcome::Outcome;
pub use prediction::{Category, Prediction, TOP_TEN};
pub use score::{Score, ScoreComponents};
pub use standing::Standing;
