pub mod canonical;
pub mod config;
pub mod error;
pub mod sources;

pub use config::{Config, FeedLocation};
pub use error::{FeedError, Result};
pub use sources::{HttpFeed, JsonDirectoryFeed};
