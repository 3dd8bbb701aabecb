//! Shared data model for the brodl tools: the workshop filter vocabulary and
//! the artifact filename convention that the download, inventory and organize
//! passes all agree on.

pub mod filename;
pub mod types;
pub mod util;

pub use filename::{sanitize_title, ArtifactName};
pub use types::{Difficulty, FilterParseError, GameplayType, TimePeriod};

/// Broforce's Steam app id, used to build workshop listing URLs.
pub const APP_ID: u32 = 274190;
