//! Client-side game state

pub mod model;
pub mod state;

pub use model::GameModel;
pub use state::{Ball, Bumper, MatchState, Paddle, Pickup, Score};

/// Logical play-surface width; the server simulates in this space
pub const FIELD_WIDTH: f32 = 800.0;
/// Logical play-surface height
pub const FIELD_HEIGHT: f32 = 400.0;
/// Inset of the drawn field border and paddle columns
pub const FIELD_MARGIN: f32 = 50.0;
