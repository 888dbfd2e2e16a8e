//! Pong Live - real-time client engine for server-driven Pong matches
//!
//! Keeps one WebSocket per match, mirrors the authoritative state the server
//! broadcasts, layers client-only effects on top, turns key/touch input into
//! movement commands and paints every frame through a `Canvas`.

pub mod config;
pub mod effects;
pub mod game;
pub mod http;
pub mod input;
pub mod render;
pub mod session;
pub mod util;
pub mod ws;

pub use config::{Config, ConfigError};
pub use session::{Launcher, MatchHandle, MatchOutcome, SessionConfig, SessionError, Surface, SurfaceControl};
