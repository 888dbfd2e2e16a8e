//! Configuration module - environment variable parsing

use std::env;

use crate::input::{DeviceClass, Role};
use crate::render::layout::DEFAULT_MIN_SCALE;
use crate::session::SessionConfig;
use crate::util::time::DEFAULT_FRAME_RATE;
use crate::ws::match_socket_url;

/// Client configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Base WebSocket URL of the game server
    pub server_url: String,
    /// Match to join
    pub match_id: String,
    /// Which paddle(s) this client drives
    pub role: Role,
    pub device: DeviceClass,
    /// Match-start endpoint, if this client starts the match
    pub start_url: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub frame_rate: u32,
    pub min_scale: f32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            server_url: var("SERVER_URL").unwrap_or_else(|| "ws://127.0.0.1:8000".to_string()),

            match_id: var("MATCH_ID").ok_or(ConfigError::Missing("MATCH_ID"))?,

            role: match var("PLAYER_ROLE") {
                Some(role) => role.parse().map_err(|_| ConfigError::Invalid("PLAYER_ROLE"))?,
                None => Role::Both,
            },
            device: match var("DEVICE_CLASS") {
                Some(device) => device
                    .parse()
                    .map_err(|_| ConfigError::Invalid("DEVICE_CLASS"))?,
                None => DeviceClass::Pointer,
            },

            start_url: var("START_URL"),

            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            frame_rate: match var("FRAME_RATE") {
                Some(rate) => rate
                    .parse()
                    .ok()
                    .filter(|rate| *rate > 0)
                    .ok_or(ConfigError::Invalid("FRAME_RATE"))?,
                None => DEFAULT_FRAME_RATE,
            },
            min_scale: match var("MIN_SCALE") {
                Some(scale) => scale
                    .parse::<f32>()
                    .ok()
                    .filter(|scale| scale.is_finite() && *scale > 0.0)
                    .ok_or(ConfigError::Invalid("MIN_SCALE"))?,
                None => DEFAULT_MIN_SCALE,
            },
        })
    }

    pub fn socket_url(&self) -> String {
        match_socket_url(&self.server_url, &self.match_id)
    }

    /// Library-level settings for one session
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            match_id: self.match_id.clone(),
            role: self.role,
            device: self.device,
            socket_url: self.socket_url(),
            frame_rate: self.frame_rate,
            min_scale: self.min_scale,
            start_url: self.start_url.clone(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
