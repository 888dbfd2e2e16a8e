//! Match-start request fired once the socket is open

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

/// Reply body of the start endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartReply {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl StartReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),

    #[error("Server refused to start the match: {0}")]
    Rejected(String),
}

/// Hook run when the match socket opens
pub trait MatchStarter: Send + Sync {
    fn start<'a>(&'a self, match_id: &'a str) -> BoxFuture<'a, Result<StartReply, StartError>>;
}

/// Posts `game_id` as a form to a fixed endpoint
#[derive(Clone)]
pub struct HttpStarter {
    client: Client,
    url: String,
}

impl HttpStarter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, match_id: &str) -> Result<StartReply, StartError> {
        debug!(url = %self.url, match_id = %match_id, "Requesting match start");

        let response = self
            .client
            .post(&self.url)
            .form(&[("game_id", match_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StartError::Api { status: status.as_u16(), body });
        }

        let reply: StartReply = response.json().await.map_err(StartError::Parse)?;
        if !reply.is_success() {
            return Err(StartError::Rejected(reply.message));
        }

        info!(match_id = %match_id, message = %reply.message, "Match started");
        Ok(reply)
    }
}

impl MatchStarter for HttpStarter {
    fn start<'a>(&'a self, match_id: &'a str) -> BoxFuture<'a, Result<StartReply, StartError>> {
        Box::pin(self.post(match_id))
    }
}
