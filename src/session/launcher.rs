//! Entry point: starts a session and hands back its completion handle

use std::sync::Arc;

use tokio::sync::{oneshot, Semaphore};
use tracing::{debug, info};

use crate::http::{HttpStarter, MatchStarter};
use crate::ws::Connection;

use super::run::Session;
use super::{MatchHandle, SessionConfig, SessionError, Surface};

/// Launches match sessions, at most one at a time.
///
/// The slot is held from launch until teardown has finished, so a second
/// launch waits instead of fighting over the socket and canvas.
#[derive(Clone)]
pub struct Launcher {
    slot: Arc<Semaphore>,
    starter: Option<Arc<dyn MatchStarter>>,
}

impl Launcher {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
            starter: None,
        }
    }

    /// Use `starter` instead of posting to the configured start URL
    pub fn with_starter(mut self, starter: Arc<dyn MatchStarter>) -> Self {
        self.starter = Some(starter);
        self
    }

    /// Whether a session currently owns the slot
    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }

    /// Open the match socket and run the session on it
    pub async fn launch(
        &self,
        config: SessionConfig,
        surface: Surface,
    ) -> Result<MatchHandle, SessionError> {
        validate(&config)?;
        let permit = self.acquire(&config).await?;
        let connection = Connection::open(config.match_id.clone(), &config.socket_url);
        Ok(self.spawn(config, surface, connection, permit))
    }

    /// Run a session over an existing connection
    pub async fn launch_with(
        &self,
        config: SessionConfig,
        surface: Surface,
        connection: Connection,
    ) -> Result<MatchHandle, SessionError> {
        validate(&config)?;
        let permit = self.acquire(&config).await?;
        Ok(self.spawn(config, surface, connection, permit))
    }

    async fn acquire(
        &self,
        config: &SessionConfig,
    ) -> Result<tokio::sync::OwnedSemaphorePermit, SessionError> {
        if self.is_busy() {
            debug!(match_id = %config.match_id, "Waiting for the previous session to finish");
        }
        self.slot
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SessionError::LauncherClosed)
    }

    fn spawn(
        &self,
        config: SessionConfig,
        surface: Surface,
        connection: Connection,
        permit: tokio::sync::OwnedSemaphorePermit,
    ) -> MatchHandle {
        let starter = self.starter.clone().or_else(|| {
            config
                .start_url
                .as_ref()
                .map(|url| Arc::new(HttpStarter::new(url.clone())) as Arc<dyn MatchStarter>)
        });

        let match_id = config.match_id.clone();
        info!(match_id = %match_id, socket = %config.socket_url, "Launching session");

        let session = Session::new(config, surface, connection, starter);
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(async move {
            let outcome = session.run().await;
            drop(permit);
            // Nobody waiting is fine
            let _ = done_tx.send(outcome);
        });

        MatchHandle {
            match_id,
            done: done_rx,
        }
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(config: &SessionConfig) -> Result<(), SessionError> {
    if config.match_id.trim().is_empty() {
        return Err(SessionError::InvalidConfig("match id is empty"));
    }
    if config.frame_rate == 0 {
        return Err(SessionError::InvalidConfig("frame rate must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DeviceClass, Role};
    use crate::render::Viewport;
    use crate::ws::Transport;

    fn config(id: &str) -> SessionConfig {
        SessionConfig {
            match_id: id.to_string(),
            role: Role::Both,
            device: DeviceClass::Pointer,
            socket_url: format!("ws://127.0.0.1:1/ws/pong/{}/", id),
            frame_rate: 60,
            min_scale: 0.25,
            start_url: None,
        }
    }

    #[tokio::test]
    async fn rejects_empty_match_id() {
        let (surface, _control) = Surface::new(None, Vec::new(), Viewport::default());
        let (transport, _peer) = Transport::loopback();
        let err = Launcher::new()
            .launch_with(config(" "), surface, Connection::with_transport(" ", transport))
            .await
            .err();
        assert!(matches!(err, Some(SessionError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn slot_frees_after_completion() {
        let launcher = Launcher::new();
        let (surface, _control) = Surface::new(None, Vec::new(), Viewport::default());
        let (transport, peer) = Transport::loopback();

        let handle = launcher
            .launch_with(config("3"), surface, Connection::with_transport("3", transport))
            .await
            .unwrap();
        assert!(launcher.is_busy());

        peer.close();
        let outcome = handle.finished().await.unwrap();
        assert_eq!(outcome.match_id, "3");
        assert!(!launcher.is_busy());
    }
}
