//! Match sessions: the launch entry point, the per-match event loop and its
//! completion handle

mod dispatch;
mod launcher;
mod run;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};

use crate::game::Score;
use crate::input::{DeviceClass, InputEvent, Role, TouchZone};
use crate::render::{Canvas, Viewport};
use crate::ws::CloseReason;

pub use dispatch::dispatch;
pub use launcher::Launcher;

/// Everything needed to play one match
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub match_id: String,
    pub role: Role,
    pub device: DeviceClass,
    pub socket_url: String,
    pub frame_rate: u32,
    pub min_scale: f32,
    /// Endpoint the match-start hook posts to
    pub start_url: Option<String>,
}

/// Host-provided mount points for a session
pub struct Surface {
    /// `None` means no drawing surface; the session runs without a frame loop
    pub canvas: Option<Box<dyn Canvas>>,
    /// Touch buttons actually present on screen
    pub touch_zones: Vec<TouchZone>,
    input: mpsc::UnboundedReceiver<InputEvent>,
    viewport: watch::Receiver<Viewport>,
}

impl Surface {
    pub fn new(
        canvas: Option<Box<dyn Canvas>>,
        touch_zones: Vec<TouchZone>,
        viewport: Viewport,
    ) -> (Surface, SurfaceControl) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (viewport_tx, viewport_rx) = watch::channel(viewport);
        (
            Surface {
                canvas,
                touch_zones,
                input: input_rx,
                viewport: viewport_rx,
            },
            SurfaceControl {
                input: input_tx,
                viewport: viewport_tx,
            },
        )
    }
}

/// Host side of a `Surface`: feeds key, touch and resize events
#[derive(Clone)]
pub struct SurfaceControl {
    input: mpsc::UnboundedSender<InputEvent>,
    viewport: watch::Sender<Viewport>,
}

impl SurfaceControl {
    /// Returns false once the session is gone
    pub fn send(&self, event: InputEvent) -> bool {
        self.input.send(event).is_ok()
    }

    pub fn key_down(&self, key: &str) -> bool {
        self.send(InputEvent::KeyDown {
            key: key.to_string(),
            repeat: false,
        })
    }

    pub fn key_repeat(&self, key: &str) -> bool {
        self.send(InputEvent::KeyDown {
            key: key.to_string(),
            repeat: true,
        })
    }

    pub fn key_up(&self, key: &str) -> bool {
        self.send(InputEvent::KeyUp {
            key: key.to_string(),
        })
    }

    pub fn touch_start(&self, zone: TouchZone) -> bool {
        self.send(InputEvent::TouchStart { zone })
    }

    pub fn touch_end(&self, zone: TouchZone) -> bool {
        self.send(InputEvent::TouchEnd { zone })
    }

    pub fn resize(&self, width: f32, height: f32) -> bool {
        self.viewport.send(Viewport::new(width, height)).is_ok()
    }
}

/// Completion value of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub match_id: String,
    #[serde(flatten)]
    pub reason: CloseReason,
    /// Last score seen before the match ended
    pub score: Score,
    pub finished_at: DateTime<Utc>,
}

/// Resolves exactly once, after teardown has finished
#[derive(Debug)]
pub struct MatchHandle {
    match_id: String,
    done: oneshot::Receiver<MatchOutcome>,
}

impl MatchHandle {
    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub async fn finished(self) -> Result<MatchOutcome, SessionError> {
        self.done.await.map_err(|_| SessionError::Aborted(self.match_id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid session config: {0}")]
    InvalidConfig(&'static str),

    #[error("Launcher shut down")]
    LauncherClosed,

    #[error("Session for match {0} ended without an outcome")]
    Aborted(String),
}
