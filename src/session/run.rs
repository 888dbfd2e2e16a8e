//! The per-match event loop

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::effects::EffectList;
use crate::game::GameModel;
use crate::http::MatchStarter;
use crate::input::{select_scheme, ControlContext, ControlScheme, InputEvent};
use crate::render::{Canvas, LayoutAdapter, Renderer, Viewport};
use crate::util::time::{earliest, frame_period};
use crate::ws::{CloseReason, Connection, ConnectionEvent};

use super::dispatch::dispatch;
use super::{MatchOutcome, SessionConfig, Surface};

/// One live match. Owns the connection, model, effects, controls and canvas;
/// every handler runs on this task so nothing is shared.
pub(super) struct Session {
    config: SessionConfig,
    connection: Connection,
    model: GameModel,
    effects: EffectList,
    scheme: Box<dyn ControlScheme>,
    adapter: LayoutAdapter,
    renderer: Renderer,
    canvas: Option<Box<dyn Canvas>>,
    input: mpsc::UnboundedReceiver<InputEvent>,
    viewport: watch::Receiver<Viewport>,
    starter: Option<Arc<dyn MatchStarter>>,
    start_task: Option<JoinHandle<()>>,
}

impl Session {
    pub(super) fn new(
        config: SessionConfig,
        surface: Surface,
        mut connection: Connection,
        starter: Option<Arc<dyn MatchStarter>>,
    ) -> Self {
        let ctx = ControlContext {
            match_id: config.match_id.clone(),
            role: config.role,
            device: config.device,
        };
        let scheme = select_scheme(&ctx, &surface.touch_zones);
        let adapter = LayoutAdapter::new(config.device, config.min_scale);
        let renderer = Renderer::new(adapter.compute(*surface.viewport.borrow()));

        if surface.canvas.is_none() {
            warn!(match_id = %config.match_id, "No canvas mounted, running without rendering");
        }

        let match_id = config.match_id.clone();
        connection.on_close(move |reason| {
            info!(match_id = %match_id, reason = ?reason, "Match completed");
        });

        Self {
            config,
            connection,
            model: GameModel::new(),
            effects: EffectList::new(),
            scheme,
            adapter,
            renderer,
            canvas: surface.canvas,
            input: surface.input,
            viewport: surface.viewport,
            starter,
            start_task: None,
        }
    }

    /// Run until the match ends, tear down, and report the outcome
    pub(super) async fn run(mut self) -> MatchOutcome {
        info!(
            match_id = %self.config.match_id,
            role = %self.config.role,
            scheme = self.scheme.name(),
            "Session started"
        );

        let mut frames = interval(frame_period(self.config.frame_rate));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut input_open = true;
        let mut viewport_open = true;

        let reason = loop {
            let deadline = earliest(self.model.next_deadline(), self.effects.next_deadline());
            let rendering = self.canvas.is_some();

            tokio::select! {
                event = self.connection.next_event() => match event {
                    ConnectionEvent::Opened => self.on_open(),
                    ConnectionEvent::Message(msg) => {
                        if let Some(reason) = dispatch(msg, &mut self.model, &mut self.effects, Instant::now()) {
                            break self.connection.finish(reason);
                        }
                    }
                    ConnectionEvent::Ignored => {}
                    ConnectionEvent::Closed(reason) => break reason,
                },

                event = self.input.recv(), if input_open => match event {
                    Some(event) => self.on_input(event),
                    None => {
                        debug!(match_id = %self.config.match_id, "Input source closed");
                        input_open = false;
                    }
                },

                changed = self.viewport.changed(), if viewport_open => match changed {
                    Ok(()) => self.relayout(),
                    Err(_) => viewport_open = false,
                },

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let now = Instant::now();
                    let fired = self.model.expire(now);
                    let pruned = self.effects.prune(now);
                    trace!(fired, pruned, "Timers fired");
                }

                _ = frames.tick(), if rendering => self.draw(Instant::now()),
            }
        };

        let outcome = self.teardown(reason);
        // The socket task must be gone before the caller frees the slot
        self.connection.shutdown().await;
        outcome
    }

    fn on_open(&mut self) {
        if !self.scheme.bind() {
            warn!(match_id = %self.config.match_id, role = %self.config.role, "No controls bound");
        }

        if let Some(starter) = self.starter.clone() {
            let match_id = self.config.match_id.clone();
            self.start_task = Some(tokio::spawn(async move {
                if let Err(e) = starter.start(&match_id).await {
                    warn!(match_id = %match_id, error = %e, "Match start request failed");
                }
            }));
        }
    }

    fn on_input(&mut self, event: InputEvent) {
        if let Some(command) = self.scheme.translate(&event) {
            trace!(?command, "Input translated");
            self.connection.send(&command);
        }
    }

    fn relayout(&mut self) {
        let viewport = *self.viewport.borrow_and_update();
        let layout = self.adapter.compute(viewport);
        debug!(scale = layout.scale, rotated = layout.rotated, "Layout updated");
        self.renderer.set_layout(layout);
    }

    fn draw(&mut self, now: Instant) {
        self.effects.prune(now);
        if let Some(canvas) = self.canvas.as_deref_mut() {
            self.renderer.draw_frame(canvas, &self.model, &self.effects, now);
        }
    }

    fn teardown(&mut self, reason: CloseReason) -> MatchOutcome {
        if let Some(task) = self.start_task.take() {
            task.abort();
        }

        let score = self.model.state().score;
        self.model.clear();
        self.effects.clear();
        self.scheme.unbind();

        if reason == CloseReason::TransportClosed {
            warn!(match_id = %self.config.match_id, "Connection lost, match ended");
        }
        info!(
            match_id = %self.config.match_id,
            reason = ?reason,
            left = score.left,
            right = score.right,
            "Session torn down"
        );

        MatchOutcome {
            match_id: self.config.match_id.clone(),
            reason,
            score,
            finished_at: Utc::now(),
        }
    }
}
