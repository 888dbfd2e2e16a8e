//! Pong Live - headless match client
//!
//! Joins one match and plays it from the terminal:
//! - connects to the match socket and mirrors the server state
//! - renders every frame into an in-memory canvas
//! - reads key, touch and resize events from stdin, one per line
//!
//! Input lines: `down <key>`, `up <key>`, `touch+ <left|right> <up|down>`,
//! `touch- <left|right> <up|down>`, `resize <width> <height>`.

use pong_live::input::{DeviceClass, TouchZone};
use pong_live::render::{RecordingCanvas, Viewport};
use pong_live::ws::protocol::{Direction, Side};
use pong_live::{Config, Launcher, Surface, SurfaceControl};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Pong Live client");
    info!("Match socket: {}", config.socket_url());

    let touch_zones = match config.device {
        DeviceClass::Touch => TouchZone::all().to_vec(),
        DeviceClass::Pointer => Vec::new(),
    };
    let (surface, control) = Surface::new(
        Some(Box::new(RecordingCanvas::new())),
        touch_zones,
        Viewport::default(),
    );

    let handle = Launcher::new().launch(config.session(), surface).await?;
    tokio::spawn(read_stdin(control));

    tokio::select! {
        outcome = handle.finished() => {
            let outcome = outcome?;
            info!(
                match_id = %outcome.match_id,
                reason = ?outcome.reason,
                left = outcome.score.left,
                right = outcome.score.right,
                "Match finished"
            );
            println!("{}", serde_json::to_string(&outcome)?);
        }
        _ = shutdown_signal() => {}
    }

    info!("Client shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Feed stdin lines into the session until either side goes away
async fn read_stdin(control: SurfaceControl) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read stdin");
                break;
            }
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        let delivered = match words.as_slice() {
            [] => continue,
            ["down", key] => control.key_down(key),
            ["up", key] => control.key_up(key),
            ["touch+", side, dir] | ["touch-", side, dir] => match parse_zone(side, dir) {
                Some(zone) if words[0] == "touch+" => control.touch_start(zone),
                Some(zone) => control.touch_end(zone),
                None => {
                    warn!(line = %line, "Unknown touch zone");
                    continue;
                }
            },
            ["resize", w, h] => match (w.parse(), h.parse()) {
                (Ok(w), Ok(h)) => control.resize(w, h),
                _ => {
                    warn!(line = %line, "Bad resize");
                    continue;
                }
            },
            _ => {
                warn!(line = %line, "Unrecognised input line");
                continue;
            }
        };

        if !delivered {
            break;
        }
    }
}

fn parse_zone(side: &str, direction: &str) -> Option<TouchZone> {
    let side = match side {
        "left" => Side::Left,
        "right" => Side::Right,
        _ => return None,
    };
    let direction = match direction {
        "up" => Direction::Up,
        "down" => Direction::Down,
        _ => return None,
    };
    Some(TouchZone::new(side, direction))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
