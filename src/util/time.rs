//! Time utilities for the client loop

use std::time::Duration;

use tokio::time::Instant;

/// Default animation frame rate
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Interval between two animation frames
pub fn frame_period(frame_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64)
}

/// Seconds as sent by the server, clamped to a valid duration
pub fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// `elapsed / duration` clamped to [0, 1]
pub fn progress(started: Instant, duration: Duration, now: Instant) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(started);
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Earliest of two optional deadlines
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_period_for_sixty_hz() {
        assert_eq!(frame_period(60).as_micros(), 16_666);
        assert_eq!(frame_period(0), Duration::from_secs(1));
    }

    #[test]
    fn secs_rejects_negative_and_nan() {
        assert_eq!(secs(2.5), Duration::from_millis(2500));
        assert_eq!(secs(-1.0), Duration::ZERO);
        assert_eq!(secs(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn progress_is_clamped() {
        let start = Instant::now();
        let d = Duration::from_millis(300);
        assert_eq!(progress(start, d, start), 0.0);
        assert!((progress(start, d, start + Duration::from_millis(150)) - 0.5).abs() < 1e-4);
        assert_eq!(progress(start, d, start + Duration::from_secs(5)), 1.0);
        assert_eq!(progress(start, Duration::ZERO, start), 1.0);
    }

    #[test]
    fn earliest_picks_min() {
        let now = Instant::now();
        let later = now + Duration::from_secs(1);
        assert_eq!(earliest(Some(later), Some(now)), Some(now));
        assert_eq!(earliest(None, Some(later)), Some(later));
        assert_eq!(earliest(None, None), None);
    }
}
