use std::time::{Duration, Instant};

/// 3.5 flashes, each made of a fade out and a fade in.
pub const FADE_PHASES: u32 = 7;

/// The "Downloading N images..." banner.
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    started: Instant,
    phase: Duration,
}

impl Notification {
    pub fn downloading(count: usize, phase: Duration, now: Instant) -> Self {
        let noun = if count > 1 { "images" } else { "image" };
        Self {
            text: format!("Downloading {count} {noun}..."),
            started: now,
            phase,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.phase * FADE_PHASES
    }

    /// Opacity in `0.0..=1.0`. Starts fully visible and fades out first.
    pub fn opacity(&self, now: Instant) -> f32 {
        if self.phase.is_zero() || self.is_expired(now) {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let phase = self.phase.as_secs_f32();
        let index = (elapsed / phase) as u32;
        let progress = (elapsed % phase) / phase;
        if index % 2 == 0 {
            1.0 - progress
        } else {
            progress
        }
    }
}
