//! Capture diagnostics collected per recording session.
//!
//! Replaces ad hoc counters and prints in the sampling loop with one
//! engine-owned collector that is reset at the start of every session and
//! emits at a bounded rate, never per sample.

use std::time::{Duration, Instant};

use crate::audio_constants::DIAG_EMIT_INTERVAL_MS;

/// Per-session counters for the capture path.
#[derive(Debug)]
pub struct CaptureDiagnostics {
    /// Windows read from the capture source this session
    windows: u64,
    /// Windows the VAD classified as voice
    voice_windows: u64,
    /// Samples that hit the saturating clamp during conversion
    clipped_samples: u64,
    /// Largest absolute amplitude observed this session
    peak_amplitude: i32,
    /// When the last periodic line was emitted
    last_emit: Option<Instant>,
    emit_interval: Duration,
}

impl CaptureDiagnostics {
    pub fn new() -> Self {
        Self::with_emit_interval(Duration::from_millis(DIAG_EMIT_INTERVAL_MS))
    }

    /// Collector with a custom emission rate limit.
    pub fn with_emit_interval(emit_interval: Duration) -> Self {
        Self {
            windows: 0,
            voice_windows: 0,
            clipped_samples: 0,
            peak_amplitude: 0,
            last_emit: None,
            emit_interval,
        }
    }

    /// Clear all counters for a new recording session.
    pub fn reset(&mut self) {
        self.windows = 0;
        self.voice_windows = 0;
        self.clipped_samples = 0;
        self.peak_amplitude = 0;
        self.last_emit = None;
    }

    /// Record one classified window.
    pub fn record_window(&mut self, max_amplitude: i32, voice: bool, clipped: usize) {
        self.windows += 1;
        if voice {
            self.voice_windows += 1;
        }
        self.clipped_samples += clipped as u64;
        if max_amplitude > self.peak_amplitude {
            self.peak_amplitude = max_amplitude;
        }
    }

    /// Emit a debug line at most once per emission interval.
    pub fn log_periodic(&mut self, now: Instant) {
        let due = match self.last_emit {
            None => true,
            Some(last) => now.duration_since(last) >= self.emit_interval,
        };
        if !due {
            return;
        }
        self.last_emit = Some(now);
        crate::debug!(
            "[capture] windows={} voice={} clipped={} peak={}",
            self.windows,
            self.voice_windows,
            self.clipped_samples,
            self.peak_amplitude
        );
    }

    /// Log the session totals (call when the session ends).
    pub fn log_summary(&self) {
        crate::info!(
            "[capture] session summary: {} windows ({} voice), {} clipped samples, peak amplitude {}",
            self.windows,
            self.voice_windows,
            self.clipped_samples,
            self.peak_amplitude
        );
    }

    pub fn windows(&self) -> u64 {
        self.windows
    }

    pub fn voice_windows(&self) -> u64 {
        self.voice_windows
    }

    pub fn clipped_samples(&self) -> u64 {
        self.clipped_samples
    }

    pub fn peak_amplitude(&self) -> i32 {
        self.peak_amplitude
    }
}

impl Default for CaptureDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
