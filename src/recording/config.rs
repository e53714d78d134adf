// Recording engine configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::vad::VadConfig;
use crate::audio::{CaptureConfig, WavFormat};
use crate::audio_constants::{
    arena_capacity_bytes, read_interval_micros, DEFAULT_BITS_PER_SAMPLE, DEFAULT_CHANNELS,
    DEFAULT_MAX_RECORD_SECS, DEFAULT_SAMPLE_RATE, DEFAULT_SILENCE_TIMEOUT_MS,
    DEFAULT_WINDOW_SIZE,
};

/// Configuration for one recording engine.
///
/// Serde-ready so a collaborator can load it from a settings file; every
/// field has a working default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Sample rate of produced PCM (Hz)
    pub sample_rate: u32,
    /// Channel count (the engine only produces mono)
    pub channels: u16,
    /// PCM bit depth (only 16-bit is supported)
    pub bits_per_sample: u16,
    /// Hard cap on session duration (seconds); also sizes the arena
    pub max_record_secs: u32,
    /// Silence sustained this long after speech stops the session (ms)
    pub silence_timeout_ms: u32,
    /// Samples per VAD window
    pub window_size: usize,
    /// Voice activity thresholds
    pub vad: VadConfig,
    /// Capture source settings
    pub capture: CaptureConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
            max_record_secs: DEFAULT_MAX_RECORD_SECS,
            silence_timeout_ms: DEFAULT_SILENCE_TIMEOUT_MS,
            window_size: DEFAULT_WINDOW_SIZE,
            vad: VadConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

impl RecorderConfig {
    /// Arena capacity in bytes: header plus the full-duration payload.
    pub fn arena_capacity(&self) -> usize {
        arena_capacity_bytes(self.max_record_secs, self.sample_rate, self.channels)
    }

    /// Minimum spacing between capture-source reads.
    pub fn read_interval(&self) -> Duration {
        Duration::from_micros(read_interval_micros(self.sample_rate))
    }

    /// Hard cap on session duration.
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_record_secs as u64)
    }

    /// Silence window that ends a session after speech.
    pub fn silence_timeout(&self) -> Duration {
        Duration::from_millis(self.silence_timeout_ms as u64)
    }

    /// Container header parameters for this configuration.
    pub fn wav_format(&self) -> WavFormat {
        WavFormat {
            sample_rate: self.sample_rate,
            channels: self.channels,
            bits_per_sample: self.bits_per_sample,
        }
    }
}
