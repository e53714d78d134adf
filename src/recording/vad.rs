// Voice activity detection over one window of PCM samples
//
// Deliberately stateless: repeated calls never retain history. Hysteresis
// (bridging brief silences, sustained-voice requirements) belongs to the
// recording engine, not here.

use serde::{Deserialize, Serialize};

use crate::audio_constants::{DEFAULT_MAX_THRESHOLD, DEFAULT_MEAN_THRESHOLD};

/// Thresholds for the amplitude-based voice decision.
///
/// # Threshold Rationale
///
/// Historical tunings of these values disagreed from one microphone stage
/// to the next, so both are configuration inputs rather than constants
/// baked into the algorithm. Either threshold alone is sufficient to call
/// a window voice (conservative, low-miss design): the mean path responds
/// to sustained speech energy, the peak path to plosives and short bursts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VadConfig {
    /// Mean absolute amplitude above which a window counts as voice
    pub mean_threshold: i32,
    /// Peak absolute amplitude above which a window counts as voice
    pub max_threshold: i32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            mean_threshold: DEFAULT_MEAN_THRESHOLD,
            max_threshold: DEFAULT_MAX_THRESHOLD,
        }
    }
}

impl VadConfig {
    /// Config with explicit thresholds.
    pub fn with_thresholds(mean_threshold: i32, max_threshold: i32) -> Self {
        Self { mean_threshold, max_threshold }
    }
}

/// Amplitude and zero-crossing statistics for one window.
///
/// Amplitudes are measured after removing the window's own mean, so a
/// residual DC offset in the capture chain does not inflate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowStats {
    /// Count of negative to non-negative transitions
    pub zero_crossings: u32,
    /// Mean absolute amplitude after mean removal
    pub mean_amplitude: i32,
    /// Maximum absolute amplitude after mean removal
    pub max_amplitude: i32,
}

impl WindowStats {
    /// Compute statistics for a window of samples.
    ///
    /// A zero-length window yields all-zero statistics.
    pub fn from_window(window: &[i16]) -> Self {
        if window.is_empty() {
            return Self::default();
        }

        let sum: i64 = window.iter().map(|&s| s as i64).sum();
        let mean = sum / window.len() as i64;

        let mut zero_crossings = 0u32;
        let mut sum_abs = 0i64;
        let mut max_amplitude = 0i64;
        let mut prev_negative = (window[0] as i64 - mean) < 0;

        for &sample in window {
            let centered = sample as i64 - mean;
            let negative = centered < 0;
            if prev_negative && !negative {
                zero_crossings += 1;
            }
            prev_negative = negative;

            let abs = centered.abs();
            sum_abs += abs;
            if abs > max_amplitude {
                max_amplitude = abs;
            }
        }

        Self {
            zero_crossings,
            mean_amplitude: (sum_abs / window.len() as i64) as i32,
            max_amplitude: max_amplitude as i32,
        }
    }
}

/// Stateless window classifier.
#[derive(Debug, Clone)]
pub struct VoiceDetector {
    config: VadConfig,
}

impl VoiceDetector {
    pub fn new(config: VadConfig) -> Self {
        Self { config }
    }

    /// Classify a window directly.
    pub fn classify(&self, window: &[i16]) -> bool {
        self.decide(&WindowStats::from_window(window))
    }

    /// Apply the decision rule to precomputed statistics.
    pub fn decide(&self, stats: &WindowStats) -> bool {
        stats.mean_amplitude > self.config.mean_threshold
            || stats.max_amplitude > self.config.max_threshold
    }

    pub fn config(&self) -> &VadConfig {
        &self.config
    }
}

impl Default for VoiceDetector {
    fn default() -> Self {
        Self::new(VadConfig::default())
    }
}
