//! Centralized constants for the capture engine.
//!
//! All audio-related magic numbers are defined here with documentation
//! explaining their purpose and constraints, instead of being scattered
//! through the sampling and recording code.

// =============================================================================
// SAMPLE FORMAT
// =============================================================================

/// Sample rate used throughout the capture pipeline (Hz).
///
/// 16 kHz mono is the standard rate for speech capture and what the
/// downstream recognition collaborator expects.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Channel count for captured audio. The engine only produces mono.
pub const DEFAULT_CHANNELS: u16 = 1;

/// Bit depth of produced PCM. Only signed 16-bit is supported.
pub const DEFAULT_BITS_PER_SAMPLE: u16 = 16;

/// Bytes per PCM sample at 16-bit depth.
pub const BYTES_PER_SAMPLE: usize = 2;

// =============================================================================
// CONTAINER
// =============================================================================

/// Size of the canonical RIFF/WAVE header for uncompressed PCM (bytes).
pub const WAV_HEADER_SIZE: usize = 44;

/// Byte offset of the RIFF overall-size field patched on finalize.
pub const RIFF_SIZE_OFFSET: usize = 4;

/// Byte offset of the data-chunk size field patched on finalize.
pub const DATA_SIZE_OFFSET: usize = 40;

// =============================================================================
// RECORDING LIFECYCLE
// =============================================================================

/// Hard cap on a single recording session (seconds). Sizes the arena.
pub const DEFAULT_MAX_RECORD_SECS: u32 = 10;

/// Silence sustained for this long after speech stops the session (ms).
pub const DEFAULT_SILENCE_TIMEOUT_MS: u32 = 3_000;

/// Number of samples classified per VAD window.
///
/// 256 samples is 16 ms at 16 kHz: short enough for responsive start/stop
/// decisions, long enough for stable amplitude statistics.
pub const DEFAULT_WINDOW_SIZE: usize = 256;

// =============================================================================
// VOICE ACTIVITY THRESHOLDS
// =============================================================================

/// Default mean-absolute-amplitude threshold for the VAD.
///
/// Historical tunings of this value varied widely between deployments and
/// microphones, so it is configuration (`VadConfig`), not a constant the
/// algorithm bakes in. The default suits a mid-gain analog electret stage.
pub const DEFAULT_MEAN_THRESHOLD: i32 = 500;

/// Default peak-amplitude threshold for the VAD.
///
/// Either threshold alone is sufficient to classify a window as voice; the
/// peak path catches plosives and short bursts the mean path smooths away.
pub const DEFAULT_MAX_THRESHOLD: i32 = 1_000;

// =============================================================================
// ANALOG FRONT END
// =============================================================================

/// Maximum raw count of the 12-bit analog converter.
pub const ADC_MAX_RAW: u16 = 4_095;

/// Fallback ADC reference voltage (mV) when no factory-trimmed value is
/// available from the hardware port.
pub const DEFAULT_VREF_MV: u32 = 1_100;

/// Number of anchor points in the characterization curve.
///
/// 33 anchors spaced `CAL_ANCHOR_STEP` counts apart cover the full 12-bit
/// range with linear interpolation between them.
pub const CAL_CURVE_ANCHORS: usize = 33;

/// Raw-count spacing between characterization anchors (4096 / 32).
pub const CAL_ANCHOR_STEP: usize = 128;

/// DC bias of the analog microphone stage (mV), subtracted from every
/// conversion before gain is applied. The electret front end sits at
/// mid-rail of the attenuated full scale.
pub const ADC_DC_BIAS_MV: i32 = 1_250;

/// Fixed gain applied to the bias-corrected signal before scaling to PCM.
pub const ADC_GAIN: i32 = 4;

/// Millivolt swing that maps to 16-bit full scale after bias removal.
pub const ADC_FULL_SCALE_MV: i32 = 1_250;

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Minimum spacing between periodic diagnostic emissions (ms).
///
/// Keeps diagnostics out of the hot sampling path: at most one debug line
/// per interval regardless of tick rate.
pub const DIAG_EMIT_INTERVAL_MS: u64 = 1_000;

// =============================================================================
// UTILITY FUNCTIONS
// =============================================================================

/// Minimum interval between capture-source reads for a sample rate (µs).
///
/// The cooperative tick loop is expected to run faster than this; ticks
/// that arrive early return without touching the hardware.
pub const fn read_interval_micros(sample_rate: u32) -> u64 {
    1_000_000 / sample_rate as u64
}

/// Arena capacity in bytes for a recording configuration: header plus
/// `secs * rate * channels * bytes-per-sample` of PCM payload.
pub const fn arena_capacity_bytes(max_record_secs: u32, sample_rate: u32, channels: u16) -> usize {
    WAV_HEADER_SIZE
        + max_record_secs as usize * sample_rate as usize * channels as usize * BYTES_PER_SAMPLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_interval_matches_sample_rate() {
        assert_eq!(read_interval_micros(16_000), 62);
        assert_eq!(read_interval_micros(8_000), 125);
        assert_eq!(read_interval_micros(1_000), 1_000);
    }

    #[test]
    fn test_arena_capacity_formula() {
        // 10s of 16kHz mono 16-bit plus the header
        assert_eq!(
            arena_capacity_bytes(DEFAULT_MAX_RECORD_SECS, DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS),
            WAV_HEADER_SIZE + 10 * 16_000 * 2
        );
        // Degenerate zero-duration config still reserves the header
        assert_eq!(arena_capacity_bytes(0, DEFAULT_SAMPLE_RATE, 1), WAV_HEADER_SIZE);
    }

    #[test]
    fn test_anchor_grid_covers_adc_range() {
        // Last anchor sits at raw 4096, one past ADC_MAX_RAW, so every
        // raw count has anchors on both sides for interpolation.
        assert_eq!((CAL_CURVE_ANCHORS - 1) * CAL_ANCHOR_STEP, 4_096);
        assert!((ADC_MAX_RAW as usize) < (CAL_CURVE_ANCHORS - 1) * CAL_ANCHOR_STEP + 1);
    }

    #[test]
    fn test_patch_offsets_inside_header() {
        assert!(RIFF_SIZE_OFFSET + 4 <= WAV_HEADER_SIZE);
        assert!(DATA_SIZE_OFFSET + 4 <= WAV_HEADER_SIZE);
    }
}
