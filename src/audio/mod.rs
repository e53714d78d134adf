// Capture sources and the fixed-capacity container for recorded PCM

use serde::{Deserialize, Serialize};

mod calibration;
pub use calibration::AdcCalibration;

mod adc_backend;
pub use adc_backend::{AdcCaptureSource, AnalogInput};

mod pdm_backend;
pub use pdm_backend::{PdmCaptureSource, PdmFrameWriter};

pub mod wav;
pub use wav::{WavBuffer, WavFormat};

pub mod diagnostics;
pub use diagnostics::CaptureDiagnostics;

#[cfg(test)]
mod calibration_test;

#[cfg(test)]
mod adc_backend_test;


/// Input attenuation of the analog front end.
///
/// Determines how much of the supply range the converter can see; the
/// characterization curve scales its millivolt mapping accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attenuation {
    /// No attenuation, ~1.1 V full scale
    Db0,
    /// 2.5 dB, ~1.5 V full scale
    Db2_5,
    /// 6 dB, ~2.2 V full scale
    Db6,
    /// 11 dB, ~3.9 V full scale (microphone default)
    Db11,
}

impl Attenuation {
    /// Voltage scale factor relative to the reference, in thousandths.
    ///
    /// 10^(dB/20) rounded to the factors the converter hardware documents.
    pub fn scale_milli(self) -> u64 {
        match self {
            Attenuation::Db0 => 1_000,
            Attenuation::Db2_5 => 1_334,
            Attenuation::Db6 => 1_995,
            Attenuation::Db11 => 3_548,
        }
    }
}

/// Configuration for a capture source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Analog input channel (ignored by digital sources)
    pub channel: u8,
    /// Front-end attenuation (ignored by digital sources)
    pub attenuation: Attenuation,
    /// Sample rate the source is expected to deliver (Hz)
    pub sample_rate: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            attenuation: Attenuation::Db11,
            sample_rate: crate::audio_constants::DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Outcome of one window read from a capture source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowRead {
    /// Number of samples written to the output slice (may be less than
    /// requested for streaming sources, zero means nothing to classify yet)
    pub samples: usize,
    /// Number of samples that hit the saturating clamp during conversion
    pub clipped: usize,
}

/// Errors that can occur while configuring or reading a capture source
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// The underlying hardware failed to configure or convert
    HardwareFault(String),
    /// The channel/attenuation/rate combination is invalid for the platform
    InvalidConfig(String),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::HardwareFault(msg) => write!(f, "Capture hardware fault: {}", msg),
            CaptureError::InvalidConfig(msg) => write!(f, "Invalid capture config: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Trait for capture sources (allows mocking in tests).
///
/// The recording engine is written once against this interface; the polling
/// analog front end and the streaming digital microphone both implement it
/// and are selected at configuration time.
pub trait CaptureSource {
    /// Configure (and for analog sources, characterize) the front end.
    ///
    /// Idempotent: reconfiguring with the same settings is a no-op beyond
    /// revalidation.
    fn configure(&mut self, config: &CaptureConfig) -> Result<(), CaptureError>;

    /// Fill `out` with up to `out.len()` signed 16-bit PCM samples.
    ///
    /// Returns how many samples were produced and how many saturated during
    /// conversion. Never blocks beyond the hardware conversion latency.
    fn read_window(&mut self, out: &mut [i16]) -> Result<WindowRead, CaptureError>;
}
