//! Voice-activated audio capture engine.
//!
//! Continuous sampling from a capture source, a lightweight
//! amplitude/zero-crossing voice activity heuristic, and one
//! fixed-capacity arena that assembles an uncompressed PCM (WAV)
//! container while speech is present. Everything runs under cooperative
//! scheduling: the embedding loop calls [`RecordingEngine::update`]
//! alongside its other work, and the engine never blocks, spawns threads
//! or allocates after initialization.
//!
//! Display, networking and persistence are external collaborators; the
//! engine only exposes the finished byte buffer, its length, a
//! recording-state flag and a progress fraction.
//!
//! ```no_run
//! use voicecap::{PdmCaptureSource, RecorderConfig, RecordingEngine};
//!
//! let (_writer, source) = PdmCaptureSource::with_capacity(16_000);
//! let mut engine = RecordingEngine::new(RecorderConfig::default(), source);
//! engine.begin()?;
//! engine.start_recording()?;
//! loop {
//!     engine.update();
//!     if !engine.is_recording() {
//!         let wav = engine.bytes(); // valid until the next start
//!         break;
//!     }
//! }
//! # Ok::<(), voicecap::RecorderError>(())
//! ```

pub mod audio;
pub mod audio_constants;
pub mod recording;

pub use audio::{
    AdcCaptureSource, AnalogInput, Attenuation, CaptureConfig, CaptureDiagnostics, CaptureError,
    CaptureSource, PdmCaptureSource, PdmFrameWriter, WavBuffer, WavFormat, WindowRead,
};
pub use recording::{
    RecorderConfig, RecorderError, RecordingEngine, RecordingState, StopReason, VadConfig,
    VoiceDetector, WindowStats,
};

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};
