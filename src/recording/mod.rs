// Recording module: voice activity detection and the session state machine

mod vad;
pub use vad::{VadConfig, VoiceDetector, WindowStats};

mod config;
pub use config::RecorderConfig;

mod engine;
pub use engine::{RecorderError, RecordingEngine, RecordingState, StopReason};
