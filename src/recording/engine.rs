// Recording engine: the tick-driven session state machine
//
// Once per tick the engine pulls a window from the capture source,
// classifies it, updates the session timers and conditionally appends PCM
// to the arena. Single-threaded by construction: the engine is the sole
// reader and writer of the session and the arena, so nothing is locked.
// `tick` must complete before the cooperative loop invokes it again.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::config::RecorderConfig;
use super::vad::{VoiceDetector, WindowStats};
use crate::audio::{CaptureDiagnostics, CaptureError, CaptureSource, WavBuffer};
use crate::audio_constants::{BYTES_PER_SAMPLE, WAV_HEADER_SIZE};

/// State of the recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordingState {
    /// Not recording, ready to arm
    Idle,
    /// Session running, no voice confirmed yet (nothing retained)
    Armed,
    /// Voice confirmed, PCM being appended
    Capturing,
    /// Session ended, finished container available
    Stopped,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Why a session stopped automatically (None = caller requested).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// Hard duration cap reached, independent of voice state
    MaxDuration,
    /// Arena exhausted mid-capture; partial data is finalized and valid
    BufferFull,
    /// Silence sustained past the timeout after speech
    SilenceAfterSpeech,
}

/// Errors from engine initialization and session control
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecorderError {
    /// Arena reservation failed at `begin`; recording stays unavailable
    #[error("arena allocation failed: {0}")]
    Allocation(String),
    /// The capture source failed to configure or characterize
    #[error(transparent)]
    Capture(#[from] CaptureError),
    /// The configuration is not something the engine can run with
    #[error("invalid recorder config: {0}")]
    InvalidConfig(String),
    /// `start_recording` while a session is Armed or Capturing
    #[error("a recording session is already in progress")]
    AlreadyRecording,
    /// `start_recording` before a successful `begin`
    #[error("recording unavailable: begin() has not succeeded")]
    NotReady,
}

/// Timers and flags for one recording attempt. Reset on every start.
#[derive(Debug, Clone, Copy)]
struct Session {
    started_at: Instant,
    last_voice_at: Instant,
    voice_detected: bool,
}

/// Voice-activated recording engine over a capture source.
///
/// Drive it from a cooperative, non-blocking loop: call
/// [`RecordingEngine::update`] repeatedly; it returns immediately when
/// there is nothing to do. The finished container from
/// [`RecordingEngine::bytes`] stays borrowed and valid until the next
/// start — there is no double buffering, so consume it first.
pub struct RecordingEngine<S: CaptureSource> {
    config: RecorderConfig,
    source: S,
    detector: VoiceDetector,
    buffer: Option<WavBuffer>,
    /// Window scratch, allocated once in `begin`
    window: Vec<i16>,
    /// Little-endian PCM scratch, allocated once in `begin`
    pcm_bytes: Vec<u8>,
    state: RecordingState,
    session: Option<Session>,
    last_read_at: Option<Instant>,
    read_interval: Duration,
    stop_reason: Option<StopReason>,
    diagnostics: CaptureDiagnostics,
}

impl<S: CaptureSource> RecordingEngine<S> {
    pub fn new(config: RecorderConfig, source: S) -> Self {
        let detector = VoiceDetector::new(config.vad);
        let read_interval = config.read_interval();
        Self {
            config,
            source,
            detector,
            buffer: None,
            window: Vec::new(),
            pcm_bytes: Vec::new(),
            state: RecordingState::Idle,
            session: None,
            last_read_at: None,
            read_interval,
            stop_reason: None,
            diagnostics: CaptureDiagnostics::new(),
        }
    }

    /// Configure the capture source and allocate the arena, exactly once.
    ///
    /// Both failures are fatal for recording: until a `begin` succeeds,
    /// `start_recording` keeps returning [`RecorderError::NotReady`].
    #[must_use = "this returns a Result that should be handled"]
    pub fn begin(&mut self) -> Result<(), RecorderError> {
        if self.config.bits_per_sample != 16 {
            return Err(RecorderError::InvalidConfig(
                "only 16-bit PCM is supported".to_string(),
            ));
        }
        if self.config.sample_rate == 0 || self.config.channels == 0 {
            return Err(RecorderError::InvalidConfig(
                "sample rate and channel count must be non-zero".to_string(),
            ));
        }
        if self.config.window_size == 0 {
            return Err(RecorderError::InvalidConfig(
                "window size must be non-zero".to_string(),
            ));
        }

        let mut capture = self.config.capture.clone();
        capture.sample_rate = self.config.sample_rate;
        self.source.configure(&capture)?;

        let capacity = self.config.arena_capacity();
        let buffer =
            WavBuffer::allocate(capacity).map_err(|e| RecorderError::Allocation(e.to_string()))?;
        self.window = vec![0; self.config.window_size];
        self.pcm_bytes = vec![0; self.config.window_size * BYTES_PER_SAMPLE];
        self.buffer = Some(buffer);
        crate::info!(
            "[engine] initialized: {} byte arena, {} Hz, window of {}",
            capacity,
            self.config.sample_rate,
            self.config.window_size
        );
        Ok(())
    }

    /// Arm a new session starting now.
    pub fn start_recording(&mut self) -> Result<(), RecorderError> {
        self.start_at(Instant::now())
    }

    /// Arm a new session with an explicit start instant.
    ///
    /// Rejected without mutating anything while a session is in progress.
    /// Resets the arena header, the session timers, the voice flag and the
    /// diagnostics; the previous session's borrowed bytes become invalid.
    pub fn start_at(&mut self, now: Instant) -> Result<(), RecorderError> {
        if self.is_recording() {
            return Err(RecorderError::AlreadyRecording);
        }
        let format = self.config.wav_format();
        let buffer = self.buffer.as_mut().ok_or(RecorderError::NotReady)?;
        buffer.write_header(&format);
        self.session = Some(Session {
            started_at: now,
            last_voice_at: now,
            voice_detected: false,
        });
        self.last_read_at = None;
        self.stop_reason = None;
        self.diagnostics.reset();
        self.state = RecordingState::Armed;
        crate::info!("[engine] armed, waiting for voice");
        Ok(())
    }

    /// Service the session from the cooperative loop.
    pub fn update(&mut self) {
        self.tick(Instant::now());
    }

    /// Service the session at an explicit instant.
    ///
    /// No-op unless Armed or Capturing. Non-blocking: returns immediately
    /// when the read interval has not elapsed yet.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_recording() {
            return;
        }
        let Some(session) = self.session else { return };

        if self.buffer.as_ref().map(|b| b.is_full()).unwrap_or(false) {
            self.finish(Some(StopReason::BufferFull));
            return;
        }
        if now.duration_since(session.started_at) >= self.config.max_duration() {
            self.finish(Some(StopReason::MaxDuration));
            return;
        }
        if session.voice_detected
            && now.duration_since(session.last_voice_at) >= self.config.silence_timeout()
        {
            self.finish(Some(StopReason::SilenceAfterSpeech));
            return;
        }

        if let Some(last) = self.last_read_at {
            if now.duration_since(last) < self.read_interval {
                return;
            }
        }
        self.last_read_at = Some(now);

        let read = match self.source.read_window(&mut self.window) {
            Ok(read) => read,
            Err(e) => {
                crate::warn!("[engine] window read failed: {}", e);
                return;
            }
        };
        if read.samples == 0 {
            return;
        }

        let stats = WindowStats::from_window(&self.window[..read.samples]);
        let voice = self.detector.decide(&stats);
        self.diagnostics.record_window(stats.max_amplitude, voice, read.clipped);

        let mut session = session;
        if voice {
            session.last_voice_at = now;
            if !session.voice_detected {
                session.voice_detected = true;
                self.state = RecordingState::Capturing;
                crate::debug!("[engine] voice detected, capture started");
            }
        }
        self.session = Some(session);

        // Windows before the first confirmed voice are not retained.
        if session.voice_detected {
            let byte_len = read.samples * BYTES_PER_SAMPLE;
            for (i, &sample) in self.window[..read.samples].iter().enumerate() {
                self.pcm_bytes[i * BYTES_PER_SAMPLE..(i + 1) * BYTES_PER_SAMPLE]
                    .copy_from_slice(&sample.to_le_bytes());
            }
            let appended = self
                .buffer
                .as_mut()
                .map(|b| b.append(&self.pcm_bytes[..byte_len]))
                .unwrap_or(false);
            if !appended {
                self.finish(Some(StopReason::BufferFull));
                return;
            }
        }

        self.diagnostics.log_periodic(now);
    }

    /// Stop the session synchronously. Idempotent: a second call, or a call
    /// outside an active session, is a no-op.
    pub fn stop_recording(&mut self) {
        self.finish(None);
    }

    fn finish(&mut self, reason: Option<StopReason>) {
        if !self.is_recording() {
            return;
        }
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.finalize();
        }
        self.stop_reason = reason;
        self.state = RecordingState::Stopped;
        self.diagnostics.log_summary();
        let payload = self.buffer.as_ref().map(|b| b.payload_len()).unwrap_or(0);
        match reason {
            Some(r) => {
                crate::info!("[engine] recording stopped ({:?}), {} payload bytes", r, payload)
            }
            None => crate::info!("[engine] recording stopped on request, {} payload bytes", payload),
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Armed or Capturing.
    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Armed | RecordingState::Capturing)
    }

    /// Why the last session ended; `None` while active or after a
    /// caller-requested stop.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Borrowed view of the assembled container (header plus payload so
    /// far). Valid until the next `start_recording`.
    pub fn bytes(&self) -> &[u8] {
        self.buffer.as_ref().map(|b| b.bytes()).unwrap_or(&[])
    }

    /// PCM payload bytes captured past the header. Zero means there is
    /// nothing worth handing to a collaborator.
    pub fn payload_len(&self) -> usize {
        self.buffer.as_ref().map(|b| b.payload_len()).unwrap_or(0)
    }

    /// Fraction of the arena's payload region used, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let Some(buffer) = self.buffer.as_ref() else {
            return 0.0;
        };
        let payload_capacity = buffer.capacity() - WAV_HEADER_SIZE;
        if payload_capacity == 0 {
            return 0.0;
        }
        buffer.payload_len() as f32 / payload_capacity as f32
    }

    pub fn diagnostics(&self) -> &CaptureDiagnostics {
        &self.diagnostics
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }
}
