// Streaming digital microphone capture backend
//
// The platform driver (interrupt or callback context) pushes decoded PCM
// frames through a lock-free SPSC ring; the capture source drains whatever
// has accumulated each time the engine asks for a window.

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapRb,
};

use super::{CaptureConfig, CaptureError, CaptureSource, WindowRead};

/// Type alias for the ring buffer producer half
type FrameProducer = ringbuf::HeapProd<i16>;

/// Type alias for the ring buffer consumer half
type FrameConsumer = ringbuf::HeapCons<i16>;

/// Producer handle handed to the platform's microphone driver.
pub struct PdmFrameWriter {
    producer: FrameProducer,
}

impl PdmFrameWriter {
    /// Push decoded PCM frames into the ring (lock-free).
    ///
    /// Returns how many frames were accepted; frames beyond the ring
    /// capacity are dropped by the caller.
    pub fn push_frames(&mut self, frames: &[i16]) -> usize {
        self.producer.push_slice(frames)
    }

    /// Free slots remaining in the ring.
    pub fn vacant_len(&self) -> usize {
        self.producer.vacant_len()
    }
}

/// Capture source backed by a streaming digital (PDM) microphone.
///
/// Frames arrive already signed and scaled, so no calibration pipeline is
/// involved; `read_window` simply drains the ring.
pub struct PdmCaptureSource {
    consumer: FrameConsumer,
    configured: bool,
}

impl PdmCaptureSource {
    /// Create the ring pair: a writer for the driver side and the source
    /// for the engine side. `capacity` is in frames.
    pub fn with_capacity(capacity: usize) -> (PdmFrameWriter, PdmCaptureSource) {
        let rb = HeapRb::<i16>::new(capacity);
        let (producer, consumer) = rb.split();
        (
            PdmFrameWriter { producer },
            PdmCaptureSource { consumer, configured: false },
        )
    }

    /// Frames currently waiting in the ring.
    pub fn pending_frames(&self) -> usize {
        self.consumer.occupied_len()
    }
}

impl CaptureSource for PdmCaptureSource {
    fn configure(&mut self, config: &CaptureConfig) -> Result<(), CaptureError> {
        if config.sample_rate == 0 {
            return Err(CaptureError::InvalidConfig(
                "sample rate must be non-zero".to_string(),
            ));
        }
        // Clocking of the digital interface is owned by the platform driver;
        // the source only records that configuration happened.
        self.configured = true;
        Ok(())
    }

    fn read_window(&mut self, out: &mut [i16]) -> Result<WindowRead, CaptureError> {
        if !self.configured {
            return Err(CaptureError::HardwareFault(
                "digital source read before configuration".to_string(),
            ));
        }
        let available = self.consumer.occupied_len().min(out.len());
        let samples = self.consumer.pop_slice(&mut out[..available]);
        Ok(WindowRead { samples, clipped: 0 })
    }
}
