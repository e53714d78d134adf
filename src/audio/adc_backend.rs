// Polling analog capture backend
//
// Converts raw analog conversions into calibrated, DC-corrected,
// gain-scaled signed PCM. The hardware itself sits behind the
// `AnalogInput` port trait so the conversion pipeline is unit-testable.

use super::calibration::AdcCalibration;
use super::{Attenuation, CaptureConfig, CaptureError, CaptureSource, WindowRead};
use crate::audio_constants::{ADC_DC_BIAS_MV, ADC_FULL_SCALE_MV, ADC_GAIN};

/// Port trait for the analog conversion hardware (allows mocking in tests).
pub trait AnalogInput {
    /// Route and attenuate the given input channel.
    ///
    /// Fails when the channel/attenuation combination is invalid for the
    /// platform. Must be safe to call repeatedly with the same settings.
    fn configure_channel(&mut self, channel: u8, attenuation: Attenuation)
        -> Result<(), CaptureError>;

    /// Factory-trimmed reference voltage in mV, when the part has one.
    fn factory_vref_mv(&self) -> Option<u32>;

    /// Perform one raw conversion on the configured channel.
    fn read_raw(&mut self) -> Result<u16, CaptureError>;
}

/// Capture source backed by a polled analog-to-digital converter.
pub struct AdcCaptureSource<P: AnalogInput> {
    port: P,
    calibration: Option<AdcCalibration>,
}

impl<P: AnalogInput> AdcCaptureSource<P> {
    pub fn new(port: P) -> Self {
        Self { port, calibration: None }
    }

    /// The characterization curve, once `configure` has built it.
    pub fn calibration(&self) -> Option<&AdcCalibration> {
        self.calibration.as_ref()
    }
}

/// Scale one calibrated millivolt reading into signed 16-bit PCM.
///
/// Subtracts the fixed DC bias, applies the fixed gain and maps the
/// full-scale millivolt swing onto the i16 range, saturating (never
/// wrapping) on overflow. Returns the sample and whether it clamped.
fn scale_to_pcm(millivolts: u32) -> (i16, bool) {
    let centered = millivolts as i64 - ADC_DC_BIAS_MV as i64;
    let scaled = centered * ADC_GAIN as i64 * i16::MAX as i64 / ADC_FULL_SCALE_MV as i64;
    if scaled > i16::MAX as i64 {
        (i16::MAX, true)
    } else if scaled < i16::MIN as i64 {
        (i16::MIN, true)
    } else {
        (scaled as i16, false)
    }
}

impl<P: AnalogInput> CaptureSource for AdcCaptureSource<P> {
    fn configure(&mut self, config: &CaptureConfig) -> Result<(), CaptureError> {
        self.port.configure_channel(config.channel, config.attenuation)?;

        // Characterize once per attenuation setting; the curve is immutable
        // after it is built, so reconfiguring with identical settings keeps it.
        let needs_curve = self
            .calibration
            .as_ref()
            .map(|cal| cal.attenuation() != config.attenuation)
            .unwrap_or(true);
        if needs_curve {
            self.calibration = Some(AdcCalibration::characterize(
                config.attenuation,
                self.port.factory_vref_mv(),
            ));
        }
        Ok(())
    }

    fn read_window(&mut self, out: &mut [i16]) -> Result<WindowRead, CaptureError> {
        let cal = self.calibration.as_ref().ok_or_else(|| {
            CaptureError::HardwareFault("analog source read before characterization".to_string())
        })?;

        let mut clipped = 0;
        for slot in out.iter_mut() {
            let raw = self.port.read_raw()?;
            let (sample, saturated) = scale_to_pcm(cal.raw_to_millivolts(raw));
            *slot = sample;
            if saturated {
                clipped += 1;
            }
        }
        Ok(WindowRead { samples: out.len(), clipped })
    }
}
