// Characterization of the analog front end: raw converter counts to millivolts

use super::Attenuation;
use crate::audio_constants::{
    ADC_MAX_RAW, CAL_ANCHOR_STEP, CAL_CURVE_ANCHORS, DEFAULT_VREF_MV,
};

/// Characterization curve mapping raw 12-bit counts to millivolts.
///
/// Built once during initialization and immutable afterward. The curve is a
/// piecewise-linear table of [`CAL_CURVE_ANCHORS`] anchor points spaced
/// [`CAL_ANCHOR_STEP`] counts apart; lookups interpolate between anchors so
/// every raw count maps deterministically to the same millivolt value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdcCalibration {
    vref_mv: u32,
    attenuation: Attenuation,
    curve: [u32; CAL_CURVE_ANCHORS],
}

impl AdcCalibration {
    /// Build the characterization curve for an attenuation setting.
    ///
    /// Prefers a factory-trimmed reference voltage when the hardware
    /// provides one; falls back to [`DEFAULT_VREF_MV`] otherwise.
    pub fn characterize(attenuation: Attenuation, factory_vref_mv: Option<u32>) -> Self {
        let vref_mv = match factory_vref_mv {
            Some(vref) => {
                crate::debug!("[cal] using factory-trimmed vref {} mV", vref);
                vref
            }
            None => {
                crate::debug!("[cal] no factory vref, falling back to {} mV", DEFAULT_VREF_MV);
                DEFAULT_VREF_MV
            }
        };

        let scale = attenuation.scale_milli();
        let mut curve = [0u32; CAL_CURVE_ANCHORS];
        for (i, anchor) in curve.iter_mut().enumerate() {
            let raw = (i * CAL_ANCHOR_STEP) as u64;
            *anchor = (raw * vref_mv as u64 * scale / (1_000 * ADC_MAX_RAW as u64)) as u32;
        }

        Self { vref_mv, attenuation, curve }
    }

    /// Convert one raw conversion to millivolts via the curve.
    ///
    /// Raw counts above the converter range clamp to the top anchor.
    pub fn raw_to_millivolts(&self, raw: u16) -> u32 {
        let raw = raw.min(ADC_MAX_RAW) as usize;
        let idx = raw / CAL_ANCHOR_STEP;
        let lower = self.curve[idx];
        let upper = self.curve[idx + 1];
        let offset = (raw - idx * CAL_ANCHOR_STEP) as u64;
        lower + ((upper - lower) as u64 * offset / CAL_ANCHOR_STEP as u64) as u32
    }

    /// Reference voltage the curve was built against (mV).
    pub fn vref_mv(&self) -> u32 {
        self.vref_mv
    }

    /// Attenuation the curve was built for.
    pub fn attenuation(&self) -> Attenuation {
        self.attenuation
    }
}
