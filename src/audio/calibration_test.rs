use super::calibration::AdcCalibration;
use super::Attenuation;
use crate::audio_constants::{ADC_MAX_RAW, DEFAULT_VREF_MV};

#[test]
fn test_factory_vref_preferred_over_default() {
    let cal = AdcCalibration::characterize(Attenuation::Db11, Some(1_086));
    assert_eq!(cal.vref_mv(), 1_086);
}

#[test]
fn test_falls_back_to_default_vref() {
    let cal = AdcCalibration::characterize(Attenuation::Db11, None);
    assert_eq!(cal.vref_mv(), DEFAULT_VREF_MV);
}

#[test]
fn test_curve_endpoints() {
    let cal = AdcCalibration::characterize(Attenuation::Db0, None);
    assert_eq!(cal.raw_to_millivolts(0), 0);
    // Full scale at 0 dB is the reference voltage itself, within the
    // rounding of the anchor grid
    let full = cal.raw_to_millivolts(ADC_MAX_RAW);
    assert!(full >= DEFAULT_VREF_MV - 2 && full <= DEFAULT_VREF_MV);
}

#[test]
fn test_curve_is_monotonic() {
    let cal = AdcCalibration::characterize(Attenuation::Db11, None);
    let mut prev = 0;
    for raw in (0..=ADC_MAX_RAW).step_by(17) {
        let mv = cal.raw_to_millivolts(raw);
        assert!(mv >= prev, "curve decreased at raw {}", raw);
        prev = mv;
    }
}

#[test]
fn test_attenuation_scales_full_range() {
    let db0 = AdcCalibration::characterize(Attenuation::Db0, None);
    let db11 = AdcCalibration::characterize(Attenuation::Db11, None);
    let mid = ADC_MAX_RAW / 2;
    // 11 dB sees roughly 3.55x the voltage of 0 dB at the same count
    let ratio = db11.raw_to_millivolts(mid) as f64 / db0.raw_to_millivolts(mid) as f64;
    assert!((ratio - 3.548).abs() < 0.05, "ratio was {}", ratio);
}

#[test]
fn test_conversion_is_deterministic() {
    let a = AdcCalibration::characterize(Attenuation::Db6, Some(1_100));
    let b = AdcCalibration::characterize(Attenuation::Db6, Some(1_100));
    for raw in [0u16, 1, 500, 2_048, 4_000, ADC_MAX_RAW] {
        assert_eq!(a.raw_to_millivolts(raw), b.raw_to_millivolts(raw));
    }
}

#[test]
fn test_out_of_range_raw_clamps_to_top() {
    let cal = AdcCalibration::characterize(Attenuation::Db11, None);
    assert_eq!(cal.raw_to_millivolts(u16::MAX), cal.raw_to_millivolts(ADC_MAX_RAW));
}
