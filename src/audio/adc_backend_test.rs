use super::adc_backend::{AdcCaptureSource, AnalogInput};
use super::{Attenuation, CaptureConfig, CaptureError, CaptureSource};

/// Scripted analog port cycling over a fixed raw-count pattern
struct MockPort {
    pattern: Vec<u16>,
    next: usize,
    vref: Option<u32>,
    configured: usize,
}

impl MockPort {
    fn new(pattern: Vec<u16>) -> Self {
        Self { pattern, next: 0, vref: None, configured: 0 }
    }

    fn with_vref(pattern: Vec<u16>, vref: u32) -> Self {
        Self { pattern, next: 0, vref: Some(vref), configured: 0 }
    }
}

impl AnalogInput for MockPort {
    fn configure_channel(
        &mut self,
        channel: u8,
        _attenuation: Attenuation,
    ) -> Result<(), CaptureError> {
        if channel > 7 {
            return Err(CaptureError::HardwareFault(format!(
                "channel {} not routable",
                channel
            )));
        }
        self.configured += 1;
        Ok(())
    }

    fn factory_vref_mv(&self) -> Option<u32> {
        self.vref
    }

    fn read_raw(&mut self) -> Result<u16, CaptureError> {
        let raw = self.pattern[self.next % self.pattern.len()];
        self.next += 1;
        Ok(raw)
    }
}

fn configured_source(pattern: Vec<u16>) -> AdcCaptureSource<MockPort> {
    let mut source = AdcCaptureSource::new(MockPort::new(pattern));
    source.configure(&CaptureConfig::default()).unwrap();
    source
}

#[test]
fn test_configure_rejects_invalid_channel() {
    let mut source = AdcCaptureSource::new(MockPort::new(vec![0]));
    let config = CaptureConfig { channel: 9, ..Default::default() };
    assert!(matches!(
        source.configure(&config),
        Err(CaptureError::HardwareFault(_))
    ));
    // No curve is built for a failed configure
    assert!(source.calibration().is_none());
}

#[test]
fn test_configure_is_idempotent() {
    let mut source = AdcCaptureSource::new(MockPort::new(vec![2_000]));
    let config = CaptureConfig::default();
    source.configure(&config).unwrap();
    let curve = source.calibration().cloned().unwrap();
    source.configure(&config).unwrap();
    // Same settings keep the same immutable curve
    assert_eq!(source.calibration(), Some(&curve));
}

#[test]
fn test_read_before_configure_fails() {
    let mut source = AdcCaptureSource::new(MockPort::new(vec![0]));
    let mut window = [0i16; 4];
    assert!(matches!(
        source.read_window(&mut window),
        Err(CaptureError::HardwareFault(_))
    ));
}

/// A conversion sitting at the DC bias point maps near PCM zero
#[test]
fn test_bias_point_maps_near_zero() {
    // ~1250 mV at 11 dB with the default vref is around raw 1311
    let mut source = configured_source(vec![1_311]);
    let mut window = [0i16; 8];
    let read = source.read_window(&mut window).unwrap();
    assert_eq!(read.samples, 8);
    assert_eq!(read.clipped, 0);
    for s in window {
        assert!(s.unsigned_abs() < 1_000, "sample {} too far from zero", s);
    }
}

/// Out-of-range swings saturate to the i16 bounds instead of wrapping
#[test]
fn test_extremes_saturate_not_wrap() {
    let mut source = configured_source(vec![0, 4_095]);
    let mut window = [0i16; 2];
    let read = source.read_window(&mut window).unwrap();
    assert_eq!(window[0], i16::MIN);
    assert_eq!(window[1], i16::MAX);
    assert_eq!(read.clipped, 2);
}

/// Identical raw input and calibration produce identical PCM
#[test]
fn test_conversion_is_deterministic() {
    let pattern = vec![100, 900, 1_311, 2_048, 3_000, 4_095];
    let mut a = AdcCaptureSource::new(MockPort::with_vref(pattern.clone(), 1_093));
    let mut b = AdcCaptureSource::new(MockPort::with_vref(pattern, 1_093));
    a.configure(&CaptureConfig::default()).unwrap();
    b.configure(&CaptureConfig::default()).unwrap();

    let mut wa = [0i16; 12];
    let mut wb = [0i16; 12];
    a.read_window(&mut wa).unwrap();
    b.read_window(&mut wb).unwrap();
    assert_eq!(wa, wb);
}

/// Larger raw counts never produce smaller PCM values
#[test]
fn test_conversion_is_monotonic() {
    let raws: Vec<u16> = (0..=4_095).step_by(37).collect();
    let mut source = configured_source(raws.clone());
    let mut window = vec![0i16; raws.len()];
    source.read_window(&mut window).unwrap();
    for pair in window.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
}
