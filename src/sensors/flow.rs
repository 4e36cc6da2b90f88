//! Water flow sensor conversion.
//!
//! The flow sensor's analog output is linear in flow rate over the ADC
//! range: a full-scale raw reading corresponds to `full_scale_lpm`.

/// Result of a flow measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowReading {
    /// Raw 16-bit sample.
    pub raw: u16,
    /// Flow rate (L/min).
    pub lpm: f32,
}

/// Flow sensor conversion for one shower.
#[derive(Debug, Clone, Copy)]
pub struct FlowSensor {
    full_scale_lpm: f32,
}

impl FlowSensor {
    pub fn new(full_scale_lpm: f32) -> Self {
        Self { full_scale_lpm }
    }

    /// Convert a raw sample into a flow rate.
    pub fn convert(&self, raw: u16) -> FlowReading {
        FlowReading {
            raw,
            lpm: f32::from(raw) * self.full_scale_lpm / 65_536.0,
        }
    }

    pub fn full_scale_lpm(&self) -> f32 {
        self.full_scale_lpm
    }
}
