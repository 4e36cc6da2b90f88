//! Water thermistor conversion.
//!
//! The thermistor divider is calibrated so the ADC reading is linear over
//! the working range: a full-scale raw reading corresponds to
//! `full_scale_c`.  The coefficient is found by comparing against a
//! reference thermometer at install time.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub raw: u16,
    pub celsius: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct TemperatureSensor {
    full_scale_c: f32,
}

impl TemperatureSensor {
    pub fn new(full_scale_c: f32) -> Self {
        Self { full_scale_c }
    }

    pub fn convert(&self, raw: u16) -> TemperatureReading {
        TemperatureReading {
            raw,
            celsius: f32::from(raw) * self.full_scale_c / 65_536.0,
        }
    }
}
