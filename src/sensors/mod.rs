//! Sensor subsystem — per-channel conversions and the aggregating [`SensorHub`].
//!
//! The hub samples every multiplexed channel once per hardware pass
//! (presence first, then flow, then temperature) and produces a
//! [`Readings`] snapshot that feeds the history and the heater controller.

pub mod flow;
pub mod presence;
pub mod temperature;

use serde::Serialize;

use crate::app::ports::{SensorChannel, SensorPort};
use crate::config::{HistorySource, SHOWER_COUNT, SystemConfig};
use flow::FlowSensor;
use presence::PresenceDetector;
use temperature::TemperatureSensor;

/// One hardware pass worth of converted readings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Readings {
    /// Debounced occupancy per shower.
    pub presence: [bool; SHOWER_COUNT],
    /// Flow rate per shower (L/min).
    pub flow_lpm: [f32; SHOWER_COUNT],
    /// Water temperature per shower (°C).
    pub temperature_c: [f32; SHOWER_COUNT],
}

impl Readings {
    /// Sum of every shower's flow rate.
    pub fn combined_flow(&self) -> f32 {
        self.flow_lpm.iter().sum()
    }

    /// Mean of every shower's water temperature.
    pub fn mean_temperature(&self) -> f32 {
        self.temperature_c.iter().sum::<f32>() / SHOWER_COUNT as f32
    }

    /// Showers currently occupied.
    pub fn occupied_count(&self) -> usize {
        self.presence.iter().filter(|&&p| p).count()
    }

    /// The aggregate recorded into the weekly history.
    pub fn history_sample(&self, source: HistorySource) -> f32 {
        match source {
            HistorySource::CombinedFlow => self.combined_flow(),
            HistorySource::MeanTemperature => self.mean_temperature(),
        }
    }
}

/// Owns the presence detector and the conversion parameters.
#[derive(Debug, Clone)]
pub struct SensorHub {
    pub presence: PresenceDetector,
    pub flow: FlowSensor,
    pub temperature: TemperatureSensor,
}

impl SensorHub {
    pub fn new(presence: PresenceDetector, flow: FlowSensor, temperature: TemperatureSensor) -> Self {
        Self {
            presence,
            flow,
            temperature,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(
            PresenceDetector::from_config(config),
            FlowSensor::new(config.flow_full_scale_lpm),
            TemperatureSensor::new(config.temperature_full_scale_c),
        )
    }

    /// Sample every channel once.  The presence detector advances exactly
    /// once per shower per call.
    pub fn read_all(&mut self, hw: &mut impl SensorPort) -> Readings {
        let mut readings = Readings::default();

        for i in 0..SHOWER_COUNT {
            let raw = hw.read_raw(SensorChannel::Presence(i));
            readings.presence[i] = self.presence.update(i, raw);
        }
        for i in 0..SHOWER_COUNT {
            let raw = hw.read_raw(SensorChannel::Flow(i));
            readings.flow_lpm[i] = self.flow.convert(raw).lpm;
        }
        for i in 0..SHOWER_COUNT {
            let raw = hw.read_raw(SensorChannel::Temperature(i));
            readings.temperature_c[i] = self.temperature.convert(raw).celsius;
        }

        readings
    }
}
