//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the
//! [`Scheduler`](crate::scheduler::Scheduler) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::control::heater::HeaterState;
use crate::diagnostics::LoopStats;
use crate::sensors::Readings;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The application service has started.
    Started { showers: usize, history_slots: usize },

    /// A shower's debounced occupancy flipped.
    PresenceChanged { shower: usize, present: bool },

    /// A shower's heater relay changed state.
    HeaterChanged { shower: usize, state: HeaterState },

    /// A heater threshold was changed over HTTP.
    ThresholdChanged { shower: usize, from: f32, to: f32 },

    /// A threshold request was ignored (out of range or unknown shower).
    ThresholdRejected { shower: usize, requested: f32 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// Free heap dropped below the configured low-water mark.
    HeapLow { free_bytes: u32, low_water_bytes: u32 },
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub tick_count: u64,
    pub readings: Readings,
    pub heaters: [HeaterState; crate::config::SHOWER_COUNT],
    pub history_timestamp: usize,
    pub loop_stats: LoopStats,
    pub heap_free: u32,
    pub heap_min_free: u32,
}
