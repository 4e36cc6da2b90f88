//! Read-only views of the service state handed to the outside world.
//!
//! [`StatusSnapshot`] is the fixed-shape JSON record served at `/status`;
//! [`PageModel`] is everything a [`Renderer`](super::ports::Renderer)
//! needs to draw the status page.  Neither holds a mutable reference into
//! the service.

use serde::Serialize;

use crate::config::{HistorySource, SHOWER_COUNT};
use crate::control::heater::HeaterState;
use crate::history::SliceExtremes;
use crate::sensors::Readings;

/// Occupancy label used on the wire.
pub fn occupancy_label(present: bool) -> &'static str {
    if present { "occupied" } else { "vacant" }
}

// ───────────────────────────────────────────────────────────────
// /status payload
// ───────────────────────────────────────────────────────────────

/// Flat key/value status record.
///
/// Key names are the ones the page script reads: `temp1`, `temp2`, `flow1`,
/// `flow2`, and `irdtct` for the occupied count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub temp1: f32,
    pub temp2: f32,
    pub temp_avg: f32,
    pub flow1: f32,
    pub flow2: f32,
    pub flow_total: f32,
    pub shower1: &'static str,
    pub shower2: &'static str,
    pub heater1: &'static str,
    pub heater2: &'static str,
    pub irdtct: usize,
    pub threshold1: f32,
    pub threshold2: f32,
}

impl StatusSnapshot {
    pub fn new(
        readings: &Readings,
        heaters: &[HeaterState; SHOWER_COUNT],
        thresholds: &[f32; SHOWER_COUNT],
    ) -> Self {
        Self {
            temp1: readings.temperature_c[0],
            temp2: readings.temperature_c[1],
            temp_avg: readings.mean_temperature(),
            flow1: readings.flow_lpm[0],
            flow2: readings.flow_lpm[1],
            flow_total: readings.combined_flow(),
            shower1: occupancy_label(readings.presence[0]),
            shower2: occupancy_label(readings.presence[1]),
            heater1: heaters[0].as_str(),
            heater2: heaters[1].as_str(),
            irdtct: readings.occupied_count(),
            threshold1: thresholds[0],
            threshold2: thresholds[1],
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Page model
// ───────────────────────────────────────────────────────────────

/// One day column of the weekly chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySummary<'a> {
    pub day: usize,
    /// Rolling average for each of the day's slots.
    pub slots: &'a [f32],
    /// Largest/smallest slot; `None` only for an empty day.
    pub extremes: Option<SliceExtremes>,
}

/// Everything the status page shows.
#[derive(Debug, Clone)]
pub struct PageModel<'a> {
    /// Rolling average for the whole week, slot-major.
    pub average: &'a [f32],
    pub days: Vec<DaySummary<'a>>,
    pub slots_per_day: usize,
    /// What the history aggregates.
    pub history_source: HistorySource,
    /// History value that maps to a fully saturated bar.
    pub full_scale: f32,
    pub readings: Readings,
    pub heaters: [HeaterState; SHOWER_COUNT],
    pub thresholds: [f32; SHOWER_COUNT],
    pub threshold_min: f32,
    pub threshold_max: f32,
}

impl PageModel<'_> {
    /// Hour of day at which `slot` (within a day) starts.
    pub fn slot_hour(&self, slot: usize) -> usize {
        slot * 24 / self.slots_per_day.max(1)
    }

    /// Heater summary: "ON" if any heater is running.
    pub fn any_heater_on(&self) -> bool {
        self.heaters.iter().any(|h| h.is_on())
    }
}
