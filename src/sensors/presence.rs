//! IR occupancy detection with a hysteresis dead band.
//!
//! Each shower has a reflective IR pair whose receiver pulls the shared ADC
//! line low when someone is standing in the beam.  A single threshold would
//! chatter while the reading sits near it, so the state only flips once the
//! reading has crossed the far side of the band:
//!
//! ```text
//!   raw ──────────────────────────────────────────────▶ 65535
//!         │        LOW ┆      dead band      ┆ HIGH        │
//!   absent ────────────┼─────── hold ────────┼──▶ present  │
//!   absent ◀───────────┼─────── hold ────────┼──── present │
//! ```

use crate::config::{SHOWER_COUNT, SystemConfig};

/// Next presence state.  `low < high` is required.
///
/// Absent becomes present only above `high`; present becomes absent only
/// at or below `low`.
pub fn next_state(present: bool, raw: u16, low: u16, high: u16) -> bool {
    if present { raw > low } else { raw > high }
}

/// Debounced presence for every shower.
#[derive(Debug, Clone)]
pub struct PresenceDetector {
    present: [bool; SHOWER_COUNT],
    low: u16,
    high: u16,
    active_low: bool,
}

impl PresenceDetector {
    pub fn new(low: u16, high: u16, active_low: bool) -> Self {
        Self {
            present: [false; SHOWER_COUNT],
            low,
            high,
            active_low,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        let (low, high) = config.presence_thresholds();
        Self::new(low, high, config.presence_active_low)
    }

    /// Feed one raw sample for `channel` and return the debounced state.
    ///
    /// Out-of-range channels are ignored and report absent.
    pub fn update(&mut self, channel: usize, raw: u16) -> bool {
        let Some(state) = self.present.get_mut(channel) else {
            return false;
        };
        let level = if self.active_low { u16::MAX - raw } else { raw };
        *state = next_state(*state, level, self.low, self.high);
        *state
    }

    pub fn is_present(&self, channel: usize) -> bool {
        self.present.get(channel).copied().unwrap_or(false)
    }

    pub fn states(&self) -> [bool; SHOWER_COUNT] {
        self.present
    }

    pub fn thresholds(&self) -> (u16, u16) {
        (self.low, self.high)
    }
}
