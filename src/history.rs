//! Multi-week rolling history of one aggregate reading.
//!
//! ```text
//!            slot 0   slot 1   ...   slot W-1        W = slots_per_day × days
//!  week 0  │  v    │  v     │     │  v      │
//!  week 1  │  v    │  v     │     │  v      │        depth rows
//!          └───┬───┴────────┴─────┴─────────┘
//!              ▼  mean per column, refreshed lazily
//!  average │  a0   │  a1    │ ... │  aW-1   │
//! ```
//!
//! One cell is current at any time, addressed by a timestamp that runs
//! `0..depth×W` and wraps.  [`History::advance`] writes that cell, refreshes
//! the rolling average of its column only, and moves the timestamp on.
//! Old weeks are overwritten in place; nothing is allocated after
//! construction.

use crate::config::SystemConfig;

/// Multi-week circular buffer plus its per-slot rolling average.
#[derive(Debug, Clone)]
pub struct History {
    /// `depth × W` cells, week-major.
    cells: Vec<f32>,
    /// Rolling average per slot (length `W`).
    average: Vec<f32>,
    depth: usize,
    slots_per_day: usize,
    days: usize,
    timestamp: usize,
}

impl History {
    /// Zero-filled history of `depth` weeks of `slots_per_day × days` slots.
    ///
    /// A zero dimension is treated as one; [`SystemConfig::validate`]
    /// rejects such configurations before they get here.
    pub fn new(depth: usize, slots_per_day: usize, days: usize) -> Self {
        let depth = depth.max(1);
        let slots_per_day = slots_per_day.max(1);
        let days = days.max(1);
        let week = slots_per_day * days;
        Self {
            cells: vec![0.0; depth * week],
            average: vec![0.0; week],
            depth,
            slots_per_day,
            days,
            timestamp: 0,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(
            config.history_depth_weeks,
            config.slots_per_day,
            config.days_per_week,
        )
    }

    /// Record one tick's aggregate and step the timestamp.
    pub fn advance(&mut self, sample: f32) {
        let week = self.slots_per_week();
        let slot = self.timestamp % week;

        self.cells[self.timestamp] = sample;

        let sum: f32 = (0..self.depth).map(|row| self.cells[row * week + slot]).sum();
        self.average[slot] = sum / self.depth as f32;

        self.timestamp = (self.timestamp + 1) % self.cells.len();
    }

    /// Read-only view of the rolling average, one entry per slot.
    pub fn snapshot(&self) -> &[f32] {
        &self.average
    }

    /// Rolling average for one day, or `None` past the last day.
    pub fn day_slice(&self, day: usize) -> Option<&[f32]> {
        if day >= self.days {
            return None;
        }
        let start = day * self.slots_per_day;
        self.average.get(start..start + self.slots_per_day)
    }

    /// Index of the cell the next [`advance`](Self::advance) writes.
    pub fn timestamp(&self) -> usize {
        self.timestamp
    }

    /// `(week, slot)` of the current cell.
    pub fn position(&self) -> (usize, usize) {
        let week = self.slots_per_week();
        (self.timestamp / week, self.timestamp % week)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn slots_per_week(&self) -> usize {
        self.slots_per_day * self.days
    }

    /// Total cells (`depth × W`); the timestamp period.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }
}

// ---------------------------------------------------------------------------
// Per-slice extremes
// ---------------------------------------------------------------------------

/// Largest and smallest value of a slice with their positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceExtremes {
    pub max: f32,
    pub max_index: usize,
    pub min: f32,
    pub min_index: usize,
}

/// Scan `values` low to high for its extremes.
///
/// Both are seeded from element 0 and only replaced on a strict
/// improvement, so ties resolve to the first occurrence.  Empty input has
/// no extremes.
pub fn min_max(values: &[f32]) -> Option<SliceExtremes> {
    let (&first, rest) = values.split_first()?;
    let mut out = SliceExtremes {
        max: first,
        max_index: 0,
        min: first,
        min_index: 0,
    };
    for (i, &v) in rest.iter().enumerate() {
        if v > out.max {
            out.max = v;
            out.max_index = i + 1;
        }
        if v < out.min {
            out.min = v;
            out.min_index = i + 1;
        }
    }
    Some(out)
}
