//! Heater controller
//!
//! Two-state bang-bang control with a hysteresis band below the
//! threshold, gated on occupancy.
//!
//! ```text
//!          presence && T < threshold − band
//!   Off ─────────────────────────────────────▶ On
//!   Off ◀───────────────────────────────────── On
//!          T > threshold  ||  !presence
//! ```

use serde::Serialize;

use crate::config::SHOWER_COUNT;

/// Heater relay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HeaterState {
    #[default]
    Off,
    On,
}

impl HeaterState {
    pub fn is_on(self) -> bool {
        self == Self::On
    }

    /// Lower-case label used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }
}

/// Next heater state for one shower.
pub fn next_state(
    current: HeaterState,
    threshold: f32,
    band: f32,
    temperature: f32,
    presence: bool,
) -> HeaterState {
    if !presence {
        return HeaterState::Off;
    }
    match current {
        HeaterState::Off if temperature < threshold - band => HeaterState::On,
        HeaterState::On if temperature > threshold => HeaterState::Off,
        held => held,
    }
}

/// Per-shower heater controller.
#[derive(Debug, Clone)]
pub struct ThresholdController {
    states: [HeaterState; SHOWER_COUNT],
    band: f32,
}

impl ThresholdController {
    pub fn new(band: f32) -> Self {
        Self {
            states: [HeaterState::Off; SHOWER_COUNT],
            band,
        }
    }

    /// Advance `shower_id`'s heater and return its new state.
    ///
    /// Out-of-range showers report `Off` and change nothing.
    pub fn update(
        &mut self,
        shower_id: usize,
        threshold: f32,
        temperature: f32,
        presence: bool,
    ) -> HeaterState {
        let Some(state) = self.states.get_mut(shower_id) else {
            return HeaterState::Off;
        };
        *state = next_state(*state, threshold, self.band, temperature, presence);
        *state
    }

    pub fn state(&self, shower_id: usize) -> HeaterState {
        self.states.get(shower_id).copied().unwrap_or_default()
    }

    pub fn states(&self) -> [HeaterState; SHOWER_COUNT] {
        self.states
    }
}
