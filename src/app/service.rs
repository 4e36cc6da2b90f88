//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the sensor hub, the weekly history, the heater
//! controller and the per-shower configuration.  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          AppService          │
//! ActuatorPort ◀──│ Presence · History · Heaters │
//!                 └──────────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::{HistorySource, SHOWER_COUNT, SystemConfig};
use crate::control::heater::{HeaterState, ThresholdController};
use crate::diagnostics::LoopStats;
use crate::history::{History, min_max};
use crate::sensors::{Readings, SensorHub};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, DigitalOutput, EventSink, SensorPort};
use super::snapshot::{DaySummary, PageModel, StatusSnapshot};

// ───────────────────────────────────────────────────────────────
// Per-shower configuration
// ───────────────────────────────────────────────────────────────

/// Mutable per-shower settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowerConfig {
    /// Heater switch-off temperature (°C).
    pub threshold: f32,
    /// Output driving this shower's heater relay.
    pub heater: DigitalOutput,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    sensors: SensorHub,
    history: History,
    heaters: ThresholdController,
    showers: [ShowerConfig; SHOWER_COUNT],
    /// Readings from the most recent hardware pass.
    readings: Readings,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let sensors = SensorHub::from_config(&config);
        let history = History::from_config(&config);
        let heaters = ThresholdController::new(config.heater_band_c);
        let showers = core::array::from_fn(|i| ShowerConfig {
            threshold: config.default_threshold_c,
            heater: DigitalOutput::Heater(i),
        });

        Self {
            config,
            sensors,
            history,
            heaters,
            showers,
            readings: Readings::default(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to its safe state and announce the service.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        sink.emit(&AppEvent::Started {
            showers: SHOWER_COUNT,
            history_slots: self.history.capacity(),
        });
        info!(
            "AppService started ({} showers, {}×{} history)",
            SHOWER_COUNT,
            self.history.depth(),
            self.history.slots_per_week()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full hardware pass: sample → debounce → history → heaters.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(&mut self, hw: &mut (impl SensorPort + ActuatorPort), sink: &mut impl EventSink) {
        self.tick_count += 1;
        let previous = self.readings;

        // 1. Sample every channel; presence advances once per shower.
        let readings = self.sensors.read_all(hw);

        // 2. Mirror presence onto the indicator outputs.
        for (i, &present) in readings.presence.iter().enumerate() {
            hw.set_digital(DigitalOutput::PresenceIndicator(i), present);
            if present != previous.presence[i] {
                sink.emit(&AppEvent::PresenceChanged { shower: i, present });
            }
        }

        // 3. Record this tick's aggregate.
        self.history
            .advance(readings.history_sample(self.config.history_source));

        // 4. Heater control per shower.
        for (i, shower) in self.showers.iter().enumerate() {
            let before = self.heaters.state(i);
            let after = self.heaters.update(
                i,
                shower.threshold,
                readings.temperature_c[i],
                readings.presence[i],
            );
            hw.set_digital(shower.heater, after.is_on());
            if after != before {
                sink.emit(&AppEvent::HeaterChanged {
                    shower: i,
                    state: after,
                });
            }
        }

        self.readings = readings;
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  Returns `true` if it changed state.
    ///
    /// Rejected commands leave every setting untouched.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> bool {
        match cmd {
            AppCommand::SetThreshold { shower, celsius } => {
                let in_range = celsius.is_finite()
                    && celsius >= self.config.threshold_min_c
                    && celsius <= self.config.threshold_max_c;
                let Some(cfg) = self.showers.get_mut(shower).filter(|_| in_range) else {
                    warn!("Threshold {} for shower {} rejected", celsius, shower.saturating_add(1));
                    sink.emit(&AppEvent::ThresholdRejected {
                        shower,
                        requested: celsius,
                    });
                    return false;
                };
                if cfg.threshold == celsius {
                    return false;
                }
                let from = cfg.threshold;
                cfg.threshold = celsius;
                sink.emit(&AppEvent::ThresholdChanged {
                    shower,
                    from,
                    to: celsius,
                });
                true
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Fixed-shape record for `/status`.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot::new(&self.readings, &self.heaters.states(), &self.thresholds())
    }

    /// Read-only model for the status page.
    pub fn page_model(&self) -> PageModel<'_> {
        let days = (0..self.history.days())
            .filter_map(|day| {
                let slots = self.history.day_slice(day)?;
                Some(DaySummary {
                    day,
                    slots,
                    extremes: min_max(slots),
                })
            })
            .collect();

        let full_scale = match self.config.history_source {
            HistorySource::CombinedFlow => self.config.flow_full_scale_lpm,
            HistorySource::MeanTemperature => self.config.temperature_full_scale_c,
        };

        PageModel {
            average: self.history.snapshot(),
            days,
            slots_per_day: self.history.slots_per_day(),
            history_source: self.config.history_source,
            full_scale,
            readings: self.readings,
            heaters: self.heaters.states(),
            thresholds: self.thresholds(),
            threshold_min: self.config.threshold_min_c,
            threshold_max: self.config.threshold_max_c,
        }
    }

    /// Build a telemetry snapshot from the current state plus loop stats.
    pub fn build_telemetry(
        &self,
        loop_stats: LoopStats,
        heap_free: u32,
        heap_min_free: u32,
    ) -> TelemetryData {
        TelemetryData {
            tick_count: self.tick_count,
            readings: self.readings,
            heaters: self.heaters.states(),
            history_timestamp: self.history.timestamp(),
            loop_stats,
            heap_free,
            heap_min_free,
        }
    }

    pub fn thresholds(&self) -> [f32; SHOWER_COUNT] {
        core::array::from_fn(|i| self.showers[i].threshold)
    }

    pub fn shower(&self, shower: usize) -> Option<&ShowerConfig> {
        self.showers.get(shower)
    }

    pub fn heater_state(&self, shower: usize) -> HeaterState {
        self.heaters.state(shower)
    }

    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Total hardware passes executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
