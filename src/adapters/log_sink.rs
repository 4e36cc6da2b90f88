//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production, stderr on host).
//! Lines are `TAG | key=value ...` so they can be grepped from a serial
//! capture.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let r = &t.readings;
                let s = &t.loop_stats;
                info!(
                    "TELEM | tick={} | T={:.1}/{:.1}\u{00b0}C | flow={:.1}/{:.1}L/min | \
                     occupied={} | heaters={}/{} | slot={} | served={} parse_err={} \
                     tx_err={} io_err={} | worst={}ms overruns={} | heap={}/{}B",
                    t.tick_count,
                    r.temperature_c[0],
                    r.temperature_c[1],
                    r.flow_lpm[0],
                    r.flow_lpm[1],
                    r.occupied_count(),
                    t.heaters[0].as_str(),
                    t.heaters[1].as_str(),
                    t.history_timestamp,
                    s.requests_served,
                    s.parse_errors,
                    s.transmission_errors,
                    s.io_errors,
                    s.worst_iteration_ms,
                    s.budget_overruns,
                    t.heap_free,
                    t.heap_min_free,
                );
            }
            AppEvent::PresenceChanged { shower, present } => {
                info!("PRESENCE | shower={} present={}", shower + 1, present);
            }
            AppEvent::HeaterChanged { shower, state } => {
                info!("HEATER | shower={} state={}", shower + 1, state.as_str());
            }
            AppEvent::ThresholdChanged { shower, from, to } => {
                info!("THRESHOLD | shower={} {:.0} -> {:.0}", shower + 1, from, to);
            }
            AppEvent::ThresholdRejected { shower, requested } => {
                warn!("THRESHOLD | shower={} rejected={}", shower.saturating_add(1), requested);
            }
            AppEvent::HeapLow {
                free_bytes,
                low_water_bytes,
            } => {
                warn!("HEAP | free={}B low_water={}B", free_bytes, low_water_bytes);
            }
            AppEvent::Started {
                showers,
                history_slots,
            } => {
                info!("START | showers={} history_slots={}", showers, history_slots);
            }
        }
    }
}
