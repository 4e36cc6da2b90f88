//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService / Scheduler (domain)
//! ```
//!
//! Driven adapters (sensors, outputs, clocks, watchdog, event sinks,
//! renderers) implement these traits.  The [`AppService`](super::service::AppService)
//! and the [`Scheduler`](crate::scheduler::Scheduler) consume them via
//! generics, so the domain core never touches hardware directly.

use super::snapshot::PageModel;

// ───────────────────────────────────────────────────────────────
// Channel / output identifiers
// ───────────────────────────────────────────────────────────────

/// One multiplexed analog input.  The `usize` is the shower index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorChannel {
    /// IR occupancy receiver.
    Presence(usize),
    /// Water flow sensor.
    Flow(usize),
    /// Water thermistor.
    Temperature(usize),
}

/// One digital output.  The `usize` is the shower index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitalOutput {
    /// "In use" indicator mirroring the debounced presence state.
    PresenceIndicator(usize),
    /// Inline heater relay.
    Heater(usize),
    /// On-board status LED.
    StatusLed,
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to sample one analog channel.
pub trait SensorPort {
    /// Sample `channel`, scaled to the full `u16` range.
    fn read_raw(&mut self, channel: SensorChannel) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive digital outputs.
pub trait ActuatorPort {
    /// Drive `output` high (`true`) or low.
    fn set_digital(&mut self, output: DigitalOutput, on: bool);

    /// Drive every heater and indicator low (safe state).
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock, watchdog, heap
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait TimePort {
    fn now_ms(&self) -> u64;
}

/// Hardware watchdog.  Missing the deadline resets the whole device.
pub trait WatchdogPort {
    fn feed(&mut self);
}

/// Heap statistics for the headroom check after each hardware pass.
pub trait HeapPort {
    /// Currently free heap (bytes).
    fn free_bytes(&self) -> u32;
    /// Lowest free heap seen since boot (bytes).
    fn min_free_bytes(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Renderer (driven adapter: page model → HTML)
// ───────────────────────────────────────────────────────────────

/// Turns the read-only page model into the body served at `/`.
pub trait Renderer {
    fn render(&self, page: &PageModel<'_>) -> String;
}
