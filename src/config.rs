//! System configuration parameters
//!
//! All tunable parameters for the ShowerCtl system.  There is no persistent
//! store: the device boots from [`SystemConfig::default()`] and only the
//! per-shower heater thresholds change at runtime (over HTTP).

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::MAX_READS;

/// Showers wired to this controller.  Channel and output arrays are sized
/// by it.
pub const SHOWER_COUNT: usize = 2;

/// Default soft-AP name.
pub const DEFAULT_AP_SSID: &str = "SHOWERCTL_AP";
/// Default soft-AP WPA2 passphrase.
pub const DEFAULT_AP_PASSWORD: &str = "12345678";

/// Which reading feeds the weekly history each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistorySource {
    /// Sum of every shower's flow rate (L/min).
    CombinedFlow,
    /// Mean of every shower's water temperature (°C).
    MeanTemperature,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- History geometry ---
    /// Number of weeks kept in the rolling history.
    pub history_depth_weeks: usize,
    /// Time-slots per day (one slot per sampling tick).
    pub slots_per_day: usize,
    /// Days per history row.
    pub days_per_week: usize,
    /// Reading aggregated into the history.
    pub history_source: HistorySource,

    // --- Presence hysteresis ---
    /// Centre of the presence dead band (raw units).
    pub presence_midpoint: u16,
    /// Half-width of the presence dead band (raw units).
    pub presence_half_band: u16,
    /// IR receivers pull low on detection; invert before thresholding.
    pub presence_active_low: bool,

    // --- Conversions ---
    /// Flow rate (L/min) at a full-scale raw reading.
    pub flow_full_scale_lpm: f32,
    /// Water temperature (°C) at a full-scale raw reading.
    pub temperature_full_scale_c: f32,

    // --- Heaters ---
    /// Threshold every shower starts with (°C).
    pub default_threshold_c: f32,
    /// Lowest threshold accepted over HTTP (°C).
    pub threshold_min_c: f32,
    /// Highest threshold accepted over HTTP (°C).
    pub threshold_max_c: f32,
    /// Turn-on point sits this far below the threshold (°C).
    pub heater_band_c: f32,

    // --- Timing ---
    /// Hardware sampling interval (milliseconds).
    pub sample_interval_ms: u32,
    /// How long one accept poll may wait (milliseconds).
    pub accept_timeout_ms: u32,
    /// Receive timeout on an accepted connection (milliseconds).
    pub receive_timeout_ms: u32,
    /// Per-write timeout on an accepted connection (milliseconds).
    pub send_timeout_ms: u32,
    /// Write calls allowed per response part.
    pub max_send_attempts: u32,
    /// Hardware watchdog deadline (milliseconds).
    pub watchdog_timeout_ms: u32,
    /// Telemetry report interval (sampling ticks).
    pub telemetry_interval_ticks: u32,

    // --- Memory ---
    /// Free-heap level below which a `HeapLow` event is raised (bytes).
    pub heap_low_water_bytes: u32,

    // --- Network ---
    /// HTTP listen port.
    pub http_port: u16,
    /// Soft-AP SSID.
    pub ap_ssid: heapless::String<32>,
    /// Soft-AP WPA2 passphrase.
    pub ap_password: heapless::String<64>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut ap_ssid = heapless::String::new();
        let _ = ap_ssid.push_str(DEFAULT_AP_SSID);
        let mut ap_password = heapless::String::new();
        let _ = ap_password.push_str(DEFAULT_AP_PASSWORD);

        Self {
            // History: 2 weeks × 7 days × 6 slots
            history_depth_weeks: 2,
            slots_per_day: 6,
            days_per_week: 7,
            history_source: HistorySource::CombinedFlow,

            // Presence: 2^15 ± 10000
            presence_midpoint: 32_768,
            presence_half_band: 10_000,
            presence_active_low: true,

            // Conversions
            flow_full_scale_lpm: 50.0,
            temperature_full_scale_c: 50.0,

            // Heaters
            default_threshold_c: 40.0,
            threshold_min_c: 0.0,
            threshold_max_c: 50.0,
            heater_band_c: 2.0,

            // Timing
            sample_interval_ms: 1000, // 1 Hz
            accept_timeout_ms: 50,
            receive_timeout_ms: 250,
            send_timeout_ms: 100,
            max_send_attempts: 25,
            watchdog_timeout_ms: 8000,
            telemetry_interval_ticks: 60,

            // Memory
            heap_low_water_bytes: 16 * 1024,

            // Network
            http_port: 80,
            ap_ssid,
            ap_password,
        }
    }
}

impl SystemConfig {
    /// Slots per history row (`W`).
    pub fn slots_per_week(&self) -> usize {
        self.slots_per_day * self.days_per_week
    }

    /// `(low, high)` presence thresholds in raw units.
    pub fn presence_thresholds(&self) -> (u16, u16) {
        let low = self.presence_midpoint.saturating_sub(self.presence_half_band);
        let high = self.presence_midpoint.saturating_add(self.presence_half_band);
        (low, high)
    }

    /// Worst-case time one loop iteration may spend blocked on the network:
    /// the accept wait, every receive the request reader allows, and both
    /// response parts at full attempt count.
    pub fn worst_case_network_ms(&self) -> u64 {
        u64::from(self.accept_timeout_ms)
            + MAX_READS as u64 * u64::from(self.receive_timeout_ms)
            + 2 * u64::from(self.max_send_attempts) * u64::from(self.send_timeout_ms)
    }

    /// Reject configurations the control loop cannot run safely with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.history_depth_weeks == 0 || self.slots_per_day == 0 || self.days_per_week == 0 {
            return Err(Error::Config("history geometry must be non-zero"));
        }
        let (low, high) = self.presence_thresholds();
        if low >= high {
            return Err(Error::Config("presence dead band is empty"));
        }
        if self.threshold_min_c.is_nan()
            || self.threshold_max_c.is_nan()
            || self.threshold_min_c >= self.threshold_max_c
        {
            return Err(Error::Config("threshold range is inverted"));
        }
        if self.default_threshold_c.is_nan()
            || self.default_threshold_c < self.threshold_min_c
            || self.default_threshold_c > self.threshold_max_c
        {
            return Err(Error::Config("default threshold outside accepted range"));
        }
        if self.heater_band_c.is_nan() || self.heater_band_c < 0.0 {
            return Err(Error::Config("heater band must be non-negative"));
        }
        if self.max_send_attempts == 0 {
            return Err(Error::Config("send attempt bound must be non-zero"));
        }
        if self.sample_interval_ms == 0 {
            return Err(Error::Config("sample interval must be non-zero"));
        }
        if self.worst_case_network_ms() >= u64::from(self.watchdog_timeout_ms) {
            return Err(Error::Config("network timeouts exceed the watchdog deadline"));
        }
        Ok(())
    }
}
