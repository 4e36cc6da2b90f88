//! GPIO / peripheral pin assignments for the ShowerCtl controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.
//!
//! All analog sensors share one ADC input.  Each sensor's signal path is
//! switched onto the ADC by its own select output, so at most one select
//! line is energised at any time.

// ---------------------------------------------------------------------------
// Shared analog input (ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 0 (GPIO 1 on ESP32-S3), shared by every analog sensor.
pub const SENSE_ADC_GPIO: i32 = 1;
/// ADC1 channel number for [`SENSE_ADC_GPIO`].
pub const SENSE_ADC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Sensor select outputs (one per multiplexed channel)
// ---------------------------------------------------------------------------

/// IR occupancy receiver, shower 1.
pub const SELECT_PRESENCE_1_GPIO: i32 = 10;
/// IR occupancy receiver, shower 2.
pub const SELECT_PRESENCE_2_GPIO: i32 = 11;
/// Flow sensor, shower 1.
pub const SELECT_FLOW_1_GPIO: i32 = 12;
/// Flow sensor, shower 2.
pub const SELECT_FLOW_2_GPIO: i32 = 13;
/// Thermistor, shower 1.
pub const SELECT_TEMP_1_GPIO: i32 = 14;
/// Thermistor, shower 2.
pub const SELECT_TEMP_2_GPIO: i32 = 15;

/// Settling time after energising a select line, before sampling.
pub const SELECT_SETTLE_US: u32 = 5;

// ---------------------------------------------------------------------------
// Actuator outputs
// ---------------------------------------------------------------------------

/// "In use" indicator, shower 1 (HIGH = occupied).
pub const PRESENCE_1_LED_GPIO: i32 = 6;
/// "In use" indicator, shower 2.
pub const PRESENCE_2_LED_GPIO: i32 = 7;
/// Inline heater relay, shower 1 (HIGH = heating).
pub const HEATER_1_GPIO: i32 = 8;
/// Inline heater relay, shower 2.
pub const HEATER_2_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// On-board status LED; lit while the access point is up.
pub const STATUS_LED_GPIO: i32 = 48;

/// Every digital output driven by the firmware, in init order.
pub const OUTPUT_GPIOS: [i32; 11] = [
    SELECT_PRESENCE_1_GPIO,
    SELECT_PRESENCE_2_GPIO,
    SELECT_FLOW_1_GPIO,
    SELECT_FLOW_2_GPIO,
    SELECT_TEMP_1_GPIO,
    SELECT_TEMP_2_GPIO,
    PRESENCE_1_LED_GPIO,
    PRESENCE_2_LED_GPIO,
    HEATER_1_GPIO,
    HEATER_2_GPIO,
    STATUS_LED_GPIO,
];
