//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Every analog sensor shares one ADC input behind its own select line.
//! Sampling a channel energises the select output, waits for the signal
//! to settle, takes one 12-bit sample, scales it to 16 bits, and releases
//! the line again.
//!
//! On non-espidf targets the ADC is replaced by per-channel `AtomicU16`
//! injection points ([`sim_set_raw`]) and outputs are only recorded.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use log::debug;

use crate::app::ports::{ActuatorPort, DigitalOutput, SensorChannel, SensorPort};
use crate::config::SHOWER_COUNT;
use crate::pins;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

// ── Channel tables ────────────────────────────────────────────

const CHANNEL_COUNT: usize = 3 * SHOWER_COUNT;

/// Flat index of a multiplexed channel, or `None` for an unknown shower.
fn channel_index(channel: SensorChannel) -> Option<usize> {
    let (kind, shower) = match channel {
        SensorChannel::Presence(i) => (0, i),
        SensorChannel::Flow(i) => (1, i),
        SensorChannel::Temperature(i) => (2, i),
    };
    (shower < SHOWER_COUNT).then_some(kind * SHOWER_COUNT + shower)
}

/// Select output for each flat channel index.
const SELECT_GPIOS: [i32; CHANNEL_COUNT] = [
    pins::SELECT_PRESENCE_1_GPIO,
    pins::SELECT_PRESENCE_2_GPIO,
    pins::SELECT_FLOW_1_GPIO,
    pins::SELECT_FLOW_2_GPIO,
    pins::SELECT_TEMP_1_GPIO,
    pins::SELECT_TEMP_2_GPIO,
];

fn output_gpio(output: DigitalOutput) -> Option<i32> {
    match output {
        DigitalOutput::PresenceIndicator(0) => Some(pins::PRESENCE_1_LED_GPIO),
        DigitalOutput::PresenceIndicator(1) => Some(pins::PRESENCE_2_LED_GPIO),
        DigitalOutput::Heater(0) => Some(pins::HEATER_1_GPIO),
        DigitalOutput::Heater(1) => Some(pins::HEATER_2_GPIO),
        DigitalOutput::StatusLed => Some(pins::STATUS_LED_GPIO),
        _ => None,
    }
}

/// Widen a 12-bit ADC sample to the full `u16` range.
pub fn scale_12_to_16(raw12: u16) -> u16 {
    (raw12.min(0x0FFF) << 4) | (raw12.min(0x0FFF) >> 8)
}

// ── Simulation inputs ─────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_RAW: [AtomicU16; CHANNEL_COUNT] = [const { AtomicU16::new(0) }; CHANNEL_COUNT];

/// Inject the raw 16-bit value the next read of `channel` returns.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_raw(channel: SensorChannel, raw: u16) {
    if let Some(idx) = channel_index(channel) {
        SIM_RAW[idx].store(raw, Ordering::Relaxed);
    }
}

// ── Adapter ───────────────────────────────────────────────────

/// Concrete adapter that puts the sense mux and the outputs behind port
/// traits.  Remembers the last level driven on every output.
#[derive(Debug, Default)]
pub struct HardwareAdapter {
    indicators: [bool; SHOWER_COUNT],
    heaters: [bool; SHOWER_COUNT],
    status_led: bool,
}

impl HardwareAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level last driven on `output`.
    pub fn output(&self, output: DigitalOutput) -> bool {
        match output {
            DigitalOutput::PresenceIndicator(i) => self.indicators.get(i).copied().unwrap_or(false),
            DigitalOutput::Heater(i) => self.heaters.get(i).copied().unwrap_or(false),
            DigitalOutput::StatusLed => self.status_led,
        }
    }

    #[cfg(target_os = "espidf")]
    fn sample(&mut self, idx: usize) -> u16 {
        let select = SELECT_GPIOS[idx];
        hw_init::gpio_write(select, true);
        hw_init::delay_us(pins::SELECT_SETTLE_US);
        let raw12 = hw_init::adc1_read(pins::SENSE_ADC_CHANNEL);
        hw_init::gpio_write(select, false);
        scale_12_to_16(raw12)
    }

    #[cfg(not(target_os = "espidf"))]
    fn sample(&mut self, idx: usize) -> u16 {
        SIM_RAW[idx].load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn drive(&mut self, gpio: i32, on: bool) {
        hw_init::gpio_write(gpio, on);
    }

    #[cfg(not(target_os = "espidf"))]
    fn drive(&mut self, gpio: i32, on: bool) {
        debug!("hw(sim): GPIO{} <- {}", gpio, u8::from(on));
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_raw(&mut self, channel: SensorChannel) -> u16 {
        match channel_index(channel) {
            Some(idx) => self.sample(idx),
            None => {
                debug!("hw: no such channel {:?}", channel);
                0
            }
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_digital(&mut self, output: DigitalOutput, on: bool) {
        let Some(gpio) = output_gpio(output) else {
            debug!("hw: no such output {:?}", output);
            return;
        };
        match output {
            DigitalOutput::PresenceIndicator(i) => self.indicators[i] = on,
            DigitalOutput::Heater(i) => self.heaters[i] = on,
            DigitalOutput::StatusLed => self.status_led = on,
        }
        self.drive(gpio, on);
    }

    fn all_off(&mut self) {
        for i in 0..SHOWER_COUNT {
            self.set_digital(DigitalOutput::Heater(i), false);
            self.set_digital(DigitalOutput::PresenceIndicator(i), false);
        }
        // Release every select line too, in case a sample was interrupted.
        for &gpio in &SELECT_GPIOS {
            self.drive(gpio, false);
        }
    }
}
