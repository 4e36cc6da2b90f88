//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                |
//! |------------|---------------------|----------------------------|
//! | `hardware` | SensorPort          | ESP32 ADC behind sense mux |
//! |            | ActuatorPort        | ESP32 GPIO                 |
//! | `html`     | Renderer            | Status page markup         |
//! | `log_sink` | EventSink           | Serial log output          |
//! | `tcp`      | Listener, Transport | lwIP / host BSD sockets    |
//! | `time`     | TimePort            | ESP32 system timer         |
//! | `wifi`     | (bootstrap only)    | ESP-IDF WiFi soft AP       |

pub mod hardware;
pub mod html;
pub mod log_sink;
pub mod tcp;
pub mod time;
pub mod wifi;
