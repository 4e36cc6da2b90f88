//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (today only the
//! HTTP status page) that the [`AppService`](super::service::AppService)
//! validates and applies.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Replace one shower's heater threshold (°C, already truncated).
    SetThreshold { shower: usize, celsius: f32 },
}
