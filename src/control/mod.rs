//! Closed-loop actuator control.

pub mod heater;
