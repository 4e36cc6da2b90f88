//! Hardware initialisation, register helpers and the watchdog.

pub mod hw_init;
pub mod watchdog;
