//! Runtime diagnostics.
//!
//! - [`LoopStats`]: counters kept by the scheduler (iterations, requests,
//!   errors, worst iteration time against the watchdog budget).
//! - [`SystemHeap`]: heap statistics behind the [`HeapPort`], read from
//!   ESP-IDF on device and synthesised on host.
//! - [`install_panic_handler`]: logs the panic reason before the reset.

use crate::app::ports::HeapPort;

// ───────────────────────────────────────────────────────────────
// Loop statistics
// ───────────────────────────────────────────────────────────────

/// Counters accumulated by the cooperative loop since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub ticks: u64,
    pub requests_served: u32,
    /// Connections that closed without sending a request.
    pub empty_requests: u32,
    pub parse_errors: u32,
    pub transmission_errors: u32,
    pub io_errors: u32,
    /// Longest single iteration seen (milliseconds).
    pub worst_iteration_ms: u64,
    /// Iterations that exceeded the watchdog budget.
    pub budget_overruns: u32,
}

impl LoopStats {
    /// Record one iteration's duration.  Returns `true` if it overran
    /// `budget_ms`.
    pub fn record_iteration(&mut self, elapsed_ms: u64, budget_ms: u64) -> bool {
        self.iterations += 1;
        if elapsed_ms > self.worst_iteration_ms {
            self.worst_iteration_ms = elapsed_ms;
        }
        let overran = elapsed_ms > budget_ms;
        if overran {
            self.budget_overruns = self.budget_overruns.saturating_add(1);
        }
        overran
    }
}

// ───────────────────────────────────────────────────────────────
// Heap statistics
// ───────────────────────────────────────────────────────────────

/// Heap statistics of the running system.
#[derive(Debug, Default)]
pub struct SystemHeap;

impl SystemHeap {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl HeapPort for SystemHeap {
    fn free_bytes(&self) -> u32 {
        // SAFETY: read-only query of allocator counters.
        unsafe { esp_idf_sys::esp_get_free_heap_size() }
    }

    fn min_free_bytes(&self) -> u32 {
        // SAFETY: read-only query of allocator counters.
        unsafe { esp_idf_sys::esp_get_minimum_free_heap_size() }
    }
}

#[cfg(not(target_os = "espidf"))]
impl HeapPort for SystemHeap {
    // Realistic synthetic values so simulation paths exercise the same
    // branches as real hardware.
    fn free_bytes(&self) -> u32 {
        300 * 1024
    }

    fn min_free_bytes(&self) -> u32 {
        255 * 1024
    }
}

// ───────────────────────────────────────────────────────────────
// Panic handler
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that logs the reason before the default handler
/// aborts (and the device resets).
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        match info.location() {
            Some(loc) => log::error!("PANIC: {} at {}:{}", reason, loc.file(), loc.line()),
            None => log::error!("PANIC: {}", reason),
        }
    }));
}
