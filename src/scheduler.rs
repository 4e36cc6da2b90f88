//! Cooperative scheduler — the single loop that owns everything.
//!
//! One thread, no preemption.  A request is served to completion before
//! the next hardware pass starts and vice versa, so a response never sees
//! the history or heater state mid-update.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        run_once()                            │
//! │                                                              │
//! │  1. feed watchdog                                            │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  2. accept (≤ accept_timeout) ──▶ handle_connection ──▶ close│
//! │        │          └ nothing waiting: not an error            │
//! │        ▼                                                     │
//! │  3. now ≥ next_tick?  ──▶ AppService.tick()                  │
//! │        │                  next_tick = now + interval         │
//! │        │                  heap headroom check                │
//! │        │                  telemetry every N ticks            │
//! │        ▼                                                     │
//! │  4. iteration time vs watchdog budget                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The next deadline is taken from the time the pass actually ran, so
//! request handling skews the interval.  That slack is accepted.

use core::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{
    ActuatorPort, EventSink, HeapPort, Renderer, SensorPort, TimePort, WatchdogPort,
};
use crate::app::service::AppService;
use crate::diagnostics::LoopStats;
use crate::error::Error;
use crate::http::transport::Listener;
use crate::http::{self, Outcome};

// ═══════════════════════════════════════════════════════════════
//  Platform bundle
// ═══════════════════════════════════════════════════════════════

/// Hardware-facing collaborators the loop drives.
pub struct Platform<H, C, W, M> {
    /// Sensor inputs and digital outputs.
    pub hardware: H,
    pub clock: C,
    pub watchdog: W,
    pub heap: M,
}

/// What one iteration did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Iteration {
    /// A hardware pass ran.
    pub ticked: bool,
    /// Outcome of the connection served, if any.
    pub served: Option<Outcome>,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct Scheduler<H, L, C, W, R, S, M> {
    app: AppService,
    platform: Platform<H, C, W, M>,
    listener: L,
    renderer: R,
    sink: S,
    stats: LoopStats,
    /// Monotonic time at which the next hardware pass is due.
    next_tick_ms: u64,
    ticks_since_telemetry: u32,
    /// Latched while free heap is below the low-water mark.
    heap_low: bool,
}

impl<H, L, C, W, R, S, M> Scheduler<H, L, C, W, R, S, M>
where
    H: SensorPort + ActuatorPort,
    L: Listener,
    C: TimePort,
    W: WatchdogPort,
    R: Renderer,
    S: EventSink,
    M: HeapPort,
{
    /// The first hardware pass runs on the first iteration.
    pub fn new(
        app: AppService,
        platform: Platform<H, C, W, M>,
        listener: L,
        renderer: R,
        sink: S,
    ) -> Self {
        Self {
            app,
            platform,
            listener,
            renderer,
            sink,
            stats: LoopStats::default(),
            next_tick_ms: 0,
            ticks_since_telemetry: 0,
            heap_low: false,
        }
    }

    /// Put outputs in their safe state and announce the service.
    pub fn start(&mut self) {
        self.app.start(&mut self.platform.hardware, &mut self.sink);
        let cfg = self.app.config();
        info!(
            "Scheduler: tick every {} ms, accept timeout {} ms, watchdog {} ms",
            cfg.sample_interval_ms, cfg.accept_timeout_ms, cfg.watchdog_timeout_ms
        );
    }

    // ── Main loop ─────────────────────────────────────────────

    /// Loop until `shutdown` is raised, then drive every output off.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::Relaxed) {
            self.run_once();
        }
        info!("Scheduler: shutdown requested after {} iterations", self.stats.iterations);
        self.platform.hardware.all_off();
    }

    /// One cooperative iteration.
    pub fn run_once(&mut self) -> Iteration {
        let started = self.platform.clock.now_ms();
        let mut iteration = Iteration::default();

        // 1. Watchdog.
        self.platform.watchdog.feed();

        // 2. Network step.
        iteration.served = self.serve_one();

        // 3. Hardware pass, if due.
        let now = self.platform.clock.now_ms();
        if now >= self.next_tick_ms {
            self.hardware_pass();
            self.next_tick_ms = now + u64::from(self.app.config().sample_interval_ms);
            iteration.ticked = true;
        }

        // 4. Budget.
        let elapsed = self.platform.clock.now_ms().saturating_sub(started);
        let budget = u64::from(self.app.config().watchdog_timeout_ms);
        if self.stats.record_iteration(elapsed, budget) {
            warn!("Scheduler: iteration took {} ms (watchdog {} ms)", elapsed, budget);
        }

        iteration
    }

    fn serve_one(&mut self) -> Option<Outcome> {
        let timeout = self.app.config().accept_timeout_ms;
        let mut conn = match self.listener.accept(timeout) {
            Ok(Some(conn)) => conn,
            Ok(None) => return None,
            Err(e) => {
                self.stats.io_errors = self.stats.io_errors.saturating_add(1);
                warn!("Scheduler: {}", e);
                return None;
            }
        };

        let attempts = self.app.config().max_send_attempts;
        let result = http::handle_connection(
            &mut conn,
            &mut self.app,
            &self.renderer,
            &mut self.sink,
            attempts,
        );
        // Closed here whatever happened.
        drop(conn);

        match result {
            Ok(Outcome::Served(code)) => {
                self.stats.requests_served = self.stats.requests_served.saturating_add(1);
                Some(Outcome::Served(code))
            }
            Ok(Outcome::NoRequest) => {
                self.stats.empty_requests = self.stats.empty_requests.saturating_add(1);
                Some(Outcome::NoRequest)
            }
            Err(e) => {
                match e {
                    Error::Parse(_) => {
                        self.stats.parse_errors = self.stats.parse_errors.saturating_add(1)
                    }
                    Error::Transmission(_) => {
                        self.stats.transmission_errors =
                            self.stats.transmission_errors.saturating_add(1)
                    }
                    _ => self.stats.io_errors = self.stats.io_errors.saturating_add(1),
                }
                warn!("Scheduler: connection dropped: {}", e);
                None
            }
        }
    }

    fn hardware_pass(&mut self) {
        self.app.tick(&mut self.platform.hardware, &mut self.sink);
        self.stats.ticks += 1;

        // Per-pass allocations are already freed; check what is left.
        let free = self.platform.heap.free_bytes();
        let low_water = self.app.config().heap_low_water_bytes;
        let low = free < low_water;
        if low && !self.heap_low {
            warn!("Scheduler: free heap {} B below {} B", free, low_water);
            self.sink.emit(&AppEvent::HeapLow {
                free_bytes: free,
                low_water_bytes: low_water,
            });
        }
        self.heap_low = low;

        self.ticks_since_telemetry += 1;
        if self.ticks_since_telemetry >= self.app.config().telemetry_interval_ticks {
            self.ticks_since_telemetry = 0;
            let telemetry = self.app.build_telemetry(
                self.stats,
                free,
                self.platform.heap.min_free_bytes(),
            );
            self.sink.emit(&AppEvent::Telemetry(telemetry));
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn platform(&self) -> &Platform<H, C, W, M> {
        &self.platform
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Monotonic time the next hardware pass is due.
    pub fn next_tick_ms(&self) -> u64 {
        self.next_tick_ms
    }
}
