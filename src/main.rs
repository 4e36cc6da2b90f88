//! ShowerCtl Firmware — Main Entry Point
//!
//! Hexagonal core driven by a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   Esp32TimeAdapter  SystemHeap │
//! │  (Sensor+Actuator) (EventSink)    (TimePort)        (HeapPort) │
//! │  TcpHttpListener   HtmlRenderer   Watchdog          SoftAp     │
//! │  (Listener)        (Renderer)     (WatchdogPort)               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Presence · History · Heaters                          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler: watchdog → accept/serve → tick                     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use showerctl::adapters::hardware::HardwareAdapter;
use showerctl::adapters::html::HtmlRenderer;
use showerctl::adapters::log_sink::LogEventSink;
use showerctl::adapters::tcp::TcpHttpListener;
use showerctl::adapters::time::Esp32TimeAdapter;
use showerctl::adapters::wifi::SoftAp;
use showerctl::app::ports::{ActuatorPort, DigitalOutput};
use showerctl::app::service::AppService;
use showerctl::config::SystemConfig;
use showerctl::diagnostics::{self, SystemHeap};
use showerctl::drivers::{hw_init, watchdog::Watchdog};
use showerctl::scheduler::{Platform, Scheduler};

/// Never raised on device; the watchdog is the only way out of the loop.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    diagnostics::install_panic_handler();

    info!("╔══════════════════════════════════════╗");
    info!("║  ShowerCtl v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = SystemConfig::default();
    if let Err(e) = config.validate() {
        warn!("Config rejected ({}), using defaults", e);
        config = SystemConfig::default();
    }

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().context("peripheral init")?;
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);
    let mut hw = HardwareAdapter::new();

    // ── 4. Access point ───────────────────────────────────────
    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let sysloop = EspSystemEventLoop::take().context("system event loop")?;
    let nvs = EspDefaultNvsPartition::take().ok();

    let mut ap = SoftAp::new(&config.ap_ssid, &config.ap_password)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("AP credentials")?;
    ap.start(peripherals.modem, sysloop, nvs)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("AP start")?;
    hw.set_digital(DigitalOutput::StatusLed, ap.is_up());

    // ── 5. Listener ───────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpHttpListener::bind(&addr, config.receive_timeout_ms, config.send_timeout_ms)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("HTTP listener")?;

    // ── 6. Scheduler ──────────────────────────────────────────
    let platform = Platform {
        hardware: hw,
        clock: Esp32TimeAdapter::new(),
        watchdog,
        heap: SystemHeap::new(),
    };
    let mut scheduler = Scheduler::new(
        AppService::new(config),
        platform,
        listener,
        HtmlRenderer::new(),
        LogEventSink::new(),
    );
    scheduler.start();

    info!("System ready. Entering loop.");
    scheduler.run(&SHUTDOWN);
    Ok(())
}
