//! Scheduler integration tests: tick cadence, connection handling and
//! the bookkeeping the loop keeps while doing both.

use core::sync::atomic::AtomicBool;

use crate::mock_hw::{
    MockClock, MockConnection, MockHardware, MockHeap, MockListener, MockWatchdog, RecordingSink,
};

use showerctl::adapters::html::HtmlRenderer;
use showerctl::app::events::AppEvent;
use showerctl::app::service::AppService;
use showerctl::config::SystemConfig;
use showerctl::http::{MAX_READS, Outcome};
use showerctl::scheduler::{Platform, Scheduler};

type TestScheduler = Scheduler<
    MockHardware,
    MockListener,
    MockClock,
    MockWatchdog,
    HtmlRenderer,
    RecordingSink,
    MockHeap,
>;

struct Rig {
    scheduler: TestScheduler,
    clock: MockClock,
    watchdog: MockWatchdog,
    heap: MockHeap,
    listener: MockListener,
}

fn rig_with(config: SystemConfig) -> Rig {
    let clock = MockClock::default();
    let watchdog = MockWatchdog::default();
    let heap = MockHeap::default();
    let listener = MockListener::default();
    let platform = Platform {
        hardware: MockHardware::new(),
        clock: clock.clone(),
        watchdog: watchdog.clone(),
        heap: heap.clone(),
    };
    let mut scheduler = Scheduler::new(
        AppService::new(config),
        platform,
        listener.clone(),
        HtmlRenderer::new(),
        RecordingSink::new(),
    );
    scheduler.start();
    Rig {
        scheduler,
        clock,
        watchdog,
        heap,
        listener,
    }
}

fn rig() -> Rig {
    rig_with(SystemConfig::default())
}

// ── Cadence ───────────────────────────────────────────────────

#[test]
fn first_iteration_ticks_immediately() {
    let mut r = rig();
    let it = r.scheduler.run_once();
    assert!(it.ticked);
    assert_eq!(it.served, None);
    assert_eq!(r.scheduler.app().tick_count(), 1);
    assert_eq!(r.scheduler.next_tick_ms(), 1000);
}

#[test]
fn tick_waits_for_the_sample_interval() {
    let mut r = rig();
    r.scheduler.run_once();

    r.clock.advance(999);
    assert!(!r.scheduler.run_once().ticked);
    assert_eq!(r.scheduler.app().tick_count(), 1);

    r.clock.advance(1);
    assert!(r.scheduler.run_once().ticked);
    assert_eq!(r.scheduler.app().tick_count(), 2);
    assert_eq!(r.scheduler.stats().ticks, 2);
    assert_eq!(r.scheduler.stats().iterations, 3);
}

#[test]
fn watchdog_is_fed_every_iteration() {
    let mut r = rig();
    for _ in 0..5 {
        r.scheduler.run_once();
    }
    assert_eq!(r.watchdog.feeds.get(), 5);
}

#[test]
fn accept_waits_the_configured_timeout() {
    let mut r = rig();
    r.scheduler.run_once();
    r.scheduler.run_once();
    assert_eq!(r.listener.timeouts.borrow().as_slice(), &[50, 50]);
}

// ── Connections ───────────────────────────────────────────────

#[test]
fn status_request_is_served_before_the_tick() {
    let mut r = rig();
    let conn = MockConnection::new(b"GET /status HTTP/1.1\r\nHost: 192.168.4.1\r\n\r\n");
    let output = conn.output.clone();
    r.listener.push(conn);

    let it = r.scheduler.run_once();
    assert_eq!(it.served, Some(Outcome::Served(200)));
    assert!(it.ticked);
    assert_eq!(r.scheduler.stats().requests_served, 1);

    let text = String::from_utf8(output.borrow().clone()).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\n"));
    assert!(text.contains("Content-Type: application/json"));
    let (head, body) = text.split_once("\n\n").unwrap();
    assert!(head.contains(&format!("Content-Length: {}", body.len())));
    // Served before the first pass: nothing sampled yet.
    assert!(body.contains("\"irdtct\":0"));
}

#[test]
fn one_connection_per_iteration() {
    let mut r = rig();
    r.listener.push(MockConnection::new(b"GET /status HTTP/1.1\n\n"));
    r.listener.push(MockConnection::new(b"GET /status HTTP/1.1\n\n"));

    r.scheduler.run_once();
    assert_eq!(r.listener.queue.borrow().len(), 1);
    r.scheduler.run_once();
    assert_eq!(r.listener.queue.borrow().len(), 0);
    assert_eq!(r.scheduler.stats().requests_served, 2);
}

#[test]
fn malformed_request_is_counted_and_not_answered() {
    let mut r = rig();
    let conn = MockConnection::new(b"GET\n\n");
    let writes = conn.writes.clone();
    r.listener.push(conn);

    let it = r.scheduler.run_once();
    assert_eq!(it.served, None);
    assert!(it.ticked, "a bad client never blocks the pass");
    assert_eq!(r.scheduler.stats().parse_errors, 1);
    assert_eq!(writes.get(), 0);
}

#[test]
fn empty_connection_is_counted() {
    let mut r = rig();
    r.listener.push(MockConnection::new(b""));
    let it = r.scheduler.run_once();
    assert_eq!(it.served, Some(Outcome::NoRequest));
    assert_eq!(r.scheduler.stats().empty_requests, 1);
    assert_eq!(r.scheduler.stats().requests_served, 0);
}

#[test]
fn stalled_client_exhausts_attempts_and_loop_continues() {
    let mut r = rig();
    let conn = MockConnection::new(b"GET /status HTTP/1.1\n\n").with_write_chunk(0);
    let writes = conn.writes.clone();
    r.listener.push(conn);

    let it = r.scheduler.run_once();
    assert!(it.ticked);
    assert_eq!(r.scheduler.stats().transmission_errors, 1);
    // Headers never got through, so the body was never attempted.
    assert_eq!(writes.get(), 25);
}

#[test]
fn failed_receive_is_an_io_error() {
    let mut r = rig();
    let mut conn = MockConnection::new(b"GET / HTTP/1.1\n\n");
    conn.fail_reads = true;
    r.listener.push(conn);

    r.scheduler.run_once();
    assert_eq!(r.scheduler.stats().io_errors, 1);
}

#[test]
fn failed_accept_is_an_io_error() {
    let mut r = rig();
    r.listener.fail_next.set(true);
    let it = r.scheduler.run_once();
    assert!(it.ticked);
    assert_eq!(r.scheduler.stats().io_errors, 1);
}

#[test]
fn threshold_from_the_page_reaches_the_service() {
    let mut r = rig();
    r.listener
        .push(MockConnection::new(b"GET /?threshold1=30&threshold2=45 HTTP/1.1\n\n"));
    r.scheduler.run_once();
    assert_eq!(r.scheduler.app().thresholds(), [30.0, 45.0]);
    assert_eq!(
        r.scheduler
            .sink()
            .count(|e| matches!(e, AppEvent::ThresholdChanged { .. })),
        2
    );
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn slow_client_is_recorded_as_overrun() {
    let mut r = rig();
    let mut conn = MockConnection::new(b"GET /status HTTP/1.1\n\n");
    conn.slow = Some((r.clock.clone(), 9_000));
    r.listener.push(conn);

    r.scheduler.run_once();
    let stats = r.scheduler.stats();
    assert_eq!(stats.budget_overruns, 1);
    assert_eq!(stats.worst_iteration_ms, 9_000);
}

#[test]
fn drip_fed_request_is_bounded_by_the_read_count() {
    let mut r = rig();
    let receive = u64::from(SystemConfig::default().receive_timeout_ms);
    let mut conn = MockConnection::new(
        b"GET /status HTTP/1.1\nHost: 192.168.4.1\nAccept: */*\nX-Pad: aaaaaaaa\n\n",
    )
    .with_read_chunk(4);
    conn.slow = Some((r.clock.clone(), receive));
    r.listener.push(conn);

    r.scheduler.run_once();
    let stats = r.scheduler.stats();
    assert_eq!(stats.worst_iteration_ms, MAX_READS as u64 * receive);
    assert!(stats.worst_iteration_ms <= SystemConfig::default().worst_case_network_ms());
    assert_eq!(stats.budget_overruns, 0);
}

// ── Heap and telemetry ────────────────────────────────────────

#[test]
fn heap_low_is_reported_once_per_excursion() {
    let mut r = rig();
    let low = |s: &RecordingSink| s.count(|e| matches!(e, AppEvent::HeapLow { .. }));

    r.heap.free.set(8 * 1024);
    for _ in 0..3 {
        r.scheduler.run_once();
        r.clock.advance(1000);
    }
    assert_eq!(low(r.scheduler.sink()), 1);

    r.heap.free.set(64 * 1024);
    r.scheduler.run_once();
    r.clock.advance(1000);
    r.heap.free.set(4 * 1024);
    r.scheduler.run_once();
    assert_eq!(low(r.scheduler.sink()), 2);
}

#[test]
fn telemetry_every_configured_ticks() {
    let config = SystemConfig {
        telemetry_interval_ticks: 3,
        ..SystemConfig::default()
    };
    let mut r = rig_with(config);
    for _ in 0..7 {
        r.scheduler.run_once();
        r.clock.advance(1000);
    }
    let telemetry: Vec<u64> = r
        .scheduler
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t.tick_count),
            _ => None,
        })
        .collect();
    assert_eq!(telemetry, vec![3, 6]);
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn raised_shutdown_flag_turns_everything_off() {
    let mut r = rig();
    let shutdown = AtomicBool::new(true);
    r.scheduler.run(&shutdown);
    assert_eq!(r.scheduler.stats().iterations, 0);
    // Once from start(), once on the way out.
    assert_eq!(r.scheduler.platform().hardware.all_off_count(), 2);
}
