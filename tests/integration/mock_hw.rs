//! Mock adapters for integration tests.
//!
//! Records every output call so tests can assert on the full command
//! history without touching real GPIO registers.  Clock, watchdog and
//! heap hand out shared handles (`Rc<Cell<_>>`) so a test can observe or
//! steer them while the scheduler owns the adapter.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use showerctl::app::events::AppEvent;
use showerctl::app::ports::{
    ActuatorPort, DigitalOutput, EventSink, HeapPort, SensorChannel, SensorPort, TimePort,
    WatchdogPort,
};
use showerctl::config::SystemConfig;
use showerctl::error::{Error, IoFailure};
use showerctl::http::transport::{Listener, Transport};

// ── Raw levels ────────────────────────────────────────────────

/// Active-low IR receiver pulled fully low: someone is there.
pub const PRESENT_RAW: u16 = 0;
/// Receiver idle high: nobody there.
pub const ABSENT_RAW: u16 = u16::MAX;
/// Exactly between the two presence thresholds.
pub const MIDPOINT_RAW: u16 = u16::MAX - 32_768;

/// Raw sample that converts to roughly `celsius` at the default scale.
pub fn temp_raw(celsius: f32) -> u16 {
    let full = SystemConfig::default().temperature_full_scale_c;
    ((celsius / full) * 65_536.0).round() as u16
}

/// Raw sample that converts to roughly `lpm` at the default scale.
pub fn flow_raw(lpm: f32) -> u16 {
    let full = SystemConfig::default().flow_full_scale_lpm;
    ((lpm / full) * 65_536.0).round() as u16
}

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Set { output: DigitalOutput, on: bool },
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    raw: HashMap<SensorChannel, u16>,
    pub reads: Vec<SensorChannel>,
    pub calls: Vec<OutputCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        let mut raw = HashMap::new();
        raw.insert(SensorChannel::Presence(0), ABSENT_RAW);
        raw.insert(SensorChannel::Presence(1), ABSENT_RAW);
        Self {
            raw,
            reads: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn set_raw(&mut self, channel: SensorChannel, raw: u16) {
        self.raw.insert(channel, raw);
    }

    /// Level last driven on `output`; `AllOff` counts as low.
    pub fn level(&self, output: DigitalOutput) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                OutputCall::Set { output: o, on } if *o == output => Some(*on),
                OutputCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn all_off_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == OutputCall::AllOff).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_raw(&mut self, channel: SensorChannel) -> u16 {
        self.reads.push(channel);
        self.raw.get(&channel).copied().unwrap_or(0)
    }
}

impl ActuatorPort for MockHardware {
    fn set_digital(&mut self, output: DigitalOutput, on: bool) {
        self.calls.push(OutputCall::Set { output, on });
    }

    fn all_off(&mut self) {
        self.calls.push(OutputCall::AllOff);
    }
}

// ── Clock / watchdog / heap ───────────────────────────────────

#[derive(Clone, Default)]
pub struct MockClock {
    pub now: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl TimePort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Clone, Default)]
pub struct MockWatchdog {
    pub feeds: Rc<Cell<u32>>,
}

impl WatchdogPort for MockWatchdog {
    fn feed(&mut self) {
        self.feeds.set(self.feeds.get() + 1);
    }
}

#[derive(Clone)]
pub struct MockHeap {
    pub free: Rc<Cell<u32>>,
}

impl Default for MockHeap {
    fn default() -> Self {
        Self {
            free: Rc::new(Cell::new(200 * 1024)),
        }
    }
}

impl HeapPort for MockHeap {
    fn free_bytes(&self) -> u32 {
        self.free.get()
    }

    fn min_free_bytes(&self) -> u32 {
        self.free.get()
    }
}

// ── Transport ─────────────────────────────────────────────────

/// In-memory client connection.
pub struct MockConnection {
    input: Vec<u8>,
    read_pos: usize,
    /// Bytes handed out per `read`.
    pub read_chunk: usize,
    /// Bytes accepted per `write`; 0 accepts nothing.
    pub write_chunk: usize,
    pub fail_reads: bool,
    /// Advance this clock by `.1` ms on every read (slow client).
    pub slow: Option<(MockClock, u64)>,
    pub output: Rc<RefCell<Vec<u8>>>,
    pub writes: Rc<Cell<u32>>,
}

#[allow(dead_code)]
impl MockConnection {
    pub fn new(request: &[u8]) -> Self {
        Self {
            input: request.to_vec(),
            read_pos: 0,
            read_chunk: 1024,
            write_chunk: usize::MAX,
            fail_reads: false,
            slow: None,
            output: Rc::new(RefCell::new(Vec::new())),
            writes: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_write_chunk(mut self, n: usize) -> Self {
        self.write_chunk = n;
        self
    }

    pub fn with_read_chunk(mut self, n: usize) -> Self {
        self.read_chunk = n;
        self
    }

    /// Everything written so far, as text.
    pub fn response(&self) -> String {
        String::from_utf8_lossy(&self.output.borrow()).into_owned()
    }
}

impl Transport for MockConnection {
    type Error = &'static str;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_reads {
            return Err("connection reset");
        }
        if let Some((clock, ms)) = &self.slow {
            clock.advance(*ms);
        }
        let rest = &self.input[self.read_pos..];
        let n = rest.len().min(buf.len()).min(self.read_chunk);
        buf[..n].copy_from_slice(&rest[..n]);
        self.read_pos += n;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.writes.set(self.writes.get() + 1);
        let n = data.len().min(self.write_chunk);
        self.output.borrow_mut().extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Hands out queued connections, one per `accept`.
#[derive(Clone, Default)]
pub struct MockListener {
    pub queue: Rc<RefCell<VecDeque<MockConnection>>>,
    pub timeouts: Rc<RefCell<Vec<u32>>>,
    pub fail_next: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl MockListener {
    pub fn push(&self, conn: MockConnection) {
        self.queue.borrow_mut().push_back(conn);
    }
}

impl Listener for MockListener {
    type Conn = MockConnection;

    fn accept(&mut self, timeout_ms: u32) -> Result<Option<MockConnection>, Error> {
        self.timeouts.borrow_mut().push(timeout_ms);
        if self.fail_next.replace(false) {
            return Err(IoFailure::Accept.into());
        }
        Ok(self.queue.borrow_mut().pop_front())
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
