//! Plain TCP transport.
//!
//! ESP-IDF ships a BSD socket layer under `std::net`, so the same adapter
//! serves on device and on host.
//!
//! The listening socket is non-blocking: [`Listener::accept`] polls it
//! until a client arrives or the timeout elapses, then returns control to
//! the loop.  Accepted streams are blocking with per-call read and write
//! timeouts; a timed-out call reports 0 bytes rather than an error, which
//! the request reader and the bounded send loop both treat as "nothing
//! this time".

use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::{Error, IoFailure};
use crate::http::transport::{Listener, Transport};

/// Sleep between accept polls.
const ACCEPT_POLL: Duration = Duration::from_millis(5);

// ───────────────────────────────────────────────────────────────
// Listener
// ───────────────────────────────────────────────────────────────

pub struct TcpHttpListener {
    listener: TcpListener,
    receive_timeout: Duration,
    send_timeout: Duration,
}

impl TcpHttpListener {
    /// Bind `addr` (e.g. `0.0.0.0:80`).  Timeouts of 0 are raised to 1 ms.
    pub fn bind(addr: &str, receive_timeout_ms: u32, send_timeout_ms: u32) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).map_err(|e| {
            log::error!("TCP: bind {} failed: {}", addr, e);
            IoFailure::Bind
        })?;
        listener
            .set_nonblocking(true)
            .map_err(|_| IoFailure::SocketOptions)?;
        info!("TCP: listening on {}", addr);
        Ok(Self {
            listener,
            receive_timeout: Duration::from_millis(u64::from(receive_timeout_ms.max(1))),
            send_timeout: Duration::from_millis(u64::from(send_timeout_ms.max(1))),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.listener
            .local_addr()
            .map_err(|_| Error::Io(IoFailure::SocketOptions))
    }

    fn configure(&self, stream: &TcpStream) -> io::Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(self.receive_timeout))?;
        stream.set_write_timeout(Some(self.send_timeout))?;
        stream.set_nodelay(true)
    }
}

impl Listener for TcpHttpListener {
    type Conn = TcpConnection;

    fn accept(&mut self, timeout_ms: u32) -> Result<Option<TcpConnection>, Error> {
        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!("TCP: connection from {}", peer);
                    self.configure(&stream)
                        .map_err(|_| IoFailure::SocketOptions)?;
                    return Ok(Some(TcpConnection { stream }));
                }
                Err(e) if is_transient(&e) => {
                    if Instant::now() >= deadline {
                        return Ok(None);
                    }
                    std::thread::sleep(ACCEPT_POLL);
                }
                Err(e) => {
                    debug!("TCP: accept failed: {}", e);
                    return Err(IoFailure::Accept.into());
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Connection
// ───────────────────────────────────────────────────────────────

/// One accepted client.  Dropping it closes the socket.
pub struct TcpConnection {
    stream: TcpStream,
}

impl Transport for TcpConnection {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        match self.stream.read(buf) {
            Err(e) if is_transient(&e) => Ok(0),
            other => other,
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        match self.stream.write(data) {
            Err(e) if is_transient(&e) => Ok(0),
            other => other,
        }
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        self.stream.flush()
    }
}

/// Would-block, timeout and interrupted are not failures.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
    )
}
