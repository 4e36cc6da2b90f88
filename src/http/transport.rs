//! Transport abstraction — any byte-oriented connection.
//!
//! The request handler is generic over [`Transport`] and the scheduler over
//! [`Listener`], so the TCP adapter, a TLS adapter, or an in-memory test
//! double are interchangeable.
//!
//! ## Partial writes
//!
//! A single `write` may accept fewer bytes than offered (or none, if the
//! per-write timeout fires).  [`send_all`] keeps writing the remainder and
//! gives up after a fixed number of write calls, so a stalled client can
//! never hold the loop past its watchdog budget.

use log::{debug, warn};

use crate::error::{Error, ResponsePart, TransmissionCause, TransmissionError};

use super::response::Response;

/// Byte-oriented connection.  Dropping it closes the connection.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 on end of stream or when the receive timeout elapses.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write some prefix of `data`.
    /// Returns the number of bytes actually written (possibly 0).
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Accepts one connection at a time.
pub trait Listener {
    type Conn: Transport;

    /// Wait at most `timeout_ms` for a client.  `Ok(None)` when none
    /// arrived; that is the normal idle case, not an error.
    fn accept(&mut self, timeout_ms: u32) -> Result<Option<Self::Conn>, Error>;
}

/// Write all of `data`, allowing at most `max_attempts` write calls.
///
/// Returns the number of write calls used.
pub fn send_all<T: Transport>(
    transport: &mut T,
    data: &[u8],
    part: ResponsePart,
    max_attempts: u32,
) -> Result<u32, TransmissionError> {
    let mut sent = 0usize;
    let mut attempts = 0u32;

    while sent < data.len() && attempts < max_attempts {
        attempts += 1;
        match transport.write(&data[sent..]) {
            Ok(n) => {
                sent += n.min(data.len() - sent);
                debug!("sent {}/{} bytes of {}", sent, data.len(), part);
            }
            Err(e) => {
                warn!("transport error while sending {}: {:?}", part, e);
                return Err(TransmissionError {
                    part,
                    cause: TransmissionCause::TransportFailed,
                    sent,
                    remaining: data.len() - sent,
                    attempts,
                });
            }
        }
    }

    if sent < data.len() {
        return Err(TransmissionError {
            part,
            cause: TransmissionCause::AttemptsExhausted,
            sent,
            remaining: data.len() - sent,
            attempts,
        });
    }
    Ok(attempts)
}

/// Send the header block, then the body, each with its own attempt budget.
pub fn send_response<T: Transport>(
    transport: &mut T,
    response: &Response,
    max_attempts: u32,
) -> Result<(), TransmissionError> {
    send_all(transport, response.head().as_bytes(), ResponsePart::Headers, max_attempts)?;
    send_all(transport, response.body.as_bytes(), ResponsePart::Body, max_attempts)?;
    if let Err(e) = transport.flush() {
        debug!("flush after response failed: {:?}", e);
    }
    Ok(())
}
