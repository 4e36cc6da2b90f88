//! Minimal HTTP/1.1 front end.
//!
//! One request per connection:
//!
//! ```text
//!   accept ─▶ read (≤ 1 KiB) ─▶ parse ─▶ route ─▶ send head ─▶ send body ─▶ close
//!                │                │
//!                └ empty ─▶ close └ malformed ─▶ close (no response)
//! ```
//!
//! A request that overflows the receive buffer is cut back to its last
//! complete line, so an oversized header block still routes on its
//! request line.
//!
//! Nothing here blocks longer than the transport's own timeouts, and the
//! number of writes per response part is bounded.

pub mod request;
pub mod response;
pub mod router;
pub mod transport;

use log::debug;

use crate::app::ports::{EventSink, Renderer};
use crate::app::service::AppService;
use crate::error::{Error, IoFailure};

use transport::{Transport, send_response};

/// Bytes read per request.  Anything beyond is ignored.
pub const REQUEST_BUF_LEN: usize = 1024;

/// Reads allowed while waiting for the end of the header block.  Each
/// may block for the transport's receive timeout.
pub const MAX_READS: usize = 8;

/// What happened on a connection that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A response with this status code was fully sent.
    Served(u16),
    /// The client sent nothing; closed without a response.
    NoRequest,
}

/// Serve a single request on `conn`.  The connection is dropped (closed)
/// by the caller afterwards, whatever the result.
pub fn handle_connection<T: Transport>(
    conn: &mut T,
    app: &mut AppService,
    renderer: &impl Renderer,
    sink: &mut impl EventSink,
    max_send_attempts: u32,
) -> Result<Outcome, Error> {
    let mut buf = [0u8; REQUEST_BUF_LEN];
    let len = read_request(conn, &mut buf)?;
    let len = complete_lines(&buf[..len]);

    let Some(req) = request::parse(&buf[..len])? else {
        return Ok(Outcome::NoRequest);
    };
    debug!("{} {} ({} query params)", req.method, req.path, req.query.len());

    let response = router::route(&req, app, renderer, sink);
    send_response(conn, &response, max_send_attempts)?;
    Ok(Outcome::Served(response.status.code()))
}

/// Fill `buf` until the header block is complete, the buffer is full, or
/// the peer stops sending.  Returns the byte count.
fn read_request<T: Transport>(conn: &mut T, buf: &mut [u8]) -> Result<usize, Error> {
    let mut len = 0;
    for _ in 0..MAX_READS {
        if len == buf.len() {
            break;
        }
        let n = conn.read(&mut buf[len..]).map_err(|e| {
            debug!("receive failed: {:?}", e);
            IoFailure::Receive
        })?;
        if n == 0 {
            break;
        }
        len += n;
        if header_complete(&buf[..len]) {
            break;
        }
    }
    Ok(len)
}

/// Length to parse.  A full buffer is cut after its last `\n`, dropping a
/// line the peer had not finished sending when the buffer ran out.
fn complete_lines(data: &[u8]) -> usize {
    if data.len() < REQUEST_BUF_LEN {
        return data.len();
    }
    match data.iter().rposition(|&b| b == b'\n') {
        Some(i) => {
            debug!("request truncated to {} of {} bytes", i + 1, data.len());
            i + 1
        }
        None => data.len(),
    }
}

fn header_complete(data: &[u8]) -> bool {
    data.windows(2).any(|w| w == b"\n\n") || data.windows(3).any(|w| w == b"\n\r\n")
}
