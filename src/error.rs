//! Unified error types for the ShowerCtl firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be logged and counted by the scheduler without allocation.
//!
//! None of these ever reach the sampling/control state: a failed connection
//! is logged, counted and closed, and the loop carries on.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An inbound request could not be parsed.
    Parse(ParseError),
    /// A response could not be delivered within the retry budget.
    Transmission(TransmissionError),
    /// A socket operation failed outright (not a would-block).
    Io(IoFailure),
    /// Configuration is invalid.
    Config(&'static str),
    /// Peripheral or network initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Transmission(e) => write!(f, "transmission: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Request parse errors
// ---------------------------------------------------------------------------

/// Malformed request line or header block.  The connection is closed
/// without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The request bytes are not valid UTF-8.
    InvalidUtf8,
    /// The request line is blank.
    MissingMethod,
    /// The request line has a method but no target.
    MissingTarget,
    /// The request line has no protocol token.
    MissingProtocol,
    /// The request line has more than three tokens.
    MalformedRequestLine,
    /// A header line has no `:` separator.
    MalformedHeader,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUtf8 => write!(f, "request is not valid UTF-8"),
            Self::MissingMethod => write!(f, "missing method"),
            Self::MissingTarget => write!(f, "missing target"),
            Self::MissingProtocol => write!(f, "missing protocol"),
            Self::MalformedRequestLine => write!(f, "malformed request line"),
            Self::MalformedHeader => write!(f, "header line without ':'"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Transmission errors
// ---------------------------------------------------------------------------

/// Which half of a response was being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePart {
    Headers,
    Body,
}

impl fmt::Display for ResponsePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Headers => write!(f, "headers"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// Why a response part was not fully delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionCause {
    /// The attempt budget ran out with bytes still pending.
    AttemptsExhausted,
    /// The transport reported a hard failure mid-send.
    TransportFailed,
}

/// A response part could not be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmissionError {
    pub part: ResponsePart,
    pub cause: TransmissionCause,
    /// Bytes of this part already written.
    pub sent: usize,
    /// Bytes of this part still pending.
    pub remaining: usize,
    /// Write calls made for this part.
    pub attempts: u32,
}

impl fmt::Display for TransmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause {
            TransmissionCause::AttemptsExhausted => write!(
                f,
                "failed to send {} after {} attempts ({} bytes remaining)",
                self.part, self.attempts, self.remaining
            ),
            TransmissionCause::TransportFailed => write!(
                f,
                "transport failed while sending {} ({} bytes remaining)",
                self.part, self.remaining
            ),
        }
    }
}

impl From<TransmissionError> for Error {
    fn from(e: TransmissionError) -> Self {
        Self::Transmission(e)
    }
}

// ---------------------------------------------------------------------------
// Socket failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoFailure {
    /// Binding the listening socket failed.
    Bind,
    /// `accept()` failed with something other than would-block.
    Accept,
    /// Reading the request failed.
    Receive,
    /// Applying socket options failed.
    SocketOptions,
}

impl fmt::Display for IoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind => write!(f, "bind failed"),
            Self::Accept => write!(f, "accept failed"),
            Self::Receive => write!(f, "receive failed"),
            Self::SocketOptions => write!(f, "socket option failed"),
        }
    }
}

impl From<IoFailure> for Error {
    fn from(e: IoFailure) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
