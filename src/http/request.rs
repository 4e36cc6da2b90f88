//! Zero-copy request parser.
//!
//! ```text
//!   METHOD SP TARGET SP PROTOCOL LF       TARGET = path [ "?" query ]
//!   Key: value LF                          query  = k=v ( "&" k=v )*
//!   ...
//!   LF                                     ← first blank line
//!   body
//! ```
//!
//! Lines end in `\n`; a trailing `\r` is tolerated and dropped.  Every
//! field borrows from the receive buffer.  Query and header lists keep
//! wire order and duplicates; lookups return the first match.  Entries
//! past a list's capacity are dropped, not rejected.

use heapless::Vec;
use log::debug;

use crate::error::ParseError;

/// Query parameters kept per request.
pub const MAX_QUERY_PARAMS: usize = 8;
/// Header lines kept per request.
pub const MAX_HEADERS: usize = 16;

/// A parsed request.  Lives no longer than the buffer it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub protocol: &'a str,
    pub query: Vec<(&'a str, &'a str), MAX_QUERY_PARAMS>,
    pub headers: Vec<(&'a str, &'a str), MAX_HEADERS>,
    pub body: &'a str,
}

impl<'a> Request<'a> {
    /// First value for query key `name`.
    pub fn query_param(&self, name: &str) -> Option<&'a str> {
        self.query.iter().find(|(k, _)| *k == name).map(|&(_, v)| v)
    }

    /// First value for header `name` (ASCII case-insensitive).
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|&(_, v)| v)
    }
}

/// Parse a received buffer.
///
/// An empty buffer means the peer sent nothing: `Ok(None)`, and the
/// connection is closed without a response.
pub fn parse(buf: &[u8]) -> Result<Option<Request<'_>>, ParseError> {
    if buf.is_empty() {
        return Ok(None);
    }
    let text = core::str::from_utf8(buf).map_err(|_| ParseError::InvalidUtf8)?;
    let (head, body) = split_head(text);
    let mut lines = head.lines();

    // ── Request line ──────────────────────────────────────────
    let mut tokens = lines.next().unwrap_or("").split_whitespace();
    let method = tokens.next().ok_or(ParseError::MissingMethod)?;
    let target = tokens.next().ok_or(ParseError::MissingTarget)?;
    let protocol = tokens.next().ok_or(ParseError::MissingProtocol)?;
    if tokens.next().is_some() {
        return Err(ParseError::MalformedRequestLine);
    }

    let (path, query_str) = target.split_once('?').unwrap_or((target, ""));
    let query = parse_query(query_str);

    // ── Headers ───────────────────────────────────────────────
    let mut headers: Vec<(&str, &str), MAX_HEADERS> = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        let (key, value) = line.split_once(':').ok_or(ParseError::MalformedHeader)?;
        if headers.push((key, trim_one_space(value))).is_err() {
            dropped += 1;
        }
    }
    if dropped > 0 {
        debug!("dropped {} headers past the first {}", dropped, MAX_HEADERS);
    }

    Ok(Some(Request {
        method,
        path,
        protocol,
        query,
        headers,
        body,
    }))
}

/// Split `k=v&k=v` into ordered pairs.
///
/// A segment without `=` is all key with an empty value; empty segments
/// are skipped.  Only the first [`MAX_QUERY_PARAMS`] pairs are kept.
pub fn parse_query(query: &str) -> Vec<(&str, &str), MAX_QUERY_PARAMS> {
    let mut out = Vec::new();
    for segment in query.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
        if out.push((key, trim_one_space(value))).is_err() {
            debug!("query parameter {:?} dropped", key);
        }
    }
    out
}

/// Header block (request line included) and body, split at the first
/// blank line after the request line.  Without one the body is empty.
fn split_head(text: &str) -> (&str, &str) {
    let mut start = 0;
    while let Some(offset) = text[start..].find('\n') {
        let end = start + offset;
        let line = &text[start..end];
        if start > 0 && line.strip_suffix('\r').unwrap_or(line).is_empty() {
            return (&text[..start], &text[end + 1..]);
        }
        start = end + 1;
    }
    (text, "")
}

fn trim_one_space(value: &str) -> &str {
    value.strip_prefix(' ').unwrap_or(value)
}
