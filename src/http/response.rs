//! Response framing.
//!
//! Every response is written as a header block and a body, each sent
//! separately.  `Content-Length` is always computed from the body bytes;
//! lines end in a bare `\n` for compatibility with existing clients.

use core::fmt::Write as _;

/// Status codes this server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "Not Found",
        }
    }
}

pub const CONTENT_TYPE_HTML: &str = "text/html";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// A complete response, ready to frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn html(body: String) -> Self {
        Self {
            status: Status::Ok,
            content_type: CONTENT_TYPE_HTML,
            body,
        }
    }

    pub fn json(body: String) -> Self {
        Self {
            status: Status::Ok,
            content_type: CONTENT_TYPE_JSON,
            body,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            content_type: CONTENT_TYPE_TEXT,
            body: String::from("Not Found"),
        }
    }

    /// Status line and headers, terminated by the blank line.
    pub fn head(&self) -> String {
        let mut head = String::with_capacity(128);
        let _ = write!(
            head,
            "HTTP/1.1 {} {}\n\
             Content-Type: {}\n\
             Content-Length: {}\n\
             Connection: close\n\
             \n",
            self.status.code(),
            self.status.reason(),
            self.content_type,
            self.body.len(),
        );
        head
    }
}
