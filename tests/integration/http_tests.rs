//! End-to-end connection handling against an in-memory transport.

use crate::mock_hw::{MockConnection, RecordingSink};

use showerctl::adapters::html::HtmlRenderer;
use showerctl::app::events::AppEvent;
use showerctl::app::service::AppService;
use showerctl::config::SystemConfig;
use showerctl::error::{Error, IoFailure, ParseError};
use showerctl::http::request::MAX_HEADERS;
use showerctl::http::{Outcome, REQUEST_BUF_LEN, handle_connection};

const ATTEMPTS: u32 = 25;

fn serve(
    conn: &mut MockConnection,
    app: &mut AppService,
    sink: &mut RecordingSink,
) -> Result<Outcome, Error> {
    handle_connection(conn, app, &HtmlRenderer::new(), sink, ATTEMPTS)
}

fn split(response: &str) -> (&str, &str) {
    response.split_once("\n\n").expect("header block terminated")
}

#[test]
fn status_ignores_threshold_params() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"GET /status?threshold1=30 HTTP/1.1\n\n");

    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
    assert_eq!(app.thresholds(), [40.0, 40.0]);

    let text = conn.response();
    let (head, body) = split(&text);
    assert!(head.contains(&format!("Content-Length: {}", body.len())));
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["threshold1"], 40.0);
    assert_eq!(json["shower1"], "vacant");
    for key in ["temp1", "temp2", "flow1", "flow2", "irdtct"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn page_applies_valid_thresholds_only() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();

    let mut conn = MockConnection::new(b"GET /?threshold1=30&threshold2=45.7 HTTP/1.1\n\n");
    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
    assert_eq!(app.thresholds(), [30.0, 45.0]);

    let mut conn = MockConnection::new(b"GET /?threshold1=99&threshold2=abc HTTP/1.1\n\n");
    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
    assert_eq!(app.thresholds(), [30.0, 45.0]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ThresholdRejected { shower: 0, .. })), 1);
}

#[test]
fn duplicate_threshold_uses_first_value() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"GET /?threshold2=20&threshold2=35 HTTP/1.1\n\n");
    serve(&mut conn, &mut app, &mut sink).unwrap();
    assert_eq!(app.thresholds(), [40.0, 20.0]);
}

#[test]
fn page_is_html_with_chart_and_controls() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"GET / HTTP/1.1\r\nHost: 192.168.4.1\r\n\r\n");

    serve(&mut conn, &mut app, &mut sink).unwrap();
    let text = conn.response();
    let (head, body) = split(&text);
    assert!(head.contains("Content-Type: text/html"));
    assert!(head.contains(&format!("Content-Length: {}", body.len())));
    assert!(body.contains("Sunday"));
    assert!(body.contains("Saturday"));
    assert!(body.contains("id=\"threshold1\""));
    assert!(body.contains("id=\"threshold2\""));
}

#[test]
fn any_method_is_dispatched_by_path() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"POST /status HTTP/1.1\n\n");
    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
}

#[test]
fn unknown_path_is_not_found() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"GET /favicon.ico HTTP/1.1\n\n");

    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(404)));
    let text = conn.response();
    assert!(text.starts_with("HTTP/1.1 404 Not Found\n"));
    assert_eq!(split(&text).1, "Not Found");
}

#[test]
fn empty_request_gets_no_response() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"");

    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::NoRequest));
    assert_eq!(conn.writes.get(), 0);
}

#[test]
fn malformed_request_line_is_a_parse_error() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"GET /status\n\n");

    assert_eq!(
        serve(&mut conn, &mut app, &mut sink),
        Err(Error::Parse(ParseError::MissingProtocol))
    );
    assert_eq!(conn.writes.get(), 0);
}

#[test]
fn receive_failure_is_reported() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"GET / HTTP/1.1\n\n");
    conn.fail_reads = true;

    assert_eq!(
        serve(&mut conn, &mut app, &mut sink),
        Err(Error::Io(IoFailure::Receive))
    );
}

#[test]
fn request_split_across_reads_is_reassembled() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn =
        MockConnection::new(b"GET /?threshold1=25 HTTP/1.1\nHost: x\n\n").with_read_chunk(16);

    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
    assert_eq!(app.thresholds()[0], 25.0);
}

#[test]
fn small_writes_still_deliver_the_whole_response() {
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(b"GET /status HTTP/1.1\n\n").with_write_chunk(20);

    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
    let text = conn.response();
    let (head, body) = split(&text);
    assert!(head.contains(&format!("Content-Length: {}", body.len())));
    assert!(body.ends_with('}'));
    assert!(conn.writes.get() > 2);
}

/// Header set a desktop browser sends with a page load.
const BROWSER_HEADERS: [&str; 17] = [
    "Host: 192.168.4.1",
    "Connection: keep-alive",
    "Cache-Control: max-age=0",
    "sec-ch-ua: \"Chromium\";v=\"124\", \"Not-A.Brand\";v=\"99\"",
    "sec-ch-ua-mobile: ?0",
    "sec-ch-ua-platform: \"Linux\"",
    "DNT: 1",
    "Upgrade-Insecure-Requests: 1",
    "User-Agent: Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
    "Accept: text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    "Sec-Fetch-Site: same-origin",
    "Sec-Fetch-Mode: navigate",
    "Sec-Fetch-User: ?1",
    "Sec-Fetch-Dest: document",
    "Referer: http://192.168.4.1/",
    "Accept-Encoding: gzip, deflate",
    "Accept-Language: en-US,en;q=0.9",
];

#[test]
fn browser_request_with_many_headers_is_served() {
    assert!(BROWSER_HEADERS.len() > MAX_HEADERS);
    let mut raw = String::from("GET /?threshold1=30&threshold2=35 HTTP/1.1\r\n");
    for header in BROWSER_HEADERS {
        raw.push_str(header);
        raw.push_str("\r\n");
    }
    raw.push_str("\r\n");
    assert!(raw.len() < REQUEST_BUF_LEN);

    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(raw.as_bytes());

    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
    assert_eq!(app.thresholds(), [30.0, 35.0]);
    assert!(conn.response().starts_with("HTTP/1.1 200 OK\n"));
}

#[test]
fn oversized_request_still_routes_on_its_request_line() {
    let mut raw = String::from("GET /?threshold1=33 HTTP/1.1\r\n");
    raw.push_str(&format!("X-Long: {}\r\n", "a".repeat(990)));
    raw.push_str("Accept-Language: en-US,en;q=0.9\r\n\r\n");
    assert!(raw.len() > REQUEST_BUF_LEN);

    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(raw.as_bytes());

    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
    assert_eq!(app.thresholds()[0], 33.0);
    let text = conn.response();
    let (head, body) = split(&text);
    assert!(head.contains("Content-Type: text/html"));
    assert!(head.contains(&format!("Content-Length: {}", body.len())));
}

#[test]
fn oversized_status_request_returns_json() {
    let mut raw = String::from("GET /status HTTP/1.1\r\n");
    raw.push_str(&format!("X-Long: {}\r\n", "b".repeat(990)));
    raw.push_str("Accept-Language: en-US,en;q=0.9\r\n\r\n");

    let mut app = AppService::new(SystemConfig::default());
    let mut sink = RecordingSink::new();
    let mut conn = MockConnection::new(raw.as_bytes()).with_read_chunk(300);

    assert_eq!(serve(&mut conn, &mut app, &mut sink), Ok(Outcome::Served(200)));
    assert!(conn.response().contains("application/json"));
}
