//! Fuzz target: `request::parse`
//!
//! Drives arbitrary byte sequences through the request parser and checks
//! that every borrowed field lies inside the input and that query and
//! header lists stay within their fixed capacities.
//!
//! cargo fuzz run fuzz_request_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use showerctl::http::request::{self, MAX_HEADERS, MAX_QUERY_PARAMS};
use showerctl::http::router::parse_threshold;

fuzz_target!(|data: &[u8]| {
    let Ok(Some(req)) = request::parse(data) else {
        return;
    };

    let range = data.as_ptr_range();
    let inside = |s: &str| s.is_empty() || range.contains(&s.as_ptr());
    assert!(inside(req.method) && inside(req.path) && inside(req.protocol));
    assert!(inside(req.body));
    assert!(req.query.len() <= MAX_QUERY_PARAMS);
    assert!(req.headers.len() <= MAX_HEADERS);

    for (_, value) in &req.query {
        if let Some(t) = parse_threshold(value) {
            assert!(t.is_finite() && t.fract() == 0.0);
        }
    }
});
