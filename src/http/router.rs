//! Path dispatch.
//!
//! | Path      | Effect                                   | Body        |
//! |-----------|------------------------------------------|-------------|
//! | `/`       | apply `threshold1`/`threshold2` if given | status page |
//! | `/status` | none                                     | JSON record |
//! | other     | none                                     | 404         |
//!
//! Dispatch is by path only; the method is not inspected.

use log::debug;

use crate::app::commands::AppCommand;
use crate::app::ports::{EventSink, Renderer};
use crate::app::service::AppService;
use crate::config::SHOWER_COUNT;

use super::request::Request;
use super::response::Response;

/// Query keys carrying each shower's threshold, by shower index.
pub const THRESHOLD_PARAMS: [&str; SHOWER_COUNT] = ["threshold1", "threshold2"];

/// Produce the response for `req`, applying any threshold updates first.
pub fn route(
    req: &Request<'_>,
    app: &mut AppService,
    renderer: &impl Renderer,
    sink: &mut impl EventSink,
) -> Response {
    match req.path {
        "/" => {
            apply_thresholds(req, app, sink);
            Response::html(renderer.render(&app.page_model()))
        }
        "/status" => {
            let body = serde_json::to_string(&app.status()).unwrap_or_else(|_| String::from("{}"));
            Response::json(body)
        }
        other => {
            debug!("no route for {} {}", req.method, other);
            Response::not_found()
        }
    }
}

fn apply_thresholds(req: &Request<'_>, app: &mut AppService, sink: &mut impl EventSink) {
    for (shower, key) in THRESHOLD_PARAMS.iter().enumerate() {
        let Some(raw) = req.query_param(key) else {
            continue;
        };
        match parse_threshold(raw) {
            Some(celsius) => {
                app.handle_command(AppCommand::SetThreshold { shower, celsius }, sink);
            }
            None => debug!("ignoring non-numeric {}={:?}", key, raw),
        }
    }
}

/// Decimal text to a whole-degree threshold.  `None` if not a finite number.
pub fn parse_threshold(raw: &str) -> Option<f32> {
    let value: f32 = raw.trim().parse().ok()?;
    value.is_finite().then(|| value.trunc())
}
