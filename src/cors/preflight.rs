//! CORS preflight responder.
//!
//! Preflight must be answered by this server directly, so this module never
//! contacts an upstream and never awaits. The response is synthesized from
//! the request headers alone.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response};

use crate::cors::OriginAllowList;

/// Methods this relay forwards; advertised verbatim on preflight responses.
pub const ALLOWED_METHODS: &str = "GET,HEAD,POST,OPTIONS";

/// How long browsers may cache a preflight result, in seconds (one day).
pub const MAX_AGE_SECS: &str = "86400";

/// `Allow` header value for plain (non-CORS) OPTIONS probes.
pub const ALLOW_PROBE: &str = "GET, HEAD, POST, OPTIONS";

/// Answer an OPTIONS request.
///
/// A request carrying all three of `Origin`, `Access-Control-Request-Method`
/// and `Access-Control-Request-Headers` is a true preflight: it gets the
/// CORS grant headers, with `Access-Control-Allow-Headers` echoing the
/// requested header list byte-for-byte. Anything else is treated as a plain
/// OPTIONS probe and answered with `Allow`.
///
/// Both branches return 200 with an empty body.
pub fn respond(request_headers: &HeaderMap, allow_list: &OriginAllowList) -> Response<Body> {
    let origin = request_headers.get(header::ORIGIN);
    let requested_method = request_headers.get(header::ACCESS_CONTROL_REQUEST_METHOD);
    let requested_headers = request_headers.get(header::ACCESS_CONTROL_REQUEST_HEADERS);

    let mut response = Response::new(Body::empty());
    let headers = response.headers_mut();

    match (origin, requested_method, requested_headers) {
        (Some(origin), Some(_), Some(requested_headers)) => {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static(MAX_AGE_SECS),
            );
            // Full echo: any header the client says it wants to send is
            // pre-approved.
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                requested_headers.clone(),
            );

            // The grant header on this branch is literally named `Origin`,
            // not `Access-Control-Allow-Origin`. Intentional; see DESIGN.md.
            let allowed = origin
                .to_str()
                .map(|value| allow_list.contains(value))
                .unwrap_or(false);
            if allowed {
                headers.insert(header::ORIGIN, origin.clone());
            }
        }
        _ => {
            headers.insert(header::ALLOW, HeaderValue::from_static(ALLOW_PROBE));
        }
    }

    response
}
