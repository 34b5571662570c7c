//! Forwarding handler.
//!
//! Proxies one request to the upstream named by the `url` query parameter
//! and rewrites the response headers for CORS. The body is streamed through
//! in both directions and never inspected or buffered.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, Response};
use url::Url;

use crate::cors::OriginAllowList;
use crate::http::error::RelayError;
use crate::http::server::AppState;

/// Headers not copied onto the outbound request: the target authority
/// changes and the outbound transport frames the message itself.
const STRIPPED_REQUEST_HEADERS: [HeaderName; 4] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
];

/// Hop-by-hop headers not copied from the upstream response; our own
/// transport re-frames the body.
const STRIPPED_RESPONSE_HEADERS: [HeaderName; 2] = [header::CONNECTION, header::TRANSFER_ENCODING];

/// Extract the target URL from the raw query string.
///
/// Returns `None` when the `url` parameter is absent or empty. The value is
/// percent-decoded but otherwise unvalidated; the fetch attempt is the only
/// validation.
pub fn target_url(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `scheme://host[:port]` of the target, with default ports elided.
///
/// Sent as the outbound `Origin` header so the upstream does not see a
/// cross-site-looking request.
pub fn upstream_origin(target: &Url) -> String {
    target.origin().ascii_serialization()
}

/// Apply the CORS response rewrite.
///
/// An allow-listed caller origin is granted `Access-Control-Allow-Origin`;
/// anything else gets no grant but the response still flows back. `Origin`
/// is appended to `Vary` either way so shared caches key on it.
pub fn apply_cors_headers(
    headers: &mut HeaderMap,
    caller_origin: Option<&HeaderValue>,
    allow_list: &OriginAllowList,
) {
    if let Some(origin) = caller_origin {
        let allowed = origin
            .to_str()
            .map(|value| allow_list.contains(value))
            .unwrap_or(false);
        if allowed {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        }
    }
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

/// Forward one GET/HEAD/POST request to its target and return the rewritten
/// upstream response.
pub async fn forward(
    state: &AppState,
    request: Request<Body>,
) -> Result<Response<Body>, RelayError> {
    let target = target_url(request.uri().query()).ok_or(RelayError::MissingTargetUrl)?;
    let target = Url::parse(&target)?;

    let caller_origin = request.headers().get(header::ORIGIN).cloned();
    let (parts, body) = request.into_parts();

    let mut outbound_headers = parts.headers;
    for name in &STRIPPED_REQUEST_HEADERS {
        outbound_headers.remove(name);
    }
    if let Ok(value) = HeaderValue::from_str(&upstream_origin(&target)) {
        outbound_headers.insert(header::ORIGIN, value);
    }

    tracing::debug!(
        method = %parts.method,
        target = %target,
        "Forwarding request"
    );

    let mut outbound = state
        .client
        .request(parts.method.clone(), target)
        .headers(outbound_headers);
    // Only POST carries a body on this surface; stream it through untouched.
    if parts.method == Method::POST {
        outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    let upstream = outbound.send().await?;

    // Copy status and headers, stream the body, then amend the copy. The
    // upstream status passes through verbatim, error statuses included.
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    for name in &STRIPPED_RESPONSE_HEADERS {
        headers.remove(name);
    }
    apply_cors_headers(&mut headers, caller_origin.as_ref(), &state.allow_list);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
