use may_minihttp::Response;

use crate::context::{default_reason, Payload};
use crate::dispatcher::HttpResponse;

/// Write a completed dispatch response to the wire.
///
/// Header values are dynamic, so they are leaked into `'static` strings for
/// `may_minihttp`'s header API; the custom reason phrase is leaked only
/// when it differs from the canonical one. A `Content-Type` default is
/// supplied for text and JSON payload bodies when no middleware set one.
pub fn write_response(res: &mut Response, response: HttpResponse) {
    let HttpResponse {
        status,
        reason,
        headers,
        body,
    } = response;

    let canonical = default_reason(status);
    if reason == canonical {
        res.status_code(status as usize, canonical);
    } else {
        res.status_code(status as usize, Box::leak(reason.into_boxed_str()));
    }

    let has_content_type = headers
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case("content-type"));
    for (k, v) in headers {
        res.header(Box::leak(format!("{k}: {v}").into_boxed_str()));
    }
    if !has_content_type {
        match &body {
            Payload::Json(_) => {
                res.header("Content-Type: application/json");
            }
            Payload::Text(_) => {
                res.header("Content-Type: text/plain");
            }
            _ => {}
        }
    }

    res.body_vec(body.into_bytes());
}

/// Write the generic per-request failure response: the chain raised and the
/// in-flight response was abandoned.
pub fn write_server_error(res: &mut Response) {
    res.status_code(500, "Internal Server Error");
    res.header("Content-Type: text/plain");
    res.body_vec(b"500 Internal Server Error".to_vec());
}
