use http::{Method, StatusCode};

use crate::context::{callback, Callback, Context, Payload};

/// Set the response to a bare `<status> <reason>` body, the shared shape of
/// every error-status middleware here.
pub(super) fn respond_status(ctx: &mut Context, status: StatusCode) {
    let reason = status.canonical_reason().unwrap_or("");
    ctx.response.status = Some(status.as_u16());
    ctx.response.status_text = Some(reason.to_string());
    ctx.response.body = Payload::Text(format!("{} {}", status.as_u16(), reason));
}

/// `404 Not Found`, then advance.
///
/// Intended as a catch-all, registered under the `"*"` template after every
/// real route. Advancing lets later middleware on the same route (logging,
/// say) still run.
///
/// ```
/// use portico::{middleware::not_found, App};
///
/// let mut app = App::new();
/// // real routes first ...
/// app.route("*", [not_found()]);
/// ```
pub fn not_found() -> Callback {
    callback(|ctx: &mut Context| {
        respond_status(ctx, StatusCode::NOT_FOUND);
        ctx.next()
    })
}

/// `405 Method Not Allowed` with an `Allow` header, then advance.
///
/// Intended behind method gates: register it un-gated on a template after
/// the verb-specific handlers, so it answers for every verb the gates let
/// through.
///
/// ```
/// use portico::{callback, middleware::method_not_allowed, App};
/// use http::Method;
///
/// let mut app = App::new();
/// app.get("/books", [callback(|_ctx| Ok(()))]);
/// app.route("/books", [method_not_allowed(&[Method::GET])]);
/// ```
pub fn method_not_allowed(methods: &[Method]) -> Callback {
    let allow = methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    callback(move |ctx: &mut Context| {
        respond_status(ctx, StatusCode::METHOD_NOT_ALLOWED);
        ctx.response.set_header("Allow", allow.clone());
        ctx.next()
    })
}

/// Gate the chain on `Content-Length`.
///
/// An absent header answers `411 Length Required`; a declared length over
/// `limit` answers `413 Payload Too Large`, with an optional `Retry-After`
/// hint (seconds) on the response. Both halt the chain. An unparseable
/// declared length advances.
pub fn payload_too_large(limit: u64, retry_after: Option<u64>) -> Callback {
    callback(move |ctx: &mut Context| {
        match ctx.raw_request.header("Content-Length") {
            None => {
                respond_status(ctx, StatusCode::LENGTH_REQUIRED);
                Ok(())
            }
            Some(v) => match v.parse::<u64>() {
                Ok(length) if length > limit => {
                    respond_status(ctx, StatusCode::PAYLOAD_TOO_LARGE);
                    if let Some(secs) = retry_after {
                        ctx.response.set_header("Retry-After", secs.to_string());
                    }
                    Ok(())
                }
                _ => ctx.next(),
            },
        }
    })
}

/// Gate the chain on `Content-Type`.
///
/// Matching policy: an allowed type admits the request when it is a prefix
/// of the observed header value, so `application/json` admits
/// `application/json; charset=utf-8`. An absent or unmatched `Content-Type`
/// answers `415 Unsupported Media Type` and halts.
pub fn unsupported_media_type(types: &[&str]) -> Callback {
    let types: Vec<String> = types.iter().map(|t| t.to_string()).collect();
    callback(move |ctx: &mut Context| {
        let allowed = ctx
            .raw_request
            .header("Content-Type")
            .map(|observed| types.iter().any(|t| observed.starts_with(t.as_str())))
            .unwrap_or(false);
        if allowed {
            ctx.next()
        } else {
            respond_status(ctx, StatusCode::UNSUPPORTED_MEDIA_TYPE);
            Ok(())
        }
    })
}
