//! Per-request context threaded through a route's callback chain.
//!
//! A [`Context`] is created when the dispatcher matches a request to a
//! route and is exclusively owned by that one in-flight dispatch. Callbacks
//! receive it mutably, may populate the response-in-progress, and decide
//! whether to hand control onward with [`Context::next`]. A callback that
//! returns without advancing halts the chain; everything it wrote to the
//! response stands as the final answer.

use std::sync::Arc;

use anyhow::Result;
use http::StatusCode;
use serde_json::Value;
use smallvec::SmallVec;

use crate::dispatcher::{HttpRequest, HttpResponse};
use crate::pattern::PatternMatch;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path.
pub type HeaderVec = SmallVec<[(String, String); MAX_INLINE_HEADERS]>;

/// A unit of request-handling logic.
///
/// Callbacks run strictly sequentially, one in-flight per context. An `Err`
/// return is fatal for the request: it propagates out of the dispatch and
/// the transport answers with a generic server error.
pub type Callback = Arc<dyn Fn(&mut Context) -> Result<()> + Send + Sync>;

/// Wrap a closure as a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&mut Context) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A decoded request or response payload.
///
/// `Payload::None` is the explicit "nothing decoded yet" state. Body-parsing
/// middleware replaces it with the decoded variant for downstream callbacks;
/// response bodies must end the chain as something the transport can
/// serialize (see [`Payload::into_bytes`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    None,
    Bytes(Vec<u8>),
    Text(String),
    Json(Value),
    /// Form-encoded key/value pairs, in decoded order
    Form(Vec<(String, String)>),
    /// Fields of a `multipart/form-data` body
    Multipart(Vec<FormField>),
}

/// One field of a decoded `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl FormField {
    /// The field data as UTF-8 text, if it is valid UTF-8.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

impl Payload {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }

    /// Coerce the payload to transport bytes.
    ///
    /// `None` becomes an empty body, JSON values are serialized compactly,
    /// form pairs re-encode as `application/x-www-form-urlencoded`, and
    /// multipart fields flatten to their concatenated data.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::None => Vec::new(),
            Payload::Bytes(b) => b,
            Payload::Text(s) => s.into_bytes(),
            Payload::Json(v) => serde_json::to_vec(&v).unwrap_or_default(),
            Payload::Form(pairs) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish()
                .into_bytes(),
            Payload::Multipart(fields) => {
                let mut out = Vec::new();
                for f in fields {
                    out.extend_from_slice(&f.data);
                }
                out
            }
        }
    }

    /// Serialize the payload to its JSON text form.
    ///
    /// Text becomes a quoted JSON string, form pairs become an object, and
    /// an absent payload becomes `null`.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        match self {
            Payload::None => String::from("null"),
            Payload::Bytes(b) => Value::String(String::from_utf8_lossy(b).into_owned()).to_string(),
            Payload::Text(s) => Value::String(s.clone()).to_string(),
            Payload::Json(v) => v.to_string(),
            Payload::Form(pairs) => {
                let map: serde_json::Map<String, Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                Value::Object(map).to_string()
            }
            Payload::Multipart(fields) => {
                let map: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|f| {
                        (
                            f.name.clone(),
                            Value::String(String::from_utf8_lossy(&f.data).into_owned()),
                        )
                    })
                    .collect();
                Value::Object(map).to_string()
            }
        }
    }
}

/// The response-in-progress accumulated by a chain.
///
/// `status` left unset means the transport default (200). `status_text`
/// left unset derives the canonical reason phrase from the status.
#[derive(Debug, Clone, Default)]
pub struct ResponseState {
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub body: Payload,
    headers: HeaderVec,
}

impl ResponseState {
    /// Set a header, replacing any existing value (name compared
    /// case-insensitively per RFC 7230).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            slot.1 = value;
        } else {
            self.headers.push((name.to_string(), value));
        }
    }

    /// Get a header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }
}

/// Explicit chain state: the matched route's callbacks and a position
/// cursor, advanced exactly once per [`Context::next`] call.
#[derive(Clone)]
struct Chain {
    callbacks: Vec<Callback>,
    position: usize,
}

/// Per-request state threaded through a route's callback chain.
pub struct Context {
    /// The inbound request. Middleware may read headers freely and take the
    /// body once for decoding.
    pub raw_request: HttpRequest,
    /// Decoded request payload, populated by body-parsing middleware.
    pub body: Payload,
    /// The response-in-progress.
    pub response: ResponseState,
    /// Named parameter bindings and wildcard capture from the route match.
    pub match_result: PatternMatch,
    chain: Chain,
}

impl Context {
    /// Bind a context to a matched route's callbacks.
    #[must_use]
    pub fn new(raw_request: HttpRequest, match_result: PatternMatch, callbacks: Vec<Callback>) -> Self {
        Self {
            raw_request,
            body: Payload::None,
            response: ResponseState::default(),
            match_result,
            chain: Chain {
                callbacks,
                position: 0,
            },
        }
    }

    /// Invoke the next callback in the chain.
    ///
    /// Looks up the callback at the current position, advances the cursor,
    /// and invokes the callback with this context. Past the end of the
    /// chain this is a harmless no-op, so defensive extra calls after the
    /// chain has finished are fine. A callback that wants downstream
    /// post-processing runs code, calls `next()?`, then runs more code once
    /// everything downstream has completed.
    pub fn next(&mut self) -> Result<()> {
        let position = self.chain.position;
        self.chain.position += 1;
        match self.chain.callbacks.get(position).cloned() {
            Some(cb) => cb(self),
            None => Ok(()),
        }
    }

    /// Number of callbacks already started.
    #[must_use]
    pub fn position(&self) -> usize {
        self.chain.position
    }

    /// Materialize the final transport response from the accumulated state.
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        let status = self.response.status.unwrap_or(200);
        let reason = self
            .response
            .status_text
            .unwrap_or_else(|| default_reason(status).to_string());
        HttpResponse {
            status,
            reason,
            headers: self.response.headers,
            body: self.response.body,
        }
    }
}

/// Canonical reason phrase for a status code, `"OK"` when unknown.
#[must_use]
pub fn default_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_json_text_forms() {
        assert_eq!(Payload::None.to_json_string(), "null");
        assert_eq!(Payload::Text("hi".into()).to_json_string(), "\"hi\"");
        assert_eq!(
            Payload::Json(serde_json::json!({"a": 1})).to_json_string(),
            "{\"a\":1}"
        );
    }

    #[test]
    fn form_payload_reencodes() {
        let p = Payload::Form(vec![("a".into(), "1".into()), ("b".into(), "x y".into())]);
        assert_eq!(String::from_utf8(p.into_bytes()).unwrap(), "a=1&b=x+y");
    }

    #[test]
    fn response_header_set_is_case_insensitive() {
        let mut r = ResponseState::default();
        r.set_header("Content-Type", "text/plain");
        r.set_header("content-type", "application/json");
        assert_eq!(r.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(r.headers().len(), 1);
    }

    #[test]
    fn default_reasons() {
        assert_eq!(default_reason(200), "OK");
        assert_eq!(default_reason(404), "Not Found");
        assert_eq!(default_reason(599), "OK");
    }
}
