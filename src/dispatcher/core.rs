use std::collections::HashMap;

use anyhow::Result;
use http::Method;
use tracing::info;

use crate::context::{Callback, Context, HeaderVec, Payload};
use crate::router::RouteTable;

/// The inbound HTTP request handed to a dispatch.
///
/// Header names are stored lowercase; the body is readable once. The
/// transport adapter builds these from the wire, and tests build them
/// directly with the constructor and builder methods.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query_params: HashMap<String, String>,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_params: HashMap::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Assemble a request from already-parsed parts (transport adapter).
    #[must_use]
    pub fn from_parts(
        method: Method,
        path: String,
        query_params: HashMap<String, String>,
        headers: HashMap<String, String>,
        body: Option<Vec<u8>>,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            method,
            path,
            query_params,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a header (name lowercased on insert).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Get a header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Consume the request body. The body is a readable-once stream from
    /// the core's perspective; a second take yields an empty body.
    pub fn take_body(&mut self) -> Vec<u8> {
        self.body.take().unwrap_or_default()
    }
}

/// The outbound HTTP response produced by a dispatch.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: HeaderVec,
    pub body: Payload,
}

impl HttpResponse {
    /// The default empty response: produced when no route matches and no
    /// middleware ran.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            status: 200,
            reason: String::from("OK"),
            headers: HeaderVec::new(),
            body: Payload::None,
        }
    }

    /// Get a response header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Route registration surface plus per-request dispatch.
#[derive(Default)]
pub struct App {
    routes: RouteTable,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Register callbacks for a path template, regardless of method.
    pub fn route<I>(&mut self, template: &str, callbacks: I)
    where
        I: IntoIterator<Item = Callback>,
    {
        self.routes.register(template, callbacks);
    }

    /// Register method-gated callbacks for a path template.
    pub fn method<I>(&mut self, method: Method, template: &str, callbacks: I)
    where
        I: IntoIterator<Item = Callback>,
    {
        self.routes.register_method(method, template, callbacks);
    }

    /// Dispatch one request to a final response.
    ///
    /// Routes are tried in the exact order they were first registered and
    /// only the first matching route's chain runs, even if that chain never
    /// advances. A callback error aborts the in-flight response and
    /// propagates to the caller.
    pub fn handle(&self, request: HttpRequest) -> Result<HttpResponse> {
        let Some((route, match_result)) = self.routes.lookup(&request.path) else {
            return Ok(HttpResponse::empty());
        };

        let mut ctx = Context::new(request, match_result, route.callbacks.clone());
        ctx.next()?;

        info!(
            template = %route.template,
            callbacks_run = ctx.position(),
            status = ctx.response.status.unwrap_or(200),
            "Chain completed"
        );
        Ok(ctx.into_response())
    }
}

macro_rules! verb_methods {
    ($(($fn_name:ident, $method:ident)),* $(,)?) => {
        impl App {
            $(
                #[doc = concat!("Register `", stringify!($method), "` callbacks for a path template.")]
                pub fn $fn_name<I>(&mut self, template: &str, callbacks: I)
                where
                    I: IntoIterator<Item = Callback>,
                {
                    self.method(Method::$method, template, callbacks);
                }
            )*
        }
    };
}

verb_methods!(
    (get, GET),
    (head, HEAD),
    (post, POST),
    (put, PUT),
    (delete, DELETE),
    (connect, CONNECT),
    (options, OPTIONS),
    (trace, TRACE),
    (patch, PATCH),
);
