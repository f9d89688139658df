//! # Dispatcher Module
//!
//! The application object: registration surface plus per-request dispatch.
//!
//! ## Overview
//!
//! [`App`] owns the route table and drives one request at a time to a final
//! response:
//!
//! 1. Scan the route table in registration order; first match wins.
//! 2. Construct a [`crate::context::Context`] bound to the matched route and
//!    invoke the chain's advance operation once to start the chain.
//! 3. When the outermost advance call returns, materialize the final
//!    response from whatever the chain accumulated.
//!
//! No route matching a request is not an error: the dispatch produces the
//! default empty response and no middleware runs. Applications wanting a
//! fallback register a `"*"` catch-all route as ordinary middleware.
//!
//! ## Example
//!
//! ```
//! use portico::{callback, App, HttpRequest, Payload};
//! use http::Method;
//!
//! let mut app = App::new();
//! app.get(
//!     "/threads/:thread_id",
//!     [callback(|ctx| {
//!         let id = ctx.match_result.param("thread_id").unwrap_or("").to_string();
//!         ctx.response.body = Payload::Text(id);
//!         Ok(())
//!     })],
//! );
//!
//! let res = app.handle(HttpRequest::new(Method::GET, "/threads/7")).unwrap();
//! assert_eq!(res.status, 200);
//! ```
//!
//! ## Error Handling
//!
//! Failures are expressed as HTTP response states produced by middleware,
//! not as errors crossing the dispatch boundary. A callback `Err` is the
//! one exception: it is fatal per-request, propagates out of
//! [`App::handle`], and the transport layer answers with a generic server
//! error.

mod core;

pub use core::{App, HttpRequest, HttpResponse};
