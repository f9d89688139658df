//! # Server Module
//!
//! Thin transport adapter over `may_minihttp`: accepts connections, turns
//! each wire request into an [`crate::HttpRequest`], hands it to
//! [`crate::App::handle`], and writes the completed response back.
//!
//! The core's only obligation to this layer is: given a request, eventually
//! produce a response object. Everything socket-shaped (accept loop,
//! keep-alive, coroutine scheduling) belongs here, not in the dispatcher.
//! Concurrent requests each run their own chain on their own coroutine;
//! timeouts around hung callbacks are this layer's business to wire if an
//! application needs them.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_query_params, parse_request};
pub use service::AppService;
