//! # Portico
//!
//! **Portico** is a minimal middleware-chaining HTTP router for Rust,
//! running on the `may` coroutine runtime with `may_minihttp` as the
//! transport.
//!
//! ## Overview
//!
//! An application is an ordered table of routes. Each route binds a path
//! template (`/threads/:thread_id`, `/files/*`, or the catch-all `"*"`) to
//! an ordered chain of callbacks. Dispatch scans the table in registration
//! order, the first matching route wins, and its callbacks run strictly
//! sequentially, threading one mutable [`Context`] through the chain. A
//! callback either short-circuits (returns without advancing) or hands
//! control onward with [`Context::next`]; code after the `next()` call runs
//! once everything downstream has completed, which is how post-processing
//! middleware like [`middleware::json`] serializes the response body.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Path template compilation and matching
//! - **[`router`]** - Ordered route table with first-match-wins lookup
//! - **[`context`]** - Per-request state and the chain-advance operation
//! - **[`dispatcher`]** - The [`App`]: registration surface and dispatch
//! - **[`middleware`]** - Auth gate, error responses, and body parsers
//! - **[`server`]** - `may_minihttp` transport adapter
//!
//! ## Example
//!
//! ```no_run
//! use portico::{callback, middleware, App, Payload};
//! use portico::server::{AppService, HttpServer};
//!
//! let mut app = App::new();
//! app.post(
//!     "/comments",
//!     [middleware::json(), callback(|ctx| {
//!         ctx.response.body = Payload::Json(serde_json::json!({ "message": "success" }));
//!         Ok(())
//!     })],
//! );
//! app.route("*", [middleware::not_found()]);
//!
//! let handle = HttpServer(AppService::new(app)).start("127.0.0.1:8080").unwrap();
//! handle.join().unwrap();
//! ```

pub mod context;
pub mod dispatcher;
pub mod middleware;
pub mod pattern;
pub mod router;
pub mod server;

pub use context::{callback, Callback, Context, FormField, HeaderVec, Payload, ResponseState};
pub use dispatcher::{App, HttpRequest, HttpResponse};
pub use pattern::{ParamVec, PathPattern, PatternMatch};
pub use router::{Route, RouteTable};
