//! # Router Module
//!
//! Ordered route table mapping path templates to callback chains.
//!
//! ## Overview
//!
//! The route table is responsible for:
//! - Compiling path templates (`/threads/:thread_id`, `/files/*`) at
//!   registration time
//! - Coalescing repeat registrations of the exact same template string into
//!   one route, appending callbacks
//! - Matching incoming request paths in registration order, first match wins
//!
//! ## Ordering
//!
//! Insertion order is the match-priority order. Only the first matching
//! route's chain ever runs; there is no fallthrough to a later route even
//! when the first chain short-circuits. Catch-all behavior is expressed by
//! registering a `"*"` template last, not by any dispatcher-level default.
//!
//! Registration is expected to finish before traffic starts; the table is
//! never mutated during dispatch of an in-flight request.

mod core;

pub use core::{Route, RouteTable};
