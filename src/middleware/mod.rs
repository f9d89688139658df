//! # Middleware Module
//!
//! Small, independent callbacks built on the context contract: each either
//! short-circuits with an error-status response or delegates onward with
//! `ctx.next()`.
//!
//! - [`authentication_check`]: 401/403 gate on the `Authorization` header
//! - [`not_found`]: 404 catch-all, register under `"*"` last
//! - [`method_not_allowed`]: 405 with an `Allow` header
//! - [`payload_too_large`]: 411/413 gate on `Content-Length`
//! - [`unsupported_media_type`]: 415 gate on `Content-Type`
//! - [`json`], [`form_urlencoded`], [`form_data`]: body decoders that
//!   attach a [`crate::Payload`] for downstream callbacks

mod auth;
mod body;
mod errors;
pub mod multipart;

pub use auth::authentication_check;
pub use body::{form_data, form_urlencoded, json};
pub use errors::{method_not_allowed, not_found, payload_too_large, unsupported_media_type};
