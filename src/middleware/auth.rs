use anyhow::Result;
use http::StatusCode;
use tracing::debug;

use super::errors::respond_status;
use crate::context::{callback, Callback, Context};

/// Gate the chain on the `Authorization` header.
///
/// A missing header answers `401 Unauthorized`; a header the `verify`
/// function rejects answers `403 Forbidden`; both halt the chain. On
/// success the chain advances. A `verify` error (an unreachable verifier,
/// say) is fatal for the request.
///
/// ```
/// use portico::{middleware::authentication_check, App};
///
/// let mut app = App::new();
/// app.route("/admin/*", [authentication_check(|token| Ok(token == "Bearer secret"))]);
/// ```
pub fn authentication_check<F>(verify: F) -> Callback
where
    F: Fn(&str) -> Result<bool> + Send + Sync + 'static,
{
    callback(move |ctx: &mut Context| {
        let Some(authorization) = ctx.raw_request.header("Authorization").map(str::to_string)
        else {
            respond_status(ctx, StatusCode::UNAUTHORIZED);
            return Ok(());
        };
        if verify(&authorization)? {
            ctx.next()
        } else {
            debug!(path = %ctx.raw_request.path, "Authorization rejected");
            respond_status(ctx, StatusCode::FORBIDDEN);
            Ok(())
        }
    })
}
