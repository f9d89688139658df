use anyhow::{anyhow, Context as _};

use super::multipart;
use crate::context::{callback, Callback, Context, Payload};

/// JSON body middleware.
///
/// Decodes the request body as JSON into the context payload, marks the
/// response as JSON, advances, and once the rest of the chain has finished
/// serializes whatever downstream callbacks left in `response.body` to its
/// JSON text form. Malformed JSON is fatal for the request; the transport
/// answers with a generic server error.
///
/// ```
/// use portico::{callback, middleware::json, App, Payload};
///
/// let mut app = App::new();
/// app.post(
///     "/comments",
///     [json(), callback(|ctx| {
///         ctx.response.body = Payload::Json(serde_json::json!({ "message": "success" }));
///         Ok(())
///     })],
/// );
/// ```
pub fn json() -> Callback {
    callback(|ctx: &mut Context| {
        let bytes = ctx.raw_request.take_body();
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).context("malformed JSON request body")?;
        ctx.body = Payload::Json(value);
        ctx.response
            .set_header("Content-Type", "application/json; charset=utf-8");
        ctx.next()?;
        ctx.response.body = Payload::Text(ctx.response.body.to_json_string());
        Ok(())
    })
}

/// `application/x-www-form-urlencoded` body middleware.
///
/// The context payload becomes [`Payload::Form`] with the decoded pairs in
/// order, then the chain advances.
pub fn form_urlencoded() -> Callback {
    callback(|ctx: &mut Context| {
        let bytes = ctx.raw_request.take_body();
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(&bytes)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        ctx.body = Payload::Form(pairs);
        ctx.next()
    })
}

/// `multipart/form-data` body middleware.
///
/// The context payload becomes [`Payload::Multipart`] with the decoded
/// field collection, then the chain advances. A missing or malformed
/// boundary is fatal for the request.
pub fn form_data() -> Callback {
    callback(|ctx: &mut Context| {
        let boundary = ctx
            .raw_request
            .header("Content-Type")
            .and_then(multipart::boundary)
            .ok_or_else(|| anyhow!("multipart body without a boundary parameter"))?;
        let bytes = ctx.raw_request.take_body();
        ctx.body = Payload::Multipart(multipart::parse(&bytes, &boundary)?);
        ctx.next()
    })
}
