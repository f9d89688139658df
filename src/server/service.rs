use std::io;
use std::sync::Arc;

use may_minihttp::{HttpService, Request, Response};
use tracing::error;

use super::request::parse_request;
use super::response::{write_response, write_server_error};
use crate::dispatcher::App;

/// `HttpService` adapter: one [`App`] shared across connection coroutines.
///
/// Registration must be finished before the service is started; the route
/// table is read-only from here on.
#[derive(Clone)]
pub struct AppService {
    app: Arc<App>,
}

impl AppService {
    #[must_use]
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let request = parse_request(req);
        match self.app.handle(request) {
            Ok(response) => write_response(res, response),
            Err(err) => {
                // A callback raised: per-request fatal, answer generically.
                error!(error = %err, "callback chain failed");
                write_server_error(res);
            }
        }
        Ok(())
    }
}
