use std::collections::HashMap;

use http::Method;
use tracing::{debug, info, warn};

use crate::context::{callback, Callback, Context};
use crate::pattern::{PathPattern, PatternMatch};

/// A path template bound to an ordered sequence of callbacks.
///
/// The pattern is immutable after construction; the callback sequence only
/// grows, via repeat registrations of the same template.
pub struct Route {
    /// The template string the route was first registered under
    pub template: String,
    /// Compiled matcher for the template
    pub pattern: PathPattern,
    /// Callbacks to run for the route, in registration order
    pub callbacks: Vec<Callback>,
}

/// Ordered mapping from path template to [`Route`].
///
/// Insertion order defines match priority; the exact same template string is
/// required to coalesce into one route (no normalization).
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register callbacks for a path template.
    ///
    /// If the exact template string was registered before, the callbacks are
    /// appended to the existing route and run after the ones already there.
    /// Otherwise the template is compiled and a new route is added at the
    /// end of the priority order.
    pub fn register<I>(&mut self, template: &str, callbacks: I)
    where
        I: IntoIterator<Item = Callback>,
    {
        if let Some(&i) = self.index.get(template) {
            let route = &mut self.routes[i];
            let before = route.callbacks.len();
            route.callbacks.extend(callbacks);
            debug!(
                template = %template,
                appended = route.callbacks.len() - before,
                total = route.callbacks.len(),
                "Callbacks appended to existing route"
            );
        } else {
            let route = Route {
                template: template.to_string(),
                pattern: PathPattern::compile(template),
                callbacks: callbacks.into_iter().collect(),
            };
            info!(
                template = %template,
                callbacks = route.callbacks.len(),
                priority = self.routes.len(),
                "Route registered"
            );
            self.index.insert(template.to_string(), self.routes.len());
            self.routes.push(route);
        }
    }

    /// Register method-gated callbacks for a path template.
    ///
    /// Each callback is wrapped so it delegates to the chain's advance
    /// operation when the request method differs, and invokes the original
    /// callback otherwise. Verb-specific handlers are expressed this way on
    /// top of the single generic registration primitive; there is no
    /// per-verb route table.
    pub fn register_method<I>(&mut self, method: Method, template: &str, callbacks: I)
    where
        I: IntoIterator<Item = Callback>,
    {
        let wrapped: Vec<Callback> = callbacks
            .into_iter()
            .map(|cb| {
                let method = method.clone();
                callback(move |ctx: &mut Context| {
                    if ctx.raw_request.method == method {
                        cb(ctx)
                    } else {
                        ctx.next()
                    }
                })
            })
            .collect();
        self.register(template, wrapped);
    }

    /// Match a request path against the table in registration order.
    ///
    /// Returns the first matching route together with its extracted
    /// parameters, or `None` when nothing matches (results in the default
    /// empty response unless a catch-all route is registered).
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<(&Route, PatternMatch)> {
        debug!(path = %path, routes = self.routes.len(), "Route match attempt");
        let match_start = std::time::Instant::now();

        for route in &self.routes {
            if let Some(m) = route.pattern.matches(path) {
                info!(
                    path = %path,
                    template = %route.template,
                    params = ?m.params,
                    duration_us = match_start.elapsed().as_micros(),
                    "Route matched"
                );
                return Some((route, m));
            }
        }

        warn!(
            path = %path,
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Print all registered routes to stdout, in priority order.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!(
                "[route] {} callbacks={}",
                route.template,
                route.callbacks.len()
            );
        }
    }
}
