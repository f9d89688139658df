use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use http::Method;
use portico::{callback, App, HttpRequest, Payload};

mod tracing_util;
use tracing_util::TestTracing;

fn flag() -> (Arc<AtomicBool>, Arc<AtomicBool>) {
    (Arc::new(AtomicBool::new(false)), Arc::new(AtomicBool::new(false)))
}

#[test]
fn first_registered_route_wins_on_overlap() {
    let _tracing = TestTracing::init();
    let (hit_first, hit_second) = flag();

    let mut app = App::new();
    let f = hit_first.clone();
    app.route(
        "/items/:id",
        [callback(move |ctx| {
            f.store(true, Ordering::SeqCst);
            ctx.response.body = Payload::Text("specific".into());
            Ok(())
        })],
    );
    let s = hit_second.clone();
    app.route(
        "*",
        [callback(move |ctx| {
            s.store(true, Ordering::SeqCst);
            ctx.response.body = Payload::Text("fallback".into());
            Ok(())
        })],
    );

    let res = app
        .handle(HttpRequest::new(Method::GET, "/items/7"))
        .unwrap();
    assert_eq!(res.body, Payload::Text("specific".into()));
    assert!(hit_first.load(Ordering::SeqCst));
    assert!(!hit_second.load(Ordering::SeqCst));
}

#[test]
fn no_fallthrough_even_when_first_chain_never_advances() {
    let _tracing = TestTracing::init();
    let (hit_first, hit_second) = flag();

    let mut app = App::new();
    let f = hit_first.clone();
    // registered first, matches everything, never calls next
    app.route(
        "*",
        [callback(move |_ctx| {
            f.store(true, Ordering::SeqCst);
            Ok(())
        })],
    );
    let s = hit_second.clone();
    app.route(
        "/x",
        [callback(move |_ctx| {
            s.store(true, Ordering::SeqCst);
            Ok(())
        })],
    );

    let _res = app.handle(HttpRequest::new(Method::GET, "/x")).unwrap();
    assert!(hit_first.load(Ordering::SeqCst));
    assert!(!hit_second.load(Ordering::SeqCst));
}

#[test]
fn same_template_appends_to_one_route() {
    let _tracing = TestTracing::init();
    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let mut app = App::new();
    let o = order.clone();
    app.route(
        "/x",
        [callback(move |ctx| {
            o.lock().unwrap().push("a");
            ctx.next()
        })],
    );
    let o = order.clone();
    app.route(
        "/x",
        [callback(move |_ctx| {
            o.lock().unwrap().push("b");
            Ok(())
        })],
    );

    assert_eq!(app.routes().len(), 1);
    let _res = app.handle(HttpRequest::new(Method::GET, "/x")).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
}

#[test]
fn named_params_reach_the_chain() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.route(
        "/threads/:thread_id/posts/:post_id",
        [callback(|ctx| {
            let thread = ctx.match_result.param("thread_id").unwrap_or("").to_string();
            let post = ctx.match_result.param("post_id").unwrap_or("").to_string();
            ctx.response.body = Payload::Text(format!("{thread}/{post}"));
            Ok(())
        })],
    );

    let res = app
        .handle(HttpRequest::new(Method::GET, "/threads/12/posts/34"))
        .unwrap();
    assert_eq!(res.body, Payload::Text("12/34".into()));
}

#[test]
fn wildcard_capture_reaches_the_chain() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.route(
        "/static/*",
        [callback(|ctx| {
            let rest = ctx.match_result.wildcard.clone().unwrap_or_default();
            ctx.response.body = Payload::Text(rest);
            Ok(())
        })],
    );

    let res = app
        .handle(HttpRequest::new(Method::GET, "/static/css/site.css"))
        .unwrap();
    assert_eq!(res.body, Payload::Text("css/site.css".into()));
}

#[test]
fn no_match_yields_default_empty_response() {
    let _tracing = TestTracing::init();
    let (hit, _) = flag();

    let mut app = App::new();
    let h = hit.clone();
    app.route(
        "/only",
        [callback(move |_ctx| {
            h.store(true, Ordering::SeqCst);
            Ok(())
        })],
    );

    let res = app
        .handle(HttpRequest::new(Method::GET, "/elsewhere"))
        .unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.reason, "OK");
    assert!(res.headers.is_empty());
    assert_eq!(res.body, Payload::None);
    assert!(!hit.load(Ordering::SeqCst));
}

#[test]
fn exact_template_string_required_to_coalesce() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.route(
        "/x",
        [callback(|ctx| {
            ctx.response.body = Payload::Text("bare".into());
            Ok(())
        })],
    );
    app.route(
        "/x/",
        [callback(|ctx| {
            ctx.response.body = Payload::Text("slashed".into());
            Ok(())
        })],
    );
    assert_eq!(app.routes().len(), 2);

    // the two templates are distinct routes with distinct match behavior
    let res = app.handle(HttpRequest::new(Method::GET, "/x")).unwrap();
    assert_eq!(res.body, Payload::Text("bare".into()));
    let res = app.handle(HttpRequest::new(Method::GET, "/x/")).unwrap();
    assert_eq!(res.body, Payload::Text("slashed".into()));
}
