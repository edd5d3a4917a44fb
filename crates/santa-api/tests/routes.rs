//! End-to-end checks of the HTTP surface against an in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use santa_api::session::{SESSION_COOKIE, SessionConfig};
use santa_api::{AppStateInner, router};
use santa_db::{AssignmentStore, Exchange, MemoryStore, Store};
use santa_draw::DrawStrategy;
use santa_types::{Participant, Roster};

const SECRET: &str = "route-test-secret";

fn p(name: &str) -> Participant {
    Participant::parse(name).unwrap()
}

fn app(names: &[&str]) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let dyn_store: Arc<dyn Store> = store.clone();
    let exchange = Exchange::new(
        Roster::new(names.iter().copied()),
        dyn_store,
        DrawStrategy::Greedy,
    );
    let state = AppStateInner::new(exchange, SessionConfig::new(SECRET, 1));
    (router(state), store)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, header::HeaderMap, String) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = Request::get(path);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    req.body(Body::empty()).unwrap()
}

fn post_form(path: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut req = Request::post(path).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

fn location(headers: &header::HeaderMap) -> &str {
    headers.get(header::LOCATION).unwrap().to_str().unwrap()
}

/// Log in and return the `name=value` pair to send back as a cookie.
async fn login(app: &Router, name: &str) -> (String, String) {
    let (status, headers, _) = send(app, post_form("/", None, &format!("name={}", name))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    let pair = set_cookie.split(';').next().unwrap().to_string();
    assert!(pair.starts_with(&format!("{}=", SESSION_COOKIE)));
    (pair, location(&headers).to_string())
}

#[tokio::test]
async fn protected_pages_redirect_without_session() {
    let (app, _) = app(&["ana", "luis"]);
    for path in ["/wishlist", "/options", "/recipient/wishlist"] {
        let (status, headers, _) = send(&app, get(path, None)).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&headers), "/");
    }

    let (status, headers, _) = send(&app, post_form("/assign", None, "")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
}

#[tokio::test]
async fn forged_session_is_rejected() {
    let (app, _) = app(&["ana", "luis"]);
    let token = SessionConfig::new("someone-else", 1).create_token(&p("ana")).unwrap();
    let cookie = format!("{}={}", SESSION_COOKIE, token);

    let (status, headers, _) = send(&app, get("/options", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
}

#[tokio::test]
async fn unknown_name_is_rejected_without_cookie() {
    let (app, _) = app(&["ana", "luis"]);
    let (status, headers, body) = send(&app, post_form("/", None, "name=pedro")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::SET_COOKIE).is_none());
    assert!(body.contains("not registered"));
}

#[tokio::test]
async fn login_ignores_case_and_routes_by_wishlist() {
    let (app, _) = app(&["ana", "luis"]);
    let (cookie, target) = login(&app, "ANA").await;
    assert_eq!(target, "/wishlist");

    let (status, headers, _) = send(
        &app,
        post_form("/wishlist", Some(&cookie), "item1=Book&item2=+Socks+&item3=Tea"),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/options");

    let (_, target) = login(&app, "Ana").await;
    assert_eq!(target, "/options");

    let (status, _, body) = send(&app, get("/wishlist", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("value=\"Socks\""));
}

#[tokio::test]
async fn assignment_flow() {
    let (app, store) = app(&["ana", "luis"]);
    let (ana, _) = login(&app, "ana").await;

    let (_, _, body) = send(&app, get("/recipient/wishlist", Some(&ana))).await;
    assert!(body.contains("not been assigned"));

    let (status, _, body) = send(&app, post_form("/assign", Some(&ana), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<strong>Luis</strong>"));
    assert_eq!(store.get_assignment(&p("ana")).unwrap(), Some(p("luis")));

    // Drawing again shows the same person.
    let (_, _, body) = send(&app, post_form("/assign", Some(&ana), "")).await;
    assert!(body.contains("<strong>Luis</strong>"));

    let (_, _, body) = send(&app, get("/options", Some(&ana))).await;
    assert!(body.contains("You give a gift to <strong>Luis</strong>"));

    let (_, _, body) = send(&app, get("/recipient/wishlist", Some(&ana))).await;
    assert!(body.contains("(Luis) has not created a wishlist yet"));

    let (luis, _) = login(&app, "luis").await;
    send(&app, post_form("/wishlist", Some(&luis), "item1=Chess&item2=Gloves&item3=Coffee")).await;

    let (_, _, body) = send(&app, get("/recipient/wishlist", Some(&ana))).await;
    assert!(body.contains("<li>Chess</li>"));
    assert!(body.contains("<li>Coffee</li>"));
}

#[tokio::test]
async fn exhausted_draw_shows_message() {
    let (app, store) = app(&["a", "b", "c"]);
    store.set_assignment(&p("a"), &p("b")).unwrap();
    store.set_assignment(&p("b"), &p("a")).unwrap();

    let (c, _) = login(&app, "c").await;
    let (status, _, body) = send(&app, post_form("/assign", Some(&c), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No participants are left to assign."));
    assert_eq!(store.get_assignment(&p("c")).unwrap(), None);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let (app, _) = app(&["ana", "luis"]);
    let (cookie, _) = login(&app, "ana").await;
    let (status, headers, _) = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with(&format!("{}=;", SESSION_COOKIE)));
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app(&[]);
    let (status, _, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
