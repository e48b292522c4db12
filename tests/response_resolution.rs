//! Handler return values resolved through the full router stack.

use std::io::Cursor;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde::Serialize;

use devserve::http::{Handlers, HttpServer, ResponseValue};

mod common;

use common::{get, send};

#[derive(Serialize)]
struct Item {
    id: u32,
    name: &'static str,
}

fn app() -> Router {
    let handlers = Handlers::new()
        .handle("/item", |_request: Request<Body>| async {
            ResponseValue::json(Item { id: 7, name: "widget" })
        })
        .handle("/created", |_request: Request<Body>| async {
            ResponseValue::text("ok")
                .with_content_type("text/plain")
                .with_status(201)
        })
        .handle("/answer", |_request: Request<Body>| async { ResponseValue::status(42) })
        .handle("/too-big", |_request: Request<Body>| async { ResponseValue::status(700) })
        .handle("/continue", |_request: Request<Body>| async { ResponseValue::status(100) })
        .handle("/typed", |_request: Request<Body>| async {
            ResponseValue::json(Item { id: 1, name: "typed" }).with_content_type("text/html")
        })
        .handle("/x", |_request: Request<Body>| async { ResponseValue::redirect("/x-target") })
        .handle("/y", |_request: Request<Body>| async { ResponseValue::redirect("") })
        .handle("/stream", |_request: Request<Body>| async {
            ResponseValue::reader(Cursor::new(b"chunk one, chunk two".to_vec()))
        })
        .handle("/fail", |_request: Request<Body>| async {
            ResponseValue::error(std::io::Error::other("connection string leaked"))
        });

    HttpServer::new(handlers).into_router()
}

#[tokio::test]
async fn test_json_etag_round_trip() {
    let first = get(app(), "/item").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(first.text(), r#"{"id":7,"name":"widget"}"#);

    let etag = first.headers[header::ETAG].clone();
    let etag_str = etag.to_str().unwrap();
    assert!(etag_str.starts_with('"') && etag_str.ends_with('"'));

    let repeat = send(
        app(),
        Request::builder()
            .uri("/item")
            .header(header::IF_NONE_MATCH, etag.clone())
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(repeat.status, StatusCode::NOT_MODIFIED);
    assert!(repeat.body.is_empty());
}

#[tokio::test]
async fn test_post_json_never_gets_etag() {
    for _ in 0..2 {
        let res = send(
            app(),
            Request::builder()
                .method(Method::POST)
                .uri("/item")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.headers.get(header::ETAG).is_none());
        assert_eq!(res.text(), "{\"id\":7,\"name\":\"widget\"}\n");
    }
}

#[tokio::test]
async fn test_wrapped_status_and_content_type() {
    let res = get(app(), "/created").await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.headers[header::CONTENT_TYPE], "text/plain");
    assert_eq!(res.text(), "ok");
}

#[tokio::test]
async fn test_out_of_range_status_is_500() {
    assert_eq!(get(app(), "/answer").await.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(get(app(), "/too-big").await.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(get(app(), "/continue").await.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_json_content_type_beats_wrapper() {
    let res = get(app(), "/typed").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(res.text(), r#"{"id":1,"name":"typed"}"#);
}

#[tokio::test]
async fn test_redirects() {
    let res = get(app(), "/x").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.headers[header::LOCATION], "/x-target");

    let res = get(app(), "/y").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.headers[header::LOCATION], "/y");
}

#[tokio::test]
async fn test_reader_body() {
    let res = get(app(), "/stream").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.text(), "chunk one, chunk two");
}

#[tokio::test]
async fn test_error_is_contained() {
    let res = get(app(), "/fail").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!res.text().contains("connection string"));
}

#[tokio::test]
async fn test_unregistered_path_is_404() {
    let res = get(app(), "/nowhere").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
