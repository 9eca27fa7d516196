#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use hockey_connect_messaging::config::Config;
use hockey_connect_messaging::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn app() -> Router {
    app_with(Config::test_defaults())
}

pub fn app_with(config: Config) -> Router {
    build_router(AppState::in_memory(config).expect("state"))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    TestResponse { status, body }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn put(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::PUT, uri, None, None).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::PUT, uri, Some(body), None).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn create_player(app: &Router, name: &str) -> String {
    let res = post(
        app,
        "/api/players",
        json!({
            "name": name,
            "email": format!("{}@players.test", name.to_lowercase()),
            "position": "Midfielder",
            "experience_level": "Intermediate",
            "location": "Amsterdam",
            "age": 21
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    res.body["id"].as_str().unwrap().to_string()
}

pub async fn create_club(app: &Router, name: &str) -> String {
    let res = post(
        app,
        "/api/clubs",
        json!({
            "name": name,
            "email": format!("{}@clubs.test", name.to_lowercase().replace(' ', "")),
            "location": "Rotterdam",
            "established_year": 1950
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    res.body["id"].as_str().unwrap().to_string()
}

pub async fn send_message(
    app: &Router,
    from: (&str, &str),
    to: (&str, &str),
    content: &str,
) -> TestResponse {
    post(
        app,
        &format!("/api/messages/send?sender_id={}&sender_type={}", from.0, from.1),
        json!({ "receiver_id": to.0, "receiver_type": to.1, "content": content }),
    )
    .await
}

pub async fn unread(app: &Router, who: (&str, &str)) -> i64 {
    let res = get(app, &format!("/api/messages/unread-count/{}/{}", who.0, who.1)).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    res.body["unread_count"].as_i64().unwrap()
}

pub async fn conversations(app: &Router, who: (&str, &str)) -> Vec<Value> {
    let res = get(app, &format!("/api/conversations/{}/{}", who.0, who.1)).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    res.body.as_array().cloned().unwrap_or_default()
}
