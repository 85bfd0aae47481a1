use axum::Router;
use axum::body::{Body, to_bytes};
use http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use murmur_social::domain::policy::Operation;
use murmur_social::router::build_router;
use murmur_social::state::AppState;

use crate::helpers::setup_db;

async fn app() -> Router {
    build_router(AppState::new(setup_db().await))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
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
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

/// `name=value` of the first `Set-Cookie` header.
fn session_cookie(headers: &HeaderMap) -> String {
    let raw = headers
        .get(header::SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_owned()
}

/// Sign up `name` and return `(user id, cookie)`.
async fn register(app: &Router, name: &str) -> (String, String) {
    let (status, headers, body) = send(
        app,
        Method::POST,
        "/users",
        None,
        Some(json!({
            "name": name,
            "email": format!("{name}@example.com"),
            "password": "foobar",
            "password_confirmation": "foobar",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "sign up failed: {body}");
    let id = body["id"].as_str().unwrap().to_owned();
    (id, session_cookie(&headers))
}

#[tokio::test]
async fn should_answer_health_probes() {
    let app = app().await;
    let (status, _, _) = send(&app, Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&app, Method::GET, "/readyz", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn should_sign_up_and_set_remember_cookie() {
    let app = app().await;
    let (id, cookie) = register(&app, "alice").await;

    assert!(cookie.starts_with("murmur_remember="));
    assert!(cookie.contains(&id));
    let (status, _, body) = send(&app, Method::GET, "/feed", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn should_report_every_sign_up_violation() {
    let app = app().await;
    let (status, headers, body) = send(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({
            "name": "",
            "email": "user@invalid",
            "password": "foo",
            "password_confirmation": "bar",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "VALIDATION");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn should_require_sign_in_for_protected_routes() {
    let app = app().await;
    let (status, _, body) = send(&app, Method::GET, "/feed", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "UNAUTHORIZED");

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/microposts",
        Some("murmur_remember=garbage"),
        Some(json!({ "content": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_sign_in_and_out() {
    let app = app().await;
    register(&app, "alice").await;

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/sessions",
        None,
        Some(json!({ "email": "alice@example.com", "password": "invalid" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid email/password combination");

    let (status, headers, body) = send(
        &app,
        Method::POST,
        "/sessions",
        None,
        Some(json!({ "email": "Alice@Example.com", "password": "foobar" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "alice@example.com");
    let cookie = session_cookie(&headers);

    let (status, headers, _) = send(&app, Method::DELETE, "/sessions", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let cleared = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"), "cookie not cleared: {cleared}");
}

#[tokio::test]
async fn should_follow_post_and_unfollow_through_http() {
    let app = app().await;
    let (_, a_cookie) = register(&app, "a").await;
    let (b_id, b_cookie) = register(&app, "b").await;

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/relationships",
        Some(&a_cookie),
        Some(json!({ "followed_id": b_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/microposts",
        Some(&b_cookie),
        Some(json!({ "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, _, feed) = send(&app, Method::GET, "/feed", Some(&a_cookie), None).await;
    assert_eq!(feed[0]["content"], "hello");

    let (_, _, profile) = send(&app, Method::GET, &format!("/users/{b_id}"), Some(&a_cookie), None).await;
    assert_eq!(profile["followers_count"], 1);
    assert_eq!(profile["is_following"], true);

    let uri = format!("/relationships/{b_id}");
    let (status, _, _) = send(&app, Method::DELETE, &uri, Some(&a_cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, feed) = send(&app, Method::GET, "/feed", Some(&a_cookie), None).await;
    assert_eq!(feed, json!([]));
}

#[tokio::test]
async fn should_show_profile_to_anonymous_visitors() {
    let app = app().await;
    let (id, cookie) = register(&app, "alice").await;
    send(
        &app,
        Method::POST,
        "/microposts",
        Some(&cookie),
        Some(json!({ "content": "public post" })),
    )
    .await;

    let (status, _, body) = send(&app, Method::GET, &format!("/users/{id}"), None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "alice");
    assert!(body["user"].get("email").is_none());
    assert_eq!(body["microposts"][0]["content"], "public post");
    assert!(body.get("is_following").is_none());
}

#[tokio::test]
async fn should_forbid_deleting_another_users_micropost() {
    let app = app().await;
    let (_, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let (_, _, post) = send(
        &app,
        Method::POST,
        "/microposts",
        Some(&alice),
        Some(json!({ "content": "mine" })),
    )
    .await;
    let uri = format!("/microposts/{}", post["id"].as_str().unwrap());

    let (status, _, body) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "FORBIDDEN");

    let (status, _, _) = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn should_reissue_cookie_after_password_change() {
    let app = app().await;
    let (id, old_cookie) = register(&app, "alice").await;

    let (status, headers, _) = send(
        &app,
        Method::PATCH,
        &format!("/users/{id}"),
        Some(&old_cookie),
        Some(json!({ "password": "newsecret", "password_confirmation": "newsecret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_cookie = session_cookie(&headers);

    let (status, _, _) = send(&app, Method::GET, "/feed", Some(&old_cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _, _) = send(&app, Method::GET, "/feed", Some(&new_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
}

/// The route serving `op`, with a body that would succeed for a signed-in caller.
fn route_for(op: Operation, user_id: &str) -> (Method, String, Option<Value>) {
    match op {
        Operation::SignUp => (
            Method::POST,
            "/users".to_owned(),
            Some(json!({
                "name": "newcomer",
                "email": "newcomer@example.com",
                "password": "foobar",
                "password_confirmation": "foobar",
            })),
        ),
        Operation::SignIn => (
            Method::POST,
            "/sessions".to_owned(),
            Some(json!({ "email": "alice@example.com", "password": "foobar" })),
        ),
        Operation::SignOut => (Method::DELETE, "/sessions".to_owned(), None),
        Operation::ShowUser => (Method::GET, format!("/users/{user_id}"), None),
        Operation::ListUsers => (Method::GET, "/users".to_owned(), None),
        Operation::EditProfile | Operation::UpdateProfile => (
            Method::PATCH,
            format!("/users/{user_id}"),
            Some(json!({ "name": "renamed" })),
        ),
        Operation::DestroyUser => (Method::DELETE, format!("/users/{user_id}"), None),
        Operation::Follow => (
            Method::POST,
            "/relationships".to_owned(),
            Some(json!({ "followed_id": user_id })),
        ),
        Operation::Unfollow => (Method::DELETE, format!("/relationships/{user_id}"), None),
        Operation::ListFollowing => (Method::GET, format!("/users/{user_id}/following"), None),
        Operation::ListFollowers => (Method::GET, format!("/users/{user_id}/followers"), None),
        Operation::CreateMicropost => (
            Method::POST,
            "/microposts".to_owned(),
            Some(json!({ "content": "hi" })),
        ),
        Operation::DestroyMicropost => (
            Method::DELETE,
            format!("/microposts/{}", uuid::Uuid::now_v7()),
            None,
        ),
        Operation::Feed => (Method::GET, "/feed".to_owned(), None),
    }
}

#[tokio::test]
async fn should_gate_routes_exactly_as_the_authentication_table_says() {
    let app = app().await;
    let (alice_id, _) = register(&app, "alice").await;

    for op in [
        Operation::SignUp,
        Operation::SignIn,
        Operation::SignOut,
        Operation::ShowUser,
        Operation::ListUsers,
        Operation::EditProfile,
        Operation::UpdateProfile,
        Operation::DestroyUser,
        Operation::Follow,
        Operation::Unfollow,
        Operation::ListFollowing,
        Operation::ListFollowers,
        Operation::CreateMicropost,
        Operation::DestroyMicropost,
        Operation::Feed,
    ] {
        let (method, uri, body) = route_for(op, &alice_id);
        let (status, _, response) = send(&app, method, &uri, None, body).await;
        if op.requires_authentication() {
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{op:?} {uri}");
            assert_eq!(response["kind"], "UNAUTHORIZED", "{op:?} {uri}");
        } else {
            assert!(status.is_success(), "{op:?} {uri} answered {status}");
        }
    }
}

#[tokio::test]
async fn should_clear_stale_cookie_on_sign_out() {
    let app = app().await;
    let (id, old_cookie) = register(&app, "alice").await;
    send(
        &app,
        Method::PATCH,
        &format!("/users/{id}"),
        Some(&old_cookie),
        Some(json!({ "password": "newsecret", "password_confirmation": "newsecret" })),
    )
    .await;

    let (status, headers, _) =
        send(&app, Method::DELETE, "/sessions", Some(&old_cookie), None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    let cleared = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"), "cookie not cleared: {cleared}");
}

#[tokio::test]
async fn should_refuse_sign_up_while_signed_in() {
    let app = app().await;
    let (_, cookie) = register(&app, "alice").await;

    let (status, headers, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(&cookie),
        Some(json!({
            "name": "second",
            "email": "second@example.com",
            "password": "foobar",
            "password_confirmation": "foobar",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "FORBIDDEN");
    assert!(headers.get(header::SET_COOKIE).is_none());
    let (status, _, _) = send(&app, Method::GET, "/feed", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
}
