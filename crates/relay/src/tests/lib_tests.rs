use super::*;
use async_trait::async_trait;
use axum::{body, body::Body, http::Request};
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt;

#[derive(Clone, Default)]
struct RecordingNotifier {
    delivered: Arc<Mutex<Vec<NotificationPayload>>>,
    reject_with_status: Option<u16>,
}

impl RecordingNotifier {
    fn rejecting(status: u16) -> Self {
        Self {
            reject_with_status: Some(status),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), RelayError> {
        self.delivered.lock().await.push(payload.clone());
        if let Some(status) = self.reject_with_status {
            return Err(RelayError::Delivery { status });
        }
        Ok(())
    }
}

fn contact_body() -> String {
    serde_json::json!({
        "name": "山田太郎",
        "email": "a@b.com",
        "company": "",
        "budget": "",
        "message": "相談したい",
        "privacy": true,
    })
    .to_string()
}

fn post_contact(route: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(route)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("request")
}

async fn read_ack(response: axum::response::Response) -> RelayAck {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("ack json")
}

#[tokio::test]
async fn relays_formatted_message_and_acknowledges() {
    let notifier = RecordingNotifier::default();
    let app = build_router(RelayState::new(notifier.clone()));

    let response = app
        .oneshot(post_contact(CONTACT_ROUTE, contact_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_ack(response).await, RelayAck::success());

    let delivered = notifier.delivered.lock().await;
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].text.contains("*氏名:* 山田太郎"));
    assert!(delivered[0].text.ends_with("*内容:*\n相談したい"));
}

#[tokio::test]
async fn legacy_route_is_served_by_the_same_handler() {
    let notifier = RecordingNotifier::default();
    let app = build_router(RelayState::new(notifier.clone()));

    let response = app
        .oneshot(post_contact(LEGACY_CONTACT_ROUTE, contact_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(notifier.delivered.lock().await.len(), 1);
}

#[tokio::test]
async fn get_is_method_not_allowed_without_webhook_call() {
    let notifier = RecordingNotifier::default();
    let app = build_router(RelayState::new(notifier.clone()));

    let request = Request::get(CONTACT_ROUTE)
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert!(bytes.is_empty());
    assert!(notifier.delivered.lock().await.is_empty());
}

#[tokio::test]
async fn put_with_body_is_rejected_before_parsing() {
    let notifier = RecordingNotifier::default();
    let app = build_router(RelayState::new(notifier.clone()));

    let request = Request::put(CONTACT_ROUTE)
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(notifier.delivered.lock().await.is_empty());
}

#[tokio::test]
async fn malformed_json_is_contained_as_ok_false() {
    let notifier = RecordingNotifier::default();
    let app = build_router(RelayState::new(notifier.clone()));

    let response = app
        .oneshot(post_contact(CONTACT_ROUTE, "{\"name\": 42"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let ack = read_ack(response).await;
    assert!(!ack.ok);
    assert!(ack
        .error
        .expect("error text")
        .starts_with("invalid contact payload"));
    assert!(notifier.delivered.lock().await.is_empty());
}

#[tokio::test]
async fn webhook_rejection_is_contained_as_ok_false() {
    let notifier = RecordingNotifier::rejecting(500);
    let app = build_router(RelayState::new(notifier.clone()));

    let response = app
        .oneshot(post_contact(CONTACT_ROUTE, contact_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let ack = read_ack(response).await;
    assert_eq!(
        ack,
        RelayAck::failure("webhook responded with status 500")
    );
    assert_eq!(notifier.delivered.lock().await.len(), 1);
}

#[tokio::test]
async fn missing_webhook_url_fails_only_the_request() {
    let notifier = WebhookNotifier::new(WebhookEndpoint::Missing, Duration::from_secs(1))
        .expect("notifier");
    let app = build_router(RelayState::new(notifier));

    let response = app
        .clone()
        .oneshot(post_contact(CONTACT_ROUTE, contact_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_ack(response).await,
        RelayAck::failure("webhook url is not configured")
    );

    let health = Request::get(HEALTH_ROUTE)
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(health).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_body_is_refused_with_json_ack() {
    let notifier = RecordingNotifier::default();
    let app = build_router(RelayState::new(notifier.clone()));

    let huge = "x".repeat(MAX_SUBMISSION_BYTES + 1);
    let request = Request::post(CONTACT_ROUTE)
        .header("content-type", "application/json")
        .header("content-length", huge.len())
        .body(Body::from(huge))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    let ack = read_ack(response).await;
    assert!(!ack.ok);
    assert!(ack
        .error
        .expect("error text")
        .starts_with("could not read request body"));
    assert!(notifier.delivered.lock().await.is_empty());
}

#[tokio::test]
async fn unreachable_webhook_error_does_not_reveal_its_path() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let hook = format!("http://{addr}/services/T000/B000/SECRETTOKEN");
    let notifier = WebhookNotifier::new(
        WebhookEndpoint::resolve(Some(hook.as_str())),
        Duration::from_secs(2),
    )
    .expect("notifier");
    let state = RelayState::new(notifier);

    let err = relay(&state, contact_body().as_bytes())
        .await
        .expect_err("should fail");
    assert_eq!(err.kind(), "network");
    assert!(!err.to_string().contains("SECRETTOKEN"));
    assert!(!format!("{err:?}").contains("SECRETTOKEN"));

    let app = build_router(state);
    let response = app
        .oneshot(post_contact(CONTACT_ROUTE, contact_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error = read_ack(response).await.error.expect("error text");
    assert!(error.starts_with("failed to reach webhook"));
    assert!(!error.contains("/services/"));
}
