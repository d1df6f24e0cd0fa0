use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use webinar_core::notifications::{DeliveryError, NotificationSender, OutgoingEmail};
use webinar_core::service::RegistrationService;
use webinar_core::store::RegistrationStore;
use webinar_core::store::memory::InMemoryStore;
use webinar_core::validation::EmailAddress;

use crate::server::{build_router, cors_layer};
use crate::state::AppState;

/// Counts send attempts; optionally fails every one of them.
#[derive(Default)]
struct CountingSender {
    attempts: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl NotificationSender for CountingSender {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(DeliveryError::MissingCredential)
        } else {
            Ok(())
        }
    }
}

struct TestApp {
    router: Router,
    store: Arc<InMemoryStore>,
}

fn app_with_sender(sender: Arc<dyn NotificationSender>) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let service = RegistrationService::new(
        store.clone(),
        sender,
        EmailAddress::parse("support@example.com").unwrap(),
    );
    let state = AppState::new(service, store.clone());
    TestApp {
        router: build_router(state, cors_layer(&[])),
        store,
    }
}

fn app() -> TestApp {
    app_with_sender(Arc::new(CountingSender::default()))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn registration_body(email: &str, source: Option<&str>) -> Value {
    let mut body = json!({
        "fullName": "Asha Rao",
        "email": email,
        "whatsapp": "+91 98765 43210",
    });
    if let Some(source) = source {
        body["referralSource"] = json!(source);
    }
    body
}

#[tokio::test]
async fn test_hello_world() {
    let app = app();
    for uri in ["/api", "/api/"] {
        let (status, body) = send(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Hello World" }));
    }
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_then_list() {
    let app = app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/webinar-register",
            &registration_body("asha@example.com", Some("LinkedIn")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["message"],
        "Registration successful! Check your email for confirmation and webinar details."
    );

    let (status, body) = send(&app.router, get("/api/webinar-registrations")).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["fullName"], "Asha Rao");
    assert_eq!(list[0]["email"], "asha@example.com");
    assert_eq!(list[0]["whatsapp"], "+91 98765 43210");
    assert_eq!(list[0]["referralSource"], "LinkedIn");
    assert!(list[0]["id"].is_string());
    assert!(list[0]["timestamp"].is_string());
}

#[tokio::test]
async fn test_invalid_email_is_422_and_not_stored() {
    let app = app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/webinar-register",
            &registration_body("invalid-email", None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("email"));
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_internationalized_email_is_accepted() {
    let app = app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/webinar-register",
            &registration_body("josé@münchen.de", None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (_, body) = send(&app.router, get("/api/webinar-registrations")).await;
    assert_eq!(body[0]["email"], "josé@münchen.de");
}

#[tokio::test]
async fn test_missing_whatsapp_is_422() {
    let app = app();

    let body = json!({ "fullName": "Asha Rao", "email": "asha@example.com" });
    let (status, _) = send(&app.router, post_json("/api/webinar-register", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let app = app();
    app.store.fail_writes(true);

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/webinar-register",
            &registration_body("asha@example.com", None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Registration failed. Please try again or contact support."
    );
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failing_notifications_keep_success() {
    let sender = Arc::new(CountingSender {
        attempts: AtomicUsize::new(0),
        fail: true,
    });
    let app = app_with_sender(sender.clone());

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/webinar-register",
            &registration_body("asha@example.com", None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(app.store.count().await.unwrap(), 1);

    for _ in 0..100 {
        if sender.attempts.load(Ordering::SeqCst) == 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(sender.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_stats() {
    let app = app();
    for source in ["LinkedIn", "Facebook", "LinkedIn"] {
        let (status, _) = send(
            &app.router,
            post_json(
                "/api/webinar-register",
                &registration_body("asha@example.com", Some(source)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app.router, get("/api/webinar-stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total_registrations": 3,
            "available_seats": 97,
            "referral_breakdown": [
                { "_id": "LinkedIn", "count": 2 },
                { "_id": "Facebook", "count": 1 },
            ],
        })
    );
}

#[tokio::test]
async fn test_status_checks() {
    let app = app();

    let (status, created) = send(
        &app.router,
        post_json("/api/status", &json!({ "client_name": "uptime-probe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["client_name"], "uptime-probe");

    let (status, body) = send(&app.router, get("/api/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([created]));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app();
    let request = Request::builder()
        .uri("/api/webinar-stats")
        .header(header::ORIGIN, "https://landing.example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
