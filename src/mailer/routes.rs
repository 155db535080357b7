//! HTTP routes of the contact service

use crate::mailer::contact::{render_contact_email, ContactSubmission};
use crate::mailer::smtp::Mailer;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const SENT_MESSAGE: &str =
    "Votre message a été envoyé avec succès ! Nous vous répondrons rapidement.";
const SEND_FAILED_MESSAGE: &str = "Erreur lors de l'envoi du message. Veuillez réessayer.";
const INVALID_BODY_MESSAGE: &str = "Données JSON invalides";
const UNEXPECTED_MESSAGE: &str = "Une erreur inattendue s'est produite";

/// Shared state of the contact service
#[derive(Clone)]
pub struct AppState {
    mailer: Arc<dyn Mailer>,
    site_name: Arc<str>,
}

impl AppState {
    pub fn new(mailer: Arc<dyn Mailer>, site_name: &str) -> Self {
        Self {
            mailer,
            site_name: Arc::from(site_name),
        }
    }
}

/// Body of every `/api/contact` response
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

fn contact_response(status: StatusCode, success: bool, message: impl Into<String>) -> Response {
    (
        status,
        Json(ContactResponse {
            success,
            message: message.into(),
        }),
    )
        .into_response()
}

/// Builds the router with permissive CORS
///
/// A panicking handler yields the generic 500 body instead of a dropped
/// connection.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/health", get(health))
        .route("/api/contact", post(contact))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

async fn contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Response {
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!("Rejected contact body: {}", rejection);
            return contact_response(StatusCode::BAD_REQUEST, false, INVALID_BODY_MESSAGE);
        }
    };

    let contact = match submission.validate() {
        Ok(contact) => contact,
        Err(rejection) => {
            return contact_response(StatusCode::BAD_REQUEST, false, rejection.message());
        }
    };

    let (subject, body) = render_contact_email(&contact, &state.site_name, &Local::now());
    match state.mailer.send(&subject, &body).await {
        Ok(()) => {
            tracing::info!("Contact email sent for {} ({})", contact.nom, contact.email);
            contact_response(StatusCode::OK, true, SENT_MESSAGE)
        }
        Err(e) => {
            tracing::error!("Failed to send contact email: {}", e);
            contact_response(StatusCode::INTERNAL_SERVER_ERROR, false, SEND_FAILED_MESSAGE)
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": format!("Backend {} opérationnel", state.site_name),
        "timestamp": Local::now().to_rfc3339(),
    }))
}

async fn home(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": format!("API {} Contact Form", state.site_name),
        "version": "1.0",
        "endpoints": {
            "POST /api/contact": "Envoyer un message de contact",
            "GET /api/health": "Vérifier le statut de l'API",
        },
    }))
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Contact handler panicked");
    contact_response(StatusCode::INTERNAL_SERVER_ERROR, false, UNEXPECTED_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MailError;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _subject: &str, _body: &str) -> Result<(), MailError> {
            let source = "not-an-address"
                .parse::<lettre::message::Mailbox>()
                .unwrap_err();
            Err(MailError::Address {
                address: "not-an-address".to_string(),
                source,
            })
        }
    }

    struct PanickingMailer;

    #[async_trait]
    impl Mailer for PanickingMailer {
        async fn send(&self, _subject: &str, _body: &str) -> Result<(), MailError> {
            panic!("smtp exploded")
        }
    }

    fn post_contact(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_contact_success() {
        let mailer = Arc::new(RecordingMailer::default());
        let router = app(AppState::new(mailer.clone(), "Magickbot"));

        let response = router
            .oneshot(post_contact(
                r#"{"nom":"Jean","email":"jean@test.com","message":"Bonjour"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], SENT_MESSAGE);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "Nouveau contact Magickbot - Jean");
        assert!(sent[0].1.contains("Bonjour"));
    }

    #[tokio::test]
    async fn test_contact_missing_message() {
        let mailer = Arc::new(RecordingMailer::default());
        let router = app(AppState::new(mailer.clone(), "Magickbot"));

        let response = router
            .oneshot(post_contact(r#"{"nom":"Jean","email":"jean@test.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Le champ message est requis");
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_contact_invalid_email() {
        let router = app(AppState::new(Arc::new(RecordingMailer::default()), "Magickbot"));

        let response = router
            .oneshot(post_contact(
                r#"{"nom":"Jean","email":"jean-at-test","message":"Bonjour"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "Adresse email invalide");
    }

    #[tokio::test]
    async fn test_contact_malformed_json() {
        let router = app(AppState::new(Arc::new(RecordingMailer::default()), "Magickbot"));

        let response = router.oneshot(post_contact("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_contact_send_failure() {
        let router = app(AppState::new(Arc::new(FailingMailer), "Magickbot"));

        let response = router
            .oneshot(post_contact(
                r#"{"nom":"Jean","email":"jean@test.com","message":"Bonjour"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], SEND_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_error() {
        let router = app(AppState::new(Arc::new(PanickingMailer), "Magickbot"));

        let response = router
            .oneshot(post_contact(
                r#"{"nom":"Jean","email":"jean@test.com","message":"Bonjour"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], UNEXPECTED_MESSAGE);
        assert!(!body.to_string().contains("smtp exploded"));
    }

    #[tokio::test]
    async fn test_health_and_home() {
        let router = app(AppState::new(Arc::new(RecordingMailer::default()), "Magickbot"));

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "Backend Magickbot opérationnel");
        assert!(body["timestamp"].is_string());

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["version"], "1.0");
        assert!(body["endpoints"]["POST /api/contact"].is_string());
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let router = app(AppState::new(Arc::new(RecordingMailer::default()), "Magickbot"));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header(header::ORIGIN, "https://magickbot.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
