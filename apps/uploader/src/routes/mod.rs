pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::selection::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/rules", get(handlers::handle_get_rules))
        .route("/api/v1/uploads", post(handlers::handle_create_session))
        .route(
            "/api/v1/uploads/:id",
            get(handlers::handle_get_status).delete(handlers::handle_discard),
        )
        .route("/api/v1/uploads/:id/select", post(handlers::handle_select))
        .route(
            "/api/v1/uploads/:id/complete",
            post(handlers::handle_complete),
        )
        .route("/api/v1/uploads/:id/reset", post(handlers::handle_reset))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::selection::registry::SessionRegistry;
    use crate::selection::upload::SimulatedUploader;

    const DELAY: Duration = Duration::from_millis(2000);

    fn test_app() -> Router {
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            max_file_size: 10 * 1024 * 1024,
            allowed_extensions: vec![
                "pdf".to_string(),
                "doc".to_string(),
                "docx".to_string(),
                "txt".to_string(),
            ],
            upload_delay: DELAY,
            session_ttl: Duration::from_secs(1800),
            session_sweep_interval: Duration::from_secs(60),
        };
        let sessions = Arc::new(SessionRegistry::new(
            config.validation_rule(),
            Arc::new(SimulatedUploader::new(config.upload_delay)),
        ));
        build_router(AppState { config, sessions })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json")
        };
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).expect("request")
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send(app, post_empty("/api/v1/uploads")).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().expect("id").to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let request = Request::get("/health").body(Body::empty()).expect("request");
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_rules_describe_allow_list() {
        let app = test_app();
        let request = Request::get("/api/v1/rules").body(Body::empty()).expect("request");
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allowed_extensions"], json!([".pdf", ".doc", ".docx", ".txt"]));
        assert_eq!(body["max_size"], 10_485_760);
        assert_eq!(body["max_size_label"], "10 MB");
        assert_eq!(body["upload_delay_ms"], 2000);
    }

    #[tokio::test]
    async fn test_new_session_is_idle() {
        let app = test_app();
        let id = create_session(&app).await;
        let request = Request::get(format!("/api/v1/uploads/{id}"))
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "idle");
        assert!(body["file"].is_null());
    }

    #[tokio::test]
    async fn test_select_valid_resume() {
        let app = test_app();
        let id = create_session(&app).await;
        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/uploads/{id}/select"),
                json!({ "name": "resume.pdf", "size": 500000 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "selected");
        assert_eq!(body["file"]["extension"], "pdf");
        assert_eq!(body["file"]["display_size"], "488.28 KB");
    }

    #[tokio::test]
    async fn test_select_rejected_file_returns_error_state() {
        let app = test_app();
        let id = create_session(&app).await;
        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/uploads/{id}/select"),
                json!({ "name": "resume.pdf", "size": 11000000 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["state"], "error");
        assert_eq!(body["message"], "file exceeds 10 MB");
        assert!(body["file"].is_null());
    }

    #[tokio::test]
    async fn test_select_malformed_candidate_is_bad_request() {
        let app = test_app();
        let id = create_session(&app).await;
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/v1/uploads/{id}/select"),
                json!({ "name": "resume.pdf", "size": -1 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["error"]["code"], "INVALID_CANDIDATE");
        assert!(body["error"]["message"].as_str().unwrap().contains("size"));

        let request = Request::get(format!("/api/v1/uploads/{id}"))
            .body(Body::empty())
            .expect("request");
        let (_, body) = send(&app, request).await;
        assert_eq!(body["state"], "idle");
    }

    #[tokio::test]
    async fn test_select_without_name_is_bad_request() {
        let app = test_app();
        let id = create_session(&app).await;
        let (status, body) = send(
            &app,
            post_json(&format!("/api/v1/uploads/{id}/select"), json!({ "size": 10 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_CANDIDATE");
    }

    #[tokio::test]
    async fn test_complete_without_selection_conflicts() {
        let app = test_app();
        let id = create_session(&app).await;
        let (status, body) = send(&app, post_empty(&format!("/api/v1/uploads/{id}/complete"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "NO_FILE_SELECTED");
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_then_success() {
        let app = test_app();
        let id = create_session(&app).await;
        send(
            &app,
            post_json(
                &format!("/api/v1/uploads/{id}/select"),
                json!({ "name": "resume.docx", "size": 1536 }),
            ),
        )
        .await;

        let (status, body) = send(&app, post_empty(&format!("/api/v1/uploads/{id}/complete"))).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["state"], "uploading");

        let (status, body) = send(&app, post_empty(&format!("/api/v1/uploads/{id}/complete"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "UPLOAD_IN_PROGRESS");

        tokio::time::sleep(DELAY + Duration::from_millis(10)).await;

        let request = Request::get(format!("/api/v1/uploads/{id}"))
            .body(Body::empty())
            .expect("request");
        let (_, body) = send(&app, request).await;
        assert_eq!(body["state"], "success");
        assert_eq!(body["file"]["name"], "resume.docx");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_mid_upload_returns_to_idle() {
        let app = test_app();
        let id = create_session(&app).await;
        send(
            &app,
            post_json(
                &format!("/api/v1/uploads/{id}/select"),
                json!({ "name": "resume.txt", "size": 10 }),
            ),
        )
        .await;
        send(&app, post_empty(&format!("/api/v1/uploads/{id}/complete"))).await;

        let (status, body) = send(&app, post_empty(&format!("/api/v1/uploads/{id}/reset"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "idle");

        tokio::time::sleep(DELAY * 2).await;
        let request = Request::get(format!("/api/v1/uploads/{id}"))
            .body(Body::empty())
            .expect("request");
        let (_, body) = send(&app, request).await;
        assert_eq!(body["state"], "idle");
    }

    #[tokio::test]
    async fn test_discard_session() {
        let app = test_app();
        let id = create_session(&app).await;
        let delete = || {
            Request::delete(format!("/api/v1/uploads/{id}"))
                .body(Body::empty())
                .expect("request")
        };

        let (status, _) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = test_app();
        let uri = format!("/api/v1/uploads/{}/reset", Uuid::new_v4());
        let (status, _) = send(&app, post_empty(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
