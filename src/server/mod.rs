//! HTTP service: chat proxy, rate-limited structured advice, feedback store,
//! and informational documents.

mod client_ip;
mod error;
mod handlers;
mod routes;

pub use client_ip::{ClientId, UNKNOWN_CLIENT};
pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::llm::{CompletionGateway, LlmClient};
use crate::rate_limit::RateLimiter;
use crate::repository::FeedbackRepository;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub feedback_repo: Arc<FeedbackRepository>,
    pub llm: Arc<dyn CompletionGateway>,
    pub rate_limiter: Arc<RateLimiter>,
    /// System prompt sent with every `/ask` request.
    pub advice_prompt: Arc<str>,
    pub static_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let llm = LlmClient::new(settings.llm.clone())?;
        Ok(Self::with_gateway(settings, Arc::new(llm)))
    }

    /// Build state around an existing completion backend.
    pub fn with_gateway(settings: &Settings, llm: Arc<dyn CompletionGateway>) -> Self {
        let ctx = settings.create_db_context();
        Self {
            feedback_repo: Arc::new(ctx.feedback()),
            llm,
            rate_limiter: Arc::new(RateLimiter::in_memory(settings.rate_limit.clone())),
            advice_prompt: Arc::from(settings.llm.get_advice_prompt()),
            static_dir: settings.static_dir.clone(),
            docs_dir: settings.docs_dir.clone(),
            trust_forwarded_for: settings.trust_forwarded_for,
        }
    }
}

/// Start the web server and run until Ctrl+C.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::advice::{FALLBACK_ETHICAL_CHECK, FALLBACK_REASONING, FALLBACK_SELF_REFLECTION};
    use crate::llm::LlmError;
    use crate::rate_limit::RateLimitConfig;
    use crate::repository::DbContext;

    /// Canned upstream that records how it was called.
    struct StubGateway {
        reply: Option<String>,
        calls: AtomicUsize,
        last_system: Mutex<Option<String>>,
    }

    impl StubGateway {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_system: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
                last_system: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionGateway for StubGateway {
        async fn complete(&self, system: Option<&str>, _user: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_system.lock().unwrap() = system.map(str::to_string);
            self.reply
                .clone()
                .ok_or_else(|| LlmError::Connection("upstream unreachable".to_string()))
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    const STRUCTURED_REPLY: &str = r#"{"advice":"Talk to your manager.","reasoning_path":"Direct conversation resolves most conflicts.","ethical_check":"No one is harmed.","self_reflection":"I lack context about the workplace."}"#;

    fn test_settings(dir: &std::path::Path) -> Settings {
        let static_dir = dir.join("static");
        let docs_dir = dir.join("docs");
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::create_dir_all(&docs_dir).unwrap();
        Settings {
            data_dir: dir.to_path_buf(),
            static_dir,
            docs_dir,
            ..Default::default()
        }
    }

    async fn setup_test_app_with(
        settings: Settings,
        gateway: Arc<StubGateway>,
    ) -> axum::Router {
        DbContext::from_url(&settings.database_url())
            .init_schema()
            .await
            .unwrap();
        let state = AppState::with_gateway(&settings, gateway);
        create_router(state)
    }

    async fn setup_test_app(
        gateway: Arc<StubGateway>,
    ) -> (axum::Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let app = setup_test_app_with(test_settings(dir.path()), gateway).await;
        (app, dir)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn ask_from(peer: &str, forwarded: Option<&str>) -> Request<Body> {
        let addr: SocketAddr = peer.parse().unwrap();
        let mut builder = Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .extension(ConnectInfo(addr));
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        builder
            .body(Body::from(json!({"message": "Should I quit?"}).to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_reply() {
        let gateway = StubGateway::replying("Hello back!");
        let (app, _dir) = setup_test_app(gateway.clone()).await;

        let response = app
            .oneshot(post_json("/chat", json!({"message": "Hello"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"reply": "Hello back!"}));
        assert_eq!(gateway.calls(), 1);
        assert!(gateway.last_system.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_message_never_reaches_upstream() {
        let gateway = StubGateway::replying("unused");
        let (app, _dir) = setup_test_app(gateway.clone()).await;

        for uri in ["/chat", "/ask"] {
            for body in [json!({"message": ""}), json!({"message": "   "}), json!({})] {
                let response = app.clone().oneshot(post_json(uri, body)).await.unwrap();
                assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
                let json = body_json(response).await;
                assert!(json["error"].is_string());
            }
        }
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let gateway = StubGateway::replying("unused");
        let (app, _dir) = setup_test_app(gateway.clone()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_with_detail() {
        let (app, _dir) = setup_test_app(StubGateway::failing()).await;

        let response = app
            .oneshot(post_json("/chat", json!({"message": "Hello"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("upstream unreachable"));
    }

    #[tokio::test]
    async fn test_ask_structured_reply_passes_through() {
        let gateway = StubGateway::replying(STRUCTURED_REPLY);
        let (app, _dir) = setup_test_app(gateway.clone()).await;

        let response = app.oneshot(ask_from("192.0.2.1:4000", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["advice"], "Talk to your manager.");
        assert_eq!(json["self_reflection"], "I lack context about the workplace.");

        let system = gateway.last_system.lock().unwrap().clone().unwrap();
        assert!(system.contains("reasoning_path"));
    }

    #[tokio::test]
    async fn test_ask_unstructured_reply_falls_back() {
        let gateway = StubGateway::replying("Just quit, honestly.");
        let (app, _dir) = setup_test_app(gateway).await;

        let response = app.oneshot(ask_from("192.0.2.1:4000", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["advice"], "Just quit, honestly.");
        assert_eq!(json["reasoning_path"], FALLBACK_REASONING);
        assert_eq!(json["ethical_check"], FALLBACK_ETHICAL_CHECK);
        assert_eq!(json["self_reflection"], FALLBACK_SELF_REFLECTION);
    }

    #[tokio::test]
    async fn test_ask_rate_limited_per_client() {
        let gateway = StubGateway::replying(STRUCTURED_REPLY);
        let (app, _dir) = setup_test_app(gateway.clone()).await;

        for _ in 0..10 {
            let response = app
                .clone()
                .oneshot(ask_from("192.0.2.1:4000", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(ask_from("192.0.2.1:4001", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = response
            .headers()
            .get(header::RETRY_AFTER)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=60).contains(&retry_after));
        assert!(body_json(response).await["error"].is_string());
        assert_eq!(gateway.calls(), 10);

        // Another client is unaffected
        let response = app
            .clone()
            .oneshot(ask_from("192.0.2.2:4000", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // /chat isn't rate limited
        let response = app
            .oneshot(post_json("/chat", json!({"message": "still there?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ask_uses_forwarded_for_when_trusted() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            trust_forwarded_for: true,
            rate_limit: RateLimitConfig {
                max_requests: 1,
                ..Default::default()
            },
            ..test_settings(dir.path())
        };
        let app = setup_test_app_with(settings, StubGateway::replying(STRUCTURED_REPLY)).await;

        // Same proxy peer, different forwarded clients
        let first = app
            .clone()
            .oneshot(ask_from("10.0.0.1:80", Some("203.0.113.1")))
            .await
            .unwrap();
        let second = app
            .clone()
            .oneshot(ask_from("10.0.0.1:80", Some("203.0.113.2")))
            .await
            .unwrap();
        let repeat = app
            .oneshot(ask_from("10.0.0.1:80", Some("203.0.113.1, 10.0.0.1")))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let (app, _dir) = setup_test_app(StubGateway::replying("unused")).await;

        let response = app.oneshot(get("/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "total_feedback": 0,
                "average_rating": 0.0,
                "positive_feedback": 0,
                "satisfaction_rate": 0.0
            })
        );
    }

    #[tokio::test]
    async fn test_feedback_then_stats() {
        let (app, _dir) = setup_test_app(StubGateway::replying("unused")).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/feedback",
                json!({"user_message": "x", "advisor_response": "y", "rating": 5, "comment": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["id"], 1);

        let response = app.oneshot(get("/stats")).await.unwrap();
        assert_eq!(
            body_json(response).await,
            json!({
                "total_feedback": 1,
                "average_rating": 5.0,
                "positive_feedback": 1,
                "satisfaction_rate": 100.0
            })
        );
    }

    #[tokio::test]
    async fn test_low_rating_not_positive() {
        let (app, _dir) = setup_test_app(StubGateway::replying("unused")).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/feedback",
                json!({"user_message": "x", "advisor_response": "y", "rating": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(app.oneshot(get("/stats")).await.unwrap()).await;
        assert_eq!(json["total_feedback"], 1);
        assert_eq!(json["positive_feedback"], 0);
        assert_eq!(json["satisfaction_rate"], 0.0);
    }

    #[tokio::test]
    async fn test_feedback_missing_rating_is_bad_request() {
        let (app, _dir) = setup_test_app(StubGateway::replying("unused")).await;

        let response = app
            .oneshot(post_json(
                "/feedback",
                json!({"user_message": "x", "advisor_response": "y"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            database_url: Some("/nonexistent/dir/advisor.db".to_string()),
            ..test_settings(dir.path())
        };
        let app = create_router(AppState::with_gateway(
            &settings,
            StubGateway::replying("unused"),
        ));

        let response = app.clone().oneshot(get("/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["error"].is_string());

        let response = app
            .oneshot(post_json(
                "/feedback",
                json!({"user_message": "x", "advisor_response": "y", "rating": 4}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_info_documents() {
        let dir = tempdir().unwrap();
        let settings = test_settings(dir.path());
        std::fs::write(
            settings.docs_dir.join("roadmap.json"),
            r#"{"phases": ["mvp", "beta"]}"#,
        )
        .unwrap();
        std::fs::write(settings.docs_dir.join("architecture.json"), "{broken").unwrap();
        let app = setup_test_app_with(settings, StubGateway::replying("unused")).await;

        let response = app.clone().oneshot(get("/roadmap")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"phases": ["mvp", "beta"]}));

        let response = app.clone().oneshot(get("/legal")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("legal.json"));

        let response = app.clone().oneshot(get("/architecture")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["error"].is_string());

        let response = app.oneshot(get("/user-stories")).await.unwrap();
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_health_degraded_when_files_missing() {
        let (app, _dir) = setup_test_app(StubGateway::replying("unused")).await;

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["database"], "connected");
        assert_eq!(json["api_version"], env!("CARGO_PKG_VERSION"));
        let missing = json["missing_files"].as_array().unwrap();
        assert_eq!(missing.len(), 5);
        assert!(missing.contains(&json!("index.html")));
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_health_healthy_when_files_present() {
        let dir = tempdir().unwrap();
        let settings = test_settings(dir.path());
        for name in [
            "roadmap.json",
            "user_stories.json",
            "architecture.json",
            "legal.json",
        ] {
            std::fs::write(settings.docs_dir.join(name), "{}").unwrap();
        }
        std::fs::write(settings.static_dir.join("index.html"), "<html></html>").unwrap();
        let app = setup_test_app_with(settings, StubGateway::replying("unused")).await;

        let json = body_json(app.oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["missing_files"], json!([]));
    }

    #[tokio::test]
    async fn test_health_unhealthy_when_database_unreachable() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            database_url: Some("/nonexistent/dir/advisor.db".to_string()),
            ..test_settings(dir.path())
        };
        let app = create_router(AppState::with_gateway(
            &settings,
            StubGateway::replying("unused"),
        ));

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["status"], "unhealthy");
        assert!(json["database"].as_str().unwrap().starts_with("error:"));
    }

    #[tokio::test]
    async fn test_api_info() {
        let (app, _dir) = setup_test_app(StubGateway::replying("unused")).await;

        let response = app.oneshot(get("/api/info")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["name"], "advisor");
        assert_eq!(json["model"], "stub-model");
        assert_eq!(json["rate_limits"]["/ask"]["max_requests"], 10);
        assert_eq!(json["rate_limits"]["/ask"]["window_seconds"], 60);
        assert!(json["endpoints"].as_array().unwrap().len() >= 10);
    }

    #[tokio::test]
    async fn test_index_missing_is_404_json() {
        let (app, _dir) = setup_test_app(StubGateway::replying("unused")).await;

        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_index_and_static_assets() {
        let dir = tempdir().unwrap();
        let settings = test_settings(dir.path());
        std::fs::write(settings.static_dir.join("index.html"), "<h1>Advisor</h1>").unwrap();
        std::fs::write(settings.static_dir.join("app.js"), "console.log(1);").unwrap();
        let app = setup_test_app_with(settings, StubGateway::replying("unused")).await;

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<h1>Advisor</h1>");

        let response = app.clone().oneshot(get("/static/app.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/static/missing.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
