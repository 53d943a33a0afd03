use crate::api;
use crate::config::{AppConfig, CorsOrigins};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let pkg = ServeDir::new(state.config.assets_dir.clone());
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/embed", post(api::post_embed))
        .route("/api/preview", post(api::post_preview))
        .route("/widget/loader.js", get(api::serve_loader))
        .nest_service("/widget/pkg", pkg)
        .layer(cors_layer(&state.config.cors_origins))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => AllowOrigin::list(
            list.iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        ),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub async fn run(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn state_with_assets(dir: &std::path::Path) -> AppState {
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.assets_dir = dir.to_path_buf();
        AppState::new(config)
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_service() {
        let dir = tempfile::tempdir().unwrap();
        let resp = router(state_with_assets(dir.path()))
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "widget-loader");
    }

    #[tokio::test]
    async fn serves_bootstrap_loader_without_override() {
        let dir = tempfile::tempdir().unwrap();
        let resp = router(state_with_assets(dir.path()))
            .oneshot(Request::get("/widget/loader.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
        let script = body_string(resp).await;
        assert!(script.contains("pkg/widget_loader.js"));
    }

    #[tokio::test]
    async fn prefers_loader_override_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("loader.js"), "// custom loader").unwrap();
        let resp = router(state_with_assets(dir.path()))
            .oneshot(Request::get("/widget/loader.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_string(resp).await, "// custom loader");
    }

    #[tokio::test]
    async fn serves_wasm_package_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("widget_loader.js"), "export default 1;").unwrap();
        let resp = router(state_with_assets(dir.path()))
            .oneshot(
                Request::get("/widget/pkg/widget_loader.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "export default 1;");
    }

    #[tokio::test]
    async fn embed_returns_both_snippets() {
        let dir = tempfile::tempdir().unwrap();
        let resp = router(state_with_assets(dir.path()))
            .oneshot(json_post(
                "/api/embed",
                serde_json::json!({"botId": "b1", "apiKey": "k1"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        let programmatic = body["programmatic"].as_str().unwrap();
        assert!(programmatic.contains("/widget/loader.js"));
        assert!(programmatic.contains("ChatWidget.init("));
        assert!(body["declarative"].as_str().unwrap().contains("data-chat-widget"));
    }

    #[tokio::test]
    async fn embed_rejects_missing_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let resp = router(state_with_assets(dir.path()))
            .oneshot(json_post("/api/embed", serde_json::json!({"botId": "b1"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, "apiKey is required");
    }

    #[tokio::test]
    async fn preview_injects_widget_container() {
        let dir = tempfile::tempdir().unwrap();
        let resp = router(state_with_assets(dir.path()))
            .oneshot(json_post(
                "/api/preview",
                serde_json::json!({
                    "html": "<html><body><p>host</p></body></html>",
                    "config": {"botId": "b1", "apiKey": "k1"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("id=\"chat-widget-root\""));
        assert!(html.contains("<p>host</p>"));

        let shadow = html
            .split_once("<template shadowrootmode=\"open\">")
            .and_then(|(_, rest)| rest.split_once("</template>"))
            .map(|(inner, _)| inner)
            .unwrap();
        assert!(shadow.contains("box-sizing: border-box"));
        assert!(shadow.contains("class=\"chat-launcher\""));
    }

    #[tokio::test]
    async fn preview_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let resp = router(state_with_assets(dir.path()))
            .oneshot(json_post(
                "/api/preview",
                serde_json::json!({
                    "html": "<html><body></body></html>",
                    "config": {"botId": "", "apiKey": "k1"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
