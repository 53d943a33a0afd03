use crate::bootstrap::{DEFAULT_MODULE, bootstrap_script};
use crate::embed::EmbedSnippet;
use crate::preview::render_preview;
use crate::server::AppState;
use crate::widget::WidgetConfig;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "widget-loader",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Serve the loader entry script, preferring a `loader.js` shipped in the assets dir.
pub async fn serve_loader(State(state): State<AppState>) -> impl IntoResponse {
    let path = state.config.assets_dir.join("loader.js");
    let script = match tokio::fs::read_to_string(&path).await {
        Ok(script) => script,
        Err(_) => bootstrap_script(&format!("pkg/{DEFAULT_MODULE}")),
    };
    let mut resp = Response::new(script);
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/javascript"),
    );
    resp
}

pub async fn post_embed(
    State(state): State<AppState>,
    Json(config): Json<WidgetConfig>,
) -> impl IntoResponse {
    match EmbedSnippet::for_config(&state.config.loader_src(), &config) {
        Ok(snippet) => Json(snippet).into_response(),
        Err(err) => {
            tracing::warn!(%err, "embed snippet rejected");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub html: String,
    #[serde(default)]
    pub config: Option<WidgetConfig>,
}

pub async fn post_preview(Json(body): Json<PreviewRequest>) -> impl IntoResponse {
    match render_preview(&body.html, body.config) {
        Ok(html) => Html(html).into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}
