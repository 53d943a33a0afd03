use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

/// Runtime configuration for the widget host.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// wasm-bindgen output directory, served under `/widget/pkg`.
    pub assets_dir: PathBuf,
    /// Public origin the loader is reachable at; embed snippets use relative urls without it.
    pub public_url: Option<Url>,
    pub cors_origins: CorsOrigins,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(raw: &str) -> Self {
        if raw.trim() == "*" {
            return Self::Any;
        }
        Self::List(
            raw.split(',')
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr: SocketAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("failed to parse BIND_ADDR")?;

        let assets_dir =
            PathBuf::from(lookup("WIDGET_ASSETS_DIR").unwrap_or_else(|| "widget/dist".to_string()));

        let public_url = lookup("PUBLIC_URL")
            .filter(|v| !v.is_empty())
            .map(|v| Url::parse(&v))
            .transpose()
            .context("failed to parse PUBLIC_URL")?;

        let cors_origins = CorsOrigins::parse(&lookup("CORS_ORIGINS").unwrap_or_else(|| "*".into()));

        Ok(Self {
            bind_addr,
            assets_dir,
            public_url,
            cors_origins,
        })
    }

    /// Url host pages load the loader script from.
    pub fn loader_src(&self) -> String {
        match &self.public_url {
            Some(base) => base
                .join("widget/loader.js")
                .map(|u| u.to_string())
                .unwrap_or_else(|_| "/widget/loader.js".to_string()),
            None => "/widget/loader.js".to_string(),
        }
    }
}
