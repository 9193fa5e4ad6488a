use std::env;

pub const DEFAULT_IMAGE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// HS256 secret shared with the identity provider that signs session tokens.
    pub auth_secret: String,
    pub host: String,
    pub port: u16,
    pub app_base_url: String,
    // Image search (optional, both required for the search step)
    pub google_api_key: Option<String>,
    pub google_search_cx: Option<String>,
    pub image_search_endpoint: String,
    pub image_fetch_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".into())
                .parse()?,
            auth_secret: required("AUTH_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost".into()),
            google_api_key: env::var("GOOGLE_API_KEY").ok().filter(|s| !s.is_empty()),
            google_search_cx: env::var("GOOGLE_SEARCH_CX").ok().filter(|s| !s.is_empty()),
            image_search_endpoint: env::var("IMAGE_SEARCH_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_IMAGE_SEARCH_ENDPOINT.into()),
            image_fetch_timeout_secs: env::var("IMAGE_FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".into())
                .parse()?,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
