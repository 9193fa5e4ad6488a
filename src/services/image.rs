//! Best-effort image lookup for a new dish.
//!
//! Steps run in a fixed order and the first one that yields a URL wins. Every
//! step other than the last may fail; failures are logged and the next step
//! runs. The stock-photo step always produces a URL.

use std::time::Duration;

use rand::Rng;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::services::metrics::IMAGE_RESOLUTIONS_COUNTER;

/// Shown by the display layer when a resolved image fails to load.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://loremflickr.com/500/500/food,meal";

const CRAWLER_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Hosts that answer plain fetches with login walls or bot blocks.
const SCRAPE_DENYLIST: &[&str] = &["tiktok.com", "instagram.com", "facebook.com"];

const STOCK_KEYWORD: &str = "food";

lazy_static::lazy_static! {
    static ref VIDEO_ID: Regex = Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#
    ).unwrap();
    static ref OG_IMAGE: Regex = Regex::new(
        r#"(?i)<meta\s+property=["']og:image["']\s+content=["'](.*?)["']"#
    ).unwrap();
    static ref OG_IMAGE_CONTENT_FIRST: Regex = Regex::new(
        r#"(?i)<meta\s+content=["'](.*?)["']\s+property=["']og:image["']"#
    ).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Supplied,
    VideoThumbnail,
    PageMeta,
    ImageSearch,
    StockPhoto,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Supplied => "supplied",
            ImageSource::VideoThumbnail => "video_thumbnail",
            ImageSource::PageMeta => "page_meta",
            ImageSource::ImageSearch => "image_search",
            ImageSource::StockPhoto => "stock_photo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub source: ImageSource,
}

#[derive(Debug, Clone)]
pub struct SearchCredentials {
    pub api_key: String,
    pub cx: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: Option<String>,
}

pub struct ImageResolver {
    client: Client,
    search: Option<SearchCredentials>,
    search_endpoint: String,
}

impl ImageResolver {
    pub fn new(timeout: Duration, search: Option<SearchCredentials>, search_endpoint: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(CRAWLER_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            search,
            search_endpoint,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let search = match (&config.google_api_key, &config.google_search_cx) {
            (Some(api_key), Some(cx)) => Some(SearchCredentials {
                api_key: api_key.clone(),
                cx: cx.clone(),
            }),
            _ => None,
        };
        Self::new(
            Duration::from_secs(config.image_fetch_timeout_secs),
            search,
            config.image_search_endpoint.clone(),
        )
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub async fn resolve(&self, name: &str, link: Option<&str>, supplied: Option<&str>) -> ResolvedImage {
        let resolved = self.run_chain(name, link, supplied).await;
        IMAGE_RESOLUTIONS_COUNTER
            .with_label_values(&[resolved.source.as_str()])
            .inc();
        tracing::debug!(source = resolved.source.as_str(), url = %resolved.url, "image resolved");
        resolved
    }

    async fn run_chain(&self, name: &str, link: Option<&str>, supplied: Option<&str>) -> ResolvedImage {
        if let Some(url) = supplied.map(str::trim).filter(|s| !s.is_empty()) {
            return ResolvedImage {
                url: url.to_string(),
                source: ImageSource::Supplied,
            };
        }

        if let Some(link) = link.map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(url) = video_thumbnail(link) {
                return ResolvedImage {
                    url,
                    source: ImageSource::VideoThumbnail,
                };
            }

            if is_scrapable(link) {
                match self.fetch_page_image(link).await {
                    Ok(Some(url)) => {
                        return ResolvedImage {
                            url,
                            source: ImageSource::PageMeta,
                        }
                    }
                    Ok(None) => tracing::debug!("No og:image on {}", link),
                    Err(e) => tracing::warn!("Failed to fetch link preview for {}: {}", link, e),
                }
            }
        }

        if let Some(credentials) = &self.search {
            match self.search_image(name, credentials).await {
                Ok(Some(url)) => {
                    return ResolvedImage {
                        url,
                        source: ImageSource::ImageSearch,
                    }
                }
                Ok(None) => tracing::debug!("Image search returned no result for {:?}", name),
                Err(e) => tracing::warn!("Image search failed: {}", e),
            }
        }

        let cache_buster = rand::thread_rng().gen_range(0..10_000);
        ResolvedImage {
            url: stock_photo_url(name, cache_buster),
            source: ImageSource::StockPhoto,
        }
    }

    async fn fetch_page_image(&self, link: &str) -> anyhow::Result<Option<String>> {
        let html = self
            .client
            .get(link)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(extract_og_image(&html))
    }

    async fn search_image(&self, name: &str, credentials: &SearchCredentials) -> anyhow::Result<Option<String>> {
        let query = format!("{name} food meal recipe high resolution");
        let response = self
            .client
            .get(&self.search_endpoint)
            .query(&[
                ("q", query.as_str()),
                ("cx", credentials.cx.as_str()),
                ("key", credentials.api_key.as_str()),
                ("searchType", "image"),
                ("num", "1"),
                ("imgSize", "medium"),
                ("safe", "active"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;

        Ok(response
            .items
            .into_iter()
            .find_map(|item| item.link.filter(|l| !l.is_empty())))
    }
}

/// Thumbnail URL for a recognised video link.
pub fn video_thumbnail(link: &str) -> Option<String> {
    VIDEO_ID
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|id| format!("https://img.youtube.com/vi/{}/mqdefault.jpg", id.as_str()))
}

/// Whether the link points at a parseable URL outside the denylist.
pub fn is_scrapable(link: &str) -> bool {
    let host = match Url::parse(link) {
        Ok(url) => match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        },
        Err(_) => return false,
    };
    !SCRAPE_DENYLIST
        .iter()
        .any(|blocked| host == *blocked || host.ends_with(&format!(".{blocked}")))
}

pub fn extract_og_image(html: &str) -> Option<String> {
    OG_IMAGE
        .captures(html)
        .or_else(|| OG_IMAGE_CONTENT_FIRST.captures(html))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Stock photo keyed on the first word of the dish name, letters only.
pub fn stock_photo_url(name: &str, cache_buster: u32) -> String {
    let word: String = name
        .split(' ')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    let tags = if word.is_empty() {
        STOCK_KEYWORD.to_string()
    } else {
        format!("{},{STOCK_KEYWORD}", urlencoding::encode(&word))
    };
    format!("https://loremflickr.com/500/500/{tags}?random={cache_buster}")
}
