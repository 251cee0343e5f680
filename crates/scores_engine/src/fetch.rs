//! Single-shot HTTP GET for scoreboard pages.

use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::redirect::Policy;
use scores_logging::scrape_debug;
use url::Url;

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.5";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Whole-request deadline, body included.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted as a page. A response without `Content-Type` is accepted.
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(90),
            redirect_limit: 5,
            max_bytes: 8 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// A single HTTP GET with no retry logic. Retries live in [`crate::RequestClient`].
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// reqwest-backed fetcher. One client, and so one connection pool, serves a whole run.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    max_bytes: u64,
    allowed_content_types: Vec<String>,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .redirect(Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
            allowed_content_types: settings.allowed_content_types,
        })
    }

    fn check_media_type(&self, content_type: Option<&str>) -> Result<(), FetchError> {
        let Some(raw) = content_type else {
            return Ok(());
        };
        let media = media_type(raw);
        if self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media))
        {
            return Ok(());
        }
        Err(FetchError::new(
            FailureKind::UnsupportedContentType {
                content_type: media.to_string(),
            },
            "not an HTML page",
        ))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes {
                return Err(too_large(self.max_bytes, declared));
            }
        }

        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(classify)?;
            let received = (body.len() + chunk.len()) as u64;
            if received > self.max_bytes {
                return Err(too_large(self.max_bytes, received));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let target =
            Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let requested = target.to_string();
        let started = Instant::now();

        let response = self.client.get(target).send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.check_media_type(content_type.as_deref())?;

        let final_url = response.url().to_string();
        let bytes = self.read_body(response).await?;
        let elapsed = started.elapsed();
        scrape_debug!(
            "GET {} -> {} ({} bytes, {} ms)",
            url,
            status.as_u16(),
            bytes.len(),
            elapsed.as_millis()
        );

        Ok(FetchOutput {
            bytes,
            metadata: FetchMetadata {
                url: requested,
                final_url,
                status: status.as_u16(),
                content_type,
                elapsed,
            },
        })
    }
}

/// `text/html; charset=utf-8` -> `text/html`
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response body over limit",
    )
}

fn classify(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
