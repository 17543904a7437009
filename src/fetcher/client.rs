use crate::config::FetchSettings;
use crate::extractor::{ArticleRecord, Extractor};
use crate::fetcher::{
    errors::{ClientBuildError, FetchError},
    pipeline::process_response,
    types::PageResponse,
};
use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, ClientBuilder, Proxy};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "zh-CN,zh;q=0.9,en;q=0.8";
const REFERER_VALUE: &str = "https://mp.weixin.qq.com/";

/// Anything that can turn a link into an [`ArticleRecord`].
///
/// Implementations never fail: problems are recorded in the returned
/// record's status so one bad link cannot stop a batch.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_article(&self, url: &str) -> ArticleRecord;
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(REFERER, HeaderValue::from_static(REFERER_VALUE));
    headers
}

fn proxy_error(url: &str, err: reqwest::Error) -> ClientBuildError {
    ClientBuildError::Proxy {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

/// HTTP client for article pages, built once from [`FetchSettings`].
pub struct ArticleClient {
    http: Client,
    extractor: Extractor,
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl ArticleClient {
    pub fn new(settings: &FetchSettings) -> Result<Self, ClientBuildError> {
        let mut builder = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT.min(settings.timeout))
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers(browser_headers());

        if let Some(url) = &settings.http_proxy {
            builder = builder.proxy(Proxy::http(url.as_str()).map_err(|e| proxy_error(url, e))?);
        }
        if let Some(url) = &settings.https_proxy {
            builder = builder.proxy(Proxy::https(url.as_str()).map_err(|e| proxy_error(url, e))?);
        }

        Ok(Self {
            http: builder.build()?,
            extractor: Extractor::from_settings(settings)?,
            delay_min_ms: settings.delay_min_ms,
            delay_max_ms: settings.delay_max_ms,
        })
    }

    fn throttle_delay(&self) -> Duration {
        if self.delay_max_ms == 0 || self.delay_min_ms >= self.delay_max_ms {
            return Duration::from_millis(self.delay_min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.delay_min_ms..=self.delay_max_ms);
        Duration::from_millis(ms)
    }

    /// Download one page and decode it. Any HTTP status is accepted.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = url::Url::parse(url)?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(parsed_url.scheme().to_string()));
        }

        let response = self
            .http
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();
        if !status.is_success() {
            // Challenge pages do not always come back as 200; let extraction decide.
            debug!(%status, "non-success status");
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let body_bytes = response
            .bytes()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check body size after download (in case Content-Length was missing)
        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        process_response(final_url, status, &body_bytes, &content_type)
    }
}

#[async_trait]
impl ArticleSource for ArticleClient {
    async fn fetch_article(&self, url: &str) -> ArticleRecord {
        let delay = self.throttle_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.fetch_page(url).await {
            Ok(page) => {
                let record = self.extractor.extract(url, &page.body_utf8);
                info!(
                    url = %url,
                    status = ?record.status,
                    http_status = %page.status,
                    charset = ?page.charset,
                    body_chars = record.body_text.chars().count(),
                    "article fetched"
                );
                record
            }
            Err(e) => {
                warn!(url = %url, error = %e, "article fetch failed");
                self.extractor.failure(url, &e.to_string())
            }
        }
    }
}
