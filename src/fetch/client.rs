//! Result fetcher trait and `reqwest`-backed Giphy implementation.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::app::modes::SearchMode;
use crate::domain::{FetchError, GifscoutError, Page};
use crate::fetch::envelope::decode_page;
use crate::fetch::messages::FetchRequest;
use crate::Config;

/// Longest response body kept in a [`FetchError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Fetches one page of results for a request.
///
/// Implementations perform exactly one attempt: no retries, no caching.
pub trait ResultFetcher: Send + Sync {
    /// Fetch the page described by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, non-2xx status or a
    /// malformed envelope.
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> BoxFuture<'a, Result<Page, FetchError>>;
}

impl<T: ResultFetcher + ?Sized> ResultFetcher for Arc<T> {
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> BoxFuture<'a, Result<Page, FetchError>> {
        (**self).fetch(request)
    }
}

/// `reqwest`-backed fetcher for the Giphy v1 API.
#[derive(Debug, Clone)]
pub struct GiphyFetcher {
    base_url: String,
    api_key: String,
    rating: String,
    library: String,
    lang: Option<String>,
    http: Arc<reqwest::Client>,
}

impl GiphyFetcher {
    /// Creates a fetcher from the session configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GifscoutError::Fetch`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| GifscoutError::Fetch(FetchError::Network(e)))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            rating: config.rating.as_str().to_string(),
            library: config.library.as_str().to_string(),
            lang: config.lang.clone(),
            http: Arc::new(http),
        })
    }

    /// Full endpoint URL for a mode.
    #[must_use]
    pub fn endpoint(&self, mode: SearchMode) -> String {
        format!("{}/v1/{}/{}", self.base_url, self.library, mode.endpoint())
    }

    fn query_params(&self, request: &FetchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("limit", request.limit.to_string()),
            ("offset", request.offset.to_string()),
            ("rating", self.rating.clone()),
        ];
        if request.mode == SearchMode::Searching {
            params.push(("q", request.query.clone()));
            if let Some(lang) = &self.lang {
                params.push(("lang", lang.clone()));
            }
        }
        params
    }
}

impl ResultFetcher for GiphyFetcher {
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> BoxFuture<'a, Result<Page, FetchError>> {
        Box::pin(async move {
            let url = self.endpoint(request.mode);

            tracing::debug!(
                url = %url,
                offset = request.offset,
                limit = request.limit,
                "requesting page"
            );

            let response = self
                .http
                .get(&url)
                .query(&self.query_params(request))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let mut body = response.text().await.unwrap_or_default();
                if body.len() > MAX_ERROR_BODY {
                    let mut cut = MAX_ERROR_BODY;
                    while !body.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    body.truncate(cut);
                }
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let bytes = response.bytes().await?;
            let page = decode_page(&bytes, request.offset, request.limit)?;

            tracing::debug!(
                items = page.items.len(),
                total_available = page.total_available,
                "page decoded"
            );

            Ok(page)
        })
    }
}
