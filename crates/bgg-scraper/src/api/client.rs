//! BoardGameGeek client with request pacing and 429 retry.

use super::html;
use super::rate_limiter::RateLimiter;
use super::retry::RetryPolicy;
use super::types::LinkedItemsResponse;
use super::xml::{self, LinkKind};
use crate::catalog::CatalogQuery;
use crate::error::{FetchError, Result};
use reqwest::{Client, Response, StatusCode};
use shared::config::BggConfig;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// BoardGameGeek API and website client
pub struct BggClient {
    /// HTTP client
    client: Client,
    /// XML API v2 root
    xml_api_url: String,
    /// geekdo JSON API root
    geekitem_api_url: String,
    /// Publisher directory listing
    publisher_directory_url: String,
    /// Directory pages scanned when resolving a publisher
    publisher_directory_pages: u32,
    /// Proactive pacing
    rate_limiter: RateLimiter,
    /// Retry policy for single-item lookups
    lookup_retry: RetryPolicy,
}

impl BggClient {
    /// Create a new client from configuration
    pub fn new(config: &BggConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            xml_api_url: trim_base(&config.xml_api_url),
            geekitem_api_url: trim_base(&config.geekitem_api_url),
            publisher_directory_url: trim_base(&config.publisher_directory_url),
            publisher_directory_pages: config.publisher_directory_pages.max(1),
            rate_limiter: RateLimiter::new(config.requests_per_second),
            lookup_retry: RetryPolicy::for_lookups(&config.retry),
        })
    }

    /// GET a URL, waiting and retrying the identical request on 429
    ///
    /// Any other non-success status is returned as [`FetchError::Status`]
    /// without retrying.
    pub async fn get_with_rate_limit(
        &self,
        url: &str,
        query: &[(&str, String)],
        policy: &RetryPolicy,
    ) -> Result<Response> {
        let mut retries = 0u32;

        loop {
            self.rate_limiter.acquire().await;

            debug!(url = %url, attempt = retries + 1, "Making request");

            let response = self.client.get(url).query(query).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status != StatusCode::TOO_MANY_REQUESTS {
                warn!(url = %url, status = %status, "Request failed");
                return Err(FetchError::Status {
                    status,
                    url: url.to_string(),
                });
            }

            if !policy.allows_retry(retries) {
                return Err(FetchError::RateLimited {
                    url: url.to_string(),
                    attempts: retries + 1,
                });
            }

            let delay = policy.delay_for(retries);
            warn!(
                url = %url,
                delay_ms = delay.as_millis() as u64,
                retries = retries,
                "Rate limit exceeded, waiting"
            );
            sleep(delay).await;
            retries += 1;
        }
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self.get_with_rate_limit(url, query, &self.lookup_retry).await?;
        Ok(response.text().await?)
    }

    /// Resolve a designer name to its ID via the XML search API
    pub async fn find_designer_id(&self, name: &str) -> Result<Option<String>> {
        info!(name = %name, "Searching for designer");
        let url = format!("{}/search", self.xml_api_url);
        let body = self
            .get_text(
                &url,
                &[
                    ("query", name.to_string()),
                    ("type", "boardgamedesigner".to_string()),
                ],
            )
            .await?;
        xml::first_item_id(&body)
    }

    /// Resolve a publisher slug to its ID by scanning the directory listing
    pub async fn find_publisher_id(&self, slug: &str) -> Result<Option<String>> {
        for page in 1..=self.publisher_directory_pages {
            info!(slug = %slug, page = page, "Scanning publisher directory");
            let url = format!("{}/page/{}", self.publisher_directory_url, page);
            let body = self.get_text(&url, &[]).await?;

            if let Some(id) = html::find_publisher_id(&body, slug)? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// All links of `kind` on a game, in document order
    pub async fn game_links(&self, game_id: &str, kind: LinkKind) -> Result<Vec<String>> {
        debug!(game_id = %game_id, link = kind.as_str(), "Fetching game links");
        let url = format!("{}/thing", self.xml_api_url);
        let body = self
            .get_text(
                &url,
                &[("id", game_id.to_string()), ("type", "boardgame".to_string())],
            )
            .await?;
        xml::first_item_links(&body, kind)
    }

    /// First link of `kind` on a game (its primary publisher or designer)
    pub async fn game_link(&self, game_id: &str, kind: LinkKind) -> Result<Option<String>> {
        Ok(self.game_links(game_id, kind).await?.into_iter().next())
    }

    /// Fetch one page of a subject's linked items
    pub async fn linked_items(
        &self,
        query: &CatalogQuery,
        subject_id: &str,
        page: u32,
    ) -> Result<LinkedItemsResponse> {
        info!(subject_id = %subject_id, page = page, "Fetching catalog page");
        let url = format!("{}/linkeditems", self.geekitem_api_url);
        let response = self
            .get_with_rate_limit(&url, &query.params(subject_id, page), &query.retry)
            .await?;

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BggClient::new(&BggConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_urls_are_normalized() {
        let config = BggConfig {
            xml_api_url: "http://localhost:9000/xmlapi2/".to_string(),
            publisher_directory_pages: 0,
            ..Default::default()
        };
        let client = BggClient::new(&config).unwrap();
        assert_eq!(client.xml_api_url, "http://localhost:9000/xmlapi2");
        assert_eq!(client.publisher_directory_pages, 1);
    }
}
