//! Paginated catalog retrieval.
//!
//! Walks the linked-items endpoint page by page for one subject. The page
//! index starts at 1 and advances only after a page has been fetched and
//! every item on it enriched; the first empty page ends the walk. Rate
//! limiting is absorbed by the client, which retries the same page.

use crate::api::retry::RetryPolicy;
use crate::api::xml::LinkKind;
use crate::api::BggClient;
use crate::error::Result;
use async_trait::async_trait;
use shared::config::{BggConfig, CatalogConfig};
use shared::{GameRecord, SubjectKind};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Fixed parameters of one linked-items query
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub linkdata_index: &'static str,
    pub objecttype: &'static str,
    pub subtype: &'static str,
    pub nosession: bool,
    /// Items per page (`showcount`)
    pub page_size: u32,
    pub sort: String,
    /// Policy applied when a page request is rate limited
    pub retry: RetryPolicy,
}

impl CatalogQuery {
    /// Games designed by a person
    pub fn designer(catalog: &CatalogConfig, retry: RetryPolicy) -> Self {
        Self {
            linkdata_index: "boardgamedesigner",
            objecttype: "person",
            subtype: "boardgame",
            nosession: false,
            page_size: catalog.page_size,
            sort: catalog.sort.clone(),
            retry,
        }
    }

    /// Games released by a company
    pub fn publisher(catalog: &CatalogConfig, retry: RetryPolicy) -> Self {
        Self {
            linkdata_index: "boardgame",
            objecttype: "company",
            subtype: "boardgamepublisher",
            nosession: true,
            page_size: catalog.page_size,
            sort: catalog.sort.clone(),
            retry,
        }
    }

    /// Query for `kind` using the configured page size, sort and retry delay
    pub fn for_kind(kind: SubjectKind, config: &BggConfig) -> Self {
        match kind {
            SubjectKind::Designer => Self::designer(
                &config.designer_catalog,
                RetryPolicy::for_catalog(&config.retry, &config.designer_catalog),
            ),
            SubjectKind::Publisher => Self::publisher(
                &config.publisher_catalog,
                RetryPolicy::for_catalog(&config.retry, &config.publisher_catalog),
            ),
        }
    }

    /// Query string for one page
    pub fn params(&self, subject_id: &str, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("ajax", "1".to_string()),
            ("linkdata_index", self.linkdata_index.to_string()),
        ];
        if self.nosession {
            params.push(("nosession", "1".to_string()));
        }
        params.extend([
            ("objectid", subject_id.to_string()),
            ("objecttype", self.objecttype.to_string()),
            ("pageid", page.to_string()),
            ("showcount", self.page_size.to_string()),
            ("sort", self.sort.clone()),
            ("subtype", self.subtype.to_string()),
        ]);
        params
    }
}

/// Per-game lookup of a field the linked-items listing does not carry
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, game_id: &str) -> Result<Option<String>>;
}

/// Looks up a game's primary publisher or designer through the XML API
pub struct LinkLookup<'a> {
    client: &'a BggClient,
    kind: LinkKind,
}

impl<'a> LinkLookup<'a> {
    pub fn new(client: &'a BggClient, kind: LinkKind) -> Self {
        Self { client, kind }
    }

    /// The lookup that fills in the collaborator for a `subject` catalog
    pub fn collaborator_of(client: &'a BggClient, subject: SubjectKind) -> Self {
        let kind = match subject {
            SubjectKind::Designer => LinkKind::Publisher,
            SubjectKind::Publisher => LinkKind::Designer,
        };
        Self::new(client, kind)
    }
}

#[async_trait]
impl<'a> Enricher for LinkLookup<'a> {
    async fn enrich(&self, game_id: &str) -> Result<Option<String>> {
        self.client.game_link(game_id, self.kind).await
    }
}

/// Like [`LinkLookup`], but also keeps every link value seen
///
/// A game with three publishers contributes all three to the tally while
/// its first publisher is still what lands in `collaborator`.
pub struct LinkTally<'a> {
    client: &'a BggClient,
    kind: LinkKind,
    seen: Mutex<Vec<String>>,
}

impl<'a> LinkTally<'a> {
    pub fn collaborator_of(client: &'a BggClient, subject: SubjectKind) -> Self {
        let LinkLookup { client, kind } = LinkLookup::collaborator_of(client, subject);
        Self {
            client,
            kind,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Every link value collected so far, in fetch order
    pub fn into_values(self) -> Vec<String> {
        self.seen.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<'a> Enricher for LinkTally<'a> {
    async fn enrich(&self, game_id: &str) -> Result<Option<String>> {
        let links = self.client.game_links(game_id, self.kind).await?;
        let first = links.first().cloned();
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(links);
        Ok(first)
    }
}

/// Enricher backed by a fixed table; unknown games resolve to `None`
#[derive(Debug, Clone, Default)]
pub struct StaticEnricher(pub HashMap<String, String>);

#[async_trait]
impl Enricher for StaticEnricher {
    async fn enrich(&self, game_id: &str) -> Result<Option<String>> {
        Ok(self.0.get(game_id).cloned())
    }
}

/// Enricher that never looks anything up
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

#[async_trait]
impl Enricher for NoEnrichment {
    async fn enrich(&self, _game_id: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Fetch a subject's complete catalog in server order
///
/// Fails without returning partial data on the first non-rate-limit error,
/// including enrichment failures.
pub async fn fetch_catalog<E: Enricher + ?Sized>(
    client: &BggClient,
    query: &CatalogQuery,
    subject_id: &str,
    enricher: &E,
) -> Result<Vec<GameRecord>> {
    let mut games = Vec::new();
    let mut page = 1u32;

    loop {
        let response = client.linked_items(query, subject_id, page).await?;
        if response.items.is_empty() {
            break;
        }

        let page_len = response.items.len();
        for item in response.items {
            info!(bgg_id = %item.objectid, title = %item.name, "Fetched game");
            let collaborator = enricher.enrich(&item.objectid).await?;
            games.push(item.into_record(collaborator));
        }

        info!(page = page, items = page_len, total = games.len(), "Catalog page complete");
        page += 1;
    }

    info!(
        subject_id = %subject_id,
        pages = page - 1,
        games = games.len(),
        "Catalog complete"
    );

    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_designer_params() {
        let config = BggConfig::default();
        let query = CatalogQuery::designer(
            &config.designer_catalog,
            RetryPolicy::for_catalog(&config.retry, &config.designer_catalog),
        );
        let params: HashMap<_, _> = query.params("2", 3).into_iter().collect();

        assert_eq!(params["linkdata_index"], "boardgamedesigner");
        assert_eq!(params["objectid"], "2");
        assert_eq!(params["objecttype"], "person");
        assert_eq!(params["pageid"], "3");
        assert_eq!(params["showcount"], "50");
        assert_eq!(params["sort"], "name");
        assert_eq!(params["subtype"], "boardgame");
        assert!(!params.contains_key("nosession"));
        assert_eq!(query.retry.delay, Duration::from_secs(30));
    }

    #[test]
    fn test_publisher_params() {
        let config = BggConfig::default();
        let query = CatalogQuery::for_kind(SubjectKind::Publisher, &config);
        let params: HashMap<_, _> = query.params("45230", 1).into_iter().collect();

        assert_eq!(params["linkdata_index"], "boardgame");
        assert_eq!(params["objecttype"], "company");
        assert_eq!(params["subtype"], "boardgamepublisher");
        assert_eq!(params["showcount"], "1000");
        assert_eq!(params["nosession"], "1");
        assert_eq!(query.retry.delay, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_static_enricher() {
        let enricher = StaticEnricher(HashMap::from([("13".to_string(), "KOSMOS".to_string())]));
        assert_eq!(enricher.enrich("13").await.unwrap().as_deref(), Some("KOSMOS"));
        assert_eq!(enricher.enrich("14").await.unwrap(), None);
        assert_eq!(NoEnrichment.enrich("13").await.unwrap(), None);
    }
}
