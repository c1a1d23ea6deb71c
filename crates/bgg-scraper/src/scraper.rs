//! Main scraper orchestrator.
//!
//! Resolves a designer or publisher by name, walks its catalog, and
//! aggregates the result into a report.

use crate::api::BggClient;
use crate::catalog::{fetch_catalog, CatalogQuery, LinkLookup, LinkTally};
use crate::stats::CatalogReport;
use anyhow::{anyhow, Context, Result};
use shared::config::BggConfig;
use shared::{Subject, SubjectKind};
use tracing::info;

/// Catalog scraper coordinator
pub struct CatalogScraper {
    client: BggClient,
    config: BggConfig,
    /// Tally every link of every game, not only the first
    all_links: bool,
}

impl CatalogScraper {
    /// Create a new scraper
    pub fn new(config: BggConfig) -> Result<Self> {
        let client = BggClient::new(&config).context("Failed to create BGG client")?;
        Ok(Self {
            client,
            config,
            all_links: false,
        })
    }

    /// Also report the most frequent value across all of each game's links
    pub fn with_all_links(mut self, all_links: bool) -> Self {
        self.all_links = all_links;
        self
    }

    /// Resolve a human name (or publisher slug) to a subject
    pub async fn resolve(&self, kind: SubjectKind, name: &str) -> Result<Subject> {
        let id = match kind {
            SubjectKind::Designer => self.client.find_designer_id(name).await,
            SubjectKind::Publisher => self.client.find_publisher_id(name).await,
        }
        .with_context(|| format!("Failed to look up {} '{}'", kind, name))?
        .ok_or_else(|| anyhow!("No {} found for '{}'", kind, name))?;

        info!(kind = %kind, name = %name, id = %id, "Resolved subject");
        Ok(Subject::new(kind, name, id))
    }

    /// Run the complete process for one subject
    ///
    /// 1. Name resolution
    /// 2. Catalog pagination with per-game collaborator lookup
    /// 3. Aggregation
    pub async fn run(&self, kind: SubjectKind, name: &str) -> Result<CatalogReport> {
        info!(kind = %kind, name = %name, "Phase 1: Resolving subject");
        let subject = self.resolve(kind, name).await?;

        info!(id = %subject.id, "Phase 2: Fetching catalog");
        let query = CatalogQuery::for_kind(kind, &self.config);
        let (games, links) = if self.all_links {
            let tally = LinkTally::collaborator_of(&self.client, kind);
            let games = fetch_catalog(&self.client, &query, &subject.id, &tally).await;
            (games, Some(tally.into_values()))
        } else {
            let lookup = LinkLookup::collaborator_of(&self.client, kind);
            let games = fetch_catalog(&self.client, &query, &subject.id, &lookup).await;
            (games, None)
        };
        let mut games =
            games.with_context(|| format!("Failed to fetch catalog of {} '{}'", kind, name))?;

        info!(games = games.len(), "Phase 3: Aggregating");
        let mut report = CatalogReport::build(subject, &mut games)
            .with_context(|| format!("Cannot report on {} '{}'", kind, name))?;
        if let Some(links) = links {
            report = report.with_link_tally(links);
        }

        info!(
            games = report.game_count,
            average_score = report.average_score,
            average_weight = report.average_weight,
            "Catalog scrape complete"
        );

        Ok(report)
    }
}
