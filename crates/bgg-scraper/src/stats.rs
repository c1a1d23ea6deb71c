//! Catalog statistics.
//!
//! Pure functions over an already fetched catalog; nothing here touches
//! the network.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{GameRecord, Subject};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("Catalog is empty, nothing to aggregate")]
    EmptyCatalog,
}

/// Stable ascending sort by publication year
pub fn sort_by_year(games: &mut [GameRecord]) {
    games.sort_by_key(|game| game.year);
}

/// First and last game of a slice already sorted by year
pub fn chronological_extremes(games: &[GameRecord]) -> Option<(&GameRecord, &GameRecord)> {
    Some((games.first()?, games.last()?))
}

/// Arithmetic mean of `field` across all games
pub fn average<F>(games: &[GameRecord], field: F) -> Result<f64, StatsError>
where
    F: Fn(&GameRecord) -> f64,
{
    if games.is_empty() {
        return Err(StatsError::EmptyCatalog);
    }
    let sum: f64 = games.iter().map(field).sum();
    Ok(sum / games.len() as f64)
}

/// Most frequent value and its count
///
/// Ties go to the value seen first.
pub fn most_common<T, I>(values: I) -> Option<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut order = Vec::new();

    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for value in order {
        let count = counts[&value];
        if best.as_ref().map_or(true, |(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best
}

/// A game as shown in a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub title: String,
    pub year: i32,
}

impl From<&GameRecord> for GameSummary {
    fn from(game: &GameRecord) -> Self {
        Self {
            title: game.title.clone(),
            year: game.year,
        }
    }
}

/// Most frequent collaborator; `name` is `None` when lookups found nothing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collaborator {
    pub name: Option<String>,
    pub games: usize,
}

/// Aggregate view of a designer's or publisher's catalog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub subject: Subject,
    pub game_count: usize,
    pub first_game: GameSummary,
    pub last_game: GameSummary,
    pub average_score: f64,
    pub average_weight: f64,
    pub top_collaborator: Collaborator,
    /// Most frequent value across every link of every game, when tallied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_linked: Option<Collaborator>,
    pub generated_at: DateTime<Utc>,
}

impl CatalogReport {
    /// Sort `games` by year and aggregate them
    pub fn build(subject: Subject, games: &mut [GameRecord]) -> Result<Self, StatsError> {
        sort_by_year(games);

        let (first, last) = chronological_extremes(games).ok_or(StatsError::EmptyCatalog)?;
        let average_score = average(games, |g| g.average_score)?;
        let average_weight = average(games, |g| g.average_weight)?;
        let (name, count) = most_common(games.iter().map(|g| g.collaborator.clone()))
            .ok_or(StatsError::EmptyCatalog)?;

        Ok(Self {
            subject,
            game_count: games.len(),
            first_game: first.into(),
            last_game: last.into(),
            average_score,
            average_weight,
            top_collaborator: Collaborator { name, games: count },
            top_linked: None,
            generated_at: Utc::now(),
        })
    }

    /// Add the most frequent value among all links, not just each game's first
    pub fn with_link_tally(mut self, links: Vec<String>) -> Self {
        self.top_linked = most_common(links).map(|(name, games)| Collaborator {
            name: Some(name),
            games,
        });
        self
    }
}

impl std::fmt::Display for CatalogReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = &self.subject.name;
        let kind = self.subject.kind;

        writeln!(f, "'{}' bgg {} id is: {}", name, kind, self.subject.id)?;
        writeln!(f, "'{}' has {} games", name, self.game_count)?;
        writeln!(
            f,
            "'{}' first game was {}, published in {}",
            name, self.first_game.title, self.first_game.year
        )?;
        writeln!(
            f,
            "'{}' last game is {}, published in {}",
            name, self.last_game.title, self.last_game.year
        )?;
        writeln!(f, "'{}' average score is {}", name, self.average_score)?;
        writeln!(f, "'{}' average weight is {}", name, self.average_weight)?;
        write!(
            f,
            "The {} with the most games for {} is {} with {} games.",
            kind.collaborator_label(),
            name,
            self.top_collaborator.name.as_deref().unwrap_or("unknown"),
            self.top_collaborator.games
        )?;
        if let Some(linked) = &self.top_linked {
            write!(
                f,
                "\nCounting every {} link, the most frequent is {} with {} games.",
                kind.collaborator_label(),
                linked.name.as_deref().unwrap_or("unknown"),
                linked.games
            )?;
        }
        Ok(())
    }
}
