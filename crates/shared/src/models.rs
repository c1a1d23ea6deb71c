//! Data models for the project.
//!
//! This module defines the records produced while walking a designer's or
//! publisher's catalog, and the subject those catalogs belong to.

use serde::{Deserialize, Serialize};

/// One game from a designer's or publisher's catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub title: String,
    pub year: i32,
    pub average_score: f64,
    pub average_weight: f64,
    /// Publisher for a designer's catalog, designer for a publisher's
    pub collaborator: Option<String>,
    pub bgg_id: String,
    pub rank: Rank,
}

/// BoardGameGeek overall rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Ranked(u32),
    NotAvailable,
}

impl Rank {
    /// Interpret a raw rank value; zero means the game is not ranked
    pub fn from_raw(raw: Option<u32>) -> Self {
        match raw {
            Some(rank) if rank > 0 => Rank::Ranked(rank),
            _ => Rank::NotAvailable,
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Ranked(rank) => write!(f, "{}", rank),
            Rank::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Whose catalog is being retrieved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Designer,
    Publisher,
}

impl SubjectKind {
    /// What the per-game enrichment lookup resolves for this kind
    pub fn collaborator_label(&self) -> &'static str {
        match self {
            SubjectKind::Designer => "publisher",
            SubjectKind::Publisher => "designer",
        }
    }
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectKind::Designer => write!(f, "designer"),
            SubjectKind::Publisher => write!(f, "publisher"),
        }
    }
}

/// A designer or publisher resolved to its BoardGameGeek ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub kind: SubjectKind,
    pub name: String,
    pub id: String,
}

impl Subject {
    pub fn new(kind: SubjectKind, name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            id: id.into(),
        }
    }
}
