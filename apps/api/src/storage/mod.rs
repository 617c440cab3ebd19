//! Résumé persistence behind `ResumeStore`.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`: `FileResumeStore` in the
//! service, `MemoryResumeStore` in tests.

pub mod editing;
pub mod file;
pub mod handlers;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;

pub use file::FileResumeStore;
#[cfg(test)]
pub use memory::MemoryResumeStore;

/// One row of `list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeListing {
    pub id: Uuid,
    pub name: String,
    pub updated_at: DateTime<Utc>,
    /// Overall score of the most recent history record, if any.
    pub latest_score: Option<f64>,
}

impl ResumeListing {
    pub fn of(doc: &ResumeDocument) -> Self {
        Self {
            id: doc.id(),
            name: doc.basics.name.clone(),
            updated_at: doc.meta.updated_at,
            latest_score: doc.meta.score_history.last().map(|r| r.overall),
        }
    }
}

/// Result of a save: the version number now current for the résumé.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoredVersion {
    pub id: Uuid,
    pub version: u32,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Validates and writes the document, keeping the previous version.
    async fn save(&self, doc: &ResumeDocument) -> Result<StoredVersion, AppError>;

    async fn load(&self, id: Uuid) -> Result<ResumeDocument, AppError>;

    /// Listings sorted by most recently updated first.
    async fn list(&self) -> Result<Vec<ResumeListing>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

fn sort_listings(listings: &mut [ResumeListing]) {
    listings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
}
