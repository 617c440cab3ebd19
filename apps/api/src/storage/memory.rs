use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::storage::{sort_listings, ResumeListing, ResumeStore, StoredVersion};

/// In-process store. Keeps every saved version and counts writes.
#[derive(Default)]
pub struct MemoryResumeStore {
    versions: RwLock<HashMap<Uuid, Vec<ResumeDocument>>>,
    saves: AtomicUsize,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn version_count(&self, id: Uuid) -> usize {
        self.versions.read().await.get(&id).map_or(0, Vec::len)
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn save(&self, doc: &ResumeDocument) -> Result<StoredVersion, AppError> {
        doc.validate()?;
        let mut versions = self.versions.write().await;
        let history = versions.entry(doc.id()).or_default();
        history.push(doc.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        let version = history.len() as u32;
        debug!("Saved résumé {} version {version} in memory", doc.id());
        Ok(StoredVersion {
            id: doc.id(),
            version,
        })
    }

    async fn load(&self, id: Uuid) -> Result<ResumeDocument, AppError> {
        self.versions
            .read()
            .await
            .get(&id)
            .and_then(|h| h.last().cloned())
            .ok_or_else(|| AppError::NotFound(format!("Résumé {id} not found")))
    }

    async fn list(&self) -> Result<Vec<ResumeListing>, AppError> {
        let mut listings: Vec<ResumeListing> = self
            .versions
            .read()
            .await
            .values()
            .filter_map(|h| h.last())
            .map(ResumeListing::of)
            .collect();
        sort_listings(&mut listings);
        Ok(listings)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.versions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Résumé {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_versions_and_save_count() {
        let store = MemoryResumeStore::new();
        let mut doc = ResumeDocument::new("Ada");
        assert_eq!(store.save(&doc).await.unwrap().version, 1);
        doc.basics.email = Some("ada@example.com".to_string());
        assert_eq!(store.save(&doc).await.unwrap().version, 2);
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.version_count(doc.id()).await, 2);
        assert_eq!(
            store.load(doc.id()).await.unwrap().basics.email.as_deref(),
            Some("ada@example.com")
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let store = MemoryResumeStore::new();
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
