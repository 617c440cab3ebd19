use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::storage::{sort_listings, ResumeListing, ResumeStore, StoredVersion};

/// One JSON file per résumé under `root`.
///
/// Layout:
///   <root>/<id>.json              current version
///   <root>/versions/<id>/v<n>.json previous versions, n = 1, 2, ...
///
/// Overwrites are append-only with respect to history: the current file is
/// copied into `versions/` before the new one replaces it. Writes to one id
/// are serialized so concurrent saves get distinct version numbers.
pub struct FileResumeStore {
    root: PathBuf,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl FileResumeStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(root.join("versions")).await?;
        info!("Résumé store at {}", root.display());
        Ok(Self {
            root,
            locks: Mutex::new(HashMap::new()),
        })
    }

    async fn id_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        self.locks.lock().await.entry(id).or_default().clone()
    }

    fn current_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn versions_dir(&self, id: Uuid) -> PathBuf {
        self.root.join("versions").join(id.to_string())
    }

    /// Number of backed-up versions for `id`.
    async fn backup_count(&self, id: Uuid) -> Result<u32, AppError> {
        let dir = self.versions_dir(id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if is_version_file(&entry.path()) {
                count += 1;
            }
        }
        Ok(count)
    }

    #[cfg(test)]
    pub async fn version_count(&self, id: Uuid) -> Result<u32, AppError> {
        let backups = self.backup_count(id).await?;
        let current = fs::try_exists(self.current_path(id)).await?;
        Ok(backups + u32::from(current))
    }
}

fn is_version_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('v') && n.ends_with(".json"))
}

fn parse_document(bytes: &[u8], path: &Path) -> Result<ResumeDocument, AppError> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::Storage(format!("Corrupt résumé file {}: {e}", path.display())))
}

#[async_trait]
impl ResumeStore for FileResumeStore {
    async fn save(&self, doc: &ResumeDocument) -> Result<StoredVersion, AppError> {
        doc.validate()?;
        let id = doc.id();
        let path = self.current_path(id);
        let lock = self.id_lock(id).await;
        let _guard = lock.lock().await;

        let mut version = 1;
        if fs::try_exists(&path).await? {
            let backup = self.backup_count(id).await? + 1;
            let dir = self.versions_dir(id);
            fs::create_dir_all(&dir).await?;
            fs::copy(&path, dir.join(format!("v{backup}.json"))).await?;
            debug!("Backed up résumé {id} as v{backup}");
            version = backup + 1;
        }

        let body = serde_json::to_vec_pretty(doc)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize résumé: {e}")))?;
        let tmp = self.root.join(format!("{id}.{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &path).await?;

        info!("Saved résumé {id} version {version}");
        Ok(StoredVersion { id, version })
    }

    async fn load(&self, id: Uuid) -> Result<ResumeDocument, AppError> {
        let path = self.current_path(id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("Résumé {id} not found")))
            }
            Err(e) => return Err(e.into()),
        };
        parse_document(&bytes, &path)
    }

    async fn list(&self) -> Result<Vec<ResumeListing>, AppError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut listings = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).await?;
            match parse_document(&bytes, &path) {
                Ok(doc) => listings.push(ResumeListing::of(&doc)),
                Err(e) => warn!("Skipping unreadable résumé file: {e}"),
            }
        }
        sort_listings(&mut listings);
        Ok(listings)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let lock = self.id_lock(id).await;
        let _guard = lock.lock().await;
        match fs::remove_file(self.current_path(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("Résumé {id} not found")))
            }
            Err(e) => return Err(e.into()),
        }
        match fs::remove_dir_all(self.versions_dir(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.locks.lock().await.remove(&id);
        info!("Deleted résumé {id} and its versions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str) -> ResumeDocument {
        let mut doc = ResumeDocument::new(name);
        let work = doc.add_work("Acme", "Engineer");
        doc.add_work_highlight(work, "Built the billing service").unwrap();
        doc
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileResumeStore::open(dir.path()).await.unwrap();
        let doc = document("Ada");
        let stored = store.save(&doc).await.unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(store.load(doc.id()).await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_overwrite_backs_up_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileResumeStore::open(dir.path()).await.unwrap();
        let mut doc = document("Ada");
        store.save(&doc).await.unwrap();

        doc.basics.label = Some("Backend Engineer".to_string());
        let stored = store.save(&doc).await.unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(store.version_count(doc.id()).await.unwrap(), 2);

        let backup = dir
            .path()
            .join("versions")
            .join(doc.id().to_string())
            .join("v1.json");
        let previous: ResumeDocument =
            serde_json::from_slice(&std::fs::read(backup).unwrap()).unwrap();
        assert_eq!(previous.basics.label, None);
        assert_eq!(
            store.load(doc.id()).await.unwrap().basics.label.as_deref(),
            Some("Backend Engineer")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_get_distinct_versions() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileResumeStore::open(dir.path()).await.unwrap());
        let doc = document("Ada");
        store.save(&doc).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let doc = doc.clone();
                tokio::spawn(async move { store.save(&doc).await })
            })
            .collect();
        let mut versions = Vec::new();
        for handle in handles {
            versions.push(handle.await.unwrap().unwrap().version);
        }
        versions.sort_unstable();
        assert_eq!(versions, (2..=17).collect::<Vec<u32>>());
        assert_eq!(store.version_count(doc.id()).await.unwrap(), 17);

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_invalid_document_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileResumeStore::open(dir.path()).await.unwrap();
        let doc = ResumeDocument::new("  ");
        assert!(matches!(store.save(&doc).await, Err(AppError::Validation(_))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileResumeStore::open(dir.path()).await.unwrap();
        let a = document("Ada");
        let b = document("Grace");
        store.save(&a).await.unwrap();
        store.save(&b).await.unwrap();
        store.save(&b).await.unwrap();

        let listings = store.list().await.unwrap();
        assert_eq!(listings.len(), 2);

        store.delete(b.id()).await.unwrap();
        let listings = store.list().await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "Ada");
        assert!(!dir.path().join("versions").join(b.id().to_string()).exists());
        assert!(matches!(store.delete(b.id()).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_resume_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileResumeStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.load(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
