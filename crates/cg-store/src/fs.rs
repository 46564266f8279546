//! Local filesystem backends used by the `certigen` CLI.
//!
//! `FsStorage` writes objects under a root directory and hands out URLs
//! below a configured base. `JsonFileRepository` keeps every record in one
//! pretty-printed JSON array; each operation reads and rewrites the file
//! while holding a lock, which is plenty for a single local user.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::storage::*;

#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    base_url: String,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AssetStorage for FsStorage {
    async fn upload(&self, path: &str, asset: Asset) -> Result<String, StorageError> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::Upload {
                path: path.to_string(),
                reason: "object path must be relative and must not contain `..`".into(),
            });
        }
        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &asset.bytes).await?;
        log::debug!("stored {} bytes at {}", asset.bytes.len(), target.display());
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), path))
    }
}

// ─── Repository ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<TemplateRecord>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, records: &[TemplateRecord]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for JsonFileRepository {
    async fn name_taken(
        &self,
        owner: &OwnerId,
        name: &str,
        exclude: Option<TemplateId>,
    ) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().await;
        let records = self.read_all().await?;
        Ok(records
            .iter()
            .any(|r| &r.owner_id == owner && r.name == name && Some(r.id) != exclude))
    }

    async fn insert(&self, draft: TemplateDraft) -> Result<TemplateRecord, StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let record = draft.into_record(TemplateId::new_v4());
        records.push(record.clone());
        self.write_all(&records).await?;
        Ok(record)
    }

    async fn update(
        &self,
        id: TemplateId,
        draft: TemplateDraft,
    ) -> Result<TemplateRecord, StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let slot = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StorageError::NotFound(id))?;
        *slot = draft.into_record(id);
        let record = slot.clone();
        self.write_all(&records).await?;
        Ok(record)
    }

    async fn get(&self, id: TemplateId) -> Result<Option<TemplateRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_iter().find(|r| r.id == id))
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<TemplateRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut owned: Vec<TemplateRecord> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|r| &r.owner_id == owner)
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(owned)
    }
}
