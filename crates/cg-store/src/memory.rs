//! In-memory backends for tests and previews.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::StorageError;
use crate::storage::*;

/// Repository holding records in a map. Cloning shares the map.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    records: Arc<RwLock<HashMap<TemplateId, TemplateRecord>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TemplateRepository for MemoryRepository {
    async fn name_taken(
        &self,
        owner: &OwnerId,
        name: &str,
        exclude: Option<TemplateId>,
    ) -> Result<bool, StorageError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .any(|r| &r.owner_id == owner && r.name == name && Some(r.id) != exclude))
    }

    async fn insert(&self, draft: TemplateDraft) -> Result<TemplateRecord, StorageError> {
        let record = draft.into_record(TemplateId::new_v4());
        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: TemplateId,
        draft: TemplateDraft,
    ) -> Result<TemplateRecord, StorageError> {
        let mut records = self.records.write().await;
        let slot = records.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        *slot = draft.into_record(id);
        Ok(slot.clone())
    }

    async fn get(&self, id: TemplateId) -> Result<Option<TemplateRecord>, StorageError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<TemplateRecord>, StorageError> {
        let records = self.records.read().await;
        let mut owned: Vec<TemplateRecord> = records
            .values()
            .filter(|r| &r.owner_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(owned)
    }
}

// ─── Asset storage ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct StorageState {
    objects: HashMap<String, Asset>,
    /// Every upload attempt, in call order, successful or not.
    attempts: Vec<String>,
    /// Paths containing any of these substrings are rejected.
    fail_patterns: Vec<String>,
}

/// Object store in a map. Records every upload attempt and can be told to
/// reject paths matching a pattern. Cloning shares the store.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    base_url: String,
    state: Arc<Mutex<StorageState>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("memory://assets")
    }
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            state: Arc::default(),
        }
    }

    /// Reject every later upload whose path contains `pattern`.
    pub async fn fail_matching(&self, pattern: impl Into<String>) {
        self.state.lock().await.fail_patterns.push(pattern.into());
    }

    /// Paths of all upload attempts so far.
    pub async fn attempts(&self) -> Vec<String> {
        self.state.lock().await.attempts.clone()
    }

    pub async fn object(&self, path: &str) -> Option<Asset> {
        self.state.lock().await.objects.get(path).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.state.lock().await.objects.len()
    }
}

#[async_trait]
impl AssetStorage for MemoryStorage {
    async fn upload(&self, path: &str, asset: Asset) -> Result<String, StorageError> {
        let mut state = self.state.lock().await;
        state.attempts.push(path.to_string());
        if state.fail_patterns.iter().any(|p| path.contains(p.as_str())) {
            return Err(StorageError::Upload {
                path: path.to_string(),
                reason: "rejected by test storage".into(),
            });
        }
        state.objects.insert(path.to_string(), asset);
        Ok(format!("{}/{}", self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_core::model::Document;

    fn draft(owner: &str, name: &str) -> TemplateDraft {
        TemplateDraft {
            name: name.into(),
            width: 1123.0,
            height: 794.0,
            canvas_state: Document::new(),
            thumbnail_url: None,
            owner_id: owner.into(),
        }
    }

    #[tokio::test]
    async fn name_check_is_per_owner_and_honors_exclude() {
        let repo = MemoryRepository::new();
        let record = repo.insert(draft("alice", "Award")).await.unwrap();

        let alice = OwnerId::from("alice");
        assert!(repo.name_taken(&alice, "Award", None).await.unwrap());
        assert!(!repo.name_taken(&alice, "Award", Some(record.id)).await.unwrap());
        assert!(!repo.name_taken(&"bob".into(), "Award", None).await.unwrap());
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let repo = MemoryRepository::new();
        let id = TemplateId::new_v4();
        let err = repo.update(id, draft("alice", "x")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let repo = MemoryRepository::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            repo.insert(draft("alice", name)).await.unwrap();
        }
        repo.insert(draft("bob", "Other")).await.unwrap();
        let names: Vec<String> = repo
            .list(&"alice".into())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[tokio::test]
    async fn storage_records_attempts_and_failures() {
        let storage = MemoryStorage::default();
        storage.fail_matching("bad").await;
        let asset = Asset {
            bytes: vec![1, 2, 3],
            content_type: "image/png".into(),
        };
        let url = storage.upload("ok/a.png", asset.clone()).await.unwrap();
        assert_eq!(url, "memory://assets/ok/a.png");
        assert!(storage.upload("bad/b.png", asset).await.is_err());
        assert_eq!(storage.attempts().await, vec!["ok/a.png", "bad/b.png"]);
        assert_eq!(storage.object_count().await, 1);
    }
}
