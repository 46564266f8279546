//! Resolving transient image references to bytes.

use async_trait::async_trait;
use cg_core::asset::{AssetKind, parse_data_url};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ResolveError;
use crate::storage::{Asset, AssetResolver};

/// Process-local table of `blob:` handles and the bytes behind them.
/// Cloning shares the table.
#[derive(Debug, Clone, Default)]
pub struct BlobRegistry {
    blobs: Arc<RwLock<HashMap<String, Asset>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `asset` under a fresh handle and return the handle.
    pub async fn register(&self, asset: Asset) -> String {
        let handle = format!("blob:{}", Uuid::new_v4());
        self.blobs.write().await.insert(handle.clone(), asset);
        handle
    }

    /// Store `asset` under a caller-chosen handle.
    pub async fn insert(&self, handle: impl Into<String>, asset: Asset) {
        self.blobs.write().await.insert(handle.into(), asset);
    }

    pub async fn revoke(&self, handle: &str) -> bool {
        self.blobs.write().await.remove(handle).is_some()
    }

    pub async fn get(&self, handle: &str) -> Option<Asset> {
        self.blobs.read().await.get(handle).cloned()
    }
}

/// Decodes `data:` URLs in place and looks `blob:` handles up in a registry.
#[derive(Debug, Clone, Default)]
pub struct InlineResolver {
    blobs: BlobRegistry,
}

impl InlineResolver {
    pub fn new(blobs: BlobRegistry) -> Self {
        Self { blobs }
    }

    pub fn blobs(&self) -> &BlobRegistry {
        &self.blobs
    }
}

#[async_trait]
impl AssetResolver for InlineResolver {
    async fn resolve(&self, src: &str) -> Result<Asset, ResolveError> {
        match AssetKind::classify(src) {
            AssetKind::DataUrl => {
                let data = parse_data_url(src)?;
                Ok(Asset {
                    bytes: data.bytes,
                    content_type: data.mime,
                })
            }
            AssetKind::Blob => self
                .blobs
                .get(src.trim())
                .await
                .ok_or_else(|| ResolveError::UnknownBlob(src.to_string())),
            AssetKind::Remote | AssetKind::Other => Err(ResolveError::NotTransient(src.to_string())),
        }
    }
}
