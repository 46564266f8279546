//! Records and the collaborator traits the gateway writes through.

use async_trait::async_trait;
use cg_core::model::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{ResolveError, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub Uuid);

impl TemplateId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TemplateId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The authenticated user a template belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted template row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: TemplateId,
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// The structural document. Every image reference is remote or absent.
    pub canvas_state: Document,
    pub thumbnail_url: Option<String>,
    pub owner_id: OwnerId,
}

/// Everything in a record except its id.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub canvas_state: Document,
    pub thumbnail_url: Option<String>,
    pub owner_id: OwnerId,
}

impl TemplateDraft {
    pub fn into_record(self, id: TemplateId) -> TemplateRecord {
        TemplateRecord {
            id,
            name: self.name,
            width: self.width,
            height: self.height,
            canvas_state: self.canvas_state,
            thumbnail_url: self.thumbnail_url,
            owner_id: self.owner_id,
        }
    }
}

/// Raw object bytes with their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

// ─── Collaborators ────────────────────────────────────────────────────────

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Whether `owner` already has a template called `name`, ignoring the
    /// record `exclude` (the one being updated).
    async fn name_taken(
        &self,
        owner: &OwnerId,
        name: &str,
        exclude: Option<TemplateId>,
    ) -> Result<bool, StorageError>;

    async fn insert(&self, draft: TemplateDraft) -> Result<TemplateRecord, StorageError>;

    /// Overwrite an existing record. Fails with `NotFound` if `id` is unknown.
    async fn update(
        &self,
        id: TemplateId,
        draft: TemplateDraft,
    ) -> Result<TemplateRecord, StorageError>;

    async fn get(&self, id: TemplateId) -> Result<Option<TemplateRecord>, StorageError>;

    /// All templates of `owner`, ordered by name.
    async fn list(&self, owner: &OwnerId) -> Result<Vec<TemplateRecord>, StorageError>;
}

#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Store `asset` at `path` and return its public URL.
    async fn upload(&self, path: &str, asset: Asset) -> Result<String, StorageError>;
}

#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// Turn a transient reference into bytes.
    async fn resolve(&self, src: &str) -> Result<Asset, ResolveError>;
}
