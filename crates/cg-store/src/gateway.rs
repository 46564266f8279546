//! Template persistence gateway: save, load and list templates.
//!
//! DESIGN
//! ======
//! A save runs in a fixed order:
//!
//! 1. Identity and name checks. An update must name a record that exists,
//!    and the owner may not already have another template with the same
//!    name. Nothing is uploaded until both pass.
//! 2. Normalization: singleton slots get their canonical z-order and every
//!    opacity is clamped into 0..1.
//! 3. Every transient image reference (`data:` / `blob:`) is resolved and
//!    uploaded, at most `upload_concurrency` at a time, and replaced by the
//!    returned URL. Remote URLs are left as they are, so re-saving a loaded
//!    template uploads nothing.
//! 4. The thumbnail, if one was supplied, is uploaded when transient and
//!    stored as given otherwise.
//! 5. The record is inserted or updated.
//!
//! ERROR HANDLING
//! ==============
//! Checks in step 1 and repository failures abort the save. A single asset
//! that fails to resolve or upload does not: its reference is cleared, a
//! warning is logged and the element is listed in `SaveOutcome::dropped` so
//! the caller can tell the user what went missing.

use cg_core::asset::{AssetKind, extension_for};
use cg_core::id::ElementId;
use cg_core::model::{AssetLocation, Document, PageSize, Slot};
use cg_core::transform::{canonicalize_z_order, clamp_opacity};
use futures::StreamExt;
use futures::stream;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::{SaveError, StorageError, UploadError};
use crate::storage::*;

/// Whether a save creates a new record or overwrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    /// `None` models a caller that lost track of the record id.
    Update(Option<TemplateId>),
}

#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub document: Document,
    pub owner_id: OwnerId,
    pub name: String,
    pub page: PageSize,
    pub mode: SaveMode,
    /// Rendered preview. Transient references (`data:` or `blob:`) are
    /// uploaded; anything else is stored as given.
    pub thumbnail: Option<String>,
}

/// An image reference cleared because its upload failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedAsset {
    pub element_id: ElementId,
    pub slot: Slot,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub record: TemplateRecord,
    pub dropped: Vec<DroppedAsset>,
    /// Set when a supplied thumbnail could not be stored.
    pub thumbnail_error: Option<String>,
}

impl SaveOutcome {
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty() && self.thumbnail_error.is_none()
    }
}

pub struct TemplateGateway<R, S, A> {
    repository: R,
    storage: S,
    resolver: A,
    config: GatewayConfig,
}

impl<R, S, A> TemplateGateway<R, S, A>
where
    R: TemplateRepository,
    S: AssetStorage,
    A: AssetResolver,
{
    pub fn new(repository: R, storage: S, resolver: A, config: GatewayConfig) -> Self {
        Self {
            repository,
            storage,
            resolver,
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn resolver(&self) -> &A {
        &self.resolver
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    // ─── Save ────────────────────────────────────────────────────────────

    pub async fn save(&self, request: SaveRequest) -> Result<SaveOutcome, SaveError> {
        let SaveRequest {
            document,
            owner_id,
            name,
            page,
            mode,
            thumbnail,
        } = request;

        let existing = match mode {
            SaveMode::Create => None,
            SaveMode::Update(None) => return Err(SaveError::MissingIdentity),
            SaveMode::Update(Some(id)) => match self.repository.get(id).await? {
                Some(record) => Some(record),
                None => {
                    log::warn!("update of unknown template {id}");
                    return Err(SaveError::MissingIdentity);
                }
            },
        };
        let existing_id = existing.as_ref().map(|record| record.id);
        if self
            .repository
            .name_taken(&owner_id, &name, existing_id)
            .await?
        {
            return Err(SaveError::DuplicateName { name });
        }

        let mut document = document;
        canonicalize_z_order(&mut document);
        clamp_opacity(&mut document);

        let dropped = self.upload_assets(&mut document, &owner_id).await;

        let previous_thumbnail = existing.and_then(|record| record.thumbnail_url);
        let (thumbnail_url, thumbnail_error) = match thumbnail {
            Some(src) if !AssetKind::classify(&src).is_transient() => (Some(src), None),
            Some(src) => match self.upload_thumbnail(&src, &owner_id).await {
                Ok(url) => (Some(url), None),
                Err(e) => {
                    log::warn!("thumbnail upload failed for {name:?}: {e}");
                    (previous_thumbnail, Some(e.to_string()))
                }
            },
            None => (previous_thumbnail, None),
        };

        let draft = TemplateDraft {
            name,
            width: page.width,
            height: page.height,
            canvas_state: document,
            thumbnail_url,
            owner_id,
        };
        let record = match existing_id {
            None => self.repository.insert(draft).await?,
            Some(id) => self.repository.update(id, draft).await?,
        };

        log::info!(
            "saved template {} ({:?}) for {}: {} asset(s) dropped",
            record.id,
            record.name,
            record.owner_id,
            dropped.len()
        );
        Ok(SaveOutcome {
            record,
            dropped,
            thumbnail_error,
        })
    }

    /// Upload every transient reference and rewrite it in place.
    async fn upload_assets(&self, document: &mut Document, owner: &OwnerId) -> Vec<DroppedAsset> {
        let pending: Vec<(AssetLocation, ElementId, String)> = document
            .asset_refs()
            .into_iter()
            .filter(|(_, _, src)| AssetKind::classify(src).is_transient())
            .collect();
        if pending.is_empty() {
            return Vec::new();
        }
        log::debug!("uploading {} transient asset(s)", pending.len());

        let results: Vec<_> = stream::iter(pending)
            .map(|(location, element_id, src)| async move {
                let slot = location.slot();
                let stem = format!("{}-{}", slot.as_str(), element_id);
                let result = self.upload_one(&src, owner, &stem).await;
                (location, element_id, result)
            })
            .buffered(self.config.upload_concurrency.max(1))
            .collect()
            .await;

        let mut dropped = Vec::new();
        for (location, element_id, result) in results {
            let uploaded = match result {
                Ok(url) => Some(url),
                Err(e) => {
                    log::warn!("dropping image on {element_id}: {e}");
                    dropped.push(DroppedAsset {
                        element_id,
                        slot: location.slot(),
                        reason: e.to_string(),
                    });
                    None
                }
            };
            if let Some(src) = document.asset_mut(location) {
                *src = uploaded;
            }
        }
        dropped
    }

    async fn upload_one(&self, src: &str, owner: &OwnerId, stem: &str) -> Result<String, UploadError> {
        let asset = self.resolver.resolve(src).await?;
        let path = format!(
            "{}/{}/{}-{}.{}",
            self.config.asset_prefix,
            owner,
            stem,
            Uuid::new_v4(),
            extension_for(&asset.content_type)
        );
        Ok(self.storage.upload(&path, asset).await?)
    }

    async fn upload_thumbnail(&self, src: &str, owner: &OwnerId) -> Result<String, UploadError> {
        self.upload_one(src, owner, "thumbnail").await
    }

    // ─── Load / list ─────────────────────────────────────────────────────

    pub async fn load(&self, id: TemplateId) -> Result<TemplateRecord, StorageError> {
        self.repository
            .get(id)
            .await?
            .ok_or(StorageError::NotFound(id))
    }

    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<TemplateRecord>, StorageError> {
        self.repository.list(owner).await
    }
}
