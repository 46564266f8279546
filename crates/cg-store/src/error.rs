use cg_core::asset::AssetError;

use crate::storage::TemplateId;

/// Failure inside a repository or asset storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("template not found: {0}")]
    NotFound(TemplateId),
    #[error("upload rejected for {path}: {reason}")]
    Upload { path: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure turning a transient image reference into bytes.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    DataUrl(#[from] AssetError),
    #[error("unknown blob handle: {0}")]
    UnknownBlob(String),
    #[error("reference is not transient: {0}")]
    NotTransient(String),
}

/// Why a single asset could not be uploaded during a save.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A save that did not write anything.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("a template named {name:?} already exists")]
    DuplicateName { name: String },
    #[error("update requested without the id of a stored template")]
    MissingIdentity,
    #[error("repository error: {0}")]
    Repository(#[from] StorageError),
}

impl SaveError {
    /// Stable code for callers that surface errors to users.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateName { .. } => "E_DUPLICATE_NAME",
            Self::MissingIdentity => "E_MISSING_IDENTITY",
            Self::Repository(_) => "E_REPOSITORY",
        }
    }
}
