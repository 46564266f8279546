pub mod config;
pub mod error;
pub mod fs;
pub mod gateway;
pub mod memory;
pub mod resolve;
pub mod storage;

pub use config::GatewayConfig;
pub use error::{ResolveError, SaveError, StorageError, UploadError};
pub use fs::{FsStorage, JsonFileRepository};
pub use gateway::{DroppedAsset, SaveMode, SaveOutcome, SaveRequest, TemplateGateway};
pub use memory::{MemoryRepository, MemoryStorage};
pub use resolve::{BlobRegistry, InlineResolver};
pub use storage::{
    Asset, AssetResolver, AssetStorage, OwnerId, TemplateDraft, TemplateId, TemplateRecord,
    TemplateRepository,
};
