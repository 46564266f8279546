pub mod adapter;
pub mod asset;
pub mod id;
pub mod lint;
pub mod model;
pub mod presets;
pub mod transform;

pub use adapter::{Element, ElementKind, from_elements, to_elements};
pub use asset::{AssetKind, DataUrl, parse_data_url};
pub use id::{ElementId, IdRole};
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use presets::{TextPreset, starter_document};
pub use transform::{canonicalize_z_order, clamp_opacity};
