pub mod edit;
pub mod editor;
pub mod history;
pub mod selection;
pub mod signatory;
pub mod snap;

pub use edit::{Edit, apply};
pub use editor::{Editor, EditorConfig};
pub use history::{Debouncer, EditKey, EditSession, History, Property};
pub use selection::Selection;
pub use snap::{DragSession, Guide, SnapEngine, SnapPolicy, SnapResult};
