//! Editor session: the single owner of a template being edited.
//!
//! The editor holds the snapshot history, the selection and the snap engine.
//! Each history entry pairs the working document with the page size it was
//! laid out for, so undoing a page switch restores both. Every change goes
//! through one of its methods, which reduce an `Edit` over the current
//! snapshot and record the result.
//!
//! Edits that leave the document unchanged record nothing. An edit that
//! removes the last field of a signatory block also drops that block's
//! signature images and re-lays out the remaining blocks, in the same step.

use crate::edit::{self, Edit};
use crate::history::{Debouncer, EditKey, EditSession, History, Property};
use crate::selection::Selection;
use crate::signatory;
use crate::snap::{DragSession, Guide, SnapEngine, SnapPolicy, SnapResult};
use cg_core::adapter::{Element, to_elements};
use cg_core::id::ElementId;
use cg_core::lint::{LintDiagnostic, lint_document};
use cg_core::model::*;
use cg_core::presets::TextPreset;
use serde::{Deserialize, Deserializer};
use smallvec::SmallVec;
use std::time::{Duration, Instant};

/// Tunables for an editor session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Snap distance in canvas pixels, inclusive. Default: **10**.
    pub snap_threshold: f32,

    /// Which stop wins when several are in range. Default: **closest**.
    pub snap_policy: SnapPolicy,

    /// Window for time-based coalescing via `apply_timed`.
    /// Read from milliseconds. Default: **500 ms**.
    #[serde(rename = "coalesceWindowMs", deserialize_with = "millis")]
    pub coalesce_window: Duration,

    /// Retained undo snapshots; `None` keeps everything. Default: **200**.
    pub max_history: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: crate::snap::DEFAULT_SNAP_THRESHOLD,
            snap_policy: SnapPolicy::Closest,
            coalesce_window: crate::history::DEFAULT_COALESCE_WINDOW,
            max_history: Some(200),
        }
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// One undo entry.
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    document: Document,
    page: PageSize,
}

pub struct Editor {
    history: History<Snapshot>,
    selection: Selection,
    snap: SnapEngine,
    session: EditSession,
    debouncer: Debouncer,
    drag: DragSession,
}

impl Editor {
    /// Start from an empty document.
    pub fn new(page: PageSize, config: EditorConfig) -> Self {
        Self::open(Document::new(), page, config)
    }

    /// Start from an existing document. It becomes the oldest undo entry.
    pub fn open(document: Document, page: PageSize, config: EditorConfig) -> Self {
        let initial = Snapshot { document, page };
        let history = match config.max_history {
            Some(depth) => History::with_max_depth(initial, depth),
            None => History::new(initial),
        };
        Self {
            history,
            selection: Selection::new(),
            snap: SnapEngine::new(config.snap_threshold, config.snap_policy),
            session: EditSession::new(),
            debouncer: Debouncer::new(config.coalesce_window),
            drag: DragSession::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.history.current().document
    }

    pub fn page(&self) -> PageSize {
        self.history.current().page
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Flattened, z-sorted elements for rendering.
    pub fn elements(&self) -> Vec<Element> {
        to_elements(self.document(), self.page())
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_document(self.document(), self.page())
    }

    // ─── Recording ───────────────────────────────────────────────────────

    /// Apply a discrete edit as its own undo step.
    pub fn apply(&mut self, edit: Edit) {
        self.commit();
        let next = edit::apply(self.document(), &edit);
        self.record(next, false);
    }

    /// Apply one event of a continuous gesture. Events sharing `key` within
    /// the open session collapse into a single undo step.
    pub fn apply_continuous(&mut self, key: EditKey, edit: Edit) {
        let next = edit::apply(self.document(), &edit);
        if &next == self.document() {
            return;
        }
        let coalesce = self.session.should_coalesce(&key);
        self.record(next, coalesce);
    }

    /// Time-debounced variant for callers without gesture boundaries.
    pub fn apply_timed(&mut self, key: EditKey, edit: Edit, at: Instant) {
        let next = edit::apply(self.document(), &edit);
        if &next == self.document() {
            return;
        }
        let coalesce = self.debouncer.should_coalesce(&key, at);
        self.record(next, coalesce);
    }

    /// Close the current gesture; the next edit starts a new undo step.
    pub fn commit(&mut self) {
        self.session.end();
        self.debouncer.reset();
    }

    fn record(&mut self, next: Document, coalesce: bool) {
        self.record_on(next, self.page(), coalesce);
    }

    fn record_on(&mut self, next: Document, page: PageSize, coalesce: bool) {
        let document = signatory::settle_removed(self.document(), next, page);
        if !coalesce && &document == self.document() && page == self.page() {
            return;
        }
        self.history.push(Snapshot { document, page }, coalesce);
        self.selection.retain_existing(&self.history.current().document);
    }

    // ─── Undo / redo ─────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.commit();
        let moved = self.history.undo();
        if moved {
            log::debug!("undo → entry {}", self.history.cursor());
            self.selection.retain_existing(&self.history.current().document);
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        self.commit();
        let moved = self.history.redo();
        if moved {
            log::debug!("redo → entry {}", self.history.cursor());
            self.selection.retain_existing(&self.history.current().document);
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Page ────────────────────────────────────────────────────────────

    /// Switch paper size or orientation. The background is resized to the
    /// new page and signatory blocks are re-laid out.
    pub fn set_page(&mut self, page: PageSize) {
        self.commit();
        let mut next = signatory::relayout(self.document(), page);
        if let Some(bg) = &mut next.background {
            bg.frame.width = page.width;
            bg.frame.height = page.height;
        }
        self.record_on(next, page, false);
    }

    // ─── Signatories ─────────────────────────────────────────────────────

    /// Add a signatory block at the lowest free index (0..=3).
    /// Returns `None` when all four are in use.
    pub fn add_signatory(&mut self) -> Option<u8> {
        self.commit();
        let (next, index) = signatory::add_signatory(self.document(), self.page())?;
        self.record(next, false);
        Some(index)
    }

    /// Remove a signatory block and its signature images.
    /// Returns `false` if the index was not active.
    pub fn remove_signatory(&mut self, index: u8) -> bool {
        if !self.document().signatory_indices().contains(&index) {
            return false;
        }
        self.commit();
        let next = signatory::remove_signatory(self.document(), index, self.page());
        self.record(next, false);
        true
    }

    /// Attach (or replace) the signature image of an active signatory.
    pub fn attach_signature(
        &mut self,
        index: u8,
        src: impl Into<String>,
        stamp: u64,
        width: f32,
        height: f32,
    ) -> Option<ElementId> {
        if !self.document().signatory_indices().contains(&index) {
            return None;
        }
        self.commit();
        let next =
            signatory::attach_signature(self.document(), index, src.into(), stamp, width, height);
        self.record(next, false);
        Some(ElementId::signature_image(index, stamp))
    }

    // ─── Presets ─────────────────────────────────────────────────────────

    /// Add the preset text field, or remove it if present.
    /// Returns whether the field is present afterwards.
    pub fn toggle_preset(&mut self, preset: TextPreset) -> bool {
        let id = preset.id();
        if self.document().contains(&id) {
            self.apply(Edit::Remove { id });
            false
        } else {
            self.apply(Edit::AddTextField(preset.field(self.page())));
            true
        }
    }

    // ─── Drag ────────────────────────────────────────────────────────────

    pub fn begin_drag(&mut self) {
        self.commit();
        self.drag.begin();
    }

    /// Move `id` so its top-left lands at (`x`, `y`), snapped to the page.
    /// Every selected element moves by the same snapped delta; if `id` is not
    /// selected it becomes the selection. One drag is one undo step.
    pub fn drag_to(&mut self, id: &ElementId, x: f32, y: f32) -> Option<SnapResult> {
        let frame = self.document().frame(id)?;
        let proposed = Bounds {
            x,
            y,
            width: frame.width,
            height: frame.height,
        };
        let result = self.snap.snap(proposed, self.page());
        let (dx, dy) = (result.x - frame.x, result.y - frame.y);

        if !self.drag.is_active() {
            self.drag.begin();
        }
        if !self.selection.contains(id) {
            self.selection.select(id.clone());
        }
        let ids: SmallVec<[ElementId; 4]> = self.selection.ids().iter().cloned().collect();
        self.apply_continuous(EditKey::on(id, Property::Position), Edit::Move { ids, dx, dy });
        self.drag.update(&result);
        Some(result)
    }

    /// Finish the drag: guides disappear and the gesture is committed.
    pub fn end_drag(&mut self) {
        self.drag.end();
        self.commit();
    }

    /// Guide lines for the drag in progress.
    pub fn guides(&self) -> &[Guide] {
        self.drag.guides()
    }

    // ─── Selection actions ───────────────────────────────────────────────

    /// Remove every selected element in one undo step. Removing a
    /// signatory's name and role re-lays out the remaining blocks.
    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.commit();
        let mut next = self.document().clone();
        for id in self.selection.ids() {
            edit::apply_in_place(&mut next, &Edit::Remove { id: id.clone() });
        }
        self.record(next, false);
    }

    /// Raise a text field one step. Slots other than text fields have a
    /// fixed paint order and are left alone.
    pub fn bring_forward(&mut self, id: &ElementId) -> bool {
        self.shift_z(id, 1)
    }

    pub fn send_backward(&mut self, id: &ElementId) -> bool {
        self.shift_z(id, -1)
    }

    fn shift_z(&mut self, id: &ElementId, delta: i32) -> bool {
        let Some(field) = self.document().text_field(id) else {
            return false;
        };
        let z = field.frame.z_index.unwrap_or(DEFAULT_TEXT_Z) + delta;
        self.apply(Edit::SetZIndex { id: id.clone(), z });
        true
    }
}
