//! Snapshot history with undo/redo.
//!
//! Every committed edit stores a full copy of the document. Undo and redo
//! only move a cursor over the stored snapshots; nothing is ever mutated
//! in place except by coalescing.
//!
//! Continuous inputs (sliders, color pickers, typing, drag frames) fire many
//! events per gesture. Those are **coalesced**: while the cursor sits on the
//! newest entry, a coalesced push replaces that entry instead of appending,
//! so one gesture costs one undo step.
//!
//! Two policies decide when to coalesce:
//!
//! - `EditSession`: the caller opens a session for a property of a target;
//!   the first push in a session appends, later pushes with the same key
//!   coalesce. Deterministic, and what `Editor` uses.
//! - `Debouncer`: time-based fallback. Pushes to the same key within the
//!   window (500 ms by default) coalesce. The caller supplies the event time.

use cg_core::id::ElementId;
use std::time::{Duration, Instant};

/// Default debounce window for time-based coalescing.
pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(500);

/// Linear snapshot history with a cursor.
///
/// Invariant: `entries` is never empty and `cursor < entries.len()`.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: usize,
    /// Maximum retained snapshots (`None` = unbounded).
    max_depth: Option<usize>,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            max_depth: None,
        }
    }

    /// Bounded history. A depth below 1 is treated as 1.
    pub fn with_max_depth(initial: T, max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth.max(1)),
            ..Self::new(initial)
        }
    }

    /// Record a snapshot.
    ///
    /// With `coalesce` set and the cursor on the newest entry, the newest
    /// entry is replaced. Otherwise any redo entries beyond the cursor are
    /// discarded and the snapshot is appended.
    pub fn push(&mut self, snapshot: T, coalesce: bool) {
        if coalesce && self.cursor + 1 == self.entries.len() {
            self.entries[self.cursor] = snapshot;
            return;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;

        if let Some(max) = self.max_depth
            && self.entries.len() > max
        {
            let overflow = self.entries.len() - max;
            self.entries.drain(0..overflow);
            self.cursor -= overflow;
        }
    }

    /// Step back. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Drop every entry and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = 0;
    }
}

// ─── Coalescing keys ─────────────────────────────────────────────────────

/// Property classes that receive continuous input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Position,
    Size,
    Rotation,
    Opacity,
    Text,
    TextStyle,
    Color,
    Image,
    Layer,
}

/// Identifies one stream of continuous edits: a property on a target.
/// `target: None` covers page-wide edits such as background color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditKey {
    pub target: Option<ElementId>,
    pub property: Property,
}

impl EditKey {
    pub fn new(target: Option<ElementId>, property: Property) -> Self {
        Self { target, property }
    }

    pub fn on(target: &ElementId, property: Property) -> Self {
        Self::new(Some(target.clone()), property)
    }

    pub fn page(property: Property) -> Self {
        Self::new(None, property)
    }
}

// ─── Explicit sessions ───────────────────────────────────────────────────

/// Explicit coalescing session.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    active: Option<EditKey>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `key`, closing any other one.
    pub fn begin(&mut self, key: EditKey) {
        self.active = Some(key);
    }

    /// Close the current session; the next push appends.
    pub fn end(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&EditKey> {
        self.active.as_ref()
    }

    /// Decide whether a push for `key` coalesces, opening a session for it
    /// if none matches. The first push of every session appends.
    pub fn should_coalesce(&mut self, key: &EditKey) -> bool {
        if self.active.as_ref() == Some(key) {
            return true;
        }
        self.active = Some(key.clone());
        false
    }
}

// ─── Time-based fallback ─────────────────────────────────────────────────

/// Coalesces pushes to the same key that arrive within `window`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last: Option<(EditKey, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_COALESCE_WINDOW)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Decide whether an edit to `key` at `at` coalesces with the previous
    /// one. The first edit after a key change never does.
    pub fn should_coalesce(&mut self, key: &EditKey, at: Instant) -> bool {
        let coalesce = match &self.last {
            Some((last_key, last_at)) => {
                last_key == key && at.saturating_duration_since(*last_at) < self.window
            }
            None => false,
        };
        self.last = Some((key.clone(), at));
        coalesce
    }

    /// Forget the previous edit (e.g. on selection change).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
