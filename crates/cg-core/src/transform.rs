//! Transform passes that mutate a `Document` in-place.
//!
//! Each pass has a single responsibility, is idempotent, and is safe to
//! compose. The persistence gateway runs them before a template is written.

use crate::model::Document;

// ─── Z-order canonicalization ─────────────────────────────────────────────

/// Restamp every singleton slot with its fixed paint order (1..=5).
///
/// Dragging or "bring forward" can leave arbitrary values on the
/// background, border, inner frame, corner frames or watermark; those slots
/// always paint in slot order. Collections are left alone.
pub fn canonicalize_z_order(doc: &mut Document) {
    for (slot, frame) in doc.frames_mut() {
        if slot.is_singleton() {
            frame.z_index = slot.canonical_z();
        }
    }
}

// ─── Opacity clamp ────────────────────────────────────────────────────────

/// Clamp every element's opacity into `0.0..=1.0`. NaN becomes fully opaque.
pub fn clamp_opacity(doc: &mut Document) {
    for (_, frame) in doc.frames_mut() {
        frame.opacity = if frame.opacity.is_nan() {
            1.0
        } else {
            frame.opacity.clamp(0.0, 1.0)
        };
    }
}

/// Check whether every singleton slot already carries its canonical z.
pub fn is_canonical(doc: &Document) -> bool {
    doc.frames()
        .filter(|(slot, _)| slot.is_singleton())
        .all(|(slot, frame)| frame.z_index == slot.canonical_z())
}
