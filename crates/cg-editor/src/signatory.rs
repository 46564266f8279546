//! Signatory layout solver.
//!
//! A certificate carries up to four signatory blocks. Each block is a name
//! field, a role field 20 px below it and optionally a signature image
//! sitting just above the name. Block positions come from fixed tables
//! keyed by how many signatories are active and by page orientation.
//!
//! Landscape rows are fixed offsets from the page bottom. Portrait rows are
//! tuned for a 1056 px tall page and scaled by `H / 1056` on other heights.
//! The two tables also order their rows differently when three signatories
//! are active: landscape puts two on top and one below, portrait one on top
//! and two below.

use cg_core::id::{ElementId, IdRole, MAX_SIGNATORY_INDEX};
use cg_core::model::*;
use cg_core::presets::signatory_fields;

/// Vertical distance from a name field to its role field.
pub const ROLE_OFFSET: f32 = 20.0;

/// Overlap of a signature image with the name below it.
pub const SIGNATURE_OVERLAP: f32 = 10.0;

/// Most signatory blocks the tables place.
pub const MAX_SIGNATORIES: usize = MAX_SIGNATORY_INDEX as usize + 1;

const PORTRAIT_REFERENCE_HEIGHT: f32 = 1056.0;
const PORTRAIT_EDGE_ANCHOR: f32 = 210.0;
const LANDSCAPE_SPREAD: f32 = 20.0;

/// Where one signatory block goes: horizontal center and name-field top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub center_x: f32,
    pub name_y: f32,
}

const fn anchor(center_x: f32, name_y: f32) -> Anchor {
    Anchor { center_x, name_y }
}

/// Block anchors for `count` active signatories, in slot order.
/// Counts above four use the four-block table.
pub fn anchors(count: usize, page: PageSize) -> Vec<Anchor> {
    let count = count.min(MAX_SIGNATORIES);
    let w = page.width;
    let h = page.height;
    let (left, center, right) = (w / 4.0, w / 2.0, w * 3.0 / 4.0);

    match page.orientation() {
        Orientation::Landscape => {
            let single = h - 150.0;
            let (top, bottom) = (h - 210.0, h - 120.0);
            match count {
                0 => vec![],
                1 => vec![anchor(center, single)],
                2 => vec![anchor(left, single), anchor(right, single)],
                3 => vec![anchor(left, top), anchor(right, top), anchor(center, bottom)],
                _ => {
                    let (l, r) = (left - LANDSCAPE_SPREAD, right + LANDSCAPE_SPREAD);
                    vec![anchor(l, top), anchor(r, top), anchor(l, bottom), anchor(r, bottom)]
                }
            }
        }
        Orientation::Portrait => {
            let scale = if h == PORTRAIT_REFERENCE_HEIGHT {
                1.0
            } else {
                h / PORTRAIT_REFERENCE_HEIGHT
            };
            match count {
                0 => vec![],
                1 => vec![anchor(center, 860.0 * scale)],
                2 => vec![anchor(center, 780.0 * scale), anchor(center, 900.0 * scale)],
                3 => vec![
                    anchor(center, 760.0 * scale),
                    anchor(left, 890.0 * scale),
                    anchor(right, 890.0 * scale),
                ],
                _ => {
                    let (l, r) = (PORTRAIT_EDGE_ANCHOR, w - PORTRAIT_EDGE_ANCHOR);
                    let (top, bottom) = (780.0 * scale, 900.0 * scale);
                    vec![anchor(l, top), anchor(r, top), anchor(l, bottom), anchor(r, bottom)]
                }
            }
        }
    }
}

/// Reposition every active signatory block. Blocks beyond the fourth keep
/// their current geometry.
pub fn relayout(doc: &Document, page: PageSize) -> Document {
    let mut next = doc.clone();
    let indices = doc.signatory_indices();
    let table = anchors(indices.len(), page);
    log::debug!(
        "signatory relayout: {} active, {:?} page",
        indices.len(),
        page.orientation()
    );

    for (&index, anchor) in indices.iter().zip(table) {
        place_block(&mut next, index, anchor);
    }
    next
}

fn place_block(doc: &mut Document, index: u8, at: Anchor) {
    if let Some(name) = doc.text_field_mut(&ElementId::signatory_name(index)) {
        name.frame.x = at.center_x - name.frame.width / 2.0;
        name.frame.y = at.name_y;
    }
    if let Some(role) = doc.text_field_mut(&ElementId::signatory_role(index)) {
        role.frame.x = at.center_x - role.frame.width / 2.0;
        role.frame.y = at.name_y + ROLE_OFFSET;
    }
    for image in doc.logos.iter_mut().filter(|l| is_signature_of(&l.frame.id, index)) {
        place_signature(&mut image.frame, at);
    }
}

/// The name field's center is the anchor center, so centering an image on
/// the name reduces to centering it on the anchor.
fn place_signature(frame: &mut Frame, at: Anchor) {
    frame.x = at.center_x - frame.width / 2.0;
    frame.y = at.name_y - (frame.height - SIGNATURE_OVERLAP);
}

fn is_signature_of(id: &ElementId, index: u8) -> bool {
    matches!(id.role(), IdRole::SignatureImage { index: i, .. } if i == index)
}

// ─── Block add / remove ──────────────────────────────────────────────────

/// Lowest signatory index not yet in use, if any slot is free.
pub fn next_free_index(doc: &Document) -> Option<u8> {
    let used = doc.signatory_indices();
    (0..=MAX_SIGNATORY_INDEX).find(|i| !used.contains(i))
}

/// Add a name/role pair at the lowest free index and relayout.
/// Returns `None` when all four slots are taken.
pub fn add_signatory(doc: &Document, page: PageSize) -> Option<(Document, u8)> {
    let index = next_free_index(doc)?;
    let mut next = doc.clone();
    next.text_fields.extend(signatory_fields(index));
    Some((relayout(&next, page), index))
}

/// Remove the block at `index` (name, role and signature images) and
/// relayout the survivors.
pub fn remove_signatory(doc: &Document, index: u8, page: PageSize) -> Document {
    let mut next = doc.clone();
    let name = ElementId::signatory_name(index);
    let role = ElementId::signatory_role(index);
    next.text_fields.retain(|t| t.frame.id != name && t.frame.id != role);
    settle_removed(doc, next, page)
}

/// Reconcile `after` with `before` when an edit removed whole signatory
/// blocks: signature images of the vanished blocks are dropped and the
/// survivors re-laid out. A block stays active while its name or its role
/// remains. Returns `after` untouched when no block vanished.
pub fn settle_removed(before: &Document, mut after: Document, page: PageSize) -> Document {
    let remaining = after.signatory_indices();
    let vanished: Vec<u8> = before
        .signatory_indices()
        .into_iter()
        .filter(|i| !remaining.contains(i))
        .collect();
    if vanished.is_empty() {
        return after;
    }
    log::debug!("signatory block(s) {vanished:?} removed");
    after
        .logos
        .retain(|l| !vanished.iter().any(|&i| is_signature_of(&l.frame.id, i)));
    relayout(&after, page)
}

/// Attach a signature image to the block at `index`, replacing any
/// previous one. The image is positioned above the name field.
pub fn attach_signature(
    doc: &Document,
    index: u8,
    src: String,
    stamp: u64,
    width: f32,
    height: f32,
) -> Document {
    let mut next = doc.clone();
    next.logos.retain(|l| !is_signature_of(&l.frame.id, index));

    let mut frame = Frame::new(ElementId::signature_image(index, stamp), 0.0, 0.0, width, height);
    frame.z_index = Slot::Logo.canonical_z();
    if let Some(name) = next.text_field(&ElementId::signatory_name(index)) {
        let center_x = name.frame.x + name.frame.width / 2.0;
        place_signature(&mut frame, anchor(center_x, name.frame.y));
    }
    next.logos.push(ImageElement {
        frame,
        src: Some(src),
    });
    next
}
