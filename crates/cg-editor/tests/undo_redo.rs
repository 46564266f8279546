//! Integration tests: editor history (cg-editor).
//!
//! Drives `Editor` the way a canvas front end would: discrete edits,
//! slider and typing gestures, drags with snapping, and multi-selection.

use cg_core::id::ElementId;
use cg_core::model::*;
use cg_editor::edit::Edit;
use cg_editor::history::{EditKey, Property};
use cg_editor::snap::Guide;
use cg_editor::{Editor, EditorConfig};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

const PAGE: PageSize = PageSize::new(1123.0, 794.0);

fn make_editor() -> Editor {
    let doc = Document::from_json(include_str!("fixtures/landscape_starter.json")).unwrap();
    Editor::open(doc, PAGE, EditorConfig::default())
}

fn title() -> ElementId {
    ElementId::new("certTitle")
}

fn recipient() -> ElementId {
    ElementId::new("recipientName")
}

fn origin_of(ed: &Editor, id: &ElementId) -> (f32, f32) {
    let f = ed.document().frame(id).unwrap();
    (f.x, f.y)
}

// ─── Discrete edits ─────────────────────────────────────────────────────

#[test]
fn undo_and_redo_at_the_ends_are_noops() {
    let mut ed = make_editor();
    let before = ed.document().clone();
    assert!(!ed.undo());
    assert!(!ed.redo());
    assert_eq!(ed.document(), &before);
}

#[test]
fn undo_restores_previous_state() {
    let mut ed = make_editor();
    ed.apply(Edit::SetText {
        id: title(),
        content: "DIPLOMA".into(),
    });
    assert_eq!(ed.document().text_field(&title()).unwrap().text_content, "DIPLOMA");

    assert!(ed.undo());
    assert_eq!(
        ed.document().text_field(&title()).unwrap().text_content,
        "CERTIFICATE"
    );
    assert!(ed.redo());
    assert_eq!(ed.document().text_field(&title()).unwrap().text_content, "DIPLOMA");
}

#[test]
fn new_edit_clears_redo() {
    let mut ed = make_editor();
    ed.apply(Edit::SetOpacity {
        id: title(),
        opacity: 0.5,
    });
    ed.undo();
    assert!(ed.can_redo());

    ed.apply(Edit::SetOpacity {
        id: recipient(),
        opacity: 0.7,
    });
    assert!(!ed.can_redo());
    assert_eq!(ed.document().frame(&title()).unwrap().opacity, 1.0);
}

// ─── Continuous gestures ────────────────────────────────────────────────

#[test]
fn slider_gesture_is_one_undo_step() {
    let mut ed = make_editor();
    let key = EditKey::on(&title(), Property::Opacity);
    for step in 1..=10 {
        ed.apply_continuous(
            key.clone(),
            Edit::SetOpacity {
                id: title(),
                opacity: 1.0 - step as f32 * 0.05,
            },
        );
    }
    ed.commit();
    assert!((ed.document().frame(&title()).unwrap().opacity - 0.5).abs() < 1e-6);

    assert!(ed.undo());
    assert_eq!(ed.document().frame(&title()).unwrap().opacity, 1.0);
    assert!(!ed.can_undo(), "the whole slider drag is a single entry");
}

#[test]
fn switching_targets_starts_a_new_step() {
    let mut ed = make_editor();
    for text in ["C", "Ce", "Cer"] {
        ed.apply_continuous(
            EditKey::on(&title(), Property::Text),
            Edit::SetText {
                id: title(),
                content: text.into(),
            },
        );
    }
    for text in ["J", "Jo"] {
        ed.apply_continuous(
            EditKey::on(&recipient(), Property::Text),
            Edit::SetText {
                id: recipient(),
                content: text.into(),
            },
        );
    }

    assert!(ed.undo());
    assert_eq!(
        ed.document().text_field(&recipient()).unwrap().text_content,
        "Recipient Name"
    );
    assert_eq!(ed.document().text_field(&title()).unwrap().text_content, "Cer");
    assert!(ed.undo());
    assert_eq!(
        ed.document().text_field(&title()).unwrap().text_content,
        "CERTIFICATE"
    );
}

#[test]
fn timed_edits_coalesce_inside_window() {
    let mut ed = make_editor();
    let key = EditKey::page(Property::Color);
    let t0 = Instant::now();
    let paint = |color: &str| Edit::SetPaint {
        slot: Slot::Background,
        paint: Paint::Color {
            color: color.into(),
        },
    };

    ed.apply_timed(key.clone(), paint("#eeeeee"), t0);
    ed.apply_timed(key.clone(), paint("#dddddd"), t0 + Duration::from_millis(100));
    ed.apply_timed(key.clone(), paint("#cccccc"), t0 + Duration::from_millis(900));

    assert!(ed.undo());
    assert!(ed.undo());
    assert!(!ed.can_undo(), "two steps: one burst, one late edit");
}

// ─── Dragging ───────────────────────────────────────────────────────────

#[test]
fn drag_snaps_and_records_once() {
    let mut ed = make_editor();
    ed.begin_drag();

    // center at 550: 11.5 px from the page center, no snap
    let free = ed.drag_to(&title(), 250.0, 150.0).unwrap();
    assert!(free.guides.is_empty());
    assert_eq!(origin_of(&ed, &title()), (250.0, 150.0));

    // center at 555: within 10 px, snaps to 561.5
    let snapped = ed.drag_to(&title(), 255.0, 150.0).unwrap();
    assert_eq!(snapped.x, 261.5);
    assert_eq!(ed.guides(), &[Guide::Vertical(561.5)]);

    ed.end_drag();
    assert!(ed.guides().is_empty());
    assert_eq!(origin_of(&ed, &title()), (261.5, 150.0));

    assert!(ed.undo());
    assert_eq!(origin_of(&ed, &title()), (261.5, 80.0));
    assert!(!ed.can_undo());
}

#[test]
fn dragging_moves_whole_selection() {
    let mut ed = make_editor();
    ed.selection_mut().select(title());
    ed.selection_mut().toggle(recipient());

    ed.begin_drag();
    ed.drag_to(&title(), 100.0, 80.0);
    ed.end_drag();

    assert_eq!(origin_of(&ed, &title()), (100.0, 80.0));
    assert_eq!(origin_of(&ed, &recipient()), (0.0, 300.0));
}

#[test]
fn delete_selection_is_one_step() {
    let mut ed = make_editor();
    ed.selection_mut().extend([title(), recipient()]);
    ed.delete_selection();
    assert!(ed.document().text_fields.is_empty());
    assert!(ed.selection().is_empty());

    assert!(ed.undo());
    assert_eq!(ed.document().text_fields.len(), 2);
}
