//! Integration tests: signatory blocks through the editor (cg-editor).

use cg_core::id::ElementId;
use cg_core::model::*;
use cg_editor::{Edit, Editor, EditorConfig};
use pretty_assertions::assert_eq;

const LANDSCAPE: PageSize = PageSize::new(1123.0, 794.0);

fn name_center(ed: &Editor, index: u8) -> (f32, f32) {
    let f = ed.document().frame(&ElementId::signatory_name(index)).unwrap();
    (f.x + f.width / 2.0, f.y)
}

fn role_y(ed: &Editor, index: u8) -> f32 {
    ed.document()
        .frame(&ElementId::signatory_role(index))
        .unwrap()
        .y
}

#[test]
fn adding_reflows_existing_blocks() {
    let mut ed = Editor::new(LANDSCAPE, EditorConfig::default());
    assert_eq!(ed.add_signatory(), Some(0));
    assert_eq!(name_center(&ed, 0), (561.5, 644.0));

    assert_eq!(ed.add_signatory(), Some(1));
    assert_eq!(name_center(&ed, 0), (280.75, 644.0));
    assert_eq!(name_center(&ed, 1), (842.25, 644.0));
    assert_eq!(role_y(&ed, 1), 664.0);
}

#[test]
fn at_most_four_signatories() {
    let mut ed = Editor::new(LANDSCAPE, EditorConfig::default());
    for expected in 0..4 {
        assert_eq!(ed.add_signatory(), Some(expected));
    }
    assert_eq!(ed.add_signatory(), None);
    assert_eq!(ed.document().signatory_indices(), vec![0, 1, 2, 3]);

    // four blocks spread 20 px beyond the quarter lines
    assert_eq!(name_center(&ed, 0), (260.75, 584.0));
    assert_eq!(name_center(&ed, 3), (862.25, 674.0));
}

#[test]
fn removing_second_of_three() {
    let mut ed = Editor::new(LANDSCAPE, EditorConfig::default());
    for _ in 0..3 {
        ed.add_signatory();
    }
    let sig = ed.attach_signature(2, "blob:sig-2", 1_700_000_000_000, 120.0, 60.0);
    assert_eq!(
        sig,
        Some(ElementId::new("signature_img_2_1700000000000"))
    );

    assert!(ed.remove_signatory(1));
    assert!(!ed.remove_signatory(1), "already removed");

    assert_eq!(ed.document().signatory_indices(), vec![0, 2]);
    assert_eq!(name_center(&ed, 0), (280.75, 644.0));
    assert_eq!(name_center(&ed, 2), (842.25, 644.0));

    // signature image followed block 2 to its new place
    let img = ed.document().logos[0].frame.clone();
    assert_eq!((img.x, img.y), (782.25, 594.0));

    // one undo brings the middle block back in its three-up position
    assert!(ed.undo());
    assert_eq!(ed.document().signatory_indices(), vec![0, 1, 2]);
    assert_eq!(name_center(&ed, 2), (561.5, 674.0));
}

#[test]
fn signature_requires_active_signatory() {
    let mut ed = Editor::new(LANDSCAPE, EditorConfig::default());
    assert_eq!(ed.attach_signature(0, "blob:x", 1, 100.0, 40.0), None);
    assert!(!ed.can_undo());
}

#[test]
fn orientation_switch_relayouts() {
    let mut ed = Editor::new(LANDSCAPE, EditorConfig::default());
    ed.add_signatory();
    ed.add_signatory();

    ed.set_page(PageSize::new(816.0, 1056.0));
    assert_eq!(name_center(&ed, 0), (408.0, 780.0));
    assert_eq!(name_center(&ed, 1), (408.0, 900.0));
    assert!(ed.lint().is_empty());
}

#[test]
fn deleting_selected_pair_reflows_and_drops_signature() {
    let mut ed = Editor::new(LANDSCAPE, EditorConfig::default());
    for _ in 0..3 {
        ed.add_signatory();
    }
    ed.attach_signature(1, "blob:sig-1", 7, 120.0, 60.0);
    let before = ed.document().clone();

    ed.selection_mut().extend([
        ElementId::signatory_name(1),
        ElementId::signatory_role(1),
    ]);
    ed.delete_selection();

    assert_eq!(ed.document().signatory_indices(), vec![0, 2]);
    assert_eq!(name_center(&ed, 0), (280.75, 644.0));
    assert_eq!(name_center(&ed, 2), (842.25, 644.0));
    assert!(ed.document().logos.is_empty());
    assert!(ed.selection().is_empty());

    assert!(ed.undo());
    assert_eq!(ed.document(), &before);
}

#[test]
fn removing_fields_one_by_one() {
    let mut ed = Editor::new(LANDSCAPE, EditorConfig::default());
    ed.add_signatory();
    ed.add_signatory();
    ed.attach_signature(0, "blob:sig-0", 3, 120.0, 60.0);

    // the role still holds the block in place
    ed.apply(Edit::Remove {
        id: ElementId::signatory_name(0),
    });
    assert_eq!(ed.document().signatory_indices(), vec![0, 1]);
    assert_eq!(name_center(&ed, 1), (842.25, 644.0));
    assert_eq!(ed.document().logos.len(), 1);

    ed.apply(Edit::Remove {
        id: ElementId::signatory_role(0),
    });
    assert_eq!(ed.document().signatory_indices(), vec![1]);
    assert_eq!(name_center(&ed, 1), (561.5, 644.0));
    assert!(ed.document().logos.is_empty());
}

#[test]
fn undoing_orientation_switch_restores_page() {
    let mut ed = Editor::new(LANDSCAPE, EditorConfig::default());
    ed.add_signatory();
    ed.set_page(PageSize::new(816.0, 1056.0));

    assert!(ed.undo());
    assert_eq!(ed.page(), LANDSCAPE);
    assert_eq!(name_center(&ed, 0), (561.5, 644.0));

    // the next block is placed on the restored page
    ed.add_signatory();
    assert_eq!(name_center(&ed, 0), (280.75, 644.0));
    assert!(ed.lint().is_empty());
}
