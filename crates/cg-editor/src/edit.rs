//! Document edits and the reducer that applies them.
//!
//! The document is a value: `apply` takes the current snapshot and an
//! `Edit` and returns the next snapshot. Edits naming an id that does not
//! exist are ignored; the reducer never fails.

use cg_core::id::ElementId;
use cg_core::model::*;
use smallvec::SmallVec;

/// A discrete change to a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    SetBackground(Option<Background>),
    SetBorder(Option<Border>),
    SetInnerFrame(Option<InnerFrame>),
    SetCornerFrames(Option<CornerFrames>),
    SetWatermark(Option<ImageElement>),
    AddLogo(ImageElement),
    AddCustomImage(ImageElement),
    AddTextField(TextField),
    Remove {
        id: ElementId,
    },
    /// Translate every listed element by the same delta.
    Move {
        ids: SmallVec<[ElementId; 4]>,
        dx: f32,
        dy: f32,
    },
    /// Absolute geometry from a transform handle.
    Transform {
        id: ElementId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
    },
    SetText {
        id: ElementId,
        content: String,
    },
    SetTextStyle {
        id: ElementId,
        style: TextStyle,
    },
    SetOpacity {
        id: ElementId,
        opacity: f32,
    },
    SetZIndex {
        id: ElementId,
        z: i32,
    },
    /// Replace the image reference of any image-backed element.
    SetImageSource {
        id: ElementId,
        src: Option<String>,
    },
    /// Replace the fill of the background or inner frame.
    SetPaint {
        slot: Slot,
        paint: Paint,
    },
}

/// Apply `edit` to `doc`, producing the next document.
pub fn apply(doc: &Document, edit: &Edit) -> Document {
    let mut next = doc.clone();
    apply_in_place(&mut next, edit);
    next
}

/// In-place variant used when the caller already owns a working copy.
pub fn apply_in_place(doc: &mut Document, edit: &Edit) {
    match edit {
        Edit::SetBackground(bg) => doc.background = bg.clone(),
        Edit::SetBorder(border) => doc.border = border.clone(),
        Edit::SetInnerFrame(inner) => doc.inner_frame = inner.clone(),
        Edit::SetCornerFrames(corners) => doc.corner_frames = corners.clone(),
        Edit::SetWatermark(mark) => doc.watermark = mark.clone(),
        Edit::AddLogo(logo) => {
            if !doc.contains(&logo.frame.id) {
                doc.logos.push(logo.clone());
            }
        }
        Edit::AddCustomImage(image) => {
            if !doc.contains(&image.frame.id) {
                doc.custom_images.push(image.clone());
            }
        }
        Edit::AddTextField(field) => {
            if !doc.contains(&field.frame.id) {
                doc.text_fields.push(field.clone());
            }
        }
        Edit::Remove { id } => {
            doc.remove(id);
        }
        Edit::Move { ids, dx, dy } => {
            for (_, frame) in doc.frames_mut() {
                if ids.contains(&frame.id) {
                    frame.x += dx;
                    frame.y += dy;
                }
            }
        }
        Edit::Transform {
            id,
            x,
            y,
            width,
            height,
            rotation,
        } => {
            if let Some(frame) = doc.frame_mut(id) {
                frame.x = *x;
                frame.y = *y;
                frame.width = width.max(0.0);
                frame.height = height.max(0.0);
                frame.rotation = *rotation;
            }
        }
        Edit::SetText { id, content } => {
            if let Some(field) = doc.text_field_mut(id) {
                field.text_content = content.clone();
            }
        }
        Edit::SetTextStyle { id, style } => {
            if let Some(field) = doc.text_field_mut(id) {
                field.style = style.clone();
            }
        }
        Edit::SetOpacity { id, opacity } => {
            if let Some(frame) = doc.frame_mut(id) {
                frame.opacity = opacity.clamp(0.0, 1.0);
            }
        }
        Edit::SetZIndex { id, z } => {
            if let Some(frame) = doc.frame_mut(id) {
                frame.z_index = Some(*z);
            }
        }
        Edit::SetImageSource { id, src } => set_image_source(doc, id, src.clone()),
        Edit::SetPaint { slot, paint } => match slot {
            Slot::Background => {
                if let Some(bg) = &mut doc.background {
                    bg.paint = paint.clone();
                }
            }
            Slot::InnerFrame => {
                if let Some(inner) = &mut doc.inner_frame {
                    inner.paint = paint.clone();
                }
            }
            other => log::debug!("SetPaint ignored for slot {}", other.as_str()),
        },
    }
}

fn set_image_source(doc: &mut Document, id: &ElementId, new_src: Option<String>) {
    let target = match doc.slot_of(id) {
        Some(Slot::Background) => doc.background.as_mut().and_then(|b| match &mut b.paint {
            Paint::Image { src } => Some(src),
            Paint::Color { .. } => None,
        }),
        Some(Slot::Border) => doc.border.as_mut().and_then(|b| match &mut b.kind {
            BorderKind::Image { src } => Some(src),
            BorderKind::Parametric { .. } => None,
        }),
        Some(Slot::InnerFrame) => doc.inner_frame.as_mut().and_then(|f| match &mut f.paint {
            Paint::Image { src } => Some(src),
            Paint::Color { .. } => None,
        }),
        Some(Slot::CornerFrames) => doc.corner_frames.as_mut().and_then(|c| match &mut c.kind {
            CornerKind::Image { src } => Some(src),
            CornerKind::Css { .. } => None,
        }),
        Some(Slot::Watermark) => doc.watermark.as_mut().map(|w| &mut w.src),
        Some(Slot::Logo) => doc.logo_mut(id).map(|l| &mut l.src),
        Some(Slot::CustomImage) => doc
            .custom_images
            .iter_mut()
            .find(|i| &i.frame.id == id)
            .map(|i| &mut i.src),
        Some(Slot::TextField) | None => None,
    };
    if let Some(src) = target {
        *src = new_src;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn doc_with_text() -> Document {
        let mut doc = Document::new();
        doc.text_fields.push(TextField {
            frame: Frame::new("certTitle".into(), 100.0, 50.0, 600.0, 60.0),
            text_content: "CERTIFICATE".into(),
            style: TextStyle::default(),
        });
        doc.logos.push(ImageElement {
            frame: Frame::new("logo_0".into(), 10.0, 10.0, 80.0, 80.0),
            src: None,
        });
        doc
    }

    #[test]
    fn apply_leaves_input_untouched() {
        let doc = doc_with_text();
        let next = apply(
            &doc,
            &Edit::SetText {
                id: "certTitle".into(),
                content: "DIPLOMA".into(),
            },
        );
        assert_eq!(doc.text_fields[0].text_content, "CERTIFICATE");
        assert_eq!(next.text_fields[0].text_content, "DIPLOMA");
    }

    #[test]
    fn move_translates_all_listed() {
        let doc = doc_with_text();
        let next = apply(
            &doc,
            &Edit::Move {
                ids: smallvec!["certTitle".into(), "logo_0".into()],
                dx: 5.0,
                dy: -5.0,
            },
        );
        assert_eq!((next.text_fields[0].frame.x, next.text_fields[0].frame.y), (105.0, 45.0));
        assert_eq!((next.logos[0].frame.x, next.logos[0].frame.y), (15.0, 5.0));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let doc = doc_with_text();
        let next = apply(
            &doc,
            &Edit::SetOpacity {
                id: "nope".into(),
                opacity: 0.2,
            },
        );
        assert_eq!(next, doc);
    }

    #[test]
    fn opacity_is_clamped() {
        let next = apply(
            &doc_with_text(),
            &Edit::SetOpacity {
                id: "logo_0".into(),
                opacity: 3.0,
            },
        );
        assert_eq!(next.logos[0].frame.opacity, 1.0);
    }

    #[test]
    fn duplicate_add_is_ignored() {
        let doc = doc_with_text();
        let logo = doc.logos[0].clone();
        let next = apply(&doc, &Edit::AddLogo(logo));
        assert_eq!(next.logos.len(), 1);
    }

    #[test]
    fn set_image_source_on_logo_and_color_background() {
        let mut doc = doc_with_text();
        doc.background = Some(Background {
            frame: Frame::new("background".into(), 0.0, 0.0, 10.0, 10.0),
            paint: Paint::Color {
                color: "#fff".into(),
            },
        });
        let next = apply(
            &doc,
            &Edit::SetImageSource {
                id: "logo_0".into(),
                src: Some("blob:1".into()),
            },
        );
        assert_eq!(next.logos[0].src.as_deref(), Some("blob:1"));

        let same = apply(
            &next,
            &Edit::SetImageSource {
                id: "background".into(),
                src: Some("blob:2".into()),
            },
        );
        assert_eq!(same.background, next.background);
    }
}
