//! Template ⇄ element conversion.
//!
//! The structured `Document` is what the template editor works on; the
//! free-form certificate editor and the export renderers consume a flat,
//! z-ordered `Element` list instead. `to_elements` flattens a document,
//! `from_elements` folds a list back into slots.
//!
//! Text anchoring differs between the two shapes: a template text field's
//! `x` is the left edge of its box, while a text element's `x` is the point
//! its alignment is drawn from (left edge, center or right edge).

use crate::id::ElementId;
use crate::model::*;
use serde::{Deserialize, Serialize};

/// A flat, renderer-facing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub kind: ElementKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "full_opacity")]
    pub opacity: f32,
    pub z_index: i32,
}

fn full_opacity() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    /// Image overlay; `role` records which template slot it came from.
    Image { src: Option<String>, role: Slot },
    /// Flat color rectangle (color backgrounds and inner frames).
    Fill { color: String, role: Slot },
    Border {
        style: BorderStyle,
        color: String,
        thickness: f32,
        padding: f32,
    },
    CornerFrame { color: String, size: f32 },
    Text { content: String, style: TextStyle },
}

// ─── Template → Elements ─────────────────────────────────────────────────

/// Flatten a template into renderer elements, sorted by paint order.
///
/// Empty slots produce nothing. The background always covers the whole
/// page regardless of its stored geometry.
pub fn to_elements(doc: &Document, page: PageSize) -> Vec<Element> {
    let mut out = Vec::new();

    if let Some(bg) = &doc.background {
        let mut el = element_from_frame(&bg.frame, paint_kind(&bg.paint, Slot::Background), Slot::Background);
        el.x = 0.0;
        el.y = 0.0;
        el.width = page.width;
        el.height = page.height;
        out.push(el);
    }

    if let Some(border) = &doc.border {
        let kind = match &border.kind {
            BorderKind::Image { src } => ElementKind::Image {
                src: src.clone(),
                role: Slot::Border,
            },
            BorderKind::Parametric {
                style,
                color,
                thickness,
                padding,
            } => ElementKind::Border {
                style: *style,
                color: color.clone(),
                thickness: *thickness,
                padding: *padding,
            },
        };
        out.push(element_from_frame(&border.frame, kind, Slot::Border));
    }

    if let Some(inner) = &doc.inner_frame {
        out.push(element_from_frame(
            &inner.frame,
            paint_kind(&inner.paint, Slot::InnerFrame),
            Slot::InnerFrame,
        ));
    }

    if let Some(corners) = &doc.corner_frames {
        let kind = match &corners.kind {
            CornerKind::Image { src } => ElementKind::Image {
                src: src.clone(),
                role: Slot::CornerFrames,
            },
            CornerKind::Css { color, size } => ElementKind::CornerFrame {
                color: color.clone(),
                size: *size,
            },
        };
        out.push(element_from_frame(&corners.frame, kind, Slot::CornerFrames));
    }

    if let Some(mark) = &doc.watermark {
        out.push(image_element(mark, Slot::Watermark));
    }
    out.extend(doc.logos.iter().map(|l| image_element(l, Slot::Logo)));
    out.extend(
        doc.custom_images
            .iter()
            .map(|i| image_element(i, Slot::CustomImage)),
    );
    out.extend(doc.text_fields.iter().map(text_element));

    // Stable: equal z keeps slot then collection order.
    out.sort_by_key(|e| e.z_index);
    out
}

fn paint_kind(paint: &Paint, role: Slot) -> ElementKind {
    match paint {
        Paint::Image { src } => ElementKind::Image {
            src: src.clone(),
            role,
        },
        Paint::Color { color } => ElementKind::Fill {
            color: color.clone(),
            role,
        },
    }
}

fn image_element(image: &ImageElement, role: Slot) -> Element {
    element_from_frame(
        &image.frame,
        ElementKind::Image {
            src: image.src.clone(),
            role,
        },
        role,
    )
}

fn element_from_frame(frame: &Frame, kind: ElementKind, slot: Slot) -> Element {
    Element {
        id: frame.id.clone(),
        kind,
        x: frame.x,
        y: frame.y,
        width: frame.width,
        height: frame.height,
        rotation: frame.rotation,
        opacity: frame.opacity,
        z_index: slot
            .canonical_z()
            .unwrap_or_else(|| frame.z_index.unwrap_or(DEFAULT_TEXT_Z)),
    }
}

fn text_element(field: &TextField) -> Element {
    let mut el = element_from_frame(
        &field.frame,
        ElementKind::Text {
            content: field.text_content.clone(),
            style: field.style.clone(),
        },
        Slot::TextField,
    );
    el.x = anchor_x(field.frame.x, field.frame.width, field.style.align);
    el
}

/// Drawing anchor of a text box whose left edge is at `x`.
pub fn anchor_x(x: f32, width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => x,
        TextAlign::Center => x + width / 2.0,
        TextAlign::Right => x + width,
    }
}

/// Left edge of a text box drawn from anchor `x`.
pub fn left_edge_x(anchor: f32, width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => anchor,
        TextAlign::Center => anchor - width / 2.0,
        TextAlign::Right => anchor - width,
    }
}

// ─── Elements → Template ─────────────────────────────────────────────────

/// Fold a flat element list back into a structured template.
///
/// Singleton slots keep the last element that claims them. Image elements
/// tagged with a text or unknown role land in `custom_images`.
pub fn from_elements(elements: &[Element]) -> Document {
    let mut doc = Document::new();

    for el in elements {
        let mut frame = Frame {
            id: el.id.clone(),
            x: el.x,
            y: el.y,
            width: el.width,
            height: el.height,
            rotation: el.rotation,
            opacity: el.opacity,
            z_index: None,
        };

        match &el.kind {
            ElementKind::Image { src, role } => {
                let src = src.clone();
                frame.z_index = role.canonical_z().filter(|_| role.is_singleton());
                match role {
                    Slot::Background => {
                        replace_singleton(&mut doc.background, Background {
                            frame,
                            paint: Paint::Image { src },
                        })
                    }
                    Slot::Border => replace_singleton(&mut doc.border, Border {
                        frame,
                        kind: BorderKind::Image { src },
                    }),
                    Slot::InnerFrame => replace_singleton(&mut doc.inner_frame, InnerFrame {
                        frame,
                        paint: Paint::Image { src },
                    }),
                    Slot::CornerFrames => replace_singleton(&mut doc.corner_frames, CornerFrames {
                        frame,
                        kind: CornerKind::Image { src },
                    }),
                    Slot::Watermark => {
                        replace_singleton(&mut doc.watermark, ImageElement { frame, src })
                    }
                    Slot::Logo => doc.logos.push(ImageElement { frame, src }),
                    Slot::CustomImage | Slot::TextField => {
                        doc.custom_images.push(ImageElement { frame, src })
                    }
                }
            }
            ElementKind::Fill { color, role } => {
                let paint = Paint::Color {
                    color: color.clone(),
                };
                if *role == Slot::InnerFrame {
                    frame.z_index = Slot::InnerFrame.canonical_z();
                    replace_singleton(&mut doc.inner_frame, InnerFrame { frame, paint });
                } else {
                    frame.z_index = Slot::Background.canonical_z();
                    replace_singleton(&mut doc.background, Background { frame, paint });
                }
            }
            ElementKind::Border {
                style,
                color,
                thickness,
                padding,
            } => {
                frame.z_index = Slot::Border.canonical_z();
                replace_singleton(&mut doc.border, Border {
                    frame,
                    kind: BorderKind::Parametric {
                        style: *style,
                        color: color.clone(),
                        thickness: *thickness,
                        padding: *padding,
                    },
                });
            }
            ElementKind::CornerFrame { color, size } => {
                frame.z_index = Slot::CornerFrames.canonical_z();
                replace_singleton(&mut doc.corner_frames, CornerFrames {
                    frame,
                    kind: CornerKind::Css {
                        color: color.clone(),
                        size: *size,
                    },
                });
            }
            ElementKind::Text { content, style } => {
                frame.x = left_edge_x(el.x, el.width, style.align);
                frame.z_index = (el.z_index != DEFAULT_TEXT_Z).then_some(el.z_index);
                doc.text_fields.push(TextField {
                    frame,
                    text_content: content.clone(),
                    style: style.clone(),
                });
            }
        }
    }

    doc
}

fn replace_singleton<T>(slot: &mut Option<T>, value: T) {
    if slot.is_some() {
        log::debug!("element list holds more than one element for a singleton slot; keeping the last");
    }
    *slot = Some(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn title(align: TextAlign) -> TextField {
        TextField {
            frame: Frame::new("certTitle".into(), 100.0, 50.0, 200.0, 40.0),
            text_content: "CERTIFICATE".into(),
            style: TextStyle {
                align,
                ..TextStyle::default()
            },
        }
    }

    #[test]
    fn text_anchor_follows_alignment() {
        let page = PageSize::new(1123.0, 794.0);
        for (align, expected) in [
            (TextAlign::Left, 100.0),
            (TextAlign::Center, 200.0),
            (TextAlign::Right, 300.0),
        ] {
            let mut doc = Document::new();
            doc.text_fields.push(title(align));
            let els = to_elements(&doc, page);
            assert_eq!(els.len(), 1);
            assert_eq!(els[0].x, expected, "{align:?}");
            assert_eq!(els[0].z_index, DEFAULT_TEXT_Z);
        }
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(to_elements(&Document::new(), PageSize::new(800.0, 600.0)).is_empty());
    }

    #[test]
    fn singleton_z_is_canonical_even_when_drifted() {
        let mut doc = Document::new();
        let mut frame = Frame::new("wm".into(), 10.0, 10.0, 100.0, 100.0);
        frame.z_index = Some(99);
        doc.watermark = Some(ImageElement {
            frame,
            src: Some("https://cdn/wm.png".into()),
        });
        let els = to_elements(&doc, PageSize::new(800.0, 600.0));
        assert_eq!(els[0].z_index, 5);
    }

    #[test]
    fn parametric_and_image_encodings() {
        let mut doc = Document::new();
        doc.border = Some(Border {
            frame: Frame::new("border".into(), 0.0, 0.0, 800.0, 600.0),
            kind: BorderKind::Parametric {
                style: BorderStyle::Dashed,
                color: "#000".into(),
                thickness: 4.0,
                padding: 12.0,
            },
        });
        doc.corner_frames = Some(CornerFrames {
            frame: Frame::new("corners".into(), 0.0, 0.0, 800.0, 600.0),
            kind: CornerKind::Image {
                src: Some("https://cdn/c.png".into()),
            },
        });
        let els = to_elements(&doc, PageSize::new(800.0, 600.0));
        assert!(matches!(els[0].kind, ElementKind::Border { thickness, .. } if thickness == 4.0));
        assert_eq!(
            els[1].kind,
            ElementKind::Image {
                src: Some("https://cdn/c.png".into()),
                role: Slot::CornerFrames
            }
        );
    }

    #[test]
    fn element_json_is_type_tagged() {
        let mut doc = Document::new();
        doc.text_fields.push(title(TextAlign::Left));
        let els = to_elements(&doc, PageSize::new(800.0, 600.0));
        let json = serde_json::to_value(&els[0]).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["content"], "CERTIFICATE");
        assert_eq!(json["zIndex"], 20);
    }

    #[test]
    fn from_elements_restores_left_edge() {
        let mut doc = Document::new();
        doc.text_fields.push(title(TextAlign::Right));
        let back = from_elements(&to_elements(&doc, PageSize::new(800.0, 600.0)));
        assert_eq!(back.text_fields[0].frame.x, 100.0);
        assert_eq!(back, doc);
    }
}
