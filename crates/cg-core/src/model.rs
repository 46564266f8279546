//! Structured certificate template model.
//!
//! A `Document` is a fixed set of named slots rather than a free-form
//! layer list: at most one background, border, inner frame, corner frame set
//! and watermark, plus ordered collections of logos, free images and text
//! fields. Every slot payload is a tagged sum type so that, for example, a
//! parametric border can never carry an image source by accident.
//!
//! The JSON shape (camelCase, `fill`/`kind` tags) is the persisted
//! `canvas_state` contract.

use crate::id::ElementId;
use serde::{Deserialize, Serialize};

/// Paint order of a text field when it does not carry its own.
pub const DEFAULT_TEXT_Z: i32 = 20;

// ─── Geometry ────────────────────────────────────────────────────────────

/// Geometry shared by every positional element.
///
/// `x`/`y` are the top-left corner in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: ElementId,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

fn default_opacity() -> f32 {
    1.0
}

impl Frame {
    pub fn new(id: ElementId, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            z_index: None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if this bounds intersects with another (AABB overlap).
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

// ─── Page ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Supported paper formats, sized at 96 dpi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    A4,
    Letter,
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn for_format(format: PaperFormat, orientation: Orientation) -> Self {
        let (short, long) = match format {
            PaperFormat::A4 => (794.0, 1123.0),
            PaperFormat::Letter => (816.0, 1056.0),
        };
        match orientation {
            Orientation::Landscape => Self::new(long, short),
            Orientation::Portrait => Self::new(short, long),
        }
    }

    /// Landscape iff strictly wider than tall.
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
    }
}

// ─── Slot payloads ───────────────────────────────────────────────────────

/// Flat color or image fill for rectangular slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fill", rename_all = "camelCase")]
pub enum Paint {
    Image {
        #[serde(default)]
        src: Option<String>,
    },
    Color {
        color: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BorderKind {
    Image {
        #[serde(default)]
        src: Option<String>,
    },
    Parametric {
        #[serde(default)]
        style: BorderStyle,
        color: String,
        thickness: f32,
        #[serde(default)]
        padding: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CornerKind {
    Image {
        #[serde(default)]
        src: Option<String>,
    },
    /// Four rotated corner triangles drawn from a color and leg size.
    Css { color: String, size: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(flatten)]
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(flatten)]
    pub kind: BorderKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnerFrame {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(flatten)]
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerFrames {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(flatten)]
    pub kind: CornerKind,
}

/// Watermarks, logos, signatures and free images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub src: Option<String>,
}

// ─── Text ────────────────────────────────────────────────────────────────

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16, // 100..900
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub text_transform: TextTransform,
    pub align: TextAlign,
    pub line_height: f32,
    pub letter_spacing: f32,
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Georgia".into(),
            font_size: 24.0,
            font_weight: 400,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            text_transform: TextTransform::None,
            align: TextAlign::Center,
            line_height: 1.2,
            letter_spacing: 0.0,
            color: "#1f2937".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub text_content: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

// ─── Slots ───────────────────────────────────────────────────────────────

/// Structural role of an element inside a `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    Background,
    Border,
    InnerFrame,
    CornerFrames,
    Watermark,
    Logo,
    CustomImage,
    TextField,
}

impl Slot {
    /// Fixed paint order of the slot, if the slot dictates one.
    /// Text fields stack by their own `z_index`.
    pub fn canonical_z(self) -> Option<i32> {
        match self {
            Slot::Background => Some(1),
            Slot::Border => Some(2),
            Slot::InnerFrame => Some(3),
            Slot::CornerFrames => Some(4),
            Slot::Watermark => Some(5),
            Slot::Logo => Some(10),
            Slot::CustomImage => Some(11),
            Slot::TextField => None,
        }
    }

    pub fn is_singleton(self) -> bool {
        !matches!(self, Slot::Logo | Slot::CustomImage | Slot::TextField)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Background => "background",
            Slot::Border => "border",
            Slot::InnerFrame => "innerFrame",
            Slot::CornerFrames => "cornerFrames",
            Slot::Watermark => "watermark",
            Slot::Logo => "logo",
            Slot::CustomImage => "customImage",
            Slot::TextField => "textField",
        }
    }
}

/// Address of one image reference inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetLocation {
    Background,
    Border,
    InnerFrame,
    CornerFrames,
    Watermark,
    Logo(usize),
    CustomImage(usize),
}

impl AssetLocation {
    pub fn slot(self) -> Slot {
        match self {
            AssetLocation::Background => Slot::Background,
            AssetLocation::Border => Slot::Border,
            AssetLocation::InnerFrame => Slot::InnerFrame,
            AssetLocation::CornerFrames => Slot::CornerFrames,
            AssetLocation::Watermark => Slot::Watermark,
            AssetLocation::Logo(_) => Slot::Logo,
            AssetLocation::CustomImage(_) => Slot::CustomImage,
        }
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// The structural certificate template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_frame: Option<InnerFrame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_frames: Option<CornerFrames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<ImageElement>,
    #[serde(default)]
    pub logos: Vec<ImageElement>,
    #[serde(default)]
    pub custom_images: Vec<ImageElement>,
    #[serde(default)]
    pub text_fields: Vec<TextField>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted `canvas_state` JSON document.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Template parse error: {e}"))
    }

    pub fn to_json(&self) -> String {
        // A document only holds strings, numbers and enums.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.frames().next().is_none()
    }

    /// Every element's geometry with its slot, in slot order.
    pub fn frames(&self) -> impl Iterator<Item = (Slot, &Frame)> {
        self.background
            .iter()
            .map(|b| (Slot::Background, &b.frame))
            .chain(self.border.iter().map(|b| (Slot::Border, &b.frame)))
            .chain(self.inner_frame.iter().map(|f| (Slot::InnerFrame, &f.frame)))
            .chain(self.corner_frames.iter().map(|c| (Slot::CornerFrames, &c.frame)))
            .chain(self.watermark.iter().map(|w| (Slot::Watermark, &w.frame)))
            .chain(self.logos.iter().map(|l| (Slot::Logo, &l.frame)))
            .chain(self.custom_images.iter().map(|i| (Slot::CustomImage, &i.frame)))
            .chain(self.text_fields.iter().map(|t| (Slot::TextField, &t.frame)))
    }

    pub fn frames_mut(&mut self) -> impl Iterator<Item = (Slot, &mut Frame)> {
        self.background
            .iter_mut()
            .map(|b| (Slot::Background, &mut b.frame))
            .chain(self.border.iter_mut().map(|b| (Slot::Border, &mut b.frame)))
            .chain(
                self.inner_frame
                    .iter_mut()
                    .map(|f| (Slot::InnerFrame, &mut f.frame)),
            )
            .chain(
                self.corner_frames
                    .iter_mut()
                    .map(|c| (Slot::CornerFrames, &mut c.frame)),
            )
            .chain(self.watermark.iter_mut().map(|w| (Slot::Watermark, &mut w.frame)))
            .chain(self.logos.iter_mut().map(|l| (Slot::Logo, &mut l.frame)))
            .chain(
                self.custom_images
                    .iter_mut()
                    .map(|i| (Slot::CustomImage, &mut i.frame)),
            )
            .chain(
                self.text_fields
                    .iter_mut()
                    .map(|t| (Slot::TextField, &mut t.frame)),
            )
    }

    pub fn frame(&self, id: &ElementId) -> Option<&Frame> {
        self.frames().find(|(_, f)| &f.id == id).map(|(_, f)| f)
    }

    pub fn frame_mut(&mut self, id: &ElementId) -> Option<&mut Frame> {
        self.frames_mut().find(|(_, f)| &f.id == id).map(|(_, f)| f)
    }

    pub fn slot_of(&self, id: &ElementId) -> Option<Slot> {
        self.frames().find(|(_, f)| &f.id == id).map(|(s, _)| s)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.frame(id).is_some()
    }

    pub fn text_field(&self, id: &ElementId) -> Option<&TextField> {
        self.text_fields.iter().find(|t| &t.frame.id == id)
    }

    pub fn text_field_mut(&mut self, id: &ElementId) -> Option<&mut TextField> {
        self.text_fields.iter_mut().find(|t| &t.frame.id == id)
    }

    pub fn logo(&self, id: &ElementId) -> Option<&ImageElement> {
        self.logos.iter().find(|l| &l.frame.id == id)
    }

    pub fn logo_mut(&mut self, id: &ElementId) -> Option<&mut ImageElement> {
        self.logos.iter_mut().find(|l| &l.frame.id == id)
    }

    /// Remove the element with `id` from whichever slot holds it.
    /// Returns `false` if no element matched.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        match self.slot_of(id) {
            Some(Slot::Background) => self.background = None,
            Some(Slot::Border) => self.border = None,
            Some(Slot::InnerFrame) => self.inner_frame = None,
            Some(Slot::CornerFrames) => self.corner_frames = None,
            Some(Slot::Watermark) => self.watermark = None,
            Some(Slot::Logo) => self.logos.retain(|l| &l.frame.id != id),
            Some(Slot::CustomImage) => self.custom_images.retain(|i| &i.frame.id != id),
            Some(Slot::TextField) => self.text_fields.retain(|t| &t.frame.id != id),
            None => return false,
        }
        true
    }

    /// Active signatory slot indices, sorted and deduplicated.
    pub fn signatory_indices(&self) -> Vec<u8> {
        let mut indices: Vec<u8> = self
            .text_fields
            .iter()
            .filter_map(|t| match t.frame.id.role() {
                crate::id::IdRole::SignatoryName(i) | crate::id::IdRole::SignatoryRole(i) => {
                    Some(i)
                }
                _ => None,
            })
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Every image reference in the document with its location.
    /// Dropped references (`None`) are skipped.
    pub fn asset_refs(&self) -> Vec<(AssetLocation, ElementId, String)> {
        let mut refs = Vec::new();
        if let Some(Background {
            frame,
            paint: Paint::Image { src: Some(src) },
        }) = &self.background
        {
            refs.push((AssetLocation::Background, frame.id.clone(), src.clone()));
        }
        if let Some(Border {
            frame,
            kind: BorderKind::Image { src: Some(src) },
        }) = &self.border
        {
            refs.push((AssetLocation::Border, frame.id.clone(), src.clone()));
        }
        if let Some(InnerFrame {
            frame,
            paint: Paint::Image { src: Some(src) },
        }) = &self.inner_frame
        {
            refs.push((AssetLocation::InnerFrame, frame.id.clone(), src.clone()));
        }
        if let Some(CornerFrames {
            frame,
            kind: CornerKind::Image { src: Some(src) },
        }) = &self.corner_frames
        {
            refs.push((AssetLocation::CornerFrames, frame.id.clone(), src.clone()));
        }
        if let Some(ImageElement {
            frame,
            src: Some(src),
        }) = &self.watermark
        {
            refs.push((AssetLocation::Watermark, frame.id.clone(), src.clone()));
        }
        for (i, logo) in self.logos.iter().enumerate() {
            if let Some(src) = &logo.src {
                refs.push((AssetLocation::Logo(i), logo.frame.id.clone(), src.clone()));
            }
        }
        for (i, image) in self.custom_images.iter().enumerate() {
            if let Some(src) = &image.src {
                refs.push((
                    AssetLocation::CustomImage(i),
                    image.frame.id.clone(),
                    src.clone(),
                ));
            }
        }
        refs
    }

    /// Mutable access to the image reference at `location`.
    /// Returns `None` if the slot is empty or is not image-backed.
    pub fn asset_mut(&mut self, location: AssetLocation) -> Option<&mut Option<String>> {
        match location {
            AssetLocation::Background => match &mut self.background.as_mut()?.paint {
                Paint::Image { src } => Some(src),
                Paint::Color { .. } => None,
            },
            AssetLocation::Border => match &mut self.border.as_mut()?.kind {
                BorderKind::Image { src } => Some(src),
                BorderKind::Parametric { .. } => None,
            },
            AssetLocation::InnerFrame => match &mut self.inner_frame.as_mut()?.paint {
                Paint::Image { src } => Some(src),
                Paint::Color { .. } => None,
            },
            AssetLocation::CornerFrames => match &mut self.corner_frames.as_mut()?.kind {
                CornerKind::Image { src } => Some(src),
                CornerKind::Css { .. } => None,
            },
            AssetLocation::Watermark => Some(&mut self.watermark.as_mut()?.src),
            AssetLocation::Logo(i) => Some(&mut self.logos.get_mut(i)?.src),
            AssetLocation::CustomImage(i) => Some(&mut self.custom_images.get_mut(i)?.src),
        }
    }
}
