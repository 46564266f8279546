//! Named text fields a certificate template can toggle on and off.

use crate::id::ElementId;
use crate::model::*;

/// Built-in certificate text fields, keyed by their stable ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextPreset {
    Title,
    Subtitle,
    PresentedTo,
    RecipientName,
    Description,
    IssueDate,
    CertificateId,
}

impl TextPreset {
    pub const ALL: [TextPreset; 7] = [
        TextPreset::Title,
        TextPreset::Subtitle,
        TextPreset::PresentedTo,
        TextPreset::RecipientName,
        TextPreset::Description,
        TextPreset::IssueDate,
        TextPreset::CertificateId,
    ];

    pub fn id(self) -> ElementId {
        ElementId::new(match self {
            TextPreset::Title => "certTitle",
            TextPreset::Subtitle => "certSubtitle",
            TextPreset::PresentedTo => "presentedTo",
            TextPreset::RecipientName => "recipientName",
            TextPreset::Description => "description",
            TextPreset::IssueDate => "issueDate",
            TextPreset::CertificateId => "certificateId",
        })
    }

    pub fn from_id(id: &ElementId) -> Option<Self> {
        Self::ALL.into_iter().find(|p| &p.id() == id)
    }

    /// Default field for this preset, laid out relative to `page`.
    ///
    /// Vertical positions are fractions of the page height so that the
    /// same preset reads well on landscape and portrait pages.
    pub fn field(self, page: PageSize) -> TextField {
        let margin = page.width * 0.1;
        let full = page.width - 2.0 * margin;
        let (content, y_frac, height, style) = match self {
            TextPreset::Title => (
                "CERTIFICATE",
                0.12,
                64.0,
                TextStyle {
                    font_size: 48.0,
                    font_weight: 700,
                    letter_spacing: 4.0,
                    ..TextStyle::default()
                },
            ),
            TextPreset::Subtitle => (
                "OF ACHIEVEMENT",
                0.22,
                36.0,
                TextStyle {
                    font_size: 24.0,
                    letter_spacing: 2.0,
                    text_transform: TextTransform::Uppercase,
                    ..TextStyle::default()
                },
            ),
            TextPreset::PresentedTo => (
                "This certificate is proudly presented to",
                0.32,
                28.0,
                TextStyle {
                    font_size: 18.0,
                    font_style: FontStyle::Italic,
                    ..TextStyle::default()
                },
            ),
            TextPreset::RecipientName => (
                "Recipient Name",
                0.40,
                56.0,
                TextStyle {
                    font_family: "Great Vibes".into(),
                    font_size: 44.0,
                    ..TextStyle::default()
                },
            ),
            TextPreset::Description => (
                "For outstanding dedication and exceptional performance.",
                0.52,
                60.0,
                TextStyle {
                    font_size: 18.0,
                    line_height: 1.5,
                    ..TextStyle::default()
                },
            ),
            TextPreset::IssueDate => (
                "Date",
                0.64,
                24.0,
                TextStyle {
                    font_size: 16.0,
                    ..TextStyle::default()
                },
            ),
            TextPreset::CertificateId => (
                "Certificate ID",
                0.94,
                20.0,
                TextStyle {
                    font_size: 12.0,
                    align: TextAlign::Right,
                    ..TextStyle::default()
                },
            ),
        };
        TextField {
            frame: Frame::new(self.id(), margin, page.height * y_frac, full, height),
            text_content: content.to_string(),
            style,
        }
    }
}

/// Default signatory name/role pair for slot `index`, unpositioned.
/// The signatory layout solver places them.
pub fn signatory_fields(index: u8) -> [TextField; 2] {
    let name = TextField {
        frame: Frame::new(ElementId::signatory_name(index), 0.0, 0.0, 200.0, 24.0),
        text_content: "Signatory Name".into(),
        style: TextStyle {
            font_size: 18.0,
            font_weight: 600,
            ..TextStyle::default()
        },
    };
    let role = TextField {
        frame: Frame::new(ElementId::signatory_role(index), 0.0, 0.0, 200.0, 20.0),
        text_content: "Title / Role".into(),
        style: TextStyle {
            font_size: 14.0,
            ..TextStyle::default()
        },
    };
    [name, role]
}

/// A white page with title, recipient and description fields.
pub fn starter_document(page: PageSize) -> Document {
    let mut doc = Document::new();
    let mut frame = Frame::new(ElementId::new("background"), 0.0, 0.0, page.width, page.height);
    frame.z_index = Slot::Background.canonical_z();
    doc.background = Some(Background {
        frame,
        paint: Paint::Color {
            color: "#ffffff".into(),
        },
    });
    doc.text_fields.extend(
        [
            TextPreset::Title,
            TextPreset::RecipientName,
            TextPreset::Description,
        ]
        .map(|p| p.field(page)),
    );
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_ids_roundtrip() {
        for preset in TextPreset::ALL {
            assert_eq!(TextPreset::from_id(&preset.id()), Some(preset));
        }
        assert_eq!(TextPreset::from_id(&"signatoryName_0".into()), None);
    }

    #[test]
    fn preset_fields_stay_on_page() {
        let page = PageSize::for_format(PaperFormat::A4, Orientation::Portrait);
        for preset in TextPreset::ALL {
            let f = preset.field(page);
            assert!(f.frame.x >= 0.0 && f.frame.bounds().right() <= page.width);
            assert!(f.frame.bounds().bottom() <= page.height, "{preset:?}");
        }
    }

    #[test]
    fn starter_has_background_and_three_fields() {
        let doc = starter_document(PageSize::new(1123.0, 794.0));
        assert!(doc.background.is_some());
        assert_eq!(doc.text_fields.len(), 3);
        assert!(doc.signatory_indices().is_empty());
    }
}
