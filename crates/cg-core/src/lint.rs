//! Lint diagnostics for certificate templates.
//!
//! Reports structural issues without modifying the document. The CLI
//! prints them; the editor can surface them before a save.

use crate::id::{ElementId, IdRole};
use crate::model::{Document, PageSize};
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Likely a mistake.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for a template element.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The element this diagnostic refers to.
    pub element_id: ElementId,
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "orphan-signature").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the template and return diagnostics.
#[must_use]
pub fn lint_document(doc: &Document, page: PageSize) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(doc, &mut diags);
    lint_unpaired_signatories(doc, &mut diags);
    lint_orphan_signatures(doc, &mut diags);
    lint_off_page(doc, page, &mut diags);
    lint_opacity_range(doc, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Warn when two elements share an id; edits would hit only the first.
fn lint_duplicate_ids(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for (_, frame) in doc.frames() {
        if !seen.insert(&frame.id) {
            diags.push(LintDiagnostic {
                element_id: frame.id.clone(),
                message: format!("Duplicate element id `{}`.", frame.id),
                severity: LintSeverity::Warning,
                rule: "duplicate-id",
            });
        }
    }
}

/// Warn when a signatory name has no role field or the other way round.
fn lint_unpaired_signatories(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    let mut names = HashSet::new();
    let mut roles = HashSet::new();
    for field in &doc.text_fields {
        match field.frame.id.role() {
            IdRole::SignatoryName(i) => {
                names.insert(i);
            }
            IdRole::SignatoryRole(i) => {
                roles.insert(i);
            }
            _ => {}
        }
    }
    for i in names.difference(&roles) {
        diags.push(LintDiagnostic {
            element_id: ElementId::signatory_name(*i),
            message: format!("Signatory {i} has a name but no role field."),
            severity: LintSeverity::Warning,
            rule: "unpaired-signatory",
        });
    }
    for i in roles.difference(&names) {
        diags.push(LintDiagnostic {
            element_id: ElementId::signatory_role(*i),
            message: format!("Signatory {i} has a role but no name field."),
            severity: LintSeverity::Warning,
            rule: "unpaired-signatory",
        });
    }
}

/// Warn on signature images whose signatory slot is not active.
fn lint_orphan_signatures(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    let active = doc.signatory_indices();
    for logo in &doc.logos {
        if let IdRole::SignatureImage { index, .. } = logo.frame.id.role()
            && !active.contains(&index)
        {
            diags.push(LintDiagnostic {
                element_id: logo.frame.id.clone(),
                message: format!(
                    "Signature image `{}` belongs to signatory {index}, which does not exist.",
                    logo.frame.id
                ),
                severity: LintSeverity::Warning,
                rule: "orphan-signature",
            });
        }
    }
}

/// Info when an element lies entirely outside the page.
fn lint_off_page(doc: &Document, page: PageSize, diags: &mut Vec<LintDiagnostic>) {
    let canvas = page.bounds();
    for (_, frame) in doc.frames() {
        let b = frame.bounds();
        if b.width > 0.0 && b.height > 0.0 && !b.intersects(&canvas) {
            diags.push(LintDiagnostic {
                element_id: frame.id.clone(),
                message: format!("`{}` is entirely outside the page.", frame.id),
                severity: LintSeverity::Info,
                rule: "off-page",
            });
        }
    }
}

fn lint_opacity_range(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    for (_, frame) in doc.frames() {
        if !(0.0..=1.0).contains(&frame.opacity) {
            diags.push(LintDiagnostic {
                element_id: frame.id.clone(),
                message: format!(
                    "`{}` has opacity {} outside 0..1; it will be clamped on save.",
                    frame.id, frame.opacity
                ),
                severity: LintSeverity::Info,
                rule: "opacity-range",
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    const PAGE: PageSize = PageSize::new(800.0, 600.0);

    fn text(id: &str, x: f32) -> TextField {
        TextField {
            frame: Frame::new(id.into(), x, 10.0, 100.0, 20.0),
            text_content: String::new(),
            style: TextStyle::default(),
        }
    }

    fn rules(diags: &[LintDiagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.rule).collect()
    }

    #[test]
    fn clean_document_has_no_diagnostics() {
        let mut doc = Document::new();
        doc.text_fields.push(text("signatoryName_0", 10.0));
        doc.text_fields.push(text("signatoryRole_0", 10.0));
        assert!(lint_document(&doc, PAGE).is_empty());
    }

    #[test]
    fn duplicate_ids_and_unpaired() {
        let mut doc = Document::new();
        doc.text_fields.push(text("a", 10.0));
        doc.text_fields.push(text("a", 10.0));
        doc.text_fields.push(text("signatoryName_1", 10.0));
        let diags = lint_document(&doc, PAGE);
        assert_eq!(rules(&diags), vec!["duplicate-id", "unpaired-signatory"]);
    }

    #[test]
    fn orphan_signature_and_off_page() {
        let mut doc = Document::new();
        doc.logos.push(ImageElement {
            frame: Frame::new(ElementId::signature_image(2, 1), 10.0, 10.0, 50.0, 20.0),
            src: None,
        });
        doc.text_fields.push(text("far", 5000.0));
        let diags = lint_document(&doc, PAGE);
        assert_eq!(rules(&diags), vec!["orphan-signature", "off-page"]);
        assert_eq!(diags[1].severity, LintSeverity::Info);
    }
}
