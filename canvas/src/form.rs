//! Form-PDF generation contract.
//!
//! The core resolves fields into concrete widget rectangles and refuses to call
//! the backend unless validation passes. Writing AcroForm objects is the
//! backend's job behind [`FormPdfGenerator`].

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use crate::camera::PdfRect;
use crate::consts::{DEFAULT_TEXT_HEIGHT_PT, DEFAULT_TEXT_WIDTH_PT};
use crate::doc::{FieldDefinition, FieldKind, TextAlign};
use crate::hit::checkbox_side;
use crate::validate::{ValidationFailed, ensure_valid};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationFailed),
    #[error("no document is loaded")]
    NoDocument,
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl GenerateError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_GENERATE_VALIDATION",
            Self::NoDocument => "E_GENERATE_NO_DOCUMENT",
            Self::Pdf(_) => "E_GENERATE_PDF",
        }
    }
}

/// A field resolved for placement in the output PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct FormWidget {
    pub name: String,
    pub kind: FieldKind,
    /// 0-based index into the document's pages.
    pub page_index: usize,
    pub rect: PdfRect,
    pub font_size: Option<f64>,
    pub align: Option<TextAlign>,
}

/// Backend that writes interactive form fields into a PDF.
pub trait FormPdfGenerator {
    /// Return `source` with one form field per widget.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::Pdf` when the document cannot be read or written.
    /// Problems with a single widget should be logged and skipped instead.
    fn generate(&self, source: &[u8], widgets: &[FormWidget]) -> Result<Vec<u8>, GenerateError>;
}

/// Resolve fields into widgets. Fields whose page is outside `1..=page_count` are skipped.
#[must_use]
pub fn plan_widgets(fields: &[FieldDefinition], page_count: usize) -> Vec<FormWidget> {
    let mut widgets = Vec::with_capacity(fields.len());
    for field in fields {
        let page = field.page as usize;
        if page < 1 || page > page_count {
            tracing::warn!(page = field.page, name = %field.name, "invalid page number, skipping field");
            continue;
        }
        let (width, height) = match field.kind {
            FieldKind::Text => (
                field.width.unwrap_or(DEFAULT_TEXT_WIDTH_PT),
                field.height.unwrap_or(DEFAULT_TEXT_HEIGHT_PT),
            ),
            FieldKind::Checkbox => {
                let side = checkbox_side(field);
                (side, side)
            }
        };
        widgets.push(FormWidget {
            name: field.name.clone(),
            kind: field.kind,
            page_index: page - 1,
            rect: PdfRect { x: field.x, y: field.y, width, height },
            font_size: field.font_size.filter(|s| *s > 0.0),
            align: if field.kind == FieldKind::Text { field.align } else { None },
        });
    }
    widgets
}

/// Validate, plan and hand off to `generator`. Nothing is produced when validation fails.
///
/// # Errors
///
/// `Validation` on blank or duplicate names, otherwise whatever the backend returns.
pub fn generate_form_pdf(
    generator: &dyn FormPdfGenerator,
    source: &[u8],
    fields: &[FieldDefinition],
    page_count: usize,
) -> Result<Vec<u8>, GenerateError> {
    ensure_valid(fields)?;
    let widgets = plan_widgets(fields, page_count);
    tracing::info!(fields = fields.len(), widgets = widgets.len(), "generating form PDF");
    generator.generate(source, &widgets)
}
