//! JSON export/import of the field store.
//!
//! Export writes `{ fields, pdfDimensions, exportedAt }` with ids stripped.
//! Import only insists on a top-level `fields` array. Each element is read
//! leniently: unknown keys are ignored, missing or mistyped values fall back to
//! defaults, and every field receives a fresh id. Odd geometry is left for the
//! hit-tester and renderer to degrade around rather than rejected here.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::camera::PageSize;
use crate::doc::{FieldDefinition, FieldKind, TextAlign, VerticalAlign};

/// File name used when the source PDF name is unknown.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "pdf_field_mapping.json";

/// Import failure. The store is never touched when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("import document must be a JSON object")]
    NotAnObject,
    #[error("\"fields\" is missing or not an array")]
    MissingFields,
}

impl ImportError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "E_IMPORT_INVALID_JSON",
            Self::NotAnObject => "E_IMPORT_NOT_OBJECT",
            Self::MissingFields => "E_IMPORT_MISSING_FIELDS",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ExportError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Timestamp(_) => "E_EXPORT_TIMESTAMP",
            Self::Serialize(_) => "E_EXPORT_SERIALIZE",
        }
    }
}

/// A field as written to the export file: everything but the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub page: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valign: Option<VerticalAlign>,
}

impl From<&FieldDefinition> for FieldRecord {
    fn from(f: &FieldDefinition) -> Self {
        Self {
            name: f.name.clone(),
            kind: f.kind,
            page: f.page,
            x: f.x,
            y: f.y,
            width: f.width,
            height: f.height,
            font_size: f.font_size,
            align: f.align,
            valign: f.valign,
        }
    }
}

impl FieldRecord {
    /// Turn the record back into a live field under a fresh id.
    #[must_use]
    pub fn into_definition(self) -> FieldDefinition {
        FieldDefinition {
            id: Uuid::new_v4(),
            name: self.name,
            kind: self.kind,
            page: self.page,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            font_size: self.font_size,
            align: self.align,
            valign: self.valign,
        }
    }
}

/// Top-level export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub fields: Vec<FieldRecord>,
    pub pdf_dimensions: PageSize,
    pub exported_at: String,
}

impl ExportDocument {
    /// Build an export document stamped with `now`.
    ///
    /// # Errors
    ///
    /// Fails only if `now` cannot be formatted as RFC 3339.
    pub fn new(fields: &[FieldDefinition], page: PageSize, now: OffsetDateTime) -> Result<Self, ExportError> {
        Ok(Self {
            fields: fields.iter().map(FieldRecord::from).collect(),
            pdf_dimensions: page,
            exported_at: now.format(&Rfc3339)?,
        })
    }

    /// Pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Serialize` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Serialize `fields` with the current UTC time. Export is unconditional:
/// validation problems do not block it.
///
/// # Errors
///
/// See [`ExportDocument::new`] and [`ExportDocument::to_json_pretty`].
pub fn export_json(fields: &[FieldDefinition], page: PageSize) -> Result<String, ExportError> {
    ExportDocument::new(fields, page, OffsetDateTime::now_utc())?.to_json_pretty()
}

/// Parse an export document and return replacement fields with fresh ids.
///
/// # Errors
///
/// Returns an `ImportError` when the text is not JSON, not an object, or has no
/// `fields` array.
pub fn import_json(text: &str) -> Result<Vec<FieldDefinition>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    import_value(&value)
}

/// Like [`import_json`] but starting from parsed JSON.
///
/// # Errors
///
/// Returns `NotAnObject` or `MissingFields` when the shape is wrong.
pub fn import_value(value: &Value) -> Result<Vec<FieldDefinition>, ImportError> {
    let root = value.as_object().ok_or(ImportError::NotAnObject)?;
    let items = root
        .get("fields")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingFields)?;

    let mut fields = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(obj) => fields.push(record_from_object(obj).into_definition()),
            None => tracing::warn!(index, "skipping non-object entry in fields array"),
        }
    }
    tracing::info!(count = fields.len(), "imported field map");
    Ok(fields)
}

fn record_from_object(obj: &Map<String, Value>) -> FieldRecord {
    let kind = match obj.get("type").and_then(Value::as_str) {
        Some("checkbox") => FieldKind::Checkbox,
        _ => FieldKind::Text,
    };
    FieldRecord {
        name: obj.get("name").map(name_of).unwrap_or_default(),
        kind,
        page: obj.get("page").and_then(page_number).unwrap_or(1),
        x: number(obj, "x").unwrap_or(0.0),
        y: number(obj, "y").unwrap_or(0.0),
        width: number(obj, "width"),
        height: number(obj, "height"),
        font_size: number(obj, "fontSize"),
        align: enum_value(obj, "align"),
        valign: enum_value(obj, "valign"),
    }
}

fn name_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A 1-based page number. Integral floats such as `2.0` count.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn page_number(value: &Value) -> Option<u32> {
    if let Some(page) = value.as_u64() {
        return match u32::try_from(page) {
            Ok(page) if page >= 1 => Some(page),
            _ => None,
        };
    }
    let page = value.as_f64()?;
    if !page.is_finite() || page.fract() != 0.0 || page < 1.0 || page > f64::from(u32::MAX) {
        return None;
    }
    Some(page as u32)
}

fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

fn enum_value<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    match T::deserialize(obj.get(key)?) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

/// Export file name for a PDF: `{stem}.json`, or the default when unknown.
#[must_use]
pub fn export_file_name(pdf_file_name: Option<&str>) -> String {
    let Some(name) = pdf_file_name.filter(|n| !n.is_empty()) else {
        return DEFAULT_EXPORT_FILE_NAME.to_owned();
    };
    let split = name.len().saturating_sub(4);
    let stem = match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".pdf") => stem,
        _ => name,
    };
    format!("{stem}.json")
}
