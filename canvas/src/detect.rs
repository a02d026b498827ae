//! Field-detection contract: request building and response sanitization.
//!
//! The detection service is untrusted. Every candidate it returns is checked
//! against the pages that were actually sent, clamped into the page box and
//! rounded before it may enter the field store.

#[cfg(test)]
#[path = "detect_test.rs"]
mod detect_test;

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::camera::{PageSize, round_half_up};
use crate::consts::{DEFAULT_FONT_SIZE, DETECTED_TEXT_HEIGHT_PT, DETECTED_TEXT_WIDTH_PT, MAX_DETECTION_PAGES};
use crate::doc::{FieldDefinition, FieldKind};

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("no pages to send for detection")]
    NoPages,
    #[error("detection service error: {0}")]
    Service(String),
    #[error("detection service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("detection response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("detection response has no fields array")]
    MissingFields,
    #[error("detection request failed: {0}")]
    Transport(String),
}

impl DetectError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoPages => "E_DETECT_NO_PAGES",
            Self::Service(_) => "E_DETECT_SERVICE",
            Self::Status { .. } => "E_DETECT_STATUS",
            Self::Parse(_) => "E_DETECT_PARSE",
            Self::MissingFields => "E_DETECT_MISSING_FIELDS",
            Self::Transport(_) => "E_DETECT_TRANSPORT",
        }
    }
}

/// One rendered page sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageImage {
    /// 1-based page number.
    pub page_number: u32,
    /// PNG raster, base64 without a data-URL prefix.
    pub image_base64: String,
    /// Unscaled page width in points.
    pub width: f64,
    /// Unscaled page height in points.
    pub height: f64,
}

impl PageImage {
    /// Wrap PNG bytes for `page_number`. Dimensions are rounded to whole points.
    #[must_use]
    pub fn from_png(page_number: u32, png: &[u8], size: PageSize) -> Self {
        Self {
            page_number,
            image_base64: STANDARD.encode(png),
            width: round_half_up(size.width),
            height: round_half_up(size.height),
        }
    }

    fn size(&self) -> PageSize {
        PageSize::new(self.width, self.height)
    }
}

/// Body of a detection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRequest {
    pub pages: Vec<PageImage>,
}

impl DetectionRequest {
    /// Build a request from page rasters, keeping at most the first 20 pages.
    ///
    /// # Errors
    ///
    /// Returns `DetectError::NoPages` when `pages` is empty.
    pub fn new(mut pages: Vec<PageImage>) -> Result<Self, DetectError> {
        if pages.is_empty() {
            return Err(DetectError::NoPages);
        }
        if pages.len() > MAX_DETECTION_PAGES {
            tracing::warn!(pages = pages.len(), max = MAX_DETECTION_PAGES, "truncating detection request");
            pages.truncate(MAX_DETECTION_PAGES);
        }
        Ok(Self { pages })
    }

    /// Unscaled size of each requested page, keyed by page number.
    #[must_use]
    pub fn page_sizes(&self) -> HashMap<u32, PageSize> {
        self.pages.iter().map(|p| (p.page_number, p.size())).collect()
    }
}

/// Number of leading pages a request may cover for a document.
#[must_use]
pub fn detection_page_count(total_pages: u32) -> u32 {
    total_pages.min(u32::try_from(MAX_DETECTION_PAGES).unwrap_or(u32::MAX))
}

/// Decode a service response body into raw candidates.
///
/// # Errors
///
/// `Parse` for non-JSON, `Service` when the body carries an `error` string,
/// `MissingFields` when there is no `fields` array.
pub fn parse_response(body: &str) -> Result<Vec<Value>, DetectError> {
    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(DetectError::Service(message.to_owned()));
    }
    match value.get("fields") {
        Some(Value::Array(items)) => Ok(items.clone()),
        _ => Err(DetectError::MissingFields),
    }
}

/// Error message carried by a non-2xx response body, if any.
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    value.get("error").and_then(Value::as_str).map(str::to_owned)
}

/// Turn raw candidates into fields, dropping anything unusable.
#[must_use]
pub fn sanitize(candidates: &[Value], request: &DetectionRequest) -> Vec<FieldDefinition> {
    let sizes = request.page_sizes();
    let mut fields = Vec::with_capacity(candidates.len());
    for (index, raw) in candidates.iter().enumerate() {
        match raw.as_object().and_then(|obj| sanitize_one(obj, &sizes)) {
            Some(field) => fields.push(field),
            None => tracing::warn!(index, "dropping detection candidate"),
        }
    }
    tracing::info!(accepted = fields.len(), received = candidates.len(), "detection candidates sanitized");
    fields
}

fn sanitize_one(obj: &Map<String, Value>, sizes: &HashMap<u32, PageSize>) -> Option<FieldDefinition> {
    let name = obj.get("name").and_then(Value::as_str).filter(|n| !n.is_empty())?;
    let kind = match obj.get("type").and_then(Value::as_str)? {
        "text" => FieldKind::Text,
        "checkbox" => FieldKind::Checkbox,
        _ => return None,
    };
    let page = obj.get("page").and_then(Value::as_u64)?;
    let page = u32::try_from(page).unwrap_or(0);
    let size = sizes.get(&page)?;
    let x = obj.get("x").and_then(Value::as_f64)?;
    let y = obj.get("y").and_then(Value::as_f64)?;

    let cx = x.clamp(0.0, size.width);
    let cy = y.clamp(0.0, size.height);
    let (fx, fy) = (round_half_up(cx), round_half_up(cy));

    let field = match kind {
        FieldKind::Text => {
            let width = clipped_extent(obj.get("width"), size.width - cx).unwrap_or(DETECTED_TEXT_WIDTH_PT);
            let height = clipped_extent(obj.get("height"), size.height - cy).unwrap_or(DETECTED_TEXT_HEIGHT_PT);
            FieldDefinition::text(name, page, fx, fy, width, height)
        }
        FieldKind::Checkbox => FieldDefinition::checkbox(name, page, fx, fy, DEFAULT_FONT_SIZE),
    };
    Some(field.with_font_size(DEFAULT_FONT_SIZE))
}

/// Positive extent clipped to `room`, rounded. `None` when absent or the clip leaves nothing.
fn clipped_extent(value: Option<&Value>, room: f64) -> Option<f64> {
    let v = value.and_then(Value::as_f64).filter(|v| *v > 0.0)?;
    Some(round_half_up(v.min(room))).filter(|v| *v > 0.0)
}
