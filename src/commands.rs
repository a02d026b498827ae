//! Subcommand implementations. Each one drives the same `Editor` a GUI host would.

use std::path::{Path, PathBuf};

use canvas::codec;
use canvas::detect::{DetectionRequest, PageImage, detection_page_count};
use canvas::doc::{FieldId, FieldKind, FieldPatch, clamp_dimension};
use canvas::engine::{EngineConfig, EngineCore};
use canvas::grid::{GridConfig, snap_to_grid};
use canvas::session::Editor;
use canvas::validate;

use crate::config::AppConfig;
use crate::detect_client::DetectClient;
use crate::error::AppError;
use crate::pdf::{self, LopdfDocument, acroform::LopdfFormGenerator};

fn read(path: &Path) -> Result<Vec<u8>, AppError> {
    std::fs::read(path).map_err(|e| AppError::io(path, e))
}

fn read_text(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))
}

fn write(path: &Path, bytes: impl AsRef<[u8]>) -> Result<(), AppError> {
    std::fs::write(path, bytes).map_err(|e| AppError::io(path, e))?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Load `pdf` into a fresh editor.
fn open_editor(pdf_path: &Path, grid: GridConfig) -> Result<Editor, AppError> {
    let bytes = read(pdf_path)?;
    let mut editor = Editor::new(EngineConfig::default(), grid);
    editor.load_file(&file_name(pdf_path), bytes, pdf::open)?;
    Ok(editor)
}

/// Output path for an exported map: `out`, or the export name next to the PDF.
#[must_use]
pub fn map_output_path(pdf_path: &Path, out: Option<PathBuf>, editor: &Editor) -> PathBuf {
    out.unwrap_or_else(|| pdf_path.with_file_name(editor.export_file_name()))
}

// =============================================================
// inspect
// =============================================================

/// Print page count and page sizes.
///
/// # Errors
///
/// I/O or PDF parse failures.
pub fn inspect(pdf_path: &Path) -> Result<(), AppError> {
    let doc = LopdfDocument::load(&read(pdf_path)?)?;
    let sizes = doc.page_sizes()?;
    println!("{}: {} page(s)", pdf_path.display(), sizes.len());
    for (i, size) in sizes.iter().enumerate() {
        println!("  page {}: {} x {} pt", i + 1, size.width, size.height);
    }
    Ok(())
}

// =============================================================
// validate
// =============================================================

/// Import a map and report blank or duplicate names.
///
/// # Errors
///
/// `Invalid` with the error count when any field fails validation.
pub fn validate_map(map_path: &Path) -> Result<(), AppError> {
    let fields = codec::import_json(&read_text(map_path)?)?;
    let errors = validate::validate(&fields);
    for error in &errors {
        println!("{}: {error}", error.error_code());
    }
    if !errors.is_empty() {
        return Err(AppError::Invalid(errors.len()));
    }
    println!("{} field(s) OK", fields.len());
    Ok(())
}

// =============================================================
// generate
// =============================================================

/// Write a fillable PDF from `pdf` and `map`.
///
/// # Errors
///
/// I/O, import, validation and lopdf failures.
pub fn generate(pdf_path: &Path, map_path: &Path, out: &Path) -> Result<(), AppError> {
    let mut editor = open_editor(pdf_path, GridConfig::default())?;
    editor.import_json(&read_text(map_path)?)?;
    let bytes = match editor.generate_form(&LopdfFormGenerator) {
        Ok(bytes) => bytes,
        Err(err) => {
            for error in editor.engine.validate() {
                println!("{}: {error}", error.error_code());
            }
            return Err(err.into());
        }
    };
    write(out, bytes)?;
    println!("{} field(s) written to {}", editor.engine.fields().len(), out.display());
    Ok(())
}

// =============================================================
// snap
// =============================================================

/// Snap every field's anchor and, for sized text fields, its size to `grid_size`.
/// Returns the number of fields that moved or changed size.
pub fn snap_fields(engine: &mut EngineCore, grid_size: f64) -> usize {
    let snap = |v: f64| snap_to_grid(v, grid_size, true);
    let updates: Vec<(FieldId, FieldPatch)> = engine
        .fields()
        .iter()
        .filter_map(|field| {
            let mut patch = FieldPatch::position(snap(field.x), snap(field.y));
            if field.kind == FieldKind::Text {
                if let Some((w, h)) = field.size() {
                    patch.width = Some(clamp_dimension(snap(w)));
                    patch.height = Some(clamp_dimension(snap(h)));
                }
            }
            let unchanged = patch.x == Some(field.x)
                && patch.y == Some(field.y)
                && patch.width.is_none_or(|w| Some(w) == field.width)
                && patch.height.is_none_or(|h| Some(h) == field.height);
            (!unchanged).then_some((field.id, patch))
        })
        .collect();
    for (id, patch) in &updates {
        engine.update_field(id, patch.clone());
    }
    updates.len()
}

/// Re-export `map` with every field snapped to the grid.
///
/// # Errors
///
/// I/O, import and export failures.
pub fn snap(pdf_path: &Path, map_path: &Path, grid_size: f64, out: Option<PathBuf>) -> Result<(), AppError> {
    let mut editor = open_editor(pdf_path, GridConfig::default())?;
    editor.import_json(&read_text(map_path)?)?;
    let changed = snap_fields(&mut editor.engine, grid_size);
    let (_, json) = editor.export_json()?;
    let out = map_output_path(pdf_path, out, &editor);
    write(&out, json)?;
    println!("snapped {changed} of {} field(s) to a {grid_size} pt grid", editor.engine.fields().len());
    Ok(())
}

// =============================================================
// detect
// =============================================================

/// Raster for 1-based `page` inside `dir`.
#[must_use]
pub fn page_image_path(dir: &Path, page: u32) -> PathBuf {
    dir.join(format!("page-{page}.png"))
}

/// Collect `page-{n}.png` rasters for the pages a request may cover.
/// Missing rasters are skipped.
async fn page_images(editor: &Editor, dir: &Path) -> Result<Vec<PageImage>, AppError> {
    let mut images = Vec::new();
    for page in 1..=detection_page_count(editor.engine.total_pages) {
        let path = page_image_path(dir, page);
        let png = match tokio::fs::read(&path).await {
            Ok(png) => png,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "no raster for page, skipping");
                continue;
            }
            Err(e) => return Err(AppError::io(path, e)),
        };
        images.push(PageImage::from_png(page, &png, editor.page_size(page)?));
    }
    Ok(images)
}

/// Ask the detection service for fields and export them as a map.
///
/// # Errors
///
/// Detection disabled or unavailable, missing rasters, transport and service failures.
pub async fn detect(
    config: &AppConfig,
    pdf_path: &Path,
    images_dir: &Path,
    out: Option<PathBuf>,
) -> Result<(), AppError> {
    let base_url = config.detect_url.as_deref().ok_or(AppError::DetectionDisabled)?;
    let client = DetectClient::new(base_url, config.timeouts)?;
    if !client.is_available().await? {
        return Err(AppError::DetectionUnavailable);
    }

    let mut editor = open_editor(pdf_path, config.grid())?;
    let images = page_images(&editor, images_dir).await?;
    if images.is_empty() {
        return Err(AppError::NoPageImages(images_dir.to_path_buf()));
    }
    let request = DetectionRequest::new(images)?;

    let ticket = editor.begin_detection()?;
    editor.finish_detection(ticket, client.detect(&request).await);
    if let Some(message) = editor.detection_error() {
        return Err(AppError::DetectionFailed(message.to_owned()));
    }

    let (_, json) = editor.export_json()?;
    let out = map_output_path(pdf_path, out, &editor);
    write(&out, json)?;
    println!("detected {} field(s) -> {}", editor.engine.fields().len(), out.display());
    Ok(())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
