//! `lopdf`-backed PDF document.
//!
//! Provides page count and page geometry for the editor core. There is no
//! rasterizer here, so `render_page` reports `Unsupported`.

pub mod acroform;

use canvas::camera::PageSize;
use canvas::document::{DocumentError, PdfDocument, RenderError, RenderTask, Viewport};
use lopdf::{Document, Object, ObjectId};

/// Guards `/Parent` walks against cyclic page trees.
const MAX_TREE_DEPTH: usize = 64;

pub struct LopdfDocument {
    inner: Document,
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    /// Parse `bytes` as a PDF.
    ///
    /// # Errors
    ///
    /// `Parse` when lopdf rejects the bytes, `Empty` when the page tree is empty.
    pub fn load(bytes: &[u8]) -> Result<Self, DocumentError> {
        let inner = Document::load_mem(bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;
        let page_ids: Vec<ObjectId> = inner.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(DocumentError::Empty);
        }
        tracing::debug!(pages = page_ids.len(), "parsed PDF");
        Ok(Self { inner, page_ids })
    }

    /// Unscaled size of 1-based `page`, from its (possibly inherited) `MediaBox`.
    ///
    /// # Errors
    ///
    /// `PageOutOfRange` or `MissingMediaBox`.
    pub fn page_size(&self, page: u32) -> Result<PageSize, DocumentError> {
        let count = self.page_count();
        let id = page
            .checked_sub(1)
            .and_then(|i| self.page_ids.get(i as usize))
            .ok_or(DocumentError::PageOutOfRange { page, count })?;
        let media_box = inherited(&self.inner, *id, b"MediaBox")
            .and_then(|obj| obj.as_array().map_err(|e| DocumentError::Parse(e.to_string())))
            .and_then(|arr| box_size(arr).ok_or(DocumentError::MissingMediaBox { page }));
        match media_box {
            Ok(size) => Ok(size),
            Err(DocumentError::Parse(_)) => Err(DocumentError::MissingMediaBox { page }),
            Err(e) => Err(e),
        }
    }

    /// Sizes of every page, in order.
    ///
    /// # Errors
    ///
    /// The first page whose geometry cannot be read.
    pub fn page_sizes(&self) -> Result<Vec<PageSize>, DocumentError> {
        (1..=self.page_count()).map(|p| self.page_size(p)).collect()
    }
}

/// Open `bytes` behind the editor's document capability.
///
/// # Errors
///
/// See [`LopdfDocument::load`].
pub fn open(bytes: &[u8]) -> Result<Box<dyn PdfDocument>, DocumentError> {
    Ok(Box::new(LopdfDocument::load(bytes)?))
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        u32::try_from(self.page_ids.len()).unwrap_or(u32::MAX)
    }

    fn page_viewport(&self, page: u32, scale: f64) -> Result<Viewport, DocumentError> {
        Ok(Viewport::of(self.page_size(page)?, scale))
    }

    fn render_page(&mut self, _page: u32, _scale: f64) -> Result<Box<dyn RenderTask>, RenderError> {
        Err(RenderError::Unsupported)
    }

    fn dispose(&mut self) {
        self.page_ids.clear();
    }
}

/// Look `key` up on a page, walking `/Parent` links for inherited attributes.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Result<&'a Object, DocumentError> {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc
            .get_object(current)
            .and_then(Object::as_dict)
            .map_err(|e| DocumentError::Parse(e.to_string()))?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).map_err(|e| DocumentError::Parse(e.to_string())),
                other => Ok(other),
            };
        }
        current = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .map_err(|e| DocumentError::Parse(e.to_string()))?;
    }
    Err(DocumentError::Parse("page tree too deep".into()))
}

/// Width and height of a `[x0 y0 x1 y1]` box.
fn box_size(arr: &[Object]) -> Option<PageSize> {
    let [x0, y0, x1, y1] = arr else {
        return None;
    };
    let (x0, y0, x1, y1) = (number(x0)?, number(y0)?, number(x1)?, number(y1)?);
    let size = PageSize::new((x1 - x0).abs(), (y1 - y0).abs());
    (size.width > 0.0 && size.height > 0.0).then_some(size)
}

#[allow(clippy::cast_precision_loss)]
fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
pub(crate) mod tests;
