//! Capability interface for the PDF backend, plus the single-slot render tracker.
//!
//! The editor only needs page count, per-page viewports, a cancellable render
//! and disposal. Backends implement [`PdfDocument`]; tests use fakes.
//!
//! Rendering is asynchronous on the backend side. [`RenderSlot`] holds the one
//! outstanding [`RenderTask`]; starting another cancels it first, and a
//! completion is only honored when its ticket is still current.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use std::fmt;

use crate::camera::PageSize;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    #[error("document has no pages")]
    Empty,
    #[error("page {page} is out of range (1..={count})")]
    PageOutOfRange { page: u32, count: u32 },
    #[error("page {page} has no usable MediaBox")]
    MissingMediaBox { page: u32 },
}

impl DocumentError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_PDF_PARSE",
            Self::Empty => "E_PDF_EMPTY",
            Self::PageOutOfRange { .. } => "E_PDF_PAGE_RANGE",
            Self::MissingMediaBox { .. } => "E_PDF_MEDIABOX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// Deliberate abort of a stale render. Not a failure.
    #[error("render cancelled")]
    Cancelled,
    #[error("rendering is not supported by this backend")]
    Unsupported,
    #[error("render failed: {0}")]
    Failed(String),
}

/// Rendered size of a page at some scale, in pixels (or points at scale 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// The viewport of a page of `size` at `scale`.
    #[must_use]
    pub fn of(size: PageSize, scale: f64) -> Self {
        Self { width: size.width * scale, height: size.height * scale }
    }

    /// Back to unscaled page points.
    #[must_use]
    pub fn page_size(&self, scale: f64) -> PageSize {
        PageSize::new(self.width / scale, self.height / scale)
    }
}

/// An in-flight page render.
pub trait RenderTask {
    /// Abort the render. Must be safe to call more than once.
    fn cancel(&mut self);
}

/// A loaded PDF as the editor sees it.
pub trait PdfDocument {
    fn page_count(&self) -> u32;

    /// Viewport of 1-based `page` at `scale`.
    ///
    /// # Errors
    ///
    /// `PageOutOfRange` for a bad page, or a backend-specific error.
    fn page_viewport(&self, page: u32, scale: f64) -> Result<Viewport, DocumentError>;

    /// Begin rasterizing `page` at `scale`.
    ///
    /// # Errors
    ///
    /// Returns a `RenderError` if the render cannot be started.
    fn render_page(&mut self, page: u32, scale: f64) -> Result<Box<dyn RenderTask>, RenderError>;

    /// Release backend resources. Called once when the session ends.
    fn dispose(&mut self);
}

/// Identifies one started render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTicket(u64);

/// What a render completion meant for the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The current render finished.
    Rendered { page: u32, scale: f64 },
    /// The render was cancelled; nothing to report.
    Cancelled,
    /// A superseded render reported in late and was ignored.
    Stale,
    /// The current render failed.
    Failed(RenderError),
}

struct PendingRender {
    ticket: RenderTicket,
    page: u32,
    scale: f64,
    task: Box<dyn RenderTask>,
}

/// Holds at most one outstanding render.
#[derive(Default)]
pub struct RenderSlot {
    current: Option<PendingRender>,
    next_ticket: u64,
}

impl fmt::Debug for RenderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderSlot")
            .field("current", &self.current.as_ref().map(|p| (p.ticket, p.page, p.scale)))
            .finish_non_exhaustive()
    }
}

impl RenderSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `task`, cancelling whatever was outstanding.
    pub fn start(&mut self, page: u32, scale: f64, task: Box<dyn RenderTask>) -> RenderTicket {
        self.cancel();
        let ticket = RenderTicket(self.next_ticket);
        self.next_ticket += 1;
        self.current = Some(PendingRender { ticket, page, scale, task });
        ticket
    }

    /// Cancel the outstanding render, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(mut pending) = self.current.take() {
            tracing::debug!(page = pending.page, "cancelling render");
            pending.task.cancel();
        }
    }

    /// Ticket of the outstanding render.
    #[must_use]
    pub fn current(&self) -> Option<RenderTicket> {
        self.current.as_ref().map(|p| p.ticket)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Report the backend's result for `ticket`.
    pub fn complete(&mut self, ticket: RenderTicket, result: Result<(), RenderError>) -> RenderOutcome {
        if self.current() != Some(ticket) {
            return match result {
                Err(RenderError::Cancelled) => RenderOutcome::Cancelled,
                _ => RenderOutcome::Stale,
            };
        }
        let Some(pending) = self.current.take() else {
            return RenderOutcome::Stale;
        };
        match result {
            Ok(()) => RenderOutcome::Rendered { page: pending.page, scale: pending.scale },
            Err(RenderError::Cancelled) => RenderOutcome::Cancelled,
            Err(err) => {
                tracing::warn!(page = pending.page, error = %err, "render failed");
                RenderOutcome::Failed(err)
            }
        }
    }
}
