//! Editor session lifecycle.
//!
//! `Editor` is the state container a host binds its chrome to. It owns the
//! interaction engine (whose grid and zoom outlive any one document) and at
//! most one `Session`: the loaded document, its source bytes and the render
//! slot. Loading a new file or closing tears the session down; all fields go
//! with it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::camera::PageSize;
use crate::codec::{self, ExportError, ImportError};
use crate::detect::DetectError;
use crate::doc::FieldDefinition;
use crate::document::{DocumentError, PdfDocument, RenderError, RenderOutcome, RenderSlot, RenderTicket};
use crate::engine::{Action, EngineConfig, EngineCore};
use crate::form::{self, FormPdfGenerator, GenerateError};
use crate::grid::GridConfig;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no document is loaded")]
    NoDocument,
    #[error("{file_name} is not a PDF file")]
    NotPdf { file_name: String },
    #[error(transparent)]
    Load(#[from] DocumentError),
    #[error("field detection is already running")]
    Busy,
}

impl SessionError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoDocument => "E_NO_DOCUMENT",
            Self::NotPdf { .. } => "E_NOT_PDF",
            Self::Load(e) => e.error_code(),
            Self::Busy => "E_BUSY",
        }
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A dismissible banner for the host to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: &'static str,
    pub message: String,
}

impl Notice {
    fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, code, message: message.into() }
    }

    fn info(code: &'static str, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, code, message: message.into() }
    }
}

/// Result of asking to close the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    Closed,
    /// Fields would be lost; call `confirm_close` or `cancel_close`.
    NeedsConfirmation,
}

/// One loaded document.
pub struct Session {
    document: Box<dyn PdfDocument>,
    file_name: String,
    source: Vec<u8>,
    render: RenderSlot,
}

impl Session {
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.document.page_count()
    }

    fn destroy(mut self) {
        self.render.cancel();
        self.document.dispose();
        tracing::info!(file = %self.file_name, "document closed");
    }
}

/// Whether `file_name`/`bytes` look like a PDF: a `.pdf` name or a `%PDF-` header.
#[must_use]
pub fn looks_like_pdf(file_name: &str, bytes: &[u8]) -> bool {
    let has_ext = std::path::Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    has_ext || bytes.starts_with(PDF_MAGIC)
}

/// Identifies one detection round trip. Closing or replacing the document
/// invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetectionTicket(u64);

/// Process-wide editor state.
pub struct Editor {
    pub engine: EngineCore,
    session: Option<Session>,
    notices: Vec<Notice>,
    close_pending: bool,
    detecting: Option<DetectionTicket>,
    next_detection: u64,
    detection_error: Option<String>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EngineConfig::default(), GridConfig::default())
    }
}

impl Editor {
    #[must_use]
    pub fn new(config: EngineConfig, grid: GridConfig) -> Self {
        let mut engine = EngineCore::with_config(config);
        engine.grid = grid;
        Self {
            engine,
            session: None,
            notices: Vec::new(),
            close_pending: false,
            detecting: None,
            next_detection: 0,
            detection_error: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn has_document(&self) -> bool {
        self.session.is_some()
    }

    // --- Load / close ---

    /// Load a dropped or picked file. Non-PDF input is refused before `open` runs.
    /// On any failure the current session is left as it was.
    ///
    /// # Errors
    ///
    /// `NotPdf` for non-PDF input, `Load` when `open` or page inspection fails.
    pub fn load_file<F>(&mut self, file_name: &str, bytes: Vec<u8>, open: F) -> Result<Vec<Action>, SessionError>
    where
        F: FnOnce(&[u8]) -> Result<Box<dyn PdfDocument>, DocumentError>,
    {
        if !looks_like_pdf(file_name, &bytes) {
            let err = SessionError::NotPdf { file_name: file_name.to_owned() };
            self.notices.push(Notice::error(err.error_code(), err.to_string()));
            return Err(err);
        }
        let document = match open(&bytes) {
            Ok(document) => document,
            Err(err) => return Err(self.report_load_failure(err)),
        };
        self.load_document(file_name, bytes, document)
    }

    /// Install an already-opened document, replacing any current session.
    ///
    /// # Errors
    ///
    /// `Load` if the document has no pages or its first page has no viewport.
    pub fn load_document(
        &mut self,
        file_name: &str,
        source: Vec<u8>,
        mut document: Box<dyn PdfDocument>,
    ) -> Result<Vec<Action>, SessionError> {
        let page_count = document.page_count();
        let first = if page_count == 0 {
            Err(DocumentError::Empty)
        } else {
            document.page_viewport(1, 1.0)
        };
        let first = match first {
            Ok(viewport) => viewport,
            Err(err) => {
                document.dispose();
                return Err(self.report_load_failure(err));
            }
        };

        if let Some(previous) = self.session.take() {
            previous.destroy();
        }
        self.close_pending = false;
        self.abandon_detection();
        self.engine.open_document(page_count, first.page_size(1.0));
        self.session = Some(Session { document, file_name: file_name.to_owned(), source, render: RenderSlot::new() });
        tracing::info!(file = file_name, pages = page_count, "document loaded");
        self.start_render();
        Ok(vec![Action::PageChanged(1), Action::RenderNeeded])
    }

    fn report_load_failure(&mut self, err: DocumentError) -> SessionError {
        tracing::warn!(error = %err, "document load failed");
        let err = SessionError::Load(err);
        self.notices.push(Notice::error(err.error_code(), err.to_string()));
        err
    }

    /// Close the document, asking for confirmation first when fields exist.
    pub fn request_close(&mut self) -> CloseRequest {
        if self.engine.store.is_empty() {
            self.close();
            return CloseRequest::Closed;
        }
        self.close_pending = true;
        CloseRequest::NeedsConfirmation
    }

    /// Confirm a pending close. Returns `false` when none was pending.
    pub fn confirm_close(&mut self) -> bool {
        if !self.close_pending {
            return false;
        }
        self.close();
        true
    }

    pub fn cancel_close(&mut self) {
        self.close_pending = false;
    }

    #[must_use]
    pub fn close_pending(&self) -> bool {
        self.close_pending
    }

    /// Tear down the session unconditionally: cancel rendering, dispose the
    /// document and discard every field.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.destroy();
        }
        self.close_pending = false;
        self.abandon_detection();
        self.engine.reset();
    }

    // --- Paging / zoom / rendering ---

    /// Go to `page` (clamped), refresh page dimensions and restart rendering.
    /// The engine is untouched when the target page has no viewport.
    ///
    /// # Errors
    ///
    /// `NoDocument` when nothing is loaded, `Load` if the page has no viewport.
    pub fn set_page(&mut self, page: u32) -> Result<Vec<Action>, SessionError> {
        let Some(session) = self.session.as_ref() else {
            return Err(SessionError::NoDocument);
        };
        let target = page.clamp(1, self.engine.total_pages.max(1));
        let size = session.document.page_viewport(target, 1.0)?.page_size(1.0);
        let actions = self.engine.set_page(target);
        self.engine.set_page_size(size);
        self.start_render();
        Ok(actions)
    }

    /// # Errors
    ///
    /// See [`Editor::set_page`].
    pub fn next_page(&mut self) -> Result<Vec<Action>, SessionError> {
        self.set_page(self.engine.current_page.saturating_add(1))
    }

    /// # Errors
    ///
    /// See [`Editor::set_page`].
    pub fn prev_page(&mut self) -> Result<Vec<Action>, SessionError> {
        self.set_page(self.engine.current_page.saturating_sub(1))
    }

    /// Change zoom and re-render. Returns `false` for unusable scales.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !self.engine.set_scale(scale) {
            return false;
        }
        self.start_render();
        true
    }

    fn start_render(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let page = self.engine.current_page;
        let scale = self.engine.scale;
        session.render.cancel();
        match session.document.render_page(page, scale) {
            Ok(task) => {
                session.render.start(page, scale, task);
            }
            Err(RenderError::Cancelled) => {}
            Err(RenderError::Unsupported) => tracing::debug!(page, "backend cannot render"),
            Err(err) => {
                tracing::warn!(page, error = %err, "could not start render");
                self.notices.push(Notice::error("E_RENDER", err.to_string()));
            }
        }
    }

    /// Ticket of the render currently in flight.
    #[must_use]
    pub fn current_render(&self) -> Option<RenderTicket> {
        self.session.as_ref().and_then(|s| s.render.current())
    }

    /// Report a backend render completion.
    pub fn complete_render(&mut self, ticket: RenderTicket, result: Result<(), RenderError>) -> RenderOutcome {
        let Some(session) = self.session.as_mut() else {
            return RenderOutcome::Stale;
        };
        let outcome = session.render.complete(ticket, result);
        if let RenderOutcome::Failed(err) = &outcome {
            self.notices.push(Notice::error("E_RENDER", err.to_string()));
        }
        outcome
    }

    /// Unscaled size of `page` in the loaded document.
    ///
    /// # Errors
    ///
    /// `NoDocument`, or `Load` when the page has no viewport.
    pub fn page_size(&self, page: u32) -> Result<PageSize, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoDocument)?;
        Ok(session.document.page_viewport(page, 1.0)?.page_size(1.0))
    }

    // --- Import / export / generation ---

    /// Replace fields from an export document. Failures become a notice and leave fields alone.
    ///
    /// # Errors
    ///
    /// Returns the codec error when the document shape is wrong.
    pub fn import_json(&mut self, text: &str) -> Result<Vec<Action>, ImportError> {
        match self.engine.import_json(text) {
            Ok(actions) => {
                let count = self.engine.store.len();
                self.notices.push(Notice::info("I_IMPORTED", format!("imported {count} field(s)")));
                Ok(actions)
            }
            Err(err) => {
                tracing::warn!(error = %err, "import failed");
                self.notices.push(Notice::error(err.error_code(), err.to_string()));
                Err(err)
            }
        }
    }

    /// Export JSON and the suggested file name.
    ///
    /// # Errors
    ///
    /// See [`EngineCore::export_json`].
    pub fn export_json(&self) -> Result<(String, String), ExportError> {
        let json = self.engine.export_json()?;
        Ok((self.export_file_name(), json))
    }

    #[must_use]
    pub fn export_file_name(&self) -> String {
        codec::export_file_name(self.session.as_ref().map(Session::file_name))
    }

    /// Build the form PDF from the loaded document. Validation runs first.
    ///
    /// # Errors
    ///
    /// `NoDocument`, `Validation` or the backend's error; a notice is queued too.
    pub fn generate_form(&mut self, generator: &dyn FormPdfGenerator) -> Result<Vec<u8>, GenerateError> {
        let result = match self.session.as_ref() {
            None => Err(GenerateError::NoDocument),
            Some(session) => form::generate_form_pdf(
                generator,
                &session.source,
                self.engine.store.fields(),
                session.page_count() as usize,
            ),
        };
        if let Err(err) = &result {
            self.notices.push(Notice::error(err.error_code(), err.to_string()));
        }
        result
    }

    // --- Detection ---

    /// Whether applying a detection result would discard existing fields.
    #[must_use]
    pub fn detection_needs_confirmation(&self) -> bool {
        !self.engine.store.is_empty()
    }

    /// Mark detection as running for the current document.
    ///
    /// # Errors
    ///
    /// `NoDocument` without a document, `Busy` if a detection is already running.
    pub fn begin_detection(&mut self) -> Result<DetectionTicket, SessionError> {
        if self.session.is_none() {
            return Err(SessionError::NoDocument);
        }
        if self.detecting.is_some() {
            return Err(SessionError::Busy);
        }
        let ticket = DetectionTicket(self.next_detection);
        self.next_detection += 1;
        self.detecting = Some(ticket);
        self.detection_error = None;
        Ok(ticket)
    }

    /// Finish a detection round trip, replacing fields on success.
    /// Results for a document that has since been closed or replaced are dropped.
    pub fn finish_detection(
        &mut self,
        ticket: DetectionTicket,
        result: Result<Vec<FieldDefinition>, DetectError>,
    ) -> Vec<Action> {
        if self.detecting != Some(ticket) {
            tracing::debug!(?ticket, "discarding stale detection result");
            return Vec::new();
        }
        self.detecting = None;
        match result {
            Ok(fields) => {
                tracing::info!(count = fields.len(), "applying detected fields");
                self.engine.replace_fields(fields)
            }
            Err(err) => {
                tracing::warn!(error = %err, "field detection failed");
                self.detection_error = Some(err.to_string());
                vec![Action::RenderNeeded]
            }
        }
    }

    #[must_use]
    pub fn is_detecting(&self) -> bool {
        self.detecting.is_some()
    }

    fn abandon_detection(&mut self) {
        if let Some(ticket) = self.detecting.take() {
            tracing::debug!(?ticket, "detection abandoned with its document");
        }
        self.detection_error = None;
    }

    #[must_use]
    pub fn detection_error(&self) -> Option<&str> {
        self.detection_error.as_deref()
    }

    pub fn dismiss_detection_error(&mut self) {
        self.detection_error = None;
    }

    // --- Notices ---

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Remove the notice at `index`. Out-of-range indexes are ignored.
    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
