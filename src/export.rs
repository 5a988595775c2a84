//! Export orchestration: paginate, emit, and hand over one artifact.
//!
//! Every export builds its own document. On failure or cancellation no
//! artifact is returned and nothing appears at the destination path.

use crate::error::{Error, Result};
use crate::layout::{Geometry, Paginator, TextMeasurer};
use crate::model::Content;
use crate::render::{DocumentEmitter, EmitOptions, PdfEmitter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// File name of the exported PDF artifact, shared by every export.
pub const DEFAULT_FILE_NAME: &str = "content-plan.pdf";

const FILE_STEM: &str = "content-plan";

/// Cooperative cancellation flag shared between a host and an export.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Return `Err(Error::Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// What to do when the content has no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInputPolicy {
    /// Produce no artifact and report `ExportOutcome::Skipped`
    #[default]
    Skip,
    /// Produce a valid document with one blank page
    BlankPage,
}

/// A finished artifact.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Deterministic file name for the whole export
    pub file_name: String,

    /// MIME type of `bytes`
    pub mime_type: String,

    /// Serialized document
    pub bytes: Vec<u8>,

    /// Number of pages in the document
    pub page_count: u32,
}

/// Result of a successful export call.
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// An artifact was produced
    Exported(Artifact),
    /// The content was empty and the policy is `Skip`
    Skipped,
}

impl ExportOutcome {
    /// The artifact, if one was produced.
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            ExportOutcome::Exported(artifact) => Some(artifact),
            ExportOutcome::Skipped => None,
        }
    }

    /// Whether the export was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, ExportOutcome::Skipped)
    }
}

/// Builder for exporting content to PDF.
///
/// # Example
///
/// ```no_run
/// use pageflow::{Content, Exporter, Geometry, Record};
///
/// let content = Content::new(vec![
///     Record::new("x").with_section("Strategy", "Post threads daily."),
/// ]);
/// let path = Exporter::new()
///     .with_geometry(Geometry::letter())
///     .export_to_dir(&content, "./out")?;
/// # Ok::<(), pageflow::Error>(())
/// ```
#[derive(Clone)]
pub struct Exporter {
    geometry: Geometry,
    emit_options: EmitOptions,
    empty_input: EmptyInputPolicy,
    measurer: Option<Arc<dyn TextMeasurer>>,
    emitter: Option<Arc<dyn DocumentEmitter>>,
    cancel: Option<CancelToken>,
}

impl Exporter {
    /// Create an exporter with default geometry and options.
    pub fn new() -> Self {
        Self {
            geometry: Geometry::default(),
            emit_options: EmitOptions::default(),
            empty_input: EmptyInputPolicy::default(),
            measurer: None,
            emitter: None,
            cancel: None,
        }
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the emitter options.
    pub fn with_emit_options(mut self, options: EmitOptions) -> Self {
        self.emit_options = options;
        self
    }

    /// Set the empty-input policy.
    pub fn with_empty_input(mut self, policy: EmptyInputPolicy) -> Self {
        self.empty_input = policy;
        self
    }

    /// Use a custom text measurer.
    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    /// Use a custom emitter instead of the PDF emitter.
    ///
    /// The emitter's options are its own; `with_emit_options` only configures
    /// the default PDF emitter.
    pub fn with_emitter(mut self, emitter: Arc<dyn DocumentEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The geometry in use.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn paginator(&self) -> Paginator {
        let mut paginator = Paginator::new(self.geometry.clone());
        if let Some(ref measurer) = self.measurer {
            paginator = paginator.with_measurer(Arc::clone(measurer));
        }
        if let Some(ref token) = self.cancel {
            paginator = paginator.with_cancel(token.clone());
        }
        paginator
    }

    fn emitter(&self) -> Arc<dyn DocumentEmitter> {
        match self.emitter {
            Some(ref emitter) => Arc::clone(emitter),
            None => Arc::new(PdfEmitter::new(self.emit_options.clone())),
        }
    }

    fn check_cancel(&self) -> Result<()> {
        match self.cancel {
            Some(ref token) => token.check(),
            None => Ok(()),
        }
    }

    /// Paginate and serialize `content` in memory.
    pub fn export_bytes(&self, content: &Content) -> Result<ExportOutcome> {
        if content.is_empty() {
            match self.empty_input {
                EmptyInputPolicy::Skip => {
                    log::warn!("No records to export; skipping");
                    return Ok(ExportOutcome::Skipped);
                }
                EmptyInputPolicy::BlankPage => {
                    log::warn!("No records to export; emitting a blank page");
                }
            }
        }

        let doc = self.paginator().paginate(&content.records)?;
        self.check_cancel()?;

        let emitter = self.emitter();
        let bytes = emitter.emit(&doc).map_err(|e| {
            log::error!("{} emitter failed: {}", emitter.name(), e);
            e
        })?;
        self.check_cancel()?;

        log::info!(
            "Exported {} records on {} pages",
            content.record_count(),
            doc.page_count()
        );
        Ok(ExportOutcome::Exported(Artifact {
            file_name: format!("{}.{}", FILE_STEM, emitter.file_extension()),
            mime_type: emitter.mime_type().to_string(),
            bytes,
            page_count: doc.page_count(),
        }))
    }

    /// Export into `dir` under [`DEFAULT_FILE_NAME`] (or the custom
    /// emitter's extension).
    ///
    /// Returns the written path, or `None` when the export was skipped. The
    /// bytes go to a temporary file in `dir` that is renamed into place only
    /// after everything succeeded.
    pub fn export_to_dir<P: AsRef<Path>>(
        &self,
        content: &Content,
        dir: P,
    ) -> Result<Option<PathBuf>> {
        let dir = dir.as_ref();
        let artifact = match self.export_bytes(content)? {
            ExportOutcome::Exported(artifact) => artifact,
            ExportOutcome::Skipped => return Ok(None),
        };

        std::fs::create_dir_all(dir)?;
        let path = dir.join(&artifact.file_name);

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(&artifact.bytes)?;
        temp.as_file().sync_all()?;
        self.check_cancel()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;
        log::debug!("Wrote {}", path.display());
        Ok(Some(path))
    }

    /// Run [`Exporter::export_to_dir`] on the blocking thread pool.
    ///
    /// Dropping the returned future cancels the export, so an abandoned
    /// export never lands at the destination.
    #[cfg(feature = "async")]
    pub async fn export_to_dir_async(
        &self,
        content: Content,
        dir: PathBuf,
    ) -> Result<Option<PathBuf>> {
        let token = self.cancel.clone().unwrap_or_default();
        let guard = CancelOnDrop(Some(token.clone()));
        let exporter = self.clone().with_cancel(token);

        let result = tokio::task::spawn_blocking(move || exporter.export_to_dir(&content, &dir))
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    Error::Cancelled
                } else {
                    Error::Emission(format!("export task failed: {}", e))
                }
            })?;

        guard.disarm();
        result
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("geometry", &self.geometry)
            .field("emit_options", &self.emit_options)
            .field("empty_input", &self.empty_input)
            .field("custom_measurer", &self.measurer.is_some())
            .field("emitter", &self.emitter().name())
            .finish()
    }
}

/// Cancels its token when dropped unless disarmed.
#[cfg(feature = "async")]
struct CancelOnDrop(Option<CancelToken>);

#[cfg(feature = "async")]
impl CancelOnDrop {
    fn disarm(mut self) {
        self.0 = None;
    }
}

#[cfg(feature = "async")]
impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(ref token) = self.0 {
            token.cancel();
        }
    }
}
