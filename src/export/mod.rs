//! PDF/PNG export and printing of the content region.
//!
//! Every entry point runs the same transaction: hide chrome, wait for images,
//! present the light theme, hand the page to a capability, then restore the
//! document through [`ExportSession`]'s drop and report the outcome.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;

use crate::assets::{ImageLoad, ImageProbe};
use crate::dom::{html, El, SharedDocument};
use crate::events::{PrintEvents, PrintLifecycle};
use crate::locale::{Language, LocaleCoordinator};
use crate::notification::{Notice, Notifier};
use crate::storage::{ExportStatistics, PreferenceStore};
use crate::ui::{icon, ids, LAYOUT_TOKENS};

mod backend;
mod filename;
mod session;

pub use backend::{
    HeadlessBrowserRasterizer, LpPrintBackend, PrintBackend, RasterFormat, RasterOptions,
    RasterRequest, Rasterizer,
};
pub use filename::{artifact_file_name, display_name, sanitize_display_name};
pub use session::ExportSession;

const PRINTING_CLASS: &str = "printing";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CV content element not found")]
    MissingContent,
    #[error("failed to stage page for rendering")]
    Stage(#[source] std::io::Error),
    #[error("failed to create output directory {path}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },
    #[error("command io error: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid export artifact: {message}")]
    InvalidArtifact { message: String },
    #[error("failed to read exported image: {message}")]
    ImageReadFailed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Png,
    Print,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Png, ExportFormat::Print];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Png => "PNG",
            Self::Print => "Print",
        }
    }

    pub const fn control_id(self) -> &'static str {
        match self {
            Self::Pdf => "export-pdf",
            Self::Png => "export-png",
            Self::Print => "print-cv",
        }
    }

    const fn raster(self) -> Option<(RasterFormat, &'static str)> {
        match self {
            Self::Pdf => Some((RasterFormat::Pdf, "pdf")),
            Self::Png => Some((RasterFormat::Png, "png")),
            Self::Print => None,
        }
    }

    const fn idle_icon(self) -> &'static str {
        match self {
            Self::Pdf => "fas fa-file-pdf",
            Self::Png => "fas fa-image",
            Self::Print => "fas fa-print",
        }
    }

    const fn idle_text(self) -> (&'static str, &'static str) {
        match self {
            Self::Pdf => ("PDF", "PDF"),
            Self::Png => ("PNG", "PNG"),
            Self::Print => ("Print", "طباعة"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Busy,
    Success,
    Error,
}

/// Icon and label shown inside an export control.
pub fn control_content(format: ExportFormat, state: ControlState, language: Language) -> Vec<El> {
    let (icon_classes, label) = match state {
        ControlState::Idle => {
            let (en, ar) = format.idle_text();
            return vec![
                icon(format.idle_icon()),
                El::new("span").bilingual(en, ar, language.pick(en, ar)),
            ];
        }
        ControlState::Busy => ("fas fa-spinner fa-spin", "Exporting..."),
        ControlState::Success => ("fas fa-check", "Success!"),
        ControlState::Error => ("fas fa-exclamation-triangle", "Error"),
    };
    vec![icon(icon_classes), El::new("span").text(label)]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Another export was already running.
    Skipped,
    Completed { path: Option<PathBuf> },
    Failed { message: String },
}

/// Capabilities the pipeline drives.
pub struct ExportServices {
    pub rasterizer: Rc<dyn Rasterizer>,
    pub printer: Rc<dyn PrintBackend>,
    pub images: Rc<dyn ImageProbe>,
    pub notifier: Rc<dyn Notifier>,
}

pub struct ExportPipeline {
    document: SharedDocument,
    locale: Rc<LocaleCoordinator>,
    preferences: Rc<dyn PreferenceStore>,
    services: ExportServices,
    print_events: Rc<PrintEvents>,
    output_dir: PathBuf,
    options: RasterOptions,
    in_progress: Rc<Cell<bool>>,
    pending_resets: RefCell<Vec<(ExportFormat, Instant)>>,
}

impl ExportPipeline {
    pub fn new(
        document: SharedDocument,
        locale: Rc<LocaleCoordinator>,
        preferences: Rc<dyn PreferenceStore>,
        services: ExportServices,
        print_events: Rc<PrintEvents>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            document,
            locale,
            preferences,
            services,
            print_events,
            output_dir: output_dir.into(),
            options: RasterOptions::default(),
            in_progress: Rc::new(Cell::new(false)),
            pending_resets: RefCell::new(Vec::new()),
        }
    }

    pub async fn export_document(&self) -> ExportOutcome {
        self.run(ExportFormat::Pdf).await
    }

    pub async fn export_image(&self) -> ExportOutcome {
        self.run(ExportFormat::Png).await
    }

    pub async fn print(&self) -> ExportOutcome {
        self.run(ExportFormat::Print).await
    }

    pub async fn run(&self, format: ExportFormat) -> ExportOutcome {
        let Some(mut session) =
            ExportSession::begin(Rc::clone(&self.document), Rc::clone(&self.in_progress))
        else {
            tracing::debug!(format = format.label(), "export already in progress; skipping");
            return ExportOutcome::Skipped;
        };
        tracing::info!(format = format.label(), "export started");
        self.show_control(format, ControlState::Busy);

        let result = self.execute(format, &mut session).await;
        drop(session);
        self.finish(format, result)
    }

    pub fn is_exporting(&self) -> bool {
        self.in_progress.get()
    }

    async fn execute(
        &self,
        format: ExportFormat,
        session: &mut ExportSession,
    ) -> Result<Option<PathBuf>, ExportError> {
        self.settle_images().await;
        session.force_light_theme();
        tokio::time::sleep(Duration::from_millis(LAYOUT_TOKENS.export_settle_ms)).await;

        match format.raster() {
            Some((raster, extension)) => {
                let (page, name) = self.snapshot_content()?;
                let file_name = artifact_file_name(
                    &name,
                    self.locale.current(),
                    Utc::now().date_naive(),
                    extension,
                );
                let output = self.output_dir.join(file_name);
                ensure_directory(&self.output_dir).await?;
                self.services
                    .rasterizer
                    .rasterize(&RasterRequest {
                        html: &page,
                        format: raster,
                        output: &output,
                        options: &self.options,
                    })
                    .await?;
                Ok(Some(output))
            }
            None => self.print_page().await.map(|()| None),
        }
    }

    async fn print_page(&self) -> Result<(), ExportError> {
        {
            let mut doc = self.document.borrow_mut();
            let body = doc.body();
            doc.add_class(body, PRINTING_CLASS);
        }
        let document = Rc::clone(&self.document);
        self.print_events.after.subscribe_once(move |_| {
            let mut doc = document.borrow_mut();
            let body = doc.body();
            doc.remove_class(body, PRINTING_CLASS);
        });

        self.print_events.before.publish(&PrintLifecycle::Before);
        let result = match self.snapshot_content() {
            Ok((page, _)) => self.services.printer.print(&page).await,
            Err(err) => Err(err),
        };
        self.print_events.after.publish(&PrintLifecycle::After);
        result
    }

    fn snapshot_content(&self) -> Result<(String, String), ExportError> {
        let doc = self.document.borrow();
        let content = doc.by_id(ids::CONTENT).ok_or(ExportError::MissingContent)?;
        Ok((html::standalone_page(&doc, content), display_name(&doc)))
    }

    async fn settle_images(&self) {
        let sources: Vec<String> = {
            let doc = self.document.borrow();
            match doc.by_id(ids::CONTENT) {
                Some(content) => doc
                    .by_tag(content, "img")
                    .into_iter()
                    .filter_map(|img| doc.attr(img, "src").map(str::to_string))
                    .collect(),
                None => Vec::new(),
            }
        };
        let probes = sources.iter().map(|src| self.services.images.settle(src));
        let results = futures::future::join_all(probes).await;
        let failed = results
            .iter()
            .filter(|load| **load == ImageLoad::Failed)
            .count();
        tracing::debug!(images = results.len(), failed, "images settled");
    }

    fn finish(&self, format: ExportFormat, result: Result<Option<PathBuf>, ExportError>) -> ExportOutcome {
        let label = format.label();
        match result {
            Ok(path) => {
                tracing::info!(format = label, path = ?path, "export completed");
                self.show_control(format, ControlState::Success);
                self.schedule_reset(format, LAYOUT_TOKENS.success_reset_ms);
                ExportStatistics::record(self.preferences.as_ref(), label, Utc::now());
                self.services
                    .notifier
                    .notify(&Notice::success(format!("{label} exported successfully!")));
                ExportOutcome::Completed { path }
            }
            Err(err) => {
                tracing::error!(format = label, error = %err, "export failed");
                self.show_control(format, ControlState::Error);
                self.schedule_reset(format, LAYOUT_TOKENS.error_reset_ms);
                let message = err.to_string();
                self.services
                    .notifier
                    .notify(&Notice::error(format!("{label} export failed: {message}")));
                ExportOutcome::Failed { message }
            }
        }
    }

    fn show_control(&self, format: ExportFormat, state: ControlState) {
        let language = self.locale.current();
        let mut doc = self.document.borrow_mut();
        let Some(button) = doc.by_id(format.control_id()) else {
            return;
        };
        if state == ControlState::Busy {
            doc.set_attr(button, "disabled", "");
        } else if state == ControlState::Idle {
            doc.remove_attr(button, "disabled");
        }
        doc.clear_children(button);
        for part in control_content(format, state, language) {
            doc.append_tree(button, part);
        }
    }

    fn schedule_reset(&self, format: ExportFormat, delay_ms: u64) {
        let due = Instant::now() + Duration::from_millis(delay_ms);
        let mut pending = self.pending_resets.borrow_mut();
        pending.retain(|(pending_format, _)| *pending_format != format);
        pending.push((format, due));
    }

    /// Returns controls whose feedback delay has elapsed to their idle state.
    pub fn tick(&self, now: Instant) {
        let due: Vec<ExportFormat> = {
            let mut pending = self.pending_resets.borrow_mut();
            let (due, waiting): (Vec<_>, Vec<_>) =
                pending.drain(..).partition(|(_, at)| *at <= now);
            *pending = waiting;
            due.into_iter().map(|(format, _)| format).collect()
        };
        for format in due {
            self.show_control(format, ControlState::Idle);
        }
    }

    pub fn statistics(&self) -> ExportStatistics {
        ExportStatistics::read(self.preferences.as_ref())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

async fn ensure_directory(path: &Path) -> Result<(), ExportError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| ExportError::OutputDirectory {
            path: path.to_path_buf(),
            source,
        })
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("output_dir", &self.output_dir)
            .field("in_progress", &self.in_progress.get())
            .finish_non_exhaustive()
    }
}
