//! Application coordinator: builds the page, owns the coordinators and wires
//! their notifications to each other.

mod analytics;
mod bootstrap;
mod commands;
mod console;
mod debounce;

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::assets::{ImageLoad, ImageProbe, PROFILE_PLACEHOLDER};
use crate::binder::PresentationBinder;
use crate::config::AppConfig;
use crate::content::{ContentModel, ContentOrigin, ContentSource, LocalizedDocument, Settings};
use crate::dom::{html, Document, El, SharedDocument};
use crate::error::{AppError, AppResult};
use crate::events::{ColorThemeChanged, ContentLoaded, LanguageChanged, PrintEvents, ThemeChanged};
use crate::export::{ExportFormat, ExportOutcome, ExportPipeline, ExportServices};
use crate::input::{KeyChord, ShortcutAction};
use crate::locale::{Language, LocaleCoordinator};
use crate::qr::CodeGenerator;
use crate::theme::{Accent, ThemeCoordinator, ThemeMode};
use crate::ui::{build_page, icon, ids, startup_failure_page, LAYOUT_TOKENS};

pub use analytics::{AnalyticsSink, TracingAnalytics};
pub use bootstrap::AppServices;
pub use commands::{parse_command, Command, CommandError, COMMAND_HELP};
pub use console::run_console;
pub use debounce::Debouncer;

pub const UI_TICK_INTERVAL: Duration = Duration::from_millis(100);

pub const STARTUP_FAILURE_MESSAGE: &str = "Failed to load CV template. Please refresh the page.";

const MODAL_OVERLAY_CLASS: &str = "modal-overlay";
const EXPANDED_CLASS: &str = "expanded";

/// Observable application state, printed by the `state` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub initialized: bool,
    pub language: Language,
    pub theme: ThemeMode,
    pub color_theme: Accent,
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Done,
    Message(String),
    Save,
    Quit,
}

pub struct App {
    document: SharedDocument,
    content: ContentModel,
    content_source: Box<dyn ContentSource>,
    images: Rc<dyn ImageProbe>,
    analytics: Rc<dyn AnalyticsSink>,
    locale: Rc<LocaleCoordinator>,
    theme: Rc<ThemeCoordinator>,
    export: ExportPipeline,
    codes: Rc<CodeGenerator>,
    print_events: Rc<PrintEvents>,
    profile_override: Rc<RefCell<Option<String>>>,
    resize: RefCell<Debouncer<u32>>,
    loading_hide_at: Cell<Option<Instant>>,
    initialized: Cell<bool>,
}

impl App {
    /// Builds the page and every coordinator; nothing is loaded until [`App::start`].
    pub fn bootstrap(config: &AppConfig, services: AppServices) -> AppResult<Self> {
        let output_dir = config.output_dir();
        std::fs::create_dir_all(&output_dir).map_err(|source| AppError::OutputDirectory {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self::assemble(services, output_dir))
    }

    fn assemble(services: AppServices, output_dir: PathBuf) -> Self {
        let AppServices {
            preferences,
            content_source,
            rasterizer,
            printer,
            images,
            notifier,
            code_renderer,
            analytics,
            environment,
        } = services;

        let document = build_page().shared();

        let locale = Rc::new(LocaleCoordinator::new(
            Rc::clone(&preferences),
            Rc::clone(&document),
        ));
        locale.initialize(environment.language.as_deref());

        let theme = Rc::new(ThemeCoordinator::new(
            Rc::clone(&preferences),
            Rc::clone(&document),
        ));
        let theme_state = theme.initialize(environment.prefers_dark);

        let print_events = Rc::new(PrintEvents::new());
        let export = ExportPipeline::new(
            Rc::clone(&document),
            Rc::clone(&locale),
            Rc::clone(&preferences),
            ExportServices {
                rasterizer,
                printer,
                images: Rc::clone(&images),
                notifier,
            },
            Rc::clone(&print_events),
            output_dir,
        );
        let codes = Rc::new(CodeGenerator::new(
            Rc::clone(&document),
            code_renderer,
            theme_state.mode,
        ));

        tracing::info!(
            language = %locale.current(),
            theme = theme_state.mode.id(),
            color_theme = theme_state.accent.id(),
            "application assembled"
        );

        Self {
            document,
            content: ContentModel::new(),
            content_source,
            images,
            analytics,
            locale,
            theme,
            export,
            codes,
            print_events,
            profile_override: Rc::new(RefCell::new(None)),
            resize: RefCell::new(Debouncer::new(Duration::from_millis(
                LAYOUT_TOKENS.resize_debounce_ms,
            ))),
            loading_hide_at: Cell::new(None),
            initialized: Cell::new(false),
        }
    }

    /// Loads content, renders it and wires the listeners. Later calls are no-ops.
    pub async fn start(&self) {
        if self.initialized.get() {
            return;
        }
        self.set_loading_screen(true);
        let analytics = Rc::clone(&self.analytics);
        self.content.loaded().subscribe_once(move |event: &ContentLoaded| {
            let origin = match event.origin {
                ContentOrigin::Source => "source",
                ContentOrigin::Defaults => "defaults",
            };
            analytics.track("content_loaded", &[("origin", origin.to_string())]);
        });

        let content = self.content.load(self.content_source.as_ref()).await;
        {
            let mut doc = self.document.borrow_mut();
            PresentationBinder::render_all(&mut doc, &content, self.locale.current());
        }
        self.resolve_profile_image(&content.settings).await;
        self.wire_listeners(Rc::clone(&content));

        if let Some(url) = code_url(&content.settings) {
            self.codes.generate(url);
        }

        self.initialized.set(true);
        self.loading_hide_at.set(Some(
            Instant::now() + Duration::from_millis(LAYOUT_TOKENS.loading_hide_ms),
        ));
        let mut doc = self.document.borrow_mut();
        for container in doc.by_class("cv-container") {
            doc.add_class(container, "fade-in");
        }
        tracing::info!("CV application initialized");
    }

    fn set_loading_screen(&self, shown: bool) {
        let mut doc = self.document.borrow_mut();
        let Some(screen) = doc.by_id(ids::LOADING_SCREEN) else {
            return;
        };
        if shown {
            doc.remove_class(screen, "hidden");
        } else {
            doc.add_class(screen, "hidden");
        }
    }

    async fn resolve_profile_image(&self, settings: &Settings) {
        let image = &settings.profile_image;
        if !image.enabled || image.url.is_empty() {
            return;
        }
        if self.images.settle(&image.url).await == ImageLoad::Failed {
            tracing::warn!(src = %image.url, "profile image failed to load; using placeholder");
            *self.profile_override.borrow_mut() = Some(PROFILE_PLACEHOLDER.to_string());
            PresentationBinder::set_profile_image(&mut self.document.borrow_mut(), PROFILE_PLACEHOLDER);
        }
    }

    fn wire_listeners(&self, content: Rc<LocalizedDocument>) {
        let document = Rc::clone(&self.document);
        let codes = Rc::clone(&self.codes);
        let analytics = Rc::clone(&self.analytics);
        let profile_override = Rc::clone(&self.profile_override);
        self.locale.changed().subscribe(move |event: &LanguageChanged| {
            {
                let mut doc = document.borrow_mut();
                PresentationBinder::render_all(&mut doc, &content, event.language);
                if let Some(src) = profile_override.borrow().as_deref() {
                    PresentationBinder::set_profile_image(&mut doc, src);
                }
            }
            if let Some(url) = code_url(&content.settings) {
                codes.generate(url);
            }
            analytics.track("language_changed", &[("language", event.language.code().to_string())]);
        });

        let codes = Rc::clone(&self.codes);
        let analytics = Rc::clone(&self.analytics);
        self.theme.theme_changed().subscribe(move |event: &ThemeChanged| {
            codes.update_colors(event.mode);
            analytics.track("theme_changed", &[("theme", event.mode.id().to_string())]);
        });

        let codes = Rc::clone(&self.codes);
        let analytics = Rc::clone(&self.analytics);
        let theme: Weak<ThemeCoordinator> = Rc::downgrade(&self.theme);
        self.theme.color_changed().subscribe(move |event: &ColorThemeChanged| {
            if let Some(theme) = theme.upgrade() {
                codes.update_colors(theme.state().mode);
            }
            analytics.track("color_theme_changed", &[("colorTheme", event.accent.id().to_string())]);
        });

        let document = Rc::clone(&self.document);
        let analytics = Rc::clone(&self.analytics);
        self.print_events.before.subscribe(move |_| {
            set_collapsibles_expanded(&mut document.borrow_mut(), true);
            analytics.track("print_initiated", &[]);
        });
        let document = Rc::clone(&self.document);
        self.print_events.after.subscribe(move |_| {
            set_collapsibles_expanded(&mut document.borrow_mut(), false);
        });
    }

    pub async fn handle(&self, command: Command) -> Reply {
        match command {
            Command::Language(code) => {
                self.locale.set_language(&code);
                Reply::Done
            }
            Command::ToggleLanguage => {
                self.locale.toggle_language();
                Reply::Done
            }
            Command::Theme(mode) => {
                self.theme.set_theme(&mode);
                Reply::Done
            }
            Command::ToggleTheme => {
                self.theme.toggle_theme();
                Reply::Done
            }
            Command::Accent(accent) => {
                self.theme.set_color_theme(&accent);
                Reply::Done
            }
            Command::SystemTheme { prefers_dark } => {
                self.theme.on_system_preference_changed(prefers_dark);
                Reply::Done
            }
            Command::Export(format) => self.run_export(format).await,
            Command::Key(chord) => self.handle_key(chord).await,
            Command::Resize(width) => {
                self.on_resize(width, Instant::now());
                Reply::Done
            }
            Command::Visibility { hidden } => {
                self.set_visibility(hidden);
                Reply::Done
            }
            Command::State => match serde_json::to_string(&self.snapshot()) {
                Ok(json) => Reply::Message(json),
                Err(err) => Reply::Message(format!("failed to serialize state: {err}")),
            },
            Command::Stats => {
                let stats = self.export.statistics();
                Reply::Message(format!(
                    "exports: {}, last: {}, preferred: {}",
                    stats.total_exports,
                    stats
                        .last_export
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string()),
                    stats.preferred_format
                ))
            }
            Command::Save => Reply::Save,
            Command::Quit => Reply::Quit,
        }
    }

    /// Dispatches a keyboard shortcut; unbound chords do nothing.
    pub async fn handle_key(&self, chord: KeyChord) -> Reply {
        let Some(action) = chord.action() else {
            tracing::debug!(?chord, "unbound key chord");
            return Reply::Done;
        };
        match action {
            ShortcutAction::ToggleLanguage => {
                self.locale.toggle_language();
                Reply::Done
            }
            ShortcutAction::ToggleTheme => {
                self.theme.toggle_theme();
                Reply::Done
            }
            ShortcutAction::Print => self.run_export(ExportFormat::Print).await,
            ShortcutAction::ExportPdf => self.run_export(ExportFormat::Pdf).await,
            ShortcutAction::ExportPng => self.run_export(ExportFormat::Png).await,
            ShortcutAction::ShowHelp => {
                self.show_help();
                Reply::Done
            }
            ShortcutAction::CloseModals => {
                self.close_modals();
                Reply::Done
            }
        }
    }

    async fn run_export(&self, format: ExportFormat) -> Reply {
        Reply::Message(describe_outcome(format, self.export.run(format).await))
    }

    pub fn show_help(&self) {
        let mut doc = self.document.borrow_mut();
        let body = doc.body();
        doc.append_tree(body, help_modal());
    }

    pub fn close_modals(&self) {
        let mut doc = self.document.borrow_mut();
        for overlay in doc.by_class(MODAL_OVERLAY_CLASS) {
            doc.remove(overlay);
        }
    }

    pub fn on_resize(&self, width: u32, now: Instant) {
        self.resize.borrow_mut().schedule(width, now);
    }

    pub fn set_visibility(&self, hidden: bool) {
        let mut doc = self.document.borrow_mut();
        let body = doc.body();
        doc.set_style(
            body,
            "animation-play-state",
            if hidden { "paused" } else { "running" },
        );
    }

    /// Advances timers: loading screen, debounced layout, theme transitions
    /// and export feedback.
    pub fn tick(&self, now: Instant) {
        if self.loading_hide_at.get().is_some_and(|at| at <= now) {
            self.loading_hide_at.set(None);
            self.set_loading_screen(false);
        }
        let width = self.resize.borrow_mut().poll(now);
        if let Some(width) = width {
            self.apply_layout(width);
        }
        self.theme.tick(now);
        self.export.tick(now);
    }

    /// Fires every pending timer as though its delay had already elapsed,
    /// leaving the page in its resting state before it is written out.
    pub fn settle(&self) {
        let horizon = [
            LAYOUT_TOKENS.loading_hide_ms,
            LAYOUT_TOKENS.theme_transition_ms,
            LAYOUT_TOKENS.resize_debounce_ms,
            LAYOUT_TOKENS.success_reset_ms,
            LAYOUT_TOKENS.error_reset_ms,
        ]
        .into_iter()
        .max()
        .unwrap_or_default();
        self.tick(Instant::now() + Duration::from_millis(horizon));
    }

    fn apply_layout(&self, width: u32) {
        let mobile = width <= LAYOUT_TOKENS.mobile_breakpoint;
        let mut doc = self.document.borrow_mut();
        for wrapper in doc.by_class("cv-wrapper") {
            if mobile {
                doc.add_class(wrapper, "mobile-layout");
            } else {
                doc.remove_class(wrapper, "mobile-layout");
            }
        }
        tracing::debug!(width, mobile, "layout updated");
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let theme = self.theme.state();
        AppSnapshot {
            initialized: self.initialized.get(),
            language: self.locale.current(),
            theme: theme.mode,
            color_theme: theme.accent,
        }
    }

    pub fn page_html(&self) -> String {
        html::render_document(&self.document.borrow())
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn locale(&self) -> &LocaleCoordinator {
        &self.locale
    }

    pub fn theme(&self) -> &ThemeCoordinator {
        &self.theme
    }

    pub fn export(&self) -> &ExportPipeline {
        &self.export
    }

    pub fn codes(&self) -> &CodeGenerator {
        &self.codes
    }
}

/// Writes the current page, creating parent directories as needed.
pub async fn write_page(app: &App, path: &Path) -> AppResult<()> {
    write_html(path, app.page_html()).await?;
    tracing::info!(path = %path.display(), "page written");
    Ok(())
}

/// Writes the error page shown when the application cannot start.
pub async fn write_failure_page(path: &Path) -> AppResult<()> {
    let page = html::render_document(&startup_failure_page(STARTUP_FAILURE_MESSAGE));
    write_html(path, page).await
}

async fn write_html(path: &Path, page: String) -> AppResult<()> {
    let to_error = |source: std::io::Error| AppError::WritePage {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(to_error)?;
    }
    tokio::fs::write(path, page).await.map_err(to_error)
}

fn code_url(settings: &Settings) -> Option<&str> {
    let code = &settings.qr_code;
    (code.enabled && !code.url.is_empty()).then_some(code.url.as_str())
}

fn set_collapsibles_expanded(doc: &mut Document, expanded: bool) {
    for section in doc.by_class("collapsible") {
        if expanded {
            doc.add_class(section, EXPANDED_CLASS);
        } else {
            doc.remove_class(section, EXPANDED_CLASS);
        }
    }
}

fn help_modal() -> El {
    let items = ShortcutAction::ALL.into_iter().map(|action| {
        let (keys, description) = action.help();
        El::new("div")
            .class("shortcut-item")
            .child(El::new("kbd").text(keys))
            .child(El::new("span").text(description))
    });
    El::new("div").class(MODAL_OVERLAY_CLASS).child(
        El::new("div")
            .class("modal-content")
            .child(
                El::new("div")
                    .class("modal-header")
                    .child(El::new("h3").text("Keyboard Shortcuts"))
                    .child(
                        El::new("button")
                            .class("modal-close")
                            .attr("aria-label", "Close")
                            .child(icon("fas fa-times")),
                    ),
            )
            .child(El::new("div").class("modal-body").children(items)),
    )
}

fn describe_outcome(format: ExportFormat, outcome: ExportOutcome) -> String {
    let label = format.label();
    match outcome {
        ExportOutcome::Skipped => format!("{label}: another export is in progress"),
        ExportOutcome::Completed { path: Some(path) } => format!("{label} written to {}", path.display()),
        ExportOutcome::Completed { path: None } => format!("{label} sent"),
        ExportOutcome::Failed { message } => format!("{label} failed: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::analytics::RecordingAnalytics;
    use super::*;
    use crate::content::ContentError;
    use crate::environment::EnvironmentSnapshot;
    use crate::export::{ExportError, PrintBackend, RasterRequest, Rasterizer};
    use crate::notification::RecordingNotifier;
    use crate::qr::{CodeColors, QrSvgRenderer};
    use crate::storage::{keys, MemoryPreferenceStore, PreferenceStore};
    use crate::ui::ids;
    use async_trait::async_trait;

    const CV_JSON: &str = r#"{
        "personalInfo": {
            "en": { "name": "Layla Haddad", "title": "Platform Engineer" },
            "ar": { "name": "ليلى حداد", "title": "مهندسة منصات" }
        },
        "settings": {
            "profileImage": { "enabled": true, "url": "images/layla.jpg" },
            "qrCode": { "enabled": true, "url": "https://example.com/cv" }
        }
    }"#;

    struct StaticSource(Option<&'static str>);

    #[async_trait(?Send)]
    impl ContentSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn fetch(&self) -> Result<String, ContentError> {
            self.0
                .map(str::to_string)
                .ok_or(ContentError::Status { status: 404 })
        }
    }

    struct NoopRasterizer;

    #[async_trait(?Send)]
    impl Rasterizer for NoopRasterizer {
        async fn rasterize(&self, _request: &RasterRequest<'_>) -> Result<(), ExportError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakePrinter {
        pages: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl PrintBackend for FakePrinter {
        async fn print(&self, html: &str) -> Result<(), ExportError> {
            self.pages.borrow_mut().push(html.to_string());
            Ok(())
        }
    }

    struct FixedImages(ImageLoad);

    #[async_trait(?Send)]
    impl ImageProbe for FixedImages {
        async fn settle(&self, _src: &str) -> ImageLoad {
            self.0
        }
    }

    struct Harness {
        app: App,
        analytics: Rc<RecordingAnalytics>,
        printer: Rc<FakePrinter>,
        prefs: Rc<MemoryPreferenceStore>,
        _output: tempfile::TempDir,
    }

    fn services(
        content: Option<&'static str>,
        images: ImageLoad,
    ) -> (AppServices, Rc<RecordingAnalytics>, Rc<FakePrinter>, Rc<MemoryPreferenceStore>) {
        let analytics = Rc::new(RecordingAnalytics::default());
        let printer = Rc::new(FakePrinter::default());
        let prefs = Rc::new(MemoryPreferenceStore::new());
        let services = AppServices {
            preferences: prefs.clone(),
            content_source: Box::new(StaticSource(content)),
            rasterizer: Rc::new(NoopRasterizer),
            printer: printer.clone(),
            images: Rc::new(FixedImages(images)),
            notifier: Rc::new(RecordingNotifier::default()),
            code_renderer: Rc::new(QrSvgRenderer),
            analytics: analytics.clone(),
            environment: EnvironmentSnapshot::default(),
        };
        (services, analytics, printer, prefs)
    }

    async fn started(content: Option<&'static str>, images: ImageLoad) -> Harness {
        let output = tempfile::tempdir().unwrap();
        let (services, analytics, printer, prefs) = services(content, images);
        let app = App::assemble(services, output.path().to_path_buf());
        app.start().await;
        Harness {
            app,
            analytics,
            printer,
            prefs,
            _output: output,
        }
    }

    fn text_of(app: &App, id: &str) -> String {
        let doc = app.document().borrow();
        doc.text_content(doc.by_id(id).unwrap())
    }

    fn profile_src(app: &App) -> Option<String> {
        let doc = app.document().borrow();
        doc.attr(doc.by_id(ids::PROFILE_IMAGE).unwrap(), "src")
            .map(str::to_string)
    }

    fn chord(raw: &str) -> KeyChord {
        KeyChord::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn start_renders_content_and_marks_initialized() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;

        assert!(h.app.snapshot().initialized);
        assert_eq!(text_of(&h.app, ids::PROFILE_NAME), "Layla Haddad");
        assert_eq!(profile_src(&h.app).as_deref(), Some("images/layla.jpg"));
        assert_eq!(h.app.codes().url().as_deref(), Some("https://example.com/cv"));

        let doc = h.app.document().borrow();
        let container = doc.by_class("cv-container")[0];
        assert!(doc.has_class(container, "fade-in"));
        assert_eq!(h.analytics.names(), vec!["content_loaded".to_string()]);
    }

    #[tokio::test]
    async fn loading_screen_hides_shortly_after_start() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;
        let loading_hidden = |app: &App| {
            let doc = app.document().borrow();
            let screen = doc.by_id(ids::LOADING_SCREEN).unwrap();
            doc.has_class(screen, "hidden")
        };
        assert!(!loading_hidden(&h.app));

        h.app.tick(Instant::now());
        assert!(!loading_hidden(&h.app));

        h.app
            .tick(Instant::now() + Duration::from_millis(LAYOUT_TOKENS.loading_hide_ms + 1));
        assert!(loading_hidden(&h.app));
    }

    #[tokio::test]
    async fn unreachable_source_renders_defaults() {
        let h = started(None, ImageLoad::Loaded).await;

        assert!(h.app.snapshot().initialized);
        assert_eq!(text_of(&h.app, ids::PROFILE_NAME), "Your Name");
        assert_eq!(
            h.analytics.last(),
            Some((
                "content_loaded".to_string(),
                vec![("origin".to_string(), "defaults".to_string())]
            ))
        );
    }

    #[tokio::test]
    async fn language_change_rerenders_and_keeps_placeholder() {
        let h = started(Some(CV_JSON), ImageLoad::Failed).await;
        assert_eq!(profile_src(&h.app).as_deref(), Some(PROFILE_PLACEHOLDER));

        let reply = h.app.handle(Command::Language("ar".to_string())).await;

        assert_eq!(reply, Reply::Done);
        assert_eq!(text_of(&h.app, ids::PROFILE_NAME), "ليلى حداد");
        assert_eq!(profile_src(&h.app).as_deref(), Some(PROFILE_PLACEHOLDER));
        assert_eq!(h.prefs.get(keys::LANGUAGE).as_deref(), Some("ar"));
        assert_eq!(
            h.analytics.last(),
            Some((
                "language_changed".to_string(),
                vec![("language".to_string(), "ar".to_string())]
            ))
        );
    }

    #[tokio::test]
    async fn theme_changes_recolor_the_code() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;
        assert_eq!(h.app.codes().colors(), CodeColors::for_mode(ThemeMode::Light));

        h.app.handle_key(chord("ctrl+shift+t")).await;
        assert_eq!(h.app.codes().colors(), CodeColors::for_mode(ThemeMode::Dark));
        assert_eq!(h.app.snapshot().theme, ThemeMode::Dark);

        h.app.handle(Command::Accent("teal".to_string())).await;
        assert_eq!(h.app.codes().colors(), CodeColors::for_mode(ThemeMode::Dark));
        assert_eq!(h.app.snapshot().color_theme, Accent::Teal);
        assert_eq!(
            h.analytics.last(),
            Some((
                "color_theme_changed".to_string(),
                vec![("colorTheme".to_string(), "teal".to_string())]
            ))
        );
        assert!(h.analytics.names().contains(&"theme_changed".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn print_expands_collapsed_sections_only_while_printing() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;

        let reply = h.app.handle_key(chord("ctrl+p")).await;

        assert_eq!(reply, Reply::Message("Print sent".to_string()));
        let pages = h.printer.pages.borrow();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("collapsible expanded"));
        let doc = h.app.document().borrow();
        assert!(doc
            .by_class("collapsible")
            .into_iter()
            .all(|section| !doc.has_class(section, EXPANDED_CLASS)));
        assert!(h.analytics.names().contains(&"print_initiated".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn settled_page_shows_idle_controls_after_export() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;
        h.app.handle(Command::ToggleTheme).await;
        let reply = h.app.handle(Command::Export(ExportFormat::Pdf)).await;
        assert!(matches!(reply, Reply::Message(message) if message.starts_with("PDF written to")));
        assert!(h.app.page_html().contains("Success!"));

        h.app.settle();

        assert!(!h.app.page_html().contains("Success!"));
        let doc = h.app.document().borrow();
        assert!(!doc.has_class(doc.body(), "theme-transition"));
        assert!(doc.has_class(doc.by_id(ids::LOADING_SCREEN).unwrap(), "hidden"));
        let button = doc.by_id(ExportFormat::Pdf.control_id()).unwrap();
        assert_eq!(doc.attr(button, "disabled"), None);
        assert_eq!(doc.text_content(button), "PDF");
    }

    #[tokio::test]
    async fn help_modal_opens_and_escape_closes_all() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;

        h.app.handle_key(chord("ctrl+/")).await;
        h.app.handle_key(chord("ctrl+/")).await;
        assert_eq!(h.app.document().borrow().by_class(MODAL_OVERLAY_CLASS).len(), 2);
        let page = h.app.page_html();
        assert!(page.contains("Keyboard Shortcuts"));
        assert!(page.contains("<kbd>Ctrl/Cmd + Shift + L</kbd>"));

        h.app.handle_key(chord("escape")).await;
        assert!(h.app.document().borrow().by_class(MODAL_OVERLAY_CLASS).is_empty());
    }

    #[tokio::test]
    async fn resize_is_debounced_before_switching_layout() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;
        let is_mobile = |app: &App| {
            let doc = app.document().borrow();
            doc.by_class("cv-wrapper")
                .into_iter()
                .any(|wrapper| doc.has_class(wrapper, "mobile-layout"))
        };
        let start = Instant::now();

        h.app.on_resize(1200, start);
        h.app.on_resize(600, start + Duration::from_millis(100));
        h.app.tick(start + Duration::from_millis(300));
        assert!(!is_mobile(&h.app));

        h.app.tick(start + Duration::from_millis(350));
        assert!(is_mobile(&h.app));

        h.app.on_resize(1024, start + Duration::from_secs(1));
        h.app.tick(start + Duration::from_secs(2));
        assert!(!is_mobile(&h.app));
    }

    #[tokio::test]
    async fn visibility_pauses_animations() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;

        h.app.handle(Command::Visibility { hidden: true }).await;
        {
            let doc = h.app.document().borrow();
            assert_eq!(doc.style(doc.body(), "animation-play-state"), Some("paused"));
        }
        h.app.handle(Command::Visibility { hidden: false }).await;
        let doc = h.app.document().borrow();
        assert_eq!(doc.style(doc.body(), "animation-play-state"), Some("running"));
    }

    #[tokio::test]
    async fn state_command_reports_snapshot_json() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;
        let reply = h.app.handle(Command::State).await;
        assert_eq!(
            reply,
            Reply::Message(
                r#"{"initialized":true,"language":"en","theme":"light","colorTheme":"blue"}"#.to_string()
            )
        );
        assert_eq!(h.app.handle(Command::Quit).await, Reply::Quit);
    }

    #[tokio::test]
    async fn pages_are_written_with_parent_directories() {
        let h = started(Some(CV_JSON), ImageLoad::Loaded).await;
        let root = tempfile::tempdir().unwrap();
        let page = root.path().join("site").join("index.html");

        write_page(&h.app, &page).await.unwrap();
        let written = std::fs::read_to_string(&page).unwrap();
        assert!(written.contains("Layla Haddad"));

        let failure = root.path().join("failed").join("index.html");
        write_failure_page(&failure).await.unwrap();
        assert!(std::fs::read_to_string(&failure)
            .unwrap()
            .contains(STARTUP_FAILURE_MESSAGE));
    }

    #[test]
    fn bootstrap_creates_the_output_directory() {
        let root = tempfile::tempdir().unwrap();
        let output_dir = root.path().join("exports").join("cv");
        let config = AppConfig {
            output_dir: Some(output_dir.clone()),
            ..AppConfig::default()
        };
        let (services, ..) = services(None, ImageLoad::Loaded);

        let app = App::bootstrap(&config, services).unwrap();

        assert!(output_dir.is_dir());
        assert!(!app.snapshot().initialized);
        assert_eq!(app.export().output_dir(), output_dir.as_path());
    }
}
