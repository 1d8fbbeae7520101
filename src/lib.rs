pub mod app;
pub mod assets;
pub mod binder;
pub mod config;
pub mod content;
pub mod dom;
pub mod environment;
pub mod error;
pub mod events;
pub mod export;
pub mod input;
pub mod locale;
pub mod logging;
pub mod notification;
pub mod qr;
pub mod storage;
pub mod theme;
pub mod ui;
pub use error::{AppError, AppResult};

use std::path::PathBuf;

use app::{App, AppServices, Command, Reply};
use config::AppConfig;
use export::ExportFormat;

const DEFAULT_PAGE_FILE: &str = "index.html";

/// Command-line overrides layered on top of `config.json`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub data_source: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub page: Option<PathBuf>,
    pub language: Option<String>,
    pub theme: Option<String>,
    pub accent: Option<String>,
    pub exports: Vec<ExportFormat>,
    pub interactive: bool,
}

impl RunOptions {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(data_source) = &self.data_source {
            config.data_source = Some(data_source.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = Some(output_dir.clone());
        }
    }

    fn page_path(&self, config: &AppConfig) -> PathBuf {
        self.page
            .clone()
            .unwrap_or_else(|| config.output_dir().join(DEFAULT_PAGE_FILE))
    }
}

/// Entrypoint used by the CLI binary.
pub fn run(options: RunOptions) -> AppResult<()> {
    logging::init();
    tracing::info!("starting cvpage");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;
    runtime.block_on(serve(options))
}

async fn serve(options: RunOptions) -> AppResult<()> {
    let mut config = config::load_app_config();
    options.apply_to(&mut config);
    let page = options.page_path(&config);

    let app = match AppServices::from_config(&config).and_then(|services| App::bootstrap(&config, services)) {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = %err, "error initializing CV application");
            if let Err(write_err) = app::write_failure_page(&page).await {
                tracing::warn!(error = %write_err, "failed to write error page");
            }
            return Err(err);
        }
    };
    app.start().await;

    let presets = [
        options.language.clone().map(Command::Language),
        options.theme.clone().map(Command::Theme),
        options.accent.clone().map(Command::Accent),
    ];
    for command in presets.into_iter().flatten() {
        app.handle(command).await;
    }
    for format in &options.exports {
        if let Reply::Message(message) = app.handle(Command::Export(*format)).await {
            println!("{message}");
        }
    }

    app.settle();
    app::write_page(&app, &page).await?;
    if options.interactive {
        app::run_console(&app, &page).await?;
    }

    tracing::info!(state = ?app.snapshot(), "shutdown");
    Ok(())
}
