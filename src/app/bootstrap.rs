use std::path::Path;
use std::rc::Rc;

use reqwest::Client;

use crate::assets::{ImageProbe, SourceImageProbe};
use crate::config::AppConfig;
use crate::content::{content_source_for, ContentSource};
use crate::environment::EnvironmentSnapshot;
use crate::error::AppResult;
use crate::export::{HeadlessBrowserRasterizer, LpPrintBackend, PrintBackend, Rasterizer};
use crate::notification::{DesktopNotifier, Notifier};
use crate::qr::{CodeRenderer, QrSvgRenderer};
use crate::storage::{FilePreferenceStore, PreferenceStore};

use super::analytics::{AnalyticsSink, TracingAnalytics};

/// Everything the application talks to outside its own document.
pub struct AppServices {
    pub preferences: Rc<dyn PreferenceStore>,
    pub content_source: Box<dyn ContentSource>,
    pub rasterizer: Rc<dyn Rasterizer>,
    pub printer: Rc<dyn PrintBackend>,
    pub images: Rc<dyn ImageProbe>,
    pub notifier: Rc<dyn Notifier>,
    pub code_renderer: Rc<dyn CodeRenderer>,
    pub analytics: Rc<dyn AnalyticsSink>,
    pub environment: EnvironmentSnapshot,
}

impl AppServices {
    /// Production services wired from `config`.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let preferences = FilePreferenceStore::open_default()?;
        tracing::info!(path = %preferences.path().display(), "opened preference store");

        let client = Client::new();
        let data_source = config.data_source();
        let rasterizer: Rc<dyn Rasterizer> = Rc::new(HeadlessBrowserRasterizer::new(config.browser()));
        let printer = Rc::new(LpPrintBackend::new(
            config.print_command(),
            Rc::clone(&rasterizer),
        ));

        Ok(Self {
            preferences: Rc::new(preferences),
            content_source: content_source_for(&client, data_source),
            rasterizer,
            printer,
            images: Rc::new(SourceImageProbe::new(client, asset_base_dir(data_source))),
            notifier: Rc::new(DesktopNotifier::new(config.desktop_notifications())),
            code_renderer: Rc::new(QrSvgRenderer),
            analytics: Rc::new(TracingAnalytics),
            environment: EnvironmentSnapshot::detect(),
        })
    }
}

/// Relative image paths resolve against the site root the data file lives in:
/// `site/data/cv-data.json` → `site`.
fn asset_base_dir(data_source: &str) -> &Path {
    if data_source.starts_with("http://") || data_source.starts_with("https://") {
        return Path::new(".");
    }
    let data_dir = Path::new(data_source).parent().unwrap_or(Path::new("."));
    match data_dir.file_name() {
        Some(name) if name == "data" => data_dir.parent().unwrap_or(Path::new(".")),
        _ => data_dir,
    }
}
