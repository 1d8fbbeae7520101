use std::ffi::OsString;
use std::path::Path;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::process::Command;

use super::ExportError;
use crate::theme::parse_hex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Pdf,
    Png,
}

/// Page geometry and quality for rasterized artifacts: A4 portrait with a
/// half-inch margin, rendered at twice the device scale on white. PNG
/// captures span up to `max_capture_pages` pages and are then trimmed to the
/// content.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    pub margin_inches: f32,
    pub scale: u32,
    pub background: &'static str,
    pub image_quality: f32,
    pub page_width_inches: f32,
    pub page_height_inches: f32,
    pub max_capture_pages: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            margin_inches: 0.5,
            scale: 2,
            background: "#ffffff",
            image_quality: 0.98,
            page_width_inches: 8.27,
            page_height_inches: 11.69,
            max_capture_pages: 10,
        }
    }
}

impl RasterOptions {
    const CSS_PIXELS_PER_INCH: f32 = 96.0;

    pub fn page_rules(&self) -> String {
        format!(
            "@page {{ size: A4 portrait; margin: {}in; }} html, body {{ background: {}; }}",
            self.margin_inches, self.background
        )
    }

    /// Viewport in CSS pixels covering one page.
    pub fn viewport(&self) -> (u32, u32) {
        (
            (self.page_width_inches * Self::CSS_PIXELS_PER_INCH).round() as u32,
            (self.page_height_inches * Self::CSS_PIXELS_PER_INCH).round() as u32,
        )
    }

    /// Browser window for PNG captures: one page wide, `max_capture_pages` tall.
    pub fn capture_window(&self) -> (u32, u32) {
        let (width, height) = self.viewport();
        (width, height * self.max_capture_pages.max(1))
    }

    /// Page margin in output pixels at the capture scale.
    pub fn margin_pixels(&self) -> u32 {
        (self.margin_inches * Self::CSS_PIXELS_PER_INCH * self.scale as f32).round() as u32
    }

    /// Inserts the page rules as the last stylesheet of `html`'s head.
    pub fn apply_to(&self, html: &str) -> String {
        let rules = format!("<style>{}</style>", self.page_rules());
        match html.find("</head>") {
            Some(index) => {
                let mut out = String::with_capacity(html.len() + rules.len());
                out.push_str(&html[..index]);
                out.push_str(&rules);
                out.push_str(&html[index..]);
                out
            }
            None => format!("{rules}{html}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RasterRequest<'a> {
    pub html: &'a str,
    pub format: RasterFormat,
    pub output: &'a Path,
    pub options: &'a RasterOptions,
}

/// Turns a standalone HTML page into a PDF or PNG file.
#[async_trait(?Send)]
pub trait Rasterizer {
    async fn rasterize(&self, request: &RasterRequest<'_>) -> Result<(), ExportError>;
}

/// Hands a standalone HTML page to the native print service.
#[async_trait(?Send)]
pub trait PrintBackend {
    async fn print(&self, html: &str) -> Result<(), ExportError>;
}

/// Rasterizes through a headless Chromium-family browser.
#[derive(Debug, Clone)]
pub struct HeadlessBrowserRasterizer {
    browser: String,
}

impl HeadlessBrowserRasterizer {
    pub fn new(browser: impl Into<String>) -> Self {
        Self {
            browser: browser.into(),
        }
    }

    fn arguments(request: &RasterRequest<'_>, page: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["--headless", "--disable-gpu", "--hide-scrollbars"]
            .into_iter()
            .map(OsString::from)
            .collect();
        match request.format {
            RasterFormat::Pdf => {
                args.push("--no-pdf-header-footer".into());
                args.push(prefixed("--print-to-pdf=", request.output));
            }
            RasterFormat::Png => {
                let (width, height) = request.options.capture_window();
                args.push(prefixed("--screenshot=", request.output));
                args.push(format!("--window-size={width},{height}").into());
                args.push(format!("--force-device-scale-factor={}", request.options.scale).into());
                args.push("--default-background-color=ffffffff".into());
            }
        }
        args.push(prefixed("file://", page));
        args
    }
}

fn prefixed(prefix: &str, path: &Path) -> OsString {
    let mut value = OsString::from(prefix);
    value.push(path.as_os_str());
    value
}

#[async_trait(?Send)]
impl Rasterizer for HeadlessBrowserRasterizer {
    async fn rasterize(&self, request: &RasterRequest<'_>) -> Result<(), ExportError> {
        let staged = tempfile::Builder::new()
            .prefix("cvpage-")
            .suffix(".html")
            .tempfile()
            .map_err(ExportError::Stage)?;
        tokio::fs::write(staged.path(), request.options.apply_to(request.html))
            .await
            .map_err(ExportError::Stage)?;

        let args = Self::arguments(request, staged.path());
        run_command(&self.browser, &args).await?;
        if request.format == RasterFormat::Png {
            trim_to_content(request.output, request.options).await?;
        }
        verify_artifact(request.format, request.output).await
    }
}

fn image_failed(err: impl std::fmt::Display) -> ExportError {
    ExportError::ImageReadFailed {
        message: err.to_string(),
    }
}

async fn trim_to_content(output: &Path, options: &RasterOptions) -> Result<(), ExportError> {
    let path = output.to_path_buf();
    let background = parse_hex(options.background).unwrap_or([255, 255, 255]);
    let margin = options.margin_pixels();
    tokio::task::spawn_blocking(move || trim_trailing_background(&path, background, margin))
        .await
        .map_err(image_failed)?
}

/// Crops rows of pure `background` below the last content row, keeping
/// `margin` rows of padding.
fn trim_trailing_background(path: &Path, background: [u8; 3], margin: u32) -> Result<(), ExportError> {
    let image = image::open(path).map_err(image_failed)?.to_rgb8();
    let (width, height) = image.dimensions();
    let content_rows = (0..height)
        .rev()
        .find(|&y| (0..width).any(|x| image.get_pixel(x, y).0 != background))
        .map_or(0, |row| row + 1);
    let keep = content_rows.saturating_add(margin).clamp(1, height.max(1));
    if keep >= height {
        return Ok(());
    }
    image::imageops::crop_imm(&image, 0, 0, width, keep)
        .to_image()
        .save(path)
        .map_err(image_failed)?;
    tracing::debug!(width, captured = height, kept = keep, "trimmed png to content");
    Ok(())
}

async fn verify_artifact(format: RasterFormat, output: &Path) -> Result<(), ExportError> {
    match format {
        RasterFormat::Png => {
            let (width, height) = image::image_dimensions(output).map_err(image_failed)?;
            tracing::debug!(width, height, path = %output.display(), "png written");
            Ok(())
        }
        RasterFormat::Pdf => {
            let metadata = tokio::fs::metadata(output).await.map_err(|_| {
                ExportError::InvalidArtifact {
                    message: format!("no document written to {}", output.display()),
                }
            })?;
            if metadata.len() == 0 {
                return Err(ExportError::InvalidArtifact {
                    message: format!("empty document at {}", output.display()),
                });
            }
            Ok(())
        }
    }
}

/// Prints by rendering a PDF to a temporary file and submitting it to `lp`.
pub struct LpPrintBackend {
    command: String,
    rasterizer: Rc<dyn Rasterizer>,
    options: RasterOptions,
}

impl LpPrintBackend {
    pub fn new(command: impl Into<String>, rasterizer: Rc<dyn Rasterizer>) -> Self {
        Self {
            command: command.into(),
            rasterizer,
            options: RasterOptions::default(),
        }
    }
}

#[async_trait(?Send)]
impl PrintBackend for LpPrintBackend {
    async fn print(&self, html: &str) -> Result<(), ExportError> {
        let scratch = tempfile::tempdir().map_err(ExportError::Stage)?;
        let document = scratch.path().join("cv-print.pdf");
        self.rasterizer
            .rasterize(&RasterRequest {
                html,
                format: RasterFormat::Pdf,
                output: &document,
                options: &self.options,
            })
            .await?;
        run_command(&self.command, &[document.into_os_string()]).await
    }
}

impl std::fmt::Debug for LpPrintBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LpPrintBackend")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

async fn run_command(command: &str, args: &[OsString]) -> Result<(), ExportError> {
    tracing::debug!(command, ?args, "running export command");
    let output = Command::new(command)
        .args(args)
        .output()
        .await
        .map_err(|source| ExportError::CommandIo {
            command: command.to_string(),
            source,
        })?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ExportError::CommandFailed {
            command: command.to_string(),
            message: format!("exit status: {}; stderr: {}", output.status, stderr.trim()),
        })
    }
}
