use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use cvpage::export::ExportFormat;
use cvpage::RunOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportArg {
    Pdf,
    Png,
    Print,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Pdf => ExportFormat::Pdf,
            ExportArg::Png => ExportFormat::Png,
            ExportArg::Print => ExportFormat::Print,
        }
    }
}

/// Render a bilingual CV page and export it as PDF or PNG.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CV data file or http(s) URL
    #[arg(long)]
    data: Option<String>,

    /// Directory for exported artifacts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Where to write the rendered page [default: <output-dir>/index.html]
    #[arg(long)]
    page: Option<PathBuf>,

    /// Language to show (en or ar)
    #[arg(long)]
    lang: Option<String>,

    /// Color mode (light or dark)
    #[arg(long)]
    theme: Option<String>,

    /// Accent color theme
    #[arg(long)]
    accent: Option<String>,

    /// Export after rendering; may be repeated
    #[arg(long, value_enum)]
    export: Vec<ExportArg>,

    /// Read commands from stdin after startup
    #[arg(short, long, default_value_t = false)]
    interactive: bool,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        Self {
            data_source: args.data,
            output_dir: args.output_dir,
            page: args.page,
            language: args.lang,
            theme: args.theme,
            accent: args.accent,
            exports: args.export.into_iter().map(ExportFormat::from).collect(),
            interactive: args.interactive,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match cvpage::run(args.into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cvpage: {:#}", anyhow::Error::new(err));
            ExitCode::FAILURE
        }
    }
}
