use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;

use imagegrabber::app::ImageGrabberApp;
use imagegrabber::feed::{FeedReader, FeedSource};
use imagegrabber::settings::Settings;
use imagegrabber::ui::GridLayout;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collect the images of a web page, filter them and download a selection"
)]
struct Args {
    /// Pages to collect images from
    #[arg(value_name = "PAGE")]
    pages: Vec<String>,

    /// JSON-lines feed of {"images": [...], "linkedImages": {...}} messages ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    feed: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Directory downloads are saved into
    #[arg(short = 'o', long, value_name = "DIR")]
    download_dir: Option<PathBuf>,

    /// Number of parallel download threads
    #[arg(short = 'j', long = "parallel", default_value_t = 4)]
    parallel: usize,
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,imagegrabber=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut sources: Vec<FeedSource> = args.pages.into_iter().map(FeedSource::Page).collect();
    if let Some(feed) = args.feed {
        sources.push(FeedSource::Lines(feed));
    }
    if sources.is_empty() {
        return Err(anyhow!("Nothing to collect images from; pass a PAGE or --feed"));
    }

    let settings_path = args.settings.unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&settings_path)?;
    info!(path = %settings_path.display(), "loaded settings");

    let download_dir = match args.download_dir {
        Some(dir) => dir,
        None => dirs::download_dir()
            .or_else(|| std::env::current_dir().ok())
            .context("Unable to determine a download directory")?,
    };

    // Room for the grid plus the scroll bar.
    let window_width = (GridLayout::from_store(&settings).container_width() + 24.0).max(480.0);

    let feed = FeedReader::new(sources);
    let app = ImageGrabberApp::new(settings, feed, download_dir, args.parallel)?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Image Grabber")
            .with_inner_size([window_width, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "imagegrabber",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app) as Box<dyn eframe::App>)),
    )
    .map_err(|err| anyhow!("{err}"))?;

    Ok(())
}
