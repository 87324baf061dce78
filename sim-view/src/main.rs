//! Application entry point for the 2D gravity viewer.
//!
//! This binary reads the settings file, sets up eframe/egui and
//! delegates all interactive logic and rendering to [`Viewer`] from
//! the `viewer` module.

mod viewer;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use sim_core::settings::Settings;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(about = "Toy gravitational N-body simulator")]
struct Args {
    /// Path to the `key:value` settings file.
    #[arg(short, long, default_value = "config.txt")]
    config: PathBuf,
}

/// Starts the native eframe application.
///
/// The window size and multisampling level come from the settings
/// file. All UI state and rendering are handled by [`Viewer`].
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the settings cannot be loaded or eframe fails to create
///   the native window or event loop.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = Settings::load(&args.config)
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    log::info!("loaded settings: {settings:?}");

    let viewer = Viewer::new(settings.clone()).context("failed to spawn initial population")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("grav")
            .with_inner_size([settings.res_x as f32, settings.res_y as f32]),
        multisampling: settings.antialiasing,
        ..Default::default()
    };

    eframe::run_native("grav", options, Box::new(|_cc| Ok(Box::new(viewer))))
        .map_err(|e| anyhow!("viewer exited with an error: {e}"))
}
