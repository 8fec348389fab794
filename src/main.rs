mod cli;
mod config;
mod error;
mod files;
mod image_handler;
mod scale;
mod ui;

use anyhow::Context;
use clap::Parser;
use winit::event_loop::EventLoop;

use crate::cli::Cli;
use crate::config::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::files::expand_paths;
use crate::image_handler::ImageHandler;
use crate::ui::App;
use crate::ui::state::ViewerState;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let initial_paths = expand_paths(&cli.paths, cli.recursive);
    if !cli.paths.is_empty() && initial_paths.is_empty() {
        log::warn!("No image files found in the given paths.");
    }

    let event_loop = EventLoop::new().context("create event loop")?;

    let state = ViewerState::new(
        ImageHandler::new(),
        cli.filter,
        DEFAULT_WINDOW_WIDTH,
        DEFAULT_WINDOW_HEIGHT,
    );
    let mut app = App::new(state, initial_paths);

    event_loop
        .run_app(&mut app)
        .context("run event loop")?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
