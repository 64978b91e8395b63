//! Topcut - export a scene file as a top-down SVG cut sheet
//!
//! Usage: topcut <scene.ron>
//!
//! The scene file lists the objects, their meshes and placement, and the
//! export settings including where the SVG is written.

use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "topcut=info,topcut_core=info,topcut_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <scene.ron>", args.first().map_or("topcut", String::as_str));
        return ExitCode::from(2);
    }

    match topcut_cli::run(Path::new(&args[1])) {
        Ok(report) => {
            tracing::info!(
                paths = report.path_count,
                skipped = report.skipped.len(),
                width = report.canvas.0,
                height = report.canvas.1,
                "export finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
