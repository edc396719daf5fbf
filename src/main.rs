#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // Windows release: hide console window
use {
    bigbull::{Cli, PERSISTENCE, run_app},
    clap::Parser,
    eframe::NativeOptions,
    std::{panic, path::PathBuf},
    tokio::runtime::Runtime,
};

fn main() -> anyhow::Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("bigbull"), my_code_level)
        .init();

    let args = Cli::parse();

    // Worker threads keep running while eframe owns the main thread.
    let runtime = Runtime::new()?;
    let handle = runtime.handle().clone();

    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(PERSISTENCE.app.state_path)),
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_title("BigBull - Investment Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "BigBull",
        options,
        Box::new(move |cc| Ok(Box::new(run_app(cc, args, handle)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe terminated: {e}"))?;

    runtime.shutdown_timeout(std::time::Duration::from_secs(2));
    Ok(())
}
