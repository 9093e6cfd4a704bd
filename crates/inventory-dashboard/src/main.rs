mod bootstrap;

use std::sync::Arc;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::analysis::{build_report, Page};
use dashboard_data::loader::load_from_path;
use dashboard_ui::app::{restore_terminal, App};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;

    // The TUI owns the terminal, so its logs go to a file.
    let log_file = settings
        .log_file
        .clone()
        .or_else(|| (!settings.export).then(bootstrap::default_log_path));
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Inventory Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Page: {}, Theme: {}",
        settings.file.display(),
        settings.page,
        settings.theme
    );

    let dataset = load_from_path(&settings.file, &settings.product_table, &settings.fact_table)
        .with_context(|| format!("failed to load inventory data from {}", settings.file.display()))?;
    let dataset = Arc::new(dataset);

    if settings.export {
        let report = build_report(&dataset);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let page = Page::from_name(&settings.page).unwrap_or_default();
    let app = App::new(&settings.theme, page, Arc::clone(&dataset));

    // The loop exits on 'q' / Ctrl+C inside the TUI. We also listen for
    // Ctrl+C at the OS level in case the signal bypasses raw mode.
    tokio::select! {
        result = app.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
            restore_terminal()?;
        }
    }

    Ok(())
}
