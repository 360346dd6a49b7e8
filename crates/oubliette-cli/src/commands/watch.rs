//! `oubliette watch`: rebuild whenever the source tree changes.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use crate::commands::build;
use crate::config::ProjectConfig;
use crate::watcher::SourceScanner;

pub async fn run(project_root: &Path) -> Result<()> {
    let config = ProjectConfig::load(project_root)?;
    let interval = Duration::from_millis(config.watch.scan_interval_ms);

    // Build outputs must not retrigger the watcher.
    let excluded = vec![
        project_root.join(&config.build.output_dir),
        project_root.join(&config.build.runtime_dir),
    ];
    let mut scanner =
        SourceScanner::with_excluded_dirs(project_root.to_path_buf(), interval, excluded);

    info!(
        "Watching {} for changes (every {}ms); press Ctrl+C to stop",
        project_root.display(),
        config.watch.scan_interval_ms
    );

    // Always do one build up front so the output starts fresh.
    rebuild(project_root, &config).await;

    loop {
        tokio::time::sleep(interval).await;

        let result = scanner.scan_changes();
        if !result.has_changes() {
            continue;
        }

        info!("Detected {} changed file(s); rebuilding", result.total());
        rebuild(project_root, &config).await;
    }
}

/// A failed build must not kill the watcher; report it and keep
/// watching.
async fn rebuild(project_root: &Path, config: &ProjectConfig) {
    if let Err(e) = build::run_with_config(project_root, config).await {
        error!("Build failed: {e:#}");
    }
}
