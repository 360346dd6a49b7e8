//! `oubliette stages`: run only the custom-stage compiler.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::config::ProjectConfig;
use crate::stage;

pub async fn run(project_root: &Path) -> Result<()> {
    let config = ProjectConfig::load(project_root)?;

    if config.stages.is_empty() {
        info!("No custom stages are configured; nothing to do");
        return Ok(());
    }

    stage::prepare_custom_stages(project_root, &config).await
}
