//! `oubliette build`: prepare custom stages, then hand the project to
//! the external transpiler.

use std::path::Path;
use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::stage;
use crate::util::{parse_semver, time_now};

pub async fn run(project_root: &Path) -> Result<()> {
    let config = ProjectConfig::load(project_root)?;
    run_with_config(project_root, &config).await
}

pub async fn run_with_config(project_root: &Path, config: &ProjectConfig) -> Result<()> {
    stage::prepare_custom_stages(project_root, config).await?;
    check_transpiler_version(config).await?;
    run_transpiler(project_root, config).await?;

    info!("Build of \"{}\" finished at {}", config.project.name, time_now());
    Ok(())
}

/// Verify the installed transpiler is at least the project's minimum
/// version. Skipped when the project pins no minimum.
async fn check_transpiler_version(config: &ProjectConfig) -> Result<()> {
    let Some(min_version) = &config.transpiler.min_version else {
        return Ok(());
    };
    let minimum = parse_semver(min_version)
        .with_context(|| format!("The configured min_version is invalid: {min_version}"))?;

    let command = &config.transpiler.command;
    let output = Command::new(command)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("Failed to run \"{command} --version\"; is it installed?"))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version_text = stdout.trim();
    let installed = parse_semver(version_text).with_context(|| {
        format!("Failed to parse the version reported by \"{command} --version\": {version_text}")
    })?;

    debug!(
        "Transpiler version {}.{}.{} (minimum {}.{}.{})",
        installed.0, installed.1, installed.2, minimum.0, minimum.1, minimum.2
    );

    if installed < minimum {
        bail!(
            "The installed transpiler is version {version_text}, but this project requires at \
             least {min_version}. Upgrade it and try again."
        );
    }

    Ok(())
}

async fn run_transpiler(project_root: &Path, config: &ProjectConfig) -> Result<()> {
    let command = &config.transpiler.command;
    info!("Running {} {}", command, config.transpiler.args.join(" "));

    let status = Command::new(command)
        .args(&config.transpiler.args)
        .current_dir(project_root)
        .status()
        .await
        .with_context(|| format!("Failed to run the transpiler command \"{command}\""))?;

    if !status.success() {
        bail!("The transpiler failed with {status}.");
    }

    Ok(())
}
