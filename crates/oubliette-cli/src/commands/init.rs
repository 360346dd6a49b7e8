//! `oubliette init`: scaffold a new mod project.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::fs;
use tracing::info;

use oubliette_lint::{has_whitespace, is_kebab_case};

use crate::config::{BuildSection, ProjectConfig, ProjectSection};
use crate::stage::METADATA_RELATIVE_PATH;

const GITIGNORE_TEMPLATE: &str = "\
# Build output
/mod/
";

const ENUM_DUMP_TEMPLATE: &str = "\
-- Enums exposed by the game's scripting runtime. Regenerate this file
-- with the game's `dumpenums` console command after a game update.

RoomType = {
  DEFAULT = 1,
  SHOP = 2,
  TREASURE = 4,
  BOSS = 5,
}

DoorState = {
  CLOSED = 1,
  OPEN = 2,
  HIDDEN = 3,
}
";

pub async fn run(name: &str, dir: Option<PathBuf>) -> Result<()> {
    if name.is_empty() {
        bail!("The mod name cannot be empty.");
    }
    if has_whitespace(name) {
        bail!("The mod name \"{name}\" contains whitespace, which is not allowed.");
    }
    if !is_kebab_case(name) {
        bail!(
            "The mod name \"{name}\" is not kebab-case. Mod names must look like \
             \"sunken-archive\"."
        );
    }

    let project_dir = dir.unwrap_or_else(|| PathBuf::from(name));
    if project_dir.exists() {
        bail!(
            "The directory \"{}\" already exists; refusing to overwrite it.",
            project_dir.display()
        );
    }

    create_layout(&project_dir, name).await?;

    info!("Scaffolded mod project at {}", project_dir.display());
    eprintln!("Created a new mod project in: {}", project_dir.display());
    eprintln!("Next steps:");
    eprintln!("  cd {name}");
    eprintln!("  oubliette build");

    Ok(())
}

async fn create_layout(project_dir: &Path, name: &str) -> Result<()> {
    let dirs = [
        project_dir.join("src"),
        project_dir.join("content").join("stages"),
        project_dir.join("runtime").join("stage"),
    ];
    for dir in &dirs {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let config = ProjectConfig {
        project: ProjectSection {
            name: name.to_string(),
            version: "0.1.0".to_string(),
        },
        build: BuildSection::default(),
        ..Default::default()
    };
    config
        .save(project_dir)
        .map_err(|e| anyhow::anyhow!("Failed to write the project config: {e}"))?;

    let entry_point = format!(
        "-- {name}\n\
         -- Mod entry point, compiled by `oubliette build`.\n\
         \n\
         local mod = RegisterMod(\"{name}\", 1)\n\
         \n\
         local function onGameStarted(continued: boolean)\n\
         end\n\
         \n\
         mod:AddCallback(GameCallbacks.POST_GAME_STARTED, onGameStarted)\n"
    );
    write_file(&project_dir.join("src").join("main.tl"), &entry_point).await?;

    // The blank metadata file that the custom-stage compiler fills in.
    write_file(
        &project_dir.join("runtime").join(METADATA_RELATIVE_PATH),
        "return {}\n",
    )
    .await?;

    write_file(
        &project_dir.join("runtime").join("game_enums.txt"),
        ENUM_DUMP_TEMPLATE,
    )
    .await?;

    write_file(&project_dir.join(".gitignore"), GITIGNORE_TEMPLATE).await?;

    Ok(())
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_project_layout() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path().join("sunken-archive");

        run("sunken-archive", Some(project_dir.clone()))
            .await
            .unwrap();

        assert!(project_dir.join("oubliette.toml").exists());
        assert!(project_dir.join("src").join("main.tl").exists());
        assert!(project_dir
            .join("runtime")
            .join("stage")
            .join("metadata.lua")
            .exists());
        assert!(project_dir.join(".gitignore").exists());

        let config = ProjectConfig::load(&project_dir).unwrap();
        assert_eq!(config.project.name, "sunken-archive");
    }

    #[tokio::test]
    async fn test_init_rejects_bad_names() {
        assert!(run("Sunken Archive", None).await.is_err());
        assert!(run("SunkenArchive", None).await.is_err());
        assert!(run("", None).await.is_err());
    }

    #[tokio::test]
    async fn test_init_refuses_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path().join("taken");
        std::fs::create_dir(&project_dir).unwrap();

        let error = run("taken", Some(project_dir)).await.unwrap_err();
        assert!(error.to_string().contains("already exists"));
    }
}
