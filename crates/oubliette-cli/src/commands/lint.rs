//! `oubliette lint`: run the project-convention rules.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::fs;
use tracing::info;

use oubliette_lint::{run_all, LintProject, Severity};

use crate::config::ProjectConfig;

pub async fn run(project_root: &Path, json: bool) -> Result<()> {
    let config = ProjectConfig::load(project_root)?;
    let project = build_lint_project(project_root, &config).await?;

    let all_issues = run_all(&project);
    let issues: Vec<_> = all_issues
        .into_iter()
        .filter(|issue| *config.lint.rules.get(issue.rule).unwrap_or(&true))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        for issue in &issues {
            match issue.line {
                Some(line) => println!(
                    "{}[{}] (line {}): {}",
                    issue.severity, issue.rule, line, issue.message
                ),
                None => println!("{}[{}]: {}", issue.severity, issue.rule, issue.message),
            }
        }
    }

    let errors = issues
        .iter()
        .filter(|issue| issue.severity == Severity::Error)
        .count();
    if errors > 0 {
        bail!("Lint found {errors} error(s).");
    }

    info!("Lint passed with {} warning(s)", issues.len());
    Ok(())
}

async fn build_lint_project(project_root: &Path, config: &ProjectConfig) -> Result<LintProject> {
    let mut paths = vec![
        ("build.source_dir".to_string(), config.build.source_dir.clone()),
        ("build.output_dir".to_string(), config.build.output_dir.clone()),
        (
            "build.runtime_dir".to_string(),
            config.build.runtime_dir.clone(),
        ),
    ];
    for stage in &config.stages {
        paths.push((
            format!("stages.\"{}\".xml_path", stage.name),
            stage.xml_path.clone(),
        ));
    }

    let enum_definitions = match &config.lint.enum_definitions {
        Some(relative) => {
            let path = project_root.join(relative);
            let text = fs::read_to_string(&path).await.with_context(|| {
                format!("Failed to read the enum definitions at: {}", path.display())
            })?;
            Some(text)
        }
        None => None,
    };

    Ok(LintProject {
        mod_name: config.project.name.clone(),
        paths,
        stage_prefixes: config
            .stages
            .iter()
            .map(|stage| (stage.name.clone(), stage.room_variant_prefix))
            .collect(),
        enum_definitions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageConfig;

    #[tokio::test]
    async fn test_lint_project_collects_stage_prefixes() {
        let mut config = ProjectConfig::default();
        config.project.name = "sunken-archive".to_string();
        config.stages.push(StageConfig {
            name: "Sunken Archive".to_string(),
            xml_path: "content/stages/archive.xml".to_string(),
            room_variant_prefix: 101,
            base_stage: None,
            base_stage_type: None,
            boss_pool: Vec::new(),
        });

        let project = build_lint_project(Path::new("/nonexistent"), &config)
            .await
            .unwrap();
        assert_eq!(project.stage_prefixes, vec![("Sunken Archive".to_string(), 101)]);
        assert!(project
            .paths
            .iter()
            .any(|(key, _)| key.contains("xml_path")));
    }
}
