//! The lint rules. Each rule is a plain function from the project
//! description to a list of findings.

use std::collections::HashMap;

use crate::enum_defs::{parse_enum_definitions, EnumDefinition};
use crate::{LintIssue, LintProject, Severity};

/// Mod names must be kebab-case: lowercase segments separated by single
/// dashes, where each segment is all letters or all digits.
pub fn is_kebab_case(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }

    text.split('-').all(|segment| {
        !segment.is_empty()
            && (segment.chars().all(|c| c.is_ascii_lowercase())
                || segment.chars().all(|c| c.is_ascii_digit()))
    })
}

pub fn has_whitespace(text: &str) -> bool {
    text.chars().any(char::is_whitespace)
}

pub fn rule_project_name_kebab_case(project: &LintProject) -> Vec<LintIssue> {
    if is_kebab_case(&project.mod_name) {
        return Vec::new();
    }

    vec![LintIssue {
        rule: "project-name-kebab-case",
        severity: Severity::Error,
        message: format!(
            "the mod name \"{}\" is not kebab-case (e.g. \"sunken-archive\")",
            project.mod_name
        ),
        line: None,
    }]
}

pub fn rule_no_whitespace_in_paths(project: &LintProject) -> Vec<LintIssue> {
    project
        .paths
        .iter()
        .filter(|(_key, path)| has_whitespace(path))
        .map(|(key, path)| LintIssue {
            rule: "no-whitespace-in-paths",
            severity: Severity::Error,
            message: format!("the \"{key}\" path contains whitespace: \"{path}\""),
            line: None,
        })
        .collect()
}

pub fn rule_unique_variant_prefixes(project: &LintProject) -> Vec<LintIssue> {
    let mut seen: HashMap<u32, &str> = HashMap::new();
    let mut issues = Vec::new();

    for (stage_name, prefix) in &project.stage_prefixes {
        match seen.get(prefix) {
            Some(previous) => issues.push(LintIssue {
                rule: "unique-variant-prefixes",
                severity: Severity::Error,
                message: format!(
                    "the custom stages \"{previous}\" and \"{stage_name}\" share the room \
                     variant prefix {prefix}; their room variants would collide"
                ),
                line: None,
            }),
            None => {
                seen.insert(*prefix, stage_name);
            }
        }
    }

    issues
}

pub fn rule_enum_member_style(definitions: &[EnumDefinition]) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    for definition in definitions {
        let mut values: HashMap<i64, &str> = HashMap::new();

        for member in &definition.members {
            if !is_screaming_snake_case(&member.name) {
                issues.push(LintIssue {
                    rule: "enum-member-style",
                    severity: Severity::Warning,
                    message: format!(
                        "the member \"{}\" of \"{}\" is not SCREAMING_SNAKE_CASE",
                        member.name, definition.name
                    ),
                    line: Some(member.line_number),
                });
            }

            match values.get(&member.value) {
                Some(previous) => issues.push(LintIssue {
                    rule: "enum-member-style",
                    severity: Severity::Error,
                    message: format!(
                        "the members \"{previous}\" and \"{}\" of \"{}\" share the value {}",
                        member.name, definition.name, member.value
                    ),
                    line: Some(member.line_number),
                }),
                None => {
                    values.insert(member.value, &member.name);
                }
            }
        }
    }

    issues
}

fn is_screaming_snake_case(text: &str) -> bool {
    !text.is_empty()
        && text.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Run every rule against the project.
pub fn run_all(project: &LintProject) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    issues.extend(rule_project_name_kebab_case(project));
    issues.extend(rule_no_whitespace_in_paths(project));
    issues.extend(rule_unique_variant_prefixes(project));

    if let Some(text) = &project.enum_definitions {
        match parse_enum_definitions(text) {
            Ok(definitions) => issues.extend(rule_enum_member_style(&definitions)),
            Err(error) => issues.push(LintIssue {
                rule: "enum-definitions-parse",
                severity: Severity::Error,
                message: error.to_string(),
                line: None,
            }),
        }
    }

    issues
}
