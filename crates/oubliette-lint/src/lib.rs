//! Project-convention lint rules for oubliette mods.
//!
//! The rules are plain functions over a [`LintProject`] description;
//! there is deliberately no pluggable rule engine here.

use serde::Serialize;
use strum_macros::Display;

mod enum_defs;
mod rules;

pub use enum_defs::{parse_enum_definitions, EnumDefinition, EnumMember, EnumParseError};
pub use rules::{
    has_whitespace, is_kebab_case, rule_enum_member_style, rule_no_whitespace_in_paths,
    rule_project_name_kebab_case, rule_unique_variant_prefixes, run_all,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// One lint finding.
#[derive(Debug, Clone, Serialize)]
pub struct LintIssue {
    pub rule: &'static str,
    pub severity: Severity,
    pub message: String,
    /// Line in the enum-definition file, for rules that inspect it.
    pub line: Option<usize>,
}

/// Everything the rules need to know about a mod project.
#[derive(Debug, Clone)]
pub struct LintProject {
    pub mod_name: String,
    /// Configured paths as (config key, value) pairs.
    pub paths: Vec<(String, String)>,
    /// Custom stages as (stage name, room variant prefix) pairs.
    pub stage_prefixes: Vec<(String, u32)>,
    /// Contents of the game's enum dump, when the project carries one.
    pub enum_definitions: Option<String>,
}
