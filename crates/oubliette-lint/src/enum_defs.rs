//! Parser for the game's enum dump.
//!
//! The game ships the enums its scripting runtime exposes as a plain
//! text file of table-style blocks:
//!
//! ```text
//! RoomType = {
//!   DEFAULT = 1,
//!   SHOP = 2,
//! }
//! ```
//!
//! Comment lines start with `--`. Member values are integers.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EnumParseError {
    #[error("line {line_number}: expected \"Name = {{\" to open an enum definition, got: {line}")]
    BadHeader { line_number: usize, line: String },
    #[error("line {line_number}: expected \"MEMBER = value,\" inside \"{definition}\", got: {line}")]
    BadMember {
        line_number: usize,
        definition: String,
        line: String,
    },
    #[error("line {line_number}: the value of \"{member}\" is not an integer: {value}")]
    BadValue {
        line_number: usize,
        member: String,
        value: String,
    },
    #[error("the definition of \"{0}\" is never closed")]
    UnterminatedDefinition(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    pub line_number: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDefinition {
    pub name: String,
    pub members: Vec<EnumMember>,
    pub line_number: usize,
}

/// Parse enum-definition text into its definitions.
pub fn parse_enum_definitions(text: &str) -> Result<Vec<EnumDefinition>, EnumParseError> {
    let mut definitions = Vec::new();
    let mut current: Option<EnumDefinition> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }

        if line == "}" {
            match current.take() {
                Some(definition) => {
                    definitions.push(definition);
                    continue;
                }
                None => {
                    return Err(EnumParseError::BadHeader {
                        line_number,
                        line: line.to_string(),
                    });
                }
            }
        }

        match current.as_mut() {
            None => {
                let Some(name) = line
                    .strip_suffix('{')
                    .map(str::trim_end)
                    .and_then(|rest| rest.strip_suffix('='))
                    .map(str::trim)
                else {
                    return Err(EnumParseError::BadHeader {
                        line_number,
                        line: line.to_string(),
                    });
                };

                current = Some(EnumDefinition {
                    name: name.to_string(),
                    members: Vec::new(),
                    line_number,
                });
            }
            Some(definition) => {
                let member_line = line.strip_suffix(',').unwrap_or(line);
                let Some((name, value)) = member_line.split_once('=') else {
                    return Err(EnumParseError::BadMember {
                        line_number,
                        definition: definition.name.clone(),
                        line: line.to_string(),
                    });
                };

                let name = name.trim().to_string();
                let value_text = value.trim();
                let value =
                    value_text
                        .parse::<i64>()
                        .map_err(|_| EnumParseError::BadValue {
                            line_number,
                            member: name.clone(),
                            value: value_text.to_string(),
                        })?;

                definition.members.push(EnumMember {
                    name,
                    value,
                    line_number,
                });
            }
        }
    }

    if let Some(definition) = current {
        return Err(EnumParseError::UnterminatedDefinition(definition.name));
    }

    Ok(definitions)
}
