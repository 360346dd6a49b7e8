//! Serialization of stage metadata into a Lua table literal.
//!
//! The game's runtime loads the metadata with a plain `dofile`, so the
//! output is a single `return` of nested tables mirroring the JSON
//! shape of the metadata records.

use oubliette_common::CustomStageMetadata;
use serde_json::Value;

/// Render the metadata file contents for a set of custom stages.
pub fn lua_metadata_file(stages: &[CustomStageMetadata]) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(stages)?;
    let mut out = String::from("return ");
    write_lua_value(&value, &mut out);
    out.push('\n');
    Ok(out)
}

fn write_lua_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("nil"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_lua_string(s, out),
        Value::Array(items) => {
            out.push('{');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_lua_value(item, out);
            }
            out.push('}');
        }
        Value::Object(entries) => {
            out.push('{');
            for (index, (key, item)) in entries.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str("[\"");
                out.push_str(key);
                out.push_str("\"]=");
                write_lua_value(item, out);
            }
            out.push('}');
        }
    }
}

fn write_lua_string(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
