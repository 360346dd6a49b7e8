//! Minimal reader for room-definition XML files.
//!
//! Room files are machine-written by the room editor, with one element
//! per line and double-quoted attributes, so a small attribute scanner
//! is all that is needed; only `<room>` elements and their `<door>`
//! children are extracted, and everything else (spawns, entities) is
//! skipped.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum XmlError {
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),
    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),
    #[error("malformed attribute in <{tag}>: {detail}")]
    MalformedAttribute { tag: String, detail: String },
    #[error("found a <door> element outside of a <room> element")]
    DoorOutsideRoom,
}

/// A `<room>` element: its attributes plus the attributes of each of its
/// `<door>` children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRoom {
    pub attributes: HashMap<String, String>,
    pub doors: Vec<HashMap<String, String>>,
}

/// Parse every room out of a rooms file.
pub fn parse_rooms(xml: &str) -> Result<Vec<RawRoom>, XmlError> {
    let mut rooms = Vec::new();
    let mut current: Option<RawRoom> = None;

    let bytes = xml.as_bytes();
    let mut position = 0;

    while position < bytes.len() {
        let Some(open) = xml[position..].find('<').map(|i| position + i) else {
            break;
        };

        // Comments can contain '>', so they get their own scan.
        if xml[open..].starts_with("<!--") {
            let Some(end) = xml[open..].find("-->").map(|i| open + i + 3) else {
                return Err(XmlError::UnterminatedComment(open));
            };
            position = end;
            continue;
        }

        let Some(close) = xml[open..].find('>').map(|i| open + i) else {
            return Err(XmlError::UnterminatedTag(open));
        };
        let tag_body = &xml[open + 1..close];
        position = close + 1;

        // Declarations and closing tags carry no attributes we care
        // about, except that </room> finishes the current room.
        if tag_body.starts_with('?') || tag_body.starts_with('!') {
            continue;
        }
        if let Some(closing_name) = tag_body.strip_prefix('/') {
            if closing_name.trim() == "room" {
                if let Some(room) = current.take() {
                    rooms.push(room);
                }
            }
            continue;
        }

        let self_closing = tag_body.ends_with('/');
        let tag_body = tag_body.strip_suffix('/').unwrap_or(tag_body).trim();
        let (name, attribute_text) = match tag_body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest),
            None => (tag_body, ""),
        };

        match name {
            "room" => {
                let room = RawRoom {
                    attributes: parse_attributes(name, attribute_text)?,
                    doors: Vec::new(),
                };
                if self_closing {
                    rooms.push(room);
                } else {
                    current = Some(room);
                }
            }
            "door" => {
                let attributes = parse_attributes(name, attribute_text)?;
                match current.as_mut() {
                    Some(room) => room.doors.push(attributes),
                    None => return Err(XmlError::DoorOutsideRoom),
                }
            }
            // Spawns and their entity children are irrelevant here.
            _ => {}
        }
    }

    if let Some(room) = current {
        // A truncated file; treat the open room as complete rather than
        // silently dropping its rooms.
        rooms.push(room);
    }

    Ok(rooms)
}

fn parse_attributes(tag: &str, text: &str) -> Result<HashMap<String, String>, XmlError> {
    let mut attributes = HashMap::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let Some((key, after_key)) = rest.split_once('=') else {
            return Err(XmlError::MalformedAttribute {
                tag: tag.to_string(),
                detail: format!("expected key=\"value\", got: {rest}"),
            });
        };
        let key = key.trim();

        let after_key = after_key.trim_start();
        let Some(after_quote) = after_key.strip_prefix('"') else {
            return Err(XmlError::MalformedAttribute {
                tag: tag.to_string(),
                detail: format!("the value of \"{key}\" is not quoted"),
            });
        };
        let Some(end) = after_quote.find('"') else {
            return Err(XmlError::MalformedAttribute {
                tag: tag.to_string(),
                detail: format!("the value of \"{key}\" is never closed"),
            });
        };

        attributes.insert(key.to_string(), after_quote[..end].to_string());
        rest = after_quote[end + 1..].trim_start();
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" ?>
<rooms>
    <room variant="20" name="Archive Entrance" type="1" subtype="0" shape="1" width="13" height="7" difficulty="1" weight="1.0">
        <door exists="True" x="-1" y="3"/>
        <door exists="False" x="13" y="3"/>
        <spawn x="6" y="3">
            <entity type="2" variant="0" subtype="0" weight="1.0"/>
        </spawn>
    </room>
    <room variant="21" type="1" subtype="0" shape="1" width="13" height="7" difficulty="5" weight="0.5">
        <door exists="True" x="6" y="-1"/>
    </room>
</rooms>
"#;

    #[test]
    fn test_parses_rooms_and_doors() {
        let rooms = parse_rooms(SAMPLE).unwrap();
        assert_eq!(rooms.len(), 2);

        let first = &rooms[0];
        assert_eq!(first.attributes["variant"], "20");
        assert_eq!(first.attributes["name"], "Archive Entrance");
        assert_eq!(first.doors.len(), 2);
        assert_eq!(first.doors[0]["exists"], "True");
        assert_eq!(first.doors[0]["x"], "-1");

        let second = &rooms[1];
        assert_eq!(second.attributes["weight"], "0.5");
        assert_eq!(second.doors.len(), 1);
    }

    #[test]
    fn test_spawn_entities_ignored() {
        let rooms = parse_rooms(SAMPLE).unwrap();
        // The entity inside the spawn must not leak into the doors.
        assert_eq!(rooms[0].doors.len(), 2);
    }

    #[test]
    fn test_comments_skipped() {
        let xml = "<rooms>\n<!-- a > tricky <room> comment -->\n<room variant=\"1\"/>\n</rooms>";
        let rooms = parse_rooms(xml).unwrap();
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn test_unquoted_attribute_is_an_error() {
        let xml = "<rooms><room variant=1/></rooms>";
        assert!(matches!(
            parse_rooms(xml),
            Err(XmlError::MalformedAttribute { .. })
        ));
    }

    #[test]
    fn test_door_outside_room_is_an_error() {
        let xml = "<rooms><door exists=\"True\" x=\"-1\" y=\"3\"/></rooms>";
        assert_eq!(parse_rooms(xml), Err(XmlError::DoorOutsideRoom));
    }
}
