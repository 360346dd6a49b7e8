//! The build-time custom-stage compiler.
//!
//! Reads each configured stage's room XML, remaps room variants into the
//! stage's reserved range, writes the Lua metadata file the runtime
//! loads, and combines every stage's rooms into the mod's special-rooms
//! XML. Any malformed input aborts the whole build with a descriptive
//! error.

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::fs;
use tracing::{debug, info};

use oubliette_common::types::{door_slot_to_flag, DoorSlot, DoorSlotFlags, RoomShape};
use oubliette_common::{CustomStageMetadata, RoomMetadata, ROOM_VARIANT_MULTIPLIER};

use crate::config::{ProjectConfig, StageConfig};

mod lua;
mod rooms_xml;

pub use rooms_xml::{parse_rooms, RawRoom, XmlError};

/// Path of the metadata file inside the runtime support directory.
pub const METADATA_RELATIVE_PATH: &str = "stage/metadata.lua";

/// Name of the combined rooms file the game reads special rooms from.
pub const SPECIAL_ROOMS_FILE_NAME: &str = "00.special rooms.xml";

/// Run the whole custom-stage pipeline. A project with no configured
/// stages is a no-op.
pub async fn prepare_custom_stages(project_root: &Path, config: &ProjectConfig) -> Result<()> {
    if config.stages.is_empty() {
        return Ok(());
    }

    let metadata_path = validate_metadata_target(project_root, config)?;
    let stages = collect_stage_metadata(project_root, config).await?;

    let lua = lua::lua_metadata_file(&stages)
        .context("Failed to convert the custom stage metadata to a Lua file")?;
    fs::write(&metadata_path, lua)
        .await
        .with_context(|| format!("Failed to write {}", metadata_path.display()))?;
    info!("Wrote custom stage metadata for {} stage(s)", stages.len());

    combine_stage_xmls(project_root, config).await?;
    Ok(())
}

/// The metadata file ships with the runtime support files; if it is
/// missing, the project is not set up for custom stages at all.
fn validate_metadata_target(project_root: &Path, config: &ProjectConfig) -> Result<PathBuf> {
    let runtime_dir = project_root.join(&config.build.runtime_dir);
    if !runtime_dir.is_dir() {
        bail!(
            "The custom stages feature requires the runtime support files in \"{}\". \
             Re-run \"oubliette init\" or restore the directory.",
            runtime_dir.display()
        );
    }

    let metadata_path = runtime_dir.join(METADATA_RELATIVE_PATH);
    if !metadata_path.exists() {
        bail!(
            "Failed to find the custom stage metadata file at: {}",
            metadata_path.display()
        );
    }

    Ok(metadata_path)
}

/// Parse every stage's XML file and gather metadata about all of the
/// rooms within.
async fn collect_stage_metadata(
    project_root: &Path,
    config: &ProjectConfig,
) -> Result<Vec<CustomStageMetadata>> {
    let mut stages = Vec::new();

    for stage in &config.stages {
        if stage.name.is_empty() {
            bail!("One of the custom stages has a blank name, which is not allowed.");
        }
        if stage.xml_path.is_empty() {
            bail!(
                "The \"{}\" custom stage has a blank \"xml_path\" property, which is not allowed.",
                stage.name
            );
        }

        let xml_path = project_root.join(&stage.xml_path);
        if !xml_path.exists() {
            bail!(
                "Failed to find the custom stage XML file at: {}",
                xml_path.display()
            );
        }

        let xml_contents = fs::read_to_string(&xml_path)
            .await
            .with_context(|| format!("Failed to read {}", xml_path.display()))?;
        let rooms = parse_rooms(&xml_contents)
            .with_context(|| format!("Failed to parse {}", xml_path.display()))?;

        let rooms_metadata = collect_rooms_metadata(stage, &rooms)?;
        debug!(
            target: "stage",
            "Stage \"{}\": {} room(s)",
            stage.name,
            rooms_metadata.len()
        );

        stages.push(CustomStageMetadata {
            name: stage.name.clone(),
            xml_path: stage.xml_path.clone(),
            room_variant_prefix: stage.room_variant_prefix,
            base_stage: stage.base_stage,
            base_stage_type: stage.base_stage_type,
            boss_pool: if stage.boss_pool.is_empty() {
                None
            } else {
                Some(
                    stage
                        .boss_pool
                        .iter()
                        .map(|entry| oubliette_common::stage::BossPoolEntry {
                            name: entry.name.clone(),
                            sub_type: entry.sub_type,
                            weight: entry.weight,
                        })
                        .collect(),
                )
            },
            rooms_metadata,
        });
    }

    Ok(stages)
}

fn collect_rooms_metadata(stage: &StageConfig, rooms: &[RawRoom]) -> Result<Vec<RoomMetadata>> {
    let mut seen_variants = HashSet::new();
    let mut rooms_metadata = Vec::new();

    for room in rooms {
        let room_type = parse_room_int(stage, room, "type")?;
        let base_variant = parse_room_int(stage, room, "variant")?;
        let sub_type = parse_room_int(stage, room, "subtype")?;
        let shape_value = parse_room_int(stage, room, "shape")?;

        if base_variant < 0 {
            bail!(
                "One of the \"{}\" custom stage rooms has a negative variant: {base_variant}",
                stage.name
            );
        }

        if !seen_variants.insert(base_variant) {
            bail!(
                "There is more than one room with a variant of \"{base_variant}\" in the \"{}\" \
                 custom stage. Make sure that each room has a unique variant. (The room variant \
                 is also called the \"ID\" in the room editor.)",
                stage.name
            );
        }

        let weight_text = room_attribute(stage, room, "weight")?;
        let weight: f32 = weight_text.parse().with_context(|| {
            format!(
                "Failed to parse the weight of one of the \"{}\" custom stage rooms: {weight_text}",
                stage.name
            )
        })?;

        let shape = RoomShape::from_repr(shape_value).with_context(|| {
            format!(
                "The \"{}\" custom stage has a room with an unknown shape: {shape_value}",
                stage.name
            )
        })?;
        let door_slot_flags = room_door_slot_flags(stage, room, shape)?;

        let variant = stage.room_variant_prefix * ROOM_VARIANT_MULTIPLIER + base_variant as u32;

        rooms_metadata.push(RoomMetadata {
            room_type,
            variant,
            sub_type: sub_type as u32,
            shape: shape_value,
            door_slot_flags: door_slot_flags.bits(),
            weight,
        });
    }

    Ok(rooms_metadata)
}

fn room_attribute<'a>(stage: &StageConfig, room: &'a RawRoom, name: &str) -> Result<&'a str> {
    match room.attributes.get(name) {
        Some(value) => Ok(value),
        None => bail!(
            "One of the \"{}\" custom stage rooms is missing the \"{name}\" attribute.",
            stage.name
        ),
    }
}

fn parse_room_int(stage: &StageConfig, room: &RawRoom, name: &str) -> Result<i32> {
    let text = room_attribute(stage, room, name)?;
    text.trim().parse().with_context(|| {
        format!(
            "Failed to parse the {name} of one of the \"{}\" custom stage rooms: {text}",
            stage.name
        )
    })
}

/// Fold a room's door elements into the door-slot bitmask.
fn room_door_slot_flags(
    stage: &StageConfig,
    room: &RawRoom,
    shape: RoomShape,
) -> Result<DoorSlotFlags> {
    let mut flags = DoorSlotFlags::empty();

    for door in &room.doors {
        let exists = door
            .get("exists")
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if !exists {
            continue;
        }

        let x = parse_door_int(stage, door, "x")?;
        let y = parse_door_int(stage, door, "y")?;
        let Some(slot) = door_slot_from_coordinates(shape, x, y) else {
            bail!(
                "One of the \"{}\" custom stage rooms has a door at ({x}, {y}), which is not on \
                 the edge of a {shape} room.",
                stage.name
            );
        };

        flags |= door_slot_to_flag(slot);
    }

    Ok(flags)
}

fn parse_door_int(stage: &StageConfig, door: &HashMap<String, String>, name: &str) -> Result<i32> {
    let Some(text) = door.get(name) else {
        bail!(
            "One of the \"{}\" custom stage rooms has a door missing the \"{name}\" attribute.",
            stage.name
        );
    };
    text.trim().parse().with_context(|| {
        format!(
            "Failed to parse the door {name} of one of the \"{}\" custom stage rooms: {text}",
            stage.name
        )
    })
}

/// Door coordinates are layout-relative: -1 means one tile outside the
/// left/top wall, `width`/`height` one tile outside the right/bottom
/// wall. The second slot on a side belongs to the far half of large
/// rooms.
fn door_slot_from_coordinates(shape: RoomShape, x: i32, y: i32) -> Option<DoorSlot> {
    let (width, height) = shape.layout_size();

    if x == -1 && (0..height).contains(&y) {
        return Some(if y < 7 { DoorSlot::Left0 } else { DoorSlot::Left1 });
    }
    if y == -1 && (0..width).contains(&x) {
        return Some(if x < 13 { DoorSlot::Up0 } else { DoorSlot::Up1 });
    }
    if x == width && (0..height).contains(&y) {
        return Some(if y < 7 {
            DoorSlot::Right0
        } else {
            DoorSlot::Right1
        });
    }
    if y == height && (0..width).contains(&x) {
        return Some(if x < 13 { DoorSlot::Down0 } else { DoorSlot::Down1 });
    }

    None
}

/// Combine all of the custom stages together into the mod's
/// special-rooms file.
///
/// The XML files are treated as text here: the room editor writes one
/// element per line, and rewriting two attributes is far simpler than a
/// parse/serialize round trip.
async fn combine_stage_xmls(project_root: &Path, config: &ProjectConfig) -> Result<()> {
    let mut all_rooms = String::new();

    for stage in &config.stages {
        let xml_path = project_root.join(&stage.xml_path);
        if !xml_path.exists() {
            bail!(
                "Failed to find the custom stage XML file at: {}",
                xml_path.display()
            );
        }

        let xml_contents = fs::read_to_string(&xml_path)
            .await
            .with_context(|| format!("Failed to read {}", xml_path.display()))?;

        let mut lines: Vec<&str> = xml_contents.trim().lines().collect();
        if lines.len() < 3 {
            bail!(
                "The custom stage XML file at \"{}\" is too short to be a rooms file.",
                xml_path.display()
            );
        }

        // Remove the leading XML declaration and <rooms> lines and the
        // trailing </rooms> line.
        lines.remove(0);
        lines.remove(0);
        lines.pop();

        for line in lines {
            let rewritten = rewrite_room_line(line, stage.room_variant_prefix)?;
            all_rooms.push_str(&rewritten);
            all_rooms.push('\n');
        }
    }

    let combined = format!("<?xml version=\"1.0\" ?>\n<rooms>\n{all_rooms}</rooms>\n");

    let rooms_dir = project_root
        .join(&config.build.output_dir)
        .join("content")
        .join("rooms");
    fs::create_dir_all(&rooms_dir)
        .await
        .with_context(|| format!("Failed to create {}", rooms_dir.display()))?;

    let combined_path = rooms_dir.join(SPECIAL_ROOMS_FILE_NAME);
    fs::write(&combined_path, combined)
        .await
        .with_context(|| format!("Failed to write {}", combined_path.display()))?;
    info!("Wrote combined stage rooms to {}", combined_path.display());

    Ok(())
}

/// Remap the variant on a `<room>` line into the stage's reserved range
/// and zero out the weight, so these rooms never leak into vanilla room
/// selection.
fn rewrite_room_line(line: &str, room_variant_prefix: u32) -> Result<String> {
    if !line.contains("<room") {
        return Ok(line.to_string());
    }

    let Some((before, base_variant, after)) = split_attribute(line, " variant=\"") else {
        return Ok(line.to_string());
    };

    let base_variant: u32 = base_variant.parse().with_context(|| {
        format!("Failed to parse the variant of one of the custom stage rooms: {base_variant}")
    })?;
    let variant = room_variant_prefix * ROOM_VARIANT_MULTIPLIER + base_variant;

    let mut rewritten = format!("{before} variant=\"{variant}\"{after}");
    if let Some((before, _weight, after)) = split_attribute(&rewritten, " weight=\"") {
        rewritten = format!("{before} weight=\"0.0\"{after}");
    }

    Ok(rewritten)
}

/// Split a line around `<marker>value"`, returning the text before the
/// marker, the raw value, and the text after the closing quote.
fn split_attribute<'a>(line: &'a str, marker: &str) -> Option<(&'a str, &'a str, &'a str)> {
    let start = line.find(marker)?;
    let value_start = start + marker.len();
    let value_len = line[value_start..].find('"')?;
    Some((
        &line[..start],
        &line[value_start..value_start + value_len],
        &line[value_start + value_len + 1..],
    ))
}
