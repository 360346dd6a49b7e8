//! Custom-stage metadata as emitted by the build tooling and consumed by
//! the game at runtime. Field names are camelCase because the same
//! records are serialized into the Lua metadata file.

use serde::{Deserialize, Serialize};

/// One room of a custom stage, with the variant already remapped by the
/// stage's variant prefix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMetadata {
    #[serde(rename = "type")]
    pub room_type: i32,
    pub variant: u32,
    pub sub_type: u32,
    pub shape: i32,
    pub door_slot_flags: u32,
    pub weight: f32,
}

/// A boss-pool entry. The sub-type selects which boss rooms from the
/// stage's metadata belong to this boss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossPoolEntry {
    pub name: String,
    pub sub_type: u32,
    pub weight: f32,
}

/// A complete custom-stage descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStageMetadata {
    pub name: String,
    pub xml_path: String,
    pub room_variant_prefix: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_stage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_stage_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boss_pool: Option<Vec<BossPoolEntry>>,
    pub rooms_metadata: Vec<RoomMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serializes_camel_case() {
        let stage = CustomStageMetadata {
            name: "Sunken Archive".to_string(),
            xml_path: "content/stages/archive.xml".to_string(),
            room_variant_prefix: 101,
            base_stage: Some(2),
            base_stage_type: None,
            boss_pool: None,
            rooms_metadata: vec![RoomMetadata {
                room_type: 1,
                variant: 1_010_000,
                sub_type: 0,
                shape: 1,
                door_slot_flags: 5,
                weight: 1.0,
            }],
        };

        let json = serde_json::to_string(&stage).unwrap();
        assert!(json.contains("\"roomVariantPrefix\":101"));
        assert!(json.contains("\"doorSlotFlags\":5"));
        assert!(json.contains("\"type\":1"));
        assert!(!json.contains("baseStageType"));

        let parsed: CustomStageMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stage);
    }
}
