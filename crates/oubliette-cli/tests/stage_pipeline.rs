// Integration tests for the custom-stage compiler, run against a real
// project directory on disk.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use oubliette_cli::config::ProjectConfig;
use oubliette_cli::stage::{prepare_custom_stages, SPECIAL_ROOMS_FILE_NAME};

const ARCHIVE_XML: &str = r#"<?xml version="1.0" ?>
<rooms>
    <room variant="20" name="Entrance" type="1" subtype="0" shape="1" width="13" height="7" difficulty="1" weight="1.0">
        <door exists="True" x="-1" y="3"/>
        <door exists="True" x="6" y="-1"/>
    </room>
    <room variant="21" type="1" subtype="0" shape="1" width="13" height="7" difficulty="5" weight="0.5">
        <door exists="True" x="13" y="3"/>
    </room>
</rooms>
"#;

const PROJECT_TOML: &str = r#"
[project]
name = "sunken-archive"

[[stages]]
name = "Sunken Archive"
xml_path = "content/stages/archive.xml"
room_variant_prefix = 101
"#;

fn write_project(root: &Path) {
    fs::create_dir_all(root.join("content/stages")).unwrap();
    fs::create_dir_all(root.join("runtime/stage")).unwrap();
    fs::write(root.join("oubliette.toml"), PROJECT_TOML).unwrap();
    fs::write(root.join("runtime/stage/metadata.lua"), "return {}\n").unwrap();
    fs::write(root.join("content/stages/archive.xml"), ARCHIVE_XML).unwrap();
}

#[tokio::test]
async fn test_pipeline_writes_metadata_and_combined_xml() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_project(root);

    let config = ProjectConfig::load(root).unwrap();
    prepare_custom_stages(root, &config).await.unwrap();

    // The metadata file got filled in with remapped variants.
    let metadata = fs::read_to_string(root.join("runtime/stage/metadata.lua")).unwrap();
    assert!(metadata.starts_with("return {"));
    assert!(metadata.contains("[\"name\"]=\"Sunken Archive\""));
    assert!(metadata.contains("[\"variant\"]=1010020"));
    assert!(metadata.contains("[\"variant\"]=1010021"));
    // Left + Up for the first room (bits 1 | 2).
    assert!(metadata.contains("[\"doorSlotFlags\"]=3"));

    // The combined XML holds both rooms, remapped and weight-zeroed.
    let combined = fs::read_to_string(
        root.join("mod")
            .join("content")
            .join("rooms")
            .join(SPECIAL_ROOMS_FILE_NAME),
    )
    .unwrap();
    assert!(combined.starts_with("<?xml version=\"1.0\" ?>\n<rooms>"));
    assert!(combined.trim_end().ends_with("</rooms>"));
    assert!(combined.contains("variant=\"1010020\""));
    assert!(combined.contains("variant=\"1010021\""));
    assert!(combined.contains("weight=\"0.0\""));
    assert!(!combined.contains("weight=\"1.0\""));
    // Door lines pass through untouched.
    assert!(combined.contains("<door exists=\"True\" x=\"-1\" y=\"3\"/>"));
}

#[tokio::test]
async fn test_pipeline_is_noop_without_stages() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(
        root.join("oubliette.toml"),
        "[project]\nname = \"sunken-archive\"\n",
    )
    .unwrap();

    let config = ProjectConfig::load(root).unwrap();
    prepare_custom_stages(root, &config).await.unwrap();

    assert!(!root.join("mod").exists());
}

#[tokio::test]
async fn test_missing_metadata_file_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_project(root);
    fs::remove_file(root.join("runtime/stage/metadata.lua")).unwrap();

    let config = ProjectConfig::load(root).unwrap();
    let error = prepare_custom_stages(root, &config).await.unwrap_err();
    assert!(error.to_string().contains("metadata file"));
}

#[tokio::test]
async fn test_missing_stage_xml_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_project(root);
    fs::remove_file(root.join("content/stages/archive.xml")).unwrap();

    let config = ProjectConfig::load(root).unwrap();
    let error = prepare_custom_stages(root, &config).await.unwrap_err();
    assert!(error.to_string().contains("Failed to find the custom stage XML file"));
}

#[tokio::test]
async fn test_duplicate_variant_across_rooms_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_project(root);

    let duplicated = ARCHIVE_XML.replace("variant=\"21\"", "variant=\"20\"");
    fs::write(root.join("content/stages/archive.xml"), duplicated).unwrap();

    let config = ProjectConfig::load(root).unwrap();
    let error = prepare_custom_stages(root, &config).await.unwrap_err();
    assert!(error.to_string().contains("more than one room"));
}
