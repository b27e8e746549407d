use std::fs;

use levelgen::{Settings, SettingsError, generate};
use tempfile::tempdir;

#[test]
fn toml_file_loads_and_drives_generation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("level.toml");
    let contents = "seed = 2024\nrooms_count = 12\ncorridor_width_units = 2\nauto_size = false\n";
    fs::write(&path, contents).unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.seed, 2024);
    assert_eq!(settings.corridor_width_units, 2);
    assert_eq!(settings.width, Settings::default().width);

    let from_file = generate(&settings, None);
    let inline_settings =
        Settings { seed: 2024, corridor_width_units: 2, auto_size: false, ..Settings::default() };
    let inline = generate(&inline_settings, None);
    assert_eq!(from_file.map.fingerprint(), inline.map.fingerprint());
}

#[test]
fn json_file_round_trips_a_serialized_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("level.JSON");
    let original = Settings { fixed_layout: true, grid_step: 2.5, ..Settings::default() };
    fs::write(&path, serde_json::to_string_pretty(&original).unwrap()).unwrap();

    assert_eq!(Settings::load(&path).unwrap(), original);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let error = Settings::load(&path).unwrap_err();
    assert!(matches!(&error, SettingsError::Io { path: reported, .. } if reported == &path));
    assert!(error.to_string().contains("absent.toml"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "rooms_count = \"many\"\n").unwrap();

    assert!(matches!(Settings::load(&path), Err(SettingsError::Toml(_))));
}
