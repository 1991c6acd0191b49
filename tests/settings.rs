use imagegrabber::settings::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn defaults_are_available_without_a_file() {
    let settings = Settings::in_memory();
    assert!(settings.flag("show_url_filter"));
    assert_eq!(settings.text("filter_url_mode"), "normal");
    assert_eq!(settings.number("columns"), Some(2));
    assert_eq!(settings.get("no_such_key"), None);
}

#[test]
fn only_literal_true_is_a_flag() {
    let mut settings = Settings::in_memory();
    settings.set("x", "TRUE");
    assert!(!settings.flag("x"));
    settings.set("x", true);
    assert!(settings.flag("x"));
}

#[test]
fn numbers_parse_leading_integer() {
    assert_eq!(parse_number("150"), Some(150));
    assert_eq!(parse_number(" 150px"), Some(150));
    assert_eq!(parse_number("-20"), Some(-20));
    assert_eq!(parse_number("abc"), None);
}

#[test]
fn clones_share_values() {
    let settings = Settings::in_memory();
    let mut other = settings.clone();
    other.set("image_number", 7);
    assert_eq!(settings.number("image_number"), Some(7));
}

#[test]
fn save_and_load_round_trip_keeps_unknown_keys() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join(SETTINGS_FILE);

    let mut settings = Settings::load(&path).unwrap();
    settings.set("folder_name", "out");
    settings.set("custom_key", "kept");
    settings.persist().unwrap();

    let reloaded = Settings::load(&path).unwrap();
    assert_eq!(reloaded.text("folder_name"), "out");
    assert_eq!(reloaded.text("custom_key"), "kept");
    assert!(reloaded.flag("show_download_notification"));
}

#[test]
fn non_string_json_values_are_stringified() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join(SETTINGS_FILE);
    fs::write(&path, r#"{"columns": 4, "show_url_filter": false}"#).unwrap();
    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.number("columns"), Some(4));
    assert!(!settings.flag("show_url_filter"));
}

#[test]
fn malformed_file_is_an_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join(SETTINGS_FILE);
    fs::write(&path, "not json").unwrap();
    let err = Settings::load(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid settings file"));
}
