use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use anyhow::{Context, Result};

pub const SETTINGS_FILE: &str = "settings.json";

/// Values used whenever a key has never been written.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("show_url_filter", "true"),
    ("filter_url", ""),
    ("filter_url_mode", "normal"),
    ("show_only_images_from_links", "true"),
    ("only_images_from_links", "false"),
    ("show_image_width_filter", "true"),
    ("show_image_height_filter", "true"),
    ("filter_min_width", "0"),
    ("filter_max_width", "3000"),
    ("filter_min_width_default", "0"),
    ("filter_max_width_default", "3000"),
    ("filter_min_width_enabled", "false"),
    ("filter_max_width_enabled", "false"),
    ("filter_min_height", "0"),
    ("filter_max_height", "3000"),
    ("filter_min_height_default", "0"),
    ("filter_max_height_default", "3000"),
    ("filter_min_height_enabled", "false"),
    ("filter_max_height_enabled", "false"),
    ("columns", "2"),
    ("image_min_width", "50"),
    ("image_max_width", "200"),
    ("image_border_width", "3"),
    ("image_border_color", "#3498db"),
    ("show_image_url", "true"),
    ("show_open_image_button", "true"),
    ("show_download_image_button", "true"),
    ("show_file_renaming", "true"),
    ("new_file_name", ""),
    ("folder_name", ""),
    ("show_download_confirmation", "true"),
    ("show_download_notification", "true"),
    ("animation_duration", "500"),
    ("image_count", "0"),
    ("image_number", "1"),
];

/// Flat string key-value store, the same shape as a browser's `localStorage`.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: impl ToString);

    fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }

    /// Only the literal string `"true"` counts as enabled.
    fn flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }

    fn number(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| parse_number(&v))
    }

    /// Flushes to durable storage, if the store has any.
    fn persist(&self) -> Result<()> {
        Ok(())
    }
}

/// Leading-integer parse, so `"150px"` and `"150.7"` both read as 150.
pub fn parse_number(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let end = trimmed
        .char_indices()
        .find(|&(idx, c)| !(c.is_ascii_digit() || (idx == 0 && (c == '-' || c == '+'))))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Shared handle over the settings map. Clones see the same values.
#[derive(Clone, Debug)]
pub struct Settings {
    values: Arc<RwLock<BTreeMap<String, String>>>,
    path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Settings {
    pub fn in_memory() -> Self {
        Self {
            values: Arc::new(RwLock::new(default_map())),
            path: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut values = default_map();
        if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Unable to read settings from {}", path.display()))?;
            let stored: BTreeMap<String, serde_json::Value> = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid settings file {}", path.display()))?;
            for (key, value) in stored {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                values.insert(key, value);
            }
        }
        Ok(Self {
            values: Arc::new(RwLock::new(values)),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("imagegrabber")
            .join(SETTINGS_FILE)
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create {}", parent.display()))?;
        }
        let json = {
            let values = self.values.read().unwrap_or_else(|p| p.into_inner());
            serde_json::to_string_pretty(&*values)?
        };
        fs::write(path, json)
            .with_context(|| format!("Unable to write settings to {}", path.display()))
    }
}

impl SettingsStore for Settings {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&mut self, key: &str, value: impl ToString) {
        self.values
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn persist(&self) -> Result<()> {
        self.save()
    }
}

fn default_map() -> BTreeMap<String, String> {
    DEFAULTS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
