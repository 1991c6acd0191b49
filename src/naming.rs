use std::path::Path;

use reqwest::Url;

use crate::settings::SettingsStore;

pub const FALLBACK_FILENAME: &str = "download";

/// Resets the rename counter before a batch of `count` downloads is issued.
pub fn begin_batch(store: &mut impl SettingsStore, count: usize) {
    store.set("image_count", count);
    store.set("image_number", 1);
}

/// Picks the target name for one download, relative to the download directory.
///
/// With a rename template the name is `template.ext` for a single-image batch
/// and `template<N>.ext` otherwise, `N` advancing on every call. Without one the
/// original name is kept. Either way the configured subfolder is prepended.
pub fn suggest_filename(store: &mut impl SettingsStore, original: &str) -> String {
    let mut filename = String::new();
    let folder = store.text("folder_name");
    if !folder.is_empty() {
        filename.push_str(&folder);
        filename.push('/');
    }

    let template = store.text("new_file_name");
    if template.is_empty() {
        filename.push_str(original);
        return filename;
    }

    let extension = extension_of(original);
    filename.push_str(&template);
    if store.number("image_count") != Some(1) {
        let number = store.number("image_number").unwrap_or(1);
        filename.push_str(&number.to_string());
        store.set("image_number", number + 1);
    }
    if !extension.is_empty() {
        filename.push('.');
        filename.push_str(extension);
    }
    filename
}

/// Text after the last `.`, empty when there is none.
pub fn extension_of(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    }
}

/// The name a browser would give a download of `url` before any renaming.
pub fn url_filename(url: &str) -> String {
    let name = match Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "file" => parsed
            .to_file_path()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned())),
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => Path::new(url)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
    };
    match name {
        Some(name) if !name.is_empty() => name,
        _ => FALLBACK_FILENAME.to_string(),
    }
}
