use std::{
    ffi::OsStr,
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Component, Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use reqwest::Url;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Local file behind `file://` URLs and plain paths; `None` for remote URLs.
pub fn local_path(url: &str) -> Option<PathBuf> {
    match Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "file" => parsed.to_file_path().ok(),
        // Single letters are Windows drive prefixes, not schemes.
        Ok(parsed) if parsed.scheme().len() == 1 => Some(PathBuf::from(url)),
        Ok(_) => None,
        Err(_) => Some(PathBuf::from(url)),
    }
}

pub fn fetch_bytes(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>> {
    if let Some(path) = local_path(url) {
        return fs::read(&path).with_context(|| format!("Unable to read {}", path.display()));
    }
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("Unable to fetch {url}"))?;
    let bytes = response
        .bytes()
        .with_context(|| format!("Unable to read body of {url}"))?;
    Ok(bytes.to_vec())
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Unable to build HTTP client")
}

pub fn prepare_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Unable to create {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

/// Turns a suggested name such as `out/pic1.png` into a path that cannot
/// escape the download directory.
pub fn relative_target(suggested: &str) -> Result<PathBuf> {
    let target: PathBuf = Path::new(suggested)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    if target.file_name().is_none() {
        return Err(anyhow!("{suggested:?} does not name a file"));
    }
    Ok(target)
}

/// Writes `bytes` to `file_name` in `dir`, or to the first free `-N`
/// variant. The file is claimed with `create_new`, so concurrent writers
/// never share a destination.
pub fn write_unique(dir: &Path, file_name: &OsStr, bytes: &[u8]) -> Result<PathBuf> {
    let (stem, ext) = split_name(file_name);
    let mut idx = 0usize;
    loop {
        let candidate = match (idx, &ext) {
            (0, _) => dir.join(file_name),
            (_, Some(ext)) => dir.join(format!("{stem}-{idx}.{ext}")),
            (_, None) => dir.join(format!("{stem}-{idx}")),
        };
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                idx += 1;
                continue;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Unable to create {}", candidate.display()))
            }
        };
        file.write_all(bytes)
            .with_context(|| format!("Unable to write {}", candidate.display()))?;
        return Ok(candidate);
    }
}

pub fn split_name(file_name: &OsStr) -> (String, Option<String>) {
    let name = file_name.to_string_lossy();
    if let Some((stem, ext)) = name.rsplit_once('.') {
        (stem.to_string(), Some(ext.to_string()))
    } else {
        (name.to_string(), None)
    }
}
