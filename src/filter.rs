//! The filter pipeline: URL text filter, linked-image filter and natural
//! dimension bounds, applied in that order to the accumulated image list.

use std::str::FromStr;

use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::debug;

use crate::{dimensions::Dimensions, session::Session, settings::SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlFilterMode {
    #[default]
    Normal,
    Wildcard,
    Regex,
}

impl UrlFilterMode {
    pub const ALL: [UrlFilterMode; 3] = [Self::Normal, Self::Wildcard, Self::Regex];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrlFilterMode::Normal => "normal",
            UrlFilterMode::Wildcard => "wildcard",
            UrlFilterMode::Regex => "regex",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrlFilterMode::Normal => "Normal",
            UrlFilterMode::Wildcard => "Wildcard",
            UrlFilterMode::Regex => "Regex",
        }
    }
}

impl FromStr for UrlFilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(Self::Normal),
            "wildcard" => Ok(Self::Wildcard),
            "regex" => Ok(Self::Regex),
            other => Err(anyhow!("Unknown filter mode {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl Bounds {
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min.map_or(true, |min| min <= value) && self.max.map_or(true, |max| value <= max)
    }
}

/// Snapshot of the filter-related settings, taken at the start of every pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    /// `None` when the URL filter is hidden.
    pub url_filter: Option<(String, UrlFilterMode)>,
    pub only_linked: bool,
    /// `None` when the width filter is hidden.
    pub width: Option<Bounds>,
    pub height: Option<Bounds>,
}

impl FilterConfig {
    pub fn from_store(store: &impl SettingsStore) -> Self {
        let url_filter = store.flag("show_url_filter").then(|| {
            let mode = store
                .text("filter_url_mode")
                .parse()
                .unwrap_or_default();
            (store.text("filter_url"), mode)
        });
        let bounds = |dimension: &str| {
            store
                .flag(&format!("show_image_{dimension}_filter"))
                .then(|| Bounds {
                    min: read_bound(store, &format!("filter_min_{dimension}")),
                    max: read_bound(store, &format!("filter_max_{dimension}")),
                })
        };
        Self {
            url_filter,
            only_linked: store.flag("show_only_images_from_links")
                && store.flag("only_images_from_links"),
            width: bounds("width"),
            height: bounds("height"),
        }
    }

    pub fn dimensions_shown(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

fn read_bound(store: &impl SettingsStore, key: &str) -> Option<u32> {
    if !store.flag(&format!("{key}_enabled")) {
        return None;
    }
    Some(store.number(key).unwrap_or(0).clamp(0, u32::MAX as i64) as u32)
}

/// Plain substring search. `-term` requires absence; a bare `-` is ignored.
pub fn matches_terms(url: &str, filter: &str) -> bool {
    filter.split_whitespace().all(|term| {
        let (term, expected) = match term.strip_prefix('-') {
            Some(rest) => (rest, false),
            None => (term, true),
        };
        term.is_empty() || url.contains(term) == expected
    })
}

/// Escapes regex metacharacters and turns the first `?`, `*` or `+` into
/// `.?`, `.*` or `.+`. Later occurrences keep their regex meaning.
pub fn wildcard_to_regex(filter: &str) -> String {
    let mut escaped = String::with_capacity(filter.len() * 2);
    for c in filter.chars() {
        if matches!(
            c,
            '.' | '^' | '$' | '[' | ']' | '\\' | '(' | ')' | '{' | '}' | '|' | '-'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    match escaped.find(&['?', '*', '+'][..]) {
        Some(idx) => {
            escaped.insert(idx, '.');
            escaped
        }
        None => escaped,
    }
}

pub fn apply_url_filter(images: Vec<String>, filter: &str, mode: UrlFilterMode) -> Vec<String> {
    if filter.is_empty() {
        return images;
    }
    let pattern = match mode {
        UrlFilterMode::Normal => {
            return images
                .into_iter()
                .filter(|url| matches_terms(url, filter))
                .collect();
        }
        UrlFilterMode::Wildcard => wildcard_to_regex(filter),
        UrlFilterMode::Regex => filter.to_string(),
    };
    if has_stacked_repetition(&pattern) {
        debug!(%pattern, "invalid URL filter pattern: nothing to repeat");
        return Vec::new();
    }
    match Regex::new(&pattern) {
        Ok(regex) => images.into_iter().filter(|url| regex.is_match(url)).collect(),
        Err(err) => {
            debug!(%pattern, "invalid URL filter pattern: {err}");
            Vec::new()
        }
    }
}

/// True when a repetition operator follows another one, as in `a**` or
/// `a+*`. A single lazy `?` after a repetition is allowed. The `regex` crate
/// accepts these, but browsers reject them with "nothing to repeat".
pub fn has_stacked_repetition(pattern: &str) -> bool {
    #[derive(PartialEq)]
    enum Last {
        Other,
        Repeat,
        Lazy,
    }

    let mut last = Last::Other;
    let mut escaped = false;
    let mut in_class = false;
    for c in pattern.chars() {
        if escaped {
            escaped = false;
            last = Last::Other;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ']' if in_class => in_class = false,
            _ if in_class => {}
            '[' => {
                in_class = true;
                last = Last::Other;
            }
            '*' | '+' => {
                if last != Last::Other {
                    return true;
                }
                last = Last::Repeat;
            }
            '?' => {
                last = match last {
                    Last::Other => Last::Repeat,
                    Last::Repeat => Last::Lazy,
                    Last::Lazy => return true,
                }
            }
            _ => last = Last::Other,
        }
    }
    false
}

/// Images without a measurement fail every active bound.
pub fn passes_dimensions(
    dimensions: Option<Dimensions>,
    width: Option<Bounds>,
    height: Option<Bounds>,
) -> bool {
    let check = |bounds: Option<Bounds>, value: Option<u32>| match bounds {
        Some(bounds) if bounds.is_active() => value.is_some_and(|v| bounds.contains(v)),
        _ => true,
    };
    check(width, dimensions.map(|d| d.width)) && check(height, dimensions.map(|d| d.height))
}

/// Computes the visible list from scratch.
pub fn filter_images<F>(session: &Session, config: &FilterConfig, dimensions_of: F) -> Vec<String>
where
    F: Fn(&str) -> Option<Dimensions>,
{
    let mut visible = session.all_images().to_vec();

    if let Some((text, mode)) = &config.url_filter {
        visible = apply_url_filter(visible, text, *mode);
    }

    if config.only_linked {
        visible.retain(|url| session.is_linked(url));
    }

    if config.dimensions_shown() {
        visible.retain(|url| passes_dimensions(dimensions_of(url), config.width, config.height));
    }

    visible
}
