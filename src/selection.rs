use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Partial,
    All,
}

/// Checked images of the current rendering, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    checked: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every check. Called whenever the visible list is rebuilt.
    pub fn clear(&mut self) {
        self.checked.clear();
    }

    pub fn is_checked(&self, url: &str) -> bool {
        self.checked.contains(url)
    }

    pub fn set(&mut self, url: &str, checked: bool) {
        if checked {
            self.checked.insert(url.to_string());
        } else {
            self.checked.remove(url);
        }
    }

    pub fn toggle(&mut self, url: &str) {
        let checked = !self.is_checked(url);
        self.set(url, checked);
    }

    pub fn set_all(&mut self, visible: &[String], checked: bool) {
        for url in visible {
            self.set(url, checked);
        }
    }

    pub fn state(&self, visible: &[String]) -> SelectionState {
        let mut any_checked = false;
        let mut any_unchecked = false;
        for url in visible {
            if self.is_checked(url) {
                any_checked = true;
            } else {
                any_unchecked = true;
            }
            if any_checked && any_unchecked {
                return SelectionState::Partial;
            }
        }
        if any_checked {
            SelectionState::All
        } else {
            SelectionState::None
        }
    }

    /// Checked URLs in visible-list order.
    pub fn checked_in_order(&self, visible: &[String]) -> Vec<String> {
        visible
            .iter()
            .filter(|url| self.is_checked(url))
            .cloned()
            .collect()
    }
}
