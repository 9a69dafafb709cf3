//! Reader for `META-INF/MANIFEST.MF`.
//!
//! Headers are `Name: value` lines, long values continue on lines starting
//! with a single space, and blank lines separate the main section from the
//! per-entry sections (each introduced by a `Name:` header).

use indexmap::IndexMap;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: IndexMap<String, String>,
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl Manifest {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut manifest = Self::default();
        let mut section: Vec<(String, String)> = Vec::new();
        let mut in_main = true;

        for line in text.lines().chain(std::iter::once("")) {
            if line.is_empty() {
                if !section.is_empty() {
                    manifest.close_section(std::mem::take(&mut section), in_main);
                    in_main = false;
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix(' ') {
                if let Some((_, value)) = section.last_mut() {
                    value.push_str(rest);
                }
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                section.push((name.trim().to_string(), value.trim_start().to_string()));
            }
        }
        manifest
    }

    fn close_section(&mut self, headers: Vec<(String, String)>, main: bool) {
        if main {
            self.main.extend(headers);
            return;
        }
        let name = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("Name"))
            .map(|(_, value)| value.clone());
        if let Some(name) = name {
            self.entries.entry(name).or_default().extend(headers);
        }
    }

    /// Main attribute value; attribute names ignore case.
    #[must_use]
    pub fn main_attribute(&self, key: &str) -> Option<&str> {
        self.main
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// True for a main attribute or a per-entry section with this name.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key) || self.main_attribute(key).is_some()
    }

    pub fn main_keys(&self) -> impl Iterator<Item = &str> {
        self.main.keys().map(String::as_str)
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
