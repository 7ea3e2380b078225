//! Minimal writer for `.ini` style property files.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Sections in insertion order, keys sorted within a section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    sections: Vec<(String, BTreeMap<String, String>)>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section, replacing any earlier section with the same name.
    pub fn add_section(&mut self, name: impl Into<String>, entries: BTreeMap<String, String>) {
        let name = name.into();
        self.sections.retain(|(existing, _)| *existing != name);
        self.sections.push((name, entries));
    }

    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entries)| entries)
    }

    /// Renders `[section]` headers followed by `key = value` lines.
    /// Line breaks inside values become continuation lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, entries) in &self.sections {
            let _ = writeln!(out, "[{name}]");
            for (key, value) in entries {
                let value = value.replace('\n', "\n\t");
                if value.is_empty() {
                    let _ = writeln!(out, "{key} =");
                } else {
                    let _ = writeln!(out, "{key} = {value}");
                }
            }
            out.push('\n');
        }
        out
    }
}
