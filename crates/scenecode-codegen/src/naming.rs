//! Identifiers derived from layer names.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use convert_case::{Case, Casing};
use regex::Regex;

fn separators() -> Option<&'static Regex> {
    static SEPARATORS: OnceLock<Option<Regex>> = OnceLock::new();
    SEPARATORS
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").ok())
        .as_ref()
}

/// Layer name reduced to ASCII words separated by single spaces.
pub fn words(name: &str) -> String {
    match separators() {
        Some(re) => re.replace_all(name, " ").trim().to_string(),
        None => name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// CSS class name, e.g. `"Primary Button"` → `primary-button`.
pub fn class_name(name: &str) -> String {
    let kebab = words(name).to_case(Case::Kebab);
    if kebab.is_empty() || kebab.starts_with(|c: char| c.is_ascii_digit()) {
        format!("layer-{}", kebab).trim_end_matches('-').to_string()
    } else {
        kebab
    }
}

/// Type name for components, widgets and views, e.g. `PrimaryButton`.
pub fn type_name(name: &str) -> String {
    let pascal = words(name).to_case(Case::Pascal);
    if pascal.is_empty() || pascal.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Layer{}", pascal)
    } else {
        pascal
    }
}

/// Hands out names that are unique within one generated file.
#[derive(Debug, Default)]
pub struct UniqueNames {
    counters: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// `base` the first time, then `base2`, `base3`, ... (with a `-` for
    /// kebab-case names). Suffixed names are taken too, so a later layer
    /// literally named `base2` gets a suffix of its own.
    pub fn claim(&mut self, base: &str) -> String {
        let separator = if base.contains('-') || base.chars().all(|c| c.is_ascii_lowercase()) {
            "-"
        } else {
            ""
        };
        let count = self.counters.entry(base.to_string()).or_insert(0);
        let mut candidate = base.to_string();
        loop {
            *count += 1;
            if *count > 1 {
                candidate = format!("{}{}{}", base, separator, count);
            }
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
