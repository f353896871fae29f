use crate::config::PipelineConfig;

const OPENERS: [char; 4] = ['(', '（', '【', '['];
const CLOSERS: [char; 4] = [')', '）', '】', ']'];

/// Shared acceptance filter for attraction names
#[derive(Debug, Clone, Copy)]
pub struct NameFilter {
    min_chars: usize,
    max_chars: usize,
}

impl NameFilter {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.min_name_chars, config.max_name_chars)
    }

    /// Length check in characters, not bytes
    pub fn within_length(&self, name: &str) -> bool {
        let len = name.chars().count();
        len >= self.min_chars && len <= self.max_chars
    }

    /// Accept a structured activity location (already trimmed)
    pub fn accepts_location(&self, name: &str) -> bool {
        self.within_length(name)
    }

    /// Accept a cleaned match pulled out of free text
    pub fn accepts_text_match(&self, name: &str) -> bool {
        self.within_length(name)
            && !is_numeric(name)
            && !is_day_label(name)
            && !is_clock_time(name)
    }
}

/// Strip wrapping brackets and all whitespace from a raw text match
pub fn clean_match(raw: &str) -> String {
    let mut name = raw.trim();
    if let Some(rest) = name.strip_prefix(OPENERS) {
        name = rest;
    }
    if let Some(rest) = name.strip_suffix(CLOSERS) {
        name = rest;
    }
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_numeric(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
}

/// "第3天", "第三天", "Day 2"
fn is_day_label(name: &str) -> bool {
    if name.starts_with('第') && name.ends_with('天') {
        return true;
    }
    let lower = name.to_lowercase();
    lower
        .strip_prefix("day")
        .map(|rest| is_numeric(rest.trim()))
        .unwrap_or(false)
}

/// "09:30", "9：00"
fn is_clock_time(name: &str) -> bool {
    match name.split_once([':', '：']) {
        Some((hours, minutes)) => is_numeric(hours) && is_numeric(minutes),
        None => false,
    }
}
