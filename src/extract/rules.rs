use crate::error::ExtractError;
use regex::Regex;

/// An independent pattern family that pulls raw attraction phrases out of free text.
///
/// Rules only locate substrings; cleaning and filtering happen once in the
/// extractor so every rule is judged by the same criteria.
pub trait ExtractionRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw matches in text order
    fn matches(&self, text: &str) -> Vec<String>;
}

/// A rule backed by a regex whose first capture group is the phrase
pub struct PatternRule {
    name: &'static str,
    regex: Regex,
}

impl PatternRule {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, ExtractError> {
        let regex = Regex::new(pattern).map_err(|e| ExtractError::Pattern {
            rule: name,
            source: e,
        })?;
        Ok(Self { name, regex })
    }
}

impl ExtractionRule for PatternRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, text: &str) -> Vec<String> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

// Marker-prefixed phrase, ending at a colon, newline or end of text
const BULLET: &str = r"[•\-*]\s*([^：:\n]{2,20}?)(?:[：:\n]|$)";

// "参观故宫", "前往：颐和园", "visit Louvre"
const VERB_CUE: &str =
    r"(?i)(?:参观|游览|前往|到达|\bvisit\b|\btour\b|\bgo to\b)\s*[：:]?\s*([^，,。.\n]{2,20})";

// "景点：天坛", "Attraction: Louvre"
const LABELED: &str = r"(?i)(?:景点|\battraction)[：:]\s*([^，,。.\n]+)";

// "1. 故宫", "2、长城"
const NUMBERED: &str = r"\d+[.、]\s*([^，,。.\n（(]{2,20})";

/// The rule cascade in application order
pub fn default_rules() -> Result<Vec<Box<dyn ExtractionRule>>, ExtractError> {
    Ok(vec![
        Box::new(PatternRule::new("bullet", BULLET)?),
        Box::new(PatternRule::new("verb_cue", VERB_CUE)?),
        Box::new(PatternRule::new("labeled", LABELED)?),
        Box::new(PatternRule::new("numbered", NUMBERED)?),
    ])
}
