mod filter;
mod rules;

pub use filter::{clean_match, NameFilter};
pub use rules::{default_rules, ExtractionRule};

use crate::config::PipelineConfig;
use crate::error::ExtractError;
use crate::plan::ItineraryPlan;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// A point of interest awaiting geocoding.
///
/// `source_index` is its position in extraction order and is the only key
/// used to order the final route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttractionCandidate {
    pub name: String,
    pub source_index: usize,
}

/// What the extractor found in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// One or more attractions, in itinerary order
    Candidates(Vec<AttractionCandidate>),

    /// Nothing usable; the destination stands in as a single point
    Fallback(AttractionCandidate),

    /// Nothing usable and no destination
    Empty,
}

impl Extraction {
    pub fn candidates(&self) -> Vec<AttractionCandidate> {
        match self {
            Extraction::Candidates(list) => list.clone(),
            Extraction::Fallback(candidate) => vec![candidate.clone()],
            Extraction::Empty => Vec::new(),
        }
    }
}

/// Ordered, deduplicating accumulator
#[derive(Default)]
struct CandidateList {
    seen: HashSet<String>,
    items: Vec<AttractionCandidate>,
}

impl CandidateList {
    fn push(&mut self, name: String) -> bool {
        if self.seen.contains(&name) {
            return false;
        }
        self.seen.insert(name.clone());
        let source_index = self.items.len();
        self.items.push(AttractionCandidate { name, source_index });
        true
    }
}

pub struct AttractionExtractor {
    rules: Vec<Box<dyn ExtractionRule>>,
    filter: NameFilter,
    max_candidates: usize,
}

impl AttractionExtractor {
    pub fn new(config: &PipelineConfig) -> Result<Self, ExtractError> {
        Ok(Self::with_rules(
            default_rules()?,
            NameFilter::from_config(config),
            config.max_candidates,
        ))
    }

    pub fn with_rules(
        rules: Vec<Box<dyn ExtractionRule>>,
        filter: NameFilter,
        max_candidates: usize,
    ) -> Self {
        Self {
            rules,
            filter,
            max_candidates,
        }
    }

    pub fn extract(&self, plan: &ItineraryPlan) -> Extraction {
        let mut list = CandidateList::default();

        // Structured activities first, day by day
        for day in plan.days_in_order() {
            for activity in &day.activities {
                let location = activity.location.trim();
                if self.filter.accepts_location(location) {
                    list.push(location.to_string());
                }
            }
        }
        let structured = list.items.len();

        if let Some(text) = plan.raw_text.as_deref() {
            for rule in &self.rules {
                let mut added = 0usize;
                for raw in rule.matches(text) {
                    let name = clean_match(&raw);
                    if self.filter.accepts_text_match(&name) && list.push(name) {
                        added += 1;
                    }
                }
                debug!("Rule {} added {} attractions", rule.name(), added);
            }
        }

        let mut candidates = list.items;
        if candidates.len() > self.max_candidates {
            debug!(
                "Dropping {} attractions beyond the cap of {}",
                candidates.len() - self.max_candidates,
                self.max_candidates
            );
            candidates.truncate(self.max_candidates);
        }

        if candidates.is_empty() {
            return match plan.destination() {
                Some(destination) => {
                    info!(
                        "No attractions found, falling back to destination {}",
                        destination
                    );
                    Extraction::Fallback(AttractionCandidate {
                        name: destination.to_string(),
                        source_index: 0,
                    })
                }
                None => {
                    info!("No attractions found and no destination");
                    Extraction::Empty
                }
            };
        }

        info!(
            "Extracted {} attractions ({} from activities)",
            candidates.len(),
            structured.min(candidates.len())
        );
        Extraction::Candidates(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Activity, DayPlan};

    fn extractor() -> AttractionExtractor {
        AttractionExtractor::new(&PipelineConfig::default()).unwrap()
    }

    fn day(day: u32, locations: &[&str]) -> DayPlan {
        DayPlan {
            day,
            date: None,
            activities: locations
                .iter()
                .map(|l| Activity {
                    location: l.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn names(extraction: &Extraction) -> Vec<String> {
        extraction.candidates().into_iter().map(|c| c.name).collect()
    }

    #[test]
    fn test_structured_locations_in_day_order() {
        let plan = ItineraryPlan {
            destination: Some("北京".to_string()),
            itinerary: vec![day(2, &["长城", "鸟巢"]), day(1, &[" 故宫 ", "天坛"])],
            ..Default::default()
        };

        let extraction = extractor().extract(&plan);
        assert_eq!(names(&extraction), vec!["故宫", "天坛", "长城", "鸟巢"]);
        let indices: Vec<usize> = extraction
            .candidates()
            .iter()
            .map(|c| c.source_index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let plan = ItineraryPlan {
            itinerary: vec![day(1, &["故宫", "天坛"]), day(2, &["故宫", "天坛", "长城"])],
            raw_text: Some("• 长城\n• 故宫\n".to_string()),
            ..Default::default()
        };

        assert_eq!(names(&extractor().extract(&plan)), vec!["故宫", "天坛", "长城"]);
    }

    #[test]
    fn test_length_filter_on_locations() {
        let too_long = "很".repeat(20);
        let plan = ItineraryPlan {
            itinerary: vec![day(1, &["宫", &too_long, "", "颐和园"])],
            ..Default::default()
        };

        assert_eq!(names(&extractor().extract(&plan)), vec!["颐和园"]);
    }

    #[test]
    fn test_caps_at_first_ten() {
        let locations: Vec<String> = (0..15).map(|i| format!("景点{:02}", i)).collect();
        let refs: Vec<&str> = locations.iter().map(String::as_str).collect();
        let plan = ItineraryPlan {
            itinerary: vec![day(1, &refs)],
            ..Default::default()
        };

        let extraction = extractor().extract(&plan);
        let got = names(&extraction);
        assert_eq!(got.len(), 10);
        assert_eq!(got, locations[..10].to_vec());
    }

    #[test]
    fn test_bullets_from_free_text_only() {
        let plan = ItineraryPlan {
            raw_text: Some("• 故宫\n• 长城\n".to_string()),
            ..Default::default()
        };

        assert_eq!(names(&extractor().extract(&plan)), vec!["故宫", "长城"]);
    }

    #[test]
    fn test_text_results_follow_structured_in_rule_order() {
        let plan = ItineraryPlan {
            itinerary: vec![day(1, &["故宫"])],
            raw_text: Some("1. 颐和园\n第二站参观圆明园。\n• 天坛\n景点：北海公园".to_string()),
            ..Default::default()
        };

        assert_eq!(
            names(&extractor().extract(&plan)),
            vec!["故宫", "天坛", "圆明园", "北海公园", "颐和园"]
        );
    }

    #[test]
    fn test_text_rejects_times_days_and_numbers() {
        let plan = ItineraryPlan {
            raw_text: Some("• 第1天\n• 09:30\n• 2024\n• 长城\n".to_string()),
            ..Default::default()
        };

        assert_eq!(names(&extractor().extract(&plan)), vec!["长城"]);
    }

    #[test]
    fn test_empty_plan_falls_back_to_destination() {
        let plan = ItineraryPlan {
            destination: Some("东京".to_string()),
            ..Default::default()
        };

        assert_eq!(
            extractor().extract(&plan),
            Extraction::Fallback(AttractionCandidate {
                name: "东京".to_string(),
                source_index: 0,
            })
        );
    }

    #[test]
    fn test_empty_plan_without_destination() {
        assert_eq!(extractor().extract(&ItineraryPlan::default()), Extraction::Empty);
    }

    #[test]
    fn test_custom_rule_participates() {
        struct Quoted;
        impl ExtractionRule for Quoted {
            fn name(&self) -> &'static str {
                "quoted"
            }
            fn matches(&self, text: &str) -> Vec<String> {
                text.split('"').skip(1).step_by(2).map(String::from).collect()
            }
        }

        let extractor = AttractionExtractor::with_rules(
            vec![Box::new(Quoted)],
            NameFilter::new(2, 19),
            10,
        );
        let plan = ItineraryPlan {
            raw_text: Some(r#"see "Louvre" and "Orsay""#.to_string()),
            ..Default::default()
        };
        assert_eq!(names(&extractor.extract(&plan)), vec!["Louvre", "Orsay"]);
    }
}
