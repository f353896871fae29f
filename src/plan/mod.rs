mod types;

pub use types::ItineraryPlan;
#[cfg(test)]
pub use types::{Activity, DayPlan};

use crate::error::PlanError;
use std::path::Path;

/// Load an itinerary plan from a JSON file
pub fn load_plan(path: &Path) -> Result<ItineraryPlan, PlanError> {
    let content = std::fs::read_to_string(path).map_err(|e| PlanError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let plan: ItineraryPlan = serde_json::from_str(&content)?;
    tracing::debug!(
        "Loaded plan with {} days from {}",
        plan.itinerary.len(),
        path.display()
    );
    Ok(plan)
}

/// Read free-form itinerary text that replaces the plan's own
pub fn load_text(path: &Path) -> Result<String, PlanError> {
    std::fs::read_to_string(path).map_err(|e| PlanError::ReadText {
        path: path.to_path_buf(),
        source: e,
    })
}
