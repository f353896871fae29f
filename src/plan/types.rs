//! Itinerary types as produced by the plan-generation collaborator

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A generated multi-day travel plan
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItineraryPlan {
    /// Destination city or region (e.g., "北京市")
    #[serde(default)]
    pub destination: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Free-form descriptive text accompanying the structured plan
    #[serde(default, rename = "rawText", alias = "raw_text")]
    pub raw_text: Option<String>,

    /// Day plans, usually already in day order
    #[serde(default, deserialize_with = "null_as_default")]
    pub itinerary: Vec<DayPlan>,
}

/// One day of the itinerary
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DayPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub day: u32,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<Activity>,
}

/// A single scheduled activity
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Activity {
    #[serde(default)]
    pub time: Option<String>,

    /// Location name; the only field used for geolocation
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,

    #[serde(
        default,
        rename = "activity",
        alias = "description",
        deserialize_with = "null_as_default"
    )]
    pub description: String,

    /// Numbers and strings such as "100元" or "¥35.5"; anything else is dropped
    #[serde(default, deserialize_with = "lenient_cost")]
    pub cost: Option<f64>,
}

impl ItineraryPlan {
    /// Destination with surrounding whitespace removed, if non-empty
    pub fn destination(&self) -> Option<&str> {
        self.destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Day plans in ascending day order; equal day numbers keep their listed order
    pub fn days_in_order(&self) -> Vec<&DayPlan> {
        let mut days: Vec<&DayPlan> = self.itinerary.iter().collect();
        days.sort_by_key(|d| d.day);
        days
    }
}

/// Generated plans use `null` for fields they could not fill
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_cost<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_amount(&s),
        _ => None,
    })
}

/// First decimal number in a price string
fn leading_amount(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.trim_end_matches('.').parse().ok()
}
