use crate::error::OutputError;
use crate::extract::AttractionCandidate;
use crate::pipeline::{RunOutcome, RunReport};
use crate::route::{Route, Viewport};
use crate::runner::Epoch;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct RouteSummary<'a> {
    pub run_id: String,
    pub timestamp: String,
    pub epoch: Epoch,
    pub geocoder: &'static str,
    pub outcome: String,
    pub duration_sec: f64,
    pub candidates: &'a [AttractionCandidate],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<&'a Route>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    pub diagnostics: Vec<String>,
}

/// Files written for one run
#[derive(Debug)]
pub struct WrittenReport {
    pub json: PathBuf,
    pub geojson: Option<PathBuf>,
    pub markdown: PathBuf,
}

/// Write route.json, route.md and (when something was drawn) route.geojson
pub fn write_route_report(dir: &Path, report: &RunReport) -> Result<WrittenReport, OutputError> {
    fs::create_dir_all(dir).map_err(OutputError::CreateDir)?;

    let summary = build_summary(report);

    let json_path = dir.join("route.json");
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(&json_path, json).map_err(OutputError::WriteReport)?;

    let geojson = match report.route() {
        Some(route) => {
            let path = dir.join("route.geojson");
            let body = serde_json::to_string_pretty(&to_geojson(route))?;
            fs::write(&path, body).map_err(OutputError::WriteReport)?;
            Some(path)
        }
        None => None,
    };

    let md_path = dir.join("route.md");
    fs::write(&md_path, build_markdown(&summary)).map_err(OutputError::WriteReport)?;

    Ok(WrittenReport {
        json: json_path,
        geojson,
        markdown: md_path,
    })
}

fn build_summary(report: &RunReport) -> RouteSummary<'_> {
    RouteSummary {
        run_id: report.run_id.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        epoch: report.epoch,
        geocoder: report.geocoder,
        outcome: outcome_label(&report.outcome).to_string(),
        duration_sec: report.duration.as_secs_f64(),
        candidates: &report.candidates,
        route: report.route(),
        viewport: report.viewport,
        diagnostics: report.diagnostics.iter().map(|d| d.to_string()).collect(),
    }
}

fn outcome_label(outcome: &RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Rendered(_) => "rendered",
        RunOutcome::FallbackRendered(_) => "fallback_rendered",
        RunOutcome::Idle => "idle",
        RunOutcome::Superseded => "superseded",
    }
}

/// GeoJSON uses [lng, lat] order
pub fn to_geojson(route: &Route) -> Value {
    let mut features: Vec<Value> = route
        .waypoints
        .iter()
        .map(|w| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [w.position.lng, w.position.lat] },
                "properties": { "label": w.label, "name": w.name },
            })
        })
        .collect();

    if let Some(line) = &route.polyline {
        let coordinates: Vec<[f64; 2]> = line.iter().map(|p| [p.lng, p.lat]).collect();
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": coordinates },
            "properties": { "kind": "route" },
        }));
    }

    json!({ "type": "FeatureCollection", "features": features })
}

fn build_markdown(summary: &RouteSummary<'_>) -> String {
    let mut md = String::new();

    md.push_str("# Itinerary Route\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Outcome | {} |\n", format_outcome(&summary.outcome)));
    md.push_str(&format!("| Run | `{}` (epoch {}) |\n", summary.run_id, summary.epoch));
    md.push_str(&format!("| Geocoder | {} |\n", summary.geocoder));
    md.push_str(&format!("| Duration | {:.1}s |\n", summary.duration_sec));
    md.push_str(&format!("| Candidates | {} |\n", summary.candidates.len()));
    md.push_str(&format!(
        "| Waypoints | {} |\n",
        summary.route.map(|r| r.len()).unwrap_or(0)
    ));
    md.push_str("\n---\n\n");

    match summary.route {
        Some(route) => {
            md.push_str("## Waypoints\n\n");
            md.push_str("| # | Name | Lat | Lng |\n");
            md.push_str("|---|------|-----|-----|\n");
            for w in &route.waypoints {
                md.push_str(&format!(
                    "| {} | {} | {:.6} | {:.6} |\n",
                    w.label, w.name, w.position.lat, w.position.lng
                ));
            }
            md.push('\n');
        }
        None => md.push_str("*No route drawn*\n\n"),
    }

    if let Some(viewport) = summary.viewport {
        md.push_str(&format!(
            "**Viewport:** centre {} zoom {}\n\n",
            viewport.center, viewport.zoom
        ));
    }

    if !summary.diagnostics.is_empty() {
        md.push_str("## Diagnostics\n\n");
        for d in &summary.diagnostics {
            md.push_str(&format!("- {}\n", d));
        }
        md.push('\n');
    }

    md
}

fn format_outcome(outcome: &str) -> &'static str {
    match outcome {
        "rendered" => "✅ Rendered",
        "fallback_rendered" => "📍 Destination only",
        "superseded" => "⏭️ Superseded",
        _ => "⚪ Nothing drawn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeocodeError, PipelineError};
    use crate::geocode::Position;
    use crate::route::RouteAssembler;
    use crate::runner::{EpochClock, GeocodeResult};

    fn rendered_report() -> RunReport {
        let candidates = vec![
            AttractionCandidate {
                name: "故宫".to_string(),
                source_index: 0,
            },
            AttractionCandidate {
                name: "长城".to_string(),
                source_index: 1,
            },
            AttractionCandidate {
                name: "火星".to_string(),
                source_index: 2,
            },
        ];
        let route = RouteAssembler::assemble(
            &candidates,
            vec![
                GeocodeResult {
                    source_index: 1,
                    position: Position::new(40.3588, 116.02),
                },
                GeocodeResult {
                    source_index: 0,
                    position: Position::new(39.9163, 116.3972),
                },
            ],
        )
        .unwrap();

        let mut report = RunReport::new(EpochClock::new().advance(), "gazetteer");
        report.candidates = candidates;
        report.viewport = Viewport::fit(&route.positions());
        report.outcome = RunOutcome::Rendered(route);
        report.diagnostics.push(PipelineError::GeocodeFailure {
            name: "火星".to_string(),
            source: GeocodeError::NotFound("北京火星".to_string()),
        });
        report
    }

    #[test]
    fn test_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_route_report(dir.path(), &rendered_report()).unwrap();

        let json: Value =
            serde_json::from_str(&fs::read_to_string(&written.json).unwrap()).unwrap();
        assert_eq!(json["outcome"], "rendered");
        assert_eq!(json["route"]["waypoints"][0]["name"], "故宫");
        assert_eq!(json["route"]["waypoints"][1]["label"], 2);
        assert_eq!(json["candidates"].as_array().unwrap().len(), 3);
        assert!(json["diagnostics"][0].as_str().unwrap().contains("火星"));

        let md = fs::read_to_string(&written.markdown).unwrap();
        assert!(md.contains("| 1 | 故宫 |"));
        assert!(md.contains("| 2 | 长城 |"));
        assert!(md.contains("## Diagnostics"));

        assert!(written.geojson.unwrap().exists());
    }

    #[test]
    fn test_geojson_shape() {
        let report = rendered_report();
        let geojson = to_geojson(report.route().unwrap());
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["geometry"]["coordinates"][0], 116.3972);
        assert_eq!(features[2]["geometry"]["type"], "LineString");
    }

    #[test]
    fn test_idle_run_has_no_geojson() {
        let dir = tempfile::tempdir().unwrap();
        let report = RunReport::new(EpochClock::new().advance(), "gazetteer");
        let written = write_route_report(dir.path(), &report).unwrap();

        assert!(written.geojson.is_none());
        let md = fs::read_to_string(&written.markdown).unwrap();
        assert!(md.contains("*No route drawn*"));
    }
}
