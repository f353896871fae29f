use crate::cli::RouteArgs;
use crate::config::Config;
use crate::error::TripmapError;
use crate::extract::Extraction;
use crate::geocode::{create_geocoder, scoped_query};
use crate::output::write_route_report;
use crate::pipeline::{Pipeline, RunReport};
use crate::plan::{load_plan, load_text, ItineraryPlan};
use crate::route::RecordingSurface;
use tracing::{debug, info, warn};

pub async fn execute(args: RouteArgs) -> Result<(), TripmapError> {
    let mut config = args.config.load()?;
    if let Some(out) = args.out {
        config.output.dir = out;
    }

    let mut plan = load_plan(&args.plan)?;
    if let Some(destination) = args.destination {
        plan.destination = Some(destination);
    }
    if let Some(path) = args.text {
        plan.raw_text = Some(load_text(&path)?);
    }

    let geocoder = create_geocoder(&config)?;
    let pipeline = Pipeline::new(&config.pipeline, geocoder, RecordingSurface::new())?;

    if args.dry_run {
        info!("DRY RUN - no geocoder calls will be made");
        print_extraction_plan(&config, &pipeline, &plan);
        return Ok(());
    }

    let report = pipeline.run(&plan).await?;
    finish(&config, &pipeline, &report).await
}

/// Write the report files and print what ended up on the surface
pub(crate) async fn finish(
    config: &Config,
    pipeline: &Pipeline<RecordingSurface>,
    report: &RunReport,
) -> Result<(), TripmapError> {
    for diagnostic in &report.diagnostics {
        warn!("{}", diagnostic);
    }
    if report.timed_out() {
        warn!("Route is partial: the batch deadline expired before every lookup returned");
    }

    let written = write_route_report(&config.output.dir, report)?;
    info!(
        "Completed in {:.1}s: {} ({} candidates, {} failed lookups)",
        report.duration.as_secs_f64(),
        report.outcome,
        report.candidates.len(),
        report.failed_lookups()
    );

    let (overlays, viewport) = pipeline
        .with_surface(|s| (s.overlay_count(), s.viewport()))
        .await;
    debug!(
        "Surface settled in phase {} with {} overlays",
        pipeline.phase().await,
        overlays
    );

    println!("{}", report.outcome);
    if let Some(route) = report.route().filter(|r| !r.is_empty()) {
        for waypoint in &route.waypoints {
            println!("  {}. {} {}", waypoint.label, waypoint.name, waypoint.position);
        }
        println!("View: centre {} zoom {}", viewport.center, viewport.zoom);
    }

    println!("Report: {}", written.markdown.display());
    println!("Summary: {}", written.json.display());
    if let Some(geojson) = &written.geojson {
        println!("GeoJSON: {}", geojson.display());
    }
    Ok(())
}

fn print_extraction_plan(
    config: &Config,
    pipeline: &Pipeline<RecordingSurface>,
    plan: &ItineraryPlan,
) {
    let scope = pipeline.scope(plan.destination());

    println!("\n=== Extraction Plan ===\n");
    println!("Geocoder: {}", config.geocoder.provider);
    println!("Destination: {}", plan.destination().unwrap_or("-"));
    println!("Scope: {}", if scope.is_empty() { "-" } else { &scope });
    println!("Output dir: {:?}", config.output.dir);

    match pipeline.extractor().extract(plan) {
        Extraction::Candidates(candidates) => {
            println!("\nLookups ({}):", candidates.len());
            for candidate in &candidates {
                println!(
                    "  {}. {} -> {}",
                    candidate.source_index + 1,
                    candidate.name,
                    scoped_query(&scope, &candidate.name)
                );
            }
        }
        Extraction::Fallback(candidate) => {
            println!("\nNo attractions found; destination only:");
            println!("  {}", candidate.name);
        }
        Extraction::Empty => {
            println!("\nNothing to locate");
        }
    }
    println!();
}
