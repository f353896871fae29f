use crate::cli::FollowArgs;
use crate::error::TripmapError;
use crate::geocode::create_geocoder;
use crate::pipeline::{debounce, Pipeline};
use crate::route::RecordingSurface;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub async fn execute(args: FollowArgs) -> Result<(), TripmapError> {
    let config = args.config.load()?;
    let quiet = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.pipeline.debounce());

    let geocoder = create_geocoder(&config)?;
    let pipeline = Arc::new(Pipeline::new(
        &config.pipeline,
        geocoder,
        RecordingSurface::new(),
    )?);

    let (tx, rx) = mpsc::channel::<String>(64);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if tx.send(line).await.is_err() {
                break;
            }
        }
        Ok::<(), std::io::Error>(())
    });

    let mut settled = debounce(rx, quiet);
    let mut displays = JoinSet::new();

    while let Some(raw) = settled.recv().await {
        let Some(destination) = settled_destination(&raw) else {
            debug!("Ignoring short destination {:?}", raw);
            continue;
        };

        let pipeline = Arc::clone(&pipeline);
        displays.spawn(async move {
            match pipeline.show_destination(&destination).await {
                Ok(report) => println!("{}: {}", destination, report.outcome),
                Err(e) => warn!("{}: {}", destination, e),
            }
        });
    }

    while let Some(joined) = displays.join_next().await {
        if let Err(e) = joined {
            warn!("Display task failed: {}", e);
        }
    }

    match reader.await {
        Ok(result) => result?,
        Err(e) => warn!("Stdin reader failed: {}", e),
    }
    Ok(())
}

/// A destination worth showing: trimmed, more than one character
fn settled_destination(raw: &str) -> Option<String> {
    let destination = raw.trim();
    (destination.chars().count() > 1).then(|| destination.to_string())
}
