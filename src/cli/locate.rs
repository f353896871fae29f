use crate::cli::run::finish;
use crate::cli::LocateArgs;
use crate::error::TripmapError;
use crate::geocode::create_geocoder;
use crate::pipeline::Pipeline;
use crate::route::RecordingSurface;

pub async fn execute(args: LocateArgs) -> Result<(), TripmapError> {
    let mut config = args.config.load()?;
    if let Some(out) = args.out {
        config.output.dir = out;
    }

    let geocoder = create_geocoder(&config)?;
    let pipeline = Pipeline::new(&config.pipeline, geocoder, RecordingSurface::new())?;

    let report = pipeline.show_destination(&args.destination).await?;
    finish(&config, &pipeline, &report).await
}
