use anyhow::Context;
use dvc_trip_planner::{
    scan_concurrently, DataSource, EmbeddedProvider, FileStoreProvider, LineReporter,
    PlannerConfig, ReferenceDataProvider, StubProvider, TripScanner,
};
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout only carries trip lines
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dvc_trip_planner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = PlannerConfig::from_env().context("Failed to load configuration")?;
    let context = config.scan_context();
    let start = config.scan_start(&context)?;
    tracing::info!(
        goal_points = config.goal_points,
        time_zone = %config.time_zone,
        data_source = ?config.data_source,
        start = %start.format("%Y-%m-%d"),
        lookahead_days = ?config.lookahead_days,
        concurrent = config.concurrent,
        "Loaded configuration"
    );

    let provider: Box<dyn ReferenceDataProvider> = match config.data_source {
        DataSource::Store => Box::new(FileStoreProvider::new(
            config.store_path.clone(),
            config.store_bucket.clone(),
        )),
        DataSource::Embedded => Box::new(EmbeddedProvider::new(config.time_zone)),
        DataSource::Stub => Box::new(StubProvider),
    };
    let resorts = provider
        .load_resorts()
        .context("Failed to load resort reference data")?;
    tracing::info!(resorts = resorts.len(), "Loaded resorts");

    let source = config.point_source(&context, start)?;

    let mut reporter = LineReporter::new(io::stdout().lock());
    let summary = if config.concurrent {
        scan_concurrently(Arc::new(source), context, Arc::new(resorts), start, &mut reporter)
            .await?
    } else {
        TripScanner::new(&*source, &context).scan(&resorts, start, &mut reporter)?
    };
    reporter.into_inner().flush()?;

    tracing::info!(
        pairs = summary.pairs,
        trips = summary.trips,
        stopped_early = summary.stopped_early,
        "Scan complete"
    );

    Ok(())
}
