//! Populate command runner.

use anyhow::Context;
use loadtest_dataset::DatasetSchema;
use loadtest_populate::CommonPopulateArgs;
use loadtest_populate_file::{FilePopulator, PopulateMetrics};
use tokio_util::sync::CancellationToken;

use super::load_summary;
use crate::PopulateTarget;

/// Run populate command to stream a deterministic dataset into the target.
///
/// Returns `None` in dry-run mode, where nothing is generated.
pub async fn run_populate(
    target: PopulateTarget,
    cancel: CancellationToken,
) -> anyhow::Result<Option<PopulateMetrics>> {
    match target {
        PopulateTarget::File { args } => {
            let populator = build_populator(&args.common, cancel)?;

            if args.common.dry_run {
                log_dry_run(&populator, &format!("file {:?}", args.output));
                return Ok(None);
            }

            let metrics = populator
                .populate(&args.output)
                .await
                .with_context(|| format!("Failed to populate file {:?}", args.output))?;

            tracing::info!("{}", load_summary(&metrics));
            Ok(Some(metrics))
        }
        PopulateTarget::Stdout { args } => {
            let populator = build_populator(&args.common, cancel)?;

            if args.common.dry_run {
                log_dry_run(&populator, "stdout");
                return Ok(None);
            }

            let metrics = populator
                .populate_stdout()
                .await
                .context("Failed to populate stdout")?;

            tracing::info!("{}", load_summary(&metrics));
            Ok(Some(metrics))
        }
    }
}

/// Load the dataset and apply every command-line override.
pub fn build_populator(
    common: &CommonPopulateArgs,
    cancel: CancellationToken,
) -> anyhow::Result<FilePopulator> {
    let schema = DatasetSchema::from_file(&common.dataset)
        .with_context(|| format!("Failed to load dataset from {:?}", common.dataset))?;

    let seed = common.effective_seed(schema.seed);
    let pipeline_config = common
        .pipeline_config()
        .context("Invalid pipeline configuration")?;

    let mut populator = FilePopulator::new(schema, seed)
        .with_user_type(common.user_type)
        .with_encoding(common.encoding_mode())
        .with_separator(common.separator)
        .with_pipeline_config(pipeline_config)
        .with_cancellation(cancel);
    if let Some(metric) = &common.metric {
        populator = populator.with_metric(metric.clone());
    }

    Ok(populator)
}

fn log_dry_run(populator: &FilePopulator, destination: &str) {
    let schema = populator.schema();
    let config = populator.pipeline_config();

    tracing::info!(
        "[DRY-RUN] Would generate {} records ({} users x {} samples, {} fields) to {}",
        schema.total_records(),
        i64::from(schema.users.end) - i64::from(schema.users.start) + 1,
        schema.samples_per_user,
        schema.fields.len(),
        destination
    );
    tracing::info!(
        "[DRY-RUN] Encoding: {} (metric={}, seed={})",
        populator.encoding(),
        populator.metric(),
        populator.seed()
    );
    tracing::info!(
        "[DRY-RUN] Pipeline: batch_size={}, queue_capacity={}",
        config.batch_size,
        config.queue_capacity
    );
    tracing::info!("[DRY-RUN] Dataset validated successfully");
}
