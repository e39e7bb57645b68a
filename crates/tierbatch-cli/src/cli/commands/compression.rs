//! `--policy compression`: round-based admission with batch compression.

use anyhow::Result;
use std::path::Path;
use tierbatch_core::catalog::Catalog;
use tierbatch_core::model::CostModel;
use tierbatch_core::report;
use tierbatch_core::scheduler::{CompressionScheduler, SetupCostPolicy};

use super::{RunStatus, Summary};

pub fn run_compression(
    catalog: &mut Catalog,
    model: &CostModel,
    setup_policy: SetupCostPolicy,
    out_dir: &Path,
) -> Result<Summary> {
    let outcome = CompressionScheduler::new(model)
        .with_setup_policy(setup_policy)
        .run(catalog);
    let written = report::write_compression_reports(out_dir, &outcome)?;
    for path in &written {
        tracing::info!("wrote {}", path.display());
    }

    let line = format!(
        "compression: total={} completed={} missed={} (crucial={}, non-crucial={}) rounds={} accumulated_time={:.6} deadline={:.6}",
        outcome.total_jobs,
        outcome.scheduled_count(),
        outcome.missed_count(),
        outcome.missed_crucial(),
        outcome.missed_non_crucial(),
        outcome.rounds.len(),
        outcome.accumulated_time,
        outcome.global_deadline,
    );
    Ok(Summary {
        line,
        status: RunStatus::Completed,
    })
}
