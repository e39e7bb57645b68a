//! `--policy both`: run the two policies concurrently on separate catalogs.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tierbatch_core::catalog::Catalog;
use tierbatch_core::model::CostModel;
use tierbatch_core::scheduler::SetupCostPolicy;

use super::{run_compression, run_resizing, RunStatus};

pub async fn run_both(
    catalog: Catalog,
    model: CostModel,
    setup_policy: SetupCostPolicy,
    budget: f64,
    out_dir: PathBuf,
) -> Result<RunStatus> {
    let model = Arc::new(model);
    let out_dir = Arc::new(out_dir);

    let compression = {
        let mut catalog = catalog.clone();
        let model = Arc::clone(&model);
        let out_dir = Arc::clone(&out_dir);
        tokio::task::spawn_blocking(move || {
            run_compression(&mut catalog, &model, setup_policy, &out_dir)
        })
    };
    let resizing = {
        let mut catalog = catalog;
        tokio::task::spawn_blocking(move || run_resizing(&mut catalog, &model, budget, &out_dir))
    };

    let (compression, resizing) = tokio::join!(compression, resizing);
    let compression = compression.context("compression task panicked")??;
    let resizing = resizing.context("resizing task panicked")??;
    Ok(compression.print().merge(resizing.print()))
}
