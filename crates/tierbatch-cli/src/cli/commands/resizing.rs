//! `--policy resizing`: budgeted, quality-maximising tier assignment.

use anyhow::Result;
use std::path::Path;
use tierbatch_core::catalog::Catalog;
use tierbatch_core::model::CostModel;
use tierbatch_core::report;
use tierbatch_core::resizing::{ResizingOptimizer, ResizingOutcome};

use super::{RunStatus, Summary};

pub fn run_resizing(
    catalog: &mut Catalog,
    model: &CostModel,
    budget: f64,
    out_dir: &Path,
) -> Result<Summary> {
    let outcome = ResizingOptimizer::new(model).optimize(catalog, budget);
    let path = report::write_resizing_report(out_dir, &outcome)?;
    tracing::info!("wrote {}", path.display());

    let summary = match &outcome {
        ResizingOutcome::Assigned(plan) => Summary {
            line: format!(
                "resizing: total={} cap={} utility={:.6} remaining_budget={:.6} budget={:.6}",
                plan.assignments.len(),
                plan.cap,
                plan.utility,
                plan.remaining_budget,
                plan.budget,
            ),
            status: RunStatus::Completed,
        },
        ResizingOutcome::Infeasible { budget, .. } => Summary {
            line: format!(
                "resizing: infeasible, no tier cap fits {} task(s) within budget={:.6}",
                catalog.len(),
                budget
            ),
            status: RunStatus::Infeasible,
        },
    };
    Ok(summary)
}
