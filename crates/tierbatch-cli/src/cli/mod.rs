//! CLI for the tierbatch scheduler.

mod commands;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tierbatch_core::catalog;
use tierbatch_core::config::{self, TierbatchConfig};
use tierbatch_core::scheduler::SetupCostPolicy;

use commands::{run_both, run_compression, run_resizing, RunStatus};

/// Which scheduling policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Round-based admission with batch compression.
    Compression,
    /// Budgeted resizing optimizer (all-or-nothing).
    Resizing,
    /// Both policies side by side on separate copies of the catalog.
    Both,
}

/// When tier setup cost is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SetupCost {
    PerRun,
    PerRound,
}

impl From<SetupCost> for SetupCostPolicy {
    fn from(value: SetupCost) -> Self {
        match value {
            SetupCost::PerRun => SetupCostPolicy::PerRun,
            SetupCost::PerRound => SetupCostPolicy::PerRound,
        }
    }
}

/// Deadline-aware admission and resolution-tier scheduling for inference jobs.
#[derive(Debug, Parser)]
#[command(name = "tierbatch")]
#[command(about = "tierbatch: deadline-aware batch scheduling across resolution tiers", long_about = None)]
pub struct Cli {
    /// Task file (CSV: size,deadline,id,crucial[,category]). Defaults to the config's default_input.
    pub input: Option<PathBuf>,

    /// Scheduling policy to run.
    #[arg(long, value_enum, default_value = "compression")]
    pub policy: Policy,

    /// Time budget for the resizing optimizer (default: the global deadline).
    #[arg(long, value_name = "H")]
    pub budget: Option<f64>,

    /// Charge tier setup cost once per run or in every round.
    #[arg(long, value_enum)]
    pub setup_cost: Option<SetupCost>,

    /// Directory for report files (default: config output_dir, else current dir).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Read configuration from this file instead of ~/.config/tierbatch/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run_from_args() -> Result<RunStatus> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        cli.run(&cfg).await
    }

    async fn run(self, cfg: &TierbatchConfig) -> Result<RunStatus> {
        let model = cfg.cost_model().context("invalid cost model in config")?;
        let input = self.input.unwrap_or_else(|| cfg.default_input.clone());
        let out_dir = match self.out_dir.or_else(|| cfg.output_dir.clone()) {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let setup_policy = self
            .setup_cost
            .map(SetupCostPolicy::from)
            .unwrap_or(cfg.setup_cost_policy);

        let budget_override = self.budget.or(cfg.resizing_budget);
        if let Some(budget) = budget_override {
            ensure!(
                budget.is_finite(),
                "resizing budget must be a finite number of time units, got {}",
                budget
            );
        }

        let catalog = catalog::load_from_path(&input)?;
        let budget = budget_override.unwrap_or_else(|| catalog.global_deadline());
        println!(
            "loaded {} task(s) from {} (global deadline {:.6})",
            catalog.len(),
            input.display(),
            catalog.global_deadline()
        );

        let status = match self.policy {
            Policy::Compression => {
                let mut catalog = catalog;
                run_compression(&mut catalog, &model, setup_policy, &out_dir)?.print()
            }
            Policy::Resizing => {
                let mut catalog = catalog;
                run_resizing(&mut catalog, &model, budget, &out_dir)?.print()
            }
            Policy::Both => run_both(catalog, model, setup_policy, budget, out_dir).await?,
        };
        Ok(status)
    }
}
