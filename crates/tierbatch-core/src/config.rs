use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{CostModel, ModelError};
use crate::scheduler::SetupCostPolicy;

fn default_input() -> PathBuf {
    PathBuf::from("tasks.csv")
}

/// Global configuration loaded from `~/.config/tierbatch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierbatchConfig {
    /// Task file used when none is given on the command line.
    #[serde(default = "default_input")]
    pub default_input: PathBuf,
    /// Directory for report files (None = current directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Whether tier setup cost is charged once per run or every round.
    #[serde(default)]
    pub setup_cost_policy: SetupCostPolicy,
    /// Time budget for the resizing optimizer (None = the catalog's global deadline).
    #[serde(default)]
    pub resizing_budget: Option<f64>,
    /// Optional cost model; if missing, built-in defaults are used.
    #[serde(default)]
    pub cost_model: Option<CostModel>,
}

impl Default for TierbatchConfig {
    fn default() -> Self {
        Self {
            default_input: default_input(),
            output_dir: None,
            setup_cost_policy: SetupCostPolicy::default(),
            resizing_budget: None,
            cost_model: None,
        }
    }
}

impl TierbatchConfig {
    /// Configured cost model (or the default), validated.
    pub fn cost_model(&self) -> Result<CostModel, ModelError> {
        let model = self.cost_model.clone().unwrap_or_default();
        model.validate()?;
        Ok(model)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tierbatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TierbatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TierbatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<TierbatchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: TierbatchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TierbatchConfig::default();
        assert_eq!(cfg.default_input, PathBuf::from("tasks.csv"));
        assert!(cfg.output_dir.is_none());
        assert_eq!(cfg.setup_cost_policy, SetupCostPolicy::PerRun);
        assert!(cfg.resizing_budget.is_none());
        assert_eq!(cfg.cost_model().unwrap(), CostModel::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TierbatchConfig {
            cost_model: Some(CostModel::default()),
            ..TierbatchConfig::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TierbatchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_empty_uses_defaults() {
        let cfg: TierbatchConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, TierbatchConfig::default());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            default_input = "jobs/batch_1.csv"
            output_dir = "/tmp/reports"
            setup_cost_policy = "per-round"
            resizing_budget = 25.0

            [cost_model]
            fixed_setup_cost = [1.0, 1.0, 1.0, 1.0]
            marginal_cost = [0.5, 1.0, 2.0, 4.0]
            min_acceptable_accuracy = [0.0, 0.5, 0.5, 0.5]
            accuracy = [
                [0.5, 0.6, 0.7, 0.8],
                [0.5, 0.6, 0.7, 0.8],
                [0.5, 0.6, 0.7, 0.8],
                [0.5, 0.6, 0.7, 0.8],
            ]
        "#;
        let cfg: TierbatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.default_input, PathBuf::from("jobs/batch_1.csv"));
        assert_eq!(cfg.output_dir.as_deref(), Some(Path::new("/tmp/reports")));
        assert_eq!(cfg.setup_cost_policy, SetupCostPolicy::PerRound);
        assert_eq!(cfg.resizing_budget, Some(25.0));
        let model = cfg.cost_model().unwrap();
        assert!((model.marginal_cost[3] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn config_invalid_cost_model_is_rejected() {
        let toml = r#"
            [cost_model]
            fixed_setup_cost = [1.0, 1.0, 1.0, -1.0]
            marginal_cost = [0.5, 1.0, 2.0, 4.0]
            min_acceptable_accuracy = [0.0, 0.5, 0.5, 0.5]
            accuracy = [[0.5, 0.5, 0.5, 0.5], [0.5, 0.5, 0.5, 0.5], [0.5, 0.5, 0.5, 0.5], [0.5, 0.5, 0.5, 0.5]]
        "#;
        let cfg: TierbatchConfig = toml::from_str(toml).unwrap();
        assert!(matches!(
            cfg.cost_model(),
            Err(ModelError::FixedSetupCost { .. })
        ));
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "setup_cost_policy = \"per-run\"\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.setup_cost_policy, SetupCostPolicy::PerRun);
        assert!(load_from_path(&dir.path().join("missing.toml")).is_err());
    }
}
