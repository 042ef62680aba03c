//! Command-line flags shared by every demo binary.

use std::path::PathBuf;

use qalgo_adapter_sim::SimulatorBackend;
use qalgo_hal::BackendFactory;
use tracing::debug;

use crate::config::DemoConfig;
use crate::error::DemoResult;

/// Flags accepted by every `demo-*` binary.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Shots per run [default: 1024]
    #[arg(short, long, env = "QALGO_SHOTS")]
    pub shots: Option<u32>,

    /// Simulator RNG seed for reproducible counts
    #[arg(long, env = "QALGO_SEED")]
    pub seed: Option<u64>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Allowed deviation from expected probabilities [default: 0.05]
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Print the report as JSON instead of styled text
    #[arg(long)]
    pub json: bool,

    /// Show the generated OpenQASM 3 code
    #[arg(long)]
    pub show_qasm: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Load the configuration file, if any, and apply flag overrides.
    pub fn resolve_config(&self) -> DemoResult<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                DemoConfig::load(path)?
            }
            None => DemoConfig::default(),
        };
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Build the simulator described by `config`.
pub fn backend(config: &DemoConfig) -> DemoResult<SimulatorBackend> {
    Ok(SimulatorBackend::from_config(config.backend_config())?)
}
