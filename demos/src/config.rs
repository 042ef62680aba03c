//! Demo configuration.
//!
//! Values come from an optional YAML file and are then overridden by
//! command-line flags and environment variables.
//!
//! ```yaml
//! shots: 4096
//! seed: 7
//! teleport:
//!   input: plus_i
//!   mode: coherent
//! qft:
//!   input: 5
//! qpe:
//!   counting_qubits: 5
//!   phase: 0.3
//! ```

use std::path::Path;

use qalgo_adapter_sim::DEFAULT_MAX_QUBITS;
use qalgo_hal::BackendConfig;
use serde::{Deserialize, Serialize};

use crate::circuits::qft::check_qft_size;
use crate::circuits::qpe::{PhaseTarget, check_counting_qubits};
use crate::circuits::{CorrectionMode, TeleportInput};
use crate::error::{DemoError, DemoResult};

/// Shots per run.
pub const DEFAULT_SHOTS: u32 = 1024;

/// Settings shared by every demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Shots per counts run.
    pub shots: u32,
    /// Simulator RNG seed; entropy when absent.
    pub seed: Option<u64>,
    /// Allowed deviation between observed and expected probabilities.
    pub tolerance: f64,
    /// Simulator register limit.
    pub max_qubits: u32,
    /// Teleportation settings.
    pub teleport: TeleportConfig,
    /// QFT settings.
    pub qft: QftConfig,
    /// Phase-estimation settings.
    pub qpe: QpeConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            seed: None,
            tolerance: 0.05,
            max_qubits: DEFAULT_MAX_QUBITS,
            teleport: TeleportConfig::default(),
            qft: QftConfig::default(),
            qpe: QpeConfig::default(),
        }
    }
}

/// Teleportation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeleportConfig {
    /// State to send.
    pub input: TeleportInput,
    /// Correction applied to Bob's qubit.
    pub mode: CorrectionMode,
}

/// QFT settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QftConfig {
    /// Register size.
    pub num_qubits: u32,
    /// Basis state prepared before the transform.
    pub input: u64,
}

impl Default for QftConfig {
    fn default() -> Self {
        // |100⟩
        Self {
            num_qubits: 3,
            input: 4,
        }
    }
}

/// Phase-estimation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QpeConfig {
    /// Size of the counting register.
    pub counting_qubits: u32,
    /// Phase to estimate instead of the T gate's 1/8.
    pub phase: Option<f64>,
}

impl Default for QpeConfig {
    fn default() -> Self {
        Self {
            counting_qubits: 3,
            phase: None,
        }
    }
}

impl QpeConfig {
    /// The unitary to estimate.
    pub fn target(&self) -> DemoResult<PhaseTarget> {
        match self.phase {
            Some(phase) => PhaseTarget::phase(phase),
            None => Ok(PhaseTarget::T),
        }
    }
}

impl DemoConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> DemoResult<Self> {
        let config: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| DemoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file.
    pub fn load(path: &Path) -> DemoResult<Self> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| DemoError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml(&yaml)
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> DemoResult<()> {
        if self.shots == 0 {
            return Err(DemoError::InvalidInput("shots must be positive".into()));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance >= 1.0 {
            return Err(DemoError::InvalidInput(format!(
                "tolerance must lie in (0, 1), got {}",
                self.tolerance
            )));
        }
        check_qft_size(self.qft.num_qubits)?;
        check_counting_qubits(self.qpe.counting_qubits)?;
        self.qpe.target()?;
        Ok(())
    }

    /// Backend configuration for the statevector simulator.
    pub fn backend_config(&self) -> BackendConfig {
        let config = BackendConfig::new("simulator")
            .with_extra("max_qubits", serde_json::json!(self.max_qubits));
        match self.seed {
            Some(seed) => config.with_extra("seed", serde_json::json!(seed)),
            None => config,
        }
    }
}
