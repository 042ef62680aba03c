//! Backend trait and configuration.
//!
//! A backend turns a [`Circuit`] into measurement statistics:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run()
//!    (&ref)            (checks)       (blocking)
//! ```
//!
//! Execution is a single blocking call. Backends that can expose the
//! final amplitudes also implement [`StatevectorBackend`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use qalgo_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;
use crate::statevector::StatevectorResult;

/// Configuration for a backend instance.
///
/// Backend-specific options live in `extra`, e.g. `max_qubits` or `seed`
/// for the simulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer option.
    ///
    /// Missing keys give `Ok(None)`; present keys of the wrong type are a
    /// configuration error.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
        }
    }
}

/// Trait for quantum backends.
///
/// `capabilities()` is cached at construction. `validate()` has a default
/// implementation checking qubit count and gate names; `run()` must call
/// it (or an equivalent) before executing.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a circuit against backend constraints.
    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let caps = self.capabilities();
        let mut reasons = Vec::new();

        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(format!(
                "circuit uses {} qubits, backend supports {}",
                circuit.num_qubits(),
                caps.num_qubits
            ));
        }

        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                if !caps.gate_set.contains(gate.name()) {
                    reasons.push(format!("unsupported gate '{}'", gate.name()));
                }
            }
        }

        debug!(
            backend = self.name(),
            circuit = circuit.name(),
            problems = reasons.len(),
            "validated circuit"
        );

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    /// Execute a circuit `shots` times and return the measurement counts.
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult>;
}

/// Backends that can report the final state of a unitary circuit.
pub trait StatevectorBackend: Backend {
    /// Compute the statevector just before the terminal measurements.
    ///
    /// Terminal measurements and barriers are ignored. Mid-circuit
    /// measurements, resets and classically conditioned gates make the
    /// state a mixture and are rejected with [`HalError::Unsupported`].
    fn statevector(&self, circuit: &Circuit) -> HalResult<StatevectorResult>;
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit is valid and can be run directly.
    Valid,
    /// Circuit is invalid for this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Counts;
    use qalgo_ir::QubitId;

    struct FixedBackend {
        caps: Capabilities,
    }

    impl Backend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn run(&self, _circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
            let mut counts = Counts::new();
            counts.insert("0", u64::from(shots));
            Ok(ExecutionResult::new(counts, shots))
        }
    }

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("sim")
            .with_extra("max_qubits", serde_json::json!(12))
            .with_extra("seed", serde_json::json!("abc"));

        assert_eq!(config.name, "sim");
        assert_eq!(config.extra_u64("max_qubits").unwrap(), Some(12));
        assert_eq!(config.extra_u64("missing").unwrap(), None);
        assert!(matches!(
            config.extra_u64("seed"),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"name": "sim", "seed": 7}"#).unwrap();
        assert_eq!(config.extra_u64("seed").unwrap(), Some(7));
    }

    #[test]
    fn test_default_validation() {
        let backend = FixedBackend {
            caps: Capabilities::simulator(2),
        };

        let mut ok = Circuit::with_size("ok", 2, 0);
        ok.h(QubitId(0)).unwrap();
        assert!(backend.validate(&ok).unwrap().is_valid());

        let wide = Circuit::with_size("wide", 3, 0);
        match backend.validate(&wide).unwrap() {
            ValidationResult::Invalid { reasons } => {
                assert_eq!(reasons.len(), 1);
                assert!(reasons[0].contains("3 qubits"));
            }
            ValidationResult::Valid => panic!("expected invalid"),
        }

        let result = backend.run(&ok, 10).unwrap();
        assert_eq!(result.counts.get("0"), 10);
    }
}
