//! Simulator backend implementation.

use std::time::Instant;

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qalgo_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, Counts, ExecutionResult, HalError,
    HalResult, StatevectorBackend, StatevectorResult, ValidationResult,
};
use qalgo_ir::{Circuit, Instruction, InstructionKind};

use crate::statevector::Statevector;

/// Default qubit limit: 2^20 amplitudes is 16 MiB.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// How a circuit is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Every measurement is terminal: simulate once, sample the final
    /// distribution.
    Sampled,
    /// Mid-circuit measurement, reset or classical control: one trajectory
    /// per shot.
    Trajectories,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Sampled => "sampled",
            Mode::Trajectories => "trajectories",
        }
    }
}

/// A circuit split into the part run once and the part run per shot.
struct Plan<'a> {
    /// Leading unconditional gates, identical for every shot.
    prefix: Vec<&'a Instruction>,
    /// Everything from the first measurement, reset or conditional gate on.
    rest: Vec<&'a Instruction>,
    /// Terminal measurements as `(qubit, clbit)` pairs, in order.
    terminal: Vec<(usize, usize)>,
    mode: Mode,
}

impl<'a> Plan<'a> {
    fn new(circuit: &'a Circuit) -> Self {
        let dag = circuit.dag();
        let mut mode = Mode::Sampled;
        let mut terminal = Vec::new();
        for (node, inst) in dag.topological_ops() {
            match &inst.kind {
                InstructionKind::Measure if dag.is_terminal(node) => terminal.extend(
                    inst.qubits
                        .iter()
                        .zip(&inst.clbits)
                        .map(|(q, c)| (q.index(), c.index())),
                ),
                InstructionKind::Measure | InstructionKind::Reset => mode = Mode::Trajectories,
                InstructionKind::Gate(gate) if gate.is_conditional() => {
                    mode = Mode::Trajectories;
                }
                InstructionKind::Gate(_) | InstructionKind::Barrier => {}
            }
        }

        let ops: Vec<_> = circuit.instructions().collect();
        let split = ops
            .iter()
            .position(|inst| !inst.is_unitary())
            .unwrap_or(ops.len());
        let rest = ops[split..].to_vec();
        let mut prefix = ops;
        prefix.truncate(split);

        Self {
            prefix,
            rest,
            terminal,
            mode,
        }
    }
}

/// Local statevector simulator.
///
/// Exact up to sampling noise; memory grows as `2^n`, so circuits are
/// limited to `max_qubits` (default 20). Randomness comes from a
/// [`StdRng`] created per call, seeded when a seed is configured.
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    max_qubits: u32,
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            config: BackendConfig::new("simulator"),
            capabilities: Capabilities::simulator(max_qubits),
            max_qubits,
            seed: None,
        }
    }

    /// Fix the RNG seed so that every run is reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn check_size(&self, circuit: &Circuit) -> HalResult<()> {
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        Ok(())
    }

    fn run_sampled(
        &self,
        circuit: &Circuit,
        plan: &Plan<'_>,
        shots: u32,
        rng: &mut StdRng,
    ) -> HalResult<Counts> {
        let mut sv = Statevector::new(circuit.num_qubits());
        for inst in &plan.prefix {
            apply_unitary(&mut sv, inst);
        }
        // Unitaries acting after a terminal measurement on other qubits
        for inst in plan.rest.iter().filter(|inst| inst.is_gate()) {
            apply_unitary(&mut sv, inst);
        }

        let dist = WeightedIndex::new(sv.probabilities())
            .map_err(|e| HalError::InvalidState(format!("cannot sample final state: {e}")))?;

        let mut histogram = vec![0u64; sv.amplitudes().len()];
        for _ in 0..shots {
            histogram[dist.sample(rng)] += 1;
        }

        let mut counts = Counts::new();
        for (index, &hits) in histogram.iter().enumerate().filter(|(_, h)| **h > 0) {
            let mut register = vec![false; circuit.num_clbits()];
            for &(qubit, clbit) in &plan.terminal {
                register[clbit] = index & (1 << qubit) != 0;
            }
            counts.insert(bitstring(&register), hits);
        }
        Ok(counts)
    }

    fn run_trajectories(
        &self,
        circuit: &Circuit,
        plan: &Plan<'_>,
        shots: u32,
        rng: &mut StdRng,
    ) -> Counts {
        let mut initial = Statevector::new(circuit.num_qubits());
        for inst in &plan.prefix {
            apply_unitary(&mut initial, inst);
        }

        let mut counts = Counts::new();
        for shot in 0..shots {
            let mut sv = initial.clone();
            let mut register = vec![false; circuit.num_clbits()];

            for inst in &plan.rest {
                match &inst.kind {
                    InstructionKind::Gate(gate) => {
                        let fires = gate
                            .condition
                            .as_ref()
                            .is_none_or(|cond| cond.is_satisfied(&register));
                        if fires {
                            sv.apply_gate(&gate.kind, &inst.qubits);
                        }
                    }
                    InstructionKind::Measure => {
                        for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                            register[c.index()] = sv.measure(q.index(), rng);
                        }
                    }
                    InstructionKind::Reset => {
                        for q in &inst.qubits {
                            sv.reset(q.index(), rng);
                        }
                    }
                    InstructionKind::Barrier => {}
                }
            }

            counts.insert(bitstring(&register), 1);

            if shot > 0 && shot % 1000 == 0 {
                debug!("Completed {} shots", shot);
            }
        }
        counts
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_unitary(sv: &mut Statevector, inst: &Instruction) {
    if let InstructionKind::Gate(gate) = &inst.kind {
        sv.apply_gate(&gate.kind, &inst.qubits);
    }
}

/// Render a classical register, highest bit first.
fn bitstring(register: &[bool]) -> String {
    register
        .iter()
        .rev()
        .map(|&bit| if bit { '1' } else { '0' })
        .collect()
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} exceeds the limit of {}",
                self.capabilities.max_shots
            )));
        }
        self.check_size(circuit)?;
        if let ValidationResult::Invalid { reasons } = self.validate(circuit)? {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }
        if !circuit.has_measurements() {
            return Err(HalError::InvalidCircuit(format!(
                "circuit '{}' has no measurements to count",
                circuit.name()
            )));
        }

        let start = Instant::now();
        let plan = Plan::new(circuit);
        let mut rng = self.rng();
        debug!(
            "Starting simulation: {} qubits, {} shots, {} mode",
            circuit.num_qubits(),
            shots,
            plan.mode.as_str()
        );

        let counts = match plan.mode {
            Mode::Sampled => self.run_sampled(circuit, &plan, shots, &mut rng)?,
            Mode::Trajectories => self.run_trajectories(circuit, &plan, shots, &mut rng),
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(ExecutionResult::new(counts, shots)
            .with_backend(self.name())
            .with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .with_metadata("mode", plan.mode.as_str().into())
            .with_metadata("seed", self.seed.into()))
    }
}

impl StatevectorBackend for SimulatorBackend {
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn statevector(&self, circuit: &Circuit) -> HalResult<StatevectorResult> {
        self.check_size(circuit)?;
        let dag = circuit.dag();
        let mut sv = Statevector::new(circuit.num_qubits());

        for (node, inst) in dag.topological_ops() {
            match &inst.kind {
                InstructionKind::Gate(gate) if !gate.is_conditional() => {
                    sv.apply_gate(&gate.kind, &inst.qubits);
                }
                InstructionKind::Barrier => {}
                InstructionKind::Measure if dag.is_terminal(node) => {}
                _ => {
                    return Err(HalError::Unsupported(format!(
                        "statevector of a circuit containing non-unitary '{}'",
                        inst.name()
                    )));
                }
            }
        }

        debug!("Computed statevector of {} qubits", sv.num_qubits());
        StatevectorResult::new(sv.into_amplitudes())
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits")? {
            Some(v) => u32::try_from(v).map_err(|_| {
                HalError::Configuration(format!("max_qubits {v} is out of range"))
            })?,
            None => DEFAULT_MAX_QUBITS,
        };
        let seed = config.extra_u64("seed")?;

        Ok(Self {
            capabilities: Capabilities::simulator(max_qubits),
            config,
            max_qubits,
            seed,
        })
    }
}
