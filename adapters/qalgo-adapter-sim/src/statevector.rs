//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use qalgo_ir::{QubitId, StandardGate};

type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Amplitudes of an `n`-qubit register, little endian.
#[derive(Debug, Clone)]
pub(crate) struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// The all-zero state |0...0⟩.
    pub(crate) fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub(crate) fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub(crate) fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub(crate) fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Apply a gate. Arity has already been checked by the circuit.
    pub(crate) fn apply_gate(&mut self, gate: &StandardGate, qubits: &[QubitId]) {
        let q = |k: usize| qubits[k].index();
        match *gate {
            StandardGate::I => {}
            StandardGate::Swap => self.apply_swap(q(0), q(1)),
            StandardGate::CX => self.apply_controlled(1 << q(0), q(1), &pauli_x()),
            StandardGate::CY => self.apply_controlled(1 << q(0), q(1), &pauli_y()),
            StandardGate::CZ => self.apply_controlled(1 << q(0), q(1), &diagonal(-ONE)),
            StandardGate::CP(theta) => {
                self.apply_controlled(1 << q(0), q(1), &diagonal(Complex64::from_polar(1.0, theta)));
            }
            StandardGate::CRz(theta) => {
                self.apply_controlled(1 << q(0), q(1), &rz(theta));
            }
            StandardGate::CCX => {
                self.apply_controlled((1 << q(0)) | (1 << q(1)), q(2), &pauli_x());
            }
            single => {
                if let Some(matrix) = single_qubit_matrix(&single) {
                    self.apply_controlled(0, q(0), &matrix);
                }
            }
        }
    }

    /// Apply a 2x2 matrix to `target` on every basis state whose bits in
    /// `controls` are all set. `controls == 0` is an uncontrolled gate.
    fn apply_controlled(&mut self, controls: usize, target: usize, m: &Matrix2) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask == 0 && i & controls == controls {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let (m1, m2) = (1 << q1, 1 << q2);
        for i in 0..self.amplitudes.len() {
            if i & m1 != 0 && i & m2 == 0 {
                self.amplitudes.swap(i, (i & !m1) | m2);
            }
        }
    }

    /// Probability that `qubit` reads 1.
    pub(crate) fn probability_of_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Measure `qubit`, collapse the state onto the outcome and return it.
    pub(crate) fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p1 = self.probability_of_one(qubit);
        let outcome = rng.r#gen::<f64>() < p1;
        self.project(qubit, outcome, if outcome { p1 } else { 1.0 - p1 });
        outcome
    }

    /// Return `qubit` to |0⟩: measure it and flip it back if it read 1.
    pub(crate) fn reset<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) {
        if self.measure(qubit, rng) {
            self.apply_controlled(0, qubit, &pauli_x());
        }
    }

    /// Zero the amplitudes inconsistent with `qubit == outcome` and
    /// renormalise by the outcome probability.
    fn project(&mut self, qubit: usize, outcome: bool, probability: f64) {
        let mask = 1 << qubit;
        let scale = if probability > 0.0 {
            1.0 / probability.sqrt()
        } else {
            0.0
        };
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }
    }

    /// Outcome probabilities of every basis state.
    pub(crate) fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }
}

fn diagonal(d1: Complex64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, d1]]
}

fn pauli_x() -> Matrix2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

fn pauli_y() -> Matrix2 {
    [[ZERO, -I], [I, ZERO]]
}

fn rz(theta: f64) -> Matrix2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// Matrix of a single-qubit gate, `None` for multi-qubit gates.
fn single_qubit_matrix(gate: &StandardGate) -> Option<Matrix2> {
    let phase = |theta: f64| diagonal(Complex64::from_polar(1.0, theta));
    let matrix = match *gate {
        StandardGate::I => diagonal(ONE),
        StandardGate::X => pauli_x(),
        StandardGate::Y => pauli_y(),
        StandardGate::Z => diagonal(-ONE),
        StandardGate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            [[h, h], [h, -h]]
        }
        StandardGate::S => phase(PI / 2.0),
        StandardGate::Sdg => phase(-PI / 2.0),
        StandardGate::T => phase(PI / 4.0),
        StandardGate::Tdg => phase(-PI / 4.0),
        StandardGate::P(theta) => phase(theta),
        StandardGate::Rz(theta) => rz(theta),
        StandardGate::Rx(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new(0.0, -(theta / 2.0).sin());
            [[c, s], [s, c]]
        }
        StandardGate::Ry(theta) => {
            let (s, c) = (theta / 2.0).sin_cos();
            [[c.into(), (-s).into()], [s.into(), c.into()]]
        }
        StandardGate::U(theta, phi, lambda) => {
            let (s, c) = (theta / 2.0).sin_cos();
            [
                [c.into(), -Complex64::from_polar(s, lambda)],
                [
                    Complex64::from_polar(s, phi),
                    Complex64::from_polar(c, phi + lambda),
                ],
            ]
        }
        StandardGate::CX
        | StandardGate::CY
        | StandardGate::CZ
        | StandardGate::Swap
        | StandardGate::CP(_)
        | StandardGate::CRz(_)
        | StandardGate::CCX => return None,
    };
    Some(matrix)
}
