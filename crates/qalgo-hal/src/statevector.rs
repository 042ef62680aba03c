//! Final-state results and single-qubit Bloch vectors.

use std::f64::consts::PI;
use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Amplitudes of an `n`-qubit pure state.
///
/// Little-endian: qubit `k` contributes `2^k` to a basis index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatevectorResult {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StatevectorResult {
    /// Wrap an amplitude vector whose length is a power of two.
    pub fn new(amplitudes: Vec<Complex64>) -> HalResult<Self> {
        let len = amplitudes.len();
        if !len.is_power_of_two() {
            return Err(HalError::InvalidState(format!(
                "amplitude count {len} is not a power of two"
            )));
        }
        Ok(Self {
            num_qubits: len.trailing_zeros() as usize,
            amplitudes,
        })
    }

    /// The computational basis state `|index⟩` on `num_qubits` qubits.
    pub fn basis(num_qubits: usize, index: usize) -> HalResult<Self> {
        let dim = 1usize
            .checked_shl(u32::try_from(num_qubits).unwrap_or(u32::MAX))
            .ok_or_else(|| HalError::InvalidState(format!("{num_qubits} qubits is too many")))?;
        if index >= dim {
            return Err(HalError::InvalidState(format!(
                "basis index {index} out of range for {num_qubits} qubits"
            )));
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Self::new(amplitudes)
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// All amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Outcome probabilities `|a_i|^2`.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Euclidean norm; 1 for a valid state.
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// Probability that `qubit` reads 1.
    pub fn probability_of_one(&self, qubit: usize) -> HalResult<f64> {
        let mask = self.qubit_mask(qubit)?;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum())
    }

    /// Fidelity `|⟨self|other⟩|^2`.
    pub fn fidelity(&self, other: &StatevectorResult) -> HalResult<f64> {
        self.check_dimension(other)?;
        Ok(self.inner(other).norm_sqr())
    }

    /// Compare amplitudes element-wise within `tolerance`.
    ///
    /// With `up_to_global_phase`, `other` is first rotated by the phase that
    /// best aligns it with `self`.
    pub fn approx_eq(
        &self,
        other: &StatevectorResult,
        tolerance: f64,
        up_to_global_phase: bool,
    ) -> bool {
        if self.num_qubits != other.num_qubits {
            return false;
        }
        let phase = if up_to_global_phase {
            let overlap = self.inner(other);
            if overlap.norm() < tolerance {
                return false;
            }
            // ⟨self|other⟩ = e^{iα} when other = e^{iα}·self
            overlap.conj() / overlap.norm()
        } else {
            Complex64::new(1.0, 0.0)
        };
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .all(|(a, b)| (a - b * phase).norm() <= tolerance)
    }

    /// Bloch vector of one qubit, tracing out all others.
    pub fn bloch_vector(&self, qubit: usize) -> HalResult<BlochVector> {
        let mask = self.qubit_mask(qubit)?;
        let mut p0 = 0.0;
        let mut p1 = 0.0;
        // ⟨0|ρ|1⟩ of the reduced density matrix
        let mut coherence = Complex64::new(0.0, 0.0);
        for (i, a) in self.amplitudes.iter().enumerate() {
            if i & mask == 0 {
                p0 += a.norm_sqr();
                coherence += a * self.amplitudes[i | mask].conj();
            } else {
                p1 += a.norm_sqr();
            }
        }
        Ok(BlochVector::new(
            2.0 * coherence.re,
            -2.0 * coherence.im,
            p0 - p1,
        ))
    }

    /// Ket label of basis state `index`, highest qubit first: `|100⟩`.
    pub fn basis_label(&self, index: usize) -> String {
        format!("|{index:0width$b}⟩", width = self.num_qubits)
    }

    fn inner(&self, other: &StatevectorResult) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    fn qubit_mask(&self, qubit: usize) -> HalResult<usize> {
        if qubit >= self.num_qubits {
            return Err(HalError::InvalidState(format!(
                "qubit {qubit} out of range for {} qubits",
                self.num_qubits
            )));
        }
        Ok(1 << qubit)
    }

    fn check_dimension(&self, other: &StatevectorResult) -> HalResult<()> {
        if self.num_qubits == other.num_qubits {
            Ok(())
        } else {
            Err(HalError::InvalidState(format!(
                "cannot compare {}-qubit and {}-qubit states",
                self.num_qubits, other.num_qubits
            )))
        }
    }
}

/// A point in the Bloch ball: `(⟨X⟩, ⟨Y⟩, ⟨Z⟩)`.
///
/// Pure single-qubit states lie on the surface (length 1); a qubit
/// maximally entangled with the rest of the register sits at the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate, +1 for |0⟩ and -1 for |1⟩
    pub z: f64,
}

impl BlochVector {
    /// Create a Bloch vector from Cartesian coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Bloch vector of `cos(θ/2)|0⟩ + e^{iφ} sin(θ/2)|1⟩`.
    pub fn from_angles(theta: f64, phi: f64) -> Self {
        Self {
            x: theta.sin() * phi.cos(),
            y: theta.sin() * phi.sin(),
            z: theta.cos(),
        }
    }

    /// Length of the vector: 1 for pure, below 1 for mixed states.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Check if the reduced state is pure within `tolerance`.
    pub fn is_pure(&self, tolerance: f64) -> bool {
        (self.length() - 1.0).abs() < tolerance
    }

    /// Euclidean distance to another vector.
    pub fn distance(&self, other: &BlochVector) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Polar and azimuthal angles `(θ, φ)` with `φ ∈ [0, 2π)`.
    ///
    /// The zero vector maps to `(0, 0)`.
    pub fn to_angles(&self) -> (f64, f64) {
        let r = self.length();
        if r < 1e-10 {
            return (0.0, 0.0);
        }
        let theta = (self.z / r).clamp(-1.0, 1.0).acos();
        let phi = self.y.atan2(self.x).rem_euclid(2.0 * PI);
        (theta, phi)
    }
}

impl fmt::Display for BlochVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+.4}, {:+.4}, {:+.4})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_rejects_bad_length() {
        assert!(StatevectorResult::new(vec![c(1.0, 0.0); 3]).is_err());
        assert!(StatevectorResult::basis(2, 4).is_err());
    }

    #[test]
    fn test_basis_state() {
        let state = StatevectorResult::basis(3, 4).unwrap();
        assert_eq!(state.num_qubits(), 3);
        assert_eq!(state.amplitude(4), Some(c(1.0, 0.0)));
        assert_eq!(state.basis_label(4), "|100⟩");
        assert!((state.probability_of_one(2).unwrap() - 1.0).abs() < 1e-12);
        assert!((state.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bloch_of_product_state() {
        // |+⟩ on qubit 0, |0⟩ on qubit 1
        let state =
            StatevectorResult::new(vec![c(FRAC_1_SQRT_2, 0.0), c(FRAC_1_SQRT_2, 0.0), c(0.0, 0.0), c(0.0, 0.0)])
                .unwrap();
        let q0 = state.bloch_vector(0).unwrap();
        assert!((q0.x - 1.0).abs() < 1e-10);
        assert!(q0.z.abs() < 1e-10);
        let q1 = state.bloch_vector(1).unwrap();
        assert!((q1.z - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_bloch_of_plus_i() {
        let state = StatevectorResult::new(vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, FRAC_1_SQRT_2)]).unwrap();
        let v = state.bloch_vector(0).unwrap();
        assert!((v.y - 1.0).abs() < 1e-10);
        assert!(v.distance(&BlochVector::from_angles(PI / 2.0, PI / 2.0)) < 1e-10);
    }

    #[test]
    fn test_bloch_of_bell_pair_is_mixed() {
        let bell =
            StatevectorResult::new(vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(FRAC_1_SQRT_2, 0.0)])
                .unwrap();
        let v = bell.bloch_vector(1).unwrap();
        assert!(v.length() < 1e-10);
        assert!(!v.is_pure(1e-6));
        assert!(bell.bloch_vector(2).is_err());
    }

    #[test]
    fn test_global_phase_comparison() {
        let a = StatevectorResult::new(vec![c(FRAC_1_SQRT_2, 0.0), c(FRAC_1_SQRT_2, 0.0)]).unwrap();
        let b = StatevectorResult::new(vec![c(0.0, FRAC_1_SQRT_2), c(0.0, FRAC_1_SQRT_2)]).unwrap();
        assert!(!a.approx_eq(&b, 1e-9, false));
        assert!(a.approx_eq(&b, 1e-9, true));
        assert!((a.fidelity(&b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_global_phase_arbitrary_angle() {
        let a = StatevectorResult::new(vec![c(0.6, 0.0), c(0.0, 0.8)]).unwrap();
        let phase = Complex64::from_polar(1.0, PI / 3.0);
        let b = StatevectorResult::new(a.amplitudes().iter().map(|x| x * phase).collect())
            .unwrap();
        assert!(a.approx_eq(&b, 1e-9, true));
        assert!(b.approx_eq(&a, 1e-9, true));
        assert!(!a.approx_eq(&b, 1e-9, false));

        let other = StatevectorResult::new(vec![c(0.8, 0.0), c(0.0, 0.6)]).unwrap();
        assert!(!a.approx_eq(&other, 1e-9, true));
    }

    #[test]
    fn test_angles_round_trip() {
        let v = BlochVector::from_angles(1.1, 4.0);
        let (theta, phi) = v.to_angles();
        assert!((theta - 1.1).abs() < 1e-10);
        assert!((phi - 4.0).abs() < 1e-10);
        assert_eq!(BlochVector::new(0.0, 0.0, 0.0).to_angles(), (0.0, 0.0));
    }
}
