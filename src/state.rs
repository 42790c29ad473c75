use ndarray::Array1;
use num_complex::Complex64;

use crate::error::GateError;
use crate::index::{bits_to_index, MAX_QUBITS};

/// Dense statevector of a qubit register.
///
/// `data[i]` is the amplitude of the basis state whose big-endian bits
/// are `i` (see [`crate::index`]).
#[derive(Debug, Clone)]
pub struct State {
    pub num_qubits: usize,
    pub data: Array1<Complex64>,
}

impl State {
    /// Wraps an amplitude vector of `2^num_qubits` entries.
    ///
    /// # Panics
    /// Panics if the vector length is not `2^num_qubits`.
    pub fn new(num_qubits: usize, data: Array1<Complex64>) -> Self {
        assert!(num_qubits <= MAX_QUBITS, "{} qubits exceeds {}", num_qubits, MAX_QUBITS);
        assert_eq!(
            data.len(),
            1usize << num_qubits,
            "amplitude vector length must be 2^num_qubits"
        );
        State { num_qubits, data }
    }

    /// Wraps an amplitude vector, inferring the qubit count from its length.
    pub fn from_amplitudes(data: Array1<Complex64>) -> Result<Self, GateError> {
        let num_qubits = num_qubits_for(data.len())?;
        Ok(State { num_qubits, data })
    }

    /// Creates |0,0,...,0>
    pub fn zero_state(num_qubits: usize) -> Self {
        Self::product_state(&vec![0; num_qubits])
    }

    /// Creates |b_0, b_1, ..., b_{n-1}> with qubit 0 first.
    pub fn product_state(bits: &[usize]) -> Self {
        let num_qubits = bits.len();
        assert!(num_qubits <= MAX_QUBITS, "{} qubits exceeds {}", num_qubits, MAX_QUBITS);
        for (loc, &b) in bits.iter().enumerate() {
            assert!(b < 2, "bit[{}] = {} is not a qubit value", loc, b);
        }

        let mut data = Array1::zeros(1usize << num_qubits);
        data[bits_to_index(bits)] = Complex64::new(1.0, 0.0);
        State { num_qubits, data }
    }

    /// L2 norm of the state vector
    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Total probability mass, 1 for a normalized state.
    pub fn norm_sqr(&self) -> f64 {
        self.data.iter().map(|c| c.norm_sqr()).sum::<f64>()
    }

    /// Length of the data vector
    pub fn total_dim(&self) -> usize {
        self.data.len()
    }

    /// Moves the amplitude vector out, leaving an empty one behind.
    ///
    /// Pair with [`State::install`] to hand the vector to a by-value gate.
    pub fn take(&mut self) -> Array1<Complex64> {
        std::mem::replace(&mut self.data, Array1::zeros(0))
    }

    /// Installs `data` as the current amplitudes and returns the previous vector.
    ///
    /// # Panics
    /// Panics if `data` does not have `2^num_qubits` entries.
    pub fn install(&mut self, data: Array1<Complex64>) -> Array1<Complex64> {
        assert_eq!(
            data.len(),
            1usize << self.num_qubits,
            "replacement vector must keep the register size"
        );
        std::mem::replace(&mut self.data, data)
    }
}

/// Qubit count for an amplitude vector of `len` entries.
pub(crate) fn num_qubits_for(len: usize) -> Result<usize, GateError> {
    if !len.is_power_of_two() {
        return Err(GateError::InvalidDimension(len));
    }
    Ok(len.trailing_zeros() as usize)
}
