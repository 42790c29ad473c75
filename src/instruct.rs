//! Primitive amplitude operations for state vector simulation.
//!
//! These functions update amplitudes in place; none allocates a new
//! vector. Qubit positions follow the big-endian convention of
//! [`crate::index`].

use ndarray::Array2;
use num_complex::Complex64;

use crate::gate::Gate;
use crate::index::qubit_mask;
use crate::state::State;

/// Apply a 2x2 unitary gate to a pair of amplitudes at indices i and j.
///
/// The gate matrix is [[a, b], [c, d]] and transforms:
/// - new_i = a * state[i] + b * state[j]
/// - new_j = c * state[i] + d * state[j]
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use shor_sim::gate::Gate;
/// use shor_sim::instruct::u1rows;
///
/// let mut state = vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
/// u1rows(&mut state, 0, 1, &Gate::X.matrix());
/// assert!((state[1].norm() - 1.0).abs() < 1e-10);
/// ```
pub fn u1rows(state: &mut [Complex64], i: usize, j: usize, gate: &Array2<Complex64>) {
    debug_assert_eq!(gate.dim(), (2, 2));

    let old_i = state[i];
    let old_j = state[j];

    state[i] = gate[[0, 0]] * old_i + gate[[0, 1]] * old_j;
    state[j] = gate[[1, 0]] * old_i + gate[[1, 1]] * old_j;
}

/// Apply a 2x2 gate matrix to qubit `loc`.
///
/// Every index with the `loc` bit clear is paired with the index that has
/// it set, and the pair is updated with [`u1rows`].
pub fn instruct_single(state: &mut State, gate: &Array2<Complex64>, loc: usize) {
    let mask = qubit_mask(state.num_qubits, loc);
    let data = state.data.as_slice_mut().expect("statevector is contiguous");

    for i in 0..data.len() {
        if i & mask == 0 {
            u1rows(data, i, i | mask, gate);
        }
    }
}

/// Apply a diagonal gate `diag(phases[0], phases[1])` to qubit `loc`.
pub fn instruct_diagonal(state: &mut State, phases: &[Complex64; 2], loc: usize) {
    let mask = qubit_mask(state.num_qubits, loc);

    for (i, amp) in state.data.iter_mut().enumerate() {
        *amp *= phases[usize::from(i & mask != 0)];
    }
}

/// Apply a named gate to qubit `loc`, using the diagonal path when possible.
///
/// # Example
/// ```
/// use shor_sim::gate::Gate;
/// use shor_sim::instruct::instruct_gate;
/// use shor_sim::State;
///
/// // X on qubit 1 of |00> gives |01>
/// let mut state = State::zero_state(2);
/// instruct_gate(&mut state, Gate::X, 1);
/// assert!((state.data[1].norm() - 1.0).abs() < 1e-10);
/// ```
pub fn instruct_gate(state: &mut State, gate: Gate, loc: usize) {
    match gate.diagonal() {
        Some(phases) => instruct_diagonal(state, &phases, loc),
        None => instruct_single(state, &gate.matrix(), loc),
    }
}

/// Multiply by `e^(iθ)` every amplitude whose `control` and `target` bits are both set.
///
/// The controlled phase is symmetric in its two qubits.
pub fn instruct_controlled_phase(state: &mut State, theta: f64, control: usize, target: usize) {
    debug_assert_ne!(control, target);
    let mask = qubit_mask(state.num_qubits, control) | qubit_mask(state.num_qubits, target);
    let phase = Complex64::from_polar(1.0, theta);

    for (i, amp) in state.data.iter_mut().enumerate() {
        if i & mask == mask {
            *amp *= phase;
        }
    }
}

/// Exchange qubits `a` and `b`.
pub fn instruct_swap(state: &mut State, a: usize, b: usize) {
    if a == b {
        return;
    }
    let mask_a = qubit_mask(state.num_qubits, a);
    let mask_b = qubit_mask(state.num_qubits, b);

    for i in 0..state.total_dim() {
        // visit each differing pair once, from the side with `a` set
        if i & mask_a != 0 && i & mask_b == 0 {
            state.data.swap(i, i ^ mask_a ^ mask_b);
        }
    }
}
