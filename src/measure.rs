//! Quantum measurement operations.
//!
//! This module provides functions for measuring quantum states in the computational basis.
//!
//! # Overview
//!
//! - [`probs`] - Get probability distribution over computational basis
//! - [`measure`] - Sample measurement outcomes without collapsing state
//! - [`measure_and_collapse`] - Measure and collapse state to the outcome
//! - [`collapse_to`] - Collapse state to a specific outcome (post-selection)
//!
//! Outcomes over a register are reported as bits in register order, so
//! `locs[0]` comes first.

use num_complex::Complex64;
use rand::Rng;

use crate::index::{bits_to_index, decode_register, index_to_bits, read_bit};
use crate::state::State;

/// Compute probability distribution over computational basis.
///
/// If `locs` is `None`, returns probabilities for all qubits.
/// If `locs` is `Some(&[...])`, returns marginal probabilities indexed by
/// the register value of `locs` (with `locs[0]` as the MSB).
///
/// # Example
/// ```
/// use shor_sim::{State, measure::probs};
///
/// // |+⟩ state has 50% probability for |0⟩ and |1⟩
/// let state = State::new(
///     1,
///     ndarray::array![
///         num_complex::Complex64::new(1.0/2.0_f64.sqrt(), 0.0),
///         num_complex::Complex64::new(1.0/2.0_f64.sqrt(), 0.0),
///     ],
/// );
/// let p = probs(&state, None);
/// assert!((p[0] - 0.5).abs() < 1e-10);
/// assert!((p[1] - 0.5).abs() < 1e-10);
/// ```
pub fn probs(state: &State, locs: Option<&[usize]>) -> Vec<f64> {
    match locs {
        None => state.data.iter().map(|c| c.norm_sqr()).collect(),
        Some(locs) => marginal_probs(state, locs),
    }
}

fn marginal_probs(state: &State, locs: &[usize]) -> Vec<f64> {
    let mut prob_vec = vec![0.0; 1usize << locs.len()];
    for (flat_idx, amp) in state.data.iter().enumerate() {
        let k = decode_register(flat_idx, state.num_qubits, locs) as usize;
        prob_vec[k] += amp.norm_sqr();
    }
    prob_vec
}

/// Sample an index from a probability distribution.
fn sample_from_probs(probs: &[f64], rng: &mut impl Rng) -> usize {
    let r: f64 = rng.r#gen();
    let mut cumsum = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return i;
        }
    }
    // rounding can leave cumsum just below r; fall back to the last populated outcome
    probs.iter().rposition(|&p| p > 0.0).unwrap_or(probs.len() - 1)
}

/// Sample measurement outcomes without collapsing state.
///
/// Each result is the list of qubit values for `locs` (all qubits for `None`).
///
/// # Example
/// ```
/// use shor_sim::{State, measure::measure};
/// use rand::SeedableRng;
///
/// let state = State::zero_state(2); // |00⟩
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// for result in measure(&state, None, 10, &mut rng) {
///     assert_eq!(result, vec![0, 0]);
/// }
/// ```
pub fn measure(
    state: &State,
    locs: Option<&[usize]>,
    nshots: usize,
    rng: &mut impl Rng,
) -> Vec<Vec<usize>> {
    let p = probs(state, locs);
    let width = locs.map_or(state.num_qubits, |l| l.len());

    (0..nshots)
        .map(|_| index_to_bits(sample_from_probs(&p, rng), width))
        .collect()
}

/// Measure and collapse state to the measured outcome.
///
/// The state is modified in place and renormalized.
/// Returns the measured qubit values for `locs` (all qubits for `None`).
pub fn measure_and_collapse(
    state: &mut State,
    locs: Option<&[usize]>,
    rng: &mut impl Rng,
) -> Vec<usize> {
    let p = probs(state, locs);
    let width = locs.map_or(state.num_qubits, |l| l.len());
    let result = index_to_bits(sample_from_probs(&p, rng), width);

    let locs_vec: Vec<usize> = match locs {
        None => (0..state.num_qubits).collect(),
        Some(l) => l.to_vec(),
    };

    collapse_to(state, &locs_vec, &result);
    result
}

/// Collapse state to a specific outcome (post-selection).
///
/// This sets all amplitudes that don't match the specified outcome to zero,
/// then renormalizes the remaining amplitudes.
///
/// # Panics
/// Panics if `locs` and `values` have different lengths.
pub fn collapse_to(state: &mut State, locs: &[usize], values: &[usize]) {
    assert_eq!(
        locs.len(),
        values.len(),
        "locs and values must have the same length"
    );

    let n = state.num_qubits;
    let mut norm_sq = 0.0;

    for (flat_idx, amp) in state.data.iter_mut().enumerate() {
        let matches = locs
            .iter()
            .zip(values.iter())
            .all(|(&loc, &val)| read_bit(flat_idx, n, loc) == val);

        if matches {
            norm_sq += amp.norm_sqr();
        } else {
            *amp = Complex64::new(0.0, 0.0);
        }
    }

    let norm = f64::sqrt(norm_sq);
    if norm > 1e-15 {
        for amp in state.data.iter_mut() {
            *amp /= norm;
        }
    }
}

/// Flat index of a full-register measurement result.
pub fn outcome_index(bits: &[usize]) -> usize {
    bits_to_index(bits)
}
