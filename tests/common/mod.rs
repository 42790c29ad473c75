//! Shared test utilities for shor-sim integration tests.

use ndarray::Array1;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shor_sim::index::{decode_register, read_bit};
use shor_sim::State;

// ==================== Random States ====================

/// Random normalized state on `num_qubits` qubits.
#[allow(dead_code)]
pub fn random_state(num_qubits: usize, seed: u64) -> State {
    random_state_where(num_qubits, seed, |_| true)
}

/// Random normalized state supported only on indices accepted by `keep`.
#[allow(dead_code)]
pub fn random_state_where(num_qubits: usize, seed: u64, keep: impl Fn(usize) -> bool) -> State {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data: Array1<Complex64> = (0..1usize << num_qubits)
        .map(|i| {
            let amp = Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            if keep(i) { amp } else { Complex64::new(0.0, 0.0) }
        })
        .collect();

    let norm = data.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    data.mapv_inplace(|c| c / norm);
    State::new(num_qubits, data)
}

/// Random state whose target register only holds values below `modulus`.
///
/// This is the subspace on which multiplication by a unit mod `modulus`
/// is a permutation.
#[allow(dead_code)]
pub fn random_state_below(num_qubits: usize, targets: &[usize], modulus: u64, seed: u64) -> State {
    random_state_where(num_qubits, seed, |i| decode_register(i, num_qubits, targets) < modulus)
}

/// Random state with `control` clear everywhere.
#[allow(dead_code)]
pub fn random_state_control_clear(num_qubits: usize, control: usize, seed: u64) -> State {
    random_state_where(num_qubits, seed, |i| read_bit(i, num_qubits, control) == 0)
}

// ==================== State Comparison ====================

/// Assert that two state vectors (Array1<Complex64>) are close element-wise.
#[allow(dead_code)]
pub fn assert_states_close(a: &Array1<Complex64>, b: &Array1<Complex64>) {
    const ATOL: f64 = 1e-10;
    assert_eq!(
        a.len(),
        b.len(),
        "State vectors have different lengths: {} vs {}",
        a.len(),
        b.len()
    );
    for (i, (av, bv)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (av - bv).norm();
        assert!(
            diff < ATOL,
            "States differ at index {}: got {:?}, expected {:?}, diff = {}",
            i,
            av,
            bv,
            diff
        );
    }
}

/// Assert that two state vectors are bit-for-bit equal.
#[allow(dead_code)]
pub fn assert_states_exact(a: &Array1<Complex64>, b: &Array1<Complex64>) {
    assert_eq!(a.len(), b.len());
    for (i, (av, bv)) in a.iter().zip(b.iter()).enumerate() {
        assert_eq!(av, bv, "States differ at index {}", i);
    }
}

/// Total probability mass of an amplitude vector.
#[allow(dead_code)]
pub fn norm_sqr(data: &Array1<Complex64>) -> f64 {
    data.iter().map(|c| c.norm_sqr()).sum()
}
