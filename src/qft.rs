//! Quantum Fourier transform over an ordered register.
//!
//! `locs[0]` is the most significant qubit of the register. The transform
//! is applied in place gate by gate:
//! for each qubit i, H on `locs[i]` followed by controlled-Phase(2π/2^(j+1))
//! with control `locs[i+j]`, then SWAPs reversing the register.

use std::f64::consts::PI;

use crate::gate::Gate;
use crate::instruct::{instruct_controlled_phase, instruct_gate, instruct_swap};
use crate::state::State;

fn phase_angle(j: usize) -> f64 {
    2.0 * PI / (1u64 << (j + 1)) as f64
}

/// Apply the QFT to register `locs`.
pub fn qft(state: &mut State, locs: &[usize]) {
    let n = locs.len();

    for i in 0..n {
        instruct_gate(state, Gate::H, locs[i]);
        for j in 1..(n - i) {
            instruct_controlled_phase(state, phase_angle(j), locs[i + j], locs[i]);
        }
    }

    for i in 0..(n / 2) {
        instruct_swap(state, locs[i], locs[n - 1 - i]);
    }
}

/// Apply the inverse QFT to register `locs`.
///
/// The adjoint of [`qft`]: SWAPs first, then the rotation layers in reverse
/// order with negated angles.
pub fn inv_qft(state: &mut State, locs: &[usize]) {
    let n = locs.len();

    for i in 0..(n / 2) {
        instruct_swap(state, locs[i], locs[n - 1 - i]);
    }

    for i in (0..n).rev() {
        for j in (1..(n - i)).rev() {
            instruct_controlled_phase(state, -phase_angle(j), locs[i + j], locs[i]);
        }
        instruct_gate(state, Gate::H, locs[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_qft_of_zero_is_uniform() {
        let mut state = State::zero_state(3);
        qft(&mut state, &[0, 1, 2]);
        let amp = 1.0 / 8f64.sqrt();
        for a in state.data.iter() {
            assert!((a - Complex64::new(amp, 0.0)).norm() < 1e-10);
        }
    }

    #[test]
    fn test_qft_phases_follow_input() {
        // QFT|x⟩ = Σ_y e^(2πi xy/2^n)|y⟩ / √2^n with x = 1
        let n = 3;
        let mut state = State::product_state(&[0, 0, 1]);
        qft(&mut state, &[0, 1, 2]);
        let norm = 1.0 / 8f64.sqrt();
        for y in 0..8 {
            let expected = Complex64::from_polar(norm, 2.0 * PI * y as f64 / (1 << n) as f64);
            assert!((state.data[y] - expected).norm() < 1e-10, "y = {}", y);
        }
    }

    #[test]
    fn test_inv_qft_undoes_qft_on_sub_register() {
        let mut state = State::product_state(&[1, 0, 1, 1]);
        let original = state.data.clone();
        qft(&mut state, &[3, 1, 0]);
        inv_qft(&mut state, &[3, 1, 0]);
        for (a, b) in state.data.iter().zip(original.iter()) {
            assert!((a - b).norm() < 1e-10);
        }
    }
}
