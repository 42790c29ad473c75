//! Controlled modular exponentiation, the arithmetic step of Shor's algorithm.
//!
//! For a control qubit at list position `j` the gate maps
//! `|1⟩|k⟩ -> |1⟩|a^(2^j)·k mod N⟩` on the target register and leaves the
//! control-clear subspace alone. It is a permutation of basis states, so
//! it is applied as a scatter over the flat amplitude vector rather than as
//! a matrix.
//!
//! Targets whose register is wider than `N` needs still pass values `k ≥ N`
//! through `factor·k mod N`. Several sources can then land on the same
//! destination, which is why amplitudes are accumulated, never assigned.

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::GateError;
use crate::index::{bit_shift, qubit_mask, MAX_QUBITS};
use crate::number::{mod_exp2, mod_inverse, mul_mod};
use crate::state::{num_qubits_for, State};

/// Precomputed index map of one single-control application.
#[derive(Debug, Clone)]
struct Router {
    control_mask: usize,
    target_shifts: Vec<usize>,
    target_mask: usize,
    factor: u64,
    modulus: u64,
}

impl Router {
    fn new(num_qubits: usize, a: u64, j: usize, modulus: u64, control: usize, targets: &[usize]) -> Self {
        debug_assert!(modulus > 0, "modulus must be positive");
        debug_assert!(control < num_qubits, "control {} out of range", control);
        debug_assert!(!targets.contains(&control), "control {} is also a target", control);

        let target_shifts: Vec<usize> = targets.iter().map(|&t| bit_shift(num_qubits, t)).collect();
        let target_mask = target_shifts.iter().fold(0usize, |m, &s| m | (1usize << s));

        Router {
            control_mask: qubit_mask(num_qubits, control),
            target_shifts,
            target_mask,
            factor: mod_exp2(a, j, modulus),
            modulus,
        }
    }

    /// Destination index of basis state `i`.
    #[inline]
    fn route(&self, i: usize) -> usize {
        if i & self.control_mask == 0 {
            return i;
        }

        // binary to integer, first target is the MSB
        let k = self
            .target_shifts
            .iter()
            .fold(0u64, |k, &s| (k << 1) | ((i >> s) & 1) as u64);

        let k = mul_mod(self.factor, k, self.modulus);

        // integer to binary, into the same positions
        let width = self.target_shifts.len();
        self.target_shifts
            .iter()
            .enumerate()
            .fold(i & !self.target_mask, |idx, (j, &s)| {
                idx | ((((k >> (width - 1 - j)) & 1) as usize) << s)
            })
    }
}

/// Apply `|j⟩|k⟩ -> |j⟩|a^(2^j)·k mod N⟩` controlled by a single qubit.
///
/// Returns a newly allocated vector; `amplitudes` is only read. Inputs are
/// trusted: out-of-range or overlapping positions and `modulus == 0` are
/// caught by [`ModExp2::new`] and [`cmod_exp2`], not here.
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use shor_sim::modexp::controlled_mod_exp2;
/// use shor_sim::State;
///
/// // control q0 = 1, target q1..q3 = 1; 2^(2^0) * 1 mod 7 = 2
/// let state = State::product_state(&[1, 0, 0, 1]);
/// let out = controlled_mod_exp2(state.data.as_slice().unwrap(), 4, 2, 0, 7, 0, &[1, 2, 3]);
/// assert_eq!(out[0b1010], Complex64::new(1.0, 0.0));
/// ```
pub fn controlled_mod_exp2(
    amplitudes: &[Complex64],
    num_qubits: usize,
    a: u64,
    j: usize,
    modulus: u64,
    control: usize,
    targets: &[usize],
) -> Array1<Complex64> {
    debug_assert_eq!(amplitudes.len(), 1usize << num_qubits);
    let router = Router::new(num_qubits, a, j, modulus, control, targets);
    tracing::trace!(control, j, factor = router.factor, "controlled modexp");

    let mut new_state = Array1::zeros(amplitudes.len());
    for (i, &amp) in amplitudes.iter().enumerate() {
        new_state[router.route(i)] += amp;
    }
    new_state
}

/// Parallel form of [`controlled_mod_exp2`].
///
/// Destinations are computed in parallel; amplitudes are then merged in
/// source order, so the output is bit-identical to the sequential kernel.
#[cfg(feature = "parallel")]
pub fn par_controlled_mod_exp2(
    amplitudes: &[Complex64],
    num_qubits: usize,
    a: u64,
    j: usize,
    modulus: u64,
    control: usize,
    targets: &[usize],
) -> Array1<Complex64> {
    use rayon::prelude::*;

    debug_assert_eq!(amplitudes.len(), 1usize << num_qubits);
    let router = Router::new(num_qubits, a, j, modulus, control, targets);

    let destinations: Vec<usize> = (0..amplitudes.len())
        .into_par_iter()
        .map(|i| router.route(i))
        .collect();

    let mut new_state = Array1::zeros(amplitudes.len());
    for (&dest, &amp) in destinations.iter().zip(amplitudes) {
        new_state[dest] += amp;
    }
    new_state
}

/// Controlled modular exponentiation over a whole control register.
///
/// Control `controls[j]` multiplies the target register by `a^(2^j) mod N`.
/// The qubit count is taken from the vector length, which must be a power
/// of two. Each step consumes the previous step's output.
///
/// # Errors
/// Returns a [`GateError`] if the vector length or any qubit position,
/// register or modulus is invalid. Nothing is computed in that case.
///
/// # Example
/// ```
/// use shor_sim::modexp::cmod_exp2;
/// use shor_sim::State;
///
/// let state = State::product_state(&[1, 0, 0, 1]);
/// let out = cmod_exp2(state.data, 2, 7, &[0], &[1, 2, 3]).unwrap();
/// assert_eq!(out[0b1010].re, 1.0);
/// ```
pub fn cmod_exp2(
    amplitudes: Array1<Complex64>,
    a: u64,
    modulus: u64,
    controls: &[usize],
    targets: &[usize],
) -> Result<Array1<Complex64>, GateError> {
    let num_qubits = num_qubits_for(amplitudes.len())?;
    let gate = ModExp2::new(num_qubits, a, modulus, controls.to_vec(), targets.to_vec())?;
    Ok(gate.apply_to(amplitudes))
}

/// Validated controlled modular-exponentiation gate.
///
/// Construction checks every precondition so that applying the gate
/// cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModExp2 {
    num_qubits: usize,
    a: u64,
    modulus: u64,
    controls: Vec<usize>,
    targets: Vec<usize>,
}

impl ModExp2 {
    /// Creates the gate on a register of `num_qubits` qubits.
    ///
    /// # Errors
    /// - [`GateError::InvalidModulus`] if `modulus == 0`
    /// - [`GateError::TooManyQubits`] if `num_qubits > MAX_QUBITS`
    /// - [`GateError::QubitOutOfRange`] for any position `>= num_qubits`
    /// - [`GateError::DuplicateQubit`] if a register repeats a position
    /// - [`GateError::OverlappingQubits`] if controls and targets share positions
    /// - [`GateError::RegisterTooNarrow`] if `modulus > 2^targets.len()`
    pub fn new(
        num_qubits: usize,
        a: u64,
        modulus: u64,
        controls: Vec<usize>,
        targets: Vec<usize>,
    ) -> Result<Self, GateError> {
        if modulus == 0 {
            return Err(GateError::InvalidModulus(modulus));
        }
        if num_qubits > MAX_QUBITS {
            return Err(GateError::TooManyQubits { num_qubits, max: MAX_QUBITS });
        }

        for register in [&controls, &targets] {
            let mut seen = vec![false; num_qubits];
            for &loc in register.iter() {
                if loc >= num_qubits {
                    return Err(GateError::QubitOutOfRange { loc, num_qubits });
                }
                if seen[loc] {
                    return Err(GateError::DuplicateQubit(loc));
                }
                seen[loc] = true;
            }
        }

        let overlapping: Vec<usize> = controls.iter().copied().filter(|c| targets.contains(c)).collect();
        if !overlapping.is_empty() {
            return Err(GateError::OverlappingQubits(overlapping));
        }

        let width = targets.len();
        if width < u64::BITS as usize && modulus > (1u64 << width) {
            return Err(GateError::RegisterTooNarrow { width, modulus });
        }

        Ok(ModExp2 { num_qubits, a, modulus, controls, targets })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn base(&self) -> u64 {
        self.a
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn controls(&self) -> &[usize] {
        &self.controls
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// `a^(2^j) mod N` for each control position `j`.
    pub fn factors(&self) -> Vec<u64> {
        (0..self.controls.len())
            .map(|j| mod_exp2(self.a, j, self.modulus))
            .collect()
    }

    /// The gate that undoes this one, built on `a^{-1} mod N`.
    ///
    /// Returns `None` when `a` has no inverse modulo `N`. Since
    /// `(a^{-1})^(2^j) = (a^(2^j))^{-1}`, every control step is inverted.
    pub fn inverse(&self) -> Option<Self> {
        let a_inv = mod_inverse(self.a % self.modulus, self.modulus)?;
        Some(ModExp2 { a: a_inv, ..self.clone() })
    }

    /// Applies the gate to `amplitudes`, consuming them and returning the new vector.
    ///
    /// # Panics
    /// Panics if `amplitudes` does not have `2^num_qubits` entries.
    pub fn apply_to(&self, amplitudes: Array1<Complex64>) -> Array1<Complex64> {
        assert_eq!(
            amplitudes.len(),
            1usize << self.num_qubits,
            "amplitude vector does not match the gate's register"
        );

        let mut current = amplitudes;
        for (j, &control) in self.controls.iter().enumerate() {
            // the scan reads a contiguous copy when the input is not standard layout
            let next = match current.as_slice() {
                Some(slice) => self.step(slice, j, control),
                None => self.step(&current.to_vec(), j, control),
            };
            current = next;
        }
        current
    }

    /// Applies the gate to `state` and installs the result as its amplitudes.
    ///
    /// # Errors
    /// Returns [`GateError::DimensionMismatch`] if `state` is not a register
    /// of `num_qubits` qubits; the state is left unchanged.
    pub fn apply(&self, state: &mut State) -> Result<(), GateError> {
        let expected = 1usize << self.num_qubits;
        if state.num_qubits != self.num_qubits || state.total_dim() != expected {
            return Err(GateError::DimensionMismatch { expected, actual: state.total_dim() });
        }
        let new_data = self.apply_to(state.take());
        state.install(new_data);
        Ok(())
    }

    fn step(&self, amplitudes: &[Complex64], j: usize, control: usize) -> Array1<Complex64> {
        #[cfg(feature = "parallel")]
        {
            par_controlled_mod_exp2(amplitudes, self.num_qubits, self.a, j, self.modulus, control, &self.targets)
        }
        #[cfg(not(feature = "parallel"))]
        {
            controlled_mod_exp2(amplitudes, self.num_qubits, self.a, j, self.modulus, control, &self.targets)
        }
    }
}
