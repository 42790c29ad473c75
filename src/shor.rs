//! Shor's factoring algorithm on the statevector simulator.
//!
//! [`factorize`] screens the input classically, runs phase estimation of
//! `k -> a·k mod N` on `t + bitlen(N)` qubits, measures, and recovers
//! factors from the measured phase with continued fractions.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::error::ShorError;
use crate::gate::Gate;
use crate::index::{decode_register, register_bits};
use crate::instruct::instruct_gate;
use crate::measure::{measure_and_collapse, outcome_index};
use crate::modexp::ModExp2;
use crate::number::{base_exp, bit_length, coprime, find_order, gcd, is_prime, is_trivial, mod_exp};
use crate::qft::inv_qft;
use crate::state::State;

fn default_t() -> usize {
    3
}

fn default_max_qubits() -> usize {
    24
}

/// Parameters of one factorization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShorConfig {
    /// Number to factor.
    #[serde(rename = "N")]
    pub n: u64,
    /// Precision bits of the phase register.
    #[serde(default = "default_t")]
    pub t: usize,
    /// Base; a random coprime of `n` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<u64>,
    /// Seed for the coprime draw and the measurement; entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Largest register the simulation may allocate.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,
}

impl ShorConfig {
    pub fn new(n: u64) -> Self {
        ShorConfig {
            n,
            t: default_t(),
            a: None,
            seed: None,
            max_qubits: default_max_qubits(),
        }
    }

    pub fn with_t(mut self, t: usize) -> Self {
        self.t = t;
        self
    }

    pub fn with_a(mut self, a: u64) -> Self {
        self.a = Some(a);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }
}

/// Outcome of one run of the quantum algorithm.
///
/// `p` and `q` are present only when non-trivial factors were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factorization {
    #[serde(rename = "N")]
    pub n: u64,
    pub t: usize,
    pub a: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Measured phase as a binary fraction, e.g. `"0.010"`.
    pub m: String,
    /// Convergent of the phase, e.g. `"1/4"`.
    #[serde(rename = "s/r")]
    pub s_r: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<u64>,
}

impl Factorization {
    pub fn is_success(&self) -> bool {
        self.p.is_some() && self.q.is_some()
    }
}

/// Qubit layout of the order-finding circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    /// Phase register; `r0[j]` controls multiplication by `a^(2^j)`.
    pub r0: Vec<usize>,
    /// Work register holding `a^x mod N`, MSB first.
    pub r1: Vec<usize>,
}

impl Registers {
    pub fn new(t: usize, n: u64) -> Self {
        let width = bit_length(n);
        Registers {
            r0: (0..t).collect(),
            r1: (t..t + width).collect(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.r0.len() + self.r1.len()
    }

    /// The phase register read with control position `j` at weight `2^j`.
    pub fn phase_register(&self) -> Vec<usize> {
        self.r0.iter().rev().copied().collect()
    }
}

/// Checks `n` and `a` before any simulation, returning the base to use.
///
/// Rejects `n < 2`, primes, even numbers and perfect powers, then draws a
/// random coprime from `rng` if `a` is `None`, and finally rejects bases
/// outside `(1, n)` or sharing a factor with `n`.
pub fn screen(n: u64, a: Option<u64>, rng: &mut StdRng) -> Result<u64, ShorError> {
    if n < 2 {
        return Err(ShorError::TooSmall(n));
    }
    if is_prime(n) {
        return Err(ShorError::Prime(n));
    }
    if n % 2 == 0 {
        return Err(ShorError::Even { n, p: 2, q: n / 2 });
    }
    if let Some((base, exp)) = base_exp(n) {
        return Err(ShorError::PerfectPower { n, base, exp });
    }

    let a = match a {
        Some(a) => a,
        None => {
            // n is an odd composite here, so n >= 15 and a coprime exists
            let a = coprime(n, rng).ok_or(ShorError::TooSmall(n))?;
            debug!(n, a, "picked random coprime");
            a
        }
    };

    if a < 2 || a > n - 1 {
        return Err(ShorError::BaseOutOfRange { n, a });
    }
    if gcd(n, a) != 1 {
        return Err(ShorError::NotCoprime { n, a });
    }
    Ok(a)
}

/// Prepares `|0…0⟩|0…01⟩`, applies H to `r0`, the controlled modular
/// exponentiation, and the inverse QFT on the phase register.
///
/// The returned state is ready for measurement.
pub fn order_finding_state(a: u64, n: u64, registers: &Registers) -> Result<State, ShorError> {
    let mut state = {
        let _span = info_span!("init registers", qubits = registers.num_qubits()).entered();
        State::zero_state(registers.num_qubits())
    };

    if let Some(&last) = registers.r1.last() {
        let _span = info_span!("x").entered();
        instruct_gate(&mut state, Gate::X, last);
    }

    {
        let _span = info_span!("hadamard").entered();
        for &loc in &registers.r0 {
            instruct_gate(&mut state, Gate::H, loc);
        }
    }

    {
        let _span = info_span!("cmod_exp2", a, n).entered();
        let gate = ModExp2::new(
            registers.num_qubits(),
            a,
            n,
            registers.r0.clone(),
            registers.r1.clone(),
        )?;
        gate.apply(&mut state)?;
    }

    {
        let _span = info_span!("inv_qft").entered();
        inv_qft(&mut state, &registers.phase_register());
    }

    Ok(state)
}

/// Factor `config.n` with one run of Shor's algorithm.
///
/// # Errors
/// Returns a [`ShorError`] when screening rejects the input or the register
/// would exceed `config.max_qubits`. A run that measures an unhelpful phase
/// is not an error: the result simply has no `p`/`q`.
///
/// # Example
/// ```
/// use shor_sim::shor::{factorize, ShorConfig};
///
/// let out = factorize(&ShorConfig::new(15).with_a(7).with_seed(1)).unwrap();
/// assert_eq!(out.a, 7);
/// if out.is_success() {
///     assert_eq!(out.p.unwrap() * out.q.unwrap(), 15);
/// }
/// ```
pub fn factorize(config: &ShorConfig) -> Result<Factorization, ShorError> {
    let ShorConfig { n, t, seed, max_qubits, .. } = *config;
    debug!(n, t, a = ?config.a, seed = ?seed, "factorize");

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let a = {
        let _span = info_span!("screening", n).entered();
        let a = screen(n, config.a, &mut rng)?;
        if t == 0 {
            return Err(ShorError::InvalidPrecision(t));
        }
        a
    };

    let registers = Registers::new(t, n);
    let required = registers.num_qubits();
    if required > max_qubits {
        return Err(ShorError::QubitBudgetExceeded { required, max_qubits });
    }

    let (phase, m) = {
        let _span = info_span!("quantum algorithm", n, a, t).entered();
        let mut state = order_finding_state(a, n, &registers)?;

        let _measure = info_span!("measure").entered();
        let bits = measure_and_collapse(&mut state, None, &mut rng);
        let index = outcome_index(&bits);
        let phase_register = registers.phase_register();
        let phase = decode_register(index, registers.num_qubits(), &phase_register);
        let m = register_bits(index, registers.num_qubits(), &phase_register);
        debug!(phase, m = %m, "measured phase register");
        (phase, m)
    };

    let _span = info_span!("find factors").entered();
    let order = find_order(a, n, phase, t);
    let mut out = Factorization {
        n,
        t,
        a,
        seed,
        m: format!("0.{}", m),
        s_r: format!("{}/{}", order.s, order.r),
        p: None,
        q: None,
    };

    if !order.found || order.r % 2 == 1 {
        debug!(s = order.s, r = order.r, found = order.found, "no usable order");
        return Ok(out);
    }

    let x = mod_exp(a, order.r / 2, n);
    let p = gcd((x + n - 1) % n, n);
    let q = gcd((x + 1) % n, n);
    if is_trivial(n, &[p, q]) {
        debug!(p, q, "trivial factors");
        return Ok(out);
    }

    out.p = Some(p);
    out.q = Some(q);
    debug!(p, q, "found factors");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_layout() {
        let regs = Registers::new(3, 15);
        assert_eq!(regs.r0, vec![0, 1, 2]);
        assert_eq!(regs.r1, vec![3, 4, 5, 6]);
        assert_eq!(regs.num_qubits(), 7);
        assert_eq!(regs.phase_register(), vec![2, 1, 0]);
    }

    #[test]
    fn test_screen_order() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(screen(1, None, &mut rng), Err(ShorError::TooSmall(1))));
        assert!(matches!(screen(13, None, &mut rng), Err(ShorError::Prime(13))));
        assert!(matches!(screen(20, None, &mut rng), Err(ShorError::Even { n: 20, p: 2, q: 10 })));
        assert!(matches!(
            screen(27, None, &mut rng),
            Err(ShorError::PerfectPower { n: 27, base: 3, exp: 3 })
        ));
        assert!(matches!(screen(15, Some(1), &mut rng), Err(ShorError::BaseOutOfRange { n: 15, a: 1 })));
        assert!(matches!(screen(15, Some(15), &mut rng), Err(ShorError::BaseOutOfRange { n: 15, a: 15 })));
        assert!(matches!(screen(15, Some(6), &mut rng), Err(ShorError::NotCoprime { n: 15, a: 6 })));
        assert_eq!(screen(15, Some(7), &mut rng).unwrap(), 7);
    }

    #[test]
    fn test_screen_draws_coprime() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = screen(21, None, &mut rng).unwrap();
        assert!((2..21).contains(&a));
        assert_eq!(gcd(a, 21), 1);
    }

    #[test]
    fn test_factorize_rejects_zero_precision() {
        let err = factorize(&ShorConfig::new(15).with_a(7).with_t(0)).unwrap_err();
        assert!(matches!(err, ShorError::InvalidPrecision(0)));
    }

    #[test]
    fn test_factorize_respects_budget() {
        let err = factorize(&ShorConfig::new(15).with_a(7).with_max_qubits(6)).unwrap_err();
        assert!(matches!(err, ShorError::QubitBudgetExceeded { required: 7, max_qubits: 6 }));
    }

    #[test]
    fn test_factorize_is_deterministic_with_seed() {
        let config = ShorConfig::new(15).with_a(7).with_seed(42);
        assert_eq!(factorize(&config).unwrap(), factorize(&config).unwrap());
    }
}
