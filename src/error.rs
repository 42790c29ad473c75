//! Error types for gate construction and the factorization pipeline.

use thiserror::Error;

/// Precondition violations rejected when a gate or state is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The modulus of a modular-exponentiation gate must be positive.
    #[error("modulus must be positive, got {0}")]
    InvalidModulus(u64),

    /// A qubit position lies outside `[0, num_qubits)`.
    #[error("qubit {loc} is out of range (num_qubits = {num_qubits})")]
    QubitOutOfRange { loc: usize, num_qubits: usize },

    /// A qubit position appears twice within the same register.
    #[error("qubit {0} appears more than once in a register")]
    DuplicateQubit(usize),

    /// Control and target registers share qubits.
    #[error("control and target registers overlap at qubits: {0:?}")]
    OverlappingQubits(Vec<usize>),

    /// The target register cannot hold every residue modulo `modulus`.
    #[error("target register of width {width} cannot hold residues modulo {modulus}")]
    RegisterTooNarrow { width: usize, modulus: u64 },

    /// More qubits than a flat `usize` index can address.
    #[error("{num_qubits} qubits exceeds the supported maximum of {max}")]
    TooManyQubits { num_qubits: usize, max: usize },

    /// Amplitude vector length is not a power of two.
    #[error("amplitude vector length {0} is not a power of two")]
    InvalidDimension(usize),

    /// Amplitude vector length does not match the declared qubit count.
    #[error("amplitude vector has {actual} entries, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Rejections and failures of [`crate::shor::factorize`].
///
/// The messages match what the factorization service reported to callers.
#[derive(Debug, Error)]
pub enum ShorError {
    #[error("N={0}. N must be greater than 1.")]
    TooSmall(u64),

    #[error("N={0} is prime.")]
    Prime(u64),

    #[error("N={n} is even. p={p}, q={q}.")]
    Even { n: u64, p: u64, q: u64 },

    #[error("N={n}. N is exponentiation. {base}^{exp}.")]
    PerfectPower { n: u64, base: u64, exp: u32 },

    #[error("t={0}. t must be greater than 0.")]
    InvalidPrecision(usize),

    #[error("N={n}, a={a}. a must be 1 < a < N.")]
    BaseOutOfRange { n: u64, a: u64 },

    #[error("N={n}, a={a}. a is not coprime. a is non-trivial factor.")]
    NotCoprime { n: u64, a: u64 },

    #[error("{required} qubits exceeds the simulation budget of {max_qubits}")]
    QubitBudgetExceeded { required: usize, max_qubits: usize },

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
