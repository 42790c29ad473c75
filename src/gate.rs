use ndarray::{array, Array2};
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// Single-qubit gates used by the factorization circuit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    X,
    Z,
    H,
    /// Phase gate: diag(1, e^(iθ)).
    Phase(f64),
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gate::X => write!(f, "X"),
            Gate::Z => write!(f, "Z"),
            Gate::H => write!(f, "H"),
            Gate::Phase(theta) => write!(f, "Phase({:.4})", theta),
        }
    }
}

impl Gate {
    /// 2x2 matrix of the gate in the computational basis.
    pub fn matrix(&self) -> Array2<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);

        match self {
            Gate::X => array![[zero, one], [one, zero]],
            Gate::Z => array![[one, zero], [zero, -one]],
            Gate::H => {
                let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[s, s], [s, -s]]
            }
            Gate::Phase(theta) => array![[one, zero], [zero, Complex64::from_polar(1.0, *theta)]],
        }
    }

    /// Returns whether the gate is diagonal.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Gate::Z | Gate::Phase(_))
    }

    /// Diagonal entries `[d0, d1]` for diagonal gates.
    pub fn diagonal(&self) -> Option<[Complex64; 2]> {
        if !self.is_diagonal() {
            return None;
        }
        let m = self.matrix();
        Some([m[[0, 0]], m[[1, 1]]])
    }

    /// Return the adjoint of this gate; for unitary gates also the inverse.
    pub fn dagger(&self) -> Self {
        match self {
            Gate::X | Gate::Z | Gate::H => *self,
            Gate::Phase(theta) => Gate::Phase(-theta),
        }
    }
}
