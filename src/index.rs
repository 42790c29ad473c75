//! Qubit indexing utilities.
//!
//! Basis states are flat indices in big-endian qubit order: qubit 0 is the
//! most significant bit, so qubit `loc` of an `n`-qubit index `i` is
//! `(i >> (n - 1 - loc)) & 1`. Registers are ordered lists of qubit
//! positions whose first entry is the most significant bit of the integer
//! they encode.

/// Largest qubit count whose basis indices fit in a `usize`.
pub const MAX_QUBITS: usize = (usize::BITS - 1) as usize;

/// Shift that moves qubit `loc` to bit 0 of a flat index.
#[inline]
pub fn bit_shift(num_qubits: usize, loc: usize) -> usize {
    debug_assert!(loc < num_qubits, "qubit {} out of range for {} qubits", loc, num_qubits);
    num_qubits - 1 - loc
}

/// Single-bit mask selecting qubit `loc` in a flat index.
///
/// # Example
/// ```
/// use shor_sim::index::qubit_mask;
/// // 3 qubits: qubit 0 is the MSB
/// assert_eq!(qubit_mask(3, 0), 0b100);
/// assert_eq!(qubit_mask(3, 2), 0b001);
/// ```
#[inline]
pub fn qubit_mask(num_qubits: usize, loc: usize) -> usize {
    1usize << bit_shift(num_qubits, loc)
}

/// Value (0 or 1) of qubit `loc` in basis index `index`.
#[inline]
pub fn read_bit(index: usize, num_qubits: usize, loc: usize) -> usize {
    (index >> bit_shift(num_qubits, loc)) & 1
}

/// Read the integer held by register `locs` in basis index `index`.
///
/// `locs[0]` contributes the most significant bit.
///
/// # Example
/// ```
/// use shor_sim::index::decode_register;
/// // |q0 q1 q2 q3> = |1 0 1 1>, register [3, 1] reads q3 then q1 -> 0b10
/// assert_eq!(decode_register(0b1011, 4, &[3, 1]), 0b10);
/// ```
pub fn decode_register(index: usize, num_qubits: usize, locs: &[usize]) -> u64 {
    debug_assert!(locs.len() <= u64::BITS as usize);
    locs.iter()
        .fold(0u64, |k, &loc| (k << 1) | read_bit(index, num_qubits, loc) as u64)
}

/// Overwrite register `locs` in `index` with the low `locs.len()` bits of
/// `value`, leaving every other qubit untouched.
///
/// # Example
/// ```
/// use shor_sim::index::encode_register;
/// // write 0b01 into qubits [1, 2] of |1 1 0 1>
/// assert_eq!(encode_register(0b1101, 4, &[1, 2], 0b01), 0b1011);
/// ```
pub fn encode_register(index: usize, num_qubits: usize, locs: &[usize], value: u64) -> usize {
    let width = locs.len();
    locs.iter().enumerate().fold(index, |idx, (j, &loc)| {
        let pos = bit_shift(num_qubits, loc);
        let bit = ((value >> (width - 1 - j)) & 1) as usize;
        (idx & !(1usize << pos)) | (bit << pos)
    })
}

/// Decompose a flat index into per-qubit bits, qubit 0 first.
///
/// # Example
/// ```
/// use shor_sim::index::index_to_bits;
/// assert_eq!(index_to_bits(0b110, 3), vec![1, 1, 0]);
/// ```
pub fn index_to_bits(index: usize, num_qubits: usize) -> Vec<usize> {
    (0..num_qubits)
        .map(|loc| read_bit(index, num_qubits, loc))
        .collect()
}

/// Compose per-qubit bits (qubit 0 first) into a flat index.
pub fn bits_to_index(bits: &[usize]) -> usize {
    debug_assert!(bits.iter().all(|&b| b < 2), "bits must be 0 or 1");
    bits.iter().fold(0usize, |idx, &b| (idx << 1) | b)
}

/// Render register `locs` of `index` as a bit string, MSB first.
pub fn register_bits(index: usize, num_qubits: usize, locs: &[usize]) -> String {
    locs.iter()
        .map(|&loc| if read_bit(index, num_qubits, loc) == 1 { '1' } else { '0' })
        .collect()
}
