//! Classical number theory for Shor's algorithm.
//!
//! Everything here works on `u64`. Modular products go through `u128`
//! so no intermediate can overflow, whatever the modulus.

use rand::Rng;

/// Greatest common divisor (Euclidean algorithm).
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// `a * b mod n` without overflow.
#[inline]
pub fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    debug_assert!(n > 0, "modulus must be positive");
    ((a as u128 * b as u128) % n as u128) as u64
}

/// `base^exp mod n` by repeated squaring.
///
/// # Example
/// ```
/// use shor_sim::number::mod_exp;
/// assert_eq!(mod_exp(7, 4, 15), 1);
/// assert_eq!(mod_exp(2, 10, 1000), 24);
/// ```
pub fn mod_exp(base: u64, mut exp: u64, n: u64) -> u64 {
    debug_assert!(n > 0, "modulus must be positive");
    if n == 1 {
        return 0;
    }
    let mut result = 1u64;
    let mut base = base % n;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, n);
        }
        base = mul_mod(base, base, n);
        exp >>= 1;
    }
    result
}

/// `a^(2^j) mod n`, computed with `j` modular squarings.
///
/// # Example
/// ```
/// use shor_sim::number::mod_exp2;
/// // 7^(2^2) = 2401 = 160 * 15 + 1
/// assert_eq!(mod_exp2(7, 2, 15), 1);
/// assert_eq!(mod_exp2(2, 0, 7), 2);
/// ```
pub fn mod_exp2(a: u64, j: usize, n: u64) -> u64 {
    debug_assert!(n > 0, "modulus must be positive");
    let mut r = a % n;
    for _ in 0..j {
        r = mul_mod(r, r, n);
    }
    r
}

/// Inverse of `a` modulo `n`, if `gcd(a, n) == 1`.
pub fn mod_inverse(a: u64, n: u64) -> Option<u64> {
    if n == 0 {
        return None;
    }
    let (mut old_r, mut r) = (a as i128 % n as i128, n as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return if n == 1 { Some(0) } else { None };
    }
    Some(old_s.rem_euclid(n as i128) as u64)
}

/// Deterministic Miller-Rabin for all `u64`.
pub fn is_prime(n: u64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for &p in &WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for &a in &WITNESSES {
        let mut x = mod_exp(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Finds `(base, exp)` with `base^exp == n` and `exp >= 2`, trying the
/// largest exponent first.
///
/// # Example
/// ```
/// use shor_sim::number::base_exp;
/// assert_eq!(base_exp(27), Some((3, 3)));
/// assert_eq!(base_exp(64), Some((2, 6)));
/// assert_eq!(base_exp(15), None);
/// ```
pub fn base_exp(n: u64) -> Option<(u64, u32)> {
    if n < 4 {
        return None;
    }
    let max_exp = bit_length(n) as u32 - 1;
    (2..=max_exp).rev().find_map(|exp| {
        let base = integer_root(n, exp);
        (base >= 2 && base.checked_pow(exp) == Some(n)).then_some((base, exp))
    })
}

/// Largest `r` with `r^exp <= n`.
fn integer_root(n: u64, exp: u32) -> u64 {
    let mut r = (n as f64).powf(1.0 / exp as f64).round() as u64;
    while r > 0 && r.checked_pow(exp).map_or(true, |v| v > n) {
        r -= 1;
    }
    while (r + 1).checked_pow(exp).is_some_and(|v| v <= n) {
        r += 1;
    }
    r
}

/// Random `a` in `[2, n)` with `gcd(a, n) == 1`, or `None` when `n < 3`.
pub fn coprime(n: u64, rng: &mut impl Rng) -> Option<u64> {
    if n < 3 {
        return None;
    }
    loop {
        let a = rng.gen_range(2..n);
        if gcd(n, a) == 1 {
            return Some(a);
        }
    }
}

/// Partial quotients of `numerator / denominator`.
///
/// `[a0; a1, a2, ...]` with `numerator/denominator = a0 + 1/(a1 + 1/(a2 + ...))`.
pub fn continued_fraction(mut numerator: u64, mut denominator: u64) -> Vec<u64> {
    let mut terms = Vec::new();
    while denominator != 0 {
        terms.push(numerator / denominator);
        let remainder = numerator % denominator;
        numerator = denominator;
        denominator = remainder;
    }
    terms
}

/// Convergents `p_k / q_k` of a continued fraction, stopping early on overflow.
pub fn convergents(cf: &[u64]) -> Vec<(u64, u64)> {
    let mut result = Vec::with_capacity(cf.len());

    // p_{-2} = 0, p_{-1} = 1, q_{-2} = 1, q_{-1} = 0
    let (mut p_prev2, mut p_prev1) = (0u64, 1u64);
    let (mut q_prev2, mut q_prev1) = (1u64, 0u64);

    for &a in cf {
        let p = a.checked_mul(p_prev1).and_then(|v| v.checked_add(p_prev2));
        let q = a.checked_mul(q_prev1).and_then(|v| v.checked_add(q_prev2));
        let (Some(p), Some(q)) = (p, q) else {
            break;
        };
        result.push((p, q));
        (p_prev2, p_prev1) = (p_prev1, p);
        (q_prev2, q_prev1) = (q_prev1, q);
    }

    result
}

/// Order candidate recovered from a phase-estimation measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderEstimate {
    /// Numerator of the convergent `s/r`.
    pub s: u64,
    /// Candidate order.
    pub r: u64,
    /// Whether `a^r mod n == 1`.
    pub found: bool,
}

/// Recovers the order of `a` modulo `n` from the measured phase `m / 2^t`.
///
/// Walks the convergents of `m / 2^t` and returns the first whose
/// denominator `r` satisfies `a^r mod n == 1`. When none does, the last
/// convergent is returned with `found == false`.
///
/// # Example
/// ```
/// use shor_sim::number::find_order;
/// // 7 has order 4 mod 15; phase 0.010 = 1/4
/// let est = find_order(7, 15, 0b010, 3);
/// assert!(est.found);
/// assert_eq!((est.s, est.r), (1, 4));
/// ```
pub fn find_order(a: u64, n: u64, m: u64, t: usize) -> OrderEstimate {
    assert!(t < u64::BITS as usize, "phase precision {} too large", t);
    let cf = continued_fraction(m, 1u64 << t);

    let mut last = OrderEstimate { s: 0, r: 1, found: false };
    for (s, r) in convergents(&cf) {
        if r == 0 {
            continue;
        }
        if mod_exp(a, r, n) == 1 {
            return OrderEstimate { s, r, found: true };
        }
        last = OrderEstimate { s, r, found: false };
    }
    last
}

/// True when any candidate factor is 1 or `n` itself.
pub fn is_trivial(n: u64, factors: &[u64]) -> bool {
    factors.iter().any(|&f| f == 1 || f == n)
}

/// Number of bits needed to write `n` in binary.
pub fn bit_length(n: u64) -> usize {
    (u64::BITS - n.leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(15, 6), 3);
        assert_eq!(gcd(7, 15), 1);
        assert_eq!(gcd(0, 9), 9);
        assert_eq!(gcd(9, 0), 9);
    }

    #[test]
    fn test_mul_mod_large_operands() {
        let n = u64::MAX - 58; // prime close to 2^64
        assert_eq!(mul_mod(n - 1, n - 1, n), 1);
    }

    #[test]
    fn test_mod_exp2_matches_mod_exp() {
        for a in 0..20u64 {
            for j in 0..6usize {
                for n in 1..40u64 {
                    assert_eq!(mod_exp2(a, j, n), mod_exp(a, 1 << j, n), "a={} j={} n={}", a, j, n);
                }
            }
        }
    }

    #[test]
    fn test_mod_exp2_unreduced_base() {
        // a need not be reduced beforehand
        assert_eq!(mod_exp2(22, 1, 15), mod_exp2(7, 1, 15));
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(2, 7), Some(4));
        assert_eq!(mod_inverse(7, 15), Some(13));
        assert_eq!(mod_inverse(5, 15), None);
        for a in 1..21u64 {
            if let Some(inv) = mod_inverse(a, 21) {
                assert_eq!(mul_mod(a, inv, 21), 1);
            }
        }
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..50).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]);
        assert!(is_prime(1_000_000_007));
        assert!(!is_prime(3_215_031_751)); // strong pseudoprime to bases 2, 3, 5, 7
    }

    #[test]
    fn test_base_exp() {
        assert_eq!(base_exp(9), Some((3, 2)));
        assert_eq!(base_exp(125), Some((5, 3)));
        assert_eq!(base_exp(21), None);
        assert_eq!(base_exp(3), None);
    }

    #[test]
    fn test_coprime_is_coprime() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let a = coprime(15, &mut rng).unwrap();
            assert!((2..15).contains(&a));
            assert_eq!(gcd(a, 15), 1);
        }
        assert_eq!(coprime(2, &mut rng), None);
    }

    #[test]
    fn test_continued_fraction_and_convergents() {
        // 3/8 = [0; 2, 1, 2]
        let cf = continued_fraction(3, 8);
        assert_eq!(cf, vec![0, 2, 1, 2]);
        assert_eq!(convergents(&cf), vec![(0, 1), (1, 2), (1, 3), (3, 8)]);
    }

    #[test]
    fn test_find_order_fails_on_half() {
        // 0.100 = 1/2 but 7^2 mod 15 = 4
        let est = find_order(7, 15, 0b100, 3);
        assert!(!est.found);
        assert_eq!((est.s, est.r), (1, 2));
    }

    #[test]
    fn test_find_order_zero_phase() {
        let est = find_order(7, 15, 0, 3);
        assert!(!est.found);
        assert_eq!((est.s, est.r), (0, 1));
    }

    #[test]
    fn test_is_trivial() {
        assert!(is_trivial(15, &[1, 15]));
        assert!(is_trivial(15, &[3, 15]));
        assert!(!is_trivial(15, &[3, 5]));
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(7), 3);
        assert_eq!(bit_length(15), 4);
        assert_eq!(bit_length(21), 5);
    }
}
