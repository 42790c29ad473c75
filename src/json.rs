use serde::{Deserialize, Serialize};

use crate::error::ShorError;
use crate::index::{decode_register, register_bits};
use crate::shor::{Factorization, ShorConfig};
use crate::state::State;

/// Amplitudes below this probability are left out of a listing.
const PROBABILITY_EPSILON: f64 = 1e-13;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Amplitude {
    pub real: f64,
    pub imag: f64,
}

/// One populated basis state, split into registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub amplitude: Amplitude,
    pub probability: f64,
    /// Integer value of each register, in the order requested.
    pub int: Vec<u64>,
    /// Bit string of each register, MSB first.
    pub binary_string: Vec<String>,
}

/// Lists every basis state with non-negligible probability, in index order.
///
/// `registers` selects how each index is split; pass `&[&all_qubits]` for a
/// single register covering the whole state.
pub fn state_listing(state: &State, registers: &[&[usize]]) -> Vec<StateEntry> {
    let n = state.num_qubits;
    state
        .data
        .iter()
        .enumerate()
        .filter(|(_, amp)| amp.norm_sqr() > PROBABILITY_EPSILON)
        .map(|(index, amp)| StateEntry {
            amplitude: Amplitude { real: amp.re, imag: amp.im },
            probability: amp.norm_sqr(),
            int: registers.iter().map(|r| decode_register(index, n, r)).collect(),
            binary_string: registers.iter().map(|r| register_bits(index, n, r)).collect(),
        })
        .collect()
}

/// Parse a [`ShorConfig`] from JSON, e.g. `{"N": 15, "a": 7, "seed": 1}`.
pub fn config_from_json(json: &str) -> Result<ShorConfig, ShorError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize a [`Factorization`] with the field names the service used
/// (`N`, `t`, `a`, `seed`, `m`, `s/r`, `p`, `q`).
pub fn factorization_to_json(out: &Factorization) -> Result<String, ShorError> {
    Ok(serde_json::to_string(out)?)
}

pub fn state_listing_to_json(entries: &[StateEntry]) -> Result<String, ShorError> {
    Ok(serde_json::to_string(&serde_json::json!({ "state": entries }))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = config_from_json(r#"{"N": 21}"#).unwrap();
        assert_eq!(config, ShorConfig::new(21));
        assert_eq!(config.t, 3);
        assert_eq!(config.a, None);
    }

    #[test]
    fn test_config_full() {
        let config = config_from_json(r#"{"N": 15, "t": 4, "a": 7, "seed": 9, "max_qubits": 12}"#).unwrap();
        assert_eq!(
            config,
            ShorConfig::new(15).with_t(4).with_a(7).with_seed(9).with_max_qubits(12)
        );
    }

    #[test]
    fn test_config_rejects_missing_n() {
        let err = config_from_json(r#"{"t": 3}"#).unwrap_err();
        assert!(matches!(err, ShorError::Config(_)));
    }

    #[test]
    fn test_factorization_field_names() {
        let out = Factorization {
            n: 15,
            t: 3,
            a: 7,
            seed: None,
            m: "0.010".to_string(),
            s_r: "1/4".to_string(),
            p: Some(3),
            q: Some(5),
        };
        let json = factorization_to_json(&out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["N"], 15);
        assert_eq!(value["s/r"], "1/4");
        assert_eq!(value["p"], 3);
        assert!(value.get("seed").is_none());
    }

    #[test]
    fn test_state_listing_splits_registers() {
        // |1⟩ ⊗ |10⟩
        let state = State::product_state(&[1, 1, 0]);
        let entries = state_listing(&state, &[&[0], &[1, 2]]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].int, vec![1, 2]);
        assert_eq!(entries[0].binary_string, vec!["1".to_string(), "10".to_string()]);
        assert_eq!(entries[0].probability, 1.0);

        let json = state_listing_to_json(&entries).unwrap();
        assert!(json.starts_with(r#"{"state":[{"amplitude":{"real":1.0,"imag":0.0}"#));
    }
}
