pub mod error;
pub mod index;
pub mod number;
pub mod state;
pub mod gate;
pub mod instruct;
pub mod modexp;
pub mod qft;
pub mod measure;
pub mod shor;
pub mod json;

pub use error::{GateError, ShorError};
pub use gate::Gate;
pub use modexp::{cmod_exp2, controlled_mod_exp2, ModExp2};
pub use shor::{factorize, Factorization, ShorConfig};
pub use state::State;
