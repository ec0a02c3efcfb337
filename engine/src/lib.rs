//! Sealed-move duel protocol.
//!
//! Two players each commit one encrypted move (rock, paper or scissors). The winner is computed
//! over ciphertexts, handed to an external decryption oracle, and recorded when the oracle's
//! authenticated callback comes back. Nothing in this crate ever observes a plaintext move.
//!
//! [`GameRegistry`] is the entry point. With the `testing` feature, `testing` provides in-memory
//! collaborators.

pub mod ciphertext;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod oracle;
pub mod registry;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use ciphertext::{EncryptedInput, EncryptionBackend, Handle, InputContext, InputProof};
pub use error::DuelError;
pub use evaluator::{evaluate_winner, EncryptedOutcome, Move};
pub use events::Signal;
pub use oracle::{CallbackVerifier, OracleKey, Outcome};
pub use registry::{DecryptionRequest, GameRegistry, RegistryConfig, RequestEntry, RequestState};
pub use state::{Game, GameResults, GameStatus, GameSummary, Seat};
