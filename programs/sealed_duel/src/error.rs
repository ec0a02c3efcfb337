use anchor_lang::prelude::*;

// Offset keeps these codes clear of the protocol errors in duel_engine::DuelError
#[error_code(offset = 6100)]
pub enum ErrorCode {
    #[msg("The computation was aborted")]
    AbortedComputation,
    #[msg("Cluster not set")]
    ClusterNotSet,
    #[msg("Encrypted move, encryption key or nonce is empty")]
    InvalidMoveEnvelope,
    #[msg("Resolution request does not belong to this game")]
    RequestMismatch,
}
