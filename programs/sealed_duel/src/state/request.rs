use anchor_lang::prelude::*;
use duel_engine::DuelError;

use crate::error::ErrorCode;

/// Correlation record for one queued `resolve_game` computation.
///
/// Created when the computation is queued, at the PDA of its computation offset, so an offset
/// can only ever be bound to a single game.
#[account]
#[derive(InitSpace)]
pub struct ResolutionRequest {
    /// PDA bump seed
    pub bump: u8,
    /// The computation offset the callback answers
    pub request_id: u64,
    pub game_id: u64,
    /// Set once the callback result has been written to the game
    pub applied: bool,
}

impl ResolutionRequest {
    /// Checks that a callback for `computation` may be applied to `game_id` through this request.
    /// `expected_computation` is the computation PDA derived from `request_id`.
    pub fn ensure_answers(
        &self,
        game_id: u64,
        computation: &Pubkey,
        expected_computation: &Pubkey,
    ) -> Result<()> {
        require!(self.game_id == game_id, ErrorCode::RequestMismatch);
        require_keys_eq!(*computation, *expected_computation, ErrorCode::RequestMismatch);
        require!(!self.applied, DuelError::CallbackReplayed);
        Ok(())
    }
}
