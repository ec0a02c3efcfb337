use anchor_lang::prelude::*;

/// Allocates game ids. One per program.
#[account]
#[derive(InitSpace)]
pub struct RegistryAccount {
    /// PDA bump seed
    pub bump: u8,
    /// Number of games created so far, and the id of the next one
    pub game_count: u64,
}
