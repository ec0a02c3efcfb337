use anchor_lang::prelude::*;

use crate::ciphertext::Handle;

#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct GameCreated {
    pub game_id: u64,
    pub player1: Pubkey,
}

#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerJoined {
    pub game_id: u64,
    pub player2: Pubkey,
}

/// Carries who committed, never what.
#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct MoveMade {
    pub game_id: u64,
    pub player: Pubkey,
}

#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct DecryptionRequested {
    pub game_id: u64,
    pub request_id: u64,
    /// Handles granted to the oracle: `[is_draw, player1_wins]`. Zeroed on-ledger, where the
    /// outcome only exists inside the MPC computation.
    pub handles: [Handle; 2],
}

#[event]
#[derive(Clone, Debug, PartialEq)]
pub struct GameFinished {
    pub game_id: u64,
    /// `None` on a draw
    pub winner: Option<Pubkey>,
    pub is_draw: bool,
}

/// Journal entry recorded by the registry for observers.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    GameCreated(GameCreated),
    PlayerJoined(PlayerJoined),
    MoveMade(MoveMade),
    DecryptionRequested(DecryptionRequested),
    GameFinished(GameFinished),
}
