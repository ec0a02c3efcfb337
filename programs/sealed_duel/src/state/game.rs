use anchor_lang::prelude::*;
use duel_engine::{events::MoveMade, Game, Handle, Seat};

use crate::error::ErrorCode;

/// Everything the MXE needs to decrypt a committed move besides the ciphertext itself, which
/// sits in the game's move slot.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct MoveEnvelope {
    /// Player's x25519 public key the move was encrypted with
    pub encryption_pubkey: [u8; 32],
    /// Nonce of the move encryption
    pub nonce: u128,
}

#[account]
#[derive(InitSpace)]
pub struct GameAccount {
    /// PDA bump seed
    pub bump: u8,
    pub game: Game,
    /// `[player1, player2]`
    pub envelopes: [MoveEnvelope; 2],
}

impl GameAccount {
    /// Commits `player`'s encrypted move together with its envelope.
    ///
    /// Ciphertexts are public once committed and the circuit has no proof step, so a move must not
    /// reuse the opponent's encryption key or ciphertext: either would let the second mover derive
    /// their move from the first one.
    pub fn seal_move(
        &mut self,
        player: &Pubkey,
        ciphertext: Handle,
        envelope: MoveEnvelope,
    ) -> Result<MoveMade> {
        require!(
            !ciphertext.is_zero() && envelope.encryption_pubkey != [0; 32],
            ErrorCode::InvalidMoveEnvelope
        );

        let seat = self.game.seat_for_commit(player)?;
        let opponent = match seat {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        };
        if self.game.has_committed(opponent) {
            let (opponent_move, opponent_envelope) = self.slot(opponent);
            require!(
                opponent_move != ciphertext
                    && opponent_envelope.encryption_pubkey != envelope.encryption_pubkey,
                ErrorCode::InvalidMoveEnvelope
            );
        }

        let made = self.game.commit_move(seat, ciphertext)?;
        self.envelopes[Self::index(seat)] = envelope;
        Ok(made)
    }

    fn slot(&self, seat: Seat) -> (Handle, MoveEnvelope) {
        let ciphertext = match seat {
            Seat::Player1 => self.game.move1,
            Seat::Player2 => self.game.move2,
        };
        (ciphertext, self.envelopes[Self::index(seat)])
    }

    fn index(seat: Seat) -> usize {
        match seat {
            Seat::Player1 => 0,
            Seat::Player2 => 1,
        }
    }
}
