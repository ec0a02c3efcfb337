use anchor_lang::prelude::*;

use crate::ciphertext::Handle;
use crate::error::DuelError;
use crate::events::{DecryptionRequested, GameFinished, MoveMade, PlayerJoined};
use crate::evaluator::EncryptedOutcome;
use crate::oracle::Outcome;

/// Lifecycle of a game. Only ever moves forward.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum GameStatus {
    WaitingForPlayers,
    WaitingForMoves,
    MovesCommitted,
    DecryptionPending,
    ResultsDecrypted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seat {
    Player1,
    Player2,
}

/// One sealed-move game.
///
/// Move slots hold ciphertext handles only. `is_draw` and `player1_wins` are meaningful once
/// `results_decrypted` is set, and are never written again afterwards.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct Game {
    pub id: u64,
    pub player1: Pubkey,
    pub player2: Option<Pubkey>,
    pub move1: Handle,
    pub move2: Handle,
    pub committed1: bool,
    pub committed2: bool,
    pub status: GameStatus,
    pub pending_request_id: Option<u64>,
    // Unix timestamp of the latest decryption request
    pub requested_at: i64,
    pub encrypted_outcome: Option<EncryptedOutcome>,
    pub is_draw: bool,
    pub player1_wins: bool,
    pub results_decrypted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub player1: Pubkey,
    pub player2: Option<Pubkey>,
    pub status: GameStatus,
    pub committed1: bool,
    pub committed2: bool,
    pub results_decrypted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResults {
    pub is_draw: bool,
    pub player1_wins: bool,
    pub winner: Option<Pubkey>,
}

impl Game {
    /// A fresh game waiting for its second player. `empty_move` is the encrypted zero both move
    /// slots start at.
    pub fn new(id: u64, creator: Pubkey, empty_move: Handle) -> Self {
        Self {
            id,
            player1: creator,
            player2: None,
            move1: empty_move,
            move2: empty_move,
            committed1: false,
            committed2: false,
            status: GameStatus::WaitingForPlayers,
            pending_request_id: None,
            requested_at: 0,
            encrypted_outcome: None,
            is_draw: false,
            player1_wins: false,
            results_decrypted: false,
        }
    }

    pub fn seat_of(&self, caller: &Pubkey) -> Option<Seat> {
        if *caller == self.player1 {
            Some(Seat::Player1)
        } else if self.player2.as_ref() == Some(caller) {
            Some(Seat::Player2)
        } else {
            None
        }
    }

    pub fn is_participant(&self, caller: &Pubkey) -> bool {
        self.seat_of(caller).is_some()
    }

    /// WaitingForPlayers -> WaitingForMoves
    pub fn join(&mut self, caller: Pubkey) -> Result<PlayerJoined> {
        require!(self.player2.is_none(), DuelError::GameAlreadyFull);
        require!(caller != self.player1, DuelError::CannotPlaySelf);
        require!(
            self.status == GameStatus::WaitingForPlayers,
            DuelError::InvalidGameState
        );

        self.player2 = Some(caller);
        self.status = GameStatus::WaitingForMoves;

        Ok(PlayerJoined {
            game_id: self.id,
            player2: caller,
        })
    }

    /// Checks that `caller` may commit a move right now and returns their seat.
    pub fn seat_for_commit(&self, caller: &Pubkey) -> Result<Seat> {
        require!(
            self.status == GameStatus::WaitingForMoves,
            DuelError::InvalidGameState
        );
        let seat = self.seat_of(caller).ok_or(DuelError::NotAParticipant)?;
        require!(!self.has_committed(seat), DuelError::MoveAlreadyCommitted);
        Ok(seat)
    }

    /// Stores a verified move handle in `seat`. The second commitment advances the game to
    /// MovesCommitted.
    pub fn commit_move(&mut self, seat: Seat, handle: Handle) -> Result<MoveMade> {
        require!(
            self.status == GameStatus::WaitingForMoves,
            DuelError::InvalidGameState
        );
        require!(!self.has_committed(seat), DuelError::MoveAlreadyCommitted);

        let player = match seat {
            Seat::Player1 => {
                self.move1 = handle;
                self.committed1 = true;
                self.player1
            }
            Seat::Player2 => {
                self.move2 = handle;
                self.committed2 = true;
                self.player2.ok_or(DuelError::InvalidGameState)?
            }
        };

        if self.committed1 && self.committed2 {
            self.status = GameStatus::MovesCommitted;
        }

        Ok(MoveMade {
            game_id: self.id,
            player,
        })
    }

    pub fn has_committed(&self, seat: Seat) -> bool {
        match seat {
            Seat::Player1 => self.committed1,
            Seat::Player2 => self.committed2,
        }
    }

    /// Guard for MovesCommitted -> DecryptionPending.
    pub fn ensure_resolvable(&self, caller: &Pubkey) -> Result<()> {
        require!(
            self.status == GameStatus::MovesCommitted,
            DuelError::InvalidGameState
        );
        require!(self.is_participant(caller), DuelError::NotAParticipant);
        Ok(())
    }

    /// MovesCommitted -> DecryptionPending. Records the correlation id the callback must carry.
    pub fn mark_pending(
        &mut self,
        caller: &Pubkey,
        request_id: u64,
        encrypted_outcome: Option<EncryptedOutcome>,
        now: i64,
    ) -> Result<DecryptionRequested> {
        self.ensure_resolvable(caller)?;

        self.pending_request_id = Some(request_id);
        self.requested_at = now;
        self.encrypted_outcome = encrypted_outcome;
        self.status = GameStatus::DecryptionPending;

        Ok(self.decryption_requested(request_id))
    }

    /// Swaps the pending correlation id for a fresh one once `timeout_secs` have passed without a
    /// callback. Returns the retired id.
    pub fn reissue_request(
        &mut self,
        caller: &Pubkey,
        request_id: u64,
        now: i64,
        timeout_secs: i64,
    ) -> Result<(u64, DecryptionRequested)> {
        let retired = self.ensure_reissuable(caller, now, timeout_secs)?;

        self.pending_request_id = Some(request_id);
        self.requested_at = now;

        Ok((retired, self.decryption_requested(request_id)))
    }

    /// Guard for re-requesting decryption, returns the currently pending id.
    pub fn ensure_reissuable(&self, caller: &Pubkey, now: i64, timeout_secs: i64) -> Result<u64> {
        require!(
            self.status == GameStatus::DecryptionPending,
            DuelError::InvalidGameState
        );
        require!(self.is_participant(caller), DuelError::NotAParticipant);

        let expires_at = self
            .requested_at
            .checked_add(timeout_secs)
            .ok_or(DuelError::CounterOverflow)?;
        require!(now >= expires_at, DuelError::ResolutionNotExpired);

        self.pending_request_id
            .ok_or_else(|| error!(DuelError::InvalidGameState))
    }

    /// Guard for the decryption callback: the game must still be waiting for exactly this
    /// request.
    pub fn ensure_awaiting(&self, request_id: u64) -> Result<()> {
        require!(
            self.status == GameStatus::DecryptionPending,
            DuelError::CallbackReplayed
        );
        require!(
            self.pending_request_id == Some(request_id),
            DuelError::UnknownRequest
        );
        Ok(())
    }

    /// DecryptionPending -> ResultsDecrypted. Terminal.
    pub fn apply_decryption(&mut self, request_id: u64, outcome: Outcome) -> Result<GameFinished> {
        self.ensure_awaiting(request_id)?;
        outcome.validate()?;

        self.is_draw = outcome.is_draw;
        self.player1_wins = outcome.player1_wins;
        self.results_decrypted = true;
        self.status = GameStatus::ResultsDecrypted;

        Ok(GameFinished {
            game_id: self.id,
            winner: self.winner(),
            is_draw: self.is_draw,
        })
    }

    /// No winner on a draw, otherwise player1 if they won, else player2.
    pub fn winner(&self) -> Option<Pubkey> {
        if !self.results_decrypted || self.is_draw {
            None
        } else if self.player1_wins {
            Some(self.player1)
        } else {
            self.player2
        }
    }

    pub fn is_ready(&self) -> bool {
        self.committed1 && self.committed2 && self.status == GameStatus::MovesCommitted
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            player1: self.player1,
            player2: self.player2,
            status: self.status,
            committed1: self.committed1,
            committed2: self.committed2,
            results_decrypted: self.results_decrypted,
        }
    }

    pub fn results(&self) -> Result<GameResults> {
        require!(self.results_decrypted, DuelError::ResultsNotReady);
        Ok(GameResults {
            is_draw: self.is_draw,
            player1_wins: self.player1_wins,
            winner: self.winner(),
        })
    }

    fn decryption_requested(&self, request_id: u64) -> DecryptionRequested {
        DecryptionRequested {
            game_id: self.id,
            request_id,
            handles: self
                .encrypted_outcome
                .map(|outcome| outcome.handles())
                .unwrap_or_default(),
        }
    }
}
