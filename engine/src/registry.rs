//! Game registry and decryption request router.
//!
//! The registry exclusively owns every [`Game`] and the request correlation table. Games live in
//! an append-only arena indexed by id; correlation entries are created once per decryption
//! request and never removed or rebound. Each method is one indivisible operation: every guard
//! is checked before anything is written, so a failed call leaves no trace.
//!
//! Callers that share a registry across threads serialize access themselves (e.g. behind a
//! `Mutex`), which gives the single total order the protocol relies on.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::ciphertext::{EncryptedInput, EncryptionBackend, InputContext, InputProof};
use crate::constants::{DEFAULT_DECRYPTION_TIMEOUT_SECS, FIRST_REQUEST_ID};
use crate::error::DuelError;
use crate::events::{GameCreated, Signal};
use crate::evaluator::{evaluate_winner, EncryptedOutcome};
use crate::oracle::{CallbackVerifier, Outcome};
use crate::state::{Game, GameResults, GameSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// How long a decryption request stays pending before a participant may re-request it.
    pub decryption_timeout_secs: i64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            decryption_timeout_secs: DEFAULT_DECRYPTION_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Applied,
    /// Replaced by a re-request; no longer routes anywhere.
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestEntry {
    pub game_id: u64,
    pub state: RequestState,
}

/// What the oracle may decrypt for one pending request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecryptionRequest {
    pub request_id: u64,
    pub game_id: u64,
    pub outcome: EncryptedOutcome,
}

pub struct GameRegistry<B, V> {
    config: RegistryConfig,
    backend: B,
    verifier: V,
    games: Vec<Game>,
    requests: HashMap<u64, RequestEntry>,
    next_request_id: u64,
    signals: Vec<Signal>,
}

impl<B, V> GameRegistry<B, V>
where
    B: EncryptionBackend,
    V: CallbackVerifier,
{
    pub fn new(backend: B, verifier: V, config: RegistryConfig) -> Self {
        Self {
            config,
            backend,
            verifier,
            games: Vec::new(),
            requests: HashMap::new(),
            next_request_id: FIRST_REQUEST_ID,
            signals: Vec::new(),
        }
    }

    /// Allocates the next game id with `caller` as player1.
    pub fn create_game(&mut self, caller: Pubkey) -> u64 {
        let game_id = self.games.len() as u64;
        let empty_move = self.backend.trivial_encrypt(0);
        self.games.push(Game::new(game_id, caller, empty_move));

        msg!("Game {} created by {}", game_id, caller);
        self.signals.push(Signal::GameCreated(GameCreated {
            game_id,
            player1: caller,
        }));
        game_id
    }

    pub fn join_game(&mut self, game_id: u64, caller: Pubkey) -> Result<()> {
        let joined = self.game_mut(game_id)?.join(caller)?;

        msg!("Player {} joined game {}", caller, game_id);
        self.signals.push(Signal::PlayerJoined(joined));
        Ok(())
    }

    /// Verifies the encrypted move with the backend and seals it in the caller's slot.
    pub fn submit_move(
        &mut self,
        game_id: u64,
        caller: Pubkey,
        encrypted_move: &EncryptedInput,
        proof: &InputProof,
    ) -> Result<()> {
        let seat = self.game(game_id)?.seat_for_commit(&caller)?;

        let context = InputContext {
            game_id,
            player: caller,
        };
        let handle = self.backend.verify_input(encrypted_move, proof, &context)?;
        let made = self.game_mut(game_id)?.commit_move(seat, handle)?;

        msg!("Move committed for game {} by {:?}", game_id, seat);
        self.signals.push(Signal::MoveMade(made));
        Ok(())
    }

    /// Evaluates the winner over the committed ciphertexts, grants the oracle access to the
    /// result and parks the game until the callback arrives. Returns the correlation id.
    pub fn request_resolution(&mut self, game_id: u64, caller: Pubkey, now: i64) -> Result<u64> {
        let game = self.game(game_id)?;
        game.ensure_resolvable(&caller)?;
        let (move1, move2) = (game.move1, game.move2);

        let outcome = evaluate_winner(&mut self.backend, move1, move2)?;
        for handle in outcome.handles() {
            self.backend.allow_decryption(handle)?;
        }

        let request_id = self.allocate_request(game_id)?;
        let requested = self
            .game_mut(game_id)?
            .mark_pending(&caller, request_id, Some(outcome), now)?;

        msg!("Decryption requested for game {} as request {}", game_id, request_id);
        self.signals.push(Signal::DecryptionRequested(requested));
        Ok(request_id)
    }

    /// Re-issues the decryption of a game stuck in DecryptionPending past the configured
    /// timeout. The previous request id stops routing; the encrypted outcome is reused.
    pub fn retry_resolution(&mut self, game_id: u64, caller: Pubkey, now: i64) -> Result<u64> {
        let timeout_secs = self.config.decryption_timeout_secs;
        let retired = self
            .game(game_id)?
            .ensure_reissuable(&caller, now, timeout_secs)?;

        let request_id = self.allocate_request(game_id)?;
        let (_, requested) =
            self.game_mut(game_id)?
                .reissue_request(&caller, request_id, now, timeout_secs)?;
        if let Some(entry) = self.requests.get_mut(&retired) {
            entry.state = RequestState::Superseded;
        }

        msg!(
            "Decryption re-requested for game {}: request {} supersedes {}",
            game_id,
            request_id,
            retired
        );
        self.signals.push(Signal::DecryptionRequested(requested));
        Ok(request_id)
    }

    /// Oracle read: the handles behind a still-pending request.
    pub fn decryption_request(&self, request_id: u64) -> Result<DecryptionRequest> {
        let entry = self.live_request(request_id)?;
        let outcome = self
            .game(entry.game_id)?
            .encrypted_outcome
            .ok_or(DuelError::UnknownRequest)?;

        Ok(DecryptionRequest {
            request_id,
            game_id: entry.game_id,
            outcome,
        })
    }

    /// Decryption callback entry point.
    ///
    /// Rejects, in order: a signature not made by the oracle identity, a request id with no live
    /// mapping, a game that is no longer waiting (replay), and a malformed cleartext. Applies the
    /// outcome exactly once.
    pub fn on_decrypted(&mut self, request_id: u64, cleartext: &[u8], signature: &[u8]) -> Result<()> {
        require!(
            self.verifier.verify(request_id, cleartext, signature),
            DuelError::InvalidOracleSignature
        );

        let entry = *self
            .requests
            .get(&request_id)
            .ok_or(DuelError::UnknownRequest)?;
        match entry.state {
            RequestState::Pending => {}
            RequestState::Applied => return err!(DuelError::CallbackReplayed),
            RequestState::Superseded => return err!(DuelError::UnknownRequest),
        }

        self.game(entry.game_id)?.ensure_awaiting(request_id)?;
        let outcome = Outcome::decode(cleartext)?;

        let finished = self
            .game_mut(entry.game_id)?
            .apply_decryption(request_id, outcome)?;
        if let Some(entry) = self.requests.get_mut(&request_id) {
            entry.state = RequestState::Applied;
        }

        msg!(
            "Game {} finished: draw {}, winner {:?}",
            finished.game_id,
            finished.is_draw,
            finished.winner
        );
        self.signals.push(Signal::GameFinished(finished));
        Ok(())
    }

    pub fn get_game(&self, game_id: u64) -> Result<GameSummary> {
        Ok(self.game(game_id)?.summary())
    }

    pub fn get_results(&self, game_id: u64) -> Result<GameResults> {
        self.game(game_id)?.results()
    }

    /// Unknown games are simply not ready.
    pub fn is_ready(&self, game_id: u64) -> bool {
        self.game(game_id).map(Game::is_ready).unwrap_or(false)
    }

    /// Number of games allocated so far; also the id the next game will get.
    pub fn game_count(&self) -> u64 {
        self.games.len() as u64
    }

    pub fn request(&self, request_id: u64) -> Option<RequestEntry> {
        self.requests.get(&request_id).copied()
    }

    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn game(&self, game_id: u64) -> Result<&Game> {
        usize::try_from(game_id)
            .ok()
            .and_then(|index| self.games.get(index))
            .ok_or_else(|| error!(DuelError::GameNotFound))
    }

    fn game_mut(&mut self, game_id: u64) -> Result<&mut Game> {
        usize::try_from(game_id)
            .ok()
            .and_then(|index| self.games.get_mut(index))
            .ok_or_else(|| error!(DuelError::GameNotFound))
    }

    fn live_request(&self, request_id: u64) -> Result<RequestEntry> {
        match self.requests.get(&request_id) {
            Some(entry) if entry.state == RequestState::Pending => Ok(*entry),
            _ => err!(DuelError::UnknownRequest),
        }
    }

    /// Records a fresh correlation id for `game_id`. An id is never bound twice.
    fn allocate_request(&mut self, game_id: u64) -> Result<u64> {
        let request_id = self.next_request_id;
        let next = request_id
            .checked_add(1)
            .ok_or(DuelError::CounterOverflow)?;

        match self.requests.entry(request_id) {
            Entry::Occupied(_) => return err!(DuelError::DuplicateRequestId),
            Entry::Vacant(slot) => {
                slot.insert(RequestEntry {
                    game_id,
                    state: RequestState::Pending,
                });
            }
        }
        self.next_request_id = next;
        Ok(request_id)
    }
}
