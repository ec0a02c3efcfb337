use anchor_lang::prelude::*;

use duel_engine::testing::{assert_duel_error, ClearBackend, DecryptionCallback, MockOracle};
use duel_engine::{
    DuelError, GameRegistry, GameStatus, InputContext, Move, OracleKey, Outcome, RegistryConfig,
    RequestState, Signal,
};

const ORACLE_KEY: [u8; 32] = [0xA5; 32];

struct Harness {
    registry: GameRegistry<ClearBackend, OracleKey>,
    // Client-side encryptor sharing the backend's key material
    client: ClearBackend,
    oracle: MockOracle,
}

impl Harness {
    fn new() -> Self {
        Self {
            registry: GameRegistry::new(
                ClearBackend::new([0x11; 32]),
                OracleKey::new(ORACLE_KEY),
                RegistryConfig::default(),
            ),
            client: ClearBackend::new([0x11; 32]),
            oracle: MockOracle::new(OracleKey::new(ORACLE_KEY)),
        }
    }

    fn play(&mut self, game_id: u64, player: Pubkey, value: Move) -> Result<()> {
        let context = InputContext { game_id, player };
        let (input, proof) = self.client.encrypt(value, &context);
        self.registry.submit_move(game_id, player, &input, &proof)
    }

    fn committed_game(&mut self, move1: Move, move2: Move) -> u64 {
        let game_id = self.registry.create_game(alice());
        self.registry.join_game(game_id, bob()).unwrap();
        self.play(game_id, alice(), move1).unwrap();
        self.play(game_id, bob(), move2).unwrap();
        game_id
    }

    fn answer(&self, request_id: u64) -> DecryptionCallback {
        let request = self.registry.decryption_request(request_id).unwrap();
        self.oracle.fulfil(self.registry.backend(), &request).unwrap()
    }

    fn deliver(&mut self, callback: &DecryptionCallback) -> Result<()> {
        self.registry
            .on_decrypted(callback.request_id, &callback.cleartext, &callback.signature)
    }
}

fn alice() -> Pubkey {
    Pubkey::new_from_array([0xA1; 32])
}

fn bob() -> Pubkey {
    Pubkey::new_from_array([0xB0; 32])
}

fn mallory() -> Pubkey {
    Pubkey::new_from_array([0x4D; 32])
}

#[test]
fn rock_beats_scissors_end_to_end() {
    let mut harness = Harness::new();

    let game_id = harness.registry.create_game(alice());
    assert_eq!(game_id, 0);
    assert_eq!(
        harness.registry.get_game(game_id).unwrap().status,
        GameStatus::WaitingForPlayers
    );

    harness.registry.join_game(game_id, bob()).unwrap();
    assert_eq!(
        harness.registry.get_game(game_id).unwrap().status,
        GameStatus::WaitingForMoves
    );

    harness.play(game_id, alice(), Move::Rock).unwrap();
    assert!(!harness.registry.is_ready(game_id));
    harness.play(game_id, bob(), Move::Scissors).unwrap();
    assert!(harness.registry.is_ready(game_id));

    let request_id = harness
        .registry
        .request_resolution(game_id, alice(), 10)
        .unwrap();
    assert_eq!(
        harness.registry.get_game(game_id).unwrap().status,
        GameStatus::DecryptionPending
    );
    assert!(!harness.registry.is_ready(game_id));
    assert_duel_error(harness.registry.get_results(game_id), DuelError::ResultsNotReady);

    let callback = harness.answer(request_id);
    harness.deliver(&callback).unwrap();

    let summary = harness.registry.get_game(game_id).unwrap();
    assert_eq!(summary.status, GameStatus::ResultsDecrypted);
    assert!(summary.results_decrypted);

    let results = harness.registry.get_results(game_id).unwrap();
    assert!(!results.is_draw);
    assert!(results.player1_wins);
    assert_eq!(results.winner, Some(alice()));

    let finished = harness
        .registry
        .drain_signals()
        .into_iter()
        .filter_map(|signal| match signal {
            Signal::GameFinished(finished) => Some(finished),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].winner, Some(alice()));
    assert!(!finished[0].is_draw);
}

#[test]
fn same_moves_draw() {
    let mut harness = Harness::new();
    let game_id = harness.committed_game(Move::Paper, Move::Paper);

    let request_id = harness
        .registry
        .request_resolution(game_id, bob(), 10)
        .unwrap();
    let callback = harness.answer(request_id);
    harness.deliver(&callback).unwrap();

    let results = harness.registry.get_results(game_id).unwrap();
    assert!(results.is_draw);
    assert!(!results.player1_wins);
    assert_eq!(results.winner, None);
}

#[test]
fn every_pairing_resolves_to_the_right_winner() {
    let mut harness = Harness::new();

    for move1 in Move::ALL {
        for move2 in Move::ALL {
            let game_id = harness.committed_game(move1, move2);
            let request_id = harness
                .registry
                .request_resolution(game_id, alice(), 0)
                .unwrap();
            let callback = harness.answer(request_id);
            harness.deliver(&callback).unwrap();

            let expected = if move1 == move2 {
                None
            } else if move1.beats(move2) {
                Some(alice())
            } else {
                Some(bob())
            };
            assert_eq!(
                harness.registry.get_results(game_id).unwrap().winner,
                expected,
                "{:?} vs {:?}",
                move1,
                move2
            );
        }
    }
}

#[test]
fn unknown_request_id_changes_nothing() {
    let mut harness = Harness::new();
    let game_id = harness.committed_game(Move::Rock, Move::Paper);
    let request_id = harness
        .registry
        .request_resolution(game_id, alice(), 0)
        .unwrap();

    let mut callback = harness.answer(request_id);
    let cleartext = callback.cleartext.clone();
    callback.request_id = 999;
    callback.signature = OracleKey::new(ORACLE_KEY).sign(999, &cleartext).to_vec();

    assert_duel_error(harness.deliver(&callback), DuelError::UnknownRequest);

    let summary = harness.registry.get_game(game_id).unwrap();
    assert_eq!(summary.status, GameStatus::DecryptionPending);
    assert!(!summary.results_decrypted);
    assert_eq!(
        harness.registry.request(request_id).unwrap().state,
        RequestState::Pending
    );
}

#[test]
fn replayed_callback_is_rejected() {
    let mut harness = Harness::new();
    let game_id = harness.committed_game(Move::Scissors, Move::Rock);
    let request_id = harness
        .registry
        .request_resolution(game_id, alice(), 0)
        .unwrap();

    let callback = harness.answer(request_id);
    harness.deliver(&callback).unwrap();
    let first = harness.registry.get_results(game_id).unwrap();
    assert_eq!(first.winner, Some(bob()));

    assert_duel_error(harness.deliver(&callback), DuelError::CallbackReplayed);

    // A validly signed but different cleartext for the same id must not overwrite either
    let forged = Outcome {
        is_draw: false,
        player1_wins: true,
    }
    .encode();
    let signature = OracleKey::new(ORACLE_KEY).sign(request_id, &forged);
    assert_duel_error(
        harness.registry.on_decrypted(request_id, &forged, &signature),
        DuelError::CallbackReplayed,
    );

    assert_eq!(harness.registry.get_results(game_id).unwrap(), first);
    assert_eq!(
        harness.registry.request(request_id).unwrap().state,
        RequestState::Applied
    );
}

#[test]
fn resolution_cannot_be_requested_twice() {
    let mut harness = Harness::new();
    let game_id = harness.committed_game(Move::Rock, Move::Rock);

    let request_id = harness
        .registry
        .request_resolution(game_id, alice(), 0)
        .unwrap();
    assert_duel_error(
        harness.registry.request_resolution(game_id, bob(), 0),
        DuelError::InvalidGameState,
    );

    let callback = harness.answer(request_id);
    harness.deliver(&callback).unwrap();
    assert_duel_error(
        harness.registry.request_resolution(game_id, alice(), 0),
        DuelError::InvalidGameState,
    );
}

#[test]
fn callbacks_route_by_request_id_in_any_order() {
    let mut harness = Harness::new();
    let first_game = harness.committed_game(Move::Rock, Move::Scissors);
    let second_game = harness.committed_game(Move::Rock, Move::Paper);

    let first_request = harness
        .registry
        .request_resolution(first_game, alice(), 0)
        .unwrap();
    let second_request = harness
        .registry
        .request_resolution(second_game, bob(), 0)
        .unwrap();
    assert!(second_request > first_request);

    let first_callback = harness.answer(first_request);
    let second_callback = harness.answer(second_request);

    harness.deliver(&second_callback).unwrap();
    assert_eq!(
        harness.registry.get_game(first_game).unwrap().status,
        GameStatus::DecryptionPending
    );
    harness.deliver(&first_callback).unwrap();

    assert_eq!(
        harness.registry.get_results(first_game).unwrap().winner,
        Some(alice())
    );
    assert_eq!(
        harness.registry.get_results(second_game).unwrap().winner,
        Some(bob())
    );
}

#[test]
fn callback_from_another_identity_is_rejected() {
    let mut harness = Harness::new();
    let game_id = harness.committed_game(Move::Paper, Move::Rock);
    let request_id = harness
        .registry
        .request_resolution(game_id, alice(), 0)
        .unwrap();

    let impostor = MockOracle::new(OracleKey::new([0x99; 32]));
    let request = harness.registry.decryption_request(request_id).unwrap();
    let forged = impostor.fulfil(harness.registry.backend(), &request).unwrap();

    assert_duel_error(harness.deliver(&forged), DuelError::InvalidOracleSignature);
    assert!(!harness.registry.get_game(game_id).unwrap().results_decrypted);

    let genuine = harness.answer(request_id);
    harness.deliver(&genuine).unwrap();
    assert_eq!(
        harness.registry.get_results(game_id).unwrap().winner,
        Some(alice())
    );
}

#[test]
fn stale_callback_after_retry_is_ignored() {
    let mut harness = Harness::new();
    let game_id = harness.committed_game(Move::Paper, Move::Scissors);
    let timeout = RegistryConfig::default().decryption_timeout_secs;

    let stale = harness
        .registry
        .request_resolution(game_id, alice(), 100)
        .unwrap();
    let stale_callback = harness.answer(stale);

    assert_duel_error(
        harness.registry.retry_resolution(game_id, bob(), 100 + timeout - 1),
        DuelError::ResolutionNotExpired,
    );
    assert_duel_error(
        harness.registry.retry_resolution(game_id, mallory(), 100 + timeout),
        DuelError::NotAParticipant,
    );

    let fresh = harness
        .registry
        .retry_resolution(game_id, bob(), 100 + timeout)
        .unwrap();
    assert!(fresh > stale);

    assert_duel_error(harness.deliver(&stale_callback), DuelError::UnknownRequest);
    assert_eq!(
        harness.registry.get_game(game_id).unwrap().status,
        GameStatus::DecryptionPending
    );

    let callback = harness.answer(fresh);
    harness.deliver(&callback).unwrap();
    assert_eq!(harness.registry.get_results(game_id).unwrap().winner, Some(bob()));
}

#[test]
fn outsiders_cannot_touch_a_game() {
    let mut harness = Harness::new();
    let game_id = harness.registry.create_game(alice());

    assert_duel_error(
        harness.registry.join_game(game_id, alice()),
        DuelError::CannotPlaySelf,
    );
    harness.registry.join_game(game_id, bob()).unwrap();
    assert_duel_error(
        harness.registry.join_game(game_id, mallory()),
        DuelError::GameAlreadyFull,
    );

    assert_duel_error(
        harness.play(game_id, mallory(), Move::Rock),
        DuelError::NotAParticipant,
    );

    harness.play(game_id, alice(), Move::Rock).unwrap();
    assert_duel_error(
        harness.play(game_id, alice(), Move::Paper),
        DuelError::MoveAlreadyCommitted,
    );
    harness.play(game_id, bob(), Move::Rock).unwrap();

    assert_duel_error(
        harness.registry.request_resolution(game_id, mallory(), 0),
        DuelError::NotAParticipant,
    );
}

#[test]
fn ids_are_never_reused() {
    let mut harness = Harness::new();
    let mut request_ids = Vec::new();

    for _ in 0..4 {
        let game_id = harness.committed_game(Move::Rock, Move::Scissors);
        request_ids.push(
            harness
                .registry
                .request_resolution(game_id, alice(), 0)
                .unwrap(),
        );
    }

    assert!(request_ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(harness.registry.game_count(), 4);
    assert!(harness.registry.get_game(4).is_err());
}
