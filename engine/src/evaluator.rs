use anchor_lang::prelude::*;

use crate::ciphertext::{EncryptionBackend, Handle};
use crate::error::DuelError;

/// The three choices, as the ordinals they are encrypted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Move {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Plaintext reference of the dominance cycle. Only clients and tests use this; the game
    /// itself evaluates through [`evaluate_winner`].
    pub fn beats(self, other: Move) -> bool {
        WINNING_PAIRS.contains(&(self, other))
    }
}

impl TryFrom<u8> for Move {
    type Error = anchor_lang::error::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Move::Rock),
            1 => Ok(Move::Paper),
            2 => Ok(Move::Scissors),
            _ => err!(DuelError::InvalidInputProof),
        }
    }
}

/// (winner, loser): rock beats scissors, paper beats rock, scissors beats paper
pub const WINNING_PAIRS: [(Move, Move); 3] = [
    (Move::Rock, Move::Scissors),
    (Move::Paper, Move::Rock),
    (Move::Scissors, Move::Paper),
];

/// Encrypted result of a game, pending decryption.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct EncryptedOutcome {
    pub is_draw: Handle,
    pub player1_wins: Handle,
}

impl EncryptedOutcome {
    pub fn handles(&self) -> [Handle; 2] {
        [self.is_draw, self.player1_wins]
    }
}

/// Computes the encrypted outcome of two committed moves.
///
/// `is_draw = move1 == move2` and `player1_wins` is the disjunction of the three winning
/// combinations. Only equality, AND and OR are applied, all over ciphertexts.
pub fn evaluate_winner<B>(backend: &mut B, move1: Handle, move2: Handle) -> Result<EncryptedOutcome>
where
    B: EncryptionBackend + ?Sized,
{
    let is_draw = backend.equal(move1, move2)?;

    let mut player1_wins: Option<Handle> = None;
    for (winning, losing) in WINNING_PAIRS {
        let plays_winning = backend.equal_scalar(move1, winning as u8)?;
        let plays_losing = backend.equal_scalar(move2, losing as u8)?;
        let combination = backend.and(plays_winning, plays_losing)?;

        player1_wins = Some(match player1_wins {
            Some(accumulated) => backend.or(accumulated, combination)?,
            None => combination,
        });
    }

    Ok(EncryptedOutcome {
        is_draw,
        player1_wins: player1_wins.ok_or(DuelError::UnknownCiphertext)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ciphertext::InputContext;
    use crate::testing::ClearBackend;

    fn committed(backend: &mut ClearBackend, value: Move, player: u8) -> Handle {
        let context = InputContext {
            game_id: 7,
            player: Pubkey::new_from_array([player; 32]),
        };
        let (input, proof) = backend.encrypt(value, &context);
        backend.verify_input(&input, &proof, &context).unwrap()
    }

    fn reveal(backend: &mut ClearBackend, outcome: EncryptedOutcome) -> (bool, bool) {
        for handle in outcome.handles() {
            backend.allow_decryption(handle).unwrap();
        }
        (
            backend.decrypt(outcome.is_draw).unwrap() == 1,
            backend.decrypt(outcome.player1_wins).unwrap() == 1,
        )
    }

    #[test]
    fn test_all_nine_pairs() {
        let mut backend = ClearBackend::new([3; 32]);

        for move1 in Move::ALL {
            for move2 in Move::ALL {
                let handle1 = committed(&mut backend, move1, 1);
                let handle2 = committed(&mut backend, move2, 2);

                let outcome = evaluate_winner(&mut backend, handle1, handle2).unwrap();
                let (is_draw, player1_wins) = reveal(&mut backend, outcome);

                assert_eq!(is_draw, move1 == move2, "{:?} vs {:?}", move1, move2);
                assert_eq!(player1_wins, move1.beats(move2), "{:?} vs {:?}", move1, move2);
                assert!(!(is_draw && player1_wins));
            }
        }
    }

    #[test]
    fn test_dominance_cycle() {
        assert!(Move::Rock.beats(Move::Scissors));
        assert!(Move::Paper.beats(Move::Rock));
        assert!(Move::Scissors.beats(Move::Paper));

        assert!(!Move::Scissors.beats(Move::Rock));
        assert!(!Move::Rock.beats(Move::Paper));
        assert!(!Move::Paper.beats(Move::Scissors));
        assert!(!Move::Rock.beats(Move::Rock));
    }

    #[test]
    fn test_move_from_ordinal() {
        assert_eq!(Move::try_from(0).unwrap(), Move::Rock);
        assert_eq!(Move::try_from(2).unwrap(), Move::Scissors);
        assert!(Move::try_from(3).is_err());
    }

    #[test]
    fn test_evaluation_never_grants_decryption() {
        let mut backend = ClearBackend::new([3; 32]);
        let handle1 = committed(&mut backend, Move::Rock, 1);
        let handle2 = committed(&mut backend, Move::Paper, 2);

        let outcome = evaluate_winner(&mut backend, handle1, handle2).unwrap();

        assert!(backend.decrypt(outcome.is_draw).is_err());
        assert!(backend.decrypt(outcome.player1_wins).is_err());
    }
}
