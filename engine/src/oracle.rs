//! Decryption oracle boundary.
//!
//! The oracle answers a decryption request later, out of band, with the cleartext and a
//! signature. Exactly one oracle identity is trusted per registry: a callback is applied only if
//! its signature is the keyed BLAKE3 tag of `(request_id, cleartext)` under that identity's key.

use anchor_lang::prelude::*;

use crate::constants::ORACLE_SIGNATURE_DOMAIN;
use crate::error::DuelError;

/// Decrypted result of a game as delivered by the oracle.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub is_draw: bool,
    pub player1_wins: bool,
}

impl Outcome {
    /// Parses the borsh encoding of `(is_draw, player1_wins)`: exactly two bytes, each 0 or 1.
    pub fn decode(cleartext: &[u8]) -> Result<Self> {
        let outcome =
            Outcome::try_from_slice(cleartext).map_err(|_| error!(DuelError::MalformedCleartext))?;
        outcome.validate()?;
        Ok(outcome)
    }

    pub fn encode(&self) -> Vec<u8> {
        vec![u8::from(self.is_draw), u8::from(self.player1_wins)]
    }

    /// A draw has no winner.
    pub fn validate(&self) -> Result<()> {
        require!(
            !(self.is_draw && self.player1_wins),
            DuelError::MalformedCleartext
        );
        Ok(())
    }
}

/// Authenticates decryption callbacks.
pub trait CallbackVerifier {
    fn verify(&self, request_id: u64, cleartext: &[u8], signature: &[u8]) -> bool;
}

/// The fixed oracle identity. Whoever holds the key can sign callbacks; the registry holds a
/// copy to check them.
#[derive(Clone)]
pub struct OracleKey {
    key: [u8; 32],
}

impl OracleKey {
    pub const fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    pub fn sign(&self, request_id: u64, cleartext: &[u8]) -> [u8; 32] {
        *self.tag(request_id, cleartext).as_bytes()
    }

    fn tag(&self, request_id: u64, cleartext: &[u8]) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(ORACLE_SIGNATURE_DOMAIN);
        hasher.update(&request_id.to_le_bytes());
        hasher.update(cleartext);
        hasher.finalize()
    }
}

impl CallbackVerifier for OracleKey {
    fn verify(&self, request_id: u64, cleartext: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = <[u8; 32]>::try_from(signature) else {
            return false;
        };
        // blake3::Hash equality is constant time
        self.tag(request_id, cleartext) == blake3::Hash::from(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_encoding() {
        let outcome = Outcome {
            is_draw: false,
            player1_wins: true,
        };
        assert_eq!(outcome.encode(), vec![0, 1]);
        assert_eq!(Outcome::decode(&outcome.encode()).unwrap(), outcome);
    }

    #[test]
    fn test_malformed_cleartext() {
        assert!(Outcome::decode(&[]).is_err());
        assert!(Outcome::decode(&[1]).is_err());
        assert!(Outcome::decode(&[0, 1, 0]).is_err());
        assert!(Outcome::decode(&[2, 0]).is_err());
        assert!(Outcome::decode(&[1, 1]).is_err());
    }

    #[test]
    fn test_signature_binds_request_and_cleartext() {
        let oracle = OracleKey::new([7; 32]);
        let signature = oracle.sign(5, &[0, 1]);

        assert!(oracle.verify(5, &[0, 1], &signature));
        assert!(!oracle.verify(6, &[0, 1], &signature));
        assert!(!oracle.verify(5, &[1, 0], &signature));
        assert!(!oracle.verify(5, &[0, 1], &signature[..31]));
    }

    #[test]
    fn test_other_identity_is_rejected() {
        let oracle = OracleKey::new([7; 32]);
        let impostor = OracleKey::new([8; 32]);

        let signature = impostor.sign(5, &[1, 0]);
        assert!(!oracle.verify(5, &[1, 0], &signature));
    }
}
