//! Ciphertext capability.
//!
//! The core never sees a plaintext move. It holds [`Handle`]s and combines them through an
//! [`EncryptionBackend`], which owns the actual ciphertexts. Swapping the backend swaps the
//! cryptography: the on-ledger deployment evaluates inside Arcium's MPC cluster, tests use the
//! deterministic `ClearBackend` of the `testing` feature.

use std::fmt;

use anchor_lang::prelude::*;

/// Opaque reference to an encrypted value held by the backend.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, PartialEq, Eq, Hash, InitSpace)]
pub struct Handle {
    bytes: [u8; 32],
}

impl Handle {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub const fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    pub fn is_zero(&self) -> bool {
        self.bytes == [0; 32]
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Handle({:02x}{:02x}{:02x}{:02x}..)",
            self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]
        )
    }
}

/// Client-produced ciphertext of a move, as submitted with `submit_move`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct EncryptedInput(pub [u8; 32]);

/// Validity proof accompanying an [`EncryptedInput`].
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InputProof(pub Vec<u8>);

/// What an input proof is bound to. A proof produced for one game or player must not verify
/// for another.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputContext {
    pub game_id: u64,
    pub player: Pubkey,
}

impl InputContext {
    pub fn to_bytes(&self) -> [u8; 40] {
        let mut bytes = [0u8; 40];
        bytes[..8].copy_from_slice(&self.game_id.to_le_bytes());
        bytes[8..].copy_from_slice(self.player.as_ref());
        bytes
    }
}

/// Homomorphic operations over encrypted values.
///
/// Every operation consumes handles and yields a fresh handle; none of them branches on or
/// returns plaintext. Booleans are encrypted as 0 or 1.
pub trait EncryptionBackend {
    /// Encrypts a public constant, e.g. the initial zero of an empty move slot.
    fn trivial_encrypt(&mut self, value: u8) -> Handle;

    /// Checks `input` against its `proof` for `context` and imports it as a local handle.
    ///
    /// Fails with [`crate::DuelError::InvalidInputProof`] when the backend rejects the input.
    fn verify_input(
        &mut self,
        input: &EncryptedInput,
        proof: &InputProof,
        context: &InputContext,
    ) -> Result<Handle>;

    fn equal(&mut self, lhs: Handle, rhs: Handle) -> Result<Handle>;

    fn equal_scalar(&mut self, lhs: Handle, rhs: u8) -> Result<Handle>;

    fn and(&mut self, lhs: Handle, rhs: Handle) -> Result<Handle>;

    fn or(&mut self, lhs: Handle, rhs: Handle) -> Result<Handle>;

    /// Grants the decryption oracle read access to `handle`.
    fn allow_decryption(&mut self, handle: Handle) -> Result<()>;
}
