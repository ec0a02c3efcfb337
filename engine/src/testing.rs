//! Deterministic stand-ins for the external collaborators, for tests and local simulation.
//!
//! [`ClearBackend`] keeps plaintexts in memory behind opaque handles and enforces the same
//! contract a real backend does: context-bound input proofs, handle-only arithmetic and a
//! decryption access list. [`MockOracle`] plays the decryption oracle for the granted handles.

use std::collections::{HashMap, HashSet};
use std::fmt;

use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::ciphertext::{EncryptedInput, EncryptionBackend, Handle, InputContext, InputProof};
use crate::constants::{INPUT_PROOF_DOMAIN, MOVE_COUNT};
use crate::error::DuelError;
use crate::evaluator::Move;
use crate::oracle::{OracleKey, Outcome};
use crate::registry::DecryptionRequest;

pub struct ClearBackend {
    key: [u8; 32],
    values: HashMap<Handle, u8>,
    decryptable: HashSet<Handle>,
    next_handle: u64,
    next_nonce: u64,
}

impl ClearBackend {
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key,
            values: HashMap::new(),
            decryptable: HashSet::new(),
            next_handle: 0,
            next_nonce: 0,
        }
    }

    /// Client side: encrypts `value` for `context` and proves it is a valid move.
    pub fn encrypt(&mut self, value: Move, context: &InputContext) -> (EncryptedInput, InputProof) {
        self.encrypt_ordinal(value as u8, context)
    }

    /// Like [`ClearBackend::encrypt`] for any byte. Proofs of out-of-range values never verify.
    pub fn encrypt_ordinal(&mut self, value: u8, context: &InputContext) -> (EncryptedInput, InputProof) {
        let nonce = self.next_nonce;
        self.next_nonce += 1;

        let mut ciphertext = [0u8; 32];
        ciphertext[..8].copy_from_slice(&nonce.to_le_bytes());
        ciphertext[8] = value ^ self.pad(nonce);

        let input = EncryptedInput(ciphertext);
        let proof = InputProof(self.proof(&input, context).as_bytes().to_vec());
        (input, proof)
    }

    /// Oracle side: reads a handle the core has granted for decryption.
    pub fn decrypt(&self, handle: Handle) -> Result<u8> {
        require!(
            self.decryptable.contains(&handle),
            DuelError::DecryptionNotAllowed
        );
        self.value(handle)
    }

    fn value(&self, handle: Handle) -> Result<u8> {
        self.values
            .get(&handle)
            .copied()
            .ok_or_else(|| error!(DuelError::UnknownCiphertext))
    }

    fn store(&mut self, value: u8) -> Handle {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(b"handle");
        hasher.update(&self.next_handle.to_le_bytes());
        self.next_handle += 1;

        let handle = Handle::from_bytes(*hasher.finalize().as_bytes());
        self.values.insert(handle, value);
        handle
    }

    fn pad(&self, nonce: u64) -> u8 {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(b"pad");
        hasher.update(&nonce.to_le_bytes());
        hasher.finalize().as_bytes()[0]
    }

    fn proof(&self, input: &EncryptedInput, context: &InputContext) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(INPUT_PROOF_DOMAIN);
        hasher.update(&input.0);
        hasher.update(&context.to_bytes());
        hasher.finalize()
    }

    fn boolean(&mut self, value: bool) -> Handle {
        self.store(u8::from(value))
    }
}

impl EncryptionBackend for ClearBackend {
    fn trivial_encrypt(&mut self, value: u8) -> Handle {
        self.store(value)
    }

    fn verify_input(
        &mut self,
        input: &EncryptedInput,
        proof: &InputProof,
        context: &InputContext,
    ) -> Result<Handle> {
        let proof = <[u8; 32]>::try_from(proof.0.as_slice())
            .map_err(|_| error!(DuelError::InvalidInputProof))?;
        require!(
            self.proof(input, context) == blake3::Hash::from(proof),
            DuelError::InvalidInputProof
        );

        let mut nonce = [0u8; 8];
        nonce.copy_from_slice(&input.0[..8]);
        let value = input.0[8] ^ self.pad(u64::from_le_bytes(nonce));
        require!(value < MOVE_COUNT, DuelError::InvalidInputProof);

        Ok(self.store(value))
    }

    fn equal(&mut self, lhs: Handle, rhs: Handle) -> Result<Handle> {
        let result = self.value(lhs)? == self.value(rhs)?;
        Ok(self.boolean(result))
    }

    fn equal_scalar(&mut self, lhs: Handle, rhs: u8) -> Result<Handle> {
        let result = self.value(lhs)? == rhs;
        Ok(self.boolean(result))
    }

    fn and(&mut self, lhs: Handle, rhs: Handle) -> Result<Handle> {
        let result = self.value(lhs)? != 0 && self.value(rhs)? != 0;
        Ok(self.boolean(result))
    }

    fn or(&mut self, lhs: Handle, rhs: Handle) -> Result<Handle> {
        let result = self.value(lhs)? != 0 || self.value(rhs)? != 0;
        Ok(self.boolean(result))
    }

    fn allow_decryption(&mut self, handle: Handle) -> Result<()> {
        self.value(handle)?;
        self.decryptable.insert(handle);
        Ok(())
    }
}

/// What the oracle delivers back to `on_decrypted`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptionCallback {
    pub request_id: u64,
    pub cleartext: Vec<u8>,
    pub signature: Vec<u8>,
}

pub struct MockOracle {
    key: OracleKey,
}

impl MockOracle {
    pub fn new(key: OracleKey) -> Self {
        Self { key }
    }

    /// Decrypts the granted outcome handles and signs the answer.
    pub fn fulfil(
        &self,
        backend: &ClearBackend,
        request: &DecryptionRequest,
    ) -> Result<DecryptionCallback> {
        let outcome = Outcome {
            is_draw: backend.decrypt(request.outcome.is_draw)? != 0,
            player1_wins: backend.decrypt(request.outcome.player1_wins)? != 0,
        };
        let cleartext = outcome.encode();

        Ok(DecryptionCallback {
            request_id: request.request_id,
            signature: self.key.sign(request.request_id, &cleartext).to_vec(),
            cleartext,
        })
    }
}

/// Asserts that `result` failed with exactly `expected`. Works for any `#[error_code]` enum.
pub fn assert_duel_error<T, E>(result: Result<T>, expected: E)
where
    E: Into<u32> + Copy + fmt::Debug,
{
    match result {
        Ok(_) => panic!("expected {:?}, but the operation succeeded", expected),
        Err(Error::AnchorError(error)) => assert_eq!(
            error.error_code_number,
            expected.into(),
            "expected {:?}, got {}",
            expected,
            error.error_name
        ),
        Err(other) => panic!("expected {:?}, got {:?}", expected, other),
    }
}
