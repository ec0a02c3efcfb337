use anchor_lang::prelude::*;
use duel_engine::Handle;

use crate::{state::MoveEnvelope, SubmitMove};

/// Seals the signer's encrypted move into their slot.
///
/// The move never leaves its encrypted form on chain: the ciphertext is stored as is, together
/// with the key and nonce the MXE needs to read it inside `resolve_game`. Whether the value is
/// one of the three valid moves is checked in the circuit, where an invalid move forfeits. A move
/// that reuses the opponent's encryption key or ciphertext is rejected.
///
/// # Arguments
/// * `game_id` - Id of the game (used for the game PDA derivation)
/// * `encrypted_move` - The move ciphertext, a 32-byte Rescue ciphertext of a `u8`
/// * `encryption_pubkey` - Player's x25519 public key shared with the MXE
/// * `nonce` - Nonce used for the encryption
pub fn submit_move(
    ctx: Context<SubmitMove>,
    game_id: u64,
    encrypted_move: [u8; 32],
    encryption_pubkey: [u8; 32],
    nonce: u128,
) -> Result<()> {
    let player = ctx.accounts.player.key();
    let made = ctx.accounts.game_account.seal_move(
        &player,
        Handle::from_bytes(encrypted_move),
        MoveEnvelope {
            encryption_pubkey,
            nonce,
        },
    )?;

    msg!("Move committed for game {} by {}", game_id, player);
    emit!(made);

    Ok(())
}
