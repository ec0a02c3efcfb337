use anchor_lang::prelude::*;
use arcium_anchor::prelude::*;
use arcium_client::idl::arcium::types::CallbackAccount;
use duel_engine::{constants::DEFAULT_DECRYPTION_TIMEOUT_SECS, Outcome};

use crate::{
    error::ErrorCode, InitResolveGameCompDef, RequestResolution, ResolveGameCallback,
    ResolveGameOutput, ResolveGameOutputStruct0,
};

/// One-off job to create computation definition for `resolve_game` in encrypted-ixs/src/lib.rs.
///
/// Must be called once before any game can be resolved.
pub fn init_resolve_game_comp_def(ctx: Context<InitResolveGameCompDef>) -> Result<()> {
    init_comp_def(ctx.accounts, None, None)?;
    Ok(())
}

/// Queues the encrypted winner evaluation for a game whose moves are both committed.
///
/// Either participant may call this. The computation offset doubles as the request id: the
/// callback for this offset is the only one that can finish the game, and the request PDA at
/// that offset makes sure the id is never bound twice.
///
/// # Arguments
/// * `computation_offset` - Offset of the queued computation, used as the request id
/// * `game_id` - Id of the game (used for the game PDA derivation)
pub fn request_resolution(
    ctx: Context<RequestResolution>,
    computation_offset: u64,
    game_id: u64,
) -> Result<()> {
    let caller = ctx.accounts.payer.key();
    let now = Clock::get()?.unix_timestamp;

    let requested = ctx
        .accounts
        .game_account
        .game
        .mark_pending(&caller, computation_offset, None, now)?;

    queue_resolution(ctx, computation_offset, game_id)?;

    msg!(
        "Resolution of game {} queued as request {}",
        game_id,
        computation_offset
    );
    emit!(requested);

    Ok(())
}

/// Re-queues the evaluation of a game whose previous request never came back.
///
/// Only allowed once the pending request is older than the decryption timeout. The old request
/// id stops matching the game, so a late callback for it is rejected.
pub fn retry_resolution(
    ctx: Context<RequestResolution>,
    computation_offset: u64,
    game_id: u64,
) -> Result<()> {
    let caller = ctx.accounts.payer.key();
    let now = Clock::get()?.unix_timestamp;

    let (retired, requested) = ctx.accounts.game_account.game.reissue_request(
        &caller,
        computation_offset,
        now,
        DEFAULT_DECRYPTION_TIMEOUT_SECS,
    )?;

    queue_resolution(ctx, computation_offset, game_id)?;

    msg!(
        "Resolution of game {} re-queued as request {}, superseding {}",
        game_id,
        computation_offset,
        retired
    );
    emit!(requested);

    Ok(())
}

fn queue_resolution(
    ctx: Context<RequestResolution>,
    computation_offset: u64,
    game_id: u64,
) -> Result<()> {
    let request = &mut ctx.accounts.request_account;
    request.bump = ctx.bumps.request_account;
    request.request_id = computation_offset;
    request.game_id = game_id;
    request.applied = false;

    let game_account = &ctx.accounts.game_account;
    let [envelope1, envelope2] = game_account.envelopes;
    let computation_args = ArgBuilder::new()
        .x25519_pubkey(envelope1.encryption_pubkey)
        .plaintext_u128(envelope1.nonce)
        .encrypted_u8(game_account.game.move1.to_bytes())
        .x25519_pubkey(envelope2.encryption_pubkey)
        .plaintext_u128(envelope2.nonce)
        .encrypted_u8(game_account.game.move2.to_bytes())
        .build();

    let callback = ResolveGameCallback::callback_ix(
        computation_offset,
        &ctx.accounts.mxe_account,
        &[
            CallbackAccount {
                pubkey: ctx.accounts.game_account.key(),
                is_writable: true,
            },
            CallbackAccount {
                pubkey: ctx.accounts.request_account.key(),
                is_writable: true,
            },
        ],
    )?;

    ctx.accounts.sign_pda_account.bump = ctx.bumps.sign_pda_account;

    queue_computation(
        ctx.accounts,
        computation_offset,
        computation_args,
        None,
        vec![callback],
        1,
        0,
    )?;
    Ok(())
}

/// Applies the revealed outcome to the game the request was made for.
///
/// `verify_output` checks the cluster signature over the computation output, so only the MXE
/// can finish a game. The computation must be the one queued for the request, the request must
/// belong to the game and must not have been applied, and it must still be the game's pending
/// request.
pub fn resolve_game_callback(
    ctx: Context<ResolveGameCallback>,
    output: SignedComputationOutputs<ResolveGameOutput>,
) -> Result<()> {
    let outcome = match output.verify_output(
        &ctx.accounts.cluster_account,
        &ctx.accounts.computation_account,
    ) {
        Ok(ResolveGameOutput {
            field_0:
                ResolveGameOutputStruct0 {
                    field_0: is_draw,
                    field_1: player1_wins,
                },
        }) => Outcome {
            is_draw,
            player1_wins,
        },
        Err(_) => return Err(ErrorCode::AbortedComputation.into()),
    };

    let mxe_account = &ctx.accounts.mxe_account;
    let request_id = ctx.accounts.request_account.request_id;
    let expected_computation = derive_comp_pda!(request_id, mxe_account, ErrorCode::ClusterNotSet);

    let request = &mut ctx.accounts.request_account;
    let game = &mut ctx.accounts.game_account.game;
    request.ensure_answers(
        game.id,
        &ctx.accounts.computation_account.key(),
        &expected_computation,
    )?;

    let finished = game.apply_decryption(request.request_id, outcome)?;
    request.applied = true;

    msg!(
        "Game {} finished: draw {}, winner {:?}",
        finished.game_id,
        finished.is_draw,
        finished.winner
    );
    emit!(finished);

    Ok(())
}
