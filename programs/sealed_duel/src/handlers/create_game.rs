use anchor_lang::prelude::*;
use duel_engine::{events::GameCreated, DuelError, Game, Handle};

use crate::{state::MoveEnvelope, CreateGame, InitRegistry};

/// One-off job to create the registry PDA that hands out game ids.
pub fn init_registry(ctx: Context<InitRegistry>) -> Result<()> {
    ctx.accounts.registry_account.bump = ctx.bumps.registry_account;
    ctx.accounts.registry_account.game_count = 0;

    msg!("Registry initialized by {}", ctx.accounts.authority.key());
    Ok(())
}

/// Opens a new game with the signer as player1.
///
/// The game id is the registry's current count, which is also part of the game PDA seeds. Both
/// move slots start out empty and the game waits for a second player.
pub fn create_game(ctx: Context<CreateGame>) -> Result<()> {
    let creator = ctx.accounts.creator.key();
    let registry = &mut ctx.accounts.registry_account;
    let game_id = registry.game_count;
    registry.game_count = game_id
        .checked_add(1)
        .ok_or(DuelError::CounterOverflow)?;

    let game_account = &mut ctx.accounts.game_account;
    game_account.bump = ctx.bumps.game_account;
    game_account.game = Game::new(game_id, creator, Handle::default());
    game_account.envelopes = [MoveEnvelope::default(); 2];

    msg!("Game {} created by {}", game_id, creator);
    emit!(GameCreated {
        game_id,
        player1: creator,
    });

    Ok(())
}
