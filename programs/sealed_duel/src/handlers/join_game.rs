use anchor_lang::prelude::*;

use crate::JoinGame;

/// Takes the second seat of a game that is waiting for players.
///
/// # Arguments
/// * `game_id` - Id of the game to join, also used for the game PDA derivation
pub fn join_game(ctx: Context<JoinGame>, game_id: u64) -> Result<()> {
    let player = ctx.accounts.player.key();
    let joined = ctx.accounts.game_account.game.join(player)?;

    msg!("Player {} joined game {}", player, game_id);
    emit!(joined);

    Ok(())
}
