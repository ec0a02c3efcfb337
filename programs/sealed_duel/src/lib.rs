// Stops Rust Analyzer complaining about missing configs
// See https://solana.stackexchange.com/questions/17777
#![allow(unexpected_cfgs)]
// Fix warning: use of deprecated method `anchor_lang::prelude::AccountInfo::<'a>::realloc`: Use AccountInfo::resize() instead
// See https://solana.stackexchange.com/questions/22979
#![allow(deprecated)]

use anchor_lang::prelude::*;
use arcium_anchor::prelude::*;

pub mod constants;
pub mod error;
pub mod handlers;
pub mod state;

use constants::*;
pub use error::ErrorCode;
use state::*;

declare_id!("HgNhPdFYJK6rj3JsHd3Hk1RK7YVPLP9zYnSD7dYDcpms");

#[arcium_program]
pub mod sealed_duel {
    use super::*;

    pub fn init_registry(ctx: Context<InitRegistry>) -> Result<()> {
        handlers::create_game::init_registry(ctx)
    }

    pub fn create_game(ctx: Context<CreateGame>) -> Result<()> {
        handlers::create_game::create_game(ctx)
    }

    pub fn join_game(ctx: Context<JoinGame>, game_id: u64) -> Result<()> {
        handlers::join_game::join_game(ctx, game_id)
    }

    pub fn submit_move(
        ctx: Context<SubmitMove>,
        game_id: u64,
        encrypted_move: [u8; 32],
        encryption_pubkey: [u8; 32],
        nonce: u128,
    ) -> Result<()> {
        handlers::submit_move::submit_move(ctx, game_id, encrypted_move, encryption_pubkey, nonce)
    }

    pub fn init_resolve_game_comp_def(ctx: Context<InitResolveGameCompDef>) -> Result<()> {
        handlers::resolve_game::init_resolve_game_comp_def(ctx)
    }

    pub fn request_resolution(
        ctx: Context<RequestResolution>,
        computation_offset: u64,
        game_id: u64,
    ) -> Result<()> {
        handlers::resolve_game::request_resolution(ctx, computation_offset, game_id)
    }

    pub fn retry_resolution(
        ctx: Context<RequestResolution>,
        computation_offset: u64,
        game_id: u64,
    ) -> Result<()> {
        handlers::resolve_game::retry_resolution(ctx, computation_offset, game_id)
    }

    #[arcium_callback(encrypted_ix = "resolve_game")]
    pub fn resolve_game_callback(
        ctx: Context<ResolveGameCallback>,
        output: SignedComputationOutputs<ResolveGameOutput>,
    ) -> Result<()> {
        handlers::resolve_game::resolve_game_callback(ctx, output)
    }

    // Account struct definitions - these need to be inside the arcium_program module
    // so they can access the generated SignerAccount type

    #[derive(Accounts)]
    pub struct InitRegistry<'info> {
        #[account(mut)]
        pub authority: Signer<'info>,

        #[account(
            init,
            payer = authority,
            space = 8 + RegistryAccount::INIT_SPACE,
            seeds = [REGISTRY_SEED],
            bump,
        )]
        pub registry_account: Account<'info, RegistryAccount>,

        pub system_program: Program<'info, System>,
    }

    #[derive(Accounts)]
    pub struct CreateGame<'info> {
        #[account(mut)]
        pub creator: Signer<'info>,

        #[account(
            mut,
            seeds = [REGISTRY_SEED],
            bump = registry_account.bump,
        )]
        pub registry_account: Account<'info, RegistryAccount>,

        #[account(
            init,
            payer = creator,
            space = 8 + GameAccount::INIT_SPACE,
            seeds = [GAME_SEED, registry_account.game_count.to_le_bytes().as_ref()],
            bump,
        )]
        pub game_account: Box<Account<'info, GameAccount>>,

        pub system_program: Program<'info, System>,
    }

    #[derive(Accounts)]
    #[instruction(game_id: u64)]
    pub struct JoinGame<'info> {
        pub player: Signer<'info>,

        #[account(
            mut,
            seeds = [GAME_SEED, game_id.to_le_bytes().as_ref()],
            bump = game_account.bump,
        )]
        pub game_account: Box<Account<'info, GameAccount>>,
    }

    #[derive(Accounts)]
    #[instruction(game_id: u64)]
    pub struct SubmitMove<'info> {
        pub player: Signer<'info>,

        #[account(
            mut,
            seeds = [GAME_SEED, game_id.to_le_bytes().as_ref()],
            bump = game_account.bump,
        )]
        pub game_account: Box<Account<'info, GameAccount>>,
    }

    #[init_computation_definition_accounts("resolve_game", payer)]
    #[derive(Accounts)]
    pub struct InitResolveGameCompDef<'info> {
        #[account(mut)]
        pub payer: Signer<'info>,

        #[account(
            mut,
            address = derive_mxe_pda!()
        )]
        pub mxe_account: Box<Account<'info, MXEAccount>>,

        #[account(mut)]
        /// CHECK: comp_def_account, checked by arcium program.
        /// Can't check it here as it's not initialized yet.
        pub comp_def_account: UncheckedAccount<'info>,

        pub arcium_program: Program<'info, Arcium>,

        pub system_program: Program<'info, System>,
    }

    /// Shared by `request_resolution` and `retry_resolution`: both queue `resolve_game` over the
    /// committed moves and bind a fresh request record to the computation offset.
    #[queue_computation_accounts("resolve_game", payer)]
    #[derive(Accounts)]
    #[instruction(computation_offset: u64, game_id: u64)]
    pub struct RequestResolution<'info> {
        #[account(mut)]
        pub payer: Signer<'info>,

        #[account(
            init_if_needed,
            space = 9,
            payer = payer,
            seeds = [&SIGN_PDA_SEED],
            bump,
            address = derive_sign_pda!(),
        )]
        pub sign_pda_account: Account<'info, SignerAccount>,

        #[account(
            address = derive_mxe_pda!()
        )]
        pub mxe_account: Box<Account<'info, MXEAccount>>,

        #[account(
            mut,
            address = derive_mempool_pda!(mxe_account, ErrorCode::ClusterNotSet)
        )]
        /// CHECK: mempool_account, checked by the arcium program
        pub mempool_account: UncheckedAccount<'info>,

        #[account(
            mut,
            address = derive_execpool_pda!(mxe_account, ErrorCode::ClusterNotSet)
        )]
        /// CHECK: executing_pool, checked by the arcium program
        pub executing_pool: UncheckedAccount<'info>,

        #[account(
            mut,
            address = derive_comp_pda!(computation_offset, mxe_account, ErrorCode::ClusterNotSet)
        )]
        /// CHECK: computation_account, checked by the arcium program.
        pub computation_account: UncheckedAccount<'info>,

        #[account(
            address = derive_comp_def_pda!(COMP_DEF_OFFSET_RESOLVE_GAME)
        )]
        pub comp_def_account: Box<Account<'info, ComputationDefinitionAccount>>,

        #[account(
            mut,
            address = derive_cluster_pda!(mxe_account, ErrorCode::ClusterNotSet)
        )]
        pub cluster_account: Box<Account<'info, Cluster>>,

        #[account(
            mut,
            address = ARCIUM_FEE_POOL_ACCOUNT_ADDRESS,
        )]
        pub pool_account: Box<Account<'info, FeePool>>,

        #[account(
            address = ARCIUM_CLOCK_ACCOUNT_ADDRESS,
        )]
        pub clock_account: Box<Account<'info, ClockAccount>>,

        pub system_program: Program<'info, System>,

        pub arcium_program: Program<'info, Arcium>,

        #[account(
            mut,
            seeds = [GAME_SEED, game_id.to_le_bytes().as_ref()],
            bump = game_account.bump,
        )]
        pub game_account: Box<Account<'info, GameAccount>>,

        #[account(
            init,
            payer = payer,
            space = 8 + ResolutionRequest::INIT_SPACE,
            seeds = [REQUEST_SEED, computation_offset.to_le_bytes().as_ref()],
            bump,
        )]
        pub request_account: Account<'info, ResolutionRequest>,
    }

    #[callback_accounts("resolve_game")]
    #[derive(Accounts)]
    pub struct ResolveGameCallback<'info> {
        pub arcium_program: Program<'info, Arcium>,

        #[account(
            address = derive_comp_def_pda!(COMP_DEF_OFFSET_RESOLVE_GAME)
        )]
        pub comp_def_account: Box<Account<'info, ComputationDefinitionAccount>>,

        #[account(
            address = derive_mxe_pda!()
        )]
        pub mxe_account: Box<Account<'info, MXEAccount>>,

        /// CHECK: computation_account, checked by arcium program via constraints in the callback context.
        pub computation_account: UncheckedAccount<'info>,

        #[account(
            address = derive_cluster_pda!(mxe_account, ErrorCode::ClusterNotSet)
        )]
        pub cluster_account: Box<Account<'info, Cluster>>,

        #[account(address = ::anchor_lang::solana_program::sysvar::instructions::ID)]
        /// CHECK: instructions_sysvar, checked by the account constraint
        pub instructions_sysvar: AccountInfo<'info>,

        // Passed in as callback accounts by queue_computation
        #[account(mut)]
        pub game_account: Box<Account<'info, GameAccount>>,

        #[account(mut)]
        pub request_account: Account<'info, ResolutionRequest>,
    }
}

pub use sealed_duel::{
    CreateGame, InitRegistry, InitResolveGameCompDef, JoinGame, RequestResolution,
    ResolveGameCallback, ResolveGameOutput, ResolveGameOutputStruct0, SubmitMove,
};
