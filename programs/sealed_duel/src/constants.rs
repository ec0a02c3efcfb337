use arcium_anchor::prelude::*;

// Computation definition offset for the encrypted instruction in encrypted-ixs/src/lib.rs
pub const COMP_DEF_OFFSET_RESOLVE_GAME: u32 = comp_def_offset("resolve_game");

// PDA seeds
pub const REGISTRY_SEED: &[u8] = b"registry";
pub const GAME_SEED: &[u8] = b"game";
pub const REQUEST_SEED: &[u8] = b"request";
