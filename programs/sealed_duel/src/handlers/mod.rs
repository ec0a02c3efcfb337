pub mod create_game;
pub use create_game::*;

pub mod join_game;
pub use join_game::*;

pub mod submit_move;
pub use submit_move::*;

pub mod resolve_game;
pub use resolve_game::*;
