pub mod game;
pub mod registry;
pub mod request;

pub use game::*;
pub use registry::*;
pub use request::*;
