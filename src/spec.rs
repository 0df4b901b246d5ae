//! The protocol itself: packet framing, constants, data types and every
//! command with its reply.

mod commands;
mod constants;
mod protocol;
mod types;

pub use commands::*;
pub use constants::*;
pub use protocol::*;
pub use types::*;
