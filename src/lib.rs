#![deny(missing_debug_implementations, clippy::undocumented_unsafe_blocks)]

extern crate self as jdwp;

pub mod client;
pub mod codec;
pub mod spec;

mod functional;

pub use functional::{Coll, Single};

pub(crate) use jdwp_wire_macros::jdwp_command;
