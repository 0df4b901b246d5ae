//! Every command set, one module each, with one struct per command.
//!
//! The field order of a command struct is its parameter order on the wire,
//! and the same goes for the reply types.

use std::{
    fmt::{self, Debug},
    io::{self, Read, Write},
    num::NonZeroU32,
};

use crate::{
    codec::{CodecError, JdwpReadable, JdwpReader, JdwpWritable, JdwpWriter},
    functional::Coll,
    jdwp_command,
    spec::*,
};

pub mod array_reference;
pub mod array_type;
pub mod class_loader_reference;
pub mod class_object_reference;
pub mod class_type;
pub mod event;
pub mod event_request;
pub mod interface_type;
pub mod method;
pub mod module_reference;
pub mod object_reference;
pub mod reference_type;
pub mod stack_frame;
pub mod string_reference;
pub mod thread_group_reference;
pub mod thread_reference;
pub mod virtual_machine;

/// Field command set (8) has no commands.
pub mod field {}
