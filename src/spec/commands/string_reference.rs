//! StringReference command set (10).

use super::*;

/// Characters of a string object.
#[jdwp_command(String, 10, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Value {
    pub string_object: StringID,
}
