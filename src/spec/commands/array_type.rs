//! ArrayType command set (4).

use super::*;

/// Creates a new array of the given type, with every element set to its
/// default value.
#[jdwp_command(TaggedObjectID, 4, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct NewInstance {
    pub array_type_id: ArrayTypeID,
    pub length: u32,
}
