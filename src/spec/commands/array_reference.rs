//! ArrayReference command set (13).

use super::*;

#[jdwp_command(u32, 13, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Length {
    pub array_id: ArrayID,
}

/// A range of array elements.
///
/// Primitive components come back untagged, object components tagged, see
/// [ArrayRegion].
#[jdwp_command(ArrayRegion, 13, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct GetValues {
    pub array_id: ArrayID,
    pub first_index: u32,
    pub length: u32,
}

/// Sets a range of array elements starting at `first_index`.
///
/// Values go untagged, object values must be assignment compatible with the
/// component type.
#[jdwp_command((), 13, 3)]
#[derive(Debug, Clone, PartialEq, JdwpWritable)]
pub struct SetValues {
    pub array_id: ArrayID,
    pub first_index: u32,
    pub values: Vec<UntaggedValue>,
}
