//! StackFrame command set (16).

use super::*;

/// Values of local variables in a frame.
///
/// Each slot is given with the tag of the expected type, which also decides
/// how the value comes back.
#[jdwp_command(C::Map<Value>, 16, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct GetValues<C: Coll<Item = (u32, Tag)>> {
    pub thread_id: ThreadID,
    pub frame_id: FrameID,
    pub slots: C,
}

/// Sets local variables of a frame, object values must be assignment
/// compatible with the variable type.
#[jdwp_command((), 16, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct SetValues {
    pub thread_id: ThreadID,
    pub frame_id: FrameID,
    pub slot_values: Vec<(u32, Value)>,
}

/// The `this` object of the frame, `None` for static and native frames.
#[jdwp_command(Option<TaggedObjectID>, 16, 3)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ThisObject {
    pub thread_id: ThreadID,
    pub frame_id: FrameID,
}

/// Pops the frame and everything above it, needs `can_pop_frames`.
#[jdwp_command((), 16, 4)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct PopFrames {
    pub thread_id: ThreadID,
    pub frame_id: FrameID,
}
