//! ThreadReference command set (11).

use super::*;

#[jdwp_command(String, 11, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Name {
    pub thread: ThreadID,
}

/// Suspends the thread.
///
/// Suspends are counted, the thread runs again once it got as many
/// [Resume]s as it got suspends. A thread suspended in native code keeps
/// running until it calls back into the VM.
#[jdwp_command((), 11, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Suspend {
    pub thread: ThreadID,
}

#[jdwp_command((), 11, 3)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Resume {
    pub thread: ThreadID,
}

#[jdwp_command((ThreadStatus, SuspendStatus), 11, 4)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Status {
    pub thread: ThreadID,
}

#[jdwp_command(ThreadGroupID, 11, 5)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ThreadGroup {
    pub thread: ThreadID,
}

/// Frames of a suspended thread's stack, topmost first.
#[jdwp_command(Vec<(FrameID, Location)>, 11, 6)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Frames {
    pub thread: ThreadID,
    /// Index of the first frame, 0 is the current one
    pub start_frame: u32,
    pub limit: FrameLimit,
}

/// Writes a count into a JDWP `int` field whose negative values mean
/// something else.
fn write_int<W: Write>(kind: &'static str, n: u32, write: &mut JdwpWriter<W>) -> io::Result<()> {
    i32::try_from(n)
        .map_err(|_| CodecError::OutOfRange {
            kind,
            value: n.into(),
        })?
        .write(write)
}

/// How many frames [Frames] returns.
///
/// Limits above `i32::MAX` cannot be encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameLimit {
    Limit(u32),
    /// Everything from `start_frame` on, -1 on the wire.
    AllRemaining,
}

impl JdwpReadable for FrameLimit {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        match i32::read(read)? {
            -1 => Ok(FrameLimit::AllRemaining),
            n => u32::try_from(n).map(FrameLimit::Limit).map_err(|_| {
                CodecError::UnknownDiscriminant {
                    kind: "FrameLimit",
                    value: n as i64,
                }
                .into()
            }),
        }
    }
}

impl JdwpWritable for FrameLimit {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        match self {
            FrameLimit::Limit(n) => write_int("FrameLimit", *n, write),
            FrameLimit::AllRemaining => (-1i32).write(write),
        }
    }
}

#[jdwp_command(u32, 11, 7)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct FrameCount {
    pub thread: ThreadID,
}

/// Monitors owned by the thread, needs `can_get_owned_monitor_info`.
#[jdwp_command(Vec<TaggedObjectID>, 11, 8)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct OwnedMonitors {
    pub thread: ThreadID,
}

/// The monitor the thread is blocked on or waiting for, if any.
///
/// Needs `can_get_current_contended_monitor`.
#[jdwp_command(Option<TaggedObjectID>, 11, 9)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct CurrentContendedMonitor {
    pub thread: ThreadID,
}

/// Stops the thread with an asynchronous exception, like
/// `java.lang.Thread.stop`.
#[jdwp_command((), 11, 10)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Stop {
    pub thread: ThreadID,
    /// Instance of `java.lang.Throwable` or a subclass, not tagged on the
    /// wire
    pub throwable: ObjectID,
}

#[jdwp_command((), 11, 11)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Interrupt {
    pub thread: ThreadID,
}

/// Number of outstanding suspends of the thread.
#[jdwp_command(u32, 11, 12)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct SuspendCount {
    pub thread: ThreadID,
}

/// Owned monitors along with the depth of the frame that locked each one.
///
/// Needs `can_get_monitor_frame_info`.
#[jdwp_command(Vec<(TaggedObjectID, StackDepth)>, 11, 13)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct OwnedMonitorsStackDepthInfo {
    pub thread: ThreadID,
}

/// Depths above `i32::MAX` cannot be encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StackDepth {
    Depth(u32),
    /// Locked by JNI code, -1 on the wire.
    Unknown,
}

impl JdwpReadable for StackDepth {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        match i32::read(read)? {
            -1 => Ok(StackDepth::Unknown),
            n => u32::try_from(n).map(StackDepth::Depth).map_err(|_| {
                CodecError::UnknownDiscriminant {
                    kind: "StackDepth",
                    value: n as i64,
                }
                .into()
            }),
        }
    }
}

impl JdwpWritable for StackDepth {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        match self {
            StackDepth::Depth(n) => write_int("StackDepth", *n, write),
            StackDepth::Unknown => (-1i32).write(write),
        }
    }
}

/// Returns from the topmost frame right away with the given value.
///
/// Needs `can_force_early_return`. The value has to match the method's
/// return type, `Void` for void methods.
#[jdwp_command((), 11, 14)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ForceEarlyReturn {
    pub thread: ThreadID,
    pub value: Value,
}

#[jdwp_command(bool, 11, 15)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct IsVirtual {
    pub thread: ThreadID,
}
