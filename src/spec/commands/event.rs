//! Event command set (64), the only one sent by the target VM.

use super::*;

/// A batch of events the target VM reports together.
///
/// Events that happen at the same location in the same thread (a breakpoint
/// hit right after a step ends there, for example) are grouped. Threads are
/// suspended as `suspend_policy` says, which is the most suspending policy
/// among the requests that matched.
#[jdwp_command((), 64, 100)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Composite {
    pub suspend_policy: SuspendPolicy,
    pub events: Vec<Event>,
}

/// A single event of a [Composite].
///
/// Every event starts with the ID of the request that caused it. Events the
/// target VM generates without a request ([VmStart](Event::VmStart) and
/// [VmDeath](Event::VmDeath)) carry 0 there, which reads as `None`.
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum Event {
    /// The thread finished a step request.
    SingleStep {
        request_id: RequestID,
        thread: ThreadID,
        location: Location,
    } = EventKind::SingleStep as u8,
    /// The thread hit a breakpoint, before running the code at `location`.
    Breakpoint {
        request_id: RequestID,
        thread: ThreadID,
        location: Location,
    } = EventKind::Breakpoint as u8,
    /// An exception was thrown, before any handler ran.
    Exception {
        request_id: RequestID,
        thread: ThreadID,
        /// Where the exception was thrown
        location: Location,
        exception: TaggedObjectID,
        /// Where it is going to be caught, `None` if it is not going to be
        /// caught at all
        catch_location: Option<Location>,
    } = EventKind::Exception as u8,
    /// The thread started, before it runs any code.
    ThreadStart {
        request_id: RequestID,
        thread: ThreadID,
    } = EventKind::ThreadStart as u8,
    /// The thread is about to terminate.
    ThreadDeath {
        request_id: RequestID,
        thread: ThreadID,
    } = EventKind::ThreadDeath as u8,
    /// A reference type was prepared, its static fields are in place but
    /// no code has run yet.
    ClassPrepare {
        request_id: RequestID,
        /// The thread that caused the preparation, `None` when it was the
        /// VM itself
        thread: Option<ThreadID>,
        ref_type: TaggedReferenceTypeID,
        signature: String,
        status: ClassStatus,
    } = EventKind::ClassPrepare as u8,
    /// A class was unloaded, only the signature is left of it.
    ClassUnload {
        request_id: RequestID,
        signature: String,
    } = EventKind::ClassUnload as u8,
    /// A watched field is about to be read.
    FieldAccess {
        request_id: RequestID,
        thread: ThreadID,
        location: Location,
        ref_type: TaggedReferenceTypeID,
        field_id: FieldID,
        /// `None` for static fields
        object: Option<TaggedObjectID>,
    } = EventKind::FieldAccess as u8,
    /// A watched field is about to be written.
    FieldModification {
        request_id: RequestID,
        thread: ThreadID,
        location: Location,
        ref_type: TaggedReferenceTypeID,
        field_id: FieldID,
        object: Option<TaggedObjectID>,
        /// The value about to be stored
        value: Value,
    } = EventKind::FieldModification as u8,
    /// A method is entered, before any of its code runs.
    MethodEntry {
        request_id: RequestID,
        thread: ThreadID,
        location: Location,
    } = EventKind::MethodEntry as u8,
    /// A method is about to return, `location` is the return instruction.
    MethodExit {
        request_id: RequestID,
        thread: ThreadID,
        location: Location,
    } = EventKind::MethodExit as u8,
    /// Same as [MethodExit](Event::MethodExit) with the return value,
    /// needs `can_get_method_return_values`.
    MethodExitWithReturnValue {
        request_id: RequestID,
        thread: ThreadID,
        location: Location,
        value: Value,
    } = EventKind::MethodExitWithReturnValue as u8,
    /// The thread is about to block on a monitor held by another thread.
    MonitorContendedEnter {
        request_id: RequestID,
        thread: ThreadID,
        object: TaggedObjectID,
        location: Location,
    } = EventKind::MonitorContendedEnter as u8,
    /// The thread got the monitor it was blocked on.
    MonitorContendedEntered {
        request_id: RequestID,
        thread: ThreadID,
        object: TaggedObjectID,
        location: Location,
    } = EventKind::MonitorContendedEntered as u8,
    /// The thread is about to wait on a monitor.
    MonitorWait {
        request_id: RequestID,
        thread: ThreadID,
        object: TaggedObjectID,
        location: Location,
        /// Milliseconds
        timeout: i64,
    } = EventKind::MonitorWait as u8,
    /// The thread is done waiting on a monitor.
    MonitorWaited {
        request_id: RequestID,
        thread: ThreadID,
        object: TaggedObjectID,
        location: Location,
        timed_out: bool,
    } = EventKind::MonitorWaited as u8,
    /// The VM finished initializing, before the main thread runs.
    VmStart {
        request_id: Option<RequestID>,
        thread: ThreadID,
    } = EventKind::VmStart as u8,
    /// The VM is shutting down, the last event the debugger gets.
    VmDeath {
        request_id: Option<RequestID>,
    } = EventKind::VmDeath as u8,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        // SAFETY: Self and EventKind fulfill the requirements
        unsafe { crate::spec::types::tag(self) }
    }

    /// The request that caused the event, `None` for automatically
    /// generated ones.
    pub fn request_id(&self) -> Option<RequestID> {
        use Event::*;
        match self {
            SingleStep { request_id, .. }
            | Breakpoint { request_id, .. }
            | Exception { request_id, .. }
            | ThreadStart { request_id, .. }
            | ThreadDeath { request_id, .. }
            | ClassPrepare { request_id, .. }
            | ClassUnload { request_id, .. }
            | FieldAccess { request_id, .. }
            | FieldModification { request_id, .. }
            | MethodEntry { request_id, .. }
            | MethodExit { request_id, .. }
            | MethodExitWithReturnValue { request_id, .. }
            | MonitorContendedEnter { request_id, .. }
            | MonitorContendedEntered { request_id, .. }
            | MonitorWait { request_id, .. }
            | MonitorWaited { request_id, .. } => Some(*request_id),
            VmStart { request_id, .. } | VmDeath { request_id } => *request_id,
        }
    }

    /// The thread the event happened in, when it has one.
    pub fn thread(&self) -> Option<ThreadID> {
        use Event::*;
        match self {
            SingleStep { thread, .. }
            | Breakpoint { thread, .. }
            | Exception { thread, .. }
            | ThreadStart { thread, .. }
            | ThreadDeath { thread, .. }
            | FieldAccess { thread, .. }
            | FieldModification { thread, .. }
            | MethodEntry { thread, .. }
            | MethodExit { thread, .. }
            | MethodExitWithReturnValue { thread, .. }
            | MonitorContendedEnter { thread, .. }
            | MonitorContendedEntered { thread, .. }
            | MonitorWait { thread, .. }
            | MonitorWaited { thread, .. }
            | VmStart { thread, .. } => Some(*thread),
            ClassPrepare { thread, .. } => *thread,
            ClassUnload { .. } | VmDeath { .. } => None,
        }
    }
}
