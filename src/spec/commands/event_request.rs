//! EventRequest command set (15).

use super::*;

/// Registers an event request, the reply is its ID.
///
/// Events matching the request are sent in an
/// [Event.Composite](super::event::Composite) and suspend threads according
/// to `suspend_policy`. Modifiers narrow down which events are reported and
/// are applied in the given order, so a [Count](Modifier::Count) placed
/// after a filter counts only the events that passed it.
#[jdwp_command(RequestID, 15, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Set {
    pub event_kind: EventKind,
    pub suspend_policy: SuspendPolicy,
    pub modifiers: Vec<Modifier>,
}

/// Clears an event request, clearing one that does not exist is a no-op.
#[jdwp_command((), 15, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Clear {
    pub event_kind: EventKind,
    pub request_id: RequestID,
}

#[jdwp_command((), 15, 3)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClearAllBreakpoints;

/// A filter narrowing down the events a [Set] request reports.
///
/// Not every modifier applies to every event kind, the target VM replies
/// with an error for combinations that make no sense.
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum Modifier {
    /// Report the event only once it occurred `count` times, then disable
    /// the request.
    Count { count: i32 } = ModifierKind::Count as u8,
    /// Reserved for future use.
    Conditional { expr_id: i32 } = ModifierKind::Conditional as u8,
    /// Only events in the given thread.
    ThreadOnly { thread: ThreadID } = ModifierKind::ThreadOnly as u8,
    /// Only events for the type or its subtypes.
    ClassOnly { class: ReferenceTypeID } = ModifierKind::ClassOnly as u8,
    /// Only events for classes whose name matches the pattern, which may
    /// start or end with a `*`.
    ClassMatch { pattern: String } = ModifierKind::ClassMatch as u8,
    /// The opposite of [ClassMatch](Modifier::ClassMatch).
    ClassExclude { pattern: String } = ModifierKind::ClassExclude as u8,
    /// Only events at the given location.
    LocationOnly { location: Location } = ModifierKind::LocationOnly as u8,
    /// Only exceptions of the given type or its subtypes, `None` matching
    /// all of them.
    ExceptionOnly {
        exception: Option<ReferenceTypeID>,
        caught: bool,
        uncaught: bool,
    } = ModifierKind::ExceptionOnly as u8,
    /// Only accesses or modifications of the given field.
    FieldOnly {
        declaring: ReferenceTypeID,
        field_id: FieldID,
    } = ModifierKind::FieldOnly as u8,
    /// Step events of the given thread with the given size and depth.
    Step {
        thread: ThreadID,
        size: StepSize,
        depth: StepDepth,
    } = ModifierKind::Step as u8,
    /// Only events where `this` is the given object, needs
    /// `can_use_instance_filters`.
    InstanceOnly { object: ObjectID } = ModifierKind::InstanceOnly as u8,
    /// Only events for types whose source name matches the pattern, needs
    /// `can_use_source_name_filters`.
    SourceNameMatch { pattern: String } = ModifierKind::SourceNameMatch as u8,
}

impl Modifier {
    pub fn kind(&self) -> ModifierKind {
        use Modifier::*;
        match self {
            Count { .. } => ModifierKind::Count,
            Conditional { .. } => ModifierKind::Conditional,
            ThreadOnly { .. } => ModifierKind::ThreadOnly,
            ClassOnly { .. } => ModifierKind::ClassOnly,
            ClassMatch { .. } => ModifierKind::ClassMatch,
            ClassExclude { .. } => ModifierKind::ClassExclude,
            LocationOnly { .. } => ModifierKind::LocationOnly,
            ExceptionOnly { .. } => ModifierKind::ExceptionOnly,
            FieldOnly { .. } => ModifierKind::FieldOnly,
            Step { .. } => ModifierKind::Step,
            InstanceOnly { .. } => ModifierKind::InstanceOnly,
            SourceNameMatch { .. } => ModifierKind::SourceNameMatch,
        }
    }
}
