//! ObjectReference command set (9).

use super::{reference_type::InstanceLimit, *};

/// Runtime type of an object.
#[jdwp_command(TaggedReferenceTypeID, 9, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ReferenceType {
    pub object: ObjectID,
}

/// Instance field values of an object.
///
/// Fields can be declared by the object's type or any of its supertypes.
/// The reply has one value per requested field, in the same order.
#[jdwp_command(C::Map<Value>, 9, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct GetValues<C: Coll<Item = FieldID>> {
    pub object: ObjectID,
    pub fields: C,
}

/// Sets instance fields of an object, values go untagged like in
/// [ClassType.SetValues](super::class_type::SetValues).
#[jdwp_command((), 9, 3)]
#[derive(Debug, Clone, PartialEq, JdwpWritable)]
pub struct SetValues {
    pub object: ObjectID,
    pub fields: Vec<(FieldID, UntaggedValue)>,
}

/// Monitor state of an object, needs `can_get_monitor_info`.
#[jdwp_command(9, 5)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct MonitorInfo {
    pub object: ObjectID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct MonitorInfoReply {
    /// Owning thread, `None` if the monitor is free
    pub owner: Option<ThreadID>,
    /// Number of times the owner has entered the monitor
    pub entry_count: i32,
    /// Threads waiting in `Object.wait` on this monitor
    pub waiters: Vec<ThreadID>,
}

/// Invokes an instance method on an object.
///
/// Virtual dispatch applies unless
/// [INVOKE_NONVIRTUAL](InvokeOptions::NONVIRTUAL) is set, in which case the
/// method declared by `class_id` is the one that runs. Threading rules are
/// the same as for [ClassType.InvokeMethod](super::class_type::InvokeMethod).
#[jdwp_command(InvokeMethodReply, 9, 6)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct InvokeMethod {
    pub object: ObjectID,
    pub thread: ThreadID,
    pub class_id: ClassID,
    pub method_id: MethodID,
    pub arguments: Vec<Value>,
    pub options: InvokeOptions,
}

/// Stops the object from being garbage collected until
/// [EnableCollection] is sent or the VM disconnects.
#[jdwp_command((), 9, 7)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct DisableCollection {
    pub object: ObjectID,
}

#[jdwp_command((), 9, 8)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct EnableCollection {
    pub object: ObjectID,
}

#[jdwp_command(bool, 9, 9)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct IsCollected {
    pub object: ObjectID,
}

/// Objects holding a direct reference to this one, needs
/// `can_get_instance_info`.
#[jdwp_command(Vec<TaggedObjectID>, 9, 10)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ReferringObjects {
    pub object: ObjectID,
    pub max_referrers: InstanceLimit,
}
