//! VirtualMachine command set (1).

use super::*;

/// The JDWP version implemented by the target VM, along with free-form
/// VM information.
#[jdwp_command(1, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Version;

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct VersionReply {
    /// Text information on the VM version
    pub description: String,
    pub version_major: u32,
    pub version_minor: u32,
    /// The `java.version` property of the target VM
    pub vm_version: String,
    /// The `java.vm.name` property of the target VM
    pub vm_name: String,
}

/// Reference types of all loaded classes with the given JNI signature.
///
/// More than one is returned when several class loaders loaded a class of
/// the same name. Nothing gets loaded as a side effect.
#[jdwp_command(Vec<(TaggedReferenceTypeID, ClassStatus)>, 1, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClassesBySignature {
    /// JNI signature, for example `Ljava/lang/String;`
    pub signature: String,
}

/// Reference types for every class loaded by the target VM.
#[jdwp_command(Vec<Class>, 1, 3)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct AllClasses;

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Class {
    pub type_id: TaggedReferenceTypeID,
    /// JNI signature of the type
    pub signature: String,
    pub status: ClassStatus,
}

/// All live threads, including ones attached through JNI and the VM's own
/// system threads. Threads that have not started or already finished are
/// left out.
#[jdwp_command(Vec<ThreadID>, 1, 4)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct AllThreads;

/// Thread groups without a parent, the roots of the thread group tree.
#[jdwp_command(Vec<ThreadGroupID>, 1, 5)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct TopLevelThreadGroups;

/// Ends the debugging session.
///
/// The target VM cancels every event request, resumes threads as many times
/// as they were suspended by the debugger, re-enables collection and waits
/// for a new connection. All IDs handed out so far become invalid.
#[jdwp_command((), 1, 6)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Dispose;

/// Widths of the variably sized identifiers.
///
/// This is the first thing to ask the target VM, nothing that contains an
/// identifier can be encoded or decoded until the sizes are known.
#[jdwp_command(IDSizeInfo, 1, 7)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct IDSizes;

/// Sizes in bytes of each identifier kind, as negotiated with [IDSizes].
///
/// Module IDs use `object_id_size`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
pub struct IDSizeInfo {
    pub field_id_size: u32,
    pub method_id_size: u32,
    pub object_id_size: u32,
    pub reference_type_id_size: u32,
    pub frame_id_size: u32,
}

impl IDSizeInfo {
    /// Every identifier of the same width.
    pub const fn uniform(size: u32) -> Self {
        Self {
            field_id_size: size,
            method_id_size: size,
            object_id_size: size,
            reference_type_id_size: size,
            frame_id_size: size,
        }
    }

    /// Checks that every width is one the codec can handle, 1 to 8 bytes.
    pub fn validate(&self) -> Result<(), CodecError> {
        [
            self.field_id_size,
            self.method_id_size,
            self.object_id_size,
            self.reference_type_id_size,
            self.frame_id_size,
        ]
        .into_iter()
        .find(|size| !(1..=8).contains(size))
        .map_or(Ok(()), |size| Err(CodecError::InvalidIdSize(size)))
    }
}

impl Default for IDSizeInfo {
    fn default() -> Self {
        Self::uniform(8)
    }
}

/// Suspends every thread of the application.
///
/// Suspensions are counted, both VM-wide and per thread, a thread only runs
/// again once it was resumed as many times as it was suspended.
#[jdwp_command((), 1, 8)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Suspend;

/// Resumes the application after [Suspend] or a suspending event.
#[jdwp_command((), 1, 9)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Resume;

/// Terminates the target VM.
///
/// Threads are killed abruptly, no `finally` blocks run. Some platforms only
/// keep the low 8 bits of the exit code.
#[jdwp_command((), 1, 10)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Exit {
    pub exit_code: i32,
}

/// Creates a `java.lang.String` in the target VM.
#[jdwp_command(StringID, 1, 11)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct CreateString {
    /// Contents of the new string
    pub string: String,
}

/// The original capability set, superseded by [CapabilitiesNew].
///
/// Commands depending on a missing capability fail with `NOT_IMPLEMENTED`.
#[jdwp_command(1, 12)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Capabilities;

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct CapabilitiesReply {
    pub can_watch_field_modification: bool,
    pub can_watch_field_access: bool,
    pub can_get_bytecodes: bool,
    pub can_get_synthetic_attribute: bool,
    pub can_get_owned_monitor_info: bool,
    pub can_get_current_contended_monitor: bool,
    pub can_get_monitor_info: bool,
}

/// Class path and boot class path of the target VM, empty lists when they
/// are not defined.
#[jdwp_command(1, 13)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClassPaths;

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClassPathsReply {
    /// Relative paths in both lists are resolved against this
    pub base_dir: String,
    pub classpaths: Vec<String>,
    pub bootclasspaths: Vec<String>,
}

/// Decrements the reference counts the back-end keeps for object IDs.
///
/// An ID whose count drops to zero or below is freed and may be reused
/// by the target VM afterwards. Sending this is optional, IDs of collected
/// objects get freed eventually anyway.
#[jdwp_command((), 1, 14)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct DisposeObjects {
    /// Object IDs with the count to subtract
    pub requests: Vec<(ObjectID, u32)>,
}

/// Holds events in the back-end until [ReleaseEvents]. Replies to commands
/// are never held.
#[jdwp_command((), 1, 15)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct HoldEvents;

#[jdwp_command((), 1, 16)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ReleaseEvents;

/// The full capability set.
#[jdwp_command(1, 17)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct CapabilitiesNew;

#[derive(Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct CapabilitiesNewReply {
    /// Same prefix as the [Capabilities] reply
    pub capabilities: CapabilitiesReply,
    pub can_redefine_classes: bool,
    pub can_add_method: bool,
    pub can_unrestrictedly_redefine_classes: bool,
    pub can_pop_frames: bool,
    pub can_use_instance_filters: bool,
    pub can_get_source_debug_extension: bool,
    pub can_request_vmdeath_event: bool,
    pub can_set_default_stratum: bool,
    pub can_get_instance_info: bool,
    pub can_request_monitor_events: bool,
    pub can_get_monitor_frame_info: bool,
    pub can_use_source_name_filters: bool,
    pub can_get_constant_pool: bool,
    pub can_force_early_return: bool,
    _reserved_22: bool,
    _reserved_23: bool,
    _reserved_24: bool,
    _reserved_25: bool,
    _reserved_26: bool,
    _reserved_27: bool,
    _reserved_28: bool,
    _reserved_29: bool,
    _reserved_30: bool,
    _reserved_31: bool,
    _reserved_32: bool,
}

/// The reserved flags are always false, leaving them out keeps the logs
/// readable.
impl Debug for CapabilitiesNewReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitiesNewReply")
            .field("capabilities", &self.capabilities)
            .field("can_redefine_classes", &self.can_redefine_classes)
            .field("can_add_method", &self.can_add_method)
            .field(
                "can_unrestrictedly_redefine_classes",
                &self.can_unrestrictedly_redefine_classes,
            )
            .field("can_pop_frames", &self.can_pop_frames)
            .field("can_use_instance_filters", &self.can_use_instance_filters)
            .field(
                "can_get_source_debug_extension",
                &self.can_get_source_debug_extension,
            )
            .field("can_request_vmdeath_event", &self.can_request_vmdeath_event)
            .field("can_set_default_stratum", &self.can_set_default_stratum)
            .field("can_get_instance_info", &self.can_get_instance_info)
            .field(
                "can_request_monitor_events",
                &self.can_request_monitor_events,
            )
            .field(
                "can_get_monitor_frame_info",
                &self.can_get_monitor_frame_info,
            )
            .field(
                "can_use_source_name_filters",
                &self.can_use_source_name_filters,
            )
            .field("can_get_constant_pool", &self.can_get_constant_pool)
            .field("can_force_early_return", &self.can_force_early_return)
            .finish()
    }
}

/// Installs new class definitions.
///
/// Frames already running a redefined method keep running the old bytecode
/// (see [IsObsolete](super::method::IsObsolete)), new invocations use the
/// new one. Breakpoints in redefined classes are cleared.
///
/// Needs `can_redefine_classes`, plus `can_add_method` or
/// `can_unrestrictedly_redefine_classes` for anything beyond method body
/// changes.
#[jdwp_command((), 1, 18)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct RedefineClasses {
    /// Types with their new class file bytes
    pub classes: Vec<(ReferenceTypeID, Vec<u8>)>,
}

/// Needs `can_set_default_stratum`.
#[jdwp_command((), 1, 19)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct SetDefaultStratum {
    /// Empty to go back to each type's own default
    pub stratum_id: String,
}

/// Same as [AllClasses], with generic signatures.
#[jdwp_command(Vec<GenericClass>, 1, 20)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct AllClassesWithGeneric;

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct GenericClass {
    pub type_id: TaggedReferenceTypeID,
    pub signature: String,
    /// `None` for non-generic types, which the target VM sends as an empty
    /// string. `Some(String::new())` is therefore written as absent too.
    pub generic_signature: Option<String>,
    pub status: ClassStatus,
}

/// Number of reachable instances of each given type, zero for unloaded ones.
///
/// Needs `can_get_instance_info`.
#[jdwp_command(C::Map<u64>, 1, 21)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct InstanceCounts<C: Coll<Item = ReferenceTypeID>> {
    pub ref_types: C,
}

/// Every module in the target VM.
#[jdwp_command(Vec<ModuleID>, 1, 22)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct AllModules;
