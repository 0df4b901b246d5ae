//! ClassType command set (3).

use super::*;

/// Direct superclass, `None` for `java.lang.Object`.
#[jdwp_command(Option<ClassID>, 3, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Superclass {
    pub class_id: ClassID,
}

/// Sets static fields of the class.
///
/// Values are written without tags, the field signatures give the target VM
/// their types. Object values must be assignment compatible with the field
/// type and the field type must already be loaded. Final fields can only be
/// set this way in static initializers. Access control does not apply.
#[jdwp_command((), 3, 2)]
#[derive(Debug, Clone, PartialEq, JdwpWritable)]
pub struct SetValues {
    pub class_id: ClassID,
    pub values: Vec<(FieldID, UntaggedValue)>,
}

/// Invokes a static method of the class or of one of its superclasses.
///
/// The thread has to be suspended by an event or an `invokeMethod` with
/// [INVOKE_SINGLE_THREADED](InvokeOptions::SINGLE_THREADED) cleared resumes
/// every other thread for the duration of the call. Arguments must match the
/// method signature, primitive widening is not done by the target VM.
#[jdwp_command(InvokeMethodReply, 3, 3)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct InvokeMethod {
    pub class_id: ClassID,
    pub thread_id: ThreadID,
    pub method_id: MethodID,
    pub arguments: Vec<Value>,
    pub options: InvokeOptions,
}

/// Creates an instance by running one of the class constructors in the
/// given thread, with the same threading rules as [InvokeMethod].
#[jdwp_command(NewInstanceReply, 3, 4)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct NewInstance {
    pub class_id: ClassID,
    pub thread_id: ThreadID,
    pub method_id: MethodID,
    pub arguments: Vec<Value>,
    pub options: InvokeOptions,
}
