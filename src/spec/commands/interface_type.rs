//! InterfaceType command set (5).

use super::*;

/// Invokes a static method declared by the interface.
///
/// Same rules as [ClassType.InvokeMethod](super::class_type::InvokeMethod),
/// the reply is identical too.
#[jdwp_command(InvokeMethodReply, 5, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct InvokeMethod {
    pub interface_id: InterfaceID,
    pub thread_id: ThreadID,
    pub method_id: MethodID,
    pub arguments: Vec<Value>,
    pub options: InvokeOptions,
}
