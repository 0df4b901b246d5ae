//! ClassObjectReference command set (17).

use super::*;

/// The reference type behind a `java.lang.Class` instance.
#[jdwp_command(TaggedReferenceTypeID, 17, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ReflectedType {
    pub class_object_id: ClassObjectID,
}
