//! ClassLoaderReference command set (14).

use super::*;

/// Types this loader is an initiating loader for, meaning it can find them
/// by name on its own or through delegation.
#[jdwp_command(Vec<TaggedReferenceTypeID>, 14, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct VisibleClasses {
    pub class_loader_id: ClassLoaderID,
}
