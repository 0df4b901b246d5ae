//! ThreadGroupReference command set (12).

use super::*;

#[jdwp_command(String, 12, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Name {
    pub group: ThreadGroupID,
}

/// Parent group, `None` for a top-level group.
#[jdwp_command(Option<ThreadGroupID>, 12, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Parent {
    pub group: ThreadGroupID,
}

/// Live threads and active subgroups directly in the group.
#[jdwp_command(12, 3)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Children {
    pub group: ThreadGroupID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ChildrenReply {
    pub child_threads: Vec<ThreadID>,
    pub child_groups: Vec<ThreadGroupID>,
}
