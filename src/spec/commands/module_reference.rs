//! ModuleReference command set (18).

use super::*;

/// Name of the module, empty for an unnamed module.
#[jdwp_command(String, 18, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Name {
    pub module: ModuleID,
}

#[jdwp_command(Option<ClassLoaderID>, 18, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClassLoader {
    pub module: ModuleID,
}
