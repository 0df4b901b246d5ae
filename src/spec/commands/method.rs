//! Method command set (6).

use super::*;

/// Line number table of a method.
///
/// Fails with `ABSENT_INFORMATION` when the class was compiled without line
/// info and with `NATIVE_METHOD` for native methods.
#[jdwp_command(6, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct LineTable {
    pub reference_type_id: ReferenceTypeID,
    pub method_id: MethodID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct LineTableReply {
    /// Lowest valid code index, -1 for native methods
    pub start: i64,
    /// Highest valid code index, -1 for native methods
    pub end: i64,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
pub struct Line {
    /// First code index of the line
    pub line_code_index: u64,
    pub line_number: u32,
}

/// Local variables of a method, arguments included.
#[jdwp_command(6, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct VariableTable {
    pub reference_type_id: ReferenceTypeID,
    pub method_id: MethodID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct VariableTableReply {
    /// Number of words in the frame taken by the arguments, which are the
    /// first slots
    pub arg_cnt: u32,
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Variable {
    /// First code index at which the variable is valid
    pub code_index: u64,
    pub name: String,
    pub signature: String,
    /// Number of code units from `code_index` on where the variable is valid
    pub length: u32,
    pub slot: u32,
}

/// Bytecode of the method, needs `can_get_bytecodes`.
#[jdwp_command(Vec<u8>, 6, 3)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Bytecodes {
    pub reference_type_id: ReferenceTypeID,
    pub method_id: MethodID,
}

/// Whether the method was made obsolete by a class redefinition.
#[jdwp_command(bool, 6, 4)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct IsObsolete {
    pub reference_type_id: ReferenceTypeID,
    pub method_id: MethodID,
}

#[jdwp_command(6, 5)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct VariableTableWithGeneric {
    pub reference_type_id: ReferenceTypeID,
    pub method_id: MethodID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct VariableTableWithGenericReply {
    pub arg_cnt: u32,
    pub variables: Vec<VariableWithGeneric>,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct VariableWithGeneric {
    pub code_index: u64,
    pub name: String,
    pub signature: String,
    /// Empty on the wire when absent
    pub generic_signature: Option<String>,
    pub length: u32,
    pub slot: u32,
}
