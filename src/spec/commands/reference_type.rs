//! ReferenceType command set (2).

use super::*;

/// JNI signature of a reference type.
///
/// Primitive classes such as `java.lang.Integer.TYPE` report the primitive
/// signature, `I` in that case.
#[jdwp_command(String, 2, 1)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Signature {
    pub ref_type: ReferenceTypeID,
}

/// The class loader that loaded the type, `None` for the bootstrap loader.
#[jdwp_command(Option<ClassLoaderID>, 2, 2)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClassLoader {
    pub ref_type: ReferenceTypeID,
}

/// Access flags of the type, undefined for arrays and primitive classes.
#[jdwp_command(TypeModifiers, 2, 3)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Modifiers {
    pub ref_type: ReferenceTypeID,
}

/// Fields declared by the type in class file order, synthetic ones included
/// and inherited ones left out.
#[jdwp_command(Vec<Field>, 2, 4)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Fields {
    pub ref_type: ReferenceTypeID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Field {
    pub field_id: FieldID,
    pub name: String,
    /// JNI signature
    pub signature: String,
    pub mod_bits: FieldModifiers,
}

/// Methods declared by the type in class file order, including `<init>`,
/// `<clinit>` and synthetic methods.
#[jdwp_command(Vec<Method>, 2, 5)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Methods {
    pub ref_type: ReferenceTypeID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Method {
    pub method_id: MethodID,
    pub name: String,
    pub signature: String,
    pub mod_bits: MethodModifiers,
}

/// Values of static fields of the type or of its supertypes.
///
/// Access control does not apply, private fields can be read too. The reply
/// has one value per requested field, in the same order.
#[jdwp_command(C::Map<Value>, 2, 6)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct GetValues<C: Coll<Item = FieldID>> {
    pub ref_type: ReferenceTypeID,
    pub fields: C,
}

/// Name of the source file the type was declared in, `ABSENT_INFORMATION`
/// when there is none.
#[jdwp_command(String, 2, 7)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct SourceFile {
    pub ref_type: ReferenceTypeID,
}

/// Types directly nested in this one.
#[jdwp_command(Vec<TaggedReferenceTypeID>, 2, 8)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct NestedTypes {
    pub ref_type: ReferenceTypeID,
}

#[jdwp_command(ClassStatus, 2, 9)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Status {
    pub ref_type: ReferenceTypeID,
}

/// Interfaces directly implemented by a class, or extended by an interface.
#[jdwp_command(Vec<InterfaceID>, 2, 10)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Interfaces {
    pub ref_type: ReferenceTypeID,
}

/// The `java.lang.Class` instance of the type.
#[jdwp_command(ClassObjectID, 2, 11)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClassObject {
    pub ref_type: ReferenceTypeID,
}

/// Needs `can_get_source_debug_extension`.
#[jdwp_command(String, 2, 12)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct SourceDebugExtension {
    pub ref_type: ReferenceTypeID,
}

#[jdwp_command(2, 13)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct SignatureWithGeneric {
    pub ref_type: ReferenceTypeID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct SignatureWithGenericReply {
    pub signature: String,
    /// Empty on the wire when absent
    pub generic_signature: Option<String>,
}

#[jdwp_command(Vec<FieldWithGeneric>, 2, 14)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct FieldsWithGeneric {
    pub ref_type: ReferenceTypeID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct FieldWithGeneric {
    pub field_id: FieldID,
    pub name: String,
    pub signature: String,
    pub generic_signature: Option<String>,
    pub mod_bits: FieldModifiers,
}

#[jdwp_command(Vec<MethodWithGeneric>, 2, 15)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct MethodsWithGeneric {
    pub ref_type: ReferenceTypeID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct MethodWithGeneric {
    pub method_id: MethodID,
    pub name: String,
    pub signature: String,
    pub generic_signature: Option<String>,
    pub mod_bits: MethodModifiers,
}

/// Reachable instances of the type.
///
/// Needs `can_get_instance_info`.
#[jdwp_command(Vec<TaggedObjectID>, 2, 16)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Instances {
    pub ref_type: ReferenceTypeID,
    pub max_instances: InstanceLimit,
}

/// How many instances to return, 0 on the wire meaning all of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InstanceLimit {
    All,
    Limit(NonZeroU32),
}

impl InstanceLimit {
    pub fn limit(limit: u32) -> Self {
        NonZeroU32::new(limit).map_or(InstanceLimit::All, InstanceLimit::Limit)
    }
}

impl JdwpReadable for InstanceLimit {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        u32::read(read).map(Self::limit)
    }
}

impl JdwpWritable for InstanceLimit {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        match self {
            InstanceLimit::All => 0u32.write(write),
            InstanceLimit::Limit(limit) => limit.get().write(write),
        }
    }
}

#[jdwp_command(2, 17)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClassFileVersion {
    pub ref_type: ReferenceTypeID,
}

#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ClassFileVersionReply {
    pub major_version: u32,
    pub minor_version: u32,
}

/// Raw constant pool bytes of the class file, in class file format.
///
/// Needs `can_get_constant_pool`.
#[jdwp_command(2, 18)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ConstantPool {
    pub ref_type: ReferenceTypeID,
}

#[derive(Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct ConstantPoolReply {
    /// `constant_pool_count` from the class file, one more than the number of
    /// entries
    pub count: u32,
    pub bytes: Vec<u8>,
}

// hex instead of a list of numbers, so that trace logs stay short
impl Debug for ConstantPoolReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Hex<'a>(&'a [u8]);

        impl Debug for Hex<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
            }
        }

        f.debug_struct("ConstantPoolReply")
            .field("count", &self.count)
            .field("bytes", &Hex(&self.bytes))
            .finish()
    }
}

/// The module the type belongs to.
#[jdwp_command(ModuleID, 2, 19)]
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct Module {
    pub ref_type: ReferenceTypeID,
}
