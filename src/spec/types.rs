use std::{
    fmt::{self, Debug},
    io::{self, Read, Write},
    ops::Deref,
};

use crate::codec::*;

use super::{ByteTag, Tag, TypeTag};

pub trait JdwpId: Clone + Copy {
    /// Type of the underlying raw ID.
    type Raw;

    /// Wraps a raw value received by some other means.
    ///
    /// Nothing checks that the target VM ever handed out this value, using a
    /// made up ID is not unsafe but will most likely get an error reply.
    fn from_raw(raw: Self::Raw) -> Self;

    /// The underlying raw value, opaque to everyone but the target VM.
    fn raw(self) -> Self::Raw;
}

/// Handle of an object in the target VM.
///
/// An object keeps the same [ObjectID] for its whole lifetime, or until the
/// ID is explicitly disposed with
/// [DisposeObjects](super::virtual_machine::DisposeObjects). Holding the ID
/// does not keep the object from being collected, see
/// [DisableCollection](super::object_reference::DisableCollection).
///
/// The value 0 is reserved for `null`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ObjectID(u64);

/// Handle of a method, unique only within its declaring type and subtypes,
/// so it always travels together with a [ReferenceTypeID].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct MethodID(u64);

/// Handle of a field, paired with a [ReferenceTypeID] the same way a
/// [MethodID] is.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FieldID(u64);

/// Handle of a stack frame, unique across the whole VM but only valid while
/// its thread stays suspended.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FrameID(u64);

/// Handle of a loaded reference type.
///
/// Not interchangeable with the [ClassObjectID] of the same class, the two
/// live in different ID spaces.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ReferenceTypeID(u64);

macro_rules! ids {
    ($($id:ident: $tpe:ident),* $(,)?) => {
        $(
            impl JdwpId for $tpe {
                type Raw = u64;

                fn from_raw(raw: u64) -> Self {
                    Self(raw)
                }

                fn raw(self) -> u64 {
                    self.0
                }
            }

            impl $tpe {
                pub const fn is_null(self) -> bool {
                    self.0 == 0
                }
            }

            impl Debug for $tpe {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!(stringify!($tpe), "({})"), self.0)
                }
            }

            impl JdwpReadable for $tpe {
                fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
                    let id_size = read.id_sizes.$id;
                    read.read_id(id_size).map($tpe)
                }
            }

            impl JdwpWritable for $tpe {
                fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                    let id_size = write.id_sizes.$id;
                    write.write_id(self.0, id_size)
                }
            }

            impl JdwpReadable for Option<$tpe> {
                fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
                    let id = $tpe::read(read)?;
                    Ok(if id.0 == 0 { None } else { Some(id) })
                }
            }

            impl JdwpWritable for Option<$tpe> {
                #[inline]
                fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                    self.unwrap_or($tpe(0)).write(write)
                }
            }
        )*
    };
}

ids! {
    field_id_size: FieldID,
    method_id_size: MethodID,
    object_id_size: ObjectID,
    reference_type_id_size: ReferenceTypeID,
    frame_id_size: FrameID,
}

/// An [ObjectID] known to be a `java.lang.Thread`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ThreadID(ObjectID);

/// An [ObjectID] known to be a `java.lang.ThreadGroup`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ThreadGroupID(ObjectID);

/// An [ObjectID] known to be a `java.lang.String`.
///
/// Not to be confused with the `string` wire type, which is the text itself.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct StringID(ObjectID);

/// An [ObjectID] known to be a `java.lang.ClassLoader`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ClassLoaderID(ObjectID);

/// An [ObjectID] known to be a `java.lang.Class` instance.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ClassObjectID(ObjectID);

/// An [ObjectID] known to be an array.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ArrayID(ObjectID);

/// An [ObjectID] known to be a `java.lang.Module`.
///
/// Modules use the object ID width.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ModuleID(ObjectID);

/// A [ReferenceTypeID] known to be a class.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ClassID(ReferenceTypeID);

/// A [ReferenceTypeID] known to be an interface.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct InterfaceID(ReferenceTypeID);

/// A [ReferenceTypeID] known to be an array type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ArrayTypeID(ReferenceTypeID);

macro_rules! wrapper_ids {
    ($($deref:ident {$($tpe:ident),* $(,)?})*) => {
        $($(
            impl JdwpId for $tpe {
                type Raw = u64;

                fn from_raw(raw: u64) -> Self {
                    Self($deref::from_raw(raw))
                }

                fn raw(self) -> u64 {
                    self.0.0
                }
            }

            impl Debug for $tpe {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!(stringify!($tpe), "({})"), self.0.0)
                }
            }

            impl From<$tpe> for $deref {
                fn from(id: $tpe) -> $deref {
                    id.0
                }
            }

            impl Deref for $tpe {
                type Target = $deref;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl JdwpReadable for Option<$tpe> {
                fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
                    let id = $tpe::read(read)?;
                    Ok(if id.0.0 == 0 { None } else { Some(id) })
                }
            }

            impl JdwpWritable for Option<$tpe> {
                fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                    self.unwrap_or($tpe($deref(0))).write(write)
                }
            }
        )*)*
    };
}

wrapper_ids! {
    ObjectID {
        ThreadID,
        ThreadGroupID,
        StringID,
        ClassLoaderID,
        ClassObjectID,
        ArrayID,
        ModuleID,
    }
    ReferenceTypeID {
        ClassID,
        InterfaceID,
        ArrayTypeID,
    }
}

/// Event request handle, a plain `int` on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
pub struct RequestID(i32);

impl JdwpId for RequestID {
    type Raw = i32;

    fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    fn raw(self) -> i32 {
        self.0
    }
}

/// Automatically generated events carry request ID 0.
impl JdwpReadable for Option<RequestID> {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        match i32::read(read)? {
            0 => Ok(None),
            x => Ok(Some(RequestID(x))),
        }
    }
}

impl JdwpWritable for Option<RequestID> {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        self.map_or(0, |id| id.0).write(write)
    }
}

/// SAFETY:
/// T must be a #[repr(u8)] enum and all variants must have explicit
/// discriminators that are valid tag values.
pub(crate) unsafe fn tag<T, U: ByteTag + Copy>(e: &T) -> U {
    *(e as *const T as *const U)
}

/// An object ID prefixed with the tag of its runtime kind.
///
/// Only the object-family tags are valid here, anything else fails to
/// decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum TaggedObjectID {
    Array(ArrayID) = Tag::Array as u8,
    Object(ObjectID) = Tag::Object as u8,
    String(StringID) = Tag::String as u8,
    Thread(ThreadID) = Tag::Thread as u8,
    ThreadGroup(ThreadGroupID) = Tag::ThreadGroup as u8,
    ClassLoader(ClassLoaderID) = Tag::ClassLoader as u8,
    ClassObject(ClassObjectID) = Tag::ClassObject as u8,
}

impl TaggedObjectID {
    pub fn tag(&self) -> Tag {
        // SAFETY: Self and Tag fulfill the requirements
        unsafe { tag(self) }
    }

    /// Builds the variant matching an object-family `tag`.
    pub fn new(tag: Tag, id: ObjectID) -> Option<Self> {
        use TaggedObjectID::*;

        let raw = id.raw();
        Some(match tag {
            Tag::Array => Array(JdwpId::from_raw(raw)),
            Tag::Object => Object(id),
            Tag::String => String(JdwpId::from_raw(raw)),
            Tag::Thread => Thread(JdwpId::from_raw(raw)),
            Tag::ThreadGroup => ThreadGroup(JdwpId::from_raw(raw)),
            Tag::ClassLoader => ClassLoader(JdwpId::from_raw(raw)),
            Tag::ClassObject => ClassObject(JdwpId::from_raw(raw)),
            _ => return None,
        })
    }
}

impl Deref for TaggedObjectID {
    type Target = ObjectID;

    fn deref(&self) -> &Self::Target {
        use TaggedObjectID::*;
        match self {
            Array(id) => id,
            Object(id) => id,
            String(id) => id,
            Thread(id) => id,
            ThreadGroup(id) => id,
            ClassLoader(id) => id,
            ClassObject(id) => id,
        }
    }
}

/// A null reference is still tagged on the wire, it reads as `None`.
impl JdwpReadable for Option<TaggedObjectID> {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        let id = TaggedObjectID::read(read)?;
        Ok(if id.is_null() { None } else { Some(id) })
    }
}

impl JdwpWritable for Option<TaggedObjectID> {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        match self {
            Some(id) => id.write(write),
            None => TaggedObjectID::Object(ObjectID(0)).write(write),
        }
    }
}

/// A [ReferenceTypeID] prefixed with its [TypeTag].
///
/// JDWP spells this out as a separate `refTypeTag` byte followed by the ID,
/// the pair always goes together so it is a single type here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum TaggedReferenceTypeID {
    Class(ClassID) = TypeTag::Class as u8,
    Interface(InterfaceID) = TypeTag::Interface as u8,
    Array(ArrayTypeID) = TypeTag::Array as u8,
}

impl TaggedReferenceTypeID {
    pub fn new(tag: TypeTag, id: ReferenceTypeID) -> Self {
        use TaggedReferenceTypeID::*;

        match tag {
            TypeTag::Class => Class(ClassID(id)),
            TypeTag::Interface => Interface(InterfaceID(id)),
            TypeTag::Array => Array(ArrayTypeID(id)),
        }
    }

    pub fn tag(&self) -> TypeTag {
        // SAFETY: Self and TypeTag fulfill the requirements
        unsafe { tag(self) }
    }
}

impl Deref for TaggedReferenceTypeID {
    type Target = ReferenceTypeID;

    fn deref(&self) -> &Self::Target {
        use TaggedReferenceTypeID::*;
        match self {
            Class(id) => id,
            Interface(id) => id,
            Array(id) => id,
        }
    }
}

/// A tagged value: a primitive, `void`, or an object reference of some
/// object-family kind.
///
/// The tag alone decides how many bytes follow. Object-family values with a
/// zero ID are `null`, see [Value::is_null].
#[derive(Debug, Copy, Clone, PartialEq, JdwpWritable)]
#[repr(u8)]
pub enum Value {
    Array(ArrayID) = Tag::Array as u8,
    Byte(i8) = Tag::Byte as u8,
    Char(u16) = Tag::Char as u8,
    Object(ObjectID) = Tag::Object as u8,
    Float(f32) = Tag::Float as u8,
    Double(f64) = Tag::Double as u8,
    Int(i32) = Tag::Int as u8,
    Long(i64) = Tag::Long as u8,
    Short(i16) = Tag::Short as u8,
    Void = Tag::Void as u8,
    Boolean(bool) = Tag::Boolean as u8,
    String(StringID) = Tag::String as u8,
    Thread(ThreadID) = Tag::Thread as u8,
    ThreadGroup(ThreadGroupID) = Tag::ThreadGroup as u8,
    ClassLoader(ClassLoaderID) = Tag::ClassLoader as u8,
    ClassObject(ClassObjectID) = Tag::ClassObject as u8,
}

impl Value {
    pub fn tag(&self) -> Tag {
        // SAFETY: Self and Tag fulfill the requirements
        unsafe { tag(self) }
    }

    /// The object ID for object-family values.
    pub fn object_id(&self) -> Option<ObjectID> {
        use Value::*;
        Some(match self {
            Array(id) => **id,
            Object(id) => *id,
            String(id) => **id,
            Thread(id) => **id,
            ThreadGroup(id) => **id,
            ClassLoader(id) => **id,
            ClassObject(id) => **id,
            _ => return None,
        })
    }

    pub fn is_null(&self) -> bool {
        self.object_id().map_or(false, ObjectID::is_null)
    }

    /// Reads the payload of a value whose tag is known from context, the
    /// counterpart of writing an [UntaggedValue].
    pub fn read_untagged<R: Read>(tag: Tag, read: &mut JdwpReader<R>) -> io::Result<Self> {
        let value = match tag {
            Tag::Array => Value::Array(JdwpReadable::read(read)?),
            Tag::Byte => Value::Byte(JdwpReadable::read(read)?),
            Tag::Char => Value::Char(JdwpReadable::read(read)?),
            Tag::Object => Value::Object(JdwpReadable::read(read)?),
            Tag::Float => Value::Float(JdwpReadable::read(read)?),
            Tag::Double => Value::Double(JdwpReadable::read(read)?),
            Tag::Int => Value::Int(JdwpReadable::read(read)?),
            Tag::Long => Value::Long(JdwpReadable::read(read)?),
            Tag::Short => Value::Short(JdwpReadable::read(read)?),
            Tag::Void => Value::Void,
            Tag::Boolean => Value::Boolean(JdwpReadable::read(read)?),
            Tag::String => Value::String(JdwpReadable::read(read)?),
            Tag::Thread => Value::Thread(JdwpReadable::read(read)?),
            Tag::ThreadGroup => Value::ThreadGroup(JdwpReadable::read(read)?),
            Tag::ClassLoader => Value::ClassLoader(JdwpReadable::read(read)?),
            Tag::ClassObject => Value::ClassObject(JdwpReadable::read(read)?),
        };
        Ok(value)
    }
}

impl JdwpReadable for Value {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        let tag = Tag::read(read)?;
        Self::read_untagged(tag, read)
    }
}

impl From<TaggedObjectID> for Value {
    fn from(id: TaggedObjectID) -> Self {
        match id {
            TaggedObjectID::Array(id) => Value::Array(id),
            TaggedObjectID::Object(id) => Value::Object(id),
            TaggedObjectID::String(id) => Value::String(id),
            TaggedObjectID::Thread(id) => Value::Thread(id),
            TaggedObjectID::ThreadGroup(id) => Value::ThreadGroup(id),
            TaggedObjectID::ClassLoader(id) => Value::ClassLoader(id),
            TaggedObjectID::ClassObject(id) => Value::ClassObject(id),
        }
    }
}

pub trait JdwpValue: JdwpWritable {
    fn tagged(self) -> Value;
}

macro_rules! jvm_values {
    ($($tpe:ty => $tagged:ident)*) => {
        $(
            impl JdwpValue for $tpe {
                fn tagged(self) -> Value {
                    Value::$tagged(self)
                }
            }
        )*
    };
}

jvm_values! {
    i8 => Byte
    bool => Boolean
    u16 => Char
    i16 => Short
    i32 => Int
    i64 => Long
    f32 => Float
    f64 => Double
    ObjectID => Object
    ArrayID => Array
    StringID => String
    ThreadID => Thread
    ThreadGroupID => ThreadGroup
    ClassLoaderID => ClassLoader
    ClassObjectID => ClassObject
}

impl<T: JdwpValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.tagged()
    }
}

/// A [Value] written without its tag.
///
/// Used by the `SetValues` commands where the tag is implied by the field or
/// array component type. Write-only, see [Value::read_untagged] for the
/// reading side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UntaggedValue(pub Value);

impl From<Value> for UntaggedValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl<T: JdwpValue> From<T> for UntaggedValue {
    fn from(value: T) -> Self {
        Self(value.tagged())
    }
}

impl Deref for UntaggedValue {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl JdwpWritable for UntaggedValue {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        match self.0 {
            Value::Array(v) => v.write(write),
            Value::Byte(v) => v.write(write),
            Value::Char(v) => v.write(write),
            Value::Object(v) => v.write(write),
            Value::Float(v) => v.write(write),
            Value::Double(v) => v.write(write),
            Value::Int(v) => v.write(write),
            Value::Long(v) => v.write(write),
            Value::Short(v) => v.write(write),
            Value::Void => Ok(()),
            Value::Boolean(v) => v.write(write),
            Value::String(v) => v.write(write),
            Value::Thread(v) => v.write(write),
            Value::ThreadGroup(v) => v.write(write),
            Value::ClassLoader(v) => v.write(write),
            Value::ClassObject(v) => v.write(write),
        }
    }
}

/// A run of array elements, as returned by
/// [GetValues](super::array_reference::GetValues).
///
/// Primitive components are stored untagged, object components each carry
/// their own tag since the runtime kind of every element may differ from the
/// declared component type.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayRegion {
    Byte(Vec<i8>),
    Boolean(Vec<bool>),
    Char(Vec<u16>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Object {
        /// One of the object-family tags.
        component: Tag,
        values: Vec<TaggedObjectID>,
    },
}

impl ArrayRegion {
    pub fn tag(&self) -> Tag {
        use ArrayRegion::*;
        match self {
            Byte(_) => Tag::Byte,
            Boolean(_) => Tag::Boolean,
            Char(_) => Tag::Char,
            Short(_) => Tag::Short,
            Int(_) => Tag::Int,
            Long(_) => Tag::Long,
            Float(_) => Tag::Float,
            Double(_) => Tag::Double,
            Object { component, .. } => *component,
        }
    }

    pub fn len(&self) -> usize {
        use ArrayRegion::*;
        match self {
            Byte(v) => v.len(),
            Boolean(v) => v.len(),
            Char(v) => v.len(),
            Short(v) => v.len(),
            Int(v) => v.len(),
            Long(v) => v.len(),
            Float(v) => v.len(),
            Double(v) => v.len(),
            Object { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` as a tagged [Value].
    pub fn get(&self, index: usize) -> Option<Value> {
        use ArrayRegion::*;
        Some(match self {
            Byte(v) => Value::Byte(*v.get(index)?),
            Boolean(v) => Value::Boolean(*v.get(index)?),
            Char(v) => Value::Char(*v.get(index)?),
            Short(v) => Value::Short(*v.get(index)?),
            Int(v) => Value::Int(*v.get(index)?),
            Long(v) => Value::Long(*v.get(index)?),
            Float(v) => Value::Float(*v.get(index)?),
            Double(v) => Value::Double(*v.get(index)?),
            Object { values, .. } => (*values.get(index)?).into(),
        })
    }
}

impl JdwpReadable for ArrayRegion {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        use ArrayRegion::*;

        let tag = Tag::read(read)?;
        let region = match tag {
            Tag::Byte => Byte(JdwpReadable::read(read)?),
            Tag::Boolean => Boolean(JdwpReadable::read(read)?),
            Tag::Char => Char(JdwpReadable::read(read)?),
            Tag::Short => Short(JdwpReadable::read(read)?),
            Tag::Int => Int(JdwpReadable::read(read)?),
            Tag::Long => Long(JdwpReadable::read(read)?),
            Tag::Float => Float(JdwpReadable::read(read)?),
            Tag::Double => Double(JdwpReadable::read(read)?),
            Tag::Void => {
                return Err(CodecError::UnexpectedTag {
                    kind: "ArrayRegion",
                    tag: tag.as_char(),
                }
                .into())
            }
            component => Object {
                component,
                values: JdwpReadable::read(read)?,
            },
        };
        Ok(region)
    }
}

impl JdwpWritable for ArrayRegion {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        use ArrayRegion::*;

        self.tag().write(write)?;
        match self {
            Byte(v) => v.write(write),
            Boolean(v) => v.write(write),
            Char(v) => v.write(write),
            Short(v) => v.write(write),
            Int(v) => v.write(write),
            Long(v) => v.write(write),
            Float(v) => v.write(write),
            Double(v) => v.write(write),
            Object { values, .. } => values.write(write),
        }
    }
}

/// An executable location: type, method and a code index within the method.
///
/// Indices grow monotonically through a method, they are usually bytecode
/// offsets but nothing requires that. The type tag tells whether the
/// declaring type is a class or an interface (interfaces can contain code in
/// their static initializer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
pub struct Location {
    pub reference_id: TaggedReferenceTypeID,
    pub method_id: MethodID,
    pub index: u64,
}

impl Location {
    /// Code index reported for locations in native methods.
    pub const NATIVE_INDEX: u64 = u64::MAX;

    pub fn is_native(&self) -> bool {
        self.index == Self::NATIVE_INDEX
    }
}

/// An absent location is an all-zero record (type tag 0), which still takes
/// the full width on the wire.
impl JdwpReadable for Option<Location> {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        let tag = u8::read(read)?;
        let reference_id = ReferenceTypeID::read(read)?;
        let method_id = MethodID::read(read)?;
        let index = u64::read(read)?;
        if tag == 0 {
            return Ok(None);
        }
        let tag = TypeTag::try_from(tag).map_err(|raw| CodecError::UnknownDiscriminant {
            kind: "TypeTag",
            value: raw as i64,
        })?;
        Ok(Some(Location {
            reference_id: TaggedReferenceTypeID::new(tag, reference_id),
            method_id,
            index,
        }))
    }
}

impl JdwpWritable for Option<Location> {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        match self {
            Some(location) => location.write(write),
            None => {
                0u8.write(write)?;
                ReferenceTypeID(0).write(write)?;
                MethodID(0).write(write)?;
                0u64.write(write)
            }
        }
    }
}

/// Reply of the `InvokeMethod` commands.
///
/// If the invoked method threw, `exception` is set and `return_value` is
/// whatever the target VM put there (usually a null object).
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct InvokeMethodReply {
    pub return_value: Value,
    pub exception: Option<TaggedObjectID>,
}

impl InvokeMethodReply {
    pub fn result(self) -> Result<Value, TaggedObjectID> {
        match self.exception {
            Some(exception) => Err(exception),
            None => Ok(self.return_value),
        }
    }
}

/// Reply of [NewInstance](super::class_type::NewInstance).
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct NewInstanceReply {
    /// `None` when the constructor threw.
    pub new_object: Option<TaggedObjectID>,
    pub exception: Option<TaggedObjectID>,
}

impl NewInstanceReply {
    pub fn result(self) -> Result<Option<TaggedObjectID>, TaggedObjectID> {
        match self.exception {
            Some(exception) => Err(exception),
            None => Ok(self.new_object),
        }
    }
}
