use std::{
    fmt::{Display, Formatter},
    io::{self, Read, Write},
};

use bitflags::bitflags;

use crate::codec::{CodecError, JdwpReadable, JdwpReader, JdwpWritable, JdwpWriter};

macro_rules! jdwp_enum {
    (
        #[repr($repr:ident)]
        pub enum $e:ident {
            $($(#[doc = $string:literal])* $name:ident = $id:literal),*
            $(,)?
        }
    ) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        #[repr($repr)]
        pub enum $e {
            $($(#[doc = $string])* $name = $id,)*
        }

        impl TryFrom<$repr> for $e {
            type Error = $repr;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                match value {
                    $($id => Ok($e::$name),)*
                    other => Err(other),
                }
            }
        }

        impl JdwpReadable for $e {
            fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
                Self::try_from($repr::read(read)?).map_err(|raw| {
                    CodecError::UnknownDiscriminant {
                        kind: stringify!($e),
                        value: raw as i64,
                    }
                    .into()
                })
            }
        }

        impl JdwpWritable for $e {
            fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                (*self as $repr).write(write)
            }
        }
    };
    (
        #[derive(Display)]
        #[repr($repr:ident)]
        pub enum $e:ident {
            $(#[doc = $string:literal] $name:ident = $id:literal),*
            $(,)?
        }
    ) => {
        jdwp_enum! {
            #[repr($repr)]
            pub enum $e {
                $(#[doc = $string] $name = $id,)*
            }
        }

        impl Display for $e {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $($e::$name => $string.trim(),)*
                })
            }
        }
    };
}

jdwp_enum! {
    #[derive(Display)]
    #[repr(u16)]
    pub enum ErrorCode {
        /// No error
        None = 0,
        /// The thread is null, not a thread, or has exited
        InvalidThread = 10,
        /// The thread group is invalid
        InvalidThreadGroup = 11,
        /// The priority is invalid
        InvalidPriority = 12,
        /// The thread is not suspended
        ThreadNotSuspended = 13,
        /// The thread is already suspended
        ThreadSuspended = 14,
        /// The thread was not started yet or is already dead
        ThreadNotAlive = 15,
        /// The object is invalid or was collected
        InvalidObject = 20,
        /// The class is invalid
        InvalidClass = 21,
        /// The class is loaded but not prepared yet
        ClassNotPrepared = 22,
        /// The method ID is invalid
        InvalidMethodid = 23,
        /// The location is invalid
        InvalidLocation = 24,
        /// The field ID is invalid
        InvalidFieldid = 25,
        /// The frame ID is invalid
        InvalidFrameid = 30,
        /// There are no more Java or JNI frames on the stack
        NoMoreFrames = 31,
        /// No information is available about the frame
        OpaqueFrame = 32,
        /// The operation only works on the current frame
        NotCurrentFrame = 33,
        /// The variable type does not match the function
        TypeMismatch = 34,
        /// The slot is invalid
        InvalidSlot = 35,
        /// The item is already set
        Duplicate = 40,
        /// The element was not found
        NotFound = 41,
        /// The monitor is invalid
        InvalidMonitor = 50,
        /// The thread does not own the monitor
        NotMonitorOwner = 51,
        /// The call was interrupted before it completed
        Interrupt = 52,
        /// The class file is malformed
        InvalidClassFormat = 60,
        /// Circular class definition detected during initialization
        CircularClassDefinition = 61,
        /// The class file failed verification
        FailsVerification = 62,
        /// Adding methods is not supported
        AddMethodNotImplemented = 63,
        /// Changing the class schema is not supported
        SchemaChangeNotImplemented = 64,
        /// The thread state was modified and is now inconsistent
        InvalidTypestate = 65,
        /// Changing the class hierarchy is not supported
        HierarchyChangeNotImplemented = 66,
        /// Deleting methods is not supported
        DeleteMethodNotImplemented = 67,
        /// The class file version is not supported
        UnsupportedVersion = 68,
        /// The new class name does not match the old one
        NamesDontMatch = 69,
        /// Changing class modifiers is not supported
        ClassModifiersChangeNotImplemented = 70,
        /// Changing method modifiers is not supported
        MethodModifiersChangeNotImplemented = 71,
        /// Changing class attributes is not supported
        ClassAttributeChangeNotImplemented = 72,
        /// The functionality is not implemented in this VM
        NotImplemented = 99,
        /// Null pointer
        NullPointer = 100,
        /// The requested information is not available
        AbsentInformation = 101,
        /// The event type is not recognized
        InvalidEventType = 102,
        /// Illegal argument
        IllegalArgument = 103,
        /// Out of memory
        OutOfMemory = 110,
        /// Debugging is not enabled in this VM
        AccessDenied = 111,
        /// The VM is not running
        VmDead = 112,
        /// Unexpected internal error
        Internal = 113,
        /// The calling thread is not attached to the VM
        UnattachedThread = 115,
        /// Invalid object type ID or class tag
        InvalidTag = 500,
        /// A previous invoke is still in progress
        AlreadyInvoking = 502,
        /// The index is invalid
        InvalidIndex = 503,
        /// The length is invalid
        InvalidLength = 504,
        /// The string is invalid
        InvalidString = 506,
        /// The class loader is invalid
        InvalidClassLoader = 507,
        /// The array is invalid
        InvalidArray = 508,
        /// Unable to load the transport
        TransportLoad = 509,
        /// Unable to initialize the transport
        TransportInit = 510,
        /// The method is native
        NativeMethod = 511,
        /// The count is invalid
        InvalidCount = 512,
    }
}

jdwp_enum! {
    #[repr(u8)]
    pub enum EventKind {
        SingleStep = 1,
        Breakpoint = 2,
        FramePop = 3,
        Exception = 4,
        UserDefined = 5,
        ThreadStart = 6,
        ThreadDeath = 7,
        ClassPrepare = 8,
        ClassUnload = 9,
        ClassLoad = 10,
        FieldAccess = 20,
        FieldModification = 21,
        ExceptionCatch = 30,
        MethodEntry = 40,
        MethodExit = 41,
        MethodExitWithReturnValue = 42,
        MonitorContendedEnter = 43,
        MonitorContendedEntered = 44,
        MonitorWait = 45,
        MonitorWaited = 46,
        VmStart = 90,
        VmDeath = 99,
        /// Only used locally by debuggers, never sent over the wire
        VmDisconnected = 100,
    }
}

jdwp_enum! {
    #[repr(u32)]
    pub enum ThreadStatus {
        Zombie = 0,
        Running = 1,
        Sleeping = 2,
        Monitor = 3,
        Wait = 4,
    }
}

jdwp_enum! {
    #[repr(u32)]
    pub enum SuspendStatus {
        NotSuspended = 0,
        Suspended = 1,
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ClassStatus: u32 {
        const VERIFIED = 1;
        const PREPARED = 2;
        const INITIALIZED = 4;
        const ERROR = 8;

        const OK = Self::VERIFIED.bits() | Self::PREPARED.bits() | Self::INITIALIZED.bits();
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InvokeOptions: u32 {
        const NONE = 0x00;
        /// Resume only the invoking thread instead of all threads
        const SINGLE_THREADED = 0x01;
        /// Call the exact method given instead of doing a virtual dispatch
        const NONVIRTUAL = 0x02;
    }
}

// Access flags as found in class files. The target VM can report bits that
// are not named here, those are kept as is.

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TypeModifiers: u32 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FieldModifiers: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
        /// Not a class file flag, JDWP sets this for fields the compiler
        /// generated
        const JDWP_SYNTHETIC = 0xf000_0000;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MethodModifiers: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        /// See [FieldModifiers::JDWP_SYNTHETIC]
        const JDWP_SYNTHETIC = 0xf000_0000;
    }
}

macro_rules! int_flags {
    ($($flags:ident),* $(,)?) => {
        $(
            impl JdwpReadable for $flags {
                fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
                    u32::read(read).map(Self::from_bits_retain)
                }
            }

            impl JdwpWritable for $flags {
                fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                    self.bits().write(write)
                }
            }
        )*
    };
}

int_flags![
    ClassStatus,
    InvokeOptions,
    TypeModifiers,
    FieldModifiers,
    MethodModifiers,
];

pub(crate) trait ByteTag {}

jdwp_enum! {
    #[repr(u8)]
    pub enum TypeTag {
        Class = 1,
        Interface = 2,
        Array = 3,
    }
}

jdwp_enum! {
    #[repr(u8)]
    pub enum Tag {
        /// `[`, an array, object ID sized
        Array = 91,
        /// `B`, 1 byte
        Byte = 66,
        /// `C`, 2 bytes
        Char = 67,
        /// `L`, an object, object ID sized
        Object = 76,
        /// `F`, 4 bytes
        Float = 70,
        /// `D`, 8 bytes
        Double = 68,
        /// `I`, 4 bytes
        Int = 73,
        /// `J`, 8 bytes
        Long = 74,
        /// `S`, 2 bytes
        Short = 83,
        /// `V`, no payload
        Void = 86,
        /// `Z`, 1 byte
        Boolean = 90,
        /// `s`, a `java.lang.String`, object ID sized
        String = 115,
        /// `t`, a `java.lang.Thread`, object ID sized
        Thread = 116,
        /// `g`, a `java.lang.ThreadGroup`, object ID sized
        ThreadGroup = 103,
        /// `l`, a `java.lang.ClassLoader`, object ID sized
        ClassLoader = 108,
        /// `c`, a `java.lang.Class`, object ID sized
        ClassObject = 99,
    }
}

impl Tag {
    /// The signature character of the tag.
    pub fn as_char(self) -> char {
        self as u8 as char
    }

    /// Whether the payload of this tag is an object ID.
    pub fn is_object(self) -> bool {
        use Tag::*;
        matches!(
            self,
            Array | Object | String | Thread | ThreadGroup | ClassLoader | ClassObject
        )
    }
}

impl ByteTag for Tag {}
impl ByteTag for TypeTag {}
impl ByteTag for EventKind {}

jdwp_enum! {
    #[repr(u32)]
    pub enum StepDepth {
        /// Step into calls made before the step ends
        Into = 0,
        /// Step over calls made before the step ends
        Over = 1,
        /// Step out of the current method
        Out = 2,
    }
}

jdwp_enum! {
    #[repr(u32)]
    pub enum StepSize {
        /// The smallest possible step, often one bytecode instruction
        Min = 0,
        /// Step to the next source line, or a [Min](StepSize::Min) step when
        /// there is no line information
        Line = 1,
    }
}

jdwp_enum! {
    #[repr(u8)]
    pub enum SuspendPolicy {
        /// Nothing is suspended
        None = 0,
        /// Only the thread that hit the event is suspended
        EventThread = 1,
        /// Every thread is suspended
        All = 2,
    }
}

jdwp_enum! {
    #[repr(u8)]
    pub enum ModifierKind {
        Count = 1,
        Conditional = 2,
        ThreadOnly = 3,
        ClassOnly = 4,
        ClassMatch = 5,
        ClassExclude = 6,
        LocationOnly = 7,
        ExceptionOnly = 8,
        FieldOnly = 9,
        Step = 10,
        InstanceOnly = 11,
        SourceNameMatch = 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::virtual_machine::IDSizeInfo;

    #[test]
    fn error_code_display_uses_description() {
        assert_eq!(ErrorCode::InvalidSlot.to_string(), "The slot is invalid");
        assert_eq!(ErrorCode::try_from(35u16), Ok(ErrorCode::InvalidSlot));
        assert_eq!(ErrorCode::try_from(1u16), Err(1u16));
    }

    #[test]
    fn unknown_tag_names_the_enum() {
        let mut read = JdwpReader::new(&[b'x'][..], IDSizeInfo::default());
        let err = Tag::read(&mut read).unwrap_err();
        assert_eq!(err.to_string(), "unknown Tag discriminant 120");
    }

    #[test]
    fn unknown_status_bits_are_retained() {
        let mut read = JdwpReader::new(&[0, 0, 0, 0x17][..], IDSizeInfo::default());
        let status = ClassStatus::read(&mut read).unwrap();
        assert!(status.contains(ClassStatus::OK));
        assert_eq!(status.bits(), 0x17);
    }

    #[test]
    fn object_tags() {
        assert!(Tag::ClassLoader.is_object());
        assert!(!Tag::Void.is_object());
        assert_eq!(Tag::Array.as_char(), '[');
    }
}
