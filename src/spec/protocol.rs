use std::{
    fmt::{self, Display},
    io::{self, Read, Write},
};

use log::warn;

use crate::{
    codec::{CodecError, JdwpReadable, JdwpReader, JdwpWritable, JdwpWriter, Tracer},
    spec::virtual_machine::IDSizeInfo,
};

pub trait Command {
    const ID: CommandId;

    type Output;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
pub struct CommandId {
    command_set: u8,
    command: u8,
}

impl CommandId {
    pub const fn new(command_set: u8, command: u8) -> CommandId {
        CommandId {
            command_set,
            command,
        }
    }

    pub const fn command_set(&self) -> u8 {
        self.command_set
    }

    pub const fn command(&self) -> u8 {
        self.command
    }

    /// `"CommandSet.Command"` for every command this crate knows about.
    pub fn name(&self) -> Option<&'static str> {
        let name = match (self.command_set, self.command) {
            (1, 1) => "VirtualMachine.Version",
            (1, 2) => "VirtualMachine.ClassesBySignature",
            (1, 3) => "VirtualMachine.AllClasses",
            (1, 4) => "VirtualMachine.AllThreads",
            (1, 5) => "VirtualMachine.TopLevelThreadGroups",
            (1, 6) => "VirtualMachine.Dispose",
            (1, 7) => "VirtualMachine.IDSizes",
            (1, 8) => "VirtualMachine.Suspend",
            (1, 9) => "VirtualMachine.Resume",
            (1, 10) => "VirtualMachine.Exit",
            (1, 11) => "VirtualMachine.CreateString",
            (1, 12) => "VirtualMachine.Capabilities",
            (1, 13) => "VirtualMachine.ClassPaths",
            (1, 14) => "VirtualMachine.DisposeObjects",
            (1, 15) => "VirtualMachine.HoldEvents",
            (1, 16) => "VirtualMachine.ReleaseEvents",
            (1, 17) => "VirtualMachine.CapabilitiesNew",
            (1, 18) => "VirtualMachine.RedefineClasses",
            (1, 19) => "VirtualMachine.SetDefaultStratum",
            (1, 20) => "VirtualMachine.AllClassesWithGeneric",
            (1, 21) => "VirtualMachine.InstanceCounts",
            (1, 22) => "VirtualMachine.AllModules",
            (2, 1) => "ReferenceType.Signature",
            (2, 2) => "ReferenceType.ClassLoader",
            (2, 3) => "ReferenceType.Modifiers",
            (2, 4) => "ReferenceType.Fields",
            (2, 5) => "ReferenceType.Methods",
            (2, 6) => "ReferenceType.GetValues",
            (2, 7) => "ReferenceType.SourceFile",
            (2, 8) => "ReferenceType.NestedTypes",
            (2, 9) => "ReferenceType.Status",
            (2, 10) => "ReferenceType.Interfaces",
            (2, 11) => "ReferenceType.ClassObject",
            (2, 12) => "ReferenceType.SourceDebugExtension",
            (2, 13) => "ReferenceType.SignatureWithGeneric",
            (2, 14) => "ReferenceType.FieldsWithGeneric",
            (2, 15) => "ReferenceType.MethodsWithGeneric",
            (2, 16) => "ReferenceType.Instances",
            (2, 17) => "ReferenceType.ClassFileVersion",
            (2, 18) => "ReferenceType.ConstantPool",
            (2, 19) => "ReferenceType.Module",
            (3, 1) => "ClassType.Superclass",
            (3, 2) => "ClassType.SetValues",
            (3, 3) => "ClassType.InvokeMethod",
            (3, 4) => "ClassType.NewInstance",
            (4, 1) => "ArrayType.NewInstance",
            (5, 1) => "InterfaceType.InvokeMethod",
            (6, 1) => "Method.LineTable",
            (6, 2) => "Method.VariableTable",
            (6, 3) => "Method.Bytecodes",
            (6, 4) => "Method.IsObsolete",
            (6, 5) => "Method.VariableTableWithGeneric",
            (9, 1) => "ObjectReference.ReferenceType",
            (9, 2) => "ObjectReference.GetValues",
            (9, 3) => "ObjectReference.SetValues",
            (9, 5) => "ObjectReference.MonitorInfo",
            (9, 6) => "ObjectReference.InvokeMethod",
            (9, 7) => "ObjectReference.DisableCollection",
            (9, 8) => "ObjectReference.EnableCollection",
            (9, 9) => "ObjectReference.IsCollected",
            (9, 10) => "ObjectReference.ReferringObjects",
            (10, 1) => "StringReference.Value",
            (11, 1) => "ThreadReference.Name",
            (11, 2) => "ThreadReference.Suspend",
            (11, 3) => "ThreadReference.Resume",
            (11, 4) => "ThreadReference.Status",
            (11, 5) => "ThreadReference.ThreadGroup",
            (11, 6) => "ThreadReference.Frames",
            (11, 7) => "ThreadReference.FrameCount",
            (11, 8) => "ThreadReference.OwnedMonitors",
            (11, 9) => "ThreadReference.CurrentContendedMonitor",
            (11, 10) => "ThreadReference.Stop",
            (11, 11) => "ThreadReference.Interrupt",
            (11, 12) => "ThreadReference.SuspendCount",
            (11, 13) => "ThreadReference.OwnedMonitorsStackDepthInfo",
            (11, 14) => "ThreadReference.ForceEarlyReturn",
            (11, 15) => "ThreadReference.IsVirtual",
            (12, 1) => "ThreadGroupReference.Name",
            (12, 2) => "ThreadGroupReference.Parent",
            (12, 3) => "ThreadGroupReference.Children",
            (13, 1) => "ArrayReference.Length",
            (13, 2) => "ArrayReference.GetValues",
            (13, 3) => "ArrayReference.SetValues",
            (14, 1) => "ClassLoaderReference.VisibleClasses",
            (15, 1) => "EventRequest.Set",
            (15, 2) => "EventRequest.Clear",
            (15, 3) => "EventRequest.ClearAllBreakpoints",
            (16, 1) => "StackFrame.GetValues",
            (16, 2) => "StackFrame.SetValues",
            (16, 3) => "StackFrame.ThisObject",
            (16, 4) => "StackFrame.PopFrames",
            (17, 1) => "ClassObjectReference.ReflectedType",
            (18, 1) => "ModuleReference.Name",
            (18, 2) => "ModuleReference.ClassLoader",
            (64, 100) => "Event.Composite",
            _ => return None,
        };
        Some(name)
    }
}

/// Shows the name when known, followed by the numeric pair.
impl Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({}.{})", self.command_set, self.command),
            None => write!(f, "{}.{}", self.command_set, self.command),
        }
    }
}

/// The part of the header after the ID: a command pair or a reply error
/// code, told apart by the flags byte.
///
/// The error code is kept raw so that codes missing from
/// [ErrorCode](crate::spec::ErrorCode) still reach the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum PacketMeta {
    Command(CommandId) = 0x00,
    Reply(u16) = 0x80,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
pub struct PacketHeader {
    length: u32,
    id: u32,
    meta: PacketMeta,
}

impl PacketHeader {
    pub const JDWP_SIZE: u32 = 4 + 4 + 1 + 2;

    pub const fn new(length: u32, id: u32, meta: PacketMeta) -> PacketHeader {
        PacketHeader { length, id, meta }
    }

    pub const fn length(&self) -> u32 {
        self.length
    }

    pub const fn id(&self) -> u32 {
        self.id
    }

    pub const fn meta(&self) -> PacketMeta {
        self.meta
    }
}

/// Header plus body, failing when it does not fit into the length field.
fn packet_length(body_len: usize) -> Result<u32, CodecError> {
    u32::try_from(body_len)
        .ok()
        .and_then(|len| len.checked_add(PacketHeader::JDWP_SIZE))
        .ok_or(CodecError::OutOfRange {
            kind: "packet length",
            value: body_len as u64,
        })
}

/// A whole framed packet with its body still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub header: PacketHeader,
    pub body: Vec<u8>,
}

impl Packet {
    fn new(id: u32, meta: PacketMeta, body: Vec<u8>) -> io::Result<Packet> {
        let length = packet_length(body.len())?;
        Ok(Packet {
            header: PacketHeader::new(length, id, meta),
            body,
        })
    }

    fn encode_body(
        value: &(impl JdwpWritable + ?Sized),
        id_sizes: IDSizeInfo,
        tracer: Option<&Tracer>,
    ) -> io::Result<Vec<u8>> {
        let mut write = JdwpWriter::new(Vec::new(), id_sizes).with_tracer(tracer.cloned());
        value.write(&mut write)?;
        Ok(write.into_inner())
    }

    pub fn command<C: Command + JdwpWritable>(
        id: u32,
        command: &C,
        id_sizes: IDSizeInfo,
        tracer: Option<&Tracer>,
    ) -> io::Result<Packet> {
        let body = Self::encode_body(command, id_sizes, tracer)?;
        Packet::new(id, PacketMeta::Command(C::ID), body)
    }

    /// A successful reply, as a target VM (or a test double of one) would
    /// send it.
    pub fn reply(id: u32, reply: &impl JdwpWritable, id_sizes: IDSizeInfo) -> io::Result<Packet> {
        let body = Self::encode_body(reply, id_sizes, None)?;
        Packet::new(id, PacketMeta::Reply(0), body)
    }

    /// A failed reply, which never has a body.
    pub fn error(id: u32, code: u16) -> Packet {
        Packet {
            header: PacketHeader::new(PacketHeader::JDWP_SIZE, id, PacketMeta::Reply(code)),
            body: Vec::new(),
        }
    }

    /// The raw error code of a reply, 0 for commands.
    pub fn error_code(&self) -> u16 {
        match self.header.meta() {
            PacketMeta::Reply(code) => code,
            PacketMeta::Command(_) => 0,
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self.header.meta(), PacketMeta::Reply(_))
    }

    /// Reads the next packet, or `None` on a clean end of stream right at a
    /// packet boundary.
    ///
    /// Lengths below the header size or above `max_length` are rejected
    /// before the body is allocated.
    pub fn read_from<R: Read>(read: &mut R, max_length: u32) -> io::Result<Option<Packet>> {
        let mut buf = [0; PacketHeader::JDWP_SIZE as usize];
        let mut filled = 0;
        while filled < buf.len() {
            match read.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        let header = PacketHeader::read(&mut JdwpReader::new(&buf[..], IDSizeInfo::default()))?;

        let length = header.length();
        if length < PacketHeader::JDWP_SIZE || length > max_length {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid packet length {length}"),
            ));
        }
        let mut body = vec![0; (length - PacketHeader::JDWP_SIZE) as usize];
        read.read_exact(&mut body)?;
        Ok(Some(Packet { header, body }))
    }

    /// Writes the header and the body with a single `write_all`.
    pub fn write_to<W: Write>(&self, write: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(self.header.length() as usize);
        let mut writer = JdwpWriter::new(&mut buf, IDSizeInfo::default());
        self.header.write(&mut writer)?;
        buf.extend_from_slice(&self.body);
        write.write_all(&buf)?;
        write.flush()
    }

    /// Decodes the body as `T`.
    ///
    /// Bytes left over after `T` is complete are not an error, newer target
    /// VMs may append fields, but they are logged.
    pub fn decode_body<T: JdwpReadable>(
        &self,
        id_sizes: IDSizeInfo,
        tracer: Option<&Tracer>,
    ) -> io::Result<T> {
        let mut read = JdwpReader::new(self.body.as_slice(), id_sizes).with_tracer(tracer.cloned());
        let value = T::read(&mut read)?;
        let left = read.into_inner().len();
        if left > 0 {
            warn!(
                "[{}] {left} bytes left unread after decoding {}",
                self.header.id(),
                std::any::type_name::<T>()
            );
        }
        Ok(value)
    }
}
