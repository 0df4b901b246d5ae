//! The primitive layer of the protocol: big-endian integers, strings,
//! length-prefixed collections and the reader/writer wrappers that carry the
//! negotiated identifier sizes through every nested read and write.

use std::{
    borrow::Cow,
    fmt::{self, Debug},
    io::{self, Read, Write},
    marker::PhantomData,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use paste::paste;
use thiserror::Error;

pub use jdwp_wire_macros::{JdwpReadable, JdwpWritable};

use crate::{functional::Coll, spec::virtual_machine::IDSizeInfo};

/// Upper bound on how many elements are preallocated for a length-prefixed
/// collection before any of them were actually read.
const PREALLOC_LIMIT: usize = 4096;

/// Malformed data that was structurally impossible to decode (or encode).
///
/// These are carried inside [io::Error] with [io::ErrorKind::InvalidData]
/// (or [io::ErrorKind::InvalidInput] for the encoding side) and can be
/// recovered with [CodecError::from_io].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown {kind} discriminant {value}")]
    UnknownDiscriminant { kind: &'static str, value: i64 },
    #[error("{kind} cannot use the {tag} tag")]
    UnexpectedTag { kind: &'static str, tag: char },
    #[error("unsupported identifier width of {0} bytes")]
    InvalidIdSize(u32),
    #[error("identifier {id:#x} does not fit into {size} bytes")]
    IdOverflow { id: u64, size: u32 },
    #[error("string is neither UTF-8 nor modified UTF-8")]
    InvalidString,
    #[error("expected a collection of {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: u32 },
    #[error("{value} is out of range for {kind}")]
    OutOfRange { kind: &'static str, value: u64 },
}

impl CodecError {
    /// Extracts the codec error carried by an [io::Error], if there is one.
    pub fn from_io(error: &io::Error) -> Option<&CodecError> {
        error.get_ref().and_then(|e| e.downcast_ref())
    }
}

impl From<CodecError> for io::Error {
    fn from(error: CodecError) -> Self {
        let kind = match error {
            CodecError::IdOverflow { .. } | CodecError::OutOfRange { .. } => {
                io::ErrorKind::InvalidInput
            }
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, error)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TraceDirection {
    Read,
    Write,
}

/// One field that was just read or written by the derived codec impls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldTrace {
    pub direction: TraceDirection,
    /// The struct or `Enum::Variant` the field belongs to.
    pub owner: &'static str,
    /// Field name, or its position for tuple-like types.
    pub field: &'static str,
}

/// Optional callback invoked after each field read or write.
#[derive(Clone)]
pub struct Tracer(Arc<dyn Fn(&FieldTrace) + Send + Sync>);

impl Tracer {
    pub fn new(f: impl Fn(&FieldTrace) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    fn call(&self, direction: TraceDirection, owner: &'static str, field: &'static str) {
        (self.0)(&FieldTrace {
            direction,
            owner,
            field,
        })
    }
}

impl Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tracer(..)")
    }
}

#[derive(Debug)]
pub struct JdwpWriter<W: Write> {
    write: W,
    pub(crate) id_sizes: IDSizeInfo,
    tracer: Option<Tracer>,
}

impl<W: Write> JdwpWriter<W> {
    pub fn new(write: W, id_sizes: IDSizeInfo) -> Self {
        Self {
            write,
            id_sizes,
            tracer: None,
        }
    }

    pub fn with_tracer(mut self, tracer: Option<Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn id_sizes(&self) -> IDSizeInfo {
        self.id_sizes
    }

    pub fn into_inner(self) -> W {
        self.write
    }

    #[doc(hidden)]
    #[inline]
    pub fn trace_field(&self, owner: &'static str, field: &'static str) {
        if let Some(tracer) = &self.tracer {
            tracer.call(TraceDirection::Write, owner, field);
        }
    }

    pub(crate) fn write_id(&mut self, id: u64, size: u32) -> io::Result<()> {
        check_id_size(size)?;
        if size < 8 && id >> (size * 8) != 0 {
            return Err(CodecError::IdOverflow { id, size }.into());
        }
        self.write.write_uint::<BigEndian>(id, size as usize)
    }
}

impl<W: Write> Deref for JdwpWriter<W> {
    type Target = W;

    fn deref(&self) -> &Self::Target {
        &self.write
    }
}

impl<W: Write> DerefMut for JdwpWriter<W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.write
    }
}

#[derive(Debug)]
pub struct JdwpReader<R: Read> {
    read: R,
    pub(crate) id_sizes: IDSizeInfo,
    tracer: Option<Tracer>,
}

impl<R: Read> JdwpReader<R> {
    pub fn new(read: R, id_sizes: IDSizeInfo) -> Self {
        Self {
            read,
            id_sizes,
            tracer: None,
        }
    }

    pub fn with_tracer(mut self, tracer: Option<Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn id_sizes(&self) -> IDSizeInfo {
        self.id_sizes
    }

    pub fn into_inner(self) -> R {
        self.read
    }

    #[doc(hidden)]
    #[inline]
    pub fn trace_field(&self, owner: &'static str, field: &'static str) {
        if let Some(tracer) = &self.tracer {
            tracer.call(TraceDirection::Read, owner, field);
        }
    }

    pub(crate) fn read_id(&mut self, size: u32) -> io::Result<u64> {
        check_id_size(size)?;
        self.read.read_uint::<BigEndian>(size as usize)
    }

    /// Reads exactly `len` bytes without trusting `len` for the allocation.
    pub(crate) fn read_bytes(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        (&mut self.read).take(len as u64).read_to_end(&mut bytes)?;
        if bytes.len() != len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        Ok(bytes)
    }
}

impl<R: Read> Deref for JdwpReader<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.read
    }
}

impl<R: Read> DerefMut for JdwpReader<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.read
    }
}

fn check_id_size(size: u32) -> io::Result<()> {
    if (1..=8).contains(&size) {
        Ok(())
    } else {
        Err(CodecError::InvalidIdSize(size).into())
    }
}

pub trait JdwpReadable: Sized {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self>;
}

pub trait JdwpWritable {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()>;
}

impl JdwpReadable for () {
    #[inline]
    fn read<R: Read>(_: &mut JdwpReader<R>) -> io::Result<Self> {
        Ok(())
    }
}

impl JdwpWritable for () {
    #[inline]
    fn write<W: Write>(&self, _: &mut JdwpWriter<W>) -> io::Result<()> {
        Ok(())
    }
}

impl<T> JdwpReadable for PhantomData<T> {
    #[inline]
    fn read<R: Read>(_: &mut JdwpReader<R>) -> io::Result<Self> {
        Ok(PhantomData)
    }
}

impl<T> JdwpWritable for PhantomData<T> {
    #[inline]
    fn write<W: Write>(&self, _: &mut JdwpWriter<W>) -> io::Result<()> {
        Ok(())
    }
}

impl JdwpReadable for bool {
    #[inline]
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        read.read_u8().map(|n| n != 0)
    }
}

impl JdwpWritable for bool {
    #[inline]
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write.write_u8(u8::from(*self))
    }
}

// read/write + i8/u8 methods do not have the endianness generic, eh

impl JdwpReadable for i8 {
    #[inline]
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        read.read_i8()
    }
}

impl JdwpWritable for i8 {
    #[inline]
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write.write_i8(*self)
    }
}

impl JdwpReadable for u8 {
    #[inline]
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        read.read_u8()
    }
}

impl JdwpWritable for u8 {
    #[inline]
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write.write_u8(*self)
    }
}

macro_rules! int_io {
    ($($types:ident),* $(,)?) => {
        $(
            impl JdwpReadable for $types {
                #[inline]
                fn read<R: Read>(reader: &mut JdwpReader<R>) -> io::Result<Self> {
                    paste! {
                        reader.[<read_ $types>]::<BigEndian>()
                    }
                }
            }

            impl JdwpWritable for $types {
                #[inline]
                fn write<W: Write>(&self, writer: &mut JdwpWriter<W>) -> io::Result<()> {
                    paste! {
                        writer.[<write_ $types>]::<BigEndian>(*self)
                    }
                }
            }
        )*
    };
}

int_io![i16, u16, i32, u32, i64, u64, f32, f64];

/// Strings are expected to be UTF-8, but HotSpot sends supplementary
/// characters and NULs in the modified UTF-8 form, so that is accepted too.
impl JdwpReadable for String {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        let len = u32::read(read)? as usize;
        let bytes = read.read_bytes(len)?;
        match String::from_utf8(bytes) {
            Ok(string) => Ok(string),
            Err(err) => cesu8::from_java_cesu8(err.as_bytes())
                .map(Cow::into_owned)
                .map_err(|_| CodecError::InvalidString.into()),
        }
    }
}

impl JdwpWritable for String {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        self.as_str().write(write)
    }
}

/// Writes the `u32` length prefix of a string or collection.
pub(crate) fn write_length<W: Write>(len: usize, write: &mut JdwpWriter<W>) -> io::Result<()> {
    u32::try_from(len)
        .map_err(|_| CodecError::OutOfRange {
            kind: "length prefix",
            value: len as u64,
        })?
        .write(write)
}

impl JdwpWritable for str {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write_length(self.len(), write)?;
        write.write_all(self.as_bytes())
    }
}

/// Absent strings, like the generic signature of a non-generic type, are sent
/// as empty ones.
///
/// The wire has no way to tell an empty string from an absent one, so
/// `Some(String::new())` is written as absent and reads back as `None`.
impl JdwpReadable for Option<String> {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        let string = String::read(read)?;
        Ok(if string.is_empty() { None } else { Some(string) })
    }
}

impl JdwpWritable for Option<String> {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        self.as_deref().unwrap_or_default().write(write)
    }
}

impl<C> JdwpReadable for C
where
    C: Coll,
    C::Item: JdwpReadable,
{
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        let len = u32::read(read)?;
        if let Some(static_size) = C::STATIC_SIZE {
            if len as usize != static_size.get() {
                return Err(CodecError::LengthMismatch {
                    expected: static_size.get(),
                    actual: len,
                }
                .into());
            }
        }
        let mut res = Vec::with_capacity((len as usize).min(PREALLOC_LIMIT));
        for _ in 0..len {
            res.push(C::Item::read(read)?);
        }
        C::from_vec(res).ok_or_else(|| io::Error::from(io::ErrorKind::InvalidData))
    }
}

impl<C> JdwpWritable for C
where
    C: Coll,
    C::Item: JdwpWritable,
{
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write_length(self.size(), write)?;
        for item in self.iter() {
            item.write(write)?;
        }
        Ok(())
    }
}

impl<A: JdwpReadable, B: JdwpReadable> JdwpReadable for (A, B) {
    fn read<R: Read>(read: &mut JdwpReader<R>) -> io::Result<Self> {
        Ok((A::read(read)?, B::read(read)?))
    }
}

impl<A: JdwpWritable, B: JdwpWritable> JdwpWritable for (A, B) {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        self.0.write(write)?;
        self.1.write(write)
    }
}

// only writable to allow using slices as command arguments
impl<T: JdwpWritable> JdwpWritable for &[T] {
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write_length(self.len(), write)?;
        for item in *self {
            item.write(write)?;
        }
        Ok(())
    }
}
