//! A blocking JDWP client over an already handshaken byte channel.
//!
//! Commands can be sent from any number of threads at once. A dedicated
//! reader thread matches replies to requests by packet ID and forwards
//! [Composite] events to a channel.

use std::{
    collections::HashMap,
    fmt::{self, Debug},
    io::{self, Read, Write},
    marker::PhantomData,
    net::{Shutdown, TcpStream},
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex, MutexGuard,
    },
    thread::{self, JoinHandle},
};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error, trace, warn};
use thiserror::Error;

use crate::{
    codec::{JdwpReadable, JdwpWritable, Tracer},
    spec::{
        event::Composite,
        virtual_machine::{IDSizeInfo, IDSizes},
        Command, CommandId, ErrorCode, Packet, PacketMeta,
    },
};

/// Packets longer than this are rejected unless configured otherwise.
pub const DEFAULT_MAX_PACKET_LENGTH: u32 = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identifier widths to use without asking the target VM. When `None`
    /// they are negotiated with [IDSizes] before anything else is sent.
    pub id_sizes: Option<IDSizeInfo>,
    /// Largest packet, header included, the client accepts.
    pub max_packet_length: u32,
    /// Called for every field encoded or decoded by the client.
    pub tracer: Option<Tracer>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            id_sizes: None,
            max_packet_length: DEFAULT_MAX_PACKET_LENGTH,
            tracer: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The target VM replied with a nonzero error code, the reply body was
    /// not looked at.
    #[error("{command} failed with {}", describe_code(.code))]
    HostError { command: CommandId, code: u16 },
    #[error("could not decode the reply to {command}")]
    Decode {
        command: CommandId,
        #[source]
        source: io::Error,
    },
    #[error("malformed packet stream: {0}")]
    Framing(String),
    #[error("the connection to the target VM is closed")]
    Disconnected,
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn describe_code(code: &u16) -> String {
    match ErrorCode::try_from(*code) {
        Ok(known) => format!("error {code}: {known}"),
        Err(_) => format!("unknown error {code}"),
    }
}

impl ClientError {
    /// The known error code of a [HostError](ClientError::HostError).
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::HostError { code, .. } => ErrorCode::try_from(*code).ok(),
            _ => None,
        }
    }

    /// Whether the channel itself is gone, as opposed to a single command
    /// failing.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ClientError::HostError { .. })
    }
}

fn read_error(error: io::Error) -> ClientError {
    match error.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            ClientError::Framing(error.to_string())
        }
        _ => ClientError::Io(error),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("lock was poisoned, continuing with the recovered guard");
        poisoned.into_inner()
    })
}

/// Decodes the reply to `C`.
///
/// A nonzero error code is returned as a
/// [HostError](ClientError::HostError) without touching the body.
pub fn decode_reply<C: Command>(
    packet: &Packet,
    id_sizes: IDSizeInfo,
    tracer: Option<&Tracer>,
) -> Result<C::Output, ClientError>
where
    C::Output: JdwpReadable,
{
    match packet.header.meta() {
        PacketMeta::Reply(0) => {}
        PacketMeta::Reply(code) => {
            return Err(ClientError::HostError {
                command: C::ID,
                code,
            })
        }
        PacketMeta::Command(command) => {
            return Err(ClientError::Framing(format!(
                "expected a reply to {}, got command {command}",
                C::ID
            )))
        }
    }
    packet
        .decode_body(id_sizes, tracer)
        .map_err(|source| ClientError::Decode {
            command: C::ID,
            source,
        })
}

struct Shared {
    writer: Mutex<Box<dyn Write + Send>>,
    /// `None` once the channel is closed.
    pending: Mutex<Option<HashMap<u32, Sender<Packet>>>>,
    next_id: AtomicU32,
    id_sizes: IDSizeInfo,
    tracer: Option<Tracer>,
    stream: Option<TcpStream>,
}

impl Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("next_id", &self.next_id)
            .field("id_sizes", &self.id_sizes)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn is_closed(&self) -> bool {
        lock(&self.pending).is_none()
    }

    /// Fails every outstanding request with
    /// [Disconnected](ClientError::Disconnected) and refuses new ones.
    fn close(&self) {
        if let Some(pending) = lock(&self.pending).take() {
            debug!("closing, {} requests left without a reply", pending.len());
        }
        if let Some(stream) = &self.stream {
            // unblocks the reader thread, the socket may already be gone
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn write(&self, packet: &Packet) -> io::Result<()> {
        let mut writer = lock(&self.writer);
        packet.write_to(&mut *writer)
    }
}

/// A connection to a target VM.
#[derive(Debug)]
pub struct JdwpClient {
    shared: Arc<Shared>,
    events: Receiver<Composite>,
    reader: Option<JoinHandle<()>>,
}

impl JdwpClient {
    /// Starts a client on a TCP connection on which the `JDWP-Handshake`
    /// exchange already happened.
    pub fn from_stream(stream: TcpStream) -> Result<Self, ClientError> {
        Self::from_stream_with_config(stream, ClientConfig::default())
    }

    pub fn from_stream_with_config(
        stream: TcpStream,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let read = stream.try_clone()?;
        let write = stream.try_clone()?;
        Self::start(read, write, Some(stream), config)
    }

    /// Starts a client on an arbitrary pair of byte streams.
    pub fn new<R, W>(read: R, write: W) -> Result<Self, ClientError>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self::with_config(read, write, ClientConfig::default())
    }

    pub fn with_config<R, W>(read: R, write: W, config: ClientConfig) -> Result<Self, ClientError>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self::start(read, write, None, config)
    }

    fn start<R, W>(
        mut read: R,
        write: W,
        stream: Option<TcpStream>,
        config: ClientConfig,
    ) -> Result<Self, ClientError>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let mut writer: Box<dyn Write + Send> = Box::new(write);
        let mut next_id = 1;
        let mut early_events = Vec::new();

        let id_sizes = match config.id_sizes {
            Some(id_sizes) => id_sizes,
            None => {
                let id = next_id;
                next_id += 1;
                negotiate(id, &mut read, &mut writer, &config, &mut early_events)?
            }
        };
        id_sizes.validate().map_err(io::Error::from)?;

        let (event_sender, events) = unbounded();
        for packet in early_events {
            let composite = packet
                .decode_body::<Composite>(id_sizes, config.tracer.as_ref())
                .map_err(|source| ClientError::Decode {
                    command: Composite::ID,
                    source,
                })?;
            trace!("[{}] buffered {composite:?}", packet.header.id());
            // the receiver is right here, this cannot fail
            let _ = event_sender.send(composite);
        }

        let shared = Arc::new(Shared {
            writer: Mutex::new(writer),
            pending: Mutex::new(Some(HashMap::new())),
            next_id: AtomicU32::new(next_id),
            id_sizes,
            tracer: config.tracer,
            stream,
        });

        let reader = thread::Builder::new().name("jdwp-reader".into()).spawn({
            let shared = shared.clone();
            let max_length = config.max_packet_length;
            move || reader_loop(read, &shared, &event_sender, max_length)
        })?;

        Ok(Self {
            shared,
            events,
            reader: Some(reader),
        })
    }

    pub fn id_sizes(&self) -> IDSizeInfo {
        self.shared.id_sizes
    }

    /// Events sent by the target VM, in the order they arrived.
    ///
    /// The channel disconnects once the connection is closed.
    pub fn events(&self) -> &Receiver<Composite> {
        &self.events
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Writes the command and returns a handle to wait for its reply with.
    ///
    /// Useful for pipelining: several commands can be in flight before any
    /// of their replies is waited on.
    pub fn enqueue<C>(&self, command: &C) -> Result<PendingReply<C>, ClientError>
    where
        C: Command + JdwpWritable + Debug,
    {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let packet = Packet::command(
            id,
            command,
            self.shared.id_sizes,
            self.shared.tracer.as_ref(),
        )?;

        let (slot, reply) = bounded(1);
        match lock(&self.shared.pending).as_mut() {
            Some(pending) => pending.insert(id, slot),
            None => return Err(ClientError::Disconnected),
        };

        trace!("[{id}] sending {}: {command:?}", C::ID);
        if let Err(err) = self.shared.write(&packet) {
            error!("[{id}] failed to write {}: {err}", C::ID);
            self.shared.close();
            return Err(err.into());
        }

        Ok(PendingReply {
            id,
            reply,
            shared: self.shared.clone(),
            _command: PhantomData,
        })
    }

    /// Sends the command and blocks until its reply arrives.
    pub fn send<C>(&self, command: C) -> Result<C::Output, ClientError>
    where
        C: Command + JdwpWritable + Debug,
        C::Output: JdwpReadable + Debug,
    {
        self.enqueue(&command)?.wait()
    }
}

impl Drop for JdwpClient {
    fn drop(&mut self) {
        self.shared.close();
        // only a socket shutdown is guaranteed to wake the reader up
        if self.shared.stream.is_some() {
            if let Some(reader) = self.reader.take() {
                let _ = reader.join();
            }
        }
    }
}

/// A command that was written and is waiting for its reply.
pub struct PendingReply<C: Command> {
    id: u32,
    reply: Receiver<Packet>,
    shared: Arc<Shared>,
    _command: PhantomData<fn() -> C>,
}

impl<C: Command> Debug for PendingReply<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingReply")
            .field("id", &self.id)
            .field("command", &C::ID)
            .finish()
    }
}

impl<C: Command> PendingReply<C> {
    /// The packet ID the command was sent with.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Blocks until the reply arrives or the connection is closed.
    ///
    /// A reply that cannot be decoded leaves the stream in an unknown state,
    /// so it closes the client.
    pub fn wait(self) -> Result<C::Output, ClientError>
    where
        C::Output: JdwpReadable + Debug,
    {
        let packet = self.reply.recv().map_err(|_| ClientError::Disconnected)?;
        let result = decode_reply::<C>(&packet, self.shared.id_sizes, self.shared.tracer.as_ref());
        match &result {
            Ok(output) => trace!("[{}] reply to {}: {output:?}", self.id, C::ID),
            Err(err @ ClientError::Decode { .. }) => {
                error!("[{}] {err}, closing the connection", self.id);
                self.shared.close();
            }
            Err(err) => debug!("[{}] {err}", self.id),
        }
        result
    }
}

/// Sends [IDSizes] and reads packets until its reply shows up.
///
/// Events that arrive first cannot be decoded yet, they are kept raw.
fn negotiate<R: Read>(
    id: u32,
    read: &mut R,
    write: &mut impl Write,
    config: &ClientConfig,
    early_events: &mut Vec<Packet>,
) -> Result<IDSizeInfo, ClientError> {
    // IDSizes has no fields, so the widths used to encode it do not matter
    let packet = Packet::command(id, &IDSizes, IDSizeInfo::default(), config.tracer.as_ref())?;
    trace!("[{id}] sending {}", IDSizes::ID);
    packet.write_to(write)?;

    loop {
        let Some(packet) = Packet::read_from(read, config.max_packet_length).map_err(read_error)?
        else {
            return Err(ClientError::Disconnected);
        };
        match packet.header.meta() {
            PacketMeta::Reply(_) if packet.header.id() == id => {
                let id_sizes = decode_reply::<IDSizes>(
                    &packet,
                    IDSizeInfo::default(),
                    config.tracer.as_ref(),
                )?;
                debug!("negotiated identifier sizes {id_sizes:?}");
                return Ok(id_sizes);
            }
            PacketMeta::Reply(_) => {
                return Err(ClientError::Framing(format!(
                    "reply to unknown request {}",
                    packet.header.id()
                )))
            }
            PacketMeta::Command(command) if command == Composite::ID => {
                debug!("[{}] event before the identifier sizes are known", packet.header.id());
                early_events.push(packet);
            }
            PacketMeta::Command(command) => {
                warn!("[{}] ignoring {command} sent by the target VM", packet.header.id());
            }
        }
    }
}

fn reader_loop<R: Read>(
    mut read: R,
    shared: &Shared,
    events: &Sender<Composite>,
    max_length: u32,
) {
    let result = loop {
        let packet = match Packet::read_from(&mut read, max_length) {
            Ok(Some(packet)) => packet,
            Ok(None) => break Ok(()),
            Err(err) => break Err(read_error(err)),
        };
        if let Err(err) = dispatch(packet, shared, events) {
            break Err(err);
        }
    };
    match result {
        Ok(()) => debug!("the target VM closed the connection"),
        Err(_) if shared.is_closed() => debug!("reader stopped after the client was closed"),
        Err(err) => error!("reader thread stopped: {err}"),
    }
    shared.close();
}

fn dispatch(packet: Packet, shared: &Shared, events: &Sender<Composite>) -> Result<(), ClientError> {
    let id = packet.header.id();
    match packet.header.meta() {
        PacketMeta::Reply(code) => {
            trace!("[{id}] received reply with code {code}, {} bytes", packet.body.len());
            let slot = lock(&shared.pending)
                .as_mut()
                .and_then(|pending| pending.remove(&id));
            match slot {
                Some(slot) => {
                    // the waiter may have dropped its handle, that is fine
                    let _ = slot.send(packet);
                    Ok(())
                }
                None => Err(ClientError::Framing(format!(
                    "reply to unknown request {id}"
                ))),
            }
        }
        PacketMeta::Command(command) if command == Composite::ID => {
            let composite = packet
                .decode_body::<Composite>(shared.id_sizes, shared.tracer.as_ref())
                .map_err(|source| ClientError::Decode { command, source })?;
            trace!("[{id}] received {composite:?}");
            // nobody listening for events is not an error
            let _ = events.send(composite);
            Ok(())
        }
        PacketMeta::Command(command) => {
            warn!("[{id}] ignoring {command} sent by the target VM");
            Ok(())
        }
    }
}
