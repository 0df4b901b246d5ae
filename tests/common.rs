#![allow(dead_code)]

use std::{
    error::Error,
    fmt::Write as _,
    io,
    net::{TcpListener, TcpStream},
};

use jdwp::{
    codec::{JdwpReadable, JdwpReader, JdwpWritable, JdwpWriter},
    spec::{virtual_machine::IDSizeInfo, Packet},
};

pub type Result<T = ()> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

pub fn encode(value: &impl JdwpWritable, id_sizes: IDSizeInfo) -> io::Result<Vec<u8>> {
    let mut writer = JdwpWriter::new(Vec::new(), id_sizes);
    value.write(&mut writer)?;
    Ok(writer.into_inner())
}

pub fn decode<T: JdwpReadable>(bytes: &[u8], id_sizes: IDSizeInfo) -> io::Result<T> {
    let mut reader = JdwpReader::new(bytes, id_sizes);
    let value = T::read(&mut reader)?;
    let left = reader.into_inner().len();
    if left > 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{left} bytes left unread"),
        ));
    }
    Ok(value)
}

/// Encodes with 8 byte identifiers and decodes the result back.
pub fn round_trip<T>(value: &T) -> Result<T>
where
    T: JdwpReadable + JdwpWritable,
{
    let sizes = IDSizeInfo::default();
    Ok(decode(&encode(value, sizes)?, sizes)?)
}

/// Space separated hex, four bytes per group, for inline snapshots.
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (i, chunk) in bytes.chunks(4).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        for b in chunk {
            let _ = write!(out, "{b:02x}");
        }
    }
    out
}

/// The target VM side of a loopback TCP connection.
#[derive(Debug)]
pub struct MockVm {
    stream: TcpStream,
    pub id_sizes: IDSizeInfo,
}

impl MockVm {
    pub fn read_packet(&mut self) -> Result<Packet> {
        let packet = Packet::read_from(&mut self.stream, u32::MAX)?;
        Ok(packet.ok_or("the client closed the connection")?)
    }

    pub fn send(&mut self, packet: &Packet) -> Result {
        packet.write_to(&mut self.stream)?;
        Ok(())
    }

    pub fn reply(&mut self, id: u32, reply: &impl JdwpWritable) -> Result {
        let packet = Packet::reply(id, reply, self.id_sizes)?;
        self.send(&packet)
    }

    pub fn close(self) {
        let _ = self.stream.shutdown(std::net::Shutdown::Both);
    }
}

/// A connected pair: the stream for the client and the target VM end.
pub fn loopback() -> Result<(TcpStream, MockVm)> {
    init_logging();

    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let client = TcpStream::connect(listener.local_addr()?)?;
    let (server, _) = listener.accept()?;
    log::info!("mock VM listening on {}", listener.local_addr()?);

    Ok((
        client,
        MockVm {
            stream: server,
            id_sizes: IDSizeInfo::default(),
        },
    ))
}
