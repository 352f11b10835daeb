use std::collections::VecDeque;
use std::io;
use std::net::UdpSocket;
use std::sync::Arc;

use super::{io_error, RecordTransport};
use crate::buffer::{Buf, BufferPool};
use crate::record::{Record, RecordHeader};
use crate::types::{Sequence, Variant};
use crate::{Config, TransportError};

/// Largest UDP payload.
const MAX_DATAGRAM: usize = 65_535;

/// A connected datagram socket.
pub trait DatagramSocket {
    /// Receive one datagram into `buf`, returning its length.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Send `buf` as one datagram.
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;
}

impl DatagramSocket for UdpSocket {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        UdpSocket::recv(self, buf)
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        UdpSocket::send(self, buf)
    }
}

impl<S: DatagramSocket + ?Sized> DatagramSocket for &mut S {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).recv(buf)
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).send(buf)
    }
}

/// Null-cipher DTLS record framing over a datagram socket.
///
/// A datagram may carry several records. They are buffered and handed out
/// one per read. Malformed datagrams are treated as loss and reported as
/// [`TransportError::UnexpectedRecord`].
pub struct DatagramTransport<S> {
    config: Arc<Config>,

    socket: S,

    /// Pool of buffers
    buffers_free: BufferPool,

    /// Receive buffer, allocated on first read.
    datagram: Vec<u8>,

    /// Records parsed from received datagrams, not yet read.
    queue_rx: VecDeque<Record>,

    /// Outgoing datagrams.
    queue_tx: VecDeque<Buf>,

    /// Counters for sending records.
    next_sequence_tx: Sequence,
}

impl<S: DatagramSocket> DatagramTransport<S> {
    pub fn new(config: Arc<Config>, socket: S) -> Self {
        DatagramTransport {
            config,
            socket,
            buffers_free: BufferPool::default(),
            datagram: Vec::new(),
            queue_rx: VecDeque::new(),
            queue_tx: VecDeque::new(),
            next_sequence_tx: Sequence::new(0),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.socket
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.socket
    }

    /// Number of datagrams waiting to be sent.
    pub fn pending_tx(&self) -> usize {
        self.queue_tx.len()
    }

    /// Sequence the next written record will carry.
    pub fn next_sequence(&self) -> Sequence {
        self.next_sequence_tx
    }

    fn recv(&mut self) -> Result<usize, TransportError> {
        if self.datagram.len() < MAX_DATAGRAM {
            self.datagram.resize(MAX_DATAGRAM, 0);
        }
        loop {
            match self.socket.recv(&mut self.datagram) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(&e)),
            }
        }
    }

    /// Split a received datagram into records.
    fn parse_datagram(&mut self, len: usize) -> Result<(), TransportError> {
        let mut input = &self.datagram[..len];

        while !input.is_empty() {
            let (rest, header) = match RecordHeader::parse(input, Variant::Datagram) {
                Ok(v) => v,
                Err(_) => {
                    debug!("Dropping {} bytes of malformed datagram", input.len());
                    break;
                }
            };

            if !header.version.is_datagram() {
                debug!("Dropping datagram with record version: {}", header.version);
                break;
            }

            let length = header.length as usize;
            if length > self.config.max_fragment_len() {
                debug!("Record length {} exceeds max fragment length", length);
                // Records already queued from this datagram are delivered first.
                if self.queue_rx.is_empty() {
                    return Err(TransportError::RecordOverflow);
                }
                break;
            }

            if rest.len() < length {
                debug!("Dropping truncated record: {} < {}", rest.len(), length);
                break;
            }
            let (fragment, rest) = rest.split_at(length);
            input = rest;

            if !header.content_type.is_known() {
                debug!("Dropping record with content type: {:?}", header.content_type);
                continue;
            }

            if self.queue_rx.len() >= self.config.max_queue_rx() {
                debug!("Receive queue full, dropping remaining records");
                break;
            }

            let mut payload = self.buffers_free.pop();
            payload.extend_from_slice(fragment);

            trace!(
                "Received {:?} record {:?}, {} bytes",
                header.content_type,
                header.sequence,
                length
            );

            self.queue_rx.push_back(Record {
                content_type: header.content_type,
                version: header.version,
                payload,
            });
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        while let Some(front) = self.queue_tx.front() {
            match self.socket.send(front) {
                Ok(_) => {
                    if let Some(sent) = self.queue_tx.pop_front() {
                        self.buffers_free.push(sent);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(&e)),
            }
        }
        Ok(())
    }
}

impl<S: DatagramSocket> RecordTransport for DatagramTransport<S> {
    fn read(&mut self) -> Result<Record, TransportError> {
        if let Some(record) = self.queue_rx.pop_front() {
            return Ok(record);
        }

        let len = self.recv()?;
        self.parse_datagram(len)?;

        // Nothing usable in the datagram, as if it was lost.
        self.queue_rx
            .pop_front()
            .ok_or(TransportError::UnexpectedRecord)
    }

    fn write(&mut self, record: &Record) -> Result<(), TransportError> {
        if record.payload.len() > self.config.max_fragment_len() {
            return Err(TransportError::RecordOverflow);
        }

        if record.version.variant() != Some(Variant::Datagram) {
            debug!("Refusing to frame {} record on a datagram", record.version);
            return Err(TransportError::Protocol);
        }

        if self.next_sequence_tx.sequence_number > Sequence::MAX_SEQUENCE_NUMBER {
            warn!("Sequence number exhausted in epoch {}", self.next_sequence_tx.epoch);
            return Err(TransportError::Internal);
        }

        if self.queue_tx.len() >= self.config.max_queue_tx() {
            self.flush()?;
        }

        let header = RecordHeader {
            content_type: record.content_type,
            version: record.version,
            sequence: Some(self.next_sequence_tx),
            length: record.payload.len() as u16,
        };

        let mut datagram = self.buffers_free.pop();
        header.serialize(&mut datagram);
        datagram.extend_from_slice(&record.payload);
        self.queue_tx.push_back(datagram);

        self.next_sequence_tx.sequence_number += 1;

        match self.flush() {
            Ok(()) | Err(TransportError::WouldBlock) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn free(&mut self, record: Record) {
        self.buffers_free.push(record.payload);
    }

    fn service_write_queue(&mut self) -> Result<(), TransportError> {
        self.flush()
    }
}
