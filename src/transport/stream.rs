use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::Arc;

use super::{io_error, RecordTransport};
use crate::buffer::{Buf, BufferPool};
use crate::record::{Record, RecordHeader};
use crate::types::Variant;
use crate::{Config, TransportError};

const READ_CHUNK: usize = 4096;

/// Null-cipher TLS record framing over a byte stream.
///
/// Incoming bytes accumulate until a full record is available, so a
/// would-block in the middle of a record loses nothing. Outgoing records are
/// framed into a write queue that drains as far as the stream allows.
pub struct StreamTransport<S> {
    config: Arc<Config>,

    stream: S,

    /// Pool of buffers
    buffers_free: BufferPool,

    /// Bytes read from the stream that do not yet form a complete record.
    rx: Buf,

    /// Framed records waiting to be written.
    queue_tx: VecDeque<Buf>,

    /// Bytes of the front queue entry already written.
    tx_offset: usize,
}

impl<S: Read + Write> StreamTransport<S> {
    pub fn new(config: Arc<Config>, stream: S) -> Self {
        StreamTransport {
            config,
            stream,
            buffers_free: BufferPool::default(),
            rx: Buf::new(),
            queue_tx: VecDeque::new(),
            tx_offset: 0,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Number of framed records not yet fully written.
    pub fn pending_tx(&self) -> usize {
        self.queue_tx.len()
    }

    fn take_record(&mut self) -> Result<Option<Record>, TransportError> {
        if self.rx.len() < RecordHeader::STREAM_LEN {
            return Ok(None);
        }

        let header = match RecordHeader::parse(&self.rx, Variant::Stream) {
            Ok((_, header)) => header,
            Err(_) => return Err(TransportError::Internal),
        };

        if !header.content_type.is_known() {
            debug!("Unknown content type: {:?}", header.content_type);
            return Err(TransportError::Protocol);
        }

        if header.version.variant() != Some(Variant::Stream) {
            debug!("Unexpected record version: {}", header.version);
            return Err(TransportError::Protocol);
        }

        let length = header.length as usize;
        if length > self.config.max_fragment_len() {
            debug!("Record length {} exceeds max fragment length", length);
            return Err(TransportError::RecordOverflow);
        }

        let end = RecordHeader::STREAM_LEN + length;
        if self.rx.len() < end {
            return Ok(None);
        }

        let mut payload = self.buffers_free.pop();
        payload.extend_from_slice(&self.rx[RecordHeader::STREAM_LEN..end]);
        self.rx.consume(end);

        trace!("Read {:?} record, {} bytes", header.content_type, length);

        Ok(Some(Record {
            content_type: header.content_type,
            version: header.version,
            payload,
        }))
    }

    fn fill(&mut self) -> Result<(), TransportError> {
        let mut chunk = [0_u8; READ_CHUNK];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    debug!("Stream closed with {} buffered bytes", self.rx.len());
                    return Err(TransportError::ClosedAbort);
                }
                Ok(n) => {
                    self.rx.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(&e)),
            }
        }
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        while let Some(front) = self.queue_tx.front() {
            match self.stream.write(&front[self.tx_offset..]) {
                Ok(0) => return Err(TransportError::ClosedAbort),
                Ok(n) => {
                    self.tx_offset += n;
                    if self.tx_offset == front.len() {
                        self.tx_offset = 0;
                        if let Some(done) = self.queue_tx.pop_front() {
                            self.buffers_free.push(done);
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(&e)),
            }
        }

        self.stream.flush().map_err(|e| io_error(&e))
    }
}

impl<S: Read + Write> RecordTransport for StreamTransport<S> {
    fn read(&mut self) -> Result<Record, TransportError> {
        loop {
            if let Some(record) = self.take_record()? {
                return Ok(record);
            }
            self.fill()?;
        }
    }

    fn write(&mut self, record: &Record) -> Result<(), TransportError> {
        if record.payload.len() > self.config.max_fragment_len() {
            return Err(TransportError::RecordOverflow);
        }

        if record.version.variant() != Some(Variant::Stream) {
            debug!("Refusing to frame {} record on a stream", record.version);
            return Err(TransportError::Protocol);
        }

        if self.queue_tx.len() >= self.config.max_queue_tx() {
            self.flush()?;
        }

        let header = RecordHeader {
            content_type: record.content_type,
            version: record.version,
            sequence: None,
            length: record.payload.len() as u16,
        };

        let mut framed = self.buffers_free.pop();
        header.serialize(&mut framed);
        framed.extend_from_slice(&record.payload);
        self.queue_tx.push_back(framed);

        trace!("Queued {:?} record, {} bytes", record.content_type, record.payload.len());

        // The record is queued, a blocked flush is finished by service_write_queue.
        match self.flush() {
            Ok(()) | Err(TransportError::WouldBlock) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn free(&mut self, record: Record) {
        self.buffers_free.push(record.payload);
    }

    fn service_write_queue(&mut self) -> Result<(), TransportError> {
        if self.queue_tx.is_empty() {
            return Ok(());
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentType, ProtocolVersion};
    use std::io::Cursor;

    /// In-memory duplex: reads from `input`, writes to `output`.
    #[derive(Default)]
    struct Duplex {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
        blocked: bool,
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.blocked {
                return Err(io::ErrorKind::WouldBlock.into());
            }
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn transport(input: Vec<u8>) -> StreamTransport<Duplex> {
        let duplex = Duplex {
            input: Cursor::new(input),
            ..Default::default()
        };
        StreamTransport::new(Arc::new(Config::default()), duplex)
    }

    #[test]
    fn reads_records_back_to_back() {
        let mut t = transport(vec![
            0x16, 0x03, 0x01, 0x00, 0x01, 0xAA, // handshake
            0x17, 0x03, 0x03, 0x00, 0x02, 0x01, 0x02, // application data
        ]);

        let r = t.read().unwrap();
        assert_eq!(r.content_type, ContentType::Handshake);
        assert_eq!(r.version, ProtocolVersion::TLS1_0);
        assert_eq!(&*r.payload, &[0xAA]);
        t.free(r);

        let r = t.read().unwrap();
        assert_eq!(r.content_type, ContentType::ApplicationData);
        assert_eq!(&*r.payload, &[1, 2]);

        assert_eq!(t.read(), Err(TransportError::ClosedAbort));
    }

    #[test]
    fn rejects_foreign_records() {
        let mut t = transport(vec![0x63, 0x03, 0x03, 0x00, 0x00]);
        assert_eq!(t.read(), Err(TransportError::Protocol));

        let mut t = transport(vec![0x16, 0xFE, 0xFD, 0x00, 0x00]);
        assert_eq!(t.read(), Err(TransportError::Protocol));

        let mut t = transport(vec![0x17, 0x03, 0x03, 0x40, 0x01]);
        assert_eq!(t.read(), Err(TransportError::RecordOverflow));
    }

    #[test]
    fn frames_writes() {
        let mut t = transport(vec![]);
        let r = Record::new(ContentType::Alert, ProtocolVersion::TLS1_2, vec![2, 20]);
        t.write(&r).unwrap();
        assert_eq!(t.pending_tx(), 0);
        assert_eq!(
            t.get_ref().output,
            vec![0x15, 0x03, 0x03, 0x00, 0x02, 0x02, 0x14]
        );
        assert_eq!(t.service_write_queue(), Ok(()));
    }

    #[test]
    fn oversized_write() {
        let config = Config::builder().max_fragment_len(4).build().unwrap();
        let mut t = StreamTransport::new(Arc::new(config), Duplex::default());
        let r = Record::new(ContentType::ApplicationData, ProtocolVersion::TLS1_2, vec![0; 5]);
        assert_eq!(t.write(&r), Err(TransportError::RecordOverflow));
        assert!(t.get_ref().output.is_empty());
    }

    #[test]
    fn full_queue_would_block() {
        let config = Config::builder().max_queue_tx(1).build().unwrap();
        let duplex = Duplex {
            blocked: true,
            ..Default::default()
        };
        let mut t = StreamTransport::new(Arc::new(config), duplex);
        let r = Record::new(ContentType::ApplicationData, ProtocolVersion::TLS1_2, vec![1]);

        assert_eq!(t.write(&r), Ok(()));
        assert_eq!(t.pending_tx(), 1);
        assert_eq!(t.write(&r), Err(TransportError::WouldBlock));
        assert_eq!(t.pending_tx(), 1);

        t.get_mut().blocked = false;
        assert_eq!(t.write(&r), Ok(()));
        assert_eq!(t.pending_tx(), 0);
        assert_eq!(t.get_ref().output.len(), 12);
    }

    #[test]
    fn refuses_datagram_version() {
        let mut t = transport(vec![]);
        let r = Record::new(ContentType::Handshake, ProtocolVersion::DTLS1_2, vec![1]);

        assert_eq!(t.write(&r), Err(TransportError::Protocol));
        assert_eq!(t.pending_tx(), 0);
        assert!(t.get_ref().output.is_empty());
    }
}
