#![no_main]

//! Fuzz target for record framing.
//!
//! Feeds arbitrary bytes through both record header parsers and through the
//! stream transport, which must either produce whole records or fail with a
//! transport error, never panic.

use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

use reclayer::transport::StreamTransport;
use reclayer::{Config, RecordHeader, RecordTransport, Variant};

struct ReadOnly(Cursor<Vec<u8>>);

impl Read for ReadOnly {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl Write for ReadOnly {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    for variant in [Variant::Stream, Variant::Datagram] {
        if let Ok((rest, header)) = RecordHeader::parse(data, variant) {
            assert_eq!(
                data.len() - rest.len(),
                RecordHeader::header_len(variant)
            );
            assert_eq!(header.variant(), variant);
        }
    }

    let mut transport = StreamTransport::new(
        Arc::new(Config::default()),
        ReadOnly(Cursor::new(data.to_vec())),
    );

    while let Ok(record) = transport.read() {
        assert!(record.payload.len() <= reclayer::MAX_FRAGMENT_LEN);
        transport.free(record);
    }
});
