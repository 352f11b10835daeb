//! Records and their wire headers.

use std::fmt;

use nom::number::complete::be_u16;
use nom::IResult;

use crate::buffer::Buf;
use crate::types::{ContentType, ProtocolVersion, Sequence, Variant};

/// One framed unit of protocol data.
///
/// Handed out by a transport on a successful read and given back through
/// [`RecordTransport::free`][crate::RecordTransport::free].
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Record {
    /// The content type of this record.
    pub content_type: ContentType,
    /// The record protocol version.
    pub version: ProtocolVersion,
    /// The (decrypted) payload.
    pub payload: Buf,
}

impl Record {
    pub fn new(
        content_type: ContentType,
        version: ProtocolVersion,
        payload: impl Into<Buf>,
    ) -> Self {
        Record {
            content_type,
            version,
            payload: payload.into(),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("content_type", &self.content_type)
            .field("version", &self.version)
            .field("len", &self.payload.len())
            .finish()
    }
}

/// Record header as it appears on the wire.
///
/// ```text
/// stream:   type(1) version(2) length(2)
/// datagram: type(1) version(2) epoch(2) sequence_number(6) length(2)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    /// Only present for datagram records.
    pub sequence: Option<Sequence>,
    pub length: u16,
}

impl RecordHeader {
    /// TLS record header length.
    pub const STREAM_LEN: usize = 5;

    /// DTLS record header length.
    pub const DATAGRAM_LEN: usize = 13;

    pub fn header_len(variant: Variant) -> usize {
        match variant {
            Variant::Stream => Self::STREAM_LEN,
            Variant::Datagram => Self::DATAGRAM_LEN,
        }
    }

    /// Parse a record header of the given variant.
    ///
    /// Only the header is consumed, the payload follows in the returned input.
    pub fn parse(input: &[u8], variant: Variant) -> IResult<&[u8], RecordHeader> {
        let (input, content_type) = ContentType::parse(input)?;
        let (input, version) = ProtocolVersion::parse(input)?;

        let (input, sequence) = match variant {
            Variant::Stream => (input, None),
            Variant::Datagram => {
                let (input, sequence) = Sequence::parse(input)?;
                (input, Some(sequence))
            }
        };

        let (input, length) = be_u16(input)?;

        Ok((
            input,
            RecordHeader {
                content_type,
                version,
                sequence,
                length,
            },
        ))
    }

    pub fn variant(&self) -> Variant {
        if self.sequence.is_some() {
            Variant::Datagram
        } else {
            Variant::Stream
        }
    }

    /// Serialize the header into the output buffer.
    pub fn serialize(&self, output: &mut Buf) {
        output.push(self.content_type.as_u8());
        self.version.serialize(output);
        if let Some(sequence) = &self.sequence {
            sequence.serialize(output);
        }
        output.extend_from_slice(&self.length.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATAGRAM: &[u8] = &[
        0x16, // ContentType::Handshake
        0xFE, 0xFD, // ProtocolVersion::DTLS1_2
        0x00, 0x01, // epoch
        0x00, 0x00, 0x00, 0x00, 0x00, 0x05, // sequence_number
        0x00, 0x03, // length
        0xAA, 0xBB, 0xCC,
    ];

    const STREAM: &[u8] = &[
        0x17, // ContentType::ApplicationData
        0x03, 0x03, // ProtocolVersion::TLS1_2
        0x00, 0x02, // length
        0x01, 0x02,
    ];

    #[test]
    fn datagram_header() {
        let (rest, header) = RecordHeader::parse(DATAGRAM, Variant::Datagram).unwrap();
        assert_eq!(rest, &[0xAA, 0xBB, 0xCC]);
        assert_eq!(header.content_type, ContentType::Handshake);
        assert_eq!(header.version, ProtocolVersion::DTLS1_2);
        assert_eq!(
            header.sequence,
            Some(Sequence {
                epoch: 1,
                sequence_number: 5
            })
        );
        assert_eq!(header.length, 3);
        assert_eq!(header.variant(), Variant::Datagram);

        let mut out = Buf::new();
        header.serialize(&mut out);
        assert_eq!(&*out, &DATAGRAM[..RecordHeader::DATAGRAM_LEN]);
    }

    #[test]
    fn stream_header() {
        let (rest, header) = RecordHeader::parse(STREAM, Variant::Stream).unwrap();
        assert_eq!(rest, &[0x01, 0x02]);
        assert_eq!(header.content_type, ContentType::ApplicationData);
        assert_eq!(header.version, ProtocolVersion::TLS1_2);
        assert_eq!(header.sequence, None);
        assert_eq!(header.length, 2);

        let mut out = Buf::new();
        header.serialize(&mut out);
        assert_eq!(&*out, &STREAM[..RecordHeader::STREAM_LEN]);
    }

    #[test]
    fn truncated_header() {
        assert!(RecordHeader::parse(&DATAGRAM[..12], Variant::Datagram).is_err());
        assert!(RecordHeader::parse(&STREAM[..4], Variant::Stream).is_err());
    }

    #[test]
    fn debug_hides_payload() {
        let r = Record::new(ContentType::Alert, ProtocolVersion::TLS1_0, vec![1, 2]);
        let s = format!("{:?}", r);
        assert!(s.contains("len: 2"));
    }
}
