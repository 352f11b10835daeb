//! The record transport capability and its backends.
//!
//! A transport turns bytes into [`Record`]s and back. It owns framing and,
//! once negotiated, the record protection. The [`RecordLayer`][crate::RecordLayer]
//! sits on top and decides what a transport failure means for the session.

use crate::record::Record;
use crate::TransportError;

mod datagram;
mod scripted;
mod stream;

pub use datagram::{DatagramSocket, DatagramTransport};
pub use scripted::ScriptedTransport;
pub use stream::StreamTransport;

/// Record transport capability.
///
/// Operations may block or return [`TransportError::WouldBlock`] depending on
/// how the underlying I/O is configured.
pub trait RecordTransport {
    /// Read and unprotect the next record.
    ///
    /// Never yields a partially filled record. The returned record must be
    /// handed back through [`RecordTransport::free`].
    fn read(&mut self) -> Result<Record, TransportError>;

    /// Protect, frame and queue a record for sending.
    fn write(&mut self, record: &Record) -> Result<(), TransportError>;

    /// Give back a record returned by [`RecordTransport::read`].
    fn free(&mut self, record: Record);

    /// Flush queued outgoing bytes. Succeeds immediately when nothing is queued.
    fn service_write_queue(&mut self) -> Result<(), TransportError>;
}

impl<T: RecordTransport + ?Sized> RecordTransport for Box<T> {
    fn read(&mut self) -> Result<Record, TransportError> {
        (**self).read()
    }

    fn write(&mut self, record: &Record) -> Result<(), TransportError> {
        (**self).write(record)
    }

    fn free(&mut self, record: Record) {
        (**self).free(record)
    }

    fn service_write_queue(&mut self) -> Result<(), TransportError> {
        (**self).service_write_queue()
    }
}

/// Map an I/O error from the byte transport to a transport status.
pub(crate) fn io_error(e: &std::io::Error) -> TransportError {
    use std::io::ErrorKind::*;
    match e.kind() {
        WouldBlock | TimedOut => TransportError::WouldBlock,
        ConnectionRefused => TransportError::ConnectionRefused,
        ConnectionReset | ConnectionAborted | BrokenPipe | UnexpectedEof | NotConnected => {
            TransportError::ClosedAbort
        }
        _ => TransportError::Internal,
    }
}
