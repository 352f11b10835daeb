//! Scripted transport for exercising the record layer without I/O.

use std::collections::VecDeque;

use super::RecordTransport;
use crate::record::Record;
use crate::TransportError;

/// Transport that replays scripted results.
///
/// An exhausted read script reads as [`TransportError::WouldBlock`]. Exhausted
/// write and queue scripts succeed.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    reads: VecDeque<Result<Record, TransportError>>,
    writes: VecDeque<Result<(), TransportError>>,
    queue: VecDeque<Result<(), TransportError>>,
    written: Vec<Record>,
    freed: Vec<Record>,
    outstanding: usize,
    service_calls: usize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful read.
    pub fn push_record(&mut self, record: Record) -> &mut Self {
        self.reads.push_back(Ok(record));
        self
    }

    /// Queue a failed read.
    pub fn push_read_error(&mut self, error: TransportError) -> &mut Self {
        self.reads.push_back(Err(error));
        self
    }

    /// Queue a failed read from a raw transport status code.
    ///
    /// `0` is not an error and is ignored.
    pub fn push_read_code(&mut self, code: i32) -> &mut Self {
        if let Err(e) = TransportError::check(code) {
            self.reads.push_back(Err(e));
        }
        self
    }

    /// Queue the result of the next write.
    pub fn push_write_result(&mut self, result: Result<(), TransportError>) -> &mut Self {
        self.writes.push_back(result);
        self
    }

    /// Queue the result of the next write queue service.
    pub fn push_queue_result(&mut self, result: Result<(), TransportError>) -> &mut Self {
        self.queue.push_back(result);
        self
    }

    /// Records passed to successful writes, in order.
    pub fn written(&self) -> &[Record] {
        &self.written
    }

    /// Records given back through free, in order.
    pub fn freed(&self) -> &[Record] {
        &self.freed
    }

    /// Records read but not yet freed.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn service_calls(&self) -> usize {
        self.service_calls
    }
}

impl RecordTransport for ScriptedTransport {
    fn read(&mut self) -> Result<Record, TransportError> {
        let record = self.reads.pop_front().unwrap_or(Err(TransportError::WouldBlock))?;
        self.outstanding += 1;
        Ok(record)
    }

    fn write(&mut self, record: &Record) -> Result<(), TransportError> {
        self.writes.pop_front().unwrap_or(Ok(()))?;
        self.written.push(record.clone());
        Ok(())
    }

    fn free(&mut self, record: Record) {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.freed.push(record);
    }

    fn service_write_queue(&mut self) -> Result<(), TransportError> {
        self.service_calls += 1;
        self.queue.pop_front().unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentType, ProtocolVersion};

    #[test]
    fn replays_script_then_blocks() {
        let mut t = ScriptedTransport::new();
        let r = Record::new(ContentType::Handshake, ProtocolVersion::TLS1_2, vec![1]);
        t.push_record(r.clone()).push_read_code(-10007).push_read_code(0);

        assert_eq!(t.read(), Ok(r));
        assert_eq!(t.outstanding(), 1);
        assert_eq!(t.read(), Err(TransportError::BadRecordMac));
        assert_eq!(t.read(), Err(TransportError::WouldBlock));
    }

    #[test]
    fn tracks_writes_and_frees() {
        let mut t = ScriptedTransport::new();
        t.push_write_result(Err(TransportError::WouldBlock));

        let r = Record::new(ContentType::ApplicationData, ProtocolVersion::TLS1_2, vec![9]);
        assert_eq!(t.write(&r), Err(TransportError::WouldBlock));
        assert_eq!(t.write(&r), Ok(()));
        assert_eq!(t.written().len(), 1);

        t.push_record(r.clone());
        let read = t.read().unwrap();
        t.free(read);
        assert_eq!(t.outstanding(), 0);
        assert_eq!(t.freed(), &[r]);
    }
}
