//! The record layer adapter between the handshake state machine and a
//! [`RecordTransport`].
//!
//! Every transport status is translated exactly once here. On the read path a
//! failure additionally produces one corrective action: a fatal alert or a
//! retransmission of the last flight.
//!
//! * MAC and decryption failures are indistinguishable on a stream session.
//!   Both answer with a `bad_record_mac` alert, never `decryption_failed`.
//! * On a datagram session they never provoke an alert. They are treated as
//!   loss, the last flight is retransmitted, and the caller sees
//!   [`SessionError::UnexpectedRecord`] so it reads again.
//! * Writes and write queue service never escalate.

use std::sync::Arc;

use crate::diagnostics::{Diagnostic, Diagnostics, LogDiagnostics, Operation};
use crate::record::Record;
use crate::translate::translate;
use crate::transport::RecordTransport;
use crate::types::{AlertKind, Variant};
use crate::{Config, SessionError, TransportError};

/// Sends fatal alerts on behalf of the record layer.
pub trait AlertDispatcher {
    /// Send a fatal alert and move the session towards closure.
    fn send_fatal_alert(&mut self, kind: AlertKind) -> Result<(), SessionError>;
}

/// Resends the last outgoing handshake flight.
pub trait FlightRetransmitter {
    /// Resend the last flight. Pacing and backoff belong to the implementor.
    fn retransmit_flight(&mut self) -> Result<(), SessionError>;
}

/// Corrective action taken for a failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadAction {
    /// Send a fatal alert of this kind.
    Alert(AlertKind),
    /// Retransmit the last flight.
    Retransmit,
}

/// Decide what a failed read means for the session.
///
/// Returns the error to surface to the caller together with the action to
/// take. Only [`SessionError::WouldBlock`] yields no action.
pub fn read_action(error: SessionError, variant: Variant) -> (SessionError, Option<ReadAction>) {
    use SessionError::*;

    match error {
        WouldBlock => (WouldBlock, None),

        UnexpectedRecord => (UnexpectedRecord, Some(ReadAction::Retransmit)),

        DecryptionFail | BadRecordMac => match variant {
            // Reading again is the retry; WouldBlock is reserved for I/O status.
            Variant::Datagram => (UnexpectedRecord, Some(ReadAction::Retransmit)),
            Variant::Stream => (BadRecordMac, Some(ReadAction::Alert(AlertKind::BadRecordMac))),
        },

        Internal => (Internal, Some(ReadAction::Alert(AlertKind::InternalError))),

        RecordOverflow => (
            RecordOverflow,
            Some(ReadAction::Alert(AlertKind::RecordOverflow)),
        ),

        ClosedAbort | ConnectionRefused | Protocol | Negotiation | Other(_) => {
            (error, Some(ReadAction::Alert(AlertKind::CloseNotify)))
        }
    }
}

/// Record I/O for one session.
///
/// Driven by one thread of control at a time. Records returned from
/// [`RecordLayer::read`] are given back with [`RecordLayer::free`].
pub struct RecordLayer<T, D = LogDiagnostics> {
    config: Arc<Config>,
    transport: T,
    diagnostics: D,
}

impl<T: RecordTransport> RecordLayer<T> {
    /// Create a record layer reporting diagnostics to the `log` facade.
    pub fn new(config: Arc<Config>, transport: T) -> Self {
        Self::with_diagnostics(config, transport, LogDiagnostics)
    }
}

impl<T: RecordTransport, D: Diagnostics> RecordLayer<T, D> {
    pub fn with_diagnostics(config: Arc<Config>, transport: T, diagnostics: D) -> Self {
        RecordLayer {
            config,
            transport,
            diagnostics,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.config.variant()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (T, D) {
        (self.transport, self.diagnostics)
    }

    /// Read the next record.
    ///
    /// On failure, at most one of the session's alert or retransmission hooks
    /// is invoked before the translated error is returned.
    pub fn read<S>(&mut self, session: &mut S) -> Result<Record, SessionError>
    where
        S: AlertDispatcher + FlightRetransmitter,
    {
        let error = match self.transport.read() {
            Ok(record) => {
                trace!(
                    "Read {:?} record, {} bytes",
                    record.content_type,
                    record.payload.len()
                );
                return Ok(record);
            }
            Err(e) => self.translate(Operation::Read, e),
        };

        let (error, action) = read_action(error, self.variant());

        match action {
            None => {}
            Some(ReadAction::Retransmit) => {
                debug!("Read failed ({}), retransmitting flight", error);
                if let Err(e) = session.retransmit_flight() {
                    self.diagnostics.report(Diagnostic::RetransmitFailed(e));
                }
            }
            Some(ReadAction::Alert(kind)) => {
                debug!("Read failed ({}), sending {} alert", error, kind);
                if let Err(e) = session.send_fatal_alert(kind) {
                    self.diagnostics
                        .report(Diagnostic::AlertFailed { kind, error: e });
                }
            }
        }

        Err(error)
    }

    /// Queue a record for sending.
    ///
    /// Failures are reported to diagnostics and returned unchanged. The
    /// caller decides whether to escalate.
    pub fn write(&mut self, record: &Record) -> Result<(), SessionError> {
        if let Err(e) = self.transport.write(record) {
            let error = self.translate(Operation::Write, e);
            self.diagnostics.report(Diagnostic::WriteFailed(error));
            return Err(error);
        }
        Ok(())
    }

    /// Give back a record returned by [`RecordLayer::read`].
    pub fn free(&mut self, record: Record) {
        self.transport.free(record);
    }

    /// Flush queued outgoing records.
    ///
    /// Never escalates; a blocked queue is ordinary backpressure.
    pub fn service_write_queue(&mut self) -> Result<(), SessionError> {
        self.transport
            .service_write_queue()
            .map_err(|e| self.translate(Operation::ServiceWriteQueue, e))
    }

    fn translate(&mut self, operation: Operation, error: TransportError) -> SessionError {
        let translated = translate(error);
        if let SessionError::Other(code) = translated {
            self.diagnostics
                .report(Diagnostic::UnrecognizedCode { operation, code });
        }
        translated
    }
}
