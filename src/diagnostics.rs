//! Diagnostics reported by the record layer.
//!
//! The record layer never writes to a global error log directly. Every
//! noteworthy condition goes through a [`Diagnostics`] sink injected at
//! construction. [`LogDiagnostics`] forwards to the `log` facade.

use crate::types::AlertKind;
use crate::SessionError;

/// The record layer operation a diagnostic originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    ServiceWriteQueue,
}

/// A condition worth recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// The transport returned a code outside the known set.
    UnrecognizedCode { operation: Operation, code: i32 },
    /// A record write did not succeed.
    WriteFailed(SessionError),
    /// Sending a fatal alert failed. The read error is still returned.
    AlertFailed { kind: AlertKind, error: SessionError },
    /// Retransmitting the last flight failed. The read error is still returned.
    RetransmitFailed(SessionError),
}

/// Sink for record layer diagnostics.
pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Diagnostics sink writing to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::UnrecognizedCode { operation, code } => {
                warn!("Unknown error code returned from {:?}: {}", operation, code);
            }
            Diagnostic::WriteFailed(error) => {
                warn!("Record write failed: {} ({})", error, error.code());
            }
            Diagnostic::AlertFailed { kind, error } => {
                warn!("Failed to send {} alert: {}", kind, error);
            }
            Diagnostic::RetransmitFailed(error) => {
                warn!("Failed to retransmit flight: {}", error);
            }
        }
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for Box<D> {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}
