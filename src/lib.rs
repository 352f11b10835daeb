//! reclayer is the record I/O layer between a TLS/DTLS handshake state machine
//! and a pluggable record transport.
//!
//! The transport ([`RecordTransport`]) frames and protects records. The
//! [`RecordLayer`] translates whatever the transport reports into a
//! [`SessionError`] and, on the read path, takes the corrective action the
//! failure calls for: nothing, a retransmission of the last flight, or a fatal
//! alert.
//!
//! ```
//! use std::sync::Arc;
//!
//! use reclayer::{AlertDispatcher, AlertKind, Config, FlightRetransmitter};
//! use reclayer::{RecordLayer, ScriptedTransport, SessionError, TransportError};
//!
//! #[derive(Default)]
//! struct Handshake {
//!     alerts: Vec<AlertKind>,
//! }
//!
//! impl AlertDispatcher for Handshake {
//!     fn send_fatal_alert(&mut self, kind: AlertKind) -> Result<(), SessionError> {
//!         self.alerts.push(kind);
//!         Ok(())
//!     }
//! }
//!
//! impl FlightRetransmitter for Handshake {
//!     fn retransmit_flight(&mut self) -> Result<(), SessionError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut transport = ScriptedTransport::new();
//! transport.push_read_error(TransportError::DecryptionFail);
//!
//! let mut layer = RecordLayer::new(Arc::new(Config::default()), transport);
//! let mut handshake = Handshake::default();
//!
//! assert_eq!(layer.read(&mut handshake), Err(SessionError::BadRecordMac));
//! assert_eq!(handshake.alerts, vec![AlertKind::BadRecordMac]);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

#[macro_use]
extern crate log;

mod buffer;
pub use buffer::{Buf, BufferPool};

mod config;
pub use config::{Config, ConfigBuilder, MAX_FRAGMENT_LEN};

mod diagnostics;
pub use diagnostics::{Diagnostic, Diagnostics, LogDiagnostics, Operation};

mod error;
pub use error::{ConfigError, SessionError, TransportError};

pub mod provider;

mod record;
pub use record::{Record, RecordHeader};

mod session;
pub use session::{read_action, AlertDispatcher, FlightRetransmitter, ReadAction, RecordLayer};

pub mod translate;

pub mod transport;
pub use transport::{RecordTransport, ScriptedTransport};

mod types;
pub use types::{AlertKind, ContentType, ProtocolVersion, Sequence, Variant};

mod util;
