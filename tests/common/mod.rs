//! Shared helpers for record layer integration tests.

#![allow(unused)]

use std::sync::Arc;

use reclayer::{AlertDispatcher, AlertKind, Config, ContentType, Diagnostic, Diagnostics};
use reclayer::{FlightRetransmitter, ProtocolVersion, Record, RecordLayer, ScriptedTransport};
use reclayer::{SessionError, Variant};

/// Handshake stand-in that records every escalation.
#[derive(Default, Debug)]
pub struct Handshake {
    pub alerts: Vec<AlertKind>,
    pub retransmits: usize,
    /// Returned from every alert send when set.
    pub alert_error: Option<SessionError>,
    /// Returned from every retransmission when set.
    pub retransmit_error: Option<SessionError>,
}

impl Handshake {
    pub fn side_effects(&self) -> usize {
        self.alerts.len() + self.retransmits
    }
}

impl AlertDispatcher for Handshake {
    fn send_fatal_alert(&mut self, kind: AlertKind) -> Result<(), SessionError> {
        self.alerts.push(kind);
        match self.alert_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl FlightRetransmitter for Handshake {
    fn retransmit_flight(&mut self) -> Result<(), SessionError> {
        self.retransmits += 1;
        match self.retransmit_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Diagnostics sink keeping every report.
#[derive(Default, Debug)]
pub struct Collected(pub Vec<Diagnostic>);

impl Diagnostics for Collected {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }
}

impl Collected {
    pub fn unrecognized(&self) -> usize {
        self.0
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnrecognizedCode { .. }))
            .count()
    }
}

pub fn config(variant: Variant) -> Arc<Config> {
    Arc::new(Config::builder().variant(variant).build().unwrap())
}

pub fn layer(
    variant: Variant,
    transport: ScriptedTransport,
) -> RecordLayer<ScriptedTransport, Collected> {
    let _ = env_logger::try_init();
    RecordLayer::with_diagnostics(config(variant), transport, Collected::default())
}

pub fn app_data(payload: &[u8]) -> Record {
    Record::new(
        ContentType::ApplicationData,
        ProtocolVersion::TLS1_2,
        payload.to_vec(),
    )
}

pub const VARIANTS: [Variant; 2] = [Variant::Stream, Variant::Datagram];
