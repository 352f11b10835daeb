use thiserror::Error;

/// Status codes reported by a [`RecordTransport`][crate::RecordTransport].
///
/// Success is not a variant; transports return `Ok(..)` for that. Any code the
/// transport produces outside the known set is carried verbatim in
/// [`TransportError::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("record transport internal error")]
    Internal,

    #[error("record transport would block")]
    WouldBlock,

    #[error("record protocol error")]
    Protocol,

    #[error("record negotiation error")]
    Negotiation,

    #[error("record connection closed abruptly")]
    ClosedAbort,

    #[error("record connection refused")]
    ConnectionRefused,

    #[error("record decryption failed")]
    DecryptionFail,

    #[error("bad record mac")]
    BadRecordMac,

    #[error("record overflow")]
    RecordOverflow,

    #[error("unexpected record")]
    UnexpectedRecord,

    #[error("unrecognized record transport code {0}")]
    Other(i32),
}

impl TransportError {
    /// Convert a raw transport status code to a result.
    ///
    /// `0` is success.
    pub fn check(code: i32) -> Result<(), TransportError> {
        if code == 0 {
            Ok(())
        } else {
            Err(Self::from_code(code))
        }
    }

    /// Convert a non-zero raw transport status code.
    pub fn from_code(code: i32) -> Self {
        use TransportError::*;
        match code {
            -10000 => Internal,
            -10001 => WouldBlock,
            -10002 => Protocol,
            -10003 => Negotiation,
            -10004 => ClosedAbort,
            -10005 => ConnectionRefused,
            -10006 => DecryptionFail,
            -10007 => BadRecordMac,
            -10008 => RecordOverflow,
            -10009 => UnexpectedRecord,
            _ => Other(code),
        }
    }

    /// The raw status code of this error.
    pub fn code(&self) -> i32 {
        use TransportError::*;
        match self {
            Internal => -10000,
            WouldBlock => -10001,
            Protocol => -10002,
            Negotiation => -10003,
            ClosedAbort => -10004,
            ConnectionRefused => -10005,
            DecryptionFail => -10006,
            BadRecordMac => -10007,
            RecordOverflow => -10008,
            UnexpectedRecord => -10009,
            Other(code) => *code,
        }
    }
}

/// Status codes surfaced to the handshake state machine.
///
/// One-to-one with [`TransportError`], except that unrecognized transport codes
/// pass through unchanged in [`SessionError::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("internal error")]
    Internal,

    #[error("operation would block")]
    WouldBlock,

    #[error("protocol error")]
    Protocol,

    #[error("negotiation error")]
    Negotiation,

    #[error("connection closed abruptly")]
    ClosedAbort,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("decryption failed")]
    DecryptionFail,

    #[error("bad record mac")]
    BadRecordMac,

    #[error("record overflow")]
    RecordOverflow,

    #[error("unexpected record")]
    UnexpectedRecord,

    #[error("unrecognized status code {0}")]
    Other(i32),
}

impl SessionError {
    /// Convert a raw session status code to a result.
    ///
    /// `0` is success.
    pub fn check(code: i32) -> Result<(), SessionError> {
        if code == 0 {
            Ok(())
        } else {
            Err(Self::from_code(code))
        }
    }

    /// Convert a non-zero raw session status code.
    pub fn from_code(code: i32) -> Self {
        use SessionError::*;
        match code {
            -9800 => Protocol,
            -9801 => Negotiation,
            -9803 => WouldBlock,
            -9806 => ClosedAbort,
            -9810 => Internal,
            -9844 => ConnectionRefused,
            -9845 => DecryptionFail,
            -9846 => BadRecordMac,
            -9847 => RecordOverflow,
            -9849 => UnexpectedRecord,
            _ => Other(code),
        }
    }

    /// The raw status code of this error.
    pub fn code(&self) -> i32 {
        use SessionError::*;
        match self {
            Protocol => -9800,
            Negotiation => -9801,
            WouldBlock => -9803,
            ClosedAbort => -9806,
            Internal => -9810,
            ConnectionRefused => -9844,
            DecryptionFail => -9845,
            BadRecordMac => -9846,
            RecordOverflow => -9847,
            UnexpectedRecord => -9849,
            Other(code) => *code,
        }
    }

    /// Whether the caller should poll or read again rather than tear down the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::WouldBlock | SessionError::UnexpectedRecord)
    }
}

/// Invalid values passed to [`ConfigBuilder`][crate::ConfigBuilder].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_fragment_len must be between 1 and 16384, got {0}")]
    FragmentLength(usize),

    #[error("max_queue_tx must be at least 1")]
    EmptyTransmitQueue,

    #[error("max_queue_rx must be at least 1")]
    EmptyReceiveQueue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_codes_are_stable() {
        assert_eq!(TransportError::Internal.code(), -10000);
        assert_eq!(TransportError::UnexpectedRecord.code(), -10009);
        assert_eq!(TransportError::from_code(-10007), TransportError::BadRecordMac);
        assert_eq!(TransportError::check(0), Ok(()));
        assert_eq!(TransportError::check(9999), Err(TransportError::Other(9999)));
    }

    #[test]
    fn transport_code_mapping_is_reversible() {
        for code in -10009..=-10000 {
            let err = TransportError::from_code(code);
            assert!(!matches!(err, TransportError::Other(_)), "{}", code);
            assert_eq!(err.code(), code);
        }
        assert_eq!(TransportError::from_code(-10010).code(), -10010);
    }

    #[test]
    fn session_codes_are_stable() {
        assert_eq!(SessionError::BadRecordMac.code(), -9846);
        assert_eq!(SessionError::from_code(-9849), SessionError::UnexpectedRecord);
        assert_eq!(SessionError::from_code(9999), SessionError::Other(9999));
        assert_eq!(SessionError::Other(9999).code(), 9999);
        assert_eq!(SessionError::check(0), Ok(()));
    }

    #[test]
    fn recoverable() {
        assert!(SessionError::WouldBlock.is_recoverable());
        assert!(SessionError::UnexpectedRecord.is_recoverable());
        assert!(!SessionError::BadRecordMac.is_recoverable());
        assert!(!SessionError::Other(1).is_recoverable());
    }
}
