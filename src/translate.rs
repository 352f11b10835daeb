//! Mapping of record transport status codes to session status codes.

use crate::{SessionError, TransportError};

/// Translate a transport error into the session error surfaced to the handshake.
///
/// Known codes map one-to-one, including a known code carried in
/// [`TransportError::Other`]. Unrecognized codes pass through unchanged in
/// [`SessionError::Other`]; callers report those to their diagnostics sink.
pub fn translate(error: TransportError) -> SessionError {
    match error {
        TransportError::Internal => SessionError::Internal,
        TransportError::WouldBlock => SessionError::WouldBlock,
        TransportError::Protocol => SessionError::Protocol,
        TransportError::Negotiation => SessionError::Negotiation,
        TransportError::ClosedAbort => SessionError::ClosedAbort,
        TransportError::ConnectionRefused => SessionError::ConnectionRefused,
        TransportError::DecryptionFail => SessionError::DecryptionFail,
        TransportError::BadRecordMac => SessionError::BadRecordMac,
        TransportError::RecordOverflow => SessionError::RecordOverflow,
        TransportError::UnexpectedRecord => SessionError::UnexpectedRecord,
        TransportError::Other(code) => match TransportError::from_code(code) {
            TransportError::Other(code) => SessionError::Other(code),
            known => translate(known),
        },
    }
}

/// Translate a transport result, leaving the success value untouched.
pub fn translate_result<T>(result: Result<T, TransportError>) -> Result<T, SessionError> {
    result.map_err(translate)
}

/// Translate a raw transport status code into a raw session status code.
///
/// `0` is success in both code spaces.
pub fn translate_code(code: i32) -> i32 {
    match TransportError::check(code) {
        Ok(()) => 0,
        Err(e) => translate(e).code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_by_name() {
        let pairs = [
            (TransportError::Internal, SessionError::Internal),
            (TransportError::WouldBlock, SessionError::WouldBlock),
            (TransportError::Protocol, SessionError::Protocol),
            (TransportError::Negotiation, SessionError::Negotiation),
            (TransportError::ClosedAbort, SessionError::ClosedAbort),
            (TransportError::ConnectionRefused, SessionError::ConnectionRefused),
            (TransportError::DecryptionFail, SessionError::DecryptionFail),
            (TransportError::BadRecordMac, SessionError::BadRecordMac),
            (TransportError::RecordOverflow, SessionError::RecordOverflow),
            (TransportError::UnexpectedRecord, SessionError::UnexpectedRecord),
        ];

        for (from, to) in pairs {
            assert_eq!(translate(from), to);
        }
    }

    #[test]
    fn unknown_code_passes_through() {
        assert_eq!(translate(TransportError::Other(9999)), SessionError::Other(9999));
        assert_eq!(translate_code(9999), 9999);
        assert_eq!(translate_code(-42), -42);
    }

    #[test]
    fn known_code_in_other_is_normalized() {
        assert_eq!(
            translate(TransportError::Other(TransportError::BadRecordMac.code())),
            SessionError::BadRecordMac
        );
        assert_eq!(translate(TransportError::Other(-10001)), SessionError::WouldBlock);
    }

    #[test]
    fn raw_codes() {
        assert_eq!(translate_code(0), 0);
        assert_eq!(translate_code(-10007), -9846);
        assert_eq!(translate_code(-10001), -9803);
    }

    #[test]
    fn success_is_untouched() {
        assert_eq!(translate_result::<u8>(Ok(7)), Ok(7));
        assert_eq!(
            translate_result::<u8>(Err(TransportError::RecordOverflow)),
            Err(SessionError::RecordOverflow)
        );
    }
}
