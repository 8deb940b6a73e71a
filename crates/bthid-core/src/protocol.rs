//! Binary framing between capture adapters and the broker daemon.
//!
//! Wire format:
//! ```text
//! [version:1][frame_type:1][payload_len:1][payload:N]
//! ```
//! Header size: 3 bytes. The payload is the finished HID report, byte for
//! byte; the broker never inspects or rewrites it, so `payload_len` is always
//! the fixed report length for the frame type.

use thiserror::Error;

use crate::report::{KeyboardReport, MouseReport, KEYBOARD_REPORT_LEN, MOUSE_REPORT_LEN};

/// Current wire protocol version.
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Size of the frame header in bytes.
pub const HEADER_SIZE: usize = 3;

/// Frame type discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FrameType {
    /// Carries a completed keyboard report.
    SendKeys = 0x01,
    /// Carries a completed mouse report.
    SendMouse = 0x02,
}

impl TryFrom<u8> for FrameType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0x01 => Ok(FrameType::SendKeys),
            0x02 => Ok(FrameType::SendMouse),
            other => Err(other),
        }
    }
}

/// A decoded report frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFrame {
    Keys(KeyboardReport),
    Mouse(MouseReport),
}

impl ReportFrame {
    /// The frame type byte for this report.
    pub fn frame_type(&self) -> FrameType {
        match self {
            ReportFrame::Keys(_) => FrameType::SendKeys,
            ReportFrame::Mouse(_) => FrameType::SendMouse,
        }
    }

    /// The raw report bytes, ready for the interrupt channel.
    pub fn report_bytes(&self) -> &[u8] {
        match self {
            ReportFrame::Keys(report) => report,
            ReportFrame::Mouse(report) => report,
        }
    }
}

/// Errors that can occur during frame encoding or decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the length the header requires.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The frame type byte in the header is not a recognized value.
    #[error("unknown frame type: 0x{0:02X}")]
    UnknownFrameType(u8),

    /// The protocol version in the header is not supported.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// The declared payload length does not match the fixed report length
    /// for the frame type.
    #[error("payload length mismatch: header says {declared}, expected {expected}")]
    PayloadLengthMismatch { declared: usize, expected: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`ReportFrame`] into a byte vector including the 3-byte header.
pub fn encode_frame(frame: &ReportFrame) -> Vec<u8> {
    let payload = frame.report_bytes();
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.push(PROTOCOL_VERSION);
    buf.push(frame.frame_type() as u8);
    buf.push(payload.len() as u8);
    buf.extend_from_slice(payload);
    buf
}

/// Decodes one [`ReportFrame`] from the beginning of `bytes`.
///
/// Returns the decoded frame and the total number of bytes consumed
/// (header + payload), so the caller can advance their read cursor.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the bytes are malformed.
pub fn decode_frame(bytes: &[u8]) -> Result<(ReportFrame, usize), ProtocolError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ProtocolError::InsufficientData {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let version = bytes[0];
    if version != PROTOCOL_VERSION {
        return Err(ProtocolError::UnsupportedVersion(version));
    }

    let frame_type = FrameType::try_from(bytes[1])
        .map_err(ProtocolError::UnknownFrameType)?;
    let declared = usize::from(bytes[2]);

    let expected = match frame_type {
        FrameType::SendKeys => KEYBOARD_REPORT_LEN,
        FrameType::SendMouse => MOUSE_REPORT_LEN,
    };
    if declared != expected {
        return Err(ProtocolError::PayloadLengthMismatch { declared, expected });
    }

    let total = HEADER_SIZE + expected;
    if bytes.len() < total {
        return Err(ProtocolError::InsufficientData {
            needed: total,
            available: bytes.len(),
        });
    }

    let payload = &bytes[HEADER_SIZE..total];
    let frame = match frame_type {
        FrameType::SendKeys => {
            let mut report = [0u8; KEYBOARD_REPORT_LEN];
            report.copy_from_slice(payload);
            ReportFrame::Keys(report)
        }
        FrameType::SendMouse => {
            let mut report = [0u8; MOUSE_REPORT_LEN];
            report.copy_from_slice(payload);
            ReportFrame::Mouse(report)
        }
    };

    Ok((frame, total))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keys_frame_layout() {
        let report = [0xA1, 0x01, 0x02, 0x00, 0x04, 0, 0, 0, 0, 0];
        let bytes = encode_frame(&ReportFrame::Keys(report));
        assert_eq!(bytes[0], PROTOCOL_VERSION);
        assert_eq!(bytes[1], 0x01);
        assert_eq!(bytes[2], 10);
        assert_eq!(&bytes[3..], &report);
    }

    #[test]
    fn test_decode_returns_frame_and_consumed_length() {
        let report = [0xA1, 0x02, 0x01, 5, 0xFB, 0];
        let bytes = encode_frame(&ReportFrame::Mouse(report));

        let (frame, consumed) = decode_frame(&bytes).unwrap();

        assert_eq!(frame, ReportFrame::Mouse(report));
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_decode_consumes_only_one_frame_from_a_stream() {
        let first = encode_frame(&ReportFrame::Mouse([0xA1, 0x02, 0, 1, 0, 0]));
        let second = encode_frame(&ReportFrame::Keys([0xA1, 0x01, 0, 0, 4, 0, 0, 0, 0, 0]));
        let mut stream = first.clone();
        stream.extend_from_slice(&second);

        let (frame_a, n) = decode_frame(&stream).unwrap();
        let (frame_b, m) = decode_frame(&stream[n..]).unwrap();

        assert_eq!(n, first.len());
        assert_eq!(n + m, stream.len());
        assert!(matches!(frame_a, ReportFrame::Mouse(_)));
        assert!(matches!(frame_b, ReportFrame::Keys(_)));
    }

    #[test]
    fn test_decode_short_header() {
        let err = decode_frame(&[PROTOCOL_VERSION, 0x01]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InsufficientData {
                needed: HEADER_SIZE,
                available: 2
            }
        );
    }

    #[test]
    fn test_decode_truncated_payload() {
        let mut bytes = encode_frame(&ReportFrame::Keys([0xA1, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]));
        bytes.truncate(7);
        let err = decode_frame(&bytes).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InsufficientData {
                needed: 13,
                available: 7
            }
        );
    }

    #[test]
    fn test_decode_unknown_frame_type() {
        let err = decode_frame(&[PROTOCOL_VERSION, 0x7F, 6]).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownFrameType(0x7F));
    }

    #[test]
    fn test_decode_unsupported_version() {
        let err = decode_frame(&[0x02, 0x01, 10]).unwrap_err();
        assert_eq!(err, ProtocolError::UnsupportedVersion(0x02));
    }

    #[test]
    fn test_decode_wrong_payload_length_for_type() {
        let err = decode_frame(&[PROTOCOL_VERSION, 0x02, 10, 0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::PayloadLengthMismatch {
                declared: 10,
                expected: 6
            }
        );
    }
}
