use std::fmt;

/// Errors the parser can raise while walking the grammar.
///
/// Every variant corresponds to a distinct way a message can violate
/// RFC 9112's message grammar or framing rules (RFC 9112 §2.1, §6.1,
/// §6.3). All are fatal to the current message: the parser's
/// state becomes meaningless until [`crate::Parser::reset`] is called.
/// Partial emissions made before the error remain valid — the host saw
/// real bytes, it just won't see the rest of this message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A byte was encountered that the current grammar state does not
    /// accept.
    Grammar {
        /// Name of the state machine state that rejected the byte.
        state: &'static str,
        /// The offending byte.
        byte: u8,
    },
    /// Both `Content-Length` (non-zero) and `Transfer-Encoding:
    /// chunked` were observed on the same message.
    FramingAmbiguity,
    /// A transfer-coding followed `chunked` in a `Transfer-Encoding`
    /// list (`chunked` must be the last coding).
    IllegalTransferEncodingOrder,
    /// A chunk-size line had no hex digit before its terminating CR,
    /// or a non-hex, non-CR byte followed the digits.
    BadChunkLength,
    /// The response status line violated a digit constraint: the
    /// first status digit was `0`, or a version digit was not a
    /// decimal digit.
    StatusLineConstraintViolation {
        /// The offending byte.
        byte: u8,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grammar { state, byte } => {
                write!(f, "grammar violation in state {state}: byte 0x{byte:02X}")
            }
            Self::FramingAmbiguity => {
                write!(
                    f,
                    "ambiguous framing: both Content-Length and Transfer-Encoding: chunked present"
                )
            }
            Self::IllegalTransferEncodingOrder => {
                write!(f, "'chunked' must be the last transfer-coding")
            }
            Self::BadChunkLength => write!(f, "invalid chunk-size line"),
            Self::StatusLineConstraintViolation { byte } => {
                write!(f, "status-line constraint violated at byte 0x{byte:02X}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
