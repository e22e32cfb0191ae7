//! Token-list scanners for the two framing-relevant tokens that can
//! appear inside a comma-separated header value: `close` (inside
//! `Connection`) and `chunked` (inside `Transfer-Encoding`).
//!
//! Both are small `(state, byte) -> state` step functions scanning the
//! `Connection` and `Transfer-Encoding` list grammar (RFC 9110 §7.6.1,
//! RFC 9112 §6.1). Each sub-recognizer keeps its state as a plain `u8`
//! via the named constants below rather than a Rust `enum`, because
//! the two detectors are driven by the same `Parser::hvstate` slot and
//! are never active at the same time — the active one is determined
//! by which state the main machine is in.

/// States of the `close` token detector.
pub(crate) mod close {
    pub(crate) const NOSTATE: u8 = 0;
    pub(crate) const WAIT: u8 = 1;
    pub(crate) const C: u8 = 2;
    pub(crate) const CL: u8 = 3;
    pub(crate) const CLO: u8 = 4;
    pub(crate) const CLOS: u8 = 5;
    pub(crate) const CLOSE: u8 = 6;
    pub(crate) const CONFIRMED: u8 = 7;

    /// Advance the `close` detector by one byte (or by the CR that
    /// terminates the header value, folded in by the caller so a
    /// trailing `close` at end-of-value can still reach
    /// [`CONFIRMED`]).
    pub(crate) fn step(state: u8, c: u8) -> u8 {
        match state {
            NOSTATE => {
                if c == b'C' || c == b'c' {
                    C
                } else if c == b',' || c == b' ' || c == b'\t' {
                    NOSTATE
                } else {
                    WAIT
                }
            }
            WAIT => {
                if c == b',' {
                    NOSTATE
                } else {
                    WAIT
                }
            }
            C => {
                if c == b'L' || c == b'l' {
                    CL
                } else {
                    WAIT
                }
            }
            CL => {
                if c == b'O' || c == b'o' {
                    CLO
                } else {
                    WAIT
                }
            }
            CLO => {
                if c == b'S' || c == b's' {
                    CLOS
                } else {
                    WAIT
                }
            }
            CLOS => {
                if c == b'E' || c == b'e' {
                    CLOSE
                } else {
                    WAIT
                }
            }
            CLOSE => {
                // Word boundary: SP, HTAB, CR, or comma.
                if c == b' ' || c == b'\t' || c == b'\r' || c == b',' {
                    CONFIRMED
                } else {
                    WAIT
                }
            }
            CONFIRMED => CONFIRMED,
            _ => WAIT,
        }
    }
}

/// States of the `chunked` token detector. Must be the *last*
/// transfer-coding in the list: a comma observed after a confirmed
/// `chunked` moves to [`ILLEGAL`], which is sticky.
pub(crate) mod chunked {
    pub(crate) const WAIT: u8 = 0;
    pub(crate) const TRIM: u8 = 1;
    pub(crate) const NOSTATE: u8 = 2;
    pub(crate) const C: u8 = 3;
    pub(crate) const CH: u8 = 4;
    pub(crate) const CHU: u8 = 5;
    pub(crate) const CHUN: u8 = 6;
    pub(crate) const CHUNK: u8 = 7;
    pub(crate) const CHUNKE: u8 = 8;
    pub(crate) const CHUNKED: u8 = 9;
    pub(crate) const CONFIRMED: u8 = 10;
    pub(crate) const ILLEGAL: u8 = 11;

    pub(crate) fn step(state: u8, c: u8) -> u8 {
        if state == ILLEGAL {
            return ILLEGAL;
        }
        if state == CONFIRMED {
            return CONFIRMED;
        }

        match state {
            WAIT => {
                if c == b',' {
                    TRIM
                } else {
                    WAIT
                }
            }
            TRIM => {
                if c == b' ' || c == b'\t' {
                    TRIM
                } else if c == b'C' || c == b'c' {
                    C
                } else {
                    WAIT
                }
            }
            NOSTATE => {
                if c == b'C' || c == b'c' {
                    C
                } else {
                    WAIT
                }
            }
            C => {
                if c == b'H' || c == b'h' {
                    CH
                } else {
                    WAIT
                }
            }
            CH => {
                if c == b'U' || c == b'u' {
                    CHU
                } else {
                    WAIT
                }
            }
            CHU => {
                if c == b'N' || c == b'n' {
                    CHUN
                } else {
                    WAIT
                }
            }
            CHUN => {
                if c == b'K' || c == b'k' {
                    CHUNK
                } else {
                    WAIT
                }
            }
            CHUNK => {
                if c == b'E' || c == b'e' {
                    CHUNKE
                } else {
                    WAIT
                }
            }
            CHUNKE => {
                if c == b'D' || c == b'd' {
                    CHUNKED
                } else {
                    WAIT
                }
            }
            CHUNKED => {
                if c == b' ' || c == b'\t' {
                    CHUNKED
                } else if c == b'\r' {
                    CONFIRMED
                } else if c == b',' {
                    ILLEGAL
                } else {
                    WAIT
                }
            }
            _ => WAIT,
        }
    }
}
