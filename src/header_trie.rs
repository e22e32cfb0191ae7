//! Deterministic trie over the five framing-relevant header names:
//! `Connection`, `Content-Length`, `Host`, `Transfer-Encoding`,
//! `Upgrade`.
//!
//! `trie_step(state, byte)` is a `(state, byte) -> state` transition
//! table over the field-name token grammar (RFC 9110 §5.1), expressed
//! as tagged-variant transitions rather than a literal
//! `[[u8; 256]; N]` table. Matching is ASCII case-insensitive;
//! the hyphen in `Content-Length` / `Transfer-Encoding` is literal.
//! Reaching [`HnState::Ignore`] means the accumulating name is no
//! longer a candidate for any recognized header — the main state
//! machine stops consulting the trie for the remainder of that name
//! but keeps accumulating it byte-for-byte for the `on_header_name`
//! emission.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HnState {
    Ignore,
    NoState,

    C,
    Co,
    Con,
    Conn,
    Conne,
    Connec,
    Connect,
    Connecti,
    Connectio,
    Connection,

    Cont,
    Conte,
    Conten,
    Content,
    ContentDash,
    ContentL,
    ContentLe,
    ContentLen,
    ContentLeng,
    ContentLengt,
    ContentLength,

    H,
    Ho,
    Hos,
    Host,

    T,
    Tr,
    Tra,
    Tran,
    Trans,
    Transf,
    Transfe,
    Transfer,
    TransferDash,
    TransferE,
    TransferEn,
    TransferEnc,
    TransferEnco,
    TransferEncod,
    TransferEncodi,
    TransferEncodin,
    TransferEncoding,

    U,
    Up,
    Upg,
    Upgr,
    Upgra,
    Upgrad,
    Upgrade,
}

/// Advance the header-name trie by one byte. Returns
/// [`HnState::Ignore`] once `state`/`byte` can no longer lead to any
/// recognized terminal name.
pub(crate) fn trie_step(state: HnState, byte: u8) -> HnState {
    use HnState::*;

    let c = byte.to_ascii_uppercase();
    match (state, c) {
        (NoState, b'C') => C,
        (NoState, b'H') => H,
        (NoState, b'T') => T,
        (NoState, b'U') => U,

        (C, b'O') => Co,
        (Co, b'N') => Con,
        (Con, b'N') => Conn,
        (Con, b'T') => Cont,
        (Conn, b'E') => Conne,
        (Conne, b'C') => Connec,
        (Connec, b'T') => Connect,
        (Connect, b'I') => Connecti,
        (Connecti, b'O') => Connectio,
        (Connectio, b'N') => Connection,

        (Cont, b'E') => Conte,
        (Conte, b'N') => Conten,
        (Conten, b'T') => Content,
        (Content, b'-') => ContentDash,
        (ContentDash, b'L') => ContentL,
        (ContentL, b'E') => ContentLe,
        (ContentLe, b'N') => ContentLen,
        (ContentLen, b'G') => ContentLeng,
        (ContentLeng, b'T') => ContentLengt,
        (ContentLengt, b'H') => ContentLength,

        (H, b'O') => Ho,
        (Ho, b'S') => Hos,
        (Hos, b'T') => Host,

        (T, b'R') => Tr,
        (Tr, b'A') => Tra,
        (Tra, b'N') => Tran,
        (Tran, b'S') => Trans,
        (Trans, b'F') => Transf,
        (Transf, b'E') => Transfe,
        (Transfe, b'R') => Transfer,
        (Transfer, b'-') => TransferDash,
        (TransferDash, b'E') => TransferE,
        (TransferE, b'N') => TransferEn,
        (TransferEn, b'C') => TransferEnc,
        (TransferEnc, b'O') => TransferEnco,
        (TransferEnco, b'D') => TransferEncod,
        (TransferEncod, b'I') => TransferEncodi,
        (TransferEncodi, b'N') => TransferEncodin,
        (TransferEncodin, b'G') => TransferEncoding,

        (U, b'P') => Up,
        (Up, b'G') => Upg,
        (Upg, b'R') => Upgr,
        (Upgr, b'A') => Upgra,
        (Upgra, b'D') => Upgrad,
        (Upgrad, b'E') => Upgrade,

        _ => Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(name: &[u8]) -> HnState {
        let mut state = HnState::NoState;
        for &b in name {
            state = trie_step(state, b);
            if state == HnState::Ignore {
                return HnState::Ignore;
            }
        }
        state
    }

    #[test]
    fn recognizes_all_five_terminal_names_case_insensitively() {
        assert_eq!(walk(b"Connection"), HnState::Connection);
        assert_eq!(walk(b"CONNECTION"), HnState::Connection);
        assert_eq!(walk(b"connection"), HnState::Connection);
        assert_eq!(walk(b"Content-Length"), HnState::ContentLength);
        assert_eq!(walk(b"content-length"), HnState::ContentLength);
        assert_eq!(walk(b"Host"), HnState::Host);
        assert_eq!(walk(b"HOST"), HnState::Host);
        assert_eq!(walk(b"Transfer-Encoding"), HnState::TransferEncoding);
        assert_eq!(walk(b"Upgrade"), HnState::Upgrade);
    }

    #[test]
    fn hyphen_is_literal_not_case_folded() {
        assert_eq!(walk(b"Content_Length"), HnState::Ignore);
    }

    #[test]
    fn non_candidate_names_drop_to_ignore() {
        assert_eq!(walk(b"X-Custom"), HnState::Ignore);
        assert_eq!(walk(b"Accept"), HnState::Ignore);
        assert_eq!(walk(b"Cookie"), HnState::Ignore);
    }

    #[test]
    fn prefix_of_a_recognized_name_is_not_yet_ignored() {
        let mut state = HnState::NoState;
        for &b in b"Conn" {
            state = trie_step(state, b);
        }
        assert_ne!(state, HnState::Ignore);
        assert_eq!(state, HnState::Conn);
    }
}
