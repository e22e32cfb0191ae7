//! An incremental, push-style HTTP/1.x message parser.
//!
//! The parser owns no buffer and performs no I/O: a host reads bytes
//! from a socket (or a file, or a test fixture) however it likes and
//! hands them to [`Parser::feed`] one chunk at a time. As the grammar
//! recognizes a piece of the message — the method, the request
//! target, a header name, a header value, body content — it calls
//! back into a [`Callbacks`] implementation with a slice borrowed
//! directly from the chunk just fed in. Nothing is copied, nothing is
//! allocated, and nothing outlives the callback that receives it.
//!
//! This crate does not decode percent-escapes, does not interpret
//! charsets, does not store headers for you, and does not speak TLS
//! or manage connections — all of that is the host's job. What it
//! guarantees is the grammar and the framing decision (`Content-Length`
//! vs `Transfer-Encoding: chunked` vs neither), byte-exact and
//! resumable across arbitrarily small chunks.
//!
//! ```
//! use wirecore::{Callbacks, Mode, Parser};
//!
//! struct Printer;
//! impl Callbacks for Printer {
//!     fn on_header_name(&mut self, _parser: &Parser, data: &[u8]) {
//!         print!("{}: ", String::from_utf8_lossy(data));
//!     }
//!     fn on_header_value(&mut self, _parser: &Parser, data: &[u8]) {
//!         println!("{}", String::from_utf8_lossy(data));
//!     }
//! }
//!
//! let mut parser = Parser::new(Mode::Request);
//! parser
//!     .feed(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n", &mut Printer)
//!     .unwrap();
//! ```

mod callbacks;
mod error;
mod header_trie;
mod parser;
mod tables;
mod value_subrecognizers;

pub use callbacks::{Callbacks, Control, NoopCallbacks};
pub use error::ParseError;
pub use parser::{FeedOutcome, MessageKind, Mode, Parser};

/// Crate version as `(major, minor, patch)`.
pub fn version() -> (u8, u8, u8) {
    (0, 1, 0)
}
