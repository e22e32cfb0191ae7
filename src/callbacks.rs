use crate::parser::Parser;

/// Control code a "done" callback hands back to the state machine.
///
/// `Continue` proceeds normally. `Return` asks the parser to stop
/// *now* at a clean seam (the host wants to do something — switch
/// buffers, yield to another task — and will call [`Parser::feed`]
/// again later). `Error` is any other non-continue request: the
/// parser halts and reports a paused outcome distinct from `Return`,
/// since no seam offset is computed for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    /// Keep parsing.
    #[default]
    Continue,
    /// Stop now; the host will resume with a later `feed` call.
    Return,
    /// Stop now, non-`Return` reason (treated as "paused" by `feed`).
    Error,
}

/// The callback table the parser drives as it recognizes message
/// pieces.
///
/// Emission callbacks (`on_method`, `on_request_uri`, `on_header_name`,
/// `on_header_value`, `on_content`) are infallible and receive a slice
/// that borrows directly from the buffer passed to [`Parser::feed`] —
/// it is only valid for the duration of the call. "Done" callbacks
/// additionally return a [`Control`] code.
///
/// All methods have a no-op default so an implementor only overrides
/// the callbacks it cares about. [`NoopCallbacks`] is the concrete
/// all-defaults implementation.
#[allow(unused_variables)]
pub trait Callbacks {
    /// Called with a (possibly partial) slice of the request method.
    fn on_method(&mut self, parser: &Parser, data: &[u8]) {}
    /// Called once the full method has been recognized (SP observed).
    fn on_method_done(&mut self, parser: &mut Parser) -> Control {
        Control::Continue
    }

    /// Called with a (possibly partial) slice of the request-target.
    fn on_request_uri(&mut self, parser: &Parser, data: &[u8]) {}
    /// Called once the full request-target has been recognized.
    fn on_request_uri_done(&mut self, parser: &mut Parser) -> Control {
        Control::Continue
    }

    /// Called once the start line (request or response) is fully
    /// parsed, including its terminating CRLF.
    fn on_status_line_done(&mut self, parser: &mut Parser) -> Control {
        Control::Continue
    }

    /// Called with a (possibly partial) slice of a header field name.
    fn on_header_name(&mut self, parser: &Parser, data: &[u8]) {}
    /// Called once a header name is fully recognized (`:` observed).
    fn on_header_name_done(&mut self, parser: &mut Parser) -> Control {
        Control::Continue
    }

    /// Called with a (possibly partial) slice of a header field value.
    fn on_header_value(&mut self, parser: &Parser, data: &[u8]) {}
    /// Called once a header value is fully recognized (CR observed).
    fn on_header_value_done(&mut self, parser: &mut Parser) -> Control {
        Control::Continue
    }

    /// Called once the header block's terminating empty line has been
    /// consumed and body framing has been decided.
    fn on_headers_done(&mut self, parser: &mut Parser) -> Control {
        Control::Continue
    }

    /// Called with a slice of raw entity-body bytes (de-chunked, in
    /// the chunked-transfer-encoding case).
    fn on_content(&mut self, parser: &Parser, data: &[u8]) {}

    /// Called once the message is fully parsed.
    fn on_parser_done(&mut self, parser: &mut Parser) -> Control {
        Control::Continue
    }

    /// Called when a parse error is about to be returned from `feed`.
    /// Carries no further information beyond the parser handle; the
    /// error kind itself is the `Result::Err` value `feed` returns.
    fn on_error(&mut self, parser: &Parser) {}
}

/// A [`Callbacks`] implementation with every method left at its
/// default (no-op / `Control::Continue`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl Callbacks for NoopCallbacks {}
