use crate::callbacks::{Callbacks, Control};
use crate::error::ParseError;
use crate::header_trie::{self, HnState};
use crate::tables::{is_hex_char, is_token, is_uri_char, is_vchar};
use crate::value_subrecognizers::{chunked, close};

// ---------------------------------------------------------------------------
// Mode / message kind
// ---------------------------------------------------------------------------

/// What kind of message a [`Parser`] recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Parse an HTTP request (start line is `METHOD SP target SP
    /// HTTP-version CRLF`).
    Request,
    /// Parse an HTTP response (start line is `HTTP-version SP status
    /// SP reason-phrase CRLF`).
    Response,
    /// Resolve request-vs-response from the first bytes fed. Useful
    /// for a host that multiplexes both directions over the same
    /// code path (a proxy, a replay tool).
    Detect,
}

/// Once a [`Mode::Detect`] parser has seen enough bytes to tell, this
/// records which kind of message it committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

// ---------------------------------------------------------------------------
// Outcome of a feed() call
// ---------------------------------------------------------------------------

/// Outcome of a [`Parser::feed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The entire chunk was consumed; no terminal event occurred. Feed
    /// more bytes to continue.
    Consumed,
    /// The parser reached the end of the message. `n` is the number
    /// of bytes left unconsumed at the tail of this chunk (e.g. the
    /// start of a pipelined second message).
    Done(usize),
    /// A "done" callback returned [`Control::Return`]. `n` is the
    /// number of bytes remaining in this chunk from the byte that
    /// triggered the callback onward — the host's seam point.
    Returned(usize),
    /// A "done" callback returned [`Control::Error`] (a non-`Return`,
    /// non-`Continue` request to stop). The parser halted; no seam
    /// offset is computed, mirroring the original's bare sentinel.
    Paused,
}

// ---------------------------------------------------------------------------
// Main state machine states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    // ---- DETECT-mode disambiguation ----
    NoState,
    UndH,
    UndHt,
    UndHtt,
    UndHttp,

    // ---- Request line ----
    RequestRequired,
    MethodChar,

    RequestUri,
    RequestUriChar,
    RequestUriAsterisk,
    RequestUri1stHex,
    RequestUri2ndHex,

    RequestRequireVersion,
    RequestH,
    RequestHt,
    RequestHtt,
    RequestHttp,
    RequestHttpMajorV,
    RequestHttpDot,
    RequestHttpMinorV,
    RequestEol,
    RequestCrlf,

    // ---- Response status line ----
    ResponseRequired,
    ResponseH,
    ResponseHt,
    ResponseHtt,
    ResponseHttp,
    ResponseHttpMajorV,
    ResponseHttpDot,
    ResponseHttpMinorV,
    StatusRequired,
    Status1st,
    Status2nd,
    Status3rd,
    ResponseReason,
    ResponseEol,

    // ---- Headers ----
    HeaderName,
    HeaderNameChar,
    HeaderNameCharCheck,

    HeaderValue,
    HeaderValueChar,

    HeaderValueLfClose,
    HeaderValueLfChunked,
    HeaderValueLfChunkedChar,

    HeaderValueContentLength,
    HeaderValueEndTrim,

    HeaderEol,
    HeaderCrlf,

    // ---- End of headers ----
    HeaderEoh,

    // ---- Body ----
    BodyContentLength,

    BodyChunked,
    BodyChunklen,
    BodyChunklenCrlf,

    BodyChunk,
    BodyChunkCr,
    BodyChunkCrlf,

    BodyChunkedEos,

    End,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// An incremental, zero-copy, zero-allocation HTTP/1.x message
/// parser.
///
/// `Parser` itself never buffers input. Each [`feed`](Parser::feed)
/// call hands it a byte slice; as recognizable pieces are bounded
/// within *that* slice, it calls back into a [`Callbacks`]
/// implementation with borrowed sub-slices. Bytes that straddle two
/// `feed` calls are reported twice: a partial emission covering the
/// tail of the first chunk, then a normal (non-partial) emission once
/// the delimiter arrives in a later chunk — concatenating them is the
/// host's job, not the parser's.
///
/// # Example
///
/// ```
/// use wirecore::{Callbacks, Control, Mode, Parser};
///
/// #[derive(Default)]
/// struct Collector {
///     method: Vec<u8>,
/// }
///
/// impl Callbacks for Collector {
///     fn on_method(&mut self, _parser: &Parser, data: &[u8]) {
///         self.method.extend_from_slice(data);
///     }
/// }
///
/// let mut parser = Parser::new(Mode::Request);
/// let mut cb = Collector::default();
/// parser
///     .feed(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n", &mut cb)
///     .unwrap();
/// assert_eq!(cb.method, b"GET");
/// ```
pub struct Parser {
    mode: Mode,
    state: State,

    // Chunk-local cursors; meaningless between `feed` calls.
    mark: usize,
    p: usize,
    end: usize,

    major_version: u8,
    minor_version: u8,
    status_code: u16,
    request_type: Option<MessageKind>,

    content_length: u64,
    has_content: bool,
    is_chunked: bool,
    is_upgrade: bool,
    should_close: bool,
    have_host_header: bool,

    hnstate: HnState,
    /// Shared slot for whichever value sub-recognizer (`close` or
    /// `chunked`) is currently active. See
    /// `src/value_subrecognizers.rs` for why this is a raw `u8`
    /// instead of two separate typed fields.
    hvstate: u8,
}

impl Parser {
    /// Create a new parser for `mode`. In [`Mode::Detect`], the
    /// initial state is `NoState` (undetermined) rather than either
    /// request- or response-specific required state.
    pub fn new(mode: Mode) -> Self {
        log::debug!("initializing parser in {mode:?} mode");
        Self {
            mode,
            state: Self::initial_state(mode),
            mark: 0,
            p: 0,
            end: 0,
            major_version: 0,
            minor_version: 0,
            status_code: 0,
            request_type: None,
            content_length: 0,
            has_content: false,
            is_chunked: false,
            is_upgrade: false,
            should_close: false,
            have_host_header: false,
            hnstate: HnState::NoState,
            hvstate: 0,
        }
    }

    fn initial_state(mode: Mode) -> State {
        match mode {
            Mode::Request => State::RequestRequired,
            Mode::Response => State::ResponseRequired,
            Mode::Detect => State::NoState,
        }
    }

    /// Reset the parser to its initial state, preserving [`Mode`].
    /// Equivalent to re-running [`Parser::new`] with the same mode.
    pub fn reset(&mut self) {
        log::debug!("resetting parser ({:?} mode)", self.mode);
        *self = Self::new(self.mode);
    }

    // ----- accessors used by callback implementations -----------------

    /// The mode this parser was constructed with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The major HTTP version digit, once the start line has been
    /// parsed.
    pub fn major_version(&self) -> u8 {
        self.major_version
    }

    /// The minor HTTP version digit, once the start line has been
    /// parsed.
    pub fn minor_version(&self) -> u8 {
        self.minor_version
    }

    /// The 3-digit status code (responses only).
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Which kind of message this turned out to be. Always `Some` once
    /// the start line has begun; only meaningfully delayed in
    /// [`Mode::Detect`].
    pub fn request_type(&self) -> Option<MessageKind> {
        self.request_type
    }

    /// The `Content-Length` value, if framing resolved to a
    /// fixed-length body (or the partial value accumulated so far,
    /// mid-header).
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// `true` once framing is unambiguous and a body is expected.
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// `true` if `Transfer-Encoding: chunked` was confirmed.
    pub fn is_chunked(&self) -> bool {
        self.is_chunked
    }

    /// `true` if an `Upgrade` header was observed.
    pub fn is_upgrade(&self) -> bool {
        self.is_upgrade
    }

    /// `true` if `Connection: close` (or a list containing `close`)
    /// was observed.
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// `true` if a `Host` header was observed.
    pub fn have_host_header(&self) -> bool {
        self.have_host_header
    }

    /// `true` once the parser has reached the terminal state and will
    /// not consume any further bytes until [`Parser::reset`].
    pub fn is_done(&self) -> bool {
        self.state == State::End
    }

    // ----- the feed loop ------------------------------------------------

    /// Feed a chunk of bytes into the parser, driving [`Callbacks`] as
    /// message pieces are recognized.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on any grammar violation or framing
    /// error. The parser's internal state is undefined
    /// afterwards until [`Parser::reset`] is called; any callbacks
    /// already invoked (including partial emissions) remain valid.
    pub fn feed<C: Callbacks>(
        &mut self,
        data: &[u8],
        callbacks: &mut C,
    ) -> Result<FeedOutcome, ParseError> {
        self.mark = 0;
        self.p = 0;
        self.end = data.len();
        log::trace!("feed: {} bytes, state={:?}", data.len(), self.state);

        loop {
            if self.p >= self.end {
                break;
            }

            match self.state {
                State::End => return Ok(FeedOutcome::Done(self.end - self.p)),

                State::BodyContentLength => {
                    let avail = self.end - self.p;
                    let take = avail.min(self.content_length as usize);
                    callbacks.on_content(self, &data[self.p..self.p + take]);
                    self.content_length -= take as u64;
                    self.p += take;
                    if self.content_length == 0 {
                        self.state = State::End;
                        if let Some(outcome) = self.run_done(callbacks, Callbacks::on_parser_done)
                        {
                            return outcome;
                        }
                    }
                    continue;
                }

                State::BodyChunk => {
                    let avail = self.end - self.p;
                    let take = avail.min(self.content_length as usize);
                    callbacks.on_content(self, &data[self.p..self.p + take]);
                    self.content_length -= take as u64;
                    self.p += take;
                    if self.content_length == 0 {
                        self.state = State::BodyChunkCr;
                    }
                    continue;
                }

                _ => {}
            }

            let byte = data[self.p];

            'dispatch: loop {
                match self.state {
                    // ===================== DETECT disambiguation =====================
                    State::NoState => {
                        self.mark = self.p;
                        if byte == b'H' {
                            self.state = State::UndH;
                        } else if is_token(byte) {
                            self.request_type = Some(MessageKind::Request);
                            self.state = State::MethodChar;
                        } else {
                            return self.fail(callbacks, "NoState", byte);
                        }
                    }
                    State::UndH => {
                        if byte == b'T' {
                            self.state = State::UndHt;
                        } else if is_token(byte) {
                            self.request_type = Some(MessageKind::Request);
                            self.state = State::MethodChar;
                        } else {
                            return self.fail(callbacks, "UndH", byte);
                        }
                    }
                    State::UndHt => {
                        if byte == b'T' {
                            self.state = State::UndHtt;
                        } else if is_token(byte) {
                            self.request_type = Some(MessageKind::Request);
                            self.state = State::MethodChar;
                        } else {
                            return self.fail(callbacks, "UndHt", byte);
                        }
                    }
                    State::UndHtt => {
                        if byte == b'P' {
                            self.state = State::UndHttp;
                        } else if is_token(byte) {
                            self.request_type = Some(MessageKind::Request);
                            self.state = State::MethodChar;
                        } else {
                            return self.fail(callbacks, "UndHtt", byte);
                        }
                    }
                    State::UndHttp => {
                        if byte == b'/' {
                            self.request_type = Some(MessageKind::Response);
                            self.state = State::ResponseHttpMajorV;
                        } else if is_token(byte) {
                            self.request_type = Some(MessageKind::Request);
                            self.state = State::MethodChar;
                        } else {
                            return self.fail(callbacks, "UndHttp", byte);
                        }
                    }

                    // ===================== Request line =====================
                    State::RequestRequired => {
                        self.mark = self.p;
                        if is_token(byte) {
                            self.state = State::MethodChar;
                        } else {
                            return self.fail(callbacks, "RequestRequired", byte);
                        }
                    }

                    State::MethodChar => {
                        if is_token(byte) {
                            // stay
                        } else if byte == b' ' {
                            callbacks.on_method(self, &data[self.mark..self.p]);
                            self.state = State::RequestUri;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_method_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "MethodChar", byte);
                        }
                    }

                    State::RequestUri => {
                        self.mark = self.p;
                        if byte == b'/' || byte == b'h' || byte == b'H' {
                            self.state = State::RequestUriChar;
                        } else if byte == b'*' {
                            self.state = State::RequestUriAsterisk;
                        } else {
                            return self.fail(callbacks, "RequestUri", byte);
                        }
                    }

                    State::RequestUriChar => {
                        if is_uri_char(byte) {
                            // stay
                        } else if byte == b'%' {
                            self.state = State::RequestUri1stHex;
                        } else if byte == b' ' {
                            callbacks.on_request_uri(self, &data[self.mark..self.p]);
                            self.state = State::RequestRequireVersion;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_request_uri_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "RequestUriChar", byte);
                        }
                    }

                    State::RequestUri1stHex => {
                        if is_hex_char(byte) {
                            self.state = State::RequestUri2ndHex;
                        } else {
                            return self.fail(callbacks, "RequestUri1stHex", byte);
                        }
                    }

                    State::RequestUri2ndHex => {
                        if is_hex_char(byte) {
                            self.state = State::RequestUriChar;
                        } else {
                            return self.fail(callbacks, "RequestUri2ndHex", byte);
                        }
                    }

                    State::RequestUriAsterisk => {
                        if byte == b' ' {
                            callbacks.on_request_uri(self, &data[self.mark..self.p]);
                            self.state = State::RequestRequireVersion;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_request_uri_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "RequestUriAsterisk", byte);
                        }
                    }

                    State::RequestRequireVersion => {
                        if byte == b'H' {
                            self.state = State::RequestH;
                        } else {
                            return self.fail(callbacks, "RequestRequireVersion", byte);
                        }
                    }
                    State::RequestH => {
                        if byte == b'T' {
                            self.state = State::RequestHt;
                        } else {
                            return self.fail(callbacks, "RequestH", byte);
                        }
                    }
                    State::RequestHt => {
                        if byte == b'T' {
                            self.state = State::RequestHtt;
                        } else {
                            return self.fail(callbacks, "RequestHt", byte);
                        }
                    }
                    State::RequestHtt => {
                        if byte == b'P' {
                            self.state = State::RequestHttp;
                        } else {
                            return self.fail(callbacks, "RequestHtt", byte);
                        }
                    }
                    State::RequestHttp => {
                        if byte == b'/' {
                            self.state = State::RequestHttpMajorV;
                        } else {
                            return self.fail(callbacks, "RequestHttp", byte);
                        }
                    }
                    State::RequestHttpMajorV => {
                        if byte.is_ascii_digit() {
                            self.major_version = byte - b'0';
                            self.state = State::RequestHttpDot;
                        } else {
                            return self.fail_status_line(callbacks, byte);
                        }
                    }
                    State::RequestHttpDot => {
                        if byte == b'.' {
                            self.state = State::RequestHttpMinorV;
                        } else {
                            return self.fail(callbacks, "RequestHttpDot", byte);
                        }
                    }
                    State::RequestHttpMinorV => {
                        if byte.is_ascii_digit() {
                            self.minor_version = byte - b'0';
                            self.state = State::RequestEol;
                        } else {
                            return self.fail_status_line(callbacks, byte);
                        }
                    }
                    State::RequestEol => {
                        if byte == b'\r' {
                            self.state = State::RequestCrlf;
                        } else {
                            return self.fail(callbacks, "RequestEol", byte);
                        }
                    }
                    State::RequestCrlf => {
                        if byte == b'\n' {
                            self.state = State::HeaderName;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_status_line_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "RequestCrlf", byte);
                        }
                    }

                    // ===================== Response status line =====================
                    State::ResponseRequired => {
                        if byte == b'H' {
                            self.state = State::ResponseH;
                        } else {
                            return self.fail(callbacks, "ResponseRequired", byte);
                        }
                    }
                    State::ResponseH => {
                        if byte == b'T' {
                            self.state = State::ResponseHt;
                        } else {
                            return self.fail(callbacks, "ResponseH", byte);
                        }
                    }
                    State::ResponseHt => {
                        if byte == b'T' {
                            self.state = State::ResponseHtt;
                        } else {
                            return self.fail(callbacks, "ResponseHt", byte);
                        }
                    }
                    State::ResponseHtt => {
                        if byte == b'P' {
                            self.state = State::ResponseHttp;
                        } else {
                            return self.fail(callbacks, "ResponseHtt", byte);
                        }
                    }
                    State::ResponseHttp => {
                        if byte == b'/' {
                            self.state = State::ResponseHttpMajorV;
                        } else {
                            return self.fail(callbacks, "ResponseHttp", byte);
                        }
                    }
                    State::ResponseHttpMajorV => {
                        if byte.is_ascii_digit() {
                            self.major_version = byte - b'0';
                            self.state = State::ResponseHttpDot;
                        } else {
                            return self.fail_status_line(callbacks, byte);
                        }
                    }
                    State::ResponseHttpDot => {
                        if byte == b'.' {
                            self.state = State::ResponseHttpMinorV;
                        } else {
                            return self.fail(callbacks, "ResponseHttpDot", byte);
                        }
                    }
                    State::ResponseHttpMinorV => {
                        if byte.is_ascii_digit() {
                            self.minor_version = byte - b'0';
                            self.state = State::StatusRequired;
                        } else {
                            return self.fail_status_line(callbacks, byte);
                        }
                    }
                    State::StatusRequired => {
                        if byte == b' ' {
                            self.state = State::Status1st;
                        } else {
                            return self.fail(callbacks, "StatusRequired", byte);
                        }
                    }
                    State::Status1st => {
                        if (b'1'..=b'9').contains(&byte) {
                            self.status_code = u16::from(byte - b'0') * 100;
                            self.state = State::Status2nd;
                        } else {
                            return self.fail_status_line(callbacks, byte);
                        }
                    }
                    State::Status2nd => {
                        if byte.is_ascii_digit() {
                            self.status_code += u16::from(byte - b'0') * 10;
                            self.state = State::Status3rd;
                        } else {
                            return self.fail(callbacks, "Status2nd", byte);
                        }
                    }
                    State::Status3rd => {
                        if byte.is_ascii_digit() {
                            self.status_code += u16::from(byte - b'0');
                            self.state = State::ResponseReason;
                        } else {
                            return self.fail(callbacks, "Status3rd", byte);
                        }
                    }
                    State::ResponseReason => {
                        if is_vchar(byte) {
                            // stay
                        } else if byte == b'\r' {
                            self.state = State::ResponseEol;
                        } else {
                            return self.fail(callbacks, "ResponseReason", byte);
                        }
                    }
                    State::ResponseEol => {
                        if byte == b'\n' {
                            self.state = State::HeaderName;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_status_line_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "ResponseEol", byte);
                        }
                    }

                    // ===================== Headers =====================
                    State::HeaderName => {
                        self.mark = self.p;
                        if is_token(byte) {
                            self.hnstate = header_trie::trie_step(HnState::NoState, byte);
                            self.state = if self.hnstate == HnState::Ignore {
                                State::HeaderNameChar
                            } else {
                                State::HeaderNameCharCheck
                            };
                        } else if byte == b'\r' {
                            self.state = State::HeaderEoh;
                        } else {
                            return self.fail(callbacks, "HeaderName", byte);
                        }
                    }

                    State::HeaderNameChar => {
                        if is_token(byte) {
                            // stay
                        } else if byte == b':' {
                            callbacks.on_header_name(self, &data[self.mark..self.p]);
                            self.state = State::HeaderValue;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_header_name_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "HeaderNameChar", byte);
                        }
                    }

                    State::HeaderNameCharCheck => {
                        if is_token(byte) {
                            self.hnstate = header_trie::trie_step(self.hnstate, byte);
                            if self.hnstate == HnState::Ignore {
                                self.state = State::HeaderNameChar;
                            }
                        } else if byte == b':' {
                            callbacks.on_header_name(self, &data[self.mark..self.p]);
                            self.state = State::HeaderValue;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_header_name_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "HeaderNameCharCheck", byte);
                        }
                    }

                    State::HeaderValue => {
                        if byte == b' ' || byte == b'\t' {
                            // trim leading OWS
                        } else if is_vchar(byte) {
                            self.mark = self.p;
                            match self.hnstate {
                                HnState::Connection => {
                                    self.state = State::HeaderValueLfClose;
                                    continue 'dispatch;
                                }
                                HnState::Host => {
                                    self.have_host_header = true;
                                    self.state = State::HeaderValueChar;
                                    continue 'dispatch;
                                }
                                HnState::TransferEncoding => {
                                    self.state = State::HeaderValueLfChunked;
                                    continue 'dispatch;
                                }
                                HnState::ContentLength if self.content_length == 0 => {
                                    self.state = State::HeaderValueContentLength;
                                    continue 'dispatch;
                                }
                                HnState::Upgrade => {
                                    self.is_upgrade = true;
                                    self.state = State::HeaderValueChar;
                                    continue 'dispatch;
                                }
                                _ => {
                                    self.state = State::HeaderValueChar;
                                    continue 'dispatch;
                                }
                            }
                        } else {
                            return self.fail(callbacks, "HeaderValue", byte);
                        }
                    }

                    State::HeaderValueChar => {
                        if is_vchar(byte) {
                            // stay
                        } else if byte == b'\r' {
                            callbacks.on_header_value(self, &data[self.mark..self.p]);
                            self.state = State::HeaderEol;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_header_value_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "HeaderValueChar", byte);
                        }
                    }

                    State::HeaderValueLfClose => {
                        if is_vchar(byte) {
                            self.hvstate = close::step(self.hvstate, byte);
                        } else if byte == b'\r' {
                            self.hvstate = close::step(self.hvstate, byte);
                            if self.hvstate == close::CONFIRMED {
                                self.should_close = true;
                            }
                            callbacks.on_header_value(self, &data[self.mark..self.p]);
                            self.state = State::HeaderEol;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_header_value_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "HeaderValueLfClose", byte);
                        }
                    }

                    State::HeaderValueLfChunked => {
                        if is_vchar(byte) {
                            self.hvstate = chunked::step(chunked::NOSTATE, byte);
                            self.state = State::HeaderValueLfChunkedChar;
                        } else {
                            return self.fail(callbacks, "HeaderValueLfChunked", byte);
                        }
                    }

                    State::HeaderValueLfChunkedChar => {
                        if is_vchar(byte) {
                            self.hvstate = chunked::step(self.hvstate, byte);
                        } else if byte == b'\r' {
                            self.hvstate = chunked::step(self.hvstate, byte);
                            if self.hvstate == chunked::ILLEGAL {
                                callbacks.on_error(self);
                                return Err(ParseError::IllegalTransferEncodingOrder);
                            }
                            if self.hvstate == chunked::CONFIRMED {
                                self.is_chunked = true;
                            }
                            callbacks.on_header_value(self, &data[self.mark..self.p]);
                            self.state = State::HeaderEol;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_header_value_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "HeaderValueLfChunkedChar", byte);
                        }
                    }

                    State::HeaderValueContentLength => {
                        if byte.is_ascii_digit() {
                            self.content_length = self
                                .content_length
                                .wrapping_mul(10)
                                .wrapping_add(u64::from(byte - b'0'));
                        } else if byte == b' ' || byte == b'\t' {
                            callbacks.on_header_value(self, &data[self.mark..self.p]);
                            self.state = State::HeaderValueEndTrim;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_header_value_done)
                            {
                                return outcome;
                            }
                        } else if byte == b'\r' {
                            callbacks.on_header_value(self, &data[self.mark..self.p]);
                            self.state = State::HeaderEol;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_header_value_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "HeaderValueContentLength", byte);
                        }
                    }

                    State::HeaderValueEndTrim => {
                        if byte == b' ' || byte == b'\t' {
                            // stay
                        } else if byte == b'\r' {
                            self.state = State::HeaderEol;
                        } else {
                            return self.fail(callbacks, "HeaderValueEndTrim", byte);
                        }
                    }

                    State::HeaderEol => {
                        if byte == b'\n' {
                            self.state = State::HeaderCrlf;
                        } else {
                            return self.fail(callbacks, "HeaderEol", byte);
                        }
                    }

                    State::HeaderCrlf => {
                        if byte == b'\r' {
                            self.state = State::HeaderEoh;
                        } else if is_token(byte) {
                            self.state = State::HeaderName;
                            continue 'dispatch;
                        } else {
                            return self.fail(callbacks, "HeaderCrlf", byte);
                        }
                    }

                    State::HeaderEoh => {
                        if byte == b'\n' {
                            match self.decide_framing() {
                                Ok(()) => {}
                                Err(e) => {
                                    callbacks.on_error(self);
                                    return Err(e);
                                }
                            }

                            if self.has_content && self.content_length > 0 {
                                self.state = State::BodyContentLength;
                                if let Some(outcome) =
                                    self.run_done(callbacks, Callbacks::on_headers_done)
                                {
                                    return outcome;
                                }
                            } else if self.has_content && self.is_chunked {
                                self.state = State::BodyChunked;
                                if let Some(outcome) =
                                    self.run_done(callbacks, Callbacks::on_headers_done)
                                {
                                    return outcome;
                                }
                            } else {
                                if let Some(outcome) =
                                    self.run_done(callbacks, Callbacks::on_headers_done)
                                {
                                    return outcome;
                                }
                                self.state = State::End;
                                if let Some(outcome) =
                                    self.run_done(callbacks, Callbacks::on_parser_done)
                                {
                                    return outcome;
                                }
                            }
                        } else {
                            return self.fail(callbacks, "HeaderEoh", byte);
                        }
                    }

                    // ===================== Chunked body =====================
                    State::BodyChunked => {
                        if let Some(v) = hex_digit_value(byte) {
                            self.content_length = u64::from(v);
                            self.state = State::BodyChunklen;
                        } else {
                            callbacks.on_error(self);
                            return Err(ParseError::BadChunkLength);
                        }
                    }

                    State::BodyChunklen => {
                        if let Some(v) = hex_digit_value(byte) {
                            self.content_length =
                                self.content_length.wrapping_shl(4).wrapping_add(u64::from(v));
                        } else if byte == b'\r' {
                            self.state = if self.content_length == 0 {
                                State::BodyChunkedEos
                            } else {
                                State::BodyChunklenCrlf
                            };
                        } else {
                            callbacks.on_error(self);
                            return Err(ParseError::BadChunkLength);
                        }
                    }

                    State::BodyChunklenCrlf => {
                        if byte == b'\n' {
                            self.state = State::BodyChunk;
                        } else {
                            return self.fail(callbacks, "BodyChunklenCrlf", byte);
                        }
                    }

                    State::BodyChunkCr => {
                        if byte == b'\r' {
                            self.state = State::BodyChunkCrlf;
                        } else {
                            return self.fail(callbacks, "BodyChunkCr", byte);
                        }
                    }

                    State::BodyChunkCrlf => {
                        if byte == b'\n' {
                            self.state = State::BodyChunked;
                        } else {
                            return self.fail(callbacks, "BodyChunkCrlf", byte);
                        }
                    }

                    State::BodyChunkedEos => {
                        if byte == b'\n' {
                            self.state = State::End;
                            if let Some(outcome) =
                                self.run_done(callbacks, Callbacks::on_parser_done)
                            {
                                return outcome;
                            }
                        } else {
                            return self.fail(callbacks, "BodyChunkedEos", byte);
                        }
                    }

                    State::BodyContentLength | State::BodyChunk | State::End => {
                        unreachable!("handled by the bulk-copy path at the top of the loop")
                    }
                }

                break 'dispatch;
            }

            self.p += 1;
        }

        if self.state == State::End {
            return Ok(FeedOutcome::Done(0));
        }

        self.emit_partial(callbacks, data);
        Ok(FeedOutcome::Consumed)
    }

    // ----- helpers --------------------------------------------------------

    /// Invoke a "done" callback and translate a non-`Continue` result
    /// into a `feed` return value. Returns `None` to keep going.
    fn run_done<C: Callbacks>(
        &mut self,
        callbacks: &mut C,
        call: impl FnOnce(&mut C, &mut Parser) -> Control,
    ) -> Option<Result<FeedOutcome, ParseError>> {
        match call(callbacks, self) {
            Control::Continue => None,
            Control::Return => Some(Ok(FeedOutcome::Returned(self.end - self.p))),
            Control::Error => Some(Ok(FeedOutcome::Paused)),
        }
    }

    fn fail<C: Callbacks>(
        &mut self,
        callbacks: &mut C,
        state: &'static str,
        byte: u8,
    ) -> Result<FeedOutcome, ParseError> {
        callbacks.on_error(self);
        Err(ParseError::Grammar { state, byte })
    }

    fn fail_status_line<C: Callbacks>(
        &mut self,
        callbacks: &mut C,
        byte: u8,
    ) -> Result<FeedOutcome, ParseError> {
        callbacks.on_error(self);
        Err(ParseError::StatusLineConstraintViolation { byte })
    }

    /// Resolves body framing per RFC 9112 §6.3 — performed once,
    /// exactly as the final `\n` of the header-terminating CRLF is
    /// consumed.
    fn decide_framing(&mut self) -> Result<(), ParseError> {
        if self.content_length > 0 && !self.is_chunked {
            self.has_content = true;
        } else if self.is_chunked && self.content_length == 0 {
            self.has_content = true;
        }

        if !self.has_content && (self.content_length > 0 || self.is_chunked) {
            return Err(ParseError::FramingAmbiguity);
        }

        log::debug!(
            "framing decided: has_content={} is_chunked={} content_length={}",
            self.has_content,
            self.is_chunked,
            self.content_length
        );
        Ok(())
    }

    /// Emit the partial-token callback for whatever is mid-accumulation
    /// when a chunk ends without reaching a delimiter. No "done"
    /// callback fires for these — only a real delimiter triggers one.
    fn emit_partial<C: Callbacks>(&mut self, callbacks: &mut C, data: &[u8]) {
        match self.state {
            State::MethodChar => callbacks.on_method(self, &data[self.mark..self.p]),
            State::RequestUriChar
            | State::RequestUri1stHex
            | State::RequestUri2ndHex
            | State::RequestUriAsterisk => callbacks.on_request_uri(self, &data[self.mark..self.p]),
            State::HeaderNameChar | State::HeaderNameCharCheck => {
                callbacks.on_header_name(self, &data[self.mark..self.p])
            }
            State::HeaderValueChar
            | State::HeaderValueLfClose
            | State::HeaderValueLfChunked
            | State::HeaderValueLfChunkedChar
            | State::HeaderValueContentLength => {
                callbacks.on_header_value(self, &data[self.mark..self.p])
            }
            _ => {}
        }
    }
}

fn hex_digit_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::NoopCallbacks;

    #[test]
    fn simple_get_request_no_body() {
        let mut parser = Parser::new(Mode::Request);
        let mut cb = NoopCallbacks;
        let outcome = parser
            .feed(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n", &mut cb)
            .unwrap();
        assert_eq!(outcome, FeedOutcome::Done(0));
        assert_eq!(parser.major_version(), 1);
        assert_eq!(parser.minor_version(), 1);
        assert!(parser.have_host_header());
        assert!(!parser.has_content());
    }

    #[test]
    fn content_length_body() {
        #[derive(Default)]
        struct C {
            body: Vec<u8>,
        }
        impl Callbacks for C {
            fn on_content(&mut self, _p: &Parser, data: &[u8]) {
                self.body.extend_from_slice(data);
            }
        }
        let mut parser = Parser::new(Mode::Request);
        let mut cb = C::default();
        let outcome = parser
            .feed(
                b"POST /x HTTP/1.0\r\nContent-Length: 5\r\n\r\nhello",
                &mut cb,
            )
            .unwrap();
        assert_eq!(outcome, FeedOutcome::Done(0));
        assert_eq!(cb.body, b"hello");
        assert!(parser.has_content());
    }

    #[test]
    fn chunked_response_body() {
        #[derive(Default)]
        struct C {
            body: Vec<u8>,
        }
        impl Callbacks for C {
            fn on_content(&mut self, _p: &Parser, data: &[u8]) {
                self.body.extend_from_slice(data);
            }
        }
        let mut parser = Parser::new(Mode::Response);
        let mut cb = C::default();
        let outcome = parser
            .feed(
                b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n",
                &mut cb,
            )
            .unwrap();
        assert_eq!(outcome, FeedOutcome::Done(0));
        assert_eq!(cb.body, b"hello");
        assert_eq!(parser.status_code(), 200);
        assert!(parser.is_chunked());
    }

    #[test]
    fn ambiguous_framing_is_an_error() {
        let mut parser = Parser::new(Mode::Request);
        let mut cb = NoopCallbacks;
        let result = parser.feed(
            b"GET / HTTP/1.1\r\nContent-Length: 3\r\nTransfer-Encoding: chunked\r\n\r\n",
            &mut cb,
        );
        assert_eq!(result, Err(ParseError::FramingAmbiguity));
    }

    #[test]
    fn byte_by_byte_feed_matches_single_shot() {
        let raw: &[u8] = b"POST /x HTTP/1.0\r\nContent-Length: 5\r\n\r\nhello";

        #[derive(Default)]
        struct C {
            body: Vec<u8>,
            done: bool,
        }
        impl Callbacks for C {
            fn on_content(&mut self, _p: &Parser, data: &[u8]) {
                self.body.extend_from_slice(data);
            }
            fn on_parser_done(&mut self, _p: &mut Parser) -> Control {
                self.done = true;
                Control::Continue
            }
        }

        let mut parser = Parser::new(Mode::Request);
        let mut cb = C::default();
        for &b in raw {
            parser.feed(&[b], &mut cb).unwrap();
        }
        assert!(cb.done);
        assert_eq!(cb.body, b"hello");
    }

    #[test]
    fn detect_mode_resolves_request() {
        let mut parser = Parser::new(Mode::Detect);
        let mut cb = NoopCallbacks;
        parser.feed(b"HEAD / HTTP/1.1\r\n\r\n", &mut cb).unwrap();
        assert_eq!(parser.request_type(), Some(MessageKind::Request));
    }

    #[test]
    fn connection_close_sets_should_close() {
        #[derive(Default)]
        struct C;
        impl Callbacks for C {}
        let mut parser = Parser::new(Mode::Request);
        let mut cb = C;
        parser
            .feed(
                b"GET / HTTP/1.1\r\nConnection: keep-alive, close\r\n\r\n",
                &mut cb,
            )
            .unwrap();
        assert!(parser.should_close());
    }

    #[test]
    fn transfer_encoding_chunked_not_last_is_illegal() {
        let mut parser = Parser::new(Mode::Request);
        let mut cb = NoopCallbacks;
        let result = parser.feed(
            b"GET / HTTP/1.1\r\nTransfer-Encoding: chunked, gzip\r\n\r\n",
            &mut cb,
        );
        assert_eq!(result, Err(ParseError::IllegalTransferEncodingOrder));
    }

    #[test]
    fn reset_preserves_mode() {
        let mut parser = Parser::new(Mode::Response);
        let mut cb = NoopCallbacks;
        parser.feed(b"HTTP/1.1 200 OK\r\n\r\n", &mut cb).unwrap();
        parser.reset();
        assert_eq!(parser.mode(), Mode::Response);
        assert_eq!(parser.status_code(), 0);
    }
}
