//! # Stream Framer
//!
//! Splits an arbitrarily chunked byte stream into complete sentences, each from a
//! `$` up to and including the first `\r\n` that follows it.
//!
//! The framer is a small state machine:
//!
//! ```text
//!   Seeking ──'$'──> Spanning ──"\r\n"──> Ready ──> Draining ──> Seeking
//!      ^                 │
//!      └──── overflow ───┘
//! ```
//!
//! Bytes before a `$` are noise and are discarded. A `\r` that is not followed
//! by `\n` is part of the sentence. The result never depends on how the stream
//! was chunked.

use crate::sentence::{START_MARKER, TERMINATOR, TypeWord};

/// Default number of bytes a sentence may occupy, terminator included.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Framer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramerConfig {
    capacity: usize,
}

impl FramerConfig {
    /// Bounds the length of a sentence, `$` and terminator included.
    ///
    /// A longer span is dropped, whether or not its terminator has arrived, and
    /// the framer resyncs on the next `$` after its start.
    pub fn with_capacity(capacity: usize) -> Self {
        FramerConfig {
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for FramerConfig {
    fn default() -> Self {
        FramerConfig::with_capacity(DEFAULT_CAPACITY)
    }
}

/// Where the framer is within the stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FramerState {
    /// Looking for a `$`.
    #[default]
    Seeking,
    /// A `$` was found; looking for the terminator.
    Spanning,
    /// A complete sentence is being delivered.
    Ready,
    /// The delivered sentence is being removed from the buffer.
    Draining,
}

/// Bytes received but not consumed yet.
///
/// While spanning, the buffer always starts with `$`. `scanned` marks how far the
/// terminator search got, so bytes are never scanned twice.
#[derive(Debug, Default, Clone)]
struct StreamBuffer {
    bytes: Vec<u8>,
    scanned: usize,
}

impl StreamBuffer {
    fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Position of the first `$` at or after `from`.
    fn find_start(&self, from: usize) -> Option<usize> {
        self.bytes
            .get(from..)?
            .iter()
            .position(|&byte| byte == START_MARKER)
            .map(|offset| from + offset)
    }

    /// End of the sentence, one past its `\n`.
    ///
    /// A `\r` followed by anything but `\n` is skipped. A `\r` in last position is
    /// rescanned once more bytes arrive.
    fn find_end(&mut self) -> Option<usize> {
        let [cr, lf] = TERMINATOR;

        while let Some(offset) = self.bytes[self.scanned..].iter().position(|&b| b == cr) {
            let at = self.scanned + offset;
            match self.bytes.get(at + 1) {
                Some(&next) if next == lf => {
                    self.scanned = 0;
                    return Some(at + 2);
                }
                Some(_) => self.scanned = at + 1,
                None => {
                    self.scanned = at;
                    return None;
                }
            }
        }

        self.scanned = self.bytes.len();
        None
    }

    /// Drops the first `count` bytes, keeping the rest at the front of the buffer.
    fn consume(&mut self, count: usize) {
        if count >= self.bytes.len() {
            self.clear();
        } else {
            self.bytes.drain(..count);
            self.scanned = 0;
        }
    }

    fn clear(&mut self) {
        self.bytes.clear();
        self.scanned = 0;
    }
}

/// A complete sentence, `$` and terminator included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSentence<'a> {
    bytes: &'a [u8],
}

impl<'a> RawSentence<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The sentence as text, `None` if it is not valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.bytes).ok()
    }

    pub fn type_word(&self) -> Option<TypeWord> {
        TypeWord::of_sentence(self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Incremental sentence framer.
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::Framer;
///
/// let mut framer = Framer::new();
/// let mut sentences = Vec::new();
///
/// for chunk in [&b"noise$GPGLL,4916.4"[..], b"5,N,12311.12,W\r", b"\n$GPGGA,1"] {
///     framer.feed(chunk, |sentence| sentences.push(sentence.as_bytes().to_vec()));
/// }
///
/// assert_eq!(sentences, [b"$GPGLL,4916.45,N,12311.12,W\r\n".to_vec()]);
/// assert_eq!(framer.buffered(), b"$GPGGA,1");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Framer {
    buffer: StreamBuffer,
    state: FramerState,
    config: FramerConfig,
}

impl Framer {
    pub fn new() -> Self {
        Framer::default()
    }

    pub fn with_config(config: FramerConfig) -> Self {
        Framer {
            config,
            ..Framer::default()
        }
    }

    /// Appends `bytes` to the stream and hands every sentence they complete to
    /// `on_sentence`, in stream order. Returns the number of sentences delivered.
    ///
    /// An empty chunk is a no-op.
    pub fn feed<F>(&mut self, bytes: &[u8], mut on_sentence: F) -> usize
    where
        F: FnMut(RawSentence<'_>),
    {
        self.buffer.extend(bytes);
        let mut delivered = 0;

        loop {
            match self.state {
                FramerState::Seeking => match self.buffer.find_start(0) {
                    Some(start) => {
                        if start > 0 {
                            tracing::trace!(discarded = start, "skipping bytes before sentence");
                        }
                        self.buffer.consume(start);
                        self.buffer.scanned = 1;
                        self.state = FramerState::Spanning;
                    }
                    None => {
                        if !self.buffer.is_empty() {
                            tracing::trace!(
                                discarded = self.buffer.len(),
                                "skipping bytes before sentence"
                            );
                        }
                        self.buffer.clear();
                        return delivered;
                    }
                },
                FramerState::Spanning => match self.buffer.find_end() {
                    Some(end) if end > self.config.capacity => self.overflow(),
                    Some(end) => {
                        self.state = FramerState::Ready;
                        on_sentence(RawSentence {
                            bytes: &self.buffer.as_slice()[..end],
                        });
                        delivered += 1;

                        self.state = FramerState::Draining;
                        self.buffer.consume(end);
                        self.state = FramerState::Seeking;
                    }
                    None if self.buffer.len() > self.config.capacity => self.overflow(),
                    None => return delivered,
                },
                FramerState::Ready | FramerState::Draining => {
                    self.state = FramerState::Seeking;
                }
            }
        }
    }

    /// Drops the oversized span, keeping anything from the next `$` on.
    fn overflow(&mut self) {
        let resync = self.buffer.find_start(1);
        let discarded = resync.unwrap_or(self.buffer.len());

        tracing::warn!(
            discarded,
            capacity = self.config.capacity,
            "sentence exceeds capacity, resyncing"
        );

        match resync {
            Some(start) => {
                self.buffer.consume(start);
                self.buffer.scanned = 1;
            }
            None => {
                self.buffer.clear();
                self.state = FramerState::Seeking;
            }
        }
    }

    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Bytes held for the sentence currently being spanned.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Drops any partial sentence and starts seeking again.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = FramerState::Seeking;
    }
}
