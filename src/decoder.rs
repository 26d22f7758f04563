//! # Stream Decoder
//!
//! Joins a [`Framer`] and a [`Dispatcher`]: bytes in, parsed records out.

use crate::{
    dispatch::Dispatcher,
    error::DispatchError,
    framer::Framer,
    record::ParsedRecord,
};

/// Running counters of a [`StreamDecoder`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    /// Complete sentences framed.
    pub sentences: u64,
    /// Sentences parsed into a record.
    pub records: u64,
    /// Sentences without a registered module.
    pub unknown: u64,
    /// Sentences rejected as malformed.
    pub malformed: u64,
    /// Sentences rejected for a wrong checksum.
    pub checksum_failures: u64,
    /// Field errors summed over all records.
    pub field_errors: u64,
}

impl DecodeStats {
    fn observe(&mut self, outcome: &Result<ParsedRecord, DispatchError>) {
        self.sentences += 1;
        match outcome {
            Ok(record) => {
                self.records += 1;
                self.field_errors += u64::from(record.errors());
            }
            Err(DispatchError::UnknownSentenceType(_)) => self.unknown += 1,
            Err(DispatchError::Malformed(_)) => self.malformed += 1,
            Err(DispatchError::ChecksumMismatch { .. }) => self.checksum_failures += 1,
        }
    }
}

/// Frames a byte stream and dispatches every sentence it contains.
///
/// Per-sentence failures are reported in place and never stop the stream.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "sentences")] {
/// use nmea0183_stream::{Dispatcher, Registry, SentenceType, StreamDecoder};
///
/// let registry = Registry::builtin().unwrap();
/// let mut decoder = StreamDecoder::new(Dispatcher::new(&registry));
///
/// let mut records = decoder.decode(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,54");
/// assert!(records.is_empty());
///
/// records.extend(decoder.decode(b"5.4,M,46.9,M,,*47\r\n$GPGSV,1\r\n"));
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].as_ref().unwrap().sentence_type(), SentenceType::Gga);
/// assert!(records[1].is_err());
///
/// assert_eq!(decoder.stats().records, 1);
/// assert_eq!(decoder.stats().unknown, 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StreamDecoder<'r> {
    framer: Framer,
    dispatcher: Dispatcher<'r>,
    stats: DecodeStats,
}

impl<'r> StreamDecoder<'r> {
    pub fn new(dispatcher: Dispatcher<'r>) -> Self {
        StreamDecoder::with_framer(Framer::new(), dispatcher)
    }

    pub fn with_framer(framer: Framer, dispatcher: Dispatcher<'r>) -> Self {
        StreamDecoder {
            framer,
            dispatcher,
            stats: DecodeStats::default(),
        }
    }

    /// Feeds `bytes` and collects the outcome of every sentence they complete.
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<Result<ParsedRecord, DispatchError>> {
        let mut outcomes = Vec::new();
        self.decode_with(bytes, |outcome| outcomes.push(outcome));
        outcomes
    }

    /// Feeds `bytes` and hands the outcome of every sentence they complete to
    /// `on_record`, in stream order.
    pub fn decode_with<F>(&mut self, bytes: &[u8], mut on_record: F) -> usize
    where
        F: FnMut(Result<ParsedRecord, DispatchError>),
    {
        let StreamDecoder {
            framer,
            dispatcher,
            stats,
        } = self;

        framer.feed(bytes, |sentence| {
            let outcome = dispatcher.dispatch(sentence.as_bytes());
            stats.observe(&outcome);
            on_record(outcome);
        })
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    pub fn dispatcher(&self) -> &Dispatcher<'r> {
        &self.dispatcher
    }

    /// Drops any partial sentence. Counters are kept.
    pub fn reset(&mut self) {
        self.framer.reset();
    }
}
