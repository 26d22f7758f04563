//! # Reader Adapter
//!
//! Drives a [`StreamDecoder`] from any [`std::io::Read`] byte source, such as a
//! serial port, a socket or standard input.

use std::{
    collections::VecDeque,
    io::{ErrorKind, Read},
};

use crate::{
    decoder::{DecodeStats, StreamDecoder},
    dispatch::Dispatcher,
    error::{DispatchError, ReadError},
    record::ParsedRecord,
};

/// Default number of bytes requested from the source per read.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Iterator over the records of a byte source.
///
/// Sentences that fail to dispatch are yielded as [`ReadError::Dispatch`] and
/// reading continues. A failing source yields one [`ReadError::Io`] and ends the
/// iteration, as does the end of input. A trailing sentence without terminator
/// is dropped.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "sentences")] {
/// use nmea0183_stream::{Dispatcher, Registry, SentenceReader};
///
/// let registry = Registry::builtin().unwrap();
/// let input = &b"$GPGLL,4916.45,N,12311.12,W,225444,A*31\r\n$GPGLL,4916.45,N,1231"[..];
///
/// let records: Vec<_> = SentenceReader::new(input, Dispatcher::new(&registry))
///     .with_chunk_size(8)
///     .collect();
///
/// assert_eq!(records.len(), 1);
/// let gll = records[0].as_ref().unwrap().as_gll().unwrap();
/// assert_eq!(gll.longitude.unwrap().degrees, 123);
/// # }
/// ```
#[derive(Debug)]
pub struct SentenceReader<'r, R> {
    source: R,
    decoder: StreamDecoder<'r>,
    pending: VecDeque<Result<ParsedRecord, DispatchError>>,
    chunk: Vec<u8>,
    finished: bool,
}

impl<'r, R: Read> SentenceReader<'r, R> {
    pub fn new(source: R, dispatcher: Dispatcher<'r>) -> Self {
        SentenceReader::with_decoder(source, StreamDecoder::new(dispatcher))
    }

    pub fn with_decoder(source: R, decoder: StreamDecoder<'r>) -> Self {
        SentenceReader {
            source,
            decoder,
            pending: VecDeque::new(),
            chunk: vec![0; DEFAULT_CHUNK_SIZE],
            finished: false,
        }
    }

    /// Sets the number of bytes requested per read.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk = vec![0; size.max(1)];
        self
    }

    pub fn stats(&self) -> &DecodeStats {
        self.decoder.stats()
    }

    pub fn decoder(&self) -> &StreamDecoder<'r> {
        &self.decoder
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    fn fill(&mut self) -> Result<(), ReadError> {
        let read = loop {
            match self.source.read(&mut self.chunk) {
                Ok(read) => break read,
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error.into()),
            }
        };

        if read == 0 {
            self.finished = true;
            let residual = self.decoder.framer().buffered().len();
            if residual > 0 {
                tracing::debug!(residual, "end of input inside a sentence");
            }
            return Ok(());
        }

        let pending = &mut self.pending;
        self.decoder
            .decode_with(&self.chunk[..read], |outcome| pending.push_back(outcome));
        Ok(())
    }
}

impl<R: Read> Iterator for SentenceReader<'_, R> {
    type Item = Result<ParsedRecord, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(outcome) = self.pending.pop_front() {
                return Some(outcome.map_err(ReadError::from));
            }
            if self.finished {
                return None;
            }
            if let Err(error) = self.fill() {
                tracing::warn!(%error, "stopped reading sentences");
                self.finished = true;
                return Some(Err(error));
            }
        }
    }
}
