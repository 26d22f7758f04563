//! # Sentence Dispatcher
//!
//! Routes a raw sentence to the parser module registered for its type-word and
//! returns the parsed record.

use crate::{
    error::{DispatchError, MalformedSentence},
    record::ParsedRecord,
    registry::Registry,
    sentence::{MAX_FIELDS, START_MARKER, TypeWord, checksum, split_checksum},
};

/// Defines how the dispatcher should handle sentence checksums.
///
/// NMEA 0183 sentences can include a checksum in the format `*CC` where CC is a
/// two-digit hexadecimal value representing the XOR of all bytes in the sentence
/// content (excluding the `$` prefix and `*` delimiter).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumMode {
    #[default]
    /// Checksums are not verified.
    Ignored,

    /// Checksum is optional but will be validated if present.
    Optional,

    /// Checksum is required and must be valid.
    Required,
}

/// Dispatches raw sentences to the modules of a [`Registry`].
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "sentences")] {
/// use nmea0183_stream::{ChecksumMode, Dispatcher, DispatchError, Registry, SentenceType};
///
/// let registry = Registry::builtin().unwrap();
/// let dispatcher = Dispatcher::new(&registry).checksum_mode(ChecksumMode::Optional);
///
/// let record = dispatcher
///     .dispatch(b"$GPGLL,4916.45,N,12311.12,W,225444,A\r\n")
///     .unwrap();
/// assert_eq!(record.sentence_type(), SentenceType::Gll);
/// assert_eq!(record.errors(), 0);
///
/// let unknown = dispatcher.dispatch(b"$GPZDA,201530.00,04,07,2002,00,00\r\n");
/// assert_eq!(unknown.unwrap_err(), DispatchError::UnknownSentenceType("ZDA".into()));
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct Dispatcher<'r> {
    registry: &'r Registry,
    checksum_mode: ChecksumMode,
    max_fields: usize,
}

impl<'r> Dispatcher<'r> {
    /// Creates a dispatcher that ignores checksums and accepts up to
    /// [`MAX_FIELDS`] fields per sentence.
    pub fn new(registry: &'r Registry) -> Self {
        Dispatcher {
            registry,
            checksum_mode: ChecksumMode::default(),
            max_fields: MAX_FIELDS,
        }
    }

    /// Sets the checksum mode.
    pub fn checksum_mode(mut self, mode: ChecksumMode) -> Self {
        self.checksum_mode = mode;
        self
    }

    /// Sets the maximum number of fields a sentence may carry, capped at
    /// [`MAX_FIELDS`].
    pub fn max_fields(mut self, max_fields: usize) -> Self {
        self.max_fields = max_fields.min(MAX_FIELDS);
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Parses one raw sentence, from `$` up to and including the terminator.
    ///
    /// The record is allocated, reset to its defaults and parsed by the module
    /// registered for the sentence's type-word. When parsing fails the record is
    /// released by that same module before the error is returned.
    pub fn dispatch(&self, raw: &[u8]) -> Result<ParsedRecord, DispatchError> {
        if !raw.is_ascii() {
            return Err(MalformedSentence::NonAscii.into());
        }
        let text = std::str::from_utf8(raw).map_err(|_| MalformedSentence::NonAscii)?;
        let text = text
            .strip_prefix(START_MARKER as char)
            .ok_or(MalformedSentence::Header)?;

        let type_word = TypeWord::of_sentence(raw).ok_or(MalformedSentence::Header)?;
        let Some(module) = self.registry.lookup_by_type_word(type_word.as_bytes()) else {
            tracing::debug!(%type_word, "no parser module for sentence");
            return Err(DispatchError::UnknownSentenceType(type_word.to_string()));
        };

        self.verify_checksum(text)?;

        let mut record = module.allocate();
        module.set_default(&mut record);

        if let Err(error) = module.parse(&mut record, text, self.max_fields) {
            module.free(record);
            tracing::debug!(module = module.name(), %error, "malformed sentence");
            return Err(error.into());
        }

        if record.errors() > 0 {
            tracing::debug!(
                module = module.name(),
                errors = record.errors(),
                "sentence parsed with field errors"
            );
        }

        Ok(record)
    }

    fn verify_checksum(&self, text: &str) -> Result<(), DispatchError> {
        if self.checksum_mode == ChecksumMode::Ignored {
            return Ok(());
        }

        let (data, found) = split_checksum(text)?;
        match (found, self.checksum_mode) {
            (None, ChecksumMode::Required) => Err(MalformedSentence::MissingChecksum.into()),
            (None, _) => Ok(()),
            (Some(found), _) => {
                let expected = checksum(data);
                if found != expected {
                    return Err(DispatchError::ChecksumMismatch { expected, found });
                }
                Ok(())
            }
        }
    }
}

#[cfg(all(test, feature = "sentences"))]
mod tests {
    use super::*;
    use crate::sentence::SentenceType;

    fn registry() -> Registry {
        Registry::builtin().unwrap()
    }

    #[test]
    fn test_dispatch_gga() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry);

        let record = dispatcher
            .dispatch(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n")
            .unwrap();
        assert_eq!(record.sentence_type(), SentenceType::Gga);
        assert_eq!(record.errors(), 0);

        let gga = record.as_gga().unwrap();
        assert_eq!(gga.satellite_count, Some(8));
        assert_eq!(gga.altitude, Some(545.4));
        assert_eq!(gga.altitude_unit, Some('M'));
    }

    #[test]
    fn test_dispatch_other_talker() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry);

        let record = dispatcher
            .dispatch(b"$GNGLL,4916.45,N,12311.12,W,225444,A\r\n")
            .unwrap();
        assert_eq!(record.sentence_type(), SentenceType::Gll);
    }

    #[test]
    fn test_dispatch_field_warning() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry);

        let record = dispatcher
            .dispatch(b"$GPGGA,123519,4807.038,N,01131.000,E,1,A8,0.9,545.4,M,46.9,M,,\r\n")
            .unwrap();
        assert_eq!(record.errors(), 1);

        let gga = record.as_gga().unwrap();
        assert_eq!(gga.satellite_count, None);
        assert_eq!(gga.time.map(|t| t.as_hms()), Some((12, 35, 19)));
        assert_eq!(gga.altitude, Some(545.4));
    }

    #[test]
    fn test_dispatch_errors() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry);

        assert_eq!(
            dispatcher.dispatch(b"$GPRMC,123519,A\r\n").unwrap_err(),
            DispatchError::UnknownSentenceType("RMC".into())
        );
        assert_eq!(
            dispatcher.dispatch(b"$GPgga,123519\r\n").unwrap_err(),
            DispatchError::UnknownSentenceType("gga".into())
        );
        assert_eq!(
            dispatcher.dispatch(b"$GP\r\n").unwrap_err(),
            DispatchError::Malformed(MalformedSentence::Header)
        );
        assert_eq!(
            dispatcher.dispatch(b"GPGGA,1\r\n").unwrap_err(),
            DispatchError::Malformed(MalformedSentence::Header)
        );
        assert_eq!(
            dispatcher.dispatch(b"$GPGGA,\xff\r\n").unwrap_err(),
            DispatchError::Malformed(MalformedSentence::NonAscii)
        );
        assert_eq!(
            dispatcher.dispatch(b"$GPGGA,123519,4807.038\r\n").unwrap_err(),
            DispatchError::Malformed(MalformedSentence::FieldCount { found: 2, min: 10 })
        );
    }

    #[test]
    fn test_dispatch_max_fields() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry).max_fields(8);

        assert_eq!(
            dispatcher
                .dispatch(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,\r\n")
                .unwrap_err(),
            DispatchError::Malformed(MalformedSentence::TooManyFields { max: 8 })
        );
    }

    #[test]
    fn test_checksum_modes() {
        let registry = registry();
        let valid = b"$GPGLL,4916.45,N,12311.12,W,225444,A*31\r\n";
        let corrupt = b"$GPGLL,4916.45,N,12311.12,W,225444,A*32\r\n";
        let missing = b"$GPGLL,4916.45,N,12311.12,W,225444,A\r\n";

        let ignored = Dispatcher::new(&registry);
        assert!(ignored.dispatch(valid).is_ok());
        assert!(ignored.dispatch(corrupt).is_ok());
        assert!(ignored.dispatch(missing).is_ok());

        let optional = ignored.checksum_mode(ChecksumMode::Optional);
        assert!(optional.dispatch(valid).is_ok());
        assert_eq!(
            optional.dispatch(corrupt).unwrap_err(),
            DispatchError::ChecksumMismatch {
                expected: 0x31,
                found: 0x32
            }
        );
        assert!(optional.dispatch(missing).is_ok());

        let required = ignored.checksum_mode(ChecksumMode::Required);
        assert!(required.dispatch(valid).is_ok());
        assert!(required.dispatch(corrupt).is_err());
        assert_eq!(
            required.dispatch(missing).unwrap_err(),
            DispatchError::Malformed(MalformedSentence::MissingChecksum)
        );
    }
}
