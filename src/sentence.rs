//! # Sentence Structure
//!
//! Identifiers and helpers shared by the dispatcher and every parser module.
//!
//! A sentence has the form `$TTWWW,D1,D2,...,Dn*CC\r\n` where `TT` is the talker id,
//! `WWW` the type-word, `D1..Dn` the fields and `CC` the optional checksum.

use std::fmt;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take, take_until, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, map_res, rest, verify},
    sequence::preceded,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{InitError, MalformedSentence};

/// Start marker of every sentence.
pub const START_MARKER: u8 = b'$';

/// Two byte terminator of every sentence.
pub const TERMINATOR: [u8; 2] = [b'\r', b'\n'];

/// Length of the talker id following the start marker.
pub const TALKER_LENGTH: usize = 2;

/// Length of a type-word.
pub const TYPE_WORD_LENGTH: usize = 3;

/// Hard upper bound on the number of fields a sentence may carry.
pub const MAX_FIELDS: usize = 32;

/// Identifies a kind of sentence, and the record it parses into.
///
/// Built-in sentence kinds have their own variant; modules supplied by the
/// application pick a `Custom` value of their own.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentenceType {
    /// Global Positioning System Fix Data
    Gga,
    /// Geographic Position - Latitude/Longitude
    Gll,
    /// Any other sentence kind
    Custom(u16),
}

/// The three character sentence type code, e.g. `GGA`.
///
/// Comparison is exact and case-sensitive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeWord([u8; TYPE_WORD_LENGTH]);

impl TypeWord {
    /// Creates a type-word from exactly three ASCII alphanumeric characters.
    ///
    /// ```rust
    /// use nmea0183_stream::TypeWord;
    ///
    /// assert!(TypeWord::new("GGA").is_ok());
    /// assert!(TypeWord::new("GG").is_err());
    /// assert!(TypeWord::new("GG$").is_err());
    /// ```
    pub fn new(word: &str) -> Result<Self, InitError> {
        Self::from_bytes(word.as_bytes()).ok_or_else(|| InitError::InvalidTypeWord(word.into()))
    }

    /// Creates a type-word from a byte slice, `None` unless it is exactly three
    /// ASCII alphanumeric bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let word: [u8; TYPE_WORD_LENGTH] = bytes.try_into().ok()?;
        word.iter()
            .all(u8::is_ascii_alphanumeric)
            .then_some(TypeWord(word))
    }

    /// Extracts the type-word of a raw sentence, skipping the start marker and the
    /// talker id: `$GPGGA,...` gives `GGA`.
    pub fn of_sentence(raw: &[u8]) -> Option<Self> {
        let start = 1 + TALKER_LENGTH;
        raw.get(start..start + TYPE_WORD_LENGTH)
            .and_then(Self::from_bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for TypeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TypeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeWord({})", self.as_str())
    }
}

/// Calculates the NMEA 0183 checksum: the XOR of every byte between the `$` and
/// the `*` delimiter.
///
/// ```rust
/// use nmea0183_stream::sentence::checksum;
///
/// assert_eq!(checksum("GPGGA,123456,data"), 0x41);
/// ```
pub fn checksum(data: &str) -> u8 {
    data.as_bytes()
        .iter()
        .fold(0u8, |accumulated_xor, &byte| accumulated_xor ^ byte)
}

/// Splits sentence text (without the `$`) into its data part and the checksum
/// found after `*`, if any. A trailing `\r\n` is ignored.
///
/// ```rust
/// use nmea0183_stream::sentence::split_checksum;
///
/// assert_eq!(split_checksum("GPGGA,data*6A\r\n"), Ok(("GPGGA,data", Some(0x6A))));
/// assert_eq!(split_checksum("GPGGA,data\r\n"), Ok(("GPGGA,data", None)));
/// assert!(split_checksum("GPGGA,data*6\r\n").is_err());
/// ```
pub fn split_checksum(text: &str) -> Result<(&str, Option<u8>), MalformedSentence> {
    let text = text.strip_suffix("\r\n").unwrap_or(text);

    let split: IResult<&str, &str> = alt((take_until("*"), rest)).parse(text);
    let (cc, data) = split.map_err(|_| MalformedSentence::Header)?;

    if cc.is_empty() {
        return Ok((data, None));
    }

    let found: IResult<&str, u8> = all_consuming(preceded(
        char('*'),
        map_res(
            take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
            |hex| u8::from_str_radix(hex, 16),
        ),
    ))
    .parse(cc);
    let (_, found) = found.map_err(|_| MalformedSentence::Checksum)?;

    Ok((data, Some(found)))
}

/// The fields of a sentence, split on `,`.
///
/// ```rust
/// use nmea0183_stream::sentence::Fields;
///
/// let fields = Fields::split("GPGLL,4916.45,N,12311.12,W,225444,A*31\r\n", 16).unwrap();
/// assert_eq!(fields.talker(), "GP");
/// assert_eq!(fields.type_word(), "GLL");
/// assert_eq!(fields.len(), 6);
/// assert_eq!(fields.get(1), "N");
/// assert_eq!(fields.checksum(), Some(0x31));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Fields<'a> {
    talker: &'a str,
    type_word: &'a str,
    values: heapless::Vec<&'a str, MAX_FIELDS>,
    checksum: Option<u8>,
    calculated: u8,
}

impl<'a> Fields<'a> {
    /// Splits sentence text (without the `$`, with or without the terminator).
    ///
    /// At most `max_fields` values are accepted, and never more than [`MAX_FIELDS`].
    pub fn split(text: &'a str, max_fields: usize) -> Result<Self, MalformedSentence> {
        if !text.is_ascii() {
            return Err(MalformedSentence::NonAscii);
        }

        let (data, checksum) = split_checksum(text)?;
        let calculated = self::checksum(data);

        let header: IResult<&str, (&str, &str)> = (
            verify(take(TALKER_LENGTH), |t: &str| {
                t.bytes().all(|b| b.is_ascii_alphanumeric())
            }),
            verify(take(TYPE_WORD_LENGTH), |w: &str| {
                w.bytes().all(|b| b.is_ascii_alphanumeric())
            }),
        )
            .parse(data);
        let (body, (talker, type_word)) = header.map_err(|_| MalformedSentence::Header)?;

        let max = max_fields.min(MAX_FIELDS);
        let mut values = heapless::Vec::new();

        if !body.is_empty() {
            let body = body.strip_prefix(',').ok_or(MalformedSentence::Header)?;
            for value in body.split(',') {
                if values.len() == max {
                    return Err(MalformedSentence::TooManyFields { max });
                }
                values
                    .push(value)
                    .map_err(|_| MalformedSentence::TooManyFields { max })?;
            }
        }

        Ok(Fields {
            talker,
            type_word,
            values,
            checksum,
            calculated,
        })
    }

    pub fn talker(&self) -> &'a str {
        self.talker
    }

    pub fn type_word(&self) -> &'a str {
        self.type_word
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `index`, or an empty field past the end.
    pub fn get(&self, index: usize) -> &'a str {
        self.values.get(index).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.values.iter().copied()
    }

    /// Fails with [`MalformedSentence::FieldCount`] unless at least `min` fields exist.
    pub fn require(&self, min: usize) -> Result<(), MalformedSentence> {
        if self.values.len() < min {
            return Err(MalformedSentence::FieldCount {
                found: self.values.len(),
                min,
            });
        }
        Ok(())
    }

    /// Checksum found in the sentence.
    pub fn checksum(&self) -> Option<u8> {
        self.checksum
    }

    /// Checksum calculated from the sentence content.
    pub fn calculated_checksum(&self) -> u8 {
        self.calculated
    }
}
