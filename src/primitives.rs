//! # Primitive Field Parsers
//!
//! Stateless conversions of single sentence fields into typed values, shared by
//! every sentence parser module.

use nom::{
    IResult, Parser,
    bytes::complete::take_while_m_n,
    character::complete::{char, digit0, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    sequence::preceded,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Number of minute digits preceding the decimal point of a position field.
const MINUTE_DIGITS: usize = 2;

/// Length of a `HHMMSS` time field.
const TIME_LENGTH: usize = 6;

/// Compass direction qualifying a position component.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    South,
    East,
    West,
    #[default]
    Unknown,
}

impl Cardinal {
    /// The letter used on the wire, `None` for [`Cardinal::Unknown`].
    pub fn as_char(&self) -> Option<char> {
        match self {
            Cardinal::North => Some('N'),
            Cardinal::South => Some('S'),
            Cardinal::East => Some('E'),
            Cardinal::West => Some('W'),
            Cardinal::Unknown => None,
        }
    }
}

/// A latitude or longitude as found on the wire: whole degrees and decimal minutes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Position {
    pub degrees: u8,
    pub minutes: f64,
    pub cardinal: Cardinal,
}

impl Position {
    /// Returns the position with its cardinal direction set.
    pub fn with_cardinal(self, cardinal: Cardinal) -> Self {
        Position { cardinal, ..self }
    }

    /// Signed decimal degrees, negative towards south and west.
    ///
    /// Returns `None` when the cardinal direction is unknown.
    ///
    /// ```rust
    /// use nmea0183_stream::primitives::{Cardinal, parse_position};
    ///
    /// let lon = parse_position("12311.12").unwrap().with_cardinal(Cardinal::West);
    /// let degrees = lon.to_decimal_degrees().unwrap();
    /// assert!((degrees + 123.1853).abs() < 1e-4);
    /// ```
    pub fn to_decimal_degrees(&self) -> Option<f64> {
        let value = self.degrees as f64 + self.minutes / 60.0;
        match self.cardinal {
            Cardinal::North | Cardinal::East => Some(value),
            Cardinal::South | Cardinal::West => Some(-value),
            Cardinal::Unknown => None,
        }
    }
}

/// Parses a `DDMM.MMMM` or `DDDMM.MMMM` position field.
///
/// All integer digits but the last two are degrees; the remainder, including the
/// fraction, is minutes. The returned position has an unknown cardinal.
///
/// Degrees are only bounded by 180, the longitude range; the axis is not known
/// here, so bounding latitudes is left to the caller.
///
/// ```rust
/// use nmea0183_stream::primitives::parse_position;
///
/// let lat = parse_position("4712.55").unwrap();
/// assert_eq!(lat.degrees, 47);
/// assert_eq!(lat.minutes, 12.55);
///
/// assert!(parse_position("").is_err());
/// assert!(parse_position("12.5").is_err());
/// ```
pub fn parse_position(text: &str) -> Result<Position, FieldError> {
    if text.is_empty() {
        return Err(FieldError::Empty);
    }

    let parsed: IResult<&str, (&str, Option<&str>)> =
        all_consuming((digit1, opt(recognize(preceded(char('.'), digit0))))).parse(text);
    let (_, (whole, _)) = parsed.map_err(|_| FieldError::Invalid(text.into()))?;

    let degree_digits = whole.len().saturating_sub(MINUTE_DIGITS);
    match degree_digits {
        0 | 1 => return Err(FieldError::TooShort),
        2 | 3 => {}
        _ => return Err(FieldError::Invalid(text.into())),
    }

    let (degrees, minutes) = text.split_at(degree_digits);
    let degrees: u8 = degrees
        .parse()
        .map_err(|_| FieldError::OutOfRange(text.into()))?;
    let minutes: f64 = minutes
        .parse()
        .map_err(|_| FieldError::Invalid(text.into()))?;

    if degrees > 180 || minutes >= 60.0 {
        return Err(FieldError::OutOfRange(text.into()));
    }

    Ok(Position {
        degrees,
        minutes,
        cardinal: Cardinal::Unknown,
    })
}

/// Parses a cardinal direction letter.
///
/// Only a single `N`, `S`, `E` or `W` is recognized; anything else yields
/// [`Cardinal::Unknown`].
///
/// ```rust
/// use nmea0183_stream::primitives::{Cardinal, parse_cardinal};
///
/// assert_eq!(parse_cardinal("N"), Cardinal::North);
/// assert_eq!(parse_cardinal("n"), Cardinal::Unknown);
/// ```
pub fn parse_cardinal(text: &str) -> Cardinal {
    match text {
        "N" => Cardinal::North,
        "S" => Cardinal::South,
        "E" => Cardinal::East,
        "W" => Cardinal::West,
        _ => Cardinal::Unknown,
    }
}

/// Parses a `HHMMSS` time of day field.
///
/// The field must be exactly six digits. No date is attached.
///
/// ```rust
/// use nmea0183_stream::primitives::parse_time;
///
/// let time = parse_time("235959").unwrap();
/// assert_eq!(time.as_hms(), (23, 59, 59));
///
/// assert!(parse_time("12345").is_err());
/// ```
pub fn parse_time(text: &str) -> Result<time::Time, FieldError> {
    if text.len() != TIME_LENGTH {
        return Err(FieldError::Length {
            expected: TIME_LENGTH,
            found: text.len(),
        });
    }

    let parsed: IResult<&str, (u8, u8, u8)> =
        all_consuming((two_digits, two_digits, two_digits)).parse(text);
    let (_, (hour, minute, second)) = parsed.map_err(|_| FieldError::Invalid(text.into()))?;

    time::Time::from_hms(hour, minute, second).map_err(|_| FieldError::OutOfRange(text.into()))
}

fn two_digits(i: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), |digits: &str| {
        digits.parse::<u8>()
    })
    .parse(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        let lat = parse_position("4916.45").unwrap();
        assert_eq!((lat.degrees, lat.minutes), (49, 16.45));
        assert_eq!(lat.cardinal, Cardinal::Unknown);

        let lon = parse_position("12311.12").unwrap();
        assert_eq!((lon.degrees, lon.minutes), (123, 11.12));

        let lon = parse_position("00833.915").unwrap();
        assert_eq!((lon.degrees, lon.minutes), (8, 33.915));

        let whole = parse_position("4807").unwrap();
        assert_eq!((whole.degrees, whole.minutes), (48, 7.0));

        let trailing_dot = parse_position("4807.").unwrap();
        assert_eq!((trailing_dot.degrees, trailing_dot.minutes), (48, 7.0));
    }

    #[test]
    fn test_parse_position_errors() {
        assert_eq!(parse_position(""), Err(FieldError::Empty));
        assert_eq!(parse_position("123.4"), Err(FieldError::TooShort));
        assert_eq!(parse_position("12"), Err(FieldError::TooShort));
        assert_eq!(
            parse_position("abc"),
            Err(FieldError::Invalid("abc".into()))
        );
        assert_eq!(
            parse_position("49.16.45"),
            Err(FieldError::Invalid("49.16.45".into()))
        );
        assert_eq!(
            parse_position("-4916.45"),
            Err(FieldError::Invalid("-4916.45".into()))
        );
        assert_eq!(
            parse_position("1234567.8"),
            Err(FieldError::Invalid("1234567.8".into()))
        );
        assert_eq!(
            parse_position("4975.00"),
            Err(FieldError::OutOfRange("4975.00".into()))
        );
        assert_eq!(
            parse_position("99900.00"),
            Err(FieldError::OutOfRange("99900.00".into()))
        );
    }

    #[test]
    fn test_decimal_degrees() {
        let pos = Position {
            degrees: 48,
            minutes: 30.0,
            cardinal: Cardinal::South,
        };
        assert_eq!(pos.to_decimal_degrees(), Some(-48.5));
        assert_eq!(
            pos.with_cardinal(Cardinal::North).to_decimal_degrees(),
            Some(48.5)
        );
        assert_eq!(
            pos.with_cardinal(Cardinal::Unknown).to_decimal_degrees(),
            None
        );
    }

    #[test]
    fn test_parse_cardinal() {
        assert_eq!(parse_cardinal("N"), Cardinal::North);
        assert_eq!(parse_cardinal("S"), Cardinal::South);
        assert_eq!(parse_cardinal("E"), Cardinal::East);
        assert_eq!(parse_cardinal("W"), Cardinal::West);

        for text in ["", "X", "s", "NE", " N"] {
            assert_eq!(parse_cardinal(text), Cardinal::Unknown, "{text:?}");
        }

        assert_eq!(Cardinal::West.as_char(), Some('W'));
        assert_eq!(Cardinal::Unknown.as_char(), None);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("235959").unwrap().as_hms(), (23, 59, 59));
        assert_eq!(parse_time("000000").unwrap().as_hms(), (0, 0, 0));
        assert_eq!(parse_time("225444").unwrap().as_hms(), (22, 54, 44));
    }

    #[test]
    fn test_parse_time_errors() {
        assert_eq!(
            parse_time("12345"),
            Err(FieldError::Length {
                expected: 6,
                found: 5
            })
        );
        assert_eq!(
            parse_time("123456.00"),
            Err(FieldError::Length {
                expected: 6,
                found: 9
            })
        );
        assert_eq!(parse_time("12a456"), Err(FieldError::Invalid("12a456".into())));
        assert_eq!(parse_time("+12345"), Err(FieldError::Invalid("+12345".into())));
        assert_eq!(
            parse_time("246000"),
            Err(FieldError::OutOfRange("246000".into()))
        );
        assert_eq!(
            parse_time("236000"),
            Err(FieldError::OutOfRange("236000".into()))
        );
    }
}
