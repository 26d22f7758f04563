//! # Built-in Sentence Modules
//!
//! Parser modules for the sentence types shipped with the crate.
//!
//! | Module  | Type-word | Record  | Sentence                                 |
//! |---------|-----------|---------|------------------------------------------|
//! | `gpgga` | `GGA`     | [`Gga`] | Global Positioning System Fix Data       |
//! | `gpgll` | `GLL`     | [`Gll`] | Geographic Position - Latitude/Longitude |
//!
//! Empty fields are left unset. A field that is present but cannot be parsed is
//! left unset and counted in the record's error count.

mod gga;
mod gll;

pub use gga::{Gga, GgaParser};
pub use gll::{Gll, GllParser};

use nom::{
    IResult, Parser,
    bytes::complete::take_till,
    character::complete::{char, digit1},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::preceded,
};

use crate::{
    error::FieldError,
    primitives::{Cardinal, Position, parse_cardinal, parse_position, parse_time},
    record::ParsedRecord,
    sentence::Fields,
};

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $char:literal => $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Parses a single character field.
            pub fn parse_field(text: &str) -> Result<Self, FieldError> {
                let parsed: IResult<&str, Self> = all_consuming(nom::branch::alt(($(
                    nom::character::complete::char($char).map(|_| Self::$variant),
                )*)))
                .parse(text);

                parsed
                    .map(|(_, value)| value)
                    .map_err(|_| FieldError::Invalid(text.into()))
            }
        }
    };
}

field_enum! {
    /// Status Mode Indicator
    pub enum Status {
        /// A - Valid
        'A' => Valid,
        /// V - Invalid
        'V' => Invalid,
    }
}

field_enum! {
    /// Quality of the GPS fix
    pub enum Quality {
        /// 0 - Fix not available
        '0' => NoFix,
        /// 1 - GPS fix
        '1' => GPSFix,
        /// 2 - Differential GPS fix
        '2' => DGPSFix,
        /// 3 - PPS fix
        '3' => PPSFix,
        /// 4 - Real Time Kinematic
        '4' => RTK,
        /// 5 - Float RTK
        '5' => FloatRTK,
        /// 6 - estimated (dead reckoning)
        '6' => Estimated,
        /// 7 - Manual input mode
        '7' => Manual,
        /// 8 - Simulation mode
        '8' => Simulation,
    }
}

field_enum! {
    /// FAA Mode Indicator
    ///
    /// <https://gpsd.gitlab.io/gpsd/NMEA.html#_sentence_mixes_and_nmea_variations>
    pub enum FaaMode {
        /// A - Autonomous mode
        'A' => Autonomous,
        /// D - Differential Mode
        'D' => Differential,
        /// E - Estimated (dead-reckoning) mode
        'E' => Estimated,
        /// F - RTK Float mode
        'F' => FloatRtk,
        /// M - Manual Input Mode
        'M' => Manual,
        /// N - Data Not Valid
        'N' => DataNotValid,
        /// P - Precise
        'P' => Precise,
        /// R - RTK Integer mode
        'R' => FixedRtk,
        /// S - Simulated Mode
        'S' => Simulator,
    }
}

/// Parses the field at `index`. Empty fields give `None`; fields that fail to
/// parse give `None` and are counted on the record.
fn field<T>(
    record: &mut ParsedRecord,
    fields: &Fields<'_>,
    index: usize,
    parser: impl FnOnce(&str) -> Result<T, FieldError>,
) -> Option<T> {
    let value = fields.get(index);
    if value.is_empty() {
        return None;
    }

    match parser(value) {
        Ok(value) => Some(value),
        Err(error) => {
            record.record_field_error(index, &error);
            None
        }
    }
}

/// Parses a position at `index` qualified by the cardinal at `index + 1`.
///
/// Latitudes past 90 degrees are out of range. An unrecognized cardinal letter
/// is counted but keeps the position.
fn coordinate(
    record: &mut ParsedRecord,
    fields: &Fields<'_>,
    index: usize,
    axis: [Cardinal; 2],
) -> Option<Position> {
    let limit = if axis.contains(&Cardinal::North) {
        MAX_LATITUDE
    } else {
        MAX_LONGITUDE
    };

    let position = field(record, fields, index, |text| {
        let position = parse_position(text)?;
        if f64::from(position.degrees) + position.minutes / 60.0 > limit {
            return Err(FieldError::OutOfRange(text.into()));
        }
        Ok(position)
    })?;

    let letter = fields.get(index + 1);
    let cardinal = parse_cardinal(letter);
    if !letter.is_empty() && !axis.contains(&cardinal) {
        record.record_field_error(index + 1, &FieldError::Invalid(letter.into()));
        return Some(position);
    }

    Some(position.with_cardinal(cardinal))
}

/// Parses a `hhmmss` or `hhmmss.ss` time field; fractional seconds are checked
/// and dropped.
fn fix_time(text: &str) -> Result<time::Time, FieldError> {
    let parsed: IResult<&str, (&str, Option<&str>)> = all_consuming((
        take_till(|c: char| c == '.'),
        opt(preceded(char('.'), digit1)),
    ))
    .parse(text);
    let (_, (whole, _)) = parsed.map_err(|_| FieldError::Invalid(text.into()))?;

    parse_time(whole)
}

fn decimal(text: &str) -> Result<f32, FieldError> {
    let parsed: IResult<&str, f32> = all_consuming(float).parse(text);
    parsed
        .map(|(_, value)| value)
        .map_err(|_| FieldError::Invalid(text.into()))
}

fn unsigned(text: &str) -> Result<u8, FieldError> {
    let parsed: IResult<&str, u8> = all_consuming(nom::character::complete::u8).parse(text);
    parsed
        .map(|(_, value)| value)
        .map_err(|_| FieldError::Invalid(text.into()))
}

fn unit(text: &str) -> Result<char, FieldError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(unit), None) if unit.is_ascii_alphabetic() => Ok(unit),
        _ => Err(FieldError::Invalid(text.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(Status::parse_field("A"), Ok(Status::Valid));
        assert_eq!(Status::parse_field("V"), Ok(Status::Invalid));
        assert!(Status::parse_field("K").is_err());
        assert!(Status::parse_field("AV").is_err());
    }

    #[test]
    fn test_quality() {
        assert_eq!(Quality::parse_field("0"), Ok(Quality::NoFix));
        assert_eq!(Quality::parse_field("1"), Ok(Quality::GPSFix));
        assert_eq!(Quality::parse_field("2"), Ok(Quality::DGPSFix));
        assert_eq!(Quality::parse_field("8"), Ok(Quality::Simulation));
        assert!(Quality::parse_field("9").is_err());
    }

    #[test]
    fn test_faa_mode() {
        assert_eq!(FaaMode::parse_field("A"), Ok(FaaMode::Autonomous));
        assert_eq!(FaaMode::parse_field("N"), Ok(FaaMode::DataNotValid));
        assert_eq!(
            FaaMode::parse_field("X"),
            Err(FieldError::Invalid("X".into()))
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decimal("545.4"), Ok(545.4));
        assert_eq!(decimal("-21.3"), Ok(-21.3));
        assert!(decimal("5x").is_err());
        assert_eq!(unsigned("08"), Ok(8));
        assert!(unsigned("A8").is_err());
        assert!(unsigned("300").is_err());
        assert_eq!(unit("M"), Ok('M'));
        assert!(unit("MM").is_err());
        assert_eq!(fix_time("001043.00").unwrap().as_hms(), (0, 10, 43));
        assert_eq!(fix_time("001043").unwrap().as_hms(), (0, 10, 43));
        assert!(fix_time("1043.00").is_err());

        for text in ["123519.", "123519.xx", "123519.-5", "123519.5.5", "123519.5 "] {
            assert_eq!(
                fix_time(text),
                Err(FieldError::Invalid(text.into())),
                "Failed: {text:?}"
            );
        }
    }
}
