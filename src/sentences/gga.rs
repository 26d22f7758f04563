#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Quality, coordinate, decimal, field, fix_time, unit, unsigned};
use crate::{
    error::{InitError, MalformedSentence},
    module::{Registration, SentenceParser},
    primitives::{Cardinal, Position},
    record::{ParsedRecord, SentenceData},
    sentence::{Fields, SentenceType},
};

/// Fields up to and including the altitude unit must be present.
const MIN_FIELDS: usize = 10;

/// GGA - Global Positioning System Fix Data
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gga_global_positioning_system_fix_data>
///
/// ```text
///                                                      11
///         1         2       3 4        5 6 7  8   9  10 |  12 13  14
///         |         |       | |        | | |  |   |   | |   | |   |
///  $--GGA,hhmmss.ss,ddmm.mm,a,dddmm.mm,a,x,xx,x.x,x.x,M,x.x,M,x.x,xxxx*hh<CR><LF>
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Gga {
    /// Fix time in UTC
    pub time: Option<time::Time>,
    pub latitude: Option<Position>,
    pub longitude: Option<Position>,
    /// GPS Quality Indicator
    pub fix_quality: Option<Quality>,
    /// Number of satellites in use
    pub satellite_count: Option<u8>,
    /// Horizontal Dilution of Precision
    pub hdop: Option<f32>,
    /// Altitude above/below mean sea level (geoid)
    pub altitude: Option<f32>,
    pub altitude_unit: Option<char>,
    /// Difference between the WGS-84 earth ellipsoid and mean sea level (geoid)
    pub geoidal_separation: Option<f32>,
}

/// Parser module for GGA sentences.
#[derive(Debug, Default)]
pub struct GgaParser;

impl SentenceParser for GgaParser {
    fn init(&mut self, registration: &mut Registration) -> Result<(), InitError> {
        registration.declare(SentenceType::Gga, "GGA")
    }

    fn allocate(&self) -> ParsedRecord {
        ParsedRecord::new(SentenceType::Gga, SentenceData::Gga(Gga::default()))
    }

    fn set_default(&self, record: &mut ParsedRecord) {
        record.clear_errors();
        if let SentenceData::Gga(gga) = record.data_mut() {
            *gga = Gga::default();
        }
    }

    fn parse(
        &self,
        record: &mut ParsedRecord,
        text: &str,
        max_fields: usize,
    ) -> Result<(), MalformedSentence> {
        if record.as_gga().is_none() {
            return Err(MalformedSentence::TypeMismatch);
        }

        let fields = Fields::split(text, max_fields)?;
        fields.require(MIN_FIELDS)?;

        let parsed = Gga {
            time: field(record, &fields, 0, fix_time),
            latitude: coordinate(record, &fields, 1, [Cardinal::North, Cardinal::South]),
            longitude: coordinate(record, &fields, 3, [Cardinal::East, Cardinal::West]),
            fix_quality: field(record, &fields, 5, Quality::parse_field),
            satellite_count: field(record, &fields, 6, unsigned),
            hdop: field(record, &fields, 7, decimal),
            altitude: field(record, &fields, 8, decimal),
            altitude_unit: field(record, &fields, 9, unit),
            geoidal_separation: field(record, &fields, 10, decimal),
        };

        if let SentenceData::Gga(gga) = record.data_mut() {
            *gga = parsed;
        }

        Ok(())
    }
}
