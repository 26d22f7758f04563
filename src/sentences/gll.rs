#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{FaaMode, Status, coordinate, field, fix_time};
use crate::{
    error::{InitError, MalformedSentence},
    module::{Registration, SentenceParser},
    primitives::{Cardinal, Position},
    record::{ParsedRecord, SentenceData},
    sentence::{Fields, SentenceType},
};

/// Latitude and longitude with their cardinals must be present.
const MIN_FIELDS: usize = 4;

/// GLL - Geographic Position - Latitude/Longitude
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gll_geographic_position_latitudelongitude>
///
/// ```text
///         1       2 3        4 5         6 7
///         |       | |        | |         | |
///  $--GLL,ddmm.mm,a,dddmm.mm,a,hhmmss.ss,a,m*hh<CR><LF>
/// ```
///
/// Fields 5 to 7 are missing from sentences of older receivers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Gll {
    pub latitude: Option<Position>,
    pub longitude: Option<Position>,
    /// Fix time in UTC
    pub time: Option<time::Time>,
    /// Status Mode Indicator
    pub status: Option<Status>,
    /// FAA Mode Indicator
    pub faa_mode: Option<FaaMode>,
}

/// Parser module for GLL sentences.
#[derive(Debug, Default)]
pub struct GllParser;

impl SentenceParser for GllParser {
    fn init(&mut self, registration: &mut Registration) -> Result<(), InitError> {
        registration.declare(SentenceType::Gll, "GLL")
    }

    fn allocate(&self) -> ParsedRecord {
        ParsedRecord::new(SentenceType::Gll, SentenceData::Gll(Gll::default()))
    }

    fn set_default(&self, record: &mut ParsedRecord) {
        record.clear_errors();
        if let SentenceData::Gll(gll) = record.data_mut() {
            *gll = Gll::default();
        }
    }

    fn parse(
        &self,
        record: &mut ParsedRecord,
        text: &str,
        max_fields: usize,
    ) -> Result<(), MalformedSentence> {
        if record.as_gll().is_none() {
            return Err(MalformedSentence::TypeMismatch);
        }

        let fields = Fields::split(text, max_fields)?;
        fields.require(MIN_FIELDS)?;

        let parsed = Gll {
            latitude: coordinate(record, &fields, 0, [Cardinal::North, Cardinal::South]),
            longitude: coordinate(record, &fields, 2, [Cardinal::East, Cardinal::West]),
            time: field(record, &fields, 4, fix_time),
            status: field(record, &fields, 5, Status::parse_field),
            faa_mode: field(record, &fields, 6, FaaMode::parse_field),
        };

        if let SentenceData::Gll(gll) = record.data_mut() {
            *gll = parsed;
        }

        Ok(())
    }
}
