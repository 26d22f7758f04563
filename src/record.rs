//! # Parsed Records
//!
//! The output of a successful dispatch: a common header (sentence type and
//! error count) followed by the sentence specific data.

use std::any::Any;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{error::FieldError, sentence::SentenceType};

#[cfg(feature = "sentences")]
use crate::sentences::{Gga, Gll};

/// Sentence specific data of a [`ParsedRecord`].
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug)]
pub enum SentenceData {
    #[cfg(feature = "sentences")]
    /// Global Positioning System Fix Data
    Gga(Gga),
    #[cfg(feature = "sentences")]
    /// Geographic Position - Latitude/Longitude
    Gll(Gll),
    /// Data of a module supplied by the application
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    Custom(Box<dyn Any + Send + Sync>),
}

/// A parsed sentence.
///
/// Every record carries its [`SentenceType`] and the number of fields that could
/// not be parsed. A record with a positive error count is still usable: only the
/// offending fields are missing.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug)]
pub struct ParsedRecord {
    sentence_type: SentenceType,
    errors: u32,
    data: SentenceData,
}

impl ParsedRecord {
    pub fn new(sentence_type: SentenceType, data: SentenceData) -> Self {
        ParsedRecord {
            sentence_type,
            errors: 0,
            data,
        }
    }

    pub fn sentence_type(&self) -> SentenceType {
        self.sentence_type
    }

    /// Number of fields that could not be parsed.
    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn data(&self) -> &SentenceData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut SentenceData {
        &mut self.data
    }

    pub fn into_data(self) -> SentenceData {
        self.data
    }

    /// Counts a field that could not be parsed.
    pub fn record_field_error(&mut self, index: usize, error: &FieldError) {
        self.errors = self.errors.saturating_add(1);
        tracing::debug!(
            sentence_type = ?self.sentence_type,
            field = index,
            %error,
            "field parse warning"
        );
    }

    /// Resets the error count, as part of setting defaults.
    pub fn clear_errors(&mut self) {
        self.errors = 0;
    }

    /// Returns the data of a module supplied by the application.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.data {
            SentenceData::Custom(data) => data.downcast_ref(),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match &mut self.data {
            SentenceData::Custom(data) => data.downcast_mut(),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[cfg(feature = "sentences")]
    pub fn as_gga(&self) -> Option<&Gga> {
        match &self.data {
            SentenceData::Gga(gga) => Some(gga),
            _ => None,
        }
    }

    #[cfg(feature = "sentences")]
    pub fn as_gll(&self) -> Option<&Gll> {
        match &self.data {
            SentenceData::Gll(gll) => Some(gll),
            _ => None,
        }
    }
}
