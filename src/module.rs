//! # Parser Modules
//!
//! A parser module handles exactly one sentence type. It is the unit the
//! [`Registry`](crate::Registry) binds, initializes and dispatches to.
//!
//! ## Implementing a module
//!
//! ```rust
//! use nmea0183_stream::{
//!     InitError, MalformedSentence, ParsedRecord, Registration, SentenceData,
//!     SentenceParser, SentenceType,
//!     sentence::Fields,
//! };
//!
//! #[derive(Debug, Default)]
//! struct Depth {
//!     meters: Option<f32>,
//! }
//!
//! struct DptParser;
//!
//! impl SentenceParser for DptParser {
//!     fn init(&mut self, registration: &mut Registration) -> Result<(), InitError> {
//!         registration.declare(SentenceType::Custom(1), "DPT")
//!     }
//!
//!     fn allocate(&self) -> ParsedRecord {
//!         ParsedRecord::new(
//!             SentenceType::Custom(1),
//!             SentenceData::Custom(Box::new(Depth::default())),
//!         )
//!     }
//!
//!     fn set_default(&self, record: &mut ParsedRecord) {
//!         record.clear_errors();
//!         if let Some(depth) = record.downcast_mut::<Depth>() {
//!             *depth = Depth::default();
//!         }
//!     }
//!
//!     fn parse(
//!         &self,
//!         record: &mut ParsedRecord,
//!         text: &str,
//!         max_fields: usize,
//!     ) -> Result<(), MalformedSentence> {
//!         let fields = Fields::split(text, max_fields)?;
//!         fields.require(2)?;
//!
//!         let meters = fields.get(0).parse::<f32>().ok();
//!         if meters.is_none() {
//!             record.record_field_error(0, &nmea0183_stream::FieldError::Invalid(fields.get(0).into()));
//!         }
//!
//!         let depth = record
//!             .downcast_mut::<Depth>()
//!             .ok_or(MalformedSentence::TypeMismatch)?;
//!         depth.meters = meters;
//!         Ok(())
//!     }
//! }
//! ```

use std::fmt;

use crate::{
    error::{InitError, MalformedSentence},
    record::ParsedRecord,
    sentence::{SentenceType, TypeWord},
};

/// The four operations every parser module provides, plus its one-time
/// initialization.
///
/// Records are paired with the module that allocated them: a record is only ever
/// handed back to the module that produced it.
pub trait SentenceParser: Send + Sync {
    /// One-time initialization. The module must declare its sentence type and
    /// type-word through `registration`.
    fn init(&mut self, registration: &mut Registration) -> Result<(), InitError>;

    /// Allocates an empty record of the module's sentence type.
    fn allocate(&self) -> ParsedRecord;

    /// Resets every field of `record` to its default value.
    fn set_default(&self, record: &mut ParsedRecord);

    /// Parses sentence `text` into `record`.
    ///
    /// `text` starts after the `$` and includes the terminator. At most
    /// `max_fields` fields may be accepted. A field that cannot be parsed is
    /// reported with [`ParsedRecord::record_field_error`]; an error is returned
    /// only when the sentence as a whole cannot be parsed.
    fn parse(
        &self,
        record: &mut ParsedRecord,
        text: &str,
        max_fields: usize,
    ) -> Result<(), MalformedSentence>;

    /// Releases a record allocated by this module.
    fn free(&self, record: ParsedRecord) {
        drop(record);
    }
}

/// Handle passed to [`SentenceParser::init`], through which a module declares
/// what it parses.
#[derive(Debug, Default)]
pub struct Registration {
    declared: Option<(SentenceType, TypeWord)>,
}

impl Registration {
    pub(crate) fn new() -> Self {
        Registration::default()
    }

    /// Declares the sentence type and type-word handled by the module.
    pub fn declare(&mut self, sentence_type: SentenceType, type_word: &str) -> Result<(), InitError> {
        if self.declared.is_some() {
            return Err(InitError::AlreadyDeclared);
        }

        self.declared = Some((sentence_type, TypeWord::new(type_word)?));
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<(SentenceType, TypeWord), InitError> {
        self.declared.ok_or(InitError::Undeclared)
    }
}

/// A bound and initialized parser module, owned by the registry.
pub struct ParserModule {
    name: String,
    sentence_type: SentenceType,
    type_word: TypeWord,
    parser: Box<dyn SentenceParser>,
}

impl ParserModule {
    /// Runs the module's initialization and wraps it.
    pub(crate) fn init(name: String, mut parser: Box<dyn SentenceParser>) -> Result<Self, InitError> {
        let mut registration = Registration::new();
        parser.init(&mut registration)?;
        let (sentence_type, type_word) = registration.finish()?;

        Ok(ParserModule {
            name,
            sentence_type,
            type_word,
            parser,
        })
    }

    /// Name the module was discovered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sentence_type(&self) -> SentenceType {
        self.sentence_type
    }

    pub fn type_word(&self) -> TypeWord {
        self.type_word
    }

    pub fn allocate(&self) -> ParsedRecord {
        self.parser.allocate()
    }

    pub fn set_default(&self, record: &mut ParsedRecord) {
        self.parser.set_default(record)
    }

    pub fn parse(
        &self,
        record: &mut ParsedRecord,
        text: &str,
        max_fields: usize,
    ) -> Result<(), MalformedSentence> {
        self.parser.parse(record, text, max_fields)
    }

    pub fn free(&self, record: ParsedRecord) {
        self.parser.free(record)
    }
}

impl fmt::Debug for ParserModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserModule")
            .field("name", &self.name)
            .field("sentence_type", &self.sentence_type)
            .field("type_word", &self.type_word)
            .finish_non_exhaustive()
    }
}
