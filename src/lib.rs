//! # NMEA 0183 Stream Parser
//!
//! This library recovers NMEA 0183 sentences of the form
//! `$TTWWW,D1,D2,...,Dn*CC\r\n` from a continuous byte stream and parses them into
//! typed records through a registry of pluggable parser modules.
//!
//! The pipeline is:
//! - a [`Framer`] that finds sentence boundaries in arbitrarily chunked input;
//! - a [`Registry`] that maps a three character type-word (`GGA`, `GLL`, ...) to a
//!   [`SentenceParser`] module;
//! - a [`Dispatcher`] that routes each sentence to its module and returns a
//!   [`ParsedRecord`].
//!
//! [`StreamDecoder`] and [`SentenceReader`] join the three together.
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "sentences")] {
//! use nmea0183_stream::{Dispatcher, Registry, SentenceData, StreamDecoder};
//!
//! let registry = Registry::builtin().unwrap();
//! let mut decoder = StreamDecoder::new(Dispatcher::new(&registry));
//!
//! for chunk in [&b"$GPGGA,123519,4807.038,N,01131.0"[..], b"00,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n"] {
//!     for outcome in decoder.decode(chunk) {
//!         match outcome.map(|record| record.into_data()) {
//!             Ok(SentenceData::Gga(gga)) => {
//!                 assert_eq!(gga.satellite_count, Some(8));
//!                 assert_eq!(gga.altitude, Some(545.4));
//!             }
//!             Ok(other) => panic!("unexpected record {other:?}"),
//!             Err(error) => panic!("{error}"),
//!         }
//!     }
//! }
//! # }
//! ```
//!
//! ## Features
//!
//! - `sentences` (default): the built-in GGA and GLL modules.
//! - `serde`: `Serialize`/`Deserialize` for the record types.

pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod framer;
pub mod module;
pub mod primitives;
pub mod reader;
pub mod record;
pub mod registry;
pub mod sentence;
#[cfg(feature = "sentences")]
pub mod sentences;

pub use decoder::{DecodeStats, StreamDecoder};
pub use dispatch::{ChecksumMode, Dispatcher};
pub use error::{
    BindError, DiscoveryError, DispatchError, FieldError, InitError, MalformedSentence,
    ReadError, RegisterError, RegistryError,
};
pub use framer::{Framer, FramerConfig, FramerState, RawSentence};
pub use module::{ParserModule, Registration, SentenceParser};
pub use primitives::{Cardinal, Position, parse_cardinal, parse_position, parse_time};
pub use reader::SentenceReader;
pub use record::{ParsedRecord, SentenceData};
pub use registry::{
    DirectorySource, ModuleCatalog, ModuleDescriptor, ModuleSource, Registry, RegistryConfig,
    StaticSource,
};
pub use sentence::{SentenceType, TypeWord};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;
