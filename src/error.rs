//! # Error Types
//!
//! This module defines the error types used throughout the library.
//!
//! Errors fall into two groups:
//! - bootstrap errors ([`RegistryError`], and the per-module [`RegisterError`] it is
//!   built from), which indicate a broken setup;
//! - per-sentence errors ([`DispatchError`], [`MalformedSentence`], [`FieldError`]),
//!   which are always recoverable: the stream keeps being scanned.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::sentence::{SentenceType, TypeWord};

/// A single field could not be converted by one of the primitive parsers.
///
/// Inside a sentence this is a warning: the record's error count is incremented
/// and the remaining fields are still parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is empty.
    #[error("field is empty")]
    Empty,
    /// The field has the wrong number of characters.
    #[error("expected {expected} characters, found {found}")]
    Length { expected: usize, found: usize },
    /// The field has fewer digits than the fixed degree prefix needs.
    #[error("field has too few digits")]
    TooShort,
    /// The field contains characters that are not allowed.
    #[error("invalid field {0:?}")]
    Invalid(String),
    /// The field is numeric but outside of its valid range.
    #[error("field {0:?} is out of range")]
    OutOfRange(String),
}

/// A candidate module could not be bound.
#[derive(Debug, Error)]
pub enum BindError {
    /// No constructor is known under the candidate's name.
    #[error("no parser module named `{0}`")]
    UnknownModule(String),
    /// The candidate could not be opened.
    #[error("cannot open parser module {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A module failed its one-time initialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    /// The module did not declare its sentence type.
    #[error("module did not declare a sentence type")]
    Undeclared,
    /// The module declared its sentence type more than once.
    #[error("module declared a sentence type more than once")]
    AlreadyDeclared,
    /// The declared type-word is not three ASCII alphanumeric characters.
    #[error("invalid type-word {0:?}")]
    InvalidTypeWord(String),
    /// Module specific failure.
    #[error("{0}")]
    Module(String),
}

/// Registration of a single module failed; the module is skipped.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("initialization failed: {0}")]
    Init(#[from] InitError),
    /// Another module already handles this sentence type.
    #[error("sentence type {0:?} is already registered")]
    DuplicateType(SentenceType),
    /// Another module already handles this type-word.
    #[error("type-word {0} is already registered")]
    DuplicateTypeWord(TypeWord),
}

/// Module candidates could not be enumerated.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Registry bootstrap failed. The registry cannot be used.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Zero modules were registered.
    #[error("no parser module could be registered")]
    RegistrationEmpty,
    /// `register_all` was called on a registry that is already populated.
    #[error("registry is already populated, unregister it first")]
    AlreadyRegistered,
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// The sentence is recognized but its structure is broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedSentence {
    /// The provided input contains non-ASCII characters.
    #[error("sentence contains non-ASCII bytes")]
    NonAscii,
    /// The `$`, talker id or type-word is missing or corrupt.
    #[error("corrupt sentence header")]
    Header,
    /// Fewer fields than the sentence type requires.
    #[error("expected at least {min} fields, found {found}")]
    FieldCount { found: usize, min: usize },
    /// More fields than the dispatcher allows.
    #[error("sentence has more than {max} fields")]
    TooManyFields { max: usize },
    /// A checksum is required but the sentence has none.
    #[error("missing checksum")]
    MissingChecksum,
    /// The checksum is present but is not two hexadecimal digits.
    #[error("corrupt checksum")]
    Checksum,
    /// The record handed to the module belongs to another sentence type.
    #[error("record belongs to another sentence type")]
    TypeMismatch,
}

/// Dispatching a single sentence failed. Never fatal to the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No module is registered for the sentence's type-word.
    #[error("unknown sentence type {0:?}")]
    UnknownSentenceType(String),
    #[error("malformed sentence: {0}")]
    Malformed(#[from] MalformedSentence),
    /// The checksum of the sentence was incorrect.
    #[error("checksum mismatch: calculated {expected:02X}, found {found:02X}")]
    ChecksumMismatch {
        /// The checksum calculated from the message content
        expected: u8,
        /// The checksum found in the message
        found: u8,
    },
}

/// An item of [`SentenceReader`](crate::reader::SentenceReader).
#[derive(Debug, Error)]
pub enum ReadError {
    /// Reading the byte source failed. The reader stops.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    /// A single sentence could not be dispatched. Reading continues.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
