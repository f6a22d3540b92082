//! Definition of errors.

use std::error::Error;
use std::fmt;

use crate::common::MAX_NUM_TERMS;

/// A specialized Result type for Cadenza.
pub type Result<T, E = CadenzaError> = std::result::Result<T, E>;

/// The error type for Cadenza.
#[derive(Debug)]
pub enum CadenzaError {
    /// The error variant for [`InvalidArgumentError`].
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    InvalidFormat(InvalidFormatError),

    /// The error variant for [`SourceExhaustedError`].
    SourceExhausted(SourceExhaustedError),

    /// The error variant for [`OrderViolationError`].
    OrderViolation(OrderViolationError),

    /// The error variant for [`LengthExceededError`].
    LengthExceeded(LengthExceededError),

    /// The error variant for [`TryFromIntError`](std::num::TryFromIntError).
    TryFromInt(std::num::TryFromIntError),

    /// The error variant for [`ParseIntError`](std::num::ParseIntError).
    ParseInt(std::num::ParseIntError),

    /// The error variant for [`DecodeError`](bincode::error::DecodeError).
    BincodeDecode(bincode::error::DecodeError),

    /// The error variant for [`EncodeError`](bincode::error::EncodeError).
    BincodeEncode(bincode::error::EncodeError),

    /// The error variant for [`std::io::Error`].
    StdIo(std::io::Error),
}

impl CadenzaError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(loc: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            loc,
            msg: msg.into(),
        })
    }

    pub(crate) const fn source_exhausted(expected: usize, read: usize) -> Self {
        Self::SourceExhausted(SourceExhaustedError { expected, read })
    }

    pub(crate) const fn order_violation(record_id: u32) -> Self {
        Self::OrderViolation(OrderViolationError { record_id })
    }

    pub(crate) const fn length_exceeded(record_id: u32, num_terms: usize) -> Self {
        Self::LengthExceeded(LengthExceededError {
            record_id,
            num_terms,
        })
    }
}

impl fmt::Display for CadenzaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidFormat(e) => e.fmt(f),
            Self::SourceExhausted(e) => e.fmt(f),
            Self::OrderViolation(e) => e.fmt(f),
            Self::LengthExceeded(e) => e.fmt(f),
            Self::TryFromInt(e) => e.fmt(f),
            Self::ParseInt(e) => e.fmt(f),
            Self::BincodeDecode(e) => e.fmt(f),
            Self::BincodeEncode(e) => e.fmt(f),
            Self::StdIo(e) => e.fmt(f),
        }
    }
}

impl Error for CadenzaError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when an input file is malformed.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Name of the input.
    pub(crate) loc: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.loc, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// Error used when a collection yields fewer records than declared.
#[derive(Debug)]
pub struct SourceExhaustedError {
    /// Number of records the collection declared.
    pub expected: usize,

    /// Number of records actually read.
    pub read: usize,
}

impl fmt::Display for SourceExhaustedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SourceExhaustedError: expected {} completions, read {}",
            self.expected, self.read
        )
    }
}

impl Error for SourceExhaustedError {}

/// Error used when a completion is not strictly greater than its
/// predecessor in the input stream.
#[derive(Debug)]
pub struct OrderViolationError {
    /// 0-based id of the offending record in the input stream.
    pub record_id: u32,
}

impl fmt::Display for OrderViolationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "OrderViolationError: completion {} is not strictly greater than its predecessor",
            self.record_id
        )
    }
}

impl Error for OrderViolationError {}

/// Error used when a completion has too many terms.
#[derive(Debug)]
pub struct LengthExceededError {
    /// 0-based id of the offending record in the input stream.
    pub record_id: u32,

    /// Number of terms in the offending record.
    pub num_terms: usize,
}

impl fmt::Display for LengthExceededError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LengthExceededError: completion {} has {} terms (max {})",
            self.record_id, self.num_terms, MAX_NUM_TERMS
        )
    }
}

impl Error for LengthExceededError {}

impl From<std::num::TryFromIntError> for CadenzaError {
    fn from(error: std::num::TryFromIntError) -> Self {
        Self::TryFromInt(error)
    }
}

impl From<std::num::ParseIntError> for CadenzaError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::ParseInt(error)
    }
}

impl From<bincode::error::DecodeError> for CadenzaError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::BincodeDecode(error)
    }
}

impl From<bincode::error::EncodeError> for CadenzaError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::BincodeEncode(error)
    }
}

impl From<std::io::Error> for CadenzaError {
    fn from(error: std::io::Error) -> Self {
        Self::StdIo(error)
    }
}
