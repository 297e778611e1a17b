//! Error types for building, encoding and decoding primes.

use crate::types::ColumnType;
use thiserror::Error;

/// A priming request could not be built because its fields are inconsistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Must set query for PrimingRequest.")]
    MissingQuery,
    #[error("Rows and column types are only applicable to a success result.")]
    RowsWithoutSuccess,
    #[error("Column '{column}' holds a set but is not declared with a set column type.")]
    SetWithoutSetType { column: String },
    #[error("Column '{column}' is declared as {declared:?} but holds an incompatible collection.")]
    CollectionTypeMismatch { column: String, declared: ColumnType },
    #[error("Column '{column}' holds a set nested inside another collection.")]
    NestedSet { column: String },
}

/// A server response could not be turned back into priming requests.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed priming document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Priming document has no query text")]
    MissingQuery,
    #[error("Unrecognized result: {0}")]
    UnknownResult(String),
    #[error("Variable types are only applicable for a prepared statement prime")]
    UnexpectedVariableTypes,
    #[error("Priming document is invalid: {0}")]
    Invalid(#[from] ConfigurationError),
}

/// A priming request could not be serialized.
#[derive(Error, Debug)]
#[error("Failed to encode priming request: {0}")]
pub struct EncodeError(#[from] pub serde_json::Error);
