//! JSON wire codec for priming documents.
//!
//! Encoding emits keys in a fixed canonical order (`when` before `then`,
//! `query` before `consistency` before `variable_types`, `rows` before
//! `result` before `column_types`; row columns and column type entries sorted
//! by name; set members in canonical value order), so equal requests always
//! produce byte-identical JSON. Structural equality is still the contract with
//! the server: decoding accepts any key order and whitespace.

use crate::error::{DecodeError, EncodeError};
use crate::request::{PrimingRequest, Then, When};
use crate::types::{ColumnType, ConsistencyLevel, PrimeKind, PrimeResult};
use crate::value::{CellValue, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

// ============================================================================
// Encode
// ============================================================================

#[derive(Serialize)]
struct EncodedDocument<'a> {
    when: EncodedWhen<'a>,
    then: EncodedThen<'a>,
}

#[derive(Serialize)]
struct EncodedWhen<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    consistency: Option<&'a [ConsistencyLevel]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variable_types: Option<&'a [ColumnType]>,
}

#[derive(Serialize)]
struct EncodedThen<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<&'a [Row]>,
    result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    column_types: Option<&'a BTreeMap<String, ColumnType>>,
}

impl<'a> EncodedDocument<'a> {
    fn new(request: &'a PrimingRequest) -> Self {
        let when = request.when();
        let then = request.then();
        let rows = match then {
            Then::Success { rows, .. } => Some(rows.as_slice()),
            _ => None,
        };

        Self {
            when: EncodedWhen {
                query: when.text(),
                consistency: when.consistency(),
                variable_types: when.variable_types().filter(|t| !t.is_empty()),
            },
            then: EncodedThen {
                rows,
                result: then.result().as_str(),
                column_types: then.column_types().filter(|t| !t.is_empty()),
            },
        }
    }
}

/// Encode a request as compact JSON in canonical key order.
pub fn encode(request: &PrimingRequest) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(&EncodedDocument::new(request))?)
}

/// Encode a request as a JSON value, for structural comparison.
pub fn encode_value(request: &PrimingRequest) -> Result<Value, EncodeError> {
    Ok(serde_json::to_value(EncodedDocument::new(request))?)
}

// ============================================================================
// Decode
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    when: RawWhen,
    #[serde(default)]
    then: RawThen,
}

#[derive(Debug, Default, Deserialize)]
struct RawWhen {
    query: Option<String>,
    consistency: Option<Vec<ConsistencyLevel>>,
    variable_types: Option<Vec<ColumnType>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawThen {
    rows: Option<Vec<BTreeMap<String, Value>>>,
    result: Option<String>,
    column_types: Option<BTreeMap<String, ColumnType>>,
}

/// Decode a JSON array of priming documents, as returned when listing primes.
///
/// Fails as a whole if any document is invalid.
pub fn decode_primes(body: &str, kind: PrimeKind) -> Result<Vec<PrimingRequest>, DecodeError> {
    let documents: Vec<RawDocument> = serde_json::from_str(body)?;
    documents
        .into_iter()
        .map(|doc| decode_raw(doc, kind))
        .collect()
}

/// Decode a single priming document.
pub fn decode_prime(body: &str, kind: PrimeKind) -> Result<PrimingRequest, DecodeError> {
    decode_raw(serde_json::from_str(body)?, kind)
}

/// Decode a single already-parsed priming document.
pub fn decode_document(document: Value, kind: PrimeKind) -> Result<PrimingRequest, DecodeError> {
    decode_raw(serde_json::from_value(document)?, kind)
}

fn decode_raw(doc: RawDocument, kind: PrimeKind) -> Result<PrimingRequest, DecodeError> {
    let when = decode_when(doc.when, kind)?;
    let then = decode_then(doc.then)?;
    Ok(PrimingRequest::validated(when, then)?)
}

fn decode_when(raw: RawWhen, kind: PrimeKind) -> Result<When, DecodeError> {
    let text = raw.query.ok_or(DecodeError::MissingQuery)?;
    match kind {
        PrimeKind::Query => {
            if raw.variable_types.is_some_and(|t| !t.is_empty()) {
                return Err(DecodeError::UnexpectedVariableTypes);
            }
            Ok(When::Query {
                text,
                consistency: raw.consistency,
            })
        }
        PrimeKind::PreparedStatement => Ok(When::PreparedStatement {
            text,
            consistency: raw.consistency,
            variable_types: raw.variable_types,
        }),
    }
}

fn decode_then(raw: RawThen) -> Result<Then, DecodeError> {
    let result = match raw.result.as_deref() {
        None => PrimeResult::Success,
        Some(token) => PrimeResult::from_token(token)
            .ok_or_else(|| DecodeError::UnknownResult(token.to_string()))?,
    };

    if result != PrimeResult::Success {
        if raw.rows.is_some() || raw.column_types.is_some() {
            debug!("Ignoring rows/column_types on a {} prime", result.as_str());
        }
        return Ok(Then::from_fields(result, Vec::new(), None)?);
    }

    let column_types = raw.column_types;
    let rows = raw
        .rows
        .unwrap_or_default()
        .into_iter()
        .map(|cells| {
            cells
                .into_iter()
                .map(|(column, value)| {
                    let declared = column_types.as_ref().and_then(|t| t.get(&column)).copied();
                    (column, CellValue::from_json(value, declared))
                })
                .collect::<Row>()
        })
        .collect();

    Ok(Then::Success { rows, column_types })
}
