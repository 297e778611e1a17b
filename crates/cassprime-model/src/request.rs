//! The immutable priming request and its `when`/`then` clauses.

use crate::builder::{PreparedStatementPrimeBuilder, QueryPrimeBuilder};
use crate::error::ConfigurationError;
use crate::types::{CollectionShape, ColumnType, ConsistencyLevel, PrimeKind, PrimeResult};
use crate::value::Row;
use std::collections::BTreeMap;

/// What a prime matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum When {
    Query {
        text: String,
        consistency: Option<Vec<ConsistencyLevel>>,
    },
    PreparedStatement {
        text: String,
        consistency: Option<Vec<ConsistencyLevel>>,
        variable_types: Option<Vec<ColumnType>>,
    },
}

impl When {
    /// Get the query or statement text.
    pub fn text(&self) -> &str {
        match self {
            When::Query { text, .. } | When::PreparedStatement { text, .. } => text,
        }
    }

    /// Get the consistency levels, if constrained.
    pub fn consistency(&self) -> Option<&[ConsistencyLevel]> {
        match self {
            When::Query { consistency, .. } | When::PreparedStatement { consistency, .. } => {
                consistency.as_deref()
            }
        }
    }

    /// Get the bound variable types of a prepared statement.
    pub fn variable_types(&self) -> Option<&[ColumnType]> {
        match self {
            When::Query { .. } => None,
            When::PreparedStatement { variable_types, .. } => variable_types.as_deref(),
        }
    }

    pub fn kind(&self) -> PrimeKind {
        match self {
            When::Query { .. } => PrimeKind::Query,
            When::PreparedStatement { .. } => PrimeKind::PreparedStatement,
        }
    }
}

/// What the stub server does when a prime matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Then {
    Success {
        rows: Vec<Row>,
        column_types: Option<BTreeMap<String, ColumnType>>,
    },
    ReadRequestTimeout,
    Unavailable,
    WriteRequestTimeout,
}

impl Then {
    pub fn result(&self) -> PrimeResult {
        match self {
            Then::Success { .. } => PrimeResult::Success,
            Then::ReadRequestTimeout => PrimeResult::ReadRequestTimeout,
            Then::Unavailable => PrimeResult::Unavailable,
            Then::WriteRequestTimeout => PrimeResult::WriteRequestTimeout,
        }
    }

    /// Get the primed rows. Always empty for failure outcomes.
    pub fn rows(&self) -> &[Row] {
        match self {
            Then::Success { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn column_types(&self) -> Option<&BTreeMap<String, ColumnType>> {
        match self {
            Then::Success { column_types, .. } => column_types.as_ref(),
            _ => None,
        }
    }

    /// Assemble an outcome from loose fields, rejecting rows on failure outcomes.
    pub(crate) fn from_fields(
        result: PrimeResult,
        rows: Vec<Row>,
        column_types: Option<BTreeMap<String, ColumnType>>,
    ) -> Result<Self, ConfigurationError> {
        let has_types = column_types.as_ref().is_some_and(|t| !t.is_empty());
        if result != PrimeResult::Success && (!rows.is_empty() || has_types) {
            return Err(ConfigurationError::RowsWithoutSuccess);
        }
        Ok(match result {
            PrimeResult::Success => Then::Success { rows, column_types },
            PrimeResult::ReadRequestTimeout => Then::ReadRequestTimeout,
            PrimeResult::Unavailable => Then::Unavailable,
            PrimeResult::WriteRequestTimeout => Then::WriteRequestTimeout,
        })
    }
}

/// A single stub rule: when a statement matches, then respond this way.
///
/// Instances are only produced by the builders or by decoding a server
/// response, and both paths run the same validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimingRequest {
    when: When,
    then: Then,
}

impl PrimingRequest {
    /// Start building a prime for a plain query.
    pub fn query_builder() -> QueryPrimeBuilder {
        QueryPrimeBuilder::default()
    }

    /// Start building a prime for a prepared statement.
    pub fn prepared_statement_builder() -> PreparedStatementPrimeBuilder {
        PreparedStatementPrimeBuilder::default()
    }

    pub fn when(&self) -> &When {
        &self.when
    }

    pub fn then(&self) -> &Then {
        &self.then
    }

    pub fn kind(&self) -> PrimeKind {
        self.when.kind()
    }

    /// Normalise empty optional collections to unset and check every row
    /// against the declared column types.
    pub(crate) fn validated(when: When, then: Then) -> Result<Self, ConfigurationError> {
        let when = match when {
            When::PreparedStatement {
                text,
                consistency,
                variable_types,
            } => When::PreparedStatement {
                text,
                consistency,
                variable_types: variable_types.filter(|t| !t.is_empty()),
            },
            query => query,
        };

        let then = match then {
            Then::Success { rows, column_types } => {
                let column_types = column_types.filter(|t| !t.is_empty());
                check_rows(&rows, column_types.as_ref())?;
                Then::Success { rows, column_types }
            }
            failure => failure,
        };

        Ok(Self { when, then })
    }
}

/// Collections must agree with their column's declared type, and a set needs a
/// set-like one. Scalars are accepted under any declared type: they decode the
/// same whatever the column says, and `null` is a valid collection cell.
fn check_rows(
    rows: &[Row],
    column_types: Option<&BTreeMap<String, ColumnType>>,
) -> Result<(), ConfigurationError> {
    for row in rows {
        for (column, value) in row {
            if value.has_nested_set() {
                return Err(ConfigurationError::NestedSet {
                    column: column.clone(),
                });
            }

            let declared = column_types.and_then(|t| t.get(column)).copied();
            match (value.shape(), declared) {
                (CollectionShape::Scalar, _) => {}
                (CollectionShape::Set, Some(t)) if t.is_set() => {}
                (CollectionShape::Set, _) => {
                    return Err(ConfigurationError::SetWithoutSetType {
                        column: column.clone(),
                    });
                }
                (shape, Some(t)) if t.shape() != shape => {
                    return Err(ConfigurationError::CollectionTypeMismatch {
                        column: column.clone(),
                        declared: t,
                    });
                }
                _ => {}
            }
        }
    }
    Ok(())
}
