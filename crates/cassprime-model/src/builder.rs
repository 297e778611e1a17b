//! Guided builders for priming requests.
//!
//! There is one builder per matcher kind. Both share the outcome setters;
//! only the prepared statement builder can declare variable types, so a query
//! prime with variable types does not compile:
//!
//! ```compile_fail
//! use cassprime_model::{ColumnType, PrimingRequest};
//!
//! let _ = PrimingRequest::query_builder()
//!     .with_query("select * from people")
//!     .with_variable_types([ColumnType::Bigint])
//!     .build();
//! ```

use crate::error::ConfigurationError;
use crate::request::{PrimingRequest, Then, When};
use crate::types::{ColumnType, ConsistencyLevel, PrimeResult};
use crate::value::Row;
use std::collections::BTreeMap;

mod private {
    pub trait Sealed {}
}

/// Matcher-specific state carried by a [`PrimeBuilder`].
pub trait MatcherFields: private::Sealed + Default {
    fn into_when(self, text: String, consistency: Option<Vec<ConsistencyLevel>>) -> When;
}

/// Matcher state for plain query primes. Carries nothing.
#[derive(Debug, Clone, Default)]
pub struct QueryFields;

/// Matcher state for prepared statement primes.
#[derive(Debug, Clone, Default)]
pub struct PreparedStatementFields {
    variable_types: Option<Vec<ColumnType>>,
}

impl private::Sealed for QueryFields {}
impl private::Sealed for PreparedStatementFields {}

impl MatcherFields for QueryFields {
    fn into_when(self, text: String, consistency: Option<Vec<ConsistencyLevel>>) -> When {
        When::Query { text, consistency }
    }
}

impl MatcherFields for PreparedStatementFields {
    fn into_when(self, text: String, consistency: Option<Vec<ConsistencyLevel>>) -> When {
        When::PreparedStatement {
            text,
            consistency,
            variable_types: self.variable_types,
        }
    }
}

pub type QueryPrimeBuilder = PrimeBuilder<QueryFields>;
pub type PreparedStatementPrimeBuilder = PrimeBuilder<PreparedStatementFields>;

/// Accumulates the fields of a prime and validates them in [`PrimeBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct PrimeBuilder<M> {
    query: Option<String>,
    consistency: Option<Vec<ConsistencyLevel>>,
    result: PrimeResult,
    rows: Vec<Row>,
    column_types: Option<BTreeMap<String, ColumnType>>,
    matcher: M,
}

impl<M: MatcherFields> PrimeBuilder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query or statement text to match.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Restrict matching to the given consistency levels, in this order.
    pub fn with_consistency<I>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = ConsistencyLevel>,
    {
        self.consistency = Some(levels.into_iter().collect());
        self
    }

    /// Set the simulated outcome. Defaults to success.
    pub fn with_result(mut self, result: PrimeResult) -> Self {
        self.result = result;
        self
    }

    /// Replace the rows returned on success.
    pub fn with_rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Row>,
    {
        self.rows = rows.into_iter().collect();
        self
    }

    /// Append a single row returned on success.
    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Declare column types for the returned rows.
    pub fn with_column_types<I, K>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = (K, ColumnType)>,
        K: Into<String>,
    {
        self.column_types = Some(types.into_iter().map(|(k, t)| (k.into(), t)).collect());
        self
    }

    /// Validate the accumulated fields and produce the request.
    pub fn build(self) -> Result<PrimingRequest, ConfigurationError> {
        let text = self.query.ok_or(ConfigurationError::MissingQuery)?;
        let when = self.matcher.into_when(text, self.consistency);
        let then = Then::from_fields(self.result, self.rows, self.column_types)?;
        PrimingRequest::validated(when, then)
    }
}

impl PrimeBuilder<PreparedStatementFields> {
    /// Declare the types of the statement's bound variables, in order.
    pub fn with_variable_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = ColumnType>,
    {
        self.matcher.variable_types = Some(types.into_iter().collect());
        self
    }
}
