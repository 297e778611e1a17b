//! Priming request model and JSON wire codec for a Cassandra stub server.
//!
//! A prime tells the stub server how to answer a query or prepared statement:
//! return rows, or simulate a read timeout, write timeout or unavailable
//! error. This crate builds validated [`PrimingRequest`] values and converts
//! them to and from the server's JSON priming documents. It performs no I/O.
//!
//! # Example
//!
//! ```
//! use cassprime_model::{codec, row, ConsistencyLevel, PrimeKind, PrimingRequest};
//!
//! let request = PrimingRequest::query_builder()
//!     .with_query("select * from people")
//!     .with_consistency([ConsistencyLevel::All, ConsistencyLevel::One])
//!     .with_row(row([("name", "Chris")]))
//!     .build()
//!     .unwrap();
//!
//! let json = codec::encode(&request).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"when":{"query":"select * from people","consistency":["ALL","ONE"]},"then":{"rows":[{"name":"Chris"}],"result":"success"}}"#
//! );
//!
//! let decoded = codec::decode_prime(&json, PrimeKind::Query).unwrap();
//! assert_eq!(decoded, request);
//! ```

mod builder;
pub mod codec;
mod error;
mod request;
mod types;
mod value;

// Re-export public types
pub use builder::{
    MatcherFields, PreparedStatementFields, PreparedStatementPrimeBuilder, PrimeBuilder,
    QueryFields, QueryPrimeBuilder,
};
pub use error::{ConfigurationError, DecodeError, EncodeError};
pub use request::{PrimingRequest, Then, When};
pub use types::{CollectionShape, ColumnType, ConsistencyLevel, PrimeKind, PrimeResult};
pub use value::{row, CellValue, Row};
