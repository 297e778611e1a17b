//! Cassprime client - priming a Cassandra stub server over its admin API
//!
//! This crate sends priming requests built with [`cassprime_model`] to the
//! stub server, lists the primes it currently holds and clears them.
//!
//! # Example
//!
//! ```no_run
//! use cassprime_client::{row, PrimeResult, PrimingClient, PrimingRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PrimingClient::from_url("http://localhost:8043")?;
//!
//!     let people = PrimingRequest::query_builder()
//!         .with_query("select * from people")
//!         .with_row(row([("name", "Chris")]))
//!         .build()?;
//!     client.prime(&people).await?;
//!
//!     let timeout = PrimingRequest::query_builder()
//!         .with_query("select * from places")
//!         .with_result(PrimeResult::ReadRequestTimeout)
//!         .build()?;
//!     client.prime(&timeout).await?;
//!
//!     assert_eq!(client.retrieve_query_primes().await?, vec![people, timeout]);
//!     client.clear_all_primes().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;

pub use api::{
    endpoint_path, PrimeError, PrimingClient, TransportFailure, PRIME_PREPARED_PATH,
    PRIME_QUERY_PATH,
};
pub use config::ClientConfig;

// Re-export the model so callers need a single dependency
pub use cassprime_model::{
    codec, row, CellValue, ColumnType, ConfigurationError, ConsistencyLevel, DecodeError,
    PreparedStatementPrimeBuilder, PrimeKind, PrimeResult, PrimingRequest, QueryPrimeBuilder, Row,
    Then, When,
};
