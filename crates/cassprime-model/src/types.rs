//! Closed vocabularies shared by the model and the wire codec.

use serde::{Deserialize, Serialize};

/// Consistency level a primed query must be issued with to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    Serial,
    LocalSerial,
    LocalOne,
}

impl ConsistencyLevel {
    /// Every level, in protocol code order.
    pub const ALL_LEVELS: [ConsistencyLevel; 11] = [
        ConsistencyLevel::Any,
        ConsistencyLevel::One,
        ConsistencyLevel::Two,
        ConsistencyLevel::Three,
        ConsistencyLevel::Quorum,
        ConsistencyLevel::All,
        ConsistencyLevel::LocalQuorum,
        ConsistencyLevel::EachQuorum,
        ConsistencyLevel::Serial,
        ConsistencyLevel::LocalSerial,
        ConsistencyLevel::LocalOne,
    ];

    /// Get the wire token for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyLevel::Any => "ANY",
            ConsistencyLevel::One => "ONE",
            ConsistencyLevel::Two => "TWO",
            ConsistencyLevel::Three => "THREE",
            ConsistencyLevel::Quorum => "QUORUM",
            ConsistencyLevel::All => "ALL",
            ConsistencyLevel::LocalQuorum => "LOCAL_QUORUM",
            ConsistencyLevel::EachQuorum => "EACH_QUORUM",
            ConsistencyLevel::Serial => "SERIAL",
            ConsistencyLevel::LocalSerial => "LOCAL_SERIAL",
            ConsistencyLevel::LocalOne => "LOCAL_ONE",
        }
    }
}

/// Shape a column type imposes on the cells rendered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape {
    Scalar,
    List,
    Set,
    Map,
}

/// Column type hint understood by the stub server.
///
/// Wire names are the variant names verbatim (`"Varchar"`, `"Set"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Int,
    Timestamp,
    Varchar,
    Varint,
    Timeuuid,
    Uuid,
    Inet,
    Text,
    Set,
    List,
    Map,
    VarcharSet,
    AsciiSet,
    TextSet,
    VarcharList,
    AsciiList,
    TextList,
}

impl ColumnType {
    /// Get the collection shape values of this type must have.
    pub fn shape(&self) -> CollectionShape {
        match self {
            ColumnType::Set | ColumnType::VarcharSet | ColumnType::AsciiSet | ColumnType::TextSet => {
                CollectionShape::Set
            }
            ColumnType::List
            | ColumnType::VarcharList
            | ColumnType::AsciiList
            | ColumnType::TextList => CollectionShape::List,
            ColumnType::Map => CollectionShape::Map,
            _ => CollectionShape::Scalar,
        }
    }

    /// Check if values of this type are rendered as unordered sets.
    pub fn is_set(&self) -> bool {
        self.shape() == CollectionShape::Set
    }
}

/// Outcome a prime makes the stub server simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimeResult {
    #[default]
    Success,
    ReadRequestTimeout,
    Unavailable,
    WriteRequestTimeout,
}

impl PrimeResult {
    /// Get the wire token for this result.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimeResult::Success => "success",
            PrimeResult::ReadRequestTimeout => "read_request_timeout",
            PrimeResult::Unavailable => "unavailable",
            PrimeResult::WriteRequestTimeout => "write_request_timeout",
        }
    }

    /// Parse a wire token, returning `None` for anything unrecognized.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "success" => Some(PrimeResult::Success),
            "read_request_timeout" => Some(PrimeResult::ReadRequestTimeout),
            "unavailable" => Some(PrimeResult::Unavailable),
            "write_request_timeout" => Some(PrimeResult::WriteRequestTimeout),
            _ => None,
        }
    }
}

/// Which kind of statement a prime matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimeKind {
    Query,
    PreparedStatement,
}

impl PrimeKind {
    /// Get a human-readable label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            PrimeKind::Query => "query",
            PrimeKind::PreparedStatement => "prepared statement",
        }
    }
}
