//! Property tests: decoding an encoded prime yields an equal prime, and
//! construction rules hold for arbitrary inputs.

use cassprime_model::{
    codec, CellValue, CollectionShape, ColumnType, ConfigurationError, ConsistencyLevel,
    PrimeKind, PrimeResult, PrimingRequest, Row,
};
use proptest::prelude::*;

fn consistency() -> impl Strategy<Value = ConsistencyLevel> {
    prop::sample::select(ConsistencyLevel::ALL_LEVELS.to_vec())
}

fn column_type() -> impl Strategy<Value = ColumnType> {
    prop::sample::select(vec![
        ColumnType::Ascii,
        ColumnType::Bigint,
        ColumnType::Boolean,
        ColumnType::Int,
        ColumnType::Timestamp,
        ColumnType::Varchar,
        ColumnType::Uuid,
        ColumnType::Set,
        ColumnType::List,
        ColumnType::Map,
        ColumnType::VarcharSet,
        ColumnType::TextList,
    ])
}

fn scalar_cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Null),
        any::<bool>().prop_map(CellValue::from),
        any::<i64>().prop_map(CellValue::from),
        (i64::MAX as u64 + 1..=u64::MAX).prop_map(CellValue::from),
        any::<f64>().prop_filter_map("finite floats only", CellValue::float),
        "\\PC{0,8}".prop_map(CellValue::from),
    ]
}

/// A scalar or a list of scalars: anything allowed inside a collection.
fn member_cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        3 => scalar_cell(),
        1 => prop::collection::vec(scalar_cell(), 0..3).prop_map(CellValue::List),
    ]
}

fn cell_for(declared: Option<ColumnType>) -> BoxedStrategy<CellValue> {
    let items = || prop::collection::vec(member_cell(), 0..4);
    match declared.map(|t| t.shape()) {
        Some(CollectionShape::Set) => items().prop_map(CellValue::set).boxed(),
        Some(CollectionShape::List) => items().prop_map(CellValue::List).boxed(),
        Some(CollectionShape::Map) => prop::collection::btree_map("[a-z]{1,4}", member_cell(), 0..3)
            .prop_map(CellValue::Map)
            .boxed(),
        Some(CollectionShape::Scalar) => scalar_cell().boxed(),
        None => prop_oneof![scalar_cell(), items().prop_map(CellValue::List)].boxed(),
    }
}

/// Rows sharing one set of columns, plus the declared types of those columns.
fn success_rows() -> impl Strategy<Value = (Vec<Row>, Vec<(String, ColumnType)>)> {
    prop::collection::vec(prop::option::of(column_type()), 0..4).prop_flat_map(|columns| {
        let cells: Vec<_> = columns
            .iter()
            .enumerate()
            .map(|(i, declared)| cell_for(*declared).prop_map(move |v| (format!("c{i}"), v)))
            .collect();
        let types: Vec<_> = columns
            .iter()
            .enumerate()
            .filter_map(|(i, declared)| declared.map(|t| (format!("c{i}"), t)))
            .collect();
        let row = cells.prop_map(|cells| cells.into_iter().collect::<Row>());
        (prop::collection::vec(row, 0..3), Just(types))
    })
}

type Outcome = (PrimeResult, Vec<Row>, Vec<(String, ColumnType)>);

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        3 => success_rows().prop_map(|(rows, types)| (PrimeResult::Success, rows, types)),
        1 => prop::sample::select(vec![
            PrimeResult::ReadRequestTimeout,
            PrimeResult::Unavailable,
            PrimeResult::WriteRequestTimeout,
        ])
        .prop_map(|result| (result, Vec::new(), Vec::new())),
    ]
}

fn assert_round_trips(request: &PrimingRequest) -> Result<(), TestCaseError> {
    let encoded = codec::encode(request).unwrap();
    let decoded = codec::decode_prime(&encoded, request.kind()).unwrap();
    prop_assert_eq!(&decoded, request);

    let listed = codec::decode_primes(&format!("[{encoded}]"), request.kind()).unwrap();
    prop_assert_eq!(listed, vec![request.clone()]);
    Ok(())
}

proptest! {
    #[test]
    fn query_prime_round_trips(
        text in "\\PC{0,24}",
        levels in prop::option::of(prop::collection::vec(consistency(), 0..4)),
        (result, rows, types) in outcome(),
    ) {
        let mut builder = PrimingRequest::query_builder()
            .with_query(text)
            .with_result(result)
            .with_rows(rows)
            .with_column_types(types);
        if let Some(levels) = levels {
            builder = builder.with_consistency(levels);
        }
        let request = builder.build().unwrap();
        prop_assert_eq!(request.kind(), PrimeKind::Query);
        assert_round_trips(&request)?;
    }

    #[test]
    fn prepared_prime_round_trips(
        text in "\\PC{0,24}",
        levels in prop::option::of(prop::collection::vec(consistency(), 0..4)),
        variable_types in prop::option::of(prop::collection::vec(column_type(), 0..4)),
        (result, rows, types) in outcome(),
    ) {
        let mut builder = PrimingRequest::prepared_statement_builder()
            .with_query(text)
            .with_result(result)
            .with_rows(rows)
            .with_column_types(types);
        if let Some(levels) = levels {
            builder = builder.with_consistency(levels);
        }
        if let Some(variable_types) = variable_types {
            builder = builder.with_variable_types(variable_types);
        }
        let request = builder.build().unwrap();
        assert_round_trips(&request)?;
    }

    #[test]
    fn missing_query_always_fails(
        levels in prop::collection::vec(consistency(), 0..4),
        variable_types in prop::collection::vec(column_type(), 0..4),
        (result, rows, types) in outcome(),
    ) {
        let query = PrimingRequest::query_builder()
            .with_consistency(levels.clone())
            .with_result(result)
            .with_rows(rows.clone())
            .with_column_types(types.clone())
            .build();
        prop_assert_eq!(query.unwrap_err(), ConfigurationError::MissingQuery);

        let prepared = PrimingRequest::prepared_statement_builder()
            .with_consistency(levels)
            .with_variable_types(variable_types)
            .with_result(result)
            .with_rows(rows)
            .with_column_types(types)
            .build();
        prop_assert_eq!(prepared.unwrap_err(), ConfigurationError::MissingQuery);
    }

    #[test]
    fn unset_fields_never_encoded(text in "\\PC{0,24}") {
        let request = PrimingRequest::query_builder().with_query(text).build().unwrap();
        let value = codec::encode_value(&request).unwrap();
        prop_assert!(value["when"].get("consistency").is_none());
        prop_assert!(value["when"].get("variable_types").is_none());
        prop_assert!(value["then"].get("column_types").is_none());
        prop_assert_eq!(&value["then"]["rows"], &serde_json::json!([]));
    }
}
