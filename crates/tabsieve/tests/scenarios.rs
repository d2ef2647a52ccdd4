//! End-to-end scenarios across every data shape.

use std::sync::Arc;

use serde_json::json;
use tabsieve::{
    Comparator, Dir, Header, JsonFilter, JsonListing, JsonPredicate, NamedRow, NamedRowPredicate, OrderBy, Record,
    RecordListing, RecordPredicate, RowListing, RowPredicate, SieveError, Timestamp, ToValue,
    Value,
};

fn row(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Side {
    Buy,
    Sell,
}

impl ToValue for Side {
    fn to_value(&self) -> Value<'_> {
        Value::Enum(*self as u32)
    }
}

#[derive(Debug, Clone, Record)]
struct Quote {
    symbol: String,
    price: f64,
    volume: Option<u64>,
    side: Side,
    quoted_at: Timestamp,
    tags: Vec<String>,
    #[record(skip)]
    #[allow(dead_code)]
    source: String,
}

fn quote(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price,
        volume: None,
        side: Side::Buy,
        quoted_at: Timestamp::from_secs(0),
        tags: Vec::new(),
        source: "feed".to_string(),
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn empty_test_on_positional_row() {
    let r = row(&[None, Some("aaa"), Some("bbb")]);
    assert!(RowPredicate::is_empty(0).accept(&r).unwrap());
    assert!(!RowPredicate::is_empty(1).accept(&r).unwrap());
}

#[test]
fn range_test_on_positional_row() {
    let r = row(&[Some("100"), Some("101")]);
    assert!(RowPredicate::between(0, "050", "100")
        .unwrap()
        .accept(&r)
        .unwrap());
    assert!(!RowPredicate::between(1, "050", "100")
        .unwrap()
        .accept(&r)
        .unwrap());
}

#[test]
fn equality_on_named_row() {
    let header = Arc::new(Header::new(["col0", "col1"]));
    let r = NamedRow::new(header, row(&[None, Some("x001")])).unwrap();
    assert!(NamedRowPredicate::eq("col1", "x001")
        .unwrap()
        .accept(&r)
        .unwrap());
    assert!(!NamedRowPredicate::eq("col0", "x001")
        .unwrap()
        .accept(&r)
        .unwrap());
}

#[test]
fn greater_than_on_record() {
    let q = quote("AAA", 1088.70);
    assert!(RecordPredicate::gt(Quote::PRICE, 1088.00)
        .unwrap()
        .accept(&q)
        .unwrap());
    assert!(!RecordPredicate::gt(Quote::PRICE, 1088.70)
        .unwrap()
        .accept(&q)
        .unwrap());
}

#[test]
fn descending_order_on_records() {
    let quotes = vec![quote("a", 10.0), quote("b", 30.0), quote("c", 20.0)];
    let listing = RecordListing::<Quote>::new().order_by(OrderBy::new(Quote::PRICE, Dir::Desc));
    let prices: Vec<f64> = listing
        .process(&quotes)
        .unwrap()
        .iter()
        .map(|q| q.price)
        .collect();
    assert_eq!(prices, vec![30.0, 20.0, 10.0]);
}

#[test]
fn paging_windows() {
    let rows: Vec<_> = (0..5).map(|i| row(&[Some(&i.to_string())])).collect();

    let tail = RowListing::new().offset(3).limit(0).process(&rows).unwrap();
    assert_eq!(tail, vec![&rows[3], &rows[4]]);

    let past_end = RowListing::new().offset(10).limit(5).process(&rows).unwrap();
    assert!(past_end.is_empty());
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn record_fields_of_every_kind() {
    let mut q = quote("ACME", 12.5);
    q.volume = Some(300);
    q.side = Side::Sell;
    q.quoted_at = Timestamp::from_secs(1_700_000_000);
    q.tags = vec!["hot".to_string()];

    let p = RecordPredicate::all([
        RecordPredicate::eq(Quote::SYMBOL, "ACME").unwrap(),
        RecordPredicate::ge(Quote::VOLUME, 300u64).unwrap(),
        RecordPredicate::eq(Quote::SIDE, Value::Enum(Side::Sell as u32)).unwrap(),
        RecordPredicate::gt(Quote::QUOTED_AT, Timestamp::from_secs(1_600_000_000)).unwrap(),
        RecordPredicate::is_not_empty(Quote::TAGS),
    ]);
    assert!(p.accept(&q).unwrap());
}

#[test]
fn absent_record_fields() {
    let q = quote("ACME", 1.0);
    assert!(RecordPredicate::is_null(Quote::VOLUME).accept(&q).unwrap());
    assert!(RecordPredicate::is_empty(Quote::TAGS).accept(&q).unwrap());
    assert!(!RecordPredicate::gt(Quote::VOLUME, 0)
        .unwrap()
        .accept(&q)
        .unwrap());
}

#[test]
fn skipped_and_unknown_fields() {
    let q = quote("ACME", 1.0);
    assert!(!Quote::schema().contains("source"));
    let err = RecordPredicate::is_null("source").accept(&q).unwrap_err();
    assert!(matches!(err, SieveError::UnknownField { ref field, .. } if field == "source"));
}

#[test]
fn comparator_on_record_leaf() {
    let q = quote("acme", 1.0);
    let p = RecordPredicate::<Quote>::eq_by(Quote::SYMBOL, "ACME", Comparator::ignore_case())
        .unwrap();
    assert!(p.accept(&q).unwrap());

    let by_len = Comparator::new(|a, b| {
        let a = a.as_str().map(str::len).unwrap_or(0);
        let b = b.as_str().map(str::len).unwrap_or(0);
        a.cmp(&b)
    });
    let longer = RecordPredicate::<Quote>::gt_by(Quote::SYMBOL, "abc", by_len).unwrap();
    assert!(longer.accept(&q).unwrap());
}

#[test]
fn mismatched_operand_type_fails() {
    let q = quote("ACME", 1.0);
    let p = RecordPredicate::gt(Quote::PRICE, "1.0").unwrap();
    assert!(matches!(
        p.accept(&q),
        Err(SieveError::Incomparable {
            left: "number",
            right: "string"
        })
    ));
}

#[test]
fn null_sorting_and_secondary_keys() {
    let mut a = quote("a", 1.0);
    a.volume = Some(5);
    let b = quote("b", 1.0);
    let mut c = quote("c", 2.0);
    c.volume = Some(5);
    let mut d = quote("d", 1.0);
    d.volume = Some(1);
    let quotes = vec![a, b, c, d];

    let listing = RecordListing::<Quote>::new()
        .order_asc(Quote::VOLUME)
        .order_desc(Quote::PRICE);
    let symbols: Vec<&str> = listing
        .process(&quotes)
        .unwrap()
        .iter()
        .map(|q| q.symbol.as_str())
        .collect();
    assert_eq!(symbols, vec!["d", "c", "a", "b"]);
}

// ============================================================================
// JSON documents
// ============================================================================

#[test]
fn json_documents() {
    let docs = vec![
        json!({"name": "bolt", "qty": 10, "price": 0.1}),
        json!({"name": "nut", "qty": null, "price": 0.05}),
        json!({"name": "Washer", "qty": 3, "price": 0.2}),
    ];

    let listing = JsonListing::new()
        .filter(
            JsonFilter::any()
                .is_not_null("qty")
                .eq_ignore_case("name", "NUT")
                .unwrap(),
        )
        .order_by(OrderBy::asc("name").ignore_case());

    let names: Vec<_> = listing
        .process(&docs)
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["bolt", "nut", "Washer"]);
}

#[test]
fn json_missing_key_is_an_error() {
    let doc = json!({"name": "bolt"});
    let p = JsonFilter::new().eq("qty", 1).unwrap().build();
    assert!(matches!(
        p.accept(&doc),
        Err(SieveError::UnknownField { .. })
    ));
}

// ============================================================================
// Injected comparators
// ============================================================================

fn accepts(p: &JsonPredicate, doc: &serde_json::Value) -> bool {
    p.accept(doc).unwrap()
}

fn is_incomparable(p: &JsonPredicate, doc: &serde_json::Value) -> bool {
    matches!(p.accept(doc), Err(SieveError::Incomparable { .. }))
}

#[test]
fn equality_by_comparator_on_mismatched_types() {
    let doc = json!({"price": 12.5});
    let eq = JsonPredicate::eq_by("price", "banana", Comparator::natural()).unwrap();
    let ne = JsonPredicate::ne_by("price", "banana", Comparator::natural()).unwrap();
    assert!(!accepts(&eq, &doc));
    assert!(accepts(&ne, &doc));

    let folded = JsonPredicate::eq_by("price", "12.5", Comparator::ignore_case()).unwrap();
    assert!(!accepts(&folded, &doc));
}

#[test]
fn ne_by_variant() {
    let cmp = Comparator::ignore_case;
    let p = JsonPredicate::ne_by("name", "BOLT", cmp()).unwrap();
    assert!(!accepts(&p, &json!({"name": "bolt"})));
    assert!(accepts(&p, &json!({"name": "nut"})));
    // Absent is never equal, so it differs
    assert!(accepts(&p, &json!({"name": null})));
    assert!(accepts(&p, &json!({"name": 7})));
}

#[test]
fn ordered_by_variants() {
    let cmp = Comparator::natural;
    let docs = [json!({"v": 4}), json!({"v": 5}), json!({"v": 6})];
    let cases: [(JsonPredicate, [bool; 3]); 4] = [
        (JsonPredicate::gt_by("v", 5, cmp()).unwrap(), [false, false, true]),
        (JsonPredicate::ge_by("v", 5, cmp()).unwrap(), [false, true, true]),
        (JsonPredicate::lt_by("v", 5, cmp()).unwrap(), [true, false, false]),
        (JsonPredicate::le_by("v", 5, cmp()).unwrap(), [true, true, false]),
    ];

    let absent = json!({"v": null});
    let text = json!({"v": "five"});
    let list = json!({"v": [1, 2]});
    for (p, expected) in &cases {
        let got: Vec<bool> = docs.iter().map(|d| accepts(p, d)).collect();
        assert_eq!(got, expected, "{}", p);
        assert!(!accepts(p, &absent), "{}", p);
        assert!(is_incomparable(p, &text), "{}", p);
        assert!(is_incomparable(p, &list), "{}", p);
    }
}

#[test]
fn ordered_by_collection_is_incomparable() {
    let doc = json!({"tags": [1, 2]});
    let p = JsonPredicate::ge_by("tags", 99, Comparator::natural()).unwrap();
    assert!(matches!(
        p.accept(&doc),
        Err(SieveError::Incomparable {
            left: "collection",
            right: "number"
        })
    ));
}

#[test]
fn between_by_variant() {
    let cmp = Comparator::ignore_case;
    let p = JsonPredicate::between_by("name", "B", "d", cmp()).unwrap();
    assert!(accepts(&p, &json!({"name": "bolt"})));
    assert!(accepts(&p, &json!({"name": "D"})));
    assert!(!accepts(&p, &json!({"name": "axle"})));
    assert!(!accepts(&p, &json!({"name": "washer"})));
    assert!(!accepts(&p, &json!({"name": null})));
    assert!(is_incomparable(&p, &json!({"name": 3})));
}

#[test]
fn between_by_is_ge_by_and_le_by() {
    let cmp = Comparator::ignore_case;
    let range = JsonPredicate::between_by("name", "b", "N", cmp()).unwrap();
    let ge = JsonPredicate::ge_by("name", "b", cmp()).unwrap();
    let le = JsonPredicate::le_by("name", "N", cmp()).unwrap();

    for name in [json!(null), json!("a"), json!("B"), json!("mid"), json!("n"), json!("Z")] {
        let doc = json!({ "name": name });
        let expected = accepts(&ge, &doc) && accepts(&le, &doc);
        assert_eq!(accepts(&range, &doc), expected, "{}", doc);
    }

    let doc = json!({"name": 1});
    assert!(is_incomparable(&range, &doc));
    assert!(is_incomparable(&ge, &doc));
}

#[test]
fn case_insensitive_order_rejects_mixed_types() {
    let docs = vec![json!({"v": 1}), json!({"v": "one"})];
    let listing = JsonListing::new().order_by(OrderBy::asc("v").ignore_case());
    assert!(matches!(
        listing.process(&docs),
        Err(SieveError::Incomparable { .. })
    ));
}

// ============================================================================
// Error propagation
// ============================================================================

#[test]
fn unknown_column_on_named_row() {
    let header = Arc::new(Header::new(["a"]));
    let r = NamedRow::new(header, row(&[Some("1")])).unwrap();
    let err = NamedRowPredicate::is_null("b").accept(&r).unwrap_err();
    assert!(matches!(err, SieveError::UnknownColumn { ref name } if name == "b"));
}

#[test]
fn negative_offsets_clamp() {
    let rows: Vec<_> = (0..3).map(|i| row(&[Some(&i.to_string())])).collect();
    let page = RowListing::new().offset(-4).limit(2).process(&rows).unwrap();
    assert_eq!(page, vec![&rows[0], &rows[1]]);
}
