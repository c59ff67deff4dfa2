use std::sync::LazyLock;

use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use time::macros::datetime;
use uuid::Uuid;

use crate::{
    Field, FieldKind, FieldValue, Record, Shape, Value, best_match, parse, populate,
};

static PERSON_SHAPE: LazyLock<Shape> = LazyLock::new(|| {
    Shape::new("Person")
        .field("id", FieldKind::Uuid)
        .field("name", FieldKind::String)
        .field("age", FieldKind::Int)
        .nullable_field("joined", FieldKind::Timestamp)
});

#[derive(Debug, Default, PartialEq)]
struct Person {
    id: Option<Uuid>,
    name: String,
    age: i32,
    joined: Option<time::OffsetDateTime>,
}

impl Record for Person {
    fn shape() -> &'static Shape {
        &PERSON_SHAPE
    }

    fn assign(&mut self, field: &str, value: FieldValue) {
        match (field, value) {
            ("id", FieldValue::Uuid(id)) => self.id = Some(id),
            ("name", FieldValue::String(name)) => self.name = name,
            ("age", FieldValue::Int(age)) => self.age = age,
            ("joined", FieldValue::Timestamp(at)) => self.joined = Some(at),
            ("joined", FieldValue::Null) => self.joined = None,
            _ => {}
        }
    }
}

fn shapes() -> Vec<Shape> {
    vec![
        Shape::new("Point")
            .field("x", FieldKind::Int)
            .field("y", FieldKind::Int),
        PERSON_SHAPE.clone(),
    ]
}

#[test]
fn match_factor_is_the_named_fraction() {
    let map = parse(r#"{"name": "n", "age": 3}"#).unwrap().value;
    let map = map.as_object().unwrap();
    assert_eq!(PERSON_SHAPE.match_factor(map), 0.5);

    let full = parse(
        r#"{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "name": "n", "age": 3, "joined": null}"#,
    )
    .unwrap()
    .value;
    assert_eq!(PERSON_SHAPE.match_factor(full.as_object().unwrap()), 1.0);
}

#[test]
fn empty_shape_never_matches() {
    let map = parse(r#"{"a": 1}"#).unwrap().value;
    assert_eq!(Shape::new("Empty").match_factor(map.as_object().unwrap()), 0.0);
}

#[test]
fn best_match_picks_the_highest_factor() {
    let map = parse(r#"{"name": "n", "age": 3, "id": "x", "joined": "y"}"#)
        .unwrap()
        .value;
    assert_eq!(best_match(map.as_object().unwrap(), &shapes()), Some(1));

    let map = parse(r#"{"x": 1, "y": 2}"#).unwrap().value;
    assert_eq!(best_match(map.as_object().unwrap(), &shapes()), Some(0));
}

// The comparison is strict, so an equally good later candidate loses.
#[test]
fn tie_keeps_the_first_candidate() {
    let candidates = vec![
        Shape::new("A").field("k", FieldKind::Int),
        Shape::new("B").field("k", FieldKind::Long),
    ];
    let map = parse(r#"{"k": 1}"#).unwrap().value;
    assert_eq!(best_match(map.as_object().unwrap(), &candidates), Some(0));
}

#[test]
fn no_overlap_yields_none() {
    let map = parse(r#"{"unrelated": 1}"#).unwrap().value;
    assert_eq!(best_match(map.as_object().unwrap(), &shapes()), None);
    assert_eq!(best_match(map.as_object().unwrap(), &[]), None);
}

#[test]
fn populate_coerces_each_named_field() {
    let map = parse(
        r#"{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "name": "Ada", "age": 36,
            "joined": "2021-03-04T05:06:07Z",
            "extra": true}"#,
    )
    .unwrap()
    .value;
    let person: Person = populate(map.as_object().unwrap());
    assert_eq!(
        person,
        Person {
            id: Some(Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()),
            name: "Ada".into(),
            age: 36,
            joined: Some(datetime!(2021-03-04 05:06:07 UTC)),
        }
    );
}

#[test]
fn failed_coercion_keeps_the_default() {
    let map = parse(r#"{"id": "not-a-uuid", "name": "Ada", "age": "old"}"#)
        .unwrap()
        .value;
    let person: Person = populate(map.as_object().unwrap());
    assert_eq!(person.id, None);
    assert_eq!(person.name, "Ada");
    assert_eq!(person.age, 0);
}

#[test]
fn missing_fields_keep_the_default() {
    let map = parse(r#"{"name": "Ada"}"#).unwrap().value;
    let person: Person = populate(map.as_object().unwrap());
    assert_eq!(person.age, 0);
    assert_eq!(person.joined, None);
}

#[rstest]
#[case(FieldKind::Bool, Value::Bool(true), Some(FieldValue::Bool(true)))]
#[case(FieldKind::Int, Value::Int(7), Some(FieldValue::Int(7)))]
#[case(FieldKind::Long, Value::Int(7), Some(FieldValue::Long(7)))]
#[case(FieldKind::Double, Value::Int(7), Some(FieldValue::Double(7.0)))]
#[case(FieldKind::Double, Value::Double(1.5), Some(FieldValue::Double(1.5)))]
#[case(FieldKind::Long, Value::Double(3.0), Some(FieldValue::Long(3)))]
#[case(FieldKind::Long, Value::Double(2.5), Some(FieldValue::Long(2)))]
#[case(FieldKind::Long, Value::Double(3.5), Some(FieldValue::Long(4)))]
#[case(FieldKind::Long, Value::Double(1e300), None)]
#[case(FieldKind::Decimal, Value::Int(7), Some(FieldValue::Decimal(Decimal::from(7))))]
#[case(FieldKind::Double, Value::Decimal(Decimal::new(15, 1)), Some(FieldValue::Double(1.5)))]
#[case(FieldKind::String, Value::Int(7), Some(FieldValue::String("7".into())))]
#[case(FieldKind::String, Value::Bool(false), Some(FieldValue::String("false".into())))]
#[case(FieldKind::Int, Value::Double(1.5), None)]
#[case(FieldKind::Int, Value::String("7".into()), None)]
#[case(FieldKind::Bool, Value::Int(1), None)]
fn coerce_table(
    #[case] kind: FieldKind,
    #[case] value: Value,
    #[case] expected: Option<FieldValue>,
) {
    assert_eq!(Field::new("f", kind).coerce(&value), expected);
}

#[test]
fn null_requires_a_nullable_field() {
    assert_eq!(
        Field::nullable("f", FieldKind::Int).coerce(&Value::Null),
        Some(FieldValue::Null)
    );
    assert_eq!(Field::new("f", FieldKind::Int).coerce(&Value::Null), None);
}

#[test]
fn strings_convert_to_identifier_kinds() {
    let id = Field::new("id", FieldKind::Uuid)
        .coerce(&Value::String("67e55044-10b1-426f-9247-bb680e5fe0c8".into()));
    assert_eq!(
        id,
        Some(FieldValue::Uuid(
            Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
        ))
    );

    let at = Field::new("at", FieldKind::Timestamp)
        .coerce(&Value::String("2021-03-04T05:06:07Z".into()));
    assert_eq!(
        at,
        Some(FieldValue::Timestamp(datetime!(2021-03-04 05:06:07 UTC)))
    );

    let bad = Field::new("at", FieldKind::Timestamp).coerce(&Value::String("yesterday".into()));
    assert_eq!(bad, None);
}

#[test]
fn doubles_widen_to_decimal() {
    let coerced = Field::new("f", FieldKind::Decimal).coerce(&Value::Double(0.5));
    assert_eq!(coerced, Some(FieldValue::Decimal(Decimal::new(5, 1))));
}
