use pretty_assertions::assert_eq;

use crate::{Map, Value, parse};

fn object(entries: Vec<(&str, Value)>) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}

#[test]
fn array_of_integers() {
    let parsed = parse("[1,2,3]").unwrap();
    assert!(!parsed.tainted);
    assert_eq!(
        parsed.value,
        Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn nested_containers() {
    let parsed = parse(r#"{"a": 1, "b": [true, null, {"c": "d"}]}"#).unwrap();
    assert!(!parsed.tainted);
    assert_eq!(
        parsed.value,
        object(vec![
            ("a", Value::Int(1)),
            (
                "b",
                Value::Array(vec![
                    Value::Bool(true),
                    Value::Null,
                    object(vec![("c", Value::String("d".into()))]),
                ])
            ),
        ])
    );
}

#[test]
fn empty_containers() {
    let parsed = parse("{}").unwrap();
    assert!(!parsed.tainted);
    assert_eq!(parsed.value, Value::Object(Map::new()));

    let parsed = parse("[]").unwrap();
    assert!(!parsed.tainted);
    assert_eq!(parsed.value, Value::Array(vec![]));
}

#[test]
fn surrounding_whitespace() {
    let parsed = parse("  \t\n { \"a\" :\n1 }  ").unwrap();
    assert!(!parsed.tainted);
    assert_eq!(parsed.value, object(vec![("a", Value::Int(1))]));
}

#[test]
fn escapes_decode() {
    let parsed = parse(r#"["A\n\t\/\\\"\b\f\r"]"#).unwrap();
    assert!(!parsed.tainted);
    assert_eq!(
        parsed.value.as_array().unwrap()[0].as_str().unwrap(),
        "A\n\t/\\\"\u{0008}\u{000C}\r"
    );
}

#[test]
fn unicode_escape_hex_is_case_insensitive() {
    let upper = parse("[\"\\u00E9\"]").unwrap();
    let lower = parse("[\"\\u00e9\"]").unwrap();
    assert!(!upper.tainted);
    assert!(!lower.tainted);
    assert_eq!(upper.value, lower.value);
    assert_eq!(upper.value.as_array().unwrap()[0].as_str().unwrap(), "é");
}

#[test]
fn escaped_surrogate_pairs_combine() {
    let parsed = parse("[\"\\uD83D\\uDE00\"]").unwrap();
    assert!(!parsed.tainted);
    assert_eq!(
        parsed.value.as_array().unwrap()[0].as_str().unwrap(),
        "\u{1F600}"
    );
}

#[test]
fn surrogates_without_a_partner_become_replacement_characters() {
    // Lone high surrogate followed by plain text.
    let parsed = parse("[\"a\\uD83Db\"]").unwrap();
    assert_eq!(
        parsed.value.as_array().unwrap()[0].as_str().unwrap(),
        "a\u{FFFD}b"
    );

    // Lone low surrogate.
    let parsed = parse("[\"\\uDE00\"]").unwrap();
    assert_eq!(
        parsed.value.as_array().unwrap()[0].as_str().unwrap(),
        "\u{FFFD}"
    );

    // High surrogate whose following escape is not a low surrogate.
    let parsed = parse("[\"\\uD83D\\u0041\"]").unwrap();
    assert_eq!(
        parsed.value.as_array().unwrap()[0].as_str().unwrap(),
        "\u{FFFD}A"
    );
}

#[test]
fn keys_preserve_insertion_order() {
    let parsed = parse(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
    assert!(!parsed.tainted);
    let keys: Vec<_> = parsed
        .value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn duplicate_keys_last_value_wins() {
    let parsed = parse(r#"{"a": 1, "a": 2}"#).unwrap();
    assert!(!parsed.tainted);
    let map = parsed.value.as_object().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["a"], Value::Int(2));
}

// Bare `true`/`false`/`null` pass the top-level check; only bare strings
// and numbers are flagged.
#[test]
fn top_level_literals_are_untainted() {
    for (text, expected) in [
        ("true", Value::Bool(true)),
        ("false", Value::Bool(false)),
        ("null", Value::Null),
    ] {
        let parsed = parse(text).unwrap();
        assert!(!parsed.tainted, "unexpected taint for {text:?}");
        assert_eq!(parsed.value, expected);
    }
}

// A missing comma between object members slips through: after a completed
// pair the parser accepts the next key directly.
#[test]
fn missing_object_separator_is_accepted() {
    let parsed = parse(r#"{"a": 1 "b": 2}"#).unwrap();
    assert!(!parsed.tainted);
    assert_eq!(
        parsed.value,
        object(vec![("a", Value::Int(1)), ("b", Value::Int(2))])
    );
}

#[test]
fn nesting_below_the_guard_is_untainted() {
    let text = format!("{}{}", "[".repeat(19), "]".repeat(19));
    let parsed = parse(&text).unwrap();
    assert!(!parsed.tainted);
}
