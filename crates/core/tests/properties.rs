// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end properties of the filter expression parser.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use filterq::{parse_str, Connector, ErrorKind, Operator, Query, Value};

const CORPUS: &[&str] = &[
    "age >= 21",
    "age>=21 &&name==\"bob\"",
    "a == 1 && b == 2 || c == 3",
    "(a == 1 && b == 2) || c == 3",
    "a == 1 AND (b != 2 OR c < 3)",
    "((x > -5))",
    "price <= 19.99 && discount == 0.0",
    "name.lower() == \"bob\" || name.substr(0, 3) != \"al\"",
    "note == \"line\\none\\t\\\"quoted\\\" \\\\ done\"",
    "active == TRUE && deleted != false",
    "title == \"héllo wörld\"",
];

#[test]
fn canonical_text_round_trips() {
    for input in CORPUS {
        let query = parse_str(input).expect(input);
        let canonical = query.to_string();
        let reparsed = parse_str(&canonical).expect(&canonical);
        assert_eq!(query, reparsed, "round trip of {input:?} via {canonical:?}");
        // Canonical text is a fixed point.
        similar_asserts::assert_eq!(reparsed.to_string(), canonical);
    }
}

#[test]
fn canonical_text_normalizes_spacing_and_connectors() {
    let query = parse_str("age>=21   AND   (name==\"bob\"  or  x<1)").unwrap();
    similar_asserts::assert_eq!(
        query.to_string().as_str(),
        "age >= 21 && (name == \"bob\" || x < 1)"
    );
}

#[test]
fn single_comparisons_keep_key_operator_and_value() {
    let operators = [
        ("==", Operator::Equals),
        ("!=", Operator::NotEquals),
        ("<", Operator::Less),
        ("<=", Operator::LessEquals),
        (">", Operator::Greater),
        (">=", Operator::GreaterEquals),
    ];
    for key in ["a", "age", "Score"] {
        for (symbol, operator) in operators {
            for value in [0i64, 7, 21, 1000, -3] {
                let input = format!("{key} {symbol} {value}");
                let Query::Comparison(cmp) = parse_str(&input).unwrap() else {
                    unreachable!("{input:?} should be a single comparison");
                };
                assert_eq!(cmp.subject.key().name, key);
                assert_eq!(cmp.operator, operator);
                assert_eq!(cmp.value, Value::Integer(value));
            }
        }
    }
}

#[test]
fn binary_connectors_preserve_both_operands_in_order() {
    for (symbol, connector) in [("&&", Connector::And), ("||", Connector::Or)] {
        let input = format!("first > 1 {symbol} second < 2");
        let Query::Logical {
            lhs,
            connector: parsed,
            rhs,
        } = parse_str(&input).unwrap()
        else {
            unreachable!("{input:?} should be a logical node");
        };
        assert_eq!(parsed, connector);
        assert_eq!(lhs.to_string(), "first > 1");
        assert_eq!(rhs.to_string(), "second < 2");
    }
}

#[test]
fn concurrent_parses_are_independent() {
    let inputs: Vec<String> = (0..16)
        .map(|i| format!("(k == {i} && v > {}) || z != {}", i * 10, i + 1))
        .collect();
    let expected: Vec<String> = inputs
        .iter()
        .map(|input| parse_str(input).unwrap().to_string())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .zip(&expected)
            .map(|(input, expected)| {
                scope.spawn(move || {
                    for _ in 0..200 {
                        assert_eq!(&parse_str(input).unwrap().to_string(), expected);
                        let err = parse_str("(a == 1").unwrap_err();
                        assert_eq!(err.kind, ErrorKind::UnmatchedGrouping);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("parser thread panicked");
        }
    });
}

#[test]
fn query_json_is_stable() {
    let query = parse_str("(a == 1) || b.len() > 2").unwrap();
    let json = serde_json::to_value(&query).unwrap();
    let logical = &json["logical"];
    assert_eq!(logical["connector"], "or");
    assert_eq!(
        logical["lhs"]["group"]["comparison"]["subject"]["name"],
        "a"
    );
    let call = &logical["rhs"]["comparison"]["subject"];
    assert_eq!(call["type"], "call");
    assert_eq!(call["name"], "len");
    assert_eq!(call["key"]["name"], "b");
}
