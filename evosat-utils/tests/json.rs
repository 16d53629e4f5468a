use evosat_utils::*;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Report {
    zeta: u32,
    alpha: Vec<bool>,
    nested: Nested,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Nested {
    b: f64,
    a: String,
}

#[test]
fn test_jsonify_sorts_keys() {
    let report = Report {
        zeta: 3,
        alpha: vec![true, false],
        nested: Nested {
            b: 0.5,
            a: "x".to_string(),
        },
    };
    assert_eq!(
        jsonify(&report).unwrap(),
        r#"{"alpha":[true,false],"nested":{"a":"x","b":0.5},"zeta":3}"#
    );
}

#[test]
fn test_dejsonify_roundtrip() {
    let json = r#"{"alpha":[],"nested":{"a":"","b":1.0},"zeta":0}"#;
    let report: Report = dejsonify(json).unwrap();
    assert_eq!(report.zeta, 0);
    assert!(dejsonify::<Report>("{").is_err());
}

#[test]
fn test_jsonify_pretty_sorts_keys() {
    let nested = Nested {
        b: 0.5,
        a: "x".to_string(),
    };
    assert_eq!(
        jsonify_pretty(&nested).unwrap(),
        "{\n  \"a\": \"x\",\n  \"b\": 0.5\n}"
    );
}
