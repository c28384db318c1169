use rask_logger::redaction::{MAX_DEPTH, Redactor, sanitize};
use serde_json::{Value, json};
use std::collections::HashSet;

fn blacklist(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_masks_top_level_field() {
    let out = sanitize(
        &json!({"user": "a", "password": "secret"}),
        &blacklist(&["password"]),
        "*",
    );
    assert_eq!(out, json!({"user": "a", "password": "*"}));
}

#[test]
fn test_masks_nested_and_listed_occurrences() {
    let out = sanitize(
        &json!({"a": {"password": "x"}, "list": [{"password": "y"}]}),
        &blacklist(&["password"]),
        "*",
    );
    assert_eq!(out, json!({"a": {"password": "*"}, "list": [{"password": "*"}]}));
}

#[test]
fn test_whole_subtree_replaced() {
    let out = sanitize(
        &json!({"credentials": {"user": "u", "token": [1, 2, 3]}, "ok": true}),
        &blacklist(&["credentials"]),
        "[REDACTED]",
    );
    assert_eq!(out, json!({"credentials": "[REDACTED]", "ok": true}));
}

#[test]
fn test_primitives_and_empty_blacklist() {
    let empty = HashSet::new();
    for value in [json!(null), json!(true), json!(3.5), json!("password")] {
        assert_eq!(sanitize(&value, &blacklist(&["password"]), "*"), value);
    }
    let payload = json!({"password": "kept"});
    assert_eq!(sanitize(&payload, &empty, "*"), payload);
}

#[test]
fn test_hostile_nesting_fails_closed() {
    let mut payload = json!({"password": "deep"});
    for _ in 0..(MAX_DEPTH * 2) {
        payload = json!([payload]);
    }
    let out = sanitize(&payload, &HashSet::new(), "*");

    let mut cursor = &out;
    let mut depth = 0;
    while let Value::Array(items) = cursor {
        cursor = &items[0];
        depth += 1;
    }
    assert_eq!(depth, MAX_DEPTH);
    assert_eq!(cursor, &json!("*"));
}

#[test]
fn test_redactor_reflects_runtime_changes() {
    let redactor = Redactor::new(["password"], "*");
    let payload = json!({"password": "p", "api_key": "k"});
    assert_eq!(
        redactor.sanitize(&payload),
        json!({"password": "*", "api_key": "k"})
    );

    redactor.blacklist().extend(["api_key"]);
    redactor.blacklist().remove("password");
    redactor.set_mask("<hidden>");
    assert_eq!(
        redactor.sanitize(&payload),
        json!({"password": "p", "api_key": "<hidden>"})
    );
}
