//! Property-based tests for statement validation
//!
//! These tests verify that the engine is total and deterministic across a
//! wide range of inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use xapi_schemas::{
    create_statement_validator, Rule, SchemaValidator, STATEMENT, STATEMENT_LIST,
};

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-2.0f64..2.0).prop_map(|f| json!(f)),
        "[a-zA-Z0-9 :/@.~-]{0,50}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        4,  // max depth
        24, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                proptest::collection::hash_map(
                    prop_oneof![
                        Just("actor".to_string()),
                        Just("verb".to_string()),
                        Just("object".to_string()),
                        Just("mbox".to_string()),
                        Just("objectType".to_string()),
                        Just("id".to_string()),
                        "[a-zA-Z_/~][a-zA-Z0-9_]{0,20}",
                    ],
                    inner,
                    0..5
                )
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for generating agents with any subset of identifiers
fn agent_strategy() -> impl Strategy<Value = Value> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(mbox, sha1, openid, account)| {
            let mut agent = json!({});
            if mbox {
                agent["mbox"] = json!("mailto:learner@example.com");
            }
            if sha1 {
                agent["mbox_sha1sum"] = json!("ebd31e95054c018b10727ccffd2ef2ec3a016ee9");
            }
            if openid {
                agent["openid"] = json!("http://openid.example.org/12345");
            }
            if account {
                agent["account"] = json!({"homePage": "http://lms.example.com", "name": "x"});
            }
            agent
        },
    )
}

fn statement_with_actor(actor: Value) -> Value {
    json!({
        "actor": actor,
        "verb": {"id": "http://adlnet.gov/expapi/verbs/completed"},
        "object": {"id": "http://example.com/activities/course-1"}
    })
}

proptest! {
    /// Property: the engine is total over well-formed JSON
    #[test]
    fn prop_validator_never_fails_on_json(
        input in json_value_strategy()
    ) {
        let validator = create_statement_validator().expect("validator creation should succeed");

        let strict = validator.validate(&input, STATEMENT);
        prop_assert!(strict.is_ok());
        prop_assert!(validator.validate_structural(&input, STATEMENT).is_ok());
        prop_assert!(validator.validate(&input, STATEMENT_LIST).is_ok());

        let result = strict.unwrap();
        prop_assert_eq!(result.valid, result.violations.is_empty());
    }

    /// Property: validation is deterministic
    #[test]
    fn prop_validation_deterministic(
        input in json_value_strategy()
    ) {
        let validator = create_statement_validator().expect("validator creation should succeed");

        let first = validator.validate(&input, STATEMENT).unwrap();
        let second = validator.validate(&input, STATEMENT).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: structural mode never reports more than strict mode
    #[test]
    fn prop_structural_is_no_stricter(
        input in json_value_strategy()
    ) {
        let validator = create_statement_validator().expect("validator creation should succeed");

        let strict = validator.validate(&input, STATEMENT).unwrap();
        let structural = validator.validate_structural(&input, STATEMENT).unwrap();
        prop_assert!(!strict.valid || structural.valid);
        prop_assert!(structural.iter_all().all(|v| v.rule != Rule::Format));
    }

    /// Property: an agent is accepted exactly when it has one identifier
    #[test]
    fn prop_exactly_one_identifier(
        actor in agent_strategy()
    ) {
        let identifiers = actor.as_object().map(|m| m.len()).unwrap_or(0);
        let validator = create_statement_validator().expect("validator creation should succeed");

        let result = validator.validate(&statement_with_actor(actor), STATEMENT).unwrap();
        prop_assert_eq!(result.valid, identifiers == 1, "{}", result);
    }

    /// Property: every violation path is a JSON Pointer
    #[test]
    fn prop_paths_are_pointers(
        input in json_value_strategy()
    ) {
        let validator = create_statement_validator().expect("validator creation should succeed");

        let result = validator.validate(&input, STATEMENT).unwrap();
        for violation in result.iter_all() {
            prop_assert!(violation.path.is_empty() || violation.path.starts_with('/'));
        }
    }

    /// Property: unknown top-level keys are always reported at their own path
    #[test]
    fn prop_unknown_key_reported(
        key in "x-[a-z]{1,10}"
    ) {
        let mut statement = statement_with_actor(json!({"mbox": "mailto:a@example.com"}));
        statement[key.as_str()] = json!(1);

        let validator = create_statement_validator().expect("validator creation should succeed");
        let result = validator.validate(&statement, STATEMENT).unwrap();
        let expected = format!("/{}", key);
        prop_assert!(result.violations.iter().any(|v| v.path == expected && v.rule == Rule::AdditionalProperties));
    }
}
