//! 公共节点端点绑定测试：两个列表要么都填写，要么都为空

use chainmodels::prelude::*;
use chainmodels::validation::{cosmos_rpc_url, Constraint, FieldCheck, FieldValue};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Wrapper {
    field1: String,
    public_node_endpoints: PublicNodeEndpoints,
}

impl Validatable for Wrapper {
    fn struct_name(&self) -> &'static str {
        "Wrapper"
    }

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        vec![
            FieldCheck::new("field1", FieldValue::Str(&self.field1), [Constraint::Required]),
            FieldCheck::new(
                "public_node_endpoints",
                FieldValue::Struct(&self.public_node_endpoints),
                [Constraint::Dive],
            ),
        ]
    }
}

fn engine() -> RuleEngine {
    let mut engine = RuleEngine::new();
    cosmos_rpc_url(&mut engine).unwrap();
    engine
}

#[test]
fn test_public_node_endpoints_binding() {
    let cases = [
        ("missing", r#"{"field1": "test"}"#, false),
        (
            "both empty",
            r#"{"field1": "test", "public_node_endpoints": {}}"#,
            false,
        ),
        (
            "both filled",
            r#"{"field1": "test", "public_node_endpoints": {
                "tendermint_rpc": "https://localhost:1234",
                "cosmos_api": "https://localhost:34567"
            }}"#,
            false,
        ),
        (
            "rpc empty",
            r#"{"field1": "test", "public_node_endpoints": {
                "cosmos_api": "https://localhost:34567"
            }}"#,
            true,
        ),
        (
            "api empty",
            r#"{"field1": "test", "public_node_endpoints": {
                "tendermint_rpc": "https://localhost:1234"
            }}"#,
            true,
        ),
        (
            "explicit empty lists",
            r#"{"field1": "test", "public_node_endpoints": {
                "tendermint_rpc": [],
                "cosmos_api": ["https://localhost:34567"]
            }}"#,
            true,
        ),
    ];

    let engine = engine();
    for (name, body, fails) in cases {
        let result = bind_json::<Wrapper>(body.as_bytes(), &engine);
        assert_eq!(result.is_err(), fails, "{name}: {result:?}");
    }
}

#[test]
fn test_invalid_urls_are_reported_per_element() {
    let body = r#"{"field1": "test", "public_node_endpoints": {
        "tendermint_rpc": ["https://localhost:1234", "https://user@localhost:1234"],
        "cosmos_api": ["https://localhost:34567?x=1"]
    }}"#;

    let err = bind_json::<Wrapper>(body.as_bytes(), &engine()).unwrap_err();
    assert_eq!(
        missing_fields(&err, true),
        Some(vec![
            "public_node_endpoints.tendermint_rpc[1]".to_string(),
            "public_node_endpoints.cosmos_api[0]".to_string(),
        ])
    );
}

#[test]
fn test_scan_from_storage() {
    let cases: [(&str, &[u8], bool); 3] = [
        (
            "full JSON",
            br#"{"tendermint_rpc": "https://localhost:1234", "cosmos_api": "https://127.0.0.1:2345"}"#,
            false,
        ),
        ("empty string", b"", true),
        ("invalid string", b"foo", true),
    ];

    for (name, bytes, fails) in cases {
        let mut pne = PublicNodeEndpoints::default();
        let result = pne.scan(&DbValue::Bytes(bytes.to_vec()));
        assert_eq!(result.is_err(), fails, "{name}");
        if !fails {
            assert!(!pne.cosmos_api.is_empty());
            assert!(!pne.tendermint_rpc.is_empty());
        }
    }
}

#[test]
fn test_scan_json_null_is_unset() {
    let mut pne = PublicNodeEndpoints {
        tendermint_rpc: vec!["https://localhost:1234".into()],
        cosmos_api: vec!["https://localhost:34567".into()],
    };
    pne.scan(&DbValue::Bytes(b"null".to_vec())).unwrap();
    assert!(pne.is_empty());
}
