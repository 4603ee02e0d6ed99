//! 测试辅助模块
//! 提供链元数据 JSON 样例与校验引擎

#![allow(dead_code)]

use chainmodels::validation::{default_engine, RuleEngine};

/// 不含公共端点的完整链记录
pub const CHAIN_WITHOUT_PUBLIC_NODE_ENDPOINTS: &str = r#"
{
    "enabled": true,
    "chain_name": "foo",
    "logo": "logo.png",
    "display_name": "FooBar",
    "primary_channel": {
        "key1": "value1",
        "key2": "value2"
    },
    "denoms": [
        {
            "name": "denom1",
            "display_name": "Denom 1",
            "logo": "https://logo.com",
            "precision": 12,
            "verified": true,
            "stakable": true,
            "ticker": "DNM",
            "price_id": "price id",
            "fee_token": true,
            "gas_price_levels": {
                "low": 0.034,
                "average": 0.05,
                "high": 0.06
            },
            "fetch_price": true,
            "relayer_denom": true,
            "minimum_thresh_relayer_balance": 24000
        }
    ],
    "demeris_addresses": ["0x12324", "0x34567"],
    "genesis_hash": "0x123456",
    "node_info": {
        "endpoint": "https://foo.bar:1234",
        "chain_id": "my_chain",
        "bech32_config": {
            "main_prefix": "prefix",
            "prefix_account": "account",
            "prefix_validator": "validator",
            "prefix_consensus": "consensus",
            "prefix_public": "public",
            "prefix_operator": "operator"
        }
    },
    "valid_block_thresh": "32m",
    "derivation_path": "m/44'/0'/0'",
    "supported_wallets": ["Keplr", "Some other"],
    "block_explorer": "https://explorer.com",
    "cosmos_sdk_version": "v0.44.3"
}
"#;

/// 在基础记录上附加 `public_node_endpoints`
pub fn chain_with(public_node_endpoints: serde_json::Value) -> String {
    let mut body: serde_json::Value =
        serde_json::from_str(CHAIN_WITHOUT_PUBLIC_NODE_ENDPOINTS).expect("fixture is valid JSON");
    body["public_node_endpoints"] = public_node_endpoints;
    body.to_string()
}

/// 注册了全部内置规则的引擎
pub fn engine() -> RuleEngine {
    default_engine().expect("builtin rules register")
}
