//! 链元数据（CNS 中的一行）
//!
//! `chain_name` 是全局唯一的自然键；`id` 仅用于存储，不出现在 API 中。

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::denom::{Denom, DenomList};
use super::node_info::{NodeInfo, PublicNodeEndpoints};
use super::threshold::Threshold;
use crate::infrastructure::column_codec::{impl_jsonb_column, BlobCodec};
use crate::validation::{
    semver, Constraint, FieldCheck, FieldValue, StructLevel, Validatable, DERIVATION_PATH,
    SEMVER,
};

/// 结构体级规则：denom 名称重复
pub const TAG_UNIQUE: &str = "unique";
/// 结构体级规则：出现多个 relayer denom
pub const TAG_RELAYER_DENOM: &str = "relayerdenom";

/// 可存库的字符串映射（对端链名 → 通道）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbStringMap(pub BTreeMap<String, String>);

impl DbStringMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DbStringMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl BlobCodec for DbStringMap {
    const TYPE_NAME: &'static str = "DbStringMap";
    type Stored<'a> = &'a DbStringMap;

    fn to_storage(&self) -> &DbStringMap {
        self
    }
}

impl_jsonb_column!(DbStringMap);

/// 链元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Chain {
    #[serde(skip)]
    pub id: i64,
    /// 启用后 API 才会返回该链的数据
    pub enabled: bool,
    pub chain_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub logo: String,
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub primary_channel: DbStringMap,
    pub denoms: DenomList,
    /// 接受手续费支付的地址
    pub demeris_addresses: Vec<String>,
    pub genesis_hash: String,
    pub node_info: NodeInfo,
    pub valid_block_thresh: Threshold,
    pub derivation_path: String,
    pub supported_wallets: Vec<String>,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub block_explorer: String,
    /// 非原生支持链的端点
    #[serde(
        skip_serializing_if = "PublicNodeEndpoints::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub public_node_endpoints: PublicNodeEndpoints,
    pub cosmos_sdk_version: String,
}

impl Chain {
    /// 已验证的原生 denom
    pub fn verified_tokens(&self) -> DenomList {
        self.denoms.iter().filter(|d| d.verified).cloned().collect()
    }

    /// 可用于支付手续费的 denom
    pub fn fee_tokens(&self) -> DenomList {
        self.denoms.iter().filter(|d| d.fee_token).cloned().collect()
    }

    pub fn find_relayer_token(&self) -> Option<&Denom> {
        self.denoms.iter().find(|d| d.relayer_denom)
    }

    /// 中继手续费使用的 denom
    ///
    /// # Panics
    ///
    /// 每条链都必须配置一个 relayer denom，缺失属于数据完整性错误。
    pub fn relayer_token(&self) -> &Denom {
        match self.find_relayer_token() {
            Some(denom) => denom,
            None => {
                tracing::error!(chain_name = %self.chain_name, "relayer token not defined");
                panic!("relayer token not defined for chain {}", self.chain_name);
            }
        }
    }

    /// Cosmos SDK 的发布线编号（`v0.44.3` → 44）
    pub fn major_sdk_version(&self) -> Option<u64> {
        semver::parse(&self.cosmos_sdk_version).map(|v| v.minor)
    }
}

impl Validatable for Chain {
    fn struct_name(&self) -> &'static str {
        "Chain"
    }

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        use Constraint::*;
        vec![
            FieldCheck::new("chain_name", FieldValue::Str(&self.chain_name), [Required]),
            FieldCheck::new(
                "display_name",
                FieldValue::Str(&self.display_name),
                [Required],
            ),
            FieldCheck::new(
                "denoms",
                FieldValue::StructList(self.denoms.as_validatable()),
                [Required, Dive],
            ),
            FieldCheck::new(
                "demeris_addresses",
                FieldValue::StrList(&self.demeris_addresses),
                [Required],
            ),
            FieldCheck::new(
                "genesis_hash",
                FieldValue::Str(&self.genesis_hash),
                [Required],
            ),
            FieldCheck::new("node_info", FieldValue::Struct(&self.node_info), [Required]),
            FieldCheck::new(
                "valid_block_thresh",
                FieldValue::Duration(self.valid_block_thresh.duration()),
                [Required],
            ),
            FieldCheck::new(
                "derivation_path",
                FieldValue::Str(&self.derivation_path),
                [Required, Rule(DERIVATION_PATH)],
            ),
            FieldCheck::new(
                "supported_wallets",
                FieldValue::StrList(&self.supported_wallets),
                [Required],
            ),
            FieldCheck::new(
                "public_node_endpoints",
                FieldValue::Struct(&self.public_node_endpoints),
                [Dive],
            ),
            FieldCheck::new(
                "cosmos_sdk_version",
                FieldValue::Str(&self.cosmos_sdk_version),
                [Required, Rule(SEMVER)],
            ),
        ]
    }

    fn validate_struct_level(&self, level: &mut StructLevel<'_>) {
        let mut seen = HashSet::new();
        for denom in &self.denoms {
            if !denom.name.is_empty() && !seen.insert(denom.name.as_str()) {
                level.report_error(
                    "denoms",
                    TAG_UNIQUE,
                    None,
                    format!("duplicate denom {}", denom.name),
                );
            }
        }

        let relayer_denoms = self.denoms.iter().filter(|d| d.relayer_denom).count();
        if relayer_denoms > 1 {
            level.report_error(
                "denoms",
                TAG_RELAYER_DENOM,
                Some("1".to_string()),
                format!("{relayer_denoms} relayer denoms, at most one allowed"),
            );
        }
    }
}

/// 通道查询结果：某条链到对端链的通道
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChannelQuery {
    pub chain_name: String,
    #[sqlx(rename = "key")]
    pub counterparty: String,
    #[sqlx(rename = "value")]
    pub channel_name: String,
}
