//! 全节点连接信息与公共节点端点

use serde::{Deserialize, Deserializer, Serialize};

use super::bech32_config::{Bech32Config, Bech32ConfigRecord};
use crate::infrastructure::column_codec::{impl_jsonb_column, BlobCodec};
use crate::validation::{Constraint, FieldCheck, FieldValue, Validatable, COSMOS_RPC_URL};

/// 连接链全节点（如广播交易）所需的信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub endpoint: String,
    pub chain_id: String,
    pub bech32_config: Bech32Config,
}

/// `NodeInfo` 的存储形式，Bech32 派生前缀不入库
#[derive(Debug, Serialize)]
pub struct NodeInfoRecord<'a> {
    pub endpoint: &'a str,
    pub chain_id: &'a str,
    pub bech32_config: Bech32ConfigRecord<'a>,
}

impl BlobCodec for NodeInfo {
    const TYPE_NAME: &'static str = "NodeInfo";
    type Stored<'a> = NodeInfoRecord<'a>;

    fn to_storage(&self) -> NodeInfoRecord<'_> {
        NodeInfoRecord {
            endpoint: &self.endpoint,
            chain_id: &self.chain_id,
            bech32_config: self.bech32_config.to_storage(),
        }
    }
}

impl Validatable for NodeInfo {
    fn struct_name(&self) -> &'static str {
        "NodeInfo"
    }

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        use Constraint::Required;
        vec![
            FieldCheck::new("endpoint", FieldValue::Str(&self.endpoint), [Required]),
            FieldCheck::new("chain_id", FieldValue::Str(&self.chain_id), [Required]),
            FieldCheck::new(
                "bech32_config",
                FieldValue::Struct(&self.bech32_config),
                [Required],
            ),
        ]
    }
}

/// 非原生支持链的公共端点（前端 "Suggest Chain" 使用）
///
/// 两个列表要么都为空，要么都非空；每个 URL 都须通过 `cosmosrpcurl` 校验。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicNodeEndpoints {
    #[serde(default, deserialize_with = "string_or_list")]
    pub tendermint_rpc: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub cosmos_api: Vec<String>,
}

impl PublicNodeEndpoints {
    pub fn is_empty(&self) -> bool {
        self.tendermint_rpc.is_empty() && self.cosmos_api.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

// 单个字符串视为只有一个元素的列表，空串与 null 视为空列表
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<OneOrMany> = Deserialize::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(items)) => items,
    })
}

impl BlobCodec for PublicNodeEndpoints {
    const TYPE_NAME: &'static str = "PublicNodeEndpoints";
    type Stored<'a> = &'a PublicNodeEndpoints;

    fn to_storage(&self) -> &PublicNodeEndpoints {
        self
    }
}

impl Validatable for PublicNodeEndpoints {
    fn struct_name(&self) -> &'static str {
        "PublicNodeEndpoints"
    }

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        use Constraint::*;
        vec![
            FieldCheck::new(
                "tendermint_rpc",
                FieldValue::StrList(&self.tendermint_rpc),
                [
                    RequiredWith("cosmos_api"),
                    OmitEmpty,
                    Min(1),
                    Dive,
                    Rule(COSMOS_RPC_URL),
                ],
            ),
            FieldCheck::new(
                "cosmos_api",
                FieldValue::StrList(&self.cosmos_api),
                [
                    RequiredWith("tendermint_rpc"),
                    OmitEmpty,
                    Min(1),
                    Dive,
                    Rule(COSMOS_RPC_URL),
                ],
            ),
        ]
    }
}

impl_jsonb_column!(NodeInfo, PublicNodeEndpoints);
