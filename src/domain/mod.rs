//! Domain 模块
//!
//! 链元数据模型及其嵌套值类型

pub mod bech32_config;
pub mod chain;
pub mod denom;
pub mod node_info;
pub mod threshold;

use serde::{Deserialize, Deserializer};

// 重新导出常用类型
pub use bech32_config::Bech32Config;
pub use chain::{Chain, ChannelQuery, DbStringMap};
pub use denom::{Denom, DenomList, GasPrice};
pub use node_info::{NodeInfo, PublicNodeEndpoints};
pub use threshold::Threshold;

// 可选字段的显式 null 视为未填写
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
